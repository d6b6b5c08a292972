use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Payload key under which the COSMO surface-charge file of a conformer is stored.
pub const COSMO_FILE_KEY: &str = "cosmo_file";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropertyError {
    #[error("Property key not found: '{key}'")]
    KeyNotFound { key: String },
}

/// A scalar property value.
///
/// Numeric values are kept as the exact text they were read from so that no
/// precision is lost on the way from a report to an output file. Conversion to
/// `f64` happens only when a caller asks for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// Free text.
    Text(String),
    /// A number, stored verbatim.
    Numeric(String),
}

impl PropertyValue {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::Numeric(s) => s,
        }
    }

    /// Parses a numeric value. Returns `None` for text values and for numbers the
    /// standard float parser does not accept (e.g. Fortran `D` exponents).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Numeric(s) => s.parse().ok(),
            Self::Text(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric(_))
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Per-conformer store of named scalar properties and named line payloads.
///
/// Keys are exact, case-sensitive strings. Every write replaces what was there
/// before, and every read of an absent key is an error rather than a default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyStore {
    /// Scalar properties, ordered by key for deterministic output.
    values: BTreeMap<String, PropertyValue>,
    /// Verbatim multi-line payloads such as the COSMO surface file.
    payloads: BTreeMap<String, Vec<String>>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a scalar property, replacing any previous value for `key`.
    pub fn set(&mut self, key: &str, value: impl Into<PropertyValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Looks up a scalar property.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::KeyNotFound`] if `key` has never been set.
    pub fn get(&self, key: &str) -> Result<&PropertyValue, PropertyError> {
        self.values
            .get(key)
            .ok_or_else(|| PropertyError::KeyNotFound {
                key: key.to_string(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Writes a whole batch of properties. This never fails, so a batch is
    /// either committed completely or not at all.
    pub fn commit<I>(&mut self, properties: I)
    where
        I: IntoIterator<Item = (String, PropertyValue)>,
    {
        self.values.extend(properties);
    }

    /// Iterates over scalar properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stores a line payload, replacing any previous payload for `key`.
    pub fn set_lines(&mut self, key: &str, lines: Vec<String>) {
        self.payloads.insert(key.to_string(), lines);
    }

    /// Looks up a line payload.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::KeyNotFound`] if no payload was stored under `key`.
    pub fn get_lines(&self, key: &str) -> Result<&[String], PropertyError> {
        self.payloads
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| PropertyError::KeyNotFound {
                key: key.to_string(),
            })
    }
}
