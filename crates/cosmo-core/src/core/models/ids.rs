use std::fmt;

/// Positional identity of a conformer inside a batch of compounds.
///
/// Conformers have no intrinsic identifier; they are addressed by where they
/// sit in the compound → enumeration → conformer hierarchy. The compound name is
/// carried along so that errors and log records stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConformerId {
    pub compound_name: String,
    pub compound: usize,
    pub enumeration: usize,
    pub conformer: usize,
}

impl ConformerId {
    pub fn new(compound_name: &str, compound: usize, enumeration: usize, conformer: usize) -> Self {
        Self {
            compound_name: compound_name.to_string(),
            compound,
            enumeration,
            conformer,
        }
    }
}

impl fmt::Display for ConformerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{} ({})",
            self.compound, self.enumeration, self.conformer, self.compound_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_position_and_name() {
        let id = ConformerId::new("paracetamol", 0, 1, 2);
        assert_eq!(id.to_string(), "0:1:2 (paracetamol)");
    }
}
