use thiserror::Error;

use super::config::ConfigError;
use super::executor::ExecutionError;
use crate::core::models::ids::ConformerId;
use crate::core::models::properties::PropertyError;
use crate::core::report::error::ReportError;

#[derive(Debug, Error)]
pub enum StepError {
    #[error("Invalid step configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Conformer {id}: {source}")]
    Property {
        id: ConformerId,
        #[source]
        source: PropertyError,
    },

    #[error("External tool failed for conformer {id}: {source}")]
    ExecutionFailed {
        id: ConformerId,
        #[source]
        source: ExecutionError,
    },

    #[error("Report for conformer {id} could not be parsed: {source}")]
    Report {
        id: ConformerId,
        #[source]
        source: ReportError,
    },

    #[error("Geometry of conformer {id} changed during the step (first differing atom: {atom})")]
    GeometryMutated { id: ConformerId, atom: usize },

    #[error("Working directory I/O failed for conformer {id}: {source}")]
    Io {
        id: ConformerId,
        #[source]
        source: std::io::Error,
    },
}

impl StepError {
    /// The conformer the error belongs to, if it is conformer-specific.
    pub fn conformer_id(&self) -> Option<&ConformerId> {
        match self {
            Self::Config(_) => None,
            Self::Property { id, .. }
            | Self::ExecutionFailed { id, .. }
            | Self::Report { id, .. }
            | Self::GeometryMutated { id, .. }
            | Self::Io { id, .. } => Some(id),
        }
    }
}
