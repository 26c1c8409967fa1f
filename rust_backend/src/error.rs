//! Error types for OB preparation and submission.

use std::path::PathBuf;

/// Result type for OB preparation operations
pub type ObResult<T> = Result<T, ObError>;

/// Error type for OB preparation operations
#[derive(Debug, thiserror::Error)]
pub enum ObError {
    #[error("unknown template '{template}'")]
    UnknownTemplate { template: String },

    #[error("unknown keyword '{keyword}' in template '{template}'")]
    UnknownKeyword { keyword: String, template: String },

    #[error("Parameter value ({value}) is out of range for keyword {keyword} in template {template}")]
    OutOfRange {
        value: String,
        keyword: String,
        template: String,
    },

    #[error("keyword {keyword} is not part of supported ones {permitted:?}")]
    UnsupportedKeyword {
        keyword: String,
        permitted: Vec<&'static str>,
    },

    #[error("Object {target} has a too low precision in {axis} to be useable by VLTI, please correct with {required} or more digits.")]
    Precision {
        target: String,
        axis: &'static str,
        required: usize,
    },

    #[error("Dual-Field distance of two stars is {comparison} {limit} mas, Please Correct.")]
    DualFieldDistance {
        comparison: &'static str,
        limit: f64,
    },

    #[error(
        "K mag ({k}) is out of ranges [{kmin},{kmax}]\n for this mode (tel={tel}, spec={spec}, pol={pol}, dualFeed={dual_feed})"
    )]
    MagnitudeOutOfRange {
        k: f64,
        kmin: f64,
        kmax: f64,
        tel: String,
        spec: String,
        pol: String,
        dual_feed: bool,
    },

    /// The magnitude sits exactly on the lowest corrected breakpoint, a case the DIT table
    /// has no value for.
    #[error("K mag ({k}) equals the lower bound of the DIT table for this mode (tel={tel}, spec={spec}, pol={pol}) and no minimum DIT is defined")]
    UndefinedMinDit {
        k: f64,
        tel: String,
        spec: String,
        pol: String,
    },

    #[error("Lookup error: {0}")]
    Lookup(String),

    #[error("Data validation error: {0}")]
    Validation(String),

    #[error("Failed to load table {path}: {message}")]
    TableLoad { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("P2 error: {0}")]
    Api(String),
}

impl ObError {
    /// Whether the error comes from a rule violated by the input data, as opposed to
    /// a missing table, configuration or a failing remote call.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            ObError::TableLoad { .. } | ObError::Configuration(_) | ObError::Api(_)
        )
    }
}
