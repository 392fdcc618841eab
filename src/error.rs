use thiserror::Error;

/// Errors surfaced by pipeline stages.
///
/// Validation fails at the entry of the stage that owns the parameter; a
/// failing stage yields no partial output. Numeric flooring (replacing zero
/// magnitudes so downstream logs and divisions stay defined) is applied
/// silently and is never an error.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// A stage precondition on a configuration value is violated.
    #[error("Invalid parameter `{param}` in {stage}: {message}")]
    InvalidParameter {
        stage: &'static str,
        param: &'static str,
        message: String,
    },
    /// Every filter in the bank collapsed to zero width.
    #[error("Degenerate filterbank: {detail}")]
    DegenerateFilter { detail: String },
}

impl FeatureError {
    pub(crate) fn invalid(
        stage: &'static str,
        param: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            stage,
            param,
            message: message.into(),
        }
    }
}
