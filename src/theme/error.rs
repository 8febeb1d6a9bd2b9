//! Theme engine error types

use thiserror::Error;

/// Template loading and rendering errors
#[derive(Debug, Error)]
pub enum ThemeError {
    /// Template parse or render failure
    #[error("Template error: {0}")]
    TemplateError(String),

    /// Filter called with an argument it cannot use
    #[error("Invalid filter argument: {0}")]
    InvalidArgument(String),
}
