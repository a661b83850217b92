//! Failure taxonomy shared by the process and summary tools.
//!
//! Every failure is recoverable: the tools convert an [`IntakeError`] into a
//! structured failure report instead of returning it to the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntakeError {
    /// Input was empty or parsed into a dataset without rows.
    #[error("CSV validation failed: {0}")]
    Validation(String),
    /// The CSV reader rejected the input structure.
    #[error("CSV parsing error: {0}")]
    Parse(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl IntakeError {
    pub fn validation(message: impl Into<String>) -> Self {
        IntakeError::Validation(message.into())
    }

    /// Renders the message a failure report carries. Unexpected errors take the
    /// caller's prefix because each tool words that tier differently.
    pub fn report_message(&self, unexpected_prefix: &str) -> String {
        match self {
            IntakeError::Unexpected(err) => format!("{unexpected_prefix}: {err:#}"),
            other => other.to_string(),
        }
    }
}

impl From<csv::Error> for IntakeError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(_) => IntakeError::Unexpected(anyhow::Error::new(err)),
            _ => IntakeError::Parse(err.to_string()),
        }
    }
}

pub type IntakeResult<T> = std::result::Result<T, IntakeError>;
