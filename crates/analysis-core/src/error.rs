use thiserror::Error;

/// Failure of a single data source call.
///
/// Every variant is handled the same way by the run: the failure is logged and
/// the source's neutral default is substituted (see [`crate::SourceResult`]).
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
