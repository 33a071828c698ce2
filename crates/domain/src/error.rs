use thiserror::Error;

use crate::printer::PrinterError;

/// Bridge-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Bind failed: {0}")]
    BindFailure(String),

    #[error("Device open failed: {0}")]
    DeviceOpenFailure(String),

    #[error("Remote call failed: {0}")]
    RemoteCall(String),

    #[error("Printer not initialized")]
    NotReady,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<PrinterError> for DomainError {
    fn from(err: PrinterError) -> Self {
        match err {
            PrinterError::Remote(detail) => Self::RemoteCall(detail),
            other => Self::RemoteCall(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
