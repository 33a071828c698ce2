use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PrinterError {
    #[error("Remote call failed: {0}")]
    Remote(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Write failed: {0}")]
    WriteFailed(String),
    #[error("Not connected")]
    NotConnected,
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),
}

/// Physical bus the printer is attached to, as understood by `open`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BusType {
    #[default]
    Usb,
    Serial,
}

impl BusType {
    pub fn code(&self) -> u8 {
        match self {
            Self::Usb => 0,
            Self::Serial => 1,
        }
    }
}

/// Arguments for the `open` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeviceAddress {
    #[serde(default)]
    pub bus: BusType,
    #[serde(default)]
    pub index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn code(&self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Center => 1,
            Self::Right => 2,
        }
    }
}

/// Character magnification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontScale {
    /// 1x width, 1x height
    Normal,
    /// 2x width, 2x height
    Large,
}

/// The vendor's printer capability, reached through a bound service.
///
/// Every call may fail with a [`PrinterError`] when the remote endpoint cannot
/// be reached. That is distinct from `open` returning `Ok(false)`, which means
/// the service answered but the device could not be opened.
#[async_trait]
pub trait PrinterService: Send + Sync {
    async fn open(&self, bus: BusType, index: u32) -> Result<bool, PrinterError>;

    async fn init(&self) -> Result<(), PrinterError>;

    async fn close(&self) -> Result<(), PrinterError>;

    async fn set_alignment(&self, alignment: Alignment) -> Result<(), PrinterError>;

    async fn set_font_scale(&self, scale: FontScale) -> Result<(), PrinterError>;

    async fn set_bold(&self, on: bool) -> Result<(), PrinterError>;

    /// Print `text` using the named charset. Unflushed text may be held by
    /// the device until the next flushing command.
    async fn print(&self, text: &str, encoding: &str, flush: bool) -> Result<(), PrinterError>;

    async fn feed_lines(&self, lines: u8) -> Result<(), PrinterError>;

    async fn cut_paper(&self) -> Result<(), PrinterError>;

    async fn get_status(&self, mode: i32) -> Result<i32, PrinterError>;

    async fn get_paper_status(&self) -> Result<bool, PrinterError>;
}

/// Byte transport to a physical printer
#[async_trait]
pub trait PrinterConnection: Send + Sync {
    /// Attempt to establish a connection to the printer
    async fn connect(&mut self) -> Result<(), PrinterError>;

    /// Close the connection
    async fn disconnect(&mut self) -> Result<(), PrinterError>;

    /// Check if the connection is currently active
    async fn is_connected(&self) -> bool;

    /// Send raw bytes (ESC/POS commands) to the printer
    async fn send_commands(&mut self, commands: &[u8]) -> Result<(), PrinterError>;

    /// Send a real-time status request and read the single response byte.
    /// Transports without a back channel return `Ok(None)`.
    async fn query(&mut self, _request: &[u8]) -> Result<Option<u8>, PrinterError> {
        Ok(None)
    }
}
