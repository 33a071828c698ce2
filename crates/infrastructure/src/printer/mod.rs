pub mod escpos;
pub mod file_printer;
pub mod memory_connection;
pub mod mock_printer;
pub mod network_printer;

pub use escpos::EscPosPrinterService;
pub use file_printer::FilePrinter;
pub use memory_connection::MemoryConnection;
pub use mock_printer::{DeviceCommand, MockPrinterService};
pub use network_printer::NetworkPrinter;

use std::time::Duration;

use crate::config::PrinterConfig;
use domain::{DomainError, PrinterConnection};

/// Factory for creating printer transports
pub struct PrinterFactory;

impl PrinterFactory {
    /// Create a transport from the `[printer]` configuration section
    pub fn create_connection(
        config: &PrinterConfig,
    ) -> Result<Box<dyn PrinterConnection>, DomainError> {
        match config.r#type.as_deref().unwrap_or("Network") {
            "Network" => Ok(Box::new(
                NetworkPrinter::new(&config.host, config.port)
                    .with_timeout(Duration::from_millis(config.timeout_ms)),
            )),
            "File" => {
                let path = config.path.as_deref().ok_or_else(|| {
                    DomainError::InvalidConfig("File printer requires a path".to_string())
                })?;
                Ok(Box::new(FilePrinter::new(path)))
            }
            other => Err(DomainError::InvalidConfig(format!(
                "Unknown printer type: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_is_the_default_type() {
        let connection = PrinterFactory::create_connection(&PrinterConfig::default());
        assert!(connection.is_ok());
    }

    #[test]
    fn test_file_printer_requires_path() {
        let config = PrinterConfig {
            r#type: Some("File".to_string()),
            ..PrinterConfig::default()
        };
        let result = PrinterFactory::create_connection(&config);
        assert!(matches!(result, Err(DomainError::InvalidConfig(_))));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let config = PrinterConfig {
            r#type: Some("Bluetooth".to_string()),
            ..PrinterConfig::default()
        };
        let result = PrinterFactory::create_connection(&config);
        assert!(matches!(result, Err(DomainError::InvalidConfig(_))));
    }
}
