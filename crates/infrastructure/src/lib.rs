//! Infrastructure layer - Configuration, device transports and service binding

pub mod config;
pub mod printer;
pub mod service;

pub use config::BridgeConfig;
pub use printer::{EscPosPrinterService, PrinterFactory};
pub use service::{LocalServiceBinder, LocalServiceManager};
