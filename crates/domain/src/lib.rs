//! Domain layer - Pure types and capability traits for the printer bridge
//!
//! This crate contains:
//! - Connection state machine
//! - Receipt and result models
//! - Capability traits for the external printer service and its binder
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Device access only through traits, so every collaborator can be replaced in tests

pub mod connection;
pub mod error;
pub mod outcome;
pub mod printer;
pub mod receipt;
pub mod service;

// Re-export commonly used types
pub use connection::ConnectionState;
pub use error::DomainError;
pub use outcome::{OperationResult, StatusSnapshot};
pub use printer::{
    Alignment, BusType, DeviceAddress, FontScale, PrinterConnection, PrinterError,
    PrinterService,
};
pub use receipt::{Language, ReceiptItem, ReceiptLayout, ReceiptRequest};
pub use service::{ServiceBinder, ServiceEvent, ServiceEvents, ServiceIdentity, ServiceManager};
