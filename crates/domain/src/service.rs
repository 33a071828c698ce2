use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::DomainError;
use crate::printer::{PrinterError, PrinterService};

/// Package/action pair used to locate the external printer service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceIdentity {
    pub package: String,
    pub action: String,
}

impl ServiceIdentity {
    pub fn new(package: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            action: action.into(),
        }
    }
}

impl std::fmt::Display for ServiceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.package, self.action)
    }
}

/// Reference to the bound manager service. The printer capability is a
/// sub-service that has to be requested from it.
#[async_trait]
pub trait ServiceManager: Send + Sync {
    async fn printer_service(&self) -> Result<Arc<dyn PrinterService>, PrinterError>;
}

/// Events delivered by the runtime after a bind request
pub enum ServiceEvent {
    Connected(Arc<dyn ServiceManager>),
    Disconnected,
}

impl std::fmt::Debug for ServiceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected(_) => f.write_str("Connected"),
            Self::Disconnected => f.write_str("Disconnected"),
        }
    }
}

pub type ServiceEvents = mpsc::UnboundedSender<ServiceEvent>;

/// Runtime facility that binds to an out-of-process service.
///
/// `bind` only initiates the handshake; the outcome arrives later on `events`.
/// An `Err` means the request could not even be issued.
pub trait ServiceBinder: Send + Sync {
    fn bind(&self, identity: &ServiceIdentity, events: ServiceEvents) -> Result<(), DomainError>;

    /// Release the binding. Safe to call when nothing is bound.
    fn unbind(&self);
}
