use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use domain::{
    DomainError, PrinterError, PrinterService, ServiceBinder, ServiceEvent, ServiceEvents,
    ServiceIdentity, ServiceManager,
};
use tracing::{info, warn};

/// Manager service that hands out one in-process printer capability
pub struct LocalServiceManager {
    printer: Arc<dyn PrinterService>,
}

impl LocalServiceManager {
    pub fn new(printer: Arc<dyn PrinterService>) -> Self {
        Self { printer }
    }
}

#[async_trait]
impl ServiceManager for LocalServiceManager {
    async fn printer_service(&self) -> Result<Arc<dyn PrinterService>, PrinterError> {
        Ok(Arc::clone(&self.printer))
    }
}

/// Binder for hosts where the printer service lives in the same process.
///
/// Only a request for the registered identity succeeds. The connect event is
/// queued on the caller's channel, so it is still handled asynchronously.
pub struct LocalServiceBinder {
    identity: ServiceIdentity,
    manager: Arc<dyn ServiceManager>,
    events: Mutex<Option<ServiceEvents>>,
}

impl LocalServiceBinder {
    pub fn new(identity: ServiceIdentity, manager: Arc<dyn ServiceManager>) -> Self {
        Self {
            identity,
            manager,
            events: Mutex::new(None),
        }
    }

    /// Report that the service went away, as the runtime would after a crash
    pub fn notify_disconnected(&self) -> bool {
        let events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        match events.as_ref() {
            Some(tx) => tx.send(ServiceEvent::Disconnected).is_ok(),
            None => false,
        }
    }
}

impl ServiceBinder for LocalServiceBinder {
    fn bind(&self, identity: &ServiceIdentity, events: ServiceEvents) -> Result<(), DomainError> {
        if identity != &self.identity {
            warn!(requested = %identity, registered = %self.identity, "No service matches bind request");
            return Err(DomainError::BindFailure(format!(
                "no service registered for {}",
                identity
            )));
        }

        events
            .send(ServiceEvent::Connected(Arc::clone(&self.manager)))
            .map_err(|_| DomainError::BindFailure("bind requester went away".to_string()))?;

        *self.events.lock().unwrap_or_else(PoisonError::into_inner) = Some(events);
        info!(service = %identity, "Local printer service bound");
        Ok(())
    }

    fn unbind(&self) {
        if self
            .events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
        {
            info!(service = %self.identity, "Local printer service unbound");
        }
    }
}
