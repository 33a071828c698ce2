use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use domain::{
    DomainError, PrinterError, PrinterService, ServiceBinder, ServiceEvent, ServiceEvents,
    ServiceIdentity, ServiceManager,
};

/// Manager whose printer capability can be made unobtainable
pub struct MockServiceManager {
    printer: Option<Arc<dyn PrinterService>>,
}

impl MockServiceManager {
    pub fn new(printer: Arc<dyn PrinterService>) -> Self {
        Self {
            printer: Some(printer),
        }
    }

    pub fn without_printer() -> Self {
        Self { printer: None }
    }
}

#[async_trait]
impl ServiceManager for MockServiceManager {
    async fn printer_service(&self) -> Result<Arc<dyn PrinterService>, PrinterError> {
        self.printer
            .clone()
            .ok_or_else(|| PrinterError::Remote("Printer service not provided".to_string()))
    }
}

#[derive(Default)]
struct BinderState {
    events: Option<ServiceEvents>,
    /// Channel handed over by every successful bind, kept after unbind
    history: Vec<ServiceEvents>,
    bind_requests: Vec<ServiceIdentity>,
    unbind_count: usize,
    fail_next_bind: bool,
}

/// Binder that records requests and lets the caller fire runtime events
#[derive(Clone, Default)]
pub struct MockServiceBinder {
    state: Arc<Mutex<BinderState>>,
}

impl MockServiceBinder {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BinderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn fail_next_bind(&self) {
        self.lock().fail_next_bind = true;
    }

    pub fn bind_requests(&self) -> Vec<ServiceIdentity> {
        self.lock().bind_requests.clone()
    }

    pub fn unbind_count(&self) -> usize {
        self.lock().unbind_count
    }

    pub fn is_bound(&self) -> bool {
        self.lock().events.is_some()
    }

    /// Deliver a connect event; false when nothing is bound
    pub fn connect(&self, manager: Arc<dyn ServiceManager>) -> bool {
        self.send(ServiceEvent::Connected(manager))
    }

    /// Deliver a disconnect event; false when nothing is bound
    pub fn disconnect(&self) -> bool {
        self.send(ServiceEvent::Disconnected)
    }

    /// Deliver a late disconnect on the channel of the `nth` successful bind,
    /// as a runtime might after the binding was already replaced
    pub fn disconnect_binding(&self, nth: usize) -> bool {
        match self.lock().history.get(nth) {
            Some(tx) => tx.send(ServiceEvent::Disconnected).is_ok(),
            None => false,
        }
    }

    fn send(&self, event: ServiceEvent) -> bool {
        match self.lock().events.as_ref() {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }
}

impl ServiceBinder for MockServiceBinder {
    fn bind(&self, identity: &ServiceIdentity, events: ServiceEvents) -> Result<(), DomainError> {
        let mut state = self.lock();
        state.bind_requests.push(identity.clone());
        if state.fail_next_bind {
            state.fail_next_bind = false;
            return Err(DomainError::BindFailure(
                "Simulated bind failure".to_string(),
            ));
        }
        state.history.push(events.clone());
        state.events = Some(events);
        Ok(())
    }

    fn unbind(&self) {
        let mut state = self.lock();
        state.events = None;
        state.unbind_count += 1;
    }
}
