use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use domain::{
    ConnectionState, DeviceAddress, DomainError, PrinterService, ServiceBinder, ServiceEvent,
    ServiceIdentity, ServiceManager,
};
use tokio::sync::{Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard, mpsc};
use tracing::{debug, error, info, warn};

struct SupervisorState {
    state: ConnectionState,
    printer: Option<Arc<dyn PrinterService>>,
    /// A bind request is outstanding or established with the runtime
    bound: bool,
    /// Bumped on every bind and teardown; events from older bindings are stale
    generation: u64,
    last_failure: Option<DomainError>,
}

/// Owns the binding to the external printer service and is the only writer of
/// [`ConnectionState`].
///
/// Binding is two-phase: [`start_binding`](Self::start_binding) returns as soon
/// as the runtime accepted the request, and the outcome arrives later as a
/// [`ServiceEvent`] handled on a separate task. State and the printer handle
/// sit behind one lock; `session_lock` serializes whole command sequences.
pub struct ConnectionSupervisor {
    binder: Arc<dyn ServiceBinder>,
    identity: ServiceIdentity,
    address: DeviceAddress,
    inner: Mutex<SupervisorState>,
    session_lock: AsyncMutex<()>,
}

/// Exclusive use of a ready printer for one command sequence
pub struct PrinterSession<'a> {
    _guard: AsyncMutexGuard<'a, ()>,
    printer: Arc<dyn PrinterService>,
}

impl PrinterSession<'_> {
    pub fn printer(&self) -> &dyn PrinterService {
        self.printer.as_ref()
    }
}

impl ConnectionSupervisor {
    pub fn new(
        binder: Arc<dyn ServiceBinder>,
        identity: ServiceIdentity,
        address: DeviceAddress,
    ) -> Self {
        Self {
            binder,
            identity,
            address,
            inner: Mutex::new(SupervisorState {
                state: ConnectionState::Unbound,
                printer: None,
                bound: false,
                generation: 0,
                last_failure: None,
            }),
            session_lock: AsyncMutex::new(()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SupervisorState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ConnectionState {
        self.lock_state().state
    }

    pub fn is_ready(&self) -> bool {
        self.lock_state().state.is_ready()
    }

    /// Reason the last bind or session open failed, cleared once ready
    pub fn last_failure(&self) -> Option<DomainError> {
        self.lock_state().last_failure.clone()
    }

    /// Request a bind to the external service. Returns without waiting for the
    /// connect event. Must be called inside a tokio runtime.
    pub fn start_binding(self: &Arc<Self>) -> Result<(), DomainError> {
        let (generation, was_bound) = {
            let mut inner = self.lock_state();
            let next = inner.state.to_binding().map_err(|e| {
                DomainError::InvalidState(format!("{} (current: {})", e, inner.state))
            })?;

            let was_bound = std::mem::replace(&mut inner.bound, false);
            inner.generation += 1;
            inner.printer = None;
            inner.last_failure = None;
            inner.state = next;
            (inner.generation, was_bound)
        };

        if was_bound {
            debug!(service = %self.identity, "Releasing previous binding before rebinding");
            self.binder.unbind();
        }

        let (tx, rx) = mpsc::unbounded_channel();
        match self.binder.bind(&self.identity, tx) {
            Ok(()) => {
                let torn_down = {
                    let mut inner = self.lock_state();
                    if inner.generation == generation && inner.state.is_transitioning() {
                        inner.bound = true;
                        false
                    } else {
                        true
                    }
                };
                if torn_down {
                    warn!(service = %self.identity, "Torn down while binding, releasing bind");
                    self.binder.unbind();
                    return Ok(());
                }

                info!(service = %self.identity, "🔌 Service binding initiated");
                tokio::spawn(Arc::clone(self).pump_events(rx, generation));
                Ok(())
            }
            Err(e) => {
                let mut inner = self.lock_state();
                if inner.generation != generation {
                    return Err(e);
                }
                inner.state = inner.state.to_disconnected();
                inner.last_failure = Some(e.clone());
                error!(service = %self.identity, error = %e, "❌ Service binding failed");
                Err(e)
            }
        }
    }

    async fn pump_events(
        self: Arc<Self>,
        mut events: mpsc::UnboundedReceiver<ServiceEvent>,
        generation: u64,
    ) {
        while let Some(event) = events.recv().await {
            match event {
                ServiceEvent::Connected(manager) => self.connected(manager, generation).await,
                ServiceEvent::Disconnected => self.disconnected(generation),
            }
        }
        debug!(service = %self.identity, generation, "Service event channel closed");
    }

    fn generation(&self) -> u64 {
        self.lock_state().generation
    }

    /// Handle the runtime's connect event: acquire the printer capability,
    /// open it and initialise it. Never retries on failure.
    pub async fn on_connected(&self, manager: Arc<dyn ServiceManager>) {
        self.connected(manager, self.generation()).await
    }

    async fn connected(&self, manager: Arc<dyn ServiceManager>, generation: u64) {
        {
            let inner = self.lock_state();
            if !inner.bound || inner.generation != generation {
                warn!(
                    service = %self.identity,
                    generation,
                    "Connect event without an active binding, ignoring"
                );
                return;
            }
            if inner.state.is_ready() {
                debug!(service = %self.identity, "Already ready, ignoring duplicate connect event");
                return;
            }
        }

        info!(service = %self.identity, "✓ Printer service connected");
        let outcome = self.open_session(manager.as_ref()).await;

        let orphaned = {
            let mut inner = self.lock_state();
            if inner.bound && inner.generation == generation {
                Self::apply_session(&mut inner, outcome);
                None
            } else {
                outcome.ok()
            }
        };

        if let Some(printer) = orphaned {
            warn!("Printer opened for a released binding, closing it");
            if let Err(e) = printer.close().await {
                warn!(error = %e, "Failed to close orphaned printer");
            }
        }
    }

    fn apply_session(
        inner: &mut SupervisorState,
        outcome: Result<Arc<dyn PrinterService>, DomainError>,
    ) {
        match outcome {
            Ok(printer) => match inner.state.to_ready() {
                Ok(next) => {
                    inner.state = next;
                    inner.printer = Some(printer);
                    inner.last_failure = None;
                    info!("✅ Printer opened and initialized");
                }
                Err(e) => warn!(state = %inner.state, "Discarding printer session: {}", e),
            },
            Err(err) => {
                if let Ok(next) = inner.state.to_not_ready() {
                    inner.state = next;
                }
                inner.printer = None;
                error!(error = %err, "❌ Printer not ready");
                inner.last_failure = Some(err);
            }
        }
    }

    /// Manager -> printer capability -> open -> init, collapsed into one outcome
    async fn open_session(
        &self,
        manager: &dyn ServiceManager,
    ) -> Result<Arc<dyn PrinterService>, DomainError> {
        let printer = manager
            .printer_service()
            .await
            .map_err(|e| DomainError::BindFailure(format!("printer capability unavailable: {}", e)))?;
        debug!("✓ Printer capability obtained");

        let DeviceAddress { bus, index } = self.address;
        let opened = printer
            .open(bus, index)
            .await
            .map_err(|e| DomainError::DeviceOpenFailure(format!("open failed: {}", e)))?;
        if !opened {
            return Err(DomainError::DeviceOpenFailure(format!(
                "open({:?}, {}) returned false",
                bus, index
            )));
        }

        printer
            .init()
            .await
            .map_err(|e| DomainError::DeviceOpenFailure(format!("init failed: {}", e)))?;

        Ok(printer)
    }

    /// Handle the runtime's disconnect event
    pub fn on_disconnected(&self) {
        self.disconnected(self.generation())
    }

    fn disconnected(&self, generation: u64) {
        let mut inner = self.lock_state();
        if inner.generation != generation {
            debug!(
                service = %self.identity,
                generation,
                "Ignoring disconnect from a released binding"
            );
            return;
        }
        inner.state = inner.state.to_disconnected();
        inner.printer = None;
        warn!(service = %self.identity, "⚠ Printer service disconnected");
    }

    /// Wait for exclusive use of the printer. `None` when not ready.
    pub async fn acquire(&self) -> Option<PrinterSession<'_>> {
        let guard = self.session_lock.lock().await;
        let printer = {
            let inner = self.lock_state();
            if inner.state.is_ready() {
                inner.printer.clone()
            } else {
                None
            }
        }?;

        Some(PrinterSession {
            _guard: guard,
            printer,
        })
    }

    /// Close the printer and release the binding. Waits for an in-flight
    /// command sequence to finish. Idempotent.
    pub async fn teardown(&self) {
        let _guard = self.session_lock.lock().await;

        let (printer, was_bound) = {
            let mut inner = self.lock_state();
            let printer = inner.printer.take();
            let was_bound = std::mem::replace(&mut inner.bound, false);
            inner.generation += 1;
            inner.state = inner.state.to_unbound();
            (printer, was_bound)
        };

        if let Some(printer) = printer {
            match printer.close().await {
                Ok(()) => info!("✓ Printer closed"),
                Err(e) => warn!(error = %e, "Failed to close printer during teardown"),
            }
        }

        if was_bound {
            self.binder.unbind();
            info!(service = %self.identity, "✓ Service unbound");
        }
    }
}
