use std::sync::Arc;

use domain::{DomainError, OperationResult, ReceiptRequest, StatusSnapshot};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{error, info, warn};

use super::call::{CallOutcome, PluginCall};
use crate::printer::{ConnectionSupervisor, ReceiptSequencer};

/// Status mode passed to the device's status query
const STATUS_MODE: i32 = 1;

/// Rejected half of the request/response contract
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct Rejection {
    pub message: String,
    pub result: OperationResult,
}

impl Rejection {
    pub fn new(message: impl Into<String>, result: OperationResult) -> Self {
        Self {
            message: message.into(),
            result,
        }
    }

    pub fn not_available() -> Self {
        Self::new(
            "Printer not available",
            OperationResult::failure(DomainError::NotReady.to_string()),
        )
    }

    pub fn not_initialized() -> Self {
        let err = DomainError::NotReady;
        Self::new(err.to_string(), OperationResult::failure(err.to_string()))
    }

    pub fn print_failed(detail: impl std::fmt::Display) -> Self {
        Self::new(
            "Print failed",
            OperationResult::failure(format!("Print failed: {}", detail)),
        )
    }

    pub fn invalid_request(detail: impl std::fmt::Display) -> Self {
        let err = DomainError::InvalidRequest(detail.to_string());
        Self::new(err.to_string(), OperationResult::failure(err.to_string()))
    }
}

impl From<DomainError> for Rejection {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidRequest(detail) => Self::invalid_request(detail),
            DomainError::NotReady => Self::not_initialized(),
            other => Self::print_failed(other),
        }
    }
}

/// The plugin surface the application talks to
pub struct CommandBridge {
    supervisor: Arc<ConnectionSupervisor>,
    sequencer: ReceiptSequencer,
}

impl CommandBridge {
    pub fn new(supervisor: Arc<ConnectionSupervisor>, sequencer: ReceiptSequencer) -> Self {
        Self {
            supervisor,
            sequencer,
        }
    }

    pub fn supervisor(&self) -> &Arc<ConnectionSupervisor> {
        &self.supervisor
    }

    /// Plugin load hook
    pub fn load(&self) -> Result<(), DomainError> {
        info!("=== Printer bridge load ===");
        self.supervisor.start_binding()
    }

    /// Host destroy hook
    pub async fn shutdown(&self) {
        info!("=== Printer bridge shutdown ===");
        self.supervisor.teardown().await;
    }

    pub fn init_printer(&self) -> Result<OperationResult, Rejection> {
        if self.supervisor.is_ready() {
            info!("✓ Printer ready");
            Ok(OperationResult::ok("Printer initialized"))
        } else {
            warn!(state = %self.supervisor.state(), "✗ Printer not ready");
            Err(Rejection::not_available())
        }
    }

    pub async fn print_receipt(
        &self,
        request: &ReceiptRequest,
    ) -> Result<OperationResult, Rejection> {
        if !self.supervisor.is_ready() {
            warn!(state = %self.supervisor.state(), "✗ Print rejected, printer not ready");
            return Err(Rejection::not_initialized());
        }

        if let Err(e) = request.line_totals() {
            warn!(order_number = %request.order_number, error = %e, "✗ Print rejected");
            return Err(e.into());
        }

        // Readiness may have changed while waiting for a previous receipt
        let Some(session) = self.supervisor.acquire().await else {
            warn!("✗ Printer went away before the receipt could start");
            return Err(Rejection::not_initialized());
        };

        info!(order_number = %request.order_number, total = %request.total, "Printing receipt");
        match self.sequencer.print(session.printer(), request).await {
            Ok(()) => {
                info!(order_number = %request.order_number, "✅ Receipt printed");
                Ok(OperationResult::ok("Receipt printed"))
            }
            Err(e) => {
                error!(order_number = %request.order_number, error = %e, "❌ Print failed");
                Err(e.into())
            }
        }
    }

    /// Never fails; problems are reported inside the snapshot
    pub async fn printer_status(&self) -> StatusSnapshot {
        let Some(session) = self.supervisor.acquire().await else {
            warn!("⚠ Status requested while not initialized");
            return StatusSnapshot::not_initialized();
        };

        let printer = session.printer();
        let status = match printer.get_status(STATUS_MODE).await {
            Ok(code) => code,
            Err(e) => {
                error!(error = %e, "✗ Status query failed");
                return StatusSnapshot::error(e);
            }
        };

        match printer.get_paper_status().await {
            Ok(paper_ok) => {
                info!(status_code = status, paper_ok, "✓ Printer status");
                StatusSnapshot::ready(status, paper_ok)
            }
            Err(e) => {
                error!(error = %e, "✗ Paper status query failed");
                StatusSnapshot::error(e)
            }
        }
    }

    /// Dispatch a runtime call by method name
    pub async fn handle(&self, call: PluginCall) -> CallOutcome {
        info!(method = %call.method, "=== {}() ===", call.method);
        match call.method.as_str() {
            "initPrinter" => self.init_printer().into(),
            "printReceipt" => {
                let params = if call.params.is_null() {
                    json!({})
                } else {
                    call.params
                };
                match serde_json::from_value::<ReceiptRequest>(params) {
                    Ok(request) => self.print_receipt(&request).await.into(),
                    Err(e) => {
                        warn!(error = %e, "Invalid printReceipt payload");
                        Rejection::invalid_request(e).into()
                    }
                }
            }
            "getPrinterStatus" => CallOutcome::resolve(&self.printer_status().await),
            other => {
                warn!(method = %other, "Unhandled method");
                CallOutcome::Rejected {
                    message: "Method not implemented".to_string(),
                    data: Value::Null,
                }
            }
        }
    }
}
