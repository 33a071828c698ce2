//! Application layer - Connection supervision, receipt sequencing and the
//! request/response bridge exposed to the calling application

pub mod bridge;
pub mod printer;

pub use bridge::{CallOutcome, CommandBridge, PluginCall, Rejection};
pub use printer::{ConnectionSupervisor, ReceiptSequencer};
