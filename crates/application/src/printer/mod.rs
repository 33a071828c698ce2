pub mod sequencer;
pub mod supervisor;

pub use sequencer::{ReceiptSequencer, format_euro};
pub use supervisor::{ConnectionSupervisor, PrinterSession};
