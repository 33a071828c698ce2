pub mod call;
pub mod plugin;

pub use call::{CallOutcome, PluginCall};
pub use plugin::{CommandBridge, Rejection};
