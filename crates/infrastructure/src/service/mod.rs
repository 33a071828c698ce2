pub mod local_binder;
pub mod mock_binder;

pub use local_binder::{LocalServiceBinder, LocalServiceManager};
pub use mock_binder::{MockServiceBinder, MockServiceManager};
