use async_trait::async_trait;
use domain::{PrinterConnection, PrinterError};
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-memory transport that records every byte it is sent
#[derive(Clone)]
pub struct MemoryConnection {
    pub connected: bool,
    pub reachable: bool,
    pub sent_data: Arc<Mutex<Vec<u8>>>,
    pub queries: Arc<Mutex<Vec<Vec<u8>>>>,
    /// Byte answered to status queries; `None` behaves like a write-only link
    pub status_byte: Arc<Mutex<Option<u8>>>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self {
            connected: false,
            reachable: true,
            sent_data: Arc::new(Mutex::new(Vec::new())),
            queries: Arc::new(Mutex::new(Vec::new())),
            status_byte: Arc::new(Mutex::new(None)),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::new()
        }
    }
}

impl Default for MemoryConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrinterConnection for MemoryConnection {
    async fn connect(&mut self) -> Result<(), PrinterError> {
        if !self.reachable {
            return Err(PrinterError::ConnectionFailed(
                "Simulated unreachable printer".to_string(),
            ));
        }
        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), PrinterError> {
        self.connected = false;
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.connected
    }

    async fn send_commands(&mut self, commands: &[u8]) -> Result<(), PrinterError> {
        if !self.connected {
            return Err(PrinterError::NotConnected);
        }
        let mut data = self.sent_data.lock().await;
        data.extend_from_slice(commands);
        Ok(())
    }

    async fn query(&mut self, request: &[u8]) -> Result<Option<u8>, PrinterError> {
        if !self.connected {
            return Err(PrinterError::NotConnected);
        }
        self.queries.lock().await.push(request.to_vec());
        Ok(*self.status_byte.lock().await)
    }
}
