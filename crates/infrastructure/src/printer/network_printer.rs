use async_trait::async_trait;
use domain::{PrinterConnection, PrinterError};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{error, info};

/// Raw TCP printer, usually port 9100
pub struct NetworkPrinter {
    address: String,
    stream: Option<TcpStream>,
    timeout: Duration,
}

impl NetworkPrinter {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            address: format!("{}:{}", host, port),
            stream: None,
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl PrinterConnection for NetworkPrinter {
    async fn connect(&mut self) -> Result<(), PrinterError> {
        info!("Connecting to printer at {}", self.address);
        match tokio::time::timeout(self.timeout, TcpStream::connect(&self.address)).await {
            Ok(Ok(stream)) => {
                info!("Connected to printer!");
                self.stream = Some(stream);
                Ok(())
            }
            Ok(Err(e)) => Err(PrinterError::ConnectionFailed(e.to_string())),
            Err(_) => Err(PrinterError::ConnectionFailed(
                "Connection timed out".to_string(),
            )),
        }
    }

    async fn disconnect(&mut self) -> Result<(), PrinterError> {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown().await;
        }
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn send_commands(&mut self, commands: &[u8]) -> Result<(), PrinterError> {
        let Some(stream) = &mut self.stream else {
            return Err(PrinterError::NotConnected);
        };

        match stream.write_all(commands).await {
            Ok(_) => {
                let _ = stream.flush().await;
                Ok(())
            }
            Err(e) => {
                error!("Failed to write to printer: {}", e);
                self.stream = None; // Invalidate connection
                Err(PrinterError::WriteFailed(e.to_string()))
            }
        }
    }

    async fn query(&mut self, request: &[u8]) -> Result<Option<u8>, PrinterError> {
        let Some(stream) = &mut self.stream else {
            return Err(PrinterError::NotConnected);
        };

        if let Err(e) = stream.write_all(request).await {
            error!("Failed to send status request: {}", e);
            self.stream = None;
            return Err(PrinterError::WriteFailed(e.to_string()));
        }

        let mut response = [0u8; 1];
        match tokio::time::timeout(self.timeout, stream.read_exact(&mut response)).await {
            Ok(Ok(_)) => Ok(Some(response[0])),
            Ok(Err(e)) => {
                error!("Failed to read status response: {}", e);
                self.stream = None;
                Err(PrinterError::ConnectionFailed(e.to_string()))
            }
            Err(_) => Err(PrinterError::Remote(
                "Status response timed out".to_string(),
            )),
        }
    }
}
