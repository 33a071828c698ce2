use async_trait::async_trait;
use domain::{PrinterConnection, PrinterError};
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

/// Appends printer output to a file or spooler share
pub struct FilePrinter {
    path: PathBuf,
    connected: bool,
}

impl FilePrinter {
    pub fn new(path: &str) -> Self {
        Self {
            path: PathBuf::from(path),
            connected: false,
        }
    }
}

#[async_trait]
impl PrinterConnection for FilePrinter {
    async fn connect(&mut self) -> Result<(), PrinterError> {
        info!("Preparing to print to file/share: {:?}", self.path);
        // The file is opened per write so a network share is never held locked
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
                Err(PrinterError::ConnectionFailed(format!(
                    "Directory {:?} does not exist",
                    dir
                )))
            }
            _ => {
                self.connected = true;
                Ok(())
            }
        }
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

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                error!("Failed to open printer file {:?}: {}", self.path, e);
                PrinterError::ConnectionFailed(e.to_string())
            })?;

        file.write_all(commands).await.map_err(|e| {
            error!("Failed to write to printer file: {}", e);
            PrinterError::WriteFailed(e.to_string())
        })?;
        file.flush().await.map_err(|e| {
            error!("Failed to flush to printer file: {}", e);
            PrinterError::WriteFailed(e.to_string())
        })
    }
}
