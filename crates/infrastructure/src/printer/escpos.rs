use async_trait::async_trait;
use domain::{Alignment, BusType, FontScale, PrinterConnection, PrinterError, PrinterService};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;
const DLE: u8 = 0x10;
const EOT: u8 = 0x04;

/// DLE EOT 4 bits reporting paper near-end / end
const PAPER_END_MASK: u8 = 0x60;

struct Inner {
    connection: Box<dyn PrinterConnection>,
    /// Bytes of unflushed commands
    pending: Vec<u8>,
}

/// Printer capability implemented locally by encoding each command as
/// ESC/POS and writing it to a byte transport.
pub struct EscPosPrinterService {
    inner: Mutex<Inner>,
}

impl EscPosPrinterService {
    pub fn new(connection: Box<dyn PrinterConnection>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                connection,
                pending: Vec::new(),
            }),
        }
    }

    async fn send(&self, bytes: &[u8], flush: bool) -> Result<(), PrinterError> {
        let mut guard = self.inner.lock().await;
        let Inner {
            connection,
            pending,
        } = &mut *guard;

        pending.extend_from_slice(bytes);
        if flush {
            let data = std::mem::take(pending);
            connection.send_commands(&data).await?;
        }
        Ok(())
    }

    async fn query(&self, request: [u8; 3]) -> Result<Option<u8>, PrinterError> {
        let mut guard = self.inner.lock().await;
        let Inner {
            connection,
            pending,
        } = &mut *guard;

        if !pending.is_empty() {
            let data = std::mem::take(pending);
            connection.send_commands(&data).await?;
        }
        connection.query(&request).await
    }
}

#[async_trait]
impl PrinterService for EscPosPrinterService {
    async fn open(&self, bus: BusType, index: u32) -> Result<bool, PrinterError> {
        let mut guard = self.inner.lock().await;
        debug!(bus = ?bus, index, "Opening printer transport");
        match guard.connection.connect().await {
            Ok(()) => {
                guard.pending.clear();
                Ok(true)
            }
            Err(PrinterError::ConnectionFailed(reason)) => {
                warn!(bus = ?bus, index, %reason, "Printer transport unreachable");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn init(&self) -> Result<(), PrinterError> {
        // ESC @: Initialize printer
        self.send(&[ESC, b'@'], true).await
    }

    async fn close(&self) -> Result<(), PrinterError> {
        let mut guard = self.inner.lock().await;
        let Inner {
            connection,
            pending,
        } = &mut *guard;

        if !pending.is_empty() {
            let data = std::mem::take(pending);
            if let Err(e) = connection.send_commands(&data).await {
                warn!(error = %e, bytes = data.len(), "Dropping unflushed output on close");
            }
        }
        connection.disconnect().await?;
        info!("Printer transport closed");
        Ok(())
    }

    async fn set_alignment(&self, alignment: Alignment) -> Result<(), PrinterError> {
        // ESC a n: Align (0: Left, 1: Center, 2: Right)
        self.send(&[ESC, b'a', alignment.code()], false).await
    }

    async fn set_font_scale(&self, scale: FontScale) -> Result<(), PrinterError> {
        // GS ! n: high nibble width, low nibble height
        let n = match scale {
            FontScale::Normal => 0x00,
            FontScale::Large => 0x11,
        };
        self.send(&[GS, b'!', n], false).await
    }

    async fn set_bold(&self, on: bool) -> Result<(), PrinterError> {
        // ESC E n: Emphasized mode
        self.send(&[ESC, b'E', u8::from(on)], false).await
    }

    async fn print(&self, text: &str, encoding: &str, flush: bool) -> Result<(), PrinterError> {
        let charset = encoding_rs::Encoding::for_label(encoding.as_bytes())
            .ok_or_else(|| PrinterError::UnsupportedEncoding(encoding.to_string()))?;

        let (bytes, used, had_errors) = charset.encode(text);
        if had_errors {
            warn!(encoding = used.name(), "Text contains characters the charset cannot represent");
        }
        self.send(&bytes, flush).await
    }

    async fn feed_lines(&self, lines: u8) -> Result<(), PrinterError> {
        // ESC d n: Print and feed n lines
        self.send(&[ESC, b'd', lines], true).await
    }

    async fn cut_paper(&self) -> Result<(), PrinterError> {
        // GS V 0: Full cut
        self.send(&[GS, b'V', 0x00], true).await
    }

    async fn get_status(&self, mode: i32) -> Result<i32, PrinterError> {
        let n = u8::try_from(mode)
            .ok()
            .filter(|n| (1..=4).contains(n))
            .ok_or_else(|| PrinterError::Remote(format!("Invalid status mode: {}", mode)))?;

        // DLE EOT n: Real-time status transmission
        let status = self.query([DLE, EOT, n]).await?;
        Ok(status.map(i32::from).unwrap_or(0))
    }

    async fn get_paper_status(&self) -> Result<bool, PrinterError> {
        let status = self.query([DLE, EOT, 4]).await?;
        Ok(status.is_none_or(|byte| byte & PAPER_END_MASK == 0))
    }
}
