use async_trait::async_trait;
use domain::{Alignment, BusType, FontScale, PrinterError, PrinterService};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// One call made against a [`MockPrinterService`]
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    Open { bus: BusType, index: u32 },
    Init,
    Close,
    SetAlignment(Alignment),
    SetFontScale(FontScale),
    SetBold(bool),
    Print {
        text: String,
        encoding: String,
        flush: bool,
    },
    FeedLines(u8),
    CutPaper,
    GetStatus(i32),
    GetPaperStatus,
}

struct MockState {
    commands: Vec<DeviceCommand>,
    open_result: bool,
    fail_init: bool,
    /// Calls that still succeed before the next one fails
    fail_after: Option<usize>,
    fail_status: bool,
    status_code: i32,
    paper_ok: bool,
    delay: Option<Duration>,
}

/// Recording printer capability with fault injection
#[derive(Clone)]
pub struct MockPrinterService {
    state: Arc<Mutex<MockState>>,
}

impl MockPrinterService {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                commands: Vec::new(),
                open_result: true,
                fail_init: false,
                fail_after: None,
                fail_status: false,
                status_code: 0,
                paper_ok: true,
                delay: None,
            })),
        }
    }

    /// Value `open` answers with (without a remote error)
    pub async fn set_open_result(&self, opened: bool) {
        self.state.lock().await.open_result = opened;
    }

    pub async fn set_fail_init(&self, fail: bool) {
        self.state.lock().await.fail_init = fail;
    }

    /// Let `successful_calls` more calls through, then fail the next one
    pub async fn fail_after(&self, successful_calls: usize) {
        self.state.lock().await.fail_after = Some(successful_calls);
    }

    pub async fn set_fail_status(&self, fail: bool) {
        self.state.lock().await.fail_status = fail;
    }

    pub async fn set_status(&self, status_code: i32, paper_ok: bool) {
        let mut state = self.state.lock().await;
        state.status_code = status_code;
        state.paper_ok = paper_ok;
    }

    /// Slow every call down, to widen race windows in concurrency tests
    pub async fn set_delay(&self, delay: Duration) {
        self.state.lock().await.delay = Some(delay);
    }

    pub async fn commands(&self) -> Vec<DeviceCommand> {
        self.state.lock().await.commands.clone()
    }

    pub async fn clear_commands(&self) {
        self.state.lock().await.commands.clear();
    }

    /// Text of every `print` call, in order
    pub async fn printed_lines(&self) -> Vec<String> {
        self.state
            .lock()
            .await
            .commands
            .iter()
            .filter_map(|command| match command {
                DeviceCommand::Print { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    async fn record(&self, command: DeviceCommand) -> Result<(), PrinterError> {
        let delay = {
            let mut state = self.state.lock().await;
            state.commands.push(command.clone());
            if let Some(remaining) = state.fail_after {
                if remaining == 0 {
                    state.fail_after = None;
                    return Err(PrinterError::Remote(format!(
                        "Simulated failure at {:?}",
                        command
                    )));
                }
                state.fail_after = Some(remaining - 1);
            }
            state.delay
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }
}

impl Default for MockPrinterService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrinterService for MockPrinterService {
    async fn open(&self, bus: BusType, index: u32) -> Result<bool, PrinterError> {
        self.record(DeviceCommand::Open { bus, index }).await?;
        Ok(self.state.lock().await.open_result)
    }

    async fn init(&self) -> Result<(), PrinterError> {
        self.record(DeviceCommand::Init).await?;
        if self.state.lock().await.fail_init {
            return Err(PrinterError::Remote("Simulated init failure".to_string()));
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), PrinterError> {
        self.record(DeviceCommand::Close).await
    }

    async fn set_alignment(&self, alignment: Alignment) -> Result<(), PrinterError> {
        self.record(DeviceCommand::SetAlignment(alignment)).await
    }

    async fn set_font_scale(&self, scale: FontScale) -> Result<(), PrinterError> {
        self.record(DeviceCommand::SetFontScale(scale)).await
    }

    async fn set_bold(&self, on: bool) -> Result<(), PrinterError> {
        self.record(DeviceCommand::SetBold(on)).await
    }

    async fn print(&self, text: &str, encoding: &str, flush: bool) -> Result<(), PrinterError> {
        self.record(DeviceCommand::Print {
            text: text.to_string(),
            encoding: encoding.to_string(),
            flush,
        })
        .await
    }

    async fn feed_lines(&self, lines: u8) -> Result<(), PrinterError> {
        self.record(DeviceCommand::FeedLines(lines)).await
    }

    async fn cut_paper(&self) -> Result<(), PrinterError> {
        self.record(DeviceCommand::CutPaper).await
    }

    async fn get_status(&self, mode: i32) -> Result<i32, PrinterError> {
        self.record(DeviceCommand::GetStatus(mode)).await?;
        let state = self.state.lock().await;
        if state.fail_status {
            return Err(PrinterError::Remote("Simulated status failure".to_string()));
        }
        Ok(state.status_code)
    }

    async fn get_paper_status(&self) -> Result<bool, PrinterError> {
        self.record(DeviceCommand::GetPaperStatus).await?;
        let state = self.state.lock().await;
        if state.fail_status {
            return Err(PrinterError::Remote("Simulated status failure".to_string()));
        }
        Ok(state.paper_ok)
    }
}
