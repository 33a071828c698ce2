use config::{Config, ConfigError, Environment, File};
use domain::{DeviceAddress, ReceiptLayout, ServiceIdentity};
use serde::{Deserialize, Serialize};

/// Identity of the external printer service. Kept in configuration because
/// vendor images differ in what they register.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    #[serde(default = "default_service_package")]
    pub package: String,
    #[serde(default = "default_service_action")]
    pub action: String,
}

fn default_service_package() -> String {
    "cn.wintec.sdk".to_string()
}
fn default_service_action() -> String {
    "cn.wintec.SERVICE".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            package: default_service_package(),
            action: default_service_action(),
        }
    }
}

impl ServiceConfig {
    pub fn identity(&self) -> ServiceIdentity {
        ServiceIdentity::new(&self.package, &self.action)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PrinterConfig {
    #[serde(default = "default_printer_host")]
    pub host: String,
    #[serde(default = "default_printer_port")]
    pub port: u16,
    #[serde(default = "default_printer_timeout_ms")]
    pub timeout_ms: u64,

    pub r#type: Option<String>, // "Network" (default) or "File"
    pub path: Option<String>,   // Required if type is "File"
}

fn default_printer_host() -> String {
    "127.0.0.1".to_string()
}
fn default_printer_port() -> u16 {
    9100
}
fn default_printer_timeout_ms() -> u64 {
    5000
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            host: default_printer_host(),
            port: default_printer_port(),
            timeout_ms: default_printer_timeout_ms(),
            r#type: None,
            path: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BridgeConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub device: DeviceAddress,
    #[serde(default)]
    pub printer: PrinterConfig,
    #[serde(default)]
    pub receipt: ReceiptLayout,
}

impl BridgeConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Base settings, optional so the bridge can start with built-in defaults
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            // Per-environment overrides, e.g. config/production.toml
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            // Environment variables (e.g. BRIDGE__PRINTER__HOST=10.0.0.1)
            .add_source(Environment::with_prefix("BRIDGE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
