use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use application::{CommandBridge, ConnectionSupervisor, ReceiptSequencer};
use domain::{PrinterService, ServiceManager};
use infrastructure::{
    BridgeConfig, EscPosPrinterService, LocalServiceBinder, LocalServiceManager, PrinterFactory,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to config directory
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// Override printer host
    #[arg(long)]
    printer_host: Option<String>,

    /// Override printer port
    #[arg(long)]
    printer_port: Option<u16>,

    /// Write receipts to this file instead of the network
    #[arg(long)]
    printer_path: Option<String>,
}

async fn run() -> Result<()> {
    dotenv().ok();

    // Logs go to stderr, stdout carries the call responses
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,printer_host=debug,application=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("🖨️ Printer bridge host starting...");
    info!("🆔 Process ID: {}", std::process::id());

    let args = Args::parse();

    // Check if we are in development environment (run from project root)
    let dev_base = "crates/printer-host";
    let config_dir = if std::path::Path::new(dev_base).exists() && args.config_dir == "config" {
        format!("{}/config", dev_base)
    } else {
        args.config_dir.clone()
    };
    info!("📂 Config directory: {}", config_dir);

    let mut config = BridgeConfig::load(&config_dir)?;
    if let Some(host) = args.printer_host {
        config.printer.host = host;
    }
    if let Some(port) = args.printer_port {
        config.printer.port = port;
    }
    if let Some(path) = args.printer_path {
        config.printer.r#type = Some("File".to_string());
        config.printer.path = Some(path);
    }

    let identity = config.service.identity();
    info!(
        service = %identity,
        bus = ?config.device.bus,
        index = config.device.index,
        "✅ Configuration loaded"
    );

    let connection = PrinterFactory::create_connection(&config.printer)?;
    let printer: Arc<dyn PrinterService> = Arc::new(EscPosPrinterService::new(connection));
    let manager: Arc<dyn ServiceManager> = Arc::new(LocalServiceManager::new(printer));
    let binder = Arc::new(LocalServiceBinder::new(identity.clone(), manager));

    let supervisor = Arc::new(ConnectionSupervisor::new(binder, identity, config.device));
    let bridge = CommandBridge::new(supervisor, ReceiptSequencer::new(config.receipt));

    // A failed bind is not fatal, calls are rejected until the service shows up
    if let Err(e) = bridge.load() {
        warn!(error = %e, "⚠ Printer service bind failed");
    }

    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        info!("🛑 Shutdown signal received");
    };

    // Ctrl-C stops intake; a receipt already printing is finished first
    match printer_host::stdio::serve(&bridge, reader, writer, ctrl_c).await {
        Ok(()) => info!("Call channel closed"),
        Err(e) => warn!(error = %e, "Call channel failed"),
    }

    bridge.shutdown().await;
    info!("👋 Printer bridge host stopped");
    Ok(())
}

fn main() {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("❌ Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };
    let result = rt.block_on(run());

    // A blocked stdin read cannot be cancelled; do not wait for it
    rt.shutdown_timeout(Duration::from_millis(100));

    if let Err(e) = result {
        eprintln!("❌ Fatal error: {:?}", e);
        std::process::exit(1);
    }
}
