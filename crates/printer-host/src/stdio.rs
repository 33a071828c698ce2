//! JSON-lines transport standing in for the hybrid runtime's plugin channel.
//!
//! Each input line is one call: `{"id": 7, "method": "printReceipt", "params": {...}}`.
//! Each output line settles one call: `{"id": 7, "resolved": {...}}` or
//! `{"id": 7, "rejected": {"message": "...", "data": {...}}}`.

use application::{CallOutcome, CommandBridge, PluginCall};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct HostRequest {
    #[serde(default)]
    id: Value,
    #[serde(flatten)]
    call: PluginCall,
}

#[derive(Debug, Serialize)]
struct HostResponse {
    id: Value,
    #[serde(flatten)]
    outcome: CallOutcome,
}

/// Answer calls until the reader is exhausted or `shutdown` completes.
///
/// Calls are handled one at a time, so responses come back in request order.
/// `shutdown` is only observed between calls: a receipt that has started
/// printing always runs to the end and gets its response.
pub async fn serve<R, W, S>(
    bridge: &CommandBridge,
    reader: R,
    mut writer: W,
    shutdown: S,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut lines = reader.lines();
    loop {
        let line = tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Shutdown requested, no further calls accepted");
                break;
            }
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            break;
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<HostRequest>(line) {
            Ok(request) => {
                debug!(id = %request.id, method = %request.call.method, "Call received");
                HostResponse {
                    id: request.id,
                    outcome: bridge.handle(request.call).await,
                }
            }
            Err(e) => {
                warn!(error = %e, "Malformed call");
                HostResponse {
                    id: Value::Null,
                    outcome: CallOutcome::Rejected {
                        message: format!("Malformed call: {}", e),
                        data: json!({ "success": false, "message": e.to_string() }),
                    },
                }
            }
        };

        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
    }
    Ok(())
}
