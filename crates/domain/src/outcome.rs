use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform result handed back to the calling application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl OperationResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Printer status, recomputed on every query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    #[serde(rename = "isConnected")]
    pub connected: bool,
    #[serde(rename = "isPrinterReady")]
    pub ready: bool,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_available: Option<bool>,
}

impl StatusSnapshot {
    pub fn ready(status_code: i32, paper_available: bool) -> Self {
        let status = if paper_available { "Ready" } else { "Paper issue" };
        Self {
            connected: true,
            ready: true,
            status: status.to_string(),
            status_code: Some(status_code),
            paper_available: Some(paper_available),
        }
    }

    pub fn not_initialized() -> Self {
        Self {
            connected: false,
            ready: false,
            status: "Not initialized".to_string(),
            status_code: None,
            paper_available: None,
        }
    }

    pub fn error(detail: impl std::fmt::Display) -> Self {
        Self {
            connected: false,
            ready: false,
            status: format!("Error: {}", detail),
            status_code: None,
            paper_available: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_omits_empty_data() {
        let value = serde_json::to_value(OperationResult::ok("Receipt printed")).unwrap();
        assert_eq!(value, json!({ "success": true, "message": "Receipt printed" }));
    }

    #[test]
    fn test_status_wire_keys() {
        let value = serde_json::to_value(StatusSnapshot::ready(0, true)).unwrap();
        assert_eq!(
            value,
            json!({
                "isConnected": true,
                "isPrinterReady": true,
                "status": "Ready",
                "statusCode": 0,
                "paperAvailable": true
            })
        );
    }

    #[test]
    fn test_status_derived_from_paper_flag() {
        assert_eq!(StatusSnapshot::ready(3, false).status, "Paper issue");
        assert_eq!(StatusSnapshot::ready(3, true).status, "Ready");
    }

    #[test]
    fn test_error_status_is_descriptive() {
        let snapshot = StatusSnapshot::error("link closed");
        assert!(!snapshot.connected);
        assert_eq!(snapshot.status, "Error: link closed");
    }
}
