use domain::OperationResult;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::Rejection;

/// A method invocation from the hybrid runtime
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PluginCall {
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl PluginCall {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

/// How a call settles on the runtime side
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallOutcome {
    Resolved(Value),
    Rejected { message: String, data: Value },
}

impl CallOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn resolve<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(value) => Self::Resolved(value),
            Err(e) => Self::Rejected {
                message: "Serialization failed".to_string(),
                data: json!({ "success": false, "message": e.to_string() }),
            },
        }
    }
}

impl From<Rejection> for CallOutcome {
    fn from(rejection: Rejection) -> Self {
        let data = serde_json::to_value(&rejection.result)
            .unwrap_or_else(|_| json!({ "success": false, "message": rejection.result.message }));
        Self::Rejected {
            message: rejection.message,
            data,
        }
    }
}

impl From<Result<OperationResult, Rejection>> for CallOutcome {
    fn from(result: Result<OperationResult, Rejection>) -> Self {
        match result {
            Ok(result) => Self::resolve(&result),
            Err(rejection) => rejection.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_params_default_to_null() {
        let call: PluginCall = serde_json::from_str(r#"{"method": "initPrinter"}"#).unwrap();
        assert_eq!(call.method, "initPrinter");
        assert!(call.params.is_null());
    }

    #[test]
    fn test_outcome_wire_shape() {
        let resolved = CallOutcome::resolve(&OperationResult::ok("Printer initialized"));
        assert_eq!(
            serde_json::to_value(&resolved).unwrap(),
            json!({ "resolved": { "success": true, "message": "Printer initialized" } })
        );

        let rejected: CallOutcome = Rejection::not_initialized().into();
        assert_eq!(
            serde_json::to_value(&rejected).unwrap(),
            json!({
                "rejected": {
                    "message": "Printer not initialized",
                    "data": { "success": false, "message": "Printer not initialized" }
                }
            })
        );
    }
}
