use serde::Serialize;

use crate::format::{self, HttpFailure, TransportFailure};

/// A response that went through classification, either directly or because
/// an accepted code overrode an error-range status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedResponse {
    pub success: bool,
    pub status_code: u16,
    pub status_text: String,
    /// Host name negotiated over TLS; `None` for plain HTTP and recovered errors.
    pub server_name: Option<String>,
    pub time_taken_ms: u64,
}

/// Outcome of a single check, serialised as the JSON wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub success_status: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<u64>,

    pub message: String,
}

impl CheckResult {
    pub fn classified(response: ClassifiedResponse) -> Self {
        let message = format::classified_message(&response);
        Self {
            success_status: response.success,
            status_code: Some(response.status_code),
            status_text: Some(response.status_text),
            server_name: response.server_name,
            time_taken: Some(response.time_taken_ms),
            message,
        }
    }

    pub fn unavailable(failure: &TransportFailure) -> Self {
        Self::failed(format::unavailable_message(failure))
    }

    pub fn service_error(failure: &HttpFailure) -> Self {
        Self::failed(format::service_error_message(failure))
    }

    /// Result returned without any network call when the parameters are unusable.
    pub fn malformed() -> Self {
        Self::failed(format::MALFORMED_URL_MESSAGE.to_string())
    }

    fn failed(message: String) -> Self {
        Self {
            success_status: false,
            status_code: None,
            status_text: None,
            server_name: None,
            time_taken: None,
            message,
        }
    }

    pub fn to_json(&self) -> String {
        // Only strings, integers and booleans: serialisation cannot fail.
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::error!("Failed to serialise check result: {e}");
            format!(r#"{{"successStatus":false,"message":{:?}}}"#, self.message)
        })
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}
