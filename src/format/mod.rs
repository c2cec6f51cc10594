//! Human-readable messages for check results.
//!
//! Everything here is a pure function of its input.

use crate::http_probe::result::ClassifiedResponse;

pub const MALFORMED_URL_MESSAGE: &str = "❌ Missing or Malformed URL";

const DEFAULT_SERVER_NAME: &str = "Server";
const DEFAULT_FAILURE_CODE: &str = "a fatal error";

/// A failure that happened before any HTTP response was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub hostname: Option<String>,
    /// Short error code such as `ECONNREFUSED` or `CERT_HAS_EXPIRED`.
    pub code: Option<String>,
    /// Negated OS error number, when the failure came from a socket call.
    pub errno: Option<i32>,
}

/// An error-range response that no accepted code overrode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFailure {
    pub status: u16,
    pub status_text: String,
}

pub fn classified_message(response: &ClassifiedResponse) -> String {
    let icon = if response.success { "✅" } else { "⚠️" };
    let server = response
        .server_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_SERVER_NAME);

    format!(
        "{icon} {server} responded with {} - {}. \n⏱️Took {} ms",
        response.status_code, response.status_text, response.time_taken_ms
    )
}

pub fn unavailable_message(failure: &TransportFailure) -> String {
    let host = failure.hostname.as_deref().unwrap_or(DEFAULT_SERVER_NAME);
    let code = failure.code.as_deref().unwrap_or(DEFAULT_FAILURE_CODE);
    let errno = failure
        .errno
        .map(|errno| format!("({errno})"))
        .unwrap_or_default();

    format!("❌ Service Unavailable: {host} resulted in {code} {errno}")
}

pub fn service_error_message(failure: &HttpFailure) -> String {
    format!("❌ Service Error - {} - {}", failure.status, failure.status_text)
}
