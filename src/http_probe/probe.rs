use std::collections::BTreeMap;
use std::time::Instant;

use hyper::ext::ReasonPhrase;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::tls::TlsInfo;
use reqwest::{Client, Response};
use url::Url;

use super::classify::is_successful;
use super::failure::describe_failure;
use super::report;
use super::result::{CheckResult, ClassifiedResponse};
use crate::format::{HttpFailure, TransportFailure};
use crate::params::CheckOptions;

fn to_header_map(headers: &BTreeMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let parsed = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        );
        match parsed {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => log::warn!("Skipping invalid header {name:?}"),
        }
    }
    map
}

/// The reason phrase the server sent, falling back to the standard one.
///
/// hyper only records the phrase when it differs from the canonical reason.
fn status_text(response: &Response) -> String {
    if let Some(reason) = response.extensions().get::<ReasonPhrase>() {
        return String::from_utf8_lossy(reason.as_bytes()).into_owned();
    }
    response
        .status()
        .canonical_reason()
        .unwrap_or("Unknown")
        .to_string()
}

/// Host name of the TLS session, when the connection negotiated one.
fn negotiated_server_name(response: &Response) -> Option<String> {
    response.extensions().get::<TlsInfo>()?;
    response.url().host_str().map(str::to_string)
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Issues one GET request and classifies the outcome.
///
/// Statuses below 400 are classified directly. Error-range statuses are only
/// healthy when an accepted code matches; otherwise they are reported as a
/// service error. Failures without any response are reported as unavailable.
pub async fn probe_url(client: &Client, url: &Url, options: &CheckOptions) -> CheckResult {
    let accept_codes = options.accept_codes.as_ref();
    let request = client.get(url.clone()).headers(to_header_map(&options.headers));

    let start = Instant::now();
    let outcome = request.send().await;
    let time_taken_ms = elapsed_ms(start);

    let response = match outcome {
        Ok(response) => response,
        Err(e) => {
            log::debug!("Request to {url} failed: {}", report(&e));
            let failure = describe_failure(&e, url.host_str().map(str::to_string));
            return CheckResult::unavailable(&failure);
        }
    };

    let status = response.status();
    let status_code = status.as_u16();

    if status.is_client_error() || status.is_server_error() {
        if accept_codes.is_some_and(|codes| codes.matches(status_code)) {
            log::debug!("Status {status_code} from {url} accepted by override");
            return CheckResult::classified(ClassifiedResponse {
                success: is_successful(Some(status_code), accept_codes),
                status_code,
                status_text: status_text(&response),
                server_name: None,
                time_taken_ms,
            });
        }
        return CheckResult::service_error(&HttpFailure {
            status: status_code,
            status_text: status_text(&response),
        });
    }

    CheckResult::classified(ClassifiedResponse {
        success: is_successful(Some(status_code), accept_codes),
        status_code,
        status_text: status_text(&response),
        server_name: negotiated_server_name(&response),
        time_taken_ms,
    })
}

/// Failure reported when the target cannot even be parsed as a URL.
pub fn invalid_url_failure() -> TransportFailure {
    TransportFailure {
        hostname: None,
        code: Some(super::failure::INVALID_URL.to_string()),
        errno: None,
    }
}
