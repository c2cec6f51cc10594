use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;
use serde_json::Value;
use url::form_urlencoded;

use super::DecodeError;
use super::options::{AcceptCodes, CheckOptions};

const URL_KEY: &str = "url";
const ACCEPT_CODES_KEY: &str = "acceptCodes";
const MAX_REDIRECTS_KEY: &str = "maxRedirects";
const HEADERS_KEY: &str = "headers";
const ENABLE_INSECURE_KEY: &str = "enableInsecure";

/// Values an upstream template emits when it had nothing to substitute.
const PLACEHOLDERS: [&str; 2] = ["undefined", "null"];

struct RawParams(Vec<(String, String)>);

impl RawParams {
    fn parse(param_str: &str) -> Self {
        let pairs = form_urlencoded::parse(param_str.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self(pairs)
    }

    /// First value for `key`, decoded a second time and with placeholders
    /// and empty strings treated as absent.
    fn get(&self, key: &str) -> Option<String> {
        let (_, raw) = self.0.iter().find(|(k, _)| k == key)?;
        let value = decode_again(raw);
        if value.is_empty() || PLACEHOLDERS.contains(&value.as_str()) {
            None
        } else {
            Some(value)
        }
    }

    /// Presence check used for flags: any non-empty value counts.
    fn flag(&self, key: &str) -> bool {
        self.0.iter().any(|(k, v)| k == key && !v.is_empty())
    }
}

// Callers may percent-encode values twice; a second pass that fails to produce
// UTF-8 leaves the once-decoded value alone.
fn decode_again(value: &str) -> String {
    match percent_decode_str(value).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value.to_string(),
    }
}

/// Parses a JSON object of header names to values.
///
/// Returns `None` when the text is not a JSON object. Scalars are stringified,
/// `null` and nested structures are dropped.
fn parse_headers(raw: &str) -> Option<BTreeMap<String, String>> {
    let Value::Object(map) = serde_json::from_str::<Value>(raw).ok()? else {
        return None;
    };

    let mut headers = BTreeMap::new();
    for (name, value) in map {
        let value = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                log::warn!("Skipping header {name}: unsupported value {other}");
                continue;
            }
        };
        headers.insert(name, value);
    }
    Some(headers)
}

/// Decodes a URL-encoded parameter string into the target URL and its options.
///
/// Fails only when there is nothing usable to check; malformed optional
/// parameters degrade to their defaults.
pub fn decode(param_str: &str) -> Result<(String, CheckOptions), DecodeError> {
    if param_str.is_empty() || !param_str.contains('=') {
        return Err(DecodeError::MalformedInput);
    }

    let params = RawParams::parse(param_str);
    let url = params.get(URL_KEY).ok_or(DecodeError::MalformedInput)?;

    let accept_codes = params.get(ACCEPT_CODES_KEY).map(AcceptCodes::new);

    let max_redirects = match params.get(MAX_REDIRECTS_KEY) {
        Some(raw) => raw.trim().parse::<usize>().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid maxRedirects value {raw:?}, using 0");
            0
        }),
        None => 0,
    };

    let (headers, headers_ignored) = match params.get(HEADERS_KEY) {
        Some(raw) => match parse_headers(&raw) {
            Some(headers) => (headers, false),
            None => {
                log::warn!("Ignoring headers parameter for {url}: not a JSON object");
                (BTreeMap::new(), true)
            }
        },
        None => (BTreeMap::new(), false),
    };

    let options = CheckOptions {
        headers,
        enable_insecure: params.flag(ENABLE_INSECURE_KEY),
        accept_codes,
        max_redirects,
        headers_ignored,
    };

    Ok((url, options))
}
