use std::collections::BTreeMap;

/// Status codes the caller wants treated as healthy, kept verbatim.
///
/// Matching tests whether the decimal form of the observed code is a substring
/// of the raw list. Separators are never parsed, so `"200,404"` accepts 200 and
/// 404, while a run of digits such as `"2003"` also accepts 200 and 3. Callers
/// rely on this loose form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptCodes(String);

impl AcceptCodes {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `code` appears anywhere in the accept list.
    pub fn matches(&self, code: u16) -> bool {
        self.0.contains(&code.to_string())
    }
}

/// Options for a single check, decoded from the parameter string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOptions {
    /// Extra request headers, name to value.
    pub headers: BTreeMap<String, String>,

    /// Disables certificate verification entirely.
    pub enable_insecure: bool,

    pub accept_codes: Option<AcceptCodes>,

    /// 0 means redirects are not followed and the 3xx response is classified.
    pub max_redirects: usize,

    /// Set when a `headers` parameter was supplied but could not be parsed,
    /// in which case `headers` is empty.
    pub headers_ignored: bool,
}
