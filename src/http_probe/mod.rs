pub mod classify;
pub mod failure;
pub mod probe;
pub mod result;
pub mod tls;

use std::fmt::Write;

pub use result::{CheckResult, ClassifiedResponse};

/// Formats an error together with its chain of causes.
pub(crate) fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, "\n\nCaused by: {}", src);
        err = src;
    }
    s
}
