//! Single-shot synthetic HTTP health checks.
//!
//! A parameter string such as
//! `url=https%3A%2F%2Fexample.com&acceptCodes=404&maxRedirects=2` is decoded,
//! one GET request is issued, and the outcome is classified into a
//! [`CheckResult`] carrying a human-readable message.

pub mod checker;
pub mod config;
pub mod format;
pub mod http_probe;
pub mod params;

pub use checker::{Checker, CheckerConfig, CheckerError};
pub use http_probe::CheckResult;
pub use params::{AcceptCodes, CheckOptions, DecodeError};
