pub mod decode;
pub mod options;

pub use decode::decode;
pub use options::{AcceptCodes, CheckOptions};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Empty parameter string, no key-value separator, or no usable `url`.
    #[error("missing or malformed url parameter")]
    MalformedInput,
}
