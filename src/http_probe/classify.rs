use crate::params::AcceptCodes;

/// Determines health from a status code and the caller's accept list.
///
/// An accepted code wins over the default range; without a code the check is
/// never healthy; otherwise anything from 200 up to and including 302 is.
pub fn is_successful(code: Option<u16>, accept_codes: Option<&AcceptCodes>) -> bool {
    let Some(code) = code else {
        return false;
    };
    if accept_codes.is_some_and(|codes| codes.matches(code)) {
        return true;
    }
    (200..=302).contains(&code)
}
