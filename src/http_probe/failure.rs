use std::error::Error;
use std::io;

use rustls::CertificateError;

use crate::format::TransportFailure;

const DNS_FAILURE: &str = "ENOTFOUND";
const TIMED_OUT: &str = "ETIMEDOUT";
const TOO_MANY_REDIRECTS: &str = "ERR_FR_TOO_MANY_REDIRECTS";
const TLS_HANDSHAKE: &str = "ERR_TLS_HANDSHAKE";
pub const INVALID_URL: &str = "ERR_INVALID_URL";
const BAD_CLIENT_OPTION: &str = "ERR_BAD_OPTION";

fn io_code(kind: io::ErrorKind) -> Option<&'static str> {
    use io::ErrorKind::*;

    let code = match kind {
        ConnectionRefused => "ECONNREFUSED",
        ConnectionReset => "ECONNRESET",
        ConnectionAborted => "ECONNABORTED",
        TimedOut => TIMED_OUT,
        HostUnreachable => "EHOSTUNREACH",
        NetworkUnreachable => "ENETUNREACH",
        AddrNotAvailable => "EADDRNOTAVAIL",
        BrokenPipe => "EPIPE",
        _ => return None,
    };
    Some(code)
}

fn tls_code(err: &rustls::Error) -> &'static str {
    match err {
        rustls::Error::InvalidCertificate(cert_err) => match cert_err {
            CertificateError::Expired => "CERT_HAS_EXPIRED",
            CertificateError::NotValidYet => "CERT_NOT_YET_VALID",
            CertificateError::UnknownIssuer => "UNABLE_TO_VERIFY_LEAF_SIGNATURE",
            CertificateError::NotValidForName => "ERR_TLS_CERT_ALTNAME_INVALID",
            CertificateError::Revoked => "CERT_REVOKED",
            CertificateError::BadSignature => "CERT_SIGNATURE_FAILURE",
            _ => "CERT_INVALID",
        },
        _ => TLS_HANDSHAKE,
    }
}

/// Looks for a rustls error directly in the chain or wrapped in an `io::Error`.
///
/// `io::Error::source` skips over its custom payload, so the payload has to be
/// inspected through `get_ref`.
fn find_tls_error<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a rustls::Error> {
    if let Some(tls) = err.downcast_ref::<rustls::Error>() {
        return Some(tls);
    }
    err.downcast_ref::<io::Error>()?
        .get_ref()?
        .downcast_ref::<rustls::Error>()
}

/// hyper-util wraps resolver failures in a `ConnectError` displayed as
/// "dns error"; the std resolver's own `io::Error` carries the getaddrinfo text.
fn is_resolver_error(err: &(dyn Error + 'static)) -> bool {
    let text = err.to_string();
    text.starts_with("dns error") || text.starts_with("failed to lookup address information")
}

/// Turns a reqwest error into the code/errno pair shown to the user.
pub fn describe_failure(err: &reqwest::Error, hostname: Option<String>) -> TransportFailure {
    let mut code: Option<&'static str> = None;
    let mut errno: Option<i32> = None;

    if err.is_timeout() {
        code = Some(TIMED_OUT);
    } else if err.is_redirect() {
        code = Some(TOO_MANY_REDIRECTS);
    }

    let mut current: Option<&(dyn Error + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(tls) = find_tls_error(e) {
            code = code.or(Some(tls_code(tls)));
        }
        if is_resolver_error(e) {
            code = code.or(Some(DNS_FAILURE));
        }
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            // Negative, the way Node reports errno.
            errno = errno.or(io_err.raw_os_error().map(|raw| -raw));
            code = code.or(io_code(io_err.kind()));
        }
        current = e.source();
    }

    if code.is_none() && err.is_builder() {
        code = Some(BAD_CLIENT_OPTION);
    }

    TransportFailure {
        hostname,
        code: code.map(str::to_string),
        errno,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    #[test]
    fn test_io_codes() {
        assert_eq!(io_code(io::ErrorKind::ConnectionRefused), Some("ECONNREFUSED"));
        assert_eq!(io_code(io::ErrorKind::TimedOut), Some("ETIMEDOUT"));
        assert_eq!(io_code(io::ErrorKind::InvalidData), None);
    }

    #[test]
    fn test_tls_codes() {
        let expired = rustls::Error::InvalidCertificate(CertificateError::Expired);
        assert_eq!(tls_code(&expired), "CERT_HAS_EXPIRED");

        let unknown = rustls::Error::InvalidCertificate(CertificateError::UnknownIssuer);
        assert_eq!(tls_code(&unknown), "UNABLE_TO_VERIFY_LEAF_SIGNATURE");

        assert_eq!(tls_code(&rustls::Error::DecryptError), TLS_HANDSHAKE);
    }

    #[test]
    fn test_tls_error_found_inside_io_error() {
        let io_err = io::Error::new(
            io::ErrorKind::InvalidData,
            rustls::Error::InvalidCertificate(CertificateError::NotValidForName),
        );
        let found = find_tls_error(&io_err).expect("tls error should be found");
        assert_eq!(tls_code(found), "ERR_TLS_CERT_ALTNAME_INVALID");
    }

    #[tokio::test]
    async fn test_connection_refused_is_described() {
        // Bind then drop to get a local port with nothing listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = client()
            .get(format!("http://127.0.0.1:{port}/"))
            .send()
            .await
            .expect_err("nothing is listening");

        let failure = describe_failure(&err, Some("127.0.0.1".to_string()));
        assert_eq!(failure.code.as_deref(), Some("ECONNREFUSED"));
        assert_eq!(failure.hostname.as_deref(), Some("127.0.0.1"));
        #[cfg(target_os = "linux")]
        assert_eq!(failure.errno, Some(-111));
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_described() {
        // `.invalid` is reserved and never resolves.
        let err = client()
            .get("http://status-check.invalid/")
            .send()
            .await
            .expect_err("host cannot resolve");

        let failure = describe_failure(&err, Some("status-check.invalid".to_string()));
        assert_eq!(failure.code.as_deref(), Some(DNS_FAILURE));
    }

    #[test]
    fn test_resolver_error_text() {
        let gai = io::Error::other("failed to lookup address information: Name or service not known");
        assert!(is_resolver_error(&gai));
        assert!(!is_resolver_error(&io::Error::from(io::ErrorKind::ConnectionRefused)));
    }
}
