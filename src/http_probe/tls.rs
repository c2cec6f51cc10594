use std::time::Duration;

use reqwest::{Certificate, Client, redirect};
use x509_parser::error::{PEMError, X509Error};
use x509_parser::nom;
use x509_parser::pem::parse_x509_pem;

use crate::params::CheckOptions;

/// Private CA trusted by default alongside the built-in public roots.
pub const EMBEDDED_CA_PEM: &str = include_str!("../../certs/embedded_ca.pem");

#[derive(Debug, thiserror::Error)]
pub enum TrustAnchorError {
    #[error("not a PEM block")]
    Pem(#[source] nom::Err<PEMError>),

    #[error("not an X.509 certificate")]
    Certificate(#[source] nom::Err<X509Error>),

    #[error("rejected by the TLS backend")]
    Backend(#[source] reqwest::Error),
}

/// Parses a single PEM certificate into a trust anchor for reqwest.
///
/// The certificate is decoded with `x509-parser` first so a broken anchor is
/// reported when the checker is built rather than silently skipped by the TLS
/// backend on every request.
pub fn load_trust_anchor(pem: &[u8]) -> Result<Certificate, TrustAnchorError> {
    let (_, parsed_pem) = parse_x509_pem(pem).map_err(TrustAnchorError::Pem)?;
    let cert = parsed_pem
        .parse_x509()
        .map_err(TrustAnchorError::Certificate)?;

    log::debug!(
        "Trusting CA {} (valid until {})",
        cert.subject(),
        cert.validity().not_after
    );

    Certificate::from_pem(pem).map_err(TrustAnchorError::Backend)
}

/// Client settings shared by every check a checker runs.
#[derive(Clone)]
pub struct ClientSettings {
    pub trust_anchors: Vec<Certificate>,
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

fn redirect_policy(max_redirects: usize) -> redirect::Policy {
    match max_redirects {
        0 => redirect::Policy::none(),
        n => redirect::Policy::limited(n),
    }
}

/// Builds a fresh client for one check.
///
/// Always runs on rustls, whose verification errors `failure` knows how to
/// name. Extra anchors are added on top of the bundled and system roots.
/// `enable_insecure` turns verification off entirely instead of merely
/// dropping the anchors.
pub fn build_client(settings: &ClientSettings, options: &CheckOptions) -> reqwest::Result<Client> {
    let mut builder = Client::builder()
        .use_rustls_tls()
        .user_agent(settings.user_agent.as_str())
        .redirect(redirect_policy(options.max_redirects))
        .tls_built_in_root_certs(true)
        .tls_info(true)
        .danger_accept_invalid_certs(options.enable_insecure);

    for anchor in &settings.trust_anchors {
        builder = builder.add_root_certificate(anchor.clone());
    }

    if let Some(timeout) = settings.timeout {
        builder = builder.timeout(timeout);
    }

    builder.build()
}
