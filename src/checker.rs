use std::time::Duration;

use url::Url;

use crate::http_probe::failure::describe_failure;
use crate::http_probe::probe::{invalid_url_failure, probe_url};
use crate::http_probe::tls::{
    ClientSettings, EMBEDDED_CA_PEM, TrustAnchorError, build_client, load_trust_anchor,
};
use crate::http_probe::{CheckResult, report};
use crate::params::{self, CheckOptions};

pub const DEFAULT_USER_AGENT: &str = concat!("status-check/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum CheckerError {
    #[error("invalid trust anchor #{index}: {source}")]
    InvalidTrustAnchor {
        index: usize,
        #[source]
        source: TrustAnchorError,
    },
}

/// Construction-time settings for a [`Checker`].
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// PEM certificates trusted in addition to the built-in public roots.
    pub trust_anchors: Vec<Vec<u8>>,

    /// Hard cap on each request. `None` leaves it to the transport.
    pub timeout: Option<Duration>,

    pub user_agent: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            trust_anchors: vec![EMBEDDED_CA_PEM.as_bytes().to_vec()],
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Runs single-shot health checks.
///
/// Holds only immutable settings, so one checker can serve concurrent checks;
/// each check builds its own client.
#[derive(Clone)]
pub struct Checker {
    settings: ClientSettings,
}

impl Checker {
    pub fn new(config: CheckerConfig) -> Result<Self, CheckerError> {
        let trust_anchors = config
            .trust_anchors
            .iter()
            .enumerate()
            .map(|(index, pem)| {
                load_trust_anchor(pem)
                    .map_err(|source| CheckerError::InvalidTrustAnchor { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            settings: ClientSettings {
                trust_anchors,
                timeout: config.timeout,
                user_agent: config.user_agent,
            },
        })
    }

    /// Decodes `param_str` and checks the URL it names.
    pub async fn check(&self, param_str: &str) -> CheckResult {
        match params::decode(param_str) {
            Ok((url, options)) => self.execute(&url, &options).await,
            Err(e) => {
                log::warn!("Rejecting check parameters: {e}");
                CheckResult::malformed()
            }
        }
    }

    /// Runs [`Checker::check`] and hands the JSON result to `render` exactly once.
    pub async fn check_and_render<F>(&self, param_str: &str, render: F)
    where
        F: FnOnce(String),
    {
        let result = self.check(param_str).await;
        render(result.to_json());
    }

    /// Checks `url` with already decoded options.
    pub async fn execute(&self, url: &str, options: &CheckOptions) -> CheckResult {
        let Ok(target) = Url::parse(url) else {
            log::warn!("Cannot parse check target {url:?}");
            return CheckResult::unavailable(&invalid_url_failure());
        };

        let client = match build_client(&self.settings, options) {
            Ok(client) => client,
            Err(e) => {
                log::error!("Failed to build HTTP client: {}", report(&e));
                let failure = describe_failure(&e, target.host_str().map(str::to_string));
                return CheckResult::unavailable(&failure);
            }
        };

        let result = probe_url(&client, &target, options).await;
        log::info!(
            "{} {target}: {:?} in {:?} ms",
            if result.success_status { "healthy" } else { "unhealthy" },
            result.status_code,
            result.time_taken
        );
        result
    }
}
