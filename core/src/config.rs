//! Client configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

pub const DEFAULT_BASE_URL: &str = "https://api.appannie.com";

/// Immutable settings shared by every request a client makes.
///
/// TLS certificates are verified unless `insecure_skip_verify` is set.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    insecure_skip_verify: bool,
    timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            insecure_skip_verify: false,
            timeout: None,
        }
    }

    /// Point the client somewhere else. A trailing `/` is dropped.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = base_url.as_ref().trim_end_matches('/').to_string();
        self
    }

    /// Accept invalid TLS certificates. Only meant for test environments.
    pub fn with_insecure_skip_verify(mut self, skip: bool) -> Self {
        self.insecure_skip_verify = skip;
        self
    }

    /// Overall per-request timeout. `None` leaves the transport default.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn insecure_skip_verify(&self) -> bool {
        self.insecure_skip_verify
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Deserialize)]
struct RawConfig {
    api_key: String,
    #[serde(default = "default_base_url")]
    base_url: String,
    #[serde(default)]
    insecure_skip_verify: bool,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl<'de> Deserialize<'de> for ClientConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawConfig::deserialize(deserializer)?;
        Ok(ClientConfig::new(raw.api_key)
            .with_base_url(raw.base_url)
            .with_insecure_skip_verify(raw.insecure_skip_verify)
            .with_timeout(raw.timeout_secs.map(Duration::from_secs)))
    }
}
