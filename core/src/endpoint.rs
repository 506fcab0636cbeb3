//! The endpoint catalog.
//!
//! Each `Endpoint` variant carries the identifiers its path needs and knows
//! which API version it lives under. Identifiers are substituted verbatim;
//! a malformed one produces a malformed URL and the service rejects it.

use std::fmt;

use crate::http::HttpMethod;

/// Version segment prefixed to every endpoint path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    V1_1,
    V1_2,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V1_1 => "v1.1",
            ApiVersion::V1_2 => "v1.2",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product vertical used in meta and app-detail paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Apps,
}

impl Vertical {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vertical::Apps => "apps",
        }
    }
}

impl AsRef<str> for Vertical {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Store market used in meta and app-detail paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Market {
    Ios,
    Mac,
    GooglePlay,
}

impl Market {
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Ios => "ios",
            Market::Mac => "mac",
            Market::GooglePlay => "google-play",
        }
    }
}

impl AsRef<str> for Market {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// A resolved API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Accounts,
    AccountSales {
        account_id: &'a str,
    },
    AccountAppSales {
        account_id: &'a str,
        product_id: &'a str,
    },
    AccountApps {
        account_id: &'a str,
    },
    AppDetails {
        vertical: &'a str,
        market: &'a str,
        app_id: &'a str,
    },
    Countries,
    Categories {
        vertical: &'a str,
        market: &'a str,
    },
    Platforms,
    AccountAppIaps {
        account_id: &'a str,
        product_id: &'a str,
    },
}

impl Endpoint<'_> {
    pub fn version(&self) -> ApiVersion {
        match self {
            Endpoint::AppDetails { .. } => ApiVersion::V1_1,
            Endpoint::Platforms => ApiVersion::V1,
            _ => ApiVersion::V1_2,
        }
    }

    pub fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    /// Whether the endpoint takes query parameters. Parameters passed to an
    /// endpoint that does not are dropped.
    pub fn accepts_params(&self) -> bool {
        !matches!(
            self,
            Endpoint::AppDetails { .. } | Endpoint::Categories { .. } | Endpoint::Platforms
        )
    }

    /// Versioned path, e.g. `/v1.2/accounts/1234/sales`.
    pub fn path(&self) -> String {
        let resource = match self {
            Endpoint::Accounts => "/accounts".to_string(),
            Endpoint::AccountSales { account_id } => format!("/accounts/{account_id}/sales"),
            Endpoint::AccountAppSales {
                account_id,
                product_id,
            } => format!("/accounts/{account_id}/products/{product_id}/sales"),
            Endpoint::AccountApps { account_id } => format!("/accounts/{account_id}/products"),
            Endpoint::AppDetails {
                vertical,
                market,
                app_id,
            } => format!("/{vertical}/{market}/app/{app_id}/details"),
            Endpoint::Countries => "/meta/countries".to_string(),
            Endpoint::Categories { vertical, market } => {
                format!("/meta/{vertical}/{market}/categories")
            }
            Endpoint::Platforms => "/meta/platforms".to_string(),
            Endpoint::AccountAppIaps {
                account_id,
                product_id,
            } => format!("/accounts/{account_id}/products/{product_id}/iaps"),
        };
        format!("/{}{resource}", self.version())
    }
}
