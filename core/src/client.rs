//! The App Annie API client.
//!
//! # Design
//! `ApiClient` holds an immutable `ClientConfig` and a `Transport` and carries
//! no other state between calls. Every endpoint method resolves an `Endpoint`,
//! builds an `HttpRequest` with `build_request`, executes it through the
//! transport and runs the body through `process_response`.

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::http::{
    HttpMethod, HttpRequest, ACCEPT, APPLICATION_JSON, AUTHORIZATION, CONTENT_TYPE,
    FORM_URLENCODED,
};
use crate::query::{build_query_string, build_url, QueryParams};
use crate::response::{process_response, ApiResult};
use crate::transport::{Transport, UreqTransport};

/// Synchronous, stateless client for the App Annie API.
///
/// Safe to share between threads whenever its transport is; each call only
/// reads the configuration.
#[derive(Debug, Clone)]
pub struct ApiClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl ApiClient<UreqTransport> {
    /// Client for the production service with default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self { config, transport }
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Full URL for `endpoint`, with `params` appended when the endpoint
    /// takes any.
    pub fn endpoint_url(&self, endpoint: &Endpoint<'_>, params: &QueryParams) -> String {
        let empty = QueryParams::new();
        let params = if endpoint.accepts_params() {
            params
        } else {
            &empty
        };
        build_url(self.config.base_url(), &endpoint.path(), params)
    }

    /// Describe a request without sending it.
    ///
    /// `post_params` only matter for `Post`: when non-empty they become a
    /// form-encoded body in the same sorted form as a query string.
    pub fn build_request(
        &self,
        method: HttpMethod,
        url: &str,
        post_params: &QueryParams,
    ) -> HttpRequest {
        let mut headers = vec![
            (
                AUTHORIZATION.to_string(),
                format!("bearer {}", self.config.api_key()),
            ),
            (ACCEPT.to_string(), APPLICATION_JSON.to_string()),
        ];

        let body = match method {
            HttpMethod::Post if !post_params.is_empty() => {
                headers.push((CONTENT_TYPE.to_string(), FORM_URLENCODED.to_string()));
                Some(build_query_string(post_params))
            }
            _ => None,
        };

        HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body,
        }
    }

    /// Build, execute and process a single request.
    pub fn send_request(
        &self,
        method: HttpMethod,
        url: &str,
        post_params: &QueryParams,
    ) -> Result<ApiResult> {
        let request = self.build_request(method, url, post_params);
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.execute(&request)?;
        process_response(&response.body)
    }

    /// Call any catalog endpoint.
    pub fn call(&self, endpoint: Endpoint<'_>, params: &QueryParams) -> Result<ApiResult> {
        let url = self.endpoint_url(&endpoint, params);
        self.send_request(endpoint.method(), &url, &QueryParams::new())
    }

    /// All account connections of the App Annie account.
    pub fn get_accounts(&self, params: &QueryParams) -> Result<ApiResult> {
        self.call(Endpoint::Accounts, params)
    }

    /// Sales of a single account connection.
    pub fn get_account_sales(&self, account_id: &str, params: &QueryParams) -> Result<ApiResult> {
        self.call(Endpoint::AccountSales { account_id }, params)
    }

    /// Sales of one product within an account connection.
    pub fn get_account_app_sales(
        &self,
        account_id: &str,
        product_id: &str,
        params: &QueryParams,
    ) -> Result<ApiResult> {
        self.call(
            Endpoint::AccountAppSales {
                account_id,
                product_id,
            },
            params,
        )
    }

    /// Products of an account connection.
    pub fn get_account_apps(&self, account_id: &str, params: &QueryParams) -> Result<ApiResult> {
        self.call(Endpoint::AccountApps { account_id }, params)
    }

    /// Details of a store app. For iOS and Mac `app_id` is the Apple id, for
    /// Google Play the package name. `vertical` and `market` take either a
    /// `Vertical`/`Market` or any string.
    pub fn get_app_details(
        &self,
        vertical: impl AsRef<str>,
        market: impl AsRef<str>,
        app_id: &str,
    ) -> Result<ApiResult> {
        self.call(
            Endpoint::AppDetails {
                vertical: vertical.as_ref(),
                market: market.as_ref(),
                app_id,
            },
            &QueryParams::new(),
        )
    }

    pub fn get_countries(&self, params: &QueryParams) -> Result<ApiResult> {
        self.call(Endpoint::Countries, params)
    }

    pub fn get_categories(
        &self,
        vertical: impl AsRef<str>,
        market: impl AsRef<str>,
    ) -> Result<ApiResult> {
        self.call(
            Endpoint::Categories {
                vertical: vertical.as_ref(),
                market: market.as_ref(),
            },
            &QueryParams::new(),
        )
    }

    pub fn get_platforms(&self) -> Result<ApiResult> {
        self.call(Endpoint::Platforms, &QueryParams::new())
    }

    /// In-app purchases of one product within an account connection.
    pub fn get_account_app_iaps(
        &self,
        account_id: &str,
        product_id: &str,
        params: &QueryParams,
    ) -> Result<ApiResult> {
        self.call(
            Endpoint::AccountAppIaps {
                account_id,
                product_id,
            },
            params,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::error::ApiError;
    use crate::http::HttpResponse;

    const BASE_URL: &str = "http://localhost:3000";

    type Recorded = Arc<Mutex<Vec<HttpRequest>>>;

    /// Client whose transport records every request and answers with `body`.
    fn recording_client(
        body: &'static str,
    ) -> (ApiClient<impl Fn(&HttpRequest) -> Result<HttpResponse>>, Recorded) {
        let recorded: Recorded = Arc::default();
        let sink = Arc::clone(&recorded);
        let transport = move |req: &HttpRequest| -> Result<HttpResponse> {
            sink.lock().unwrap().push(req.clone());
            Ok(HttpResponse {
                status: 200,
                body: body.to_string(),
            })
        };
        let config = ClientConfig::new("test-key").with_base_url(BASE_URL);
        (ApiClient::with_transport(config, transport), recorded)
    }

    fn last_url(recorded: &Recorded) -> String {
        recorded.lock().unwrap().last().unwrap().url.clone()
    }

    #[test]
    fn build_get_request_has_auth_and_accept_headers() {
        let (client, _) = recording_client("{}");
        let req = client.build_request(HttpMethod::Get, "http://h/v1.2/accounts", &QueryParams::new());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://h/v1.2/accounts");
        assert_eq!(
            req.headers,
            vec![
                ("Authorization".to_string(), "bearer test-key".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
            ]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn get_request_ignores_post_params() {
        let (client, _) = recording_client("{}");
        let params = QueryParams::from([("a", "1")]);
        let req = client.build_request(HttpMethod::Get, "http://h/x", &params);
        assert!(req.body.is_none());
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn build_post_request_has_sorted_form_body() {
        let (client, _) = recording_client("{}");
        let params = QueryParams::from([("z", "last one"), ("a", "first")]);
        let req = client.build_request(HttpMethod::Post, "http://h/x", &params);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body.as_deref(), Some("a=first&z=last%20one"));
        assert_eq!(
            req.header("Content-Type"),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn post_without_params_has_no_body() {
        let (client, _) = recording_client("{}");
        let req = client.build_request(HttpMethod::Post, "http://h/x", &QueryParams::new());
        assert!(req.body.is_none());
        assert_eq!(req.header("Content-Type"), None);
    }

    #[test]
    fn account_sales_url_includes_sorted_params() {
        let (client, recorded) = recording_client(r#"{"code":200,"sales_list":[]}"#);
        client
            .get_account_sales("acct1", &QueryParams::from([("limit", "10")]))
            .unwrap();
        assert_eq!(
            last_url(&recorded),
            "http://localhost:3000/v1.2/accounts/acct1/sales?limit=10"
        );
    }

    #[test]
    fn every_endpoint_method_hits_its_path() {
        let (client, recorded) = recording_client(r#"{"code":200}"#);
        let params = QueryParams::from([("page_index", "1")]);

        client.get_accounts(&params).unwrap();
        assert_eq!(last_url(&recorded), format!("{BASE_URL}/v1.2/accounts?page_index=1"));

        client.get_account_app_sales("a", "p", &params).unwrap();
        assert_eq!(
            last_url(&recorded),
            format!("{BASE_URL}/v1.2/accounts/a/products/p/sales?page_index=1")
        );

        client.get_account_apps("a", &QueryParams::new()).unwrap();
        assert_eq!(last_url(&recorded), format!("{BASE_URL}/v1.2/accounts/a/products"));

        client.get_app_details("apps", "ios", "284882215").unwrap();
        assert_eq!(
            last_url(&recorded),
            format!("{BASE_URL}/v1.1/apps/ios/app/284882215/details")
        );

        client.get_countries(&QueryParams::new()).unwrap();
        assert_eq!(last_url(&recorded), format!("{BASE_URL}/v1.2/meta/countries"));

        client.get_categories("apps", "google-play").unwrap();
        assert_eq!(
            last_url(&recorded),
            format!("{BASE_URL}/v1.2/meta/apps/google-play/categories")
        );

        client.get_platforms().unwrap();
        assert_eq!(last_url(&recorded), format!("{BASE_URL}/v1/meta/platforms"));

        client.get_account_app_iaps("a", "p", &params).unwrap();
        assert_eq!(
            last_url(&recorded),
            format!("{BASE_URL}/v1.2/accounts/a/products/p/iaps?page_index=1")
        );

        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.len(), 8);
        assert!(recorded.iter().all(|r| r.method == HttpMethod::Get));
    }

    #[test]
    fn identifier_enums_and_strings_build_the_same_path() {
        use crate::endpoint::{Market, Vertical};

        let (client, recorded) = recording_client(r#"{"code":200}"#);
        client.get_categories(Vertical::Apps, Market::GooglePlay).unwrap();
        let from_enums = last_url(&recorded);
        client.get_categories("apps", "google-play").unwrap();
        assert_eq!(last_url(&recorded), from_enums);

        client.get_app_details(Vertical::Apps, Market::Ios, "284882215").unwrap();
        assert_eq!(
            last_url(&recorded),
            format!("{BASE_URL}/v1.1/apps/ios/app/284882215/details")
        );
    }

    #[test]
    fn params_are_dropped_for_parameterless_endpoints() {
        let (client, _) = recording_client("{}");
        let url = client.endpoint_url(&Endpoint::Platforms, &QueryParams::from([("x", "1")]));
        assert_eq!(url, format!("{BASE_URL}/v1/meta/platforms"));
    }

    #[test]
    fn success_body_is_returned_whole() {
        let (client, _) = recording_client(r#"{"code":200,"accounts":[{"account_id":1}]}"#);
        let result = client.get_accounts(&QueryParams::new()).unwrap();
        assert_eq!(result, json!({"code": 200, "accounts": [{"account_id": 1}]}));
    }

    #[test]
    fn remote_error_is_surfaced() {
        let (client, _) = recording_client(r#"{"code":401,"error":"Invalid API key"}"#);
        let err = client.get_platforms().unwrap_err();
        assert_eq!(err.code(), 401);
        assert_eq!(err.message(), "Invalid API key");
    }

    #[test]
    fn transport_failure_is_a_connection_error() {
        let config = ClientConfig::new("k").with_base_url(BASE_URL);
        let client = ApiClient::with_transport(config, |_: &HttpRequest| -> Result<HttpResponse> {
            Err(ApiError::connection("connection refused"))
        });
        let err = client.get_countries(&QueryParams::new()).unwrap_err();
        assert_eq!(err.code(), 0);
        assert_eq!(err.message(), "Connection Error");
    }

    #[test]
    fn calls_never_change_configuration() {
        let (client, _) = recording_client(r#"{"code":500,"error":"boom"}"#);
        let before = client.config().clone();
        for _ in 0..3 {
            let _ = client.get_accounts(&QueryParams::from([("a", "b")]));
            let _ = client.get_app_details("apps", "mac", "1");
            let _ = client.send_request(HttpMethod::Post, "http://h/x", &QueryParams::from([("k", "v")]));
        }
        assert_eq!(client.config(), &before);
    }

    #[test]
    fn default_client_targets_production() {
        let client = ApiClient::new("k");
        assert_eq!(client.config().base_url(), "https://api.appannie.com");
        assert_eq!(
            client.endpoint_url(&Endpoint::Accounts, &QueryParams::new()),
            "https://api.appannie.com/v1.2/accounts"
        );
    }
}
