//! In-memory stand-in for the App Annie REST API.
//!
//! Serves the endpoint catalog the client knows about from fixed fixtures and
//! speaks the same envelope as the real service: every body is a JSON object
//! with an integer `code`, plus an `error` string when `code` is not 200.
//! List endpoints echo the query they received under `query` so callers can
//! check what was sent.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const DEFAULT_API_KEY: &str = "test-api-key";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub account_id: u64,
    pub account_name: String,
    pub market: String,
    pub products: Vec<Product>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub product_id: u64,
    pub product_name: String,
    pub iaps: Vec<String>,
}

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    accounts: Arc<Vec<Account>>,
}

impl AppState {
    fn account(&self, account_id: &str) -> Result<&Account, ApiFailure> {
        self.accounts
            .iter()
            .find(|a| a.account_id.to_string() == account_id)
            .ok_or_else(|| ApiFailure::new(StatusCode::NOT_FOUND, "Account not found"))
    }

    fn product(&self, account_id: &str, product_id: &str) -> Result<&Product, ApiFailure> {
        self.account(account_id)?
            .products
            .iter()
            .find(|p| p.product_id.to_string() == product_id)
            .ok_or_else(|| ApiFailure::new(StatusCode::NOT_FOUND, "Product not found"))
    }
}

/// Error envelope: `{"code": <status>, "error": <message>}`.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = json!({"code": self.status.as_u16(), "error": self.message});
        (self.status, Json(body)).into_response()
    }
}

type ApiResponse = Result<Json<Value>, ApiFailure>;
type QueryMap = Query<BTreeMap<String, String>>;

pub fn fixtures() -> Vec<Account> {
    vec![
        Account {
            account_id: 1001,
            account_name: "iTunes Connect".to_string(),
            market: "ios".to_string(),
            products: vec![
                Product {
                    product_id: 560001,
                    product_name: "Puzzle Quest".to_string(),
                    iaps: vec!["gem_pack_small".to_string(), "gem_pack_large".to_string()],
                },
                Product {
                    product_id: 560002,
                    product_name: "Weather Now".to_string(),
                    iaps: Vec::new(),
                },
            ],
        },
        Account {
            account_id: 2002,
            account_name: "Google Play".to_string(),
            market: "google-play".to_string(),
            products: vec![Product {
                product_id: 770001,
                product_name: "Puzzle Quest".to_string(),
                iaps: vec!["remove_ads".to_string()],
            }],
        },
    ]
}

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        accounts: Arc::new(fixtures()),
    };
    Router::new()
        .route("/v1.2/accounts", get(list_accounts))
        .route("/v1.2/accounts/{account_id}/sales", get(account_sales))
        .route("/v1.2/accounts/{account_id}/products", get(account_products))
        .route(
            "/v1.2/accounts/{account_id}/products/{product_id}/sales",
            get(product_sales),
        )
        .route(
            "/v1.2/accounts/{account_id}/products/{product_id}/iaps",
            get(product_iaps),
        )
        .route("/v1.1/{vertical}/{market}/app/{app_id}/details", get(app_details))
        .route("/v1.2/meta/countries", get(countries))
        .route("/v1.2/meta/{vertical}/{market}/categories", get(categories))
        .route("/v1/meta/platforms", get(platforms))
        .route("/echo", post(echo))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

/// Rejects requests without `Authorization: bearer <key>` or without
/// `Accept: application/json`, the two headers every client call carries.
async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let headers = request.headers();
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token);
    if token != Some(&*state.api_key) {
        tracing::info!(uri = %request.uri(), "rejected request with bad credentials");
        return ApiFailure::new(StatusCode::UNAUTHORIZED, "Invalid API key").into_response();
    }

    let accepts_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    if !accepts_json {
        return ApiFailure::new(StatusCode::NOT_ACCEPTABLE, "Accept must be application/json")
            .into_response();
    }

    next.run(request).await
}

async fn not_found() -> ApiFailure {
    ApiFailure::new(StatusCode::NOT_FOUND, "Not Found")
}

async fn list_accounts(State(state): State<AppState>, Query(query): QueryMap) -> Json<Value> {
    let accounts: Vec<Value> = state
        .accounts
        .iter()
        .map(|a| {
            json!({
                "account_id": a.account_id,
                "account_name": a.account_name,
                "market": a.market,
            })
        })
        .collect();
    Json(json!({"code": 200, "accounts": accounts, "query": query}))
}

async fn account_sales(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Query(query): QueryMap,
) -> ApiResponse {
    let account = state.account(&account_id)?;
    let sales_list: Vec<Value> = account
        .products
        .iter()
        .map(|p| json!({"product_id": p.product_id, "units": {"downloads": 10}}))
        .collect();
    Ok(Json(json!({
        "code": 200,
        "currency": "USD",
        "sales_list": sales_list,
        "query": query,
    })))
}

async fn account_products(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Query(query): QueryMap,
) -> ApiResponse {
    let account = state.account(&account_id)?;
    let products: Vec<Value> = account
        .products
        .iter()
        .map(|p| json!({"product_id": p.product_id, "product_name": p.product_name}))
        .collect();
    Ok(Json(json!({"code": 200, "products": products, "query": query})))
}

async fn product_sales(
    State(state): State<AppState>,
    Path((account_id, product_id)): Path<(String, String)>,
    Query(query): QueryMap,
) -> ApiResponse {
    let product = state.product(&account_id, &product_id)?;
    Ok(Json(json!({
        "code": 200,
        "product_id": product.product_id,
        "currency": "USD",
        "sales_list": [{"date": "2013-01-01", "units": {"downloads": 3}}],
        "query": query,
    })))
}

async fn product_iaps(
    State(state): State<AppState>,
    Path((account_id, product_id)): Path<(String, String)>,
    Query(query): QueryMap,
) -> ApiResponse {
    let product = state.product(&account_id, &product_id)?;
    Ok(Json(json!({"code": 200, "iaps": product.iaps, "query": query})))
}

async fn app_details(Path((vertical, market, app_id)): Path<(String, String, String)>) -> Json<Value> {
    Json(json!({
        "code": 200,
        "vertical": vertical,
        "market": market,
        "app": {"app_id": app_id, "app_name": "Puzzle Quest"},
    }))
}

async fn countries(Query(query): QueryMap) -> Json<Value> {
    Json(json!({
        "code": 200,
        "country_list": [
            {"country_code": "US", "country_name": "United States"},
            {"country_code": "JP", "country_name": "Japan"},
        ],
        "query": query,
    }))
}

async fn categories(Path((vertical, market)): Path<(String, String)>) -> ApiResponse {
    let list = match (vertical.as_str(), market.as_str()) {
        ("apps", "ios" | "mac") => vec!["Overall", "Games", "Weather"],
        ("apps", "google-play") => vec!["Overall", "GAME", "WEATHER"],
        _ => return Err(ApiFailure::new(StatusCode::BAD_REQUEST, "Unknown market")),
    };
    Ok(Json(json!({"code": 200, "category_list": list})))
}

async fn platforms() -> Json<Value> {
    Json(json!({"code": 200, "platform_list": ["ios", "mac", "google-play"]}))
}

/// Echoes a POST back so form-encoded bodies can be inspected.
async fn echo(headers: HeaderMap, body: String) -> Json<Value> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    Json(json!({"code": 200, "content_type": content_type, "body": body}))
}
