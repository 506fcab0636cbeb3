//! Synchronous client for the App Annie analytics REST API.
//!
//! # Overview
//! `ApiClient` turns a fixed catalog of endpoints into authenticated HTTP
//! requests and normalizes the JSON envelope every response carries
//! (`{"code": 200, ...}` on success, `{"code": N, "error": "..."}` otherwise)
//! into either an `ApiResult` or an `ApiError`.
//!
//! # Design
//! - `ApiClient` is stateless. It holds an immutable `ClientConfig` and a
//!   `Transport`, nothing else.
//! - Request construction is pure: `build_request` produces an `HttpRequest`
//!   value and `process_response` consumes a raw body. The `Transport` in
//!   between is the only place that touches the network, so the whole flow
//!   can be driven without I/O in tests.
//! - The default transport is blocking `ureq` with TLS verification on.
//!
//! ```no_run
//! use appannie_core::{ApiClient, QueryParams};
//!
//! let client = ApiClient::new("my-api-key");
//! let sales = client.get_account_sales("1234", &QueryParams::from([("limit", "10")]))?;
//! println!("{:?}", sales.get("sales_list"));
//! # Ok::<(), appannie_core::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod query;
pub mod response;
pub mod transport;

pub use client::ApiClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use endpoint::{ApiVersion, Endpoint, Market, Vertical};
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use query::{build_query_string, build_url, QueryParams};
pub use response::{process_response, ApiResult};
pub use transport::{Transport, UreqTransport};
