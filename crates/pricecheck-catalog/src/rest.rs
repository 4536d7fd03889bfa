//! # Hosted Catalog (PostgREST)
//!
//! Looks codes up in the hosted `productos` table through its PostgREST
//! endpoint, authenticated with the project's anonymous API key.
//!
//! ## Request
//! ```text
//! GET {base_url}/rest/v1/productos
//!     ?select=*
//!     &or=(Codigo.eq."7791234567890",Codigo1.eq."7791234567890",...)
//!     &limit=2
//! apikey: <key>
//! Authorization: Bearer <key>
//!
//! 200 [ {row}, ... ]          → first row, Ok(Some(product))
//! 200 [ ]                     → Ok(None)
//! 4xx/5xx { "message": ... }  → LookupError::Query { status }
//! connect / timeout           → LookupError::Transport
//! ```
//!
//! Values are always double-quoted inside the filter so codes containing
//! `,` `.` `(` or `)` cannot change its structure.

use async_trait::async_trait;
use pricecheck_core::Product;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{LookupError, LookupResult};
use crate::lookup::{first_match, ProductLookup};
use crate::mapping::RawRow;
use crate::schema::CatalogSchema;

/// Connection settings for the hosted catalog.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub base_url: String,
    /// Anonymous (read-only) API key.
    pub api_key: String,
    /// Whole-request timeout.
    /// Default: 10 seconds
    pub timeout: Duration,
}

impl RestConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        RestConfig {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// PostgREST error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Product lookup against the hosted table.
#[derive(Debug, Clone)]
pub struct RestCatalog {
    client: Client,
    endpoint: String,
    api_key: String,
    schema: CatalogSchema,
}

impl RestCatalog {
    /// Builds the HTTP client.
    ///
    /// ## Errors
    /// `LookupError::Config` when the URL is not http(s), or the schema has
    /// invalid identifiers.
    pub fn new(config: RestConfig, schema: CatalogSchema) -> LookupResult<Self> {
        schema.validate()?;

        let base_url = config.base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(LookupError::Config(format!(
                "catalog url must start with http:// or https://, got '{}'",
                config.base_url
            )));
        }
        if config.api_key.trim().is_empty() {
            warn!("Catalog API key is empty, requests will likely be rejected");
        }

        let client = Client::builder().timeout(config.timeout).build()?;
        let endpoint = format!("{}/rest/v1/{}", base_url, schema.table);

        Ok(RestCatalog {
            client,
            endpoint,
            api_key: config.api_key,
            schema,
        })
    }

    /// The table endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Builds the `or` filter matching `code` against every code column.
    pub fn or_filter(&self, code: &str) -> String {
        let value = quote_value(code);
        let clauses = self
            .schema
            .code_columns
            .iter()
            .map(|column| format!("{}.eq.{}", column, value))
            .collect::<Vec<_>>()
            .join(",");
        format!("({})", clauses)
    }
}

#[async_trait]
impl ProductLookup for RestCatalog {
    async fn lookup(&self, code: &str) -> LookupResult<Option<Product>> {
        let filter = self.or_filter(code);
        debug!(endpoint = %self.endpoint, filter = %filter, "Querying hosted catalog");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("select", "*"), ("or", filter.as_str()), ("limit", "2")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(LookupError::query(Some(status.as_u16()), message));
        }

        let rows: Vec<RawRow> = response.json().await?;
        debug!(code = %code, rows = rows.len(), "Hosted catalog answered");

        first_match(rows, &self.schema, code)
    }

    fn backend(&self) -> &'static str {
        "rest"
    }
}

/// Double-quotes a filter value, escaping `\` and `"`.
fn quote_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    const KEY: &str = "anon-key";

    /// Stands in for the PostgREST endpoint.
    async fn productos(
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> (StatusCode, Json<Value>) {
        let authorized = headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(KEY)
            && headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                == Some("Bearer anon-key");
        if !authorized {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Invalid API key" })),
            );
        }

        assert_eq!(params.get("select").map(String::as_str), Some("*"));
        assert_eq!(params.get("limit").map(String::as_str), Some("2"));

        let filter = params.get("or").cloned().unwrap_or_default();
        if filter.contains("\"boom\"") {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "column productos.Codigo9 does not exist" })),
            );
        }
        if filter.contains("Codigo2.eq.\"7791234567890\"") {
            return (
                StatusCode::OK,
                Json(json!([{
                    "id": 7,
                    "Producto": "Yerba Mate 1kg",
                    "Precio": 2500.5,
                    "Codigo": null,
                    "Codigo2": "7791234567890"
                }])),
            );
        }
        if filter.contains("\"dup\"") {
            return (
                StatusCode::OK,
                Json(json!([
                    { "id": 1, "Producto": "First", "Precio": "10" },
                    { "id": 2, "Producto": "Second", "Precio": "20" }
                ])),
            );
        }
        if filter.contains("\"slow\"") {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        (StatusCode::OK, Json(json!([])))
    }

    async fn spawn_server() -> String {
        let app = Router::new().route("/rest/v1/productos", get(productos));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn catalog(base_url: &str, key: &str) -> RestCatalog {
        RestCatalog::new(RestConfig::new(base_url, key), CatalogSchema::default()).unwrap()
    }

    #[test]
    fn test_or_filter_covers_every_code_column() {
        let catalog = catalog("https://example.supabase.co", KEY);
        assert_eq!(
            catalog.or_filter("123"),
            "(Codigo.eq.\"123\",Codigo1.eq.\"123\",Codigo2.eq.\"123\",Codigo3.eq.\"123\",Codigo4.eq.\"123\")"
        );
        assert_eq!(
            catalog.endpoint(),
            "https://example.supabase.co/rest/v1/productos"
        );
    }

    #[test]
    fn test_filter_values_are_escaped() {
        assert_eq!(quote_value("a,b)"), "\"a,b)\"");
        assert_eq!(quote_value("x\"y\\z"), "\"x\\\"y\\\\z\"");
    }

    #[test]
    fn test_rejects_non_http_url() {
        let result = RestCatalog::new(
            RestConfig::new("ftp://example.com", KEY),
            CatalogSchema::default(),
        );
        assert!(matches!(result, Err(LookupError::Config(_))));
    }

    #[tokio::test]
    async fn test_found_on_alternative_code() {
        let base = spawn_server().await;
        let product = catalog(&base, KEY)
            .lookup("7791234567890")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(product.name, "Yerba Mate 1kg");
        assert_eq!(product.price.to_string(), "$2500.50");
        assert_eq!(product.code, "7791234567890");
    }

    #[tokio::test]
    async fn test_no_rows_is_not_found() {
        let base = spawn_server().await;
        let result = catalog(&base, KEY).lookup("0000000000000").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_multiple_rows_take_first() {
        let base = spawn_server().await;
        let product = catalog(&base, KEY).lookup("dup").await.unwrap().unwrap();
        assert_eq!(product.name, "First");
    }

    #[tokio::test]
    async fn test_bad_key_is_query_error() {
        let base = spawn_server().await;
        let err = catalog(&base, "wrong").lookup("123").await.unwrap_err();
        match err {
            LookupError::Query { status, message } => {
                assert_eq!(status, Some(401));
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_query_error() {
        let base = spawn_server().await;
        let err = catalog(&base, KEY).lookup("boom").await.unwrap_err();
        assert!(matches!(err, LookupError::Query { status: Some(500), .. }));
    }

    #[tokio::test]
    async fn test_unreachable_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = catalog(&format!("http://{}", addr), KEY)
            .lookup("123")
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Transport(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let base = spawn_server().await;
        let catalog = RestCatalog::new(
            RestConfig::new(&base, KEY).timeout(Duration::from_millis(200)),
            CatalogSchema::default(),
        )
        .unwrap();

        let err = catalog.lookup("slow").await.unwrap_err();
        assert!(matches!(err, LookupError::Transport(_)));
    }
}
