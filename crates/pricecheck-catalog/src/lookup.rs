//! # Lookup Seam
//!
//! The one operation the kiosk needs from a backend.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  KioskController                                                        │
//! │       │  lookup.lookup("7791234567890").await                           │
//! │       ▼                                                                 │
//! │  Arc<dyn ProductLookup>                                                 │
//! │  ├── RestCatalog    (hosted table over PostgREST)                       │
//! │  └── SqliteCatalog  (local mirror)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ok(Some(Product)) │ Ok(None) │ Err(LookupError)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use pricecheck_core::Product;
use tracing::warn;

use crate::error::LookupResult;
use crate::mapping::{product_from_row, RawRow};
use crate::schema::CatalogSchema;

/// Looks a scanned code up across the catalog's code columns.
///
/// Implementations issue exactly one backend query per call and never
/// write to the backend.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// ## Returns
    /// * `Ok(Some(product))` - a row matched one of the code columns
    /// * `Ok(None)` - no row matched
    /// * `Err(LookupError)` - transport or query failure
    async fn lookup(&self, code: &str) -> LookupResult<Option<Product>>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Picks the row to display from a query result.
///
/// The backend does not constrain codes to be unique across rows; when
/// several rows match, the first one returned wins.
pub(crate) fn first_match(
    rows: Vec<RawRow>,
    schema: &CatalogSchema,
    code: &str,
) -> LookupResult<Option<Product>> {
    if rows.len() > 1 {
        warn!(code = %code, matches = rows.len(), "Several products share this code, using the first");
    }

    rows.first()
        .map(|row| product_from_row(row, schema, code))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: Vec<serde_json::Value>) -> Vec<RawRow> {
        values
            .into_iter()
            .filter_map(|v| v.as_object().cloned())
            .collect()
    }

    #[test]
    fn test_no_rows_is_none() {
        let result = first_match(Vec::new(), &CatalogSchema::default(), "000000").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_first_row_wins() {
        let rows = rows(vec![
            json!({ "id": 1, "Producto": "First", "Precio": 1 }),
            json!({ "id": 2, "Producto": "Second", "Precio": 2 }),
        ]);

        let product = first_match(rows, &CatalogSchema::default(), "1").unwrap().unwrap();
        assert_eq!(product.name, "First");
    }
}
