//! # Catalog Schema
//!
//! Names of the table and columns a lookup reads. The defaults match the
//! hosted `productos` table the kiosk was deployed against:
//!
//! ```text
//! productos
//! ├── id        row identifier
//! ├── Producto  display name
//! ├── Precio    price (number or numeric string)
//! ├── Codigo    primary barcode  ◄── shown under the price
//! ├── Codigo1   ┐
//! ├── Codigo2   │ alternative barcodes, any of them may match
//! ├── Codigo3   │
//! └── Codigo4   ┘
//! ```

use pricecheck_core::validation::validate_identifier;
use pricecheck_core::{ValidationError, MAX_CODE_COLUMNS};
use serde::{Deserialize, Serialize};

use crate::error::LookupResult;

/// Table and column names used by every backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSchema {
    pub table: String,
    pub id_column: String,
    pub name_column: String,
    pub price_column: String,
    /// Columns compared against the scanned code (logical OR). The first
    /// one is the primary code.
    pub code_columns: Vec<String>,
}

impl Default for CatalogSchema {
    fn default() -> Self {
        CatalogSchema {
            table: "productos".to_string(),
            id_column: "id".to_string(),
            name_column: "Producto".to_string(),
            price_column: "Precio".to_string(),
            code_columns: ["Codigo", "Codigo1", "Codigo2", "Codigo3", "Codigo4"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

impl CatalogSchema {
    /// Checks every identifier and the number of code columns.
    ///
    /// Identifiers end up inside SQL and PostgREST filters, so only
    /// `[A-Za-z0-9_]` is accepted.
    pub fn validate(&self) -> LookupResult<()> {
        validate_identifier("table", &self.table)?;
        validate_identifier("id_column", &self.id_column)?;
        validate_identifier("name_column", &self.name_column)?;
        validate_identifier("price_column", &self.price_column)?;

        if self.code_columns.is_empty() || self.code_columns.len() > MAX_CODE_COLUMNS {
            return Err(ValidationError::OutOfRange {
                field: "code_columns".to_string(),
                min: 1,
                max: MAX_CODE_COLUMNS as i64,
            }
            .into());
        }

        for column in &self.code_columns {
            validate_identifier("code_columns", column)?;
        }

        Ok(())
    }

    /// The column whose value is displayed as the product code.
    pub fn primary_code_column(&self) -> Option<&str> {
        self.code_columns.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;

    #[test]
    fn test_default_schema_is_valid() {
        let schema = CatalogSchema::default();
        assert!(schema.validate().is_ok());
        assert_eq!(schema.code_columns.len(), 5);
        assert_eq!(schema.primary_code_column(), Some("Codigo"));
    }

    #[test]
    fn test_too_many_code_columns() {
        let mut schema = CatalogSchema::default();
        schema.code_columns.push("Codigo5".to_string());
        assert!(matches!(schema.validate(), Err(LookupError::Config(_))));

        schema.code_columns.clear();
        assert!(matches!(schema.validate(), Err(LookupError::Config(_))));
    }

    #[test]
    fn test_rejects_injection_in_identifiers() {
        let schema = CatalogSchema {
            price_column: "Precio,id".to_string(),
            ..CatalogSchema::default()
        };
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let schema: CatalogSchema = serde_json::from_str(r#"{"table": "products"}"#).unwrap();
        assert_eq!(schema.table, "products");
        assert_eq!(schema.name_column, "Producto");
    }
}
