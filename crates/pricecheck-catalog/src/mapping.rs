//! # Row Mapping
//!
//! Turns one backend row into a [`Product`]. Both backends hand rows over as
//! JSON objects so the defaulting rules live in one place.
//!
//! ## Field Rules
//! ```text
//! ┌──────────────┬──────────────────────────────────────────────────────────┐
//! │ Product      │ Source                                                   │
//! ├──────────────┼──────────────────────────────────────────────────────────┤
//! │ id           │ id column as text (numbers stringified), "" if absent   │
//! │ code         │ primary code column if non-blank, else scanned code     │
//! │ name         │ name column, "Unnamed product" if absent/blank          │
//! │ price        │ number or numeric string, 0 if absent/null/blank        │
//! │ category     │ "General"                                                │
//! │ description  │ ""                                                       │
//! │ image_url    │ ""                                                       │
//! │ stock        │ 0                                                        │
//! └──────────────┴──────────────────────────────────────────────────────────┘
//! ```

use pricecheck_core::{Money, Product};
use serde_json::{Map, Value};

use crate::error::{LookupError, LookupResult};
use crate::schema::CatalogSchema;

/// One backend row, keyed by column name.
pub type RawRow = Map<String, Value>;

/// Maps a matched row into a product.
///
/// ## Arguments
/// * `row` - The matched row
/// * `schema` - Column names to read
/// * `scanned_code` - Fallback for the displayed code
///
/// ## Errors
/// `LookupError::MalformedRow` when the price is negative, unparseable,
/// or not a number/string at all.
pub fn product_from_row(
    row: &RawRow,
    schema: &CatalogSchema,
    scanned_code: &str,
) -> LookupResult<Product> {
    let id = text_field(row, &schema.id_column).unwrap_or_default();

    let code = schema
        .primary_code_column()
        .and_then(|column| text_field(row, column))
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| scanned_code.to_string());

    let name = text_field(row, &schema.name_column).unwrap_or_default();

    let price = price_field(row, &schema.price_column)?;

    Ok(Product::new(id, code, name, price))
}

/// Reads a column as text. Numbers and booleans are stringified; null and
/// missing columns are `None`.
fn text_field(row: &RawRow, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn price_field(row: &RawRow, column: &str) -> LookupResult<Money> {
    match row.get(column) {
        None | Some(Value::Null) => Ok(Money::zero()),
        Some(Value::String(s)) => Ok(Money::parse_price(s)?),
        Some(Value::Number(n)) => Ok(Money::parse_price(&n.to_string())?),
        Some(other) => Err(LookupError::MalformedRow(format!(
            "{} is not a number: {}",
            column, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> RawRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("test rows must be objects"),
        }
    }

    #[test]
    fn test_matched_on_secondary_column() {
        let row = row(json!({
            "id": 7,
            "Producto": "Yerba Mate 1kg",
            "Precio": "2500.5",
            "Codigo": null,
            "Codigo2": "7791234567890"
        }));

        let product = product_from_row(&row, &CatalogSchema::default(), "7791234567890").unwrap();
        assert_eq!(product.id, "7");
        assert_eq!(product.name, "Yerba Mate 1kg");
        assert_eq!(product.price.to_string(), "$2500.50");
        assert_eq!(product.code, "7791234567890");
        assert_eq!(product.category, "General");
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn test_primary_code_is_displayed_when_present() {
        let row = row(json!({
            "id": "a1",
            "Producto": "Cafe",
            "Precio": 19.5,
            "Codigo": "0001",
            "Codigo1": "9990001"
        }));

        let product = product_from_row(&row, &CatalogSchema::default(), "9990001").unwrap();
        assert_eq!(product.code, "0001");
        assert_eq!(product.price.amount(), "19.50");
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let row = row(json!({ "id": 3 }));

        let product = product_from_row(&row, &CatalogSchema::default(), "123").unwrap();
        assert_eq!(product.name, "Unnamed product");
        assert!(product.price.is_zero());
        assert_eq!(product.code, "123");
    }

    #[test]
    fn test_blank_primary_code_falls_back() {
        let row = row(json!({ "id": 1, "Codigo": "  ", "Precio": "" }));

        let product = product_from_row(&row, &CatalogSchema::default(), "555").unwrap();
        assert_eq!(product.code, "555");
        assert!(product.price.is_zero());
    }

    #[test]
    fn test_bad_prices_are_malformed() {
        for bad in [json!("n/a"), json!(-3), json!([1, 2]), json!(true)] {
            let row = row(json!({ "id": 1, "Precio": bad }));
            let result = product_from_row(&row, &CatalogSchema::default(), "1");
            assert!(matches!(result, Err(LookupError::MalformedRow(_))));
        }
    }
}
