//! # Mirror Table Management
//!
//! Creates and fills a local copy of the catalog table. Used by the `seed`
//! binary and by tests; the kiosk itself only reads.
//!
//! Column affinities are left loose (`TEXT` for codes and names, no
//! affinity for the price) so a mirror exported from the hosted table keeps
//! whatever the export wrote, number or string.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::LookupResult;
use crate::schema::CatalogSchema;

/// One row to insert into the mirror.
///
/// ## Example
/// ```rust,ignore
/// let row = MirrorRow::new(7, "Yerba Mate 1kg", "2500.5").code(2, "7791234567890");
/// insert_row(&pool, &schema, &row).await?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorRow {
    pub id: i64,
    pub name: Option<String>,
    pub price: Option<String>,
    /// Values for the schema's code columns, by position.
    pub codes: Vec<Option<String>>,
}

impl MirrorRow {
    pub fn new(id: i64, name: impl Into<String>, price: impl Into<String>) -> Self {
        MirrorRow {
            id,
            name: Some(name.into()),
            price: Some(price.into()),
            codes: Vec::new(),
        }
    }

    /// Sets the code stored in the `index`-th code column.
    pub fn code(mut self, index: usize, value: impl Into<String>) -> Self {
        if self.codes.len() <= index {
            self.codes.resize(index + 1, None);
        }
        self.codes[index] = Some(value.into());
        self
    }
}

/// Creates the catalog table if it does not exist.
pub async fn create_table(pool: &SqlitePool, schema: &CatalogSchema) -> LookupResult<()> {
    schema.validate()?;

    let mut columns = vec![
        format!("\"{}\" INTEGER PRIMARY KEY", schema.id_column),
        format!("\"{}\" TEXT", schema.name_column),
        format!("\"{}\"", schema.price_column),
    ];
    columns.extend(schema.code_columns.iter().map(|c| format!("\"{c}\" TEXT")));

    let sql = format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" ({})",
        schema.table,
        columns.join(", ")
    );
    debug!(sql = %sql, "Creating mirror table");
    sqlx::query(&sql).execute(pool).await?;

    // One index per code column keeps the OR lookup off a full scan
    for column in &schema.code_columns {
        let sql = format!(
            "CREATE INDEX IF NOT EXISTS \"idx_{table}_{column}\" ON \"{table}\" (\"{column}\")",
            table = schema.table,
            column = column
        );
        sqlx::query(&sql).execute(pool).await?;
    }

    info!(table = %schema.table, "Mirror table ready");
    Ok(())
}

/// Inserts or replaces one row.
pub async fn insert_row(
    pool: &SqlitePool,
    schema: &CatalogSchema,
    row: &MirrorRow,
) -> LookupResult<()> {
    let mut columns = vec![
        schema.id_column.as_str(),
        schema.name_column.as_str(),
        schema.price_column.as_str(),
    ];
    columns.extend(schema.code_columns.iter().map(String::as_str));

    let column_list = columns
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; columns.len()].join(", ");

    let sql = format!(
        "INSERT OR REPLACE INTO \"{}\" ({}) VALUES ({})",
        schema.table, column_list, placeholders
    );

    let mut query = sqlx::query(&sql)
        .bind(row.id)
        .bind(row.name.as_deref())
        .bind(row.price.as_deref());
    for index in 0..schema.code_columns.len() {
        query = query.bind(row.codes.get(index).cloned().flatten());
    }

    query.execute(pool).await?;
    Ok(())
}

/// Number of rows in the catalog table.
pub async fn count(pool: &SqlitePool, schema: &CatalogSchema) -> LookupResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM \"{}\"", schema.table);
    let count: i64 = sqlx::query_scalar(&sql).fetch_one(pool).await?;
    Ok(count)
}
