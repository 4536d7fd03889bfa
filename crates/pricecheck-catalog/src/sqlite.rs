//! # Local SQLite Mirror
//!
//! Looks codes up in a local copy of the catalog table, for kiosks that
//! run without network access.
//!
//! ## Query
//! ```text
//! SELECT CAST("id" AS TEXT) AS "id",
//!        CAST("Producto" AS TEXT) AS "Producto",
//!        CAST("Precio" AS TEXT) AS "Precio",
//!        CAST("Codigo" AS TEXT) AS "Codigo"
//!   FROM "productos"
//!  WHERE "Codigo" = ? OR "Codigo1" = ? OR ... "Codigo4" = ?
//!  LIMIT 2
//! ```
//!
//! Everything is read back as text and handed to the shared row mapping,
//! so a price stored as `2500.5` and one stored as `'2500.5'` behave the
//! same. The pool is opened read-only unless the caller asks otherwise.

use async_trait::async_trait;
use pricecheck_core::Product;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{LookupError, LookupResult};
use crate::lookup::{first_match, ProductLookup};
use crate::mapping::RawRow;
use crate::schema::CatalogSchema;

// =============================================================================
// Configuration
// =============================================================================

/// SQLite mirror configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = SqliteConfig::new("/var/lib/pricecheck/catalog.db")
///     .max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to the mirror database file.
    pub database_path: PathBuf,

    /// Open without write access.
    /// Default: true
    pub read_only: bool,

    /// Create the file if it doesn't exist.
    /// Default: false
    pub create_if_missing: bool,

    /// Maximum number of connections in the pool.
    /// Default: 2 (one lookup at a time, plus the health check)
    pub max_connections: u32,

    /// Connection acquire timeout.
    /// Default: 5 seconds
    pub connect_timeout: Duration,
}

impl SqliteConfig {
    /// Creates a read-only configuration for an existing mirror file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SqliteConfig {
            database_path: path.into(),
            read_only: true,
            create_if_missing: false,
            max_connections: 2,
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Creates an in-memory configuration (for testing and seeding).
    pub fn in_memory() -> Self {
        SqliteConfig {
            database_path: PathBuf::from(":memory:"),
            read_only: false,
            create_if_missing: true,
            max_connections: 1, // In-memory requires single connection
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Opens the file for writing, creating it if needed.
    pub fn writable(mut self) -> Self {
        self.read_only = false;
        self.create_if_missing = true;
        self
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }
}

// =============================================================================
// SqliteCatalog
// =============================================================================

/// Product lookup against a local SQLite mirror.
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
    schema: CatalogSchema,
    select_sql: String,
}

impl SqliteCatalog {
    /// Opens the mirror and prepares the lookup statement.
    ///
    /// ## Errors
    /// * `LookupError::Config` - schema identifiers are invalid
    /// * `LookupError::Transport` - the file could not be opened
    pub async fn connect(config: SqliteConfig, schema: CatalogSchema) -> LookupResult<Self> {
        schema.validate()?;

        info!(
            path = %config.database_path.display(),
            read_only = config.read_only,
            "Opening catalog mirror"
        );

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
        } else {
            SqliteConnectOptions::from_str(&format!(
                "sqlite://{}",
                config.database_path.display()
            ))
        }
        .map_err(|e| LookupError::Config(e.to_string()))?
        .read_only(config.read_only)
        .create_if_missing(config.create_if_missing);

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(config.connect_timeout);

        // An in-memory database lives and dies with its only connection
        if config.is_in_memory() {
            pool_options = pool_options
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        Ok(Self::with_pool(pool, schema))
    }

    /// Wraps an existing pool. The schema must already be validated.
    pub fn with_pool(pool: SqlitePool, schema: CatalogSchema) -> Self {
        let select_sql = select_sql(&schema);
        debug!(sql = %select_sql, "Prepared mirror lookup");

        SqliteCatalog {
            pool,
            schema,
            select_sql,
        }
    }

    /// Returns the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Checks the mirror can answer a query against the catalog table.
    pub async fn health_check(&self) -> bool {
        let sql = format!("SELECT 1 FROM \"{}\" LIMIT 1", self.schema.table);
        sqlx::query(&sql).fetch_optional(&self.pool).await.is_ok()
    }

    /// Closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Column names in select order.
    fn selected_columns(&self) -> Vec<&str> {
        let mut columns = vec![
            self.schema.id_column.as_str(),
            self.schema.name_column.as_str(),
            self.schema.price_column.as_str(),
        ];
        if let Some(primary) = self.schema.primary_code_column() {
            columns.push(primary);
        }
        columns
    }

    fn row_to_raw(&self, row: &SqliteRow) -> LookupResult<RawRow> {
        let mut raw = RawRow::new();
        for (index, column) in self.selected_columns().into_iter().enumerate() {
            let value: Option<String> = row.try_get(index)?;
            raw.insert(
                column.to_string(),
                value.map(Value::String).unwrap_or(Value::Null),
            );
        }
        Ok(raw)
    }
}

#[async_trait]
impl ProductLookup for SqliteCatalog {
    async fn lookup(&self, code: &str) -> LookupResult<Option<Product>> {
        let mut query = sqlx::query(&self.select_sql);
        for _ in &self.schema.code_columns {
            query = query.bind(code);
        }

        let rows = query.fetch_all(&self.pool).await?;
        debug!(code = %code, rows = rows.len(), "Mirror query returned");

        let rows = rows
            .iter()
            .map(|row| self.row_to_raw(row))
            .collect::<LookupResult<Vec<_>>>()?;

        first_match(rows, &self.schema, code)
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

/// Builds the lookup statement. Identifiers are validated before this runs.
fn select_sql(schema: &CatalogSchema) -> String {
    let mut columns = vec![
        &schema.id_column,
        &schema.name_column,
        &schema.price_column,
    ];
    if let Some(primary) = schema.code_columns.first() {
        columns.push(primary);
    }

    let select = columns
        .iter()
        .map(|c| format!("CAST(\"{c}\" AS TEXT) AS \"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");

    let filter = schema
        .code_columns
        .iter()
        .map(|c| format!("\"{c}\" = ?"))
        .collect::<Vec<_>>()
        .join(" OR ");

    format!(
        "SELECT {} FROM \"{}\" WHERE {} LIMIT 2",
        select, schema.table, filter
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::{create_table, insert_row, MirrorRow};

    async fn seeded_catalog() -> SqliteCatalog {
        let schema = CatalogSchema::default();
        let catalog = SqliteCatalog::connect(SqliteConfig::in_memory(), schema.clone())
            .await
            .unwrap();

        create_table(catalog.pool(), &schema).await.unwrap();
        insert_row(
            catalog.pool(),
            &schema,
            &MirrorRow::new(7, "Yerba Mate 1kg", "2500.5").code(2, "7791234567890"),
        )
        .await
        .unwrap();
        insert_row(
            catalog.pool(),
            &schema,
            &MirrorRow::new(8, "Cafe Molido 500g", "19.99")
                .code(0, "0008")
                .code(1, "7790000000008"),
        )
        .await
        .unwrap();

        catalog
    }

    #[test]
    fn test_select_sql_shape() {
        let sql = select_sql(&CatalogSchema::default());
        assert!(sql.starts_with("SELECT CAST(\"id\" AS TEXT) AS \"id\""));
        assert!(sql.contains("FROM \"productos\""));
        assert!(sql.contains("\"Codigo4\" = ?"));
        assert_eq!(sql.matches('?').count(), 5);
        assert!(sql.ends_with("LIMIT 2"));
    }

    #[tokio::test]
    async fn test_in_memory_health_check() {
        let catalog = seeded_catalog().await;
        assert!(catalog.health_check().await);
        assert_eq!(catalog.backend(), "sqlite");
    }

    #[tokio::test]
    async fn test_lookup_by_alternative_code() {
        let catalog = seeded_catalog().await;

        let product = catalog.lookup("7791234567890").await.unwrap().unwrap();
        assert_eq!(product.id, "7");
        assert_eq!(product.name, "Yerba Mate 1kg");
        assert_eq!(product.price.to_string(), "$2500.50");
        assert_eq!(product.code, "7791234567890");
    }

    #[tokio::test]
    async fn test_lookup_shows_primary_code() {
        let catalog = seeded_catalog().await;

        let product = catalog.lookup("7790000000008").await.unwrap().unwrap();
        assert_eq!(product.code, "0008");
        assert_eq!(product.price.amount(), "19.99");
    }

    #[tokio::test]
    async fn test_unknown_code_is_none() {
        let catalog = seeded_catalog().await;
        assert!(catalog.lookup("0000000000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_table_is_query_error() {
        let catalog = SqliteCatalog::connect(SqliteConfig::in_memory(), CatalogSchema::default())
            .await
            .unwrap();

        let result = catalog.lookup("123").await;
        assert!(matches!(result, Err(LookupError::Query { .. })));
        assert!(!catalog.health_check().await);
    }

    #[tokio::test]
    async fn test_invalid_schema_rejected() {
        let schema = CatalogSchema {
            table: "productos; DROP TABLE x".to_string(),
            ..CatalogSchema::default()
        };
        let result = SqliteCatalog::connect(SqliteConfig::in_memory(), schema).await;
        assert!(matches!(result, Err(LookupError::Config(_))));
    }

    #[test]
    fn test_config_builder() {
        let config = SqliteConfig::new("/tmp/catalog.db").max_connections(4);
        assert!(config.read_only);
        assert_eq!(config.max_connections, 4);

        let config = config.writable();
        assert!(!config.read_only);
        assert!(config.create_if_missing);
    }
}
