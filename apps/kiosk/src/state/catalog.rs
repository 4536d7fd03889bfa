//! # Catalog State
//!
//! Builds the configured lookup backend once at startup and hands it to the
//! controller as a trait object.
//!
//! ```text
//! CatalogSettings.backend
//!   ├── rest   ──► RestCatalog::new(url, api_key, schema)
//!   └── sqlite ──► SqliteCatalog::connect(path, schema)   (read-only)
//!                        │
//!                        ▼
//!              Arc<dyn ProductLookup>
//! ```

use pricecheck_catalog::{ProductLookup, RestCatalog, SqliteCatalog};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::KioskResult;
use crate::state::config::{Backend, CatalogSettings};

/// Shared handle to the product lookup backend.
pub type CatalogState = Arc<dyn ProductLookup>;

/// Connects the backend named in the settings.
///
/// ## Errors
/// * `KioskError::Config` - required settings are missing
/// * `KioskError::Catalog` - the backend rejected the settings or could
///   not be opened
pub async fn connect(settings: &CatalogSettings) -> KioskResult<CatalogState> {
    let schema = settings.schema();

    let catalog: CatalogState = match settings.backend {
        Backend::Rest => {
            let catalog = RestCatalog::new(settings.rest_config()?, schema)?;
            info!(endpoint = %catalog.endpoint(), "Using hosted catalog");
            Arc::new(catalog)
        }
        Backend::Sqlite => {
            let catalog = SqliteCatalog::connect(settings.sqlite_config()?, schema).await?;
            if !catalog.health_check().await {
                warn!(
                    table = %settings.table,
                    "Catalog mirror has no readable product table, every lookup will fail"
                );
            }
            info!("Using local catalog mirror");
            Arc::new(catalog)
        }
    };

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KioskError;

    #[tokio::test]
    async fn test_rest_backend_builds_without_network() {
        let settings = CatalogSettings {
            url: Some("https://abc.supabase.co/".to_string()),
            api_key: Some("anon-key".to_string()),
            ..CatalogSettings::default()
        };

        let catalog = connect(&settings).await.unwrap();
        assert_eq!(catalog.backend(), "rest");
    }

    #[tokio::test]
    async fn test_missing_mirror_file_fails() {
        let settings = CatalogSettings {
            backend: Backend::Sqlite,
            sqlite_path: Some("/nonexistent/dir/catalog.db".into()),
            timeout_secs: 1,
            ..CatalogSettings::default()
        };

        let result = connect(&settings).await;
        assert!(matches!(result, Err(KioskError::Catalog(_))));
    }

    #[tokio::test]
    async fn test_missing_settings_are_config_errors() {
        let settings = CatalogSettings::default();
        assert!(matches!(connect(&settings).await, Err(KioskError::Config(_))));
    }
}
