//! # pricecheck-catalog: Product Lookup for the Price-Check Kiosk
//!
//! Resolves a scanned code into a [`Product`](pricecheck_core::Product) by
//! matching it against every code column of the catalog table.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Price-Check Data Flow                               │
//! │                                                                         │
//! │  Kiosk controller (scan accepted)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                pricecheck-catalog (THIS CRATE)                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ ProductLookup │    │   Backends    │    │   Mapping    │  │   │
//! │  │   │  (lookup.rs)  │◄───│  rest.rs      │───►│ (mapping.rs) │  │   │
//! │  │   │               │    │  sqlite.rs    │    │ row→Product  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  Hosted table (PostgREST)         Local mirror (SQLite)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`lookup`] - The `ProductLookup` trait
//! - [`rest`] - Hosted backend over PostgREST
//! - [`sqlite`] - Local mirror backend
//! - [`mirror`] - Creating and filling a mirror
//! - [`mapping`] - Row → Product defaults
//! - [`schema`] - Table and column names
//! - [`error`] - Lookup error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pricecheck_catalog::{CatalogSchema, ProductLookup, RestCatalog, RestConfig};
//!
//! let config = RestConfig::new("https://abc.supabase.co", "anon-key");
//! let catalog = RestCatalog::new(config, CatalogSchema::default())?;
//!
//! match catalog.lookup("7791234567890").await? {
//!     Some(product) => println!("{} {}", product.name, product.price),
//!     None => println!("not found"),
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lookup;
pub mod mapping;
pub mod mirror;
pub mod rest;
pub mod schema;
pub mod sqlite;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{LookupError, LookupResult};
pub use lookup::ProductLookup;
pub use rest::{RestCatalog, RestConfig};
pub use schema::CatalogSchema;
pub use sqlite::{SqliteCatalog, SqliteConfig};
