//! # Domain Types
//!
//! Core domain types used throughout the kiosk.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   AppStatus     │   │   ScanEvent     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  Idle           │   │  code (trimmed) │       │
//! │  │  code           │   │  Loading        │   │  scanned_at     │       │
//! │  │  name           │   │  Success        │   └─────────────────┘       │
//! │  │  price (Money)  │   │  NotFound       │                              │
//! │  │  category ...   │   │  Error          │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Name shown when the backend row has no product name.
pub const DEFAULT_PRODUCT_NAME: &str = "Unnamed product";

/// Category assigned to every looked-up product (the backend has none).
pub const DEFAULT_CATEGORY: &str = "General";

// =============================================================================
// Product
// =============================================================================

/// A product resolved from a scan.
///
/// Immutable once built; the session owns it for as long as it is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Backend row identifier.
    pub id: String,

    /// Code shown under the price: the row's primary code, or the scanned
    /// code when the primary column is blank.
    pub code: String,

    /// Display name.
    pub name: String,

    /// Shelf price.
    pub price: Money,

    pub category: String,

    pub description: String,

    pub image_url: String,

    pub stock: i64,
}

impl Product {
    /// Creates a product with the placeholder fields set to their defaults.
    ///
    /// A blank `name` falls back to [`DEFAULT_PRODUCT_NAME`].
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        price: Money,
    ) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            DEFAULT_PRODUCT_NAME.to_string()
        } else {
            name
        };

        Product {
            id: id.into(),
            code: code.into(),
            name,
            price,
            category: DEFAULT_CATEGORY.to_string(),
            description: String::new(),
            image_url: String::new(),
            stock: 0,
        }
    }
}

// =============================================================================
// App Status
// =============================================================================

/// What the kiosk is currently showing.
///
/// ```text
///            scan                found
///   Idle ──────────► Loading ──────────► Success ─┐
///    ▲                  │ none                    │
///    │                  ├──────────────► NotFound ├── dwell / new scan
///    │                  │ failure                 │
///    │                  └──────────────► Error ───┘
///    └──────────────────── dwell elapsed ─────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppStatus {
    /// Waiting for a scan.
    #[default]
    Idle,
    /// A lookup is in flight.
    Loading,
    /// Product found and displayed.
    Success,
    /// No product matches the scanned code.
    NotFound,
    /// The lookup failed.
    Error,
}

impl AppStatus {
    /// Terminal states display a result and auto-revert after the dwell time.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, AppStatus::Success | AppStatus::NotFound | AppStatus::Error)
    }

    /// Whether a new scan may start a lookup.
    #[inline]
    pub const fn accepts_scans(&self) -> bool {
        !matches!(self, AppStatus::Loading)
    }
}

impl std::fmt::Display for AppStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppStatus::Idle => write!(f, "idle"),
            AppStatus::Loading => write!(f, "loading"),
            AppStatus::Success => write!(f, "success"),
            AppStatus::NotFound => write!(f, "not_found"),
            AppStatus::Error => write!(f, "error"),
        }
    }
}

// =============================================================================
// Scan Event
// =============================================================================

/// One completed scanner line. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    /// Trimmed, non-empty code.
    pub code: String,

    pub scanned_at: DateTime<Utc>,
}

impl ScanEvent {
    /// Wraps an already-validated code, stamped with the current time.
    pub fn new(code: impl Into<String>) -> Self {
        ScanEvent {
            code: code.into(),
            scanned_at: Utc::now(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
