//! # pricecheck-core: Pure Domain Logic for the Price-Check Kiosk
//!
//! Everything the kiosk decides, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Price-Check Kiosk Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Terminal UI (apps/kiosk)                       │   │
//! │  │   Scan input ──► Idle / Searching / Price / Not found / Error   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ scan events / snapshots                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               Kiosk controller (tokio task)                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ pricecheck-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  session  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Session  │  │ scan code │  │   │
//! │  │   │ AppStatus │  │  prices   │  │  epochs   │  │ idents    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO TIMERS                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             pricecheck-catalog (product lookup)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, AppStatus, ScanEvent
//! - [`money`] - Integer-cent prices parsed from backend decimals
//! - [`session`] - The idle → loading → result → idle state machine
//! - [`validation`] - Scanner line and identifier validation
//! - [`error`] - Domain error types

pub mod error;
pub mod money;
pub mod session;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use session::{Epoch, LookupOutcome, ScanTicket, Session, SessionSnapshot};
pub use types::*;

/// Seconds a result stays on screen before the kiosk resets itself.
pub const DEFAULT_DWELL_SECS: u64 = 10;

/// Maximum number of code columns a product row can be matched on.
pub const MAX_CODE_COLUMNS: usize = 5;
