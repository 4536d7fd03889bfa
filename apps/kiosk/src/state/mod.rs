//! # State Module
//!
//! Everything the kiosk holds between frames.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │   KioskConfig    │  │   CatalogState   │  │   KioskController    │  │
//! │  │                  │  │                  │  │                      │  │
//! │  │  title, dwell    │  │  Arc<dyn         │  │  Session             │  │
//! │  │  backend, url    │  │   ProductLookup> │  │  lookup + dwell task │  │
//! │  │  column names    │  │                  │  │  snapshot watch      │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • KioskConfig: read-only after load                                   │
//! │  • CatalogState: backends are Send + Sync, shared by lookup tasks      │
//! │  • Session: owned by the controller task, nobody else writes it        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod config;
pub mod controller;

pub use catalog::CatalogState;
pub use config::{Backend, CatalogSettings, KioskConfig, KioskSettings};
pub use controller::{KioskCommand, KioskController, KioskHandle, KioskSnapshot};
