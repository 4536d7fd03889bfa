//! # Session State Machine
//!
//! Pure transition logic for one kiosk screen. No timers and no I/O live
//! here: the async controller in the kiosk app drives this type and feeds
//! back lookup outcomes and dwell expiries.
//!
//! ## Epochs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every accepted scan starts a new cycle and bumps the epoch.           │
//! │  Lookup results and dwell expiries carry the epoch they belong to.     │
//! │                                                                         │
//! │  epoch 1: scan "111" ─► Loading ─► Success ─┐ dwell timer(epoch 1)     │
//! │                                             │                           │
//! │  epoch 2: scan "222" ─► Loading ◄───────────┘ (preempts the timer)      │
//! │                                                                         │
//! │  timer(epoch 1) fires late ─► expire(1) ─► ignored, epoch is now 2     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pricecheck_core::session::{LookupOutcome, Session};
//! use pricecheck_core::AppStatus;
//!
//! let mut session = Session::new();
//! let ticket = session.submit_scan(" 000000 ").unwrap();
//! assert_eq!(session.status(), AppStatus::Loading);
//!
//! session.resolve(ticket.epoch, LookupOutcome::NotFound);
//! assert_eq!(session.status(), AppStatus::NotFound);
//! assert_eq!(session.last_scanned_code(), Some("000000"));
//!
//! session.expire(ticket.epoch);
//! assert_eq!(session.status(), AppStatus::Idle);
//! ```

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::types::{AppStatus, Product, ScanEvent};
use crate::validation::normalize_scan_code;

// =============================================================================
// Epoch
// =============================================================================

/// Identifies one scan cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Epoch(u64);

impl Epoch {
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    #[inline]
    fn next(self) -> Self {
        Epoch(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Tickets and Outcomes
// =============================================================================

/// Issued for an accepted scan: the caller must run exactly one lookup for
/// `event.code` and report back with `epoch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTicket {
    pub epoch: Epoch,
    pub event: ScanEvent,
}

/// Result of a lookup as seen by the session.
///
/// Failures carry no detail; the cause is logged where it happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(Product),
    NotFound,
    Failed,
}

// =============================================================================
// Phase
// =============================================================================

/// Internal phase. The product only exists inside `Success`, so
/// "product present iff status is success" holds by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    Loading { code: String },
    Success { code: String, product: Product },
    NotFound { code: String },
    Error { code: String },
}

impl Phase {
    fn status(&self) -> AppStatus {
        match self {
            Phase::Idle => AppStatus::Idle,
            Phase::Loading { .. } => AppStatus::Loading,
            Phase::Success { .. } => AppStatus::Success,
            Phase::NotFound { .. } => AppStatus::NotFound,
            Phase::Error { .. } => AppStatus::Error,
        }
    }

    fn code(&self) -> Option<&str> {
        match self {
            Phase::Idle => None,
            Phase::Loading { code }
            | Phase::Success { code, .. }
            | Phase::NotFound { code }
            | Phase::Error { code } => Some(code),
        }
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Everything the presentation surface needs to render one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub status: AppStatus,
    pub product: Option<Product>,
    pub last_scanned_code: Option<String>,
    pub epoch: Epoch,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Session::new().snapshot()
    }
}

// =============================================================================
// Session
// =============================================================================

/// The kiosk's single source of truth for what is on screen.
#[derive(Debug, Clone)]
pub struct Session {
    phase: Phase,
    epoch: Epoch,
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl Session {
    /// A fresh session in `Idle`.
    pub fn new() -> Self {
        Session {
            phase: Phase::Idle,
            epoch: Epoch::default(),
        }
    }

    /// Submits one scanner line.
    ///
    /// ## Returns
    /// * `Ok(ScanTicket)` - state is now `Loading`; issue one lookup
    /// * `Err(CoreError::Validation)` - empty/whitespace/invalid line, no change
    /// * `Err(CoreError::Busy)` - a lookup is in flight, no change
    ///
    /// Accepting a scan from a terminal state starts a new epoch, which
    /// invalidates the pending dwell expiry of the previous cycle.
    pub fn submit_scan(&mut self, raw: &str) -> CoreResult<ScanTicket> {
        let code = normalize_scan_code(raw)?;

        if !self.status().accepts_scans() {
            return Err(CoreError::Busy);
        }

        self.epoch = self.epoch.next();
        self.phase = Phase::Loading { code: code.clone() };

        Ok(ScanTicket {
            epoch: self.epoch,
            event: ScanEvent::new(code),
        })
    }

    /// Applies a lookup outcome.
    ///
    /// Ignored (returns `false`) unless the session is `Loading` in the same
    /// epoch the lookup was issued for.
    pub fn resolve(&mut self, epoch: Epoch, outcome: LookupOutcome) -> bool {
        if epoch != self.epoch {
            return false;
        }

        let code = match &self.phase {
            Phase::Loading { code } => code.clone(),
            _ => return false,
        };

        self.phase = match outcome {
            LookupOutcome::Found(product) => Phase::Success { code, product },
            LookupOutcome::NotFound => Phase::NotFound { code },
            LookupOutcome::Failed => Phase::Error { code },
        };
        true
    }

    /// Dwell time elapsed for `epoch`: back to `Idle` if that cycle is still
    /// showing a terminal state. Returns whether the reset happened.
    pub fn expire(&mut self, epoch: Epoch) -> bool {
        if epoch != self.epoch || !self.status().is_terminal() {
            return false;
        }

        self.phase = Phase::Idle;
        true
    }

    /// Unconditional reset to `Idle`.
    ///
    /// Starts a new epoch so that any in-flight lookup result is discarded.
    pub fn reset(&mut self) {
        self.epoch = self.epoch.next();
        self.phase = Phase::Idle;
    }

    #[inline]
    pub fn status(&self) -> AppStatus {
        self.phase.status()
    }

    #[inline]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// The resolved product; `Some` only in `Success`.
    pub fn product(&self) -> Option<&Product> {
        match &self.phase {
            Phase::Success { product, .. } => Some(product),
            _ => None,
        }
    }

    /// The code of the current cycle; `None` once back in `Idle`.
    pub fn last_scanned_code(&self) -> Option<&str> {
        self.phase.code()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status(),
            product: self.product().cloned(),
            last_scanned_code: self.last_scanned_code().map(str::to_string),
            epoch: self.epoch,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
