//! # Kiosk Controller
//!
//! Drives the [`Session`] from scanner lines, lookup results and the dwell
//! timer. The controller task is the only writer of session state.
//!
//! ## Task Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  UI ── KioskCommand::Scan ──►┌──────────────────────┐                   │
//! │                              │  KioskController     │── KioskSnapshot ──► UI
//! │  lookup task ─ LookupDone ──►│  (select! loop)      │    (watch)        │
//! │  dwell task ── DwellElapsed ►│  Session + epochs    │                   │
//! │                              └──────────────────────┘                   │
//! │                                                                         │
//! │  Every task report carries the epoch it was spawned for. Reports from  │
//! │  an older epoch are dropped by the Session, and the dwell task of the  │
//! │  previous cycle is aborted as soon as a new scan is accepted.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Timeline
//! ```text
//! t=0   Scan "779..."      Idle ──► Loading        (lookup task spawned)
//! t=0.3 LookupDone(#1)     Loading ──► Success     (dwell task armed, 10 s)
//! t=6   Scan "000000"      Success ──► Loading     (dwell #1 aborted)
//! t=6.2 LookupDone(#2)     Loading ──► NotFound    (dwell task armed, 10 s)
//! t=16  DwellElapsed(#2)   NotFound ──► Idle
//! ```

use pricecheck_catalog::ProductLookup;
use pricecheck_core::{CoreError, Epoch, LookupOutcome, Session, SessionSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::error::{KioskError, KioskResult};

// =============================================================================
// Messages
// =============================================================================

/// Commands accepted by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KioskCommand {
    /// One submitted scanner line.
    Scan(String),

    /// Stop the controller and abort its tasks.
    Shutdown,
}

/// Reports from tasks spawned by the controller.
#[derive(Debug)]
enum TaskEvent {
    LookupDone { epoch: Epoch, outcome: LookupOutcome },
    DwellElapsed { epoch: Epoch },
}

/// What the UI renders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KioskSnapshot {
    pub session: SessionSnapshot,

    /// When the current result will be cleared; `None` unless a terminal
    /// state is showing.
    pub reset_at: Option<Instant>,
}

impl KioskSnapshot {
    /// Whole seconds left before the reset, rounded up.
    pub fn seconds_until_reset(&self, now: Instant) -> Option<u64> {
        self.reset_at.map(|at| {
            let left = at.saturating_duration_since(now);
            let secs = left.as_secs();
            if left.subsec_nanos() > 0 {
                secs + 1
            } else {
                secs
            }
        })
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Handle for talking to a running controller.
#[derive(Debug, Clone)]
pub struct KioskHandle {
    commands: mpsc::Sender<KioskCommand>,
    snapshots: watch::Receiver<KioskSnapshot>,
}

impl KioskHandle {
    /// Submits one scanner line.
    pub async fn scan(&self, line: impl Into<String>) -> KioskResult<()> {
        self.send(KioskCommand::Scan(line.into())).await
    }

    /// Triggers graceful shutdown.
    pub async fn shutdown(&self) -> KioskResult<()> {
        self.send(KioskCommand::Shutdown).await
    }

    /// A receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<KioskSnapshot> {
        self.snapshots.clone()
    }

    /// The latest published snapshot.
    pub fn current(&self) -> KioskSnapshot {
        self.snapshots.borrow().clone()
    }

    async fn send(&self, command: KioskCommand) -> KioskResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| KioskError::Controller("Command channel closed".into()))
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Owns the session and the tasks working on its behalf.
pub struct KioskController {
    session: Session,
    lookup: Arc<dyn ProductLookup>,
    dwell: Duration,

    commands: mpsc::Receiver<KioskCommand>,
    events_tx: mpsc::UnboundedSender<TaskEvent>,
    events_rx: mpsc::UnboundedReceiver<TaskEvent>,
    snapshots: watch::Sender<KioskSnapshot>,

    lookup_task: Option<JoinHandle<()>>,
    dwell_task: Option<JoinHandle<()>>,
    reset_at: Option<Instant>,
}

impl KioskController {
    /// Creates a controller and returns a handle to it.
    pub fn new(lookup: Arc<dyn ProductLookup>, dwell: Duration) -> (Self, KioskHandle) {
        let (commands_tx, commands_rx) = mpsc::channel(32);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshots_tx, snapshots_rx) = watch::channel(KioskSnapshot::default());

        let controller = KioskController {
            session: Session::new(),
            lookup,
            dwell,
            commands: commands_rx,
            events_tx,
            events_rx,
            snapshots: snapshots_tx,
            lookup_task: None,
            dwell_task: None,
            reset_at: None,
        };

        let handle = KioskHandle {
            commands: commands_tx,
            snapshots: snapshots_rx,
        };

        (controller, handle)
    }

    /// Creates a controller and spawns its loop.
    pub fn spawn(
        lookup: Arc<dyn ProductLookup>,
        dwell: Duration,
    ) -> (KioskHandle, JoinHandle<()>) {
        let (controller, handle) = Self::new(lookup, dwell);
        let task = tokio::spawn(controller.run());
        (handle, task)
    }

    /// Runs the controller loop until shutdown or until every handle is
    /// dropped.
    pub async fn run(mut self) {
        info!(
            backend = self.lookup.backend(),
            dwell_secs = self.dwell.as_secs(),
            "Kiosk controller starting"
        );

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(KioskCommand::Scan(line)) => self.on_scan(&line),
                    Some(KioskCommand::Shutdown) | None => {
                        info!("Kiosk controller shutting down");
                        break;
                    }
                },

                Some(event) = self.events_rx.recv() => self.on_task_event(event),
            }
        }

        self.teardown();
        info!("Kiosk controller stopped");
    }

    fn on_scan(&mut self, line: &str) {
        let ticket = match self.session.submit_scan(line) {
            Ok(ticket) => ticket,
            Err(CoreError::Busy) => {
                debug!("Scan ignored, lookup in progress");
                return;
            }
            Err(e) => {
                debug!(error = %e, "Scan ignored");
                return;
            }
        };

        // The previous cycle's reset must not fire into this one
        self.cancel_dwell();

        info!(
            epoch = %ticket.epoch,
            code = %ticket.event.code,
            scanned_at = %ticket.event.scanned_at,
            "Scan accepted"
        );

        let lookup = Arc::clone(&self.lookup);
        let events = self.events_tx.clone();
        let epoch = ticket.epoch;
        let code = ticket.event.code;

        self.lookup_task = Some(tokio::spawn(async move {
            let outcome = match lookup.lookup(&code).await {
                Ok(Some(product)) => {
                    info!(code = %code, product = %product.name, price = %product.price, "Product found");
                    LookupOutcome::Found(product)
                }
                Ok(None) => {
                    info!(code = %code, "No product for code");
                    LookupOutcome::NotFound
                }
                Err(e) => {
                    error!(code = %code, backend = lookup.backend(), error = %e, "Product lookup failed");
                    LookupOutcome::Failed
                }
            };
            let _ = events.send(TaskEvent::LookupDone { epoch, outcome });
        }));

        self.publish();
    }

    fn on_task_event(&mut self, event: TaskEvent) {
        match event {
            TaskEvent::LookupDone { epoch, outcome } => {
                if !self.session.resolve(epoch, outcome) {
                    warn!(epoch = %epoch, "Discarding stale lookup result");
                    return;
                }
                self.lookup_task = None;
                self.arm_dwell();
                self.publish();
            }
            TaskEvent::DwellElapsed { epoch } => {
                if !self.session.expire(epoch) {
                    debug!(epoch = %epoch, "Discarding stale dwell expiry");
                    return;
                }
                self.dwell_task = None;
                self.reset_at = None;
                debug!(epoch = %epoch, "Result cleared, back to idle");
                self.publish();
            }
        }
    }

    fn arm_dwell(&mut self) {
        self.cancel_dwell();

        let epoch = self.session.epoch();
        let Some(deadline) = Instant::now().checked_add(self.dwell) else {
            warn!(epoch = %epoch, dwell = ?self.dwell, "Dwell time out of range, result stays until the next scan");
            return;
        };
        let events = self.events_tx.clone();

        self.reset_at = Some(deadline);
        self.dwell_task = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = events.send(TaskEvent::DwellElapsed { epoch });
        }));
    }

    fn cancel_dwell(&mut self) {
        if let Some(task) = self.dwell_task.take() {
            task.abort();
        }
        self.reset_at = None;
    }

    fn publish(&self) {
        self.snapshots.send_replace(KioskSnapshot {
            session: self.session.snapshot(),
            reset_at: self.reset_at,
        });
    }

    fn teardown(&mut self) {
        self.cancel_dwell();
        if let Some(task) = self.lookup_task.take() {
            task.abort();
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
