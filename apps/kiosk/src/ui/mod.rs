//! # Terminal UI
//!
//! Full-screen kiosk surface: the scanner input line plus one of the five
//! result views.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           UI Event Loop                                 │
//! │                                                                         │
//! │   crossterm EventStream ──┐                                             │
//! │   snapshot watch ─────────┤   select!   ──► KioskApp ──► view::render  │
//! │   focus interval ─────────┤                   │                         │
//! │   redraw tick ────────────┘                   │ Enter                   │
//! │                                               ▼                         │
//! │                                       KioskHandle::scan                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod input;
pub mod view;

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        EventStream,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::KioskResult;
use crate::state::{KioskHandle, KioskSettings};
use app::{Action, KioskApp};

/// Redraw rate for the spinner and the countdown badge.
const REDRAW_TICK: Duration = Duration::from_millis(250);

/// Run the kiosk screen until the operator quits
pub async fn run(settings: &KioskSettings, handle: &KioskHandle) -> KioskResult<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let mut app = KioskApp::new(settings, handle.current());
    let result = run_loop(&mut terminal, &mut app, handle).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut KioskApp,
    handle: &KioskHandle,
) -> KioskResult<()> {
    let mut events = EventStream::new();
    let mut snapshots = handle.subscribe();

    let mut focus_tick = interval(app.focus.interval());
    focus_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut redraw_tick = interval(REDRAW_TICK);
    redraw_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Kiosk screen ready");

    loop {
        terminal.draw(|frame| view::render(frame, app, Instant::now()))?;

        tokio::select! {
            maybe_event = events.next() => {
                let event = match maybe_event {
                    Some(Ok(event)) => event,
                    Some(Err(e)) => return Err(e.into()),
                    None => {
                        warn!("Terminal event stream ended");
                        break;
                    }
                };

                match app.handle_event(event) {
                    Some(Action::Submit(line)) => {
                        debug!(code = %line, "Scanner line submitted");
                        handle.scan(line).await?;
                    }
                    Some(Action::Quit) => {
                        info!("Operator quit the kiosk");
                        break;
                    }
                    None => {}
                }
            }

            changed = snapshots.changed() => {
                if changed.is_err() {
                    warn!("Controller stopped publishing snapshots");
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                app.apply_snapshot(snapshot, Instant::now());
            }

            _ = focus_tick.tick() => app.on_focus_tick(),

            _ = redraw_tick.tick() => {}
        }
    }

    Ok(())
}
