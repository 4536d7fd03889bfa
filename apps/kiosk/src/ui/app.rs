//! Screen state and event handling

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use pricecheck_core::AppStatus;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use super::input::{FocusPolicy, FocusReason, ScannerInput};
use crate::state::{KioskSettings, KioskSnapshot};

/// How long the "code detected" confirmation stays up after a success.
pub const SUCCESS_PULSE: Duration = Duration::from_millis(1500);

/// What the event loop should do after an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Submit(String),
    Quit,
}

/// Everything the view needs besides the terminal.
pub struct KioskApp {
    pub title: String,
    pub currency_symbol: String,
    pub snapshot: KioskSnapshot,
    pub input: ScannerInput,
    pub focus: FocusPolicy,
    /// Until when the success confirmation shows.
    pub pulse_until: Option<Instant>,
    /// When the current lookup started, for the spinner.
    pub loading_since: Option<Instant>,
}

impl KioskApp {
    /// Builds the screen state and claims focus for the input.
    pub fn new(settings: &KioskSettings, snapshot: KioskSnapshot) -> Self {
        let mut focus = FocusPolicy::new(settings.focus_interval());
        focus.claim(FocusReason::Mount);

        KioskApp {
            title: settings.title.clone(),
            currency_symbol: settings.currency_symbol.clone(),
            snapshot,
            input: ScannerInput::new(),
            focus,
            pulse_until: None,
            loading_since: None,
        }
    }

    pub fn status(&self) -> AppStatus {
        self.snapshot.session.status
    }

    /// Keystrokes are dropped while a lookup is in flight.
    pub fn input_enabled(&self) -> bool {
        self.status() != AppStatus::Loading
    }

    pub fn pulse_active(&self, now: Instant) -> bool {
        self.pulse_until.is_some_and(|until| now < until)
    }

    /// Applies a snapshot published by the controller.
    pub fn apply_snapshot(&mut self, snapshot: KioskSnapshot, now: Instant) {
        let previous = (self.status(), self.snapshot.session.epoch);
        let next = snapshot.session.status;
        let same_cycle = previous == (next, snapshot.session.epoch);
        self.snapshot = snapshot;

        // The watch channel only keeps the latest value, so a fast lookup can
        // skip Loading entirely; a new epoch counts as a transition.
        if same_cycle {
            return;
        }

        match next {
            AppStatus::Loading => self.loading_since = Some(now),
            AppStatus::Success => {
                self.loading_since = None;
                self.pulse_until = Some(now + SUCCESS_PULSE);
            }
            AppStatus::Idle => {
                self.loading_since = None;
                self.pulse_until = None;
                self.focus.claim(FocusReason::Idle);
            }
            AppStatus::NotFound | AppStatus::Error => self.loading_since = None,
        }
    }

    /// Interval tick of the focus policy.
    pub fn on_focus_tick(&mut self) {
        if self.focus.claim(FocusReason::Interval) {
            debug!("Scanner input focus reclaimed");
        }
    }

    /// Handles one terminal event.
    pub fn handle_event(&mut self, event: Event) -> Option<Action> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => {
                if matches!(mouse.kind, MouseEventKind::Down(_)) {
                    self.focus.claim(FocusReason::Click);
                }
                None
            }
            Event::FocusLost => {
                self.focus.release();
                None
            }
            Event::FocusGained => {
                self.focus.claim(FocusReason::Regained);
                None
            }
            Event::Paste(text) => {
                if self.input_enabled() {
                    self.input.insert_str(&text);
                }
                None
            }
            _ => None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let has_ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return Some(Action::Quit),
            KeyCode::Char('c') if has_ctrl => return Some(Action::Quit),
            _ => {}
        }

        if !self.input_enabled() {
            return None;
        }

        match key.code {
            KeyCode::Enter => self.input.submit().map(Action::Submit),
            code => {
                self.input.handle_key(code, key.modifiers);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseButton, MouseEvent};
    use pricecheck_core::{LookupOutcome, Money, Product, Session, SessionSnapshot};

    fn press(code: KeyCode) -> Event {
        press_with(code, KeyModifiers::NONE)
    }

    fn press_with(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn snapshot(status: AppStatus) -> KioskSnapshot {
        KioskSnapshot {
            session: SessionSnapshot {
                status,
                ..SessionSnapshot::default()
            },
            reset_at: None,
        }
    }

    fn app() -> KioskApp {
        KioskApp::new(&KioskSettings::default(), KioskSnapshot::default())
    }

    fn type_line(app: &mut KioskApp, line: &str) -> Option<Action> {
        for c in line.chars() {
            app.handle_event(press(KeyCode::Char(c)));
        }
        app.handle_event(press(KeyCode::Enter))
    }

    #[test]
    fn test_focus_claimed_on_mount() {
        let app = app();
        assert!(app.focus.has_focus());
        assert_eq!(app.focus.last_claim(), Some(FocusReason::Mount));
    }

    #[test]
    fn test_enter_submits_trimmed_line() {
        let mut app = app();
        let action = type_line(&mut app, " 7791234567890 ");
        assert_eq!(action, Some(Action::Submit("7791234567890".to_string())));
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_blank_enter_submits_nothing() {
        let mut app = app();
        assert_eq!(type_line(&mut app, "  "), None);
    }

    #[test]
    fn test_keys_dropped_while_loading() {
        let mut app = app();
        app.apply_snapshot(snapshot(AppStatus::Loading), Instant::now());

        assert_eq!(type_line(&mut app, "123"), None);
        assert!(app.input.is_empty());

        app.handle_event(Event::Paste("123".to_string()));
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_escape_and_ctrl_c_quit() {
        let mut app = app();
        assert_eq!(app.handle_event(press(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(
            app.handle_event(press_with(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );

        // Quitting works even while loading
        app.apply_snapshot(snapshot(AppStatus::Loading), Instant::now());
        assert_eq!(app.handle_event(press(KeyCode::Esc)), Some(Action::Quit));
    }

    #[test]
    fn test_focus_follows_terminal_and_mouse() {
        let mut app = app();
        app.handle_event(Event::FocusLost);
        assert!(!app.focus.has_focus());

        app.handle_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        }));
        assert!(app.focus.has_focus());
        assert_eq!(app.focus.last_claim(), Some(FocusReason::Click));

        app.handle_event(Event::FocusLost);
        app.on_focus_tick();
        assert!(app.focus.has_focus());
        assert_eq!(app.focus.last_claim(), Some(FocusReason::Interval));
    }

    #[test]
    fn test_idle_reclaims_focus() {
        let mut app = app();
        let now = Instant::now();
        app.apply_snapshot(snapshot(AppStatus::Loading), now);
        app.apply_snapshot(snapshot(AppStatus::NotFound), now);
        app.handle_event(Event::FocusLost);

        app.apply_snapshot(snapshot(AppStatus::Idle), now);
        assert!(app.focus.has_focus());
        assert_eq!(app.focus.last_claim(), Some(FocusReason::Idle));
    }

    #[test]
    fn test_back_to_back_successes_restart_pulse() {
        let mut session = Session::new();
        let product = Product::new("1", "123", "Cafe", Money::from_cents(1950));

        let first = session.submit_scan("123").unwrap();
        session.resolve(first.epoch, LookupOutcome::Found(product.clone()));
        let first_success = session.snapshot();

        let second = session.submit_scan("123").unwrap();
        session.resolve(second.epoch, LookupOutcome::Found(product));
        let second_success = session.snapshot();

        let mut app = app();
        let now = Instant::now();
        app.apply_snapshot(
            KioskSnapshot { session: first_success, reset_at: None },
            now,
        );

        // Loading for the second scan was never observed
        let later = now + Duration::from_secs(3);
        app.apply_snapshot(
            KioskSnapshot { session: second_success, reset_at: None },
            later,
        );
        assert!(app.pulse_active(later + Duration::from_millis(1000)));
        assert!(app.loading_since.is_none());
    }

    #[test]
    fn test_same_snapshot_does_not_restart_pulse() {
        let mut app = app();
        let now = Instant::now();
        app.apply_snapshot(snapshot(AppStatus::Success), now);
        app.apply_snapshot(snapshot(AppStatus::Success), now + Duration::from_secs(1));
        assert!(!app.pulse_active(now + Duration::from_millis(1600)));
    }

    #[test]
    fn test_success_pulse_lasts_one_and_a_half_seconds() {
        let mut app = app();
        let now = Instant::now();
        app.apply_snapshot(snapshot(AppStatus::Loading), now);
        assert!(app.loading_since.is_some());

        app.apply_snapshot(snapshot(AppStatus::Success), now);
        assert!(app.loading_since.is_none());
        assert!(app.pulse_active(now + Duration::from_millis(1400)));
        assert!(!app.pulse_active(now + Duration::from_millis(1500)));
    }
}
