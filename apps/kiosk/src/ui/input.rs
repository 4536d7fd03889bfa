//! Scanner input line and focus policy

use crossterm::event::{KeyCode, KeyModifiers};
use std::time::Duration;

/// Single-line buffer a hardware scanner types into.
///
/// Scanners act as keyboards: they type the code and press Enter.
#[derive(Debug, Default, Clone)]
pub struct ScannerInput {
    pub text: String,
    pub cursor: usize,
}

impl ScannerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a character at the cursor position
    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert pasted text, dropping line breaks
    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars().filter(|c| *c != '\n' && *c != '\r') {
            self.insert_char(c);
        }
    }

    /// Delete the character before the cursor
    pub fn delete_char_before(&mut self) {
        if self.cursor > 0 {
            let prev = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    /// Delete the character at the cursor
    pub fn delete_char_at(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.text.drain(self.cursor..self.cursor + c.len_utf8());
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Enter: takes the trimmed line and clears the buffer.
    ///
    /// A blank line is left in place and nothing is submitted.
    pub fn submit(&mut self) -> Option<String> {
        let code = self.text.trim();
        if code.is_empty() {
            return None;
        }
        let code = code.to_string();
        self.clear();
        Some(code)
    }

    /// Handle an editing key. Returns true if the key was consumed.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        let has_ctrl = modifiers.contains(KeyModifiers::CONTROL);
        let has_alt = modifiers.contains(KeyModifiers::ALT);

        match code {
            // Ctrl+U: clear all
            KeyCode::Char('u') if has_ctrl => self.clear(),
            KeyCode::Char('a') if has_ctrl => self.move_start(),
            KeyCode::Char('e') if has_ctrl => self.move_end(),
            KeyCode::Home => self.move_start(),
            KeyCode::End => self.move_end(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Backspace => self.delete_char_before(),
            KeyCode::Delete => self.delete_char_at(),
            KeyCode::Char(c) if !has_ctrl && !has_alt => self.insert_char(c),
            _ => return false,
        }
        true
    }
}

// =============================================================================
// Focus Policy
// =============================================================================

/// Why the input claimed focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusReason {
    Mount,
    Click,
    Idle,
    Interval,
    /// The terminal reported focus coming back.
    Regained,
}

/// Keeps the scanner input focused so scanner keystrokes land in it.
///
/// Focus is claimed on mount, on any mouse click, whenever the kiosk
/// returns to idle, and on every interval tick. A terminal focus-lost event
/// releases it until the next claim.
#[derive(Debug, Clone)]
pub struct FocusPolicy {
    focused: bool,
    interval: Duration,
    last_claim: Option<FocusReason>,
}

impl FocusPolicy {
    pub fn new(interval: Duration) -> Self {
        FocusPolicy {
            focused: false,
            interval,
            last_claim: None,
        }
    }

    /// How often `Interval` claims happen.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Claims focus. Returns true if focus was not already held.
    pub fn claim(&mut self, reason: FocusReason) -> bool {
        self.last_claim = Some(reason);
        let gained = !self.focused;
        self.focused = true;
        gained
    }

    pub fn release(&mut self) {
        self.focused = false;
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    pub fn last_claim(&self) -> Option<FocusReason> {
        self.last_claim
    }
}
