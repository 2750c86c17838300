use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::clock::Clock;
use crate::session::state::Session;

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

/// Polls the terminal on a background thread, emitting a `Tick` whenever
/// `tick_rate` passes without a key so the timer can be checked.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    _tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let _tx = tx.clone();

        thread::spawn(move || {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(Event::Key(key)) = event::read() {
                        if tx.send(AppEvent::Key(key)).is_err() {
                            return;
                        }
                    }
                } else if tx.send(AppEvent::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx, _tx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

/// What a terminal key means to a practice session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Type(char),
    Backspace,
    Skip,
    Quit,
    Ignore,
}

impl KeyAction {
    pub fn from_key_event(key: KeyEvent) -> Self {
        if key.kind == KeyEventKind::Release {
            return KeyAction::Ignore;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => KeyAction::Quit,
                _ => KeyAction::Ignore,
            };
        }
        match key.code {
            KeyCode::Esc => KeyAction::Quit,
            KeyCode::Backspace => KeyAction::Backspace,
            KeyCode::Tab => KeyAction::Skip,
            KeyCode::Char(ch) => KeyAction::Type(ch),
            _ => KeyAction::Ignore,
        }
    }

    /// Feeds the action to `session`, starting it on the first keystroke.
    /// Returns whether the session accepted the input.
    pub fn apply<C: Clock>(self, session: &mut Session<C>) -> bool {
        match self {
            KeyAction::Type(_) | KeyAction::Backspace | KeyAction::Skip => {
                session.start();
            }
            KeyAction::Quit | KeyAction::Ignore => return false,
        }
        match self {
            KeyAction::Type(ch) => session.handle_character(ch),
            KeyAction::Backspace => session.handle_backspace(),
            KeyAction::Skip => session.handle_skip(),
            KeyAction::Quit | KeyAction::Ignore => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::clock::ManualClock;
    use crate::session::state::SessionStatus;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(KeyAction::from_key_event(press(KeyCode::Char('a'))), KeyAction::Type('a'));
        assert_eq!(KeyAction::from_key_event(press(KeyCode::Char(' '))), KeyAction::Type(' '));
        assert_eq!(KeyAction::from_key_event(press(KeyCode::Backspace)), KeyAction::Backspace);
        assert_eq!(KeyAction::from_key_event(press(KeyCode::Tab)), KeyAction::Skip);
        assert_eq!(KeyAction::from_key_event(press(KeyCode::Esc)), KeyAction::Quit);
        assert_eq!(KeyAction::from_key_event(press(KeyCode::Left)), KeyAction::Ignore);
    }

    #[test]
    fn test_ctrl_c_quits_and_other_chords_ignored() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(KeyAction::from_key_event(ctrl_c), KeyAction::Quit);
        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(KeyAction::from_key_event(ctrl_a), KeyAction::Ignore);
    }

    #[test]
    fn test_release_events_ignored() {
        let mut release = press(KeyCode::Char('a'));
        release.kind = KeyEventKind::Release;
        assert_eq!(KeyAction::from_key_event(release), KeyAction::Ignore);
    }

    #[test]
    fn test_first_keystroke_starts_session() {
        let mut session = Session::with_clock(ManualClock::new());
        session
            .initialize(vec!["hi".to_string()], 30.0, "event-test")
            .unwrap();
        assert_eq!(session.status(), SessionStatus::Idle);

        assert!(KeyAction::Type('h').apply(&mut session));
        assert_eq!(session.status(), SessionStatus::Active);
        assert_eq!(session.current_input(), "h");
    }

    #[test]
    fn test_quit_does_not_start_session() {
        let mut session = Session::with_clock(ManualClock::new());
        session
            .initialize(vec!["hi".to_string()], 30.0, "event-test")
            .unwrap();
        assert!(!KeyAction::Quit.apply(&mut session));
        assert_eq!(session.status(), SessionStatus::Idle);
    }
}
