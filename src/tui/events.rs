//! Event Handling - keyboard and mouse input for the shell

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Actions that can be triggered by user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    ToggleTheme,
    OpenAbout,
    CloseOverlay,
    Retry,
    /// Not a shell key; hand it to the mounted view
    Forward,
    None,
}

/// Map a key to a shell action
///
/// While the overlay is open only quit and close are honored; everything
/// else is swallowed so the view underneath does not react.
pub fn handle_key_event(key: KeyEvent, overlay_open: bool) -> Action {
    if key.kind == KeyEventKind::Release {
        return Action::None;
    }

    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('q')) => return Action::Quit,
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Action::Quit,
        (_, KeyCode::Esc) if overlay_open => return Action::CloseOverlay,
        _ => {}
    }

    if overlay_open {
        return Action::None;
    }

    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Tab) => Action::NextView,
        (KeyModifiers::SHIFT, KeyCode::BackTab) | (KeyModifiers::NONE, KeyCode::BackTab) => {
            Action::PrevView
        }
        (KeyModifiers::CONTROL, KeyCode::Char('t')) => Action::ToggleTheme,
        (KeyModifiers::CONTROL, KeyCode::Char('r')) => Action::Retry,
        (_, KeyCode::F(1)) => Action::OpenAbout,
        _ => Action::Forward,
    }
}

/// Poll for terminal events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        return Ok(Some(event::read()?));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q'), KeyModifiers::CONTROL), false),
            Action::Quit
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL), true),
            Action::Quit
        );
    }

    #[test]
    fn test_plain_letters_go_to_view() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q'), KeyModifiers::NONE), false),
            Action::Forward
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Enter, KeyModifiers::NONE), false),
            Action::Forward
        );
    }

    #[test]
    fn test_navigation_and_chrome() {
        assert_eq!(
            handle_key_event(key(KeyCode::Tab, KeyModifiers::NONE), false),
            Action::NextView
        );
        assert_eq!(
            handle_key_event(key(KeyCode::BackTab, KeyModifiers::SHIFT), false),
            Action::PrevView
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('t'), KeyModifiers::CONTROL), false),
            Action::ToggleTheme
        );
        assert_eq!(
            handle_key_event(key(KeyCode::F(1), KeyModifiers::NONE), false),
            Action::OpenAbout
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('r'), KeyModifiers::CONTROL), false),
            Action::Retry
        );
    }

    #[test]
    fn test_overlay_swallows_view_keys() {
        assert_eq!(
            handle_key_event(key(KeyCode::Esc, KeyModifiers::NONE), true),
            Action::CloseOverlay
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Tab, KeyModifiers::NONE), true),
            Action::None
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Esc, KeyModifiers::NONE), false),
            Action::Forward
        );
    }
}
