//! Key bindings and mouse gestures.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Enter / Space: submit the slot row, or confirm in menus.
    Submit,
    /// Esc: drop a held fragment back where it came from, else open the quit menu.
    Cancel,
    Pause,
    Quit,
    Restart,
    Up,
    Down,
    None,
}

/// Left-button gesture in terminal cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Press { column: u16, row: u16 },
    Drag { column: u16, row: u16 },
    Release { column: u16, row: u16 },
}

/// Map key event to action. Normal (arrows) and vim (jk) keys both work.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Action::Quit,
            _ => Action::None,
        };
    }
    match code {
        KeyCode::Enter | KeyCode::Char(' ') => Action::Submit,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Char('p' | 'P') => Action::Pause,
        KeyCode::Char('q' | 'Q') => Action::Quit,
        KeyCode::Char('r' | 'R') => Action::Restart,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        _ => Action::None,
    }
}

/// Map mouse event to a gesture; only the left button drags fragments.
pub fn mouse_to_gesture(mouse: MouseEvent) -> Option<Gesture> {
    let MouseEvent { kind, column, row, .. } = mouse;
    match kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Gesture::Press { column, row }),
        MouseEventKind::Drag(MouseButton::Left) => Some(Gesture::Drag { column, row }),
        MouseEventKind::Up(MouseButton::Left) => Some(Gesture::Release { column, row }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new_with_kind(code, modifiers, KeyEventKind::Press)
    }

    fn mouse(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 12,
            row: 7,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_keys() {
        assert_eq!(key_to_action(key(KeyCode::Enter, KeyModifiers::NONE)), Action::Submit);
        assert_eq!(key_to_action(key(KeyCode::Char(' '), KeyModifiers::NONE)), Action::Submit);
        assert_eq!(key_to_action(key(KeyCode::Esc, KeyModifiers::NONE)), Action::Cancel);
        assert_eq!(key_to_action(key(KeyCode::Char('Q'), KeyModifiers::SHIFT)), Action::Quit);
        assert_eq!(key_to_action(key(KeyCode::Char('c'), KeyModifiers::CONTROL)), Action::Quit);
        assert_eq!(key_to_action(key(KeyCode::Char('j'), KeyModifiers::NONE)), Action::Down);
        assert_eq!(key_to_action(key(KeyCode::Char('x'), KeyModifiers::NONE)), Action::None);
    }

    #[test]
    fn test_left_button_gestures() {
        assert_eq!(
            mouse_to_gesture(mouse(MouseEventKind::Down(MouseButton::Left))),
            Some(Gesture::Press { column: 12, row: 7 })
        );
        assert_eq!(
            mouse_to_gesture(mouse(MouseEventKind::Drag(MouseButton::Left))),
            Some(Gesture::Drag { column: 12, row: 7 })
        );
        assert_eq!(
            mouse_to_gesture(mouse(MouseEventKind::Up(MouseButton::Left))),
            Some(Gesture::Release { column: 12, row: 7 })
        );
        assert_eq!(mouse_to_gesture(mouse(MouseEventKind::Down(MouseButton::Right))), None);
        assert_eq!(mouse_to_gesture(mouse(MouseEventKind::Moved)), None);
    }
}
