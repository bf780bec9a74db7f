use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Command(Command),
    SpeedUp,
    SlowDown,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Command(Direction::Up.into()),
            KeyCode::Down => KeyAction::Command(Direction::Down.into()),
            KeyCode::Left => KeyAction::Command(Direction::Left.into()),
            KeyCode::Right => KeyAction::Command(Direction::Right.into()),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Command(Direction::Up.into()),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Command(Direction::Down.into()),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Command(Direction::Left.into()),
            KeyCode::Char('d') | KeyCode::Char('D') => {
                KeyAction::Command(Direction::Right.into())
            }

            // Controls
            KeyCode::Char(' ') => KeyAction::Command(Command::TogglePlay),
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Command(Command::Reset),
            KeyCode::Char('+') | KeyCode::Char('=') => KeyAction::SpeedUp,
            KeyCode::Char('-') | KeyCode::Char('_') => KeyAction::SlowDown,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Up)),
            KeyAction::Command(Command::SetDirection(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Down)),
            KeyAction::Command(Command::SetDirection(Direction::Down))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Left)),
            KeyAction::Command(Command::SetDirection(Direction::Left))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Right)),
            KeyAction::Command(Command::SetDirection(Direction::Right))
        );
    }

    #[test]
    fn test_wasd_keys() {
        let handler = InputHandler::new();

        for (key, direction) in [
            ('w', Direction::Up),
            ('a', Direction::Left),
            ('s', Direction::Down),
            ('d', Direction::Right),
        ] {
            assert_eq!(
                handler.handle_key_event(press(KeyCode::Char(key))),
                KeyAction::Command(Command::SetDirection(direction))
            );
        }

        let w_upper = KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(w_upper),
            KeyAction::Command(Command::SetDirection(Direction::Up))
        );
    }

    #[test]
    fn test_play_and_reset_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char(' '))),
            KeyAction::Command(Command::TogglePlay)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('r'))),
            KeyAction::Command(Command::Reset)
        );
    }

    #[test]
    fn test_speed_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('+'))),
            KeyAction::SpeedUp
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('-'))),
            KeyAction::SlowDown
        );
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('q'))),
            KeyAction::Quit
        );
        assert_eq!(handler.handle_key_event(press(KeyCode::Esc)), KeyAction::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('x'))),
            KeyAction::None
        );
        assert_eq!(handler.handle_key_event(press(KeyCode::Tab)), KeyAction::None);
    }
}
