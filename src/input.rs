use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::pattern::token::{ClickKind, Token};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSignal {
    Token(Token),
    Begin,
    Abort,
    ShowStats,
    Back,
    Quit,
}

pub fn map_key(key: &KeyEvent, in_session: bool) -> Option<InputSignal> {
    // Only presses count; repeats would inflate input
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return (key.code == KeyCode::Char('c')).then_some(InputSignal::Quit);
    }

    if in_session {
        return match key.code {
            KeyCode::Esc => Some(InputSignal::Abort),
            KeyCode::Char(ch) => Some(InputSignal::Token(Token::Char(ch))),
            KeyCode::F(n @ 1..=12) => Some(InputSignal::Token(Token::Function(n))),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(InputSignal::Begin),
        KeyCode::Char('s') => Some(InputSignal::ShowStats),
        KeyCode::Char('q') => Some(InputSignal::Quit),
        KeyCode::Esc => Some(InputSignal::Back),
        _ => None,
    }
}

pub fn map_mouse(mouse: &MouseEvent, in_session: bool) -> Option<InputSignal> {
    if !in_session {
        return None;
    }
    let MouseEventKind::Down(button) = mouse.kind else {
        return None;
    };
    let shift = mouse.modifiers.contains(KeyModifiers::SHIFT);
    let kind = match (button, shift) {
        (MouseButton::Left, false) => ClickKind::Left,
        (MouseButton::Left, true) => ClickKind::ShiftLeft,
        (MouseButton::Right, false) => ClickKind::Right,
        (MouseButton::Right, true) => ClickKind::ShiftRight,
        (MouseButton::Middle, _) => ClickKind::Middle,
    };
    Some(InputSignal::Token(Token::Click(kind)))
}
