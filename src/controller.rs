use std::time::Duration;
use tracing::trace;

use crate::domain::{AppConfig, DruidError, Message};
use ratatui::crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &AppConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self) -> Result<Option<Message>, DruidError> {
        if event::poll(Duration::from_millis(self.event_poll_time))? {
            return Ok(self.map_event(event::read()?));
        }
        Ok(None)
    }

    fn map_event(&self, event: Event) -> Option<Message> {
        match event {
            // crossterm also reports key release and repeat events on Windows.
            Event::Key(key) if key.kind == event::KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => Some(Message::Resize(width, height)),
            _ => None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Option<Message> {
        let message = match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Message::Quit),
            (KeyCode::Char('q'), _) => Some(Message::Quit),
            (KeyCode::Down | KeyCode::Char('j'), _) => Some(Message::MoveDown),
            (KeyCode::Up | KeyCode::Char('k'), _) => Some(Message::MoveUp),
            (KeyCode::Left | KeyCode::Char('h'), _) => Some(Message::MoveLeft),
            (KeyCode::Right | KeyCode::Char('l'), _) => Some(Message::MoveRight),
            (KeyCode::PageDown, _) => Some(Message::MovePageDown),
            (KeyCode::PageUp, _) => Some(Message::MovePageUp),
            (KeyCode::Home | KeyCode::Char('g'), _) => Some(Message::MoveBeginning),
            (KeyCode::End | KeyCode::Char('G'), _) => Some(Message::MoveEnd),
            (KeyCode::Enter, _) => Some(Message::Enter),
            (KeyCode::Esc, _) => Some(Message::Exit),
            (KeyCode::Char('s'), _) => Some(Message::SortBySize),
            (KeyCode::Char('n'), _) => Some(Message::SortByName),
            (KeyCode::Char('o'), _) => Some(Message::SortCurrentColumn),
            (KeyCode::Tab, _) => Some(Message::NextTab),
            (KeyCode::Char('J'), _) => Some(Message::ScrollDetailsDown),
            (KeyCode::Char('K'), _) => Some(Message::ScrollDetailsUp),
            (KeyCode::Char('y'), _) => Some(Message::CopyRecord),
            (KeyCode::Char('?'), _) => Some(Message::Help),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }

    fn handle_mouse(&self, mouse: MouseEvent) -> Option<Message> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Message::Click(mouse.column, mouse.row)),
            MouseEventKind::ScrollDown => Some(Message::MoveDown),
            MouseEventKind::ScrollUp => Some(Message::MoveUp),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> Controller {
        Controller::new(&AppConfig::default())
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn keys_map_to_messages() {
        let c = controller();
        assert_eq!(c.map_event(key(KeyCode::Char('q'))), Some(Message::Quit));
        assert_eq!(c.map_event(key(KeyCode::Char('s'))), Some(Message::SortBySize));
        assert_eq!(c.map_event(key(KeyCode::Char('n'))), Some(Message::SortByName));
        assert_eq!(c.map_event(key(KeyCode::Enter)), Some(Message::Enter));
        assert_eq!(c.map_event(key(KeyCode::Char('j'))), Some(Message::MoveDown));
        assert_eq!(c.map_event(key(KeyCode::Char('x'))), None);
        assert_eq!(
            c.map_event(Event::Key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL
            ))),
            Some(Message::Quit)
        );
    }

    #[test]
    fn mouse_and_resize_map_to_messages() {
        let c = controller();
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 7,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(c.map_event(Event::Mouse(click)), Some(Message::Click(7, 4)));
        let right = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Right),
            ..click
        };
        assert_eq!(c.map_event(Event::Mouse(right)), None);
        assert_eq!(c.map_event(Event::Resize(80, 24)), Some(Message::Resize(80, 24)));
    }
}
