use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEventKind};

/// Event handler for terminal events
///
/// Polls with the idle tick rate while the carousel is at rest and with the
/// animation frame duration while it is moving.
pub struct EventHandler {
    tick_rate: Duration,
    frame_rate: Duration,
    /// Raw delta reported per wheel notch
    wheel_delta: f64,
}

impl EventHandler {
    pub fn new(tick_rate: Duration, frame_rate: Duration, wheel_delta: f64) -> Self {
        Self {
            tick_rate,
            frame_rate,
            wheel_delta,
        }
    }

    /// Poll for the next event at the idle rate
    pub fn next(&self) -> Result<Option<AppEvent>> {
        self.poll(self.tick_rate)
    }

    /// Poll for the next event at the animation frame rate
    pub fn next_animation(&self) -> Result<Option<AppEvent>> {
        self.poll(self.frame_rate)
    }

    fn poll(&self, timeout: Duration) -> Result<Option<AppEvent>> {
        if event::poll(timeout)? {
            Ok(self.translate(event::read()?))
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }

    fn translate(&self, event: Event) -> Option<AppEvent> {
        match event {
            // Only handle key press events, ignore release events
            // (crossterm 0.27+ sends release events on some systems)
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => {
                    Some(AppEvent::Scroll(self.wheel_delta))
                }
                MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => {
                    Some(AppEvent::Scroll(-self.wheel_delta))
                }
                _ => None,
            },
            Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            _ => None,
        }
    }
}

/// Application events
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Mouse wheel moved by a raw delta
    Scroll(f64),
    /// Terminal was resized
    Resize(u16, u16),
    /// No input within the poll timeout
    Tick,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers, MouseEvent};

    fn handler() -> EventHandler {
        EventHandler::new(Duration::from_millis(250), Duration::from_millis(16), 40.0)
    }

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_wheel_maps_to_signed_delta() {
        let handler = handler();
        assert_eq!(
            handler.translate(mouse(MouseEventKind::ScrollDown)),
            Some(AppEvent::Scroll(40.0))
        );
        assert_eq!(
            handler.translate(mouse(MouseEventKind::ScrollUp)),
            Some(AppEvent::Scroll(-40.0))
        );
        assert_eq!(handler.translate(mouse(MouseEventKind::Moved)), None);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let handler = handler();
        let release = KeyEvent {
            code: KeyCode::Char('l'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(handler.translate(Event::Key(release)), None);

        let press = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE);
        assert_eq!(handler.translate(Event::Key(press)), Some(AppEvent::Key(press)));
    }
}
