//! Keyboard and resize handling.
//!
//! The handler runs on its own thread, independent of the game's tick
//! cadence. Steering goes through a latest-wins [`Steering`] slot that the
//! game loop drains once per tick; everything else is sent as a [`Control`]
//! over a channel.

use std::io;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, error, info};

use crate::grid::Heading;

/// Non-steering input the game loop reacts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Control {
    Resize,
    Quit,
    PlayAgain(bool),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Steer(Heading),
    Control(Control),
}

/// Single-slot handoff of the most recent heading request.
#[derive(Clone, Default)]
pub struct Steering {
    slot: Arc<Mutex<Option<Heading>>>,
}

impl Steering {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self, heading: Heading) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(heading);
    }

    pub fn take(&self) -> Option<Heading> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

pub fn map_event(ev: &Event) -> Option<Input> {
    match ev {
        Event::Resize(_, _) => Some(Input::Control(Control::Resize)),
        Event::Key(key) if key.kind == KeyEventKind::Press => map_key(key),
        _ => None,
    }
}

fn map_key(key: &KeyEvent) -> Option<Input> {
    if is_ctrl_c(key) {
        return Some(Input::Control(Control::Quit));
    }

    let input = match key.code {
        KeyCode::Up => Input::Steer(Heading::UP),
        KeyCode::Down => Input::Steer(Heading::DOWN),
        KeyCode::Left => Input::Steer(Heading::LEFT),
        KeyCode::Right => Input::Steer(Heading::RIGHT),
        KeyCode::Char('y') | KeyCode::Char('Y') => Input::Control(Control::PlayAgain(true)),
        KeyCode::Char('n') | KeyCode::Char('N') => Input::Control(Control::PlayAgain(false)),
        _ => return None,
    };
    Some(input)
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

pub struct InputHandler {
    steering: Steering,
    controls: Sender<Control>,
}

impl InputHandler {
    pub fn new(steering: Steering, controls: Sender<Control>) -> Self {
        InputHandler { steering, controls }
    }

    pub fn spawn(self) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("input".into())
            .spawn(move || self.run())
    }

    fn run(self) {
        info!("input handler started");

        loop {
            let ev = match event::read() {
                Ok(ev) => ev,
                Err(e) => {
                    error!("reading terminal events failed: {}", e);
                    break;
                }
            };

            if !self.dispatch(&ev) {
                break;
            }
        }

        info!("input handler stopped");
    }

    /// Returns false once the game side has hung up.
    fn dispatch(&self, ev: &Event) -> bool {
        match map_event(ev) {
            Some(Input::Steer(heading)) => {
                debug!(?heading, "steer");
                self.steering.request(heading);
                true
            }
            Some(Input::Control(control)) => self.controls.send(control).is_ok(),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn press(code: KeyCode, mods: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, mods))
    }

    #[test]
    fn test_arrow_keys_steer() {
        let none = KeyModifiers::NONE;
        assert_eq!(map_event(&press(KeyCode::Up, none)), Some(Input::Steer(Heading::UP)));
        assert_eq!(map_event(&press(KeyCode::Down, none)), Some(Input::Steer(Heading::DOWN)));
        assert_eq!(map_event(&press(KeyCode::Left, none)), Some(Input::Steer(Heading::LEFT)));
        assert_eq!(map_event(&press(KeyCode::Right, none)), Some(Input::Steer(Heading::RIGHT)));
    }

    #[test]
    fn test_ctrl_c_quits() {
        let ev = press(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_event(&ev), Some(Input::Control(Control::Quit)));

        // Plain 'c' is just another key.
        assert_eq!(map_event(&press(KeyCode::Char('c'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_play_again_answers() {
        let ev = press(KeyCode::Char('y'), KeyModifiers::NONE);
        assert_eq!(map_event(&ev), Some(Input::Control(Control::PlayAgain(true))));
        let ev = press(KeyCode::Char('N'), KeyModifiers::SHIFT);
        assert_eq!(map_event(&ev), Some(Input::Control(Control::PlayAgain(false))));
    }

    #[test]
    fn test_resize_and_ignored_events() {
        assert_eq!(map_event(&Event::Resize(80, 24)), Some(Input::Control(Control::Resize)));
        assert_eq!(map_event(&press(KeyCode::Esc, KeyModifiers::NONE)), None);
        assert_eq!(map_event(&Event::FocusGained), None);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut key = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(map_event(&Event::Key(key)), None);
    }

    #[test]
    fn test_steering_keeps_latest() {
        let steering = Steering::new();
        assert_eq!(steering.take(), None);

        steering.request(Heading::UP);
        steering.request(Heading::LEFT);
        assert_eq!(steering.take(), Some(Heading::LEFT));
        assert_eq!(steering.take(), None);
    }

    #[test]
    fn test_dispatch_routes_inputs() {
        let (tx, rx) = mpsc::channel();
        let steering = Steering::new();
        let handler = InputHandler::new(steering.clone(), tx);

        assert!(handler.dispatch(&press(KeyCode::Down, KeyModifiers::NONE)));
        assert!(handler.dispatch(&Event::Resize(10, 10)));
        assert_eq!(steering.take(), Some(Heading::DOWN));
        assert_eq!(rx.try_recv(), Ok(Control::Resize));

        drop(rx);
        assert!(!handler.dispatch(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }
}
