use std::collections::BTreeSet;

use winit::keyboard::{KeyCode, PhysicalKey};

/// Keyboard key as seen by the player loop.
///
/// Ordering is the declaration order; key combinations are always looked up in
/// that order so the same held keys produce the same combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Space,
    Tab,
    Backspace,
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    Escape,
}

impl Key {
    pub fn from_physical(key: PhysicalKey) -> Option<Self> {
        let PhysicalKey::Code(code) = key else {
            return None;
        };
        let key = match code {
            KeyCode::KeyA => Key::A,
            KeyCode::KeyB => Key::B,
            KeyCode::KeyC => Key::C,
            KeyCode::KeyD => Key::D,
            KeyCode::KeyE => Key::E,
            KeyCode::KeyF => Key::F,
            KeyCode::KeyG => Key::G,
            KeyCode::KeyH => Key::H,
            KeyCode::KeyI => Key::I,
            KeyCode::KeyJ => Key::J,
            KeyCode::KeyK => Key::K,
            KeyCode::KeyL => Key::L,
            KeyCode::KeyM => Key::M,
            KeyCode::KeyN => Key::N,
            KeyCode::KeyO => Key::O,
            KeyCode::KeyP => Key::P,
            KeyCode::KeyQ => Key::Q,
            KeyCode::KeyR => Key::R,
            KeyCode::KeyS => Key::S,
            KeyCode::KeyT => Key::T,
            KeyCode::KeyU => Key::U,
            KeyCode::KeyV => Key::V,
            KeyCode::KeyW => Key::W,
            KeyCode::KeyX => Key::X,
            KeyCode::KeyY => Key::Y,
            KeyCode::KeyZ => Key::Z,
            KeyCode::Digit0 => Key::Digit0,
            KeyCode::Digit1 => Key::Digit1,
            KeyCode::Digit2 => Key::Digit2,
            KeyCode::Digit3 => Key::Digit3,
            KeyCode::Digit4 => Key::Digit4,
            KeyCode::Digit5 => Key::Digit5,
            KeyCode::Digit6 => Key::Digit6,
            KeyCode::Digit7 => Key::Digit7,
            KeyCode::Digit8 => Key::Digit8,
            KeyCode::Digit9 => Key::Digit9,
            KeyCode::ArrowUp => Key::ArrowUp,
            KeyCode::ArrowDown => Key::ArrowDown,
            KeyCode::ArrowLeft => Key::ArrowLeft,
            KeyCode::ArrowRight => Key::ArrowRight,
            KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
            KeyCode::Space => Key::Space,
            KeyCode::Tab => Key::Tab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::ShiftLeft => Key::ShiftLeft,
            KeyCode::ShiftRight => Key::ShiftRight,
            KeyCode::ControlLeft => Key::ControlLeft,
            KeyCode::ControlRight => Key::ControlRight,
            KeyCode::Escape => Key::Escape,
            _ => return None,
        };
        Some(key)
    }
}

/// Discrete input delivered by a frontend once per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    Quit,
}

/// Outcome of feeding one event to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyInput {
    Handled,
    QuitRequested,
}

/// Set of currently held keys, restricted to the keys some action uses.
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    relevant: BTreeSet<Key>,
    pressed: BTreeSet<Key>,
}

impl KeySet {
    pub fn new(relevant: BTreeSet<Key>) -> Self {
        Self {
            relevant,
            pressed: BTreeSet::new(),
        }
    }

    pub fn on_key_down(&mut self, key: Key) -> bool {
        if !self.relevant.contains(&key) {
            return false;
        }
        self.pressed.insert(key);
        true
    }

    pub fn on_key_up(&mut self, key: Key) -> bool {
        self.pressed.remove(&key)
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn is_relevant(&self, key: Key) -> bool {
        self.relevant.contains(&key)
    }

    /// Held keys in ascending order.
    pub fn sorted(&self) -> Vec<Key> {
        self.pressed.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.pressed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }

    // Escape only quits when no action claims it.
    pub(crate) fn handle_event(&mut self, event: InputEvent) -> KeyInput {
        match event {
            InputEvent::KeyDown(key) => {
                if !self.on_key_down(key) && key == Key::Escape {
                    return KeyInput::QuitRequested;
                }
                KeyInput::Handled
            }
            InputEvent::KeyUp(key) => {
                self.on_key_up(key);
                KeyInput::Handled
            }
            InputEvent::Quit => KeyInput::QuitRequested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(keys: &[Key]) -> KeySet {
        KeySet::new(keys.iter().copied().collect())
    }

    #[test]
    fn irrelevant_key_down_is_ignored() {
        let mut keys = tracker(&[Key::W]);
        assert!(!keys.on_key_down(Key::Q));
        assert!(keys.is_empty());
    }

    #[test]
    fn key_up_of_unpressed_key_is_noop() {
        let mut keys = tracker(&[Key::W]);
        assert!(!keys.on_key_up(Key::W));
        assert!(!keys.on_key_up(Key::Q));
        assert!(keys.is_empty());
    }

    #[test]
    fn repeated_key_down_keeps_single_entry() {
        let mut keys = tracker(&[Key::W]);
        keys.on_key_down(Key::W);
        keys.on_key_down(Key::W);
        assert_eq!(keys.len(), 1);

        keys.on_key_up(Key::W);
        assert!(!keys.is_pressed(Key::W));
    }

    #[test]
    fn sorted_is_independent_of_press_order() {
        let mut first = tracker(&[Key::A, Key::O, Key::W]);
        first.on_key_down(Key::W);
        first.on_key_down(Key::A);
        first.on_key_down(Key::O);

        let mut second = tracker(&[Key::A, Key::O, Key::W]);
        second.on_key_down(Key::O);
        second.on_key_down(Key::W);
        second.on_key_down(Key::A);

        assert_eq!(first.sorted(), second.sorted());
        assert_eq!(first.sorted(), vec![Key::A, Key::O, Key::W]);
    }

    #[test]
    fn escape_requests_quit_unless_claimed() {
        let mut keys = tracker(&[Key::W]);
        assert_eq!(
            keys.handle_event(InputEvent::KeyDown(Key::Escape)),
            KeyInput::QuitRequested
        );

        let mut claimed = tracker(&[Key::Escape]);
        assert_eq!(
            claimed.handle_event(InputEvent::KeyDown(Key::Escape)),
            KeyInput::Handled
        );
        assert!(claimed.is_pressed(Key::Escape));
    }

    #[test]
    fn escape_release_does_not_quit() {
        let mut keys = tracker(&[Key::W]);
        assert_eq!(
            keys.handle_event(InputEvent::KeyUp(Key::Escape)),
            KeyInput::Handled
        );
    }

    #[test]
    fn quit_event_requests_quit() {
        let mut keys = tracker(&[]);
        assert_eq!(keys.handle_event(InputEvent::Quit), KeyInput::QuitRequested);
    }

    #[test]
    fn wasd_and_arrow_physical_keys_map_to_keys() {
        assert_eq!(
            Key::from_physical(PhysicalKey::Code(KeyCode::KeyW)),
            Some(Key::W)
        );
        assert_eq!(
            Key::from_physical(PhysicalKey::Code(KeyCode::ArrowLeft)),
            Some(Key::ArrowLeft)
        );
        assert_eq!(
            Key::from_physical(PhysicalKey::Code(KeyCode::NumpadEnter)),
            Some(Key::Enter)
        );
        assert_eq!(Key::from_physical(PhysicalKey::Code(KeyCode::F3)), None);
    }
}
