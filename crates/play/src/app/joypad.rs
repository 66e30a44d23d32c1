//! NES controller byte layout and the keyboard table built from it.

use super::actions::KeysToAction;
use super::input::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoypadButton {
    A,
    B,
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
}

pub const BUTTON_COUNT: usize = 8;

impl JoypadButton {
    pub const ALL: [JoypadButton; BUTTON_COUNT] = [
        JoypadButton::A,
        JoypadButton::B,
        JoypadButton::Select,
        JoypadButton::Start,
        JoypadButton::Up,
        JoypadButton::Down,
        JoypadButton::Left,
        JoypadButton::Right,
    ];

    pub const fn mask(self) -> u8 {
        1 << self.bit()
    }

    const fn bit(self) -> u8 {
        match self {
            JoypadButton::A => 0,
            JoypadButton::B => 1,
            JoypadButton::Select => 2,
            JoypadButton::Start => 3,
            JoypadButton::Up => 4,
            JoypadButton::Down => 5,
            JoypadButton::Left => 6,
            JoypadButton::Right => 7,
        }
    }

    pub fn is_held(self, action: u8) -> bool {
        action & self.mask() != 0
    }
}

/// Byte sent to the console when nothing is held.
pub const JOYPAD_NO_OP: u8 = 0;

/// Keyboard key bound to each controller button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoypadBindings {
    pub a: Key,
    pub b: Key,
    pub select: Key,
    pub start: Key,
    pub up: Key,
    pub down: Key,
    pub left: Key,
    pub right: Key,
}

impl Default for JoypadBindings {
    fn default() -> Self {
        Self {
            a: Key::O,
            b: Key::P,
            select: Key::Space,
            start: Key::Enter,
            up: Key::W,
            down: Key::S,
            left: Key::A,
            right: Key::D,
        }
    }
}

impl JoypadBindings {
    pub fn key_for(&self, button: JoypadButton) -> Key {
        match button {
            JoypadButton::A => self.a,
            JoypadButton::B => self.b,
            JoypadButton::Select => self.select,
            JoypadButton::Start => self.start,
            JoypadButton::Up => self.up,
            JoypadButton::Down => self.down,
            JoypadButton::Left => self.left,
            JoypadButton::Right => self.right,
        }
    }

    /// Every combination of held buttons mapped to its controller byte.
    pub fn keys_to_action(&self) -> KeysToAction<u8> {
        (0..=u8::MAX)
            .map(|action| {
                let keys: Vec<Key> = JoypadButton::ALL
                    .iter()
                    .filter(|button| button.is_held(action))
                    .map(|button| self.key_for(*button))
                    .collect();
                (keys, action)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::actions::ActionTable;

    #[test]
    fn default_table_covers_every_controller_byte() {
        let mapping = JoypadBindings::default().keys_to_action();
        assert_eq!(mapping.len(), 256);
        assert_eq!(mapping.relevant_keys().len(), BUTTON_COUNT);
    }

    #[test]
    fn empty_combination_is_no_op() {
        let mapping = JoypadBindings::default().keys_to_action();
        assert_eq!(mapping.get(&[]), Some(&JOYPAD_NO_OP));
    }

    #[test]
    fn buttons_pack_into_expected_bits() {
        let table = ActionTable::new(JoypadBindings::default().keys_to_action(), JOYPAD_NO_OP);

        assert_eq!(table.resolve_combo(&[Key::O]), 0b0000_0001);
        assert_eq!(table.resolve_combo(&[Key::Enter]), 0b0000_1000);
        assert_eq!(table.resolve_combo(&[Key::D]), 0b1000_0000);
        assert_eq!(table.resolve_combo(&[Key::D, Key::O]), 0b1000_0001);
        assert_eq!(table.resolve_combo(&[Key::W, Key::P, Key::Space]), 0b0001_0110);
    }

    #[test]
    fn unbound_key_combination_falls_back() {
        let table = ActionTable::new(JoypadBindings::default().keys_to_action(), JOYPAD_NO_OP);
        assert_eq!(table.resolve_combo(&[Key::D, Key::Q]), JOYPAD_NO_OP);
    }

    #[test]
    fn held_bits_round_trip_through_buttons() {
        let action = JoypadButton::Up.mask() | JoypadButton::B.mask();
        let held: Vec<JoypadButton> = JoypadButton::ALL
            .into_iter()
            .filter(|button| button.is_held(action))
            .collect();
        assert_eq!(held, vec![JoypadButton::B, JoypadButton::Up]);
    }
}
