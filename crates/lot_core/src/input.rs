//! Keyboard and pointer state with both level-triggered and edge-triggered
//! queries.
//!
//! - **Level-triggered (held):** `is_held(key)` is true every frame the key is
//!   physically down. The spot selector (row letter + column digit) and the
//!   modifier keys are read this way.
//!
//! - **Edge-triggered (just_pressed):** true from the press until the next
//!   `end_frame()`, even if the key was released in between. The shell keys
//!   (Escape, F3) are read this way once per event batch.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    A,
    B,
    Digit1,
    Digit2,
    Digit3,
    Shift,
    Control,
    Escape,
    F3,
}

/// Modifier combination derived from the held Shift/Control keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        control: false,
    };
    pub const CONTROL: Modifiers = Modifiers {
        shift: false,
        control: true,
    };
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,

    /// Last cursor position in window coordinates (origin top-left).
    pub mouse_position: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            mouse_position: (0.0, 0.0),
        }
    }

    /// Returns true if this was a fresh press (not an OS key repeat).
    pub fn key_down(&mut self, key: Key) -> bool {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
            return true;
        }
        false
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn modifiers(&self) -> Modifiers {
        Modifiers {
            shift: self.is_held(Key::Shift),
            control: self.is_held(Key::Control),
        }
    }

    /// Row picked by the held row keys; `A` wins over `B`.
    pub fn selected_row(&self) -> Option<usize> {
        if self.is_held(Key::A) {
            Some(0)
        } else if self.is_held(Key::B) {
            Some(1)
        } else {
            None
        }
    }

    /// Column picked by the held digit keys; lower digits win.
    pub fn selected_column(&self) -> Option<usize> {
        [Key::Digit1, Key::Digit2, Key::Digit3]
            .iter()
            .position(|&key| self.is_held(key))
    }

    /// Drop everything held, e.g. when the window loses focus and the
    /// matching key-up events will never arrive.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        assert!(input.key_down(Key::A));
        assert!(input.is_held(Key::A));
        assert!(input.is_just_pressed(Key::A));
    }

    #[test]
    fn test_key_repeat_is_not_a_fresh_press() {
        let mut input = InputState::new();
        assert!(input.key_down(Key::Digit1));
        input.end_frame();
        assert!(!input.key_down(Key::Digit1));
        assert!(input.is_held(Key::Digit1));
        assert!(!input.is_just_pressed(Key::Digit1));
    }

    #[test]
    fn test_key_up_clears_held() {
        let mut input = InputState::new();
        input.key_down(Key::B);
        input.key_up(Key::B);
        assert!(!input.is_held(Key::B));
    }

    #[test]
    fn test_tap_within_one_batch_is_still_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::F3);
        input.key_up(Key::F3);
        assert!(!input.is_held(Key::F3));
        assert!(input.is_just_pressed(Key::F3));
        input.end_frame();
        assert!(!input.is_just_pressed(Key::F3));
    }

    #[test]
    fn test_end_frame_clears_transient_state() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.key_down(Key::Escape);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::A));
        assert!(!input.is_just_pressed(Key::Escape));
        assert!(input.is_held(Key::A));
        assert!(input.is_held(Key::Escape));
    }

    #[test]
    fn test_selector_priority() {
        let mut input = InputState::new();
        assert_eq!(input.selected_row(), None);
        assert_eq!(input.selected_column(), None);

        input.key_down(Key::B);
        input.key_down(Key::Digit3);
        assert_eq!(input.selected_row(), Some(1));
        assert_eq!(input.selected_column(), Some(2));

        input.key_down(Key::A);
        input.key_down(Key::Digit2);
        assert_eq!(input.selected_row(), Some(0));
        assert_eq!(input.selected_column(), Some(1));
    }

    #[test]
    fn test_modifiers_follow_held_keys() {
        let mut input = InputState::new();
        assert_eq!(input.modifiers(), Modifiers::NONE);
        input.key_down(Key::Shift);
        assert_eq!(input.modifiers(), Modifiers::SHIFT);
        input.key_up(Key::Shift);
        input.key_down(Key::Control);
        assert_eq!(input.modifiers(), Modifiers::CONTROL);
    }

    #[test]
    fn test_release_all_clears_held() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.key_down(Key::Digit1);
        input.key_down(Key::Shift);
        input.release_all();
        assert_eq!(input.selected_row(), None);
        assert_eq!(input.selected_column(), None);
        assert_eq!(input.modifiers(), Modifiers::NONE);
    }
}
