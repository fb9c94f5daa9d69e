use std::fmt;

use crate::coords::Vec2;

/// Keys the studio binds, plus modifiers; everything else maps to `Unknown`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,

    Shift,
    Control,
    Alt,
    Meta,

    C,
    E,
    Q,
    Z,

    Digit1,
    Digit2,
    Digit3,

    Unknown,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: MouseButtonState,
    /// Pointer position in physical pixels at the time of the event.
    pub position: Vec2,
    pub modifiers: Modifiers,
}

/// Platform-agnostic input event. Positions are in physical pixels with the
/// origin at the top-left corner of the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        /// True when the event is a key-repeat.
        repeat: bool,
    },

    PointerMoved(Vec2),
    PointerButton(PointerButtonEvent),

    /// Wheel movement in lines (pixel deltas are converted by the platform
    /// layer). Positive `y` scrolls up.
    MouseWheel {
        delta: Vec2,
        modifiers: Modifiers,
    },

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
