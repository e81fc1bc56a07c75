//! Platform-neutral event model
//!
//! Platform backends translate native input into [`Event`]s; widgets and
//! their state machines consume them. Event types are plain `u32`s so they
//! can double as state machine inputs.

use crate::layer::Point;

/// Event type identifier
pub type EventType = u32;

/// Standard event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_ENTER: EventType = 1;
    pub const POINTER_LEAVE: EventType = 2;
    pub const POINTER_DOWN: EventType = 3;
    pub const POINTER_UP: EventType = 4;
    pub const POINTER_MOVE: EventType = 5;

    pub const KEY_DOWN: EventType = 10;
    pub const TEXT_INPUT: EventType = 12;

    pub const FOCUS: EventType = 20;
    pub const BLUR: EventType = 21;
}

/// Mouse button indices carried in pointer events
pub struct MouseButton;

impl MouseButton {
    pub const PRIMARY: u8 = 0;
    pub const SECONDARY: u8 = 1;
}

/// Virtual key code
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const BACKSPACE: KeyCode = KeyCode(8);
    pub const END: KeyCode = KeyCode(35);
    pub const HOME: KeyCode = KeyCode(36);
    pub const LEFT: KeyCode = KeyCode(37);
    pub const UP: KeyCode = KeyCode(38);
    pub const RIGHT: KeyCode = KeyCode(39);
    pub const DOWN: KeyCode = KeyCode(40);
    pub const DELETE: KeyCode = KeyCode(46);
    pub const A: KeyCode = KeyCode(65);
}

/// Modifier key state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(1 << 1);
    pub const ALT: Modifiers = Modifiers(1 << 2);
    pub const META: Modifiers = Modifiers(1 << 3);

    /// Combine two modifier sets
    pub const fn with(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn shift(&self) -> bool {
        self.0 & Self::SHIFT.0 != 0
    }

    pub fn ctrl(&self) -> bool {
        self.0 & Self::CTRL.0 != 0
    }

    pub fn alt(&self) -> bool {
        self.0 & Self::ALT.0 != 0
    }

    pub fn meta(&self) -> bool {
        self.0 & Self::META.0 != 0
    }

    /// The platform "command" modifier (Cmd on macOS, Ctrl elsewhere)
    pub fn command(&self) -> bool {
        if cfg!(target_os = "macos") {
            self.meta()
        } else {
            self.ctrl()
        }
    }
}

/// Event payload
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    /// Pointer position, button and pressure
    Pointer {
        x: f32,
        y: f32,
        button: u8,
        pressure: f32,
    },
    /// Key press or release
    Key {
        key: KeyCode,
        modifiers: Modifiers,
        repeat: bool,
    },
    /// Committed text from the platform IME
    TextInput { text: String },
    /// No payload (focus, blur)
    None,
}

/// An input event delivered to a widget
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    pub data: EventData,
}

impl Event {
    pub fn new(event_type: EventType, data: EventData) -> Self {
        Self { event_type, data }
    }

    /// A pointer event at `(x, y)` with the given button
    pub fn pointer(event_type: EventType, x: f32, y: f32, button: u8) -> Self {
        Self::new(
            event_type,
            EventData::Pointer {
                x,
                y,
                button,
                pressure: 1.0,
            },
        )
    }

    /// A key-down event
    pub fn key(key: KeyCode, modifiers: Modifiers) -> Self {
        Self::new(
            event_types::KEY_DOWN,
            EventData::Key {
                key,
                modifiers,
                repeat: false,
            },
        )
    }

    /// A text-input event
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(event_types::TEXT_INPUT, EventData::TextInput { text: text.into() })
    }

    /// Pointer position, if this is a pointer event
    pub fn position(&self) -> Option<Point> {
        match self.data {
            EventData::Pointer { x, y, .. } => Some(Point::new(x, y)),
            _ => None,
        }
    }

    /// Pointer button, if this is a pointer event
    pub fn button(&self) -> Option<u8> {
        match self.data {
            EventData::Pointer { button, .. } => Some(button),
            _ => None,
        }
    }

    /// Whether this is a pointer event type
    pub fn is_pointer(&self) -> bool {
        matches!(
            self.event_type,
            event_types::POINTER_ENTER
                | event_types::POINTER_LEAVE
                | event_types::POINTER_DOWN
                | event_types::POINTER_UP
                | event_types::POINTER_MOVE
        )
    }
}
