//=========================================================================
// Raw Input Events
//
// Defines the device-level events drivers push into the dispatcher.
//
// Every event carries a nanosecond timestamp from the input clock and a
// `consumed` flag. Raw listeners may consume an event, after which no
// later listener and no trigger translation acts on it.
//
// Event Flow:
// ```text
// Device driver (winit, hand-off thread, virtual)
//         ↓  EventSink::push (collection window only)
//    InputEvent queue (this module)
//         ↓
//    Raw listeners → trigger translation → Action/Analog listeners
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::keys::KeyCode;

//=== DeviceKind ==========================================================

/// The four device slots the dispatcher drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Keyboard,
    Mouse,
    Joystick,
    Touch,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceKind::Keyboard => "keyboard",
            DeviceKind::Mouse => "mouse",
            DeviceKind::Joystick => "joystick",
            DeviceKind::Touch => "touch",
        };
        f.write_str(name)
    }
}

//=== MouseButton =========================================================

/// Mouse button index. Left, right and middle are 0, 1 and 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MouseButton(pub u8);

impl MouseButton {
    pub const LEFT: MouseButton = MouseButton(0);
    pub const RIGHT: MouseButton = MouseButton(1);
    pub const MIDDLE: MouseButton = MouseButton(2);

    pub const fn index(self) -> u8 {
        self.0
    }
}

//=== MouseAxis ===========================================================

/// Relative mouse axes that can be bound as triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MouseAxis {
    X,
    Y,
    Wheel,
}

impl MouseAxis {
    pub const ALL: [MouseAxis; 3] = [MouseAxis::X, MouseAxis::Y, MouseAxis::Wheel];

    pub const fn index(self) -> u8 {
        match self {
            MouseAxis::X => 0,
            MouseAxis::Y => 1,
            MouseAxis::Wheel => 2,
        }
    }
}

//=== TouchKind ===========================================================

/// Pointer and gesture kinds reported by touch drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchKind {
    Down,
    Move,
    Up,
    Tap,
    DoubleTap,
    LongPress,
    Fling,
    Scroll,
    ScaleStart,
    ScaleMove,
    ScaleEnd,
    /// Hardware key on a touch device (back, menu, ...).
    KeyDown,
    KeyUp,
    Outside,
}

//=== Event Structs =======================================================

/// Keyboard key transition. Repeats are flagged and ignored by triggers.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyInputEvent {
    pub key: KeyCode,
    pub key_char: Option<char>,
    pub pressed: bool,
    pub repeating: bool,
    time: i64,
    consumed: bool,
}

impl KeyInputEvent {
    pub fn new(key: KeyCode, key_char: Option<char>, pressed: bool, repeating: bool, time: i64) -> Self {
        Self { key, key_char, pressed, repeating, time, consumed: false }
    }

    pub fn is_released(&self) -> bool {
        !self.pressed
    }
}

/// Mouse button transition with the cursor position at the time of the click.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseButtonEvent {
    pub button: MouseButton,
    pub pressed: bool,
    pub x: f32,
    pub y: f32,
    time: i64,
    consumed: bool,
}

impl MouseButtonEvent {
    pub fn new(button: MouseButton, pressed: bool, x: f32, y: f32, time: i64) -> Self {
        Self { button, pressed, x, y, time, consumed: false }
    }
}

/// Relative mouse motion and wheel movement.
///
/// `dy` is positive when the cursor moves up.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseMotionEvent {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub wheel: f32,
    pub delta_wheel: f32,
    time: i64,
    consumed: bool,
}

impl MouseMotionEvent {
    pub fn new(x: f32, y: f32, dx: f32, dy: f32, wheel: f32, delta_wheel: f32, time: i64) -> Self {
        Self { x, y, dx, dy, wheel, delta_wheel, time, consumed: false }
    }
}

/// Joystick axis position, normalized to `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct JoyAxisEvent {
    pub joy_id: u8,
    pub axis_index: u8,
    pub value: f32,
    /// Value before driver-side normalization, for diagnostics.
    pub raw_value: f32,
    time: i64,
    consumed: bool,
}

impl JoyAxisEvent {
    pub fn new(joy_id: u8, axis_index: u8, value: f32, raw_value: f32, time: i64) -> Self {
        Self { joy_id, axis_index, value, raw_value, time, consumed: false }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoyButtonEvent {
    pub joy_id: u8,
    pub button_index: u8,
    pub pressed: bool,
    time: i64,
    consumed: bool,
}

impl JoyButtonEvent {
    pub fn new(joy_id: u8, button_index: u8, pressed: bool, time: i64) -> Self {
        Self { joy_id, button_index, pressed, time, consumed: false }
    }
}

/// Touch pointer, gesture or touch-device key event.
///
/// `key_code` is 0 for pointer and gesture events.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub kind: TouchKind,
    pub pointer_id: u32,
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub pressure: f32,
    pub scale_factor: f32,
    pub key_code: u8,
    time: i64,
    consumed: bool,
}

impl TouchEvent {
    pub fn new(kind: TouchKind, pointer_id: u32, x: f32, y: f32, dx: f32, dy: f32, time: i64) -> Self {
        Self {
            kind,
            pointer_id,
            x,
            y,
            dx,
            dy,
            pressure: 1.0,
            scale_factor: 1.0,
            key_code: 0,
            time,
            consumed: false,
        }
    }

    /// Touch-device hardware key event (back, menu, ...).
    pub fn key(key_code: u8, pressed: bool, time: i64) -> Self {
        let kind = if pressed { TouchKind::KeyDown } else { TouchKind::KeyUp };
        Self { key_code, ..Self::new(kind, 0, 0.0, 0.0, 0.0, 0.0, time) }
    }
}

//--- Shared Metadata ------------------------------------------------------

macro_rules! event_metadata {
    ($($event:ty),* $(,)?) => {
        $(
            impl $event {
                /// Input clock timestamp in nanoseconds.
                pub fn time(&self) -> i64 {
                    self.time
                }

                pub fn is_consumed(&self) -> bool {
                    self.consumed
                }

                /// Marks the event as handled; later listeners and trigger
                /// translation skip it.
                pub fn consume(&mut self) {
                    self.consumed = true;
                }
            }
        )*
    };
}

event_metadata!(
    KeyInputEvent,
    MouseButtonEvent,
    MouseMotionEvent,
    JoyAxisEvent,
    JoyButtonEvent,
    TouchEvent,
);

//=== InputEvent ==========================================================

/// Any raw event, as queued by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(KeyInputEvent),
    MouseButton(MouseButtonEvent),
    MouseMotion(MouseMotionEvent),
    JoyAxis(JoyAxisEvent),
    JoyButton(JoyButtonEvent),
    Touch(TouchEvent),
}

impl InputEvent {
    pub fn device(&self) -> DeviceKind {
        match self {
            InputEvent::Key(_) => DeviceKind::Keyboard,
            InputEvent::MouseButton(_) | InputEvent::MouseMotion(_) => DeviceKind::Mouse,
            InputEvent::JoyAxis(_) | InputEvent::JoyButton(_) => DeviceKind::Joystick,
            InputEvent::Touch(_) => DeviceKind::Touch,
        }
    }

    pub fn time(&self) -> i64 {
        match self {
            InputEvent::Key(e) => e.time(),
            InputEvent::MouseButton(e) => e.time(),
            InputEvent::MouseMotion(e) => e.time(),
            InputEvent::JoyAxis(e) => e.time(),
            InputEvent::JoyButton(e) => e.time(),
            InputEvent::Touch(e) => e.time(),
        }
    }

    pub fn is_consumed(&self) -> bool {
        match self {
            InputEvent::Key(e) => e.is_consumed(),
            InputEvent::MouseButton(e) => e.is_consumed(),
            InputEvent::MouseMotion(e) => e.is_consumed(),
            InputEvent::JoyAxis(e) => e.is_consumed(),
            InputEvent::JoyButton(e) => e.is_consumed(),
            InputEvent::Touch(e) => e.is_consumed(),
        }
    }

    pub fn consume(&mut self) {
        match self {
            InputEvent::Key(e) => e.consume(),
            InputEvent::MouseButton(e) => e.consume(),
            InputEvent::MouseMotion(e) => e.consume(),
            InputEvent::JoyAxis(e) => e.consume(),
            InputEvent::JoyButton(e) => e.consume(),
            InputEvent::Touch(e) => e.consume(),
        }
    }

    /// Cursor position carried by the event, if any.
    pub(crate) fn cursor_position(&self) -> Option<(f32, f32)> {
        match self {
            InputEvent::MouseButton(e) => Some((e.x, e.y)),
            InputEvent::MouseMotion(e) => Some((e.x, e.y)),
            InputEvent::Touch(e) if e.key_code == 0 => Some((e.x, e.y)),
            _ => None,
        }
    }
}

//--- Conversions ----------------------------------------------------------

impl From<KeyInputEvent> for InputEvent {
    fn from(event: KeyInputEvent) -> Self {
        InputEvent::Key(event)
    }
}

impl From<MouseButtonEvent> for InputEvent {
    fn from(event: MouseButtonEvent) -> Self {
        InputEvent::MouseButton(event)
    }
}

impl From<MouseMotionEvent> for InputEvent {
    fn from(event: MouseMotionEvent) -> Self {
        InputEvent::MouseMotion(event)
    }
}

impl From<JoyAxisEvent> for InputEvent {
    fn from(event: JoyAxisEvent) -> Self {
        InputEvent::JoyAxis(event)
    }
}

impl From<JoyButtonEvent> for InputEvent {
    fn from(event: JoyButtonEvent) -> Self {
        InputEvent::JoyButton(event)
    }
}

impl From<TouchEvent> for InputEvent {
    fn from(event: TouchEvent) -> Self {
        InputEvent::Touch(event)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
