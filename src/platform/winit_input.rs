//=========================================================================
// Winit Input
//=========================================================================
//
// Feeds Winit window events into the keyboard and mouse handoff drivers.
//
// Architecture:
//   Winit Events → WinitInputFeed → KeyFeed / MouseFeed → channel
//                → HandoffKeyInput / HandoffMouseInput → InputManager
//
// Physical keys are translated to scan codes; keys without one are
// filtered. Cursor deltas are derived from consecutive positions, with
// `dy` positive when the cursor moves up. Positions stay in window pixels.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;
use winit::{
    event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
    window::Window,
};

//=== Internal Dependencies ===============================================

use super::handoff::{HandoffKeyInput, HandoffMouseInput, KeyFeed, MouseFeed};
use crate::core::input::driver::InputClock;
use crate::core::input::error::Result;
use crate::core::input::event::MouseButton;
use crate::core::input::keys::KeyCode;

//=== Constants ===========================================================

/// Wheel units reported per scrolled line.
pub const WHEEL_UNITS_PER_LINE: f32 = 120.0;

//=== Construction ========================================================

/// Keyboard and mouse drivers plus the feed translating Winit events.
///
/// Both drivers stamp events with the same system clock.
pub fn winit_input() -> (HandoffKeyInput, HandoffMouseInput, WinitInputFeed) {
    let clock = InputClock::system();
    let (keys, key_feed) = HandoffKeyInput::channel(clock.clone());
    let (mouse, mouse_feed) = HandoffMouseInput::channel(clock);
    (keys, mouse, WinitInputFeed::new(key_feed, mouse_feed))
}

//=== WinitInputFeed ======================================================

/// Translates Winit window events into raw input events.
///
/// Lives on the thread running the Winit event loop.
#[derive(Debug)]
pub struct WinitInputFeed {
    keys: KeyFeed,
    mouse: MouseFeed,
    cursor: Option<(f32, f32)>,
    wheel: f32,
}

impl WinitInputFeed {
    pub fn new(keys: KeyFeed, mouse: MouseFeed) -> Self {
        Self { keys, mouse, cursor: None, wheel: 0.0 }
    }

    /// Forwards an input-related window event.
    ///
    /// Returns `Ok(false)` for events that carry no input.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Result<bool> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                self.on_key(event.physical_key, event.state, event.repeat, event.text.as_deref())
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.on_mouse_button(*button, *state)?;
                Ok(true)
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(position.x, position.y)?;
                Ok(true)
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.on_wheel(*delta)?;
                Ok(true)
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    /// Shows or hides the OS cursor as last requested by the dispatcher.
    pub fn apply_cursor_visibility(&self, window: &Window) {
        window.set_cursor_visible(self.mouse.is_cursor_visible());
    }

    //--- Event Processing -------------------------------------------------

    fn on_key(
        &self,
        physical_key: PhysicalKey,
        state: ElementState,
        repeat: bool,
        text: Option<&str>,
    ) -> Result<bool> {
        let key = match physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            PhysicalKey::Unidentified(_) => KeyCode::UNKNOWN,
        };
        if key == KeyCode::UNKNOWN {
            trace!(target: "platform::input", "Dropping key without scan code: {:?}", physical_key);
            return Ok(false);
        }

        let key_char = text.and_then(|t| t.chars().next());
        self.keys.key(key, key_char, state.is_pressed(), repeat)?;
        Ok(true)
    }

    fn on_mouse_button(&self, button: WinitMouseButton, state: ElementState) -> Result<()> {
        let (x, y) = self.cursor.unwrap_or_default();
        self.mouse.button(MouseButton::from(button), state.is_pressed(), x, y)
    }

    fn on_cursor_moved(&mut self, x: f64, y: f64) -> Result<()> {
        let position = (x as f32, y as f32);
        let (dx, dy) = match self.cursor {
            Some((last_x, last_y)) => (position.0 - last_x, last_y - position.1),
            None => (0.0, 0.0),
        };
        self.cursor = Some(position);
        self.mouse.motion(position.0, position.1, dx, dy, self.wheel, 0.0)
    }

    fn on_wheel(&mut self, delta: MouseScrollDelta) -> Result<()> {
        let delta_wheel = match delta {
            MouseScrollDelta::LineDelta(_, lines) => lines * WHEEL_UNITS_PER_LINE,
            MouseScrollDelta::PixelDelta(pixels) => pixels.y as f32,
        };
        if delta_wheel == 0.0 {
            return Ok(());
        }

        self.wheel += delta_wheel;
        let (x, y) = self.cursor.unwrap_or_default();
        self.mouse.motion(x, y, 0.0, 0.0, self.wheel, delta_wheel)
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit physical key codes to scan codes.
///
/// Keys without a set-1 scan code (F13-F24, media keys) map to
/// `KeyCode::UNKNOWN`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::KEY_0,
            Digit1 => KeyCode::KEY_1,
            Digit2 => KeyCode::KEY_2,
            Digit3 => KeyCode::KEY_3,
            Digit4 => KeyCode::KEY_4,
            Digit5 => KeyCode::KEY_5,
            Digit6 => KeyCode::KEY_6,
            Digit7 => KeyCode::KEY_7,
            Digit8 => KeyCode::KEY_8,
            Digit9 => KeyCode::KEY_9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::A,
            KeyB => KeyCode::B,
            KeyC => KeyCode::C,
            KeyD => KeyCode::D,
            KeyE => KeyCode::E,
            KeyF => KeyCode::F,
            KeyG => KeyCode::G,
            KeyH => KeyCode::H,
            KeyI => KeyCode::I,
            KeyJ => KeyCode::J,
            KeyK => KeyCode::K,
            KeyL => KeyCode::L,
            KeyM => KeyCode::M,
            KeyN => KeyCode::N,
            KeyO => KeyCode::O,
            KeyP => KeyCode::P,
            KeyQ => KeyCode::Q,
            KeyR => KeyCode::R,
            KeyS => KeyCode::S,
            KeyT => KeyCode::T,
            KeyU => KeyCode::U,
            KeyV => KeyCode::V,
            KeyW => KeyCode::W,
            KeyX => KeyCode::X,
            KeyY => KeyCode::Y,
            KeyZ => KeyCode::Z,

            //--- Punctuation --------------------------------------------------

            Minus => KeyCode::MINUS,
            Equal => KeyCode::EQUALS,
            BracketLeft => KeyCode::LEFT_BRACKET,
            BracketRight => KeyCode::RIGHT_BRACKET,
            Semicolon => KeyCode::SEMICOLON,
            Quote => KeyCode::APOSTROPHE,
            Backquote => KeyCode::GRAVE,
            Backslash => KeyCode::BACKSLASH,
            Comma => KeyCode::COMMA,
            Period => KeyCode::PERIOD,
            Slash => KeyCode::SLASH,

            //--- Modifiers ----------------------------------------------------

            ShiftLeft => KeyCode::LEFT_SHIFT,
            ShiftRight => KeyCode::RIGHT_SHIFT,
            ControlLeft => KeyCode::LEFT_CONTROL,
            ControlRight => KeyCode::RIGHT_CONTROL,
            AltLeft => KeyCode::LEFT_ALT,
            AltRight => KeyCode::RIGHT_ALT,
            SuperLeft => KeyCode::LEFT_META,
            SuperRight => KeyCode::RIGHT_META,
            ContextMenu => KeyCode::APPS,
            CapsLock => KeyCode::CAPS_LOCK,

            //--- Navigation ---------------------------------------------------

            ArrowUp => KeyCode::UP,
            ArrowDown => KeyCode::DOWN,
            ArrowLeft => KeyCode::LEFT,
            ArrowRight => KeyCode::RIGHT,
            Home => KeyCode::HOME,
            End => KeyCode::END,
            PageUp => KeyCode::PAGE_UP,
            PageDown => KeyCode::PAGE_DOWN,
            Insert => KeyCode::INSERT,
            Delete => KeyCode::DELETE,

            //--- Special ------------------------------------------------------

            Space => KeyCode::SPACE,
            Enter => KeyCode::RETURN,
            Escape => KeyCode::ESCAPE,
            Tab => KeyCode::TAB,
            Backspace => KeyCode::BACKSPACE,
            ScrollLock => KeyCode::SCROLL_LOCK,
            Pause => KeyCode::PAUSE,

            //--- Function Keys ------------------------------------------------

            F1 => KeyCode::F1,
            F2 => KeyCode::F2,
            F3 => KeyCode::F3,
            F4 => KeyCode::F4,
            F5 => KeyCode::F5,
            F6 => KeyCode::F6,
            F7 => KeyCode::F7,
            F8 => KeyCode::F8,
            F9 => KeyCode::F9,
            F10 => KeyCode::F10,
            F11 => KeyCode::F11,
            F12 => KeyCode::F12,

            //--- Numpad -------------------------------------------------------

            NumLock => KeyCode::NUM_LOCK,
            Numpad0 => KeyCode::NUMPAD_0,
            Numpad1 => KeyCode::NUMPAD_1,
            Numpad2 => KeyCode::NUMPAD_2,
            Numpad3 => KeyCode::NUMPAD_3,
            Numpad4 => KeyCode::NUMPAD_4,
            Numpad5 => KeyCode::NUMPAD_5,
            Numpad6 => KeyCode::NUMPAD_6,
            Numpad7 => KeyCode::NUMPAD_7,
            Numpad8 => KeyCode::NUMPAD_8,
            Numpad9 => KeyCode::NUMPAD_9,
            NumpadAdd => KeyCode::NUMPAD_ADD,
            NumpadSubtract => KeyCode::NUMPAD_SUBTRACT,
            NumpadMultiply => KeyCode::MULTIPLY,
            NumpadDivide => KeyCode::NUMPAD_DIVIDE,
            NumpadDecimal => KeyCode::NUMPAD_DECIMAL,
            NumpadEnter => KeyCode::NUMPAD_ENTER,

            //--- Unmapped (return UNKNOWN) ------------------------------------

            _ => KeyCode::UNKNOWN,
        }
    }
}

/// Converts Winit mouse buttons to button indices.
///
/// Left/Right/Middle are 0/1/2, Back/Forward are 3/4.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::LEFT,
            WinitMouseButton::Right => MouseButton::RIGHT,
            WinitMouseButton::Middle => MouseButton::MIDDLE,
            WinitMouseButton::Back => MouseButton(3),
            WinitMouseButton::Forward => MouseButton(4),
            WinitMouseButton::Other(index) => MouseButton(u8::try_from(index).unwrap_or(u8::MAX)),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::driver::{EventSink, InputDevice};
    use crate::core::input::event::InputEvent;
    use crossbeam_channel::Receiver;
    use winit::dpi::PhysicalPosition;

    //--- Test Helpers -----------------------------------------------------

    struct Rig {
        keys: HandoffKeyInput,
        mouse: HandoffMouseInput,
        feed: WinitInputFeed,
        receiver: Receiver<InputEvent>,
    }

    impl Rig {
        fn new() -> Self {
            let (mut keys, mut mouse, feed) = winit_input();
            let (sink, receiver) = EventSink::new();
            let devices: [&mut dyn InputDevice; 2] = [&mut keys, &mut mouse];
            for device in devices {
                device.set_event_sink(sink.clone());
                device.initialize().unwrap();
            }
            sink.set_permitted(true);
            Self { keys, mouse, feed, receiver }
        }

        fn collect(&mut self) -> Vec<InputEvent> {
            self.keys.update().unwrap();
            self.mouse.update().unwrap();
            self.receiver.try_iter().collect()
        }
    }

    //=====================================================================
    // Conversion Tests
    //=====================================================================

    #[test]
    fn keycode_conversion_alphabetic() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyA), KeyCode::A);
        assert_eq!(KeyCode::from(WinitKeyCode::KeyZ), KeyCode::Z);
    }

    #[test]
    fn keycode_conversion_special() {
        assert_eq!(KeyCode::from(WinitKeyCode::Space), KeyCode::SPACE);
        assert_eq!(KeyCode::from(WinitKeyCode::Enter), KeyCode::RETURN);
        assert_eq!(KeyCode::from(WinitKeyCode::NumpadEnter), KeyCode::NUMPAD_ENTER);
    }

    #[test]
    fn keycode_conversion_filters_unmapped() {
        assert_eq!(KeyCode::from(WinitKeyCode::F13), KeyCode::UNKNOWN);
    }

    #[test]
    fn mouse_button_conversion() {
        assert_eq!(MouseButton::from(WinitMouseButton::Left), MouseButton::LEFT);
        assert_eq!(MouseButton::from(WinitMouseButton::Middle), MouseButton::MIDDLE);
        assert_eq!(MouseButton::from(WinitMouseButton::Forward), MouseButton(4));
        assert_eq!(MouseButton::from(WinitMouseButton::Other(900)), MouseButton(u8::MAX));
    }

    //=====================================================================
    // Feed Tests
    //=====================================================================

    #[test]
    fn key_repeat_and_char_are_kept() {
        let mut rig = Rig::new();
        let handled = rig
            .feed
            .on_key(PhysicalKey::Code(WinitKeyCode::KeyQ), ElementState::Pressed, true, Some("q"))
            .unwrap();
        assert!(handled);

        let events = rig.collect();
        assert!(matches!(
            &events[..],
            [InputEvent::Key(e)] if e.key == KeyCode::Q && e.repeating && e.key_char == Some('q')
        ));
    }

    #[test]
    fn keys_without_scan_code_are_dropped() {
        let mut rig = Rig::new();
        let handled = rig
            .feed
            .on_key(PhysicalKey::Code(WinitKeyCode::F20), ElementState::Pressed, false, None)
            .unwrap();

        assert!(!handled);
        assert!(rig.collect().is_empty());
    }

    #[test]
    fn cursor_deltas_point_up() {
        let mut rig = Rig::new();
        rig.feed.on_cursor_moved(100.0, 100.0).unwrap();
        rig.feed.on_cursor_moved(110.0, 90.0).unwrap();

        let events = rig.collect();
        assert!(matches!(
            events.last(),
            Some(InputEvent::MouseMotion(e)) if e.dx == 10.0 && e.dy == 10.0
        ));
    }

    #[test]
    fn wheel_lines_are_scaled() {
        let mut rig = Rig::new();
        rig.feed.on_wheel(MouseScrollDelta::LineDelta(0.0, -1.0)).unwrap();
        rig.feed.on_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 0.0))).unwrap();

        let events = rig.collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            InputEvent::MouseMotion(e) if e.delta_wheel == -WHEEL_UNITS_PER_LINE && e.wheel == -WHEEL_UNITS_PER_LINE
        ));
    }

    #[test]
    fn clicks_use_last_cursor_position() {
        let mut rig = Rig::new();
        rig.feed.on_cursor_moved(12.0, 34.0).unwrap();
        rig.feed.on_mouse_button(WinitMouseButton::Right, ElementState::Pressed).unwrap();

        let events = rig.collect();
        assert!(matches!(
            events.last(),
            Some(InputEvent::MouseButton(e)) if e.button == MouseButton::RIGHT && (e.x, e.y) == (12.0, 34.0)
        ));
    }
}
