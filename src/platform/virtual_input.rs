//=========================================================================
// Virtual Input
//=========================================================================
//
// Scriptable devices for headless runs, replays and tests.
//
// A `VirtualInput` hands out handoff drivers sharing one manual clock and
// keeps their feeds, so input can be scripted step by step:
//
// ```ignore
// let mut devices = VirtualInput::new();
// let mut input = InputManagerBuilder::new(devices.keyboard(), devices.mouse()).build()?;
// devices.press_key(KeyCode::SPACE);
// devices.advance_nanos(16_000_000);
// input.update(0.016)?;
// ```
//
// Scripting a device that was never handed out, or whose driver was
// dropped, logs a warning and does nothing.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::warn;

//=== Internal Dependencies ===============================================

use super::handoff::{
    HandoffJoyInput, HandoffKeyInput, HandoffMouseInput, HandoffTouchInput, JoyFeed, KeyFeed,
    MouseFeed, TouchFeed,
};
use crate::core::input::driver::{InputClock, ManualClock};
use crate::core::input::error::Result;
use crate::core::input::event::{DeviceKind, MouseButton, TouchKind};
use crate::core::input::joystick::Joystick;
use crate::core::input::keys::KeyCode;

//=== VirtualInput ========================================================

#[derive(Debug, Default)]
pub struct VirtualInput {
    clock: ManualClock,
    keys: Option<KeyFeed>,
    mouse: Option<MouseFeed>,
    joystick: Option<JoyFeed>,
    touch: Option<TouchFeed>,
    cursor: (f32, f32),
    wheel: f32,
}

impl VirtualInput {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Clock ------------------------------------------------------------

    pub fn clock(&self) -> ManualClock {
        self.clock.clone()
    }

    pub fn set_time_nanos(&self, nanos: i64) {
        self.clock.set_nanos(nanos);
    }

    pub fn advance_nanos(&self, nanos: i64) {
        self.clock.advance_nanos(nanos);
    }

    //--- Drivers ----------------------------------------------------------

    /// A keyboard driver; replaces any previously handed out keyboard.
    pub fn keyboard(&mut self) -> HandoffKeyInput {
        let (driver, feed) = HandoffKeyInput::channel(self.input_clock());
        self.keys = Some(feed);
        driver
    }

    pub fn mouse(&mut self) -> HandoffMouseInput {
        let (driver, feed) = HandoffMouseInput::channel(self.input_clock());
        self.mouse = Some(feed);
        driver
    }

    pub fn joystick(&mut self, joysticks: Vec<Joystick>) -> HandoffJoyInput {
        let (driver, feed) = HandoffJoyInput::channel(self.input_clock(), joysticks);
        self.joystick = Some(feed);
        driver
    }

    pub fn touch_screen(&mut self) -> HandoffTouchInput {
        let (driver, feed) = HandoffTouchInput::channel(self.input_clock());
        self.touch = Some(feed);
        driver
    }

    fn input_clock(&self) -> InputClock {
        InputClock::from(self.clock.clone())
    }

    //--- Keyboard ---------------------------------------------------------

    pub fn press_key(&self, key: KeyCode) {
        self.with_keys(|feed| feed.press(key));
    }

    pub fn release_key(&self, key: KeyCode) {
        self.with_keys(|feed| feed.release(key));
    }

    /// An auto-repeat of a key that is already down.
    pub fn repeat_key(&self, key: KeyCode) {
        self.with_keys(|feed| feed.key(key, None, true, true));
    }

    pub fn type_char(&self, key: KeyCode, key_char: char) {
        self.with_keys(|feed| {
            feed.key(key, Some(key_char), true, false)?;
            feed.key(key, Some(key_char), false, false)
        });
    }

    //--- Mouse ------------------------------------------------------------

    pub fn press_button(&self, button: MouseButton) {
        let (x, y) = self.cursor;
        self.with_mouse(|feed| feed.button(button, true, x, y));
    }

    pub fn release_button(&self, button: MouseButton) {
        let (x, y) = self.cursor;
        self.with_mouse(|feed| feed.button(button, false, x, y));
    }

    /// Moves the cursor by a relative amount; `dy` is positive upwards.
    pub fn move_mouse(&mut self, dx: f32, dy: f32) {
        self.cursor = (self.cursor.0 + dx, self.cursor.1 + dy);
        let (x, y) = self.cursor;
        let wheel = self.wheel;
        self.with_mouse(|feed| feed.motion(x, y, dx, dy, wheel, 0.0));
    }

    pub fn scroll(&mut self, delta: f32) {
        self.wheel += delta;
        let (x, y) = self.cursor;
        let wheel = self.wheel;
        self.with_mouse(|feed| feed.motion(x, y, 0.0, 0.0, wheel, delta));
    }

    /// Cursor visibility last requested by the dispatcher.
    pub fn cursor_visible(&self) -> Option<bool> {
        self.mouse.as_ref().map(MouseFeed::is_cursor_visible)
    }

    //--- Joystick ---------------------------------------------------------

    pub fn move_axis(&self, joy_id: u8, axis_index: u8, value: f32) {
        self.with_joystick(|feed| feed.axis(joy_id, axis_index, value));
    }

    pub fn press_joy_button(&self, joy_id: u8, button_index: u8) {
        self.with_joystick(|feed| feed.button(joy_id, button_index, true));
    }

    pub fn release_joy_button(&self, joy_id: u8, button_index: u8) {
        self.with_joystick(|feed| feed.button(joy_id, button_index, false));
    }

    /// Most recent rumble magnitude requested for `joy_id`.
    pub fn last_rumble(&self, joy_id: u8) -> Option<f32> {
        let feed = self.joystick.as_ref()?;
        feed.take_rumble()
            .into_iter()
            .rev()
            .find(|(id, _)| *id == joy_id)
            .map(|(_, amount)| amount)
    }

    //--- Touch ------------------------------------------------------------

    pub fn touch(&self, kind: TouchKind, pointer_id: u32, x: f32, y: f32) {
        self.with_touch(|feed| feed.touch(kind, pointer_id, x, y, 0.0, 0.0));
    }

    pub fn touch_key(&self, key_code: u8, pressed: bool) {
        self.with_touch(|feed| feed.key(key_code, pressed));
    }

    //--- Helpers ----------------------------------------------------------

    fn with_keys(&self, send: impl FnOnce(&KeyFeed) -> Result<()>) {
        scripted(DeviceKind::Keyboard, self.keys.as_ref(), send);
    }

    fn with_mouse(&self, send: impl FnOnce(&MouseFeed) -> Result<()>) {
        scripted(DeviceKind::Mouse, self.mouse.as_ref(), send);
    }

    fn with_joystick(&self, send: impl FnOnce(&JoyFeed) -> Result<()>) {
        scripted(DeviceKind::Joystick, self.joystick.as_ref(), send);
    }

    fn with_touch(&self, send: impl FnOnce(&TouchFeed) -> Result<()>) {
        scripted(DeviceKind::Touch, self.touch.as_ref(), send);
    }
}

fn scripted<F>(device: DeviceKind, feed: Option<&F>, send: impl FnOnce(&F) -> Result<()>) {
    match feed {
        Some(feed) => {
            if let Err(err) = send(feed) {
                warn!(target: "platform::input", "Scripted {} event dropped: {}", device, err);
            }
        }
        None => warn!(target: "platform::input", "No virtual {} handed out", device),
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

    #[test]
    fn drivers_share_the_manual_clock() {
        let mut devices = VirtualInput::new();
        let keys = devices.keyboard();
        let mouse = devices.mouse();

        devices.set_time_nanos(1_000);
        devices.advance_nanos(250);
        assert_eq!(keys.input_time_nanos(), 1_250);
        assert_eq!(mouse.input_time_nanos(), 1_250);
    }

    #[test]
    fn mouse_motion_accumulates_cursor() {
        let mut devices = VirtualInput::new();
        let mut mouse = devices.mouse();
        let (sink, receiver) = EventSink::new();
        mouse.set_event_sink(sink.clone());
        mouse.initialize().unwrap();
        sink.set_permitted(true);

        devices.move_mouse(10.0, 5.0);
        devices.move_mouse(-4.0, 1.0);
        mouse.update().unwrap();

        let last = receiver.try_iter().last();
        assert!(matches!(
            last,
            Some(InputEvent::MouseMotion(e)) if (e.x, e.y, e.dx, e.dy) == (6.0, 6.0, -4.0, 1.0)
        ));
    }

    #[test]
    fn scripting_missing_device_is_harmless() {
        let devices = VirtualInput::new();
        devices.press_key(KeyCode::A);
        devices.move_axis(0, 0, 1.0);
        assert_eq!(devices.cursor_visible(), None);
    }
}
