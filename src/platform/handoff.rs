//=========================================================================
// Handoff Drivers
//=========================================================================
//
// Channel-backed device drivers. A platform thread (or a test script)
// feeds events through a cloneable `*Feed` handle at any time; the
// matching driver buffers them and forwards them into the dispatcher's
// sink when its `update()` runs inside the collection window.
//
// Architecture:
//   Platform thread:  KeyFeed::press() → crossbeam channel
//   Logic thread:     InputManager::update()
//                       → HandoffKeyInput::update() → EventSink::push
//
// Forwarding is bounded per frame so a flooded channel cannot stall the
// logic thread; the remainder is forwarded on following frames.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::input::config::DEFAULT_AXIS_DEAD_ZONE;
use crate::core::input::driver::{
    EventSink, InputClock, InputDevice, JoyInput, KeyInput, MouseInput, TouchInput,
};
use crate::core::input::error::{InputError, Result};
use crate::core::input::event::{
    DeviceKind, InputEvent, JoyAxisEvent, JoyButtonEvent, KeyInputEvent, MouseButton,
    MouseButtonEvent, MouseMotionEvent, TouchEvent, TouchKind,
};
use crate::core::input::joystick::Joystick;
use crate::core::input::keys::KeyCode;

//=== Constants ===========================================================

/// Upper bound of events a driver forwards in a single frame.
pub const MAX_EVENTS_PER_FRAME: usize = 100;

//=== Handoff =============================================================

/// Receiving side shared by every handoff driver.
#[derive(Debug)]
struct Handoff {
    device: DeviceKind,
    receiver: Receiver<InputEvent>,
    sink: Option<EventSink>,
    clock: InputClock,
    initialized: bool,
}

impl Handoff {
    fn channel(device: DeviceKind, clock: InputClock) -> (Self, FeedCore) {
        let (sender, receiver) = unbounded();
        let feed = FeedCore { sender, clock: clock.clone() };
        let handoff = Self { device, receiver, sink: None, clock, initialized: false };
        (handoff, feed)
    }

    fn forward(&mut self) -> Result<()> {
        self.forward_with(|sink, event| sink.push(event))
    }

    /// Drains up to [`MAX_EVENTS_PER_FRAME`] buffered events through `deliver`.
    ///
    /// Nothing is forwarded before initialization; events stay buffered.
    fn forward_with<F>(&mut self, mut deliver: F) -> Result<()>
    where
        F: FnMut(&EventSink, InputEvent) -> Result<()>,
    {
        if !self.initialized {
            return Ok(());
        }
        let sink = self.sink.as_ref().ok_or_else(|| InputError::Device {
            device: self.device,
            message: "no event sink installed".into(),
        })?;

        let mut drained = 0;
        while drained < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    deliver(sink, event)?;
                    drained += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    trace!(target: "platform::input", "{} feed disconnected", self.device);
                    break;
                }
            }
        }

        if drained >= MAX_EVENTS_PER_FRAME {
            warn!(
                target: "platform::input",
                "{} event backlog: forwarded {} events this frame",
                self.device,
                drained
            );
        }
        Ok(())
    }

    fn initialize(&mut self) {
        self.initialized = true;
        debug!(target: "platform::input", "{} handoff driver initialized", self.device);
    }

    fn destroy(&mut self) {
        self.initialized = false;
        debug!(target: "platform::input", "{} handoff driver destroyed", self.device);
    }
}

//--- FeedCore -------------------------------------------------------------

#[derive(Debug, Clone)]
struct FeedCore {
    sender: Sender<InputEvent>,
    clock: InputClock,
}

impl FeedCore {
    fn now(&self) -> i64 {
        self.clock.now_nanos()
    }

    fn send(&self, event: impl Into<InputEvent>) -> Result<()> {
        self.sender.send(event.into()).map_err(|_| InputError::SinkClosed)
    }
}

//--- Device Lifecycle -----------------------------------------------------

macro_rules! handoff_device {
    ($driver:ty) => {
        impl InputDevice for $driver {
            fn initialize(&mut self) -> Result<()> {
                self.handoff.initialize();
                Ok(())
            }

            fn update(&mut self) -> Result<()> {
                self.forward()
            }

            fn destroy(&mut self) {
                self.handoff.destroy();
            }

            fn is_initialized(&self) -> bool {
                self.handoff.initialized
            }

            fn set_event_sink(&mut self, sink: EventSink) {
                self.handoff.sink = Some(sink);
            }

            fn input_time_nanos(&self) -> i64 {
                self.handoff.clock.now_nanos()
            }
        }
    };
}

//=========================================================================
// Keyboard
//=========================================================================

#[derive(Debug)]
pub struct HandoffKeyInput {
    handoff: Handoff,
}

impl HandoffKeyInput {
    pub fn channel(clock: InputClock) -> (Self, KeyFeed) {
        let (handoff, core) = Handoff::channel(DeviceKind::Keyboard, clock);
        (Self { handoff }, KeyFeed { core })
    }

    fn forward(&mut self) -> Result<()> {
        self.handoff.forward()
    }
}

handoff_device!(HandoffKeyInput);

impl KeyInput for HandoffKeyInput {}

/// Producer handle of a [`HandoffKeyInput`].
#[derive(Debug, Clone)]
pub struct KeyFeed {
    core: FeedCore,
}

impl KeyFeed {
    pub fn key(&self, key: KeyCode, key_char: Option<char>, pressed: bool, repeating: bool) -> Result<()> {
        self.core.send(KeyInputEvent::new(key, key_char, pressed, repeating, self.core.now()))
    }

    pub fn press(&self, key: KeyCode) -> Result<()> {
        self.key(key, None, true, false)
    }

    pub fn release(&self, key: KeyCode) -> Result<()> {
        self.key(key, None, false, false)
    }
}

//=========================================================================
// Mouse
//=========================================================================

#[derive(Debug)]
pub struct HandoffMouseInput {
    handoff: Handoff,
    cursor_visible: Arc<AtomicBool>,
}

impl HandoffMouseInput {
    pub fn channel(clock: InputClock) -> (Self, MouseFeed) {
        let (handoff, core) = Handoff::channel(DeviceKind::Mouse, clock);
        let cursor_visible = Arc::new(AtomicBool::new(true));
        let feed = MouseFeed { core, cursor_visible: cursor_visible.clone() };
        (Self { handoff, cursor_visible }, feed)
    }

    fn forward(&mut self) -> Result<()> {
        self.handoff.forward()
    }
}

handoff_device!(HandoffMouseInput);

impl MouseInput for HandoffMouseInput {
    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible.store(visible, Ordering::Release);
    }
}

/// Producer handle of a [`HandoffMouseInput`].
#[derive(Debug, Clone)]
pub struct MouseFeed {
    core: FeedCore,
    cursor_visible: Arc<AtomicBool>,
}

impl MouseFeed {
    pub fn button(&self, button: MouseButton, pressed: bool, x: f32, y: f32) -> Result<()> {
        self.core.send(MouseButtonEvent::new(button, pressed, x, y, self.core.now()))
    }

    pub fn motion(&self, x: f32, y: f32, dx: f32, dy: f32, wheel: f32, delta_wheel: f32) -> Result<()> {
        self.core.send(MouseMotionEvent::new(x, y, dx, dy, wheel, delta_wheel, self.core.now()))
    }

    /// Cursor visibility last requested by the dispatcher.
    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible.load(Ordering::Acquire)
    }
}

//=========================================================================
// Joystick
//=========================================================================

/// Joystick driver with an optional jitter filter on axis values.
///
/// The filter never hides a value that moves an axis into or out of its
/// settle zone, flips its direction or returns it to zero, so the
/// dispatcher always sees dead-zone crossings.
#[derive(Debug)]
pub struct HandoffJoyInput {
    handoff: Handoff,
    joysticks: Vec<Joystick>,
    rumble: Sender<(u8, f32)>,
    jitter_threshold: f32,
    settle_zone: f32,
    last_axis: HashMap<(u8, u8), f32>,
}

impl HandoffJoyInput {
    pub fn channel(clock: InputClock, joysticks: Vec<Joystick>) -> (Self, JoyFeed) {
        let (handoff, core) = Handoff::channel(DeviceKind::Joystick, clock);
        let (rumble, rumble_requests) = unbounded();
        let driver = Self {
            handoff,
            joysticks,
            rumble,
            jitter_threshold: 0.0,
            settle_zone: DEFAULT_AXIS_DEAD_ZONE,
            last_axis: HashMap::new(),
        };
        (driver, JoyFeed { core, rumble_requests })
    }

    /// Drops axis changes smaller than `threshold`. Returns to zero always pass.
    pub fn with_jitter_threshold(mut self, threshold: f32) -> Self {
        self.jitter_threshold = threshold.max(0.0);
        self
    }

    /// Magnitude below which an axis counts as centered. Should match the
    /// dispatcher's dead zone; per-axis dead zones raise it for their axis.
    pub fn with_settle_zone(mut self, settle_zone: f32) -> Self {
        self.settle_zone = settle_zone.max(0.0);
        self
    }

    fn forward(&mut self) -> Result<()> {
        let threshold = self.jitter_threshold;
        let settle_zone = self.settle_zone;
        let joysticks = &self.joysticks;
        let last_axis = &mut self.last_axis;

        self.handoff.forward_with(|sink, event| {
            if let InputEvent::JoyAxis(axis) = &event {
                let key = (axis.joy_id, axis.axis_index);
                let zone = joysticks
                    .iter()
                    .find(|joy| joy.id() == axis.joy_id)
                    .and_then(|joy| joy.axis(axis.axis_index))
                    .map_or(settle_zone, |desc| settle_zone.max(desc.dead_zone()));

                let jitter = threshold > 0.0
                    && last_axis
                        .get(&key)
                        .is_some_and(|last| is_jitter(*last, axis.value, threshold, zone));
                if jitter {
                    trace!(
                        target: "platform::input",
                        "Filtered jitter on joystick {} axis {}: {}",
                        axis.joy_id,
                        axis.axis_index,
                        axis.value
                    );
                    return Ok(());
                }
                last_axis.insert(key, axis.value);
            }
            sink.push(event)
        })
    }
}

/// A change is jitter when it is small and leaves the axis on the same side
/// of the settle zone, pointing the same way.
fn is_jitter(last: f32, value: f32, threshold: f32, zone: f32) -> bool {
    if value == 0.0 || (value - last).abs() >= threshold {
        return false;
    }
    let crossed = (value.abs() < zone) != (last.abs() < zone);
    let flipped = value.signum() != last.signum();
    !crossed && !flipped
}

handoff_device!(HandoffJoyInput);

impl JoyInput for HandoffJoyInput {
    fn load_joysticks(&mut self) -> Vec<Joystick> {
        self.joysticks.clone()
    }

    fn set_joy_rumble(&mut self, joy_id: u8, amount: f32) {
        if self.rumble.send((joy_id, amount)).is_err() {
            debug!(target: "platform::input", "Rumble for joystick {} dropped, feed is gone", joy_id);
        }
    }
}

/// Producer handle of a [`HandoffJoyInput`].
#[derive(Debug, Clone)]
pub struct JoyFeed {
    core: FeedCore,
    rumble_requests: Receiver<(u8, f32)>,
}

impl JoyFeed {
    pub fn axis(&self, joy_id: u8, axis_index: u8, value: f32) -> Result<()> {
        self.axis_raw(joy_id, axis_index, value, value)
    }

    pub fn axis_raw(&self, joy_id: u8, axis_index: u8, value: f32, raw_value: f32) -> Result<()> {
        self.core.send(JoyAxisEvent::new(joy_id, axis_index, value, raw_value, self.core.now()))
    }

    pub fn button(&self, joy_id: u8, button_index: u8, pressed: bool) -> Result<()> {
        self.core.send(JoyButtonEvent::new(joy_id, button_index, pressed, self.core.now()))
    }

    /// Rumble requests issued since the last call, oldest first.
    pub fn take_rumble(&self) -> Vec<(u8, f32)> {
        self.rumble_requests.try_iter().collect()
    }
}

//=========================================================================
// Touch
//=========================================================================

/// Touch driver that can mirror pointers as mouse and keys as keyboard.
#[derive(Debug)]
pub struct HandoffTouchInput {
    handoff: Handoff,
    simulate_mouse: bool,
    simulate_keyboard: bool,
}

impl HandoffTouchInput {
    pub fn channel(clock: InputClock) -> (Self, TouchFeed) {
        let (handoff, core) = Handoff::channel(DeviceKind::Touch, clock);
        let driver = Self { handoff, simulate_mouse: false, simulate_keyboard: false };
        (driver, TouchFeed { core })
    }

    fn forward(&mut self) -> Result<()> {
        let simulate_mouse = self.simulate_mouse;
        let simulate_keyboard = self.simulate_keyboard;

        self.handoff.forward_with(|sink, event| {
            if let InputEvent::Touch(touch) = &event {
                if simulate_mouse {
                    mirror_pointer(sink, touch)?;
                }
                if simulate_keyboard {
                    mirror_key(sink, touch)?;
                }
            }
            sink.push(event)
        })
    }
}

handoff_device!(HandoffTouchInput);

impl TouchInput for HandoffTouchInput {
    fn set_simulate_mouse(&mut self, simulate: bool) {
        self.simulate_mouse = simulate;
    }

    fn is_simulate_mouse(&self) -> bool {
        self.simulate_mouse
    }

    fn set_simulate_keyboard(&mut self, simulate: bool) {
        self.simulate_keyboard = simulate;
    }

    fn is_simulate_keyboard(&self) -> bool {
        self.simulate_keyboard
    }
}

fn mirror_pointer(sink: &EventSink, touch: &TouchEvent) -> Result<()> {
    let time = touch.time();
    match touch.kind {
        TouchKind::Down => sink.push(MouseButtonEvent::new(MouseButton::LEFT, true, touch.x, touch.y, time)),
        TouchKind::Up => sink.push(MouseButtonEvent::new(MouseButton::LEFT, false, touch.x, touch.y, time)),
        TouchKind::Move => {
            sink.push(MouseMotionEvent::new(touch.x, touch.y, touch.dx, touch.dy, 0.0, 0.0, time))
        }
        _ => Ok(()),
    }
}

fn mirror_key(sink: &EventSink, touch: &TouchEvent) -> Result<()> {
    let pressed = match touch.kind {
        TouchKind::KeyDown => true,
        TouchKind::KeyUp => false,
        _ => return Ok(()),
    };
    sink.push(KeyInputEvent::new(KeyCode(touch.key_code), None, pressed, false, touch.time()))
}

/// Producer handle of a [`HandoffTouchInput`].
#[derive(Debug, Clone)]
pub struct TouchFeed {
    core: FeedCore,
}

impl TouchFeed {
    pub fn touch(&self, kind: TouchKind, pointer_id: u32, x: f32, y: f32, dx: f32, dy: f32) -> Result<()> {
        self.core.send(TouchEvent::new(kind, pointer_id, x, y, dx, dy, self.core.now()))
    }

    /// Hardware key on the touch device (back, menu, ...).
    pub fn key(&self, key_code: u8, pressed: bool) -> Result<()> {
        self.core.send(TouchEvent::key(key_code, pressed, self.core.now()))
    }

    /// Sends a fully described touch event as is.
    pub fn send(&self, event: TouchEvent) -> Result<()> {
        self.core.send(event)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::driver::ManualClock;
    use crate::core::input::joystick::JoystickAxis;

    //--- Test Helpers -----------------------------------------------------

    fn start(device: &mut dyn InputDevice) -> (EventSink, Receiver<InputEvent>) {
        let (sink, receiver) = EventSink::new();
        device.set_event_sink(sink.clone());
        device.initialize().unwrap();
        sink.set_permitted(true);
        (sink, receiver)
    }

    fn manual() -> InputClock {
        InputClock::from(ManualClock::new())
    }

    #[test]
    fn buffered_events_wait_for_initialization() {
        let (mut keys, feed) = HandoffKeyInput::channel(manual());
        feed.press(KeyCode::A).unwrap();

        keys.update().unwrap();
        let (_sink, receiver) = start(&mut keys);
        assert!(receiver.try_recv().is_err());

        keys.update().unwrap();
        assert!(matches!(receiver.try_recv(), Ok(InputEvent::Key(e)) if e.key == KeyCode::A));
    }

    #[test]
    fn events_are_stamped_with_the_feed_clock() {
        let clock = ManualClock::new();
        let (mut keys, feed) = HandoffKeyInput::channel(clock.clone().into());
        let (_sink, receiver) = start(&mut keys);

        clock.set_nanos(42);
        feed.release(KeyCode::SPACE).unwrap();
        keys.update().unwrap();

        let event = receiver.try_recv().unwrap();
        assert_eq!(event.time(), 42);
        assert_eq!(keys.input_time_nanos(), 42);
    }

    #[test]
    fn forwarding_is_bounded_per_frame() {
        let (mut mouse, feed) = HandoffMouseInput::channel(manual());
        let (_sink, receiver) = start(&mut mouse);
        for i in 0..MAX_EVENTS_PER_FRAME + 20 {
            feed.motion(i as f32, 0.0, 1.0, 0.0, 0.0, 0.0).unwrap();
        }

        mouse.update().unwrap();
        assert_eq!(receiver.try_iter().count(), MAX_EVENTS_PER_FRAME);

        mouse.update().unwrap();
        assert_eq!(receiver.try_iter().count(), 20);
    }

    #[test]
    fn forwarding_outside_window_fails() {
        let (mut keys, feed) = HandoffKeyInput::channel(manual());
        let (sink, _receiver) = start(&mut keys);
        sink.set_permitted(false);
        feed.press(KeyCode::Q).unwrap();

        assert_eq!(
            keys.update(),
            Err(InputError::IllegalState { device: DeviceKind::Keyboard })
        );
    }

    #[test]
    fn feed_reports_dropped_driver() {
        let (keys, feed) = HandoffKeyInput::channel(manual());
        drop(keys);
        assert_eq!(feed.press(KeyCode::A), Err(InputError::SinkClosed));
    }

    #[test]
    fn cursor_visibility_is_shared_with_feed() {
        let (mut mouse, feed) = HandoffMouseInput::channel(manual());
        assert!(feed.is_cursor_visible());

        mouse.set_cursor_visible(false);
        assert!(!feed.is_cursor_visible());
    }

    #[test]
    fn jitter_filter_drops_small_changes() {
        let (driver, feed) = HandoffJoyInput::channel(manual(), Vec::new());
        let mut joy = driver.with_jitter_threshold(0.05);
        let (_sink, receiver) = start(&mut joy);

        for value in [0.50, 0.52, 0.60, 0.0] {
            feed.axis(0, 1, value).unwrap();
        }
        joy.update().unwrap();

        let values: Vec<f32> = receiver
            .try_iter()
            .filter_map(|e| match e {
                InputEvent::JoyAxis(axis) => Some(axis.value),
                _ => None,
            })
            .collect();
        assert_eq!(values, vec![0.50, 0.60, 0.0]);
    }

    #[test]
    fn jitter_filter_passes_dead_zone_crossings() {
        let (driver, feed) = HandoffJoyInput::channel(manual(), Vec::new());
        let mut joy = driver.with_jitter_threshold(0.05);
        let (_sink, receiver) = start(&mut joy);

        for value in [0.08, 0.04, 0.03, 0.06, 0.09, 0.02, -0.02] {
            feed.axis(0, 0, value).unwrap();
        }
        joy.update().unwrap();

        let values: Vec<f32> = receiver
            .try_iter()
            .filter_map(|e| match e {
                InputEvent::JoyAxis(axis) => Some(axis.value),
                _ => None,
            })
            .collect();
        assert_eq!(values, vec![0.08, 0.04, 0.06, 0.02, -0.02]);
    }

    #[test]
    fn settle_zone_follows_per_axis_dead_zone() {
        let stick = Joystick::new(0, "Pad")
            .with_axis_desc(JoystickAxis::new(0, 0, "Stick X", "x").with_dead_zone(0.2));
        let (driver, feed) = HandoffJoyInput::channel(manual(), vec![stick]);
        let mut joy = driver.with_jitter_threshold(0.05);
        let (_sink, receiver) = start(&mut joy);

        for value in [0.22, 0.18, 0.21] {
            feed.axis(0, 0, value).unwrap();
        }
        joy.update().unwrap();

        assert_eq!(receiver.try_iter().count(), 3);
    }

    #[test]
    fn rumble_requests_reach_feed() {
        let (mut joy, feed) = HandoffJoyInput::channel(manual(), Vec::new());
        joy.set_joy_rumble(2, 0.75);
        assert_eq!(feed.take_rumble(), vec![(2, 0.75)]);
        assert!(feed.take_rumble().is_empty());
    }

    #[test]
    fn touch_mirrors_pointer_as_left_button() {
        let (mut touch, feed) = HandoffTouchInput::channel(manual());
        touch.set_simulate_mouse(true);
        let (_sink, receiver) = start(&mut touch);

        feed.touch(TouchKind::Down, 0, 3.0, 4.0, 0.0, 0.0).unwrap();
        touch.update().unwrap();

        let events: Vec<InputEvent> = receiver.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            InputEvent::MouseButton(e) if e.button == MouseButton::LEFT && e.pressed
        ));
        assert!(matches!(&events[1], InputEvent::Touch(_)));
    }

    #[test]
    fn touch_keys_mirror_only_when_enabled() {
        let (mut touch, feed) = HandoffTouchInput::channel(manual());
        let (_sink, receiver) = start(&mut touch);

        feed.key(0x0E, true).unwrap();
        touch.update().unwrap();
        assert_eq!(receiver.try_iter().count(), 1);

        touch.set_simulate_keyboard(true);
        feed.key(0x0E, false).unwrap();
        touch.update().unwrap();

        let events: Vec<InputEvent> = receiver.try_iter().collect();
        assert!(matches!(
            &events[0],
            InputEvent::Key(e) if e.key == KeyCode::BACKSPACE && !e.pressed
        ));
    }
}
