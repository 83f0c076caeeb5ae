//=========================================================================
// Device Driver Contract
//=========================================================================
//
// Traits every input backend implements, plus the sink drivers push raw
// events into and the clock they timestamp them with.
//
// Architecture:
//   InputManager::update()
//       → sink permitted → driver.update() → EventSink::push → channel
//       → sink closed    → queue drained and dispatched
//
// Drivers must only push while their `update()` is running. A push at any
// other time is a protocol violation and returns `IllegalState`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::error;

//=== Internal Dependencies ===============================================

use super::error::{InputError, Result};
use super::event::InputEvent;
use super::joystick::Joystick;
use super::keys::KeyCode;

//=== EventSink ===========================================================

/// Sending half of the dispatcher's event queue.
///
/// Cheap to clone and `Send`, so drivers may hand it to helper threads,
/// but every push must still happen inside the collection window.
#[derive(Debug, Clone)]
pub struct EventSink {
    sender: Sender<InputEvent>,
    permitted: Arc<AtomicBool>,
}

impl EventSink {
    pub(crate) fn new() -> (Self, Receiver<InputEvent>) {
        let (sender, receiver) = unbounded();
        let sink = Self { sender, permitted: Arc::new(AtomicBool::new(false)) };
        (sink, receiver)
    }

    /// Queues a raw event for the current frame.
    pub fn push(&self, event: impl Into<InputEvent>) -> Result<()> {
        let event = event.into();
        if !self.is_permitted() {
            let device = event.device();
            error!(
                target: "input::dispatch",
                "{:?} event pushed outside the update window",
                device
            );
            return Err(InputError::IllegalState { device });
        }
        self.sender.send(event).map_err(|_| InputError::SinkClosed)
    }

    /// Returns `true` while the dispatcher is collecting events.
    pub fn is_permitted(&self) -> bool {
        self.permitted.load(Ordering::Acquire)
    }

    pub(crate) fn set_permitted(&self, permitted: bool) {
        self.permitted.store(permitted, Ordering::Release);
    }
}

//=== Clocks ==============================================================

/// Manually advanced nanosecond clock shared between clones.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Arc<AtomicI64>);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_nanos(&self) -> i64 {
        self.0.load(Ordering::Acquire)
    }

    pub fn set_nanos(&self, nanos: i64) {
        self.0.store(nanos, Ordering::Release);
    }

    pub fn advance_nanos(&self, nanos: i64) {
        self.0.fetch_add(nanos, Ordering::AcqRel);
    }
}

/// Monotonic nanosecond time source for event timestamps.
#[derive(Debug, Clone)]
pub enum InputClock {
    /// Nanoseconds elapsed since `epoch`.
    System { epoch: Instant },
    Manual(ManualClock),
}

impl InputClock {
    pub fn system() -> Self {
        InputClock::System { epoch: Instant::now() }
    }

    pub fn now_nanos(&self) -> i64 {
        match self {
            InputClock::System { epoch } => {
                i64::try_from(epoch.elapsed().as_nanos()).unwrap_or(i64::MAX)
            }
            InputClock::Manual(clock) => clock.now_nanos(),
        }
    }
}

impl From<ManualClock> for InputClock {
    fn from(clock: ManualClock) -> Self {
        InputClock::Manual(clock)
    }
}

//=== Driver Traits =======================================================

/// Lifecycle shared by all device drivers.
pub trait InputDevice {
    /// Acquires the device. Called once by the dispatcher when it is built,
    /// unless the driver reports itself as already initialized.
    fn initialize(&mut self) -> Result<()>;

    /// Polls the device and pushes pending events into the sink.
    fn update(&mut self) -> Result<()>;

    /// Releases the device.
    fn destroy(&mut self);

    fn is_initialized(&self) -> bool;

    /// Installs the sink events must be pushed into.
    fn set_event_sink(&mut self, sink: EventSink);

    /// Current time of the clock used for event timestamps.
    fn input_time_nanos(&self) -> i64;
}

pub trait KeyInput: InputDevice {
    /// Layout-aware key name. Defaults to the static scan code table.
    fn key_name(&self, key: KeyCode) -> Option<String> {
        key.name().map(str::to_owned)
    }
}

pub trait MouseInput: InputDevice {
    fn set_cursor_visible(&mut self, visible: bool);

    fn button_count(&self) -> u8 {
        3
    }
}

pub trait JoyInput: InputDevice {
    /// Describes the joysticks currently connected.
    fn load_joysticks(&mut self) -> Vec<Joystick>;

    /// Force feedback magnitude in `[0, 1]`.
    fn set_joy_rumble(&mut self, joy_id: u8, amount: f32);
}

pub trait TouchInput: InputDevice {
    /// When enabled, pointer events are mirrored as left-button mouse events.
    fn set_simulate_mouse(&mut self, simulate: bool);
    fn is_simulate_mouse(&self) -> bool;

    /// When enabled, touch-device keys are mirrored as key events.
    fn set_simulate_keyboard(&mut self, simulate: bool);
    fn is_simulate_keyboard(&self) -> bool;
}

//=========================================================================
// Unit Tests
//=========================================================================
