//=========================================================================
// Input System
//
// Device-independent input dispatch: raw events from pluggable drivers
// are translated into named mappings and delivered to listeners.
//
// Responsibilities:
// - Define the raw event model and the driver contract
// - Hash triggers and keep the mapping table
// - Dispatch action (edge) and analog (continuous) callbacks per frame
// - Describe joysticks and apply dead zones to their axes
//
// Typical usage:
// ```ignore
// let mut input = InputManagerBuilder::new(keyboard, mouse).build()?;
// input.add_mapping("Jump", &[Trigger::Key(KeyCode::SPACE)])?;
// input.add_new_listener(Listener::action(player), &["Jump"])?;
//
// loop {
//     input.update(tpf)?;
// }
// ```
//
//=========================================================================

//=== Submodules ==========================================================

pub mod config;
pub mod driver;
pub mod error;
pub mod event;
pub mod input_manager;
pub mod joystick;
pub mod keys;
pub mod listener;
pub mod trigger;

mod mapping;
mod state_tracker;

//=== Public Exports ======================================================

pub use config::{InputConfig, InputManagerBuilder};
pub use driver::{
    EventSink, InputClock, InputDevice, JoyInput, KeyInput, ManualClock, MouseInput, TouchInput,
};
pub use error::{InputError, Result};
pub use event::{
    DeviceKind, InputEvent, JoyAxisEvent, JoyButtonEvent, KeyInputEvent, MouseAxis, MouseButton,
    MouseButtonEvent, MouseMotionEvent, TouchEvent, TouchKind,
};
pub use input_manager::InputManager;
pub use joystick::{Joystick, JoystickAxis, JoystickButton, AXIS_POV_X, AXIS_POV_Y};
pub use keys::KeyCode;
pub use listener::{
    ActionListener, AnalogListener, CombinedListener, Listener, ListenerId, RawInputListener,
    RawListenerId, TouchListener,
};
pub use trigger::{Trigger, TriggerHash, TOUCH_ALL};
