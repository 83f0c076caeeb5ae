//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_input::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Dispatcher
pub use crate::core::input::{InputConfig, InputError, InputManager, InputManagerBuilder};

// Mappings and listeners
pub use crate::core::input::{
    ActionListener, AnalogListener, Listener, ListenerId, RawInputListener, TouchListener,
    Trigger,
};

// Devices
pub use crate::core::input::{KeyCode, MouseAxis, MouseButton, TouchKind};

// Drivers
pub use crate::platform::{winit_input, VirtualInput, WinitInputFeed};
