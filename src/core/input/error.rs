//=========================================================================
// Input Errors
//=========================================================================
//
// Error taxonomy for the input subsystem.
//
// Families:
//   IllegalState           → protocol violation (event outside collection)
//   *NotFound              → unknown mapping, listener or joystick element
//   InvalidDeadZone / ...  → configuration rejected at the API boundary
//   Device / SinkClosed    → driver failures
//
// Duplicate trigger bindings are logged as warnings, never returned.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::event::DeviceKind;
use super::listener::{ListenerId, RawListenerId};

//=== InputError ==========================================================

/// Errors raised by the dispatcher, the mapping table and device drivers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// A driver pushed a raw event while the dispatcher was not collecting.
    #[error("{device} input has raised an event at an illegal time")]
    IllegalState { device: DeviceKind },

    #[error("cannot find mapping: {name}")]
    MappingNotFound { name: String },

    #[error("cannot find listener {id}")]
    ListenerNotFound { id: ListenerId },

    #[error("cannot find raw input listener {id}")]
    RawListenerNotFound { id: RawListenerId },

    #[error("no joystick with id {joy_id}")]
    JoystickNotFound { joy_id: u8 },

    #[error("joystick {joy_id} has no axis '{axis}'")]
    JoystickAxisNotFound { joy_id: u8, axis: String },

    #[error("joystick {joy_id} has no button '{button}'")]
    JoystickButtonNotFound { joy_id: u8, button: String },

    /// Dead zones must be finite and within `[0, 1]`.
    #[error("invalid axis dead zone {value}: expected a value in [0, 1]")]
    InvalidDeadZone { value: f32 },

    #[error("mapping name must not be empty")]
    EmptyMappingName,

    #[error("invalid input configuration: {message}")]
    Config { message: String },

    /// Driver initialization or polling failure.
    #[error("{device} device failure: {message}")]
    Device { device: DeviceKind, message: String },

    /// The dispatcher owning the event queue has been dropped.
    #[error("event sink is closed")]
    SinkClosed,
}

/// Convenience alias used throughout the input subsystem.
pub type Result<T> = std::result::Result<T, InputError>;

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illegal_state_names_the_device() {
        let err = InputError::IllegalState { device: DeviceKind::Keyboard };
        assert_eq!(
            err.to_string(),
            "keyboard input has raised an event at an illegal time"
        );
    }

    #[test]
    fn not_found_messages_carry_the_key() {
        let err = InputError::MappingNotFound { name: "Jump".into() };
        assert!(err.to_string().contains("Jump"));

        let err = InputError::JoystickAxisNotFound { joy_id: 2, axis: "rz".into() };
        assert_eq!(err.to_string(), "joystick 2 has no axis 'rz'");
    }
}
