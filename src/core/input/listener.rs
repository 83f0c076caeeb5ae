//=========================================================================
// Listener Contracts
//=========================================================================
//
// Callbacks the dispatcher invokes for named mappings and raw events.
//
// Architecture:
//   Listener (capability-tagged) → registered once → ListenerId
//   ListenerId → bound to one or more mappings by name
//
// A listener declares its capabilities through the `Listener` variant it
// is wrapped in. The dispatcher never probes a listener's type at runtime.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::event::{
    JoyAxisEvent, JoyButtonEvent, KeyInputEvent, MouseButtonEvent, MouseMotionEvent, TouchEvent,
};

//=== Mapping Listeners ===================================================

/// Receives press/release transitions of a mapping.
pub trait ActionListener {
    fn on_action(&mut self, name: &str, is_pressed: bool, tpf: f32);
}

/// Receives continuous magnitudes of a mapping, already scaled by `tpf`.
pub trait AnalogListener {
    fn on_analog(&mut self, name: &str, value: f32, tpf: f32);
}

/// Receives touch events routed through touch triggers.
pub trait TouchListener {
    fn on_touch(&mut self, name: &str, event: &TouchEvent, tpf: f32);
}

/// A listener with both action and analog capabilities.
///
/// Implemented automatically for every type implementing both traits.
pub trait CombinedListener: ActionListener + AnalogListener {
    fn as_action(&mut self) -> &mut dyn ActionListener;
    fn as_analog(&mut self) -> &mut dyn AnalogListener;
}

impl<T: ActionListener + AnalogListener> CombinedListener for T {
    fn as_action(&mut self) -> &mut dyn ActionListener {
        self
    }

    fn as_analog(&mut self) -> &mut dyn AnalogListener {
        self
    }
}

//=== Listener ============================================================

/// A mapping listener tagged with its capability set.
pub enum Listener {
    Action(Box<dyn ActionListener>),
    Analog(Box<dyn AnalogListener>),
    Combined(Box<dyn CombinedListener>),
    Touch(Box<dyn TouchListener>),
}

impl Listener {
    pub fn action(listener: impl ActionListener + 'static) -> Self {
        Listener::Action(Box::new(listener))
    }

    pub fn analog(listener: impl AnalogListener + 'static) -> Self {
        Listener::Analog(Box::new(listener))
    }

    pub fn combined(listener: impl ActionListener + AnalogListener + 'static) -> Self {
        Listener::Combined(Box::new(listener))
    }

    pub fn touch(listener: impl TouchListener + 'static) -> Self {
        Listener::Touch(Box::new(listener))
    }

    //--- Capability Views -------------------------------------------------

    pub(crate) fn as_action(&mut self) -> Option<&mut dyn ActionListener> {
        match self {
            Listener::Action(listener) => Some(listener.as_mut()),
            Listener::Combined(listener) => Some(CombinedListener::as_action(listener.as_mut())),
            Listener::Analog(_) | Listener::Touch(_) => None,
        }
    }

    pub(crate) fn as_analog(&mut self) -> Option<&mut dyn AnalogListener> {
        match self {
            Listener::Analog(listener) => Some(listener.as_mut()),
            Listener::Combined(listener) => Some(CombinedListener::as_analog(listener.as_mut())),
            Listener::Action(_) | Listener::Touch(_) => None,
        }
    }

    pub(crate) fn as_touch(&mut self) -> Option<&mut dyn TouchListener> {
        match self {
            Listener::Touch(listener) => Some(listener.as_mut()),
            _ => None,
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Listener::Action(_) => "Action",
            Listener::Analog(_) => "Analog",
            Listener::Combined(_) => "Combined",
            Listener::Touch(_) => "Touch",
        };
        write!(f, "Listener::{}", kind)
    }
}

//=== Handles =============================================================

/// Handle of a registered mapping listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle of a registered raw input listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawListenerId(pub(crate) u64);

impl fmt::Display for RawListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "raw#{}", self.0)
    }
}

//=== RawInputListener ====================================================

/// Observes every raw event of a frame before trigger translation.
///
/// Raw listeners run in registration order. Calling `consume()` on an event
/// hides it from later raw listeners and from trigger translation.
pub trait RawInputListener {
    fn begin_input(&mut self) {}
    fn end_input(&mut self) {}

    fn on_key_event(&mut self, _event: &mut KeyInputEvent) {}
    fn on_mouse_button_event(&mut self, _event: &mut MouseButtonEvent) {}
    fn on_mouse_motion_event(&mut self, _event: &mut MouseMotionEvent) {}
    fn on_joy_axis_event(&mut self, _event: &mut JoyAxisEvent) {}
    fn on_joy_button_event(&mut self, _event: &mut JoyButtonEvent) {}
    fn on_touch_event(&mut self, _event: &mut TouchEvent) {}
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Both;
    impl ActionListener for Both {
        fn on_action(&mut self, _: &str, _: bool, _: f32) {}
    }
    impl AnalogListener for Both {
        fn on_analog(&mut self, _: &str, _: f32, _: f32) {}
    }

    struct ActionOnly;
    impl ActionListener for ActionOnly {
        fn on_action(&mut self, _: &str, _: bool, _: f32) {}
    }

    #[test]
    fn combined_listener_exposes_both_capabilities() {
        let mut listener = Listener::combined(Both);
        assert!(listener.as_action().is_some());
        assert!(listener.as_analog().is_some());
        assert!(listener.as_touch().is_none());
    }

    #[test]
    fn action_listener_has_no_analog_capability() {
        let mut listener = Listener::action(ActionOnly);
        assert!(listener.as_action().is_some());
        assert!(listener.as_analog().is_none());
        assert_eq!(format!("{:?}", listener), "Listener::Action");
    }
}
