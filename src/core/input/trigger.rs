//=========================================================================
// Triggers
//=========================================================================
//
// A trigger names one physical input source: a key, a mouse button, one
// direction of a mouse or joystick axis, a joystick button or a touch code.
//
// Every trigger reduces to a 32-bit identity hash used as the key of the
// binding index. The encoding packs the trigger kind, device, direction
// and index into disjoint bit ranges, so distinct triggers never share a
// hash.
//
// Layout:
//   bits 24..27  kind tag (1..=6)
//   bits 16..23  device (joystick id, 0 otherwise)
//   bit  8       negative direction (axes only)
//   bits 0..7    key / button / axis / touch code
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::event::{MouseAxis, MouseButton};
use super::keys::KeyCode;

//=== Constants ===========================================================

/// Touch code matching every pointer and gesture event.
pub const TOUCH_ALL: u8 = 0;

/// 32-bit identity of a trigger.
pub type TriggerHash = i32;

//=== TriggerKind =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
enum TriggerKind {
    Key = 1,
    MouseButton = 2,
    MouseAxis = 3,
    JoyAxis = 4,
    JoyButton = 5,
    Touch = 6,
}

const fn pack(kind: TriggerKind, device: u8, negative: bool, index: u8) -> TriggerHash {
    ((kind as i32) << 24) | ((device as i32) << 16) | ((negative as i32) << 8) | index as i32
}

//=== Trigger =============================================================

/// A physical input source that can be bound to named mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Key(KeyCode),
    MouseButton(MouseButton),
    MouseAxis { axis: MouseAxis, negative: bool },
    JoyAxis { joy_id: u8, axis_index: u8, negative: bool },
    JoyButton { joy_id: u8, button_index: u8 },
    /// Touch code; [`TOUCH_ALL`] matches every pointer and gesture event.
    Touch(u8),
}

impl Trigger {
    //--- Hashing ----------------------------------------------------------

    /// Deterministic identity hash. Equal triggers hash equally and
    /// distinct triggers never collide.
    pub const fn trigger_hash(&self) -> TriggerHash {
        match *self {
            Trigger::Key(key) => key_hash(key),
            Trigger::MouseButton(button) => mouse_button_hash(button),
            Trigger::MouseAxis { axis, negative } => mouse_axis_hash(axis, negative),
            Trigger::JoyAxis { joy_id, axis_index, negative } => {
                joy_axis_hash(joy_id, axis_index, negative)
            }
            Trigger::JoyButton { joy_id, button_index } => joy_button_hash(joy_id, button_index),
            Trigger::Touch(code) => touch_hash(code),
        }
    }

    /// Short diagnostic label used in log output.
    pub fn label(&self) -> String {
        match self {
            Trigger::Key(key) => format!("KeyCode {}", key),
            Trigger::MouseButton(button) => format!("Mouse Button {}", button.index()),
            Trigger::MouseAxis { axis, negative } => {
                format!("Mouse Axis {:?}{}", axis, if *negative { " (neg)" } else { "" })
            }
            Trigger::JoyAxis { joy_id, axis_index, negative } => format!(
                "Joystick {} Axis {}{}",
                joy_id,
                axis_index,
                if *negative { " (neg)" } else { "" }
            ),
            Trigger::JoyButton { joy_id, button_index } => {
                format!("Joystick {} Button {}", joy_id, button_index)
            }
            Trigger::Touch(code) => format!("Touch {}", code),
        }
    }
}

impl From<KeyCode> for Trigger {
    fn from(key: KeyCode) -> Self {
        Trigger::Key(key)
    }
}

impl From<MouseButton> for Trigger {
    fn from(button: MouseButton) -> Self {
        Trigger::MouseButton(button)
    }
}

//--- Hash Helpers ---------------------------------------------------------
//
// Used directly by the dispatcher when translating raw events, so the
// translation path never builds a `Trigger` value.
//

pub const fn key_hash(key: KeyCode) -> TriggerHash {
    pack(TriggerKind::Key, 0, false, key.0)
}

pub const fn mouse_button_hash(button: MouseButton) -> TriggerHash {
    pack(TriggerKind::MouseButton, 0, false, button.0)
}

pub const fn mouse_axis_hash(axis: MouseAxis, negative: bool) -> TriggerHash {
    pack(TriggerKind::MouseAxis, 0, negative, axis.index())
}

pub const fn joy_axis_hash(joy_id: u8, axis_index: u8, negative: bool) -> TriggerHash {
    pack(TriggerKind::JoyAxis, joy_id, negative, axis_index)
}

pub const fn joy_button_hash(joy_id: u8, button_index: u8) -> TriggerHash {
    pack(TriggerKind::JoyButton, joy_id, false, button_index)
}

pub const fn touch_hash(code: u8) -> TriggerHash {
    pack(TriggerKind::Touch, 0, false, code)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    //--- Test Helpers -----------------------------------------------------

    fn all_triggers() -> Vec<Trigger> {
        let mut triggers = Vec::new();
        for code in 0..=u8::MAX {
            triggers.push(Trigger::Key(KeyCode(code)));
            triggers.push(Trigger::MouseButton(MouseButton(code)));
            triggers.push(Trigger::Touch(code));
        }
        for axis in MouseAxis::ALL {
            triggers.push(Trigger::MouseAxis { axis, negative: false });
            triggers.push(Trigger::MouseAxis { axis, negative: true });
        }
        for joy_id in 0..=u8::MAX {
            for index in 0..=u8::MAX {
                triggers.push(Trigger::JoyAxis { joy_id, axis_index: index, negative: false });
                triggers.push(Trigger::JoyAxis { joy_id, axis_index: index, negative: true });
                triggers.push(Trigger::JoyButton { joy_id, button_index: index });
            }
        }
        triggers
    }

    fn any_trigger() -> impl Strategy<Value = Trigger> {
        let mouse_axis = prop_oneof![
            Just(MouseAxis::X),
            Just(MouseAxis::Y),
            Just(MouseAxis::Wheel)
        ];
        prop_oneof![
            any::<u8>().prop_map(|c| Trigger::Key(KeyCode(c))),
            any::<u8>().prop_map(|b| Trigger::MouseButton(MouseButton(b))),
            (mouse_axis, any::<bool>())
                .prop_map(|(axis, negative)| Trigger::MouseAxis { axis, negative }),
            (any::<u8>(), any::<u8>(), any::<bool>()).prop_map(|(joy_id, axis_index, negative)| {
                Trigger::JoyAxis { joy_id, axis_index, negative }
            }),
            (any::<u8>(), any::<u8>())
                .prop_map(|(joy_id, button_index)| Trigger::JoyButton { joy_id, button_index }),
            any::<u8>().prop_map(Trigger::Touch),
        ]
    }

    //=====================================================================
    // Identity Tests
    //=====================================================================

    /// Walks the whole trigger domain and checks no two triggers collide.
    #[test]
    fn hashes_are_unique_across_full_domain() {
        let mut seen: HashMap<TriggerHash, Trigger> = HashMap::new();
        for trigger in all_triggers() {
            if let Some(previous) = seen.insert(trigger.trigger_hash(), trigger) {
                panic!("{:?} and {:?} share a hash", previous, trigger);
            }
        }
    }

    #[test]
    fn axis_directions_hash_differently() {
        let pos = Trigger::JoyAxis { joy_id: 0, axis_index: 1, negative: false };
        let neg = Trigger::JoyAxis { joy_id: 0, axis_index: 1, negative: true };
        assert_ne!(pos.trigger_hash(), neg.trigger_hash());
    }

    #[test]
    fn helpers_match_trigger_values() {
        assert_eq!(Trigger::Key(KeyCode::SPACE).trigger_hash(), key_hash(KeyCode::SPACE));
        assert_eq!(
            Trigger::MouseAxis { axis: MouseAxis::Wheel, negative: true }.trigger_hash(),
            mouse_axis_hash(MouseAxis::Wheel, true)
        );
        assert_eq!(Trigger::Touch(TOUCH_ALL).trigger_hash(), touch_hash(0));
    }

    #[test]
    fn labels_are_readable() {
        assert_eq!(Trigger::Key(KeyCode::SPACE).label(), "KeyCode Space");
        assert_eq!(
            Trigger::JoyButton { joy_id: 1, button_index: 4 }.label(),
            "Joystick 1 Button 4"
        );
    }

    proptest! {
        #[test]
        fn hash_equality_matches_trigger_equality(a in any_trigger(), b in any_trigger()) {
            prop_assert_eq!(a == b, a.trigger_hash() == b.trigger_hash());
        }

        #[test]
        fn hash_is_deterministic(t in any_trigger()) {
            let copy = t;
            prop_assert_eq!(t.trigger_hash(), copy.trigger_hash());
        }
    }
}
