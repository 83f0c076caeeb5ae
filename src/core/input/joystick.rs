//=========================================================================
// Joysticks
//=========================================================================
//
// Read-only description of connected joysticks, their axes and buttons.
//
// Joysticks are described by the joystick driver when the dispatcher is
// built. Each axis and button carries a logical id (`"x"`, `"rz"`,
// `"pov_x"`, `"0"`, ...) so bindings can be written against a layout
// instead of raw driver indices.
//
// Two sentinel axis ids refer to the D-pad axes of any joystick, whatever
// their driver index: `AXIS_POV_X` (254) and `AXIS_POV_Y` (255).
//
//=========================================================================

//=== External Dependencies ===============================================

use log::warn;

//=== Internal Dependencies ===============================================

use super::trigger::Trigger;

//=== Constants ===========================================================

/// Sentinel axis id resolving to the horizontal D-pad axis.
pub const AXIS_POV_X: u8 = 254;

/// Sentinel axis id resolving to the vertical D-pad axis.
pub const AXIS_POV_Y: u8 = 255;

/// Logical axis ids shared by all drivers.
pub mod axis_ids {
    pub const X: &str = "x";
    pub const Y: &str = "y";
    pub const Z: &str = "z";
    pub const Z_ROTATION: &str = "rz";
    pub const LEFT_TRIGGER: &str = "rx";
    pub const RIGHT_TRIGGER: &str = "ry";
    pub const POV_X: &str = "pov_x";
    pub const POV_Y: &str = "pov_y";
}

//=== JoystickAxis ========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct JoystickAxis {
    joy_id: u8,
    index: u8,
    name: String,
    logical_id: String,
    analog: bool,
    relative: bool,
    dead_zone: f32,
}

impl JoystickAxis {
    pub fn new(joy_id: u8, index: u8, name: impl Into<String>, logical_id: impl Into<String>) -> Self {
        Self {
            joy_id,
            index,
            name: name.into(),
            logical_id: logical_id.into(),
            analog: true,
            relative: false,
            dead_zone: 0.0,
        }
    }

    /// Marks the axis as digital (D-pad style, values are -1, 0 or 1).
    pub fn digital(mut self) -> Self {
        self.analog = false;
        self
    }

    /// Marks the axis as reporting relative motion (trackballs).
    pub fn relative(mut self) -> Self {
        self.relative = true;
        self
    }

    /// Per-axis dead zone; the global dead zone still applies when larger.
    pub fn with_dead_zone(mut self, dead_zone: f32) -> Self {
        self.dead_zone = dead_zone;
        self
    }

    pub fn joy_id(&self) -> u8 {
        self.joy_id
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    pub fn is_analog(&self) -> bool {
        self.analog
    }

    pub fn is_relative(&self) -> bool {
        self.relative
    }

    pub fn dead_zone(&self) -> f32 {
        self.dead_zone
    }

    /// Positive and negative direction triggers of this axis.
    pub fn triggers(&self) -> (Trigger, Trigger) {
        (
            Trigger::JoyAxis { joy_id: self.joy_id, axis_index: self.index, negative: false },
            Trigger::JoyAxis { joy_id: self.joy_id, axis_index: self.index, negative: true },
        )
    }
}

//=== JoystickButton ======================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoystickButton {
    joy_id: u8,
    index: u8,
    name: String,
    logical_id: String,
}

impl JoystickButton {
    pub fn new(joy_id: u8, index: u8, name: impl Into<String>, logical_id: impl Into<String>) -> Self {
        Self { joy_id, index, name: name.into(), logical_id: logical_id.into() }
    }

    pub fn joy_id(&self) -> u8 {
        self.joy_id
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    pub fn trigger(&self) -> Trigger {
        Trigger::JoyButton { joy_id: self.joy_id, button_index: self.index }
    }
}

//=== Joystick ============================================================

/// A connected joystick as reported by its driver.
#[derive(Debug, Clone, PartialEq)]
pub struct Joystick {
    id: u8,
    name: String,
    axes: Vec<JoystickAxis>,
    buttons: Vec<JoystickButton>,
}

impl Joystick {
    pub fn new(id: u8, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), axes: Vec::new(), buttons: Vec::new() }
    }

    //--- Construction -----------------------------------------------------

    /// Appends an axis; its index is its position in the axis list.
    ///
    /// Axes past index 255 cannot be addressed by a trigger and are skipped.
    pub fn with_axis(mut self, name: impl Into<String>, logical_id: impl Into<String>) -> Self {
        let name: String = name.into();
        match u8::try_from(self.axes.len()) {
            Ok(index) => self.axes.push(JoystickAxis::new(self.id, index, name, logical_id)),
            Err(_) => warn!(
                target: "input",
                "Joystick {} has no axis index left for '{}'",
                self.id,
                name
            ),
        }
        self
    }

    /// Appends a fully configured axis description.
    pub fn with_axis_desc(mut self, axis: JoystickAxis) -> Self {
        self.axes.push(axis);
        self
    }

    /// Appends a button whose logical id is its index.
    ///
    /// Buttons past index 255 are skipped.
    pub fn with_button(mut self, name: impl Into<String>) -> Self {
        let name: String = name.into();
        match u8::try_from(self.buttons.len()) {
            Ok(index) => {
                self.buttons.push(JoystickButton::new(self.id, index, name, index.to_string()))
            }
            Err(_) => warn!(
                target: "input",
                "Joystick {} has no button index left for '{}'",
                self.id,
                name
            ),
        }
        self
    }

    //--- Queries ----------------------------------------------------------

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn axes(&self) -> &[JoystickAxis] {
        &self.axes
    }

    pub fn buttons(&self) -> &[JoystickButton] {
        &self.buttons
    }

    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Axis by driver index, resolving the POV sentinels.
    pub fn axis(&self, index: u8) -> Option<&JoystickAxis> {
        match index {
            AXIS_POV_X => self.pov_x_axis(),
            AXIS_POV_Y => self.pov_y_axis(),
            _ => self.axes.iter().find(|a| a.index == index),
        }
    }

    pub fn axis_by_logical_id(&self, logical_id: &str) -> Option<&JoystickAxis> {
        self.axes.iter().find(|a| a.logical_id == logical_id)
    }

    pub fn axis_by_name(&self, name: &str) -> Option<&JoystickAxis> {
        self.axes.iter().find(|a| a.name == name)
    }

    pub fn button(&self, index: u8) -> Option<&JoystickButton> {
        self.buttons.iter().find(|b| b.index == index)
    }

    pub fn button_by_logical_id(&self, logical_id: &str) -> Option<&JoystickButton> {
        self.buttons.iter().find(|b| b.logical_id == logical_id)
    }

    pub fn button_by_name(&self, name: &str) -> Option<&JoystickButton> {
        self.buttons.iter().find(|b| b.name == name)
    }

    //--- Well-Known Axes --------------------------------------------------

    pub fn x_axis(&self) -> Option<&JoystickAxis> {
        self.axis_by_logical_id(axis_ids::X)
    }

    pub fn y_axis(&self) -> Option<&JoystickAxis> {
        self.axis_by_logical_id(axis_ids::Y)
    }

    pub fn pov_x_axis(&self) -> Option<&JoystickAxis> {
        self.axis_by_logical_id(axis_ids::POV_X)
    }

    pub fn pov_y_axis(&self) -> Option<&JoystickAxis> {
        self.axis_by_logical_id(axis_ids::POV_Y)
    }

    //--- Triggers ---------------------------------------------------------

    /// Positive and negative triggers of an axis, POV sentinels resolved.
    pub fn axis_triggers(&self, axis_index: u8) -> Option<(Trigger, Trigger)> {
        self.axis(axis_index).map(JoystickAxis::triggers)
    }

    pub fn button_trigger(&self, button_index: u8) -> Option<Trigger> {
        self.button(button_index).map(JoystickButton::trigger)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------

    fn gamepad() -> Joystick {
        Joystick::new(1, "Gamepad")
            .with_axis("Left Stick X", axis_ids::X)
            .with_axis("Left Stick Y", axis_ids::Y)
            .with_axis("D-Pad X", axis_ids::POV_X)
            .with_axis("D-Pad Y", axis_ids::POV_Y)
            .with_button("A")
            .with_button("B")
    }

    #[test]
    fn axes_and_buttons_are_indexed_in_order() {
        let pad = gamepad();
        assert_eq!(pad.axis_count(), 4);
        assert_eq!(pad.button_count(), 2);
        assert_eq!(pad.axis(1).map(JoystickAxis::name), Some("Left Stick Y"));
        assert_eq!(pad.button_by_logical_id("1").map(JoystickButton::name), Some("B"));
    }

    #[test]
    fn pov_sentinels_resolve_to_dpad_axes() {
        let pad = gamepad();
        assert_eq!(pad.axis(AXIS_POV_X).map(JoystickAxis::index), Some(2));
        assert_eq!(pad.axis(AXIS_POV_Y).map(JoystickAxis::index), Some(3));

        let (pos, neg) = pad.axis_triggers(AXIS_POV_Y).unwrap();
        assert_eq!(pos, Trigger::JoyAxis { joy_id: 1, axis_index: 3, negative: false });
        assert_eq!(neg, Trigger::JoyAxis { joy_id: 1, axis_index: 3, negative: true });
    }

    #[test]
    fn missing_pov_axis_resolves_to_none() {
        let stick = Joystick::new(0, "Flight Stick").with_axis("X", axis_ids::X);
        assert!(stick.axis(AXIS_POV_X).is_none());
        assert!(stick.axis_triggers(AXIS_POV_Y).is_none());
    }

    #[test]
    fn well_known_axes_by_logical_id() {
        let pad = gamepad();
        assert_eq!(pad.x_axis().map(JoystickAxis::index), Some(0));
        assert_eq!(pad.y_axis().map(JoystickAxis::index), Some(1));
        assert_eq!(pad.axis_by_name("D-Pad X").map(JoystickAxis::logical_id), Some("pov_x"));
    }

    #[test]
    fn button_trigger_carries_joystick_id() {
        let pad = gamepad();
        assert_eq!(
            pad.button_trigger(0),
            Some(Trigger::JoyButton { joy_id: 1, button_index: 0 })
        );
        assert_eq!(pad.button_trigger(9), None);
    }

    #[test]
    fn indices_stop_at_the_trigger_range() {
        let mut pad = Joystick::new(0, "Wide");
        for i in 0..300 {
            pad = pad.with_axis(format!("Axis {i}"), format!("a{i}")).with_button(format!("B{i}"));
        }

        assert_eq!(pad.axis_count(), 256);
        assert_eq!(pad.button_count(), 256);
        assert_eq!(pad.axes().last().map(JoystickAxis::index), Some(255));
        assert_eq!(pad.buttons().last().map(JoystickButton::index), Some(255));
    }
}
