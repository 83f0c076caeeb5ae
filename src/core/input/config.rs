//=========================================================================
// Input Configuration
//=========================================================================
//
// Tunables of the dispatcher and the builder that assembles it from its
// device drivers.
//
// Usage:
// ```ignore
// let input = InputManagerBuilder::new(keyboard, mouse)
//     .with_joystick(gamepads)
//     .with_axis_dead_zone(0.1)
//     .build()?;
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use super::driver::{JoyInput, KeyInput, MouseInput, TouchInput};
use super::error::{InputError, Result};
use super::input_manager::InputManager;

//=== Defaults ============================================================

pub const DEFAULT_AXIS_DEAD_ZONE: f32 = 0.05;
pub const DEFAULT_SAFE_MODE_THRESHOLD: f32 = 0.015;
pub const DEFAULT_MOUSE_AXIS_DIVISOR: f32 = 1024.0;
pub const DEFAULT_WHEEL_DIVISOR: f32 = 100.0;

//=== InputConfig =========================================================

/// Dispatcher tunables. Validated before use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputConfig {
    /// Axis magnitudes below this value count as "at rest".
    pub axis_dead_zone: f32,
    /// Frames with a `tpf` (seconds) below this value use full button magnitude.
    pub safe_mode_threshold: f32,
    /// Mouse motion in pixels is divided by this to get an axis magnitude.
    pub mouse_axis_divisor: f32,
    /// Wheel motion is divided by this to get an axis magnitude.
    pub wheel_divisor: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            axis_dead_zone: DEFAULT_AXIS_DEAD_ZONE,
            safe_mode_threshold: DEFAULT_SAFE_MODE_THRESHOLD,
            mouse_axis_divisor: DEFAULT_MOUSE_AXIS_DIVISOR,
            wheel_divisor: DEFAULT_WHEEL_DIVISOR,
        }
    }
}

impl InputConfig {
    pub fn validate(&self) -> Result<()> {
        validate_dead_zone(self.axis_dead_zone)?;

        if !self.safe_mode_threshold.is_finite() || self.safe_mode_threshold < 0.0 {
            return Err(InputError::Config {
                message: format!(
                    "safe mode threshold must be a non-negative number of seconds, got {}",
                    self.safe_mode_threshold
                ),
            });
        }

        for (label, divisor) in [
            ("mouse axis divisor", self.mouse_axis_divisor),
            ("wheel divisor", self.wheel_divisor),
        ] {
            if !divisor.is_finite() || divisor <= 0.0 {
                return Err(InputError::Config {
                    message: format!("{} must be positive, got {}", label, divisor),
                });
            }
        }

        Ok(())
    }
}

/// Dead zones must be finite and within `[0, 1]`.
pub(crate) fn validate_dead_zone(value: f32) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(InputError::InvalidDeadZone { value })
    }
}

//=== InputManagerBuilder =================================================

/// Assembles an [`InputManager`] from its drivers and tunables.
///
/// Keyboard and mouse drivers are mandatory; joystick and touch are optional.
pub struct InputManagerBuilder {
    keys: Box<dyn KeyInput>,
    mouse: Box<dyn MouseInput>,
    joystick: Option<Box<dyn JoyInput>>,
    touch: Option<Box<dyn TouchInput>>,
    config: InputConfig,
}

impl InputManagerBuilder {
    pub fn new(keys: impl KeyInput + 'static, mouse: impl MouseInput + 'static) -> Self {
        Self {
            keys: Box::new(keys),
            mouse: Box::new(mouse),
            joystick: None,
            touch: None,
            config: InputConfig::default(),
        }
    }

    pub fn with_joystick(mut self, joystick: impl JoyInput + 'static) -> Self {
        self.joystick = Some(Box::new(joystick));
        self
    }

    pub fn with_touch(mut self, touch: impl TouchInput + 'static) -> Self {
        self.touch = Some(Box::new(touch));
        self
    }

    /// Replaces every tunable at once.
    pub fn with_config(mut self, config: InputConfig) -> Self {
        self.config = config;
        self
    }

    /// Global axis dead zone.
    ///
    /// Default: 0.05
    pub fn with_axis_dead_zone(mut self, dead_zone: f32) -> Self {
        self.config.axis_dead_zone = dead_zone;
        self
    }

    /// Frames shorter than `seconds` skip fractional button magnitudes.
    ///
    /// Default: 0.015
    pub fn with_safe_mode_threshold(mut self, seconds: f32) -> Self {
        self.config.safe_mode_threshold = seconds;
        self
    }

    /// Default: 1024.0
    pub fn with_mouse_axis_divisor(mut self, divisor: f32) -> Self {
        self.config.mouse_axis_divisor = divisor;
        self
    }

    /// Default: 100.0
    pub fn with_wheel_divisor(mut self, divisor: f32) -> Self {
        self.config.wheel_divisor = divisor;
        self
    }

    /// Validates the configuration, wires and initializes the drivers.
    pub fn build(self) -> Result<InputManager> {
        self.config.validate()?;

        info!(
            target: "input",
            "Building input manager (dead zone: {}, joystick: {}, touch: {})",
            self.config.axis_dead_zone,
            self.joystick.is_some(),
            self.touch.is_some()
        );

        InputManager::assemble(self.keys, self.mouse, self.joystick, self.touch, self.config)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = InputConfig::default();
        assert_eq!(config.axis_dead_zone, 0.05);
        assert_eq!(config.safe_mode_threshold, 0.015);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn dead_zone_outside_unit_range_is_rejected() {
        for value in [-0.1, 1.5, f32::NAN, f32::INFINITY] {
            let config = InputConfig { axis_dead_zone: value, ..InputConfig::default() };
            assert!(
                matches!(config.validate(), Err(InputError::InvalidDeadZone { .. })),
                "dead zone {} should be rejected",
                value
            );
        }
    }

    #[test]
    fn dead_zone_bounds_are_inclusive() {
        assert!(validate_dead_zone(0.0).is_ok());
        assert!(validate_dead_zone(1.0).is_ok());
    }

    #[test]
    fn non_positive_divisor_is_rejected() {
        let config = InputConfig { wheel_divisor: 0.0, ..InputConfig::default() };
        assert!(matches!(config.validate(), Err(InputError::Config { .. })));
    }

    #[test]
    fn negative_safe_mode_threshold_is_rejected() {
        let config = InputConfig { safe_mode_threshold: -1.0, ..InputConfig::default() };
        assert!(matches!(config.validate(), Err(InputError::Config { .. })));
    }
}
