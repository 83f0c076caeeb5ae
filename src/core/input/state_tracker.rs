//=========================================================================
// State Tracker
//=========================================================================
//
// Transient dispatcher state: held triggers, active axes and frame timing.
//
// Architecture:
//   press event   → pressed[hash] = press time
//   axis event    → axes[hash] = { magnitude, source, touched }
//   update(tpf)   → begin_frame() → dispatch → end_frame()
//
// Persistent state survives frame boundaries; `touched` flags are
// per-frame and cleared by the held-state pass.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;

//=== Internal Dependencies ===============================================

use super::trigger::TriggerHash;

//=== AxisSource ==========================================================

/// Where an active axis value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AxisSource {
    /// Absolute position; keeps reporting while held.
    Joystick,
    /// Relative motion; released when a frame brings no motion.
    Mouse,
}

//=== AxisValue ===========================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AxisValue {
    pub(crate) magnitude: f32,
    pub(crate) source: AxisSource,
    /// Set when an event reported this axis during the current frame.
    pub(crate) touched: bool,
}

//=== DispatcherState =====================================================

/// Held triggers, active axes and the timing of the current frame.
#[derive(Debug, Default)]
pub(crate) struct DispatcherState {
    //--- Persistent State (survives frame boundary) ----------------------
    pressed: BTreeMap<TriggerHash, i64>,
    axes: BTreeMap<TriggerHash, AxisValue>,
    cursor: (f32, f32),
    last_frame_time: i64,

    //--- Frame Timing (set by begin_frame) --------------------------------
    frame_tpf: f32,
    frame_time: i64,
    frame_delta: i64,
    safe_mode: bool,
}

impl DispatcherState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    //--- Frame Lifecycle --------------------------------------------------

    /// Records the timing of a new frame.
    pub(crate) fn begin_frame(&mut self, tpf: f32, now: i64, safe_mode_threshold: f32) {
        self.frame_tpf = tpf;
        self.frame_time = now;
        self.frame_delta = now - self.last_frame_time;
        self.safe_mode = tpf < safe_mode_threshold;
    }

    /// Makes the current frame timestamp the reference for the next frame.
    pub(crate) fn end_frame(&mut self) {
        self.last_frame_time = self.frame_time;
    }

    pub(crate) fn tpf(&self) -> f32 {
        self.frame_tpf
    }

    pub(crate) fn frame_time(&self) -> i64 {
        self.frame_time
    }

    pub(crate) fn last_frame_time(&self) -> i64 {
        self.last_frame_time
    }

    /// Fraction of the frame a button was held, in `[0, 1]`.
    ///
    /// Falls back to 1.0 in safe mode and when the frame delta is unusable.
    pub(crate) fn held_fraction(&self, held_nanos: i64) -> f32 {
        if self.safe_mode || self.frame_delta <= 0 {
            return 1.0;
        }
        (held_nanos as f64 / self.frame_delta as f64).clamp(0.0, 1.0) as f32
    }

    //--- Pressed Triggers -------------------------------------------------

    pub(crate) fn press(&mut self, hash: TriggerHash, time: i64) {
        self.pressed.insert(hash, time);
    }

    /// Removes a held trigger and returns its press time.
    pub(crate) fn release(&mut self, hash: TriggerHash) -> Option<i64> {
        self.pressed.remove(&hash)
    }

    pub(crate) fn pressed(&self) -> impl Iterator<Item = (TriggerHash, i64)> + '_ {
        self.pressed.iter().map(|(hash, time)| (*hash, *time))
    }

    pub(crate) fn is_pressed(&self, hash: TriggerHash) -> bool {
        self.pressed.contains_key(&hash)
    }

    //--- Axis Values ------------------------------------------------------

    pub(crate) fn axis(&self, hash: TriggerHash) -> Option<&AxisValue> {
        self.axes.get(&hash)
    }

    pub(crate) fn set_axis(&mut self, hash: TriggerHash, magnitude: f32, source: AxisSource) {
        self.axes.insert(hash, AxisValue { magnitude, source, touched: true });
    }

    pub(crate) fn remove_axis(&mut self, hash: TriggerHash) -> Option<AxisValue> {
        self.axes.remove(&hash)
    }

    pub(crate) fn axes(&self) -> impl Iterator<Item = (TriggerHash, AxisValue)> + '_ {
        self.axes.iter().map(|(hash, value)| (*hash, *value))
    }

    /// Clears every per-frame `touched` flag.
    pub(crate) fn untouch_axes(&mut self) {
        for value in self.axes.values_mut() {
            value.touched = false;
        }
    }

    //--- Pruning ----------------------------------------------------------

    /// Drops held triggers and axes rejected by `keep`.
    pub(crate) fn retain_bound(&mut self, keep: impl Fn(TriggerHash) -> bool) {
        self.pressed.retain(|hash, _| keep(*hash));
        self.axes.retain(|hash, _| keep(*hash));
    }

    /// Forgets every held trigger and active axis.
    pub(crate) fn reset(&mut self) {
        self.pressed.clear();
        self.axes.clear();
    }

    //--- Cursor -----------------------------------------------------------

    pub(crate) fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    pub(crate) fn set_cursor(&mut self, position: (f32, f32)) {
        self.cursor = position;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
