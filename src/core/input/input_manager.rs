//=========================================================================
// Input Manager
//
// Frame-driven dispatcher turning raw device events into named mapping
// callbacks.
//
// Responsibilities:
// - Drive the device drivers once per frame and collect their events
// - Let raw listeners observe (and consume) events before translation
// - Translate events to trigger hashes and notify mapping listeners
// - Track held buttons and active axes to emit continuous analog values
//
// Frame lifecycle (`update(tpf)`):
// ```text
// Idle → Collecting   sink open, drivers update() and push events
//      → Dispatching  sink closed, raw listeners then trigger translation
//      → HeldPass     analog values for held buttons and resting axes
//      → Idle
// ```
//
// Every analog value handed to listeners is a magnitude scaled by `tpf`.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::Receiver;
use log::{debug, error, info, trace};

//=== Internal Dependencies ===============================================

use super::config::{validate_dead_zone, InputConfig};
use super::driver::{EventSink, InputDevice, JoyInput, KeyInput, MouseInput, TouchInput};
use super::error::{InputError, Result};
use super::event::{
    InputEvent, JoyAxisEvent, MouseAxis, MouseMotionEvent, TouchEvent,
};
use super::joystick::{Joystick, JoystickAxis};
use super::keys::KeyCode;
use super::listener::{Listener, ListenerId, RawInputListener, RawListenerId};
use super::mapping::MappingTable;
use super::state_tracker::{AxisSource, DispatcherState};
use super::trigger::{
    joy_axis_hash, joy_button_hash, key_hash, mouse_axis_hash, mouse_button_hash, touch_hash,
    Trigger, TriggerHash,
};

//=== InputManager ========================================================

/// Owns the device drivers, the mapping table and all listeners.
///
/// Built with [`InputManagerBuilder`](super::config::InputManagerBuilder)
/// and driven by calling [`update`](Self::update) once per frame.
pub struct InputManager {
    //--- Devices ----------------------------------------------------------
    keys: Box<dyn KeyInput>,
    mouse: Box<dyn MouseInput>,
    joystick: Option<Box<dyn JoyInput>>,
    touch: Option<Box<dyn TouchInput>>,
    joysticks: Vec<Joystick>,

    //--- Event Queue ------------------------------------------------------
    sink: EventSink,
    receiver: Receiver<InputEvent>,
    queue: Vec<InputEvent>,

    //--- Listeners & State ------------------------------------------------
    mappings: MappingTable,
    raw_listeners: Vec<(RawListenerId, Box<dyn RawInputListener>)>,
    next_raw_listener_id: u64,
    state: DispatcherState,
    config: InputConfig,
    cursor_visible: bool,
    destroyed: bool,
}

impl InputManager {
    //--- Construction -----------------------------------------------------

    pub(crate) fn assemble(
        mut keys: Box<dyn KeyInput>,
        mut mouse: Box<dyn MouseInput>,
        mut joystick: Option<Box<dyn JoyInput>>,
        mut touch: Option<Box<dyn TouchInput>>,
        config: InputConfig,
    ) -> Result<Self> {
        let (sink, receiver) = EventSink::new();

        start_device(keys.as_mut(), &sink)?;
        start_device(mouse.as_mut(), &sink)?;
        if let Some(joystick) = joystick.as_mut() {
            start_device(joystick.as_mut(), &sink)?;
        }
        if let Some(touch) = touch.as_mut() {
            start_device(touch.as_mut(), &sink)?;
        }

        let joysticks = joystick.as_mut().map(|j| j.load_joysticks()).unwrap_or_default();
        for joy in &joysticks {
            info!(
                target: "input",
                "Joystick {} '{}': {} axes, {} buttons",
                joy.id(),
                joy.name(),
                joy.axis_count(),
                joy.button_count()
            );
        }

        let mut state = DispatcherState::new();
        state.begin_frame(0.0, keys.input_time_nanos(), config.safe_mode_threshold);
        state.end_frame();

        Ok(Self {
            keys,
            mouse,
            joystick,
            touch,
            joysticks,
            sink,
            receiver,
            queue: Vec::with_capacity(64),
            mappings: MappingTable::new(),
            raw_listeners: Vec::new(),
            next_raw_listener_id: 0,
            state,
            config,
            cursor_visible: true,
            destroyed: false,
        })
    }

    //=====================================================================
    // Frame Update
    //=====================================================================

    /// Runs one input frame. `tpf` is the frame duration in seconds.
    ///
    /// A driver error aborts the frame: events collected so far are
    /// discarded and the error is returned.
    pub fn update(&mut self, tpf: f32) -> Result<()> {
        let now = self.keys.input_time_nanos();
        self.state.begin_frame(tpf, now, self.config.safe_mode_threshold);

        //--- Collecting ---------------------------------------------------
        self.sink.set_permitted(true);
        let polled = self.poll_devices();
        self.sink.set_permitted(false);

        self.queue.extend(self.receiver.try_iter());
        if let Err(err) = polled {
            error!(target: "input::dispatch", "Input frame aborted: {}", err);
            self.queue.clear();
            return Err(err);
        }

        //--- Dispatching --------------------------------------------------
        trace!(target: "input::dispatch", "Dispatching {} raw events", self.queue.len());
        self.process_queue();

        //--- Held-State Pass ----------------------------------------------
        self.process_held_state();

        self.state.end_frame();
        Ok(())
    }

    fn poll_devices(&mut self) -> Result<()> {
        self.keys.update()?;
        self.mouse.update()?;
        if let Some(joystick) = self.joystick.as_mut() {
            joystick.update()?;
        }
        if let Some(touch) = self.touch.as_mut() {
            touch.update()?;
        }
        Ok(())
    }

    fn process_queue(&mut self) {
        let mut queue = std::mem::take(&mut self.queue);

        for event in &queue {
            if let Some(position) = event.cursor_position() {
                self.state.set_cursor(position);
            }
        }

        for (_, listener) in self.raw_listeners.iter_mut() {
            listener.begin_input();
            for event in queue.iter_mut() {
                if !event.is_consumed() {
                    deliver_raw(listener.as_mut(), event);
                }
            }
            listener.end_input();
        }

        for event in queue.iter_mut() {
            if event.is_consumed() {
                continue;
            }
            self.translate(event);
            event.consume();
        }

        queue.clear();
        self.queue = queue;
    }

    //--- Translation ------------------------------------------------------

    fn translate(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Key(e) => {
                if !e.repeating {
                    self.on_button(key_hash(e.key), e.pressed, e.time());
                }
            }
            InputEvent::MouseButton(e) => {
                self.on_button(mouse_button_hash(e.button), e.pressed, e.time());
            }
            InputEvent::MouseMotion(e) => self.on_mouse_motion(e),
            InputEvent::JoyAxis(e) => self.on_joy_axis(e),
            InputEvent::JoyButton(e) => {
                self.on_button(joy_button_hash(e.joy_id, e.button_index), e.pressed, e.time());
            }
            InputEvent::Touch(e) => self.on_touch(e),
        }
    }

    /// Buttons: an action edge, then on release the analog for the part of
    /// the hold not yet reported by held-state passes.
    fn on_button(&mut self, hash: TriggerHash, pressed: bool, time: i64) {
        let tpf = self.state.tpf();
        self.mappings.invoke_actions(hash, pressed, tpf);

        if pressed {
            if self.mappings.is_bound(hash) && !self.state.is_pressed(hash) {
                self.state.press(hash, time);
            }
        } else if let Some(press_time) = self.state.release(hash) {
            let held = time - press_time.max(self.state.last_frame_time());
            if held > 0 {
                let magnitude = self.state.held_fraction(held);
                self.mappings.invoke_analogs(hash, magnitude * tpf, tpf);
            }
        }
    }

    fn on_mouse_motion(&mut self, event: &MouseMotionEvent) {
        let motion = [
            (MouseAxis::X, event.dx, self.config.mouse_axis_divisor),
            (MouseAxis::Y, event.dy, self.config.mouse_axis_divisor),
            (MouseAxis::Wheel, event.delta_wheel, self.config.wheel_divisor),
        ];

        for (axis, delta, divisor) in motion {
            if delta != 0.0 {
                self.on_axis(
                    mouse_axis_hash(axis, false),
                    mouse_axis_hash(axis, true),
                    delta / divisor,
                    self.config.axis_dead_zone,
                    AxisSource::Mouse,
                );
            }
        }
    }

    fn on_joy_axis(&mut self, event: &JoyAxisEvent) {
        let axis_dead_zone = self
            .joystick(event.joy_id)
            .and_then(|joy| joy.axes().iter().find(|a| a.index() == event.axis_index))
            .map_or(0.0, JoystickAxis::dead_zone);

        self.on_axis(
            joy_axis_hash(event.joy_id, event.axis_index, false),
            joy_axis_hash(event.joy_id, event.axis_index, true),
            event.value,
            self.config.axis_dead_zone.max(axis_dead_zone),
            AxisSource::Joystick,
        );
    }

    /// Shared axis handling for joystick and mouse-derived axes.
    fn on_axis(
        &mut self,
        positive: TriggerHash,
        negative: TriggerHash,
        value: f32,
        dead_zone: f32,
        source: AxisSource,
    ) {
        let tpf = self.state.tpf();
        let magnitude = value.abs();

        if magnitude < dead_zone {
            for hash in [positive, negative] {
                if self.state.remove_axis(hash).is_some() {
                    self.mappings.invoke_actions(hash, false, tpf);
                }
            }
            return;
        }

        let (active, opposite) = if value < 0.0 { (negative, positive) } else { (positive, negative) };

        // Crossed the center without passing through the dead zone.
        if self.state.remove_axis(opposite).is_some() {
            self.mappings.invoke_actions(opposite, false, tpf);
        }

        if !self.mappings.is_bound(active) {
            self.state.remove_axis(active);
            return;
        }

        let entering = self.state.axis(active).is_none();
        self.mappings.invoke_analogs_and_actions(active, magnitude * tpf, tpf, entering);
        self.state.set_axis(active, magnitude, source);
    }

    fn on_touch(&mut self, event: &TouchEvent) {
        let tpf = self.state.tpf();
        self.mappings.invoke_touch(touch_hash(event.key_code), event, tpf);
    }

    //--- Held-State Pass --------------------------------------------------

    fn process_held_state(&mut self) {
        let tpf = self.state.tpf();
        let now = self.state.frame_time();
        let last = self.state.last_frame_time();

        let mappings = &self.mappings;
        self.state.retain_bound(|hash| mappings.is_bound(hash));

        for (hash, press_time) in self.state.pressed() {
            let held = now - last.max(press_time);
            if held > 0 {
                let magnitude = self.state.held_fraction(held);
                self.mappings.invoke_analogs(hash, magnitude * tpf, tpf);
            }
        }

        let mut stopped = Vec::new();
        for (hash, axis) in self.state.axes() {
            if axis.touched {
                continue;
            }
            match axis.source {
                AxisSource::Joystick => {
                    self.mappings.invoke_analogs(hash, axis.magnitude * tpf, tpf);
                }
                AxisSource::Mouse => {
                    self.mappings.invoke_actions(hash, false, tpf);
                    stopped.push(hash);
                }
            }
        }
        for hash in stopped {
            self.state.remove_axis(hash);
        }

        self.state.untouch_axes();
    }

    //=====================================================================
    // Mappings
    //=====================================================================

    /// Creates `name` if absent and binds each trigger to it.
    pub fn add_mapping(&mut self, name: &str, triggers: &[Trigger]) -> Result<()> {
        self.mappings.add_mapping(name, triggers)
    }

    /// Removes a mapping and all of its bindings.
    pub fn delete_mapping(&mut self, name: &str) -> Result<()> {
        self.mappings.delete_mapping(name)
    }

    /// Detaches one trigger from a mapping. `Ok(false)` if it was not bound.
    pub fn delete_trigger(&mut self, name: &str, trigger: &Trigger) -> Result<bool> {
        self.mappings.delete_trigger(name, trigger)
    }

    pub fn has_mapping(&self, name: &str) -> bool {
        self.mappings.has_mapping(name)
    }

    pub fn mapping_names(&self) -> impl Iterator<Item = &str> {
        self.mappings.mapping_names()
    }

    /// Trigger hashes bound to a mapping.
    pub fn triggers_of(&self, name: &str) -> Option<&[TriggerHash]> {
        self.mappings.triggers_of(name)
    }

    /// Drops every mapping, binding and registered listener, then resets
    /// held state. The dispatcher behaves like a freshly built one.
    ///
    /// The removed listeners are returned in registration order; their
    /// `ListenerId`s are no longer valid. Raw listeners are kept.
    pub fn clear_all(&mut self) -> Vec<Listener> {
        let listeners = self.mappings.clear();
        self.state.reset();
        debug!(
            target: "input::mapping",
            "Cleared all mappings and {} listener(s)",
            listeners.len()
        );
        listeners
    }

    /// Forgets every held trigger and active axis.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Returns `true` while a bound button trigger is held down or a bound
    /// axis direction is active.
    pub fn is_held(&self, trigger: &Trigger) -> bool {
        let hash = trigger.trigger_hash();
        self.state.is_pressed(hash) || self.state.axis(hash).is_some()
    }

    //=====================================================================
    // Listeners
    //=====================================================================

    pub fn register_listener(&mut self, listener: Listener) -> ListenerId {
        self.mappings.register_listener(listener)
    }

    /// Attaches a registered listener to each named mapping, creating the
    /// mappings that do not exist yet. Idempotent.
    pub fn add_listener(&mut self, id: ListenerId, names: &[&str]) -> Result<ListenerId> {
        self.mappings.add_listener(id, names)?;
        Ok(id)
    }

    /// Registers a listener and attaches it to each named mapping.
    ///
    /// On error the listener is not kept.
    pub fn add_new_listener(&mut self, listener: Listener, names: &[&str]) -> Result<ListenerId> {
        let id = self.mappings.register_listener(listener);
        if let Err(err) = self.mappings.add_listener(id, names) {
            self.mappings.remove_listener(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Detaches the listener from every mapping and hands it back.
    pub fn remove_listener(&mut self, id: ListenerId) -> Option<Listener> {
        self.mappings.remove_listener(id)
    }

    pub fn add_raw_listener(&mut self, listener: impl RawInputListener + 'static) -> RawListenerId {
        let id = RawListenerId(self.next_raw_listener_id);
        self.next_raw_listener_id += 1;
        self.raw_listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_raw_listener(&mut self, id: RawListenerId) -> Result<Box<dyn RawInputListener>> {
        let position = self
            .raw_listeners
            .iter()
            .position(|(candidate, _)| *candidate == id)
            .ok_or(InputError::RawListenerNotFound { id })?;
        Ok(self.raw_listeners.remove(position).1)
    }

    pub fn clear_raw_listeners(&mut self) {
        self.raw_listeners.clear();
    }

    //=====================================================================
    // Configuration
    //=====================================================================

    /// Changes the global dead zone. Invalid values leave it unchanged.
    pub fn set_axis_dead_zone(&mut self, dead_zone: f32) -> Result<()> {
        validate_dead_zone(dead_zone)?;
        self.config.axis_dead_zone = dead_zone;
        Ok(())
    }

    pub fn axis_dead_zone(&self) -> f32 {
        self.config.axis_dead_zone
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    //=====================================================================
    // Devices
    //=====================================================================

    pub fn set_cursor_visible(&mut self, visible: bool) {
        if self.cursor_visible != visible {
            self.cursor_visible = visible;
            self.mouse.set_cursor_visible(visible);
        }
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Last cursor position reported by mouse or touch events.
    pub fn cursor_position(&self) -> (f32, f32) {
        self.state.cursor()
    }

    pub fn key_name(&self, key: KeyCode) -> Option<String> {
        self.keys.key_name(key)
    }

    pub fn joysticks(&self) -> &[Joystick] {
        &self.joysticks
    }

    pub fn joystick(&self, joy_id: u8) -> Option<&Joystick> {
        self.joysticks.iter().find(|j| j.id() == joy_id)
    }

    /// Binds both directions of a joystick axis to two mappings.
    ///
    /// `axis_index` may be [`AXIS_POV_X`](super::joystick::AXIS_POV_X) or
    /// [`AXIS_POV_Y`](super::joystick::AXIS_POV_Y) to target the D-pad.
    pub fn assign_joystick_axis(
        &mut self,
        joy_id: u8,
        axis_index: u8,
        positive: &str,
        negative: &str,
    ) -> Result<()> {
        if positive.is_empty() || negative.is_empty() {
            return Err(InputError::EmptyMappingName);
        }

        let joystick = self.joystick(joy_id).ok_or(InputError::JoystickNotFound { joy_id })?;
        let (pos, neg) = joystick.axis_triggers(axis_index).ok_or_else(|| {
            InputError::JoystickAxisNotFound { joy_id, axis: axis_index.to_string() }
        })?;

        self.mappings.add_mapping(positive, &[pos])?;
        self.mappings.add_mapping(negative, &[neg])
    }

    pub fn assign_joystick_button(&mut self, joy_id: u8, button_index: u8, name: &str) -> Result<()> {
        let joystick = self.joystick(joy_id).ok_or(InputError::JoystickNotFound { joy_id })?;
        let trigger = joystick.button_trigger(button_index).ok_or_else(|| {
            InputError::JoystickButtonNotFound { joy_id, button: button_index.to_string() }
        })?;

        self.mappings.add_mapping(name, &[trigger])
    }

    /// Forwards a force feedback magnitude, clamped to `[0, 1]`.
    pub fn rumble(&mut self, joy_id: u8, amount: f32) -> Result<()> {
        if self.joystick(joy_id).is_none() {
            return Err(InputError::JoystickNotFound { joy_id });
        }
        if let Some(driver) = self.joystick.as_mut() {
            driver.set_joy_rumble(joy_id, amount.clamp(0.0, 1.0));
        }
        Ok(())
    }

    pub fn set_simulate_mouse(&mut self, simulate: bool) {
        if let Some(touch) = self.touch.as_mut() {
            touch.set_simulate_mouse(simulate);
        }
    }

    pub fn is_simulate_mouse(&self) -> bool {
        self.touch.as_ref().is_some_and(|t| t.is_simulate_mouse())
    }

    pub fn set_simulate_keyboard(&mut self, simulate: bool) {
        if let Some(touch) = self.touch.as_mut() {
            touch.set_simulate_keyboard(simulate);
        }
    }

    pub fn is_simulate_keyboard(&self) -> bool {
        self.touch.as_ref().is_some_and(|t| t.is_simulate_keyboard())
    }

    /// A handle to the event queue, for drivers created outside the builder.
    ///
    /// Pushing is only accepted during [`update`](Self::update).
    pub fn event_sink(&self) -> EventSink {
        self.sink.clone()
    }

    /// Releases every device. Called automatically on drop.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.keys.destroy();
        self.mouse.destroy();
        if let Some(joystick) = self.joystick.as_mut() {
            joystick.destroy();
        }
        if let Some(touch) = self.touch.as_mut() {
            touch.destroy();
        }
        self.destroyed = true;
        info!(target: "input", "Input devices released");
    }
}

impl Drop for InputManager {
    fn drop(&mut self) {
        self.destroy();
    }
}

//--- Helpers --------------------------------------------------------------

fn start_device<D: InputDevice + ?Sized>(device: &mut D, sink: &EventSink) -> Result<()> {
    device.set_event_sink(sink.clone());
    if !device.is_initialized() {
        device.initialize()?;
    }
    Ok(())
}

fn deliver_raw(listener: &mut dyn RawInputListener, event: &mut InputEvent) {
    match event {
        InputEvent::Key(e) => listener.on_key_event(e),
        InputEvent::MouseButton(e) => listener.on_mouse_button_event(e),
        InputEvent::MouseMotion(e) => listener.on_mouse_motion_event(e),
        InputEvent::JoyAxis(e) => listener.on_joy_axis_event(e),
        InputEvent::JoyButton(e) => listener.on_joy_button_event(e),
        InputEvent::Touch(e) => listener.on_touch_event(e),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
