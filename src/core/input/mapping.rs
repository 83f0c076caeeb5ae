//=========================================================================
// Mapping Table
//=========================================================================
//
// Binds triggers to named mappings and mappings to listeners.
//
// Architecture:
//   TriggerHash → [mapping name, ...]   (binding index, insertion order)
//   mapping name → Mapping { triggers, listeners }
//   ListenerId → Listener               (registry)
//
// Dispatch walks the mappings bound to a hash from the most recently bound
// to the oldest, and each mapping's listeners from the most recently added
// to the oldest.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::error::{InputError, Result};
use super::event::TouchEvent;
use super::listener::{Listener, ListenerId};
use super::trigger::{Trigger, TriggerHash};

//=== Mapping =============================================================

#[derive(Debug, Default)]
struct Mapping {
    triggers: Vec<TriggerHash>,
    listeners: Vec<ListenerId>,
}

//=== MappingTable ========================================================

/// Trigger bindings, named mappings and the listeners attached to them.
#[derive(Default)]
pub(crate) struct MappingTable {
    mappings: HashMap<String, Mapping>,
    bindings: HashMap<TriggerHash, Vec<String>>,
    listeners: HashMap<ListenerId, Listener>,
    next_listener_id: u64,
}

impl MappingTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    //--- Mapping API ------------------------------------------------------

    /// Creates `name` if absent and binds each trigger to it.
    ///
    /// Binding a trigger the mapping already owns logs a warning and
    /// changes nothing.
    pub(crate) fn add_mapping(&mut self, name: &str, triggers: &[Trigger]) -> Result<()> {
        if name.is_empty() {
            return Err(InputError::EmptyMappingName);
        }

        let mapping = self.mappings.entry(name.to_owned()).or_insert_with(|| {
            debug!(target: "input::mapping", "Created mapping '{}'", name);
            Mapping::default()
        });

        for trigger in triggers {
            let hash = trigger.trigger_hash();
            let bound = self.bindings.entry(hash).or_default();

            if bound.iter().any(|n| n == name) {
                warn!(
                    target: "input::mapping",
                    "Attempted to add mapping '{}' twice to trigger {}",
                    name,
                    trigger.label()
                );
                continue;
            }

            bound.push(name.to_owned());
            if !mapping.triggers.contains(&hash) {
                mapping.triggers.push(hash);
            }
        }

        Ok(())
    }

    /// Removes the mapping and all of its trigger bindings.
    pub(crate) fn delete_mapping(&mut self, name: &str) -> Result<()> {
        let mapping = self
            .mappings
            .remove(name)
            .ok_or_else(|| InputError::MappingNotFound { name: name.to_owned() })?;

        for hash in &mapping.triggers {
            self.unbind(*hash, name);
        }

        debug!(target: "input::mapping", "Deleted mapping '{}'", name);
        Ok(())
    }

    /// Detaches one trigger from a mapping.
    ///
    /// Returns `Ok(false)` when the trigger was never bound to the mapping.
    pub(crate) fn delete_trigger(&mut self, name: &str, trigger: &Trigger) -> Result<bool> {
        let mapping = self
            .mappings
            .get_mut(name)
            .ok_or_else(|| InputError::MappingNotFound { name: name.to_owned() })?;

        let hash = trigger.trigger_hash();
        let Some(position) = mapping.triggers.iter().position(|h| *h == hash) else {
            warn!(
                target: "input::mapping",
                "Trigger {} is not bound to mapping '{}'",
                trigger.label(),
                name
            );
            return Ok(false);
        };

        mapping.triggers.remove(position);
        self.unbind(hash, name);
        Ok(true)
    }

    /// Drops every mapping and binding and hands back every registered
    /// listener, ordered by registration.
    pub(crate) fn clear(&mut self) -> Vec<Listener> {
        self.mappings.clear();
        self.bindings.clear();

        let mut listeners: Vec<_> = self.listeners.drain().collect();
        listeners.sort_by_key(|(id, _)| *id);
        listeners.into_iter().map(|(_, listener)| listener).collect()
    }

    pub(crate) fn has_mapping(&self, name: &str) -> bool {
        self.mappings.contains_key(name)
    }

    pub(crate) fn mapping_names(&self) -> impl Iterator<Item = &str> {
        self.mappings.keys().map(String::as_str)
    }

    pub(crate) fn triggers_of(&self, name: &str) -> Option<&[TriggerHash]> {
        self.mappings.get(name).map(|m| m.triggers.as_slice())
    }

    /// Returns `true` if at least one mapping is bound to `hash`.
    pub(crate) fn is_bound(&self, hash: TriggerHash) -> bool {
        self.bindings.get(&hash).is_some_and(|names| !names.is_empty())
    }

    fn unbind(&mut self, hash: TriggerHash, name: &str) {
        if let Some(names) = self.bindings.get_mut(&hash) {
            names.retain(|n| n != name);
            if names.is_empty() {
                self.bindings.remove(&hash);
            }
        }
    }

    //--- Listener API -----------------------------------------------------

    pub(crate) fn register_listener(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        debug!(target: "input::mapping", "Registered {:?} as {}", listener, id);
        self.listeners.insert(id, listener);
        id
    }

    /// Attaches a registered listener to each named mapping, creating
    /// mappings that do not exist yet.
    ///
    /// All names are validated first; on error nothing is attached.
    pub(crate) fn add_listener(&mut self, id: ListenerId, names: &[&str]) -> Result<()> {
        if !self.listeners.contains_key(&id) {
            return Err(InputError::ListenerNotFound { id });
        }
        if names.iter().any(|n| n.is_empty()) {
            return Err(InputError::EmptyMappingName);
        }

        for name in names {
            let mapping = self.mappings.entry((*name).to_owned()).or_insert_with(|| {
                debug!(target: "input::mapping", "Created mapping '{}' for listener {}", name, id);
                Mapping::default()
            });
            if !mapping.listeners.contains(&id) {
                mapping.listeners.push(id);
            }
        }
        Ok(())
    }

    /// Detaches the listener from every mapping and hands it back.
    pub(crate) fn remove_listener(&mut self, id: ListenerId) -> Option<Listener> {
        for mapping in self.mappings.values_mut() {
            mapping.listeners.retain(|l| *l != id);
        }
        self.listeners.remove(&id)
    }

    //--- Dispatch ---------------------------------------------------------

    /// Sends a press/release transition to every action listener bound to `hash`.
    pub(crate) fn invoke_actions(&mut self, hash: TriggerHash, pressed: bool, tpf: f32) {
        self.dispatch(hash, |listener, name| {
            if let Some(action) = listener.as_action() {
                action.on_action(name, pressed, tpf);
            }
        });
    }

    /// Sends an already scaled magnitude to every analog listener bound to `hash`.
    pub(crate) fn invoke_analogs(&mut self, hash: TriggerHash, value: f32, tpf: f32) {
        self.dispatch(hash, |listener, name| {
            if let Some(analog) = listener.as_analog() {
                analog.on_analog(name, value, tpf);
            }
        });
    }

    /// Axis dispatch: an optional press edge followed by the magnitude,
    /// delivered per listener in that order.
    pub(crate) fn invoke_analogs_and_actions(
        &mut self,
        hash: TriggerHash,
        value: f32,
        tpf: f32,
        press_edge: bool,
    ) {
        self.dispatch(hash, |listener, name| {
            if press_edge {
                if let Some(action) = listener.as_action() {
                    action.on_action(name, true, tpf);
                }
            }
            if let Some(analog) = listener.as_analog() {
                analog.on_analog(name, value, tpf);
            }
        });
    }

    pub(crate) fn invoke_touch(&mut self, hash: TriggerHash, event: &TouchEvent, tpf: f32) {
        self.dispatch(hash, |listener, name| {
            if let Some(touch) = listener.as_touch() {
                touch.on_touch(name, event, tpf);
            }
        });
    }

    fn dispatch<F>(&mut self, hash: TriggerHash, mut deliver: F)
    where
        F: FnMut(&mut Listener, &str),
    {
        let Some(names) = self.bindings.get(&hash) else {
            return;
        };

        for name in names.iter().rev() {
            let Some(mapping) = self.mappings.get(name) else {
                continue;
            };
            for id in mapping.listeners.iter().rev() {
                if let Some(listener) = self.listeners.get_mut(id) {
                    deliver(listener, name);
                }
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::keys::KeyCode;
    use crate::core::input::listener::{ActionListener, AnalogListener};
    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Test Helpers -----------------------------------------------------

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        tag: &'static str,
        log: Log,
    }

    impl ActionListener for Recorder {
        fn on_action(&mut self, name: &str, is_pressed: bool, _tpf: f32) {
            self.log.borrow_mut().push(format!("{}:{}:{}", self.tag, name, is_pressed));
        }
    }

    impl AnalogListener for Recorder {
        fn on_analog(&mut self, name: &str, value: f32, _tpf: f32) {
            self.log.borrow_mut().push(format!("{}:{}:{:.2}", self.tag, name, value));
        }
    }

    fn recorder(table: &mut MappingTable, tag: &'static str, log: &Log) -> ListenerId {
        table.register_listener(Listener::combined(Recorder { tag, log: log.clone() }))
    }

    fn space() -> Trigger {
        Trigger::Key(KeyCode::SPACE)
    }

    //=====================================================================
    // Mapping Tests
    //=====================================================================

    #[test]
    fn add_mapping_binds_triggers() {
        let mut table = MappingTable::new();
        table.add_mapping("Jump", &[space()]).unwrap();

        assert!(table.has_mapping("Jump"));
        assert!(table.is_bound(space().trigger_hash()));
        assert_eq!(table.triggers_of("Jump"), Some(&[space().trigger_hash()][..]));
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut table = MappingTable::new();
        assert_eq!(table.add_mapping("", &[space()]), Err(InputError::EmptyMappingName));
        assert!(!table.is_bound(space().trigger_hash()));
    }

    /// Binding the same trigger twice must not duplicate the binding.
    #[test]
    fn duplicate_binding_is_a_no_op() {
        let log = Log::default();
        let mut table = MappingTable::new();
        table.add_mapping("Jump", &[space()]).unwrap();
        table.add_mapping("Jump", &[space()]).unwrap();

        let id = recorder(&mut table, "A", &log);
        table.add_listener(id, &["Jump"]).unwrap();
        table.invoke_actions(space().trigger_hash(), true, 0.016);

        assert_eq!(*log.borrow(), vec!["A:Jump:true"]);
        assert_eq!(table.triggers_of("Jump").map(<[_]>::len), Some(1));
    }

    #[test]
    fn delete_unknown_mapping_fails() {
        let mut table = MappingTable::new();
        assert_eq!(
            table.delete_mapping("Nope"),
            Err(InputError::MappingNotFound { name: "Nope".into() })
        );
    }

    #[test]
    fn delete_mapping_unbinds_its_triggers() {
        let mut table = MappingTable::new();
        table.add_mapping("Jump", &[space()]).unwrap();
        table.delete_mapping("Jump").unwrap();

        assert!(!table.has_mapping("Jump"));
        assert!(!table.is_bound(space().trigger_hash()));
    }

    #[test]
    fn delete_trigger_reports_outcome() {
        let mut table = MappingTable::new();
        let enter = Trigger::Key(KeyCode::RETURN);
        table.add_mapping("Jump", &[space(), enter]).unwrap();

        assert_eq!(table.delete_trigger("Jump", &space()), Ok(true));
        assert_eq!(table.delete_trigger("Jump", &space()), Ok(false));
        assert!(table.is_bound(enter.trigger_hash()));
        assert!(!table.is_bound(space().trigger_hash()));
        assert!(matches!(
            table.delete_trigger("Missing", &space()),
            Err(InputError::MappingNotFound { .. })
        ));
    }

    #[test]
    fn clear_hands_back_every_listener() {
        let log = Log::default();
        let mut table = MappingTable::new();
        let first = recorder(&mut table, "A", &log);
        let second = recorder(&mut table, "B", &log);
        table.add_mapping("Jump", &[space()]).unwrap();
        table.add_listener(first, &["Jump"]).unwrap();

        let removed = table.clear();
        assert_eq!(removed.len(), 2);
        assert!(!table.has_mapping("Jump"));
        assert_eq!(
            table.add_listener(second, &["Jump"]),
            Err(InputError::ListenerNotFound { id: second })
        );
        assert_eq!(Rc::strong_count(&log), 3);

        drop(removed);
        assert_eq!(Rc::strong_count(&log), 1);
    }

    #[test]
    fn cleared_listeners_can_be_registered_again() {
        let log = Log::default();
        let mut table = MappingTable::new();
        let id = recorder(&mut table, "A", &log);
        table.add_listener(id, &["Jump"]).unwrap();

        for listener in table.clear() {
            let id = table.register_listener(listener);
            table.add_listener(id, &["Jump"]).unwrap();
        }
        table.add_mapping("Jump", &[space()]).unwrap();
        table.invoke_actions(space().trigger_hash(), false, 0.016);
        assert_eq!(*log.borrow(), vec!["A:Jump:false"]);
    }

    //=====================================================================
    // Listener Tests
    //=====================================================================

    #[test]
    fn add_listener_is_idempotent() {
        let log = Log::default();
        let mut table = MappingTable::new();
        table.add_mapping("Jump", &[space()]).unwrap();
        let id = recorder(&mut table, "A", &log);

        table.add_listener(id, &["Jump"]).unwrap();
        table.add_listener(id, &["Jump"]).unwrap();
        table.invoke_actions(space().trigger_hash(), true, 0.016);

        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn add_listener_creates_missing_mappings() {
        let log = Log::default();
        let mut table = MappingTable::new();
        let id = recorder(&mut table, "A", &log);

        table.add_listener(id, &["Fly"]).unwrap();
        assert!(table.has_mapping("Fly"));
        assert_eq!(table.triggers_of("Fly"), Some(&[][..]));

        table.add_mapping("Fly", &[space()]).unwrap();
        table.invoke_actions(space().trigger_hash(), true, 0.016);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn empty_listener_mapping_name_attaches_nothing() {
        let mut table = MappingTable::new();
        let id = recorder(&mut table, "A", &Log::default());

        assert_eq!(table.add_listener(id, &["Jump", ""]), Err(InputError::EmptyMappingName));
        assert!(!table.has_mapping("Jump"));
    }

    #[test]
    fn unknown_listener_id_is_rejected() {
        let mut table = MappingTable::new();
        table.add_mapping("Jump", &[space()]).unwrap();
        let ghost = ListenerId(99);
        assert_eq!(
            table.add_listener(ghost, &["Jump"]),
            Err(InputError::ListenerNotFound { id: ghost })
        );
    }

    #[test]
    fn remove_listener_detaches_everywhere() {
        let log = Log::default();
        let mut table = MappingTable::new();
        table.add_mapping("Jump", &[space()]).unwrap();
        table.add_mapping("Fire", &[space()]).unwrap();
        let id = recorder(&mut table, "A", &log);
        table.add_listener(id, &["Jump", "Fire"]).unwrap();

        assert!(table.remove_listener(id).is_some());
        table.invoke_actions(space().trigger_hash(), true, 0.016);

        assert!(log.borrow().is_empty());
        assert!(table.has_mapping("Jump"));
    }

    //=====================================================================
    // Dispatch Order Tests
    //=====================================================================

    /// Most recently added listeners and mappings are notified first.
    #[test]
    fn dispatch_runs_in_reverse_registration_order() {
        let log = Log::default();
        let mut table = MappingTable::new();
        table.add_mapping("Jump", &[space()]).unwrap();
        table.add_mapping("Confirm", &[space()]).unwrap();

        let a = recorder(&mut table, "A", &log);
        let b = recorder(&mut table, "B", &log);
        table.add_listener(a, &["Jump", "Confirm"]).unwrap();
        table.add_listener(b, &["Jump"]).unwrap();

        table.invoke_actions(space().trigger_hash(), true, 0.016);

        assert_eq!(
            *log.borrow(),
            vec!["A:Confirm:true", "B:Jump:true", "A:Jump:true"]
        );
    }

    #[test]
    fn press_edge_precedes_magnitude_per_listener() {
        let log = Log::default();
        let mut table = MappingTable::new();
        let axis = Trigger::JoyAxis { joy_id: 0, axis_index: 0, negative: false };
        table.add_mapping("Steer", &[axis]).unwrap();
        let id = recorder(&mut table, "A", &log);
        table.add_listener(id, &["Steer"]).unwrap();

        table.invoke_analogs_and_actions(axis.trigger_hash(), 0.5, 1.0, true);
        table.invoke_analogs_and_actions(axis.trigger_hash(), 0.25, 1.0, false);

        assert_eq!(
            *log.borrow(),
            vec!["A:Steer:true", "A:Steer:0.50", "A:Steer:0.25"]
        );
    }
}
