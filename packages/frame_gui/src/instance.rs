//! Persistent widget instances and the identity-keyed registry.

use crate::geom::Rect;
use std::{
    any::Any,
    collections::HashMap,
};


/// Opaque per-widget state attached to an instance record.
///
/// Created empty, filled lazily by the widget's render step on first
/// encounter, then mutated in place on every later frame. The slot is
/// dynamically typed because the set of widget kinds is open; the typed
/// accessors recover safety at the widget's edge.
#[derive(Default)]
pub struct StateSlot {
    value: Option<Box<dyn Any>>,
}

impl StateSlot {
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Fetch the state as `T`, initializing it with `init` if the slot is
    /// empty or holds a different type.
    pub fn get_or_insert_with<T: Any, F: FnOnce() -> T>(&mut self, init: F) -> &mut T {
        let wrong_type = match self.value {
            Some(ref boxed) => !boxed.is::<T>(),
            None => true,
        };
        if wrong_type {
            self.value = Some(Box::new(init()));
        }
        self.value
            .as_mut()
            .and_then(|boxed| boxed.downcast_mut::<T>())
            .unwrap()
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        self.value.as_ref().and_then(|boxed| boxed.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.value.as_mut().and_then(|boxed| boxed.downcast_mut::<T>())
    }

    pub fn set<T: Any>(&mut self, value: T) {
        self.value = Some(Box::new(value));
    }
}

impl std::fmt::Debug for StateSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value {
            Some(_) => write!(f, "StateSlot(occupied)"),
            None => write!(f, "StateSlot(empty)"),
        }
    }
}


/// One persistent record per widget identity. Created on first placement,
/// retained until the owning layout is discarded.
#[derive(Debug)]
pub struct InstanceRecord {
    identity: String,
    pub(crate) current_rect: Rect,
    pub(crate) prev_rect: Rect,
    pub(crate) state: StateSlot,
    /// Set when the identity is declared this frame, cleared when the
    /// layout is redeclared. Only placed instances are visible to
    /// navigation and rendering.
    pub(crate) placed: bool,
    /// Highlightability as reported by the widget at its last placement.
    pub(crate) highlightable: bool,
}

impl InstanceRecord {
    fn new(identity: String) -> Self {
        InstanceRecord {
            identity,
            current_rect: Rect::default(),
            prev_rect: Rect::default(),
            state: StateSlot::default(),
            placed: false,
            highlightable: false,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// This frame's resolved rectangle.
    pub fn rect(&self) -> Rect {
        self.current_rect
    }

    /// Last frame's resolved rectangle, for animated transitions.
    pub fn prev_rect(&self) -> Rect {
        self.prev_rect
    }

    pub fn was_placed(&self) -> bool {
        self.placed
    }

    pub fn state(&self) -> &StateSlot {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut StateSlot {
        &mut self.state
    }
}


/// Insertion-ordered mapping from widget identity to instance record.
///
/// There is no removal. Abandoned identities stop being marked placed and
/// become invisible, but keep their memory until the layout is discarded.
/// Record indices are therefore stable and usable as keys.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    records: Vec<InstanceRecord>,
    by_identity: HashMap<String, usize>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get_or_create(&mut self, identity: &str) -> usize {
        if let Some(&index) = self.by_identity.get(identity) {
            return index;
        }
        let index = self.records.len();
        self.records.push(InstanceRecord::new(identity.to_owned()));
        self.by_identity.insert(identity.to_owned(), index);
        index
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.by_identity.contains_key(identity)
    }

    pub fn index_of(&self, identity: &str) -> Option<usize> {
        self.by_identity.get(identity).copied()
    }

    pub fn get(&self, index: usize) -> &InstanceRecord {
        &self.records[index]
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> &mut InstanceRecord {
        &mut self.records[index]
    }

    pub fn by_identity(&self, identity: &str) -> Option<&InstanceRecord> {
        self.index_of(identity).map(|index| &self.records[index])
    }

    pub(crate) fn by_identity_mut(&mut self, identity: &str) -> Option<&mut InstanceRecord> {
        match self.index_of(identity) {
            Some(index) => Some(&mut self.records[index]),
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &InstanceRecord> {
        self.records.iter()
    }

    /// Visit in insertion order until the visitor returns false.
    pub fn for_each<F: FnMut(&InstanceRecord) -> bool>(&self, mut visitor: F) {
        for record in &self.records {
            if !visitor(record) {
                break;
            }
        }
    }

    pub(crate) fn clear_placed_flags(&mut self) {
        for record in &mut self.records {
            record.placed = false;
        }
    }
}


#[test]
fn test_registry_preserves_insertion_order() {
    let mut registry = InstanceRegistry::new();
    registry.get_or_create("c");
    registry.get_or_create("a");
    registry.get_or_create("b");
    // re-reference must not reorder
    registry.get_or_create("a");
    let order: Vec<&str> = registry.iter().map(|r| r.identity()).collect();
    assert_eq!(order, vec!["c", "a", "b"]);
}

#[test]
fn test_registry_get_or_create_is_idempotent() {
    let mut registry = InstanceRegistry::new();
    let first = registry.get_or_create("x");
    let second = registry.get_or_create("x");
    assert_eq!(first, second);
    assert_eq!(registry.len(), 1);
    assert!(registry.contains("x"));
    assert!(!registry.contains("y"));
}

#[test]
fn test_registry_for_each_early_exit() {
    let mut registry = InstanceRegistry::new();
    registry.get_or_create("a");
    registry.get_or_create("b");
    registry.get_or_create("c");
    let mut seen = Vec::new();
    registry.for_each(|record| {
        seen.push(record.identity().to_owned());
        record.identity() != "b"
    });
    assert_eq!(seen, vec!["a", "b"]);
}

#[test]
fn test_state_slot_typed_access() {
    let mut slot = StateSlot::default();
    assert!(slot.is_empty());
    *slot.get_or_insert_with(|| 3_u32) += 1;
    assert_eq!(slot.get::<u32>(), Some(&4));
    // a different type replaces the stored value
    slot.get_or_insert_with(|| String::from("hello"));
    assert_eq!(slot.get::<u32>(), None);
    assert_eq!(slot.get::<String>().map(String::as_str), Some("hello"));
}
