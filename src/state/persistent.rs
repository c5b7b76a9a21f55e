// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::StateError;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;

struct Slot {
    value: Box<dyn Any + Send>,
    type_name: &'static str,
}

impl Slot {
    fn new<T: Any + Send>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: type_name::<T>(),
        }
    }
}

/// Values keyed by stable strings chosen by the logic.
///
/// The map belongs to the host, not to the logic unit, so a reload replaces
/// the logic without touching what it stored here. Keys never expire; an
/// entry lives until it is removed or the process exits.
#[derive(Default)]
pub struct PersistentState {
    slots: HashMap<String, Slot>,
}

impl PersistentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored value for `key`, inserting `default` first if the
    /// key is absent. An existing value is returned unchanged.
    pub fn get_or_default<T>(&mut self, key: &str, default: T) -> Result<T, StateError>
    where
        T: Any + Send + Clone,
    {
        let slot = self
            .slots
            .entry(key.to_string())
            .or_insert_with(|| Slot::new(default));
        Self::downcast_ref::<T>(key, slot).cloned()
    }

    /// Mutable access to the value for `key`, inserting `init()` if absent.
    pub fn get_or_insert_with<T, F>(&mut self, key: &str, init: F) -> Result<&mut T, StateError>
    where
        T: Any + Send,
        F: FnOnce() -> T,
    {
        let slot = self
            .slots
            .entry(key.to_string())
            .or_insert_with(|| Slot::new(init()));
        let stored = slot.type_name;
        slot.value
            .downcast_mut::<T>()
            .ok_or_else(|| StateError::TypeMismatch {
                key: key.to_string(),
                stored,
                requested: type_name::<T>(),
            })
    }

    pub fn get<T>(&self, key: &str) -> Result<Option<T>, StateError>
    where
        T: Any + Send + Clone,
    {
        match self.slots.get(key) {
            Some(slot) => Self::downcast_ref::<T>(key, slot).cloned().map(Some),
            None => Ok(None),
        }
    }

    /// Stores `value` under `key`, replacing any previous value of any type.
    pub fn set<T: Any + Send>(&mut self, key: impl Into<String>, value: T) {
        self.slots.insert(key.into(), Slot::new(value));
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.slots.remove(key).is_some()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    fn downcast_ref<'s, T: Any>(key: &str, slot: &'s Slot) -> Result<&'s T, StateError> {
        slot.value
            .downcast_ref::<T>()
            .ok_or_else(|| StateError::TypeMismatch {
                key: key.to_string(),
                stored: slot.type_name,
                requested: type_name::<T>(),
            })
    }
}

impl fmt::Debug for PersistentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, slot) in &self.slots {
            map.entry(key, &slot.type_name);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_inserted_only_once() {
        let mut state = PersistentState::new();
        assert_eq!(state.get_or_default("clicks", 0u32).unwrap(), 0);

        state.set("clicks", 7u32);
        assert_eq!(state.get_or_default("clicks", 0u32).unwrap(), 7);
        assert_eq!(state.get_or_default("clicks", 99u32).unwrap(), 7);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_values_of_different_types_coexist() {
        let mut state = PersistentState::new();
        state.set("language", String::from("fr"));
        state.set("volume", 0.5f32);

        assert_eq!(state.get::<String>("language").unwrap().as_deref(), Some("fr"));
        assert_eq!(state.get::<f32>("volume").unwrap(), Some(0.5));
        assert_eq!(state.get::<f32>("missing").unwrap(), None);
    }

    #[test]
    fn test_type_mismatch_is_reported() {
        let mut state = PersistentState::new();
        state.set("scroll", 12.0f64);

        let err = state.get_or_default("scroll", String::new()).unwrap_err();
        assert_eq!(
            err,
            StateError::TypeMismatch {
                key: "scroll".to_string(),
                stored: "f64",
                requested: type_name::<String>(),
            }
        );
        // the stored value is untouched
        assert_eq!(state.get::<f64>("scroll").unwrap(), Some(12.0));
    }

    #[test]
    fn test_get_or_insert_with_mutates_in_place() {
        let mut state = PersistentState::new();
        *state.get_or_insert_with("history", Vec::<u8>::new).unwrap() = vec![1, 2];
        state.get_or_insert_with("history", Vec::<u8>::new).unwrap().push(3);

        assert_eq!(state.get::<Vec<u8>>("history").unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut state = PersistentState::new();
        state.set("a", true);
        state.set("b", false);

        assert!(state.remove("a"));
        assert!(!state.remove("a"));
        assert!(state.contains_key("b"));
        state.clear();
        assert!(state.is_empty());
    }
}
