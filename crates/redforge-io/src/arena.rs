// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A capacity-bounded cache of shared values keyed by string.

use std::collections::HashMap;
use std::sync::Arc;

/// Default number of entries kept by a project's file arena.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Maps keys to shared values, evicting the least recently used entry once
/// `capacity` is reached.
///
/// Evicting an entry never invalidates an `Arc` a caller already holds; the
/// next lookup of that key simply builds a fresh value.
#[derive(Debug)]
pub struct Arena<V> {
    entries: HashMap<String, Slot<V>>,
    capacity: usize,
    clock: u64,
}

#[derive(Debug)]
struct Slot<V> {
    value: Arc<V>,
    last_used: u64,
}

impl<V> Arena<V> {
    /// Creates an arena holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            clock: 0,
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `key` is cached.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the cached value for `key`, building it with `make` on a miss.
    pub fn get_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> V) -> Arc<V> {
        self.clock += 1;
        let now = self.clock;
        if let Some(slot) = self.entries.get_mut(key) {
            slot.last_used = now;
            return slot.value.clone();
        }
        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        let value = Arc::new(make());
        self.entries.insert(
            key.to_owned(),
            Slot {
                value: value.clone(),
                last_used: now,
            },
        );
        value
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, slot)| slot.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            log::trace!("Evicting '{key}' from file arena");
            self.entries.remove(&key);
        }
    }
}

impl<V> Default for Arena<V> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_the_same_value_for_the_same_key() {
        let mut arena = Arena::with_capacity(4);
        let a = arena.get_or_insert_with("a.mi", || 1);
        let again = arena.get_or_insert_with("a.mi", || 2);
        assert!(Arc::ptr_eq(&a, &again));
        assert_eq!(*again, 1);
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut arena = Arena::with_capacity(2);
        arena.get_or_insert_with("a", || 1);
        arena.get_or_insert_with("b", || 2);
        arena.get_or_insert_with("a", || 0);
        arena.get_or_insert_with("c", || 3);

        assert_eq!(arena.len(), 2);
        assert!(arena.contains("a"));
        assert!(!arena.contains("b"));
        assert!(arena.contains("c"));
    }

    #[test]
    fn evicted_values_stay_alive_for_holders() {
        let mut arena = Arena::with_capacity(1);
        let held = arena.get_or_insert_with("a", || String::from("kept"));
        arena.get_or_insert_with("b", || String::from("other"));
        assert!(!arena.contains("a"));
        assert_eq!(held.as_str(), "kept");
    }
}
