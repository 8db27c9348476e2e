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

//! Inline, referenceable object handles and the registry that issues their ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// The identifier carried by a [`Handle`].
///
/// Ids are unique within one [`HandleContext`] and are not stable across
/// builds, so they must never be persisted as external identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandleId(String);

impl HandleId {
    /// Returns the id as it appears in engine JSON.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An object defined inline in an engine file that other objects may refer to.
///
/// Serializes as `{"HandleId": "<id>", "Data": <payload>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Handle<T> {
    /// The id issued by the owning [`HandleContext`].
    #[serde(rename = "HandleId")]
    pub id: HandleId,
    /// The wrapped payload.
    #[serde(rename = "Data")]
    pub data: T,
}

impl<T> Handle<T> {
    /// Consumes the handle and returns its payload.
    pub fn into_inner(self) -> T {
        self.data
    }
}

/// Issues monotonically increasing handle ids for one generation run.
///
/// A context is created per project build and threaded through graph
/// construction, so separate builds never share a counter.
#[derive(Debug)]
pub struct HandleContext {
    base: u64,
    next: AtomicU64,
}

impl HandleContext {
    /// The first id issued by a fresh context.
    pub const FIRST_ID: u64 = 1;

    /// Creates a context whose first id is [`HandleContext::FIRST_ID`].
    pub fn new() -> Self {
        Self::starting_at(Self::FIRST_ID)
    }

    /// Creates a context whose first id is `base`.
    pub fn starting_at(base: u64) -> Self {
        Self {
            base,
            next: AtomicU64::new(base),
        }
    }

    /// Reserves the next id without wrapping a payload.
    pub fn next_id(&self) -> HandleId {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        HandleId(id.to_string())
    }

    /// Wraps `data` in a handle carrying a fresh id.
    pub fn issue<T>(&self, data: T) -> Handle<T> {
        Handle {
            id: self.next_id(),
            data,
        }
    }

    /// Returns how many ids this context has handed out.
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed).saturating_sub(self.base)
    }
}

impl Default for HandleContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_start_at_one_and_increase() {
        let ctx = HandleContext::new();
        let a = ctx.issue("a");
        let b = ctx.issue("b");
        assert_eq!(a.id.as_str(), "1");
        assert_eq!(b.id.as_str(), "2");
        assert_eq!(ctx.issued(), 2);
    }

    #[test]
    fn ids_are_unique_across_threads() {
        let ctx = std::sync::Arc::new(HandleContext::new());
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let ctx = ctx.clone();
                std::thread::spawn(move || (0..250).map(|_| ctx.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for worker in workers {
            for id in worker.join().unwrap() {
                assert!(seen.insert(id), "duplicate handle id issued");
            }
        }
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn separate_contexts_do_not_share_counters() {
        let first = HandleContext::new();
        let second = HandleContext::new();
        first.next_id();
        first.next_id();
        assert_eq!(second.next_id().as_str(), "1");
    }

    #[test]
    fn handle_serializes_with_engine_keys() {
        let ctx = HandleContext::starting_at(7);
        let json = serde_json::to_value(ctx.issue(42)).unwrap();
        assert_eq!(json, serde_json::json!({ "HandleId": "7", "Data": 42 }));
    }
}
