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

//! Bounded, append-only queue that persists and compiles project files.
//!
//! Entries start as soon as a slot is free; at most `limit` jobs run at once
//! and the rest wait in arrival order. After [`SyncQueue::done`] no entry may
//! be added, and [`SyncQueue::all_saved`] resolves once the last job has
//! finished.

use crate::error::{Error, FileError, QueueError};
use crate::project_file::ProjectFile;
use redforge_core::red::RedEngineFile;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Default number of simultaneous jobs.
pub const MAX_SIMULTANEOUS_JOBS: usize = 5;

struct Entry {
    file: Arc<ProjectFile>,
    payload: Option<String>,
    force: bool,
}

#[derive(Default)]
struct State {
    pending: VecDeque<Entry>,
    in_flight: usize,
    done: bool,
    completed: usize,
    first_error: Option<QueueError>,
}

struct Inner {
    limit: usize,
    state: Mutex<State>,
    closed: watch::Sender<bool>,
}

/// Queue of files waiting to be saved and imported.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone)]
pub struct SyncQueue {
    inner: Arc<Inner>,
}

impl SyncQueue {
    /// Creates a queue running at most `limit` jobs at once (at least one).
    pub fn new(limit: usize) -> Self {
        let (closed, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                limit: limit.max(1),
                state: Mutex::new(State::default()),
                closed,
            }),
        }
    }

    /// Adds `file`. With a payload, the text is persisted and compiled when it
    /// changed; without one, the JSON already on disk is compiled when the
    /// binary is older.
    ///
    /// Must be called from within a tokio runtime.
    pub fn enqueue(
        &self,
        file: Arc<ProjectFile>,
        payload: Option<String>,
        force: bool,
    ) -> Result<(), QueueError> {
        {
            let mut state = self.inner.lock();
            if state.done {
                return Err(QueueError::Closed);
            }
            state.pending.push_back(Entry {
                file,
                payload,
                force,
            });
        }
        self.inner.dispatch()
    }

    /// Serializes `record` and adds it as the payload of `file`.
    pub fn enqueue_record<T: Serialize>(
        &self,
        file: Arc<ProjectFile>,
        record: &RedEngineFile<T>,
        force: bool,
    ) -> Result<(), QueueError> {
        let text = record.to_json_pretty().map_err(|source| QueueError::Job {
            path: file.archive_relative_path().to_owned(),
            source: Arc::new(Error::File(FileError::Json {
                path: file.json_path().to_path_buf(),
                source,
            })),
        })?;
        self.enqueue(file, Some(text), force)
    }

    /// Forbids further entries. Idempotent.
    pub fn done(&self) {
        let mut state = self.inner.lock();
        state.done = true;
        self.inner.close_if_drained(&state);
    }

    /// Waits until the queue is closed and drained, then reports the first
    /// job failure, if any. Safe to call any number of times.
    pub async fn all_saved(&self) -> Result<(), QueueError> {
        let mut closed = self.inner.closed.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = closed.wait_for(|closed| *closed).await;
        match &self.inner.lock().first_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Number of jobs currently running.
    pub fn in_flight(&self) -> usize {
        self.inner.lock().in_flight
    }

    /// Number of jobs finished so far, failed ones included.
    pub fn completed(&self) -> usize {
        self.inner.lock().completed
    }
}

impl Default for SyncQueue {
    fn default() -> Self {
        Self::new(MAX_SIMULTANEOUS_JOBS)
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn close_if_drained(&self, state: &State) {
        if state.done && state.in_flight == 0 && state.pending.is_empty() {
            self.closed.send_replace(true);
        }
    }

    /// Starts pending entries until every slot is busy or nothing is left.
    fn dispatch(self: &Arc<Self>) -> Result<(), QueueError> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| QueueError::NoRuntime)?;
        let mut state = self.lock();
        while state.in_flight < self.limit {
            let Some(entry) = state.pending.pop_front() else {
                break;
            };
            state.in_flight += 1;
            log::info!("Saving: {}", entry.file.archive_relative_path());
            let inner = Arc::clone(self);
            runtime.spawn(async move {
                let result = process(&entry).await;
                inner.finish(&entry, result);
            });
        }
        self.close_if_drained(&state);
        Ok(())
    }

    fn finish(self: &Arc<Self>, entry: &Entry, result: Result<bool, Error>) {
        {
            let mut state = self.lock();
            state.in_flight -= 1;
            state.completed += 1;
            if let Err(err) = result {
                log::error!("Failed to save {}: {err}", entry.file.archive_relative_path());
                state.first_error.get_or_insert(QueueError::Job {
                    path: entry.file.archive_relative_path().to_owned(),
                    source: Arc::new(err),
                });
            }
        }
        // Still inside the runtime, so this cannot fail.
        let _ = self.dispatch();
    }
}

async fn process(entry: &Entry) -> Result<bool, Error> {
    match &entry.payload {
        Some(text) => entry.file.save_and_import_json(text, entry.force).await,
        None => entry.file.import_json_if_stale(entry.force).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn all_saved_resolves_for_an_empty_queue() {
        let queue = SyncQueue::default();
        queue.done();
        queue.done();
        queue.all_saved().await.unwrap();
        queue.all_saved().await.unwrap();
    }
}
