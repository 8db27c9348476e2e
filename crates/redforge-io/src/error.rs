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

//! Error types for filesystem and converter operations.

use redforge_core::{MissingInputError, RecordError};
use std::path::PathBuf;
use std::process::ExitStatus;
use std::sync::Arc;
use thiserror::Error;

/// A filesystem or parse failure tied to a path.
#[derive(Debug, Error)]
pub enum FileError {
    /// Reading, writing or listing failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A JSON document could not be parsed or produced.
    #[error("Invalid JSON in '{path}': {source}")]
    Json {
        /// The offending file.
        path: PathBuf,
        /// The parser error.
        #[source]
        source: serde_json::Error,
    },
    /// A YAML document could not be parsed.
    #[error("Invalid YAML in '{path}': {source}")]
    Yaml {
        /// The offending file.
        path: PathBuf,
        /// The parser error.
        #[source]
        source: serde_yaml::Error,
    },
}

impl FileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FileError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A failure of the external converter.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// No executable is configured.
    #[error("wolvenKitCLIExePath is not set in the user config")]
    NotConfigured,
    /// The process could not be started.
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        /// The executable.
        program: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The process exited unsuccessfully.
    #[error("Converter operation '{operation}' on '{input}' failed with {status}")]
    Failed {
        /// The converter sub-command.
        operation: &'static str,
        /// The first input path.
        input: PathBuf,
        /// Exit status of the process.
        status: ExitStatus,
    },
    /// The output directory could not be prepared, or an output was not produced.
    #[error(transparent)]
    File(#[from] FileError),
}

/// Any failure of a project file operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem or parse failure.
    #[error(transparent)]
    File(#[from] FileError),
    /// External converter failure.
    #[error(transparent)]
    Converter(#[from] ConverterError),
    /// A required source file is absent.
    #[error(transparent)]
    MissingInput(#[from] MissingInputError),
    /// A record or template document is malformed.
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// A failure of the synchronization queue.
#[derive(Debug, Clone, Error)]
pub enum QueueError {
    /// An entry was added after [`crate::SyncQueue::done`].
    #[error("Cannot add to queue after done() has been called")]
    Closed,
    /// A job could not be started because no async runtime is active.
    #[error("The synchronization queue requires a running tokio runtime")]
    NoRuntime,
    /// A queued job failed.
    #[error("Failed to save '{path}': {source}")]
    Job {
        /// Archive path of the entry.
        path: String,
        /// The job's error.
        #[source]
        source: Arc<Error>,
    },
}
