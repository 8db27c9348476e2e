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

//! Filesystem and external-converter services for the redforge pipeline.
//!
//! The crate wraps the WolvenKit command line tool behind the [`Converter`]
//! trait, exposes project-relative files through [`Project`] and
//! [`ProjectFile`], and provides the bounded [`SyncQueue`] that persists and
//! compiles generated resources.

#![warn(missing_docs)]

pub mod arena;
pub mod config_loader;
pub mod converter;
pub mod error;
pub mod file_source;
pub mod install;
pub mod project;
pub mod project_file;
pub mod setup_loader;
pub mod sync_queue;

pub use converter::{Converter, Verbosity, WolvenKitCli};
pub use error::{ConverterError, Error, FileError, QueueError};
pub use file_source::FileSource;
pub use project::Project;
pub use project_file::ProjectFile;
pub use sync_queue::SyncQueue;
