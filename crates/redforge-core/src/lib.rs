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

//! Foundational types for the redforge content pipeline.
//!
//! This crate holds everything that does not touch the filesystem or spawn
//! processes: the engine record catalog and its JSON envelope, the handle
//! registry, the staleness policy, colour helpers, and the configuration and
//! setup models.

#![warn(missing_docs)]

pub mod colour;
pub mod config;
pub mod error;
pub mod handle;
pub mod red;
pub mod setup;
pub mod staleness;

pub use error::{ConfigError, MissingInputError, RecordError};
pub use handle::{Handle, HandleContext, HandleId};
