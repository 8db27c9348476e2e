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

//! Typed models of the engine records the pipeline reads and writes.

pub mod appearance;
pub mod atlas;
pub mod customization;
pub mod file;
pub mod material;
pub mod primitives;
pub mod record;
pub mod tag;
pub mod template;

pub use file::RedEngineFile;
pub use primitives::{CName, Color, ResourceFlags, ResourcePath, ResourceReference, TweakDbId};
pub use record::ResourceRecord;
pub use tag::{RedType, TypeTag};
