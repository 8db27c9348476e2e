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

//! Texture atlas packing and compositing.
//!
//! [`AtlasLayout`] places fixed-size items on a row-major grid. Once every
//! item is pushed, [`AtlasLayout::finish`] yields a [`PackedAtlas`] whose
//! height is known, which is the only way to obtain UV rectangles.
//! [`compose`] then renders the atlas image from a set of [`Thumbnails`].

#![warn(missing_docs)]

pub mod composite;
pub mod layout;

pub use composite::{compose, layer_plan, BlendMode, Layer, LayerSource, Thumbnail, Thumbnails};
pub use layout::{AtlasItem, AtlasLayout, PackedAtlas};
