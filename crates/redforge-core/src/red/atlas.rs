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

//! UI texture atlas records (`.inkatlas`).

use super::primitives::{CName, CookingPlatform, Rect, RectF, ResourceReference};
use super::tag::{red_type, TypeTag};
use serde::{Deserialize, Serialize};

/// A named sub-rectangle of an atlas texture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct TextureAtlasMapper {
    #[serde(rename = "$type")]
    pub tag: TypeTag<TextureAtlasMapper>,
    pub clipping_rect_in_pixels: Rect,
    #[serde(rename = "clippingRectInUVCoords")]
    pub clipping_rect_in_uv_coords: RectF,
    pub part_name: CName,
}

/// A nine-slice scaling rectangle for a part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct TextureAtlasSlice {
    #[serde(rename = "$type")]
    pub tag: TypeTag<TextureAtlasSlice>,
    pub part_name: CName,
    pub nine_slice_scale_rect: RectF,
}

/// One resolution slot of an atlas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct TextureSlot {
    #[serde(rename = "$type")]
    pub tag: TypeTag<TextureSlot>,
    pub texture: ResourceReference,
    pub parts: Vec<TextureAtlasMapper>,
    pub slices: Vec<TextureAtlasSlice>,
}

impl TextureSlot {
    /// An empty slot referring to `texture`.
    pub fn with_texture(texture: ResourceReference) -> Self {
        Self {
            texture,
            ..Default::default()
        }
    }
}

/// The dynamic-texture slot of an atlas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct DynamicTextureSlot {
    #[serde(rename = "$type")]
    pub tag: TypeTag<DynamicTextureSlot>,
    pub parts: Vec<TextureAtlasMapper>,
    pub texture: ResourceReference,
}

/// Fixed array of the three resolution slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextureSlots {
    /// Slots from highest to lowest resolution.
    #[serde(rename = "Elements")]
    pub elements: [TextureSlot; 3],
}

/// Which texture source an atlas samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum ActiveTexture {
    #[default]
    StaticTexture,
    DynamicTexture,
    InvalidTexture,
}

/// Authoring resolution of an atlas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs, non_camel_case_types)]
pub enum TextureResolution {
    UltraHD_3840_2160,
    WQHD_2560_1440,
    #[default]
    FullHD_1920_1080,
}

/// Root of an `.inkatlas` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct TextureAtlas {
    #[serde(rename = "$type")]
    pub tag: TypeTag<TextureAtlas>,
    pub active_texture: ActiveTexture,
    pub cooking_platform: CookingPlatform,
    pub dynamic_texture: ResourceReference,
    pub dynamic_texture_slot: DynamicTextureSlot,
    pub is_single_texture_mode: u8,
    pub parts: Vec<TextureAtlasMapper>,
    pub slices: Vec<TextureAtlasSlice>,
    pub slots: TextureSlots,
    pub texture: ResourceReference,
    pub texture_resolution: TextureResolution,
}

red_type! {
    TextureAtlasMapper => "inkTextureAtlasMapper",
    TextureAtlasSlice => "inkTextureAtlasSlice",
    TextureSlot => "inkTextureSlot",
    DynamicTextureSlot => "inkDynamicTextureSlot",
    TextureAtlas => "inkTextureAtlas",
}
