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

//! Named texture lists, resolved against the imported textures.

use super::textures::TextureReference;
use redforge_core::setup::ModSetup;
use std::collections::BTreeMap;

/// Resolved textures keyed by list name.
pub type TextureLists = BTreeMap<String, Vec<TextureReference>>;

/// Resolves every list of `setup`. Ids without an imported texture are
/// logged and left out.
pub fn prepare_lists(
    setup: &ModSetup,
    textures: &BTreeMap<String, TextureReference>,
) -> TextureLists {
    setup
        .lists
        .iter()
        .map(|(name, ids)| {
            let list = ids
                .iter()
                .filter_map(|id| {
                    let texture = textures.get(id);
                    if texture.is_none() {
                        log::warn!("Texture with ID {id} not found in textures.");
                    }
                    texture.cloned()
                })
                .collect();
            (name.clone(), list)
        })
        .collect()
}
