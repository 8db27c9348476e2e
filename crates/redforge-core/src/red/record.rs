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

//! The catalog of records the pipeline generates, with `$type` dispatch for
//! validating arbitrary engine JSON.

use super::appearance::{
    AppearanceDefinition, AppearanceResource, HardTransformBinding,
    MorphTargetSkinnedMeshComponent, SkinningBinding,
};
use super::atlas::{DynamicTextureSlot, TextureAtlas, TextureAtlasMapper, TextureSlot};
use super::customization::{
    AppearanceInfo, CharacterCustomizationInfoResource, IndexedAppearanceDefinition,
    OptionsGroup, SwitcherInfo, SwitcherOption,
};
use super::material::{MaterialInstance, MeshAppearance, MeshMaterialEntry};
use super::tag::RedType;
use crate::error::RecordError;
use serde_json::Value;

macro_rules! catalog {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        /// Any record kind in the catalog.
        #[derive(Debug, Clone, PartialEq)]
        #[allow(missing_docs)]
        pub enum ResourceRecord {
            $($variant($ty),)+
        }

        impl ResourceRecord {
            /// Validates `value` against the record its `$type` names.
            ///
            /// Unknown types, attributes that do not fit the tagged shape and
            /// attributes the shape does not declare are all rejected.
            pub fn from_value(value: Value) -> Result<Self, RecordError> {
                let name = value
                    .get("$type")
                    .and_then(Value::as_str)
                    .ok_or(RecordError::MissingType)?
                    .to_owned();
                $(
                    if name == <$ty as RedType>::TYPE_NAME {
                        return serde_json::from_value::<$ty>(value)
                            .map(ResourceRecord::$variant)
                            .map_err(|e| RecordError::Shape {
                                type_name: name.clone(),
                                details: e.to_string(),
                            });
                    }
                )+
                Err(RecordError::UnknownType(name))
            }

            /// The engine type name of this record.
            pub fn type_name(&self) -> &'static str {
                match self {
                    $(ResourceRecord::$variant(_) => <$ty as RedType>::TYPE_NAME,)+
                }
            }

            /// Returns `true` when `name` is a catalogued type.
            pub fn is_known(name: &str) -> bool {
                false $(|| name == <$ty as RedType>::TYPE_NAME)+
            }
        }
    };
}

catalog! {
    CharacterCustomization(CharacterCustomizationInfoResource),
    SwitcherInfo(SwitcherInfo),
    SwitcherOption(SwitcherOption),
    AppearanceInfo(AppearanceInfo),
    IndexedAppearanceDefinition(IndexedAppearanceDefinition),
    OptionsGroup(OptionsGroup),
    AppearanceResource(AppearanceResource),
    AppearanceDefinition(AppearanceDefinition),
    MorphTargetSkinnedMeshComponent(MorphTargetSkinnedMeshComponent),
    HardTransformBinding(HardTransformBinding),
    SkinningBinding(SkinningBinding),
    MeshAppearance(MeshAppearance),
    MeshMaterialEntry(MeshMaterialEntry),
    MaterialInstance(MaterialInstance),
    TextureAtlas(TextureAtlas),
    TextureSlot(TextureSlot),
    DynamicTextureSlot(DynamicTextureSlot),
    TextureAtlasMapper(TextureAtlasMapper),
}

impl ResourceRecord {
    /// Validates the root chunk of a whole resource file.
    pub fn from_document(document: &Value) -> Result<Self, RecordError> {
        let root = document
            .pointer(super::template::ROOT_CHUNK)
            .ok_or_else(|| RecordError::MissingField(super::template::ROOT_CHUNK.to_owned()))?;
        Self::from_value(root.clone())
    }
}
