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

//! Appearance resources (`.app`) and the mesh component they instantiate.

use super::primitives::{CName, CookingPlatform, ResourceReference, TagList, WorldTransform};
use super::tag::{red_type, TypeTag};
use crate::handle::{Handle, HandleContext};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fully qualified type name of the package buffer written by WolvenKit.
pub const RED_PACKAGE_TYPE: &str =
    "WolvenKit.RED4.Archive.Buffer.RedPackage, WolvenKit.RED4, Version=8.16.2.0, Culture=neutral, PublicKeyToken=null";

/// Include/exclude tag filter of a binding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct TagMask {
    #[serde(rename = "$type")]
    pub tag: TypeTag<TagMask>,
    pub excluded_tags: TagList,
    pub hard_tags: TagList,
    pub soft_tags: TagList,
}

/// Attaches a component to a bone or slot of its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct HardTransformBinding {
    #[serde(rename = "$type")]
    pub tag: TypeTag<HardTransformBinding>,
    pub bind_name: CName,
    pub enabled: u8,
    pub enable_mask: TagMask,
    pub slot_name: CName,
}

impl HardTransformBinding {
    /// Binds to the component named `bind_name`.
    pub fn to(bind_name: impl Into<CName>) -> Self {
        Self {
            tag: TypeTag::new(),
            bind_name: bind_name.into(),
            enabled: 1,
            enable_mask: TagMask::default(),
            slot_name: CName::default(),
        }
    }
}

/// Skins a component against the skeleton of another component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct SkinningBinding {
    #[serde(rename = "$type")]
    pub tag: TypeTag<SkinningBinding>,
    pub bind_name: CName,
    pub enabled: u8,
    pub enable_mask: TagMask,
}

impl SkinningBinding {
    /// Binds to the component named `bind_name`.
    pub fn to(bind_name: impl Into<CName>) -> Self {
        Self {
            tag: TypeTag::new(),
            bind_name: bind_name.into(),
            enabled: 1,
            enable_mask: TagMask::default(),
        }
    }
}

/// Shadow casting mode of a mesh component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum ShadowCastingMode {
    #[default]
    Default,
    Always,
    Never,
}

/// Render scene layer of a mesh component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum RenderSceneLayerMask {
    #[default]
    Default,
}

/// A skinned mesh component driven by a morph target resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct MorphTargetSkinnedMeshComponent {
    #[serde(rename = "$type")]
    pub tag: TypeTag<MorphTargetSkinnedMeshComponent>,
    pub accept_dismemberment: u8,
    pub auto_hide_distance: f64,
    pub cast_local_shadows: ShadowCastingMode,
    pub cast_shadows: ShadowCastingMode,
    pub chunk_mask: String,
    #[serde(rename = "forceLODLevel")]
    pub force_lod_level: i32,
    pub id: String,
    pub is_enabled: u8,
    pub is_replicable: u8,
    pub local_transform: WorldTransform,
    pub mesh_appearance: CName,
    pub morph_resource: ResourceReference,
    pub name: CName,
    pub parent_transform: Handle<HardTransformBinding>,
    pub rendering_plane_animation_param: CName,
    pub render_scene_layer_mask: RenderSceneLayerMask,
    pub skinning: Handle<SkinningBinding>,
    pub tags: TagList,
    #[serde(rename = "useSkinningLOD")]
    pub use_skinning_lod: u8,
    pub version: u32,
    pub visibility_animation_param: CName,
}

impl MorphTargetSkinnedMeshComponent {
    /// A component bound to `root`, with handles issued by `ctx`.
    pub fn new(ctx: &HandleContext) -> Self {
        Self {
            tag: TypeTag::new(),
            accept_dismemberment: 1,
            auto_hide_distance: 0.0,
            cast_local_shadows: ShadowCastingMode::Default,
            cast_shadows: ShadowCastingMode::Default,
            chunk_mask: "9223372036854775807".to_owned(),
            force_lod_level: -1,
            // WolvenKit assigns the real id on import.
            id: "0".to_owned(),
            is_enabled: 1,
            is_replicable: 0,
            local_transform: WorldTransform::default(),
            mesh_appearance: CName::default(),
            morph_resource: ResourceReference::default(),
            name: CName::default(),
            parent_transform: ctx.issue(HardTransformBinding::to("root")),
            rendering_plane_animation_param: CName::default(),
            render_scene_layer_mask: RenderSceneLayerMask::Default,
            skinning: ctx.issue(SkinningBinding::to("root")),
            tags: TagList::default(),
            use_skinning_lod: 0,
            version: 1,
            visibility_animation_param: CName::default(),
        }
    }
}

/// Payload of a compiled package buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct PackageData {
    pub version: u32,
    pub sections: u32,
    pub cruid_index: i32,
    pub cruid_dict: Map<String, Value>,
    pub chunks: Vec<Value>,
}

/// The `compiledData` buffer of an appearance definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct CompiledData {
    pub buffer_id: String,
    pub flags: u32,
    #[serde(rename = "Type")]
    pub ty: String,
    pub data: PackageData,
}

impl CompiledData {
    /// An empty package whose buffer id is issued by `ctx`.
    pub fn empty(ctx: &HandleContext) -> Self {
        Self {
            buffer_id: ctx.next_id().to_string(),
            flags: 0,
            ty: RED_PACKAGE_TYPE.to_owned(),
            data: PackageData {
                version: 4,
                sections: 7,
                cruid_index: -1,
                cruid_dict: Map::new(),
                chunks: Vec::new(),
            },
        }
    }
}

/// Entity parameter buffers of an appearance definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct EntityParametersBuffer {
    #[serde(rename = "$type")]
    pub tag: TypeTag<EntityParametersBuffer>,
    pub parameter_buffers: Vec<Value>,
}

/// One named appearance inside an `.app` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct AppearanceDefinition {
    #[serde(rename = "$type")]
    pub tag: TypeTag<AppearanceDefinition>,
    pub censor_flags: u32,
    pub compiled_data: CompiledData,
    pub components: Vec<MorphTargetSkinnedMeshComponent>,
    pub cooked_data_path_override: ResourceReference,
    pub forced_lod_distance: u32,
    pub hit_representation_overrides: Vec<Value>,
    pub inherited_visual_tags: TagList,
    pub loose_dependencies: Vec<Value>,
    pub name: CName,
    pub parameters_buffer: EntityParametersBuffer,
    pub parent_appearance: CName,
    pub parts_masks: Vec<Value>,
    pub parts_overrides: Vec<Value>,
    pub parts_values: Vec<Value>,
    pub proxy_mesh: ResourceReference,
    pub proxy_mesh_appearance: CName,
    pub resolved_dependencies: Vec<ResourceReference>,
    pub visual_tags: TagList,
}

impl AppearanceDefinition {
    /// An empty definition named `name`.
    pub fn new(ctx: &HandleContext, name: impl Into<CName>) -> Self {
        Self {
            tag: TypeTag::new(),
            censor_flags: 0,
            compiled_data: CompiledData::empty(ctx),
            components: Vec::new(),
            cooked_data_path_override: ResourceReference::default(),
            forced_lod_distance: 0,
            hit_representation_overrides: Vec::new(),
            inherited_visual_tags: TagList::default(),
            loose_dependencies: Vec::new(),
            name: name.into(),
            parameters_buffer: EntityParametersBuffer::default(),
            parent_appearance: CName::default(),
            parts_masks: Vec::new(),
            parts_overrides: Vec::new(),
            parts_values: Vec::new(),
            proxy_mesh: ResourceReference::default(),
            proxy_mesh_appearance: CName::default(),
            resolved_dependencies: Vec::new(),
            visual_tags: TagList::default(),
        }
    }
}

/// Dismemberment wound configurations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct WoundsConfigSet {
    #[serde(rename = "$type")]
    pub tag: TypeTag<WoundsConfigSet>,
    #[serde(rename = "Configs")]
    pub configs: Vec<Value>,
}

/// Root of an `.app` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct AppearanceResource {
    #[serde(rename = "$type")]
    pub tag: TypeTag<AppearanceResource>,
    pub alternate_appearance_mapping: Vec<Value>,
    pub alternate_appearance_setting_name: CName,
    pub alternate_appearance_suffixes: Vec<Value>,
    pub appearances: Vec<Handle<AppearanceDefinition>>,
    pub base_entity: ResourceReference,
    pub base_entity_type: CName,
    pub base_type: CName,
    pub censorship_mapping: Vec<Value>,
    pub common_cook_data: ResourceReference,
    pub cooking_platform: CookingPlatform,
    #[serde(rename = "DismEffects")]
    pub dism_effects: Vec<Value>,
    #[serde(rename = "DismWoundConfig")]
    pub dism_wound_config: WoundsConfigSet,
    pub force_compile_proxy: u8,
    pub generate_player_blocking_collision_for_proxy: u8,
    pub part_type: CName,
    pub preset: CName,
    pub proxy_poly_count: u32,
    #[serde(rename = "Wounds")]
    pub wounds: Vec<Value>,
}

impl Default for AppearanceResource {
    fn default() -> Self {
        Self {
            tag: TypeTag::new(),
            alternate_appearance_mapping: Vec::new(),
            alternate_appearance_setting_name: CName::default(),
            alternate_appearance_suffixes: Vec::new(),
            appearances: Vec::new(),
            base_entity: ResourceReference::default(),
            base_entity_type: CName::default(),
            base_type: CName::default(),
            censorship_mapping: Vec::new(),
            common_cook_data: ResourceReference::default(),
            cooking_platform: CookingPlatform::Pc,
            dism_effects: Vec::new(),
            dism_wound_config: WoundsConfigSet::default(),
            force_compile_proxy: 0,
            generate_player_blocking_collision_for_proxy: 0,
            part_type: CName::default(),
            preset: CName::default(),
            proxy_poly_count: 0,
            wounds: Vec::new(),
        }
    }
}

red_type! {
    TagMask => "entTagMask",
    HardTransformBinding => "entHardTransformBinding",
    SkinningBinding => "entSkinningBinding",
    MorphTargetSkinnedMeshComponent => "entMorphTargetSkinnedMeshComponent",
    EntityParametersBuffer => "entEntityParametersBuffer",
    AppearanceDefinition => "appearanceAppearanceDefinition",
    WoundsConfigSet => "entdismembermentWoundsConfigSet",
    AppearanceResource => "appearanceAppearanceResource",
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn component_bindings_receive_distinct_handles() {
        let ctx = HandleContext::new();
        let component = MorphTargetSkinnedMeshComponent::new(&ctx);
        assert_ne!(component.parent_transform.id, component.skinning.id);
        let value = serde_json::to_value(&component).unwrap();
        assert_eq!(value["forceLODLevel"], json!(-1));
        assert_eq!(value["parentTransform"]["Data"]["slotName"]["$value"], json!("None"));
    }

    #[test]
    fn compiled_data_consumes_a_handle_id() {
        let ctx = HandleContext::new();
        let first = AppearanceDefinition::new(&ctx, "a");
        let second = AppearanceDefinition::new(&ctx, "b");
        assert_eq!(first.compiled_data.buffer_id, "1");
        assert_eq!(second.compiled_data.buffer_id, "2");
        let value = serde_json::to_value(&first).unwrap();
        assert_eq!(value["compiledData"]["Data"]["CruidIndex"], json!(-1));
    }

    #[test]
    fn appearance_resource_round_trips() {
        let ctx = HandleContext::new();
        let mut app = AppearanceResource::default();
        app.appearances.push(ctx.issue(AppearanceDefinition::new(&ctx, "look")));
        let value = serde_json::to_value(&app).unwrap();
        assert_eq!(value["DismWoundConfig"]["$type"], json!("entdismembermentWoundsConfigSet"));
        let back: AppearanceResource = serde_json::from_value(value).unwrap();
        assert_eq!(back, app);
    }
}
