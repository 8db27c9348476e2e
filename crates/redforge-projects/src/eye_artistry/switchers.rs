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

//! The switcher graph: the character customization descriptor, one
//! appearance file per variant, and the mesh entries behind every colour.

use super::lists::TextureLists;
use super::materials::{
    prepare_base_material_template, prepare_layer_base_materials, BaseMaterials,
};
use super::textures::TextureReference;
use super::ForceOption;
use anyhow::Result;
use redforge_core::colour::ColourDefinition;
use redforge_core::red::appearance::{
    AppearanceDefinition, AppearanceResource, MorphTargetSkinnedMeshComponent, ShadowCastingMode,
};
use redforge_core::red::customization::{
    AppearanceInfo, CharacterCustomizationInfoResource, CustomizationOption,
    IndexedAppearanceDefinition, OptionsGroup, RandomizeCategory, SwitcherInfo, SwitcherOption,
};
use redforge_core::red::material::{MaterialInstance, MaterialParam, MeshAppearance, MeshMaterialEntry, ParamName};
use redforge_core::red::primitives::TagList;
use redforge_core::red::template::{array_mut, max_handle_id, push_record, set_string};
use redforge_core::red::{CName, RedEngineFile, ResourceReference, TweakDbId};
use redforge_core::setup::{ModSetup, SwitcherGroupSetup};
use redforge_core::{Handle, HandleContext};
use redforge_io::setup_loader::load_json_template;
use redforge_io::sync_queue::MAX_SIMULTANEOUS_JOBS;
use redforge_io::{Project, ProjectFile, SyncQueue};
use serde_json::Value;
use std::sync::Arc;

/// Mesh template, inside the templates directory.
pub const MESH_TEMPLATE_JSON: &str = "eye-makeup.mesh.json";
/// Morph target template, inside the templates directory.
pub const MORPHTARGET_TEMPLATE_JSON: &str = "eye-makeup.morphtarget.json";

const MESH_APPEARANCES: &str = "/Data/RootChunk/appearances";
const MESH_MATERIAL_ENTRIES: &str = "/Data/RootChunk/materialEntries";
const MESH_LOCAL_MATERIALS: &str = "/Data/RootChunk/localMaterialBuffer/materials";
const MORPHTARGET_BASE_MESH: &str = "/Data/RootChunk/baseMesh/DepotPath/$value";

/// A generated switcher and its variants.
#[derive(Debug, Clone)]
pub struct SwitcherGroup {
    /// Identifier from the setup.
    pub identifier: String,
    /// Display label.
    pub label: String,
    /// `<short name>_<identifier>`.
    pub group_id: String,
    /// Global index of the switcher.
    pub switcher_index: u32,
    /// Global index of the "off" appearance.
    pub off_index: u32,
    /// Variants in list order.
    pub variants: Vec<SelectableVariant>,
}

/// One texture offered by a switcher.
#[derive(Debug, Clone)]
pub struct SelectableVariant {
    /// Texture id.
    pub id: String,
    /// Owning group.
    pub group_id: String,
    /// `<group id>_<texture id>`.
    pub variant_id: String,
    /// Position among the group's variants.
    pub variant_index: usize,
    /// Global index of the variant's appearance option.
    pub appearance_index: u32,
    /// The texture drawn by every colour of the variant.
    pub texture_file: Arc<ProjectFile>,
    /// One entry per colour.
    pub subvariants: Vec<SelectableSubvariant>,
}

/// One colour of a variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableSubvariant {
    /// `<variant id>_<colour base id>`, the mesh appearance and material name.
    pub unique_id: String,
}

/// Indices reserved by one switcher group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupIndices {
    /// The switcher.
    pub switcher: u32,
    /// The "off" appearance.
    pub off: u32,
}

impl GroupIndices {
    /// Appearance index of the group's `variant_index`th variant. One index
    /// after the "off" appearance is left unused.
    pub fn variant(&self, variant_index: usize) -> u32 {
        self.off + 2 + variant_index as u32
    }
}

/// Hands out global customization indices across switcher groups.
#[derive(Debug, Clone)]
pub struct IndexAllocator {
    next: u32,
}

impl IndexAllocator {
    /// Starts at the setup's first switcher index.
    pub fn new(first: u32) -> Self {
        Self { next: first }
    }

    /// The index the next group will start at.
    pub fn next(&self) -> u32 {
        self.next
    }

    /// Reserves the switcher and "off" indices of a new group.
    pub fn begin_group(&mut self) -> GroupIndices {
        let indices = GroupIndices {
            switcher: self.next,
            off: self.next + 1,
        };
        self.next += 2;
        indices
    }

    /// Moves past the appearances of a group with `variant_count` variants.
    pub fn end_group(&mut self, indices: &GroupIndices, variant_count: usize) {
        if variant_count > 0 {
            self.next = self.next.max(indices.variant(variant_count - 1) + 1);
        }
    }
}

fn switcher_info(group_id: &str, label: &str, index: u32) -> SwitcherInfo {
    SwitcherInfo {
        index,
        localized_name: label.to_owned(),
        name: CName::new(group_id),
        options: vec![SwitcherOption::new(0, "Common-Off", [format!("{group_id}_none")])],
        randomize_category: RandomizeCategory::Makeup,
        switch_visibility: 1,
        ui_slot: CName::new(group_id),
        ui_slots: vec![CName::new(format!("{group_id}_colour"))],
        ..Default::default()
    }
}

fn off_appearance(group_id: &str, label: &str, index: u32) -> AppearanceInfo {
    AppearanceInfo {
        definitions: vec![IndexedAppearanceDefinition::default()],
        enabled: 1,
        index,
        localized_name: format!("{label} Colour"),
        name: CName::new(format!("{group_id}_none")),
        randomize_category: RandomizeCategory::Makeup,
        ui_slot: CName::new(format!("{group_id}_colour")),
        use_thumbnails: 1,
        ..Default::default()
    }
}

fn variant_appearance(
    group_id: &str,
    variant_id: &str,
    label: &str,
    index: u32,
    app_depot_path: &str,
) -> AppearanceInfo {
    AppearanceInfo {
        definitions: Vec::new(),
        enabled: 0,
        index,
        link: CName::new(format!("{group_id} colour")),
        link_controller: 1,
        localized_name: label.to_owned(),
        name: CName::new(variant_id),
        randomize_category: RandomizeCategory::Makeup,
        resource: ResourceReference::soft(app_depot_path),
        ui_slot: CName::new(format!("{group_id}_colour")),
        use_thumbnails: 1,
        ..Default::default()
    }
}

/// Mutable state shared while the graph of every group is assembled.
struct GraphBuilder<'a> {
    ctx: HandleContext,
    short_name: &'a str,
    morphtarget_depot_path: &'a str,
    colours: &'a [ColourDefinition],
    mesh: Value,
    inkcc: CharacterCustomizationInfoResource,
    character_customization: OptionsGroup,
    face: OptionsGroup,
}

/// Inputs of one variant.
struct VariantInput<'a> {
    group_id: &'a str,
    variant_index: usize,
    appearance_index: u32,
    texture: &'a TextureReference,
    app_file: &'a ProjectFile,
    materials: &'a BaseMaterials,
}

impl GraphBuilder<'_> {
    fn add_group_options(&mut self, group_id: &str) {
        let none = format!("{group_id}_none");
        self.character_customization.options.push(CName::new(group_id));
        self.character_customization.options.push(CName::new(none.as_str()));
        self.face.options.push(CName::new(none));
    }

    fn add_variant_options(&mut self, variant_id: &str) {
        self.face.options.push(CName::new(variant_id));
        self.character_customization.options.push(CName::new(variant_id));
    }

    /// Builds the variant's appearance option and appearance file, and adds
    /// one mesh appearance and local material per colour.
    fn build_variant(
        &mut self,
        input: &VariantInput<'_>,
    ) -> Result<(Handle<CustomizationOption>, AppearanceResource, SelectableVariant)> {
        let group_id = input.group_id;
        let texture = input.texture;
        let variant_id = format!("{group_id}_{}", texture.id);
        log::info!("Preparing variant {variant_id}...");

        let info_id = self.ctx.next_id();
        let mut info = variant_appearance(
            group_id,
            &variant_id,
            &texture.label,
            input.appearance_index,
            input.app_file.archive_relative_path(),
        );
        let mut app = AppearanceResource {
            base_entity: ResourceReference::empty_soft(),
            common_cook_data: ResourceReference::empty_soft(),
            ..Default::default()
        };

        log::debug!("Adding materials for {} colours...", self.colours.len());
        let mut subvariants = Vec::with_capacity(self.colours.len());
        for colour in self.colours {
            let unique_id = format!("{variant_id}_{}", colour.base_id);
            let appearance_name = format!("{group_id}_{}", colour.base_id);
            let color = colour.rgba.to_engine_color();

            let mut component = MorphTargetSkinnedMeshComponent::new(&self.ctx);
            component.auto_hide_distance = 50.0;
            component.cast_local_shadows = ShadowCastingMode::Always;
            component.cast_shadows = ShadowCastingMode::Always;
            component.mesh_appearance = CName::new(unique_id.as_str());
            component.morph_resource = ResourceReference::to(self.morphtarget_depot_path);
            component.name = CName::new(group_id);

            let mut definition = AppearanceDefinition::new(&self.ctx, appearance_name.as_str());
            definition.components = vec![component];
            definition.cooked_data_path_override = ResourceReference::empty_soft();
            definition.proxy_mesh = ResourceReference::empty_soft();
            definition.resolved_dependencies =
                vec![ResourceReference::soft(self.morphtarget_depot_path)];
            definition.visual_tags = TagList::of(["Female"]);
            app.appearances.push(self.ctx.issue(definition));

            let mesh_appearance = MeshAppearance {
                name: CName::new(unique_id.as_str()),
                chunk_materials: vec![CName::new(unique_id.as_str())],
                ..Default::default()
            };
            push_record(&mut self.mesh, MESH_APPEARANCES, &self.ctx.issue(mesh_appearance))?;
            let entry_index = array_mut(&mut self.mesh, MESH_MATERIAL_ENTRIES)?.len() as u32;
            push_record(
                &mut self.mesh,
                MESH_MATERIAL_ENTRIES,
                &MeshMaterialEntry {
                    index: entry_index,
                    is_local_instance: 1,
                    name: CName::new(unique_id.as_str()),
                    ..Default::default()
                },
            )?;
            let base_material = input.materials.for_kind(colour.kind);
            push_record(
                &mut self.mesh,
                MESH_LOCAL_MATERIALS,
                &MaterialInstance {
                    base_material: ResourceReference::to(base_material.archive_relative_path()),
                    values: vec![
                        MaterialParam::color(ParamName::DiffuseColor, color),
                        MaterialParam::texture(
                            ParamName::DiffuseTexture,
                            texture.file.archive_relative_path(),
                        ),
                    ],
                    ..Default::default()
                },
            )?;

            let index = info.definitions.len() as u32;
            info.definitions.push(IndexedAppearanceDefinition {
                color,
                icon: TweakDbId::new(format!(
                    "OptionsIcons.Id_{}_colours_{}",
                    self.short_name, colour.base_id
                )),
                name: CName::new(appearance_name),
                index,
                ..Default::default()
            });

            subvariants.push(SelectableSubvariant { unique_id });
        }
        log::debug!(
            "localMaterialBuffer now has {} entries.",
            array_mut(&mut self.mesh, MESH_LOCAL_MATERIALS)?.len()
        );

        let option = Handle {
            id: info_id,
            data: CustomizationOption::Appearance(info),
        };
        let variant = SelectableVariant {
            id: texture.id.clone(),
            group_id: group_id.to_owned(),
            variant_id,
            variant_index: input.variant_index,
            appearance_index: input.appearance_index,
            texture_file: texture.file.clone(),
            subvariants,
        };
        Ok((option, app, variant))
    }
}

/// Builds every switcher group, queues all generated files and waits until
/// they are saved and imported.
pub async fn prepare_switcher_groups(
    project: &Project,
    setup: &ModSetup,
    lists: &TextureLists,
    colours: &[ColourDefinition],
    force: &ForceOption,
) -> Result<Vec<SwitcherGroup>> {
    let queue = SyncQueue::new(MAX_SIMULTANEOUS_JOBS);
    let templates_dir = project.assets_dir().join("templates");
    let short_name = project.config().short_name();

    let morphtarget_file = project.file(&format!("{short_name}.morphtarget"));
    let mesh_file = project.file(&format!("{short_name}.mesh"));

    let mut morphtarget = load_json_template(&templates_dir.join(MORPHTARGET_TEMPLATE_JSON)).await?;
    set_string(&mut morphtarget, MORPHTARGET_BASE_MESH, mesh_file.archive_relative_path())?;
    let mesh = load_json_template(&templates_dir.join(MESH_TEMPLATE_JSON)).await?;

    // Fresh handles must not collide with those already in the templates.
    let first_handle = max_handle_id(&mesh).max(max_handle_id(&morphtarget)) + 1;
    let mut builder = GraphBuilder {
        ctx: HandleContext::starting_at(first_handle),
        short_name,
        morphtarget_depot_path: morphtarget_file.archive_relative_path(),
        colours,
        mesh,
        inkcc: CharacterCustomizationInfoResource::default(),
        character_customization: OptionsGroup::named("character_customization"),
        face: OptionsGroup::named("face"),
    };

    let template = prepare_base_material_template(project, &queue, &templates_dir, force).await?;

    let mut indices = IndexAllocator::new(setup.ccxl.first_switcher_global_index);
    let mut groups = Vec::with_capacity(setup.ccxl.switcher_groups.len());
    for (layer_index, group_setup) in setup.ccxl.switcher_groups.iter().enumerate() {
        let materials = prepare_layer_base_materials(
            project,
            &template,
            &group_setup.identifier,
            layer_index,
            force,
        )
        .await?;
        let group = build_group(
            project,
            &queue,
            &mut builder,
            &mut indices,
            group_setup,
            lists,
            &materials,
            force,
        )?;
        groups.push(group);
    }

    let GraphBuilder {
        mut inkcc,
        character_customization,
        face,
        mesh,
        ..
    } = builder;
    inkcc.head_groups = vec![character_customization, face];

    let inkcc_file = project.file(&format!("{short_name}.inkcharcustomization"));
    let force_inkcc = force.applies_to_file(&inkcc_file);
    queue.enqueue_record(inkcc_file, &RedEngineFile::new(inkcc), force_inkcc)?;
    let force_morphtarget = force.applies_to_file(&morphtarget_file);
    queue.enqueue(
        morphtarget_file,
        Some(serde_json::to_string_pretty(&morphtarget)?),
        force_morphtarget,
    )?;
    let force_mesh = force.applies_to_file(&mesh_file);
    queue.enqueue(mesh_file, Some(serde_json::to_string_pretty(&mesh)?), force_mesh)?;
    queue.done();
    queue.all_saved().await?;

    Ok(groups)
}

#[allow(clippy::too_many_arguments)]
fn build_group(
    project: &Project,
    queue: &SyncQueue,
    builder: &mut GraphBuilder<'_>,
    indices: &mut IndexAllocator,
    setup: &SwitcherGroupSetup,
    lists: &TextureLists,
    materials: &BaseMaterials,
    force: &ForceOption,
) -> Result<SwitcherGroup> {
    let group_id = format!("{}_{}", builder.short_name, setup.identifier);
    builder.add_group_options(&group_id);

    let reserved = indices.begin_group();
    let switcher_handle = builder.ctx.next_id();
    let off_handle = builder.ctx.next_id();
    let mut switcher = switcher_info(&group_id, &setup.label, reserved.switcher);
    let off = off_appearance(&group_id, &setup.label, reserved.off);

    let mut options = Vec::new();
    let mut variants: Vec<SelectableVariant> = Vec::new();
    for list_name in &setup.include {
        let Some(list) = lists.get(list_name) else {
            log::warn!("List '{list_name}' not found in lists.");
            continue;
        };
        for texture in list {
            let variant_index = variants.len();
            let variant_id = format!("{group_id}_{}", texture.id);
            builder.add_variant_options(&variant_id);
            let app_file = project.file(&format!("variants\\{variant_id}.app"));

            let (option, app, variant) = builder.build_variant(&VariantInput {
                group_id: &group_id,
                variant_index,
                appearance_index: reserved.variant(variant_index),
                texture,
                app_file: &app_file,
                materials,
            })?;
            switcher.options.push(SwitcherOption::new(
                variant_index as u32 + 1,
                texture.label.as_str(),
                [variant.variant_id.as_str()],
            ));
            let force_app = force.applies_to_file(&app_file);
            queue.enqueue_record(app_file, &RedEngineFile::new(app), force_app)?;
            options.push(option);
            variants.push(variant);
        }
    }
    indices.end_group(&reserved, variants.len());

    let head = &mut builder.inkcc.head_customization_options;
    head.push(Handle {
        id: switcher_handle,
        data: CustomizationOption::Switcher(switcher),
    });
    head.push(Handle {
        id: off_handle,
        data: CustomizationOption::Appearance(off),
    });
    head.extend(options);

    Ok(SwitcherGroup {
        identifier: setup.identifier.clone(),
        label: setup.label.clone(),
        group_id,
        switcher_index: reserved.switcher,
        off_index: reserved.off,
        variants,
    })
}
