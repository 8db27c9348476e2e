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

//! Base material instances shared by every colour of a switcher group.

use super::ForceOption;
use anyhow::{Context, Result};
use redforge_core::colour::MaterialKind;
use redforge_core::red::material::{MaterialInstance, MaterialParam, ParamName, MESH_DECAL_MATERIAL};
use redforge_core::red::{Color, RedEngineFile, ResourceReference};
use redforge_io::{Project, ProjectFile, SyncQueue};
use std::path::Path;
use std::sync::Arc;

/// The copied decal template that the first two layers derive from.
pub const BASE_MATERIAL_TEMPLATE: &str = "materials\\mesh_decal__emp_front.mt";

/// JSON of [`BASE_MATERIAL_TEMPLATE`], inside the templates directory.
pub const BASE_MATERIAL_TEMPLATE_JSON: &str = "mesh_decal__emp_front.mt.json";

const NOISE_MASK: &str = "base\\characters\\common\\skin\\face\\noise_decal_d01.xbm";
const FLAT_NORMAL: &str = "engine\\textures\\small_flat_normal.xbm";
const ROUGHMETAL: &str = "engine\\textures\\editor\\roughmetal.xbm";
const BLACK: &str = "engine\\textures\\editor\\black.xbm";
const WHITE: &str = "engine\\textures\\editor\\white.xbm";
const GREY: &str = "engine\\textures\\editor\\grey.xbm";

/// The four base materials of one layer.
#[derive(Debug, Clone)]
pub struct BaseMaterials {
    /// Matte finish.
    pub matte: Arc<ProjectFile>,
    /// Regular finish.
    pub regular: Arc<ProjectFile>,
    /// Metallic shimmer.
    pub shimmer: Arc<ProjectFile>,
    /// Glitter.
    pub glitter: Arc<ProjectFile>,
}

impl BaseMaterials {
    /// The material used for colours of `kind`.
    pub fn for_kind(&self, kind: MaterialKind) -> &Arc<ProjectFile> {
        match kind {
            MaterialKind::Matte => &self.matte,
            MaterialKind::Regular => &self.regular,
            MaterialKind::Shimmer => &self.shimmer,
            MaterialKind::Glitter => &self.glitter,
        }
    }
}

/// Copies the decal template into the project and queues it for import.
pub async fn prepare_base_material_template(
    project: &Project,
    queue: &SyncQueue,
    templates_dir: &Path,
    force: &ForceOption,
) -> Result<Arc<ProjectFile>> {
    let file = project.file(BASE_MATERIAL_TEMPLATE);
    let source = templates_dir.join(BASE_MATERIAL_TEMPLATE_JSON);
    file.copy_json_from(&source)
        .await
        .with_context(|| format!("Failed to copy material template '{}'", source.display()))?;
    queue.enqueue(file.clone(), None, force.applies_to_file(&file))?;
    Ok(file)
}

/// Parent material of layer `layer_index`: the copied template for the
/// first two layers, the engine decal material afterwards.
pub fn base_material_path(layer_index: usize, template_depot_path: &str) -> &str {
    if layer_index <= 1 {
        template_depot_path
    } else {
        MESH_DECAL_MATERIAL
    }
}

/// Layers 0 and 2 render through the material mask.
pub fn enables_mask(layer_index: usize) -> bool {
    layer_index == 0 || layer_index == 2
}

/// The base instance for `kind`. Matte and regular share their values, as do
/// shimmer and glitter.
pub fn base_material_instance(kind: MaterialKind, enable_mask: bool, parent: &str) -> MaterialInstance {
    use ParamName::*;
    let transparent = Color::rgba(0, 0, 0, 0);
    let values = match kind {
        MaterialKind::Matte | MaterialKind::Regular => vec![
            MaterialParam::color(DiffuseColor, transparent),
            MaterialParam::scalar(DiffuseAlpha, 1.0),
            MaterialParam::scalar(NormalAlpha, 0.0),
            MaterialParam::texture(SecondaryMask, NOISE_MASK),
            MaterialParam::texture(NormalTexture, FLAT_NORMAL),
            MaterialParam::scalar(SecondaryMaskUVScale, 30.0),
            MaterialParam::texture(RoughnessTexture, ROUGHMETAL),
            MaterialParam::scalar(RoughnessMetalnessAlpha, 1.0),
            MaterialParam::scalar(SecondaryMaskInfluence, 1.0),
            MaterialParam::scalar(NormalsBlendingMode, 1.0),
        ],
        MaterialKind::Shimmer | MaterialKind::Glitter => vec![
            MaterialParam::color(DiffuseColor, transparent),
            MaterialParam::scalar(DiffuseAlpha, 1.0),
            MaterialParam::scalar(NormalAlpha, 0.0),
            MaterialParam::texture(SecondaryMask, NOISE_MASK),
            MaterialParam::texture(NormalTexture, FLAT_NORMAL),
            MaterialParam::texture(RoughnessTexture, BLACK),
            MaterialParam::texture(MetalnessTexture, WHITE),
            MaterialParam::scalar(RoughnessMetalnessAlpha, 0.280000001),
            MaterialParam::scalar(SecondaryMaskInfluence, 1.0),
            MaterialParam::texture(DiffuseTexture, GREY),
            MaterialParam::scalar(UVOffsetX, 0.0),
            MaterialParam::scalar(UVOffsetY, 0.0),
            MaterialParam::scalar(UVRotation, 0.0),
            MaterialParam::scalar(NormalsBlendingMode, 1.0),
            MaterialParam::scalar(AlphaMaskContrast, 0.0),
            MaterialParam::scalar(AnimationSpeed, 1.0),
            MaterialParam::scalar(AnimationFramesWidth, 1.0),
            MaterialParam::scalar(AnimationFramesHeight, 1.0),
            MaterialParam::scalar(DepthThreshold, 1.0),
        ],
    };
    MaterialInstance {
        base_material: ResourceReference::to(parent),
        enable_mask: u8::from(enable_mask),
        values,
        ..Default::default()
    }
}

/// Writes and imports the four base materials of one switcher group.
pub async fn prepare_layer_base_materials(
    project: &Project,
    template: &ProjectFile,
    group_name: &str,
    layer_index: usize,
    force: &ForceOption,
) -> Result<BaseMaterials> {
    let parent = base_material_path(layer_index, template.archive_relative_path());
    let enable_mask = enables_mask(layer_index);

    let mut files = Vec::with_capacity(MaterialKind::ALL.len());
    for kind in MaterialKind::ALL {
        let file = project.file(&format!("materials\\{group_name}_{kind}.mi"));
        let record = RedEngineFile::new(base_material_instance(kind, enable_mask, parent));
        if !file
            .save_and_import_record(&record, force.applies_to_file(&file))
            .await?
        {
            log::debug!("{} is up to date", file.cr2w_file_name());
        }
        files.push(file);
    }
    let [matte, regular, shimmer, glitter]: [Arc<ProjectFile>; 4] = files
        .try_into()
        .map_err(|_| anyhow::anyhow!("Expected one base material per kind"))?;
    Ok(BaseMaterials {
        matte,
        regular,
        shimmer,
        glitter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use redforge_core::red::material::MaterialValue;

    #[test]
    fn first_two_layers_derive_from_the_template() {
        assert_eq!(base_material_path(0, "t.mt"), "t.mt");
        assert_eq!(base_material_path(1, "t.mt"), "t.mt");
        assert_eq!(base_material_path(2, "t.mt"), MESH_DECAL_MATERIAL);
        assert_eq!(
            (0..4).map(enables_mask).collect::<Vec<_>>(),
            [true, false, true, false]
        );
    }

    #[test]
    fn paired_kinds_share_values() {
        let matte = base_material_instance(MaterialKind::Matte, true, "p");
        let regular = base_material_instance(MaterialKind::Regular, true, "p");
        let shimmer = base_material_instance(MaterialKind::Shimmer, false, "p");
        let glitter = base_material_instance(MaterialKind::Glitter, false, "p");
        assert_eq!(matte, regular);
        assert_eq!(shimmer, glitter);
        assert_eq!(matte.enable_mask, 1);
        assert_eq!(shimmer.enable_mask, 0);
        assert_eq!(shimmer.values.len(), 19);
        assert_eq!(
            shimmer.values[7].value,
            MaterialValue::Scalar(0.280000001),
            "metallic roughness blend"
        );
    }
}
