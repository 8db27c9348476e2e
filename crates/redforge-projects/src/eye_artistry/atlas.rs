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

//! The icon atlas: its texture, its `.inkatlas` mapping and the TweakXL
//! icon records that point into it.

use super::ForceOption;
use anyhow::{Context, Result};
use image::ImageFormat;
use redforge_atlas::{compose, PackedAtlas, Thumbnail, Thumbnails};
use redforge_core::red::atlas::{
    ActiveTexture, DynamicTextureSlot, TextureAtlas, TextureAtlasMapper, TextureResolution,
    TextureSlot, TextureSlots,
};
use redforge_core::red::template::{set_string, ROOT_CHUNK};
use redforge_core::red::{CName, RedEngineFile, ResourceReference};
use redforge_core::staleness::{self, Artifact};
use redforge_io::{FileSource, Project};

/// Texture group that keeps UI colours from being washed out in game.
pub const UI_TEXTURE_GROUP: &str = "TEXG_Generic_UI";

/// Builds the `.inkatlas` record: one mapper per icon, all in the first slot.
pub fn ink_texture_atlas(atlas: &PackedAtlas, xbm_depot_path: &str) -> TextureAtlas {
    let mut first = TextureSlot::with_texture(ResourceReference::soft(xbm_depot_path));
    first.parts = atlas
        .items()
        .iter()
        .map(|item| TextureAtlasMapper {
            clipping_rect_in_pixels: item.pixel_rect(),
            clipping_rect_in_uv_coords: atlas.uv_rect(item),
            part_name: CName::new(item.name.as_str()),
            ..Default::default()
        })
        .collect();

    TextureAtlas {
        active_texture: ActiveTexture::StaticTexture,
        texture_resolution: TextureResolution::UltraHD_3840_2160,
        texture: ResourceReference::empty_soft(),
        dynamic_texture: ResourceReference::empty_soft(),
        dynamic_texture_slot: DynamicTextureSlot {
            texture: ResourceReference::empty_soft(),
            ..Default::default()
        },
        slots: TextureSlots {
            elements: [
                first,
                TextureSlot::with_texture(ResourceReference::empty_soft()),
                TextureSlot::with_texture(ResourceReference::empty_soft()),
            ],
        },
        is_single_texture_mode: 1,
        ..Default::default()
    }
}

/// Renders the TweakXL declarations of one icon record per atlas item.
pub fn icon_declarations(short_name: &str, atlas: &PackedAtlas, inkatlas_depot_path: &str) -> String {
    let mut yaml = format!(
        "OptionsIcons.Id_{short_name}_colours_$(option):\n  $type: gamedataUIIcon_Record\n  $instances:\n"
    );
    for item in atlas.items() {
        yaml.push_str(&format!(
            "    - {{ option: {name}, definition: {name} }}\n",
            name = item.name
        ));
    }
    yaml.push_str("  atlasPartName: $(definition)\n");
    yaml.push_str(&format!("  atlasResourcePath: {inkatlas_depot_path}\n"));
    yaml
}

/// Writes the icon declarations, regenerates the atlas texture when a
/// thumbnail changed, and saves the `.inkatlas`.
pub async fn generate_atlas_image_and_data(
    project: &Project,
    atlas: &PackedAtlas,
    force: &ForceOption,
) -> Result<()> {
    let config = project.config();
    let short_name = config.short_name();
    let inkatlas_file = project.file(&format!("{short_name}-palette.inkatlas"));
    let xbm_file = project.file(&format!("textures\\{short_name}-palette-atlas.xbm"));

    let ink_atlas = ink_texture_atlas(atlas, xbm_file.archive_relative_path());

    let tweak_path = config.resolve_resources_path(&format!(
        "r6\\tweaks\\{}\\{}.yaml",
        config.modder_name().unwrap_or_default(),
        config.archive_name()
    ));
    let yaml = icon_declarations(short_name, atlas, inkatlas_file.archive_relative_path());
    FileSource::new(&tweak_path).write_if_changed(&yaml).await?;
    log::info!(
        "Saved {} icon declarations to {}.",
        atlas.items().len(),
        tweak_path.display()
    );

    let thumbnails_dir = project.assets_dir().join("inputs").join("thumbnails");
    let thumbnail_paths = Thumbnail::paths_in(&thumbnails_dir);
    let mut thumbnail_times = Vec::with_capacity(thumbnail_paths.len());
    for path in &thumbnail_paths {
        thumbnail_times.push(FileSource::new(path).modified().await?);
    }
    let xbm_time = xbm_file.cr2w_source().modified().await?;
    let freshness = staleness::assess_many(
        thumbnail_paths
            .iter()
            .zip(&thumbnail_times)
            .map(|(path, time)| Artifact::new(path, *time)),
        Artifact::new(xbm_file.cr2w_path(), xbm_time),
        force.applies_to_file(&xbm_file),
    )?;

    if freshness.is_stale() {
        xbm_file.ensure_raw_dir().await?;
        let png_path = xbm_file.png_path().to_path_buf();
        let packed = atlas.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let thumbnails = Thumbnails::load(&thumbnails_dir)?;
            compose(&packed, &thumbnails)?
                .save_with_format(&png_path, ImageFormat::Png)
                .with_context(|| format!("Failed to write atlas '{}'", png_path.display()))
        })
        .await??;
        log::info!(
            "{} images written to texture atlas {}.",
            atlas.items().len(),
            xbm_file.png_path().display()
        );

        log::info!("Importing atlas png file as {}...", xbm_file.cr2w_file_name());
        xbm_file.import_png().await?;

        // The importer assigns TEXG_Generic_Color, which renders UI icons washed out.
        log::info!("Exporting xbm file to JSON in order to tweak the setup data...");
        let mut document = xbm_file.export_json(true).await?;
        set_string(
            &mut document,
            &format!("{ROOT_CHUNK}/setup/group"),
            UI_TEXTURE_GROUP,
        )?;
        let text = serde_json::to_string_pretty(&document)?;
        xbm_file.save_and_import_json(&text, false).await?;
    } else {
        log::info!("Texture atlas PNG file already up to date, skipping texture generation.");
    }

    log::info!("Saving inkatlas JSON file as {}...", inkatlas_file.cr2w_file_name());
    let saved = inkatlas_file
        .save_and_import_record(
            &RedEngineFile::new(ink_atlas),
            force.applies_to_file(&inkatlas_file),
        )
        .await?;
    if !saved {
        log::info!("JSON had not changed since last import, skipping.");
    }
    Ok(())
}
