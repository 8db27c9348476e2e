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

//! Imports the monochrome makeup textures that variants are built from.

use super::ForceOption;
use anyhow::{Context, Result};
use redforge_core::setup::ModSetup;
use redforge_core::staleness::{self, Artifact};
use redforge_io::converter::{ConvertRequest, Converter};
use redforge_io::{FileSource, Project, ProjectFile};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::task::JoinSet;

/// Suffix of the source image inside a texture's asset folder.
pub const ORIGINAL_ASSET_FILENAME_SUFFIX: &str = "_Base_color.png";

/// Imports started together; the next batch waits for the whole batch.
pub const MAX_SIMULTANEOUS_IMPORTS: usize = 5;

/// A texture that variants can reference.
#[derive(Debug, Clone)]
pub struct TextureReference {
    /// Key in the setup's texture table.
    pub id: String,
    /// Display label, the asset folder name.
    pub label: String,
    /// The compiled texture.
    pub file: Arc<ProjectFile>,
}

/// Imports every texture of `setup` that has a source image, in batches.
/// Ids whose folder holds no source image are left out of the result.
pub async fn prepare_textures(
    project: &Project,
    setup: &ModSetup,
    assets_dir: &Path,
    force: &ForceOption,
) -> Result<BTreeMap<String, TextureReference>> {
    let xbm_dir = project.config().resolve_cr2w_path("textures");
    fs::create_dir_all(&xbm_dir)
        .await
        .with_context(|| format!("Failed to create '{}'", xbm_dir.display()))?;

    let entries: Vec<_> = setup.textures.iter().collect();
    let mut textures = BTreeMap::new();
    for batch in entries.chunks(MAX_SIMULTANEOUS_IMPORTS) {
        let mut jobs = JoinSet::new();
        for &(id, folder) in batch {
            let file = project.file(&format!("textures/{id}.xbm"));
            let job = TextureJob {
                force: force.applies_to_file(&file),
                id: id.clone(),
                label: folder.clone(),
                asset_dir: assets_dir.join(folder),
                temp_dir: assets_dir.join(".xbm").join(id),
                file,
                converter: project.converter().clone(),
            };
            jobs.spawn(job.run());
        }
        while let Some(joined) = jobs.join_next().await {
            if let Some(texture) = joined?? {
                textures.insert(texture.id.clone(), texture);
            }
        }
    }
    Ok(textures)
}

struct TextureJob {
    id: String,
    label: String,
    asset_dir: PathBuf,
    temp_dir: PathBuf,
    file: Arc<ProjectFile>,
    converter: Arc<dyn Converter>,
    force: bool,
}

impl TextureJob {
    async fn run(self) -> Result<Option<TextureReference>> {
        let Some(asset) = find_source_image(&self.asset_dir).await? else {
            log::warn!(
                "No '*{ORIGINAL_ASSET_FILENAME_SUFFIX}' file in '{}', texture {} skipped.",
                self.asset_dir.display(),
                self.id
            );
            return Ok(None);
        };

        let asset_source = FileSource::new(&asset);
        let xbm_source = self.file.cr2w_source();
        let (asset_time, xbm_time) =
            tokio::try_join!(asset_source.modified(), xbm_source.modified())?;

        // Keeps a copy where it can be imported by hand if needed.
        self.file.ensure_raw_dir().await?;
        fs::copy(&asset, self.file.png_path())
            .await
            .with_context(|| format!("Failed to copy '{}'", asset.display()))?;

        let freshness = staleness::assess(
            Artifact::new(&asset, asset_time),
            Artifact::new(self.file.cr2w_path(), xbm_time),
            self.force,
        )?;
        if freshness.is_stale() {
            log::info!(
                "Importing texture asset \"{}\" ({}) to xbm file...",
                self.label,
                self.id
            );
            self.import_via_temp_dir(&asset).await?;
        } else {
            log::info!(
                "Texture asset \"{}\" ({}) is up to date, skipping import.",
                self.label,
                self.id
            );
        }

        Ok(Some(TextureReference {
            id: self.id,
            label: self.label,
            file: self.file,
        }))
    }

    /// Imports into a directory private to this texture, since the converter
    /// names its output after the input and several folders share file names.
    async fn import_via_temp_dir(&self, asset: &Path) -> Result<()> {
        let imported = self.temp_dir.join(imported_file_name(asset)?);
        fs::create_dir_all(&self.temp_dir)
            .await
            .with_context(|| format!("Failed to create '{}'", self.temp_dir.display()))?;
        self.converter
            .import(ConvertRequest::new(asset, &self.temp_dir))
            .await?;

        fs::rename(&imported, self.file.cr2w_path())
            .await
            .with_context(|| format!("Failed to move '{}'", imported.display()))?;
        fs::remove_dir_all(&self.temp_dir)
            .await
            .with_context(|| format!("Failed to remove '{}'", self.temp_dir.display()))?;
        Ok(())
    }
}

/// Name the converter gives the texture imported from `asset`.
fn imported_file_name(asset: &Path) -> Result<String> {
    let stem = asset
        .file_stem()
        .with_context(|| format!("Texture asset '{}' has no file stem", asset.display()))?;
    Ok(format!("{}.xbm", stem.to_string_lossy()))
}

/// The first file, by name, ending in [`ORIGINAL_ASSET_FILENAME_SUFFIX`].
async fn find_source_image(dir: &Path) -> Result<Option<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to list texture folder '{}'", dir.display()))?;
    let mut candidates = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(ORIGINAL_ASSET_FILENAME_SUFFIX) && entry.file_type().await?.is_file() {
            candidates.push(entry.path());
        }
    }
    candidates.sort();
    Ok(candidates.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imported_texture_is_named_after_the_asset() {
        let name = imported_file_name(Path::new("assets/Liner/Liner_Base_color.png")).unwrap();
        assert_eq!(name, "Liner_Base_color.xbm");
    }

    #[test]
    fn asset_without_file_name_is_an_error() {
        let err = imported_file_name(Path::new("/")).unwrap_err();
        assert!(err.to_string().contains("has no file stem"));
    }
}
