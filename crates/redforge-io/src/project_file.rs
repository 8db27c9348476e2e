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

//! A project-relative engine resource and its derived locations.

use crate::converter::{ConvertRequest, Converter};
use crate::error::{Error, FileError};
use crate::file_source::FileSource;
use redforge_core::config::paths::strip_extension;
use redforge_core::config::ProjectConfig;
use redforge_core::red::RedEngineFile;
use redforge_core::staleness::{self, Artifact, PayloadDecision};
use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// One resource of a project, addressed by its path relative to the
/// conventional root.
///
/// All locations are computed on first use and never change afterwards.
/// Relative paths may use either `\` or `/` as separator.
pub struct ProjectFile {
    relative_path: String,
    config: Arc<ProjectConfig>,
    converter: Arc<dyn Converter>,
    cr2w_path: OnceLock<PathBuf>,
    raw_path: OnceLock<PathBuf>,
    json_path: OnceLock<PathBuf>,
    png_path: OnceLock<PathBuf>,
    jpg_path: OnceLock<PathBuf>,
    archive_relative_path: OnceLock<String>,
}

impl fmt::Debug for ProjectFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectFile")
            .field("relative_path", &self.relative_path)
            .finish_non_exhaustive()
    }
}

fn with_suffix(path: PathBuf, suffix: &str) -> PathBuf {
    let mut path: OsString = path.into_os_string();
    path.push(suffix);
    PathBuf::from(path)
}

fn parent_of(path: &Path) -> &Path {
    path.parent().unwrap_or(Path::new(""))
}

impl ProjectFile {
    /// Creates the file; prefer [`crate::Project::file`], which shares instances.
    pub fn new(
        config: Arc<ProjectConfig>,
        converter: Arc<dyn Converter>,
        relative_path: impl Into<String>,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            config,
            converter,
            cr2w_path: OnceLock::new(),
            raw_path: OnceLock::new(),
            json_path: OnceLock::new(),
            png_path: OnceLock::new(),
            jpg_path: OnceLock::new(),
            archive_relative_path: OnceLock::new(),
        }
    }

    /// Path relative to the conventional root, as given.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Compiled engine file.
    pub fn cr2w_path(&self) -> &Path {
        self.cr2w_path
            .get_or_init(|| self.config.resolve_cr2w_path(&self.relative_path))
    }

    /// File name of the compiled engine file.
    pub fn cr2w_file_name(&self) -> String {
        self.cr2w_path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Directory of the compiled engine file.
    pub fn cr2w_dir(&self) -> &Path {
        parent_of(self.cr2w_path())
    }

    /// Location of the exported raw file.
    pub fn raw_path(&self) -> &Path {
        self.raw_path
            .get_or_init(|| self.config.resolve_raw_path(&self.relative_path))
    }

    /// Directory of the raw file.
    pub fn raw_dir(&self) -> &Path {
        parent_of(self.raw_path())
    }

    /// JSON projection, the raw path plus `.json`.
    pub fn json_path(&self) -> &Path {
        self.json_path
            .get_or_init(|| with_suffix(self.raw_path().to_path_buf(), ".json"))
    }

    /// PNG beside the raw file, with the resource extension replaced.
    pub fn png_path(&self) -> &Path {
        self.png_path.get_or_init(|| self.raw_sibling(".png"))
    }

    /// JPG beside the raw file, with the resource extension replaced.
    pub fn jpg_path(&self) -> &Path {
        self.jpg_path.get_or_init(|| self.raw_sibling(".jpg"))
    }

    /// Depot path used to reference this file from other resources.
    pub fn archive_relative_path(&self) -> &str {
        self.archive_relative_path
            .get_or_init(|| self.config.archive_relative_path(&self.relative_path))
    }

    /// The compiled file.
    pub fn cr2w_source(&self) -> FileSource {
        FileSource::new(self.cr2w_path())
    }

    /// The JSON projection.
    pub fn json_source(&self) -> FileSource {
        FileSource::new(self.json_path())
    }

    fn raw_sibling(&self, extension: &str) -> PathBuf {
        let stem = strip_extension(&self.relative_path);
        with_suffix(self.config.resolve_raw_path(stem), extension)
    }

    /// Creates the directory of the compiled file.
    pub async fn ensure_cr2w_dir(&self) -> Result<(), FileError> {
        let dir = self.cr2w_dir();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| FileError::io(dir, e))
    }

    /// Creates the directory of the raw file.
    pub async fn ensure_raw_dir(&self) -> Result<(), FileError> {
        let dir = self.raw_dir();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| FileError::io(dir, e))
    }

    /// Exports the compiled file to its raw form. Meant for textures and
    /// meshes; data files go through [`ProjectFile::export_json`].
    pub async fn export(&self) -> Result<(), Error> {
        self.converter
            .export(ConvertRequest::new(self.cr2w_path(), self.raw_dir()))
            .await?;
        Ok(())
    }

    /// Returns the JSON projection, regenerating it first when forced, when
    /// it is missing, or when the compiled file is newer.
    pub async fn export_json(&self, force: bool) -> Result<serde_json::Value, Error> {
        let (cr2w_source, json_source) = (self.cr2w_source(), self.json_source());
        let (cr2w_time, json_time) = tokio::try_join!(cr2w_source.modified(), json_source.modified())?;
        let freshness = staleness::assess(
            Artifact::new(self.cr2w_path(), cr2w_time),
            Artifact::new(self.json_path(), json_time),
            force,
        )?;
        if freshness.is_stale() {
            log::debug!("Converting {} to JSON ({freshness:?})", self.cr2w_file_name());
            self.converter
                .convert_to_json(ConvertRequest::new(self.cr2w_path(), self.raw_dir()))
                .await?;
        }
        Ok(self.json_source().read_json().await?)
    }

    /// Copies `from` into the raw slot (keeping its extension) and imports it.
    pub async fn import(&self, from: &Path) -> Result<(), Error> {
        let extension = from
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let raw_slot = self.raw_sibling(&extension);
        if raw_slot != from {
            self.ensure_raw_dir().await?;
            tokio::fs::copy(from, &raw_slot)
                .await
                .map_err(|e| FileError::io(from, e))?;
        }
        self.converter
            .import(ConvertRequest::new(&raw_slot, self.cr2w_dir()))
            .await?;
        Ok(())
    }

    /// Imports the PNG sibling.
    pub async fn import_png(&self) -> Result<(), Error> {
        self.import(&self.png_path().to_path_buf()).await
    }

    /// Imports the JPG sibling.
    pub async fn import_jpg(&self) -> Result<(), Error> {
        self.import(&self.jpg_path().to_path_buf()).await
    }

    /// Compiles the JSON projection.
    pub async fn import_json(&self) -> Result<(), Error> {
        self.converter
            .convert_from_json(ConvertRequest::new(self.json_path(), self.cr2w_dir()))
            .await?;
        Ok(())
    }

    /// Compiles the JSON projection unless the compiled file is at least as
    /// new. Returns `true` if the converter ran.
    pub async fn import_json_if_stale(&self, force: bool) -> Result<bool, Error> {
        let (json_source, cr2w_source) = (self.json_source(), self.cr2w_source());
        let (json_time, cr2w_time) = tokio::try_join!(json_source.modified(), cr2w_source.modified())?;
        let freshness = staleness::assess(
            Artifact::new(self.json_path(), json_time),
            Artifact::new(self.cr2w_path(), cr2w_time),
            force,
        )?;
        if !freshness.is_stale() {
            log::debug!("{} is up to date, skipping import", self.cr2w_file_name());
            return Ok(false);
        }
        self.import_json().await?;
        Ok(true)
    }

    /// Copies a JSON document into the JSON slot. Returns `true` if the slot
    /// content changed.
    pub async fn copy_json_from(&self, from: &Path) -> Result<bool, Error> {
        let text = FileSource::new(from).read_text().await?;
        Ok(self.json_source().write_if_changed(&text).await?)
    }

    /// Writes `text` to the JSON slot.
    pub async fn save_json(&self, text: &str) -> Result<(), Error> {
        Ok(self.json_source().write_text(text).await?)
    }

    /// Persists `text` and compiles it, unless the persisted content is
    /// identical and the compiled file is strictly newer. Returns `true` if
    /// the converter ran.
    pub async fn save_and_import_json(&self, text: &str, force: bool) -> Result<bool, Error> {
        let json = self.json_source();
        let cr2w_source = self.cr2w_source();
        let (persisted, json_time, cr2w_time) = tokio::try_join!(
            json.read_text_if_exists(),
            json.modified(),
            cr2w_source.modified()
        )?;
        let decision =
            staleness::assess_payload(persisted.as_deref(), text, json_time, cr2w_time, force);
        if decision == PayloadDecision::Skip {
            log::debug!(
                "JSON for {} had not changed since last import, skipping",
                self.cr2w_file_name()
            );
            return Ok(false);
        }
        json.write_text(text).await?;
        self.import_json().await?;
        Ok(true)
    }

    /// Serializes `file` and passes it to [`ProjectFile::save_and_import_json`].
    pub async fn save_and_import_record<T: Serialize + Sync>(
        &self,
        file: &RedEngineFile<T>,
        force: bool,
    ) -> Result<bool, Error> {
        let text = file.to_json_pretty().map_err(|source| FileError::Json {
            path: self.json_path().to_path_buf(),
            source,
        })?;
        self.save_and_import_json(&text, force).await
    }
}
