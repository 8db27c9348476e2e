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

//! The user configuration model.
//!
//! Loading lives in `redforge-io`; this module only describes the data and
//! resolves it. Directory defaults distinguish an absent key (use the built-in
//! default) from an explicit `null` (fall back to the parent directory).

pub mod paths;
pub mod project;

pub use project::{ProjectConfig, ProjectData};

use crate::error::ConfigError;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the configuration file.
pub const CONFIG_FILENAME: &str = ".xf.yaml";

/// Built-in conventional root pattern.
pub const DEFAULT_CONVENTIONAL_ROOT_PATTERN: &str = "base\\{MODDER_NAME}\\{ARCHIVE_NAME}";

/// The configuration file as written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct UserConfigData {
    #[serde(rename = "wolvenKitCLIExePath")]
    pub wolvenkit_cli_exe_path: Option<PathBuf>,
    #[serde(rename = "cyberpunk2077GameDirectory")]
    pub game_directory: Option<PathBuf>,
    #[serde(rename = "modOrganizer2Directory")]
    pub mod_organizer2_directory: Option<PathBuf>,
    pub projects_dir: Option<PathBuf>,
    #[serde(default, deserialize_with = "nullable")]
    pub default_project_source_dir: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub default_project_archive_dir: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub default_project_raw_dir: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub default_project_resources_dir: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub default_conventional_root_dir_pattern: Option<Option<String>>,
    pub modder_name: Option<String>,
    #[serde(default)]
    pub projects: BTreeMap<String, Option<ProjectData>>,
}

/// Maps a present key to `Some`, keeping an explicit `null` as `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn with_default<'a>(value: &'a Option<Option<String>>, default: &'static str) -> Option<&'a str> {
    match value {
        None => Some(default),
        Some(explicit) => explicit.as_deref(),
    }
}

/// User-level settings with built-in defaults applied.
#[derive(Debug, Clone, Default)]
pub struct UserConfig {
    data: UserConfigData,
}

impl UserConfig {
    /// Wraps parsed configuration data.
    pub fn new(data: UserConfigData) -> Self {
        Self { data }
    }

    /// WolvenKit CLI executable.
    pub fn wolvenkit_cli_exe_path(&self) -> Option<&Path> {
        self.data.wolvenkit_cli_exe_path.as_deref()
    }

    /// Game installation directory.
    pub fn game_directory(&self) -> Option<&Path> {
        self.data.game_directory.as_deref()
    }

    /// Mod Organizer 2 directory.
    pub fn mod_organizer2_directory(&self) -> Option<&Path> {
        self.data.mod_organizer2_directory.as_deref()
    }

    /// Parent directory of all projects.
    pub fn projects_dir(&self) -> Option<&Path> {
        self.data.projects_dir.as_deref()
    }

    /// Default source subdirectory; `None` means the project root.
    pub fn default_project_source_dir(&self) -> Option<&str> {
        with_default(&self.data.default_project_source_dir, "source")
    }

    /// Default archive subdirectory; `None` means the source directory.
    pub fn default_project_archive_dir(&self) -> Option<&str> {
        with_default(&self.data.default_project_archive_dir, "archive")
    }

    /// Default raw subdirectory; `None` means the source directory.
    pub fn default_project_raw_dir(&self) -> Option<&str> {
        with_default(&self.data.default_project_raw_dir, "raw")
    }

    /// Default resources subdirectory; `None` means the source directory.
    pub fn default_project_resources_dir(&self) -> Option<&str> {
        with_default(&self.data.default_project_resources_dir, "resources")
    }

    /// Default conventional root pattern; `None` disables the prefix.
    pub fn default_conventional_root_dir_pattern(&self) -> Option<&str> {
        with_default(
            &self.data.default_conventional_root_dir_pattern,
            DEFAULT_CONVENTIONAL_ROOT_PATTERN,
        )
    }

    /// Modder name used when a project does not set one.
    pub fn modder_name(&self) -> Option<&str> {
        self.data.modder_name.as_deref()
    }

    /// Archive names of every configured project.
    pub fn project_names(&self) -> impl Iterator<Item = &str> {
        self.data
            .projects
            .iter()
            .filter(|(_, data)| data.is_some())
            .map(|(name, _)| name.as_str())
    }

    /// Resolves the project named `archive_name`.
    pub fn project(&self, archive_name: &str) -> Result<ProjectConfig, ConfigError> {
        let data = self
            .data
            .projects
            .get(archive_name)
            .and_then(Option::as_ref)
            .ok_or_else(|| ConfigError::UnknownProject(archive_name.to_owned()))?;
        ProjectConfig::resolve(archive_name, data, self)
    }
}
