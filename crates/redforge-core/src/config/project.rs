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

//! Per-project settings, resolved against the user defaults.

use super::paths::{join_depot, join_native};
use super::UserConfig;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A project entry as written in the configuration file.
///
/// Absent and `null` keys both inherit the user-level default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct ProjectData {
    #[serde(default)]
    pub label: String,
    pub short_name: Option<String>,
    pub modder_name: Option<String>,
    pub project_dir: Option<PathBuf>,
    pub source_dir: Option<String>,
    pub archive_dir: Option<String>,
    pub raw_dir: Option<String>,
    pub resources_dir: Option<String>,
    pub conventional_root_dir_pattern: Option<String>,
}

/// Fully resolved settings of one project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    archive_name: String,
    label: String,
    short_name: String,
    modder_name: Option<String>,
    project_dir: PathBuf,
    source_dir: PathBuf,
    archive_dir: PathBuf,
    raw_dir: PathBuf,
    resources_dir: PathBuf,
    conventional_root: Option<String>,
}

impl ProjectConfig {
    /// Resolves `data` for the project named `archive_name`.
    pub fn resolve(
        archive_name: &str,
        data: &ProjectData,
        user: &UserConfig,
    ) -> Result<Self, ConfigError> {
        let modder_name = data
            .modder_name
            .clone()
            .or_else(|| user.modder_name().map(str::to_owned));

        let project_dir = match &data.project_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => user
                .projects_dir()
                .ok_or_else(|| ConfigError::MissingProjectsDir {
                    project: archive_name.to_owned(),
                    relative: true,
                })?
                .join(dir),
            None => user
                .projects_dir()
                .ok_or_else(|| ConfigError::MissingProjectsDir {
                    project: archive_name.to_owned(),
                    relative: false,
                })?
                .join(archive_name),
        };

        // `None` at this point is an explicit null: fall back to the parent directory.
        let source_dir = sub_dir(
            &project_dir,
            inherit(&data.source_dir, user.default_project_source_dir()),
        );
        let archive_dir = sub_dir(
            &source_dir,
            inherit(&data.archive_dir, user.default_project_archive_dir()),
        );
        let raw_dir = sub_dir(
            &source_dir,
            inherit(&data.raw_dir, user.default_project_raw_dir()),
        );
        let resources_dir = sub_dir(
            &source_dir,
            inherit(&data.resources_dir, user.default_project_resources_dir()),
        );

        let pattern = inherit(
            &data.conventional_root_dir_pattern,
            user.default_conventional_root_dir_pattern(),
        );
        let conventional_root = match pattern {
            None => None,
            Some(pattern) if pattern.contains("{MODDER_NAME}") && modder_name.is_none() => {
                log::warn!(
                    "Project \"{archive_name}\" uses {{MODDER_NAME}} in conventionalRootDirPattern, but no modder name is defined."
                );
                None
            }
            Some(pattern) => {
                let mut root = pattern.replacen("{ARCHIVE_NAME}", archive_name, 1);
                if let Some(modder) = &modder_name {
                    root = root.replacen("{MODDER_NAME}", modder, 1);
                }
                Some(root)
            }
        };

        Ok(Self {
            archive_name: archive_name.to_owned(),
            label: data.label.clone(),
            short_name: data
                .short_name
                .clone()
                .unwrap_or_else(|| archive_name.to_owned()),
            modder_name,
            project_dir,
            source_dir,
            archive_dir,
            raw_dir,
            resources_dir,
            conventional_root,
        })
    }

    /// Name of the packed archive, also the project's key in the configuration.
    pub fn archive_name(&self) -> &str {
        &self.archive_name
    }

    /// Display title of the mod.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Short prefix used for generated file and record names.
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Modder name, if one is configured.
    pub fn modder_name(&self) -> Option<&str> {
        self.modder_name.as_deref()
    }

    /// Project root.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// WolvenKit `source` directory.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Directory of compiled resources; the input of `pack`.
    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    /// Directory of exported JSON and images.
    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    /// Directory of loose resources shipped beside the archive.
    pub fn resources_dir(&self) -> &Path {
        &self.resources_dir
    }

    /// Depot prefix of every archived file, if any.
    pub fn conventional_root(&self) -> Option<&str> {
        self.conventional_root.as_deref()
    }

    /// `<archive>.xl`.
    pub fn xl_filename(&self) -> String {
        format!("{}.xl", self.archive_name)
    }

    /// Location of the ArchiveXL file.
    pub fn xl_file_path(&self) -> PathBuf {
        self.resolve_resources_path(&self.xl_filename())
    }

    /// Compiled location of `relative`.
    pub fn resolve_cr2w_path(&self, relative: &str) -> PathBuf {
        self.under_conventional_root(&self.archive_dir, relative)
    }

    /// Raw location of `relative`.
    pub fn resolve_raw_path(&self, relative: &str) -> PathBuf {
        self.under_conventional_root(&self.raw_dir, relative)
    }

    /// Location of `relative` in the resources directory.
    pub fn resolve_resources_path(&self, relative: &str) -> PathBuf {
        join_native(&self.resources_dir, relative)
    }

    /// Depot path of `relative` inside the packed archive.
    pub fn archive_relative_path(&self, relative: &str) -> String {
        join_depot([self.conventional_root.as_deref().unwrap_or(""), relative])
    }

    fn under_conventional_root(&self, base: &Path, relative: &str) -> PathBuf {
        match &self.conventional_root {
            Some(root) => join_native(&join_native(base, root), relative),
            None => join_native(base, relative),
        }
    }
}

fn inherit<'a>(own: &'a Option<String>, default: Option<&'a str>) -> Option<&'a str> {
    own.as_deref().or(default)
}

fn sub_dir(parent: &Path, relative: Option<&str>) -> PathBuf {
    match relative {
        Some(dir) => parent.join(dir),
        None => parent.to_path_buf(),
    }
}
