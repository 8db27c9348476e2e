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

//! A configured project: its settings, converter and shared files.

use crate::arena::Arena;
use crate::converter::{Converter, WolvenKitCli};
use crate::project_file::ProjectFile;
use anyhow::Result;
use redforge_core::config::{ProjectConfig, UserConfig};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// Entry point for everything one project reads or writes.
pub struct Project {
    user: UserConfig,
    config: Arc<ProjectConfig>,
    converter: Arc<dyn Converter>,
    files: Mutex<Arena<ProjectFile>>,
}

impl Project {
    /// Resolves `archive_name` in `user` and drives `converter`.
    pub fn new(
        user: UserConfig,
        archive_name: &str,
        converter: Arc<dyn Converter>,
    ) -> Result<Self, redforge_core::ConfigError> {
        let config = Arc::new(user.project(archive_name)?);
        Ok(Self {
            user,
            config,
            converter,
            files: Mutex::new(Arena::default()),
        })
    }

    /// Resolves `archive_name` and uses the configured WolvenKit executable.
    pub fn open(user: UserConfig, archive_name: &str) -> Result<Self> {
        let converter = Arc::new(WolvenKitCli::from_config(&user)?);
        Ok(Self::new(user, archive_name, converter)?)
    }

    /// Display title of the project.
    pub fn label(&self) -> &str {
        self.config.label()
    }

    /// Resolved project settings.
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// User-level settings.
    pub fn user_config(&self) -> &UserConfig {
        &self.user
    }

    /// The converter shared by every file of the project.
    pub fn converter(&self) -> &Arc<dyn Converter> {
        &self.converter
    }

    /// `<projectDir>/assets`.
    pub fn assets_dir(&self) -> PathBuf {
        self.config.project_dir().join("assets")
    }

    /// Returns the shared file for `relative_path`.
    pub fn file(&self, relative_path: &str) -> Arc<ProjectFile> {
        let mut files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        files.get_or_insert_with(relative_path, || {
            ProjectFile::new(
                self.config.clone(),
                self.converter.clone(),
                relative_path,
            )
        })
    }
}
