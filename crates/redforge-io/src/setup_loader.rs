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

//! Loaders for the setup file and JSON templates.

use crate::error::FileError;
use crate::file_source::FileSource;
use redforge_core::setup::ModSetup;
use serde_json::Value;
use std::path::Path;

/// Reads and parses a project's setup file.
pub async fn load_mod_setup(path: &Path) -> Result<ModSetup, FileError> {
    let text = FileSource::new(path).read_text().await?;
    serde_yaml::from_str(&text).map_err(|source| FileError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a JSON template document.
pub async fn load_json_template(path: &Path) -> Result<Value, FileError> {
    FileSource::new(path).read_json().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_the_offending_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.yaml");
        tokio::fs::write(&path, "textures: {}\n").await.unwrap();

        let err = load_mod_setup(&path).await.unwrap_err();
        assert!(matches!(err, FileError::Yaml { path: p, .. } if p == path));
    }

    #[tokio::test]
    async fn missing_setup_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_mod_setup(&dir.path().join("absent.yaml")).await.unwrap_err();
        assert!(matches!(err, FileError::Io { .. }));
    }
}
