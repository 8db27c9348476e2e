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

//! Async access to a single file on disk.

use crate::error::FileError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

/// A path with convenience methods for existence, timestamps and text I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Wraps `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The wrapped path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the file exists.
    pub async fn exists(&self) -> Result<bool, FileError> {
        Ok(self.modified().await?.is_some())
    }

    /// Modification time, or `None` when the file does not exist.
    pub async fn modified(&self) -> Result<Option<SystemTime>, FileError> {
        match fs::metadata(&self.path).await {
            Ok(meta) => meta
                .modified()
                .map(Some)
                .map_err(|e| FileError::io(&self.path, e)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FileError::io(&self.path, e)),
        }
    }

    /// Returns `true` if this file is strictly newer than `other`.
    ///
    /// A missing file counts as older than everything.
    pub async fn is_newer_than(&self, other: &FileSource) -> Result<bool, FileError> {
        let (mine, theirs) = tokio::try_join!(self.modified(), other.modified())?;
        Ok(match (mine, theirs) {
            (Some(mine), Some(theirs)) => mine > theirs,
            (Some(_), None) => true,
            (None, _) => false,
        })
    }

    /// Reads the whole file as UTF-8.
    pub async fn read_text(&self) -> Result<String, FileError> {
        fs::read_to_string(&self.path)
            .await
            .map_err(|e| FileError::io(&self.path, e))
    }

    /// Reads the file, returning `None` if it does not exist.
    pub async fn read_text_if_exists(&self) -> Result<Option<String>, FileError> {
        match fs::read_to_string(&self.path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FileError::io(&self.path, e)),
        }
    }

    /// Reads and parses a JSON document.
    pub async fn read_json(&self) -> Result<serde_json::Value, FileError> {
        let text = self.read_text().await?;
        serde_json::from_str(&text).map_err(|source| FileError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes `text`, creating parent directories as needed.
    pub async fn write_text(&self, text: &str) -> Result<(), FileError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FileError::io(parent, e))?;
        }
        fs::write(&self.path, text)
            .await
            .map_err(|e| FileError::io(&self.path, e))
    }

    /// Writes `text` only when it differs from the current content.
    ///
    /// Returns `true` if the file was written.
    pub async fn write_if_changed(&self, text: &str) -> Result<bool, FileError> {
        if self.read_text_if_exists().await?.as_deref() == Some(text) {
            return Ok(false);
        }
        self.write_text(text).await?;
        Ok(true)
    }
}
