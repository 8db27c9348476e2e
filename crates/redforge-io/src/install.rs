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

//! Packs a project and installs the archive into the game.

use crate::project::Project;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use sysinfo::System;
use tokio::fs;

/// Executable name of the running game.
pub const GAME_PROCESS_NAME: &str = "Cyberpunk2077.exe";

/// Destination of an install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    /// `archive/pc/mod`, after purging stale copies.
    Normal,
    /// `archive/pc/hot`, picked up by a running game.
    Hot,
}

/// Returns `true` if the game process is running.
pub fn is_game_running() -> bool {
    let system = System::new_all();
    system
        .processes()
        .values()
        .any(|process| process.name().eq_ignore_ascii_case(GAME_PROCESS_NAME))
}

/// Installs one project.
pub struct Installer<'a> {
    project: &'a Project,
    temp_root: PathBuf,
    game_running: Option<bool>,
}

impl<'a> Installer<'a> {
    /// Packs into the system temp directory and probes the game process.
    pub fn new(project: &'a Project) -> Self {
        Self {
            project,
            temp_root: std::env::temp_dir().join("xf-cp2077"),
            game_running: None,
        }
    }

    /// Packs under `root` instead of the system temp directory.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = root.into();
        self
    }

    /// Skips the process scan and assumes the given state.
    pub fn assume_game_running(mut self, running: bool) -> Self {
        self.game_running = Some(running);
        self
    }

    fn archive_name(&self) -> &str {
        self.project.config().archive_name()
    }

    /// Removes `<MO2>/overwrite/archive/pc/{hot,mod}/<archive>.*`. Does nothing
    /// when Mod Organizer 2 is not configured.
    pub async fn purge_mod_organizer2_overwrite(&self) -> Result<usize> {
        let Some(mo2) = self.project.user_config().mod_organizer2_directory() else {
            return Ok(0);
        };
        let base = mo2.join("overwrite").join("archive").join("pc");
        let mut removed = 0;
        for dir in [base.join("hot"), base.join("mod")] {
            removed += purge_archive_files(&dir, self.archive_name(), "Purge MO2 overwrite").await?;
        }
        Ok(removed)
    }

    /// Removes `<game>/archive/pc/hot/<archive>.*`.
    pub async fn purge_hot_reload_dir(&self) -> Result<usize> {
        let Some(game) = self.project.user_config().game_directory() else {
            log::warn!(
                "UserConfig does not have a cyberpunk2077GameDirectory set, cannot purge hot reload directory."
            );
            return Ok(0);
        };
        let hot = game.join("archive").join("pc").join("hot");
        purge_archive_files(&hot, self.archive_name(), "Purge Hot Reload").await
    }

    /// Packs the archive directory and returns `<temp>/<archive>.archive`.
    pub async fn build_archive_to_temp_dir(&self) -> Result<PathBuf> {
        let out_dir = self.temp_root.join(self.archive_name());
        fs::create_dir_all(&out_dir)
            .await
            .with_context(|| format!("Failed to create '{}'", out_dir.display()))?;
        self.project
            .converter()
            .pack(&[self.project.config().archive_dir().to_path_buf()], &out_dir, None)
            .await?;

        let Some(newest) = newest_archive(&out_dir).await? else {
            bail!(
                "No archive files found in {}. Check the converter output for errors.",
                out_dir.display()
            );
        };
        let desired = out_dir.join(format!("{}.archive", self.archive_name()));
        if newest == desired {
            return Ok(desired);
        }
        if fs::try_exists(&desired).await.unwrap_or(false) {
            fs::remove_file(&desired)
                .await
                .with_context(|| format!("Failed to remove '{}'", desired.display()))?;
        }
        fs::rename(&newest, &desired)
            .await
            .with_context(|| format!("Failed to rename '{}'", newest.display()))?;
        Ok(desired)
    }

    /// Packs and installs the project. Returns the installed archive, or
    /// `None` when no game directory is configured.
    pub async fn install(&self, mode: InstallMode) -> Result<Option<PathBuf>> {
        let mut mode = mode;
        if mode == InstallMode::Hot && !self.game_running.unwrap_or_else(is_game_running) {
            log::warn!(
                "Game is not running. Mod will be installed to the mod directory normally. Hot reload option ignored."
            );
            mode = InstallMode::Normal;
        }
        if mode == InstallMode::Normal {
            self.purge_mod_organizer2_overwrite().await?;
        }

        let Some(game) = self.project.user_config().game_directory() else {
            log::warn!("UserConfig does not have a cyberpunk2077GameDirectory set, cannot install.");
            return Ok(None);
        };
        let archive = self.build_archive_to_temp_dir().await?;

        let base = game.join("archive").join("pc");
        let mod_dir = base.join("mod");
        let dest_dir = match mode {
            InstallMode::Hot => base.join("hot"),
            InstallMode::Normal => mod_dir.clone(),
        };
        if mode == InstallMode::Normal {
            self.purge_hot_reload_dir().await?;
        }
        for dir in [&dest_dir, &mod_dir] {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create '{}'", dir.display()))?;
        }

        let file_name = archive.file_name().context("Archive path has no file name")?;
        let dest = dest_dir.join(file_name);
        move_file(&archive, &dest).await?;

        let config = self.project.config();
        let xl_dest = mod_dir.join(config.xl_filename());
        fs::copy(config.xl_file_path(), &xl_dest)
            .await
            .with_context(|| format!("Failed to copy '{}'", config.xl_file_path().display()))?;

        log::info!(
            "Project {} installed to game {} directory.",
            self.project.label(),
            match mode {
                InstallMode::Hot => "hot reload",
                InstallMode::Normal => "mod",
            }
        );
        Ok(Some(dest))
    }
}

async fn purge_archive_files(dir: &Path, archive_name: &str, tag: &str) -> Result<usize> {
    let prefix = format!("{archive_name}.");
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e).with_context(|| format!("Failed to list '{}'", dir.display())),
    };
    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        let is_match = entry.file_name().to_string_lossy().starts_with(&prefix);
        if is_match && entry.file_type().await?.is_file() {
            let path = entry.path();
            fs::remove_file(&path)
                .await
                .with_context(|| format!("Failed to remove '{}'", path.display()))?;
            log::info!("[{tag}] {}", path.display());
            removed += 1;
        }
    }
    Ok(removed)
}

async fn newest_archive(dir: &Path) -> Result<Option<PathBuf>> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to list '{}'", dir.display()))?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "archive") {
            let modified = entry.metadata().await?.modified()?;
            if newest.as_ref().map_or(true, |(t, _)| modified > *t) {
                newest = Some((modified, path));
            }
        }
    }
    Ok(newest.map(|(_, path)| path))
}

/// Returns `true` when a rename failed because source and destination are on
/// different filesystems.
fn is_cross_device(error: &std::io::Error) -> bool {
    error.kind() == std::io::ErrorKind::CrossesDevices
}

/// Renames `from` to `to`, falling back to copy and delete across filesystems.
async fn move_file(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => {
            log::debug!(
                "'{}' and '{}' are on different filesystems, copying instead",
                from.display(),
                to.display()
            );
            copy_then_remove(from, to).await
        }
        Err(e) => Err(e)
            .with_context(|| format!("Failed to move '{}' to '{}'", from.display(), to.display())),
    }
}

async fn copy_then_remove(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to)
        .await
        .with_context(|| format!("Failed to copy '{}' to '{}'", from.display(), to.display()))?;
    fs::remove_file(from)
        .await
        .with_context(|| format!("Failed to remove '{}'", from.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn only_cross_device_errors_fall_back_to_copy() {
        assert!(is_cross_device(&Error::from(ErrorKind::CrossesDevices)));
        assert!(!is_cross_device(&Error::from(ErrorKind::NotFound)));
        assert!(!is_cross_device(&Error::from(ErrorKind::PermissionDenied)));
    }

    #[tokio::test]
    async fn copy_then_remove_moves_the_content() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a.archive");
        let to = dir.path().join("b.archive");
        std::fs::write(&from, b"archive").unwrap();

        copy_then_remove(&from, &to).await.unwrap();
        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"archive");
    }

    #[tokio::test]
    async fn move_file_crosses_filesystems() {
        // `/dev/shm` is its own tmpfs mount on most Linux hosts.
        let shm = Path::new("/dev/shm");
        if !shm.is_dir() {
            return;
        }
        let Ok(source_dir) = tempfile::tempdir_in(shm) else {
            return;
        };
        let dest_dir = tempfile::tempdir().unwrap();
        let from = source_dir.path().join("x.archive");
        let to = dest_dir.path().join("y.archive");
        std::fs::write(&from, b"packed").unwrap();

        move_file(&from, &to).await.unwrap();
        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"packed");
    }

    #[tokio::test]
    async fn move_file_reports_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = move_file(&dir.path().join("absent"), &dir.path().join("b"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to move"));
    }
}
