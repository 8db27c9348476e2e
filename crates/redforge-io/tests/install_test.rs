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

use anyhow::Result;
use redforge_core::config::{UserConfig, UserConfigData};
use redforge_io::converter::fake::{Call, RecordingConverter};
use redforge_io::install::{InstallMode, Installer};
use redforge_io::Project;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn open_project(root: &Path, with_game: bool, converter: Arc<RecordingConverter>) -> Result<Project> {
    let mut yaml = format!(
        "projectsDir: {root}/projects\nmodOrganizer2Directory: {root}/mo2\nmodderName: xf\nprojects:\n  demo:\n    label: Demo\n",
        root = root.display()
    );
    if with_game {
        yaml.push_str(&format!("cyberpunk2077GameDirectory: {}/game\n", root.display()));
    }
    let data: UserConfigData = serde_yaml::from_str(&yaml)?;
    Ok(Project::new(UserConfig::new(data), "demo", converter)?)
}

#[tokio::test]
async fn test_normal_install_purges_and_moves_archive() -> Result<()> {
    // --- 1. Setup: stale copies and the ArchiveXL file ---
    let dir = tempdir()?;
    let root = dir.path();
    let converter = Arc::new(RecordingConverter::new());
    let project = open_project(root, true, converter.clone())?;

    let mo2_mod = root.join("mo2/overwrite/archive/pc/mod");
    let game_hot = root.join("game/archive/pc/hot");
    fs::create_dir_all(&mo2_mod)?;
    fs::create_dir_all(&game_hot)?;
    fs::write(mo2_mod.join("demo.archive"), b"old")?;
    fs::write(mo2_mod.join("other.archive"), b"keep")?;
    fs::write(game_hot.join("demo.archive"), b"old")?;

    let xl = project.config().xl_file_path();
    fs::create_dir_all(xl.parent().unwrap())?;
    fs::write(&xl, "resource: {}\n")?;
    fs::create_dir_all(project.config().archive_dir())?;

    // --- 2. Install ---
    let installed = Installer::new(&project)
        .with_temp_root(root.join("tmp"))
        .install(InstallMode::Normal)
        .await?
        .expect("game directory is configured");

    // --- 3. Assertions ---
    let mod_dir = root.join("game/archive/pc/mod");
    assert_eq!(installed, mod_dir.join("demo.archive"));
    assert!(installed.exists());
    assert!(mod_dir.join("demo.xl").exists());
    assert!(!mo2_mod.join("demo.archive").exists());
    assert!(mo2_mod.join("other.archive").exists());
    assert!(!game_hot.join("demo.archive").exists());
    assert!(!root.join("tmp/demo/demo.archive").exists());
    assert_eq!(
        converter.calls(),
        vec![Call::Pack(vec![project.config().archive_dir().to_path_buf()])]
    );
    Ok(())
}

#[tokio::test]
async fn test_hot_install_falls_back_when_game_is_not_running() -> Result<()> {
    let dir = tempdir()?;
    let root = dir.path();
    let project = open_project(root, true, Arc::new(RecordingConverter::new()))?;
    let xl = project.config().xl_file_path();
    fs::create_dir_all(xl.parent().unwrap())?;
    fs::write(&xl, "")?;
    fs::create_dir_all(project.config().archive_dir())?;

    let installed = Installer::new(&project)
        .with_temp_root(root.join("tmp"))
        .assume_game_running(false)
        .install(InstallMode::Hot)
        .await?;

    assert_eq!(installed, Some(root.join("game/archive/pc/mod/demo.archive")));
    Ok(())
}

#[tokio::test]
async fn test_install_without_game_directory_only_warns() -> Result<()> {
    let dir = tempdir()?;
    let converter = Arc::new(RecordingConverter::new());
    let project = open_project(dir.path(), false, converter.clone())?;

    let installed = Installer::new(&project)
        .with_temp_root(dir.path().join("tmp"))
        .install(InstallMode::Normal)
        .await?;

    assert_eq!(installed, None);
    assert!(converter.calls().is_empty());
    Ok(())
}
