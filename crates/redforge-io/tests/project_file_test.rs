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
use redforge_io::{Error, Project};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

fn open_project(root: &Path, converter: Arc<RecordingConverter>) -> Result<Project> {
    let yaml = format!(
        "projectsDir: {}\nmodderName: xf\nprojects:\n  demo:\n    label: Demo\n",
        root.display()
    );
    let data: UserConfigData = serde_yaml::from_str(&yaml)?;
    Ok(Project::new(UserConfig::new(data), "demo", converter)?)
}

fn set_mtime(path: &Path, time: SystemTime) -> Result<()> {
    fs::File::options().write(true).open(path)?.set_modified(time)?;
    Ok(())
}

#[tokio::test]
async fn test_export_json_requires_the_binary() -> Result<()> {
    let dir = tempdir()?;
    let project = open_project(dir.path(), Arc::new(RecordingConverter::new()))?;

    let err = project.file("a.inkatlas").export_json(true).await.unwrap_err();
    assert!(matches!(err, Error::MissingInput(_)));
    Ok(())
}

#[tokio::test]
async fn test_export_json_converts_only_when_binary_is_newer() -> Result<()> {
    // --- 1. Setup: a compiled texture ---
    let dir = tempdir()?;
    let converter = Arc::new(RecordingConverter::new());
    let project = open_project(dir.path(), converter.clone())?;
    let file = project.file("textures\\atlas.xbm");
    file.ensure_cr2w_dir().await?;
    fs::write(file.cr2w_path(), b"xbm")?;

    // --- 2. First export converts ---
    let document = file.export_json(false).await?;
    assert_eq!(document["Data"]["RootChunk"]["setup"]["group"], "TEXG_Generic_Color");
    assert_eq!(converter.calls(), vec![Call::ToJson(file.cr2w_path().to_path_buf())]);

    // --- 3. JSON newer than binary: no conversion ---
    converter.clear();
    set_mtime(file.cr2w_path(), SystemTime::now() - Duration::from_secs(60))?;
    file.export_json(false).await?;
    assert!(converter.calls().is_empty());

    // --- 4. Binary touched after the JSON: converts again ---
    set_mtime(file.cr2w_path(), SystemTime::now() + Duration::from_secs(60))?;
    file.export_json(false).await?;
    assert_eq!(converter.calls().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_import_copies_into_the_raw_slot() -> Result<()> {
    let dir = tempdir()?;
    let converter = Arc::new(RecordingConverter::new());
    let project = open_project(dir.path(), converter.clone())?;
    let file = project.file("textures/t1.xbm");

    let source = dir.path().join("t1_Base_color.png");
    fs::write(&source, b"png")?;
    file.import(&source).await?;

    assert_eq!(fs::read(file.png_path())?, b"png");
    assert_eq!(converter.calls(), vec![Call::Import(file.png_path().to_path_buf())]);
    assert_eq!(fs::read(file.cr2w_path())?, b"png");
    Ok(())
}

#[tokio::test]
async fn test_copy_json_and_import_if_stale() -> Result<()> {
    // --- 1. Setup ---
    let dir = tempdir()?;
    let converter = Arc::new(RecordingConverter::new());
    let project = open_project(dir.path(), converter.clone())?;
    let file = project.file("materials\\template.mt");
    let template = dir.path().join("template.mt.json");
    fs::write(&template, "{\"t\": 1}")?;

    // --- 2. Copy and import ---
    assert!(file.copy_json_from(&template).await?);
    assert!(!file.copy_json_from(&template).await?);
    assert!(file.import_json_if_stale(false).await?);

    // --- 3. Second import is a no-op unless forced ---
    assert!(!file.import_json_if_stale(false).await?);
    assert!(file.import_json_if_stale(true).await?);
    assert_eq!(converter.import_and_convert_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_save_and_import_reimports_changed_content() -> Result<()> {
    let dir = tempdir()?;
    let converter = Arc::new(RecordingConverter::new());
    let project = open_project(dir.path(), converter.clone())?;
    let file = project.file("a.mi");

    assert!(file.save_and_import_json("{\"v\": 1}", false).await?);
    assert!(!file.save_and_import_json("{\"v\": 1}", false).await?);
    assert!(file.save_and_import_json("{\"v\": 2}", false).await?);
    assert_eq!(fs::read_to_string(file.json_path())?, "{\"v\": 2}");

    // Removing the binary forces a rebuild even with identical content.
    fs::remove_file(file.cr2w_path())?;
    assert!(file.save_and_import_json("{\"v\": 2}", false).await?);
    Ok(())
}
