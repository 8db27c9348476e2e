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
use redforge_core::setup::ModSetup;
use redforge_io::converter::fake::{Call, Event, RecordingConverter};
use redforge_io::Project;
use redforge_projects::eye_artistry::textures::{prepare_textures, MAX_SIMULTANEOUS_IMPORTS};
use redforge_projects::eye_artistry::{ForceOption, ARCHIVE_NAME};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn open_project(root: &Path, converter: Arc<RecordingConverter>) -> Result<Project> {
    let yaml = format!(
        "projectsDir: {}\nmodderName: xf\nprojects:\n  {ARCHIVE_NAME}:\n    shortName: xfea\n",
        root.display()
    );
    let data: UserConfigData = serde_yaml::from_str(&yaml)?;
    Ok(Project::new(UserConfig::new(data), ARCHIVE_NAME, converter)?)
}

/// Writes `count` texture folders and returns the setup naming them.
fn write_textures(assets: &Path, count: usize) -> Result<ModSetup> {
    let mut yaml = String::from("textures:\n");
    for i in 0..count {
        let folder = format!("Texture {i}");
        fs::create_dir_all(assets.join(&folder))?;
        fs::write(
            assets.join(&folder).join(format!("T{i}_Base_color.png")),
            format!("png {i}"),
        )?;
        yaml.push_str(&format!("  t{i}: {folder}\n"));
    }
    yaml.push_str("ccxl:\n  firstSwitcherGlobalIndex: 0\n");
    Ok(serde_yaml::from_str(&yaml)?)
}

#[tokio::test]
async fn test_imports_run_in_batches_with_a_barrier() -> Result<()> {
    // --- 1. Setup: one more texture than a batch holds ---
    let dir = tempdir()?;
    let converter = Arc::new(RecordingConverter::with_delay(Duration::from_millis(40)));
    let project = open_project(dir.path(), converter.clone())?;
    let assets = project.assets_dir();
    let count = MAX_SIMULTANEOUS_IMPORTS + 2;
    let setup = write_textures(&assets, count)?;

    // --- 2. Import everything ---
    let textures = prepare_textures(&project, &setup, &assets, &ForceOption::None).await?;

    // --- 3. Every texture is imported, never more than a batch at once ---
    assert_eq!(textures.len(), count);
    assert!(converter.peak_concurrency() <= MAX_SIMULTANEOUS_IMPORTS);
    let timeline = converter.timeline();
    assert!(timeline
        .iter()
        .all(|e| matches!(e, Event::Started(Call::Import(_)) | Event::Finished(Call::Import(_)))));

    // --- 4. The second batch starts only once the first has finished ---
    let first_late_start = timeline
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, Event::Started(_)))
        .nth(MAX_SIMULTANEOUS_IMPORTS)
        .map(|(i, _)| i)
        .unwrap();
    let finished_before = timeline[..first_late_start]
        .iter()
        .filter(|e| matches!(e, Event::Finished(_)))
        .count();
    assert_eq!(finished_before, MAX_SIMULTANEOUS_IMPORTS);
    Ok(())
}

#[tokio::test]
async fn test_up_to_date_textures_are_not_reimported() -> Result<()> {
    let dir = tempdir()?;
    let converter = Arc::new(RecordingConverter::new());
    let project = open_project(dir.path(), converter.clone())?;
    let assets = project.assets_dir();
    let setup = write_textures(&assets, 3)?;

    prepare_textures(&project, &setup, &assets, &ForceOption::None).await?;
    assert_eq!(converter.import_and_convert_count(), 3);

    converter.clear();
    let textures = prepare_textures(&project, &setup, &assets, &ForceOption::None).await?;
    assert_eq!(textures.len(), 3);
    assert_eq!(converter.import_and_convert_count(), 0);
    Ok(())
}
