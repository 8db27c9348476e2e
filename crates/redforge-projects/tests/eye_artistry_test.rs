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
use image::{Rgba, RgbaImage};
use redforge_atlas::Thumbnail;
use redforge_core::config::{UserConfig, UserConfigData};
use redforge_io::converter::fake::RecordingConverter;
use redforge_io::Project;
use redforge_projects::eye_artistry::{self, RebuildOptions, ARCHIVE_NAME};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

const MESH_TEMPLATE: &str = r#"{
  "Header": { "DataType": "CR2W" },
  "Data": {
    "RootChunk": {
      "$type": "CMesh",
      "appearances": [
        { "HandleId": "0", "Data": { "$type": "meshMeshAppearance", "chunkMaterials": [], "name": { "$type": "CName", "$storage": "string", "$value": "default" }, "tags": [] } }
      ],
      "materialEntries": [],
      "localMaterialBuffer": { "materials": [] }
    }
  }
}"#;

const MORPHTARGET_TEMPLATE: &str = r#"{
  "Header": { "DataType": "CR2W" },
  "Data": {
    "RootChunk": {
      "$type": "MorphTargetMesh",
      "baseMesh": { "DepotPath": { "$type": "ResourcePath", "$storage": "string", "$value": "" }, "Flags": "Default" }
    }
  }
}"#;

const MATERIAL_TEMPLATE: &str = r#"{
  "Header": { "DataType": "CR2W" },
  "Data": { "RootChunk": { "$type": "CMaterialTemplate" } }
}"#;

fn set_mtime(path: &Path, time: SystemTime) -> Result<()> {
    fs::File::options().write(true).open(path)?.set_modified(time)?;
    Ok(())
}

fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

/// Lays out a complete project under `root`: palettes, thumbnails, templates
/// and one asset folder per texture id.
fn write_fixture(root: &Path, setup: &str, textures: &[(&str, bool)]) -> Result<()> {
    let assets = root.join(ARCHIVE_NAME).join("assets");
    let thumbnails = assets.join("inputs").join("thumbnails");
    let templates = assets.join("templates");
    fs::create_dir_all(&thumbnails)?;
    fs::create_dir_all(&templates)?;

    for i in 0..7u8 {
        solid(14, 2, [i * 30, 255 - i * 30, 128, 255])
            .save(assets.join("inputs").join(format!("palette{i}.png")))?;
    }
    for thumbnail in Thumbnail::ALL {
        solid(8, 8, [200, 200, 200, 255]).save(thumbnails.join(thumbnail.file_name()))?;
    }

    fs::write(templates.join("eye-makeup.mesh.json"), MESH_TEMPLATE)?;
    fs::write(templates.join("eye-makeup.morphtarget.json"), MORPHTARGET_TEMPLATE)?;
    fs::write(templates.join("mesh_decal__emp_front.mt.json"), MATERIAL_TEMPLATE)?;

    let past = SystemTime::now() - Duration::from_secs(3600);
    for (folder, with_image) in textures {
        let dir = assets.join(folder);
        fs::create_dir_all(&dir)?;
        if *with_image {
            let image = dir.join(format!("{folder}_Base_color.png"));
            solid(4, 4, [255, 255, 255, 255]).save(&image)?;
            set_mtime(&image, past)?;
        }
    }
    for entry in fs::read_dir(&thumbnails)? {
        set_mtime(&entry?.path(), past)?;
    }

    fs::write(assets.join("project.yaml"), setup)?;
    Ok(())
}

fn open_project(root: &Path, converter: Arc<RecordingConverter>) -> Result<Project> {
    let yaml = format!(
        "projectsDir: {}\nmodderName: xf\nprojects:\n  {ARCHIVE_NAME}:\n    label: Eye Artistry\n    shortName: xfea\n",
        root.display()
    );
    let data: UserConfigData = serde_yaml::from_str(&yaml)?;
    Ok(Project::new(UserConfig::new(data), ARCHIVE_NAME, converter)?)
}

fn read_json(path: &Path) -> Result<Value> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

const SCENARIO: &str = r#"
textures:
  t1: Liner One
  t2: Liner Two
lists:
  liners: [t1, t2]
ccxl:
  firstSwitcherGlobalIndex: 100
  switcherGroups:
    - identifier: liner
      label: Eyeliner
      include: [liners]
"#;

#[tokio::test]
async fn test_rebuild_assigns_indices_and_writes_the_graph() -> Result<()> {
    // --- 1. Setup ---
    let dir = tempdir()?;
    write_fixture(dir.path(), SCENARIO, &[("Liner One", true), ("Liner Two", true)])?;
    let converter = Arc::new(RecordingConverter::new());
    let project = open_project(dir.path(), converter.clone())?;

    // --- 2. Rebuild ---
    let outcome = eye_artistry::rebuild(&project, &RebuildOptions::default()).await?;

    // --- 3. Indices ---
    assert_eq!(outcome.groups.len(), 1);
    let group = &outcome.groups[0];
    assert_eq!(group.group_id, "xfea_liner");
    assert_eq!((group.switcher_index, group.off_index), (100, 101));
    let indices: Vec<_> = group.variants.iter().map(|v| v.appearance_index).collect();
    assert_eq!(indices, [103, 104]);
    assert_eq!(group.variants[0].variant_id, "xfea_liner_t1");
    // 7 palettes of 7 colours, 4 kinds each.
    assert_eq!(group.variants[0].subvariants.len(), 196);
    assert_eq!(group.variants[0].subvariants[0].unique_id, "xfea_liner_t1_000_matte");
    assert!(outcome.installed.is_none());

    // --- 4. Customization descriptor ---
    let inkcc = read_json(project.file("xfea.inkcharcustomization").json_path())?;
    let options = inkcc["Data"]["RootChunk"]["headCustomizationOptions"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    let option_indices: Vec<_> = options.iter().map(|o| o["Data"]["index"].clone()).collect();
    assert_eq!(option_indices, [100, 101, 103, 104]);
    let switcher_options = options[0]["Data"]["options"].as_array().cloned().unwrap_or_default();
    assert_eq!(switcher_options.len(), 3);
    assert_eq!(switcher_options[2]["index"], 2);
    assert_eq!(switcher_options[2]["localizedName"], "Liner Two");

    // --- 5. Mesh entries are contiguous and one per colour and variant ---
    let mesh = read_json(project.file("xfea.mesh").json_path())?;
    let root = &mesh["Data"]["RootChunk"];
    let entries = root["materialEntries"].as_array().cloned().unwrap_or_default();
    assert_eq!(entries.len(), 2 * 196);
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry["index"], i);
    }
    assert_eq!(
        root["localMaterialBuffer"]["materials"].as_array().map(Vec::len),
        Some(2 * 196)
    );
    // The template's own appearance is kept.
    assert_eq!(root["appearances"].as_array().map(Vec::len), Some(1 + 2 * 196));

    let morphtarget = read_json(project.file("xfea.morphtarget").json_path())?;
    assert_eq!(
        morphtarget["Data"]["RootChunk"]["baseMesh"]["DepotPath"]["$value"],
        project.file("xfea.mesh").archive_relative_path()
    );

    // --- 6. One appearance file per variant ---
    for id in ["xfea_liner_t1", "xfea_liner_t2"] {
        let app = project.file(&format!("variants\\{id}.app"));
        assert!(app.cr2w_path().exists(), "{} missing", app.cr2w_file_name());
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_list_and_texture_are_skipped() -> Result<()> {
    let setup = r#"
textures:
  t1: Liner One
  t2: Empty Folder
lists:
  liners: [t1, t2]
ccxl:
  firstSwitcherGlobalIndex: 10
  switcherGroups:
    - identifier: liner
      label: Eyeliner
      include: [liners, absent]
    - identifier: shadow
      label: Eyeshadow
      include: [absent]
"#;
    let dir = tempdir()?;
    write_fixture(dir.path(), setup, &[("Liner One", true), ("Empty Folder", false)])?;
    let project = open_project(dir.path(), Arc::new(RecordingConverter::new()))?;

    let outcome = eye_artistry::rebuild(&project, &RebuildOptions::default()).await?;

    let liner = &outcome.groups[0];
    assert_eq!(liner.variants.len(), 1);
    assert_eq!(liner.variants[0].id, "t1");
    assert_eq!(liner.variants[0].appearance_index, 13);

    // A group without variants still takes its switcher and "off" indices.
    let shadow = &outcome.groups[1];
    assert!(shadow.variants.is_empty());
    assert_eq!((shadow.switcher_index, shadow.off_index), (14, 15));
    Ok(())
}

#[tokio::test]
async fn test_second_rebuild_is_a_no_op() -> Result<()> {
    // --- 1. Setup and first build ---
    let dir = tempdir()?;
    write_fixture(dir.path(), SCENARIO, &[("Liner One", true), ("Liner Two", true)])?;
    let converter = Arc::new(RecordingConverter::new());
    let project = open_project(dir.path(), converter.clone())?;
    eye_artistry::rebuild(&project, &RebuildOptions::default()).await?;
    assert!(converter.import_and_convert_count() > 0);

    let outputs = [
        project.file("xfea.mesh"),
        project.file("xfea.morphtarget"),
        project.file("xfea.inkcharcustomization"),
        project.file("xfea-palette.inkatlas"),
    ];
    let before: Vec<_> = outputs
        .iter()
        .map(|f| fs::read(f.json_path()))
        .collect::<std::io::Result<_>>()?;

    // --- 2. Second build with nothing changed ---
    converter.clear();
    eye_artistry::rebuild(&project, &RebuildOptions::default()).await?;

    // --- 3. Nothing converted, nothing rewritten ---
    assert_eq!(converter.import_and_convert_count(), 0);
    let after: Vec<_> = outputs
        .iter()
        .map(|f| fs::read(f.json_path()))
        .collect::<std::io::Result<_>>()?;
    assert_eq!(before, after);
    Ok(())
}
