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

use crate::helpers::*;
use anyhow::{bail, Context, Result};
use redforge_core::red::ResourceRecord;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn validate(paths: &[PathBuf]) -> Result<()> {
    print_task_start("Validating Records", MAGNIFIER, CYAN);

    let files = find_json_files(paths)?;
    println!(
        "{}🔎 Found:{} {} JSON files to validate.",
        BOLD,
        RESET,
        files.len()
    );

    let mut failures = 0;
    for file in &files {
        match validate_file(file) {
            Ok(type_name) => print_success(&format!("{} ({})", file.display(), type_name)),
            Err(e) => {
                failures += 1;
                print_error(&format!("{}: {:#}", file.display(), e));
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} files failed validation", failures, files.len());
    }
    print_success("All records are valid.");
    Ok(())
}

/// Parses `path` and checks its root chunk against the record catalog.
pub fn validate_file(path: &Path) -> Result<&'static str> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    let document: serde_json::Value = serde_json::from_str(&text).context("Invalid JSON")?;
    let record = ResourceRecord::from_document(&document)?;
    Ok(record.type_name())
}

/// Expands directories into the `*.json` files they contain, sorted.
fn find_json_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path) {
                let entry = entry.with_context(|| format!("Failed to walk '{}'", path.display()))?;
                let is_json = entry.path().extension().is_some_and(|e| e == "json");
                if entry.file_type().is_file() && is_json {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    Ok(files)
}
