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
use anyhow::{Context, Result};
use redforge_io::config_loader::load_user_config;
use redforge_io::install::{InstallMode, Installer};
use redforge_io::Project;
use std::path::Path;

pub async fn install(config: Option<&Path>, project_name: &str, hot: bool) -> Result<()> {
    print_task_start("Installing Archive", GEAR, BLUE);
    let user = load_user_config(config).context("Failed to load user configuration")?;
    let project = Project::open(user, project_name)
        .with_context(|| format!("Failed to open project '{project_name}'"))?;

    let mode = if hot {
        InstallMode::Hot
    } else {
        InstallMode::Normal
    };
    let installed = run_timed("Install", Installer::new(&project).install(mode)).await?;
    match installed {
        Some(path) => print_success(&format!("Installed to {}", path.display())),
        None => println!(
            "{}{}Nothing installed: no game directory configured.{}",
            BOLD, YELLOW, RESET
        ),
    }
    Ok(())
}
