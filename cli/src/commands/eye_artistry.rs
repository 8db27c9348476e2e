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
use crate::InstallArg;
use anyhow::{bail, Context, Result};
use redforge_io::config_loader::load_user_config;
use redforge_io::Project;
use redforge_projects::eye_artistry::{
    self, ForceOption, InstallOption, RebuildOptions, FORCEABLE_EXTENSIONS,
};
use std::path::Path;

/// Turns the `--install` and `--force` flags into rebuild options.
pub fn build_options(
    install: Option<InstallArg>,
    force: Option<Vec<String>>,
) -> Result<RebuildOptions> {
    let install = match install {
        None => InstallOption::None,
        Some(InstallArg::Normal) => InstallOption::Normal,
        Some(InstallArg::Hot) => InstallOption::Hot,
    };
    let force = match force {
        None => ForceOption::None,
        Some(extensions) if extensions.is_empty() => ForceOption::All,
        Some(extensions) => {
            let normalized: Vec<String> = extensions
                .iter()
                .map(|e| format!(".{}", e.trim_start_matches('.').to_ascii_lowercase()))
                .collect();
            if let Some(unknown) = normalized
                .iter()
                .find(|e| !FORCEABLE_EXTENSIONS.contains(&e.as_str()))
            {
                bail!(
                    "Cannot force '{}': expected one of {}",
                    unknown,
                    FORCEABLE_EXTENSIONS.join(", ")
                );
            }
            ForceOption::Extensions(normalized)
        }
    };
    Ok(RebuildOptions { force, install })
}

pub async fn build(config: Option<&Path>, project_name: &str, options: RebuildOptions) -> Result<()> {
    print_task_start("Building Eye Artistry", ROCKET, MAGENTA);
    let user = load_user_config(config).context("Failed to load user configuration")?;
    let project = Project::open(user, project_name)
        .with_context(|| format!("Failed to open project '{project_name}'"))?;
    print_info(&format!("Rebuilding {} ({:?})", project.label(), options.force));

    let outcome = run_timed("Build", eye_artistry::rebuild(&project, &options)).await?;
    let variants: usize = outcome.groups.iter().map(|g| g.variants.len()).sum();
    println!(
        "{}📦 Generated:{} {} switcher groups, {} variants",
        BOLD,
        RESET,
        outcome.groups.len(),
        variants
    );
    if let Some(path) = outcome.installed {
        print_success(&format!("Installed to {}", path.display()));
    } else if options.install != InstallOption::None {
        println!(
            "{}{}Install skipped, see the log for details.{}",
            BOLD, YELLOW, RESET
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_extensions_are_normalized() {
        let options = build_options(None, Some(vec!["XBM".into(), ".mesh".into()])).unwrap();
        assert_eq!(
            options.force,
            ForceOption::Extensions(vec![".xbm".into(), ".mesh".into()])
        );
        assert_eq!(options.install, InstallOption::None);
    }

    #[test]
    fn unknown_force_extension_is_rejected() {
        let err = build_options(None, Some(vec![".png".into()])).unwrap_err();
        assert!(err.to_string().contains(".png"));
    }

    #[test]
    fn bare_force_regenerates_everything() {
        let options = build_options(Some(InstallArg::Hot), Some(Vec::new())).unwrap();
        assert_eq!(options.force, ForceOption::All);
        assert_eq!(options.install, InstallOption::Hot);
    }
}
