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

//! The eye-makeup customization project.
//!
//! A rebuild runs these stages in order:
//! 1. load `assets/project.yaml`,
//! 2. build the colour variants and the icon atlas ([`colours`], [`atlas`]),
//! 3. import texture assets ([`textures`]) and resolve the named lists ([`lists`]),
//! 4. generate base materials and the switcher graph ([`materials`], [`switchers`]),
//! 5. optionally pack and install the archive.

pub mod atlas;
pub mod colours;
pub mod lists;
pub mod materials;
pub mod switchers;
pub mod textures;

use anyhow::{Context, Result};
use redforge_io::install::{InstallMode, Installer};
use redforge_io::setup_loader::load_mod_setup;
use redforge_io::{Project, ProjectFile};
use std::path::PathBuf;

pub use switchers::{SelectableSubvariant, SelectableVariant, SwitcherGroup};

/// Configuration key of the project.
pub const ARCHIVE_NAME: &str = "xf-eye-artistry-ccxl";

/// Setup description, relative to the assets directory.
pub const SETUP_FILE: &str = "project.yaml";

/// Extensions accepted by [`ForceOption::Extensions`].
pub const FORCEABLE_EXTENSIONS: [&str; 5] =
    [".app", ".mesh", ".morphtarget", ".xbm", ".inkcharcustomization"];

/// Which outputs are regenerated regardless of timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ForceOption {
    /// Trust the staleness checks.
    #[default]
    None,
    /// Regenerate everything.
    All,
    /// Regenerate files with one of these extensions, e.g. `.xbm`.
    Extensions(Vec<String>),
}

impl ForceOption {
    /// Returns `true` if outputs with `extension` must be regenerated. The
    /// leading dot is optional.
    pub fn applies_to(&self, extension: &str) -> bool {
        let wanted = extension.trim_start_matches('.');
        match self {
            ForceOption::None => false,
            ForceOption::All => true,
            ForceOption::Extensions(list) => list
                .iter()
                .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(wanted)),
        }
    }

    /// Returns `true` if `file` must be regenerated.
    pub fn applies_to_file(&self, file: &ProjectFile) -> bool {
        let name = file.cr2w_file_name();
        match name.rsplit_once('.') {
            Some((_, extension)) => self.applies_to(extension),
            None => *self == ForceOption::All,
        }
    }
}

/// Whether, and how, to install after a rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InstallOption {
    /// Leave the archive in the project.
    #[default]
    None,
    /// Install into the game's mod directory.
    Normal,
    /// Install into the hot reload directory when the game is running.
    Hot,
}

/// Options of [`rebuild`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildOptions {
    /// Outputs to regenerate unconditionally.
    pub force: ForceOption,
    /// Install step to run afterwards.
    pub install: InstallOption,
}

/// What a rebuild produced.
#[derive(Debug)]
pub struct RebuildOutcome {
    /// The generated switcher groups, in UI order.
    pub groups: Vec<SwitcherGroup>,
    /// Location of the installed archive, when an install ran.
    pub installed: Option<PathBuf>,
}

/// Regenerates every resource of the project, then installs it if asked.
pub async fn rebuild(project: &Project, options: &RebuildOptions) -> Result<RebuildOutcome> {
    let assets_dir = project.assets_dir();
    let setup_path = assets_dir.join(SETUP_FILE);
    let setup = load_mod_setup(&setup_path)
        .await
        .with_context(|| format!("Failed to load mod setup for {}", project.label()))?;

    let colours = colours::prepare_colour_variants(project, &options.force).await?;
    let textures = textures::prepare_textures(project, &setup, &assets_dir, &options.force).await?;
    let lists = lists::prepare_lists(&setup, &textures);
    let groups =
        switchers::prepare_switcher_groups(project, &setup, &lists, &colours, &options.force)
            .await?;

    let mode = match options.install {
        InstallOption::None => None,
        InstallOption::Normal => Some(InstallMode::Normal),
        InstallOption::Hot => Some(InstallMode::Hot),
    };
    let installed = match mode {
        Some(mode) => Installer::new(project).install(mode).await?,
        None => None,
    };

    log::info!("Done.");
    Ok(RebuildOutcome { groups, installed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_extensions_match_with_or_without_dot() {
        let force = ForceOption::Extensions(vec![".xbm".into(), "mesh".into()]);
        assert!(force.applies_to("xbm"));
        assert!(force.applies_to(".mesh"));
        assert!(!force.applies_to(".app"));
        assert!(ForceOption::All.applies_to(".inkatlas"));
        assert!(!ForceOption::None.applies_to(".xbm"));
    }
}
