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

// Command line front end of the redforge content pipeline.
// Run with: redforge <command>

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "redforge", version, about = "Cyberpunk 2077 content pipeline")]
struct Cli {
    /// User configuration file. Defaults to the nearest `.xf.yaml`.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Eye makeup customization project.
    EyeArtistry {
        #[command(subcommand)]
        action: EyeArtistryAction,
    },
    /// Packs a project and installs the archive into the game.
    Install {
        /// Archive name of the project.
        project: String,
        /// Install into the hot reload directory.
        #[arg(long)]
        hot: bool,
    },
    /// Checks engine JSON files against the record catalog.
    Validate {
        /// Files, or directories searched for `*.json`.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
enum EyeArtistryAction {
    /// Regenerates every resource of the project.
    Build {
        /// Archive name of the project.
        #[arg(long, default_value = redforge_projects::eye_artistry::ARCHIVE_NAME)]
        project: String,
        /// Install once built. `hot` targets the hot reload directory.
        #[arg(short, long, num_args = 0..=1, default_missing_value = "normal", value_name = "MODE")]
        install: Option<InstallArg>,
        /// Regenerate regardless of timestamps: everything, or only the given extensions.
        #[arg(short, long, num_args = 0.., value_name = "EXT")]
        force: Option<Vec<String>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InstallArg {
    Normal,
    Hot,
}

#[tokio::main]
async fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();
    if let Some(path) = config {
        log::debug!("Using configuration file {}", path.display());
    }
    match cli.command {
        Command::EyeArtistry {
            action:
                EyeArtistryAction::Build {
                    project,
                    install,
                    force,
                },
        } => {
            let options = commands::eye_artistry::build_options(install, force)?;
            commands::eye_artistry::build(config, &project, options).await
        }
        Command::Install { project, hot } => commands::install::install(config, &project, hot).await,
        Command::Validate { paths } => commands::validate::validate(&paths),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_args(args: &[&str]) -> (String, Option<InstallArg>, Option<Vec<String>>) {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::EyeArtistry {
                action:
                    EyeArtistryAction::Build {
                        project,
                        install,
                        force,
                    },
            } => (project, install, force),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn build_defaults_to_the_eye_artistry_project() {
        let (project, install, force) = build_args(&["redforge", "eye-artistry", "build"]);
        assert_eq!(project, "xf-eye-artistry-ccxl");
        assert_eq!(install, None);
        assert_eq!(force, None);
    }

    #[test]
    fn bare_flags_mean_normal_install_and_force_all() {
        let (_, install, force) = build_args(&["redforge", "eye-artistry", "build", "-i", "-f"]);
        assert_eq!(install, Some(InstallArg::Normal));
        assert_eq!(force, Some(Vec::new()));
    }

    #[test]
    fn flags_take_optional_values() {
        let (_, install, force) = build_args(&[
            "redforge",
            "eye-artistry",
            "build",
            "--install",
            "hot",
            "--force",
            ".xbm",
            ".mesh",
        ]);
        assert_eq!(install, Some(InstallArg::Hot));
        assert_eq!(force, Some(vec![".xbm".to_owned(), ".mesh".to_owned()]));
    }

    #[test]
    fn config_is_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from(["redforge", "install", "demo", "--hot", "--config", "x.yaml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.yaml")));
        assert!(matches!(cli.command, Command::Install { hot: true, .. }));
    }

    #[test]
    fn validate_needs_a_path() {
        assert!(Cli::try_parse_from(["redforge", "validate"]).is_err());
    }
}
