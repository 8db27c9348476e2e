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

//! [`Converter`] backed by the WolvenKit command line tool.

use super::{ConvertRequest, Converter, Verbosity};
use crate::error::{ConverterError, FileError};
use async_trait::async_trait;
use redforge_core::config::UserConfig;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::process::Command;

/// Runs `WolvenKit.CLI` as a child process.
#[derive(Debug, Clone)]
pub struct WolvenKitCli {
    executable: PathBuf,
}

impl WolvenKitCli {
    /// Uses the given executable.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Uses the executable named in the user configuration.
    pub fn from_config(config: &UserConfig) -> Result<Self, ConverterError> {
        config
            .wolvenkit_cli_exe_path()
            .map(Self::new)
            .ok_or(ConverterError::NotConfigured)
    }

    /// The configured executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    async fn run(
        &self,
        operation: &'static str,
        subcommand: &[&str],
        inputs: &[&Path],
        output_dir: &Path,
        verbosity: Option<Verbosity>,
    ) -> Result<(), ConverterError> {
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| FileError::io(output_dir, e))?;

        let args = command_line(subcommand, inputs, output_dir, verbosity);
        log::debug!(
            "{} {}",
            self.executable.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let start = Instant::now();
        let status = Command::new(&self.executable)
            .args(&args)
            .status()
            .await
            .map_err(|source| ConverterError::Spawn {
                program: self.executable.clone(),
                source,
            })?;
        let elapsed = start.elapsed().as_secs_f64();

        if status.success() {
            log::trace!("{operation} completed in {elapsed:.2}s");
            Ok(())
        } else {
            log::error!("{operation} failed after {elapsed:.2}s");
            Err(ConverterError::Failed {
                operation,
                input: inputs.first().map(|p| p.to_path_buf()).unwrap_or_default(),
                status,
            })
        }
    }
}

fn command_line(
    subcommand: &[&str],
    inputs: &[&Path],
    output_dir: &Path,
    verbosity: Option<Verbosity>,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = subcommand.iter().map(OsString::from).collect();
    args.extend(inputs.iter().map(|p| p.as_os_str().to_owned()));
    args.push("-o".into());
    args.push(output_dir.as_os_str().to_owned());
    if let Some(verbosity) = verbosity {
        args.push("-v".into());
        args.push(verbosity.as_str().into());
    }
    args
}

#[async_trait]
impl Converter for WolvenKitCli {
    async fn import(&self, request: ConvertRequest) -> Result<(), ConverterError> {
        self.run(
            "import",
            &["import"],
            &[request.input.as_path()],
            &request.output_dir,
            request.verbosity,
        )
        .await
    }

    async fn export(&self, request: ConvertRequest) -> Result<(), ConverterError> {
        self.run(
            "export",
            &["export"],
            &[request.input.as_path()],
            &request.output_dir,
            request.verbosity,
        )
        .await
    }

    async fn pack(
        &self,
        inputs: &[PathBuf],
        output_dir: &Path,
        verbosity: Option<Verbosity>,
    ) -> Result<(), ConverterError> {
        let inputs: Vec<&Path> = inputs.iter().map(PathBuf::as_path).collect();
        self.run("pack", &["pack"], &inputs, output_dir, verbosity)
            .await
    }

    async fn convert_to_json(&self, request: ConvertRequest) -> Result<(), ConverterError> {
        self.run(
            "convert serialize",
            &["convert", "serialize"],
            &[request.input.as_path()],
            &request.output_dir,
            request.verbosity,
        )
        .await
    }

    async fn convert_from_json(&self, request: ConvertRequest) -> Result<(), ConverterError> {
        self.run(
            "convert deserialize",
            &["convert", "deserialize"],
            &[request.input.as_path()],
            &request.output_dir,
            request.verbosity,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_command_line_with_verbosity() {
        let args = command_line(
            &["convert", "deserialize"],
            &[Path::new("raw/a.mi.json")],
            Path::new("archive"),
            Some(Verbosity::Quiet),
        );
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            ["convert", "deserialize", "raw/a.mi.json", "-o", "archive", "-v", "quiet"]
        );
    }

    #[test]
    fn pack_accepts_several_inputs() {
        let args = command_line(
            &["pack"],
            &[Path::new("a"), Path::new("b")],
            Path::new("out"),
            None,
        );
        assert_eq!(args.len(), 5);
    }

    #[test]
    fn missing_executable_is_a_configuration_error() {
        let err = WolvenKitCli::from_config(&UserConfig::default()).unwrap_err();
        assert!(matches!(err, ConverterError::NotConfigured));
    }
}
