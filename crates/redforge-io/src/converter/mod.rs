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

//! The external asset converter seam.

mod wolvenkit;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use wolvenkit::WolvenKitCli;

use crate::error::ConverterError;
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};

/// Log level passed to the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Verbosity {
    Quiet,
    Minimal,
    Normal,
    Detailed,
    Diagnostic,
}

impl Verbosity {
    /// The value expected on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Minimal => "minimal",
            Verbosity::Normal => "normal",
            Verbosity::Detailed => "detailed",
            Verbosity::Diagnostic => "diagnostic",
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One converter invocation: an input file or directory and the directory
/// that receives the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertRequest {
    /// File or directory to process.
    pub input: PathBuf,
    /// Output directory, created if absent.
    pub output_dir: PathBuf,
    /// Optional log level.
    pub verbosity: Option<Verbosity>,
}

impl ConvertRequest {
    /// A request with the converter's default verbosity.
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            verbosity: None,
        }
    }

    /// Sets the verbosity.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = Some(verbosity);
        self
    }
}

/// Compiles, decompiles and packs engine resources.
///
/// Every operation writes into an output directory, which is created if it
/// does not exist. A failed invocation is returned as an error and never
/// retried.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Raw asset to engine binary.
    async fn import(&self, request: ConvertRequest) -> Result<(), ConverterError>;

    /// Engine binary to raw asset.
    async fn export(&self, request: ConvertRequest) -> Result<(), ConverterError>;

    /// One or more directory trees to `.archive` files in `output_dir`.
    async fn pack(
        &self,
        inputs: &[PathBuf],
        output_dir: &Path,
        verbosity: Option<Verbosity>,
    ) -> Result<(), ConverterError>;

    /// Engine binary to its JSON projection.
    async fn convert_to_json(&self, request: ConvertRequest) -> Result<(), ConverterError>;

    /// JSON projection back to engine binary.
    async fn convert_from_json(&self, request: ConvertRequest) -> Result<(), ConverterError>;
}
