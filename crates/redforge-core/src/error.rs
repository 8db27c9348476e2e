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

//! Error types shared by every crate of the pipeline.

use std::fmt;
use std::path::PathBuf;

/// An error in the user or project configuration. Always fatal, and raised
/// before any file is touched.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A project directory could not be resolved because `projectsDir` is unset.
    MissingProjectsDir {
        /// Archive name of the project.
        project: String,
        /// Whether the project gave a relative `projectDir`.
        relative: bool,
    },
    /// No project with this archive name is configured.
    UnknownProject(String),
    /// An explicitly requested configuration file does not exist.
    NotFound(PathBuf),
    /// A configuration file could not be parsed.
    Parse {
        /// The offending file.
        path: PathBuf,
        /// Parser diagnostics.
        details: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingProjectsDir { project, relative } => {
                if *relative {
                    write!(
                        f,
                        "Project \"{project}\" specifies a relative path, but projectsDir is not set"
                    )
                } else {
                    write!(
                        f,
                        "Project \"{project}\" does not specify projectDir, and projectsDir is not set"
                    )
                }
            }
            ConfigError::UnknownProject(name) => write!(f, "Project {name} not found in config"),
            ConfigError::NotFound(path) => {
                write!(f, "User config file not found at {}", path.display())
            }
            ConfigError::Parse { path, details } => write!(
                f,
                "Failed to load or parse user config from {}: {details}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A required source artifact is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingInputError {
    /// The missing file.
    pub path: PathBuf,
}

impl MissingInputError {
    /// Creates the error for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl fmt::Display for MissingInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Required input file is missing: {}", self.path.display())
    }
}

impl std::error::Error for MissingInputError {}

/// An engine record failed validation, or a template lacked an expected field.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    /// The value has no `$type` string.
    MissingType,
    /// The `$type` is not part of the record catalog.
    UnknownType(String),
    /// The attributes do not match the shape of the tagged record.
    Shape {
        /// The record's `$type`.
        type_name: String,
        /// Deserializer diagnostics.
        details: String,
    },
    /// A JSON pointer did not resolve inside a template document.
    MissingField(String),
    /// A JSON pointer resolved to a value of the wrong kind.
    WrongKind {
        /// The pointer.
        pointer: String,
        /// The expected JSON kind.
        expected: &'static str,
    },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::MissingType => write!(f, "Record has no $type discriminant"),
            RecordError::UnknownType(name) => write!(f, "Unknown record type '{name}'"),
            RecordError::Shape { type_name, details } => {
                write!(f, "Invalid '{type_name}' record: {details}")
            }
            RecordError::MissingField(pointer) => {
                write!(f, "Template has no field at '{pointer}'")
            }
            RecordError::WrongKind { pointer, expected } => {
                write!(f, "Template field '{pointer}' is not {expected}")
            }
        }
    }
}

impl std::error::Error for RecordError {}
