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

//! The declarative description of a project's generated content.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Contents of a project's setup file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModSetup {
    /// Texture id to the asset folder holding its source image.
    pub textures: BTreeMap<String, String>,
    /// Named lists of texture ids.
    #[serde(default)]
    pub lists: BTreeMap<String, Vec<String>>,
    /// Character customization settings.
    pub ccxl: Ccxl,
}

/// Character customization settings of a [`ModSetup`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ccxl {
    /// Index of the first generated switcher. Determines where the generated
    /// options appear relative to the hand-authored ones.
    pub first_switcher_global_index: u32,
    /// Switcher groups, in UI order.
    #[serde(default)]
    pub switcher_groups: Vec<SwitcherGroupSetup>,
}

/// One switcher group to generate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SwitcherGroupSetup {
    /// Identifier used in generated names.
    pub identifier: String,
    /// Display label.
    pub label: String,
    /// Names of the lists whose textures become variants of this group.
    #[serde(default)]
    pub include: Vec<String>,
}
