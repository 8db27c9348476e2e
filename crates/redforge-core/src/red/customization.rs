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

//! Character-customization records: switchers, appearance options and the
//! `.inkcharcustomization` root resource.

use super::primitives::{CName, Color, CookingPlatform, ResourceReference, TagList, TweakDbId};
use super::tag::{red_type, TypeTag};
use crate::handle::Handle;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Character-creator screens on which an option is editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum EditTag {
    NewGame,
    HairDresser,
    Ripperdoc,
}

impl EditTag {
    /// Every screen, the default for generated options.
    pub fn all() -> Vec<EditTag> {
        vec![EditTag::NewGame, EditTag::HairDresser, EditTag::Ripperdoc]
    }
}

/// Behaviour of an option when censorship is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum CensorFlagAction {
    #[default]
    Activate,
    Deactivate,
}

/// Randomizer bucket of an option. `Count` is the engine's "none" value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum RandomizeCategory {
    #[default]
    Count,
    Makeup,
}

/// How "unusual" an option is considered by the randomizer, from 1 to 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RandomizationInfo {
    #[serde(rename = "$type")]
    #[allow(missing_docs)]
    pub tag: TypeTag<RandomizationInfo>,
    #[allow(missing_docs)]
    pub max_rating: u8,
    #[allow(missing_docs)]
    pub min_rating: u8,
}

impl Default for RandomizationInfo {
    fn default() -> Self {
        Self {
            tag: TypeTag::new(),
            max_rating: 10,
            min_rating: 1,
        }
    }
}

/// One selectable entry of a switcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct SwitcherOption {
    #[serde(rename = "$type")]
    pub tag: TypeTag<SwitcherOption>,
    pub actions: Vec<Value>,
    pub index: u32,
    pub localized_name: String,
    pub names: Vec<CName>,
    pub randomization_info: RandomizationInfo,
    pub tags: TagList,
}

impl SwitcherOption {
    /// Creates an option that activates the named appearances.
    pub fn new<I, N>(index: u32, localized_name: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<CName>,
    {
        Self {
            index,
            localized_name: localized_name.into(),
            names: names.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// A UI switcher: a multiple-choice customization category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct SwitcherInfo {
    #[serde(rename = "$type")]
    pub tag: TypeTag<SwitcherInfo>,
    pub censor_flag: String,
    pub censor_flag_action: CensorFlagAction,
    pub default_index: u32,
    pub edit_tags: Vec<EditTag>,
    pub enabled: u8,
    pub hidden: u8,
    pub index: u32,
    pub link: CName,
    pub link_controller: u8,
    pub localized_name: String,
    pub name: CName,
    pub on_deactivate_actions: Vec<Value>,
    pub options: Vec<SwitcherOption>,
    pub randomize_category: RandomizeCategory,
    pub switch_visibility: u8,
    pub ui_slot: CName,
    pub ui_slots: Vec<CName>,
}

impl Default for SwitcherInfo {
    fn default() -> Self {
        Self {
            tag: TypeTag::new(),
            censor_flag: "0".to_owned(),
            censor_flag_action: CensorFlagAction::Activate,
            default_index: 0,
            edit_tags: EditTag::all(),
            enabled: 1,
            hidden: 0,
            index: 0,
            link: CName::default(),
            link_controller: 0,
            localized_name: String::new(),
            name: CName::default(),
            on_deactivate_actions: Vec::new(),
            options: Vec::new(),
            randomize_category: RandomizeCategory::Count,
            switch_visibility: 0,
            ui_slot: CName::default(),
            ui_slots: Vec::new(),
        }
    }
}

/// One colour treatment inside an [`AppearanceInfo`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct IndexedAppearanceDefinition {
    #[serde(rename = "$type")]
    pub tag: TypeTag<IndexedAppearanceDefinition>,
    pub actions: Vec<Value>,
    pub color: Color,
    pub icon: TweakDbId,
    pub index: u32,
    pub localized_name: String,
    pub name: CName,
    pub randomization_info: RandomizationInfo,
    pub tags: TagList,
}

/// An appearance option: a set of indexed definitions shown in one UI slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct AppearanceInfo {
    #[serde(rename = "$type")]
    pub tag: TypeTag<AppearanceInfo>,
    pub censor_flag: String,
    pub censor_flag_action: CensorFlagAction,
    pub default_index: u32,
    pub definitions: Vec<IndexedAppearanceDefinition>,
    pub edit_tags: Vec<EditTag>,
    pub enabled: u8,
    pub hidden: u8,
    pub index: u32,
    pub link: CName,
    pub link_controller: u8,
    pub localized_name: String,
    pub name: CName,
    pub on_deactivate_actions: Vec<Value>,
    pub randomize_category: RandomizeCategory,
    pub resource: ResourceReference,
    pub ui_slot: CName,
    pub use_thumbnails: u8,
}

impl Default for AppearanceInfo {
    fn default() -> Self {
        Self {
            tag: TypeTag::new(),
            censor_flag: "0".to_owned(),
            censor_flag_action: CensorFlagAction::Activate,
            default_index: 0,
            definitions: Vec::new(),
            edit_tags: EditTag::all(),
            enabled: 1,
            hidden: 0,
            index: 0,
            link: CName::default(),
            link_controller: 0,
            localized_name: String::new(),
            name: CName::default(),
            on_deactivate_actions: Vec::new(),
            randomize_category: RandomizeCategory::Count,
            resource: ResourceReference::default(),
            ui_slot: CName::default(),
            use_thumbnails: 0,
        }
    }
}

/// A named group of option names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsGroup {
    #[serde(rename = "$type")]
    #[allow(missing_docs)]
    pub tag: TypeTag<OptionsGroup>,
    /// Group name.
    pub name: CName,
    /// Option names in display order.
    pub options: Vec<CName>,
}

impl OptionsGroup {
    /// Creates an empty group.
    pub fn named(name: impl Into<CName>) -> Self {
        Self {
            tag: TypeTag::new(),
            name: name.into(),
            options: Vec::new(),
        }
    }
}

/// An entry of a customization options array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomizationOption {
    /// A switcher.
    Switcher(SwitcherInfo),
    /// An appearance option.
    Appearance(AppearanceInfo),
}

impl CustomizationOption {
    /// Returns the global index of the option.
    pub fn index(&self) -> u32 {
        match self {
            CustomizationOption::Switcher(info) => info.index,
            CustomizationOption::Appearance(info) => info.index,
        }
    }
}

/// Root of an `.inkcharcustomization` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct CharacterCustomizationInfoResource {
    #[serde(rename = "$type")]
    pub tag: TypeTag<CharacterCustomizationInfoResource>,
    pub arms_customization_options: Vec<Handle<CustomizationOption>>,
    pub arms_groups: Vec<OptionsGroup>,
    pub body_customization_options: Vec<Handle<CustomizationOption>>,
    pub body_groups: Vec<OptionsGroup>,
    pub cooking_platform: CookingPlatform,
    pub excluded_from_randomize: Vec<CName>,
    pub head_customization_options: Vec<Handle<CustomizationOption>>,
    pub head_groups: Vec<OptionsGroup>,
    pub ui_presets: Vec<Value>,
    pub perspective_info: Vec<Value>,
    pub version: u32,
    pub version_update_info: Vec<Value>,
}

impl Default for CharacterCustomizationInfoResource {
    fn default() -> Self {
        Self {
            tag: TypeTag::new(),
            arms_customization_options: Vec::new(),
            arms_groups: Vec::new(),
            body_customization_options: Vec::new(),
            body_groups: Vec::new(),
            cooking_platform: CookingPlatform::Pc,
            excluded_from_randomize: Vec::new(),
            head_customization_options: Vec::new(),
            head_groups: Vec::new(),
            ui_presets: Vec::new(),
            perspective_info: Vec::new(),
            version: 1,
            version_update_info: Vec::new(),
        }
    }
}

red_type! {
    RandomizationInfo => "gameuiCharacterRandomizationInfo",
    SwitcherOption => "gameuiSwitcherOption",
    SwitcherInfo => "gameuiSwitcherInfo",
    IndexedAppearanceDefinition => "gameuiIndexedAppearanceDefinition",
    AppearanceInfo => "gameuiAppearanceInfo",
    OptionsGroup => "gameuiOptionsGroup",
    CharacterCustomizationInfoResource => "gameuiCharacterCustomizationInfoResource",
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::HandleContext;
    use serde_json::json;

    #[test]
    fn switcher_defaults_match_engine_layout() {
        let value = serde_json::to_value(SwitcherInfo::default()).unwrap();
        assert_eq!(value["$type"], json!("gameuiSwitcherInfo"));
        assert_eq!(value["censorFlag"], json!("0"));
        assert_eq!(value["editTags"], json!(["NewGame", "HairDresser", "Ripperdoc"]));
        assert_eq!(value["randomizeCategory"], json!("Count"));
        assert_eq!(value["uiSlot"]["$value"], json!("None"));
    }

    #[test]
    fn option_round_trips_through_untagged_enum() {
        let ctx = HandleContext::new();
        let info = AppearanceInfo {
            index: 101,
            name: CName::new("g1_none"),
            ..Default::default()
        };
        let handle = ctx.issue(CustomizationOption::Appearance(info));
        let value = serde_json::to_value(&handle).unwrap();
        let back: Handle<CustomizationOption> = serde_json::from_value(value).unwrap();
        assert!(matches!(back.data, CustomizationOption::Appearance(_)));
        assert_eq!(back.data.index(), 101);
    }

    #[test]
    fn switcher_rejects_unknown_attribute() {
        let mut value = serde_json::to_value(SwitcherInfo::default()).unwrap();
        value["bogus"] = json!(1);
        assert!(serde_json::from_value::<SwitcherInfo>(value).is_err());
    }
}
