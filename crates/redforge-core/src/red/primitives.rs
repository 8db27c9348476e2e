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

//! Scalar wrappers and small value types shared by every engine record.

use super::tag::{red_type, TypeTag};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

const STORAGE_STRING: &str = "string";
const STORAGE_UINT64: &str = "uint64";

fn serialize_stored<S: Serializer>(
    serializer: S,
    ty: &'static str,
    storage: &'static str,
    value: &str,
) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct(ty, 3)?;
    state.serialize_field("$type", ty)?;
    state.serialize_field("$storage", storage)?;
    state.serialize_field("$value", value)?;
    state.end()
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StoredValue {
    #[serde(rename = "$type")]
    ty: String,
    #[serde(rename = "$storage")]
    storage: String,
    #[serde(rename = "$value")]
    value: String,
}

fn deserialize_stored<'de, D: Deserializer<'de>>(
    deserializer: D,
    expected: &'static str,
) -> Result<StoredValue, D::Error> {
    let stored = StoredValue::deserialize(deserializer)?;
    if stored.ty != expected {
        return Err(de::Error::custom(format_args!(
            "expected $type \"{expected}\", found \"{}\"",
            stored.ty
        )));
    }
    if stored.storage != STORAGE_STRING && stored.storage != STORAGE_UINT64 {
        return Err(de::Error::custom(format_args!(
            "unknown $storage \"{}\"",
            stored.storage
        )));
    }
    Ok(stored)
}

/// A hashed engine name. Defaults to `None`, the engine's empty name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CName(String);

impl CName {
    /// Creates a name from any string-like value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the textual value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CName {
    fn default() -> Self {
        Self::new("None")
    }
}

impl fmt::Display for CName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Serialize for CName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_stored(serializer, "CName", STORAGE_STRING, &self.0)
    }
}

impl<'de> Deserialize<'de> for CName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_stored(deserializer, "CName").map(|stored| Self(stored.value))
    }
}

/// A TweakDB record id stored by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TweakDbId(String);

impl TweakDbId {
    /// Creates an id from its record path, e.g. `OptionsIcons.Id_xfea_colours_000_matte`.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the record path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TweakDbId {
    fn default() -> Self {
        Self::new("0")
    }
}

impl Serialize for TweakDbId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let storage = if self.0 == "0" {
            STORAGE_UINT64
        } else {
            STORAGE_STRING
        };
        serialize_stored(serializer, "TweakDBID", storage, &self.0)
    }
}

impl<'de> Deserialize<'de> for TweakDbId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_stored(deserializer, "TweakDBID").map(|stored| Self(stored.value))
    }
}

/// An archive-internal depot path. The empty path is stored as `uint64` `"0"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourcePath(String);

impl ResourcePath {
    /// Creates a depot path.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the depot path, empty for the null path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the null path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ResourcePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_empty() {
            serialize_stored(serializer, "ResourcePath", STORAGE_UINT64, "0")
        } else {
            serialize_stored(serializer, "ResourcePath", STORAGE_STRING, &self.0)
        }
    }
}

impl<'de> Deserialize<'de> for ResourcePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = deserialize_stored(deserializer, "ResourcePath")?;
        if stored.storage == STORAGE_UINT64 && stored.value == "0" {
            Ok(Self::default())
        } else {
            Ok(Self(stored.value))
        }
    }
}

/// Loading behaviour of a [`ResourceReference`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceFlags {
    /// Loaded with the owning resource.
    #[default]
    Default,
    /// Must be present.
    Obligatory,
    /// Template reference.
    Template,
    /// Loaded on demand.
    Soft,
    /// Embedded in the owning file.
    Embedded,
    /// Loaded in place.
    Inplace,
}

/// A reference from one engine resource to another by depot path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceReference {
    /// Target depot path.
    #[serde(rename = "DepotPath")]
    pub depot_path: ResourcePath,
    /// Loading behaviour.
    #[serde(rename = "Flags")]
    pub flags: ResourceFlags,
}

impl ResourceReference {
    /// A `Default`-flagged reference to `path`.
    pub fn to(path: impl Into<String>) -> Self {
        Self {
            depot_path: ResourcePath::new(path),
            flags: ResourceFlags::Default,
        }
    }

    /// A `Soft` reference to `path`.
    pub fn soft(path: impl Into<String>) -> Self {
        Self {
            depot_path: ResourcePath::new(path),
            flags: ResourceFlags::Soft,
        }
    }

    /// A `Soft` reference to nothing.
    pub fn empty_soft() -> Self {
        Self {
            depot_path: ResourcePath::default(),
            flags: ResourceFlags::Soft,
        }
    }
}

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Color {
    #[serde(rename = "$type")]
    tag: TypeTag<Color>,
    /// Alpha channel.
    #[serde(rename = "Alpha")]
    pub alpha: u8,
    /// Blue channel.
    #[serde(rename = "Blue")]
    pub blue: u8,
    /// Green channel.
    #[serde(rename = "Green")]
    pub green: u8,
    /// Red channel.
    #[serde(rename = "Red")]
    pub red: u8,
}

impl Color {
    /// Creates a colour from its channels.
    pub fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            tag: TypeTag::new(),
            alpha,
            blue,
            green,
            red,
        }
    }
}

/// A rectangle in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rect {
    #[serde(rename = "$type")]
    tag: TypeTag<Rect>,
    #[allow(missing_docs)]
    pub bottom: i32,
    #[allow(missing_docs)]
    pub left: i32,
    #[allow(missing_docs)]
    pub right: i32,
    #[allow(missing_docs)]
    pub top: i32,
}

impl Rect {
    /// Creates a rectangle from its edges.
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            tag: TypeTag::new(),
            bottom,
            left,
            right,
            top,
        }
    }
}

/// A rectangle in normalized UV coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RectF {
    #[serde(rename = "$type")]
    tag: TypeTag<RectF>,
    #[allow(missing_docs)]
    #[serde(rename = "Bottom")]
    pub bottom: f64,
    #[allow(missing_docs)]
    #[serde(rename = "Left")]
    pub left: f64,
    #[allow(missing_docs)]
    #[serde(rename = "Right")]
    pub right: f64,
    #[allow(missing_docs)]
    #[serde(rename = "Top")]
    pub top: f64,
}

impl RectF {
    /// Creates a rectangle from its edges.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            tag: TypeTag::new(),
            bottom,
            left,
            right,
            top,
        }
    }
}

/// A list of engine tags (`redTagList`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagList {
    #[serde(rename = "$type")]
    tag: TypeTag<TagList>,
    /// The tags.
    pub tags: Vec<CName>,
}

impl TagList {
    /// Creates a tag list from names.
    pub fn of<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<CName>,
    {
        Self {
            tag: TypeTag::new(),
            tags: names.into_iter().map(Into::into).collect(),
        }
    }
}

/// Target platform of a cooked resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CookingPlatform {
    /// Windows PC.
    #[default]
    #[serde(rename = "PLATFORM_PC")]
    Pc,
}

/// A rotation quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Quaternion {
    #[serde(rename = "$type")]
    tag: TypeTag<Quaternion>,
    #[allow(missing_docs)]
    pub i: f64,
    #[allow(missing_docs)]
    pub j: f64,
    #[allow(missing_docs)]
    pub k: f64,
    #[allow(missing_docs)]
    pub r: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self {
            tag: TypeTag::new(),
            i: 0.0,
            j: 0.0,
            k: 0.0,
            r: 1.0,
        }
    }
}

/// A fixed-point scalar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixedPoint {
    #[serde(rename = "$type")]
    tag: TypeTag<FixedPoint>,
    /// Raw bits.
    #[serde(rename = "Bits")]
    pub bits: i32,
}

/// A fixed-point world position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldPosition {
    #[serde(rename = "$type")]
    tag: TypeTag<WorldPosition>,
    #[allow(missing_docs)]
    pub x: FixedPoint,
    #[allow(missing_docs)]
    pub y: FixedPoint,
    #[allow(missing_docs)]
    pub z: FixedPoint,
}

/// A position and orientation. The default is the identity transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldTransform {
    #[serde(rename = "$type")]
    tag: TypeTag<WorldTransform>,
    #[allow(missing_docs)]
    #[serde(rename = "Orientation")]
    pub orientation: Quaternion,
    #[allow(missing_docs)]
    #[serde(rename = "Position")]
    pub position: WorldPosition,
}

red_type! {
    Color => "Color",
    Rect => "Rect",
    RectF => "RectF",
    TagList => "redTagList",
    Quaternion => "Quaternion",
    FixedPoint => "FixedPoint",
    WorldPosition => "WorldPosition",
    WorldTransform => "WorldTransform",
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cname_uses_string_storage() {
        let value = serde_json::to_value(CName::new("root")).unwrap();
        assert_eq!(
            value,
            json!({ "$type": "CName", "$storage": "string", "$value": "root" })
        );
        assert_eq!(CName::default().as_str(), "None");
    }

    #[test]
    fn empty_resource_path_is_stored_as_zero() {
        let value = serde_json::to_value(ResourceReference::empty_soft()).unwrap();
        assert_eq!(
            value,
            json!({
                "DepotPath": { "$type": "ResourcePath", "$storage": "uint64", "$value": "0" },
                "Flags": "Soft"
            })
        );
        let back: ResourceReference = serde_json::from_value(value).unwrap();
        assert!(back.depot_path.is_empty());
    }

    #[test]
    fn color_rejects_wrong_type_tag() {
        let bad = json!({ "$type": "Vector4", "Alpha": 1, "Blue": 2, "Green": 3, "Red": 4 });
        assert!(serde_json::from_value::<Color>(bad).is_err());
    }

    #[test]
    fn color_rejects_extra_attributes() {
        let bad = json!({ "$type": "Color", "Alpha": 1, "Blue": 2, "Green": 3, "Red": 4, "Extra": 0 });
        assert!(serde_json::from_value::<Color>(bad).is_err());
    }

    #[test]
    fn identity_transform_matches_engine_layout() {
        let value = serde_json::to_value(WorldTransform::default()).unwrap();
        assert_eq!(value["Orientation"]["r"], json!(1.0));
        assert_eq!(value["Position"]["x"], json!({ "$type": "FixedPoint", "Bits": 0 }));
    }
}
