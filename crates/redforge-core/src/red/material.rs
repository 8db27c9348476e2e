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

//! Material instances, their typed parameters, and the mesh-side records that
//! refer to them.
//!
//! A material parameter is stored on disk as `{"$type": "Float", "DiffuseAlpha": 1}`:
//! the discriminant selects the value's type and the single remaining key names
//! the parameter. [`MaterialParam`] keeps those two concerns apart.

use super::primitives::{CName, Color, CookingPlatform, ResourceReference};
use super::tag::{red_type, TypeTag};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Depot path of the engine's stock decal material.
pub const MESH_DECAL_MATERIAL: &str = "base\\materials\\mesh_decal.mt";

/// Value category of a material parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A float.
    Scalar,
    /// An RGBA colour.
    Color,
    /// A texture reference.
    Texture,
}

impl ParamKind {
    /// The on-disk `$type` discriminant.
    pub fn type_name(self) -> &'static str {
        match self {
            ParamKind::Scalar => "Float",
            ParamKind::Color => "Color",
            ParamKind::Texture => "rRef:ITexture",
        }
    }

    fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "Float" => Some(ParamKind::Scalar),
            "Color" => Some(ParamKind::Color),
            "rRef:ITexture" => Some(ParamKind::Texture),
            _ => None,
        }
    }
}

macro_rules! param_names {
    ($($kind:ident => [$($name:ident),+ $(,)?]),+ $(,)?) => {
        /// Parameters understood by the decal material.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[allow(missing_docs)]
        pub enum ParamName {
            $($($name,)+)+
        }

        impl ParamName {
            /// The value category this parameter accepts.
            pub fn kind(self) -> ParamKind {
                match self {
                    $($(ParamName::$name => ParamKind::$kind,)+)+
                }
            }

            /// The parameter's on-disk key.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($(ParamName::$name => stringify!($name),)+)+
                }
            }
        }
    };
}

param_names! {
    Color => [DiffuseColor],
    Scalar => [
        DiffuseAlpha,
        UVOffsetX,
        UVOffsetY,
        UVRotation,
        UVScaleX,
        UVScaleY,
        SecondaryMaskUVScale,
        SecondaryMaskInfluence,
        NormalAlpha,
        UseNormalAlphaTex,
        NormalsBlendingMode,
        RoughnessScale,
        RoughnessBias,
        MetalnessScale,
        MetalnessBias,
        AlphaMaskContrast,
        RoughnessMetalnessAlpha,
        AnimationSpeed,
        AnimationFramesWidth,
        AnimationFramesHeight,
        DepthThreshold,
    ],
    Texture => [
        DiffuseTexture,
        SecondaryMask,
        NormalTexture,
        NormalAlphaTex,
        NormalsBlendingModeAlpha,
        RoughnessTexture,
        MetalnessTexture,
    ],
}

/// The value carried by a [`MaterialParam`].
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialValue {
    /// A float.
    Scalar(f64),
    /// An RGBA colour.
    Color(Color),
    /// A texture reference.
    Texture(ResourceReference),
}

impl MaterialValue {
    /// The value's category.
    pub fn kind(&self) -> ParamKind {
        match self {
            MaterialValue::Scalar(_) => ParamKind::Scalar,
            MaterialValue::Color(_) => ParamKind::Color,
            MaterialValue::Texture(_) => ParamKind::Texture,
        }
    }
}

/// One overridden parameter of a material instance.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialParam {
    /// Which parameter is overridden.
    pub name: ParamName,
    /// The new value.
    pub value: MaterialValue,
}

impl MaterialParam {
    /// A float parameter.
    pub fn scalar(name: ParamName, value: f64) -> Self {
        debug_assert_eq!(name.kind(), ParamKind::Scalar);
        Self {
            name,
            value: MaterialValue::Scalar(value),
        }
    }

    /// A colour parameter.
    pub fn color(name: ParamName, value: Color) -> Self {
        debug_assert_eq!(name.kind(), ParamKind::Color);
        Self {
            name,
            value: MaterialValue::Color(value),
        }
    }

    /// A texture parameter pointing at `depot_path`.
    pub fn texture(name: ParamName, depot_path: impl Into<String>) -> Self {
        debug_assert_eq!(name.kind(), ParamKind::Texture);
        Self {
            name,
            value: MaterialValue::Texture(ResourceReference::to(depot_path)),
        }
    }
}

impl Serialize for MaterialParam {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("$type", self.value.kind().type_name())?;
        match &self.value {
            MaterialValue::Scalar(v) => map.serialize_entry(self.name.as_str(), v)?,
            MaterialValue::Color(v) => map.serialize_entry(self.name.as_str(), v)?,
            MaterialValue::Texture(v) => map.serialize_entry(self.name.as_str(), v)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MaterialParam {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let kind = match fields.remove("$type") {
            Some(Value::String(name)) => ParamKind::from_type_name(&name).ok_or_else(|| {
                de::Error::custom(format_args!("unknown material parameter $type \"{name}\""))
            })?,
            _ => return Err(de::Error::missing_field("$type")),
        };
        if fields.len() != 1 {
            return Err(de::Error::custom(format_args!(
                "material parameter must hold exactly one value, found {}",
                fields.len()
            )));
        }
        let Some((key, raw)) = fields.into_iter().next() else {
            return Err(de::Error::custom("material parameter is empty"));
        };
        let name: ParamName =
            serde_json::from_value(Value::String(key)).map_err(de::Error::custom)?;
        if name.kind() != kind {
            return Err(de::Error::custom(format_args!(
                "parameter {} expects $type \"{}\", found \"{}\"",
                name.as_str(),
                name.kind().type_name(),
                kind.type_name()
            )));
        }
        let value = match kind {
            ParamKind::Scalar => {
                MaterialValue::Scalar(serde_json::from_value(raw).map_err(de::Error::custom)?)
            }
            ParamKind::Color => {
                MaterialValue::Color(serde_json::from_value(raw).map_err(de::Error::custom)?)
            }
            ParamKind::Texture => {
                MaterialValue::Texture(serde_json::from_value(raw).map_err(de::Error::custom)?)
            }
        };
        Ok(Self { name, value })
    }
}

/// Root of a `.mi` file, also embedded in a mesh's local material buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct MaterialInstance {
    #[serde(rename = "$type")]
    pub tag: TypeTag<MaterialInstance>,
    pub audio_tag: CName,
    pub base_material: ResourceReference,
    pub cooking_platform: CookingPlatform,
    pub enable_mask: u8,
    pub metadata: Option<Value>,
    pub resource_version: u32,
    pub values: Vec<MaterialParam>,
}

impl Default for MaterialInstance {
    fn default() -> Self {
        Self {
            tag: TypeTag::new(),
            audio_tag: CName::default(),
            base_material: ResourceReference::to(MESH_DECAL_MATERIAL),
            cooking_platform: CookingPlatform::Pc,
            enable_mask: 0,
            metadata: None,
            resource_version: 4,
            values: Vec::new(),
        }
    }
}

/// A named material slot of a mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct MeshMaterialEntry {
    #[serde(rename = "$type")]
    pub tag: TypeTag<MeshMaterialEntry>,
    pub index: u32,
    pub is_local_instance: u8,
    pub name: CName,
}

/// A named appearance of a mesh: one material per chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct MeshAppearance {
    #[serde(rename = "$type")]
    pub tag: TypeTag<MeshAppearance>,
    pub chunk_materials: Vec<CName>,
    pub name: CName,
    pub tags: Vec<CName>,
}

red_type! {
    MaterialInstance => "CMaterialInstance",
    MeshMaterialEntry => "CMeshMaterialEntry",
    MeshAppearance => "meshMeshAppearance",
}
