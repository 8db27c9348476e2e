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

//! Palette colours and the material treatments applied to them.

use crate::red::primitives::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A colour with channels normalized to `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl Rgba {
    /// An opaque colour from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
            a: 1.0,
        }
    }

    /// Channels scaled to 8 bits and rounded.
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            channel_to_u8(self.a),
        ]
    }

    /// HSL lightness, `(max + min) / 2`.
    pub fn lightness(self) -> f64 {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        (max + min) / 2.0
    }

    /// The engine colour for this value. Always fully opaque.
    pub fn to_engine_color(self) -> Color {
        let [r, g, b, _] = self.to_rgba8();
        Color::rgba(r, g, b, 255)
    }
}

fn channel_to_u8(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Surface treatment of a colour variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    /// Flat, no sheen.
    Matte,
    /// Standard finish.
    Regular,
    /// Metallic sheen.
    Shimmer,
    /// Sparkles.
    Glitter,
}

impl MaterialKind {
    /// Every kind, in generation order.
    pub const ALL: [MaterialKind; 4] = [
        MaterialKind::Matte,
        MaterialKind::Regular,
        MaterialKind::Shimmer,
        MaterialKind::Glitter,
    ];

    /// Lowercase name used in ids and file names.
    pub fn as_str(self) -> &'static str {
        match self {
            MaterialKind::Matte => "matte",
            MaterialKind::Regular => "regular",
            MaterialKind::Shimmer => "shimmer",
            MaterialKind::Glitter => "glitter",
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One palette colour rendered with one material kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ColourDefinition {
    /// `<colour id>_<kind>`, e.g. `007_shimmer`.
    pub base_id: String,
    /// The palette colour.
    pub rgba: Rgba,
    /// Index of the colour's thumbnail in the atlas.
    pub thumbnail_index: usize,
    /// Material treatment.
    pub kind: MaterialKind,
}

/// Zero-padded three digit id of the `n`th palette colour.
pub fn colour_id(n: usize) -> String {
    format!("{n:03}")
}

/// The base id shared by every asset of one colour variant.
pub fn base_id(colour_id: &str, kind: MaterialKind) -> String {
    format!("{colour_id}_{kind}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_zero_padded() {
        assert_eq!(colour_id(7), "007");
        assert_eq!(base_id(&colour_id(42), MaterialKind::Glitter), "042_glitter");
    }

    #[test]
    fn lightness_is_midpoint_of_extremes() {
        let c = Rgba::from_rgb8(255, 0, 0);
        assert!((c.lightness() - 0.5).abs() < 1e-9);
        assert!((Rgba::from_rgb8(255, 255, 255).lightness() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn engine_colour_is_opaque_and_rounded() {
        let c = Rgba { r: 0.5, g: 0.25, b: 1.0, a: 0.1 }.to_engine_color();
        assert_eq!((c.red, c.green, c.blue, c.alpha), (128, 64, 255, 255));
    }
}
