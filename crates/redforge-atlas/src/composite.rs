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

//! Renders atlas thumbnails: a tinted base image with blend layers on top.

use crate::layout::{AtlasItem, PackedAtlas};
use anyhow::{bail, Context, Result};
use image::{Rgba, RgbaImage};
use redforge_core::colour::MaterialKind;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How a layer is combined with the pixels beneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Plain source-over.
    Over,
    /// Multiply darks, screen lights.
    Overlay,
    /// Inverse multiply.
    Screen,
    /// Brightens the backdrop by the inverse of the source.
    ColorDodge,
}

impl BlendMode {
    fn apply(self, backdrop: f32, source: f32) -> f32 {
        match self {
            BlendMode::Over => source,
            BlendMode::Overlay => {
                if backdrop <= 0.5 {
                    2.0 * backdrop * source
                } else {
                    1.0 - 2.0 * (1.0 - backdrop) * (1.0 - source)
                }
            }
            BlendMode::Screen => 1.0 - (1.0 - backdrop) * (1.0 - source),
            BlendMode::ColorDodge => {
                if backdrop <= 0.0 {
                    0.0
                } else if source >= 1.0 {
                    1.0
                } else {
                    (backdrop / (1.0 - source)).min(1.0)
                }
            }
        }
    }
}

impl FromStr for BlendMode {
    type Err = anyhow::Error;

    /// Accepts both `colour-dodge` and `color-dodge`.
    fn from_str(s: &str) -> Result<Self> {
        Ok(match canonical_blend_name(s) {
            "over" => BlendMode::Over,
            "overlay" => BlendMode::Overlay,
            "screen" => BlendMode::Screen,
            "color-dodge" => BlendMode::ColorDodge,
            other => bail!("Unknown blend mode '{other}'"),
        })
    }
}

/// Maps alternative spellings onto the name [`BlendMode`] displays as.
fn canonical_blend_name(name: &str) -> &str {
    match name {
        "colour-dodge" => {
            log::debug!("Blend mode '{name}' read as 'color-dodge'");
            "color-dodge"
        }
        other => other,
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BlendMode::Over => "over",
            BlendMode::Overlay => "overlay",
            BlendMode::Screen => "screen",
            BlendMode::ColorDodge => "color-dodge",
        })
    }
}

/// The twelve thumbnail inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Thumbnail {
    BaseMatte,
    BaseRegular,
    BaseShimmer,
    BaseShimmerSheen,
    BaseShimmerGlint,
    BaseGlitter,
    BaseGlitterSparkles,
    TextMatte,
    TextRegular,
    TextShimmer,
    TextGlitter,
    TextUnderlay,
}

impl Thumbnail {
    /// Every thumbnail.
    pub const ALL: [Thumbnail; 12] = [
        Thumbnail::BaseMatte,
        Thumbnail::BaseRegular,
        Thumbnail::BaseShimmer,
        Thumbnail::BaseShimmerSheen,
        Thumbnail::BaseShimmerGlint,
        Thumbnail::BaseGlitter,
        Thumbnail::BaseGlitterSparkles,
        Thumbnail::TextMatte,
        Thumbnail::TextRegular,
        Thumbnail::TextShimmer,
        Thumbnail::TextGlitter,
        Thumbnail::TextUnderlay,
    ];

    /// File name inside the thumbnails directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Thumbnail::BaseMatte => "thumbnail-base-matte.png",
            Thumbnail::BaseRegular => "thumbnail-base-regular.png",
            Thumbnail::BaseShimmer => "thumbnail-base-shimmer.png",
            Thumbnail::BaseShimmerSheen => "thumbnail-base-shimmer-sheen.png",
            Thumbnail::BaseShimmerGlint => "thumbnail-base-shimmer-glint.png",
            Thumbnail::BaseGlitter => "thumbnail-base-glitter.png",
            Thumbnail::BaseGlitterSparkles => "thumbnail-base-glitter-sparkles.png",
            Thumbnail::TextMatte => "thumbnail-text-matte.png",
            Thumbnail::TextRegular => "thumbnail-text-regular.png",
            Thumbnail::TextShimmer => "thumbnail-text-shimmer.png",
            Thumbnail::TextGlitter => "thumbnail-text-glitter.png",
            Thumbnail::TextUnderlay => "thumbnail-text-underlay.png",
        }
    }

    /// Paths of every thumbnail under `dir`.
    pub fn paths_in(dir: &Path) -> Vec<PathBuf> {
        Self::ALL.iter().map(|t| dir.join(t.file_name())).collect()
    }

    fn base_for(kind: MaterialKind) -> Self {
        match kind {
            MaterialKind::Matte => Thumbnail::BaseMatte,
            MaterialKind::Regular => Thumbnail::BaseRegular,
            MaterialKind::Shimmer => Thumbnail::BaseShimmer,
            MaterialKind::Glitter => Thumbnail::BaseGlitter,
        }
    }

    fn text_for(kind: MaterialKind) -> Self {
        match kind {
            MaterialKind::Matte => Thumbnail::TextMatte,
            MaterialKind::Regular => Thumbnail::TextRegular,
            MaterialKind::Shimmer => Thumbnail::TextShimmer,
            MaterialKind::Glitter => Thumbnail::TextGlitter,
        }
    }
}

/// Decoded thumbnail images.
#[derive(Debug, Clone)]
pub struct Thumbnails {
    images: HashMap<Thumbnail, RgbaImage>,
}

impl Thumbnails {
    /// Decodes every thumbnail from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut images = HashMap::with_capacity(Thumbnail::ALL.len());
        for thumbnail in Thumbnail::ALL {
            let path = dir.join(thumbnail.file_name());
            let image = image::open(&path)
                .with_context(|| format!("Failed to decode thumbnail '{}'", path.display()))?;
            images.insert(thumbnail, image.to_rgba8());
        }
        Ok(Self { images })
    }

    /// Builds the set from already decoded images, e.g. generated ones.
    pub fn from_fn(mut make: impl FnMut(Thumbnail) -> RgbaImage) -> Self {
        Self {
            images: Thumbnail::ALL.iter().map(|&t| (t, make(t))).collect(),
        }
    }

    fn get(&self, thumbnail: Thumbnail) -> Result<&RgbaImage> {
        self.images
            .get(&thumbnail)
            .with_context(|| format!("Thumbnail {} is not loaded", thumbnail.file_name()))
    }
}

/// Where a layer's pixels come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerSource {
    /// The kind's base thumbnail, modulated by lightness and tinted.
    TintedBase,
    /// A thumbnail used as is.
    Plain(Thumbnail),
    /// A text thumbnail with raised lightness and brightness.
    Brightened(Thumbnail),
}

/// One compositing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer {
    /// Pixel source.
    pub source: LayerSource,
    /// Blend against what is already drawn.
    pub blend: BlendMode,
}

const fn layer(source: LayerSource, blend: BlendMode) -> Layer {
    Layer { source, blend }
}

/// Layers drawn for an item of `kind`, bottom first. The label text is
/// always last.
pub fn layer_plan(kind: MaterialKind) -> Vec<Layer> {
    let text = Thumbnail::text_for(kind);
    let mut plan = vec![layer(LayerSource::TintedBase, BlendMode::Over)];
    match kind {
        MaterialKind::Glitter => {
            plan.push(layer(
                LayerSource::Plain(Thumbnail::BaseGlitterSparkles),
                BlendMode::ColorDodge,
            ));
            plan.push(layer(LayerSource::Brightened(text), BlendMode::ColorDodge));
        }
        MaterialKind::Shimmer => {
            plan.push(layer(
                LayerSource::Plain(Thumbnail::BaseShimmerSheen),
                BlendMode::Overlay,
            ));
            plan.push(layer(
                LayerSource::Plain(Thumbnail::BaseShimmerGlint),
                BlendMode::Screen,
            ));
            plan.push(layer(LayerSource::Plain(text), BlendMode::ColorDodge));
        }
        MaterialKind::Matte | MaterialKind::Regular => {
            plan.push(layer(LayerSource::Plain(text), BlendMode::ColorDodge));
        }
    }
    plan
}

/// Scales RGB by `brightness` and then adds `lightness` percent of full scale.
pub fn modulate(image: &RgbaImage, brightness: f32, lightness: f32) -> RgbaImage {
    let offset = lightness / 100.0;
    map_rgb(image, |c| c * brightness + offset)
}

/// Replaces each pixel's hue and saturation with `color`'s, keeping its luma.
pub fn tint(image: &RgbaImage, color: [u8; 4]) -> RgbaImage {
    let target = [color[0], color[1], color[2]].map(|c| f32::from(c) / 255.0);
    let target_luma = luma(target);
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let rgb = [pixel[0], pixel[1], pixel[2]].map(|c| f32::from(c) / 255.0);
        let l = luma(rgb);
        let tinted = if target_luma <= f32::EPSILON {
            [l; 3]
        } else {
            target.map(|c| c * l / target_luma)
        };
        for (channel, value) in pixel.0.iter_mut().zip(tinted) {
            *channel = to_u8(value);
        }
    }
    out
}

fn luma([r, g, b]: [f32; 3]) -> f32 {
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

fn map_rgb(image: &RgbaImage, f: impl Fn(f32) -> f32) -> RgbaImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        for channel in pixel.0.iter_mut().take(3) {
            *channel = to_u8(f(f32::from(*channel) / 255.0));
        }
    }
    out
}

fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Draws `layer` onto `canvas` with its top-left corner at `(left, top)`,
/// clipped to the canvas.
fn draw(canvas: &mut RgbaImage, layer: &RgbaImage, left: u32, top: u32, mode: BlendMode) {
    let width = layer.width().min(canvas.width().saturating_sub(left));
    let height = layer.height().min(canvas.height().saturating_sub(top));
    for y in 0..height {
        for x in 0..width {
            let src = layer.get_pixel(x, y);
            let dst = canvas.get_pixel_mut(left + x, top + y);
            *dst = blend_pixel(*dst, *src, mode);
        }
    }
}

fn blend_pixel(backdrop: Rgba<u8>, source: Rgba<u8>, mode: BlendMode) -> Rgba<u8> {
    let ab = f32::from(backdrop[3]) / 255.0;
    let as_ = f32::from(source[3]) / 255.0;
    let ao = as_ + ab * (1.0 - as_);
    if ao <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let mut out = [0u8; 4];
    for i in 0..3 {
        let cb = f32::from(backdrop[i]) / 255.0;
        let cs = f32::from(source[i]) / 255.0;
        let mixed = (1.0 - ab) * cs + ab * mode.apply(cb, cs);
        let premultiplied = as_ * mixed + ab * (1.0 - as_) * cb;
        out[i] = to_u8(premultiplied / ao);
    }
    out[3] = to_u8(ao);
    Rgba(out)
}

fn render_layer(item: &AtlasItem, layer: &Layer, thumbnails: &Thumbnails) -> Result<RgbaImage> {
    Ok(match layer.source {
        LayerSource::TintedBase => {
            let base = thumbnails.get(Thumbnail::base_for(item.kind))?;
            let lightness = redforge_core::colour::Rgba::from_rgb8(
                item.color[0],
                item.color[1],
                item.color[2],
            )
            .lightness();
            tint(&modulate(base, lightness as f32, 0.0), item.color)
        }
        LayerSource::Plain(thumbnail) => thumbnails.get(thumbnail)?.clone(),
        LayerSource::Brightened(thumbnail) => modulate(thumbnails.get(thumbnail)?, 1.35, 10.0),
    })
}

/// Renders every item of `atlas` onto a transparent canvas.
pub fn compose(atlas: &PackedAtlas, thumbnails: &Thumbnails) -> Result<RgbaImage> {
    let mut canvas = RgbaImage::new(atlas.width(), atlas.height());
    for item in atlas.items() {
        for layer in layer_plan(item.kind) {
            let pixels = render_layer(item, &layer, thumbnails)?;
            draw(&mut canvas, &pixels, item.x, item.y, layer.blend);
        }
    }
    log::debug!(
        "Composited {} thumbnails into a {}x{} atlas",
        atlas.items().len(),
        atlas.width(),
        atlas.height()
    );
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::AtlasLayout;

    fn solid(size: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(size, size, Rgba(rgba))
    }

    #[test]
    fn british_dodge_spelling_is_an_alias() {
        assert_eq!(canonical_blend_name("colour-dodge"), "color-dodge");
        assert_eq!(canonical_blend_name("color-dodge"), "color-dodge");
        assert_eq!(canonical_blend_name("overlay"), "overlay");
        assert_eq!(BlendMode::ColorDodge.to_string(), "color-dodge");
        assert!("colour-burn".parse::<BlendMode>().is_err());
    }

    #[test]
    fn both_dodge_spellings_parse() {
        assert_eq!("colour-dodge".parse::<BlendMode>().unwrap(), BlendMode::ColorDodge);
        assert_eq!("color-dodge".parse::<BlendMode>().unwrap(), BlendMode::ColorDodge);
        assert_eq!("screen".parse::<BlendMode>().unwrap(), BlendMode::Screen);
        assert!("multiply".parse::<BlendMode>().is_err());
    }

    #[test]
    fn text_layer_is_always_last() {
        for kind in MaterialKind::ALL {
            let plan = layer_plan(kind);
            assert_eq!(plan[0].source, LayerSource::TintedBase);
            let last = plan[plan.len() - 1];
            assert_eq!(last.blend, BlendMode::ColorDodge);
            assert!(matches!(
                last.source,
                LayerSource::Plain(t) | LayerSource::Brightened(t) if t == Thumbnail::text_for(kind)
            ));
        }
    }

    #[test]
    fn shimmer_uses_sheen_then_glint() {
        let blends: Vec<_> = layer_plan(MaterialKind::Shimmer).iter().map(|l| l.blend).collect();
        assert_eq!(
            blends,
            [BlendMode::Over, BlendMode::Overlay, BlendMode::Screen, BlendMode::ColorDodge]
        );
        assert_eq!(layer_plan(MaterialKind::Glitter).len(), 3);
        assert_eq!(layer_plan(MaterialKind::Matte).len(), 2);
    }

    #[test]
    fn tint_keeps_luma_of_grey_input() {
        let out = tint(&solid(1, [255, 255, 255, 255]), [255, 0, 0, 255]);
        let px = out.get_pixel(0, 0);
        assert_eq!(px[0], 255);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn blend_formulas_at_extremes() {
        assert_eq!(BlendMode::Screen.apply(0.0, 1.0), 1.0);
        assert_eq!(BlendMode::ColorDodge.apply(0.5, 1.0), 1.0);
        assert_eq!(BlendMode::ColorDodge.apply(0.0, 0.5), 0.0);
        assert_eq!(BlendMode::Overlay.apply(0.0, 1.0), 0.0);
    }

    #[test]
    fn compose_draws_each_item_inside_its_cell() {
        // --- 1. Setup: opaque white bases, transparent effects ---
        let thumbnails = Thumbnails::from_fn(|t| match t {
            Thumbnail::BaseMatte | Thumbnail::BaseRegular => solid(4, [255, 255, 255, 255]),
            _ => solid(4, [0, 0, 0, 0]),
        });
        let mut layout = AtlasLayout::new(2, 4, 1);
        layout.push("000_matte", MaterialKind::Matte, [255, 255, 255, 255]);
        layout.push("000_regular", MaterialKind::Regular, [0, 0, 255, 255]);
        let atlas = layout.finish();

        // --- 2. Compose ---
        let image = compose(&atlas, &thumbnails).unwrap();

        // --- 3. Gap pixels stay transparent, cells are filled ---
        assert_eq!(image.dimensions(), (11, 6));
        assert_eq!(image.get_pixel(0, 0)[3], 0);
        assert_eq!(*image.get_pixel(1, 1), Rgba([255, 255, 255, 255]));
        let blue = image.get_pixel(6, 1);
        assert!(blue[2] > blue[0] && blue[3] == 255);
    }

    #[test]
    fn thumbnails_load_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = Thumbnails::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("thumbnail-base-matte.png"));
    }
}
