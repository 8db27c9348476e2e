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

//! Palette sampling and the colour variants offered for every makeup option.

use super::atlas::generate_atlas_image_and_data;
use super::ForceOption;
use anyhow::{Context, Result};
use redforge_atlas::{AtlasLayout, PackedAtlas};
use redforge_core::colour::{base_id, colour_id, ColourDefinition, MaterialKind, Rgba};
use redforge_io::Project;
use std::path::{Path, PathBuf};

/// Columns of the icon atlas.
pub const ATLAS_COLUMNS: u32 = 14;
/// Edge length of one icon.
pub const ATLAS_ITEM_SIZE: u32 = 160;
/// Spacing around icons.
pub const ATLAS_GAP: u32 = 4;
/// Number of palette images, `palette0.png` to `palette6.png`.
pub const PALETTE_COUNT: usize = 7;
/// Vertical swatches per palette image.
pub const SWATCHES_PER_PALETTE: u32 = 7;

/// Paths of the palette images under `assets_dir`.
pub fn palette_paths(assets_dir: &Path) -> Vec<PathBuf> {
    (0..PALETTE_COUNT)
        .map(|i| assets_dir.join("inputs").join(format!("palette{i}.png")))
        .collect()
}

/// Samples each swatch of a palette image at its horizontal centre on the
/// middle row.
pub fn read_palette(path: &Path) -> Result<Vec<Rgba>> {
    let image = image::open(path)
        .with_context(|| format!("Failed to decode palette '{}'", path.display()))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    let y = height / 2;
    Ok((0..SWATCHES_PER_PALETTE)
        .map(|i| {
            let x = ((2 * i + 1) * width / (2 * SWATCHES_PER_PALETTE)).min(width.saturating_sub(1));
            let [r, g, b, _] = image.get_pixel(x, y).0;
            Rgba::from_rgb8(r, g, b)
        })
        .collect())
}

/// Expands palette rows into colour definitions and lays out their icons.
///
/// Definitions are listed per colour in kind order. Icons are committed per
/// palette row, grouped by kind, so one atlas row holds one kind.
pub fn plan_colours(palette: &[Vec<Rgba>]) -> (Vec<ColourDefinition>, PackedAtlas) {
    let mut layout = AtlasLayout::new(ATLAS_COLUMNS, ATLAS_ITEM_SIZE, ATLAS_GAP);
    let mut definitions = Vec::new();
    let mut next_id = 0;

    for row in palette {
        let row_start = definitions.len();
        for &rgba in row {
            let id = colour_id(next_id);
            next_id += 1;
            for kind in MaterialKind::ALL {
                definitions.push(ColourDefinition {
                    base_id: base_id(&id, kind),
                    rgba,
                    thumbnail_index: 0,
                    kind,
                });
            }
        }
        for kind in MaterialKind::ALL {
            for definition in definitions[row_start..].iter_mut().filter(|d| d.kind == kind) {
                definition.thumbnail_index =
                    layout.push(definition.base_id.clone(), kind, definition.rgba.to_rgba8());
            }
        }
    }
    (definitions, layout.finish())
}

/// Reads the palettes, writes the icon atlas and returns every colour variant.
pub async fn prepare_colour_variants(
    project: &Project,
    force: &ForceOption,
) -> Result<Vec<ColourDefinition>> {
    let paths = palette_paths(&project.assets_dir());
    let palette = tokio::task::spawn_blocking(move || {
        paths.iter().map(|p| read_palette(p)).collect::<Result<Vec<_>>>()
    })
    .await??;

    let (definitions, atlas) = plan_colours(&palette);
    log::debug!(
        "Planned {} colour variants on a {}x{} atlas",
        definitions.len(),
        atlas.width(),
        atlas.height()
    );
    generate_atlas_image_and_data(project, &atlas, force).await?;
    Ok(definitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey(n: u8) -> Rgba {
        Rgba::from_rgb8(n, n, n)
    }

    #[test]
    fn definitions_are_listed_per_colour_in_kind_order() {
        let (definitions, _) = plan_colours(&[vec![grey(10), grey(20)]]);
        let ids: Vec<_> = definitions.iter().map(|d| d.base_id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "000_matte", "000_regular", "000_shimmer", "000_glitter",
                "001_matte", "001_regular", "001_shimmer", "001_glitter",
            ]
        );
    }

    #[test]
    fn icons_are_committed_by_kind_per_row() {
        let (definitions, atlas) = plan_colours(&[vec![grey(10), grey(20)], vec![grey(30)]]);
        let names: Vec<_> = atlas.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "000_matte", "001_matte", "000_regular", "001_regular",
                "000_shimmer", "001_shimmer", "000_glitter", "001_glitter",
                "002_matte", "002_regular", "002_shimmer", "002_glitter",
            ]
        );
        for definition in &definitions {
            assert_eq!(atlas.items()[definition.thumbnail_index].name, definition.base_id);
        }
    }

    #[test]
    fn full_palette_fills_fourteen_rows() {
        let palette = vec![vec![grey(0); 7]; PALETTE_COUNT];
        let (definitions, atlas) = plan_colours(&palette);
        assert_eq!(definitions.len(), 196);
        assert_eq!(atlas.height(), ATLAS_GAP + 14 * (ATLAS_ITEM_SIZE + ATLAS_GAP));
        // One palette row is seven colours, two atlas rows of fourteen icons.
        assert_eq!(atlas.items()[14].kind, MaterialKind::Shimmer);
    }

    #[test]
    fn palette_swatches_are_sampled_at_their_centres() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("palette0.png");
        let image = image::RgbaImage::from_fn(14, 2, |x, _| {
            let n = (x / 2) as u8 * 30;
            image::Rgba([n, 255 - n, 0, 255])
        });
        image.save(&path)?;

        let swatches = read_palette(&path)?;
        assert_eq!(swatches.len(), 7);
        for (i, swatch) in swatches.iter().enumerate() {
            let n = i as u8 * 30;
            assert_eq!(swatch.to_rgba8(), [n, 255 - n, 0, 255]);
        }
        Ok(())
    }
}
