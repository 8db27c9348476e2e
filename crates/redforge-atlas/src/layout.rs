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

//! Row-major grid placement of fixed-size atlas items.

use redforge_core::colour::MaterialKind;
use redforge_core::red::primitives::{Rect, RectF};

/// One item placed in the atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasItem {
    /// Part name used by the atlas mapper and icon records.
    pub name: String,
    /// Selects the thumbnail layers used when compositing.
    pub kind: MaterialKind,
    /// Tint colour, 8 bits per channel.
    pub color: [u8; 4],
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Edge length in pixels.
    pub size: u32,
}

impl AtlasItem {
    /// The item's rectangle in atlas pixels.
    pub fn pixel_rect(&self) -> Rect {
        Rect::new(
            self.x as i32,
            self.y as i32,
            (self.x + self.size) as i32,
            (self.y + self.size) as i32,
        )
    }
}

/// Accumulates items for an atlas whose height is not yet known.
#[derive(Debug, Clone)]
pub struct AtlasLayout {
    items: Vec<AtlasItem>,
    columns: u32,
    item_size: u32,
    gap: u32,
}

impl AtlasLayout {
    /// Creates an empty layout. `columns` is clamped to at least one.
    pub fn new(columns: u32, item_size: u32, gap: u32) -> Self {
        Self {
            items: Vec::new(),
            columns: columns.max(1),
            item_size,
            gap,
        }
    }

    /// Atlas width, fixed at creation: `columns * (item_size + gap) + gap`.
    pub fn width(&self) -> u32 {
        self.columns * (self.item_size + self.gap) + self.gap
    }

    /// Number of items pushed so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Places an item after the previous one and returns its index.
    pub fn push(&mut self, name: impl Into<String>, kind: MaterialKind, color: [u8; 4]) -> usize {
        let index = self.items.len();
        let step = self.item_size + self.gap;
        let (x, y) = match self.items.last() {
            None => (self.gap, self.gap),
            Some(last) if index as u32 % self.columns == 0 => (self.gap, last.y + step),
            Some(last) => (last.x + step, last.y),
        };
        self.items.push(AtlasItem {
            name: name.into(),
            kind,
            color,
            x,
            y,
            size: self.item_size,
        });
        index
    }

    /// Fixes the height from the last item and returns the packed atlas.
    /// An empty layout packs to a height of zero.
    pub fn finish(self) -> PackedAtlas {
        let width = self.width();
        let height = self
            .items
            .last()
            .map_or(0, |last| last.y + last.size + self.gap);
        PackedAtlas {
            items: self.items,
            width,
            height,
        }
    }
}

/// An atlas whose dimensions are final.
#[derive(Debug, Clone)]
pub struct PackedAtlas {
    items: Vec<AtlasItem>,
    width: u32,
    height: u32,
}

impl PackedAtlas {
    /// Placed items in insertion order.
    pub fn items(&self) -> &[AtlasItem] {
        &self.items
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The item's rectangle normalized to the atlas dimensions.
    pub fn uv_rect(&self, item: &AtlasItem) -> RectF {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        RectF::new(
            f64::from(item.x) / w,
            f64::from(item.y) / h,
            f64::from(item.x + item.size) / w,
            f64::from(item.y + item.size) / h,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn layout_with(n: usize) -> AtlasLayout {
        let mut layout = AtlasLayout::new(14, 160, 4);
        for i in 0..n {
            layout.push(format!("{i:03}_matte"), MaterialKind::Matte, WHITE);
        }
        layout
    }

    #[test]
    fn placement_follows_the_grid_formula() {
        let packed = layout_with(60).finish();
        for (k, item) in packed.items().iter().enumerate() {
            let k = k as u32;
            assert_eq!(item.x, 4 + (k % 14) * 164, "x of item {k}");
            assert_eq!(item.y, 4 + (k / 14) * 164, "y of item {k}");
        }
    }

    #[test]
    fn width_is_independent_of_item_count() {
        for n in [1, 13, 14, 15, 196] {
            assert_eq!(layout_with(n).finish().width(), 14 * 164 + 4);
        }
    }

    #[test]
    fn height_grows_one_row_at_a_time() {
        assert_eq!(layout_with(1).finish().height(), 168);
        assert_eq!(layout_with(14).finish().height(), 168);
        assert_eq!(layout_with(15).finish().height(), 168 + 164);
        assert_eq!(layout_with(196).finish().height(), 4 + 14 * 164);
        assert_eq!(layout_with(0).finish().height(), 0);
    }

    #[test]
    fn push_returns_insertion_index() {
        let mut layout = AtlasLayout::new(2, 10, 1);
        assert_eq!(layout.push("a", MaterialKind::Matte, WHITE), 0);
        assert_eq!(layout.push("b", MaterialKind::Glitter, WHITE), 1);
        assert_eq!(layout.len(), 2);
    }

    #[test]
    fn uv_rect_scales_back_to_pixel_rect() {
        let packed = layout_with(37).finish();
        let (w, h) = (f64::from(packed.width()), f64::from(packed.height()));
        for item in packed.items() {
            let uv = packed.uv_rect(item);
            let px = item.pixel_rect();
            assert_eq!((uv.left * w).round() as i32, px.left);
            assert_eq!((uv.top * h).round() as i32, px.top);
            assert_eq!((uv.right * w).round() as i32, px.right);
            assert_eq!((uv.bottom * h).round() as i32, px.bottom);
        }
    }
}
