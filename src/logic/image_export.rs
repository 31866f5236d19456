// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 tmbkoren

//! Render the covered block set into a PNG preview.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::models::BlockPos;

/// Default output name offered in the save dialog.
pub const DEFAULT_IMAGE_NAME: &str = "minecraft_track_design.png";

/// Pixels drawn per block when exporting.
pub const PIXELS_PER_BLOCK: u32 = 8;

/// Largest image side we are willing to allocate.
const MAX_IMAGE_SIDE: u32 = 16_384;

const BACKGROUND: Rgba<u8> = Rgba([0x28, 0x2c, 0x34, 0xff]);
const BLOCK: Rgba<u8> = Rgba([0xa0, 0xe8, 0xff, 0xff]);
const HIGHLIGHT: Rgba<u8> = Rgba([0xd0, 0x74, 0x80, 0xff]);
const GRID: Rgba<u8> = Rgba([60, 60, 60, 0xff]);

/// Draw blocks on a dark background, with a one-block margin around the
/// bounding box. Highlighted blocks get a red tint.
///
/// # Errors
///
/// Fails when there are no blocks or the image would be unreasonably large.
pub fn render_blocks(
    blocks: &HashSet<BlockPos>,
    highlighted: &HashSet<BlockPos>,
    pixels_per_block: u32,
) -> Result<RgbaImage> {
    let (Some(min_x), Some(max_x), Some(min_z), Some(max_z)) = (
        blocks.iter().map(|b| b.x).min(),
        blocks.iter().map(|b| b.x).max(),
        blocks.iter().map(|b| b.z).min(),
        blocks.iter().map(|b| b.z).max(),
    ) else {
        bail!("There is nothing to export.");
    };

    let scale = pixels_per_block.max(1);
    let cols = (max_x - min_x) as u32 + 3;
    let rows = (max_z - min_z) as u32 + 3;
    let (width, height) = (cols * scale, rows * scale);
    if width > MAX_IMAGE_SIDE || height > MAX_IMAGE_SIDE {
        bail!("Track is too large to export as an image ({width}x{height} px)");
    }

    let mut img = RgbaImage::from_pixel(width, height, BACKGROUND);
    for block in blocks {
        let color = if highlighted.contains(block) {
            HIGHLIGHT
        } else {
            BLOCK
        };
        let left = (block.x - min_x + 1) as u32 * scale;
        let top = (block.z - min_z + 1) as u32 * scale;
        for y in top..top + scale {
            for x in left..left + scale {
                img.put_pixel(x, y, color);
            }
        }
    }

    // Grid lines only make sense when blocks are big enough to read.
    if scale > 3 {
        for y in 0..height {
            for x in 0..width {
                if x % scale == 0 || y % scale == 0 {
                    img.put_pixel(x, y, GRID);
                }
            }
        }
    }

    Ok(img)
}

/// Render and write a PNG to `path`.
pub fn save_png(
    path: &Path,
    blocks: &HashSet<BlockPos>,
    highlighted: &HashSet<BlockPos>,
) -> Result<()> {
    let img = render_blocks(blocks, highlighted, PIXELS_PER_BLOCK)?;
    img.save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Could not write image to {}", path.display()))?;
    log::info!(
        "Exported {} blocks as {}x{} PNG to {}",
        blocks.len(),
        img.width(),
        img.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn blocks(list: &[(i32, i32)]) -> HashSet<BlockPos> {
        list.iter().map(|&(x, z)| BlockPos::new(x, z)).collect()
    }

    #[test]
    fn empty_block_set_is_rejected() {
        let err = render_blocks(&HashSet::new(), &HashSet::new(), 4).unwrap_err();
        assert!(err.to_string().contains("nothing to export"));
    }

    #[test]
    fn image_covers_bounding_box_plus_margin() {
        let set = blocks(&[(-2, 5), (1, 6)]);
        let img = render_blocks(&set, &HashSet::new(), 2).unwrap();
        // 4 columns + 2 margin, 2 rows + 2 margin, 2 px each.
        assert_eq!(img.dimensions(), (12, 8));
        // Without grid lines (scale 2) block pixels keep the block colour.
        assert_eq!(*img.get_pixel(2, 2), BLOCK);
        assert_eq!(*img.get_pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn highlighted_blocks_are_tinted() {
        let set = blocks(&[(0, 0), (1, 0)]);
        let marked = blocks(&[(1, 0)]);
        let img = render_blocks(&set, &marked, 2).unwrap();
        assert_eq!(*img.get_pixel(2, 2), BLOCK);
        assert_eq!(*img.get_pixel(4, 2), HIGHLIGHT);
    }

    #[test]
    fn save_png_writes_decodable_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("track.png");
        save_png(&path, &blocks(&[(0, 0), (3, 2)]), &HashSet::new()).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), 6 * PIXELS_PER_BLOCK);
        assert_eq!(decoded.height(), 5 * PIXELS_PER_BLOCK);
    }
}
