//! I/O helpers for RGB frames, diagnostic rasters and JSON reports.
//!
//! - `load_rgb_image`: read a PNG/JPEG/etc. into an owned interleaved buffer.
//! - `save_rgb_image`: write an `RgbImageU8` to disk.
//! - `save_heatmap_image`: render a vote heatmap to an 8-bit gray PNG,
//!   normalised by the maximum vote.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::RgbImageU8;
use crate::heatmap::Heatmap;
use ::image::{GrayImage, ImageBuffer, Luma, Rgb};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to interleaved 8-bit RGB.
pub fn load_rgb_image(path: &Path) -> Result<RgbImageU8, String> {
    let img = ::image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let w = img.width() as usize;
    let h = img.height() as usize;
    Ok(RgbImageU8::from_raw(w, h, img.into_raw()))
}

/// Save an interleaved RGB buffer to disk (format chosen by extension).
pub fn save_rgb_image(img: &RgbImageU8, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_raw(img.w as u32, img.h as u32, img.data.clone())
            .ok_or_else(|| "Failed to create image buffer".to_string())?;
    buffer
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Render the vote map to an 8-bit gray PNG, scaling the maximum vote to 255.
pub fn save_heatmap_image(heatmap: &Heatmap, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let max = heatmap.max_vote().max(1);
    let mut out = GrayImage::new(heatmap.w as u32, heatmap.h as u32);
    for y in 0..heatmap.h {
        for x in 0..heatmap.w {
            let v = (heatmap.get(x, y) as u64 * 255 / max as u64) as u8;
            out.put_pixel(x as u32, y as u32, Luma([v]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
