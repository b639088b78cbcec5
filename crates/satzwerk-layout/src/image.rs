// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image layout — decode, optional blank-margin auto-crop, scaling under a
// fit policy, and centering inside the field box. Pixels map 1:1 to points
// at placement time, so the resized image is exactly the size it occupies
// on the page.

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage, imageops};
use satzwerk_catalog::mapping::{FieldMapping, FieldStyle};
use satzwerk_core::error::{Result, SatzwerkError};
use satzwerk_core::types::{FitMode, ImageSource, Rect};
use tracing::debug;

/// A scaled image positioned inside its field box.
#[derive(Debug, Clone)]
pub struct PlacedImage {
    /// Resized pixels, still carrying alpha; flattening happens at commit.
    pub image: RgbaImage,
    /// Left edge on the page.
    pub x: f64,
    /// Top edge on the page.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clip rectangle for `cover` placements that overflow the box.
    pub clip: Option<Rect>,
}

/// Decode an image payload. A missing or unreadable file is an asset error,
/// never a panic.
pub fn decode_image(source: &ImageSource) -> Result<DynamicImage> {
    match source {
        ImageSource::Path(path) => {
            if !path.is_file() {
                return Err(SatzwerkError::Asset(format!(
                    "image file not found: {}",
                    path.display()
                )));
            }
            image::open(path)
                .map_err(|e| SatzwerkError::Asset(format!("{}: {e}", path.display())))
        }
        ImageSource::Bytes(bytes) => image::load_from_memory(bytes)
            .map_err(|e| SatzwerkError::Asset(format!("undecodable image bytes: {e}"))),
    }
}

/// Scale a decoded image into its field box.
pub fn layout_image(
    source: &DynamicImage,
    mapping: &FieldMapping,
    auto_crop: bool,
) -> Result<PlacedImage> {
    let FieldStyle::Image(style) = &mapping.style else {
        return Err(SatzwerkError::ValueMismatch(format!(
            "field '{}' is {}, not an image field",
            mapping.name,
            mapping.kind()
        )));
    };
    if mapping.width <= 0.0 || mapping.height <= 0.0 {
        return Err(SatzwerkError::InvalidGeometry(format!(
            "field '{}': image box {}x{} is degenerate",
            mapping.name, mapping.width, mapping.height
        )));
    }

    let mut rgba = source.to_rgba8();
    if auto_crop {
        if let Some((left, top, right, bottom)) = content_bounds(&rgba) {
            let pad = style.crop_padding;
            let x0 = left.saturating_sub(pad);
            let y0 = top.saturating_sub(pad);
            let x1 = (right + 1).saturating_add(pad).min(rgba.width());
            let y1 = (bottom + 1).saturating_add(pad).min(rgba.height());
            if (x1 - x0, y1 - y0) != (rgba.width(), rgba.height()) {
                debug!(
                    field = %mapping.name,
                    from = %format!("{}x{}", rgba.width(), rgba.height()),
                    to = %format!("{}x{}", x1 - x0, y1 - y0),
                    "auto-cropped blank margins"
                );
                rgba = imageops::crop_imm(&rgba, x0, y0, x1 - x0, y1 - y0).to_image();
            }
        }
    }

    let (src_w, src_h) = (rgba.width(), rgba.height());
    if src_w == 0 || src_h == 0 {
        return Err(SatzwerkError::Asset(format!(
            "field '{}': image has no pixels",
            mapping.name
        )));
    }

    let scale_w = mapping.width / f64::from(src_w);
    let scale_h = mapping.height / f64::from(src_h);
    let (scale, clip) = match style.fit {
        FitMode::Contain => (scale_w.min(scale_h), None),
        FitMode::Cover => (
            scale_w.max(scale_h),
            Some(Rect::new(mapping.x, mapping.y, mapping.width, mapping.height)),
        ),
    };

    // Contain rounds down so the image never exceeds the box; cover rounds
    // up so the box is always fully painted.
    let round = match style.fit {
        FitMode::Contain => f64::floor,
        FitMode::Cover => f64::ceil,
    };
    let new_w = (round(f64::from(src_w) * scale) as u32).max(1);
    let new_h = (round(f64::from(src_h) * scale) as u32).max(1);
    let resized = imageops::resize(&rgba, new_w, new_h, FilterType::Lanczos3);

    let width = f64::from(new_w);
    let height = f64::from(new_h);
    Ok(PlacedImage {
        image: resized,
        x: mapping.x + (mapping.width - width) / 2.0,
        y: mapping.y + (mapping.height - height) / 2.0,
        width,
        height,
        clip,
    })
}

/// Inclusive bounding box of pixels that differ from opaque white, or `None`
/// when the whole image is blank. Transparency counts as content.
fn content_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0 == [255, 255, 255, 255] {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x), b.max(y)),
        });
    }
    bounds
}
