use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbImage};

use crate::error::{Result, TdviewError};
use crate::render::DisplayImage;

/// Convert a composed (height, width, 3) array to an `RgbImage`.
pub fn to_rgb_image(image: &DisplayImage) -> Result<RgbImage> {
    let (h, w, _) = image.dim();
    let pixels: Vec<u8> = image.iter().copied().collect();
    RgbImage::from_raw(w as u32, h as u32, pixels)
        .ok_or(TdviewError::InvalidDimensions { width: w, height: h })
}

/// Scale by `zoom` with nearest-neighbour sampling (no smoothing of pixels).
pub fn scale_nearest(image: &RgbImage, zoom: f32) -> RgbImage {
    let w = ((image.width() as f32 * zoom) as u32).max(1);
    let h = ((image.height() as f32 * zoom) as u32).max(1);
    if (w, h) == image.dimensions() {
        return image.clone();
    }
    imageops::resize(image, w, h, FilterType::Nearest)
}

/// Save a composed image, choosing the format from the file extension
/// (PNG unless the extension says TIFF).
pub fn save_display_image(image: &DisplayImage, zoom: f32, path: &Path) -> Result<()> {
    let rgb = scale_nearest(&to_rgb_image(image)?, zoom);
    let format = match path.extension().and_then(|e| e.to_str()) {
        Some("tiff" | "tif") => ImageFormat::Tiff,
        _ => ImageFormat::Png,
    };
    rgb.save_with_format(path, format)?;
    Ok(())
}
