use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageEncoder, Rgba, RgbaImage};

use crate::error::LikeALookError;
use crate::luminance::{FRAME_HEIGHT, FRAME_RGBA_LEN, FRAME_WIDTH};

/// Fill used where a letterboxed photo does not cover the frame.
const LETTERBOX_FILL: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Decode input bytes (JPEG, PNG or WebP) into a `DynamicImage`.
pub fn decode_image(input: &[u8]) -> Result<DynamicImage, LikeALookError> {
    let image =
        image::load_from_memory(input).map_err(|e| LikeALookError::DecodeError(e.to_string()))?;
    if image.width() == 0 || image.height() == 0 {
        return Err(LikeALookError::ZeroDimensions);
    }
    Ok(image)
}

/// Fit `image` into a 640×480 capture frame.
///
/// The aspect ratio is kept; the photo is centered and the uncovered border
/// is filled with opaque black.
pub fn frame_from_image(image: &DynamicImage) -> RgbaImage {
    let (src_w, src_h) = (image.width(), image.height());
    let scale = (f64::from(FRAME_WIDTH) / f64::from(src_w))
        .min(f64::from(FRAME_HEIGHT) / f64::from(src_h));
    let new_w = ((f64::from(src_w) * scale).round() as u32).clamp(1, FRAME_WIDTH);
    let new_h = ((f64::from(src_h) * scale).round() as u32).clamp(1, FRAME_HEIGHT);

    let resized = if (new_w, new_h) == (src_w, src_h) {
        image.to_rgba8()
    } else {
        imageops::resize(&image.to_rgba8(), new_w, new_h, FilterType::Triangle)
    };

    let mut frame = RgbaImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, LETTERBOX_FILL);
    let x = (FRAME_WIDTH - new_w) / 2;
    let y = (FRAME_HEIGHT - new_h) / 2;
    imageops::replace(&mut frame, &resized, i64::from(x), i64::from(y));
    frame
}

/// Decode an uploaded photo straight into a capture frame.
pub fn capture_frame(input: &[u8]) -> Result<RgbaImage, LikeALookError> {
    let image = decode_image(input)?;
    log::debug!(
        "Fitting {}x{} upload into {}x{} frame",
        image.width(),
        image.height(),
        FRAME_WIDTH,
        FRAME_HEIGHT
    );
    Ok(frame_from_image(&image))
}

/// Wrap a raw 640×480 RGBA buffer as a frame image.
pub fn frame_from_rgba(rgba: Vec<u8>) -> Result<RgbaImage, LikeALookError> {
    let actual = rgba.len();
    RgbaImage::from_raw(FRAME_WIDTH, FRAME_HEIGHT, rgba)
        .filter(|_| actual == FRAME_RGBA_LEN)
        .ok_or(LikeALookError::InvalidBufferSize {
            expected: FRAME_RGBA_LEN,
            actual,
        })
}

/// Flatten alpha by compositing onto a white background.
fn flatten_alpha(frame: &RgbaImage) -> Vec<u8> {
    frame
        .pixels()
        .flat_map(|pixel| {
            let [r, g, b, a] = pixel.0;
            let alpha = f32::from(a) / 255.0;
            let inv_alpha = 1.0 - alpha;
            [r, g, b].map(|c| (f32::from(c) * alpha + 255.0 * inv_alpha).round() as u8)
        })
        .collect()
}

/// Encode a frame as the JPEG snapshot posted to the similarity service.
pub fn encode_snapshot(frame: &RgbaImage, quality: f32) -> Result<Vec<u8>, LikeALookError> {
    if !(0.0..=1.0).contains(&quality) {
        return Err(LikeALookError::InvalidQuality(quality));
    }
    if frame.width() == 0 || frame.height() == 0 {
        return Err(LikeALookError::ZeroDimensions);
    }

    let rgb = flatten_alpha(frame);
    let quality_percent = ((quality * 100.0).round() as u8).max(1);
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality_percent)
        .write_image(
            &rgb,
            frame.width(),
            frame.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| LikeALookError::EncodeError(e.to_string()))?;

    Ok(buffer)
}
