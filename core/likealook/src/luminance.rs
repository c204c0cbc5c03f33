use image::RgbaImage;

use crate::error::LikeALookError;

/// Width of a capture frame in pixels.
pub const FRAME_WIDTH: u32 = 640;

/// Height of a capture frame in pixels.
pub const FRAME_HEIGHT: u32 = 480;

/// Samples per RGBA pixel.
pub const RGBA_CHANNELS: usize = 4;

/// Byte length of a full RGBA capture frame.
pub const FRAME_RGBA_LEN: usize = FRAME_WIDTH as usize * FRAME_HEIGHT as usize * RGBA_CHANNELS;

/// Single-channel luminance image in the layout the face detector consumes.
///
/// Pixels are row-major; `ldim` is the line stride and always equals `ncols`
/// for images produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LuminanceImage {
    /// Luminance samples, one per pixel.
    pub pixels: Vec<u8>,
    /// Number of rows.
    pub nrows: u32,
    /// Number of columns.
    pub ncols: u32,
    /// Distance in samples between the starts of consecutive rows.
    pub ldim: u32,
}

impl LuminanceImage {
    /// Convert a decoded RGBA image of any size.
    pub fn from_rgba_image(image: &RgbaImage) -> Self {
        let (ncols, nrows) = image.dimensions();
        Self {
            pixels: image
                .pixels()
                .map(|px| luma(px.0[0], px.0[1], px.0[2]))
                .collect(),
            nrows,
            ncols,
            ldim: ncols,
        }
    }

    /// Sample at (`row`, `col`), or `None` outside the image.
    pub fn get(&self, row: u32, col: u32) -> Option<u8> {
        if row >= self.nrows || col >= self.ncols {
            return None;
        }
        let offset = row as usize * self.ldim as usize + col as usize;
        self.pixels.get(offset).copied()
    }
}

/// Luminance of one pixel: `(2R + 7G + B) / 10`, truncated.
///
/// Detectors downstream were trained against exactly this weighting, so it
/// must not be swapped for the ITU-R coefficients.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    // max is 2550 / 10 = 255, so the narrowing cannot overflow
    ((2 * u32::from(r) + 7 * u32::from(g) + u32::from(b)) / 10) as u8
}

/// Convert a 640×480 RGBA capture frame into a luminance image.
pub fn rgba_to_luminance(rgba: &[u8]) -> Result<LuminanceImage, LikeALookError> {
    rgba_to_grayscale(rgba, FRAME_HEIGHT, FRAME_WIDTH)
}

/// Convert a row-major RGBA buffer of `nrows` × `ncols` pixels.
///
/// Fails with [`LikeALookError::InvalidBufferSize`] before touching the data
/// when the buffer length does not match the geometry.
pub fn rgba_to_grayscale(
    rgba: &[u8],
    nrows: u32,
    ncols: u32,
) -> Result<LuminanceImage, LikeALookError> {
    let expected = nrows as usize * ncols as usize * RGBA_CHANNELS;
    if rgba.len() != expected {
        return Err(LikeALookError::InvalidBufferSize {
            expected,
            actual: rgba.len(),
        });
    }

    let pixels = rgba
        .chunks_exact(RGBA_CHANNELS)
        .map(|px| luma(px[0], px[1], px[2]))
        .collect();

    Ok(LuminanceImage {
        pixels,
        nrows,
        ncols,
        ldim: ncols,
    })
}
