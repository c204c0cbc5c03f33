use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::LikeALookError;
use crate::face_detector::{DetectorParams, Detection, FaceDetector};
use crate::luminance::LuminanceImage;

/// Minimum classifier score for a window to count as a face.
const SCORE_THRESHOLD: f64 = 2.0;

/// Face detector backed by the `rustface` crate (SeetaFace engine).
pub struct RustfaceDetector {
    model: rustface::Model,
}

impl RustfaceDetector {
    /// Load a SeetaFace frontal model from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LikeALookError> {
        let model =
            rustface::read_model(reader).map_err(|e| LikeALookError::ModelLoad(e.to_string()))?;
        Ok(Self { model })
    }

    /// Load a SeetaFace frontal model from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LikeALookError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| LikeALookError::ModelLoad(format!("{}: {e}", path.display())))?;
        Self::from_reader(BufReader::new(file))
    }
}

/// Sliding step of the smallest window, or `None` when no window fits.
fn first_window_step(image: &LuminanceImage, params: &DetectorParams) -> Option<u32> {
    match params.scan_scales(image.nrows, image.ncols) {
        Ok(scales) => scales.first().map(|scale| scale.step),
        Err(e) => {
            log::warn!("Skipping rustface scan: {e}");
            None
        }
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, image: &LuminanceImage, params: &DetectorParams) -> Vec<Detection> {
        let Some(step) = first_window_step(image, params) else {
            return vec![];
        };
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(params.min_size);
        detector.set_score_thresh(SCORE_THRESHOLD);
        // rustface shrinks the image instead of growing the window
        detector.set_pyramid_scale_factor((1.0 / params.scale_factor) as f32);
        detector.set_slide_window_step(step, step);

        let faces = detector.detect(&rustface::ImageData::new(
            &image.pixels,
            image.ncols,
            image.nrows,
        ));

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                let (w, h) = (f64::from(bbox.width()), f64::from(bbox.height()));
                Detection {
                    row: f64::from(bbox.y()) + h / 2.0,
                    col: f64::from(bbox.x()) + w / 2.0,
                    scale: w.max(h),
                    score: face.score(),
                }
            })
            .collect()
    }
}
