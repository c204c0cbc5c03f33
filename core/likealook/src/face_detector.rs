use serde::{Deserialize, Serialize};

use crate::arc_bounds::{Arc, BoundingBox};
use crate::error::LikeALookError;
use crate::luminance::LuminanceImage;

/// Tuning for a multiscale sliding-window face detector.
///
/// Defaults match the browser client's detector configuration. Both the
/// camelCase names and the all-lowercase keys (`shiftfactor`, `minsize`, ...)
/// are accepted when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectorParams {
    /// Move the detection window by this fraction of its size.
    #[serde(alias = "shiftfactor")]
    pub shift_factor: f64,
    /// Smallest face size in pixels.
    #[serde(alias = "minsize")]
    pub min_size: u32,
    /// Largest face size in pixels.
    #[serde(alias = "maxsize")]
    pub max_size: u32,
    /// Grow the window by this factor between scales.
    #[serde(alias = "scalefactor")]
    pub scale_factor: f64,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            shift_factor: 0.1,
            min_size: 100,
            max_size: 1000,
            scale_factor: 1.1,
        }
    }
}

/// One window size of the detector's scan, with its sliding step in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanScale {
    /// Window side in pixels.
    pub size: f64,
    /// Distance between neighbouring window positions.
    pub step: u32,
}

impl DetectorParams {
    /// Set the window shift as a fraction of the window size.
    pub fn shift_factor(mut self, shift_factor: f64) -> Self {
        self.shift_factor = shift_factor;
        self
    }

    /// Set the smallest face size in pixels.
    pub fn min_size(mut self, min_size: u32) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the largest face size in pixels.
    pub fn max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the growth factor between scales.
    pub fn scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Reject parameter sets that would make the scan empty or endless.
    pub fn validate(&self) -> Result<(), LikeALookError> {
        if !(self.shift_factor > 0.0 && self.shift_factor <= 1.0) {
            return Err(LikeALookError::InvalidDetectorParams(format!(
                "shift factor must be in (0, 1], got {}",
                self.shift_factor
            )));
        }
        if self.min_size == 0 {
            return Err(LikeALookError::InvalidDetectorParams(
                "min size must be > 0".into(),
            ));
        }
        if self.max_size < self.min_size {
            return Err(LikeALookError::InvalidDetectorParams(format!(
                "max size {} is smaller than min size {}",
                self.max_size, self.min_size
            )));
        }
        if !(self.scale_factor > 1.0) {
            return Err(LikeALookError::InvalidDetectorParams(format!(
                "scale factor must be > 1, got {}",
                self.scale_factor
            )));
        }
        Ok(())
    }

    /// Window sizes the detector visits on an `nrows` × `ncols` grid.
    ///
    /// Starts at `min_size` and grows by `scale_factor` while the window is
    /// within `max_size` and still fits the shorter side of the grid.
    pub fn scan_scales(&self, nrows: u32, ncols: u32) -> Result<Vec<ScanScale>, LikeALookError> {
        self.validate()?;

        let limit = f64::from(self.max_size.min(nrows.min(ncols)));
        let mut scales = Vec::new();
        let mut size = f64::from(self.min_size);
        while size <= limit {
            scales.push(ScanScale {
                size,
                step: ((self.shift_factor * size) as u32).max(1),
            });
            size *= self.scale_factor;
        }
        Ok(scales)
    }
}

/// A raw detection: window center (`row`, `col`), window size and score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Window center row.
    pub row: f64,
    /// Window center column.
    pub col: f64,
    /// Window side in pixels.
    pub scale: f64,
    /// Classifier confidence.
    pub score: f64,
}

impl Detection {
    /// The circle drawn around the detection.
    pub fn overlay_arc(&self) -> Arc {
        Arc::full_circle(self.col, self.row, self.scale / 2.0)
    }

    /// Screen rectangle covered by [`Detection::overlay_arc`].
    pub fn bounds(&self) -> BoundingBox {
        self.overlay_arc().bounds()
    }
}

/// Face region reported to the caller, in whole pixels.
///
/// The rectangle is expanded outward to pixel boundaries, so it always
/// encloses the detection's overlay circle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceBox {
    /// Where the frame came from (camera, upload name, ...).
    pub source_id: String,
    /// Position of the face in the detector's output, from 0.
    pub face_id: u32,
    /// Classifier confidence.
    pub confidence: f64,
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl FaceBox {
    fn from_detection(detection: &Detection, source_id: &str, face_id: u32) -> Self {
        let bounds = detection.bounds();
        let (left, top) = (bounds.x.floor(), bounds.y.floor());
        Self {
            source_id: source_id.to_string(),
            face_id,
            confidence: detection.score,
            x: left as i32,
            y: top as i32,
            width: (bounds.right().ceil() - left) as i32,
            height: (bounds.bottom().ceil() - top) as i32,
        }
    }
}

/// Pluggable face detection backend.
///
/// Implement this trait to run any classifier over the luminance frames
/// produced by [`crate::rgba_to_luminance`].
pub trait FaceDetector: Send + Sync {
    /// Detect faces in `image` using the given scan parameters.
    fn detect(&self, image: &LuminanceImage, params: &DetectorParams) -> Vec<Detection>;
}

/// Run `detector` over `image`, keeping detections whose window lies inside
/// `[min_size, max_size]`.
pub(crate) fn run_detector(
    detector: &dyn FaceDetector,
    image: &LuminanceImage,
    params: &DetectorParams,
    source_id: &str,
) -> Result<Vec<Detection>, LikeALookError> {
    params.validate()?;

    let min = f64::from(params.min_size);
    let max = f64::from(params.max_size);
    let mut detections = detector.detect(image, params);
    let total = detections.len();
    detections.retain(|d| d.scale >= min && d.scale <= max);

    if detections.len() < total {
        log::debug!(
            "Dropped {} detections outside {}..={} px from '{}'",
            total - detections.len(),
            params.min_size,
            params.max_size,
            source_id
        );
    }
    Ok(detections)
}

/// Number detections in order as faces from `source_id`.
pub(crate) fn number_faces(detections: &[Detection], source_id: &str) -> Vec<FaceBox> {
    let faces: Vec<FaceBox> = detections
        .iter()
        .zip(0..)
        .map(|(d, face_id)| FaceBox::from_detection(d, source_id, face_id))
        .collect();
    log::debug!("Extracted {} faces from '{}'", faces.len(), source_id);
    faces
}

/// Run `detector` over `image` and number the faces it finds.
///
/// Detections whose window lies outside `[min_size, max_size]` are dropped.
pub fn detect_faces(
    detector: &dyn FaceDetector,
    image: &LuminanceImage,
    params: &DetectorParams,
    source_id: &str,
) -> Result<Vec<FaceBox>, LikeALookError> {
    let detections = run_detector(detector, image, params, source_id)?;
    Ok(number_faces(&detections, source_id))
}
