//! Frame preparation and overlay geometry for the look-alike client.
//!
//! Capture frames are fixed 640×480 RGBA buffers. They are converted to the
//! luminance layout a face detector expects, and detections are turned into
//! overlay circles whose screen bounds come from [`arc_bounds`].
//!
//! # Example
//!
//! ```no_run
//! use likealook::{arc_bounds, rgba_to_luminance, FrameAnalyzer};
//!
//! let rgba = vec![0u8; likealook::FRAME_RGBA_LEN];
//! let gray = rgba_to_luminance(&rgba).unwrap();
//! assert_eq!((gray.nrows, gray.ncols, gray.ldim), (480, 640, 640));
//!
//! let bounds = arc_bounds(320.0, 240.0, 50.0, 0.0, std::f64::consts::TAU);
//! println!("overlay at {},{} size {}x{}", bounds.x, bounds.y, bounds.width, bounds.height);
//!
//! let analysis = FrameAnalyzer::new(rgba).unwrap().analyze().unwrap();
//! println!("{} faces", analysis.faces.len());
//! ```
#![warn(missing_docs)]

/// Arc bounding-box geometry.
pub mod arc_bounds;
mod error;
/// Detector configuration, detections, and the detector trait.
pub mod face_detector;
/// Grayscale conversion of RGBA frames.
pub mod luminance;
/// Drawing detection annotations onto frames.
pub mod overlay;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;
/// Decoding uploads into capture frames and encoding snapshots.
pub mod snapshot;

/// Arc geometry types and the bounds calculation.
pub use arc_bounds::{arc_bounds, Arc, BoundingBox, Point};
/// Error type returned by likealook operations.
pub use error::LikeALookError;
/// Detector configuration and the detection pipeline.
pub use face_detector::{detect_faces, Detection, DetectorParams, FaceBox, FaceDetector};
/// Luminance conversion and capture frame geometry.
pub use luminance::{
    rgba_to_grayscale, rgba_to_luminance, LuminanceImage, FRAME_HEIGHT, FRAME_RGBA_LEN,
    FRAME_WIDTH,
};
#[cfg(feature = "rustface")]
/// Detector that runs a SeetaFace model.
pub use rustface_backend::RustfaceDetector;

use face_detector::{number_faces, run_detector};

/// Source id used when none is configured.
const DEFAULT_SOURCE_ID: &str = "snapshot";

/// Result of analyzing one capture frame.
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    /// The frame in detector layout.
    pub luminance: LuminanceImage,

    /// Faces found in the frame, numbered from 0.
    pub faces: Vec<FaceBox>,

    /// Exact screen bounds of each face's overlay circle, in the order of
    /// `faces`.
    pub overlays: Vec<BoundingBox>,
}

/// Builder that runs a capture frame through conversion and detection.
pub struct FrameAnalyzer {
    rgba: Vec<u8>,
    params: DetectorParams,
    source_id: String,
    /// When `None`, the frame is converted but no faces are reported.
    detector: Option<Box<dyn FaceDetector>>,
}

impl FrameAnalyzer {
    /// Create an analyzer for a 640×480 RGBA frame.
    pub fn new(rgba: Vec<u8>) -> Result<Self, LikeALookError> {
        if rgba.len() != FRAME_RGBA_LEN {
            return Err(LikeALookError::InvalidBufferSize {
                expected: FRAME_RGBA_LEN,
                actual: rgba.len(),
            });
        }

        Ok(Self {
            rgba,
            params: DetectorParams::default(),
            source_id: DEFAULT_SOURCE_ID.to_string(),
            detector: None,
        })
    }

    /// Set the detector scan parameters (default: [`DetectorParams::default`]).
    pub fn detector_params(mut self, params: DetectorParams) -> Self {
        self.params = params;
        self
    }

    /// Label attached to every reported face (default: `"snapshot"`).
    pub fn source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = source_id.into();
        self
    }

    /// Provide the face detector to run on the converted frame.
    ///
    /// ```no_run
    /// use likealook::{Detection, DetectorParams, FaceDetector, FrameAnalyzer, LuminanceImage};
    ///
    /// struct MyDetector;
    /// impl FaceDetector for MyDetector {
    ///     fn detect(&self, image: &LuminanceImage, params: &DetectorParams) -> Vec<Detection> {
    ///         vec![]
    ///     }
    /// }
    ///
    /// let frame = vec![0u8; likealook::FRAME_RGBA_LEN];
    /// let analysis = FrameAnalyzer::new(frame).unwrap()
    ///     .face_detector(Box::new(MyDetector))
    ///     .analyze().unwrap();
    /// ```
    pub fn face_detector(mut self, detector: Box<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Convert the frame and run detection with the configured settings.
    pub fn analyze(self) -> Result<FrameAnalysis, LikeALookError> {
        self.params.validate()?;
        let luminance = rgba_to_luminance(&self.rgba)?;

        let Some(detector) = self.detector.as_deref() else {
            log::debug!("No face detector configured for '{}'", self.source_id);
            return Ok(FrameAnalysis {
                luminance,
                faces: Vec::new(),
                overlays: Vec::new(),
            });
        };

        let detections = run_detector(detector, &luminance, &self.params, &self.source_id)?;
        let faces = number_faces(&detections, &self.source_id);
        let overlays = detections.iter().map(Detection::bounds).collect();

        Ok(FrameAnalysis {
            luminance,
            faces,
            overlays,
        })
    }
}
