use likealook::{DetectorParams, LikeALookError};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Detector options, passed as a JavaScript object.
///
/// All fields are optional; missing ones keep their defaults. The lowercase
/// keys used by the client's detector config (`shiftfactor`, ...) work too.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectorOptions {
    #[serde(alias = "shiftfactor")]
    pub shift_factor: Option<f64>,
    #[serde(alias = "minsize")]
    pub min_size: Option<u32>,
    #[serde(alias = "maxsize")]
    pub max_size: Option<u32>,
    #[serde(alias = "scalefactor")]
    pub scale_factor: Option<f64>,
}

/// Create a JS `Error` with a `code` property.
fn make_error(code: &str, message: &str) -> JsValue {
    let err = js_sys::Error::new(message);
    let _ = js_sys::Reflect::set(&err, &"code".into(), &JsValue::from_str(code));
    JsValue::from(err)
}

/// Convert a `LikeALookError` into a JS `Error` with a machine-readable `code` property.
fn to_js_error(e: LikeALookError) -> JsValue {
    let code = match &e {
        LikeALookError::InvalidBufferSize { .. } => "INVALID_BUFFER_SIZE",
        LikeALookError::DecodeError(_) => "DECODE_ERROR",
        LikeALookError::ZeroDimensions => "ZERO_DIMENSIONS",
        LikeALookError::EncodeError(_) => "ENCODE_ERROR",
        LikeALookError::InvalidQuality(_) => "INVALID_QUALITY",
        LikeALookError::InvalidDetectorParams(_) => "INVALID_DETECTOR_PARAMS",
        LikeALookError::ModelLoad(_) => "MODEL_LOAD",
    };
    make_error(code, &e.to_string())
}

fn to_js_value<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| make_error("SERIALIZE_ERROR", &e.to_string()))
}

fn parse_options(options: JsValue) -> Result<DetectorOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(DetectorOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| make_error("INVALID_OPTIONS", &format!("invalid options: {e}")))
    }
}

/// Apply parsed `DetectorOptions` over the default parameters.
fn apply_options(opts: &DetectorOptions) -> Result<DetectorParams, JsValue> {
    let mut params = DetectorParams::default();
    if let Some(shift) = opts.shift_factor {
        params = params.shift_factor(shift);
    }
    if let Some(min) = opts.min_size {
        params = params.min_size(min);
    }
    if let Some(max) = opts.max_size {
        params = params.max_size(max);
    }
    if let Some(scale) = opts.scale_factor {
        params = params.scale_factor(scale);
    }
    params.validate().map_err(to_js_error)?;
    Ok(params)
}

/// Convert a 640×480 RGBA frame into the detector's grayscale image.
///
/// @param rgba - RGBA bytes, e.g. `ctx.getImageData(0, 0, 640, 480).data`
/// @returns `{pixels: Uint8Array, nrows, ncols, ldim}`
#[wasm_bindgen(js_name = "getPicoImg")]
pub fn get_pico_img(rgba: Vec<u8>) -> Result<JsValue, JsValue> {
    let gray = likealook::rgba_to_luminance(&rgba).map_err(to_js_error)?;

    let obj = js_sys::Object::new();
    let pixels = js_sys::Uint8Array::from(&gray.pixels[..]);
    js_sys::Reflect::set(&obj, &"pixels".into(), &pixels)?;
    js_sys::Reflect::set(&obj, &"nrows".into(), &JsValue::from(gray.nrows))?;
    js_sys::Reflect::set(&obj, &"ncols".into(), &JsValue::from(gray.ncols))?;
    js_sys::Reflect::set(&obj, &"ldim".into(), &JsValue::from(gray.ldim))?;
    Ok(JsValue::from(obj))
}

/// Bounding box of a circular arc, including its center.
///
/// @returns `{x, y, width, height}`
#[wasm_bindgen(js_name = "getArcBounds")]
pub fn get_arc_bounds(
    cx: f64,
    cy: f64,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
) -> Result<JsValue, JsValue> {
    to_js_value(&likealook::arc_bounds(cx, cy, radius, start_angle, end_angle))
}

/// Bounding box of the circle drawn around a detection `[row, col, scale]`.
#[wasm_bindgen(js_name = "detectionBounds")]
pub fn detection_bounds(row: f64, col: f64, scale: f64) -> Result<JsValue, JsValue> {
    let detection = likealook::Detection {
        row,
        col,
        scale,
        score: 0.0,
    };
    to_js_value(&detection.bounds())
}

/// Resolve detector options against the defaults and validate them.
///
/// @param options - Optional object with fields: shiftFactor, minSize,
///   maxSize, scaleFactor
#[wasm_bindgen(js_name = "detectorParams")]
pub fn detector_params(options: JsValue) -> Result<JsValue, JsValue> {
    let opts = parse_options(options)?;
    to_js_value(&apply_options(&opts)?)
}

/// Decode an uploaded photo and fit it into a 640×480 RGBA frame.
#[wasm_bindgen(js_name = "captureFrame")]
pub fn capture_frame(input: Vec<u8>) -> Result<js_sys::Uint8Array, JsValue> {
    let frame = likealook::snapshot::capture_frame(&input).map_err(to_js_error)?;
    Ok(js_sys::Uint8Array::from(frame.as_raw().as_slice()))
}

/// Encode a 640×480 RGBA frame as a JPEG snapshot.
///
/// @param rgba - RGBA frame bytes
/// @param quality - JPEG quality from 0.0 to 1.0
#[wasm_bindgen(js_name = "snapshotJpeg")]
pub fn snapshot_jpeg(rgba: Vec<u8>, quality: f32) -> Result<js_sys::Uint8Array, JsValue> {
    let frame = likealook::snapshot::frame_from_rgba(rgba).map_err(to_js_error)?;
    let jpeg = likealook::snapshot::encode_snapshot(&frame, quality).map_err(to_js_error)?;
    Ok(js_sys::Uint8Array::from(&jpeg[..]))
}
