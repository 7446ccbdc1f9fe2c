//! Decoding the default camera a style document declares.
//!
//! Only the camera-bearing fragment of a style is understood here; full
//! style parsing belongs to the style engine. The fragment mirrors the
//! style root: `center` as `[lon, lat]`, plus optional `zoom`, `bearing`,
//! and `pitch`.

use crate::error::{Result, ViewportError};
use crate::types::{Camera, Coordinate};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct StyleCameraFragment {
    /// `[longitude, latitude]`, style order.
    center: Option<[f64; 2]>,
    zoom: Option<f64>,
    bearing: Option<f64>,
    pitch: Option<f64>,
}

/// Decode the default camera from a style document (or any JSON object
/// carrying the style root's camera fields).
///
/// Fields absent from the document are left unset on the camera. A
/// document with no camera fields at all is an error: there is no default
/// to show.
pub fn default_camera_from_style(style_json: &str) -> Result<Camera> {
    let fragment: StyleCameraFragment = serde_json::from_str(style_json)?;

    let camera = Camera {
        center: fragment
            .center
            .map(|[longitude, latitude]| Coordinate::new(latitude, longitude)),
        zoom: fragment.zoom,
        bearing: fragment.bearing,
        pitch: fragment.pitch,
        padding: None,
    };

    if camera.is_empty() {
        return Err(ViewportError::StyleCamera(
            "style declares no default camera".to_string(),
        ));
    }
    Ok(camera)
}
