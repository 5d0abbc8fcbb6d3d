//! Physical camera mapping onto renderer fields.

use crate::options::CameraSettings;

/// Viewport display size of the camera object while the controls are active.
pub const CAMERA_DISPLAY_SIZE: f32 = 0.2;

/// Renderer-side camera fields driven by the physical controls.
///
/// `None` leaves the renderer's current value untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraFields {
    pub use_dof: bool,
    pub show_limits: bool,
    pub display_size: Option<f32>,
    pub aperture_fstop: Option<f64>,
    pub motion_blur_shutter: Option<f64>,
}

/// Converts a shutter speed in seconds to a motion-blur shutter in frames.
#[must_use]
pub fn motion_blur_shutter(shutter_speed: f64, fps: f64) -> f64 {
    fps * shutter_speed
}

/// Fields to apply when the camera controls are toggled.
///
/// Enabling turns on depth of field and clipping limits and pushes the
/// current aperture and shutter speed. Disabling only switches those off.
pub fn camera_fields(settings: &CameraSettings, fps: f64) -> CameraFields {
    if settings.enabled {
        CameraFields {
            use_dof: true,
            show_limits: true,
            display_size: Some(CAMERA_DISPLAY_SIZE),
            aperture_fstop: Some(settings.aperture),
            motion_blur_shutter: Some(motion_blur_shutter(settings.shutter_speed, fps)),
        }
    } else {
        CameraFields::default()
    }
}
