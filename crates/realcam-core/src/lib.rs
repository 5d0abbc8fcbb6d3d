//! Core algorithms for realcam-rs.
//!
//! This crate provides the renderer-independent parts of the camera controls:
//! - [`ToneCurves`] filmic tone-response lookup for the seven contrast looks
//! - [`MeteringMode`] pixel sampling of the viewport into a scene luminance
//! - [`ExposureController`] damped convergence toward middle gray
//! - [`MeteringLoop`] per-frame driver and [`FrameHooks`] registration
//! - Physical camera mapping and persistent settings

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Settings structs legitimately have several boolean flags
#![allow(clippy::struct_excessive_bools)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Exact float comparisons in tests are against exactly representable values
#![cfg_attr(test, allow(clippy::float_cmp))]

pub mod camera;
pub mod driver;
pub mod error;
pub mod exposure;
pub mod hooks;
pub mod metering;
pub mod options;
pub mod state;
pub mod tone_response;

pub use camera::{camera_fields, motion_blur_shutter, CameraFields};
pub use driver::{MeteringLoop, MeteringOutcome, RenderView, ShadingMode};
pub use error::{RealCameraError, Result};
pub use exposure::{compute_exposure, ExposureController, ExposureState, MIDDLE_GRAY};
pub use hooks::{FrameHook, FrameHooks, FrameTicker, HookId, HookToggle};
pub use metering::{average_luminance, rgb_to_luminance, FrameBuffer, MeteringMode, SamplePoint};
pub use options::{CameraSettings, MeteringKind};
pub use state::{init_tone_curves, install_tone_curves, tone_curves};
pub use tone_response::{FilmicCurve, Look, ToneCurves, CURVE_SAMPLES};

// Re-export glam types for convenience
pub use glam::DVec3;
