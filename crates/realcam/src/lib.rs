//! realcam-rs: physical camera controls and viewport auto exposure.
//!
//! The crate drives exposure-related renderer fields from physical camera
//! settings (aperture, shutter speed) and runs an auto exposure loop that
//! meters the rendered viewport each frame and nudges the view exposure
//! toward middle gray through a filmic tone-response curve.
//!
//! # Quick Start
//!
//! ```no_run
//! use realcam::*;
//!
//! fn main() -> Result<()> {
//!     // Load the tone curves
//!     init()?;
//!
//!     let settings = CameraSettings {
//!         enable_ae: true,
//!         ..CameraSettings::default()
//!     };
//!     let mut session = ViewportSession::new(settings)?;
//!
//!     // Inside the host's viewport draw callback:
//!     let frame = ImageFrame::uniform(640, 480, DVec3::splat(0.72));
//!     let mut state = ExposureState::default();
//!     session.draw_frame(ShadingMode::Rendered, &frame, &mut state);
//!     assert!(state.exposure < 0.0);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Metering modes
//!
//! - [`MeteringMode::CenterSpot`] - one pixel in the middle of the viewport
//! - [`MeteringMode::FullWindow`] - an even grid across the viewport
//! - [`MeteringMode::CenterWeighed`] - square rings weighted toward the center

mod headless;
mod init;
mod session;

pub use realcam_core::{
    average_luminance, camera_fields, compute_exposure, motion_blur_shutter, rgb_to_luminance,
    tone_curves, CameraFields, CameraSettings, DVec3, ExposureController, ExposureState,
    FilmicCurve, FrameBuffer, FrameHook, FrameHooks, FrameTicker, HookId, HookToggle, Look,
    MeteringKind, MeteringLoop, MeteringMode, MeteringOutcome, RealCameraError, RenderView,
    Result, SamplePoint, ShadingMode, ToneCurves, CURVE_SAMPLES, MIDDLE_GRAY,
};

pub use headless::{meter_image, ImageFrame, StillView};
pub use init::{default_looks_dir, init, init_with_looks, is_initialized, LOOKS_DIR_ENV};
pub use session::ViewportSession;
