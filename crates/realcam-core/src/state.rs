//! Process-wide tone-curve table.
//!
//! The curves are read-only after loading, so a plain [`OnceLock`] is enough.

use std::path::Path;
use std::sync::OnceLock;

use crate::error::{RealCameraError, Result};
use crate::tone_response::ToneCurves;

static TONE_CURVES: OnceLock<ToneCurves> = OnceLock::new();

/// Installs the global tone curves.
///
/// Note: Due to `OnceLock` semantics, the curves cannot be replaced once set
/// in the same process.
pub fn install_tone_curves(curves: ToneCurves) -> Result<&'static ToneCurves> {
    TONE_CURVES
        .set(curves)
        .map_err(|_| RealCameraError::AlreadyInitialized)?;
    tone_curves()
}

/// Loads the curves from `dir` and installs them globally.
pub fn init_tone_curves(dir: impl AsRef<Path>) -> Result<&'static ToneCurves> {
    if is_initialized() {
        return Err(RealCameraError::AlreadyInitialized);
    }
    install_tone_curves(ToneCurves::load_dir(dir)?)
}

/// Returns the global tone curves.
pub fn tone_curves() -> Result<&'static ToneCurves> {
    TONE_CURVES.get().ok_or(RealCameraError::NotInitialized)
}

/// Returns whether the global tone curves have been loaded.
pub fn is_initialized() -> bool {
    TONE_CURVES.get().is_some()
}
