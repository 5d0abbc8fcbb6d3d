//! Initialization for realcam-rs.
//!
//! Loads the filmic tone curves once per process and sets up logging.

use std::path::{Path, PathBuf};

use crate::Result;

/// Environment variable overriding the tone-curve directory.
pub const LOOKS_DIR_ENV: &str = "REALCAM_LOOKS_DIR";

/// The tone-curve directory used by [`init()`].
///
/// Reads [`LOOKS_DIR_ENV`], falling back to the `looks/` directory bundled
/// with the sources.
pub fn default_looks_dir() -> PathBuf {
    std::env::var_os(LOOKS_DIR_ENV).map_or_else(
        || Path::new(env!("CARGO_MANIFEST_DIR")).join("../../looks"),
        PathBuf::from,
    )
}

/// Initializes realcam with the default tone-curve directory.
///
/// This must be called before enabling auto exposure. A missing or malformed
/// curve file is a fatal error.
///
/// # Example
///
/// ```no_run
/// use realcam::*;
///
/// fn main() -> Result<()> {
///     init()?;
///     let _session = ViewportSession::new(CameraSettings::default())?;
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    init_with_looks(default_looks_dir())
}

/// Initializes realcam with tone curves read from `dir`.
///
/// # Errors
///
/// Returns an error if realcam is already initialized or any curve file is
/// missing or malformed.
pub fn init_with_looks(dir: impl AsRef<Path>) -> Result<()> {
    let _ = env_logger::try_init();
    realcam_core::state::init_tone_curves(dir)?;
    log::info!("realcam-rs initialized");
    Ok(())
}

/// Returns whether realcam has been initialized.
#[must_use]
pub fn is_initialized() -> bool {
    realcam_core::state::is_initialized()
}
