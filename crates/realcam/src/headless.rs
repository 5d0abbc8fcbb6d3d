//! Headless frame buffers backed by still images.
//!
//! Useful for metering rendered stills offline and for driving the metering
//! loop in tests without a live renderer.

use std::path::Path;

use glam::DVec3;
use image::{DynamicImage, Rgb, Rgb32FImage};
use realcam_core::{
    average_luminance, ExposureState, FrameBuffer, MeteringMode, RealCameraError, RenderView,
    ShadingMode,
};

use crate::Result;

/// A still image exposed through the renderer's frame-buffer convention.
///
/// Row 0 of the frame buffer is the bottom row of the image. Reads outside
/// the image clamp to the nearest edge pixel.
#[derive(Debug, Clone)]
pub struct ImageFrame {
    image: Rgb32FImage,
}

impl ImageFrame {
    /// Wraps an already decoded image. Channel values are used as stored.
    pub fn from_image(image: &DynamicImage) -> Self {
        Self {
            image: image.to_rgb32f(),
        }
    }

    /// Loads an image file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or decoded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| {
            RealCameraError::ImageError(format!("failed to open {}: {e}", path.display()))
        })?;
        Ok(Self::from_image(&image))
    }

    /// Builds a frame from a function of frame-buffer coordinates.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> DVec3) -> Self {
        let image = Rgb32FImage::from_fn(width, height, |x, row| {
            let rgb = f(x, height - 1 - row);
            Rgb([rgb.x as f32, rgb.y as f32, rgb.z as f32])
        });
        Self { image }
    }

    /// A frame filled with a single color.
    pub fn uniform(width: u32, height: u32, rgb: DVec3) -> Self {
        Self::from_fn(width, height, |_, _| rgb)
    }

    /// The underlying image, top row first.
    pub fn image(&self) -> &Rgb32FImage {
        &self.image
    }
}

impl FrameBuffer for ImageFrame {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn read_pixel(&self, x: u32, y: u32) -> DVec3 {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return DVec3::ZERO;
        }
        let x = x.min(width - 1);
        let row = height - 1 - y.min(height - 1);
        let Rgb([r, g, b]) = *self.image.get_pixel(x, row);
        DVec3::new(f64::from(r), f64::from(g), f64::from(b))
    }
}

/// A render view showing a single still frame.
#[derive(Debug, Clone)]
pub struct StillView {
    frame: ImageFrame,
    mode: MeteringMode,
    shading: ShadingMode,
    state: ExposureState,
}

impl StillView {
    /// Creates a view in rendered shading.
    pub fn new(frame: ImageFrame, mode: MeteringMode, state: ExposureState) -> Self {
        Self {
            frame,
            mode,
            shading: ShadingMode::Rendered,
            state,
        }
    }

    /// Sets the reported shading mode.
    #[must_use]
    pub fn with_shading(mut self, shading: ShadingMode) -> Self {
        self.shading = shading;
        self
    }

    /// Replaces the displayed frame.
    pub fn set_frame(&mut self, frame: ImageFrame) {
        self.frame = frame;
    }

    /// Current exposure state.
    pub fn state(&self) -> &ExposureState {
        &self.state
    }
}

impl RenderView for StillView {
    fn shading_mode(&self) -> ShadingMode {
        self.shading
    }

    fn frame(&self) -> &dyn FrameBuffer {
        &self.frame
    }

    fn metering_mode(&self) -> MeteringMode {
        self.mode
    }

    fn exposure_state(&self) -> &ExposureState {
        &self.state
    }

    fn exposure_state_mut(&mut self) -> &mut ExposureState {
        &mut self.state
    }
}

/// Meters an image file, returning its average luminance.
///
/// Returns `Ok(None)` when the image yields no usable samples.
///
/// # Errors
///
/// Returns an error if the grid or circle count is out of range, or if the
/// file cannot be opened or decoded.
pub fn meter_image(path: impl AsRef<Path>, mode: MeteringMode) -> Result<Option<f64>> {
    mode.validate()?;
    let frame = ImageFrame::open(path)?;
    if frame.width() == 0 || frame.height() == 0 {
        return Ok(None);
    }
    Ok(average_luminance(mode, &frame))
}
