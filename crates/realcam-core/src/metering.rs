//! Pixel sampling for exposure metering.
//!
//! A [`MeteringMode`] decides where the viewport is read and how each read is
//! weighted. [`average_luminance`] turns those reads into a single scene
//! luminance, or `None` when nothing usable was sampled.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{RealCameraError, Result};

/// Smallest grid or circle count accepted by the metering modes.
pub const MIN_METERING_GRID: u32 = 2;
/// Largest grid or circle count accepted by the metering modes.
pub const MAX_METERING_GRID: u32 = 20;

/// Read access to the rendered viewport.
///
/// Coordinates use the renderer's convention: origin at the bottom-left pixel.
pub trait FrameBuffer {
    /// Viewport width in pixels.
    fn width(&self) -> u32;
    /// Viewport height in pixels.
    fn height(&self) -> u32;
    /// Linear RGB of the pixel at `(x, y)`.
    ///
    /// Center-weighed rings are laid out on the longer side, so on a
    /// non-square viewport `y` (or `x`) may lie past the shorter edge.
    fn read_pixel(&self, x: u32, y: u32) -> DVec3;
}

/// Rec. 709 relative luminance of a linear RGB triple.
#[must_use]
pub fn rgb_to_luminance(rgb: DVec3) -> f64 {
    0.2126 * rgb.x + 0.7152 * rgb.y + 0.0722 * rgb.z
}

/// Strategy for choosing and weighting the sampled pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeteringMode {
    /// A single pixel in the middle of the viewport.
    CenterSpot,
    /// An evenly spaced `grid x grid` lattice over the whole viewport.
    FullWindow { grid: u32 },
    /// Concentric square rings around the center, inner rings weighted highest.
    CenterWeighed { circles: u32 },
}

impl Default for MeteringMode {
    fn default() -> Self {
        MeteringMode::CenterWeighed { circles: 4 }
    }
}

impl MeteringMode {
    /// Display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            MeteringMode::CenterSpot => "Center Spot",
            MeteringMode::FullWindow { .. } => "Full Window",
            MeteringMode::CenterWeighed { .. } => "Center Weighed",
        }
    }

    /// Checks the grid or circle count is within `[2, 20]`.
    pub fn validate(self) -> Result<()> {
        let (name, count) = match self {
            MeteringMode::CenterSpot => return Ok(()),
            MeteringMode::FullWindow { grid } => ("full_grid", grid),
            MeteringMode::CenterWeighed { circles } => ("center_grid", circles),
        };
        if (MIN_METERING_GRID..=MAX_METERING_GRID).contains(&count) {
            Ok(())
        } else {
            Err(RealCameraError::InvalidSetting {
                name,
                value: f64::from(count),
                min: f64::from(MIN_METERING_GRID),
                max: f64::from(MAX_METERING_GRID),
            })
        }
    }

    /// Number of pixel reads this mode issues per metering cycle.
    #[must_use]
    pub fn read_count(self) -> usize {
        match self {
            MeteringMode::CenterSpot => 1,
            MeteringMode::FullWindow { grid } => (grid as usize).pow(2),
            MeteringMode::CenterWeighed { circles } => {
                (0..circles as usize).map(|i| 4 * (2 * i + 2)).sum()
            }
        }
    }

    /// The pixels to read for a `width x height` viewport, in read order.
    #[must_use]
    pub fn sample_points(self, width: u32, height: u32) -> Vec<SamplePoint> {
        match self {
            MeteringMode::CenterSpot => vec![SamplePoint {
                x: width / 2,
                y: height / 2,
                weight: 1.0,
            }],
            MeteringMode::FullWindow { grid } => full_window_points(grid, width, height),
            MeteringMode::CenterWeighed { circles } => {
                center_weighed_points(circles, width.max(height))
            }
        }
    }
}

/// A pixel coordinate with its contribution weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub x: u32,
    pub y: u32,
    pub weight: f64,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn full_window_points(grid: u32, width: u32, height: u32) -> Vec<SamplePoint> {
    let step = 1.0 / f64::from(grid + 1);
    let mut points = Vec::with_capacity((grid as usize).pow(2));
    for i in 0..grid {
        for j in 0..grid {
            points.push(SamplePoint {
                x: (step * f64::from(j + 1) * f64::from(width)) as u32,
                y: (step * f64::from(i + 1) * f64::from(height)) as u32,
                weight: 1.0,
            });
        }
    }
    points
}

/// Ring weights fall from `(circles - 1) / circles` at the center to zero on
/// the outermost ring.
fn center_weighed_points(circles: u32, max_dim: u32) -> Vec<SamplePoint> {
    let half = i64::from(max_dim / 2);
    let step = i64::from(max_dim / (circles * 2 + 2));
    let mut points = Vec::with_capacity(MeteringMode::CenterWeighed { circles }.read_count());

    for ring in 0..circles {
        let weight = f64::from(circles - 1 - ring) / f64::from(circles);
        let n_steps = i64::from(ring) * 2 + 2;
        let mut x = half - (i64::from(ring) + 1) * step;
        let mut y = x;

        for (dx, dy) in [(1, 0), (0, 1), (-1, 0), (0, -1)] {
            for _ in 0..n_steps {
                x += dx * step;
                y += dy * step;
                points.push(SamplePoint {
                    x: to_pixel(x),
                    y: to_pixel(y),
                    weight,
                });
            }
        }
    }
    points
}

fn to_pixel(coord: i64) -> u32 {
    u32::try_from(coord.max(0)).unwrap_or(u32::MAX)
}

/// Weighted mean luminance of the pixels selected by `mode`.
///
/// Returns `None` when the weights sum to zero (no usable samples).
pub fn average_luminance<F: FrameBuffer + ?Sized>(
    mode: MeteringMode,
    frame: &F,
) -> Option<f64> {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;

    for point in mode.sample_points(frame.width(), frame.height()) {
        let lum = rgb_to_luminance(frame.read_pixel(point.x, point.y));
        weighted += lum * point.weight;
        total_weight += point.weight;
    }

    if total_weight > 0.0 {
        Some(weighted / total_weight)
    } else {
        log::trace!("{} metering produced no weighted samples", mode.name());
        None
    }
}
