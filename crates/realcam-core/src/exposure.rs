//! Exposure control toward middle gray.
//!
//! The controller compares the tone-mapped response of the metered scene with
//! the response of the target middle gray, and when they differ by more than a
//! small tolerance moves the exposure a fixed fraction of the way toward the
//! value that would put the scene exactly on target.

use serde::{Deserialize, Deserializer, Serialize};

use crate::tone_response::{Look, ToneCurves};

/// Reference scene reflectance considered correctly exposed.
pub const MIDDLE_GRAY: f64 = 0.18;

/// Stops below middle gray mapped to the start of the curve.
const LOG_OFFSET: f64 = 10.0;
/// Stops covered by the full curve.
const LOG_RANGE: f64 = 16.5;

/// Allowed EV compensation, in stops.
pub const EV_COMPENSATION_RANGE: (f64, f64) = (-3.0, 3.0);

/// Normalizes a luminance into the curve's log index space.
#[must_use]
pub fn normalized_log(luminance: f64) -> f64 {
    ((luminance / MIDDLE_GRAY).log2() + LOG_OFFSET) / LOG_RANGE
}

/// Middle gray shifted by `ev_compensation` stops.
#[must_use]
pub fn target_middle_gray(ev_compensation: f64) -> f64 {
    MIDDLE_GRAY * ev_compensation.exp2()
}

/// Render-view exposure state the metering loop reads and rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureState {
    /// Current view exposure, in stops.
    pub exposure: f64,
    /// Active filmic look.
    pub look: Look,
    #[serde(deserialize_with = "clamped_ev_compensation")]
    ev_compensation: f64,
}

fn clamped_ev_compensation<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let (min, max) = EV_COMPENSATION_RANGE;
    Ok(f64::deserialize(deserializer)?.clamp(min, max))
}

impl Default for ExposureState {
    fn default() -> Self {
        Self {
            exposure: 0.0,
            look: Look::MediumContrast,
            ev_compensation: 0.0,
        }
    }
}

impl ExposureState {
    /// Creates a state with the given exposure and look, no compensation.
    pub fn new(exposure: f64, look: Look) -> Self {
        Self {
            exposure,
            look,
            ev_compensation: 0.0,
        }
    }

    /// Sets the EV compensation, clamped to [`EV_COMPENSATION_RANGE`].
    pub fn with_ev_compensation(mut self, ev_compensation: f64) -> Self {
        self.set_ev_compensation(ev_compensation);
        self
    }

    /// Sets the EV compensation, clamped to [`EV_COMPENSATION_RANGE`].
    pub fn set_ev_compensation(&mut self, ev_compensation: f64) {
        let (min, max) = EV_COMPENSATION_RANGE;
        self.ev_compensation = ev_compensation.clamp(min, max);
    }

    /// EV compensation, in stops.
    pub fn ev_compensation(&self) -> f64 {
        self.ev_compensation
    }
}

/// Damped exposure controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureController {
    /// Half-width of the acceptance band around the target response.
    pub tolerance: f64,
    /// Each correction covers `1 / damping` of the remaining distance.
    pub damping: f64,
}

impl Default for ExposureController {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            damping: 5.0,
        }
    }
}

impl ExposureController {
    /// Creates a controller with default tolerance and damping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the acceptance band half-width.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the damping divisor.
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Computes the next exposure for a metered scene.
    ///
    /// Returns `None` when there is no signal (`avg_luminance <= 0`) or the
    /// tone-mapped scene already sits inside the acceptance band.
    pub fn compute(
        &self,
        curves: &ToneCurves,
        avg_luminance: f64,
        actual_exposure: f64,
        ev_compensation: f64,
        look: Look,
    ) -> Option<f64> {
        if !(avg_luminance > 0.0) {
            return None;
        }

        let middle_gray = target_middle_gray(ev_compensation);
        let scene_exposed = avg_luminance * actual_exposure.exp2();

        let s = curves.lookup(normalized_log(scene_exposed), look);
        let s_target = curves.lookup(normalized_log(middle_gray), look);

        if s > s_target - self.tolerance && s < s_target + self.tolerance {
            return None;
        }

        let future = -(avg_luminance / middle_gray).log2();
        Some(actual_exposure - (actual_exposure - future) / self.damping)
    }

    /// Convenience wrapper reading the inputs from an [`ExposureState`].
    pub fn compute_for(
        &self,
        curves: &ToneCurves,
        avg_luminance: f64,
        state: &ExposureState,
    ) -> Option<f64> {
        self.compute(
            curves,
            avg_luminance,
            state.exposure,
            state.ev_compensation,
            state.look,
        )
    }
}

/// Computes the next exposure with the default controller.
pub fn compute_exposure(
    curves: &ToneCurves,
    avg_luminance: f64,
    actual_exposure: f64,
    ev_compensation: f64,
    look: Look,
) -> Option<f64> {
    ExposureController::default().compute(
        curves,
        avg_luminance,
        actual_exposure,
        ev_compensation,
        look,
    )
}
