//! Per-frame auto exposure metering loop.
//!
//! The loop holds no state of its own: each invocation reads the viewport,
//! computes a correction and writes it back into the view's [`ExposureState`],
//! which feeds the next frame's reading.

use crate::exposure::{ExposureController, ExposureState};
use crate::hooks::FrameHook;
use crate::metering::{average_luminance, FrameBuffer, MeteringMode};
use crate::tone_response::ToneCurves;

/// Viewport shading mode reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadingMode {
    Wireframe,
    #[default]
    Solid,
    Material,
    /// Live render preview; the only mode auto exposure runs in.
    Rendered,
}

/// The host's render view, as seen by the metering loop.
pub trait RenderView {
    /// Current viewport shading mode.
    fn shading_mode(&self) -> ShadingMode;

    /// The rendered frame for this draw.
    fn frame(&self) -> &dyn FrameBuffer;

    /// Metering mode selected for this view.
    fn metering_mode(&self) -> MeteringMode;

    /// Exposure state of this view.
    fn exposure_state(&self) -> &ExposureState;

    /// Mutable exposure state of this view.
    fn exposure_state_mut(&mut self) -> &mut ExposureState;
}

/// What a single metering cycle did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeteringOutcome {
    /// The viewport is not in rendered shading; nothing was read.
    NotRendered,
    /// No usable luminance was sampled; exposure left alone.
    NoSignal,
    /// The scene already sits inside the acceptance band.
    Converged { luminance: f64 },
    /// Exposure was rewritten.
    Adjusted { luminance: f64, from: f64, to: f64 },
}

impl MeteringOutcome {
    /// Returns true if the exposure state was modified.
    pub fn is_adjusted(&self) -> bool {
        matches!(self, MeteringOutcome::Adjusted { .. })
    }
}

/// Sampler and controller wired to a tone-curve table.
#[derive(Debug, Clone, Copy)]
pub struct MeteringLoop<'c> {
    curves: &'c ToneCurves,
    controller: ExposureController,
}

impl<'c> MeteringLoop<'c> {
    /// Creates a loop with the default controller.
    pub fn new(curves: &'c ToneCurves) -> Self {
        Self {
            curves,
            controller: ExposureController::default(),
        }
    }

    /// Replaces the controller.
    pub fn with_controller(mut self, controller: ExposureController) -> Self {
        self.controller = controller;
        self
    }

    /// The controller in use.
    pub fn controller(&self) -> &ExposureController {
        &self.controller
    }

    /// Runs one metering cycle against `view`.
    ///
    /// Writes the exposure at most once.
    pub fn run_frame<V: RenderView + ?Sized>(&self, view: &mut V) -> MeteringOutcome {
        if view.shading_mode() != ShadingMode::Rendered {
            return MeteringOutcome::NotRendered;
        }

        let mode = view.metering_mode();
        if let Err(e) = mode.validate() {
            log::trace!("auto exposure: skipping {} metering: {e}", mode.name());
            return MeteringOutcome::NoSignal;
        }

        let luminance = {
            let frame = view.frame();
            if frame.width() == 0 || frame.height() == 0 {
                return MeteringOutcome::NoSignal;
            }
            average_luminance(mode, frame)
        };
        let Some(luminance) = luminance else {
            return MeteringOutcome::NoSignal;
        };

        let state = view.exposure_state();
        let from = state.exposure;
        match self.controller.compute_for(self.curves, luminance, state) {
            Some(to) => {
                view.exposure_state_mut().exposure = to;
                MeteringOutcome::Adjusted {
                    luminance,
                    from,
                    to,
                }
            }
            None if luminance > 0.0 => MeteringOutcome::Converged { luminance },
            None => MeteringOutcome::NoSignal,
        }
    }
}

impl MeteringLoop<'static> {
    /// Wraps the loop as a per-frame hook.
    pub fn into_hook(self) -> FrameHook {
        Box::new(move |view: &mut dyn RenderView| match self.run_frame(view) {
            MeteringOutcome::Adjusted {
                luminance,
                from,
                to,
            } => {
                log::debug!(
                    "auto exposure: luminance {luminance:.4}, exposure {from:.3} -> {to:.3}"
                );
            }
            outcome => log::trace!("auto exposure: {outcome:?}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone_response::{FilmicCurve, Look};
    use glam::DVec3;

    struct Uniform {
        size: u32,
        color: DVec3,
    }

    impl FrameBuffer for Uniform {
        fn width(&self) -> u32 {
            self.size
        }

        fn height(&self) -> u32 {
            self.size
        }

        fn read_pixel(&self, _x: u32, _y: u32) -> DVec3 {
            self.color
        }
    }

    struct TestView {
        shading: ShadingMode,
        mode: MeteringMode,
        frame: Uniform,
        state: ExposureState,
    }

    impl TestView {
        fn gray(level: f64) -> Self {
            Self {
                shading: ShadingMode::Rendered,
                mode: MeteringMode::CenterSpot,
                frame: Uniform {
                    size: 100,
                    color: DVec3::splat(level),
                },
                state: ExposureState::default(),
            }
        }
    }

    impl RenderView for TestView {
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

    fn ramp_curves() -> ToneCurves {
        ToneCurves::from_fn(|look| FilmicCurve::from_fn(look, |t| t))
    }

    #[test]
    fn test_skips_when_not_rendered() {
        let curves = ramp_curves();
        let mut view = TestView::gray(0.72);
        for shading in [ShadingMode::Wireframe, ShadingMode::Solid, ShadingMode::Material] {
            view.shading = shading;
            assert_eq!(
                MeteringLoop::new(&curves).run_frame(&mut view),
                MeteringOutcome::NotRendered
            );
        }
        assert_eq!(view.state.exposure, 0.0);
    }

    #[test]
    fn test_black_frame_is_no_signal() {
        let curves = ramp_curves();
        let mut view = TestView::gray(0.0);
        view.state.exposure = 1.25;
        assert_eq!(
            MeteringLoop::new(&curves).run_frame(&mut view),
            MeteringOutcome::NoSignal
        );
        assert_eq!(view.state.exposure, 1.25);
    }

    #[test]
    fn test_empty_viewport_is_no_signal() {
        let curves = ramp_curves();
        let mut view = TestView::gray(0.5);
        view.frame.size = 0;
        assert_eq!(
            MeteringLoop::new(&curves).run_frame(&mut view),
            MeteringOutcome::NoSignal
        );
    }

    #[test]
    fn test_out_of_range_mode_is_no_signal() {
        let curves = ramp_curves();
        let mut view = TestView::gray(0.72);
        view.state.exposure = 0.5;
        for mode in [
            MeteringMode::FullWindow { grid: u32::MAX },
            MeteringMode::FullWindow { grid: 0 },
            MeteringMode::CenterWeighed { circles: 1 << 31 },
            MeteringMode::CenterWeighed { circles: 100_000 },
            MeteringMode::CenterWeighed { circles: 1 },
        ] {
            view.mode = mode;
            assert_eq!(
                MeteringLoop::new(&curves).run_frame(&mut view),
                MeteringOutcome::NoSignal
            );
        }
        assert_eq!(view.state.exposure, 0.5);
    }

    #[test]
    fn test_middle_gray_converged() {
        let curves = ramp_curves();
        let mut view = TestView::gray(0.18);
        let outcome = MeteringLoop::new(&curves).run_frame(&mut view);
        assert!(matches!(outcome, MeteringOutcome::Converged { .. }));
        assert_eq!(view.state.exposure, 0.0);
    }

    #[test]
    fn test_adjusts_once_per_cycle() {
        let curves = ramp_curves();
        let mut view = TestView::gray(0.72);
        let outcome = MeteringLoop::new(&curves).run_frame(&mut view);
        match outcome {
            MeteringOutcome::Adjusted { from, to, .. } => {
                assert_eq!(from, 0.0);
                assert!((to + 0.4).abs() < 1e-9);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!((view.state.exposure + 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_closed_loop_converges() {
        // The frame stays the same; only exposure moves, as in a still scene.
        let curves = ramp_curves();
        let mut view = TestView::gray(0.72);
        view.mode = MeteringMode::FullWindow { grid: 5 };
        view.state.look = Look::HighContrast;
        let metering = MeteringLoop::new(&curves);

        let mut frames = 0;
        while metering.run_frame(&mut view).is_adjusted() {
            frames += 1;
            assert!(frames < 50, "did not converge");
        }
        assert!(view.state.exposure < -1.8 && view.state.exposure > -2.2);
    }
}
