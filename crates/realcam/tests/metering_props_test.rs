//! Property tests for metering still frames.
//!
//! These build their own tone curves and never touch the global table.

use proptest::prelude::*;
use realcam::*;

fn valid_mode() -> impl Strategy<Value = MeteringMode> {
    prop_oneof![
        Just(MeteringMode::CenterSpot),
        (2u32..=20).prop_map(|grid| MeteringMode::FullWindow { grid }),
        (2u32..=20).prop_map(|circles| MeteringMode::CenterWeighed { circles }),
    ]
}

fn out_of_range_mode() -> impl Strategy<Value = MeteringMode> {
    prop_oneof![
        (0u32..2).prop_map(|grid| MeteringMode::FullWindow { grid }),
        (21u32..).prop_map(|grid| MeteringMode::FullWindow { grid }),
        (0u32..2).prop_map(|circles| MeteringMode::CenterWeighed { circles }),
        (21u32..).prop_map(|circles| MeteringMode::CenterWeighed { circles }),
    ]
}

fn ramp_curves() -> ToneCurves {
    ToneCurves::from_fn(|look| FilmicCurve::from_fn(look, |t| t))
}

proptest! {
    #[test]
    fn uniform_frame_meters_its_level(
        mode in valid_mode(),
        width in 1u32..160,
        height in 1u32..160,
        level in 0.001f64..4.0,
    ) {
        let frame = ImageFrame::uniform(width, height, DVec3::splat(level));
        let avg = average_luminance(mode, &frame).unwrap();
        prop_assert!((avg - level).abs() < 1e-5 * level.max(1.0), "{avg} vs {level}");
    }

    #[test]
    fn frame_reads_use_bottom_left_origin(
        width in 1u32..64,
        height in 1u32..64,
        x in 0u32..64,
        y in 0u32..64,
    ) {
        let frame =
            ImageFrame::from_fn(width, height, |x, y| DVec3::new(f64::from(x), f64::from(y), 0.0));
        let expected = DVec3::new(f64::from(x.min(width - 1)), f64::from(y.min(height - 1)), 0.0);
        prop_assert_eq!(frame.read_pixel(x, y), expected);
    }

    #[test]
    fn out_of_range_mode_leaves_exposure_alone(
        mode in out_of_range_mode(),
        exposure in -3.0f64..3.0,
    ) {
        let curves = ramp_curves();
        let mut view = StillView::new(
            ImageFrame::uniform(32, 24, DVec3::splat(0.72)),
            mode,
            ExposureState::new(exposure, Look::MediumContrast),
        );
        let outcome = MeteringLoop::new(&curves).run_frame(&mut view);
        prop_assert_eq!(outcome, MeteringOutcome::NoSignal);
        prop_assert_eq!(view.state().exposure, exposure);
    }
}
