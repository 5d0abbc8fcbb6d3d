//! Meters a still image and runs the auto exposure loop on it until it settles.
//!
//! Usage: cargo run --example still_metering -- <image> [spot|full|center]

use realcam::*;

fn main() -> Result<()> {
    init()?;

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: still_metering <image> [spot|full|center]");
        return Ok(());
    };
    let mode = match args.next().as_deref() {
        Some("spot") => MeteringMode::CenterSpot,
        Some("full") => MeteringMode::FullWindow { grid: 7 },
        _ => MeteringMode::CenterWeighed { circles: 4 },
    };

    let frame = ImageFrame::open(&path)?;
    match average_luminance(mode, &frame) {
        Some(lum) => println!("{} luminance: {lum:.4}", mode.name()),
        None => println!("{}: no signal", mode.name()),
    }

    let metering = MeteringLoop::new(tone_curves()?);
    let mut view = StillView::new(frame, mode, ExposureState::default());
    for frame_index in 1..=100 {
        match metering.run_frame(&mut view) {
            MeteringOutcome::Adjusted { to, .. } => {
                println!("frame {frame_index}: exposure {to:+.3}");
            }
            outcome => {
                println!("settled after {} frames: {outcome:?}", frame_index - 1);
                break;
            }
        }
    }
    println!("final exposure: {:+.3} stops", view.state().exposure);
    Ok(())
}
