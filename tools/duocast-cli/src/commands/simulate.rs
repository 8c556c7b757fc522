//! Run a complete compositor session against synthetic sources.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use duocast_render_engine::session::{drive, CompositorSession, SessionConfig};
use duocast_render_engine::surface::TraceSurface;
use duocast_scene_model::rect::Rect;
use duocast_scene_model::source::SyntheticSource;
use duocast_scene_model::state::{FitMode, LayoutMode};

pub struct SimulateOptions {
    pub frames: u64,
    pub fps: u32,
    pub refresh_hz: u32,
    pub width: u32,
    pub layout: LayoutMode,
    pub fit: FitMode,
    pub swap: bool,
    pub mirror: bool,
    pub crop: bool,
    pub camera: bool,
    pub display: bool,
}

/// A placeholder stream handle standing in for the real capture stream
/// sinks would consume.
struct SimulatedStream;

pub async fn run(options: SimulateOptions) -> anyhow::Result<()> {
    println!(
        "Simulating {} frames at {} fps ({}Hz host refresh)...",
        options.frames, options.fps, options.refresh_hz
    );

    let config = SessionConfig {
        surface_width: options.width,
        fps: options.fps,
        ..Default::default()
    };
    let surface = TraceSurface::new(0, 0);
    let mut session = CompositorSession::new(config, surface, || SimulatedStream);

    if options.camera {
        session.attach_primary(SyntheticSource::ready(640, 480));
    }
    if options.display {
        session.attach_secondary(SyntheticSource::ready(1920, 1080));
    }
    if !session.is_running() {
        println!("No sources attached; nothing to compose.");
        return Ok(());
    }

    session.set_layout_mode(options.layout);
    session.set_fit_mode(options.fit);
    if options.swap {
        session.toggle_swap();
    }
    if options.mirror {
        session.toggle_mirror();
    }

    if options.crop {
        // Drag a centered rectangle over the display preview and confirm
        // it, as the interactive UI would.
        let preview = Rect::new(
            0.0,
            0.0,
            session.composition().output_width() as f64,
            session.composition().output_height() as f64,
        );
        let seed = session.begin_crop(preview)?;
        session.adjust_crop(seed)?;
        let region = session.confirm_crop()?;
        println!(
            "  Crop confirmed: {:.0}x{:.0} at ({:.0}, {:.0}) in display pixels",
            region.w, region.h, region.x, region.y
        );
    }

    let stop = Arc::new(AtomicBool::new(false));
    let stats = drive(
        &mut session,
        options.refresh_hz,
        stop,
        Some(options.frames),
    )
    .await;

    // Detaching everything makes the loop observe an empty scene and halt,
    // the same way real captures end.
    session.detach_primary();
    session.detach_secondary();
    session.tick();

    println!();
    println!("Session complete:");
    println!("  frames rendered:  {}", stats.frames_rendered);
    println!("  commands drawn:   {}", stats.commands_drawn);
    println!("  commands skipped: {}", stats.commands_skipped);
    println!("  publishes:        {}", stats.publishes);
    println!("  skip rate:        {:.2}%", stats.skip_rate());
    println!(
        "  loop running:     {}",
        if session.is_running() { "yes" } else { "no" }
    );

    Ok(())
}
