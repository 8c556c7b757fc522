//! Show the resolved configuration.

use duocast_common::config::AppConfig;

pub fn run() -> anyhow::Result<()> {
    println!("DuoCast Configuration");
    println!("{}", "=".repeat(50));

    let config = AppConfig::load();
    println!(
        "[OK] Output: {}:{} aspect, {}px wide, {} fps ({}Hz refresh)",
        config.output.aspect_width,
        config.output.aspect_height,
        config.output.surface_width,
        config.output.fps,
        config.output.refresh_hz,
    );
    println!(
        "[OK] Background: rgba({}, {}, {}, {})",
        config.output.background_rgba[0],
        config.output.background_rgba[1],
        config.output.background_rgba[2],
        config.output.background_rgba[3],
    );
    println!(
        "[OK] Layout: pip width {:.0}%, pip margin {:.0}%, gutter {:.0}%",
        config.layout.pip_width_frac * 100.0,
        config.layout.pip_margin_frac * 100.0,
        config.layout.gutter_frac * 100.0,
    );
    println!(
        "[OK] Logging: level '{}', json={}",
        config.logging.level, config.logging.json
    );

    Ok(())
}
