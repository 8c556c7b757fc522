//! DuoCast CLI — drive the compositor against synthetic sources.
//!
//! Usage:
//!   duocast simulate [OPTIONS]   Run a full session and print stats
//!   duocast layout [OPTIONS]     Print the draw commands for one frame
//!   duocast check                Show the resolved configuration

use clap::{Parser, Subcommand, ValueEnum};
use duocast_scene_model::state::{FitMode, LayoutMode};

mod commands;

#[derive(Parser)]
#[command(
    name = "duocast",
    about = "Two-source video compositor with live layout control",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Layout mode names accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutArg {
    Pip,
    SideBySide,
    Stacked,
}

impl From<LayoutArg> for LayoutMode {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Pip => LayoutMode::PictureInPicture,
            LayoutArg::SideBySide => LayoutMode::SideBySide,
            LayoutArg::Stacked => LayoutMode::StackedVertical,
        }
    }
}

/// Fit mode names accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FitArg {
    Contain,
    Cover,
    Stretch,
}

impl From<FitArg> for FitMode {
    fn from(arg: FitArg) -> Self {
        match arg {
            FitArg::Contain => FitMode::Contain,
            FitArg::Cover => FitMode::Cover,
            FitArg::Stretch => FitMode::Stretch,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a complete session against synthetic sources
    Simulate {
        /// Number of frames to compose
        #[arg(long, default_value = "90")]
        frames: u64,

        /// Composed frame rate
        #[arg(long, default_value = "30")]
        fps: u32,

        /// Host display callback rate
        #[arg(long, default_value = "60")]
        refresh_hz: u32,

        /// Output surface width (height follows 16:9)
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Layout mode
        #[arg(long, value_enum, default_value = "pip")]
        layout: LayoutArg,

        /// Fit mode for the single-source fallback
        #[arg(long, value_enum, default_value = "contain")]
        fit: FitArg,

        /// Exchange main and overlay roles
        #[arg(long)]
        swap: bool,

        /// Mirror the camera overlay
        #[arg(long)]
        mirror: bool,

        /// Confirm a centered crop on the display source before rendering
        #[arg(long)]
        crop: bool,

        /// Run without a camera source
        #[arg(long)]
        no_camera: bool,

        /// Run without a display source
        #[arg(long)]
        no_display: bool,
    },

    /// Print the draw commands the layout engine emits for one frame
    Layout {
        /// Output surface width (height follows 16:9)
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Layout mode
        #[arg(long, value_enum, default_value = "pip")]
        layout: LayoutArg,

        /// Fit mode for the single-source fallback
        #[arg(long, value_enum, default_value = "contain")]
        fit: FitArg,

        /// Exchange main and overlay roles
        #[arg(long)]
        swap: bool,

        /// Mirror the camera overlay
        #[arg(long)]
        mirror: bool,

        /// Camera dimensions as WIDTHxHEIGHT
        #[arg(long, default_value = "640x480")]
        camera: String,

        /// Display dimensions as WIDTHxHEIGHT
        #[arg(long, default_value = "1920x1080")]
        display: String,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved configuration
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    duocast_common::logging::init_logging(&duocast_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Simulate {
            frames,
            fps,
            refresh_hz,
            width,
            layout,
            fit,
            swap,
            mirror,
            crop,
            no_camera,
            no_display,
        } => {
            commands::simulate::run(commands::simulate::SimulateOptions {
                frames,
                fps,
                refresh_hz,
                width,
                layout: layout.into(),
                fit: fit.into(),
                swap,
                mirror,
                crop,
                camera: !no_camera,
                display: !no_display,
            })
            .await
        }
        Commands::Layout {
            width,
            layout,
            fit,
            swap,
            mirror,
            camera,
            display,
            json,
        } => commands::layout::run(
            width,
            layout.into(),
            fit.into(),
            swap,
            mirror,
            &camera,
            &display,
            json,
        ),
        Commands::Check => commands::check::run(),
    }
}
