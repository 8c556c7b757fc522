//! Print the draw commands the layout engine emits for one frame.

use anyhow::Context;
use duocast_compositor_core::layout::LayoutEngine;
use duocast_scene_model::command::DrawCommand;
use duocast_scene_model::source::{SharedSource, SyntheticSource};
use duocast_scene_model::state::{CompositionState, FitMode, LayoutMode};
use serde::Serialize;

/// JSON-friendly view of a draw command.
#[derive(Serialize)]
struct CommandSummary {
    slot: &'static str,
    dest: [f64; 4],
    src_crop: Option<[f64; 4]>,
    mirror: bool,
}

impl From<&DrawCommand> for CommandSummary {
    fn from(command: &DrawCommand) -> Self {
        Self {
            slot: command.slot.label(),
            dest: [
                command.dest.x,
                command.dest.y,
                command.dest.w,
                command.dest.h,
            ],
            src_crop: command
                .src_crop
                .map(|c| [c.x, c.y, c.w, c.h]),
            mirror: command.mirror,
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    width: u32,
    layout: LayoutMode,
    fit: FitMode,
    swap: bool,
    mirror: bool,
    camera: &str,
    display: &str,
    json: bool,
) -> anyhow::Result<()> {
    let (cam_w, cam_h) = parse_dims(camera)?;
    let (disp_w, disp_h) = parse_dims(display)?;

    let mut state = CompositionState::new(width, 16, 9);
    state.set_layout_mode(layout);
    state.set_fit_mode(fit);
    if swap {
        state.toggle_swap();
    }
    if mirror {
        state.toggle_mirror();
    }

    let camera: SharedSource = SyntheticSource::ready(cam_w, cam_h);
    let display: SharedSource = SyntheticSource::ready(disp_w, disp_h);

    let engine = LayoutEngine::with_defaults();
    let commands = engine.compose(&state, Some(&camera), Some(&display));

    if json {
        let summaries: Vec<CommandSummary> = commands.iter().map(Into::into).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!(
        "Output surface: {}x{}",
        state.output_width(),
        state.output_height()
    );
    println!("Commands: {}", commands.len());
    for command in &commands {
        let crop = match command.src_crop {
            Some(c) => format!("{:.0},{:.0} {:.0}x{:.0}", c.x, c.y, c.w, c.h),
            None => "full frame".to_string(),
        };
        println!(
            "  {:<8} dest=({:.1}, {:.1}) {:.1}x{:.1}  sample={}  mirror={}",
            command.slot.label(),
            command.dest.x,
            command.dest.y,
            command.dest.w,
            command.dest.h,
            crop,
            command.mirror,
        );
    }

    Ok(())
}

fn parse_dims(spec: &str) -> anyhow::Result<(u32, u32)> {
    let (w, h) = spec
        .split_once('x')
        .with_context(|| format!("Expected WIDTHxHEIGHT, got '{spec}'"))?;
    Ok((
        w.parse().with_context(|| format!("Bad width in '{spec}'"))?,
        h.parse().with_context(|| format!("Bad height in '{spec}'"))?,
    ))
}
