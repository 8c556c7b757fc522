//! Pins the composed geometry for a reference scene across every layout
//! mode, so refactors of the fit math cannot silently move pixels.

use duocast_compositor_core::layout::LayoutEngine;
use duocast_scene_model::command::DrawCommand;
use duocast_scene_model::rect::Rect;
use duocast_scene_model::source::{SharedSource, SourceSlot, SyntheticSource};
use duocast_scene_model::state::{CompositionState, LayoutMode};

fn reference_sources() -> (SharedSource, SharedSource) {
    // 4:3 camera, 16:9 display, composed onto a 1280x720 surface.
    (
        SyntheticSource::ready(640, 480),
        SyntheticSource::ready(1920, 1080),
    )
}

fn signature(mode: &str, commands: &[DrawCommand]) -> Vec<String> {
    commands
        .iter()
        .map(|c| {
            format!(
                "{mode}|{}|{:.2},{:.2},{:.2},{:.2}|crop={}|mirror={}",
                c.slot.label(),
                c.dest.x,
                c.dest.y,
                c.dest.w,
                c.dest.h,
                c.src_crop.is_some(),
                c.mirror,
            )
        })
        .collect()
}

#[test]
fn reference_scene_geometry_is_stable() {
    let engine = LayoutEngine::with_defaults();
    let mut state = CompositionState::default();
    let (camera, display) = reference_sources();

    let mut lines = Vec::new();
    for (name, mode) in [
        ("pip", LayoutMode::PictureInPicture),
        ("side_by_side", LayoutMode::SideBySide),
        ("stacked", LayoutMode::StackedVertical),
    ] {
        state.set_layout_mode(mode);
        let commands = engine.compose(&state, Some(&camera), Some(&display));
        lines.extend(signature(name, &commands));
    }

    assert_eq!(
        lines,
        vec![
            "pip|display|0.00,0.00,1280.00,720.00|crop=false|mirror=false",
            "pip|camera|934.40,454.40,320.00,240.00|crop=false|mirror=false",
            "side_by_side|display|0.00,183.60,627.20,352.80|crop=false|mirror=false",
            "side_by_side|camera|652.80,124.80,627.20,470.40|crop=false|mirror=false",
            "stacked|display|326.40,0.00,627.20,352.80|crop=false|mirror=false",
            "stacked|camera|404.80,367.20,470.40,352.80|crop=false|mirror=false",
        ]
    );
}

#[test]
fn mirror_and_crop_ride_the_right_commands() {
    let engine = LayoutEngine::with_defaults();
    let mut state = CompositionState::default();
    state.toggle_mirror();
    state.set_crop_region(Rect::new(480.0, 270.0, 960.0, 540.0));
    let (camera, display) = reference_sources();

    let commands = engine.compose(&state, Some(&camera), Some(&display));
    let camera_cmd = commands
        .iter()
        .find(|c| c.slot == SourceSlot::Primary)
        .unwrap();
    let display_cmd = commands
        .iter()
        .find(|c| c.slot == SourceSlot::Secondary)
        .unwrap();

    assert!(camera_cmd.mirror && camera_cmd.src_crop.is_none());
    assert!(!display_cmd.mirror && display_cmd.src_crop.is_some());

    // Swapping moves the camera to the main picture and drops mirroring;
    // the crop stays bound to the display source.
    state.toggle_swap();
    let commands = engine.compose(&state, Some(&camera), Some(&display));
    assert!(commands.iter().all(|c| !c.mirror));
    let display_cmd = commands
        .iter()
        .find(|c| c.slot == SourceSlot::Secondary)
        .unwrap();
    assert!(display_cmd.src_crop.is_some());
}
