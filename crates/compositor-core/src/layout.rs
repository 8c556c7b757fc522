//! The per-frame layout engine.
//!
//! `compose` is a pure function of the composition state and the two
//! source handles: given identical inputs it produces identical draw
//! commands, with no memory of prior frames. At most two commands are
//! emitted per frame; a source that has not decoded a frame yet emits
//! none.

use duocast_scene_model::command::DrawCommand;
use duocast_scene_model::rect::{OutputRect, Rect};
use duocast_scene_model::source::{SharedSource, SourceSlot};
use duocast_scene_model::state::{CompositionState, FitMode, LayoutMode};
use serde::{Deserialize, Serialize};

use crate::geometry::{aspect_fit, fit_with_mode};

/// Layout geometry knobs, all expressed as fractions of the output extent
/// so the composition is resolution independent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Overlay width as a fraction of output width in picture-in-picture.
    pub pip_width_frac: f64,

    /// Margin between the overlay and the output edges, as a fraction of
    /// output width.
    pub pip_margin_frac: f64,

    /// Half-gutter between split panes, as a fraction of the split axis
    /// (output width for side-by-side, output height for stacked).
    pub gutter_frac: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pip_width_frac: 0.25,
            pip_margin_frac: 0.02,
            gutter_frac: 0.01,
        }
    }
}

impl LayoutConfig {
    /// Clamp every fraction to `[0, 1]`.
    pub fn sanitized(self) -> Self {
        let clamped = Self {
            pip_width_frac: self.pip_width_frac.clamp(0.0, 1.0),
            pip_margin_frac: self.pip_margin_frac.clamp(0.0, 1.0),
            gutter_frac: self.gutter_frac.clamp(0.0, 1.0),
        };
        if clamped != self {
            tracing::warn!(config = ?self, "Layout fractions out of range, clamping to [0, 1]");
        }
        clamped
    }
}

/// Produces the draw commands for one composed frame.
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create an engine with the given configuration (fractions clamped).
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    /// Create an engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(LayoutConfig::default())
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Compute the draw commands for the current frame.
    ///
    /// The display capture is the main picture by default; `swapped`
    /// exchanges the roles. When only one source is ready it fills the
    /// whole output under the selected fit mode; when none are ready the
    /// list is empty and the render loop halts.
    pub fn compose(
        &self,
        state: &CompositionState,
        primary: Option<&SharedSource>,
        secondary: Option<&SharedSource>,
    ) -> Vec<DrawCommand> {
        let output = state.output_rect();
        if output.is_empty() {
            return vec![];
        }

        let primary = primary.filter(|s| s.is_ready());
        let secondary = secondary.filter(|s| s.is_ready());

        match (primary, secondary) {
            (None, None) => vec![],
            (Some(source), None) => self
                .fill_output(state, SourceSlot::Primary, source, output)
                .into_iter()
                .collect(),
            (None, Some(source)) => self
                .fill_output(state, SourceSlot::Secondary, source, output)
                .into_iter()
                .collect(),
            (Some(primary), Some(secondary)) => {
                let (main_slot, main) = if state.is_swapped() {
                    (SourceSlot::Primary, primary)
                } else {
                    (SourceSlot::Secondary, secondary)
                };
                let (overlay_slot, overlay) = match main_slot {
                    SourceSlot::Primary => (SourceSlot::Secondary, secondary),
                    SourceSlot::Secondary => (SourceSlot::Primary, primary),
                };

                // Mirroring belongs to the camera in its overlay role; once
                // swapped, nothing is mirrored.
                let overlay_mirror = state.is_mirrored() && !state.is_swapped();

                let (main_dest, overlay_dest) = match state.layout_mode() {
                    LayoutMode::PictureInPicture => (
                        self.contain_fit(main, output),
                        self.pip_overlay_rect(output, overlay),
                    ),
                    LayoutMode::SideBySide => (
                        self.pane_fit(main, split_pane(output, Axis::Horizontal, 0, self.config.gutter_frac)),
                        self.pane_fit(overlay, split_pane(output, Axis::Horizontal, 1, self.config.gutter_frac)),
                    ),
                    LayoutMode::StackedVertical => (
                        self.pane_fit(main, split_pane(output, Axis::Vertical, 0, self.config.gutter_frac)),
                        self.pane_fit(overlay, split_pane(output, Axis::Vertical, 1, self.config.gutter_frac)),
                    ),
                };

                let mut commands = Vec::with_capacity(2);
                if let Some(dest) = main_dest {
                    commands.push(self.command(state, main_slot, main, dest, false));
                }
                if let Some(dest) = overlay_dest {
                    commands.push(self.command(state, overlay_slot, overlay, dest, overlay_mirror));
                }
                commands
            }
        }
    }

    /// Single-source fallback: the present source fills the whole output
    /// under the selected fit mode.
    fn fill_output(
        &self,
        state: &CompositionState,
        slot: SourceSlot,
        source: &SharedSource,
        output: OutputRect,
    ) -> Option<DrawCommand> {
        let dest = match fit_with_mode(
            source.width() as f64,
            source.height() as f64,
            output,
            state.fit_mode(),
        ) {
            Ok(dest) => dest,
            Err(e) => {
                tracing::warn!(slot = slot.label(), error = %e, "Skipping undrawable source");
                return None;
            }
        };
        let mirror = state.is_mirrored() && slot == SourceSlot::Primary;
        Some(self.command(state, slot, source, dest, mirror))
    }

    /// Letterbox a source centered into `dest`.
    fn contain_fit(&self, source: &SharedSource, dest: OutputRect) -> Option<OutputRect> {
        match fit_with_mode(
            source.width() as f64,
            source.height() as f64,
            dest,
            FitMode::Contain,
        ) {
            Ok(fitted) => Some(fitted),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undrawable main source");
                None
            }
        }
    }

    /// Overlay rectangle for picture-in-picture: a fixed fraction of the
    /// output width, aspect-preserved, anchored bottom-right with a margin.
    fn pip_overlay_rect(
        &self,
        output: OutputRect,
        overlay: &SharedSource,
    ) -> Option<OutputRect> {
        let (src_w, src_h) = (overlay.width() as f64, overlay.height() as f64);
        if src_w <= 0.0 || src_h <= 0.0 {
            tracing::warn!("Overlay source has degenerate dimensions, skipping");
            return None;
        }

        let pip_w = output.w * self.config.pip_width_frac;
        let pip_h = pip_w * (src_h / src_w);
        let margin = output.w * self.config.pip_margin_frac;
        Some(Rect::new(
            output.right() - pip_w - margin,
            output.bottom() - pip_h - margin,
            pip_w,
            pip_h,
        ))
    }

    /// Aspect-fit a source centered inside a split pane.
    fn pane_fit(&self, source: &SharedSource, pane: OutputRect) -> Option<OutputRect> {
        match aspect_fit(
            source.width() as f64,
            source.height() as f64,
            pane.w,
            pane.h,
        ) {
            Ok(size) => Some(size.centered_in(&pane)),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undrawable source in split pane");
                None
            }
        }
    }

    fn command(
        &self,
        state: &CompositionState,
        slot: SourceSlot,
        source: &SharedSource,
        dest: OutputRect,
        mirror: bool,
    ) -> DrawCommand {
        // The crop selects what part of the display capture is sampled;
        // the destination is untouched.
        let src_crop = match slot {
            SourceSlot::Secondary => state.crop_region(),
            SourceSlot::Primary => None,
        };
        DrawCommand {
            slot,
            source: source.clone(),
            dest,
            src_crop,
            mirror,
        }
    }
}

enum Axis {
    Horizontal,
    Vertical,
}

/// One of the two panes of a split layout, `index` 0 or 1, separated by a
/// gutter of `2 * gutter_frac` of the split axis.
fn split_pane(output: OutputRect, axis: Axis, index: usize, gutter_frac: f64) -> OutputRect {
    match axis {
        Axis::Horizontal => {
            let gutter = output.w * gutter_frac;
            let pane_w = output.w / 2.0 - gutter;
            let x = if index == 0 {
                output.x
            } else {
                output.x + output.w / 2.0 + gutter
            };
            Rect::new(x, output.y, pane_w, output.h)
        }
        Axis::Vertical => {
            let gutter = output.h * gutter_frac;
            let pane_h = output.h / 2.0 - gutter;
            let y = if index == 0 {
                output.y
            } else {
                output.y + output.h / 2.0 + gutter
            };
            Rect::new(output.x, y, output.w, pane_h)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duocast_scene_model::source::SyntheticSource;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{a} != {b}");
    }

    fn camera() -> SharedSource {
        SyntheticSource::ready(640, 480)
    }

    fn display() -> SharedSource {
        SyntheticSource::ready(1920, 1080)
    }

    #[test]
    fn test_pip_emits_main_full_and_overlay_quarter_width() {
        let engine = LayoutEngine::with_defaults();
        let state = CompositionState::default();
        let (camera, display) = (camera(), display());

        let commands = engine.compose(&state, Some(&camera), Some(&display));
        assert_eq!(commands.len(), 2);

        let main = &commands[0];
        assert_eq!(main.slot, SourceSlot::Secondary);
        assert_eq!(main.dest, state.output_rect());

        let overlay = &commands[1];
        assert_eq!(overlay.slot, SourceSlot::Primary);
        assert_close(overlay.dest.w, 0.25 * 1280.0);
        assert_close(overlay.dest.h, 320.0 * 480.0 / 640.0);
        let margin = 0.02 * 1280.0;
        assert_close(overlay.dest.right(), 1280.0 - margin);
        assert_close(overlay.dest.bottom(), 720.0 - margin);
    }

    #[test]
    fn test_swap_exchanges_main_and_overlay() {
        let engine = LayoutEngine::with_defaults();
        let mut state = CompositionState::default();
        state.toggle_swap();
        let (camera, display) = (camera(), display());

        let commands = engine.compose(&state, Some(&camera), Some(&display));
        assert_eq!(commands[0].slot, SourceSlot::Primary);
        assert_eq!(commands[1].slot, SourceSlot::Secondary);
    }

    #[test]
    fn test_side_by_side_centers_in_columns() {
        let engine = LayoutEngine::with_defaults();
        let mut state = CompositionState::default();
        state.set_layout_mode(LayoutMode::SideBySide);
        let (camera, display) = (camera(), display());

        let commands = engine.compose(&state, Some(&camera), Some(&display));
        assert_eq!(commands.len(), 2);

        // Column width 1280/2 - 12.8; the 16:9 display is width-limited.
        let left = &commands[0];
        assert_eq!(left.slot, SourceSlot::Secondary);
        assert_close(left.dest.x, 0.0);
        assert_close(left.dest.w, 627.2);
        assert_close(left.dest.h, 352.8);
        assert_close(left.dest.y, (720.0 - 352.8) / 2.0);

        // The 4:3 camera is width-limited too in a 627.2x720 column.
        let right = &commands[1];
        assert_eq!(right.slot, SourceSlot::Primary);
        assert_close(right.dest.x, 1280.0 / 2.0 + 12.8);
        assert_close(right.dest.w, 627.2);
        assert_close(right.dest.h, 470.4);
    }

    #[test]
    fn test_stacked_vertical_mirrors_side_by_side_geometry() {
        let engine = LayoutEngine::with_defaults();
        let mut state = CompositionState::default();
        state.set_layout_mode(LayoutMode::StackedVertical);
        let (camera, display) = (camera(), display());

        let commands = engine.compose(&state, Some(&camera), Some(&display));
        assert_eq!(commands.len(), 2);

        // Row height 720/2 - 7.2; the display is height-limited.
        let top = &commands[0];
        assert_close(top.dest.y, 0.0);
        assert_close(top.dest.h, 352.8);
        assert_close(top.dest.w, 1920.0 * (352.8 / 1080.0));

        let bottom = &commands[1];
        assert_close(bottom.dest.y, 720.0 / 2.0 + 7.2);
        assert_close(bottom.dest.h, 352.8);
    }

    #[test]
    fn test_single_ready_source_stretch_fills_output() {
        let engine = LayoutEngine::with_defaults();
        let mut state = CompositionState::default();
        state.set_fit_mode(FitMode::Stretch);
        let camera = camera();

        let commands = engine.compose(&state, Some(&camera), None);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].slot, SourceSlot::Primary);
        assert_eq!(commands[0].dest, state.output_rect());
    }

    #[test]
    fn test_pending_source_emits_no_command() {
        let engine = LayoutEngine::with_defaults();
        let state = CompositionState::default();
        let camera = camera();
        let pending: SharedSource = SyntheticSource::pending(1920, 1080);

        let commands = engine.compose(&state, Some(&camera), Some(&pending));
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].slot, SourceSlot::Primary);
    }

    #[test]
    fn test_no_ready_sources_returns_empty() {
        let engine = LayoutEngine::with_defaults();
        let state = CompositionState::default();
        assert!(engine.compose(&state, None, None).is_empty());

        let pending: SharedSource = SyntheticSource::pending(640, 480);
        assert!(engine.compose(&state, Some(&pending), None).is_empty());
    }

    #[test]
    fn test_crop_rides_on_the_display_command_only() {
        let engine = LayoutEngine::with_defaults();
        let mut state = CompositionState::default();
        let region = Rect::new(100.0, 50.0, 800.0, 600.0);
        state.set_crop_region(region);
        let (camera, display) = (camera(), display());

        let commands = engine.compose(&state, Some(&camera), Some(&display));
        let display_cmd = commands
            .iter()
            .find(|c| c.slot == SourceSlot::Secondary)
            .unwrap();
        assert_eq!(display_cmd.src_crop, Some(region));
        let camera_cmd = commands
            .iter()
            .find(|c| c.slot == SourceSlot::Primary)
            .unwrap();
        assert!(camera_cmd.src_crop.is_none());

        // The crop stays with the display source even when it moves to the
        // overlay role.
        state.toggle_swap();
        let commands = engine.compose(&state, Some(&camera), Some(&display));
        let display_cmd = commands
            .iter()
            .find(|c| c.slot == SourceSlot::Secondary)
            .unwrap();
        assert_eq!(display_cmd.src_crop, Some(region));
    }

    #[test]
    fn test_crop_never_moves_the_destination() {
        let engine = LayoutEngine::with_defaults();
        let mut state = CompositionState::default();
        let (camera, display) = (camera(), display());

        let before = engine.compose(&state, Some(&camera), Some(&display));
        state.set_crop_region(Rect::new(0.0, 0.0, 400.0, 300.0));
        let after = engine.compose(&state, Some(&camera), Some(&display));
        assert_eq!(before[0].dest, after[0].dest);
        assert_eq!(before[1].dest, after[1].dest);
    }

    #[test]
    fn test_mirror_applies_to_camera_overlay_only() {
        let engine = LayoutEngine::with_defaults();
        let mut state = CompositionState::default();
        state.toggle_mirror();
        let (camera, display) = (camera(), display());

        let commands = engine.compose(&state, Some(&camera), Some(&display));
        let camera_cmd = commands
            .iter()
            .find(|c| c.slot == SourceSlot::Primary)
            .unwrap();
        assert!(camera_cmd.mirror);
        let display_cmd = commands
            .iter()
            .find(|c| c.slot == SourceSlot::Secondary)
            .unwrap();
        assert!(!display_cmd.mirror);
    }

    #[test]
    fn test_mirror_is_dropped_entirely_once_swapped() {
        // Mirroring follows the camera in its overlay role; after a swap
        // the camera is the main picture and nothing is mirrored. This
        // pins the asymmetry on purpose.
        let engine = LayoutEngine::with_defaults();
        let mut state = CompositionState::default();
        state.toggle_mirror();
        state.toggle_swap();
        let (camera, display) = (camera(), display());

        let commands = engine.compose(&state, Some(&camera), Some(&display));
        assert_eq!(commands.len(), 2);
        assert!(commands.iter().all(|c| !c.mirror));
    }

    #[test]
    fn test_single_camera_fallback_respects_mirror() {
        let engine = LayoutEngine::with_defaults();
        let mut state = CompositionState::default();
        state.toggle_mirror();
        let camera = camera();

        let commands = engine.compose(&state, Some(&camera), None);
        assert!(commands[0].mirror);

        let display = display();
        let commands = engine.compose(&state, None, Some(&display));
        assert!(!commands[0].mirror);
    }

    #[test]
    fn test_config_fractions_are_clamped() {
        let engine = LayoutEngine::new(LayoutConfig {
            pip_width_frac: 3.0,
            pip_margin_frac: -0.5,
            gutter_frac: 0.01,
        });
        assert_eq!(engine.config().pip_width_frac, 1.0);
        assert_eq!(engine.config().pip_margin_frac, 0.0);
    }
}
