//! Composition state: the per-session configuration read every frame.
//!
//! One instance exists per compositor session. External controls mutate it
//! between ticks through the typed setters; the layout engine reads it at
//! the start of each tick. There is no internal locking: the render loop is
//! single-threaded and cooperative, so a mutation lands on the next tick.

use serde::{Deserialize, Serialize};

use crate::rect::{OutputRect, Rect, SourceRect};

/// Policy for mapping a source's native aspect ratio into a destination
/// rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    /// Letterbox: preserve the full frame, center on the short axis.
    #[default]
    Contain,
    /// Fill the destination, cropping overflow via clipping.
    Cover,
    /// Ignore aspect ratio and fill the destination exactly.
    Stretch,
}

/// Policy for partitioning the output surface between two sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Main picture fills the output; the other source floats bottom-right.
    #[default]
    PictureInPicture,
    /// Two equal columns separated by a gutter.
    SideBySide,
    /// Two equal rows separated by a gutter.
    StackedVertical,
}

/// The mutable composition configuration.
///
/// By default the display capture occupies the main picture and the camera
/// the overlay; `swapped` exchanges the two roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionState {
    layout_mode: LayoutMode,
    fit_mode: FitMode,
    swapped: bool,
    mirrored: bool,
    crop_region: Option<SourceRect>,
    output_width: u32,
    output_height: u32,
    aspect_width: u32,
    aspect_height: u32,
}

impl CompositionState {
    /// Create a state with the given initial surface width; the height is
    /// derived from the aspect ratio.
    pub fn new(surface_width: u32, aspect_width: u32, aspect_height: u32) -> Self {
        let aspect_width = aspect_width.max(1);
        let aspect_height = aspect_height.max(1);
        let output_width = surface_width.max(1);
        Self {
            layout_mode: LayoutMode::default(),
            fit_mode: FitMode::default(),
            swapped: false,
            mirrored: false,
            crop_region: None,
            output_width,
            output_height: derive_height(output_width, aspect_width, aspect_height),
            aspect_width,
            aspect_height,
        }
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.layout_mode
    }

    pub fn fit_mode(&self) -> FitMode {
        self.fit_mode
    }

    pub fn is_swapped(&self) -> bool {
        self.swapped
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    pub fn crop_region(&self) -> Option<SourceRect> {
        self.crop_region
    }

    pub fn output_width(&self) -> u32 {
        self.output_width
    }

    pub fn output_height(&self) -> u32 {
        self.output_height
    }

    /// The full output surface as a rectangle at the origin.
    pub fn output_rect(&self) -> OutputRect {
        Rect::at_origin(self.output_width as f64, self.output_height as f64)
    }

    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.layout_mode = mode;
    }

    pub fn set_fit_mode(&mut self, mode: FitMode) {
        self.fit_mode = mode;
    }

    /// Exchange main and overlay roles. Returns the new value.
    pub fn toggle_swap(&mut self) -> bool {
        self.swapped = !self.swapped;
        self.swapped
    }

    /// Toggle horizontal mirroring of the camera overlay. Returns the new
    /// value.
    pub fn toggle_mirror(&mut self) -> bool {
        self.mirrored = !self.mirrored;
        self.mirrored
    }

    pub fn set_crop_region(&mut self, region: SourceRect) {
        self.crop_region = Some(region);
    }

    pub fn clear_crop_region(&mut self) {
        self.crop_region = None;
    }

    /// Recompute output dimensions after the hosting container resized.
    ///
    /// The surface tracks the container's width; the height always follows
    /// the configured aspect ratio, so the container height only matters to
    /// the host's own letterboxing.
    pub fn on_container_resized(&mut self, new_width: u32, _new_height: u32) {
        self.output_width = new_width.max(1);
        self.output_height = derive_height(self.output_width, self.aspect_width, self.aspect_height);
    }
}

impl Default for CompositionState {
    fn default() -> Self {
        Self::new(1280, 16, 9)
    }
}

fn derive_height(width: u32, aspect_width: u32, aspect_height: u32) -> u32 {
    ((width as u64 * aspect_height as u64) / aspect_width as u64).max(1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sixteen_nine() {
        let state = CompositionState::default();
        assert_eq!(state.output_width(), 1280);
        assert_eq!(state.output_height(), 720);
        assert_eq!(state.layout_mode(), LayoutMode::PictureInPicture);
        assert_eq!(state.fit_mode(), FitMode::Contain);
    }

    #[test]
    fn test_resize_follows_aspect() {
        let mut state = CompositionState::default();
        state.on_container_resized(1920, 400);
        assert_eq!(state.output_width(), 1920);
        assert_eq!(state.output_height(), 1080);
    }

    #[test]
    fn test_resize_never_collapses_to_zero() {
        let mut state = CompositionState::default();
        state.on_container_resized(0, 0);
        assert_eq!(state.output_width(), 1);
        assert!(state.output_height() >= 1);
    }

    #[test]
    fn test_toggles() {
        let mut state = CompositionState::default();
        assert!(state.toggle_swap());
        assert!(!state.toggle_swap());
        assert!(state.toggle_mirror());
        assert!(state.is_mirrored());
    }

    #[test]
    fn test_crop_region_storage() {
        let mut state = CompositionState::default();
        assert!(state.crop_region().is_none());
        state.set_crop_region(Rect::new(10.0, 20.0, 300.0, 200.0));
        assert!(state.crop_region().is_some());
        state.clear_crop_region();
        assert!(state.crop_region().is_none());
    }

    #[test]
    fn test_snapshot_round_trips() {
        let mut state = CompositionState::new(1920, 16, 9);
        state.set_layout_mode(LayoutMode::SideBySide);
        state.toggle_mirror();
        let json = serde_json::to_string(&state).unwrap();
        let back: CompositionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
