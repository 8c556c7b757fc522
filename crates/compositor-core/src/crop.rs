//! Interactive crop-region state machine for the display capture.
//!
//! The user drags a rectangle over the on-screen preview of the display
//! source; on confirm it is converted to source pixels and handed to the
//! layout engine. Only the display capture is croppable.
//!
//! State machine: `Idle → Adjusting → Confirmed`, with `undo` returning to
//! `Idle` and `cancel` falling back to whatever was active before.

use duocast_common::error::{DuocastError, DuocastResult};
use duocast_scene_model::rect::{Rect, ScreenRect, SourceRect};
use serde::{Deserialize, Serialize};

use crate::geometry::map_screen_rect_to_source;

/// Where the crop interaction currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropState {
    /// No crop interaction and no active region.
    #[default]
    Idle,
    /// The user is dragging a candidate rectangle.
    Adjusting,
    /// A crop region is active on the display source.
    Confirmed,
}

impl CropState {
    fn label(&self) -> &'static str {
        match self {
            CropState::Idle => "idle",
            CropState::Adjusting => "adjusting",
            CropState::Confirmed => "confirmed",
        }
    }
}

/// Everything the manager needs to know about the display source at the
/// moment an interaction starts: where its preview is rendered on screen,
/// and its native dimensions.
#[derive(Debug, Clone, Copy)]
pub struct CropTarget {
    /// Where the source preview is rendered inside its container
    /// (aspect-fit plus centering), in screen pixels.
    pub display_rect: ScreenRect,

    /// Native source width in pixels.
    pub source_width: u32,

    /// Native source height in pixels.
    pub source_height: u32,
}

/// Manages the user-adjustable crop rectangle and its conversion to
/// source space.
#[derive(Debug, Default)]
pub struct CropRegionManager {
    state: CropState,
    target: Option<CropTarget>,
    draft: Option<ScreenRect>,
    active: Option<SourceRect>,
}

impl CropRegionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current interaction state.
    pub fn state(&self) -> CropState {
        self.state
    }

    /// The confirmed crop region, if any, in source pixels.
    pub fn active_region(&self) -> Option<SourceRect> {
        self.active
    }

    /// The in-progress rectangle, if the user is mid-adjustment.
    pub fn draft(&self) -> Option<ScreenRect> {
        self.draft
    }

    /// Start a crop interaction over the display source.
    ///
    /// `target` is `None` when the display source is absent or has not
    /// decoded a frame yet. The seeded rectangle covers 50% of the
    /// displayed source area, centered.
    pub fn begin(&mut self, target: Option<CropTarget>) -> DuocastResult<ScreenRect> {
        if self.state() == CropState::Adjusting {
            return Err(self.transition_error("begin"));
        }
        let target = target
            .filter(|t| t.source_width > 0 && t.source_height > 0)
            .ok_or_else(|| DuocastError::no_source("display"))?;

        let display = target.display_rect;
        let seed: ScreenRect = Rect::new(
            display.x + display.w / 4.0,
            display.y + display.h / 4.0,
            display.w / 2.0,
            display.h / 2.0,
        );

        self.target = Some(target);
        self.draft = Some(seed);
        self.set_state(CropState::Adjusting);
        Ok(seed)
    }

    /// Store the latest user-dragged rectangle, clamped to the displayed
    /// source bounds. Returns the clamped rectangle.
    pub fn adjust(&mut self, rect: ScreenRect) -> DuocastResult<ScreenRect> {
        let Some(target) = self.target else {
            return Err(self.transition_error("adjust"));
        };
        if self.state() != CropState::Adjusting {
            return Err(self.transition_error("adjust"));
        }
        let clamped = rect.clamped_within(&target.display_rect);
        self.draft = Some(clamped);
        Ok(clamped)
    }

    /// Convert the current rectangle to source pixels and make it the
    /// active crop region.
    pub fn confirm(&mut self) -> DuocastResult<SourceRect> {
        let (Some(target), Some(draft)) = (self.target, self.draft) else {
            return Err(self.transition_error("confirm"));
        };
        if self.state() != CropState::Adjusting {
            return Err(self.transition_error("confirm"));
        }

        let region = map_screen_rect_to_source(
            draft,
            target.display_rect,
            target.source_width as f64,
            target.source_height as f64,
        )?;

        self.active = Some(region);
        self.draft = None;
        self.set_state(CropState::Confirmed);
        Ok(region)
    }

    /// Discard the in-progress rectangle without touching the active
    /// region.
    pub fn cancel(&mut self) -> DuocastResult<()> {
        if self.state() != CropState::Adjusting {
            return Err(self.transition_error("cancel"));
        }
        self.draft = None;
        let next = if self.active.is_some() {
            CropState::Confirmed
        } else {
            CropState::Idle
        };
        self.set_state(next);
        Ok(())
    }

    /// Clear the active crop region.
    pub fn undo(&mut self) -> DuocastResult<()> {
        if self.state() != CropState::Confirmed {
            return Err(self.transition_error("undo"));
        }
        self.active = None;
        self.target = None;
        self.set_state(CropState::Idle);
        Ok(())
    }

    /// The display source went away; a crop bound to it is meaningless.
    /// Forces `Idle` and clears everything.
    pub fn on_source_detached(&mut self) {
        if self.state() != CropState::Idle {
            tracing::debug!(from = self.state().label(), "Display source detached, resetting crop");
        }
        self.target = None;
        self.draft = None;
        self.active = None;
        self.set_state(CropState::Idle);
    }

    fn set_state(&mut self, next: CropState) {
        let from = self.state();
        if from != next {
            tracing::debug!(from = from.label(), to = next.label(), "Crop transition");
        }
        self.state = next;
    }

    fn transition_error(&self, attempted: &str) -> DuocastError {
        DuocastError::invalid_transition(self.state().label(), attempted)
    }
}
