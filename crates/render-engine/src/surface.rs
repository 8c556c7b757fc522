//! Render surface abstraction.
//!
//! The engine never touches pixels directly; it issues clear and draw
//! calls against whatever surface the host provides (a GPU canvas, an
//! encoder input, or the tracing surface used by simulations and tests).

use duocast_common::error::DuocastResult;
use duocast_scene_model::command::DrawCommand;

/// The fixed-size 2D canvas the engine draws into each tick.
///
/// Implementations are expected to clip draws to their own bounds; the
/// `Cover` fit mode deliberately produces destinations larger than the
/// surface.
pub trait RenderSurface {
    /// Resize the surface. Called between ticks only.
    fn resize(&mut self, width: u32, height: u32);

    /// Fill the whole surface with an opaque color.
    fn clear(&mut self, rgba: [u8; 4]);

    /// Execute one draw command: sample the (possibly cropped, possibly
    /// mirrored) source rectangle and place it at the destination.
    fn draw(&mut self, command: &DrawCommand) -> DuocastResult<()>;
}

/// A surface that records the commands issued against it instead of
/// rasterizing. Backs the CLI simulation and the engine tests.
#[derive(Debug, Default)]
pub struct TraceSurface {
    width: u32,
    height: u32,
    clears: u64,
    draws: u64,
    frame: Vec<DrawCommand>,
}

impl TraceSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of clears observed (one per tick).
    pub fn clears(&self) -> u64 {
        self.clears
    }

    /// Total draw commands executed across the session.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// The commands drawn since the last clear.
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.frame
    }
}

impl RenderSurface for TraceSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self, _rgba: [u8; 4]) {
        self.clears += 1;
        self.frame.clear();
    }

    fn draw(&mut self, command: &DrawCommand) -> DuocastResult<()> {
        self.draws += 1;
        self.frame.push(command.clone());
        Ok(())
    }
}
