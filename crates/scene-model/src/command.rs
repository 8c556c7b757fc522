//! Per-frame draw instructions.

use crate::rect::{OutputRect, SourceRect};
use crate::source::{SharedSource, SourceSlot};

/// One draw instruction produced by the layout engine for a single frame.
///
/// Commands are consumed by the render surface and never persisted; at most
/// two exist per frame (one per present source).
#[derive(Clone)]
pub struct DrawCommand {
    /// Which compositor input this command samples from.
    pub slot: SourceSlot,

    /// Handle to the source being drawn.
    pub source: SharedSource,

    /// Where the source lands on the output surface.
    pub dest: OutputRect,

    /// Sub-rectangle of the source to sample, in source pixels.
    /// `None` samples the full frame.
    pub src_crop: Option<SourceRect>,

    /// Horizontally flip the sampled rectangle before placing it at `dest`.
    pub mirror: bool,
}

impl std::fmt::Debug for DrawCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawCommand")
            .field("slot", &self.slot)
            .field(
                "source",
                &format_args!("{}x{}", self.source.width(), self.source.height()),
            )
            .field("dest", &self.dest)
            .field("src_crop", &self.src_crop)
            .field("mirror", &self.mirror)
            .finish()
    }
}
