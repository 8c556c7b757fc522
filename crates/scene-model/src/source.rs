//! Frame-source handles.
//!
//! A frame source is a live, continuously updating 2D image owned by an
//! external acquisition layer (camera capture, display capture). The
//! compositor only ever reads dimensions and readiness; pixel transport
//! is the render surface's concern.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A live video source with known dimensions and a readiness flag.
///
/// `is_ready` turns true once the first frame has been decoded; a source
/// that is attached but not yet ready contributes nothing to a frame.
pub trait FrameSource {
    /// Native frame width in pixels.
    fn width(&self) -> u32;

    /// Native frame height in pixels.
    fn height(&self) -> u32;

    /// Whether the source has decoded at least one frame.
    fn is_ready(&self) -> bool;
}

/// Non-owning handle to a frame source. The acquisition layer owns the
/// source; the compositor drops its handle on detach.
pub type SharedSource = Arc<dyn FrameSource + Send + Sync>;

/// Which of the two compositor inputs a source occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSlot {
    /// The local capture device (camera).
    Primary,
    /// The display capture. Conceptually the main picture by default,
    /// and the only croppable source.
    Secondary,
}

impl SourceSlot {
    /// Human-readable label for logs and errors.
    pub fn label(&self) -> &'static str {
        match self {
            SourceSlot::Primary => "camera",
            SourceSlot::Secondary => "display",
        }
    }

    /// The other slot.
    pub fn other(&self) -> SourceSlot {
        match self {
            SourceSlot::Primary => SourceSlot::Secondary,
            SourceSlot::Secondary => SourceSlot::Primary,
        }
    }
}

/// A stand-in frame source with fixed dimensions and togglable readiness,
/// used by simulations and tests.
#[derive(Debug)]
pub struct SyntheticSource {
    width: u32,
    height: u32,
    ready: AtomicBool,
}

impl SyntheticSource {
    /// Create a source that is immediately ready.
    pub fn ready(width: u32, height: u32) -> Arc<Self> {
        Arc::new(Self {
            width,
            height,
            ready: AtomicBool::new(true),
        })
    }

    /// Create a source that has not decoded a frame yet.
    pub fn pending(width: u32, height: u32) -> Arc<Self> {
        Arc::new(Self {
            width,
            height,
            ready: AtomicBool::new(false),
        })
    }

    /// Flip the readiness flag, simulating first-frame arrival or loss.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }
}

impl FrameSource for SyntheticSource {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_source_readiness() {
        let source = SyntheticSource::pending(1920, 1080);
        assert!(!source.is_ready());
        source.set_ready(true);
        assert!(source.is_ready());
        assert_eq!(source.width(), 1920);
    }

    #[test]
    fn test_slot_labels() {
        assert_eq!(SourceSlot::Primary.label(), "camera");
        assert_eq!(SourceSlot::Secondary.other(), SourceSlot::Primary);
    }
}
