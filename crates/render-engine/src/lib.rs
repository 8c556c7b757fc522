//! DuoCast Render Engine
//!
//! The continuous render loop that turns composition state and live
//! sources into a published output stream, one tick at a time.
//!
//! # Tick Architecture
//!
//! ```text
//! host display callback ──▶ CompositorSession::maybe_tick
//!                                     │
//!                 ┌───────────────────┤
//!                 ▼                   ▼
//!          CompositionState     LayoutEngine ──▶ DrawCommand[]
//!                 │                   │
//!                 ▼                   ▼
//!          RenderSurface.clear  RenderSurface.draw (per command)
//!                                     │
//!                                     ▼
//!                          StreamPublisher.publish ──▶ sinks
//! ```
//!
//! The loop is single-threaded and cooperative: external controls mutate
//! state between ticks, and each tick reads one consistent snapshot.

pub mod session;
pub mod stream;
pub mod surface;

pub use session::*;
pub use stream::StreamPublisher;
pub use surface::{RenderSurface, TraceSurface};
