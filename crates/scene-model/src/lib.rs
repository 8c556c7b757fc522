//! DuoCast Scene Model
//!
//! Defines the core data contracts for the compositor:
//! - **Rectangles:** space-tagged geometry primitives (screen, source, output)
//! - **Sources:** live frame-source handles with readiness
//! - **State:** the per-session composition configuration
//! - **Commands:** per-frame draw instructions consumed by the render surface
//!
//! Every rectangle carries its coordinate space in the type. Conversions
//! between spaces go through `duocast-compositor-core::geometry`, never
//! through ad hoc arithmetic.

pub mod command;
pub mod rect;
pub mod source;
pub mod state;

pub use command::*;
pub use rect::*;
pub use source::*;
pub use state::*;
