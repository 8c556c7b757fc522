//! DuoCast Compositor Core
//!
//! The per-frame compositing brain:
//! - **Geometry:** aspect-ratio fit math and screen↔source coordinate mapping
//! - **Layout:** turns composition state plus two sources into draw commands
//! - **Crop:** the interactive crop-region state machine
//!
//! This crate is pure computation — no I/O, no platform dependencies.
//! All inputs are data; all outputs are data.

pub mod crop;
pub mod geometry;
pub mod layout;

pub use crop::CropRegionManager;
pub use layout::LayoutEngine;
