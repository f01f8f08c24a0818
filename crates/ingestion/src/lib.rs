//! Series bookkeeping for the POC moving average engine.
//!
//! This crate handles:
//! - Bar timelines for the primary and volumetric series
//! - First-update-of-bar detection
//! - Price-level quantization

pub mod level_grid;
pub mod timeline;

pub use level_grid::LevelGrid;
pub use timeline::{Advance, BarTimeline};
