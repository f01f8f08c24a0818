//! Feature computation for the POC moving average engine.
//!
//! This crate handles:
//! - Per-bar volume profiles
//! - Point of Control extraction
//! - Carry-forward of the latest POC
//! - Simple moving average smoothing
//! - Synchronization of the primary and volumetric series

pub mod carry;
pub mod engine;
pub mod poc;
pub mod profile;
pub mod series;
pub mod sma;

pub use carry::CarryForward;
pub use engine::{ControllerState, SessionStats, SyncController};
pub use poc::PocExtractor;
pub use profile::{FrozenProfile, VolumeProfile};
pub use series::IndexedSeries;
pub use sma::SimpleMovingAverage;
