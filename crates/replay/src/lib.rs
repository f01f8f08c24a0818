//! Replay of recorded event streams.
//!
//! This crate provides:
//! - JSON-lines event decoding
//! - A runner that feeds events through a `SyncController`
//! - Run reports with outputs and session statistics

pub mod reader;
pub mod runner;

pub use reader::{read_events, write_outputs};
pub use runner::{ReplayReport, ReplayRunner};
