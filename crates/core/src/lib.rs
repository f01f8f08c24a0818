//! Core types and configuration for the POC moving average engine.
//!
//! This crate provides shared types used across all other crates:
//! - Bars, market events and price levels
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{CalculateMode, Config, IndicatorConfig, InstrumentConfig, VolumetricBarsType};
pub use error::{Error, Result};
pub use types::*;
