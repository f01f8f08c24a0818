//! Point of Control extraction.
//!
//! Finds the level with the maximum volume in a completed profile.

use crate::profile::FrozenProfile;
use poc_core::{Poc, PriceLevel, Size};
use tracing::trace;

/// Argmax over levels given in ascending price order.
///
/// Only a strict improvement moves the running maximum, so on ties the
/// first (lowest-price) level wins. Returns `None` if no level carries
/// positive volume.
pub fn scan_maximum<I>(levels: I) -> Option<Poc>
where
    I: IntoIterator<Item = (PriceLevel, Size)>,
{
    let mut best: Option<Poc> = None;

    for (level, volume) in levels {
        let improves = match best {
            Some(b) => volume > b.volume,
            None => volume > 0.0,
        };
        if improves {
            best = Some(Poc { level, volume });
        }
    }

    best
}

/// Extracts the POC of completed volumetric bars.
#[derive(Debug, Clone, Copy, Default)]
pub struct PocExtractor;

impl PocExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// POC of a completed bar, or `None` for a bar with no volume.
    pub fn extract(&self, profile: &FrozenProfile) -> Option<Poc> {
        let poc = scan_maximum(profile.levels());
        trace!(
            levels = profile.level_count(),
            total_volume = profile.total_volume(),
            poc = ?poc.map(|p| p.price()),
            "scanned profile"
        );
        poc
    }
}
