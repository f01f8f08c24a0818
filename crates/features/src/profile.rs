//! Per-bar volume-at-price profile.
//!
//! A `VolumeProfile` accumulates volume while its bar is forming and is
//! turned into a read-only `FrozenProfile` when the bar completes.

use crate::poc::scan_maximum;
use poc_core::{Error, Poc, PriceLevel, Result, Size};
use std::collections::BTreeMap;

/// Volume by price level for the forming bar.
#[derive(Debug, Clone, Default)]
pub struct VolumeProfile {
    /// Volume by level, ascending by price.
    levels: BTreeMap<PriceLevel, Size>,
    /// Running total of recorded volume.
    total: Size,
}

impl VolumeProfile {
    /// Create an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate volume into a level.
    ///
    /// Negative or non-finite volume is rejected so the total never
    /// decreases. Zero volume is accepted but creates no level.
    pub fn record(&mut self, level: PriceLevel, volume: Size) -> Result<()> {
        if !volume.is_finite() || volume < 0.0 {
            return Err(Error::data(format!(
                "invalid volume {volume} at level {}",
                level.0
            )));
        }
        if !level.0.is_finite() {
            return Err(Error::data("non-finite price level"));
        }
        if volume == 0.0 {
            return Ok(());
        }

        *self.levels.entry(level).or_insert(0.0) += volume;
        self.total += volume;
        Ok(())
    }

    /// Level with the greatest volume so far (the developing POC).
    pub fn maximum(&self) -> Option<Poc> {
        scan_maximum(self.levels())
    }

    /// Total recorded volume.
    pub fn total_volume(&self) -> Size {
        self.total
    }

    /// Number of levels with volume.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Volume at a level.
    pub fn volume_at(&self, level: PriceLevel) -> Size {
        self.levels.get(&level).copied().unwrap_or(0.0)
    }

    /// Levels in ascending price order.
    pub fn levels(&self) -> impl Iterator<Item = (PriceLevel, Size)> + '_ {
        self.levels.iter().map(|(&k, &v)| (k, v))
    }

    /// Complete the bar; the profile becomes read-only.
    pub fn freeze(self) -> FrozenProfile {
        FrozenProfile { inner: self }
    }
}

/// Volume profile of a completed bar.
#[derive(Debug, Clone, Default)]
pub struct FrozenProfile {
    inner: VolumeProfile,
}

impl FrozenProfile {
    /// Level with the greatest volume.
    ///
    /// Returns `None` when the bar recorded no volume.
    pub fn maximum(&self) -> Option<Poc> {
        self.inner.maximum()
    }

    /// Total recorded volume.
    pub fn total_volume(&self) -> Size {
        self.inner.total_volume()
    }

    /// Number of levels with volume.
    pub fn level_count(&self) -> usize {
        self.inner.level_count()
    }

    /// Whether the bar recorded no volume.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Volume at a level.
    pub fn volume_at(&self, level: PriceLevel) -> Size {
        self.inner.volume_at(level)
    }

    /// Levels in ascending price order.
    pub fn levels(&self) -> impl Iterator<Item = (PriceLevel, Size)> + '_ {
        self.inner.levels()
    }
}
