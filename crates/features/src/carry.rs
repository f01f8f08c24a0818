//! Carry-forward of the latest extracted POC.
//!
//! This is the only coupling point between the volumetric series and the
//! primary series.

use poc_core::Poc;

/// Holds the most recent POC until a newer one replaces it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CarryForward {
    latest: Option<Poc>,
    /// Secondary bar the value was extracted from.
    source_bar: Option<usize>,
}

impl CarryForward {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the carried value.
    pub fn set(&mut self, poc: Poc, source_bar: usize) {
        self.latest = Some(poc);
        self.source_bar = Some(source_bar);
    }

    /// Latest POC, absent until the first secondary bar completes with volume.
    pub fn get(&self) -> Option<Poc> {
        self.latest
    }

    /// Latest POC price.
    pub fn price(&self) -> Option<f64> {
        self.latest.map(|p| p.price())
    }

    /// Secondary bar index the current value came from.
    pub fn source_bar(&self) -> Option<usize> {
        self.source_bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordered_float::OrderedFloat;

    #[test]
    fn test_absent_until_set() {
        let carry = CarryForward::new();
        assert!(carry.get().is_none());
        assert!(carry.price().is_none());
    }

    #[test]
    fn test_latest_wins() {
        let mut carry = CarryForward::new();
        carry.set(Poc { level: OrderedFloat(100.0), volume: 5.0 }, 0);
        carry.set(Poc { level: OrderedFloat(101.5), volume: 2.0 }, 1);

        assert_eq!(carry.price(), Some(101.5));
        assert_eq!(carry.source_bar(), Some(1));
    }
}
