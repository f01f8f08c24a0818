//! Price-level quantization.
//!
//! Maps raw prices onto volume profile levels `ticks_per_level` ticks wide.
//! Quantization goes through an integer tick index so equal prices always
//! land on bit-identical keys.

use ordered_float::OrderedFloat;
use poc_core::{Config, Error, PriceLevel, Result};

/// Grid of price levels for one instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelGrid {
    tick_size: f64,
    ticks_per_level: i64,
}

impl LevelGrid {
    /// Create a grid. Both arguments are assumed validated.
    pub fn new(tick_size: f64, ticks_per_level: u32) -> Self {
        Self {
            tick_size,
            ticks_per_level: i64::from(ticks_per_level.max(1)),
        }
    }

    /// Build the grid described by a configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.instrument.tick_size, config.indicator.ticks_per_level)
    }

    /// Nearest tick index for a price.
    ///
    /// Fails for non-finite prices and for prices whose level would not fit
    /// the integer grid.
    #[inline]
    pub fn tick_index(&self, price: f64) -> Result<i64> {
        let ticks = (price / self.tick_size).round();
        let limit = (i64::MAX / self.ticks_per_level) as f64;
        if ticks.is_nan() || ticks.abs() >= limit {
            return Err(Error::data(format!("price {price} outside the level grid")));
        }
        Ok(ticks as i64)
    }

    /// Level index containing a price.
    #[inline]
    pub fn level_index(&self, price: f64) -> Result<i64> {
        Ok(self.tick_index(price)?.div_euclid(self.ticks_per_level))
    }

    /// Level key (lower edge price) containing a price.
    pub fn level_of(&self, price: f64) -> Result<PriceLevel> {
        self.level_price(self.level_index(price)?)
    }

    /// Lower edge price of a level index.
    #[inline]
    pub fn level_price(&self, level_index: i64) -> Result<PriceLevel> {
        let ticks = level_index
            .checked_mul(self.ticks_per_level)
            .ok_or_else(|| Error::data(format!("level {level_index} outside the level grid")))?;
        Ok(OrderedFloat(ticks as f64 * self.tick_size))
    }

    /// Width of one level in price units.
    pub fn level_width(&self) -> f64 {
        self.ticks_per_level as f64 * self.tick_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_tick_levels() {
        let grid = LevelGrid::new(1.0, 1);
        assert_eq!(grid.level_of(100.0).unwrap(), OrderedFloat(100.0));
        assert_eq!(grid.level_of(101.0).unwrap(), OrderedFloat(101.0));
    }

    #[test]
    fn test_multi_tick_levels() {
        let grid = LevelGrid::new(0.25, 4);

        // Levels are 1.0 wide: [100.0, 101.0)
        assert_eq!(grid.level_of(100.0).unwrap(), OrderedFloat(100.0));
        assert_eq!(grid.level_of(100.75).unwrap(), OrderedFloat(100.0));
        assert_eq!(grid.level_of(101.0).unwrap(), OrderedFloat(101.0));
        assert_relative_eq!(grid.level_width(), 1.0);
    }

    #[test]
    fn test_decimal_tick_is_exact() {
        let grid = LevelGrid::new(0.1, 1);

        // 100.3 / 0.1 is 1002.9999... in floating point
        assert_eq!(grid.tick_index(100.3).unwrap(), 1003);
        assert_eq!(
            grid.level_of(100.3).unwrap(),
            grid.level_of(100.30000000001).unwrap()
        );
    }

    #[test]
    fn test_negative_prices_floor() {
        let grid = LevelGrid::new(1.0, 5);
        assert_eq!(grid.level_index(-1.0).unwrap(), -1);
        assert_eq!(grid.level_of(-1.0).unwrap(), OrderedFloat(-5.0));
    }

    #[test]
    fn test_extreme_prices_rejected() {
        let grid = LevelGrid::new(0.25, 5);

        assert!(matches!(grid.level_of(-1e300), Err(Error::Data(_))));
        assert!(grid.level_of(1e300).is_err());
        assert!(grid.level_of(f64::NAN).is_err());
        assert!(grid.level_of(f64::INFINITY).is_err());
        assert!(grid.level_price(i64::MAX).is_err());

        // Large but representable prices still quantize.
        assert_eq!(grid.level_of(1e12).unwrap(), OrderedFloat(1e12));
    }

    #[test]
    fn test_from_config() {
        let config = Config::default();
        let grid = LevelGrid::from_config(&config);
        assert_relative_eq!(grid.level_width(), config.level_width());
    }
}
