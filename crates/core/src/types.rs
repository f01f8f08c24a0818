//! Core data types for the POC moving average engine.

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Timestamp in milliseconds since Unix epoch (UTC).
pub type TimestampMs = i64;

/// A quantized price bucket, keyed by its lower edge.
pub type PriceLevel = OrderedFloat<f64>;

/// Size/quantity type.
pub type Size = f64;

/// Convert a millisecond timestamp to a UTC datetime.
#[inline]
pub fn ts_to_datetime(ts_ms: TimestampMs) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ts_ms)
}

/// Which bar series an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SeriesId {
    /// The series the indicator output is keyed to.
    Primary = 0,
    /// The independently aggregated volumetric series.
    Secondary = 1,
}

/// One OHLCV bar of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Position of the bar in its timeline.
    pub index: usize,
    /// Timestamp of the first update (ms).
    pub ts_ms: TimestampMs,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Total volume.
    pub volume: Size,
    /// Number of updates applied.
    pub update_count: u32,
    /// Whether a later bar has started.
    pub is_complete: bool,
}

impl Bar {
    /// Create an empty, forming bar.
    pub fn new(index: usize, ts_ms: TimestampMs) -> Self {
        Self {
            index,
            ts_ms,
            open: f64::NAN,
            high: f64::NEG_INFINITY,
            low: f64::INFINITY,
            close: f64::NAN,
            volume: 0.0,
            update_count: 0,
            is_complete: false,
        }
    }

    /// Fold a price/volume update into the bar.
    pub fn apply(&mut self, price: f64, size: Size) {
        if self.update_count == 0 {
            self.open = price;
        }
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.volume += size;
        self.update_count += 1;
    }

    /// Whether no price update has touched this bar.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.update_count == 0
    }

    /// Bar start as a UTC datetime.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        ts_to_datetime(self.ts_ms)
    }
}

/// Volume traded at one price inside a volumetric update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelVolume {
    /// Raw traded price (quantized by the engine).
    pub price: f64,
    /// Volume traded at that price.
    pub volume: Size,
}

/// An update of the primary series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryTick {
    /// Index of the bar this update belongs to.
    pub bar_index: usize,
    /// Timestamp in milliseconds.
    pub ts_ms: TimestampMs,
    /// Last traded price.
    pub price: f64,
    /// Traded size.
    #[serde(default)]
    pub volume: Size,
}

/// An update of the secondary volumetric series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumetricTick {
    /// Index of the bar this update belongs to.
    pub bar_index: usize,
    /// Timestamp in milliseconds.
    pub ts_ms: TimestampMs,
    /// Per-price volume increments for the current bar.
    #[serde(default)]
    pub levels: Vec<LevelVolume>,
}

impl VolumetricTick {
    /// Sum of all increments.
    pub fn total_volume(&self) -> Size {
        self.levels.iter().map(|l| l.volume).sum()
    }
}

/// One event of the incoming stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "series", rename_all = "lowercase")]
pub enum MarketEvent {
    Primary(PrimaryTick),
    Secondary(VolumetricTick),
}

impl MarketEvent {
    /// Series the event is routed to.
    #[inline]
    pub fn series(&self) -> SeriesId {
        match self {
            MarketEvent::Primary(_) => SeriesId::Primary,
            MarketEvent::Secondary(_) => SeriesId::Secondary,
        }
    }

    /// Event timestamp.
    #[inline]
    pub fn ts_ms(&self) -> TimestampMs {
        match self {
            MarketEvent::Primary(t) => t.ts_ms,
            MarketEvent::Secondary(t) => t.ts_ms,
        }
    }

    /// Bar index the event belongs to, within its own series.
    #[inline]
    pub fn bar_index(&self) -> usize {
        match self {
            MarketEvent::Primary(t) => t.bar_index,
            MarketEvent::Secondary(t) => t.bar_index,
        }
    }
}

/// Point of Control of a completed volumetric bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Poc {
    /// Level holding the maximum volume.
    pub level: PriceLevel,
    /// Volume at that level.
    pub volume: Size,
}

impl Poc {
    /// POC as a plain price.
    #[inline]
    pub fn price(&self) -> f64 {
        self.level.0
    }
}

/// Smoothed POC published for one primary event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PocAverage {
    /// Primary bar index the value is keyed to.
    pub bar_index: usize,
    /// Timestamp of the primary event that produced it.
    pub ts_ms: TimestampMs,
    /// Carried-forward raw POC written at `bar_index`.
    pub raw_poc: f64,
    /// Moving average of the raw POC series.
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_apply() {
        let mut bar = Bar::new(0, 1_000);
        assert!(bar.is_empty());

        bar.apply(100.0, 2.0);
        bar.apply(102.0, 1.0);
        bar.apply(99.5, 3.0);

        assert_eq!(bar.open, 100.0);
        assert_eq!(bar.high, 102.0);
        assert_eq!(bar.low, 99.5);
        assert_eq!(bar.close, 99.5);
        assert!((bar.volume - 6.0).abs() < 1e-10);
        assert_eq!(bar.update_count, 3);
    }

    #[test]
    fn test_series_id_repr() {
        assert_eq!(SeriesId::Primary as u8, 0);
        assert_eq!(SeriesId::Secondary as u8, 1);
    }

    #[test]
    fn test_event_json() {
        let line = r#"{"series":"secondary","bar_index":3,"ts_ms":60000,"levels":[{"price":101.0,"volume":9.0}]}"#;
        let event: MarketEvent = serde_json::from_str(line).unwrap();
        assert_eq!(event.series(), SeriesId::Secondary);
        assert_eq!(event.bar_index(), 3);

        match event {
            MarketEvent::Secondary(tick) => assert!((tick.total_volume() - 9.0).abs() < 1e-10),
            MarketEvent::Primary(_) => panic!("expected secondary event"),
        }
    }

    #[test]
    fn test_bar_time() {
        let bar = Bar::new(0, 1_704_067_260_000);
        let time = bar.time().unwrap();
        assert_eq!(time.to_rfc3339(), "2024-01-01T00:01:00+00:00");
    }
}
