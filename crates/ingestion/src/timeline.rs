//! Append-only bar timeline for one series.
//!
//! The upstream aggregator stamps every update with a monotonic bar index;
//! the timeline turns that into "current bar" and "first update of a new
//! bar" signals and freezes bars as soon as their successor begins.

use poc_core::{Bar, SeriesId, Size, TimestampMs};
use tracing::{debug, warn};

/// Outcome of feeding one update into a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    /// Index of the current (forming) bar after the update.
    pub bar_index: usize,
    /// Whether this update opened a new bar.
    pub is_first_update: bool,
    /// Index of the bar that was current before this update, if it just completed.
    pub completed: Option<usize>,
}

/// Index-addressable sequence of bars for one series.
#[derive(Debug, Clone)]
pub struct BarTimeline {
    series: SeriesId,
    bars: Vec<Bar>,
}

impl BarTimeline {
    /// Create an empty timeline.
    pub fn new(series: SeriesId) -> Self {
        Self {
            series,
            bars: Vec::new(),
        }
    }

    /// Series this timeline tracks.
    pub fn series(&self) -> SeriesId {
        self.series
    }

    /// Feed one update belonging to `bar_index`.
    ///
    /// `updates` are (price, size) pairs applied to the bar in order; an
    /// update carrying no prices still advances the timeline.
    pub fn advance<I>(&mut self, bar_index: usize, ts_ms: TimestampMs, updates: I) -> Advance
    where
        I: IntoIterator<Item = (f64, Size)>,
    {
        let advance = match self.current_index() {
            None => {
                self.open_bar(bar_index, ts_ms);
                Advance {
                    bar_index,
                    is_first_update: true,
                    completed: None,
                }
            }
            Some(current) if bar_index > current => {
                self.bars[current].is_complete = true;
                self.open_bar(bar_index, ts_ms);
                Advance {
                    bar_index,
                    is_first_update: true,
                    completed: Some(current),
                }
            }
            Some(current) => {
                if bar_index < current {
                    warn!(
                        series = ?self.series,
                        bar_index,
                        current,
                        "out-of-order bar index, folding into current bar"
                    );
                }
                Advance {
                    bar_index: current,
                    is_first_update: false,
                    completed: None,
                }
            }
        };

        let bar = &mut self.bars[advance.bar_index];
        for (price, size) in updates {
            bar.apply(price, size);
        }

        advance
    }

    /// Fold an update into the forming bar without advancing.
    pub fn apply(&mut self, price: f64, size: Size) {
        if let Some(bar) = self.bars.last_mut() {
            bar.apply(price, size);
        }
    }

    /// Start the bar at `bar_index`, padding any skipped indices.
    fn open_bar(&mut self, bar_index: usize, ts_ms: TimestampMs) {
        if bar_index > self.bars.len() {
            debug!(
                series = ?self.series,
                from = self.bars.len(),
                to = bar_index,
                "padding skipped bar indices"
            );
        }
        while self.bars.len() < bar_index {
            let mut gap = Bar::new(self.bars.len(), ts_ms);
            gap.is_complete = true;
            self.bars.push(gap);
        }
        self.bars.push(Bar::new(bar_index, ts_ms));
    }

    /// Index of the forming bar, if any update has been seen.
    pub fn current_index(&self) -> Option<usize> {
        self.bars.len().checked_sub(1)
    }

    /// The forming bar.
    pub fn current(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Bar at `index`.
    pub fn bar(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Number of bars, including the forming one.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether no bar has been opened yet.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Number of completed bars.
    pub fn completed_count(&self) -> usize {
        self.bars.len().saturating_sub(1)
    }
}
