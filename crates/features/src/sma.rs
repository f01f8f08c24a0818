//! Simple moving average over a short trailing window.
//!
//! The mean is recomputed from the window on every update, as an offset
//! from the oldest sample, so a constant window yields that constant
//! exactly. The newest sample can be replaced in place so a still-forming
//! bar is re-evaluated instead of appended twice.

use std::collections::VecDeque;

/// Simple moving average over the last `period` samples.
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    /// Window size in samples.
    period: usize,
    /// Samples in the window, oldest first.
    window: VecDeque<f64>,
}

impl SimpleMovingAverage {
    /// Create a new moving average. A period of 0 is treated as 1.
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            window: VecDeque::with_capacity(period),
        }
    }

    /// Append a sample and return the new average.
    ///
    /// While fewer than `period` samples exist the average is taken over
    /// the available count.
    pub fn append(&mut self, value: f64) -> f64 {
        if self.window.len() >= self.period {
            self.window.pop_front();
        }
        self.window.push_back(value);
        self.mean()
    }

    /// Replace the newest sample and return the new average.
    ///
    /// Appends if the window is empty.
    pub fn replace_last(&mut self, value: f64) -> f64 {
        match self.window.back_mut() {
            Some(last) => {
                *last = value;
                self.mean()
            }
            None => self.append(value),
        }
    }

    /// Mean of a non-empty window.
    fn mean(&self) -> f64 {
        let Some(&base) = self.window.front() else {
            return f64::NAN;
        };
        let offset: f64 = self.window.iter().map(|v| v - base).sum();
        base + offset / self.window.len() as f64
    }

    /// Current average, if any sample exists.
    pub fn value(&self) -> Option<f64> {
        if self.window.is_empty() {
            None
        } else {
            Some(self.mean())
        }
    }

    /// Window size.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Number of samples in the window.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Whether no sample has been appended.
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Check if the window is full.
    pub fn is_ready(&self) -> bool {
        self.window.len() >= self.period
    }

    /// Clear all data.
    pub fn clear(&mut self) {
        self.window.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_warmup_uses_available_count() {
        let mut sma = SimpleMovingAverage::new(5);

        assert_relative_eq!(sma.append(10.0), 10.0);
        assert_relative_eq!(sma.append(20.0), 15.0);
        assert_relative_eq!(sma.append(30.0), 20.0);
        assert!(!sma.is_ready());
    }

    #[test]
    fn test_constant_stream_converges_exactly() {
        let mut sma = SimpleMovingAverage::new(4);
        let mut last = 0.0;
        for _ in 0..10 {
            last = sma.append(4321.25);
        }
        assert_eq!(last, 4321.25);
        assert!(sma.is_ready());
    }

    #[test]
    fn test_level_switch_is_exact_after_period() {
        let mut sma = SimpleMovingAverage::new(8);
        let mut last = 0.0;
        for _ in 0..50 {
            last = sma.append(4500.3);
        }
        assert_eq!(last, 4500.3);

        for i in 0..50 {
            last = sma.append(0.1);
            if i >= 7 {
                assert_eq!(last, 0.1);
            }
        }

        let mut sma = SimpleMovingAverage::new(8);
        for _ in 0..8 {
            last = sma.append(4500.1);
        }
        assert_eq!(last, 4500.1);
    }

    #[test]
    fn test_replaced_level_is_exact() {
        let mut sma = SimpleMovingAverage::new(3);
        sma.append(4500.3);
        sma.append(4500.3);
        sma.append(4500.3);
        assert_eq!(sma.replace_last(4500.3), 4500.3);
        assert_eq!(sma.value(), Some(4500.3));
    }

    #[test]
    fn test_known_sequence() {
        let mut sma = SimpleMovingAverage::new(3);
        let outputs: Vec<f64> = [10.0, 10.0, 10.0, 20.0]
            .iter()
            .map(|&v| sma.append(v))
            .collect();

        assert_relative_eq!(outputs[0], 10.0);
        assert_relative_eq!(outputs[1], 10.0);
        assert_relative_eq!(outputs[2], 10.0);
        assert_relative_eq!(outputs[3], 40.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_window_drops_oldest() {
        let mut sma = SimpleMovingAverage::new(2);
        sma.append(1.0);
        sma.append(2.0);
        let v = sma.append(6.0);

        assert_eq!(sma.len(), 2);
        assert_relative_eq!(v, 4.0);
    }

    #[test]
    fn test_replace_matches_single_write() {
        let mut replaced = SimpleMovingAverage::new(3);
        replaced.append(10.0);
        replaced.append(11.0);
        replaced.replace_last(15.0);
        let a = replaced.replace_last(12.0);

        let mut once = SimpleMovingAverage::new(3);
        once.append(10.0);
        let b = once.append(12.0);

        assert_relative_eq!(a, b);
        assert_eq!(replaced.len(), once.len());
    }

    #[test]
    fn test_replace_on_empty_appends() {
        let mut sma = SimpleMovingAverage::new(3);
        assert_relative_eq!(sma.replace_last(7.0), 7.0);
        assert_eq!(sma.len(), 1);
    }

    #[test]
    fn test_long_stream_stays_accurate() {
        let mut sma = SimpleMovingAverage::new(7);
        let mut v = 0.0;
        for i in 0..10_000 {
            v = sma.append(4000.0 + (i % 13) as f64 * 0.25);
        }
        let expected: f64 = (9_993..10_000)
            .map(|i| 4000.0 + (i % 13) as f64 * 0.25)
            .sum::<f64>()
            / 7.0;
        assert_relative_eq!(v, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_period_clamped() {
        let mut sma = SimpleMovingAverage::new(0);
        assert_eq!(sma.period(), 1);
        sma.append(1.0);
        assert_relative_eq!(sma.append(3.0), 3.0);
    }
}
