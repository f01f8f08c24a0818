//! Bar-indexed output series.

/// One optional value per bar index, append-only.
///
/// Only the newest written slot may be overwritten; earlier slots belong to
/// completed bars and are immutable.
#[derive(Debug, Clone, Default)]
pub struct IndexedSeries {
    values: Vec<Option<f64>>,
    last_written: Option<usize>,
}

impl IndexedSeries {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the value for `index`.
    ///
    /// Returns `false` (and leaves the series unchanged) if `index` is older
    /// than the newest written slot.
    pub fn set(&mut self, index: usize, value: f64) -> bool {
        if matches!(self.last_written, Some(last) if index < last) {
            return false;
        }
        if index >= self.values.len() {
            self.values.resize(index + 1, None);
        }
        self.values[index] = Some(value);
        self.last_written = Some(index);
        true
    }

    /// Value at `index`, if one was written.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Index of the newest written slot.
    pub fn last_index(&self) -> Option<usize> {
        self.last_written
    }

    /// Newest written value.
    pub fn last(&self) -> Option<f64> {
        self.last_written.and_then(|i| self.get(i))
    }

    /// Number of slots (written or not) up to the newest one.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.last_written.is_none()
    }

    /// Written slots as `(index, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
    }
}
