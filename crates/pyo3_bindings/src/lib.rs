//! PyO3 bindings for the POC moving average indicator.
//!
//! Exposes the Rust engine to Python:
//! - Published output records
//! - The synchronized POC moving average controller

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use poc_core::{
    CalculateMode, Config as RustConfig, Error as RustError, LevelVolume, MarketEvent,
    PocAverage as RustPocAverage, PrimaryTick, VolumetricBarsType, VolumetricTick,
};
use poc_features::SyncController;

fn to_py_err(err: RustError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

// ============================================================================
// Python-exposed Types
// ============================================================================

/// Smoothed POC published for one primary event.
#[pyclass]
#[derive(Clone)]
pub struct PocAverage {
    #[pyo3(get)]
    pub bar_index: usize,
    #[pyo3(get)]
    pub ts_ms: i64,
    #[pyo3(get)]
    pub raw_poc: f64,
    #[pyo3(get)]
    pub value: f64,
}

#[pymethods]
impl PocAverage {
    fn __repr__(&self) -> String {
        format!(
            "PocAverage(bar_index={}, ts_ms={}, raw_poc={}, value={:.4})",
            self.bar_index, self.ts_ms, self.raw_poc, self.value
        )
    }
}

impl From<RustPocAverage> for PocAverage {
    fn from(p: RustPocAverage) -> Self {
        PocAverage {
            bar_index: p.bar_index,
            ts_ms: p.ts_ms,
            raw_poc: p.raw_poc,
            value: p.value,
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Simple moving average of the volumetric Point of Control.
#[pyclass(name = "PocMovingAverage")]
pub struct PyPocMovingAverage {
    inner: SyncController,
}

#[pymethods]
impl PyPocMovingAverage {
    #[new]
    #[pyo3(signature = (
        period = 8,
        volumetric_period = 5,
        volumetric_bars_type = "minute",
        ticks_per_level = 5,
        tick_size = 0.25,
        on_bar_close = false
    ))]
    fn new(
        period: u32,
        volumetric_period: u32,
        volumetric_bars_type: &str,
        ticks_per_level: u32,
        tick_size: f64,
        on_bar_close: bool,
    ) -> PyResult<Self> {
        let mut config = RustConfig::default();
        config.instrument.tick_size = tick_size;
        config.indicator.period = period;
        config.indicator.volumetric_period = volumetric_period;
        config.indicator.volumetric_bars_type = volumetric_bars_type
            .parse::<VolumetricBarsType>()
            .map_err(to_py_err)?;
        config.indicator.ticks_per_level = ticks_per_level;
        if on_bar_close {
            config.indicator.calculate = CalculateMode::OnBarClose;
        }

        let inner = SyncController::with_config(config).map_err(to_py_err)?;
        Ok(PyPocMovingAverage { inner })
    }

    /// Feed a primary-series update; returns the published value, if any.
    #[pyo3(signature = (bar_index, ts_ms, price, volume = 0.0))]
    fn on_primary(
        &mut self,
        bar_index: usize,
        ts_ms: i64,
        price: f64,
        volume: f64,
    ) -> PyResult<Option<PocAverage>> {
        let event = MarketEvent::Primary(PrimaryTick {
            bar_index,
            ts_ms,
            price,
            volume,
        });
        let output = self.inner.on_event(&event).map_err(to_py_err)?;
        Ok(output.map(Into::into))
    }

    /// Feed volumetric increments as `(price, volume)` pairs.
    fn on_secondary(&mut self, bar_index: usize, ts_ms: i64, levels: Vec<(f64, f64)>) -> PyResult<()> {
        let event = MarketEvent::Secondary(VolumetricTick {
            bar_index,
            ts_ms,
            levels: levels
                .into_iter()
                .map(|(price, volume)| LevelVolume { price, volume })
                .collect(),
        });
        self.inner.on_event(&event).map_err(to_py_err)?;
        Ok(())
    }

    /// Latest published moving average.
    #[getter]
    fn value(&self) -> Option<f64> {
        self.inner.value()
    }

    /// POC currently carried forward.
    #[getter]
    fn current_poc(&self) -> Option<f64> {
        self.inner.current_poc().map(|p| p.price())
    }

    /// Raw POC series as `(bar_index, value)` pairs.
    fn raw_series(&self) -> Vec<(usize, f64)> {
        self.inner
            .raw_series()
            .map(|s| s.iter().collect())
            .unwrap_or_default()
    }

    /// Smoothed series as `(bar_index, value)` pairs.
    fn smoothed_series(&self) -> Vec<(usize, f64)> {
        self.inner
            .smoothed_series()
            .map(|s| s.iter().collect())
            .unwrap_or_default()
    }

    fn __repr__(&self) -> String {
        match self.inner.config() {
            Some(c) => format!(
                "PocMovingAverage(period={}, volumetric={} {}, ticks_per_level={})",
                c.indicator.period,
                c.indicator.volumetric_period,
                c.indicator.volumetric_bars_type,
                c.indicator.ticks_per_level
            ),
            None => "PocMovingAverage(unconfigured)".to_string(),
        }
    }
}

// ============================================================================
// Module Definition
// ============================================================================

/// POC moving average - Rust engine for Python.
#[pymodule]
fn poc_average(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PocAverage>()?;
    m.add_class::<PyPocMovingAverage>()?;
    Ok(())
}
