//! Synchronization controller.
//!
//! Drives the primary and volumetric timelines from one event stream,
//! extracts the POC of every completed volumetric bar, carries it forward
//! and publishes its moving average once per primary event.

use crate::{
    carry::CarryForward,
    poc::PocExtractor,
    profile::VolumeProfile,
    series::IndexedSeries,
    sma::SimpleMovingAverage,
};
use poc_core::{
    CalculateMode, Config, Error, LevelVolume, MarketEvent, Poc, PocAverage, PrimaryTick,
    Result, SeriesId, TimestampMs, VolumetricTick,
};
use poc_ingestion::{BarTimeline, LevelGrid};
use serde::Serialize;
use std::iter;
use tracing::{debug, info, warn};

/// Lifecycle of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No configuration applied yet.
    Uninitialized,
    /// Configured, waiting for the first event.
    Configured,
    /// At least one event processed.
    Streaming,
}

/// Counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub primary_events: u64,
    pub secondary_events: u64,
    /// Volumetric bars that completed.
    pub secondary_bars_completed: u64,
    /// Completed volumetric bars that produced a POC.
    pub pocs_extracted: u64,
    /// Completed volumetric bars with no volume (last POC carried).
    pub empty_profiles: u64,
    /// Primary events skipped for lack of runway or POC.
    pub skipped_runway: u64,
    pub outputs_published: u64,
    /// Malformed increments or ticks that were ignored.
    pub dropped_increments: u64,
}

/// State owned by a configured controller.
#[derive(Debug)]
struct Session {
    calculate: CalculateMode,
    grid: LevelGrid,
    primary: BarTimeline,
    secondary: BarTimeline,
    /// Profile of the forming volumetric bar.
    profile: VolumeProfile,
    extractor: PocExtractor,
    carry: CarryForward,
    sma: SimpleMovingAverage,
    raw: IndexedSeries,
    smoothed: IndexedSeries,
    stats: SessionStats,
}

impl Session {
    fn new(config: &Config) -> Self {
        Self {
            calculate: config.indicator.calculate,
            grid: LevelGrid::from_config(config),
            primary: BarTimeline::new(SeriesId::Primary),
            secondary: BarTimeline::new(SeriesId::Secondary),
            profile: VolumeProfile::new(),
            extractor: PocExtractor::new(),
            carry: CarryForward::new(),
            sma: SimpleMovingAverage::new(config.indicator.period as usize),
            raw: IndexedSeries::new(),
            smoothed: IndexedSeries::new(),
            stats: SessionStats::default(),
        }
    }

    fn on_secondary(&mut self, tick: &VolumetricTick) {
        self.stats.secondary_events += 1;

        let adv = self.secondary.advance(tick.bar_index, tick.ts_ms, iter::empty());
        if let Some(completed) = adv.completed {
            self.complete_secondary_bar(completed);
        }

        // Increments on a boundary event belong to the new bar.
        for increment in &tick.levels {
            match self.record(increment) {
                Ok(()) => self.secondary.apply(increment.price, increment.volume),
                Err(err) => {
                    self.stats.dropped_increments += 1;
                    warn!(bar_index = adv.bar_index, error = %err, "dropping volumetric increment");
                }
            }
        }
    }

    fn record(&mut self, increment: &LevelVolume) -> Result<()> {
        let level = self.grid.level_of(increment.price)?;
        self.profile.record(level, increment.volume)
    }

    /// Freeze the finished profile and refresh the carried POC.
    fn complete_secondary_bar(&mut self, completed: usize) {
        self.stats.secondary_bars_completed += 1;
        let profile = std::mem::take(&mut self.profile).freeze();

        match self.extractor.extract(&profile) {
            Some(poc) => {
                self.stats.pocs_extracted += 1;
                self.carry.set(poc, completed);
                debug!(
                    bar_index = completed,
                    poc = poc.price(),
                    volume = poc.volume,
                    "volumetric bar completed"
                );
            }
            None => {
                self.stats.empty_profiles += 1;
                debug!(
                    bar_index = completed,
                    carried = ?self.carry.price(),
                    carried_from = ?self.carry.source_bar(),
                    "empty volumetric bar, keeping last POC"
                );
            }
        }
    }

    fn on_primary(&mut self, tick: &PrimaryTick) -> Option<PocAverage> {
        self.stats.primary_events += 1;

        let valid = tick.price.is_finite() && tick.volume.is_finite() && tick.volume >= 0.0;
        if !valid {
            self.stats.dropped_increments += 1;
            warn!(
                bar_index = tick.bar_index,
                price = tick.price,
                volume = tick.volume,
                "ignoring malformed primary tick values"
            );
        }
        let update = valid.then_some((tick.price, tick.volume));
        let adv = self.primary.advance(tick.bar_index, tick.ts_ms, update);

        let target = match self.calculate {
            CalculateMode::OnEachTick => adv.bar_index,
            CalculateMode::OnBarClose => adv.completed?,
        };

        // One prior primary bar of runway is required.
        if target < 1 {
            self.stats.skipped_runway += 1;
            return None;
        }

        let Some(poc) = self.carry.get() else {
            self.stats.skipped_runway += 1;
            return None;
        };

        Some(self.publish(target, tick.ts_ms, poc))
    }

    /// Write the raw POC at `bar_index` and update the average.
    fn publish(&mut self, bar_index: usize, ts_ms: TimestampMs, poc: Poc) -> PocAverage {
        let raw_poc = poc.price();

        // A forming bar is re-evaluated in place rather than appended again.
        let value = if self.raw.last_index() == Some(bar_index) {
            self.sma.replace_last(raw_poc)
        } else {
            self.sma.append(raw_poc)
        };

        self.raw.set(bar_index, raw_poc);
        self.smoothed.set(bar_index, value);
        self.stats.outputs_published += 1;

        PocAverage {
            bar_index,
            ts_ms,
            raw_poc,
            value,
        }
    }
}

/// Point of Control moving average over two synchronized series.
///
/// One controller owns all of its state; instances never share mutable
/// data, so several can be fed the same stream independently.
#[derive(Debug)]
pub struct SyncController {
    state: ControllerState,
    config: Option<Config>,
    session: Option<Session>,
}

impl SyncController {
    /// Create an unconfigured controller.
    pub fn new() -> Self {
        Self {
            state: ControllerState::Uninitialized,
            config: None,
            session: None,
        }
    }

    /// Create and configure a controller in one step.
    pub fn with_config(config: Config) -> Result<Self> {
        let mut controller = Self::new();
        controller.configure(config)?;
        Ok(controller)
    }

    /// Validate `config` and allocate the session state.
    pub fn configure(&mut self, config: Config) -> Result<()> {
        if self.state != ControllerState::Uninitialized {
            return Err(Error::AlreadyConfigured);
        }
        config.validate()?;

        info!(
            symbol = %config.instrument.symbol,
            period = config.indicator.period,
            volumetric = %format!(
                "{} {}",
                config.indicator.volumetric_period, config.indicator.volumetric_bars_type
            ),
            ticks_per_level = config.indicator.ticks_per_level,
            "POC moving average configured"
        );

        self.session = Some(Session::new(&config));
        self.config = Some(config);
        self.state = ControllerState::Configured;
        Ok(())
    }

    /// Process one event.
    ///
    /// Returns the published value for primary events that produce output,
    /// `None` otherwise.
    pub fn on_event(&mut self, event: &MarketEvent) -> Result<Option<PocAverage>> {
        let session = self.session.as_mut().ok_or(Error::NotConfigured)?;

        if self.state == ControllerState::Configured {
            debug!("first event received, streaming");
            self.state = ControllerState::Streaming;
        }

        Ok(match event {
            MarketEvent::Primary(tick) => session.on_primary(tick),
            MarketEvent::Secondary(tick) => {
                session.on_secondary(tick);
                None
            }
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Applied configuration.
    pub fn config(&self) -> Option<&Config> {
        self.config.as_ref()
    }

    /// Raw POC written per primary bar index.
    pub fn raw_series(&self) -> Option<&IndexedSeries> {
        self.session.as_ref().map(|s| &s.raw)
    }

    /// Smoothed POC per primary bar index.
    pub fn smoothed_series(&self) -> Option<&IndexedSeries> {
        self.session.as_ref().map(|s| &s.smoothed)
    }

    /// Latest published moving average.
    pub fn value(&self) -> Option<f64> {
        self.session.as_ref().and_then(|s| s.smoothed.last())
    }

    /// POC currently carried forward.
    pub fn current_poc(&self) -> Option<Poc> {
        self.session.as_ref().and_then(|s| s.carry.get())
    }

    /// POC of the forming volumetric bar so far.
    pub fn developing_poc(&self) -> Option<Poc> {
        self.session.as_ref().and_then(|s| s.profile.maximum())
    }

    /// Primary bar timeline.
    pub fn primary_bars(&self) -> Option<&BarTimeline> {
        self.session.as_ref().map(|s| &s.primary)
    }

    /// Volumetric bar timeline.
    pub fn secondary_bars(&self) -> Option<&BarTimeline> {
        self.session.as_ref().map(|s| &s.secondary)
    }

    /// Session counters.
    pub fn stats(&self) -> SessionStats {
        self.session.as_ref().map(|s| s.stats).unwrap_or_default()
    }
}

impl Default for SyncController {
    fn default() -> Self {
        Self::new()
    }
}
