//! Replay runner.
//!
//! Feeds a recorded event stream through a fresh controller and collects
//! what it published.

use poc_core::{Config, MarketEvent, PocAverage, Result};
use poc_features::{SessionStats, SyncController};
use serde::Serialize;
use tracing::{info, warn};

/// Result of one replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Published values, in publication order.
    pub outputs: Vec<PocAverage>,
    /// Session counters at the end of the stream.
    pub stats: SessionStats,
    /// Latest moving average value.
    pub final_value: Option<f64>,
}

impl ReplayReport {
    /// Number of distinct primary bars that received a value.
    pub fn bars_with_output(&self) -> usize {
        let mut count = 0;
        let mut last = None;
        for output in &self.outputs {
            if last != Some(output.bar_index) {
                count += 1;
                last = Some(output.bar_index);
            }
        }
        count
    }
}

/// Replays events through a controller.
pub struct ReplayRunner {
    config: Config,
    /// Keep every publication instead of only the last per bar.
    keep_all: bool,
}

impl ReplayRunner {
    /// Create a runner for one configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            keep_all: false,
        }
    }

    /// Keep every intra-bar publication in the report.
    pub fn keep_all(mut self, keep_all: bool) -> Self {
        self.keep_all = keep_all;
        self
    }

    /// Run the events through a freshly configured controller.
    pub fn run<'a, I>(&self, events: I) -> Result<ReplayReport>
    where
        I: IntoIterator<Item = &'a MarketEvent>,
    {
        let mut controller = SyncController::with_config(self.config.clone())?;
        let mut outputs: Vec<PocAverage> = Vec::new();

        for event in events {
            let output = match controller.on_event(event) {
                Ok(Some(output)) => output,
                Ok(None) => continue,
                Err(err) if !err.is_fatal() => {
                    warn!(ts_ms = event.ts_ms(), error = %err, "skipping event");
                    continue;
                }
                Err(err) => return Err(err),
            };

            match outputs.last_mut() {
                Some(last) if !self.keep_all && last.bar_index == output.bar_index => {
                    *last = output;
                }
                _ => outputs.push(output),
            }
        }

        let stats = controller.stats();
        let span = controller
            .primary_bars()
            .and_then(|bars| Some((bars.bar(0)?.time()?, bars.current()?.time()?)));
        info!(
            session_start = ?span.map(|(start, _)| start),
            last_bar = ?span.map(|(_, end)| end),
            primary_events = stats.primary_events,
            secondary_events = stats.secondary_events,
            secondary_bars = stats.secondary_bars_completed,
            empty_profiles = stats.empty_profiles,
            published = stats.outputs_published,
            "replay finished"
        );

        Ok(ReplayReport {
            outputs,
            stats,
            final_value: controller.value(),
        })
    }
}
