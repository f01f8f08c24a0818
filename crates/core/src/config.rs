//! Configuration structures for the POC moving average engine.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Main configuration for one indicator instance.
///
/// Two controllers built from equal configs compute identical outputs for
/// the same event stream, so callers can key instances by config value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Instrument configuration.
    #[serde(default)]
    pub instrument: InstrumentConfig,
    /// Indicator parameters.
    #[serde(default)]
    pub indicator: IndicatorConfig,
}

impl Config {
    /// Load and validate a configuration file (`.toml` or `.json`).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;

        let config: Config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&text)?,
            Some("toml") => toml::from_str(&text)?,
            other => {
                return Err(Error::config(format!(
                    "unsupported config extension {:?} for {}",
                    other,
                    path.display()
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Check every field against its allowed domain.
    pub fn validate(&self) -> Result<()> {
        self.instrument.validate()?;
        self.indicator.validate()
    }

    /// Width of one volume profile level in price units.
    pub fn level_width(&self) -> f64 {
        self.instrument.tick_size * self.indicator.ticks_per_level as f64
    }
}

/// Instrument-specific configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Trading symbol (e.g., "ES 12-26").
    pub symbol: String,
    /// Tick size (minimum price increment).
    pub tick_size: f64,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            symbol: "ES".to_string(),
            tick_size: 0.25,
        }
    }
}

impl InstrumentConfig {
    fn validate(&self) -> Result<()> {
        if !self.tick_size.is_finite() || self.tick_size <= 0.0 {
            return Err(Error::config(format!(
                "tick_size must be a positive number, got {}",
                self.tick_size
            )));
        }
        Ok(())
    }
}

/// How the secondary (volumetric) series is aggregated by the bar builder.
///
/// Opaque to the engine beyond its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumetricBarsType {
    #[default]
    Minute,
    Second,
    Tick,
    Volume,
    Range,
}

impl fmt::Display for VolumetricBarsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VolumetricBarsType::Minute => "minute",
            VolumetricBarsType::Second => "second",
            VolumetricBarsType::Tick => "tick",
            VolumetricBarsType::Volume => "volume",
            VolumetricBarsType::Range => "range",
        };
        f.write_str(name)
    }
}

impl FromStr for VolumetricBarsType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "minute" => Ok(VolumetricBarsType::Minute),
            "second" => Ok(VolumetricBarsType::Second),
            "tick" => Ok(VolumetricBarsType::Tick),
            "volume" => Ok(VolumetricBarsType::Volume),
            "range" => Ok(VolumetricBarsType::Range),
            _ => Err(Error::config(format!("unknown volumetric bars type: {s}"))),
        }
    }
}

/// When the indicator publishes output on the primary series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculateMode {
    /// Publish on every primary event, re-evaluating the forming bar.
    #[default]
    OnEachTick,
    /// Publish once per primary bar, when the next bar opens.
    OnBarClose,
}

/// Point of Control moving average parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// SMA window over the raw POC series.
    pub period: u32,
    /// Period of the volumetric bars (e.g. 5 for 5-minute bars).
    pub volumetric_period: u32,
    /// Aggregation type of the volumetric bars.
    pub volumetric_bars_type: VolumetricBarsType,
    /// Number of ticks per volume profile level.
    pub ticks_per_level: u32,
    /// Output cadence on the primary series.
    #[serde(default)]
    pub calculate: CalculateMode,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            period: 8,
            volumetric_period: 5,
            volumetric_bars_type: VolumetricBarsType::Minute,
            ticks_per_level: 5,
            calculate: CalculateMode::OnEachTick,
        }
    }
}

impl IndicatorConfig {
    fn validate(&self) -> Result<()> {
        if self.period < 1 {
            return Err(Error::config("period must be >= 1"));
        }
        if self.volumetric_period < 1 {
            return Err(Error::config("volumetric_period must be >= 1"));
        }
        if self.ticks_per_level < 1 {
            return Err(Error::config("ticks_per_level must be >= 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.indicator.period, 8);
        assert_eq!(config.indicator.volumetric_period, 5);
        assert_eq!(config.indicator.volumetric_bars_type, VolumetricBarsType::Minute);
        assert_eq!(config.indicator.ticks_per_level, 5);
        assert!(config.validate().is_ok());
        assert_relative_eq!(config.level_width(), 1.25);
    }

    #[test]
    fn test_rejects_zero_period() {
        let mut config = Config::default();
        config.indicator.period = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_zero_volumetric_period() {
        let mut config = Config::default();
        config.indicator.volumetric_period = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_ticks_per_level() {
        let mut config = Config::default();
        config.indicator.ticks_per_level = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_tick_size() {
        let mut config = Config::default();
        config.instrument.tick_size = 0.0;
        assert!(config.validate().is_err());
        config.instrument.tick_size = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bars_type_parse() {
        assert_eq!("Range".parse::<VolumetricBarsType>().unwrap(), VolumetricBarsType::Range);
        assert_eq!(VolumetricBarsType::Tick.to_string(), "tick");
        assert!("renko".parse::<VolumetricBarsType>().is_err());
    }

    #[test]
    fn test_toml_round_trip_defaults() {
        let text = r#"
            [instrument]
            symbol = "NQ"
            tick_size = 0.25

            [indicator]
            period = 3
            volumetric_period = 1
            volumetric_bars_type = "volume"
            ticks_per_level = 1
            calculate = "on_bar_close"
        "#;
        let config: Config = toml::from_str(text).unwrap();
        assert_eq!(config.instrument.symbol, "NQ");
        assert_eq!(config.indicator.period, 3);
        assert_eq!(config.indicator.volumetric_bars_type, VolumetricBarsType::Volume);
        assert_eq!(config.indicator.calculate, CalculateMode::OnBarClose);
    }

    #[test]
    fn test_json_missing_calculate_defaults() {
        let text = r#"{
            "indicator": {
                "period": 4,
                "volumetric_period": 2,
                "volumetric_bars_type": "tick",
                "ticks_per_level": 2
            }
        }"#;
        let config: Config = serde_json::from_str(text).unwrap();
        assert_eq!(config.indicator.calculate, CalculateMode::OnEachTick);
        assert_eq!(config.instrument, InstrumentConfig::default());
    }

    fn demo_config_path() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/poc.toml")
    }

    #[test]
    fn test_from_file_loads_demo_toml() {
        let config = Config::from_file(demo_config_path()).unwrap();
        assert_eq!(config.instrument.symbol, "ES 12-26");
        assert_relative_eq!(config.instrument.tick_size, 0.25);
        assert_eq!(config.indicator.period, 3);
        assert_eq!(config.indicator.ticks_per_level, 1);
        assert_eq!(config.indicator.calculate, CalculateMode::OnEachTick);
    }

    #[test]
    fn test_from_file_loads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poc.json");
        std::fs::write(
            &path,
            r#"{"instrument": {"symbol": "NQ", "tick_size": 0.25},
                "indicator": {"period": 5, "volumetric_period": 1,
                              "volumetric_bars_type": "range", "ticks_per_level": 2}}"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.instrument.symbol, "NQ");
        assert_eq!(config.indicator.period, 5);
        assert_eq!(config.indicator.volumetric_bars_type, VolumetricBarsType::Range);
        assert_relative_eq!(config.level_width(), 0.5);
    }

    #[test]
    fn test_from_file_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poc.yaml");
        std::fs::write(&path, "indicator:\n  period: 3\n").unwrap();

        assert!(matches!(Config::from_file(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_file_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(
            &path,
            r#"
                [indicator]
                period = 0
                volumetric_period = 5
                volumetric_bars_type = "minute"
                ticks_per_level = 5
            "#,
        )
        .unwrap();

        assert!(matches!(Config::from_file(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_file(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
