//! Serializable strategy configuration.
//!
//! Defaults match the reference parameter set. Loadable from TOML; the
//! blake3 `config_hash()` makes a run attributable to an exact parameter set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from config loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{0} must be >= 1")]
    ZeroPeriod(&'static str),
    #[error("macd_fast ({fast}) must be less than macd_slow ({slow})")]
    MacdPeriodOrder { fast: usize, slow: usize },
    #[error("rsi_oversold ({oversold}) must be below rsi_overbought ({overbought})")]
    RsiThresholdOrder { oversold: f64, overbought: f64 },
    #[error("{0} must be a positive percentage")]
    NonPositivePercent(&'static str),
}

/// All recognized strategy options.
///
/// Percentages are whole percents (5.0 = 5%), matching the exit math
/// `entry * (1 ± pct / 100)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Gate entry into the long state.
    pub enable_long_strategy: bool,
    /// Gate entry into the short state.
    pub enable_short_strategy: bool,
    pub long_stoploss: f64,
    pub long_takeprofit: f64,
    pub short_stoploss: f64,
    pub short_takeprofit: f64,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    /// Additional EMA windows tracked for observation; not used in detection.
    pub ema_periods: Vec<usize>,
    /// Max staleness (bars) for an oversold/overbought trigger to still count.
    pub lookback_bars: u32,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            enable_long_strategy: true,
            enable_short_strategy: true,
            long_stoploss: 5.0,
            long_takeprofit: 3.0,
            short_stoploss: 2.0,
            short_takeprofit: 3.0,
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            ema_periods: vec![9, 21, 50, 100, 200],
            lookback_bars: 55,
        }
    }
}

impl StrategyConfig {
    /// Parse from a TOML document and validate.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rsi_period == 0 {
            return Err(ConfigError::ZeroPeriod("rsi_period"));
        }
        if self.macd_fast == 0 {
            return Err(ConfigError::ZeroPeriod("macd_fast"));
        }
        if self.macd_slow == 0 {
            return Err(ConfigError::ZeroPeriod("macd_slow"));
        }
        if self.macd_signal == 0 {
            return Err(ConfigError::ZeroPeriod("macd_signal"));
        }
        if self.ema_periods.iter().any(|&p| p == 0) {
            return Err(ConfigError::ZeroPeriod("ema_periods"));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(ConfigError::MacdPeriodOrder {
                fast: self.macd_fast,
                slow: self.macd_slow,
            });
        }
        if self.rsi_oversold >= self.rsi_overbought {
            return Err(ConfigError::RsiThresholdOrder {
                oversold: self.rsi_oversold,
                overbought: self.rsi_overbought,
            });
        }
        for (name, pct) in [
            ("long_stoploss", self.long_stoploss),
            ("long_takeprofit", self.long_takeprofit),
            ("short_stoploss", self.short_stoploss),
            ("short_takeprofit", self.short_takeprofit),
        ] {
            if pct <= 0.0 {
                return Err(ConfigError::NonPositivePercent(name));
            }
        }
        Ok(())
    }

    /// Deterministic hash of the canonical JSON form.
    ///
    /// Two runs with identical configs share the same hash.
    pub fn config_hash(&self) -> String {
        let json = serde_json::to_string(self).expect("StrategyConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
