use crate::error::BacktestError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

//price at which a pending order is filled when it is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FillModel {
    //fill at the close of the bar that triggered the order
    #[default]
    SignalClose,
    //fill at the close of the bar on which the order is resolved
    NextClose,
}

//complete swing strategy and session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingConfig {
    //rsi
    pub rsi_period: usize,
    pub overbought: f64,
    pub rsi_neutral: f64,

    //bollinger bands
    pub bb_period: usize,
    pub bb_stddev_factor: f64,

    //moving average crossover
    pub fast_ma_period: usize,
    pub slow_ma_period: usize,

    //volume filter
    pub volume_ma_period: usize,
    pub volume_multiplier: f64,
    pub volume_bonus: f64,

    //entry and risk
    pub entry_threshold: f64,
    pub stop_loss_pct: f64,
    pub risk_per_trade: f64,

    //account and analytics
    pub starting_cash: f64,
    pub annualization_factor: f64,
    pub risk_free_rate: f64,

    pub fill_model: FillModel,
}

impl Default for SwingConfig {
    fn default() -> Self {
        SwingConfig {
            rsi_period: 14,
            overbought: 70.0,
            rsi_neutral: 50.0,
            bb_period: 20,
            bb_stddev_factor: 2.0,
            fast_ma_period: 20,
            slow_ma_period: 50,
            volume_ma_period: 10,
            volume_multiplier: 1.5,
            volume_bonus: 0.1,
            entry_threshold: 1.15,
            stop_loss_pct: 0.03,
            risk_per_trade: 0.01,
            starting_cash: 10000.0,
            annualization_factor: 252.0,
            risk_free_rate: 0.0,
            fill_model: FillModel::SignalClose,
        }
    }
}

impl SwingConfig {
    //rejects configurations that cannot drive a session
    pub fn validate(&self) -> Result<(), BacktestError> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("bb_period", self.bb_period),
            ("fast_ma_period", self.fast_ma_period),
            ("slow_ma_period", self.slow_ma_period),
            ("volume_ma_period", self.volume_ma_period),
        ];
        for (name, period) in periods {
            if period == 0 {
                return Err(invalid(format!("{} must be positive", name)));
            }
        }

        if self.fast_ma_period >= self.slow_ma_period {
            return Err(invalid(format!(
                "fast_ma_period ({}) must be shorter than slow_ma_period ({})",
                self.fast_ma_period, self.slow_ma_period
            )));
        }

        for (name, value) in [
            ("overbought", self.overbought),
            ("rsi_neutral", self.rsi_neutral),
        ] {
            if !(value > 0.0 && value <= 100.0) {
                return Err(invalid(format!("{} must be in (0, 100], got {}", name, value)));
            }
        }

        for (name, value) in [
            ("stop_loss_pct", self.stop_loss_pct),
            ("risk_per_trade", self.risk_per_trade),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(invalid(format!("{} must be in (0, 1), got {}", name, value)));
            }
        }

        for (name, value) in [
            ("bb_stddev_factor", self.bb_stddev_factor),
            ("volume_multiplier", self.volume_multiplier),
            ("entry_threshold", self.entry_threshold),
            ("starting_cash", self.starting_cash),
            ("annualization_factor", self.annualization_factor),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{} must be positive, got {}", name, value)));
            }
        }

        if !(self.volume_bonus.is_finite() && self.volume_bonus >= 0.0) {
            return Err(invalid(format!(
                "volume_bonus must be non-negative, got {}",
                self.volume_bonus
            )));
        }

        if !self.risk_free_rate.is_finite() {
            return Err(invalid("risk_free_rate must be finite".to_string()));
        }

        Ok(())
    }

    //number of bars before every indicator of the strategy is ready
    pub fn warmup_bars(&self) -> usize {
        (self.slow_ma_period + 1)
            .max(self.rsi_period + 1)
            .max(self.bb_period)
            .max(self.volume_ma_period)
    }

    //load configuration from a JSON file, missing keys take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: SwingConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}

fn invalid(reason: String) -> BacktestError {
    BacktestError::InvalidConfiguration(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SwingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.warmup_bars(), 51);
    }

    #[test]
    fn zero_period_is_rejected() {
        let config = SwingConfig {
            rsi_period: 0,
            ..SwingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BacktestError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn fast_must_be_shorter_than_slow() {
        let config = SwingConfig {
            fast_ma_period: 50,
            slow_ma_period: 20,
            ..SwingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_threshold_is_rejected() {
        let config = SwingConfig {
            entry_threshold: 0.0,
            ..SwingConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SwingConfig {
            stop_loss_pct: -0.03,
            ..SwingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_round_trip_fills_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "fast_ma_period": 5, "fill_model": "next_close" }"#).unwrap();

        let config = SwingConfig::from_json_file(&path).unwrap();
        assert_eq!(config.fast_ma_period, 5);
        assert_eq!(config.slow_ma_period, 50);
        assert_eq!(config.fill_model, FillModel::NextClose);

        let out = dir.path().join("saved.json");
        config.to_json_file(&out).unwrap();
        assert_eq!(SwingConfig::from_json_file(&out).unwrap(), config);
    }
}
