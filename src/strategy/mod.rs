pub mod signals;
pub mod sizer;

pub use signals::{EntrySignal, ExitReason, SignalEvaluator};
pub use sizer::PositionSizer;

use crate::config::SwingConfig;
use crate::data::Bar;
use crate::indicators::{Bands, BollingerBands, Cross, Crossover, Rsi, Sma, StreamingIndicator};
use serde::{Deserialize, Serialize};

//every indicator reading the swing rules need for one bar
//only produced once all indicators are past their warm-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub volume: f64,
    pub fast_sma: f64,
    pub slow_sma: f64,
    pub cross: Cross,
    pub rsi: f64,
    pub bands: Bands,
    pub volume_sma: f64,
}

//the indicator set of the swing strategy, updated exactly once per bar
#[derive(Debug, Clone)]
pub struct SwingIndicators {
    fast_sma: Sma,
    slow_sma: Sma,
    crossover: Crossover,
    rsi: Rsi,
    bollinger: BollingerBands,
    volume_sma: Sma,
}

impl SwingIndicators {
    pub fn new(config: &SwingConfig) -> Self {
        SwingIndicators {
            fast_sma: Sma::new(config.fast_ma_period),
            slow_sma: Sma::new(config.slow_ma_period),
            crossover: Crossover::new(),
            rsi: Rsi::new(config.rsi_period),
            bollinger: BollingerBands::new(config.bb_period, config.bb_stddev_factor),
            volume_sma: Sma::new(config.volume_ma_period),
        }
    }

    //feeds the bar to every indicator, None while any is still warming up
    pub fn update(&mut self, bar: &Bar) -> Option<IndicatorSnapshot> {
        let fast_sma = self.fast_sma.update(bar.close);
        let slow_sma = self.slow_sma.update(bar.close);
        let cross = self.crossover.update(fast_sma, slow_sma);
        let rsi = self.rsi.update(bar.close);
        let bands = self.bollinger.update(bar.close);
        let volume_sma = self.volume_sma.update(bar.volume);

        Some(IndicatorSnapshot {
            close: bar.close,
            volume: bar.volume,
            fast_sma: fast_sma?,
            slow_sma: slow_sma?,
            cross: cross?,
            rsi: rsi?,
            bands: bands?,
            volume_sma: volume_sma?,
        })
    }

    //bars required before update() can return a snapshot
    pub fn warmup(&self) -> usize {
        (self.slow_sma.warmup() + 1)
            .max(self.fast_sma.warmup() + 1)
            .max(self.rsi.warmup())
            .max(self.bollinger.warmup())
            .max(self.volume_sma.warmup())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn bars(closes: &[f64]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new_unchecked(start + Duration::days(i as i64), c, c, c, c, 1000.0))
            .collect()
    }

    #[test]
    fn snapshot_appears_exactly_at_warmup() {
        let config = SwingConfig {
            fast_ma_period: 5,
            slow_ma_period: 10,
            ..SwingConfig::default()
        };
        let mut indicators = SwingIndicators::new(&config);
        assert_eq!(indicators.warmup(), 20);
        assert_eq!(indicators.warmup(), config.warmup_bars());

        let series = bars(&(0..30).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let first_ready = series
            .iter()
            .position(|bar| indicators.update(bar).is_some())
            .unwrap();
        assert_eq!(first_ready + 1, indicators.warmup());
    }

    #[test]
    fn default_warmup_is_driven_by_slow_crossover() {
        let indicators = SwingIndicators::new(&SwingConfig::default());
        assert_eq!(indicators.warmup(), 51);
    }
}
