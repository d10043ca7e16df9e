use crate::config::SwingConfig;
use crate::indicators::Cross;
use crate::strategy::IndicatorSnapshot;
use serde::{Deserialize, Serialize};

//why an open position is being closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    StopLoss,
    SignalReversal,
}

//a composite score that cleared the entry threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntrySignal {
    pub score: f64,
}

//turns indicator readings into entry scores and exit decisions
#[derive(Debug, Clone)]
pub struct SignalEvaluator {
    rsi_neutral: f64,
    overbought: f64,
    volume_multiplier: f64,
    volume_bonus: f64,
    entry_threshold: f64,
    stop_loss_pct: f64,
}

impl SignalEvaluator {
    pub fn new(config: &SwingConfig) -> Self {
        SignalEvaluator {
            rsi_neutral: config.rsi_neutral,
            overbought: config.overbought,
            volume_multiplier: config.volume_multiplier,
            volume_bonus: config.volume_bonus,
            entry_threshold: config.entry_threshold,
            stop_loss_pct: config.stop_loss_pct,
        }
    }

    //weighted sum of the crossover, rsi, bollinger, and volume sub-signals
    pub fn score(&self, snap: &IndicatorSnapshot) -> f64 {
        let mut score = 0.0;

        //sma crossover
        if snap.cross == Cross::Up {
            score += 1.0;
        }

        //rsi below neutral, scaled by distance
        if snap.rsi < self.rsi_neutral {
            score += (self.rsi_neutral - snap.rsi) / self.rsi_neutral;
        }

        //proximity to the lower band, skipped when the bands have collapsed
        let bands = snap.bands;
        if snap.close <= bands.mid && bands.mid > bands.bottom {
            score += (bands.mid - snap.close) / (bands.mid - bands.bottom);
        }

        //volume spike
        if snap.volume > self.volume_multiplier * snap.volume_sma {
            score += self.volume_bonus;
        }

        score
    }

    pub fn entry(&self, snap: &IndicatorSnapshot) -> Option<EntrySignal> {
        let score = self.score(snap);
        (score >= self.entry_threshold).then_some(EntrySignal { score })
    }

    //price at or below which an open position is stopped out
    pub fn stop_price(&self, entry_price: f64) -> f64 {
        entry_price * (1.0 - self.stop_loss_pct)
    }

    //stop-loss takes precedence over signal reversal
    pub fn exit(&self, snap: &IndicatorSnapshot, entry_price: f64) -> Option<ExitReason> {
        if snap.close <= self.stop_price(entry_price) {
            return Some(ExitReason::StopLoss);
        }

        if snap.cross == Cross::Down
            || snap.rsi > self.overbought
            || snap.close >= snap.bands.top
        {
            return Some(ExitReason::SignalReversal);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::Bands;

    fn snapshot() -> IndicatorSnapshot {
        IndicatorSnapshot {
            close: 100.0,
            volume: 1000.0,
            fast_sma: 100.0,
            slow_sma: 100.0,
            cross: Cross::Flat,
            rsi: 50.0,
            bands: Bands {
                mid: 100.0,
                top: 110.0,
                bottom: 90.0,
            },
            volume_sma: 1000.0,
        }
    }

    fn evaluator() -> SignalEvaluator {
        SignalEvaluator::new(&SwingConfig::default())
    }

    #[test]
    fn neutral_snapshot_scores_zero() {
        assert_eq!(evaluator().score(&snapshot()), 0.0);
    }

    #[test]
    fn crossover_alone_is_below_threshold() {
        let snap = IndicatorSnapshot {
            cross: Cross::Up,
            close: 101.0,
            ..snapshot()
        };
        assert_eq!(evaluator().score(&snap), 1.0);
        assert!(evaluator().entry(&snap).is_none());
    }

    #[test]
    fn composite_score_sums_components() {
        //crossover 1.0 + rsi (50-40)/50 = 0.2 + band (100-95)/(100-90) = 0.5 + volume 0.1
        let snap = IndicatorSnapshot {
            cross: Cross::Up,
            rsi: 40.0,
            close: 95.0,
            volume: 1600.0,
            ..snapshot()
        };
        let score = evaluator().score(&snap);
        assert!((score - 1.8).abs() < 1e-12);
        assert!(evaluator().entry(&snap).is_some());
    }

    #[test]
    fn collapsed_bands_are_skipped() {
        let snap = IndicatorSnapshot {
            bands: Bands {
                mid: 100.0,
                top: 100.0,
                bottom: 100.0,
            },
            ..snapshot()
        };
        let score = evaluator().score(&snap);
        assert!(score.is_finite());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn stop_loss_wins_over_reversal() {
        let snap = IndicatorSnapshot {
            close: 96.0,
            cross: Cross::Down,
            rsi: 80.0,
            ..snapshot()
        };
        assert_eq!(evaluator().exit(&snap, 100.0), Some(ExitReason::StopLoss));
    }

    #[test]
    fn reversal_conditions() {
        let eval = evaluator();
        let crossed = IndicatorSnapshot {
            cross: Cross::Down,
            ..snapshot()
        };
        let overbought = IndicatorSnapshot {
            rsi: 71.0,
            ..snapshot()
        };
        let at_top = IndicatorSnapshot {
            close: 110.0,
            ..snapshot()
        };
        for snap in [crossed, overbought, at_top] {
            assert_eq!(eval.exit(&snap, 100.0), Some(ExitReason::SignalReversal));
        }
        assert_eq!(eval.exit(&snapshot(), 100.0), None);
    }

    #[test]
    fn stop_boundary_is_inclusive() {
        let eval = evaluator();
        let snap = IndicatorSnapshot {
            close: eval.stop_price(100.0),
            ..snapshot()
        };
        assert_eq!(eval.exit(&snap, 100.0), Some(ExitReason::StopLoss));
    }
}
