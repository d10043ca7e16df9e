use crate::indicators::StreamingIndicator;

//wilder relative strength index
//seeded with the simple average of the first `period` changes,
//then smoothed as avg = (avg * (period - 1) + change) / period
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    prev_close: Option<f64>,
    changes_seen: usize,
    gain_sum: f64,
    loss_sum: f64,
    avg_gain: Option<f64>,
    avg_loss: Option<f64>,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Rsi {
            period,
            prev_close: None,
            changes_seen: 0,
            gain_sum: 0.0,
            loss_sum: 0.0,
            avg_gain: None,
            avg_loss: None,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    fn accumulate(&mut self, gain: f64, loss: f64) {
        self.changes_seen += 1;
        let period = self.period as f64;

        match (self.avg_gain, self.avg_loss) {
            (Some(avg_gain), Some(avg_loss)) => {
                self.avg_gain = Some((avg_gain * (period - 1.0) + gain) / period);
                self.avg_loss = Some((avg_loss * (period - 1.0) + loss) / period);
            }
            _ => {
                self.gain_sum += gain;
                self.loss_sum += loss;
                if self.changes_seen == self.period {
                    self.avg_gain = Some(self.gain_sum / period);
                    self.avg_loss = Some(self.loss_sum / period);
                }
            }
        }
    }
}

impl StreamingIndicator for Rsi {
    type Output = f64;

    fn update(&mut self, close: f64) -> Option<f64> {
        if let Some(prev) = self.prev_close {
            let change = close - prev;
            if change > 0.0 {
                self.accumulate(change, 0.0);
            } else {
                self.accumulate(0.0, -change);
            }
        }
        self.prev_close = Some(close);
        self.current()
    }

    fn current(&self) -> Option<f64> {
        let avg_gain = self.avg_gain?;
        let avg_loss = self.avg_loss?;

        if avg_loss == 0.0 {
            //flat window reads neutral, pure gains read 100
            return Some(if avg_gain == 0.0 { 50.0 } else { 100.0 });
        }

        let rs = avg_gain / avg_loss;
        Some(100.0 - (100.0 / (1.0 + rs)))
    }

    fn warmup(&self) -> usize {
        self.period + 1
    }
}
