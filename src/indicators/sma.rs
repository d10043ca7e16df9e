use crate::indicators::{RollingWindow, StreamingIndicator};

//simple moving average over the trailing `period` values
#[derive(Debug, Clone)]
pub struct Sma {
    window: RollingWindow,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Sma {
            window: RollingWindow::new(period),
        }
    }

    pub fn period(&self) -> usize {
        self.window.capacity()
    }
}

impl StreamingIndicator for Sma {
    type Output = f64;

    fn update(&mut self, value: f64) -> Option<f64> {
        self.window.push(value);
        self.current()
    }

    fn current(&self) -> Option<f64> {
        self.window.mean()
    }

    fn warmup(&self) -> usize {
        self.period()
    }
}
