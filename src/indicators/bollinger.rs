use crate::indicators::{RollingWindow, StreamingIndicator};
use serde::{Deserialize, Serialize};

//bollinger band reading for one bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bands {
    pub mid: f64,
    pub top: f64,
    pub bottom: f64,
}

//mid = sma(period), half width = k * population std dev of the same window
#[derive(Debug, Clone)]
pub struct BollingerBands {
    window: RollingWindow,
    factor: f64,
}

impl BollingerBands {
    pub fn new(period: usize, factor: f64) -> Self {
        BollingerBands {
            window: RollingWindow::new(period),
            factor,
        }
    }
}

impl StreamingIndicator for BollingerBands {
    type Output = Bands;

    fn update(&mut self, close: f64) -> Option<Bands> {
        self.window.push(close);
        self.current()
    }

    fn current(&self) -> Option<Bands> {
        let mid = self.window.mean()?;
        let half_width = self.factor * self.window.population_std_dev()?;
        Some(Bands {
            mid,
            top: mid + half_width,
            bottom: mid - half_width,
        })
    }

    fn warmup(&self) -> usize {
        self.window.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_use_population_std_dev() {
        let mut bb = BollingerBands::new(8, 2.0);
        let mut last = None;
        for v in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            last = bb.update(v);
        }
        let bands = last.unwrap();
        assert_eq!(bands.mid, 5.0);
        assert_eq!(bands.top, 9.0);
        assert_eq!(bands.bottom, 1.0);
    }

    #[test]
    fn flat_series_collapses_bands() {
        let mut bb = BollingerBands::new(3, 2.0);
        for _ in 0..3 {
            bb.update(10.0);
        }
        let bands = bb.current().unwrap();
        assert_eq!(bands.mid, bands.bottom);
        assert_eq!(bands.mid, bands.top);
    }

    #[test]
    fn not_ready_before_period() {
        let mut bb = BollingerBands::new(20, 2.0);
        for i in 0..19 {
            assert!(bb.update(i as f64).is_none());
        }
    }
}
