use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//a point in the equity curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub equity: f64,
    pub drawdown: f64,
    pub returns: f64,
}

impl EquityPoint {
    pub fn new(timestamp: DateTime<Utc>, equity: f64, drawdown: f64, returns: f64) -> Self {
        EquityPoint {
            timestamp,
            equity,
            drawdown,
            returns,
        }
    }
}

//append-only per-bar equity record
//drawdown is measured against the running peak, starting from the initial balance
#[derive(Debug, Clone)]
pub struct EquityCurve {
    points: Vec<EquityPoint>,
    peak: f64,
}

impl EquityCurve {
    pub fn new(initial_balance: f64) -> Self {
        EquityCurve {
            points: Vec::new(),
            peak: initial_balance,
        }
    }

    pub fn push(&mut self, timestamp: DateTime<Utc>, equity: f64) -> &EquityPoint {
        //update peak
        if equity > self.peak {
            self.peak = equity;
        }

        let drawdown = if self.peak > 0.0 {
            (self.peak - equity) / self.peak
        } else {
            0.0
        };

        let returns = match self.points.last() {
            Some(prev) if prev.equity != 0.0 => equity / prev.equity - 1.0,
            _ => 0.0,
        };

        let index = self.points.len();
        self.points
            .push(EquityPoint::new(timestamp, equity, drawdown, returns));
        &self.points[index]
    }

    pub fn points(&self) -> &[EquityPoint] {
        &self.points
    }

    pub fn last(&self) -> Option<&EquityPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_points(self) -> Vec<EquityPoint> {
        self.points
    }
}

//calculates maximum drawdown from equity curve
pub fn max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    equity_curve
        .iter()
        .map(|point| point.drawdown)
        .fold(0.0, f64::max)
}

//per-bar returns r_t = equity_t / equity_{t-1} - 1
pub fn calculate_returns(equity_values: &[f64]) -> Vec<f64> {
    if equity_values.len() < 2 {
        return vec![];
    }

    equity_values
        .windows(2)
        .map(|pair| pair[1] / pair[0] - 1.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(i: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap() + Duration::days(i)
    }

    #[test]
    fn tracks_drawdown_from_peak() {
        let mut curve = EquityCurve::new(100.0);
        curve.push(day(0), 100.0);
        curve.push(day(1), 120.0);
        curve.push(day(2), 90.0);
        curve.push(day(3), 110.0);

        assert_eq!(curve.len(), 4);
        assert!((curve.points()[2].drawdown - 0.25).abs() < 1e-12);
        assert!((max_drawdown(curve.points()) - 0.25).abs() < 1e-12);
        assert!((curve.points()[1].returns - 0.2).abs() < 1e-12);
    }

    #[test]
    fn returns_need_two_points() {
        assert!(calculate_returns(&[100.0]).is_empty());
        let returns = calculate_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.1).abs() < 1e-12);
        assert!((returns[1] + 0.1).abs() < 1e-12);
    }
}
