//! Look-ahead contamination tests.
//!
//! Method: replay a truncated series and the full series, then assert
//! every value up to the truncation point is identical.

use chrono::{Duration, TimeZone, Utc};
use swingtrader::prelude::*;

/// Deterministic pseudo-random walk using a simple LCG.
fn make_test_bars(n: usize) -> Vec<Bar> {
    let start = Utc.with_ymd_and_hms(2022, 1, 3, 0, 0, 0).unwrap();
    let mut price = 100.0;
    let mut bars = Vec::with_capacity(n);

    for i in 0..n {
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.03;
        price = (price + change).max(10.0);
        let volume = 1000.0 + ((seed >> 8) % 1500) as f64;

        bars.push(Bar::new_unchecked(
            start + Duration::days(i as i64),
            price,
            price + 1.0,
            price - 1.0,
            price,
            volume,
        ));
    }

    bars
}

fn config() -> SwingConfig {
    SwingConfig {
        fast_ma_period: 5,
        slow_ma_period: 15,
        ..SwingConfig::default()
    }
}

#[test]
fn indicator_snapshots_ignore_future_bars() {
    let bars = make_test_bars(200);
    let truncated_len = 120;

    let mut full = SwingIndicators::new(&config());
    let full_snaps: Vec<_> = bars.iter().map(|b| full.update(b)).collect();

    let mut truncated = SwingIndicators::new(&config());
    let truncated_snaps: Vec<_> = bars[..truncated_len]
        .iter()
        .map(|b| truncated.update(b))
        .collect();

    assert_eq!(&full_snaps[..truncated_len], truncated_snaps.as_slice());
    assert!(full_snaps[truncated_len - 1].is_some());
}

#[test]
fn equity_and_fills_ignore_future_bars() {
    let bars = make_test_bars(200);
    let truncated_len = 120;

    let full = run_backtest(config(), bars.clone()).unwrap();
    let truncated = run_backtest(config(), bars[..truncated_len].to_vec()).unwrap();

    assert_eq!(
        &full.equity_curve[..truncated_len],
        truncated.equity_curve.as_slice()
    );

    let full_prefix: Vec<_> = full
        .trades
        .iter()
        .filter(|f| f.bar_index < truncated_len)
        .cloned()
        .collect();
    assert_eq!(full_prefix, truncated.trades);
}
