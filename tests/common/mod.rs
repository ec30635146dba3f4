#![allow(dead_code)]

use kline_chart_wasm::domain::market_data::PriceBar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Bar with open = high = low = close = `close`
pub fn make_bar(day: usize, close: f64) -> PriceBar {
    PriceBar::new(trading_date(day), close, close, close, close, 1_000.0)
}

pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    trading_dates(closes.len())
        .into_iter()
        .zip(closes)
        .map(|(date, &c)| PriceBar::new(date, c, c, c, c, 1_000.0))
        .collect()
}

/// Date of the `index`-th weekday starting at 2023-01-02 (a Monday)
pub fn trading_date(index: usize) -> String {
    trading_dates(index + 1).pop().unwrap_or_default()
}

/// The first `count` weekdays starting at 2023-01-02
pub fn trading_dates(count: usize) -> Vec<String> {
    let mut dates = Vec::with_capacity(count);
    let mut date = (2023u32, 1u32, 2u32);
    let mut weekday = 0usize;
    while dates.len() < count {
        if weekday < 5 {
            dates.push(format!("{:04}-{:02}-{:02}", date.0, date.1, date.2));
        }
        date = next_day(date);
        weekday = (weekday + 1) % 7;
    }
    dates
}

fn next_day((year, month, day): (u32, u32, u32)) -> (u32, u32, u32) {
    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    let days_in_month = match month {
        2 if leap => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    };
    if day < days_in_month {
        (year, month, day + 1)
    } else if month < 12 {
        (year, month + 1, 1)
    } else {
        (year + 1, 1, 1)
    }
}

/// Deterministic random walk around 100 with daily volatility of 1-5%
pub fn random_walk(days: usize, seed: u64) -> Vec<PriceBar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price = 100.0_f64;
    trading_dates(days)
        .into_iter()
        .map(|date| {
            let volatility = rng.random_range(0.01..0.05);
            let trend = rng.random_range(-1.0..1.0) * volatility;
            let open = price;
            let close = open * (1.0 + trend);
            let high = open.max(close) * (1.0 + rng.random_range(0.0..volatility));
            let low = open.min(close) * (1.0 - rng.random_range(0.0..volatility));
            let volume = rng.random_range(1_000_000..5_000_000) as f64;
            price = close;
            PriceBar::new(date, open, high, low, close, volume)
        })
        .collect()
}
