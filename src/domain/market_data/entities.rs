use super::{Price, TradeDate, Volume};
use serde::{Deserialize, Serialize};

/// Bar direction; A-share convention paints `Up` red and `Down` green.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Domain entity - one trading period (OHLCV).
///
/// Field names follow the data service payload:
/// `{"date": "2024-01-02", "open": .., "close": .., "low": .., "high": .., "volume": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: TradeDate,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Volume,
}

impl PriceBar {
    pub fn new(
        date: impl Into<TradeDate>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            date: date.into(),
            open: Price::from(open),
            high: Price::from(high),
            low: Price::from(low),
            close: Price::from(close),
            volume: Volume::from(volume),
        }
    }

    /// `Up` iff close >= open; a flat bar counts as up.
    pub fn direction(&self) -> Direction {
        if self.close.value() >= self.open.value() {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_bar_is_up() {
        let bar = PriceBar::new("2024-01-02", 10.0, 10.5, 9.5, 10.0, 1_000.0);
        assert_eq!(bar.direction(), Direction::Up);
        let down = PriceBar::new("2024-01-03", 10.0, 10.5, 9.5, 9.99, 1_000.0);
        assert_eq!(down.direction(), Direction::Down);
    }

    #[test]
    fn deserializes_service_payload() {
        let json = r#"{"date":"2024-01-02","open":10.0,"close":10.4,"low":9.8,"high":10.6,"volume":1200000}"#;
        let bar: PriceBar = serde_json::from_str(json).unwrap();
        assert_eq!(bar.date.as_str(), "2024-01-02");
        assert_eq!(bar.close.value(), 10.4);
        assert_eq!(bar.volume.value(), 1_200_000.0);
    }
}
