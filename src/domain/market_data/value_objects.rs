use derive_more::{Constructor, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{AsRefStr, EnumIter, EnumString};

/// Value Object - price in yuan
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, Constructor, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

/// Value Object - traded quantity
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, Constructor, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Volume(f64);

impl Volume {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - trading day as an ISO `YYYY-MM-DD` string.
///
/// ISO dates order lexicographically, so the derived `Ord` is chronological.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Deref, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TradeDate(String);

impl TradeDate {
    pub fn new(date: impl Into<String>) -> Self {
        Self(date.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `(year, month, day)` when the string is a well-formed ISO date
    pub fn parts(&self) -> Option<(u32, u32, u32)> {
        let mut it = self.0.splitn(3, '-');
        let year = it.next()?.parse().ok()?;
        let month = it.next()?.parse().ok()?;
        let day = it.next()?.get(..2)?.parse().ok()?;
        Some((year, month, day))
    }
}

impl From<String> for TradeDate {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TradeDate {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Value Object - exchange-prefixed security code, e.g. `SH000001`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: String) -> Result<Self, String> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err("Symbol cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.trim().to_uppercase())
    }
}

/// Value Object - bar period requested from the data service
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum TimeFrame {
    #[default]
    #[strum(serialize = "1d")]
    #[serde(rename = "1d")]
    Daily,

    #[strum(serialize = "1w")]
    #[serde(rename = "1w")]
    Weekly,

    #[strum(serialize = "1m")]
    #[serde(rename = "1m")]
    Monthly,
}

impl TimeFrame {
    /// Wire value for the `timeFrame` query parameter
    pub fn as_query(&self) -> &str {
        self.as_ref()
    }

    /// Label shown next to the symbol in the chart header
    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "日线",
            Self::Weekly => "周线",
            Self::Monthly => "月线",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn trade_dates_order_chronologically() {
        assert!(TradeDate::from("2024-01-09") < TradeDate::from("2024-01-10"));
        assert!(TradeDate::from("2023-12-31") < TradeDate::from("2024-01-01"));
        assert_eq!(TradeDate::from("2024-03-07").parts(), Some((2024, 3, 7)));
        assert_eq!(TradeDate::from("2024-03-07T00:00:00").parts(), Some((2024, 3, 7)));
        assert_eq!(TradeDate::from("yesterday").parts(), None);
    }

    #[test]
    fn time_frame_round_trips_wire_value() {
        for tf in TimeFrame::iter() {
            assert_eq!(TimeFrame::from_str(tf.as_query()).unwrap(), tf);
        }
        assert_eq!(TimeFrame::Weekly.label(), "周线");
        assert!(TimeFrame::from_str("5m").is_err());
    }

    #[test]
    fn symbol_is_normalized() {
        assert_eq!(Symbol::new(" sh000001 ".to_string()).unwrap().value(), "SH000001");
        assert!(Symbol::new("   ".to_string()).is_err());
    }
}
