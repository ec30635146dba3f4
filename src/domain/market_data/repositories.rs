use super::{PriceBar, Symbol, TimeFrame, TradeDate};
use crate::domain::errors::NetworkResult;
use serde::{Deserialize, Serialize};

/// Parameters of a candlestick request
#[derive(Debug, Clone, PartialEq)]
pub struct CandlestickQuery {
    pub symbol: Symbol,
    pub time_frame: TimeFrame,
    pub start_date: Option<TradeDate>,
    pub end_date: Option<TradeDate>,
}

impl CandlestickQuery {
    pub fn new(symbol: Symbol, time_frame: TimeFrame) -> Self {
        Self { symbol, time_frame, start_date: None, end_date: None }
    }

    pub fn between(mut self, start: Option<TradeDate>, end: Option<TradeDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// `(name, value)` pairs in wire order; absent dates are skipped
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("symbol", self.symbol.value().to_string()),
            ("timeFrame", self.time_frame.as_query().to_string()),
        ];
        if let Some(start) = &self.start_date {
            params.push(("startDate", start.as_str().to_string()));
        }
        if let Some(end) = &self.end_date {
            params.push(("endDate", end.as_str().to_string()));
        }
        params
    }
}

/// Listing metadata for one security
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockInfo {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
}

/// Source of daily bars and stock metadata.
///
/// Errors are reported as-is; turning them into empty results is the
/// caller's decision.
#[allow(async_fn_in_trait)]
pub trait CandlestickSource {
    async fn fetch_candlesticks(&self, query: &CandlestickQuery) -> NetworkResult<Vec<PriceBar>>;

    async fn fetch_stock_info(&self, symbol: &Symbol) -> NetworkResult<StockInfo>;

    async fn search_stocks(&self, keyword: &str) -> NetworkResult<Vec<StockInfo>>;
}
