use crate::domain::{
    logging::LogComponent,
    market_data::{
        PriceBar, Symbol,
        repositories::{CandlestickQuery, CandlestickSource, StockInfo},
    },
};
use crate::{log_error, log_info};

/// Use Case: fetch chart data, never failing.
///
/// Errors from the source are logged here and replaced by an empty result,
/// so the chart renders "no data" instead of surfacing the failure.
pub struct LoadCandlesticksUseCase<R: CandlestickSource> {
    source: R,
}

/// Bars plus listing metadata for one symbol
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SymbolSnapshot {
    pub bars: Vec<PriceBar>,
    pub info: Option<StockInfo>,
}

impl<R: CandlestickSource> LoadCandlesticksUseCase<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    pub async fn bars(&self, query: &CandlestickQuery) -> Vec<PriceBar> {
        match self.source.fetch_candlesticks(query).await {
            Ok(bars) => {
                log_info!(
                    LogComponent::Application("LoadCandlesticks"),
                    "loaded {} {} bars for {}",
                    bars.len(),
                    query.time_frame,
                    query.symbol
                );
                bars
            }
            Err(e) => {
                log_error!(
                    LogComponent::Application("LoadCandlesticks"),
                    "failed to load candlesticks for {}: {}",
                    query.symbol,
                    e
                );
                Vec::new()
            }
        }
    }

    pub async fn stock_info(&self, symbol: &Symbol) -> Option<StockInfo> {
        match self.source.fetch_stock_info(symbol).await {
            Ok(info) => Some(info),
            Err(e) => {
                log_error!(
                    LogComponent::Application("LoadCandlesticks"),
                    "failed to load stock info for {}: {}",
                    symbol,
                    e
                );
                None
            }
        }
    }

    pub async fn search(&self, keyword: &str) -> Vec<StockInfo> {
        match self.source.search_stocks(keyword).await {
            Ok(found) => found,
            Err(e) => {
                log_error!(
                    LogComponent::Application("LoadCandlesticks"),
                    "stock search for {:?} failed: {}",
                    keyword,
                    e
                );
                Vec::new()
            }
        }
    }

    /// Bars and stock info requested concurrently
    pub async fn snapshot(&self, query: &CandlestickQuery) -> SymbolSnapshot {
        let (bars, info) = futures::join!(self.bars(query), self.stock_info(&query.symbol));
        SymbolSnapshot { bars, info }
    }
}
