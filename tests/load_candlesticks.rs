mod common;

use common::random_walk;
use futures::executor::block_on;
use kline_chart_wasm::application::{LoadCandlesticksUseCase, SymbolSnapshot};
use kline_chart_wasm::domain::errors::{AppError, NetworkResult};
use kline_chart_wasm::domain::market_data::repositories::{
    CandlestickQuery, CandlestickSource, StockInfo,
};
use kline_chart_wasm::domain::market_data::{PriceBar, Symbol, TimeFrame, TradeDate};
use std::cell::RefCell;

/// Canned responses; records every candlestick query it sees
struct FakeSource {
    bars: NetworkResult<Vec<PriceBar>>,
    info: NetworkResult<StockInfo>,
    queries: RefCell<Vec<CandlestickQuery>>,
}

impl FakeSource {
    fn ok(bars: Vec<PriceBar>) -> Self {
        Self { bars: Ok(bars), info: Ok(sse_index()), queries: RefCell::new(Vec::new()) }
    }

    fn failing() -> Self {
        Self {
            bars: Err(AppError::Network("HTTP 500".into())),
            info: Err(AppError::Decode("expected value at line 1 column 1".into())),
            queries: RefCell::new(Vec::new()),
        }
    }
}

impl CandlestickSource for FakeSource {
    async fn fetch_candlesticks(&self, query: &CandlestickQuery) -> NetworkResult<Vec<PriceBar>> {
        self.queries.borrow_mut().push(query.clone());
        self.bars.clone()
    }

    async fn fetch_stock_info(&self, _symbol: &Symbol) -> NetworkResult<StockInfo> {
        self.info.clone()
    }

    async fn search_stocks(&self, keyword: &str) -> NetworkResult<Vec<StockInfo>> {
        match &self.info {
            Ok(info) if info.name.contains(keyword) || info.symbol.contains(keyword) => {
                Ok(vec![info.clone()])
            }
            Ok(_) => Ok(Vec::new()),
            Err(e) => Err(e.clone()),
        }
    }
}

fn sse_index() -> StockInfo {
    StockInfo { symbol: "SH000001".into(), name: "上证指数".into(), exchange: "SSE".into() }
}

fn daily(symbol: &str) -> CandlestickQuery {
    CandlestickQuery::new(Symbol::from(symbol), TimeFrame::Daily)
}

#[test]
fn successful_load_returns_bars() {
    let bars = random_walk(40, 5);
    let use_case = LoadCandlesticksUseCase::new(FakeSource::ok(bars.clone()));
    let loaded = block_on(use_case.bars(&daily("SH000001")));
    assert_eq!(loaded, bars);
}

#[test]
fn failed_load_degrades_to_empty() {
    let use_case = LoadCandlesticksUseCase::new(FakeSource::failing());
    assert!(block_on(use_case.bars(&daily("SH000001"))).is_empty());
    assert_eq!(block_on(use_case.stock_info(&Symbol::from("SH000001"))), None);
    assert!(block_on(use_case.search("上证")).is_empty());
}

#[test]
fn query_reaches_the_source_unchanged() {
    let use_case = LoadCandlesticksUseCase::new(FakeSource::ok(Vec::new()));
    let query = CandlestickQuery::new(Symbol::from("SZ000001"), TimeFrame::Weekly)
        .between(Some(TradeDate::from("2024-01-01")), None);
    block_on(use_case.bars(&query));

    let seen = use_case.source().queries.borrow();
    assert_eq!(seen.as_slice(), &[query.clone()]);
    assert_eq!(
        seen[0].params(),
        vec![
            ("symbol", "SZ000001".to_string()),
            ("timeFrame", "1w".to_string()),
            ("startDate", "2024-01-01".to_string()),
        ]
    );
}

#[test]
fn search_filters_by_keyword() {
    let use_case = LoadCandlesticksUseCase::new(FakeSource::ok(Vec::new()));
    assert_eq!(block_on(use_case.search("上证")), vec![sse_index()]);
    assert!(block_on(use_case.search("深证")).is_empty());
}

#[test]
fn snapshot_combines_bars_and_info() {
    let bars = random_walk(3, 9);
    let use_case = LoadCandlesticksUseCase::new(FakeSource::ok(bars.clone()));
    let snapshot = block_on(use_case.snapshot(&daily("SH000001")));
    assert_eq!(snapshot, SymbolSnapshot { bars, info: Some(sse_index()) });

    let failing = LoadCandlesticksUseCase::new(FakeSource::failing());
    assert_eq!(block_on(failing.snapshot(&daily("SH000001"))), SymbolSnapshot::default());
}
