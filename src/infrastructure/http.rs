use crate::config::AppConfig;
use crate::domain::{
    errors::{AppError, NetworkResult},
    logging::{LogComponent, get_logger},
    market_data::{
        PriceBar, Symbol,
        repositories::{CandlestickQuery, CandlestickSource, StockInfo},
    },
};
use gloo::net::http::Request;
use gloo_timers::callback::Timeout;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use web_sys::AbortController;

pub const CANDLESTICK_PATH: &str = "/api/stock/candlestick";
pub const STOCK_INFO_PATH: &str = "/api/stock/info";
pub const STOCK_SEARCH_PATH: &str = "/api/stock/search";

/// Standard response envelope of the data service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseResponse<T> {
    pub code: i32,
    #[serde(default)]
    pub message: String,
    pub data: T,
}

impl<T> BaseResponse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self.code, 0 | 200)
    }
}

/// The service answers either with the bare value or wrapped in [`BaseResponse`]
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Envelope(BaseResponse<T>),
    Bare(T),
}

/// Decode a response body in either shape
pub fn decode_payload<T: DeserializeOwned>(body: &str) -> NetworkResult<T> {
    match serde_json::from_str::<Payload<T>>(body) {
        Ok(Payload::Bare(value)) => Ok(value),
        Ok(Payload::Envelope(envelope)) if envelope.is_success() => Ok(envelope.data),
        Ok(Payload::Envelope(envelope)) => Err(AppError::Network(format!(
            "service error {}: {}",
            envelope.code, envelope.message
        ))),
        Err(e) => Err(AppError::Decode(e.to_string())),
    }
}

/// HTTP client for the stock data service
#[derive(Debug, Clone)]
pub struct StockDataService {
    base_url: String,
    timeout_ms: u32,
}

impl Default for StockDataService {
    fn default() -> Self {
        Self::from_config(crate::config::config())
    }
}

impl StockDataService {
    pub fn new(base_url: impl Into<String>, timeout_ms: u32) -> Self {
        let base_url: String = base_url.into();
        Self { base_url: base_url.trim_end_matches('/').to_string(), timeout_ms }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.api.base_url.clone(), config.api.timeout_ms)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` and decode the body, aborting after the configured timeout
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> NetworkResult<T> {
        let url = self.endpoint(path);
        get_logger().info(
            LogComponent::Infrastructure("StockDataService"),
            &format!("API Request: GET {} {:?}", url, params),
        );

        let controller = AbortController::new()
            .map_err(|e| AppError::Network(format!("AbortController unavailable: {e:?}")))?;
        let signal = controller.signal();
        let _deadline = Timeout::new(self.timeout_ms, move || controller.abort());

        let response = Request::get(&url)
            .query(params.iter().map(|(name, value)| (*name, value.as_str())))
            .abort_signal(Some(&signal))
            .send()
            .await
            .map_err(|e| {
                get_logger().error(
                    LogComponent::Infrastructure("StockDataService"),
                    &format!("API Request Error: {} {}", url, e),
                );
                AppError::from(e)
            })?;

        get_logger().info(
            LogComponent::Infrastructure("StockDataService"),
            &format!("API Response: {} {}", response.status(), url),
        );

        if !response.ok() {
            return Err(AppError::Network(format!(
                "HTTP error: {} - {}",
                response.status(),
                response.status_text()
            )));
        }

        let body = response.text().await?;
        decode_payload(&body)
    }
}

impl CandlestickSource for StockDataService {
    async fn fetch_candlesticks(&self, query: &CandlestickQuery) -> NetworkResult<Vec<PriceBar>> {
        self.get_json(CANDLESTICK_PATH, &query.params()).await
    }

    async fn fetch_stock_info(&self, symbol: &Symbol) -> NetworkResult<StockInfo> {
        let path = format!("{}/{}", STOCK_INFO_PATH, symbol.value());
        self.get_json(&path, &[]).await
    }

    async fn search_stocks(&self, keyword: &str) -> NetworkResult<Vec<StockInfo>> {
        self.get_json(STOCK_SEARCH_PATH, &[("keyword", keyword.to_string())]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_array_decodes() {
        let bars: Vec<PriceBar> = decode_payload(
            r#"[{"date":"2024-01-02","open":10,"close":10.5,"low":9.8,"high":10.7,"volume":1200}]"#,
        )
        .unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date.as_str(), "2024-01-02");
    }

    #[test]
    fn envelope_decodes_and_reports_failures() {
        let info: StockInfo = decode_payload(
            r#"{"code":0,"message":"ok","data":{"symbol":"SH600000","name":"浦发银行","exchange":"SH"}}"#,
        )
        .unwrap();
        assert_eq!(info.name, "浦发银行");

        let failed = decode_payload::<Vec<PriceBar>>(r#"{"code":500,"message":"boom","data":[]}"#);
        assert!(matches!(failed, Err(AppError::Network(msg)) if msg.contains("boom")));

        assert!(matches!(decode_payload::<Vec<PriceBar>>("<html>"), Err(AppError::Decode(_))));
    }

    #[test]
    fn endpoints_are_joined_once() {
        let service = StockDataService::new("http://localhost:1666/", 5_000);
        assert_eq!(service.endpoint(CANDLESTICK_PATH), "http://localhost:1666/api/stock/candlestick");
    }
}
