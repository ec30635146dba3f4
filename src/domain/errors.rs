use derive_more::Display;

/// Application error - one flat enum, no layering ceremony.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum AppError {
    #[display(fmt = "Network Error: {}", _0)]
    Network(String),
    #[display(fmt = "Decode Error: {}", _0)]
    Decode(String),
    #[display(fmt = "Rendering Error: {}", _0)]
    Rendering(String),
    #[display(fmt = "Configuration Error: {}", _0)]
    Configuration(String),
}

impl std::error::Error for AppError {}

impl AppError {
    /// Wrap a JS exception raised while drawing
    pub fn rendering_js(error: wasm_bindgen::JsValue) -> Self {
        AppError::Rendering(format!("{error:?}"))
    }
}

impl From<gloo_net::Error> for AppError {
    fn from(error: gloo_net::Error) -> Self {
        match error {
            gloo_net::Error::SerdeError(e) => AppError::Decode(e.to_string()),
            other => AppError::Network(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::Decode(error.to_string())
    }
}

impl From<AppError> for wasm_bindgen::JsValue {
    fn from(error: AppError) -> Self {
        wasm_bindgen::JsValue::from_str(&error.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
pub type NetworkResult<T> = AppResult<T>;
pub type RenderingResult<T> = AppResult<T>;
