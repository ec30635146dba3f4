use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::config::AppConfig;
use crate::domain::logging::{LogComponent, get_logger};

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod event_utils;
pub mod infrastructure;
pub mod presentation;
pub mod time_utils;

/// Install the panic hook, console logger and browser clock
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let defaults = AppConfig::default();
    let console_logger = Box::new(infrastructure::services::ConsoleLogger::from_config(&defaults));
    domain::logging::init_logger(console_logger);

    let browser_time_provider = Box::new(infrastructure::services::BrowserTimeProvider::new());
    domain::logging::init_time_provider(browser_time_provider);

    get_logger().info(
        LogComponent::Presentation("Initialize"),
        &format!("{} v{} ({})", defaults.app.name, defaults.app.version, defaults.app.env),
    );
}

/// Override the compiled-in configuration. Must run before anything reads it.
#[wasm_bindgen(js_name = configure)]
pub fn configure(config_json: &str) -> Result<(), JsValue> {
    let config = AppConfig::from_json(config_json)?;
    if !config::init_config(config) {
        get_logger().warn(
            LogComponent::Presentation("Configure"),
            "configuration already in use; override ignored",
        );
    }
    Ok(())
}

/// Render the A-share dashboard into `<body>`
#[wasm_bindgen(js_name = mountDashboard)]
pub fn mount_dashboard() {
    leptos::mount_to_body(|| leptos::view! { <App/> });
    get_logger().info(LogComponent::Presentation("Initialize"), "dashboard mounted");
}
