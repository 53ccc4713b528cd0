mod api;
mod app;
mod browser;
mod components;
mod config;
mod error;
mod logging;
mod models;
mod pages;
mod query_cache;
mod services;
mod session;
#[cfg(test)]
mod testing;
mod validation;
mod view_state;

use app::App;
use config::AppConfig;
use leptos::prelude::*;

fn main() {
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    logging::init(&config.log_level);
    if let Some(e) = config_error {
        tracing::warn!("Ignoring page config, using defaults: {}", e);
    }
    tracing::info!("Starting FoodBook client");

    leptos::mount::mount_to_body(move || view! { <App config=config /> });
}
