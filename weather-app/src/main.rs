//! Binary crate for the Live Weather desktop window.
//!
//! This crate focuses on:
//! - Loading configuration and the API key once at startup
//! - Running lookups in response to user input
//! - Drawing the weather text and the condition animation

use anyhow::{Context, anyhow, bail};
use eframe::egui;
use live_weather_core::{Config, config::API_KEY_ENV};
use tracing_subscriber::EnvFilter;

mod app;
mod screen;
mod textures;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;
    if let Err(e) = config.require_api_key() {
        let path = Config::config_file_path()?;
        tracing::error!("{e}");
        bail!(
            "{e}\n\
             Hint: set {API_KEY_ENV} or add `api_key = \"...\"` to {}.",
            path.display()
        );
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([400.0, 600.0])
            .with_title("Live Weather"),
        ..Default::default()
    };

    tracing::info!("Starting Live Weather");
    eframe::run_native(
        "Live Weather",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            let app = app::WeatherApp::new(&config, runtime)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow!("Window closed with an error: {e}"))
}
