//! RouteShare - desktop client for a cycling route sharing site
//!
//! Main entry point for the application.

use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;

fn main() -> eframe::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RouteShare v{}", env!("CARGO_PKG_VERSION"));

    // A broken config file should not keep the app from starting
    let config = routeshare::storage::config::load_config().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        routeshare::AppConfig::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("RouteShare"),
        ..Default::default()
    };

    eframe::run_native(
        "RouteShare",
        options,
        Box::new(move |cc| Ok(Box::new(app::RouteShareApp::new(cc, config)?))),
    )
}
