use crate::app::App;
use crate::core::network::HttpScoreService;
use crate::gameplay::profile;
use crate::gameplay::target::TargetGenerator;
use log::{LevelFilter, error, info};
use std::error::Error;
use std::io;
use std::sync::Arc;

mod app;
mod config;
mod core;
mod gameplay;
mod screens;

fn main() -> Result<(), Box<dyn Error>> {
    // --- Logging Setup ---
    // Logs go to stderr; the game itself talks on stdout.
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module("chromaguess::core::network", LevelFilter::Info)
        .filter_module("chromaguess::gameplay::reconcile", LevelFilter::Info)
        .init();

    info!("Application starting...");

    let profile = profile::load();
    info!(
        "Settings: server {}, percentile {}, reconciliation {}",
        profile.server_url,
        if profile.engine.show_percentile { "on" } else { "off" },
        profile.engine.reconciliation
    );

    let service = Arc::new(HttpScoreService::new(&profile.server_url, profile.timeout));
    let mut app = App::new(profile, service, TargetGenerator::from_os_rng());

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = app.run(stdin.lock(), stdout.lock()) {
        error!("Console session ended with error: {}", e);
        return Err(e.into());
    }

    info!("Application exited gracefully.");
    Ok(())
}
