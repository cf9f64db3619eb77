use chrono::Utc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use duaa_reminder::app::{self, ReminderApp};
use duaa_reminder::config::Config;
use duaa_reminder::notification::{DesktopSurface, LogSurface};
use duaa_reminder::VERSION;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!(version = VERSION, "starting Athkar Reminder");

    // Load configuration
    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "failed to load configuration, using defaults");
            Config::default()
        }
    };

    if let Err(e) = config.validate() {
        error!(error = %e, "configuration validation failed");
        if let Ok(path) = Config::config_path() {
            eprintln!("Please check your config file at: {}", path.display());
        }
        std::process::exit(1);
    }

    let result = if config.enable_notifications {
        match ReminderApp::new(&config, DesktopSurface::new(), Utc::now()) {
            Ok(reminders) => app::run(reminders, &config).await,
            Err(e) => Err(e),
        }
    } else {
        match ReminderApp::new(&config, LogSurface, Utc::now()) {
            Ok(reminders) => app::run(reminders, &config).await,
            Err(e) => Err(e),
        }
    };

    if let Err(e) = result {
        error!(error = %e, "reminder service terminated");
        std::process::exit(1);
    }
}
