mod app;
mod settings;
mod tui;

use anyhow::Result;
use settings::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Used when `RUST_LOG` is unset; the binary's own events are logged under
/// `savannah`, the engine stays quiet below warnings
const DEFAULT_LOG_FILTER: &str = "savannah=info,sim=warn";

fn main() -> Result<()> {
    // Logs go to stderr so they stay out of the terminal UI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Settings::from_env()?;

    tracing::info!("Starting Savannah");
    tracing::debug!(?settings, "Loaded settings");

    app::run(settings)
}
