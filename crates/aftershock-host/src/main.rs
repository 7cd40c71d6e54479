use tracing_subscriber::EnvFilter;

use aftershock_host::{HostConfig, logging_collaborators, run_match};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Aftershock host starting");

    let config = HostConfig::load();
    let summary = run_match(&config, logging_collaborators());

    match serde_json::to_string_pretty(&summary.standings) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!("Failed to serialize standings: {e}");
            std::process::exit(1);
        },
    }
}
