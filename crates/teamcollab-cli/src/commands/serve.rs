//! `teamcollab serve`: start the HTTP and WebSocket server.

use clap::Args;

use teamcollab_core::error::AppError;

/// Arguments for `serve`.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the listening port
    #[arg(short, long)]
    pub port: Option<u16>,
    /// Override the bind host
    #[arg(long)]
    pub host: Option<String>,
}

/// Load configuration, apply overrides and run until a shutdown signal.
pub async fn execute(args: &ServeArgs, env: &str) -> Result<(), AppError> {
    let mut config = super::load_config(env)?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }

    tracing::info!("Starting TeamCollab on {}", config.server.bind_address());
    teamcollab_api::run_server(config).await
}
