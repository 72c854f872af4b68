use std::process::ExitCode;

use explain_proxy::{
    build_app, config::AppConfig, gateway::GatewayClient, init_tracing, run_server, AppState,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(
        port = config.port,
        gateway = %config.gateway.url,
        model = %config.gateway.model,
        timeout_ms = config.gateway.timeout_ms,
        "loaded configuration"
    );

    let app = build_app(AppState::new(GatewayClient::new(config.gateway)));

    if let Err(err) = run_server(app, config.port).await {
        error!(error = %err, "server failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
