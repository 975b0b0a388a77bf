use ado_query_assistant::config::Config;
use ado_query_assistant::server::{http, routes::AppState};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();
    let config = Config::parse();

    let state = AppState::new(config.client_options());
    log::info!(
        "Running without query enrichment - using keyword classification (timeout {}s)",
        config.request_timeout_secs
    );

    http::run_server(state, &config.bind_address()).await?;
    Ok(())
}
