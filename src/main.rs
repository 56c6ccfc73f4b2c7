use tasker_api::config;
use tasker_api::routes::app;
use tasker_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasker_api=info,tower_http=info".into()),
        )
        .init();

    let config = config::config();
    tracing::info!("starting Tasker API in {:?} mode", config.environment);

    let state = AppState::from_config(config).await?;
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Tasker API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
