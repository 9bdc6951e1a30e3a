use todo_api::{
    app,
    config::{AppConfig, StorageBackend},
    db,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "todo_api=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let state = match config.storage {
        StorageBackend::Postgres => {
            let pool = db::connect(&config).await?;
            db::migrate(&pool).await?;
            AppState::postgres(config, pool)
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data will not survive a restart");
            AppState::in_memory(config)
        }
    };

    let config = state.config.clone();
    tracing::info!(environment = %config.environment, storage = ?config.storage, "starting todo-api");
    app::serve(app::build_app(state), &config).await
}
