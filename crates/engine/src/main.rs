//! HeartQuest Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use heartquest_domain::{Catalog, SimulationConfig};
use heartquest_engine::{
    api,
    app::App,
    infrastructure::{
        anthropic::AnthropicClient,
        clock::SystemClock,
        config::EngineConfig,
        ports::ClockPort,
        preferences::SqlitePreferencesRepo,
        resilient_llm::ResilientLlmClient,
    },
    use_cases::spawn_frame_loop,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may be run from `crates/engine`).
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heartquest_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting HeartQuest Engine");

    let config = EngineConfig::from_env();
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

    let preferences = Arc::new(SqlitePreferencesRepo::new(&config.preferences_db, clock.clone()).await?);
    tracing::info!(path = %config.preferences_db, "Preferences store opened");

    let anthropic = Arc::new(AnthropicClient::new(
        &config.anthropic_base_url,
        &config.anthropic_model,
    ));
    let retry_config = config.retry_config();
    tracing::info!(
        model = %anthropic.model(),
        max_retries = retry_config.max_retries,
        base_delay_ms = retry_config.base_delay_ms,
        "Dialogue oracle configured"
    );
    let llm = Arc::new(ResilientLlmClient::new(anthropic, retry_config));

    let app = Arc::new(App::new(
        Arc::new(Catalog::standard()),
        SimulationConfig::default(),
        preferences,
        llm,
        clock,
    ));
    app.init().await?;

    let _frame_loop = spawn_frame_loop(app.session.clone(), config.frame_rate_hz);

    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(config.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
