use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use medattest::analyzer::client::ContentClient;
use medattest::api::{attestation_router, ApiContext};
use medattest::config::{self, Settings};
use medattest::db::{open_database, SqliteCaseStore, SqliteRegistry};
use medattest::pipeline::AttestationProcessor;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Medattest starting v{}", config::APP_VERSION);

    let settings = Settings::from_env()?;

    if let Some(parent) = settings.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // Opening once up front creates the schema and runs migrations.
    open_database(&settings.db_path)?;
    tracing::info!(db = %settings.db_path.display(), "database ready");

    let analyzer = ContentClient::new(
        &settings.analyzer_endpoint,
        &settings.analyzer_key,
        &settings.analyzer_id,
        settings.analyze_timeout.as_secs(),
    );
    let registry = SqliteRegistry::new(&settings.db_path);
    let cases = SqliteCaseStore::new(&settings.db_path);

    let processor = AttestationProcessor::new(
        Box::new(analyzer),
        Box::new(registry),
        Box::new(cases),
    );
    let ctx = ApiContext::new(Arc::new(processor), settings.default_lang);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    tracing::info!(addr = %settings.bind_addr, "listening");
    axum::serve(listener, attestation_router(ctx)).await?;

    Ok(())
}
