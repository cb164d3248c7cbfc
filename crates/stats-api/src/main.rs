//! 주가 통계 API 서버.
//!
//! 설정은 `config/default.toml`과 `STATS__` 접두사 환경 변수에서 읽습니다.
//! `.env` 파일이 있으면 먼저 로드합니다.

use std::sync::Arc;

use tracing::{info, warn};

use stats_api::{create_app, AppState};
use stats_core::{init_logging, AppConfig};
use stats_data::{DataProvider, ResultCache, ServiceOptions, StatsService, YahooChartProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = AppConfig::load_default()?;
    init_logging(config.logging.to_log_config())?;

    info!("Starting stats API server...");

    let provider: Arc<dyn DataProvider> =
        Arc::new(YahooChartProvider::from_config(&config.provider)?);
    let cache = Arc::new(ResultCache::from_config(&config.cache));
    let service = StatsService::with_options(
        provider,
        Arc::clone(&cache),
        ServiceOptions::from_config(&config),
    );

    info!(
        provider = service.provider_name(),
        base_url = %config.provider.base_url,
        ttl_secs = config.cache.ttl_secs,
        max_entries = ?config.cache.max_entries,
        single_flight = config.cache.single_flight,
        "Stats service initialized"
    );

    let state = Arc::new(AppState::new(Arc::new(service)));
    let app = create_app(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let stats = cache.stats().await;
    info!(
        entries = stats.entries,
        hits = stats.hits,
        misses = stats.misses,
        "Server shutdown complete"
    );

    Ok(())
}

/// Ctrl+C 또는 SIGTERM 수신까지 대기합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
