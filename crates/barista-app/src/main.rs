//! Barista service binary - composition root.
//!
//! Ties together all Barista crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Build the menu cache, oracle client, ledger, and speech synthesizer
//! 3. Wire the order-construction engine and single-turn parser
//! 4. Start the background idle-session sweeper
//! 5. Start the axum REST API server

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use barista_api::{routes, AppState};
use barista_chat::{OrderEngine, SessionStore, SingleTurnParser};
use barista_core::BaristaConfig;
use barista_ledger::{FileLedger, Ledger};
use barista_menu::{HttpMenuSource, MenuCache, MenuSource, StaticMenuSource};
use barista_menu::types::MenuSnapshot;
use barista_oracle::HttpOracle;
use barista_voice::{HttpSpeech, SpeechSynthesizer};

/// Remove sessions idle past the configured threshold, forever.
async fn session_sweep_loop(sessions: Arc<SessionStore>, interval_minutes: u32) {
    let period = Duration::from_secs(u64::from(interval_minutes.max(1)) * 60);
    let mut interval = tokio::time::interval(period);
    // The first tick fires immediately; skip it.
    interval.tick().await;

    tracing::info!(interval_minutes, "Session sweeper started");
    loop {
        interval.tick().await;
        let removed = sessions.sweep_expired();
        if removed > 0 {
            tracing::info!(removed, "Swept idle sessions");
        }
    }
}

fn config_path() -> PathBuf {
    std::env::var("BARISTA_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("barista.toml"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Barista v{}", env!("CARGO_PKG_VERSION"));

    // Config.
    let config_file = config_path();
    let config = BaristaConfig::load_or_default(&config_file);

    // Menu cache over the configured source, or the built-in fallback rows
    // when no source is configured.
    let source: Arc<dyn MenuSource> = match &config.menu.source_url {
        Some(url) => {
            tracing::info!(url = %url, "Using HTTP menu source");
            Arc::new(HttpMenuSource::new(url.clone()))
        }
        None => {
            tracing::info!("No menu source configured — serving the built-in menu");
            Arc::new(StaticMenuSource::new(MenuSnapshot::fallback_rows()))
        }
    };
    let ttl = Duration::from_secs(config.menu.ttl_secs);
    let menu = Arc::new(if config.menu.empty_fallback {
        MenuCache::with_fallback(source, ttl, MenuSnapshot::default())
    } else {
        MenuCache::new(source, ttl)
    });

    // Oracle client.
    let mut oracle = HttpOracle::new(config.oracle.base_url.clone(), config.oracle.model.clone());
    if let Some(env_var) = &config.oracle.api_key_env {
        match std::env::var(env_var) {
            Ok(key) if !key.is_empty() => oracle = oracle.with_api_key(key),
            _ => tracing::warn!(env = %env_var, "Oracle API key not set — calling unauthenticated"),
        }
    }
    let oracle = Arc::new(oracle);

    // Ledger.
    let ledger: Arc<dyn Ledger> = Arc::new(FileLedger::open(&config.ledger.path)?);
    tracing::info!(path = %config.ledger.path, "Ledger opened");

    // Speech synthesis (optional, best-effort).
    let voice: Option<Arc<dyn SpeechSynthesizer>> = if config.voice.enabled {
        tracing::info!(url = %config.voice.base_url, "Speech synthesis enabled");
        Some(Arc::new(HttpSpeech::new(
            config.voice.base_url.clone(),
            config.voice.voice.clone(),
        )))
    } else {
        None
    };

    // Sessions + engine.
    let sessions = Arc::new(SessionStore::new(config.session.idle_timeout_minutes));
    let engine = Arc::new(OrderEngine::new(
        oracle.clone(),
        menu.clone(),
        sessions.clone(),
        ledger.clone(),
    ));
    let single_turn = Arc::new(SingleTurnParser::new(
        oracle,
        menu.clone(),
        ledger.clone(),
    ));

    let state = AppState::new(engine, single_turn, menu, ledger, sessions.clone(), voice);

    // Background sweeper.
    let sweep_interval = config.session.sweep_interval_minutes;
    tokio::spawn(async move {
        session_sweep_loop(sessions, sweep_interval).await;
    });

    // API server.
    let addr = format!("127.0.0.1:{}", config.general.port);
    let router = routes::create_router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind — is another instance running?");
            return Err(e.into());
        }
    };

    tracing::info!(addr = %addr, "API server listening");
    axum::serve(listener, router).await?;

    Ok(())
}
