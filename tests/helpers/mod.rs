#![allow(dead_code)]

use std::{path::PathBuf, str::FromStr, sync::Arc};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use cannabot::{
    AppState, Config,
    bot::Bot,
    config::{BotConfig, DatabaseConfig, ObservabilityConfig, ServerConfig, StrainsConfig},
};
use cannabot_strain::{StrainCatalog, StrainStore};
use http_body_util::BodyExt;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use tower::ServiceExt;

pub fn dataset_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/strains.csv")
}

pub fn test_config(relay_token: Option<&str>) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_owned(),
            max_connections: 1,
        },
        observability: ObservabilityConfig::default(),
        strains: StrainsConfig {
            dataset_path: dataset_path().display().to_string(),
            ..StrainsConfig::default()
        },
        bot: BotConfig {
            relay_token: relay_token.map(str::to_owned),
            max_daily_thc_default: Some(100.0),
        },
    }
}

pub async fn setup_pool(path: PathBuf) -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    cannabot::migrate::run_migrations(&pool).await?;

    Ok(pool)
}

/// State with the sample dataset installed. `loaded: false` leaves the
/// catalog empty, as it is while the server starts.
pub async fn setup_app_state(
    path: PathBuf,
    relay_token: Option<&str>,
    loaded: bool,
) -> anyhow::Result<AppState> {
    let config = test_config(relay_token);
    let pool = setup_pool(path).await?;

    let options = config.strains.discovery_options();
    let catalog = if loaded {
        StrainCatalog::with_store(StrainStore::load(dataset_path())?, options)
    } else {
        StrainCatalog::new(options)
    };

    let consumption = cannabot_consumption::Command::new(cannabot_shared::State::single(
        pool.clone(),
    ))
    .with_default_daily_limit(config.bot.max_daily_thc_default);

    Ok(AppState {
        bot: Bot::new(Arc::new(catalog), consumption),
        pool,
        config,
    })
}

pub fn interaction(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/interactions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn command(name: &str, options: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "type": 2,
        "data": {"name": name, "options": options},
        "member": {"user": {"id": "420"}}
    })
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, body)
}
