use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, auth};
use service::auth::domain::RegisterInput;
use service::runtime;
use service::service_area::{
    domain::{DEFAULT_CENTRAL_LAT, DEFAULT_CENTRAL_LNG},
    env_file::EnvFileMirror,
    seaorm::SeaOrmSettingsStore,
    ServiceAreaService,
};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8081);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

fn env_file_path() -> String {
    match configs::load_default() {
        Ok(cfg) => cfg.service_area.env_file,
        Err(_) => env::var("SERVICE_ENV_FILE").unwrap_or_else(|_| ".env".to_string()),
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let env_file = env_file_path();
    runtime::ensure_env("data", &env_file).await?;

    // DB connection + schema
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;

    // Service-area resolver over the settings table, mirrored into the env file
    let area = Arc::new(ServiceAreaService::new(
        Arc::new(SeaOrmSettingsStore { db: db.clone() }),
        EnvFileMirror::new(env_file.as_str()),
    ));

    // JWT secret
    let jwt_secret =
        env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".to_string());
    let state = auth::ServerState {
        db,
        auth: auth::ServerAuthConfig { jwt_secret },
        area,
    };

    seed_admin(&state).await?;

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(state, cors);

    // Bind and serve
    let addr = load_bind_addr()?;
    info!(%addr, "starting server crate");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the operator account on first boot; no-op afterwards.
async fn seed_admin(state: &auth::ServerState) -> anyhow::Result<()> {
    let email = env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@tiffinservice.com".to_string());
    let password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin-dev-123".to_string());
    let input = RegisterInput {
        name: "Admin".into(),
        email,
        phone: "1234567890".into(),
        password,
        address: "Admin Address".into(),
        latitude: Some(DEFAULT_CENTRAL_LAT),
        longitude: Some(DEFAULT_CENTRAL_LNG),
    };
    state
        .auth_service()
        .ensure_admin(input)
        .await
        .map_err(|e| anyhow::anyhow!("admin seed failed: {e}"))?;
    Ok(())
}
