use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use migration::MigratorTrait;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, auth};
use service::auth::domain::RegisterInput;
use service::service_area::domain::{DEFAULT_CENTRAL_LAT, DEFAULT_CENTRAL_LNG};
use service::service_area::{
    env_file::EnvFileMirror, seaorm::SeaOrmSettingsStore, ServiceAreaService,
};

fn cors() -> CorsLayer { CorsLayer::very_permissive() }

struct TestApp {
    base_url: String,
    state: auth::ServerState,
    env_file: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Ensure models prefer env over config file
    std::env::set_var("CONFIG_PATH", "/nonexistent-config-for-tests.toml");

    // Use DATABASE_URL from environment; if not present, skip tests gracefully
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip e2e tests. Provide .env.test or env var.");
        return Err(anyhow::anyhow!("missing DATABASE_URL"));
    }

    // Connect DB and run migrations
    let db = models::db::connect().await?;
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("migrations notice: {}", e);
    }

    // Isolated env mirror file per test run
    let temp_id = Uuid::new_v4();
    let data_dir = format!("target/test-data/{}", temp_id);
    tokio::fs::create_dir_all(&data_dir).await?;
    let env_file = format!("{}/service.env", data_dir);
    let area = Arc::new(ServiceAreaService::new(
        Arc::new(SeaOrmSettingsStore { db: db.clone() }),
        EnvFileMirror::new(env_file.as_str()),
    ));

    let state = auth::ServerState {
        db,
        auth: auth::ServerAuthConfig { jwt_secret: "test-secret".into() },
        area,
    };

    let app: Router = routes::build_router(state.clone(), cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url, state, env_file })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("reqwest client")
}

fn register_body(email: &str) -> serde_json::Value {
    json!({
        "name": "Tester",
        "email": email,
        "phone": "9876543210",
        "password": "S3curePass!",
        "address": "12 MG Road",
        "latitude": DEFAULT_CENTRAL_LAT,
        "longitude": DEFAULT_CENTRAL_LNG,
    })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_register_login_and_cookie() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let c = client();

    let email = format!("user_{}@example.com", Uuid::new_v4());

    // Register at the service center, always inside the disk
    let res = c.post(format!("{}/auth/register", app.base_url))
        .json(&register_body(&email))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // Login -> set-cookie
    let res = c.post(format!("{}/auth/login", app.base_url))
        .json(&json!({"email": email, "password": "S3curePass!"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let set_cookie = res.headers().get("set-cookie");
    assert!(set_cookie.is_some());

    // Cookie authenticates /auth/me
    let res = c.get(format!("{}/auth/me", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["email"], email.as_str());
    Ok(())
}

#[tokio::test]
async fn e2e_register_outside_service_area_rejected() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let c = client();

    let email = format!("far_{}@example.com", Uuid::new_v4());
    let mut body = register_body(&email);
    // Null Island is thousands of kilometers outside any configured radius
    body["latitude"] = json!(0.0);
    body["longitude"] = json!(0.0);

    let res = c.post(format!("{}/auth/register", app.base_url))
        .json(&body)
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_check_location_api() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let c = client();

    // The configured center is serviceable under any positive radius
    let cfg = c.get(format!("{}/api/service-config", app.base_url))
        .send().await?
        .json::<serde_json::Value>().await?;
    let res = c.post(format!("{}/api/check-location", app.base_url))
        .json(&json!({"latitude": cfg["central_lat"], "longitude": cfg["central_lng"]}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["serviceable"], true);

    // A point on another continent is not
    let res = c.post(format!("{}/api/check-location", app.base_url))
        .json(&json!({"latitude": 0.0, "longitude": 0.0}))
        .send().await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["serviceable"], false);

    // Missing coordinates -> 400
    let res = c.post(format!("{}/api/check-location", app.base_url))
        .json(&json!({"latitude": 1.0}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_protected_without_token_denied() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let c = reqwest::Client::new();
    let res = c.get(format!("{}/api/orders", app.base_url)).send().await?;
    // Global middleware: missing Authorization and auth_token cookie -> 400
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_protected_with_expired_token_unauthorized() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let c = reqwest::Client::new();

    // Create an expired JWT token signed with test-secret
    use jsonwebtoken::{encode, EncodingKey, Header};
    #[derive(serde::Serialize)]
    struct Claims { sub: String, uid: String, adm: bool, exp: usize, iat: usize }
    let now = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH)?.as_secs() as usize;
    let claims = Claims {
        sub: "u@example.com".into(),
        uid: Uuid::new_v4().to_string(),
        adm: false,
        exp: now.saturating_sub(60),
        iat: now.saturating_sub(120),
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret("test-secret".as_bytes()))?;

    let res = c.get(format!("{}/api/orders", app.base_url))
        .header("Authorization", format!("Bearer {}", token))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn e2e_admin_settings_update_reflected_in_config() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let c = client();

    // Seed an admin account directly through the service layer, then log in
    let email = format!("admin_{}@example.com", Uuid::new_v4());
    app.state
        .auth_service()
        .ensure_admin(RegisterInput {
            name: "Admin".into(),
            email: email.clone(),
            phone: "1234567890".into(),
            password: "Adm1nPass!".into(),
            address: "HQ".into(),
            latitude: Some(DEFAULT_CENTRAL_LAT),
            longitude: Some(DEFAULT_CENTRAL_LNG),
        })
        .await
        .map_err(|e| anyhow::anyhow!("seed admin: {e}"))?;
    let res = c.post(format!("{}/auth/login", app.base_url))
        .json(&json!({"email": email, "password": "Adm1nPass!"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // Out-of-range radius is rejected before storage is touched
    let res = c.put(format!("{}/admin/settings", app.base_url))
        .json(&json!({"central_lat": DEFAULT_CENTRAL_LAT, "central_lng": DEFAULT_CENTRAL_LNG, "service_radius": 51.0}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    // Same center, wider radius: other tests keyed on the center stay valid
    let res = c.put(format!("{}/admin/settings", app.base_url))
        .json(&json!({"central_lat": DEFAULT_CENTRAL_LAT, "central_lng": DEFAULT_CENTRAL_LNG, "service_radius": 25.0}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["ok"], true);
    assert_eq!(body["mirror_synced"], true);

    // Public config reflects the persisted radius
    let cfg = c.get(format!("{}/api/service-config", app.base_url))
        .send().await?
        .json::<serde_json::Value>().await?;
    assert_eq!(cfg["service_radius"], 25.0);

    // The mirror file carries the same keys, one line each
    let mirror = tokio::fs::read_to_string(&app.env_file).await?;
    assert!(mirror.contains("SERVICE_RADIUS_KM=25\n"));
    assert_eq!(mirror.matches("CENTRAL_LAT=").count(), 1);
    Ok(())
}

#[tokio::test]
async fn e2e_customer_cannot_reach_admin_routes() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let c = client();

    let email = format!("cust_{}@example.com", Uuid::new_v4());
    let res = c.post(format!("{}/auth/register", app.base_url))
        .json(&register_body(&email))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.post(format!("{}/auth/login", app.base_url))
        .json(&json!({"email": email, "password": "S3curePass!"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.get(format!("{}/admin/settings", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::FORBIDDEN);
    Ok(())
}
