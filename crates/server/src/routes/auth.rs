use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use service::auth::{
    domain::{LoginInput, RegisterInput},
    errors::AuthError,
    seaorm::SeaOrmAuthRepository,
    service::{AuthConfig, AuthService},
};
use service::geo::Coordinate;
use service::service_area::{seaorm::SeaOrmSettingsStore, ServiceAreaService};

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub area: Arc<ServiceAreaService<SeaOrmSettingsStore>>,
}

impl ServerState {
    pub fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        let repo = Arc::new(SeaOrmAuthRepository { db: self.db.clone() });
        AuthService::new(
            repo,
            AuthConfig {
                jwt_secret: Some(self.auth.jwt_secret.clone()),
                password_algorithm: "argon2".into(),
            },
        )
    }
}

/// Identity decoded from the bearer token and attached to the request by
/// the global middleware.
#[derive(Clone, Debug)]
pub struct AuthedUser {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
}

#[derive(Serialize)]
pub struct RegisterOutput { pub user_id: Uuid }

#[derive(Serialize)]
pub struct MeOutput { pub user_id: Uuid, pub email: String, pub is_admin: bool }

#[derive(Serialize)]
pub struct LoginOutput { pub user_id: Uuid, pub email: String, pub name: String, pub token: String }

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 200, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(mut input): Json<RegisterInput>,
) -> Result<Json<RegisterOutput>, (StatusCode, String)> {
    // Validate using models helpers
    if let Err(e) = models::user::validate_email(&input.email) {
        return Err((StatusCode::BAD_REQUEST, e.to_string()));
    }
    if let Err(e) = models::user::validate_name(&input.name) {
        return Err((StatusCode::BAD_REQUEST, e.to_string()));
    }
    if input.address.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "address required".into()));
    }

    // Serviceability gate: explicit coordinates when given, otherwise the
    // stub-resolved address location (which is the configured center).
    let point = match (input.latitude, input.longitude) {
        (Some(lat), Some(lng)) => Coordinate::new(lat, lng),
        _ => {
            let resolved = state.area.resolve_address(&input.address).await;
            Coordinate::new(resolved.latitude, resolved.longitude)
        }
    };
    if !state.area.is_serviceable(point).await {
        return Err((StatusCode::BAD_REQUEST, "no services are available at your location".into()));
    }
    input.latitude = Some(point.lat);
    input.longitude = Some(point.lng);

    match state.auth_service().register(input).await {
        Ok(user) => Ok(Json(RegisterOutput { user_id: user.id })),
        Err(AuthError::Conflict) => Err((StatusCode::CONFLICT, "user already exists".into())),
        Err(AuthError::Validation(msg)) => Err((StatusCode::BAD_REQUEST, msg)),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), (StatusCode, String)> {
    let session = state
        .auth_service()
        .login(input)
        .await
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;
    let user = session.user;
    if let Some(token) = session.token {
        let mut cookie = Cookie::new("auth_token", token.clone());
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_secure(false);
        cookie.set_same_site(axum_extra::extract::cookie::SameSite::Lax);
        let jar = jar.add(cookie);
        let out = LoginOutput { user_id: user.id, email: user.email, name: user.name, token };
        return Ok((jar, Json(out)));
    }
    Err((StatusCode::INTERNAL_SERVER_ERROR, "token generation failed".into()))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::from("auth_token"));
    (jar, StatusCode::NO_CONTENT)
}

pub async fn me(Extension(user): Extension<AuthedUser>) -> Json<MeOutput> {
    Json(MeOutput { user_id: user.id, email: user.email, is_admin: user.is_admin })
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<String>,
    uid: Option<String>,
    adm: Option<bool>,
    #[allow(dead_code)]
    exp: Option<usize>,
}

/// Global middleware: outside the public whitelist, require a valid
/// `Authorization: Bearer <token>` (or the `auth_token` cookie). A missing
/// token yields 400, an invalid or expired one 401; failures are logged.
/// The decoded identity is attached to the request extensions.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    // Whitelist: health, registration/login, public menu and location APIs,
    // Swagger docs, CORS preflight
    if path == "/health"
        || path == "/auth/login"
        || path == "/auth/register"
        || path == "/api/menu"
        || path == "/api/check-location"
        || path == "/api/service-config"
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
        || method == axum::http::Method::OPTIONS
    {
        return Ok(next.run(req).await);
    }

    // Read the Authorization header; fall back to the auth_token cookie
    let token = {
        let authz = req
            .headers()
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        if let Some(h) = authz {
            let prefix = "Bearer ";
            if !h.starts_with(prefix) {
                tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(StatusCode::UNAUTHORIZED);
            }
            h[prefix.len()..].to_string()
        } else {
            let cookie_header = req
                .headers()
                .get(axum::http::header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");

            let mut token_val: Option<String> = None;
            for part in cookie_header.split(';') {
                let kv = part.trim();
                if let Some(rest) = kv.strip_prefix("auth_token=") {
                    token_val = Some(rest.to_string());
                    break;
                }
            }

            match token_val {
                Some(t) if !t.is_empty() => t,
                _ => {
                    tracing::warn!(path = %path, "missing Authorization header and auth_token cookie");
                    return Err(StatusCode::BAD_REQUEST);
                }
            }
        }
    };

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    match decode::<Claims>(&token, &key, &validation) {
        Ok(data) => {
            let claims = data.claims;
            let user = match claims.uid.as_deref().and_then(|uid| Uuid::parse_str(uid).ok()) {
                Some(id) => AuthedUser {
                    id,
                    email: claims.sub.unwrap_or_default(),
                    is_admin: claims.adm.unwrap_or(false),
                },
                None => {
                    tracing::error!(path = %path, "token missing uid claim");
                    return Err(StatusCode::UNAUTHORIZED);
                }
            };
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::error!(path = %path, err = %e, "token validation failed");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Route-layer middleware for `/admin/*`: the authenticated user must carry
/// the admin claim.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, StatusCode> {
    match req.extensions().get::<AuthedUser>() {
        Some(user) if user.is_admin => Ok(next.run(req).await),
        Some(_) => Err(StatusCode::FORBIDDEN),
        None => Err(StatusCode::UNAUTHORIZED),
    }
}
