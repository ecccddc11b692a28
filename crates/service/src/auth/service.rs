use std::sync::Arc;

use argon2::{password_hash::{PasswordHasher, PasswordVerifier, SaltString}, Argon2, PasswordHash};
use jsonwebtoken::{encode, EncodingKey, Header as JwtHeader};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use super::domain::{AuthSession, AuthUser, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub password_algorithm: String,
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new customer with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: None, password_algorithm: "argon2".into() });
    /// let input = RegisterInput {
    ///     name: "Test".into(), email: "user@example.com".into(), phone: "9876543210".into(),
    ///     password: "Secret123".into(), address: "12 MG Road".into(),
    ///     latitude: Some(20.457316), longitude: Some(75.016754),
    /// };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let user = self.repo.create_user(&input, false).await?;
        let hash = self.hash_password(&input.password)?;
        let _cred = self
            .repo
            .upsert_password(user.id, hash, self.cfg.password_algorithm.clone())
            .await?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and optionally issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: Some("secret".into()), password_algorithm: "argon2".into() });
    /// let input = RegisterInput {
    ///     name: "N".into(), email: "u@e.com".into(), phone: "1234567890".into(),
    ///     password: "Passw0rd".into(), address: "somewhere".into(), latitude: None, longitude: None,
    /// };
    /// let _ = tokio_test::block_on(svc.register(input));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(session.token.is_some());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self
            .repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self
            .repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let mut token = None;
        if let Some(secret) = &self.cfg.jwt_secret {
            #[derive(serde::Serialize)]
            struct Claims { sub: String, uid: String, adm: bool, exp: usize }
            let exp = (chrono::Utc::now() + chrono::Duration::hours(12)).timestamp() as usize;
            let claims = Claims {
                sub: user.email.clone(),
                uid: user.id.to_string(),
                adm: user.is_admin,
                exp,
            };
            token = Some(
                encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
                    .map_err(|e| AuthError::TokenError(e.to_string()))?,
            );
        }

        Ok(AuthSession { user, token })
    }

    /// Create the operator account when it does not exist yet. Called once
    /// at startup; repeat calls are no-ops.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn ensure_admin(&self, input: RegisterInput) -> Result<(), AuthError> {
        if self.repo.find_user_by_email(&input.email).await?.is_some() {
            return Ok(());
        }
        let user = self.repo.create_user(&input, true).await?;
        let hash = self.hash_password(&input.password)?;
        self.repo
            .upsert_password(user.id, hash, self.cfg.password_algorithm.clone())
            .await?;
        info!(email = %user.email, "admin user created");
        Ok(())
    }

    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn input(email: &str) -> RegisterInput {
        RegisterInput {
            name: "Tester".into(),
            email: email.into(),
            phone: "9876543210".into(),
            password: "S3curePass!".into(),
            address: "12 MG Road".into(),
            latitude: Some(20.457316),
            longitude: Some(75.016754),
        }
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let svc = AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig { jwt_secret: None, password_algorithm: "argon2".into() },
        );
        let mut bad = input("short@example.com");
        bad.password = "short".into();
        assert!(matches!(svc.register(bad).await, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let svc = AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig { jwt_secret: Some("secret".into()), password_algorithm: "argon2".into() },
        );
        svc.register(input("round@example.com")).await.unwrap();

        let session = svc
            .login(LoginInput { email: "round@example.com".into(), password: "S3curePass!".into() })
            .await
            .unwrap();
        assert!(session.token.is_some());

        let denied = svc
            .login(LoginInput { email: "round@example.com".into(), password: "wrong-pass".into() })
            .await;
        assert!(matches!(denied, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let svc = AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig { jwt_secret: None, password_algorithm: "argon2".into() },
        );
        svc.register(input("dup@example.com")).await.unwrap();
        assert!(matches!(svc.register(input("dup@example.com")).await, Err(AuthError::Conflict)));
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let svc = AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig { jwt_secret: None, password_algorithm: "argon2".into() },
        );
        let admin = input("admin@tiffinservice.com");
        svc.ensure_admin(admin.clone()).await.unwrap();
        svc.ensure_admin(admin).await.unwrap();
    }
}
