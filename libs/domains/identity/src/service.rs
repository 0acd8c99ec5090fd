use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_helpers::JwtAuth;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{IdentityError, IdentityResult};
use crate::models::{AuthResponse, Identity, LoginRequest, SignupRequest};
use crate::repository::IdentityRepository;

/// Signup, login and profile resolution.
///
/// Passwords are argon2-hashed before they reach the repository; tokens are
/// issued with the identity's id as the subject.
#[derive(Clone)]
pub struct IdentityService<R: IdentityRepository> {
    repository: Arc<R>,
    jwt: JwtAuth,
}

impl<R: IdentityRepository> IdentityService<R> {
    pub fn new(repository: Arc<R>, jwt: JwtAuth) -> Self {
        Self { repository, jwt }
    }

    pub async fn signup(&self, input: SignupRequest) -> IdentityResult<AuthResponse> {
        if self.repository.find_by_email(&input.email).await?.is_some() {
            return Err(IdentityError::DuplicateEmail(input.email));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| IdentityError::Hashing(e.to_string()))?
            .to_string();

        let identity = self
            .repository
            .create(Identity::new(&input.name, &input.email, hash))
            .await?;
        tracing::info!(identity_id = %identity.id, "identity signed up");
        self.issue(identity)
    }

    pub async fn login(&self, input: LoginRequest) -> IdentityResult<AuthResponse> {
        let identity = self
            .repository
            .find_by_email(&input.email)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        let parsed = PasswordHash::new(&identity.password_hash)
            .map_err(|e| IdentityError::Hashing(e.to_string()))?;
        Argon2::default()
            .verify_password(input.password.as_bytes(), &parsed)
            .map_err(|_| IdentityError::InvalidCredentials)?;

        tracing::info!(identity_id = %identity.id, "identity logged in");
        self.issue(identity)
    }

    pub async fn profile(&self, id: Uuid) -> IdentityResult<Identity> {
        self.repository.get_by_id(id).await
    }

    fn issue(&self, identity: Identity) -> IdentityResult<AuthResponse> {
        let token = self
            .jwt
            .issue_token(identity.id, &identity.email, &identity.name)
            .map_err(|e| IdentityError::Hashing(e.to_string()))?;
        Ok(AuthResponse {
            token,
            user: identity.into(),
        })
    }
}
