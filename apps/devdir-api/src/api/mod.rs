//! API routes module

pub mod health;

use axum::Router;
use axum_helpers::JwtAuth;
use domain_developers::{DeveloperRepository, DeveloperService};
use domain_identity::{IdentityRepository, IdentityService};

/// Create all API routes
pub fn routes<D, I>(
    developers: DeveloperService<D>,
    identities: IdentityService<I>,
    jwt: JwtAuth,
) -> Router
where
    D: DeveloperRepository + 'static,
    I: IdentityRepository + 'static,
{
    Router::new()
        .nest("/developers", domain_developers::router(developers, jwt.clone()))
        .nest("/auth", domain_identity::router(identities, jwt))
}
