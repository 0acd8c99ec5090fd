//! Authentication and authorization module.
//!
//! This module provides:
//! - Stateless JWT token issuing and verification
//! - Authentication middleware for protected routes
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, auth_middleware};
//! use core_config::FromEnv;
//!
//! // Load config and create auth instance
//! let config = JwtConfig::from_env()?;
//! let jwt = JwtAuth::new(&config);
//!
//! // Protect routes with JWT middleware
//! let protected = Router::new()
//!     .route("/developers", post(handler))
//!     .layer(axum::middleware::from_fn_with_state(jwt, auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

// Re-export commonly used types
pub use config::JwtConfig;
pub use jwt::{AuthError, JwtAuth, JwtClaims, TOKEN_TTL_SECONDS};
pub use middleware::auth_middleware;
