//! Identity domain: signup, login and profile resolution backing the
//! directory's access gate. Passwords are argon2-hashed at rest; tokens
//! are issued through the shared JWT helper.

pub mod error;
pub mod handlers;
pub mod json_store;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{IdentityError, IdentityResult};
pub use handlers::{ApiDoc, router};
pub use json_store::JsonFileIdentityRepository;
pub use models::{AuthResponse, Identity, IdentityResponse, LoginRequest, SignupRequest};
pub use repository::{IdentityRepository, InMemoryIdentityRepository};
pub use service::IdentityService;
