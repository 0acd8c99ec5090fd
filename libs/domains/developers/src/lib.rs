//! Developer directory domain: CRUD over developer records, a pure
//! filter/sort/paginate query engine, pluggable photo storage, and
//! a public analytics summary.
//!
//! Storage is behind [`DeveloperRepository`]; the service and handlers are
//! generic over it, so the in-memory and JSON-file backends are drop-in
//! swaps selected at startup.

pub mod error;
pub mod handlers;
pub mod json_store;
pub mod models;
pub mod photos;
pub mod query;
pub mod repository;
pub mod service;

pub use error::{DeveloperError, DeveloperResult};
pub use handlers::{ApiDoc, router};
pub use json_store::JsonFileDeveloperRepository;
pub use models::{
    CreateDeveloper, Developer, DirectoryAnalytics, DirectoryQuery, Role, RoleCount, TechCount,
    UpdateDeveloper,
};
pub use photos::{LocalDiskPhotoStore, PhotoStore, RemotePhotoStore};
pub use query::{QueryPage, run_query};
pub use repository::{DeveloperRepository, InMemoryDeveloperRepository};
pub use service::DeveloperService;
