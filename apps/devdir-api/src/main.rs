//! Developer Directory API - REST server

use axum_helpers::server::{create_production_app, health_router};
use axum_helpers::JwtAuth;
use core_config::storage::{PhotoStoreKind, StorageBackend};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_developers::{
    DeveloperRepository, DeveloperService, InMemoryDeveloperRepository,
    JsonFileDeveloperRepository, LocalDiskPhotoStore, PhotoStore, RemotePhotoStore,
};
use domain_identity::{
    IdentityRepository, IdentityService, InMemoryIdentityRepository, JsonFileIdentityRepository,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;
use tracing::info;

mod api;
mod config;
mod openapi;

use config::Config;

/// Stale temp uploads older than this get swept
const STALE_UPLOAD_AGE: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let jwt = JwtAuth::new(&config.jwt);

    // Photo sink and storage backend are both picked once, here; the rest
    // of the app only sees the traits.
    let (photos, local_photos): (Arc<dyn PhotoStore>, Option<Arc<LocalDiskPhotoStore>>) =
        match config.storage.photo_store {
            PhotoStoreKind::Local => {
                let store = Arc::new(LocalDiskPhotoStore::new(config.storage.uploads_dir()));
                (store.clone(), Some(store))
            }
            PhotoStoreKind::Remote => {
                let host = config
                    .storage
                    .photo_host_url
                    .clone()
                    .ok_or_else(|| eyre::eyre!("PHOTO_HOST_URL is required for remote photos"))?;
                (Arc::new(RemotePhotoStore::new(host)), None)
            }
        };

    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            let developers = Arc::new(InMemoryDeveloperRepository::new());
            let identities = Arc::new(InMemoryIdentityRepository::new());
            serve(config, jwt, photos, local_photos, developers, identities).await
        }
        StorageBackend::File => {
            info!(
                "Using JSON file storage under {}",
                config.storage.data_dir.display()
            );
            let developers = Arc::new(
                JsonFileDeveloperRepository::open(config.storage.developers_file()).await?,
            );
            let identities =
                Arc::new(JsonFileIdentityRepository::open(config.storage.identities_file()).await?);
            serve(config, jwt, photos, local_photos, developers, identities).await
        }
    }
}

async fn serve<D, I>(
    config: Config,
    jwt: JwtAuth,
    photos: Arc<dyn PhotoStore>,
    local_photos: Option<Arc<LocalDiskPhotoStore>>,
    developers: Arc<D>,
    identities: Arc<I>,
) -> eyre::Result<()>
where
    D: DeveloperRepository + 'static,
    I: IdentityRepository + 'static,
{
    let developer_service = DeveloperService::new(developers.clone(), photos);
    let identity_service = IdentityService::new(identities, jwt.clone());

    let api_routes = api::routes(developer_service, identity_service, jwt);
    let mut router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;
    router = router
        .merge(health_router(config.app))
        .merge(api::health::ready_router(developers));

    // Local photos are served straight off disk under the same path the
    // records reference
    if local_photos.is_some() {
        router = router.nest_service("/uploads", ServeDir::new(config.storage.uploads_dir()));
    }

    // Sweep uploads that never got finalized, once now and then hourly
    if let Some(store) = local_photos.clone() {
        tokio::spawn(async move {
            store.cleanup_stale(STALE_UPLOAD_AGE).await;
            let mut interval = tokio::time::interval(STALE_UPLOAD_AGE);
            interval.tick().await;
            loop {
                interval.tick().await;
                store.cleanup_stale(STALE_UPLOAD_AGE).await;
            }
        });
    }

    info!("Starting Developer Directory API on port {}", config.server.port);

    create_production_app(router, &config.server, Duration::from_secs(30), async move {
        if let Some(store) = local_photos {
            info!("Shutting down: sweeping stale uploads");
            store.cleanup_stale(STALE_UPLOAD_AGE).await;
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Developer Directory API shutdown complete");
    Ok(())
}
