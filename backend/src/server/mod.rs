//! Server bootstrap: configuration loading and adapter wiring.

pub mod config;

use std::io;
use std::sync::Arc;

use object_store::ObjectStore;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;

use posterforge::domain::UploadGateway;
use posterforge::inbound::http::state::HttpState;
use posterforge::outbound::auth::HttpSessionResolver;
use posterforge::outbound::persistence::{
    DbPool, DieselGenerationLog, DieselProfileRepository, PoolConfig,
};
use posterforge::outbound::storage::ObjectStoreArtifacts;
use posterforge::outbound::upstream::HttpProcessingUpstream;

use config::{AppConfig, StorageBackend};

/// Wire every outbound adapter and return the HTTP handler state.
///
/// # Errors
///
/// Returns an error when the database pool, a client, or the storage backend
/// cannot be constructed.
pub async fn build_state(config: &AppConfig) -> io::Result<HttpState> {
    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(io::Error::other)?;

    let sessions = HttpSessionResolver::new(config.auth_user_info_url.clone(), config.auth_timeout)
        .map_err(io::Error::other)?;

    let upstream = HttpProcessingUpstream::new(
        config.upstream_webhook_url.clone(),
        config.upstream_timeout,
        config.upstream_transport_retries,
    )
    .map_err(io::Error::other)?;

    let artifacts = ObjectStoreArtifacts::new(
        build_object_store(&config.storage_backend)?,
        config.storage_public_base_url.clone(),
    );

    let profiles = Arc::new(DieselProfileRepository::new(pool.clone()));
    let generations = Arc::new(DieselGenerationLog::new(pool));

    let gateway = Arc::new(UploadGateway::new(
        profiles.clone(),
        generations.clone(),
        Arc::new(artifacts),
        Arc::new(upstream),
    ));

    Ok(HttpState::new(
        Arc::new(sessions),
        gateway,
        profiles,
        generations,
    ))
}

fn build_object_store(backend: &StorageBackend) -> io::Result<Arc<dyn ObjectStore>> {
    match backend {
        StorageBackend::S3 { bucket } => {
            let store = AmazonS3Builder::from_env()
                .with_bucket_name(bucket)
                .build()
                .map_err(io::Error::other)?;
            Ok(Arc::new(store))
        }
        StorageBackend::Local { root } => {
            std::fs::create_dir_all(root)?;
            let store = LocalFileSystem::new_with_prefix(root).map_err(io::Error::other)?;
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => Ok(Arc::new(InMemory::new())),
    }
}
