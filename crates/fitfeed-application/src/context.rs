//! Composition root.
//!
//! Every store and service is constructed here from explicitly passed
//! collaborators and handed to the UI layer through [`AppContext`]; nothing
//! is reachable through process-wide globals.

use std::sync::Arc;

use anyhow::{Result as AnyResult, anyhow};
use fitfeed_core::auth::AuthService;
use fitfeed_core::community::CommunityRepository;
use fitfeed_core::config::{AppConfig, SecretConfig};
use fitfeed_core::error::Result;
use fitfeed_core::profile::ProfileRepository;
use fitfeed_core::relative_date::Locale;
use fitfeed_core::secret::SecretService;
use fitfeed_core::storage::KeyValueStore;
use fitfeed_infrastructure::logging::{LogGuard, init_logging};
use fitfeed_infrastructure::paths::FitfeedPaths;
use fitfeed_infrastructure::storage::{ConfigStorage, FileKeyValueStore, SecretStorage};
use fitfeed_infrastructure::supabase::{SupabaseAuthClient, SupabaseClient, SupabaseRestClient};

use crate::auth_store::AuthStore;
use crate::community_feed::CommunityFeed;
use crate::mode_store::ModeStore;
use crate::profile_service::ProfileService;

/// Collaborators the context is built from.
pub struct Collaborators {
    pub storage: Arc<dyn KeyValueStore>,
    pub auth_service: Arc<dyn AuthService>,
    pub community: Arc<dyn CommunityRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
}

/// Stores and services shared by the UI layer.
pub struct AppContext {
    pub locale: Locale,
    pub auth: Arc<AuthStore>,
    pub mode: Arc<ModeStore>,
    pub community: Arc<CommunityFeed>,
    pub profiles: Arc<ProfileService>,
}

impl AppContext {
    /// Builds the context from injected collaborators, rehydrating both
    /// persisted stores.
    pub async fn bootstrap(config: &AppConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            storage,
            auth_service,
            community,
            profiles,
        } = collaborators;

        let auth = AuthStore::load(
            storage.clone(),
            auth_service,
            config.auth.timeout(),
            config.locale,
        )
        .await;
        let mode = ModeStore::load(storage).await;

        tracing::info!("[Bootstrap] Context ready (locale: {})", config.locale);

        Self {
            locale: config.locale,
            auth: Arc::new(auth),
            mode: Arc::new(mode),
            community: Arc::new(CommunityFeed::new(community)),
            profiles: Arc::new(ProfileService::new(profiles)),
        }
    }

    /// Builds the production graph: file-backed slots under the data
    /// directory and the hosted backend clients.
    pub async fn from_config(
        config: &AppConfig,
        secrets: &SecretConfig,
        paths: &FitfeedPaths,
    ) -> Result<Self> {
        let store_dir = paths.store_dir()?;
        let client = SupabaseClient::from_config(&config.backend, &secrets.backend)?;
        let rest = Arc::new(SupabaseRestClient::new(client.clone()));

        tracing::info!(
            "[Bootstrap] Using backend {} with store at {:?}",
            client.base_url(),
            store_dir
        );

        let collaborators = Collaborators {
            storage: Arc::new(FileKeyValueStore::new(store_dir)),
            auth_service: Arc::new(SupabaseAuthClient::new(client)),
            community: rest.clone(),
            profiles: rest,
        };
        Ok(Self::bootstrap(config, collaborators).await)
    }
}

/// Loads config.toml and secret.json, installs logging and builds the
/// context. The returned guard must be held for the life of the process.
pub async fn start(paths: &FitfeedPaths) -> AnyResult<(AppContext, LogGuard)> {
    let config_storage = ConfigStorage::new(
        paths
            .config_file()
            .map_err(|e| anyhow!("Failed to resolve config path: {}", e))?,
    );
    let config = config_storage
        .load_or_init()
        .await
        .map_err(|e| anyhow!("Failed to load config: {}", e))?;

    let logs_dir = paths
        .logs_dir()
        .map_err(|e| anyhow!("Failed to resolve log directory: {}", e))?;
    let guard = init_logging(&config.logging, &logs_dir)?;

    let secret_storage =
        SecretStorage::new(paths).map_err(|e| anyhow!("Failed to locate secret file: {}", e))?;
    if !secret_storage.secret_file_exists().await {
        secret_storage
            .ensure_template()
            .map_err(|e| anyhow!("Failed to create secret template: {}", e))?;
    }
    let secrets = load_secrets(&secret_storage).await?;

    let context = AppContext::from_config(&config, &secrets, paths)
        .await
        .map_err(|e| anyhow!("Failed to build app context: {}", e))?;
    Ok((context, guard))
}

async fn load_secrets(source: &dyn SecretService) -> AnyResult<SecretConfig> {
    let secrets = source
        .load_secrets()
        .await
        .map_err(|e| anyhow!("Failed to load secrets: {}", e))?;
    if secrets.backend.anon_key.is_empty() {
        tracing::warn!("[Bootstrap] secret.json has no backend anon_key");
    }
    Ok(secrets)
}
