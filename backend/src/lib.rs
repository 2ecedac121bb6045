//! # Now/Next Backend
//!
//! Everything behind the picture-schedule screens: day boards, how they are
//! stored, and the rules for editing them.
//!
//! ## Architecture
//!
//! ```text
//! UI (day board, week overview, library)
//!     ↓
//! IO Layer (image acquisition and import)
//!     ↓
//! Domain Layer (dates, identity, sessions, navigation guard)
//!     ↓
//! Storage Layer (board repository over a key-value store)
//! ```
//!
//! The host loads an [`AppConfig`], calls [`initialize_backend`] and opens one
//! [`BoardSession`] per visible day board.

pub mod config;
pub mod domain;
pub mod io;
pub mod logging;
pub mod storage;

use anyhow::{Context, Result};
use shared::DateIdentifier;
use std::sync::Arc;
use tracing::info;

use crate::domain::date_resolver::base_or_today;
use crate::domain::{
    ActivityCatalog, BoardIdentityResolver, BoardSession, NavigationGuard, SessionSeed, StaticCatalog,
    WeekDay, WeekOverviewService,
};
use crate::io::ImageImporter;
use crate::storage::{
    BoardRepository, BoardStorage, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore,
};

pub use config::{AppConfig, StorageBackend};

/// Services shared by every screen
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub board_store: Arc<dyn BoardStorage>,
    pub catalog: Arc<dyn ActivityCatalog>,
    pub week_overview: WeekOverviewService,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: AppConfig) -> Result<AppState> {
    config.validate()?;

    info!("Setting up {:?} storage in {:?}", config.storage_backend, config.data_directory);
    let key_values = open_key_value_store(&config).await?;
    let board_store: Arc<dyn BoardStorage> = Arc::new(BoardRepository::new(key_values, config.storage_key.clone()));

    info!("Setting up domain services");
    let catalog: Arc<dyn ActivityCatalog> = Arc::new(StaticCatalog::builtin());
    let week_overview = WeekOverviewService::new(board_store.clone(), catalog.clone(), config.week_length);

    Ok(AppState {
        config,
        board_store,
        catalog,
        week_overview,
    })
}

async fn open_key_value_store(config: &AppConfig) -> Result<Arc<dyn KeyValueStore>> {
    if config.storage_backend != StorageBackend::Memory {
        tokio::fs::create_dir_all(&config.data_directory)
            .await
            .with_context(|| format!("Failed to create data directory {:?}", config.data_directory))?;
    }

    let store: Arc<dyn KeyValueStore> = match config.storage_backend {
        StorageBackend::Sqlite => Arc::new(SqliteKeyValueStore::init(&config.data_directory).await?),
        StorageBackend::File => Arc::new(FileKeyValueStore::new(&config.data_directory)?),
        StorageBackend::Memory => Arc::new(MemoryKeyValueStore::new()),
    };
    Ok(store)
}

impl AppState {
    pub fn identity_resolver(&self) -> BoardIdentityResolver {
        BoardIdentityResolver::new(self.board_store.clone())
    }

    /// Open the board for `day_offset` days after `base_date` (today when
    /// absent or malformed). A new session immediately picks up the board
    /// already stored for that day, if any.
    pub async fn open_session(&self, base_date: Option<&str>, day_offset: u32, seed: SessionSeed) -> BoardSession {
        let base = base_or_today(base_date);
        let fresh = matches!(seed, SessionSeed::New);
        let mut session = BoardSession::open(
            self.identity_resolver(),
            self.catalog.clone(),
            self.config.session.session_options(),
            base,
            day_offset,
            seed,
        );
        if fresh {
            session.reconcile_on_focus_regain().await;
        }
        session
    }

    pub fn navigation_guard<A>(&self) -> NavigationGuard<A> {
        NavigationGuard::new(self.config.session.exit_confirmation)
    }

    pub async fn week(&self, base: DateIdentifier) -> Vec<WeekDay> {
        self.week_overview.load(base).await
    }

    pub fn image_importer(&self) -> ImageImporter {
        ImageImporter::for_data_directory(&self.config.data_directory)
    }
}
