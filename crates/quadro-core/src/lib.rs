//! Data core of the Quadro project-management tool: sibling ordering for
//! workspaces, boards, lists, and cards; the per-workspace archive
//! lifecycle; and hosted-store persistence with a transparent local mirror
//! fallback for offline and guest sessions.

pub mod archive;
pub mod config;
pub mod error;
pub mod gateway;
pub mod position;
pub mod seed;
pub mod session;
pub mod store;

pub use archive::{ArchiveManager, LifecycleState};
pub use config::Config;
pub use error::{StoreError, StoreResult};
pub use gateway::{DataSource, Gateway};
pub use quadro_shared::{Container, ContainerKind, ARCHIVE_BOARD_NAME};
pub use session::SessionMode;
pub use store::ContainerStore;

use std::sync::Arc;

/// Entry point wiring session classification, the persistence gateway, the
/// per-kind stores, and the archive manager.
pub struct Quadro {
    mode: SessionMode,
    gateway: Arc<Gateway>,
    workspaces: ContainerStore,
    boards: ContainerStore,
    lists: ContainerStore,
    cards: ContainerStore,
    archive: ArchiveManager,
}

impl Quadro {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mode = SessionMode::resolve(config);
        tracing::info!(?mode, "starting session");
        let gateway = Arc::new(Gateway::new(config, mode)?);

        Ok(Self {
            mode,
            workspaces: ContainerStore::new(ContainerKind::Workspace, gateway.clone()),
            boards: ContainerStore::new(ContainerKind::Board, gateway.clone()),
            lists: ContainerStore::new(ContainerKind::List, gateway.clone()),
            cards: ContainerStore::new(ContainerKind::Card, gateway.clone()),
            archive: ArchiveManager::new(gateway.clone()),
            gateway,
        })
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Whether the last remote attempt failed and data is being served from
    /// the local mirror.
    pub fn is_degraded(&self) -> bool {
        self.gateway.is_degraded()
    }

    pub fn store(&self, kind: ContainerKind) -> &ContainerStore {
        match kind {
            ContainerKind::Workspace => &self.workspaces,
            ContainerKind::Board => &self.boards,
            ContainerKind::List => &self.lists,
            ContainerKind::Card => &self.cards,
        }
    }

    pub fn workspaces(&self) -> &ContainerStore {
        &self.workspaces
    }

    pub fn boards(&self) -> &ContainerStore {
        &self.boards
    }

    pub fn lists(&self) -> &ContainerStore {
        &self.lists
    }

    pub fn cards(&self) -> &ContainerStore {
        &self.cards
    }

    pub fn archive(&self) -> &ArchiveManager {
        &self.archive
    }
}
