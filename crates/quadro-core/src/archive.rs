use std::sync::Arc;

use quadro_shared::api::{CreateRecordRequest, UpdateRecordRequest};
use quadro_shared::{Container, ContainerKind, ARCHIVE_BOARD_NAME};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::gateway::Gateway;
use crate::position;
use crate::store::{positions, ContainerStore};

/// Lifecycle of a container.
///
/// Active → Archived → Deleted, plus Archived → Active on restore. The
/// archive board itself is pinned in `Permanent`, which no other container
/// can enter: archive and restore on it succeed as no-ops, delete is always
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Active,
    Archived,
    Permanent,
}

impl LifecycleState {
    pub fn of(container: &Container, kind: ContainerKind) -> Self {
        if container.is_archive_board(kind) {
            Self::Permanent
        } else if container.archived {
            Self::Archived
        } else {
            Self::Active
        }
    }
}

/// Enforces the one-permanent-archive-board-per-workspace invariant and the
/// archive/restore/delete state machine, over the per-kind stores.
pub struct ArchiveManager {
    gateway: Arc<Gateway>,
    workspaces: ContainerStore,
    boards: ContainerStore,
    lists: ContainerStore,
    cards: ContainerStore,
}

impl ArchiveManager {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            workspaces: ContainerStore::new(ContainerKind::Workspace, gateway.clone()),
            boards: ContainerStore::new(ContainerKind::Board, gateway.clone()),
            lists: ContainerStore::new(ContainerKind::List, gateway.clone()),
            cards: ContainerStore::new(ContainerKind::Card, gateway.clone()),
            gateway,
        }
    }

    fn store(&self, kind: ContainerKind) -> &ContainerStore {
        match kind {
            ContainerKind::Workspace => &self.workspaces,
            ContainerKind::Board => &self.boards,
            ContainerKind::List => &self.lists,
            ContainerKind::Card => &self.cards,
        }
    }

    /// The workspace's archive board, created lazily at end-of-list among
    /// its boards on first use.
    pub async fn archive_board(&self, workspace_id: Uuid) -> StoreResult<Container> {
        let boards = self.boards.list(Some(workspace_id)).await?;
        if let Some(existing) = boards
            .iter()
            .find(|b| b.is_archive_board(ContainerKind::Board))
        {
            return Ok(existing.clone());
        }

        let created = self
            .gateway
            .insert(
                ContainerKind::Board,
                CreateRecordRequest {
                    parent_id: Some(workspace_id),
                    name: ARCHIVE_BOARD_NAME.to_string(),
                    position: position::end_of_list(&positions(&boards)),
                    archived: false,
                },
            )
            .await?;
        tracing::info!(%workspace_id, board_id = %created.value.id, "created archive board");
        Ok(created.value)
    }

    /// Archived containers of `kind` parked under the workspace's archive
    /// board, position ascending.
    pub async fn archived_items(
        &self,
        workspace_id: Uuid,
        kind: ContainerKind,
    ) -> StoreResult<Vec<Container>> {
        let archive = self.archive_board(workspace_id).await?;
        self.store(kind).list_archived(Some(archive.id)).await
    }

    /// Walk `parent_id` links up to the owning workspace. An archived
    /// ancestor is parked under an archive board, so its parent is a board
    /// rather than its structural parent kind.
    async fn owning_workspace(
        &self,
        kind: ContainerKind,
        container: &Container,
    ) -> StoreResult<Uuid> {
        let mut kind = kind;
        let mut current = container.clone();
        loop {
            let parent_kind = if current.archived {
                ContainerKind::Board
            } else {
                kind.parent().ok_or_else(|| {
                    StoreError::Constraint("container has no owning workspace".to_string())
                })?
            };
            let parent_id = current.parent_id.ok_or_else(|| {
                StoreError::Validation("container is missing its parent reference".to_string())
            })?;
            if parent_kind == ContainerKind::Workspace {
                return Ok(parent_id);
            }
            current = self.store(parent_kind).get(parent_id).await?;
            kind = parent_kind;
        }
    }

    /// Active → Archived: reparent under the workspace's archive board at
    /// end-of-list and flag archived, in one persisted update. Already
    /// archived containers and the archive board itself are no-ops.
    pub async fn archive(&self, kind: ContainerKind, id: Uuid) -> StoreResult<Container> {
        if kind == ContainerKind::Workspace {
            return Err(StoreError::Constraint(
                "workspaces cannot be archived".to_string(),
            ));
        }

        let container = self.store(kind).get(id).await?;
        match LifecycleState::of(&container, kind) {
            LifecycleState::Permanent | LifecycleState::Archived => Ok(container),
            LifecycleState::Active => {
                let workspace_id = self.owning_workspace(kind, &container).await?;
                let archive = self.archive_board(workspace_id).await?;

                let occupants = self.store(kind).list_archived(Some(archive.id)).await?;
                let patch = UpdateRecordRequest {
                    parent_id: Some(archive.id),
                    position: Some(position::end_of_list(&positions(&occupants))),
                    archived: Some(true),
                    ..Default::default()
                };
                Ok(self.gateway.update(kind, id, patch).await?.value)
            }
        }
    }

    /// Archived → Active: reparent to `target_parent` (or the documented
    /// default) at end-of-list and clear the archived flag. Restoring an
    /// active container or the archive board is a no-op.
    pub async fn restore(
        &self,
        kind: ContainerKind,
        id: Uuid,
        target_parent: Option<Uuid>,
    ) -> StoreResult<Container> {
        let container = self.store(kind).get(id).await?;
        match LifecycleState::of(&container, kind) {
            LifecycleState::Permanent | LifecycleState::Active => Ok(container),
            LifecycleState::Archived => {
                let target = match target_parent {
                    Some(target) => {
                        self.check_restore_target(kind, target).await?;
                        target
                    }
                    None => self.default_restore_target(kind, &container).await?,
                };

                let siblings = self.store(kind).list(Some(target)).await?;
                let patch = UpdateRecordRequest {
                    parent_id: Some(target),
                    position: Some(position::end_of_list(&positions(&siblings))),
                    archived: Some(false),
                    ..Default::default()
                };
                Ok(self.gateway.update(kind, id, patch).await?.value)
            }
        }
    }

    async fn check_restore_target(&self, kind: ContainerKind, target: Uuid) -> StoreResult<()> {
        let parent_kind = kind.parent().ok_or_else(|| {
            StoreError::Constraint("workspaces cannot be restored into a parent".to_string())
        })?;
        let parent = self.store(parent_kind).get(target).await?;
        if parent.is_archive_board(parent_kind) {
            return Err(StoreError::Constraint(
                "cannot restore into the archive board".to_string(),
            ));
        }
        if parent.archived {
            return Err(StoreError::Constraint(
                "cannot restore into an archived container".to_string(),
            ));
        }
        Ok(())
    }

    /// Default restore destination: the owning workspace for boards, the
    /// workspace's primary board for lists, that board's first list for
    /// cards.
    async fn default_restore_target(
        &self,
        kind: ContainerKind,
        container: &Container,
    ) -> StoreResult<Uuid> {
        // Archived containers are always parked directly under an archive
        // board, whose own parent is the workspace.
        let archive_id = container.parent_id.ok_or_else(|| {
            StoreError::Validation("archived container is missing its parent reference".to_string())
        })?;
        let archive = self.boards.get(archive_id).await?;
        let workspace_id = archive.parent_id.ok_or_else(|| {
            StoreError::Validation("archive board is missing its workspace".to_string())
        })?;

        match kind {
            ContainerKind::Workspace => Err(StoreError::Constraint(
                "workspaces cannot be restored into a parent".to_string(),
            )),
            ContainerKind::Board => Ok(workspace_id),
            ContainerKind::List => self.primary_board(workspace_id).await,
            ContainerKind::Card => {
                let board = self.primary_board(workspace_id).await?;
                let lists = self.lists.list(Some(board)).await?;
                lists
                    .first()
                    .map(|l| l.id)
                    .ok_or_else(|| {
                        StoreError::Constraint(
                            "workspace has no list to restore the card into".to_string(),
                        )
                    })
            }
        }
    }

    /// First active, non-archive board of a workspace.
    async fn primary_board(&self, workspace_id: Uuid) -> StoreResult<Uuid> {
        let boards = self.boards.list(Some(workspace_id)).await?;
        boards
            .iter()
            .find(|b| !b.is_archive_board(ContainerKind::Board))
            .map(|b| b.id)
            .ok_or_else(|| {
                StoreError::Constraint(
                    "workspace has no active board to restore into".to_string(),
                )
            })
    }

    /// Archived → Deleted: permanent removal. Only containers flagged
    /// archived and parked under an archive board qualify; the archive
    /// board itself is always rejected, as is anything that still has
    /// children.
    pub async fn delete(&self, kind: ContainerKind, id: Uuid) -> StoreResult<()> {
        let container = self.store(kind).get(id).await?;
        match LifecycleState::of(&container, kind) {
            LifecycleState::Permanent => Err(StoreError::Constraint(
                "the archive board cannot be deleted".to_string(),
            )),
            LifecycleState::Active => Err(StoreError::Constraint(
                "only archived containers can be deleted".to_string(),
            )),
            LifecycleState::Archived => {
                let parent_id = container.parent_id.ok_or_else(|| {
                    StoreError::Validation(
                        "archived container is missing its parent reference".to_string(),
                    )
                })?;
                let parent = self.boards.get(parent_id).await?;
                if !parent.is_archive_board(ContainerKind::Board) {
                    return Err(StoreError::Constraint(
                        "container does not reside in the archive".to_string(),
                    ));
                }
                self.check_no_children(kind, id).await?;

                self.gateway.remove(kind, id).await?;
                tracing::debug!(%id, %kind, "permanently deleted container");
                Ok(())
            }
        }
    }

    /// Deleting a container that still owns children would orphan them.
    /// Children must be archived (which reparents them into the archive)
    /// and deleted first.
    async fn check_no_children(&self, kind: ContainerKind, id: Uuid) -> StoreResult<()> {
        let child_kind = match kind {
            ContainerKind::Workspace => Some(ContainerKind::Board),
            ContainerKind::Board => Some(ContainerKind::List),
            ContainerKind::List => Some(ContainerKind::Card),
            ContainerKind::Card => None,
        };
        let Some(child_kind) = child_kind else {
            return Ok(());
        };

        let active = self.store(child_kind).list(Some(id)).await?;
        let archived = self.store(child_kind).list_archived(Some(id)).await?;
        if !active.is_empty() || !archived.is_empty() {
            return Err(StoreError::Constraint(format!(
                "cannot delete a {} that still contains {}",
                kind,
                child_kind.collection()
            )));
        }
        Ok(())
    }
}
