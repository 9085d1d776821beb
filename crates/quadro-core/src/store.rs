use std::sync::Arc;

use quadro_shared::api::{CreateRecordRequest, RecordPlacement, UpdateRecordRequest};
use quadro_shared::{Container, ContainerKind, ARCHIVE_BOARD_NAME};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::gateway::Gateway;
use crate::position::{self, Slot};

pub(crate) fn positions(rows: &[Container]) -> Vec<i64> {
    rows.iter().map(|c| c.position).collect()
}

/// Ordered-collection operations for one container kind, over the shared
/// persistence gateway.
#[derive(Clone)]
pub struct ContainerStore {
    kind: ContainerKind,
    gateway: Arc<Gateway>,
}

impl ContainerStore {
    pub fn new(kind: ContainerKind, gateway: Arc<Gateway>) -> Self {
        Self { kind, gateway }
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    /// Active children of `parent_id`, position ascending.
    pub async fn list(&self, parent_id: Option<Uuid>) -> StoreResult<Vec<Container>> {
        Ok(self.gateway.fetch(self.kind, parent_id, false).await?.value)
    }

    /// Archived children of `parent_id` (the archive board's contents),
    /// position ascending.
    pub async fn list_archived(&self, parent_id: Option<Uuid>) -> StoreResult<Vec<Container>> {
        Ok(self.gateway.fetch(self.kind, parent_id, true).await?.value)
    }

    pub async fn get(&self, id: Uuid) -> StoreResult<Container> {
        Ok(self.gateway.get(self.kind, id).await?.value)
    }

    fn validated_name(&self, name: &str) -> StoreResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation(format!(
                "{} name is required",
                self.kind
            )));
        }
        Ok(name.to_string())
    }

    /// The archive board name is reserved per workspace; a second board
    /// carrying it would break archive resolution.
    fn guard_reserved_name(&self, name: &str) -> StoreResult<()> {
        if self.kind == ContainerKind::Board && name == ARCHIVE_BOARD_NAME {
            return Err(StoreError::Constraint(format!(
                "'{}' is a reserved board name",
                ARCHIVE_BOARD_NAME
            )));
        }
        Ok(())
    }

    fn check_parent_arity(&self, parent_id: Option<Uuid>) -> StoreResult<()> {
        match (self.kind.parent(), parent_id) {
            (None, Some(_)) => Err(StoreError::Validation(
                "workspaces do not take a parent".to_string(),
            )),
            (Some(_), None) => Err(StoreError::Validation(format!(
                "{} requires a parent",
                self.kind
            ))),
            _ => Ok(()),
        }
    }

    /// Create at end-of-list within the parent scope.
    pub async fn create(&self, parent_id: Option<Uuid>, name: &str) -> StoreResult<Container> {
        let name = self.validated_name(name)?;
        self.guard_reserved_name(&name)?;
        self.check_parent_arity(parent_id)?;

        let siblings = self.list(parent_id).await?;
        let position = position::end_of_list(&positions(&siblings));

        let created = self
            .gateway
            .insert(
                self.kind,
                CreateRecordRequest {
                    parent_id,
                    name,
                    position,
                    archived: false,
                },
            )
            .await?;
        tracing::debug!(kind = %self.kind, id = %created.value.id, "created container");
        Ok(created.value)
    }

    /// Rename in place; position and parent are untouched.
    pub async fn rename(&self, id: Uuid, name: &str) -> StoreResult<Container> {
        let name = self.validated_name(name)?;
        let current = self.get(id).await?;
        if current.is_archive_board(self.kind) {
            return Err(StoreError::Constraint(
                "the archive board cannot be renamed".to_string(),
            ));
        }
        self.guard_reserved_name(&name)?;

        let patch = UpdateRecordRequest {
            name: Some(name),
            ..Default::default()
        };
        Ok(self.gateway.update(self.kind, id, patch).await?.value)
    }

    /// Reposition (and possibly reparent) to `target_index` among the
    /// target scope's active siblings. `parent_id` and `position` always
    /// change together; when the midpoint runs out of headroom the whole
    /// scope is renumbered and persisted atomically before the move
    /// completes.
    pub async fn move_to(
        &self,
        id: Uuid,
        target_parent_id: Option<Uuid>,
        target_index: usize,
    ) -> StoreResult<Container> {
        self.check_parent_arity(target_parent_id)?;

        let current = self.get(id).await?;
        if current.archived {
            return Err(StoreError::Constraint(
                "archived containers are moved via restore".to_string(),
            ));
        }
        if current.is_archive_board(self.kind) && current.parent_id != target_parent_id {
            return Err(StoreError::Constraint(
                "the archive board cannot leave its workspace".to_string(),
            ));
        }

        let mut siblings = self.list(target_parent_id).await?;
        siblings.retain(|c| c.id != id);
        let index = target_index.min(siblings.len());

        match position::slot_at(&positions(&siblings), index) {
            Slot::At(position) => {
                let patch = UpdateRecordRequest {
                    parent_id: target_parent_id,
                    position: Some(position),
                    ..Default::default()
                };
                Ok(self.gateway.update(self.kind, id, patch).await?.value)
            }
            Slot::NeedsRebalance => {
                let mut order: Vec<Uuid> = siblings.iter().map(|c| c.id).collect();
                order.insert(index, id);

                let placements: Vec<RecordPlacement> = order
                    .iter()
                    .zip(position::rebalance(order.len()))
                    .map(|(&id, position)| RecordPlacement { id, position })
                    .collect();

                tracing::debug!(
                    kind = %self.kind,
                    scope = ?target_parent_id,
                    siblings = placements.len(),
                    "renumbering sibling scope"
                );
                let rows = self
                    .gateway
                    .apply_order(self.kind, target_parent_id, placements)
                    .await?;
                rows.value
                    .into_iter()
                    .find(|c| c.id == id)
                    .ok_or(StoreError::NotFound)
            }
        }
    }
}
