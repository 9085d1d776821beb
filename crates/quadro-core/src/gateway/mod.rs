//! Uniform persistence against the hosted store with transparent fallback
//! to the local mirror.
//!
//! Every operation attempts the remote once (when one is configured). On
//! success the canonical result is folded back into the mirror so the
//! mirror stays current; on any remote failure the gateway logs a warning,
//! performs the equivalent operation locally, and returns a synthesized
//! result of the same shape. Callers can only tell the two apart by the
//! attached [`DataSource`] flag.

mod mirror;
mod remote;

pub use mirror::MirrorStore;
pub use remote::{RemoteError, RemoteStore};

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use quadro_shared::api::{CreateRecordRequest, RecordPlacement, ReorderRecordsRequest, UpdateRecordRequest};
use quadro_shared::{Container, ContainerKind};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::session::SessionMode;

/// Which dataset actually produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Remote,
    Mirror,
}

/// A gateway result tagged with the dataset that produced it.
#[derive(Debug)]
pub struct Sourced<T> {
    pub value: T,
    pub source: DataSource,
}

impl<T> Sourced<T> {
    fn remote(value: T) -> Self {
        Self {
            value,
            source: DataSource::Remote,
        }
    }

    fn mirror(value: T) -> Self {
        Self {
            value,
            source: DataSource::Mirror,
        }
    }
}

pub struct Gateway {
    remote: Option<RemoteStore>,
    mirror: MirrorStore,
    degraded: AtomicBool,
}

impl Gateway {
    pub fn new(config: &Config, mode: SessionMode) -> anyhow::Result<Self> {
        use anyhow::Context;

        let remote = match mode {
            SessionMode::Remote => {
                let url = config
                    .api_url
                    .as_deref()
                    .context("remote mode requires QUADRO_API_URL")?;
                let token = config
                    .api_token
                    .as_deref()
                    .context("remote mode requires QUADRO_API_TOKEN")?;
                Some(
                    RemoteStore::new(url, token, config.request_timeout)
                        .context("Could not build remote client")?,
                )
            }
            SessionMode::Isolated => None,
        };

        let mirror = MirrorStore::open(&config.data_dir, mode.namespace())?;

        Ok(Self {
            remote,
            mirror,
            degraded: AtomicBool::new(false),
        })
    }

    /// Whether the last remote attempt failed and results are coming from
    /// the mirror.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    fn note_failure(&self, operation: &str, kind: ContainerKind, err: &RemoteError) {
        self.degraded.store(true, Ordering::Relaxed);
        tracing::warn!(
            %err,
            %kind,
            operation,
            "remote store unavailable, falling back to local mirror"
        );
    }

    fn note_success(&self) {
        self.degraded.store(false, Ordering::Relaxed);
    }

    pub async fn fetch(
        &self,
        kind: ContainerKind,
        parent_id: Option<Uuid>,
        archived: bool,
    ) -> StoreResult<Sourced<Vec<Container>>> {
        if let Some(remote) = &self.remote {
            match remote.fetch(kind, parent_id, archived).await {
                Ok(rows) => {
                    self.note_success();
                    self.mirror.merge_scope(kind, parent_id, archived, &rows)?;
                    return Ok(Sourced::remote(rows));
                }
                Err(err) => self.note_failure("fetch", kind, &err),
            }
        }
        Ok(Sourced::mirror(self.mirror.fetch(kind, parent_id, archived)?))
    }

    pub async fn get(&self, kind: ContainerKind, id: Uuid) -> StoreResult<Sourced<Container>> {
        if let Some(remote) = &self.remote {
            match remote.get(kind, id).await {
                Ok(row) => {
                    self.note_success();
                    self.mirror.upsert(kind, &row)?;
                    return Ok(Sourced::remote(row));
                }
                Err(err) => self.note_failure("get", kind, &err),
            }
        }
        self.mirror
            .get(kind, id)?
            .map(Sourced::mirror)
            .ok_or(StoreError::NotFound)
    }

    pub async fn insert(
        &self,
        kind: ContainerKind,
        req: CreateRecordRequest,
    ) -> StoreResult<Sourced<Container>> {
        if let Some(remote) = &self.remote {
            match remote.insert(kind, &req).await {
                Ok(row) => {
                    self.note_success();
                    self.mirror.upsert(kind, &row)?;
                    return Ok(Sourced::remote(row));
                }
                Err(err) => self.note_failure("insert", kind, &err),
            }
        }

        // Synthesize what the remote would have returned: generated id,
        // local timestamps.
        let now = Utc::now();
        let row = Container {
            id: Uuid::new_v4(),
            parent_id: req.parent_id,
            name: req.name,
            position: req.position,
            archived: req.archived,
            created_at: now,
            updated_at: now,
        };
        self.mirror.upsert(kind, &row)?;
        Ok(Sourced::mirror(row))
    }

    pub async fn update(
        &self,
        kind: ContainerKind,
        id: Uuid,
        patch: UpdateRecordRequest,
    ) -> StoreResult<Sourced<Container>> {
        if let Some(remote) = &self.remote {
            match remote.update(kind, id, &patch).await {
                Ok(row) => {
                    self.note_success();
                    self.mirror.upsert(kind, &row)?;
                    return Ok(Sourced::remote(row));
                }
                Err(err) => self.note_failure("update", kind, &err),
            }
        }

        let mut row = self.mirror.get(kind, id)?.ok_or(StoreError::NotFound)?;
        if let Some(name) = patch.name {
            row.name = name;
        }
        if let Some(parent_id) = patch.parent_id {
            row.parent_id = Some(parent_id);
        }
        if let Some(position) = patch.position {
            row.position = position;
        }
        if let Some(archived) = patch.archived {
            row.archived = archived;
        }
        row.updated_at = Utc::now();
        self.mirror.upsert(kind, &row)?;
        Ok(Sourced::mirror(row))
    }

    /// Move every placed row under `parent_id` at its paired position, as
    /// one atomic operation: a single reorder call remotely, a single
    /// snapshot replace locally. Used for rebalances, where readers must
    /// never observe a partially renumbered scope.
    pub async fn apply_order(
        &self,
        kind: ContainerKind,
        parent_id: Option<Uuid>,
        placements: Vec<RecordPlacement>,
    ) -> StoreResult<Sourced<Vec<Container>>> {
        if let Some(remote) = &self.remote {
            let req = ReorderRecordsRequest {
                parent_id,
                placements: placements.clone(),
            };
            match remote.reorder(kind, &req).await {
                Ok(rows) => {
                    self.note_success();
                    // Keep the mirror aligned with the canonical renumbering.
                    self.mirror.apply_order(kind, parent_id, &placements)?;
                    return Ok(Sourced::remote(rows));
                }
                Err(err) => self.note_failure("reorder", kind, &err),
            }
        }

        Ok(Sourced::mirror(
            self.mirror.apply_order(kind, parent_id, &placements)?,
        ))
    }

    pub async fn remove(&self, kind: ContainerKind, id: Uuid) -> StoreResult<Sourced<()>> {
        if let Some(remote) = &self.remote {
            match remote.remove(kind, id).await {
                Ok(()) => {
                    self.note_success();
                    self.mirror.remove(kind, id)?;
                    return Ok(Sourced::remote(()));
                }
                Err(err) => self.note_failure("remove", kind, &err),
            }
        }

        if !self.mirror.remove(kind, id)? {
            return Err(StoreError::NotFound);
        }
        Ok(Sourced::mirror(()))
    }
}
