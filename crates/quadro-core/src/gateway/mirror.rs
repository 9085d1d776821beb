use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Utc;
use quadro_shared::api::RecordPlacement;
use quadro_shared::{Container, ContainerKind};
use uuid::Uuid;

/// Local fallback dataset: one full-collection JSON snapshot per container
/// kind, under `{data_dir}/{namespace}/`.
///
/// Snapshots are always rewritten whole: read, modify in memory, write to a
/// temporary file, then rename over the old snapshot. A crash mid-write
/// never leaves a half-written collection behind.
pub struct MirrorStore {
    root: PathBuf,
    lock: Mutex<()>,
}

impl MirrorStore {
    /// Open (and seed, when empty) the snapshot directory for a namespace.
    pub fn open(data_dir: &Path, namespace: &str) -> Result<Self> {
        let root = data_dir.join(namespace);
        fs::create_dir_all(&root).context("Could not create mirror directory")?;

        let store = Self {
            root,
            lock: Mutex::new(()),
        };
        store.seed_if_empty()?;
        Ok(store)
    }

    fn snapshot_path(&self, kind: ContainerKind) -> PathBuf {
        self.root.join(format!("{}.json", kind.collection()))
    }

    fn seed_if_empty(&self) -> Result<()> {
        if self.snapshot_path(ContainerKind::Workspace).exists() {
            return Ok(());
        }
        tracing::info!(root = %self.root.display(), "seeding mirror with starter data");
        for (kind, containers) in crate::seed::starter_data() {
            self.write_snapshot(kind, &containers)?;
        }
        Ok(())
    }

    fn read_snapshot(&self, kind: ContainerKind) -> Result<Vec<Container>> {
        let path = self.snapshot_path(kind);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Could not read mirror snapshot {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Could not parse mirror snapshot {}", path.display()))
    }

    fn write_snapshot(&self, kind: ContainerKind, containers: &[Container]) -> Result<()> {
        let path = self.snapshot_path(kind);
        let contents =
            serde_json::to_string_pretty(containers).context("Could not serialize snapshot")?;

        let tmp = tempfile::NamedTempFile::new_in(&self.root)
            .context("Could not create snapshot temp file")?;
        fs::write(tmp.path(), contents).context("Could not write snapshot temp file")?;
        tmp.persist(&path)
            .with_context(|| format!("Could not replace mirror snapshot {}", path.display()))?;
        Ok(())
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Active or archived children of `parent_id`, position ascending.
    pub fn fetch(
        &self,
        kind: ContainerKind,
        parent_id: Option<Uuid>,
        archived: bool,
    ) -> Result<Vec<Container>> {
        let _guard = self.guard();
        let mut rows: Vec<Container> = self
            .read_snapshot(kind)?
            .into_iter()
            .filter(|c| c.parent_id == parent_id && c.archived == archived)
            .collect();
        rows.sort_by_key(|c| c.position);
        Ok(rows)
    }

    pub fn get(&self, kind: ContainerKind, id: Uuid) -> Result<Option<Container>> {
        let _guard = self.guard();
        Ok(self.read_snapshot(kind)?.into_iter().find(|c| c.id == id))
    }

    /// Insert or replace one row.
    pub fn upsert(&self, kind: ContainerKind, container: &Container) -> Result<()> {
        let _guard = self.guard();
        let mut rows = self.read_snapshot(kind)?;
        match rows.iter_mut().find(|c| c.id == container.id) {
            Some(existing) => *existing = container.clone(),
            None => rows.push(container.clone()),
        }
        self.write_snapshot(kind, &rows)
    }

    /// Remove one row; returns whether it was present.
    pub fn remove(&self, kind: ContainerKind, id: Uuid) -> Result<bool> {
        let _guard = self.guard();
        let mut rows = self.read_snapshot(kind)?;
        let before = rows.len();
        rows.retain(|c| c.id != id);
        let removed = rows.len() != before;
        if removed {
            self.write_snapshot(kind, &rows)?;
        }
        Ok(removed)
    }

    /// Move every placed row under `parent_id` at its paired position, in a
    /// single snapshot replace. Returns the affected rows, position
    /// ascending.
    pub fn apply_order(
        &self,
        kind: ContainerKind,
        parent_id: Option<Uuid>,
        placements: &[RecordPlacement],
    ) -> Result<Vec<Container>> {
        let _guard = self.guard();
        let now = Utc::now();
        let mut rows = self.read_snapshot(kind)?;
        for placement in placements {
            if let Some(row) = rows.iter_mut().find(|c| c.id == placement.id) {
                row.parent_id = parent_id;
                row.position = placement.position;
                row.updated_at = now;
            }
        }
        self.write_snapshot(kind, &rows)?;

        let placed: Vec<Uuid> = placements.iter().map(|p| p.id).collect();
        let mut affected: Vec<Container> = rows
            .into_iter()
            .filter(|c| placed.contains(&c.id))
            .collect();
        affected.sort_by_key(|c| c.position);
        Ok(affected)
    }

    /// Fold a scope's canonical rows (fresh from the remote) into the
    /// snapshot: rows in the same scope that the remote no longer returned
    /// are dropped, returned rows are upserted.
    pub fn merge_scope(
        &self,
        kind: ContainerKind,
        parent_id: Option<Uuid>,
        archived: bool,
        canonical: &[Container],
    ) -> Result<()> {
        let _guard = self.guard();
        let mut rows = self.read_snapshot(kind)?;
        let ids: Vec<Uuid> = canonical.iter().map(|c| c.id).collect();
        rows.retain(|c| {
            !(c.parent_id == parent_id && c.archived == archived) || ids.contains(&c.id)
        });
        for row in canonical {
            match rows.iter_mut().find(|c| c.id == row.id) {
                Some(existing) => *existing = row.clone(),
                None => rows.push(row.clone()),
            }
        }
        self.write_snapshot(kind, &rows)
    }
}
