use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// POST /api/v1/{collection}
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRecordRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub position: i64,
    pub archived: bool,
}

/// PATCH /api/v1/{collection}/{id}
///
/// A reparent always travels together with a fresh position, so `parent_id`
/// here is only ever `Some` when `position` is too.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateRecordRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

/// One entry of a bulk position rewrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPlacement {
    pub id: Uuid,
    pub position: i64,
}

/// POST /api/v1/{collection}/reorder
///
/// Applied by the remote store in a single transaction: every listed record
/// is moved under `parent_id` at its paired position.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReorderRecordsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub placements: Vec<RecordPlacement>,
}
