use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reserved name of the permanent per-workspace archive board.
pub const ARCHIVE_BOARD_NAME: &str = "Archive";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    Workspace,
    Board,
    List,
    Card,
}

impl ContainerKind {
    /// Remote collection (and mirror snapshot) name for this kind.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Workspace => "workspaces",
            Self::Board => "boards",
            Self::List => "lists",
            Self::Card => "cards",
        }
    }

    /// The kind one level up, `None` for workspaces.
    pub fn parent(&self) -> Option<ContainerKind> {
        match self {
            Self::Workspace => None,
            Self::Board => Some(Self::Workspace),
            Self::List => Some(Self::Board),
            Self::Card => Some(Self::List),
        }
    }

}

impl std::fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let singular = match self {
            Self::Workspace => "workspace",
            Self::Board => "board",
            Self::List => "list",
            Self::Card => "card",
        };
        f.write_str(singular)
    }
}

/// A workspace, board, list, or card. One row shape covers all four kinds;
/// `parent_id` points one level up and is `None` only for workspaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub position: i64,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Container {
    /// Whether this container is a workspace's permanent archive board.
    /// Only meaningful for boards; the name is reserved within a workspace.
    pub fn is_archive_board(&self, kind: ContainerKind) -> bool {
        kind == ContainerKind::Board && self.name == ARCHIVE_BOARD_NAME
    }
}
