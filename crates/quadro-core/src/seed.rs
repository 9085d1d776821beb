use chrono::Utc;
use quadro_shared::{Container, ContainerKind};
use uuid::Uuid;

use crate::position::GAP;

fn container(parent_id: Option<Uuid>, name: &str, position: i64) -> Container {
    let now = Utc::now();
    Container {
        id: Uuid::new_v4(),
        parent_id,
        name: name.to_string(),
        position,
        archived: false,
        created_at: now,
        updated_at: now,
    }
}

/// Built-in starter dataset for a fresh namespace: one workspace with a
/// single board, the usual three lists, and a few example cards.
pub fn starter_data() -> Vec<(ContainerKind, Vec<Container>)> {
    let workspace = container(None, "Personal", GAP);
    let board = container(Some(workspace.id), "Getting Started", GAP);

    let todo = container(Some(board.id), "To Do", GAP);
    let doing = container(Some(board.id), "Doing", 2 * GAP);
    let done = container(Some(board.id), "Done", 3 * GAP);

    let cards = vec![
        container(Some(todo.id), "Welcome to Quadro", GAP),
        container(Some(todo.id), "Drag cards between lists", 2 * GAP),
        container(Some(done.id), "Create your first board", GAP),
    ];

    vec![
        (ContainerKind::Workspace, vec![workspace]),
        (ContainerKind::Board, vec![board]),
        (ContainerKind::List, vec![todo, doing, done]),
        (ContainerKind::Card, cards),
    ]
}
