mod common;

use common::{assert_strictly_ordered, isolated_quadro, names};
use quadro_core::{Container, ContainerKind, Quadro, StoreError, ARCHIVE_BOARD_NAME};
use uuid::Uuid;

async fn workspace_with_boards(quadro: &Quadro, boards: &[&str]) -> (Uuid, Vec<Container>) {
    let ws = quadro.workspaces().create(None, "Acme").await.unwrap();
    let mut created = Vec::new();
    for name in boards {
        created.push(quadro.boards().create(Some(ws.id), name).await.unwrap());
    }
    (ws.id, created)
}

#[tokio::test]
async fn archive_board_is_created_lazily_and_reused() {
    let dir = tempfile::tempdir().unwrap();
    let quadro = isolated_quadro(dir.path());
    let (ws, _) = workspace_with_boards(&quadro, &["main"]).await;

    let before = quadro.boards().list(Some(ws)).await.unwrap();
    assert!(!before.iter().any(|b| b.name == ARCHIVE_BOARD_NAME));

    let first = quadro.archive().archive_board(ws).await.unwrap();
    let second = quadro.archive().archive_board(ws).await.unwrap();
    assert_eq!(first.id, second.id);

    let after = quadro.boards().list(Some(ws)).await.unwrap();
    let count = after
        .iter()
        .filter(|b| b.name == ARCHIVE_BOARD_NAME)
        .count();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn archiving_parks_board_under_the_archive_board() {
    let dir = tempfile::tempdir().unwrap();
    let quadro = isolated_quadro(dir.path());
    let (ws, boards) = workspace_with_boards(&quadro, &["x", "y"]).await;
    let x = &boards[0];

    let archived = quadro.archive().archive(ContainerKind::Board, x.id).await.unwrap();
    assert!(archived.archived);

    let listing = quadro.boards().list(Some(ws)).await.unwrap();
    assert!(!listing.iter().any(|b| b.id == x.id));
    assert!(listing.iter().any(|b| b.name == "y"));

    let parked = quadro
        .archive()
        .archived_items(ws, ContainerKind::Board)
        .await
        .unwrap();
    assert_eq!(names(&parked), ["x"]);

    let archive = quadro.archive().archive_board(ws).await.unwrap();
    assert_eq!(parked[0].parent_id, Some(archive.id));
}

#[tokio::test]
async fn archive_and_restore_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let quadro = isolated_quadro(dir.path());
    let (ws, boards) = workspace_with_boards(&quadro, &["x"]).await;
    let x = &boards[0];

    let once = quadro.archive().archive(ContainerKind::Board, x.id).await.unwrap();
    let twice = quadro.archive().archive(ContainerKind::Board, x.id).await.unwrap();
    assert_eq!(once.parent_id, twice.parent_id);
    assert_eq!(once.position, twice.position);

    // Restoring an active container reports success without touching it.
    let active = quadro.boards().create(Some(ws), "active").await.unwrap();
    let restored = quadro
        .archive()
        .restore(ContainerKind::Board, active.id, None)
        .await
        .unwrap();
    assert_eq!(restored.parent_id, active.parent_id);
    assert_eq!(restored.position, active.position);
    assert!(!restored.archived);
}

#[tokio::test]
async fn archive_commands_on_the_archive_board_are_noops() {
    let dir = tempfile::tempdir().unwrap();
    let quadro = isolated_quadro(dir.path());
    let (ws, _) = workspace_with_boards(&quadro, &["main"]).await;

    let archive = quadro.archive().archive_board(ws).await.unwrap();

    let after = quadro
        .archive()
        .archive(ContainerKind::Board, archive.id)
        .await
        .unwrap();
    assert!(!after.archived);
    assert_eq!(after.parent_id, Some(ws));

    let restored = quadro
        .archive()
        .restore(ContainerKind::Board, archive.id, None)
        .await
        .unwrap();
    assert_eq!(restored.id, archive.id);
}

#[tokio::test]
async fn workspaces_cannot_be_archived() {
    let dir = tempfile::tempdir().unwrap();
    let quadro = isolated_quadro(dir.path());
    let ws = quadro.workspaces().create(None, "Acme").await.unwrap();

    let err = quadro
        .archive()
        .archive(ContainerKind::Workspace, ws.id)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Constraint(_)));
}

#[tokio::test]
async fn restore_returns_board_to_its_workspace() {
    let dir = tempfile::tempdir().unwrap();
    let quadro = isolated_quadro(dir.path());
    let (ws, boards) = workspace_with_boards(&quadro, &["x", "y"]).await;
    let x = &boards[0];

    quadro.archive().archive(ContainerKind::Board, x.id).await.unwrap();
    let restored = quadro
        .archive()
        .restore(ContainerKind::Board, x.id, None)
        .await
        .unwrap();

    assert!(!restored.archived);
    assert_eq!(restored.parent_id, Some(ws));

    let listing = quadro.boards().list(Some(ws)).await.unwrap();
    assert!(listing.iter().any(|b| b.id == x.id));
    assert_strictly_ordered(&listing);

    // Restore must never leave a duplicate position behind.
    let mut positions: Vec<i64> = listing.iter().map(|b| b.position).collect();
    positions.dedup();
    assert_eq!(positions.len(), listing.len());
}

#[tokio::test]
async fn restore_card_into_an_explicit_list() {
    let dir = tempfile::tempdir().unwrap();
    let quadro = isolated_quadro(dir.path());
    let (_ws, boards) = workspace_with_boards(&quadro, &["main"]).await;
    let board = &boards[0];

    let l1 = quadro.lists().create(Some(board.id), "todo").await.unwrap();
    let l2 = quadro.lists().create(Some(board.id), "done").await.unwrap();
    let card = quadro.cards().create(Some(l1.id), "task").await.unwrap();

    quadro.archive().archive(ContainerKind::Card, card.id).await.unwrap();
    let restored = quadro
        .archive()
        .restore(ContainerKind::Card, card.id, Some(l2.id))
        .await
        .unwrap();

    assert!(!restored.archived);
    assert_eq!(restored.parent_id, Some(l2.id));

    let cards = quadro.cards().list(Some(l2.id)).await.unwrap();
    assert_eq!(names(&cards), ["task"]);
}

#[tokio::test]
async fn restore_list_defaults_to_the_primary_board() {
    let dir = tempfile::tempdir().unwrap();
    let quadro = isolated_quadro(dir.path());
    let (_ws, boards) = workspace_with_boards(&quadro, &["first", "second"]).await;

    let list = quadro
        .lists()
        .create(Some(boards[1].id), "parked")
        .await
        .unwrap();
    quadro.archive().archive(ContainerKind::List, list.id).await.unwrap();

    let restored = quadro
        .archive()
        .restore(ContainerKind::List, list.id, None)
        .await
        .unwrap();
    assert_eq!(restored.parent_id, Some(boards[0].id));
}

#[tokio::test]
async fn restore_into_the_archive_board_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let quadro = isolated_quadro(dir.path());
    let (ws, boards) = workspace_with_boards(&quadro, &["main"]).await;

    let list = quadro
        .lists()
        .create(Some(boards[0].id), "todo")
        .await
        .unwrap();
    quadro.archive().archive(ContainerKind::List, list.id).await.unwrap();

    let archive = quadro.archive().archive_board(ws).await.unwrap();
    let err = quadro
        .archive()
        .restore(ContainerKind::List, list.id, Some(archive.id))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Constraint(_)));
}

#[tokio::test]
async fn delete_requires_a_prior_archive() {
    let dir = tempfile::tempdir().unwrap();
    let quadro = isolated_quadro(dir.path());
    let (_ws, boards) = workspace_with_boards(&quadro, &["x"]).await;

    let err = quadro
        .archive()
        .delete(ContainerKind::Board, boards[0].id)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Constraint(_)));
}

#[tokio::test]
async fn the_archive_board_is_never_deletable() {
    let dir = tempfile::tempdir().unwrap();
    let quadro = isolated_quadro(dir.path());
    let (ws, _) = workspace_with_boards(&quadro, &["main"]).await;

    let archive = quadro.archive().archive_board(ws).await.unwrap();
    let err = quadro
        .archive()
        .delete(ContainerKind::Board, archive.id)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Constraint(_)));

    // No state change: the board is still there.
    let listing = quadro.boards().list(Some(ws)).await.unwrap();
    assert!(listing.iter().any(|b| b.id == archive.id));
}

#[tokio::test]
async fn archived_card_can_be_deleted_permanently() {
    let dir = tempfile::tempdir().unwrap();
    let quadro = isolated_quadro(dir.path());
    let (ws, boards) = workspace_with_boards(&quadro, &["main"]).await;

    let list = quadro
        .lists()
        .create(Some(boards[0].id), "todo")
        .await
        .unwrap();
    let card = quadro.cards().create(Some(list.id), "task").await.unwrap();

    quadro.archive().archive(ContainerKind::Card, card.id).await.unwrap();
    quadro.archive().delete(ContainerKind::Card, card.id).await.unwrap();

    let parked = quadro
        .archive()
        .archived_items(ws, ContainerKind::Card)
        .await
        .unwrap();
    assert!(parked.is_empty());

    let err = quadro.cards().get(card.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[tokio::test]
async fn delete_refuses_containers_that_still_have_children() {
    let dir = tempfile::tempdir().unwrap();
    let quadro = isolated_quadro(dir.path());
    let (_ws, boards) = workspace_with_boards(&quadro, &["main", "extra"]).await;
    let extra = &boards[1];

    let list = quadro
        .lists()
        .create(Some(extra.id), "leftover")
        .await
        .unwrap();

    quadro.archive().archive(ContainerKind::Board, extra.id).await.unwrap();
    let err = quadro
        .archive()
        .delete(ContainerKind::Board, extra.id)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Constraint(_)));

    // Empty the board, then deletion goes through.
    quadro.archive().archive(ContainerKind::List, list.id).await.unwrap();
    quadro.archive().delete(ContainerKind::List, list.id).await.unwrap();
    quadro.archive().delete(ContainerKind::Board, extra.id).await.unwrap();
}

#[tokio::test]
async fn the_archive_board_name_is_reserved() {
    let dir = tempfile::tempdir().unwrap();
    let quadro = isolated_quadro(dir.path());
    let (ws, boards) = workspace_with_boards(&quadro, &["main"]).await;

    let err = quadro
        .boards()
        .create(Some(ws), ARCHIVE_BOARD_NAME)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Constraint(_)));

    let err = quadro
        .boards()
        .rename(boards[0].id, ARCHIVE_BOARD_NAME)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Constraint(_)));

    let archive = quadro.archive().archive_board(ws).await.unwrap();
    let err = quadro
        .boards()
        .rename(archive.id, "Basement")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Constraint(_)));
}
