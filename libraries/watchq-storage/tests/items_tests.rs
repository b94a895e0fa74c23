//! Integration tests for the playlist items vertical slice


use test_helpers::*;
use watchq_core::types::ItemStatus;
use watchq_storage::StorageError;

#[tokio::test]
async fn add_assigns_sequential_positions_and_bumps_duration() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_id = create_test_user(pool, 1).await;
    let playlist_id = watchq_storage::playlists::ensure_default(pool, user_id)
        .await
        .unwrap();

    let p1 = watchq_storage::items::add(pool, playlist_id, &item("https://youtu.be/v1", None, Some(60)))
        .await
        .unwrap();
    let p2 = watchq_storage::items::add(pool, playlist_id, &item("https://youtu.be/v2", None, Some(30)))
        .await
        .unwrap();
    let p3 = watchq_storage::items::add(pool, playlist_id, &item("https://youtu.be/v3", None, None))
        .await
        .unwrap();

    assert_eq!((p1, p2, p3), (1, 2, 3));

    let playlist = watchq_storage::playlists::get(pool, playlist_id, user_id)
        .await
        .unwrap()
        .unwrap();
    // Unknown duration counts as zero
    assert_eq!(playlist.total_duration_sec, 90);

    let items = watchq_storage::items::list(pool, playlist_id, user_id)
        .await
        .unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].position, Some(1));
    assert_eq!(items[2].position, Some(3));
}

#[tokio::test]
async fn add_to_missing_playlist_fails() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let err = watchq_storage::items::add(pool, 9999, &item("https://youtu.be/v1", None, None))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[tokio::test]
async fn find_next_pending_orders_by_position_with_nulls_first() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_id = create_test_user(pool, 1).await;
    let playlist_id = create_test_playlist(
        pool,
        user_id,
        "https://youtube.com/playlist?list=abc",
        &[
            item("https://youtu.be/second", Some(1), None),
            item("https://youtu.be/third", Some(2), None),
            // No position sorts before every numbered item
            item("https://youtu.be/first", None, None),
        ],
    )
    .await;

    let next = watchq_storage::items::find_next_pending(pool, playlist_id, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(next.url, "https://youtu.be/first");

    // Re-querying without mutation returns the same item
    let again = watchq_storage::items::find_next_pending(pool, playlist_id, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again.id, next.id);

    watchq_storage::items::mark_done(pool, next.id, playlist_id, user_id)
        .await
        .unwrap();
    let next = watchq_storage::items::find_next_pending(pool, playlist_id, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(next.url, "https://youtu.be/second");
}

#[tokio::test]
async fn find_next_pending_breaks_position_ties_by_id() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_id = create_test_user(pool, 1).await;
    let playlist_id = create_test_playlist(
        pool,
        user_id,
        "https://youtube.com/playlist?list=abc",
        &[
            item("https://youtu.be/v1", Some(1), None),
            item("https://youtu.be/v2", Some(1), None),
        ],
    )
    .await;

    let next = watchq_storage::items::find_next_pending(pool, playlist_id, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(next.url, "https://youtu.be/v1");
}

#[tokio::test]
async fn find_next_pending_returns_none_when_drained() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_id = create_test_user(pool, 1).await;
    let playlist_id = create_test_playlist(
        pool,
        user_id,
        "https://youtube.com/playlist?list=abc",
        &[item("https://youtu.be/v1", Some(1), None)],
    )
    .await;

    drain_playlist(pool, playlist_id, user_id).await;

    let next = watchq_storage::items::find_next_pending(pool, playlist_id, user_id)
        .await
        .unwrap();
    assert!(next.is_none());
}

#[tokio::test]
async fn find_next_pending_is_scoped_to_owner() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, 1).await;
    let bob = create_test_user(pool, 2).await;
    let playlist_id = create_test_playlist(
        pool,
        alice,
        "https://youtube.com/playlist?list=abc",
        &[item("https://youtu.be/v1", Some(1), None)],
    )
    .await;

    let next = watchq_storage::items::find_next_pending(pool, playlist_id, bob)
        .await
        .unwrap();
    assert!(next.is_none());
}

#[tokio::test]
async fn mark_done_stamps_completion_and_is_scoped() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, 1).await;
    let bob = create_test_user(pool, 2).await;
    let playlist_id = create_test_playlist(
        pool,
        alice,
        "https://youtube.com/playlist?list=abc",
        &[item("https://youtu.be/v1", Some(1), None)],
    )
    .await;

    let next = watchq_storage::items::find_next_pending(pool, playlist_id, alice)
        .await
        .unwrap()
        .unwrap();

    // Wrong owner, wrong playlist: nothing changes
    assert!(!watchq_storage::items::mark_done(pool, next.id, playlist_id, bob)
        .await
        .unwrap());
    assert!(!watchq_storage::items::mark_done(pool, next.id, playlist_id + 1, alice)
        .await
        .unwrap());

    assert!(watchq_storage::items::mark_done(pool, next.id, playlist_id, alice)
        .await
        .unwrap());

    let items = watchq_storage::items::list(pool, playlist_id, alice)
        .await
        .unwrap();
    assert_eq!(items[0].status, ItemStatus::Done);
    assert!(items[0].completed_at.is_some());
}
