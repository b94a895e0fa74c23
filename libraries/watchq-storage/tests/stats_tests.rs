//! Integration tests for the stats vertical slice


use test_helpers::*;

#[tokio::test]
async fn stats_are_all_zero_without_items() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_id = create_test_user(pool, 1).await;
    watchq_storage::playlists::ensure_default(pool, user_id)
        .await
        .unwrap();

    let stats = watchq_storage::stats::for_user(pool, user_id).await.unwrap();
    assert_eq!(stats.playlist_count, 1);
    assert_eq!(stats.done_count, 0);
    assert_eq!(stats.done_sec, 0);
    assert_eq!(stats.pending_count, 0);
    assert_eq!(stats.pending_sec, 0);
    // No division error on an empty queue
    assert_eq!(stats.done_percentage(), 0);
}

#[tokio::test]
async fn stats_count_items_and_durations_across_playlists() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_id = create_test_user(pool, 1).await;
    let default_id = watchq_storage::playlists::ensure_default(pool, user_id)
        .await
        .unwrap();
    watchq_storage::items::add(pool, default_id, &item("https://youtu.be/v0", None, Some(30)))
        .await
        .unwrap();

    let playlist_id = create_test_playlist(
        pool,
        user_id,
        "https://youtube.com/playlist?list=abc",
        &[
            item("https://youtu.be/v1", Some(1), Some(60)),
            item("https://youtu.be/v2", Some(2), Some(120)),
            item("https://youtu.be/v3", Some(3), Some(180)),
        ],
    )
    .await;

    let next = watchq_storage::items::find_next_pending(pool, playlist_id, user_id)
        .await
        .unwrap()
        .unwrap();
    watchq_storage::items::mark_done(pool, next.id, playlist_id, user_id)
        .await
        .unwrap();

    let stats = watchq_storage::stats::for_user(pool, user_id).await.unwrap();
    assert_eq!(stats.playlist_count, 2);
    assert_eq!(stats.done_count, 1);
    assert_eq!(stats.done_sec, 60);
    assert_eq!(stats.pending_count, 3);
    assert_eq!(stats.pending_sec, 330);
    // 60 of 390 seconds watched, truncated
    assert_eq!(stats.done_percentage(), 15);
}

#[tokio::test]
async fn stats_do_not_leak_across_users() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let alice = create_test_user(pool, 1).await;
    let bob = create_test_user(pool, 2).await;

    create_test_playlist(
        pool,
        alice,
        "https://youtube.com/playlist?list=abc",
        &[item("https://youtu.be/v1", Some(1), Some(60))],
    )
    .await;

    let stats = watchq_storage::stats::for_user(pool, bob).await.unwrap();
    assert_eq!(stats.playlist_count, 0);
    assert_eq!(stats.pending_count, 0);
}
