//! Integration tests for the users vertical slice


use test_helpers::*;

#[tokio::test]
async fn ensure_creates_on_first_contact() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user_id = watchq_storage::users::ensure(pool, 1001, Some("alice"))
        .await
        .unwrap();

    let user = watchq_storage::users::find_by_telegram_id(pool, 1001)
        .await
        .unwrap()
        .expect("user should exist");

    assert_eq!(user.id, user_id);
    assert_eq!(user.telegram_id, 1001);
    assert_eq!(user.username.as_deref(), Some("alice"));
}

#[tokio::test]
async fn ensure_is_idempotent_and_keeps_first_username() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let first = watchq_storage::users::ensure(pool, 1001, Some("alice"))
        .await
        .unwrap();
    let second = watchq_storage::users::ensure(pool, 1001, Some("renamed"))
        .await
        .unwrap();
    let third = watchq_storage::users::ensure(pool, 1001, None).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first, third);

    // On conflict no columns change
    let user = watchq_storage::users::find_by_telegram_id(pool, 1001)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.username.as_deref(), Some("alice"));
}

#[tokio::test]
async fn ensure_separates_users_by_telegram_id() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let a = create_test_user(pool, 1).await;
    let b = create_test_user(pool, 2).await;

    assert_ne!(a, b);
}

#[tokio::test]
async fn find_by_telegram_id_returns_none_for_unknown() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let missing = watchq_storage::users::find_by_telegram_id(pool, 404)
        .await
        .unwrap();
    assert!(missing.is_none());
}
