use subscriber_store::domain::SubscriberId;

use crate::helpers::{spawn_store, subscriber_name};

#[tokio::test]
async fn create_subscriber_persists_the_given_name() {
    let test_store = spawn_store().await;

    let subscriber_id = test_store.create_subscriber("Test User Create").await;

    let saved = sqlx::query_as::<_, (String,)>("SELECT name FROM subscribers WHERE id = $1")
        .bind(subscriber_id)
        .fetch_one(&test_store.db_connection_pool)
        .await
        .expect("Failed to fetch saved subscriber");

    assert_eq!(saved.0, "Test User Create");
}

#[tokio::test]
async fn read_subscriber_returns_id_name_and_creation_timestamp() {
    let test_store = spawn_store().await;
    let subscriber_id = test_store.create_subscriber("Test User Read").await;

    let subscriber = test_store
        .subscribers
        .read(subscriber_id)
        .await
        .expect("Failed to read subscriber")
        .expect("Subscriber not found");

    let created_at = sqlx::query_as::<_, (Option<chrono::DateTime<chrono::Utc>>,)>(
        "SELECT created_at FROM subscribers WHERE id = $1",
    )
    .bind(subscriber_id)
    .fetch_one(&test_store.db_connection_pool)
    .await
    .expect("Failed to fetch creation timestamp");

    assert_eq!(subscriber.id, subscriber_id);
    assert_eq!(subscriber.name, "Test User Read");
    assert_eq!(created_at.0, Some(subscriber.created_at));
}

#[tokio::test]
async fn read_of_unknown_subscriber_returns_none() {
    let test_store = spawn_store().await;

    let subscriber = test_store
        .subscribers
        .read(SubscriberId::new(i64::MAX))
        .await
        .expect("Failed to read subscriber");

    assert!(subscriber.is_none());
}

#[tokio::test]
async fn subscriber_ids_increase_with_each_insert() {
    let test_store = spawn_store().await;

    let first = test_store.create_subscriber("First Subscriber").await;
    let second = test_store.create_subscriber("Second Subscriber").await;

    assert!(second > first, "{} was assigned after {}", second, first);
}

#[tokio::test]
async fn update_subscriber_replaces_the_name() {
    let test_store = spawn_store().await;
    let subscriber_id = test_store.create_subscriber("Test User Original").await;
    let original = test_store
        .subscribers
        .read(subscriber_id)
        .await
        .unwrap()
        .unwrap();

    let affected = test_store
        .subscribers
        .update(subscriber_id, &subscriber_name("Test User Updated"))
        .await
        .expect("Failed to update subscriber");

    let updated = test_store
        .subscribers
        .read(subscriber_id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(affected, 1);
    assert_eq!(updated.name, "Test User Updated");
    assert_eq!(updated.created_at, original.created_at);
}

#[tokio::test]
async fn update_of_unknown_subscriber_affects_no_rows() {
    let test_store = spawn_store().await;

    let affected = test_store
        .subscribers
        .update(SubscriberId::new(i64::MAX), &subscriber_name("Nobody"))
        .await
        .expect("Updating an unknown subscriber must not fail");

    assert_eq!(affected, 0);
}

#[tokio::test]
async fn delete_subscriber_removes_all_of_its_email_addresses() {
    let test_store = spawn_store().await;
    let subscriber_id = test_store.create_subscriber("Test User Delete").await;
    for email in [
        "test.delete@example.com",
        "test.delete.work@example.com",
        "test.delete.home@example.com",
    ] {
        test_store.create_email_address(subscriber_id, email).await;
    }
    assert_eq!(
        test_store
            .email_addresses
            .count_for_subscriber(subscriber_id)
            .await
            .unwrap(),
        3
    );

    let affected = test_store
        .subscribers
        .delete(subscriber_id)
        .await
        .expect("Failed to delete subscriber");

    let subscriber_count = test_store
        .subscribers
        .count_by_id(subscriber_id)
        .await
        .unwrap();
    let email_count = test_store
        .email_addresses
        .count_for_subscriber(subscriber_id)
        .await
        .unwrap();

    assert_eq!(affected, 1);
    assert_eq!(subscriber_count, 0);
    assert_eq!(email_count, 0);
}

#[tokio::test]
async fn delete_subscriber_leaves_other_subscribers_untouched() {
    let test_store = spawn_store().await;
    let deleted = test_store.create_subscriber("Deleted Subscriber").await;
    let kept = test_store.create_subscriber("Kept Subscriber").await;
    test_store
        .create_email_address(deleted, "deleted@example.com")
        .await;
    let kept_email = test_store.create_email_address(kept, "kept@example.com").await;

    test_store.subscribers.delete(deleted).await.unwrap();

    assert_eq!(test_store.subscribers.count_by_id(kept).await.unwrap(), 1);
    assert_eq!(
        test_store.email_addresses.count_by_id(kept_email).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn deleting_an_already_deleted_subscriber_affects_no_rows() {
    let test_store = spawn_store().await;
    let subscriber_id = test_store.create_subscriber("Test User Delete Twice").await;
    test_store.subscribers.delete(subscriber_id).await.unwrap();

    let affected = test_store
        .subscribers
        .delete(subscriber_id)
        .await
        .expect("Deleting twice must not fail");

    assert_eq!(affected, 0);
}
