use actor_framework::mock::MockClient;
use actor_framework::FrameworkError;
use serde_json::json;
use service_relay::clients::NotificationClient;
use service_relay::error::RelayError;
use service_relay::model::{Inbox, InboxTotals, NotificationDraft, NotificationId, NotificationKind, UserId};
use tokio::task::JoinHandle;

fn spawn_log(retention: usize) -> (NotificationClient, JoinHandle<()>) {
    let (actor, client) = service_relay::notification_actor::new(16, retention);
    let handle = tokio::spawn(actor.run(()));
    (client, handle)
}

fn numbered(n: usize) -> NotificationDraft {
    NotificationDraft::new(
        NotificationKind::System,
        format!("Notice {n}"),
        "Scheduled maintenance",
        json!({ "n": n }),
    )
}

#[tokio::test]
async fn test_retention_evicts_exactly_the_oldest() {
    let (client, handle) = spawn_log(100);
    let alice = UserId::new("alice");

    for n in 0..100 {
        client.append(&alice, numbered(n)).await.unwrap();
    }
    assert_eq!(client.list(&alice, false).await.unwrap().items.len(), 100);

    client.append(&alice, numbered(100)).await.unwrap();
    let list = client.list(&alice, false).await.unwrap();
    assert_eq!(list.items.len(), 100);
    assert_eq!(list.items[0].title, "Notice 100");
    assert_eq!(list.items[99].title, "Notice 1");
    assert_eq!(list.unread_count, 100);

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_read_state_and_deletion() {
    let (client, handle) = spawn_log(10);
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");

    let first = client.append(&alice, numbered(1)).await.unwrap();
    let second = client.append(&alice, numbered(2)).await.unwrap();
    client.append(&alice, numbered(3)).await.unwrap();

    let read = client.mark_read(&alice, first.id).await.unwrap();
    assert!(read.read);

    let unread = client.list(&alice, true).await.unwrap();
    assert_eq!(unread.items.len(), 2);
    assert_eq!(unread.unread_count, 2);

    // Another user's id does not resolve in this log.
    client.append(&bob, numbered(9)).await.unwrap();
    assert!(matches!(
        client.mark_read(&bob, second.id).await,
        Err(RelayError::NotFound(_))
    ));

    assert_eq!(client.mark_all_read(&alice).await.unwrap(), 2);
    assert_eq!(client.mark_all_read(&alice).await.unwrap(), 0);

    let deleted = client.delete(&alice, second.id).await.unwrap();
    assert_eq!(deleted.id, second.id);
    assert!(matches!(
        client.delete(&alice, second.id).await,
        Err(RelayError::NotFound(_))
    ));
    assert_eq!(client.list(&alice, false).await.unwrap().items.len(), 2);

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_reads_resolve_the_inbox_by_user() {
    let mut mock = MockClient::<Inbox>::new();
    mock.expect_lookup().return_ok(None);
    mock.expect_lookup().return_ok(None);
    let client = NotificationClient::new(mock.client(), 10);

    // One key lookup per call, and no inbox means nothing else is asked of the log.
    let list = client.list(&UserId::new("alice"), false).await.unwrap();
    assert!(list.items.is_empty());
    assert!(matches!(
        client.mark_read(&UserId::new("alice"), NotificationId::new()).await,
        Err(RelayError::NotFound(_))
    ));
    mock.verify();
}

#[tokio::test]
async fn test_retried_append_is_stored_once() {
    let (client, handle) = spawn_log(10);
    let alice = UserId::new("alice");
    let draft = numbered(1);

    let first = client.append(&alice, draft.clone()).await.unwrap();
    let again = client.append(&alice, draft).await.unwrap();
    assert_eq!(first.id, again.id);
    client.append(&UserId::new("bob"), numbered(2)).await.unwrap();

    let list = client.list(&alice, false).await.unwrap();
    assert_eq!(list.items.len(), 1);
    assert_eq!(
        client.totals().await.unwrap(),
        InboxTotals {
            inboxes: 2,
            notifications: 2,
            unread: 2,
        }
    );

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_users_without_inbox_see_empty_log() {
    let (client, handle) = spawn_log(10);
    let nobody = UserId::new("nobody");

    let list = client.list(&nobody, false).await.unwrap();
    assert!(list.items.is_empty());
    assert_eq!(list.unread_count, 0);
    assert_eq!(client.mark_all_read(&nobody).await.unwrap(), 0);
    assert!(matches!(
        client.delete(&nobody, NotificationId::new()).await,
        Err(RelayError::NotFound(_))
    ));

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_closed_log_surfaces_as_unavailable() {
    let mut mock = MockClient::<Inbox>::new();
    mock.expect_lookup().return_err(FrameworkError::ActorClosed);
    let client = NotificationClient::new(mock.client(), 10);

    let result = client.list(&UserId::new("alice"), false).await;
    assert!(matches!(result, Err(RelayError::Unavailable(_))));
    mock.verify();
}
