use super::*;
use crate::net::test_helpers::{MockTransport, dispatcher_with, user_json};
use serde_json::json;

fn api(transport: &std::sync::Arc<MockTransport>) -> ApiClient {
    ApiClient::new(dispatcher_with(transport))
}

#[tokio::test]
async fn fetch_users_replaces_list() {
    let transport = MockTransport::new();
    transport
        .respond(200, json!([user_json(1, "a@b.com", true), user_json(2, "c@d.com", false)]))
        .respond(200, json!([user_json(3, "e@f.com", false)]));
    let api = api(&transport);
    let mut dir = UserDirectory::new();

    assert_eq!(dir.fetch_users(&api, None, None).await.unwrap().len(), 2);
    dir.fetch_users(&api, None, None).await.unwrap();
    assert_eq!(dir.users.iter().map(|u| u.id).collect::<Vec<_>>(), vec![3]);
    assert!(!dir.loading);
    assert!(dir.error.is_none());
}

#[tokio::test]
async fn failed_fetch_records_error_and_keeps_list() {
    let transport = MockTransport::new();
    transport
        .respond(200, json!([user_json(1, "a@b.com", true)]))
        .respond(403, json!({ "detail": "The user doesn't have enough privileges" }));
    let api = api(&transport);
    let mut dir = UserDirectory::new();

    dir.fetch_users(&api, None, None).await.unwrap();
    let err = dir.fetch_users(&api, None, None).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(dir.error.as_deref(), Some("The user doesn't have enough privileges"));
    assert_eq!(dir.users.len(), 1);
    assert!(!dir.loading);
}

#[tokio::test]
async fn update_replaces_matching_entry_and_selection() {
    let transport = MockTransport::new();
    transport
        .respond(200, json!([user_json(1, "a@b.com", true), user_json(2, "c@d.com", false)]))
        .respond(200, user_json(2, "c@d.com", false))
        .respond(200, json!({ "id": 2, "email": "c@d.com", "is_active": false }));
    let api = api(&transport);
    let mut dir = UserDirectory::new();
    dir.fetch_users(&api, None, None).await.unwrap();
    dir.fetch_user(&api, 2).await.unwrap();

    let update = UserUpdate { is_active: Some(false), ..UserUpdate::default() };
    dir.update_user(&api, 2, &update).await.unwrap();
    assert!(!dir.find(2).unwrap().is_active);
    assert!(dir.find(1).unwrap().is_active);
    assert!(!dir.selected.as_ref().unwrap().is_active);
}

#[tokio::test]
async fn delete_removes_entry_and_clears_selection() {
    let transport = MockTransport::new();
    transport
        .respond(200, json!([user_json(1, "a@b.com", true), user_json(2, "c@d.com", false)]))
        .respond(200, user_json(2, "c@d.com", false))
        .respond(200, json!({ "message": "User deleted successfully" }));
    let api = api(&transport);
    let mut dir = UserDirectory::new();
    dir.fetch_users(&api, None, None).await.unwrap();
    dir.fetch_user(&api, 2).await.unwrap();

    dir.delete_user(&api, 2).await.unwrap();
    assert!(dir.find(2).is_none());
    assert!(dir.selected.is_none());
    assert_eq!(dir.users.len(), 1);
}

#[tokio::test]
async fn failed_delete_keeps_entry() {
    let transport = MockTransport::new();
    transport
        .respond(200, json!([user_json(1, "a@b.com", true)]))
        .respond(400, json!({ "detail": "Users cannot delete themselves" }));
    let api = api(&transport);
    let mut dir = UserDirectory::new();
    dir.fetch_users(&api, None, None).await.unwrap();

    let err = dir.delete_user(&api, 1).await.unwrap_err();
    assert_eq!(err.to_string(), "Users cannot delete themselves");
    assert!(dir.find(1).is_some());
    assert_eq!(dir.error.as_deref(), Some("Users cannot delete themselves"));
}

#[tokio::test]
async fn new_operation_clears_previous_error() {
    let transport = MockTransport::new();
    transport
        .respond(404, json!({ "detail": "User not found" }))
        .respond(200, user_json(1, "a@b.com", true));
    let api = api(&transport);
    let mut dir = UserDirectory::new();

    dir.fetch_user(&api, 99).await.unwrap_err();
    assert_eq!(dir.error.as_deref(), Some("User not found"));
    dir.fetch_user(&api, 1).await.unwrap();
    assert!(dir.error.is_none());
}
