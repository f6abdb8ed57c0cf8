use super::*;
use serde_json::json;

#[test]
fn detail_string_is_preferred() {
    let err = ApiError::from_response(400, json!({ "detail": "Inactive user", "message": "ignored" }));
    assert_eq!(err.to_string(), "Inactive user");
    assert_eq!(err.status(), Some(400));
}

#[test]
fn message_used_when_detail_missing() {
    let err = ApiError::from_response(500, json!({ "message": "database down" }));
    assert_eq!(err.to_string(), "database down");
}

#[test]
fn status_fallback_when_payload_is_opaque() {
    let err = ApiError::from_response(502, serde_json::Value::Null);
    assert_eq!(err.to_string(), "request failed with status 502");
    assert_eq!(err.payload(), Some(&serde_json::Value::Null));
}

#[test]
fn fastapi_detail_list_is_flattened() {
    let payload = json!({
        "detail": [
            { "loc": ["body", "email"], "msg": "value is not a valid email address", "type": "value_error" },
            { "loc": ["body", "password"], "msg": "ensure this value has at least 8 characters", "type": "value_error" }
        ]
    });
    let err = ApiError::from_response(422, payload);
    assert!(matches!(err, ApiError::Validation { .. }));
    assert_eq!(err.status(), Some(422));
    assert_eq!(
        err.to_string(),
        "value is not a valid email address; ensure this value has at least 8 characters"
    );
}

#[test]
fn unauthorized_maps_to_auth_expired() {
    let err = ApiError::from_response(401, json!({ "detail": "Could not validate credentials" }));
    assert!(err.is_auth_expired());
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.detail_text(), Some("Could not validate credentials"));
}

#[test]
fn transport_error_has_no_status() {
    let err = ApiError::transport("connection refused");
    assert_eq!(err.status(), None);
    assert!(err.payload().is_none());
    assert_eq!(err.to_string(), "connection refused");
}

#[test]
fn blank_transport_message_uses_generic_fallback() {
    assert_eq!(ApiError::transport("  ").to_string(), GENERIC_FAILURE_MESSAGE);
}
