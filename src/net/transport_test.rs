use super::*;

#[test]
fn join_url_handles_leading_slash() {
    assert_eq!(join_url("http://api.test", "/users/me"), "http://api.test/users/me");
    assert_eq!(join_url("http://api.test", "users/me"), "http://api.test/users/me");
}

#[test]
fn parse_body_empty_is_null() {
    assert_eq!(parse_body(""), Value::Null);
    assert_eq!(parse_body("  \n"), Value::Null);
}

#[test]
fn parse_body_non_json_is_string() {
    assert_eq!(parse_body("Internal Server Error"), Value::String("Internal Server Error".to_owned()));
}

#[test]
fn parse_body_json_object() {
    assert_eq!(parse_body(r#"{"access_token":"tok"}"#), serde_json::json!({ "access_token": "tok" }));
}

#[test]
fn request_builders_set_method_and_body() {
    let req = ApiRequest::post("/auth/forgot-password").json(serde_json::json!({ "email": "a@b.com" }));
    assert_eq!(req.method, Method::POST);
    assert_eq!(req.path, "/auth/forgot-password");
    assert!(matches!(req.body, RequestBody::Json(_)));
    assert!(req.bearer.is_none());

    let req = ApiRequest::delete("/users/3");
    assert_eq!(req.method, Method::DELETE);
    assert_eq!(req.body, RequestBody::Empty);
}

#[test]
fn response_success_range() {
    assert!(ApiResponse { status: 204, body: Value::Null }.is_success());
    assert!(!ApiResponse { status: 301, body: Value::Null }.is_success());
}

#[test]
fn reqwest_transport_trims_base_url() {
    let transport = ReqwestTransport::new("http://localhost:8000/", ClientTimeouts::default()).unwrap();
    assert_eq!(transport.base_url(), "http://localhost:8000");
}
