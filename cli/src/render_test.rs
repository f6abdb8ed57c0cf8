use super::*;
use usergate::forms::Field;

fn user() -> User {
    User {
        id: 12,
        email: "ada@example.test".to_owned(),
        full_name: Some("Ada Lovelace".to_owned()),
        is_active: true,
        is_superuser: false,
        created_at: None,
    }
}

#[test]
fn user_row_contains_columns() {
    let row = user_row(&user());
    assert!(row.contains("12"));
    assert!(row.contains("ada@example.test"));
    assert!(row.contains("Ada Lovelace"));
    assert!(row.ends_with("no"));
}

#[test]
fn user_table_has_header_and_rows() {
    let table = user_table(&[user(), User { id: 13, ..user() }]);
    assert_eq!(table.lines().count(), 3);
    assert!(table.starts_with("    ID"));
}

#[test]
fn long_values_are_truncated() {
    assert_eq!(truncate("abcdefghij", 6), "abc...");
    assert_eq!(truncate("short", 6), "short");
}

#[test]
fn form_errors_lists_banner_then_fields() {
    let mut errors = FormErrors::banner("Please fix the highlighted fields");
    errors.insert(Field::Email, "Email is required");
    assert_eq!(
        form_errors(&errors),
        vec!["Please fix the highlighted fields".to_owned(), "  email: Email is required".to_owned()]
    );
}

#[test]
fn detail_shows_placeholders() {
    let detail = user_detail(&User { full_name: None, ..user() });
    assert!(detail.contains("name:       -"));
    assert!(detail.contains("created_at: -"));
}
