//! Terminal rendering for users, tokens and form errors.

use serde_json::Value;
use usergate::User;
use usergate::forms::FormErrors;
use usergate::util::token_claims::TokenClaims;

/// One fixed-width line per user, preceded by a header.
pub fn user_table(users: &[User]) -> String {
    let mut out = format!("{:>6}  {:<32}  {:<24}  {:<8}  {}\n", "ID", "EMAIL", "NAME", "ACTIVE", "ADMIN");
    for user in users {
        out.push_str(&user_row(user));
        out.push('\n');
    }
    out
}

pub fn user_row(user: &User) -> String {
    format!(
        "{:>6}  {:<32}  {:<24}  {:<8}  {}",
        user.id,
        truncate(&user.email, 32),
        truncate(user.full_name.as_deref().unwrap_or("-"), 24),
        yes_no(user.is_active),
        yes_no(user.is_superuser),
    )
}

pub fn user_detail(user: &User) -> String {
    format!(
        "id:         {}\nemail:      {}\nname:       {}\nactive:     {}\nadmin:      {}\ncreated_at: {}",
        user.id,
        user.email,
        user.full_name.as_deref().unwrap_or("-"),
        yes_no(user.is_active),
        yes_no(user.is_superuser),
        user.created_at.as_deref().unwrap_or("-"),
    )
}

pub fn claims(claims: &TokenClaims) -> String {
    format!(
        "subject:    {}\nexpires_at: {}",
        claims.subject.as_deref().unwrap_or("-"),
        claims.expires_at.map_or_else(|| "-".to_owned(), |exp| exp.to_string()),
    )
}

/// Banner first, then one `field: message` line per field.
pub fn form_errors(errors: &FormErrors) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(banner) = &errors.banner {
        lines.push(banner.clone());
    }
    for (field, message) in &errors.fields {
        lines.push(format!("  {field}: {message}"));
    }
    lines
}

pub fn json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
