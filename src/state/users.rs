//! Admin dashboard user records.
//!
//! Plain state struct in the same shape as the other client state: the
//! last-fetched data plus `loading` and `error`. Every operation clears
//! `error` when it starts and records the normalized message on failure.

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;

use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::{User, UserUpdate};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserDirectory {
    pub users: Vec<User>,
    pub selected: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

impl UserDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish<T>(&mut self, result: Result<T, ApiError>, action: &str) -> Result<T, ApiError> {
        self.loading = false;
        if let Err(e) = &result {
            tracing::warn!(action, error = %e, "user directory operation failed");
            self.error = Some(e.to_string());
        }
        result
    }

    /// Replace the list with a fresh fetch.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`]; the previous list is kept.
    pub async fn fetch_users(
        &mut self,
        api: &ApiClient,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> Result<&[User], ApiError> {
        self.begin();
        let result = api.list_users(skip, limit).await;
        let users = self.finish(result, "list")?;
        self.users = users;
        Ok(&self.users)
    }

    /// Fetch one user into `selected`.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`].
    pub async fn fetch_user(&mut self, api: &ApiClient, user_id: i64) -> Result<User, ApiError> {
        self.begin();
        let result = api.get_user(user_id).await;
        let user = self.finish(result, "get")?;
        self.selected = Some(user.clone());
        Ok(user)
    }

    /// Update one user and reflect the server's copy locally.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`]; local records are unchanged.
    pub async fn update_user(&mut self, api: &ApiClient, user_id: i64, update: &UserUpdate) -> Result<User, ApiError> {
        self.begin();
        let result = api.update_user(user_id, update).await;
        let updated = self.finish(result, "update")?;
        self.apply_update(&updated);
        Ok(updated)
    }

    /// Delete one user and drop it from local records.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`]; local records are unchanged.
    pub async fn delete_user(&mut self, api: &ApiClient, user_id: i64) -> Result<(), ApiError> {
        self.begin();
        let result = api.delete_user(user_id).await;
        self.finish(result, "delete")?;
        self.apply_delete(user_id);
        Ok(())
    }

    fn apply_update(&mut self, updated: &User) {
        for user in &mut self.users {
            if user.id == updated.id {
                user.clone_from(updated);
            }
        }
        if self.selected.as_ref().is_some_and(|u| u.id == updated.id) {
            self.selected = Some(updated.clone());
        }
    }

    fn apply_delete(&mut self, user_id: i64) {
        self.users.retain(|u| u.id != user_id);
        if self.selected.as_ref().is_some_and(|u| u.id == user_id) {
            self.selected = None;
        }
    }

    #[must_use]
    pub fn find(&self, user_id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }
}
