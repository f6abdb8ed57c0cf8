//! Client-side state that outlives a single request.
//!
//! SYSTEM CONTEXT
//! ==============
//! `token_store` holds the bearer credential, `auth` drives the session
//! state machine on top of it, and `users` keeps the admin dashboard's
//! last-fetched user records.

pub mod auth;
pub mod token_store;
pub mod users;
