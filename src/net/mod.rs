//! Networking modules for the account REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` is the raw HTTP seam, `dispatcher` adds bearer auth and error
//! normalization on top of it, `api` maps each endpoint to a typed call, and
//! `types` defines the shared wire schema.

pub mod api;
pub mod dispatcher;
pub mod error;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
