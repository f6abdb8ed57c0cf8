//! Client-side user management against a REST account backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `net` owns the wire: transport seam, bearer-attaching dispatcher, typed
//! endpoints and the normalized error shape. `state` owns what the client
//! remembers between calls: the token store, the session state machine and
//! the admin user directory. `forms` validates input before anything is
//! sent and maps API failures back onto form fields.
//!
//! The host application (see the `cli` crate) supplies navigation and
//! decides where the token is persisted.

pub mod config;
pub mod forms;
pub mod net;
pub mod state;
pub mod util;

pub use config::{ClientConfig, ConfigError};
pub use net::api::ApiClient;
pub use net::dispatcher::Dispatcher;
pub use net::error::ApiError;
pub use net::transport::{ReqwestTransport, Transport};
pub use net::types::{Credentials, SignupRequest, User, UserUpdate};
pub use state::auth::{AuthPhase, Navigator, Route, SessionContext};
pub use state::token_store::{FileStorage, MemoryStorage, StorageError, TokenStorage, TokenStore};
pub use state::users::UserDirectory;
