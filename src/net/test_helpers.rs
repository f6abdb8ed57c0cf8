//! Scripted transport and fixtures shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use super::dispatcher::Dispatcher;
use super::transport::{ApiRequest, ApiResponse, Transport, TransportError};
use crate::state::auth::{Navigator, Route};
use crate::state::token_store::{MemoryStorage, TokenStore};

// =========================================================================
// MockTransport
// =========================================================================

/// Replays queued outcomes in order and records every request it sees.
#[derive(Default)]
pub(crate) struct MockTransport {
    outcomes: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn respond(&self, status: u16, body: Value) -> &Self {
        self.outcomes.lock().unwrap().push_back(Ok(ApiResponse { status, body }));
        self
    }

    pub(crate) fn fail(&self, message: &str) -> &Self {
        self.outcomes.lock().unwrap().push_back(Err(TransportError(message.to_owned())));
        self
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| format!("{} {}", r.method, r.path)).collect()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted response".to_owned())))
    }
}

// =========================================================================
// RecordingNavigator
// =========================================================================

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

// =========================================================================
// Fixtures
// =========================================================================

pub(crate) fn dispatcher_with(transport: &Arc<MockTransport>) -> Dispatcher {
    Dispatcher::new(transport.clone(), TokenStore::new(Arc::new(MemoryStorage::new()), "accessToken"))
}

pub(crate) fn dispatcher_with_storage(transport: &Arc<MockTransport>, storage: Arc<MemoryStorage>) -> Dispatcher {
    Dispatcher::new(transport.clone(), TokenStore::new(storage, "accessToken"))
}

pub(crate) fn user_json(id: i64, email: &str, is_superuser: bool) -> Value {
    json!({
        "id": id,
        "email": email,
        "full_name": format!("User {id}"),
        "is_active": true,
        "is_superuser": is_superuser,
        "created_at": "2024-01-01T00:00:00"
    })
}
