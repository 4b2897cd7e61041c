//! What an async action creator gets to work with.

use std::sync::Arc;
use std::time::Duration;

use crate::api_client::ApiClient;
use crate::store::{Action, RootState, Store};

const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(3000);

/// Dispatch, state access, and the REST transport, bundled so creators can
/// be plain `async fn(&ActionContext, ...)`.
#[derive(Clone)]
pub struct ActionContext {
    store: Store,
    api: ApiClient,
    notification_ttl: Duration,
}

impl ActionContext {
    pub fn new(store: Store, api: ApiClient) -> Self {
        Self {
            store,
            api,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
        }
    }

    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    pub fn dispatch(&self, action: Action) {
        self.store.dispatch(action);
    }

    pub fn state(&self) -> Arc<RootState> {
        self.store.state()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn notification_ttl(&self) -> Duration {
        self.notification_ttl
    }
}
