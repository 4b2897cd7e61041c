#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use skyportal_client::store::{reducer_fn, Action, RootState, Store};
use skyportal_client::{resources, ActionContext, ApiClient};

pub const LOG: &str = "test_log";

/// Serve `router` on an ephemeral local port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// A full store plus a slice that records every action type in order.
pub fn recording_store() -> Store {
    let store = resources::build_store();
    store.inject_reducer(
        LOG,
        reducer_fn(Vec::<String>::new, |log: &Arc<Vec<String>>, action: &Action| {
            let mut next = (**log).clone();
            next.push(action.kind.clone());
            Arc::new(next)
        }),
    );
    store
}

pub fn context(store: &Store, base_url: &str) -> ActionContext {
    ActionContext::new(store.clone(), ApiClient::new().with_base_url(base_url))
}

pub fn actions(store: &Store) -> Vec<String> {
    store
        .slice::<Vec<String>>(LOG)
        .map(|log| (*log).clone())
        .unwrap_or_default()
}

/// Wait until `done` holds for a published state, or panic after a few seconds.
pub async fn wait_for(store: &Store, done: impl Fn(&RootState) -> bool) {
    let mut rx = store.subscribe();
    let result = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = Arc::clone(&rx.borrow_and_update());
            if done(&*snapshot) {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    })
    .await;
    assert!(result.is_ok(), "timed out waiting for state");
}
