//! The process-wide state container.
//!
//! One [`Store`] holds every resource slice. Slices are registered up
//! front through [`StoreBuilder`] (the composition root) or later through
//! [`Store::inject_reducer`], and only ever change through
//! [`Store::dispatch`].
//!
//! ```rust,ignore
//! let store = Store::builder()
//!     .with_reducer(groups::SLICE, groups::GroupsReducer)
//!     .build();
//!
//! store.dispatch(Action::with_data(groups::FETCH_GROUPS_OK, data));
//! let groups = store.slice::<GroupsState>(groups::SLICE);
//! ```

pub mod action;
pub mod reducer;
pub mod state;

use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

pub use action::{fail_type, ok_type, Action};
pub use reducer::{reducer_fn, FnReducer, Reducer, SliceState};
pub use state::RootState;

use reducer::{Erased, ErasedReducer};

struct Registration {
    key: String,
    reducer: Box<dyn ErasedReducer>,
}

struct StoreInner {
    /// Registration order is dispatch order.
    registry: Mutex<Vec<Registration>>,
    state: watch::Sender<Arc<RootState>>,
}

/// Cheaply cloneable handle to the shared store.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Arc::new(RootState::default()));
        Self {
            inner: Arc::new(StoreInner {
                registry: Mutex::new(Vec::new()),
                state,
            }),
        }
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    /// Register `reducer` under `key`.
    ///
    /// Registering a key twice never fails: the newer reducer takes over the
    /// same dispatch position. The slice keeps its current state when the
    /// new reducer produces the same state type, and is reset otherwise.
    pub fn inject_reducer<R: Reducer>(&self, key: impl Into<String>, reducer: R) {
        let key = key.into();
        let erased: Box<dyn ErasedReducer> = Box::new(Erased(reducer));
        let mut registry = lock(&self.inner.registry);
        let current = self.state();

        let reset = match registry.iter_mut().find(|r| r.key == key) {
            Some(existing) => {
                let keep = current
                    .raw(&key)
                    .map(|s| erased.accepts(s))
                    .unwrap_or(false);
                tracing::warn!(slice = %key, keep_state = keep, "reducer registered twice; replacing");
                let initial = (!keep).then(|| erased.initial());
                existing.reducer = erased;
                initial
            }
            None => {
                tracing::debug!(slice = %key, "registering reducer");
                let initial = erased.initial();
                registry.push(Registration {
                    key: key.clone(),
                    reducer: erased,
                });
                Some(initial)
            }
        };

        if let Some(initial) = reset {
            let mut next = (*current).clone();
            next.insert(key, initial);
            self.inner.state.send_replace(Arc::new(next));
        }
    }

    /// Run `action` through every reducer, in registration order, and
    /// publish the resulting snapshot.
    ///
    /// Readers see either the snapshot before this call or the one after
    /// it, never a mix. Nothing is published when no slice changed.
    pub fn dispatch(&self, action: Action) {
        let registry = lock(&self.inner.registry);
        let current = self.state();
        let mut next: Option<RootState> = None;

        for reg in registry.iter() {
            let Some(prev) = current.raw(&reg.key) else {
                continue;
            };
            let updated = reg.reducer.reduce_erased(prev, &action);
            if !Arc::ptr_eq(prev, &updated) {
                next.get_or_insert_with(|| (*current).clone())
                    .insert(reg.key.clone(), updated);
            }
        }

        match next {
            Some(next) => {
                tracing::debug!(action = %action.kind, "state updated");
                self.inner.state.send_replace(Arc::new(next));
            }
            None => tracing::trace!(action = %action.kind, "no slice changed"),
        }
    }

    /// The current snapshot.
    pub fn state(&self) -> Arc<RootState> {
        Arc::clone(&self.inner.state.borrow())
    }

    pub fn slice<S: Any + Send + Sync>(&self, key: &str) -> Option<Arc<S>> {
        self.state().get(key)
    }

    /// Receive every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<Arc<RootState>> {
        self.inner.state.subscribe()
    }

    /// Registered slice keys in dispatch order.
    pub fn slice_keys(&self) -> Vec<String> {
        lock(&self.inner.registry)
            .iter()
            .map(|r| r.key.clone())
            .collect()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects every slice before the store is handed out.
#[derive(Default)]
pub struct StoreBuilder {
    store: Store,
}

impl StoreBuilder {
    pub fn with_reducer<R: Reducer>(self, key: impl Into<String>, reducer: R) -> Self {
        self.store.inject_reducer(key, reducer);
        self
    }

    pub fn build(self) -> Store {
        self.store
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn counter() -> impl Reducer<State = u32> {
        reducer_fn(
            || 0u32,
            |state: &Arc<u32>, action: &Action| {
                if action.is("test/INCREMENT") {
                    Arc::new(**state + 1)
                } else {
                    Arc::clone(state)
                }
            },
        )
    }

    fn log_reducer() -> impl Reducer<State = Vec<String>> {
        reducer_fn(Vec::new, |state: &Arc<Vec<String>>, action: &Action| {
            if action.is("test/LOG") {
                let mut next = (**state).clone();
                next.push(action.data.as_str().unwrap_or_default().to_string());
                Arc::new(next)
            } else {
                Arc::clone(state)
            }
        })
    }

    #[test]
    fn registration_installs_initial_state() {
        let store = Store::builder().with_reducer("counter", counter()).build();
        assert_eq!(*store.slice::<u32>("counter").unwrap(), 0);
        assert_eq!(store.slice_keys(), vec!["counter".to_string()]);
    }

    #[test]
    fn unknown_action_publishes_nothing() {
        let store = Store::builder()
            .with_reducer("counter", counter())
            .with_reducer("log", log_reducer())
            .build();
        let before = store.state();
        store.dispatch(Action::new("__UNKNOWN__"));
        let after = store.state();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn untouched_slices_keep_their_reference() {
        let store = Store::builder()
            .with_reducer("counter", counter())
            .with_reducer("log", log_reducer())
            .build();
        let log_before = store.state().raw("log").cloned().unwrap();
        store.dispatch(Action::new("test/INCREMENT"));
        let state = store.state();
        assert_eq!(*state.get::<u32>("counter").unwrap(), 1);
        assert!(Arc::ptr_eq(&log_before, state.raw("log").unwrap()));
    }

    #[test]
    fn reregistering_same_reducer_keeps_state() {
        let store = Store::new();
        store.inject_reducer("counter", counter());
        store.dispatch(Action::new("test/INCREMENT"));
        store.inject_reducer("counter", counter());
        assert_eq!(store.slice_keys().len(), 1);
        assert_eq!(*store.slice::<u32>("counter").unwrap(), 1);
        store.dispatch(Action::new("test/INCREMENT"));
        assert_eq!(*store.slice::<u32>("counter").unwrap(), 2);
    }

    #[test]
    fn reregistering_with_new_state_type_resets_slice() {
        let store = Store::new();
        store.inject_reducer("slot", counter());
        store.dispatch(Action::new("test/INCREMENT"));
        store.inject_reducer("slot", log_reducer());
        assert!(store.slice::<u32>("slot").is_none());
        assert!(store.slice::<Vec<String>>("slot").unwrap().is_empty());
    }

    #[test]
    fn reducers_run_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let store = Store::new();
        for name in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            store.inject_reducer(
                name,
                reducer_fn(
                    || (),
                    move |state: &Arc<()>, _: &Action| {
                        seen.lock().unwrap().push(name);
                        Arc::clone(state)
                    },
                ),
            );
        }
        store.dispatch(Action::new("test/ANY"));
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn late_registration_extends_existing_state() {
        let store = Store::builder().with_reducer("counter", counter()).build();
        store.dispatch(Action::new("test/INCREMENT"));
        store.inject_reducer("log", log_reducer());
        store.dispatch(Action::with_data("test/LOG", json!("hello")));
        let state = store.state();
        assert_eq!(*state.get::<u32>("counter").unwrap(), 1);
        assert_eq!(*state.get::<Vec<String>>("log").unwrap(), vec!["hello"]);
    }

    #[tokio::test]
    async fn subscribers_see_one_snapshot_per_dispatch() {
        let store = Store::builder()
            .with_reducer("counter", counter())
            .with_reducer("log", log_reducer())
            .build();
        let mut rx = store.subscribe();
        store.dispatch(Action::new("test/INCREMENT"));
        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(*snapshot.get::<u32>("counter").unwrap(), 1);
        assert!(!rx.has_changed().unwrap());
    }
}
