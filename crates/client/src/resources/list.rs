//! Slices that hold a single fetched collection.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::store::{Action, Reducer};

#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub items: Vec<T>,
    /// False until the first successful fetch.
    pub loaded: bool,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
        }
    }
}

/// Replaces the list wholesale when `ok_type` arrives with an array payload.
pub struct ListReducer<T> {
    ok_type: &'static str,
    _item: PhantomData<fn() -> T>,
}

impl<T> ListReducer<T> {
    pub const fn new(ok_type: &'static str) -> Self {
        Self {
            ok_type,
            _item: PhantomData,
        }
    }
}

impl<T> Reducer for ListReducer<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    type State = ListState<T>;

    fn initial_state(&self) -> ListState<T> {
        ListState::default()
    }

    fn reduce(&self, state: &Arc<ListState<T>>, action: &Action) -> Arc<ListState<T>> {
        if !action.is(self.ok_type) {
            return Arc::clone(state);
        }
        match action.payload::<Vec<T>>() {
            Some(items) => Arc::new(ListState {
                items,
                loaded: true,
            }),
            None => Arc::clone(state),
        }
    }
}
