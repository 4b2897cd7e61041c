//! The reducer trait and its type-erased form used by the store.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use super::action::Action;

/// State owned by one slice, as the store holds it.
pub type SliceState = Arc<dyn Any + Send + Sync>;

/// A pure state transition for one slice.
///
/// `reduce` must hand back `state` itself (same `Arc`) for any action it
/// does not handle, and must never mutate through it. Reducers have no
/// access to the store, so they cannot dispatch.
pub trait Reducer: Send + Sync + 'static {
    type State: Send + Sync + 'static;

    fn initial_state(&self) -> Self::State;

    fn reduce(&self, state: &Arc<Self::State>, action: &Action) -> Arc<Self::State>;
}

/// Adapter so a plain function can be registered as a reducer.
pub struct FnReducer<S, I, F> {
    initial: I,
    reduce: F,
    _state: PhantomData<fn() -> S>,
}

pub fn reducer_fn<S, I, F>(initial: I, reduce: F) -> FnReducer<S, I, F>
where
    I: Fn() -> S,
    F: Fn(&Arc<S>, &Action) -> Arc<S>,
{
    FnReducer {
        initial,
        reduce,
        _state: PhantomData,
    }
}

impl<S, I, F> Reducer for FnReducer<S, I, F>
where
    S: Send + Sync + 'static,
    I: Fn() -> S + Send + Sync + 'static,
    F: Fn(&Arc<S>, &Action) -> Arc<S> + Send + Sync + 'static,
{
    type State = S;

    fn initial_state(&self) -> S {
        (self.initial)()
    }

    fn reduce(&self, state: &Arc<S>, action: &Action) -> Arc<S> {
        (self.reduce)(state, action)
    }
}

pub(crate) trait ErasedReducer: Send + Sync {
    fn initial(&self) -> SliceState;
    fn reduce_erased(&self, state: &SliceState, action: &Action) -> SliceState;
    /// Whether `state` has the type this reducer produces.
    fn accepts(&self, state: &SliceState) -> bool;
}

pub(crate) struct Erased<R>(pub R);

impl<R: Reducer> ErasedReducer for Erased<R> {
    fn initial(&self) -> SliceState {
        Arc::new(self.0.initial_state())
    }

    fn reduce_erased(&self, state: &SliceState, action: &Action) -> SliceState {
        match Arc::clone(state).downcast::<R::State>() {
            Ok(typed) => {
                let next = self.0.reduce(&typed, action);
                if Arc::ptr_eq(&typed, &next) {
                    Arc::clone(state)
                } else {
                    next
                }
            }
            Err(_) => {
                tracing::error!(
                    expected = std::any::type_name::<R::State>(),
                    "slice state has the wrong type; leaving it untouched"
                );
                Arc::clone(state)
            }
        }
    }

    fn accepts(&self, state: &SliceState) -> bool {
        (**state).is::<R::State>()
    }
}
