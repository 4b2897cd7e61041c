//! Turns pushed server messages into follow-up work.
//!
//! Subscribers are pure: they look at the message and the current state and
//! return the [`Effect`]s that should happen. Running those effects is the
//! handler's job, and it never does so on the caller's stack.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use skyportal_shared::ServerMessage;
use tokio::task::JoinHandle;

use crate::context::ActionContext;
use crate::resources::candidates::{self, CandidateQuery};
use crate::resources::notifications::{self, Level};
use crate::resources::{dashboard, group, groups, photometry, profile, source, spectra};
use crate::store::RootState;

/// A follow-up action requested by a subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchGroups,
    FetchGroup(i64),
    FetchSource(String),
    FetchSourceSpectra(String),
    FetchSourcePhotometry(String),
    FetchCandidate(String),
    FetchCandidates(CandidateQuery),
    FetchUserProfile,
    FetchNewsFeed,
    Notify { note: String, level: Level },
}

impl Effect {
    pub async fn run(self, ctx: ActionContext) {
        match self {
            Effect::FetchGroups => {
                groups::fetch_groups(&ctx).await;
            }
            Effect::FetchGroup(id) => {
                group::fetch_group(&ctx, id).await;
            }
            Effect::FetchSource(id) => {
                source::fetch_source(&ctx, &id).await;
            }
            Effect::FetchSourceSpectra(id) => {
                spectra::fetch_source_spectra(&ctx, &id).await;
            }
            Effect::FetchSourcePhotometry(id) => {
                photometry::fetch_source_photometry(&ctx, &id).await;
            }
            Effect::FetchCandidate(id) => {
                candidates::fetch_candidate(&ctx, &id).await;
            }
            Effect::FetchCandidates(query) => {
                candidates::fetch_candidates(&ctx, query).await;
            }
            Effect::FetchUserProfile => {
                profile::fetch_user_profile(&ctx).await;
            }
            Effect::FetchNewsFeed => {
                dashboard::fetch_news_feed(&ctx).await;
            }
            Effect::Notify { note, level } => {
                notifications::show_notification(&ctx, note, level);
            }
        }
    }
}

type SubscriberFn = dyn Fn(&ServerMessage, &RootState) -> anyhow::Result<Vec<Effect>> + Send + Sync;

#[derive(Clone)]
pub struct Subscriber {
    name: &'static str,
    f: Arc<SubscriberFn>,
}

impl Subscriber {
    pub fn new<F>(name: &'static str, f: F) -> Self
    where
        F: Fn(&ServerMessage, &RootState) -> anyhow::Result<Vec<Effect>> + Send + Sync + 'static,
    {
        Self { name, f: Arc::new(f) }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subscriber").field(&self.name).finish()
    }
}

#[derive(Clone, Debug)]
pub struct MessageHandler {
    subscribers: Arc<[Subscriber]>,
}

impl MessageHandler {
    pub fn new(subscribers: Vec<Subscriber>) -> Self {
        Self {
            subscribers: subscribers.into(),
        }
    }

    /// Ask every subscriber, in order, what `msg` calls for.
    ///
    /// A subscriber that errors or panics contributes nothing; the rest
    /// still run.
    pub fn effects_for(&self, msg: &ServerMessage, state: &RootState) -> Vec<Effect> {
        let mut effects = Vec::new();
        for subscriber in self.subscribers.iter() {
            match panic::catch_unwind(AssertUnwindSafe(|| (subscriber.f)(msg, state))) {
                Ok(Ok(mut found)) => effects.append(&mut found),
                Ok(Err(err)) => tracing::error!(
                    subscriber = subscriber.name,
                    action_type = %msg.action_type,
                    error = %err,
                    "subscriber failed"
                ),
                Err(_) => tracing::error!(
                    subscriber = subscriber.name,
                    action_type = %msg.action_type,
                    "subscriber panicked"
                ),
            }
        }
        effects
    }

    /// Evaluate `msg` against the current state and spawn each resulting
    /// effect as its own task.
    pub fn handle(&self, msg: &ServerMessage, ctx: &ActionContext) -> Vec<JoinHandle<()>> {
        let state = ctx.state();
        let effects = self.effects_for(msg, &state);
        tracing::debug!(
            action_type = %msg.action_type,
            effects = effects.len(),
            "handled server message"
        );
        effects
            .into_iter()
            .map(|effect| tokio::spawn(effect.run(ctx.clone())))
            .collect()
    }
}
