//! Initial load after sign-in.

use std::future::Future;

use tokio::task::JoinHandle;

use crate::api::ApiResponse;
use crate::context::ActionContext;
use crate::resources::candidates::{self, CandidateQuery};
use crate::resources::{catalog, dashboard, groups, profile, sources};

/// Kick off every startup fetch on its own task and return without waiting.
///
/// The fetches are independent and report through the store like any
/// other request, so one failing doesn't hold up the others. Await the
/// handles only if you need to know when they're all done.
pub fn hydrate(ctx: &ActionContext) -> Vec<JoinHandle<ApiResponse>> {
    let handles = vec![
        spawn(ctx, |ctx| async move { dashboard::fetch_sysinfo(&ctx).await }),
        spawn(ctx, |ctx| async move { profile::fetch_user_profile(&ctx).await }),
        spawn(ctx, |ctx| async move { groups::fetch_groups(&ctx).await }),
        spawn(ctx, |ctx| async move { dashboard::fetch_news_feed(&ctx).await }),
        spawn(ctx, |ctx| async move { dashboard::fetch_recent_sources(&ctx).await }),
        spawn(ctx, |ctx| async move { catalog::fetch_taxonomies(&ctx).await }),
        spawn(ctx, |ctx| async move { catalog::fetch_telescopes(&ctx).await }),
        spawn(ctx, |ctx| async move { catalog::fetch_instruments(&ctx).await }),
        spawn(ctx, |ctx| async move { catalog::fetch_allocations(&ctx).await }),
        spawn(ctx, |ctx| async move { catalog::fetch_streams(&ctx).await }),
        spawn(ctx, |ctx| async move { sources::fetch_sources(&ctx, 1).await }),
        spawn(ctx, |ctx| async move {
            candidates::fetch_candidates(&ctx, CandidateQuery::default()).await
        }),
    ];
    tracing::debug!(count = handles.len(), "hydration started");
    handles
}

fn spawn<F, Fut>(ctx: &ActionContext, f: F) -> JoinHandle<ApiResponse>
where
    F: FnOnce(ActionContext) -> Fut,
    Fut: Future<Output = ApiResponse> + Send + 'static,
{
    tokio::spawn(f(ctx.clone()))
}
