mod common;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use skyportal_client::resources::candidates::{self, CandidateQuery};
use skyportal_client::resources::{
    catalog, dashboard, filter, groups, hydrate, profile, sources, spectra,
};
use skyportal_client::store::{fail_type, ok_type};
use skyportal_shared::{NewFilter, NewSpectrum};

use common::{actions, context, recording_store, serve};

fn ok(data: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({"status": "success", "data": data})))
}

fn boom() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"status": "error", "message": "boom"})),
    )
}

fn startup_portal() -> Router {
    Router::new()
        .route("/api/sysinfo", get(|| async { boom() }))
        .route(
            "/api/internal/profile",
            get(|| async { ok(json!({"username": "ada", "preferences": {}})) }),
        )
        .route(
            "/api/groups",
            get(|| async {
                ok(json!({"user_groups": [], "user_accessible_groups": [], "all_groups": null}))
            }),
        )
        .route("/api/newsfeed", get(|| async { ok(json!([])) }))
        .route("/api/internal/recent_sources", get(|| async { ok(json!([])) }))
        .route("/api/taxonomy", get(|| async { ok(json!([])) }))
        .route("/api/telescope", get(|| async { ok(json!([])) }))
        .route("/api/instrument", get(|| async { ok(json!([])) }))
        .route("/api/allocation", get(|| async { ok(json!([])) }))
        .route("/api/streams", get(|| async { ok(json!([])) }))
        .route(
            "/api/sources",
            get(|| async {
                ok(json!({"sources": [], "totalMatches": 0, "pageNumber": 1, "numPerPage": 100}))
            }),
        )
        .route(
            "/api/candidates",
            get(|| async {
                ok(json!({"candidates": [], "totalMatches": 0, "pageNumber": 1, "numPerPage": 25}))
            }),
        )
}

#[tokio::test]
async fn hydrate_lands_every_startup_fetch_despite_one_failure() {
    let addr = serve(startup_portal()).await;
    let store = recording_store();
    let ctx = context(&store, &format!("http://{addr}"));

    let handles = hydrate::hydrate(&ctx);
    assert_eq!(handles.len(), 12);
    let mut failures = 0;
    for handle in handles {
        if !handle.await.unwrap().is_success() {
            failures += 1;
        }
    }
    assert_eq!(failures, 1);

    let log = actions(&store);
    let succeeded = [
        profile::FETCH_USER_PROFILE,
        groups::FETCH_GROUPS,
        dashboard::FETCH_NEWSFEED,
        dashboard::FETCH_RECENT_SOURCES,
        catalog::FETCH_TAXONOMIES,
        catalog::FETCH_TELESCOPES,
        catalog::FETCH_INSTRUMENTS,
        catalog::FETCH_ALLOCATIONS,
        catalog::FETCH_STREAMS,
        sources::FETCH_SOURCES,
        candidates::FETCH_CANDIDATES,
    ];
    for kind in succeeded {
        assert!(log.contains(&ok_type(kind)), "{kind} never landed: {log:?}");
        assert!(!log.contains(&fail_type(kind)), "{kind} failed: {log:?}");
    }
    assert!(log.contains(&fail_type(dashboard::FETCH_SYSINFO)));
    assert!(!log.contains(&ok_type(dashboard::FETCH_SYSINFO)));

    let terminal = log
        .iter()
        .filter(|k| k.ends_with("_OK") || k.ends_with("_FAIL"))
        .count();
    assert_eq!(terminal, 12);
}

/// Write endpoints answer with `writes`; every follow-up GET is counted.
#[derive(Default)]
struct Shared {
    fail_writes: AtomicBool,
    spectra_fetches: AtomicUsize,
    group_fetches: AtomicUsize,
    profile_fetches: AtomicUsize,
}

impl Shared {
    fn write_result(&self) -> (StatusCode, Json<Value>) {
        if self.fail_writes.load(Ordering::SeqCst) {
            boom()
        } else {
            ok(json!({"id": 1}))
        }
    }
}

fn writable_portal(shared: Arc<Shared>) -> Router {
    Router::new()
        .route(
            "/api/spectrum",
            post(|State(s): State<Arc<Shared>>| async move { s.write_result() }),
        )
        .route(
            "/api/sources/{id}/spectra",
            get(|State(s): State<Arc<Shared>>| async move {
                s.spectra_fetches.fetch_add(1, Ordering::SeqCst);
                ok(json!({"obj_id": "ZTF20abc", "spectra": []}))
            }),
        )
        .route(
            "/api/filters",
            post(|State(s): State<Arc<Shared>>| async move { s.write_result() }),
        )
        .route(
            "/api/filters/{id}",
            delete(|State(s): State<Arc<Shared>>| async move { s.write_result() }),
        )
        .route(
            "/api/groups/{id}",
            get(|State(s): State<Arc<Shared>>| async move {
                s.group_fetches.fetch_add(1, Ordering::SeqCst);
                ok(json!({"id": 3, "name": "Program A"}))
            }),
        )
        .route(
            "/api/internal/profile",
            get(|State(s): State<Arc<Shared>>| async move {
                s.profile_fetches.fetch_add(1, Ordering::SeqCst);
                ok(json!({"username": "ada", "preferences": {}}))
            })
            .patch(|State(s): State<Arc<Shared>>| async move { s.write_result() }),
        )
        .with_state(shared)
}

fn new_spectrum() -> NewSpectrum {
    serde_json::from_value(json!({
        "obj_id": "ZTF20abc",
        "instrument_id": 1,
        "observed_at": "2020-01-01T00:00:00",
        "wavelengths": [4000.0, 5000.0],
        "fluxes": [1.0, 2.0]
    }))
    .unwrap()
}

fn new_filter() -> NewFilter {
    NewFilter {
        name: "bright".into(),
        group_id: 3,
        stream_id: 2,
    }
}

async fn run_writes(ctx: &skyportal_client::ActionContext) -> Vec<bool> {
    vec![
        spectra::add_spectrum(ctx, &new_spectrum()).await.is_success(),
        filter::add_group_filter(ctx, &new_filter()).await.is_success(),
        filter::delete_group_filter(ctx, 9, 3).await.is_success(),
        profile::update_user_preferences(ctx, json!({"theme": "dark"}))
            .await
            .is_success(),
    ]
}

#[tokio::test]
async fn failed_writes_skip_the_follow_up_fetch() {
    let shared = Arc::new(Shared::default());
    shared.fail_writes.store(true, Ordering::SeqCst);
    let addr = serve(writable_portal(Arc::clone(&shared))).await;
    let store = recording_store();
    let ctx = context(&store, &format!("http://{addr}"));

    assert_eq!(run_writes(&ctx).await, vec![false; 4]);

    assert_eq!(shared.spectra_fetches.load(Ordering::SeqCst), 0);
    assert_eq!(shared.group_fetches.load(Ordering::SeqCst), 0);
    assert_eq!(shared.profile_fetches.load(Ordering::SeqCst), 0);

    let log = actions(&store);
    for kind in [
        spectra::ADD_SPECTRUM,
        filter::ADD_GROUP_FILTER,
        filter::DELETE_GROUP_FILTER,
        profile::UPDATE_USER_PREFERENCES,
    ] {
        assert!(log.contains(&fail_type(kind)), "{kind} did not fail: {log:?}");
    }
    assert!(!log.iter().any(|k| k.starts_with(spectra::FETCH_SOURCE_SPECTRA)));
}

#[tokio::test]
async fn successful_writes_refetch_what_they_touched() {
    let shared = Arc::new(Shared::default());
    let addr = serve(writable_portal(Arc::clone(&shared))).await;
    let store = recording_store();
    let ctx = context(&store, &format!("http://{addr}"));

    assert_eq!(run_writes(&ctx).await, vec![true; 4]);

    assert_eq!(shared.spectra_fetches.load(Ordering::SeqCst), 1);
    assert_eq!(shared.group_fetches.load(Ordering::SeqCst), 2);
    assert_eq!(shared.profile_fetches.load(Ordering::SeqCst), 1);
}
