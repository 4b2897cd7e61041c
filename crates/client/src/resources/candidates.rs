//! The candidate scanning list and the single candidate being inspected.
//!
//! The list remembers the query that produced it. When the server pushes
//! `FETCH_CANDIDATES` (new alerts passed a filter) the same query runs
//! again, so the user stays on the page and filters they were looking at.

use std::sync::Arc;

use skyportal_shared::{Candidate, CandidatesPage, ServerMessage};

use crate::api::{self, ApiResponse};
use crate::context::ActionContext;
use crate::store::{Action, Reducer, RootState};
use crate::ws::Effect;

pub const SLICE: &str = "candidates";
pub const CANDIDATE_SLICE: &str = "candidate";

pub const SET_CANDIDATES_QUERY: &str = "skyportal/SET_CANDIDATES_QUERY";
pub const FETCH_CANDIDATES: &str = "skyportal/FETCH_CANDIDATES";
pub const FETCH_CANDIDATES_OK: &str = "skyportal/FETCH_CANDIDATES_OK";
pub const FETCH_CANDIDATES_FAIL: &str = "skyportal/FETCH_CANDIDATES_FAIL";

pub const FETCH_CANDIDATE: &str = "skyportal/FETCH_CANDIDATE";
pub const FETCH_CANDIDATE_OK: &str = "skyportal/FETCH_CANDIDATE_OK";

/// Pushed with `{"id": "..."}` when one candidate changes.
pub const REFRESH_CANDIDATE: &str = "skyportal/REFRESH_CANDIDATE";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CandidateQuery {
    pub page_number: u32,
    pub num_per_page: u32,
    #[serde(default)]
    pub group_ids: Vec<i64>,
    #[serde(default)]
    pub unsaved_only: bool,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl Default for CandidateQuery {
    fn default() -> Self {
        Self {
            page_number: 1,
            num_per_page: 25,
            group_ids: Vec::new(),
            unsaved_only: false,
            start_date: None,
            end_date: None,
        }
    }
}

impl CandidateQuery {
    pub fn page(mut self, page_number: u32) -> Self {
        self.page_number = page_number.max(1);
        self
    }

    pub fn to_query_string(&self) -> String {
        let mut params = vec![
            format!("pageNumber={}", self.page_number),
            format!("numPerPage={}", self.num_per_page),
        ];
        if !self.group_ids.is_empty() {
            let ids: Vec<String> = self.group_ids.iter().map(i64::to_string).collect();
            params.push(format!("groupIDs={}", urlencoding::encode(&ids.join(","))));
        }
        if self.unsaved_only {
            params.push("unsavedOnly=true".to_string());
        }
        if let Some(start) = &self.start_date {
            params.push(format!("startDate={}", urlencoding::encode(start)));
        }
        if let Some(end) = &self.end_date {
            params.push(format!("endDate={}", urlencoding::encode(end)));
        }
        params.join("&")
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CandidatesState {
    pub candidates: Vec<Candidate>,
    pub page_number: u32,
    pub last_page: bool,
    pub total_matches: u64,
    pub query: CandidateQuery,
    pub query_in_progress: bool,
}

pub struct CandidatesReducer;

impl Reducer for CandidatesReducer {
    type State = CandidatesState;

    fn initial_state(&self) -> CandidatesState {
        CandidatesState::default()
    }

    fn reduce(&self, state: &Arc<CandidatesState>, action: &Action) -> Arc<CandidatesState> {
        match action.kind.as_str() {
            SET_CANDIDATES_QUERY => match action.payload::<CandidateQuery>() {
                Some(query) if query != state.query => Arc::new(CandidatesState {
                    query,
                    ..(**state).clone()
                }),
                _ => Arc::clone(state),
            },
            FETCH_CANDIDATES => Arc::new(CandidatesState {
                query_in_progress: true,
                ..(**state).clone()
            }),
            FETCH_CANDIDATES_OK => {
                let Some(page) = action.payload::<CandidatesPage>() else {
                    return Arc::new(CandidatesState {
                        query_in_progress: false,
                        ..(**state).clone()
                    });
                };
                Arc::new(CandidatesState {
                    candidates: page.candidates,
                    page_number: page.page_number,
                    last_page: page.last_page,
                    total_matches: page.total_matches,
                    query: state.query.clone(),
                    query_in_progress: false,
                })
            }
            FETCH_CANDIDATES_FAIL => Arc::new(CandidatesState {
                query_in_progress: false,
                ..(**state).clone()
            }),
            _ => Arc::clone(state),
        }
    }
}

pub struct CandidateReducer;

impl Reducer for CandidateReducer {
    type State = Option<Candidate>;

    fn initial_state(&self) -> Option<Candidate> {
        None
    }

    fn reduce(&self, state: &Arc<Option<Candidate>>, action: &Action) -> Arc<Option<Candidate>> {
        if !action.is(FETCH_CANDIDATE_OK) {
            return Arc::clone(state);
        }
        match action.payload::<Candidate>() {
            Some(candidate) => Arc::new(Some(candidate)),
            None => Arc::clone(state),
        }
    }
}

/// Record `query` as the current one, then run it.
pub async fn fetch_candidates(ctx: &ActionContext, query: CandidateQuery) -> ApiResponse {
    let data = serde_json::to_value(&query).unwrap_or_default();
    ctx.dispatch(Action::with_data(SET_CANDIDATES_QUERY, data));
    let path = format!("/api/candidates?{}", query.to_query_string());
    api::get(ctx, &path, FETCH_CANDIDATES).await
}

pub async fn fetch_candidate(ctx: &ActionContext, id: &str) -> ApiResponse {
    let path = format!("/api/candidates/{}", urlencoding::encode(id));
    api::get(ctx, &path, FETCH_CANDIDATE).await
}

pub fn on_message(msg: &ServerMessage, state: &RootState) -> anyhow::Result<Vec<Effect>> {
    match msg.action_type.as_str() {
        FETCH_CANDIDATES => {
            let query = state
                .get::<CandidatesState>(SLICE)
                .map(|s| s.query.clone())
                .unwrap_or_default();
            Ok(vec![Effect::FetchCandidates(query)])
        }
        REFRESH_CANDIDATE => {
            let Some(loaded) = state.get::<Option<Candidate>>(CANDIDATE_SLICE) else {
                return Ok(Vec::new());
            };
            let Some(candidate) = &*loaded else {
                return Ok(Vec::new());
            };
            // Pushed ids are internal keys; accept the public id as well.
            let Some(pushed) = msg.payload_str("id") else {
                return Ok(Vec::new());
            };
            let matches = candidate.internal_key.as_deref() == Some(pushed.as_str())
                || candidate.id == pushed;
            if matches {
                Ok(vec![Effect::FetchCandidate(candidate.id.clone())])
            } else {
                Ok(Vec::new())
            }
        }
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use serde_json::json;

    fn store() -> Store {
        Store::builder()
            .with_reducer(SLICE, CandidatesReducer)
            .with_reducer(CANDIDATE_SLICE, CandidateReducer)
            .build()
    }

    #[test]
    fn query_string_encodes_filters() {
        let query = CandidateQuery {
            group_ids: vec![1, 4],
            unsaved_only: true,
            start_date: Some("2024-01-01T00:00:00".into()),
            ..CandidateQuery::default()
        }
        .page(2);
        assert_eq!(
            query.to_query_string(),
            "pageNumber=2&numPerPage=25&groupIDs=1%2C4&unsavedOnly=true&startDate=2024-01-01T00%3A00%3A00"
        );
    }

    #[test]
    fn pushed_fetch_reruns_the_remembered_query() {
        let store = store();
        let query = CandidateQuery::default().page(3);
        store.dispatch(Action::with_data(
            SET_CANDIDATES_QUERY,
            serde_json::to_value(&query).unwrap(),
        ));
        let msg = ServerMessage::new(FETCH_CANDIDATES, json!({}));
        assert_eq!(
            on_message(&msg, &store.state()).unwrap(),
            vec![Effect::FetchCandidates(query)]
        );
    }

    #[test]
    fn ok_keeps_query_and_replaces_page() {
        let store = store();
        let query = CandidateQuery::default().page(2);
        store.dispatch(Action::with_data(
            SET_CANDIDATES_QUERY,
            serde_json::to_value(&query).unwrap(),
        ));
        store.dispatch(Action::new(FETCH_CANDIDATES));
        store.dispatch(Action::with_data(
            FETCH_CANDIDATES_OK,
            json!({"candidates": [{"id": "ZTF20aaa"}], "pageNumber": 2, "totalMatches": 26}),
        ));
        let state = store.slice::<CandidatesState>(SLICE).unwrap();
        assert_eq!(state.query, query);
        assert_eq!(state.candidates[0].id, "ZTF20aaa");
        assert!(!state.query_in_progress);
    }

    #[test]
    fn refresh_candidate_is_gated_on_loaded_id() {
        let store = store();
        let msg = ServerMessage::new(REFRESH_CANDIDATE, json!({"id": "ZTF20aaa"}));
        assert!(on_message(&msg, &store.state()).unwrap().is_empty());

        store.dispatch(Action::with_data(FETCH_CANDIDATE_OK, json!({"id": "ZTF20aaa"})));
        assert_eq!(
            on_message(&msg, &store.state()).unwrap(),
            vec![Effect::FetchCandidate("ZTF20aaa".into())]
        );
        let other = ServerMessage::new(REFRESH_CANDIDATE, json!({"id": "ZTF20bbb"}));
        assert!(on_message(&other, &store.state()).unwrap().is_empty());
    }

    #[test]
    fn refresh_candidate_matches_the_internal_key() {
        let store = store();
        store.dispatch(Action::with_data(
            FETCH_CANDIDATE_OK,
            json!({"id": "ZTF20abc", "internal_key": "k-123"}),
        ));
        let msg = ServerMessage::new(REFRESH_CANDIDATE, json!({"id": "k-123"}));
        assert_eq!(
            on_message(&msg, &store.state()).unwrap(),
            vec![Effect::FetchCandidate("ZTF20abc".into())]
        );
        let other = ServerMessage::new(REFRESH_CANDIDATE, json!({"id": "k-999"}));
        assert!(on_message(&other, &store.state()).unwrap().is_empty());
    }
}
