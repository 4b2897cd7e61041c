//! The paged source list.

use std::sync::Arc;

use skyportal_shared::{Source, SourcesPage};

use crate::api::{self, ApiResponse};
use crate::context::ActionContext;
use crate::store::{Action, Reducer};

pub const SLICE: &str = "sources";

pub const FETCH_SOURCES: &str = "skyportal/FETCH_SOURCES";
pub const FETCH_SOURCES_OK: &str = "skyportal/FETCH_SOURCES_OK";
pub const FETCH_SOURCES_FAIL: &str = "skyportal/FETCH_SOURCES_FAIL";

pub const SOURCES_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct SourcesState {
    pub source_list: Vec<Source>,
    pub page_number: u32,
    pub last_page: bool,
    pub total_matches: u64,
    /// 1-based index of the first source on this page, for "showing 101-200".
    pub numbering_start: u64,
    pub numbering_end: u64,
    pub query_in_progress: bool,
}

impl Default for SourcesState {
    fn default() -> Self {
        Self {
            source_list: Vec::new(),
            page_number: 1,
            last_page: false,
            total_matches: 0,
            numbering_start: 0,
            numbering_end: 0,
            query_in_progress: false,
        }
    }
}

pub struct SourcesReducer;

impl Reducer for SourcesReducer {
    type State = SourcesState;

    fn initial_state(&self) -> SourcesState {
        SourcesState::default()
    }

    fn reduce(&self, state: &Arc<SourcesState>, action: &Action) -> Arc<SourcesState> {
        match action.kind.as_str() {
            FETCH_SOURCES => Arc::new(SourcesState {
                query_in_progress: true,
                ..(**state).clone()
            }),
            FETCH_SOURCES_OK => match action.payload::<SourcesPage>() {
                Some(page) => {
                    let per_page = u64::from(page.num_per_page.unwrap_or(SOURCES_PER_PAGE));
                    let offset = u64::from(page.page_number.saturating_sub(1)) * per_page;
                    let count = page.sources.len() as u64;
                    Arc::new(SourcesState {
                        numbering_start: if count == 0 { 0 } else { offset + 1 },
                        numbering_end: offset + count,
                        source_list: page.sources,
                        page_number: page.page_number,
                        last_page: page.last_page,
                        total_matches: page.total_matches,
                        query_in_progress: false,
                    })
                }
                None => Arc::new(SourcesState {
                    query_in_progress: false,
                    ..(**state).clone()
                }),
            },
            FETCH_SOURCES_FAIL => Arc::new(SourcesState {
                query_in_progress: false,
                ..(**state).clone()
            }),
            _ => Arc::clone(state),
        }
    }
}

pub async fn fetch_sources(ctx: &ActionContext, page: u32) -> ApiResponse {
    let path = format!(
        "/api/sources?pageNumber={}&numPerPage={SOURCES_PER_PAGE}",
        page.max(1)
    );
    api::get(ctx, &path, FETCH_SOURCES).await
}
