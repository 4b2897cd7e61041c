//! The filter page: one filter at a time, attached to a group.

use std::sync::Arc;

use serde_json::json;
use skyportal_shared::{Filter, NewFilter};

use crate::api::{self, ApiResponse};
use crate::context::ActionContext;
use crate::resources::group::fetch_group;
use crate::store::{Action, Reducer};

pub const SLICE: &str = "filter";

pub const FETCH_FILTER: &str = "skyportal/FETCH_FILTER";
pub const FETCH_FILTER_OK: &str = "skyportal/FETCH_FILTER_OK";
pub const ADD_GROUP_FILTER: &str = "skyportal/ADD_GROUP_FILTER";
pub const DELETE_GROUP_FILTER: &str = "skyportal/DELETE_GROUP_FILTER";
pub const DELETE_GROUP_FILTER_OK: &str = "skyportal/DELETE_GROUP_FILTER_OK";

pub struct FilterReducer;

impl Reducer for FilterReducer {
    type State = Option<Filter>;

    fn initial_state(&self) -> Option<Filter> {
        None
    }

    fn reduce(&self, state: &Arc<Option<Filter>>, action: &Action) -> Arc<Option<Filter>> {
        match action.kind.as_str() {
            FETCH_FILTER_OK => match action.payload::<Filter>() {
                Some(filter) => Arc::new(Some(filter)),
                None => Arc::clone(state),
            },
            DELETE_GROUP_FILTER_OK => match &**state {
                Some(filter) if action.endpoint() == Some(filter_path(filter.id).as_str()) => {
                    Arc::new(None)
                }
                _ => Arc::clone(state),
            },
            _ => Arc::clone(state),
        }
    }
}

fn filter_path(filter_id: i64) -> String {
    format!("/api/filters/{filter_id}")
}

pub async fn fetch_filter(ctx: &ActionContext, filter_id: i64) -> ApiResponse {
    api::get(ctx, &filter_path(filter_id), FETCH_FILTER).await
}

/// Create a filter, then reload the group that owns it.
pub async fn add_group_filter(ctx: &ActionContext, filter: &NewFilter) -> ApiResponse {
    let body = json!({
        "name": filter.name,
        "group_id": filter.group_id,
        "stream_id": filter.stream_id,
    });
    let response = api::post(ctx, "/api/filters", ADD_GROUP_FILTER, body).await;
    if response.is_success() {
        fetch_group(ctx, filter.group_id).await;
    }
    response
}

pub async fn delete_group_filter(ctx: &ActionContext, filter_id: i64, group_id: i64) -> ApiResponse {
    let response = api::delete(ctx, &filter_path(filter_id), DELETE_GROUP_FILTER).await;
    if response.is_success() {
        fetch_group(ctx, group_id).await;
    }
    response
}
