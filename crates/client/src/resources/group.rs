//! The group currently open in the group page, with its members and streams.

use std::sync::Arc;

use serde_json::json;
use skyportal_shared::{Group, ServerMessage};

use crate::api::{self, ApiResponse};
use crate::context::ActionContext;
use crate::store::{Action, Reducer, RootState};
use crate::ws::Effect;

pub const SLICE: &str = "group";

pub const FETCH_GROUP: &str = "skyportal/FETCH_GROUP";
pub const FETCH_GROUP_OK: &str = "skyportal/FETCH_GROUP_OK";

/// Pushed with `{"group_id": N}` after membership, stream, or filter changes.
pub const REFRESH_GROUP: &str = "skyportal/REFRESH_GROUP";

pub const ADD_GROUP_USER: &str = "skyportal/ADD_GROUP_USER";
pub const DELETE_GROUP_USER: &str = "skyportal/DELETE_GROUP_USER";
pub const ADD_GROUP_STREAM: &str = "skyportal/ADD_GROUP_STREAM";
pub const DELETE_GROUP_STREAM: &str = "skyportal/DELETE_GROUP_STREAM";

pub struct GroupReducer;

impl Reducer for GroupReducer {
    type State = Option<Group>;

    fn initial_state(&self) -> Option<Group> {
        None
    }

    fn reduce(&self, state: &Arc<Option<Group>>, action: &Action) -> Arc<Option<Group>> {
        if !action.is(FETCH_GROUP_OK) {
            return Arc::clone(state);
        }
        match action.payload::<Group>() {
            Some(group) => Arc::new(Some(group)),
            None => Arc::clone(state),
        }
    }
}

pub async fn fetch_group(ctx: &ActionContext, group_id: i64) -> ApiResponse {
    api::get(ctx, &format!("/api/groups/{group_id}"), FETCH_GROUP).await
}

pub async fn add_group_user(
    ctx: &ActionContext,
    group_id: i64,
    username: &str,
    admin: bool,
) -> ApiResponse {
    api::post(
        ctx,
        &format!("/api/groups/{group_id}/users"),
        ADD_GROUP_USER,
        json!({"username": username, "admin": admin}),
    )
    .await
}

pub async fn delete_group_user(ctx: &ActionContext, group_id: i64, username: &str) -> ApiResponse {
    let path = format!(
        "/api/groups/{group_id}/users/{}",
        urlencoding::encode(username)
    );
    api::delete(ctx, &path, DELETE_GROUP_USER).await
}

pub async fn add_group_stream(ctx: &ActionContext, group_id: i64, stream_id: i64) -> ApiResponse {
    api::post(
        ctx,
        &format!("/api/groups/{group_id}/streams"),
        ADD_GROUP_STREAM,
        json!({"stream_id": stream_id}),
    )
    .await
}

pub async fn delete_group_stream(
    ctx: &ActionContext,
    group_id: i64,
    stream_id: i64,
) -> ApiResponse {
    let path = format!("/api/groups/{group_id}/streams/{stream_id}");
    api::delete(ctx, &path, DELETE_GROUP_STREAM).await
}

/// Refetch only when the pushed group is the one on screen.
pub fn on_message(msg: &ServerMessage, state: &RootState) -> anyhow::Result<Vec<Effect>> {
    if msg.action_type != REFRESH_GROUP {
        return Ok(Vec::new());
    }
    let Some(loaded) = state.get::<Option<Group>>(SLICE) else {
        return Ok(Vec::new());
    };
    let Some(group) = &*loaded else {
        return Ok(Vec::new());
    };
    if msg.payload_str("group_id") == Some(group.id.to_string()) {
        Ok(vec![Effect::FetchGroup(group.id)])
    } else {
        Ok(Vec::new())
    }
}
