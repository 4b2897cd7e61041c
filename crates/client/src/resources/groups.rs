//! The groups the current user belongs to, can see, and that exist at all.

use std::sync::Arc;

use skyportal_shared::{Group, GroupsPayload, NewGroup, ServerMessage};

use crate::api::{self, ApiResponse};
use crate::context::ActionContext;
use crate::store::{Action, Reducer, RootState};
use crate::ws::Effect;

pub const SLICE: &str = "groups";

pub const FETCH_GROUPS: &str = "skyportal/FETCH_GROUPS";
pub const FETCH_GROUPS_OK: &str = "skyportal/FETCH_GROUPS_OK";

pub const ADD_GROUP: &str = "skyportal/ADD_GROUP";
pub const ADD_GROUP_OK: &str = "skyportal/ADD_GROUP_OK";

pub const UPDATE_GROUP: &str = "skyportal/UPDATE_GROUP";
pub const DELETE_GROUP: &str = "skyportal/DELETE_GROUP";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupsState {
    pub user: Vec<Group>,
    pub user_accessible: Vec<Group>,
    /// `None` until fetched; the server may also answer `null`.
    pub all: Option<Vec<Group>>,
}

impl GroupsState {
    pub fn find(&self, id: i64) -> Option<&Group> {
        self.user
            .iter()
            .chain(self.user_accessible.iter())
            .chain(self.all.iter().flatten())
            .find(|g| g.id == id)
    }
}

pub struct GroupsReducer;

impl Reducer for GroupsReducer {
    type State = GroupsState;

    fn initial_state(&self) -> GroupsState {
        GroupsState::default()
    }

    fn reduce(&self, state: &Arc<GroupsState>, action: &Action) -> Arc<GroupsState> {
        match action.kind.as_str() {
            FETCH_GROUPS_OK => match action.payload::<GroupsPayload>() {
                Some(payload) => Arc::new(GroupsState {
                    user: payload.user_groups,
                    user_accessible: payload.user_accessible_groups,
                    all: payload.all_groups,
                }),
                None => Arc::clone(state),
            },
            // Appends to `all` only; membership lists follow on the
            // FETCH_GROUPS push the server sends after a create.
            ADD_GROUP_OK => {
                let Some(group) = action.merged_payload::<Group>() else {
                    return Arc::clone(state);
                };
                match &state.all {
                    Some(all) if !all.iter().any(|g| g.id == group.id) => {
                        let mut all = all.clone();
                        all.push(group);
                        Arc::new(GroupsState {
                            all: Some(all),
                            ..(**state).clone()
                        })
                    }
                    _ => Arc::clone(state),
                }
            }
            _ => Arc::clone(state),
        }
    }
}

pub async fn fetch_groups(ctx: &ActionContext) -> ApiResponse {
    api::get(ctx, "/api/groups", FETCH_GROUPS).await
}

pub async fn add_group(ctx: &ActionContext, group: &NewGroup) -> ApiResponse {
    let body = match api::encode_body(group) {
        Ok(body) => body,
        Err(err) => return err,
    };
    api::post(ctx, "/api/groups", ADD_GROUP, body).await
}

pub async fn update_group(ctx: &ActionContext, group_id: i64, group: &NewGroup) -> ApiResponse {
    let body = match api::encode_body(group) {
        Ok(body) => body,
        Err(err) => return err,
    };
    api::put(ctx, &format!("/api/groups/{group_id}"), UPDATE_GROUP, body).await
}

pub async fn delete_group(ctx: &ActionContext, group_id: i64) -> ApiResponse {
    api::delete(ctx, &format!("/api/groups/{group_id}"), DELETE_GROUP).await
}

/// The server pushes `FETCH_GROUPS` whenever group membership changes.
pub fn on_message(msg: &ServerMessage, _state: &RootState) -> anyhow::Result<Vec<Effect>> {
    if msg.action_type == FETCH_GROUPS {
        Ok(vec![Effect::FetchGroups])
    } else {
        Ok(Vec::new())
    }
}
