//! The signed-in user's profile and preferences.

use std::sync::Arc;

use serde_json::{json, Value};
use skyportal_shared::{ServerMessage, UserProfile};

use crate::api::{self, ApiResponse};
use crate::context::ActionContext;
use crate::store::{Action, Reducer, RootState};
use crate::ws::Effect;

pub const SLICE: &str = "profile";

pub const FETCH_USER_PROFILE: &str = "skyportal/FETCH_USER_PROFILE";
pub const FETCH_USER_PROFILE_OK: &str = "skyportal/FETCH_USER_PROFILE_OK";
pub const UPDATE_USER_PREFERENCES: &str = "skyportal/UPDATE_USER_PREFERENCES";

const PROFILE_PATH: &str = "/api/internal/profile";

pub struct ProfileReducer;

impl Reducer for ProfileReducer {
    type State = Option<UserProfile>;

    fn initial_state(&self) -> Option<UserProfile> {
        None
    }

    fn reduce(&self, state: &Arc<Option<UserProfile>>, action: &Action) -> Arc<Option<UserProfile>> {
        if !action.is(FETCH_USER_PROFILE_OK) {
            return Arc::clone(state);
        }
        match action.payload::<UserProfile>() {
            Some(profile) => Arc::new(Some(profile)),
            None => Arc::clone(state),
        }
    }
}

pub async fn fetch_user_profile(ctx: &ActionContext) -> ApiResponse {
    api::get(ctx, PROFILE_PATH, FETCH_USER_PROFILE).await
}

/// Merge `preferences` into the stored ones server-side, then reload.
pub async fn update_user_preferences(ctx: &ActionContext, preferences: Value) -> ApiResponse {
    let body = json!({ "preferences": preferences });
    let response = api::patch(ctx, PROFILE_PATH, UPDATE_USER_PREFERENCES, body).await;
    if response.is_success() {
        fetch_user_profile(ctx).await;
    }
    response
}

pub fn on_message(msg: &ServerMessage, _state: &RootState) -> anyhow::Result<Vec<Effect>> {
    if msg.action_type == FETCH_USER_PROFILE {
        Ok(vec![Effect::FetchUserProfile])
    } else {
        Ok(Vec::new())
    }
}
