//! User-facing notification banners.
//!
//! Failed requests land here, and the server can push a notification of its
//! own with `{"actionType": "baselayer/SHOW_NOTIFICATION", "payload": {"note", "type"}}`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::ActionContext;
use crate::store::{Action, Reducer, RootState};
use crate::ws::Effect;
use skyportal_shared::ServerMessage;

pub const SLICE: &str = "notifications";

pub const SHOW_NOTIFICATION: &str = "baselayer/SHOW_NOTIFICATION";
pub const HIDE_NOTIFICATION: &str = "baselayer/HIDE_NOTIFICATION";
pub const HIDE_NOTIFICATION_BY_TAG: &str = "baselayer/HIDE_NOTIFICATION_BY_TAG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub note: String,
    #[serde(rename = "type")]
    pub level: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn new(note: impl Into<String>, level: Level) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            note: note.into(),
            level,
            tag: None,
            created_at: Utc::now(),
        }
    }

    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotificationsState {
    pub notes: Vec<Note>,
}

pub struct NotificationsReducer;

impl Reducer for NotificationsReducer {
    type State = NotificationsState;

    fn initial_state(&self) -> NotificationsState {
        NotificationsState::default()
    }

    fn reduce(&self, state: &Arc<NotificationsState>, action: &Action) -> Arc<NotificationsState> {
        match action.kind.as_str() {
            SHOW_NOTIFICATION => match action.payload::<Note>() {
                Some(note) => {
                    let mut notes = state.notes.clone();
                    notes.push(note);
                    Arc::new(NotificationsState { notes })
                }
                None => Arc::clone(state),
            },
            HIDE_NOTIFICATION => {
                let Some(id) = action.data.as_str() else {
                    return Arc::clone(state);
                };
                retain(state, |n| n.id != id)
            }
            HIDE_NOTIFICATION_BY_TAG => {
                let Some(tag) = action.data.as_str() else {
                    return Arc::clone(state);
                };
                retain(state, |n| n.tag.as_deref() != Some(tag))
            }
            _ => Arc::clone(state),
        }
    }
}

fn retain(
    state: &Arc<NotificationsState>,
    keep: impl Fn(&Note) -> bool,
) -> Arc<NotificationsState> {
    if state.notes.iter().all(&keep) {
        return Arc::clone(state);
    }
    let notes = state.notes.iter().filter(|n| keep(n)).cloned().collect();
    Arc::new(NotificationsState { notes })
}

pub fn show(note: Note) -> Action {
    let data = serde_json::to_value(&note).unwrap_or_default();
    Action::with_data(SHOW_NOTIFICATION, data)
}

pub fn hide(id: &str) -> Action {
    Action::with_data(HIDE_NOTIFICATION, serde_json::Value::String(id.to_string()))
}

pub fn hide_by_tag(tag: &str) -> Action {
    Action::with_data(HIDE_NOTIFICATION_BY_TAG, serde_json::Value::String(tag.to_string()))
}

/// Show a note and schedule its removal after the context's TTL.
///
/// Returns the note id. Outside a tokio runtime the note stays up until
/// someone hides it.
pub fn show_notification(ctx: &ActionContext, note: impl Into<String>, level: Level) -> String {
    let note = Note::new(note, level);
    let id = note.id.clone();
    ctx.dispatch(show(note));

    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            let ctx = ctx.clone();
            let hide_id = id.clone();
            let ttl = ctx.notification_ttl();
            handle.spawn(async move {
                tokio::time::sleep(ttl).await;
                ctx.dispatch(hide(&hide_id));
            });
        }
        Err(_) => tracing::debug!(id = %id, "no runtime; notification will not auto-hide"),
    }
    id
}

#[derive(Deserialize)]
struct PushedNote {
    note: String,
    #[serde(default, rename = "type")]
    level: Level,
}

pub fn on_message(msg: &ServerMessage, _state: &RootState) -> anyhow::Result<Vec<Effect>> {
    if msg.action_type != SHOW_NOTIFICATION {
        return Ok(Vec::new());
    }
    let pushed: PushedNote = serde_json::from_value(msg.payload.clone())?;
    Ok(vec![Effect::Notify {
        note: pushed.note,
        level: pushed.level,
    }])
}
