//! The source currently open in the source page, and everything a user can
//! do to it: comment, classify, save to groups, request follow-up.
//!
//! Writes here don't touch the slice directly. The server answers them with
//! a `REFRESH_SOURCE` push, and the subscriber below refetches when the
//! pushed source is the one on screen.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};
use skyportal_shared::{
    CommentAttachmentData, NewClassification, NewFollowupRequest, ServerMessage, Source,
};

use crate::api::{self, ApiResponse};
use crate::context::ActionContext;
use crate::store::{Action, Reducer, RootState};
use crate::ws::Effect;

pub const SLICE: &str = "source";
pub const ATTACHMENT_SLICE: &str = "comment_attachment";

pub const FETCH_SOURCE: &str = "skyportal/FETCH_SOURCE";
pub const FETCH_SOURCE_OK: &str = "skyportal/FETCH_SOURCE_OK";
pub const FETCH_SOURCE_FAIL: &str = "skyportal/FETCH_SOURCE_FAIL";

/// Pushed with `{"source_id": "..."}` after anything about a source changes.
pub const REFRESH_SOURCE: &str = "skyportal/REFRESH_SOURCE";

pub const SAVE_SOURCE: &str = "skyportal/SAVE_SOURCE";
pub const ADD_COMMENT: &str = "skyportal/ADD_COMMENT";
pub const DELETE_COMMENT: &str = "skyportal/DELETE_COMMENT";
pub const FETCH_COMMENT_ATTACHMENT: &str = "skyportal/FETCH_COMMENT_ATTACHMENT";
pub const FETCH_COMMENT_ATTACHMENT_OK: &str = "skyportal/FETCH_COMMENT_ATTACHMENT_OK";
pub const ADD_CLASSIFICATION: &str = "skyportal/ADD_CLASSIFICATION";
pub const DELETE_CLASSIFICATION: &str = "skyportal/DELETE_CLASSIFICATION";
pub const SUBMIT_FOLLOWUP_REQUEST: &str = "skyportal/SUBMIT_FOLLOWUP_REQUEST";
pub const EDIT_FOLLOWUP_REQUEST: &str = "skyportal/EDIT_FOLLOWUP_REQUEST";
pub const DELETE_FOLLOWUP_REQUEST: &str = "skyportal/DELETE_FOLLOWUP_REQUEST";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceState {
    pub source: Option<Source>,
    /// Set when the last fetch failed, cleared when the next one starts.
    pub load_error: bool,
}

impl SourceState {
    pub fn id(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.id.as_str())
    }
}

pub struct SourceReducer;

impl Reducer for SourceReducer {
    type State = SourceState;

    fn initial_state(&self) -> SourceState {
        SourceState::default()
    }

    fn reduce(&self, state: &Arc<SourceState>, action: &Action) -> Arc<SourceState> {
        match action.kind.as_str() {
            FETCH_SOURCE if state.load_error => Arc::new(SourceState {
                load_error: false,
                ..(**state).clone()
            }),
            FETCH_SOURCE_OK => match action.payload::<Source>() {
                Some(source) => Arc::new(SourceState {
                    source: Some(source),
                    load_error: false,
                }),
                None => Arc::clone(state),
            },
            FETCH_SOURCE_FAIL => Arc::new(SourceState {
                load_error: true,
                ..(**state).clone()
            }),
            _ => Arc::clone(state),
        }
    }
}

/// The last comment attachment opened for viewing, decoded to text.
pub struct CommentAttachmentReducer;

impl Reducer for CommentAttachmentReducer {
    type State = Option<CommentAttachmentData>;

    fn initial_state(&self) -> Option<CommentAttachmentData> {
        None
    }

    fn reduce(
        &self,
        state: &Arc<Option<CommentAttachmentData>>,
        action: &Action,
    ) -> Arc<Option<CommentAttachmentData>> {
        if !action.is(FETCH_COMMENT_ATTACHMENT_OK) {
            return Arc::clone(state);
        }
        match action.payload::<CommentAttachmentData>() {
            Some(attachment) => Arc::new(Some(attachment)),
            None => Arc::clone(state),
        }
    }
}

/// A file to attach to a comment. Read by the caller; encoded here.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentAttachment {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl CommentAttachment {
    /// `data:<mime>;name=<name>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};name={};base64,{}",
            self.mime,
            urlencoding::encode(&self.name),
            BASE64.encode(&self.bytes)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub obj_id: String,
    pub text: String,
    /// Empty means "all of my groups".
    pub group_ids: Vec<i64>,
    pub attachment: Option<CommentAttachment>,
}

impl NewComment {
    pub fn new(obj_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            obj_id: obj_id.into(),
            text: text.into(),
            group_ids: Vec::new(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: CommentAttachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub(crate) fn to_body(&self) -> Value {
        let mut body = json!({
            "obj_id": self.obj_id,
            "text": self.text,
        });
        if !self.group_ids.is_empty() {
            body["group_ids"] = json!(self.group_ids);
        }
        if let Some(attachment) = &self.attachment {
            body["attachment"] = json!({
                "body": attachment.to_data_url(),
                "name": attachment.name,
            });
        }
        body
    }
}

pub async fn fetch_source(ctx: &ActionContext, id: &str) -> ApiResponse {
    let path = format!("/api/sources/{}", urlencoding::encode(id));
    api::get(ctx, &path, FETCH_SOURCE).await
}

/// Save a source (or an existing object) to the given groups.
pub async fn save_source(ctx: &ActionContext, id: &str, group_ids: &[i64]) -> ApiResponse {
    api::post(
        ctx,
        "/api/sources",
        SAVE_SOURCE,
        json!({"id": id, "group_ids": group_ids}),
    )
    .await
}

/// Post a comment. The attachment, if any, is encoded before the request goes out.
pub async fn add_comment(ctx: &ActionContext, comment: &NewComment) -> ApiResponse {
    let body = comment.to_body();
    api::post(ctx, "/api/comment", ADD_COMMENT, body).await
}

pub async fn delete_comment(ctx: &ActionContext, comment_id: i64) -> ApiResponse {
    api::delete(ctx, &format!("/api/comment/{comment_id}"), DELETE_COMMENT).await
}

/// Fetch an attachment's contents as text rather than as a download.
pub async fn fetch_comment_attachment(ctx: &ActionContext, comment_id: i64) -> ApiResponse {
    let path = format!("/api/comment/{comment_id}/attachment?download=false");
    api::get(ctx, &path, FETCH_COMMENT_ATTACHMENT).await
}

pub async fn add_classification(
    ctx: &ActionContext,
    classification: &NewClassification,
) -> ApiResponse {
    let body = match api::encode_body(classification) {
        Ok(body) => body,
        Err(err) => return err,
    };
    api::post(ctx, "/api/classification", ADD_CLASSIFICATION, body).await
}

pub async fn delete_classification(ctx: &ActionContext, classification_id: i64) -> ApiResponse {
    let path = format!("/api/classification/{classification_id}");
    api::delete(ctx, &path, DELETE_CLASSIFICATION).await
}

pub async fn submit_followup_request(
    ctx: &ActionContext,
    request: &NewFollowupRequest,
) -> ApiResponse {
    let body = match api::encode_body(request) {
        Ok(body) => body,
        Err(err) => return err,
    };
    api::post(ctx, "/api/followup_request", SUBMIT_FOLLOWUP_REQUEST, body).await
}

pub async fn edit_followup_request(
    ctx: &ActionContext,
    request_id: i64,
    payload: Value,
) -> ApiResponse {
    let path = format!("/api/followup_request/{request_id}");
    api::put(ctx, &path, EDIT_FOLLOWUP_REQUEST, json!({"payload": payload})).await
}

pub async fn delete_followup_request(ctx: &ActionContext, request_id: i64) -> ApiResponse {
    let path = format!("/api/followup_request/{request_id}");
    api::delete(ctx, &path, DELETE_FOLLOWUP_REQUEST).await
}

/// The source id a `REFRESH_SOURCE` push is about.
///
/// The server names the source either by id (`source_id`) or by its
/// internal key (`obj_key`). A key can only be resolved against the
/// source currently loaded.
pub(crate) fn refreshed_source_id(msg: &ServerMessage, state: &RootState) -> Option<String> {
    if msg.action_type != REFRESH_SOURCE {
        return None;
    }
    if let Some(id) = msg.payload_str("source_id") {
        return Some(id);
    }
    let key = msg.payload_str("obj_key")?;
    let loaded = state.get::<SourceState>(SLICE)?;
    let source = loaded.source.as_ref()?;
    (source.internal_key.as_deref() == Some(key.as_str())).then(|| source.id.clone())
}

/// Refetch only when the pushed source is the one on screen.
pub fn on_message(msg: &ServerMessage, state: &RootState) -> anyhow::Result<Vec<Effect>> {
    let Some(pushed) = refreshed_source_id(msg, state) else {
        return Ok(Vec::new());
    };
    let Some(loaded) = state.get::<SourceState>(SLICE) else {
        return Ok(Vec::new());
    };
    match loaded.id() {
        Some(loaded_id) if loaded_id == pushed => Ok(vec![Effect::FetchSource(pushed)]),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn store_with_source(id: &str) -> Store {
        let store = Store::builder().with_reducer(SLICE, SourceReducer).build();
        store.dispatch(Action::with_data(FETCH_SOURCE_OK, json!({"id": id, "ra": 1.0, "dec": 2.0})));
        store
    }

    #[test]
    fn mismatched_refresh_does_not_fetch() {
        let store = store_with_source("42");
        let msg = ServerMessage::new(REFRESH_SOURCE, json!({"source_id": "43"}));
        assert!(on_message(&msg, &store.state()).unwrap().is_empty());
    }

    #[test]
    fn matching_refresh_fetches_exactly_once() {
        let store = store_with_source("42");
        let msg = ServerMessage::new(REFRESH_SOURCE, json!({"source_id": "42"}));
        assert_eq!(
            on_message(&msg, &store.state()).unwrap(),
            vec![Effect::FetchSource("42".to_string())]
        );
    }

    #[test]
    fn refresh_by_internal_key_fetches_the_loaded_source() {
        let store = Store::builder().with_reducer(SLICE, SourceReducer).build();
        store.dispatch(Action::with_data(
            FETCH_SOURCE_OK,
            json!({"id": "ZTF20abc", "internal_key": "k-123"}),
        ));

        let hit = ServerMessage::new(REFRESH_SOURCE, json!({"obj_key": "k-123"}));
        assert_eq!(
            on_message(&hit, &store.state()).unwrap(),
            vec![Effect::FetchSource("ZTF20abc".to_string())]
        );
        let miss = ServerMessage::new(REFRESH_SOURCE, json!({"obj_key": "k-999"}));
        assert!(on_message(&miss, &store.state()).unwrap().is_empty());
    }

    #[test]
    fn fail_sets_and_next_fetch_clears_load_error() {
        let store = store_with_source("42");
        store.dispatch(Action::new(FETCH_SOURCE_FAIL));
        let state = store.slice::<SourceState>(SLICE).unwrap();
        assert!(state.load_error);
        assert_eq!(state.id(), Some("42"));

        store.dispatch(Action::new(FETCH_SOURCE));
        assert!(!store.slice::<SourceState>(SLICE).unwrap().load_error);
    }

    #[test]
    fn fetch_start_without_error_keeps_reference() {
        let state = Arc::new(SourceState::default());
        let next = SourceReducer.reduce(&state, &Action::new(FETCH_SOURCE));
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn reducer_does_not_mutate_its_input() {
        let state = Arc::new(SourceState {
            source: Some(Source {
                id: "ZTF1".into(),
                ..Source::default()
            }),
            load_error: false,
        });
        let snapshot = (*state).clone();
        let _ = SourceReducer.reduce(&state, &Action::new(FETCH_SOURCE_FAIL));
        let _ = SourceReducer.reduce(&state, &Action::with_data(FETCH_SOURCE_OK, json!({"id": "ZTF2"})));
        assert_eq!(*state, snapshot);
    }

    #[test]
    fn fetched_attachment_is_kept_as_text() {
        let state = Arc::new(None);
        let next = CommentAttachmentReducer.reduce(
            &state,
            &Action::with_data(
                FETCH_COMMENT_ATTACHMENT_OK,
                json!({"commentId": 12, "attachment": "wavelength,flux"}),
            ),
        );
        let attachment = (*next).clone().unwrap();
        assert_eq!(attachment.comment_id, 12);
        assert_eq!(attachment.attachment, "wavelength,flux");
    }

    #[test]
    fn attachment_is_sent_as_base64_data_url() {
        let comment = NewComment::new("ZTF1", "see spectrum").with_attachment(CommentAttachment {
            name: "fit 1.txt".into(),
            mime: "text/plain".into(),
            bytes: b"hello".to_vec(),
        });
        let body = comment.to_body();
        assert_eq!(
            body["attachment"]["body"],
            "data:text/plain;name=fit%201.txt;base64,aGVsbG8="
        );
        assert_eq!(body["attachment"]["name"], "fit 1.txt");
        assert!(body.get("group_ids").is_none());
    }
}
