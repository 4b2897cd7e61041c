//! What the front page shows: system info, the news feed, recent sources.

use std::sync::Arc;

use skyportal_shared::{NewsFeedItem, NewsFeedPayload, RecentSource, ServerMessage, SysInfo};

use crate::api::{self, ApiResponse};
use crate::context::ActionContext;
use crate::resources::list::ListReducer;
use crate::store::{Action, Reducer, RootState};
use crate::ws::Effect;

pub const SYSINFO_SLICE: &str = "sysinfo";
pub const NEWS_FEED_SLICE: &str = "news_feed";
pub const RECENT_SOURCES_SLICE: &str = "recent_sources";

pub const FETCH_SYSINFO: &str = "skyportal/FETCH_SYSINFO";
pub const FETCH_SYSINFO_OK: &str = "skyportal/FETCH_SYSINFO_OK";
pub const FETCH_NEWSFEED: &str = "skyportal/FETCH_NEWSFEED";
pub const FETCH_NEWSFEED_OK: &str = "skyportal/FETCH_NEWSFEED_OK";
pub const FETCH_RECENT_SOURCES: &str = "skyportal/FETCH_RECENT_SOURCES";
pub const FETCH_RECENT_SOURCES_OK: &str = "skyportal/FETCH_RECENT_SOURCES_OK";

pub struct SysInfoReducer;

impl Reducer for SysInfoReducer {
    type State = Option<SysInfo>;

    fn initial_state(&self) -> Option<SysInfo> {
        None
    }

    fn reduce(&self, state: &Arc<Option<SysInfo>>, action: &Action) -> Arc<Option<SysInfo>> {
        if !action.is(FETCH_SYSINFO_OK) {
            return Arc::clone(state);
        }
        match action.payload::<SysInfo>() {
            Some(info) => Arc::new(Some(info)),
            None => Arc::clone(state),
        }
    }
}

pub struct NewsFeedReducer;

impl Reducer for NewsFeedReducer {
    type State = Vec<NewsFeedItem>;

    fn initial_state(&self) -> Vec<NewsFeedItem> {
        Vec::new()
    }

    fn reduce(&self, state: &Arc<Vec<NewsFeedItem>>, action: &Action) -> Arc<Vec<NewsFeedItem>> {
        if !action.is(FETCH_NEWSFEED_OK) {
            return Arc::clone(state);
        }
        match action.payload::<NewsFeedPayload>() {
            Some(payload) => Arc::new(payload.news_feed_items),
            None => Arc::clone(state),
        }
    }
}

pub fn recent_sources_reducer() -> ListReducer<RecentSource> {
    ListReducer::new(FETCH_RECENT_SOURCES_OK)
}

pub async fn fetch_sysinfo(ctx: &ActionContext) -> ApiResponse {
    api::get(ctx, "/api/sysinfo", FETCH_SYSINFO).await
}

pub async fn fetch_news_feed(ctx: &ActionContext) -> ApiResponse {
    api::get(ctx, "/api/newsfeed", FETCH_NEWSFEED).await
}

pub async fn fetch_recent_sources(ctx: &ActionContext) -> ApiResponse {
    api::get(ctx, "/api/internal/recent_sources", FETCH_RECENT_SOURCES).await
}

pub fn on_message(msg: &ServerMessage, _state: &RootState) -> anyhow::Result<Vec<Effect>> {
    if msg.action_type == FETCH_NEWSFEED {
        Ok(vec![Effect::FetchNewsFeed])
    } else {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::list::ListState;
    use crate::store::Store;
    use serde_json::json;

    #[test]
    fn front_page_slices_fill_independently() {
        let store = Store::builder()
            .with_reducer(SYSINFO_SLICE, SysInfoReducer)
            .with_reducer(NEWS_FEED_SLICE, NewsFeedReducer)
            .with_reducer(RECENT_SOURCES_SLICE, recent_sources_reducer())
            .build();

        store.dispatch(Action::with_data(
            FETCH_NEWSFEED_OK,
            json!({"news_feed_items": [{"type": "comment", "message": "ada commented on ZTF1"}]}),
        ));
        let before = store.slice::<Option<SysInfo>>(SYSINFO_SLICE).unwrap();
        assert!(before.is_none());
        let feed = store.slice::<Vec<NewsFeedItem>>(NEWS_FEED_SLICE).unwrap();
        assert_eq!(feed[0].kind, "comment");

        store.dispatch(Action::with_data(
            FETCH_RECENT_SOURCES_OK,
            json!([{"obj_id": "ZTF1", "resaved": true}]),
        ));
        let recent = store
            .slice::<ListState<RecentSource>>(RECENT_SOURCES_SLICE)
            .unwrap();
        assert!(recent.items[0].resaved);
        assert!(Arc::ptr_eq(
            &before,
            &store.slice::<Option<SysInfo>>(SYSINFO_SLICE).unwrap()
        ));
    }
}
