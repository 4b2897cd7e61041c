//! One module per portal resource: tag constants, slice key, state,
//! reducer, action creators and (where the server pushes for it) a
//! message subscriber.

pub mod candidates;
pub mod catalog;
pub mod dashboard;
pub mod filter;
pub mod group;
pub mod groups;
pub mod hydrate;
pub mod list;
pub mod notifications;
pub mod photometry;
pub mod profile;
pub mod source;
pub mod sources;
pub mod spectra;

use crate::store::{Store, StoreBuilder};
use crate::ws::{self, Subscriber};

/// Register every resource slice, in a fixed order.
pub fn register_all(builder: StoreBuilder) -> StoreBuilder {
    builder
        .with_reducer(notifications::SLICE, notifications::NotificationsReducer)
        .with_reducer(ws::SLICE, ws::ConnectionReducer)
        .with_reducer(dashboard::SYSINFO_SLICE, dashboard::SysInfoReducer)
        .with_reducer(profile::SLICE, profile::ProfileReducer)
        .with_reducer(groups::SLICE, groups::GroupsReducer)
        .with_reducer(group::SLICE, group::GroupReducer)
        .with_reducer(dashboard::NEWS_FEED_SLICE, dashboard::NewsFeedReducer)
        .with_reducer(
            dashboard::RECENT_SOURCES_SLICE,
            dashboard::recent_sources_reducer(),
        )
        .with_reducer(sources::SLICE, sources::SourcesReducer)
        .with_reducer(source::SLICE, source::SourceReducer)
        .with_reducer(source::ATTACHMENT_SLICE, source::CommentAttachmentReducer)
        .with_reducer(spectra::SLICE, spectra::SpectraReducer)
        .with_reducer(photometry::SLICE, photometry::PhotometryReducer)
        .with_reducer(candidates::SLICE, candidates::CandidatesReducer)
        .with_reducer(candidates::CANDIDATE_SLICE, candidates::CandidateReducer)
        .with_reducer(filter::SLICE, filter::FilterReducer)
        .with_reducer(catalog::TAXONOMIES_SLICE, catalog::TAXONOMIES)
        .with_reducer(catalog::TELESCOPES_SLICE, catalog::TELESCOPES)
        .with_reducer(catalog::INSTRUMENTS_SLICE, catalog::INSTRUMENTS)
        .with_reducer(catalog::ALLOCATIONS_SLICE, catalog::ALLOCATIONS)
        .with_reducer(catalog::STREAMS_SLICE, catalog::STREAMS)
}

pub fn build_store() -> Store {
    register_all(Store::builder()).build()
}

/// The message subscribers for every resource that reacts to server push.
pub fn subscribers() -> Vec<Subscriber> {
    vec![
        Subscriber::new("notifications", notifications::on_message),
        Subscriber::new("groups", groups::on_message),
        Subscriber::new("group", group::on_message),
        Subscriber::new("source", source::on_message),
        Subscriber::new("spectra", spectra::on_message),
        Subscriber::new("photometry", photometry::on_message),
        Subscriber::new("candidates", candidates::on_message),
        Subscriber::new("profile", profile::on_message),
        Subscriber::new("dashboard", dashboard::on_message),
    ]
}
