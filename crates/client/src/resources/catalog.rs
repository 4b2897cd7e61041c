//! Reference data the forms draw from. Each is a plain list fetched once
//! at startup.

use skyportal_shared::{Allocation, Instrument, Stream, Taxonomy, Telescope};

use crate::api::{self, ApiResponse};
use crate::context::ActionContext;
use crate::resources::list::ListReducer;

pub const TAXONOMIES_SLICE: &str = "taxonomies";
pub const TELESCOPES_SLICE: &str = "telescopes";
pub const INSTRUMENTS_SLICE: &str = "instruments";
pub const ALLOCATIONS_SLICE: &str = "allocations";
pub const STREAMS_SLICE: &str = "streams";

pub const FETCH_TAXONOMIES: &str = "skyportal/FETCH_TAXONOMIES";
pub const FETCH_TAXONOMIES_OK: &str = "skyportal/FETCH_TAXONOMIES_OK";
pub const FETCH_TELESCOPES: &str = "skyportal/FETCH_TELESCOPES";
pub const FETCH_TELESCOPES_OK: &str = "skyportal/FETCH_TELESCOPES_OK";
pub const FETCH_INSTRUMENTS: &str = "skyportal/FETCH_INSTRUMENTS";
pub const FETCH_INSTRUMENTS_OK: &str = "skyportal/FETCH_INSTRUMENTS_OK";
pub const FETCH_ALLOCATIONS: &str = "skyportal/FETCH_ALLOCATIONS";
pub const FETCH_ALLOCATIONS_OK: &str = "skyportal/FETCH_ALLOCATIONS_OK";
pub const FETCH_STREAMS: &str = "skyportal/FETCH_STREAMS";
pub const FETCH_STREAMS_OK: &str = "skyportal/FETCH_STREAMS_OK";

pub const TAXONOMIES: ListReducer<Taxonomy> = ListReducer::new(FETCH_TAXONOMIES_OK);
pub const TELESCOPES: ListReducer<Telescope> = ListReducer::new(FETCH_TELESCOPES_OK);
pub const INSTRUMENTS: ListReducer<Instrument> = ListReducer::new(FETCH_INSTRUMENTS_OK);
pub const ALLOCATIONS: ListReducer<Allocation> = ListReducer::new(FETCH_ALLOCATIONS_OK);
pub const STREAMS: ListReducer<Stream> = ListReducer::new(FETCH_STREAMS_OK);

pub async fn fetch_taxonomies(ctx: &ActionContext) -> ApiResponse {
    api::get(ctx, "/api/taxonomy", FETCH_TAXONOMIES).await
}

pub async fn fetch_telescopes(ctx: &ActionContext) -> ApiResponse {
    api::get(ctx, "/api/telescope", FETCH_TELESCOPES).await
}

pub async fn fetch_instruments(ctx: &ActionContext) -> ApiResponse {
    api::get(ctx, "/api/instrument", FETCH_INSTRUMENTS).await
}

pub async fn fetch_allocations(ctx: &ActionContext) -> ApiResponse {
    api::get(ctx, "/api/allocation", FETCH_ALLOCATIONS).await
}

pub async fn fetch_streams(ctx: &ActionContext) -> ApiResponse {
    api::get(ctx, "/api/streams", FETCH_STREAMS).await
}
