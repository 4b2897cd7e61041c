//! Wire models for the resources the portal reads and writes.
//!
//! Server payloads are frequently partial (a `POST` answers with just an
//! `id`, list endpoints omit nested collections), so nearly every field
//! carries a serde default.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// --- Groups ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Group {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default)]
    pub single_user_group: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<GroupUser>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub streams: Vec<Stream>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub admin: bool,
}

/// Response of `GET /api/groups`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GroupsPayload {
    #[serde(default)]
    pub user_groups: Vec<Group>,
    #[serde(default)]
    pub user_accessible_groups: Vec<Group>,
    #[serde(default)]
    pub all_groups: Option<Vec<Group>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewGroup {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_admins: Vec<String>,
}

// --- Alert streams and filters ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stream {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub altdata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Filter {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub stream_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewFilter {
    pub name: String,
    pub group_id: i64,
    pub stream_id: i64,
}

// --- Sources ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Source {
    pub id: String,
    #[serde(default)]
    pub ra: Option<f64>,
    #[serde(default)]
    pub dec: Option<f64>,
    #[serde(default)]
    pub redshift: Option<f64>,
    #[serde(default)]
    pub internal_key: Option<String>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub classifications: Vec<Classification>,
    #[serde(default)]
    pub followup_requests: Vec<FollowupRequest>,
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Thumbnail {
    #[serde(rename = "type")]
    pub kind: String,
    pub public_url: String,
}

/// Paged response of `GET /api/sources`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SourcesPage {
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub page_number: u32,
    #[serde(default)]
    pub last_page: bool,
    #[serde(default)]
    pub total_matches: u64,
    #[serde(default)]
    pub num_per_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: i64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub obj_id: String,
    #[serde(default)]
    pub attachment_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    pub id: i64,
    pub classification: String,
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default)]
    pub taxonomy_id: Option<i64>,
    #[serde(default)]
    pub obj_id: String,
    #[serde(default)]
    pub author_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewClassification {
    pub obj_id: String,
    pub classification: String,
    pub taxonomy_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FollowupRequest {
    pub id: i64,
    #[serde(default)]
    pub obj_id: String,
    #[serde(default)]
    pub allocation_id: Option<i64>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewFollowupRequest {
    pub obj_id: String,
    pub allocation_id: i64,
    #[serde(default)]
    pub payload: serde_json::Value,
}

// --- Candidates ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Candidate {
    pub id: String,
    #[serde(default)]
    pub ra: Option<f64>,
    #[serde(default)]
    pub dec: Option<f64>,
    #[serde(default)]
    pub internal_key: Option<String>,
    #[serde(default)]
    pub is_source: bool,
    #[serde(default)]
    pub classifications: Vec<Classification>,
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
    #[serde(default)]
    pub last_detected: Option<NaiveDateTime>,
}

/// Paged response of `GET /api/candidates`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CandidatesPage {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub page_number: u32,
    #[serde(default)]
    pub last_page: bool,
    #[serde(default)]
    pub total_matches: u64,
}

// --- Spectra ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Spectrum {
    pub id: i64,
    #[serde(default)]
    pub obj_id: String,
    #[serde(default)]
    pub instrument_id: Option<i64>,
    #[serde(default)]
    pub observed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub wavelengths: Vec<f64>,
    #[serde(default)]
    pub fluxes: Vec<f64>,
    #[serde(default)]
    pub errors: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewSpectrum {
    pub obj_id: String,
    pub instrument_id: i64,
    pub observed_at: NaiveDateTime,
    pub wavelengths: Vec<f64>,
    pub fluxes: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_ids: Vec<i64>,
}

// --- Photometry ---

/// One photometry point as `GET /api/sources/{id}/photometry` serializes it.
/// Magnitude fields are set in `mag` format, flux fields in `flux` format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Photometry {
    #[serde(default)]
    pub id: Option<i64>,
    pub obj_id: String,
    pub mjd: f64,
    #[serde(default)]
    pub filter: String,
    #[serde(default)]
    pub instrument_id: Option<i64>,
    #[serde(default)]
    pub ra: Option<f64>,
    #[serde(default)]
    pub dec: Option<f64>,
    #[serde(default)]
    pub magsys: Option<String>,
    #[serde(default)]
    pub mag: Option<f64>,
    #[serde(default)]
    pub magerr: Option<f64>,
    #[serde(default)]
    pub limiting_mag: Option<f64>,
    #[serde(default)]
    pub flux: Option<f64>,
    #[serde(default)]
    pub fluxerr: Option<f64>,
    #[serde(default)]
    pub zp: Option<f64>,
}

/// Upload body for `POST /api/photometry`, magnitude form. Columns are
/// parallel arrays; a null `mag` marks a non-detection at `limiting_mag`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPhotometry {
    pub obj_id: String,
    pub instrument_id: i64,
    pub magsys: String,
    pub mjd: Vec<f64>,
    pub filter: Vec<String>,
    pub mag: Vec<Option<f64>>,
    pub magerr: Vec<Option<f64>>,
    pub limiting_mag: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_ids: Vec<i64>,
}

/// `GET /api/comment/{id}/attachment?download=false`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentAttachmentData {
    pub comment_id: i64,
    pub attachment: String,
}

// --- Catalog resources ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Taxonomy {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub hierarchy: serde_json::Value,
    #[serde(default, rename = "isLatest")]
    pub is_latest: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Telescope {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub elevation: Option<f64>,
    #[serde(default)]
    pub diameter: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instrument {
    pub id: i64,
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub band: Option<String>,
    #[serde(default)]
    pub telescope_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Allocation {
    pub id: i64,
    #[serde(default)]
    pub pi: Option<String>,
    #[serde(default)]
    pub proposal_id: Option<String>,
    #[serde(default)]
    pub instrument_id: Option<i64>,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub hours_allocated: Option<f64>,
}

// --- Users and portal info ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub acls: Vec<String>,
    #[serde(default)]
    pub tokens: Vec<ApiToken>,
    #[serde(default)]
    pub preferences: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiToken {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub acls: Vec<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SysInfo {
    #[serde(default)]
    pub invocation: Option<String>,
    #[serde(default)]
    pub cosmology: Option<String>,
    #[serde(default)]
    pub cosmoref: Option<String>,
    #[serde(default)]
    pub gitlog: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsFeedItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub time: Option<NaiveDateTime>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewsFeedPayload {
    #[serde(default)]
    pub news_feed_items: Vec<NewsFeedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentSource {
    pub obj_id: String,
    #[serde(default)]
    pub ra: Option<f64>,
    #[serde(default)]
    pub dec: Option<f64>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub public_url: String,
    #[serde(default)]
    pub classifications: Vec<Classification>,
    #[serde(default)]
    pub resaved: bool,
}
