//! Light curves, keyed by the source they belong to.
//!
//! The photometry endpoint answers with a bare list, so the reducer reads
//! the source id back out of the request endpoint the `_OK` action carries.

use std::collections::HashMap;
use std::sync::Arc;

use skyportal_shared::{NewPhotometry, Photometry, ServerMessage};

use crate::api::{self, ApiResponse};
use crate::context::ActionContext;
use crate::resources::source::refreshed_source_id;
use crate::store::{Action, Reducer, RootState};
use crate::ws::Effect;

pub const SLICE: &str = "photometry";

pub const FETCH_SOURCE_PHOTOMETRY: &str = "skyportal/FETCH_SOURCE_PHOTOMETRY";
pub const FETCH_SOURCE_PHOTOMETRY_OK: &str = "skyportal/FETCH_SOURCE_PHOTOMETRY_OK";
pub const UPLOAD_PHOTOMETRY: &str = "skyportal/UPLOAD_PHOTOMETRY";

pub type PhotometryState = HashMap<String, Vec<Photometry>>;

const SOURCES_PREFIX: &str = "/api/sources/";
const PHOTOMETRY_SUFFIX: &str = "/photometry";

fn photometry_path(source_id: &str) -> String {
    format!(
        "{SOURCES_PREFIX}{}{PHOTOMETRY_SUFFIX}?format=mag&magsys=ab",
        urlencoding::encode(source_id)
    )
}

fn source_id_from_endpoint(endpoint: &str) -> Option<String> {
    let path = endpoint.split('?').next()?;
    let encoded = path
        .strip_prefix(SOURCES_PREFIX)?
        .strip_suffix(PHOTOMETRY_SUFFIX)?;
    urlencoding::decode(encoded).ok().map(|id| id.into_owned())
}

pub struct PhotometryReducer;

impl Reducer for PhotometryReducer {
    type State = PhotometryState;

    fn initial_state(&self) -> PhotometryState {
        HashMap::new()
    }

    fn reduce(&self, state: &Arc<PhotometryState>, action: &Action) -> Arc<PhotometryState> {
        if !action.is(FETCH_SOURCE_PHOTOMETRY_OK) {
            return Arc::clone(state);
        }
        let (Some(source_id), Some(points)) = (
            action.endpoint().and_then(source_id_from_endpoint),
            action.payload::<Vec<Photometry>>(),
        ) else {
            return Arc::clone(state);
        };
        let mut next = (**state).clone();
        next.insert(source_id, points);
        Arc::new(next)
    }
}

pub async fn fetch_source_photometry(ctx: &ActionContext, source_id: &str) -> ApiResponse {
    api::get(ctx, &photometry_path(source_id), FETCH_SOURCE_PHOTOMETRY).await
}

/// Upload photometry, then reload that source's light curve on success.
pub async fn upload_photometry(ctx: &ActionContext, photometry: &NewPhotometry) -> ApiResponse {
    let body = match api::encode_body(photometry) {
        Ok(body) => body,
        Err(err) => return err,
    };
    let response = api::post(ctx, "/api/photometry", UPLOAD_PHOTOMETRY, body).await;
    if response.is_success() {
        fetch_source_photometry(ctx, &photometry.obj_id).await;
    }
    response
}

/// Refetch a light curve on source refresh, if it was loaded.
pub fn on_message(msg: &ServerMessage, state: &RootState) -> anyhow::Result<Vec<Effect>> {
    let (Some(photometry), Some(source_id)) = (
        state.get::<PhotometryState>(SLICE),
        refreshed_source_id(msg, state),
    ) else {
        return Ok(Vec::new());
    };
    if photometry.contains_key(&source_id) {
        Ok(vec![Effect::FetchSourcePhotometry(source_id)])
    } else {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::source::{self, REFRESH_SOURCE};
    use crate::store::Store;
    use serde_json::json;

    fn fetched(source_id: &str, data: serde_json::Value) -> Action {
        Action::with_data(FETCH_SOURCE_PHOTOMETRY_OK, data).with_extra(
            "parameters",
            json!({"endpoint": photometry_path(source_id), "method": "GET"}),
        )
    }

    #[test]
    fn endpoint_round_trips_odd_ids() {
        assert_eq!(
            source_id_from_endpoint(&photometry_path("ZTF 20/a")).as_deref(),
            Some("ZTF 20/a")
        );
        assert_eq!(source_id_from_endpoint("/api/sources/ZTF1/spectra"), None);
    }

    #[test]
    fn light_curves_are_stored_per_source() {
        let store = Store::builder()
            .with_reducer(source::SLICE, source::SourceReducer)
            .with_reducer(SLICE, PhotometryReducer)
            .build();
        store.dispatch(fetched(
            "ZTF20abc",
            json!([
                {"obj_id": "ZTF20abc", "mjd": 58000.5, "filter": "ztfg", "mag": 19.2, "magerr": 0.1, "magsys": "ab"},
                {"obj_id": "ZTF20abc", "mjd": 58001.5, "filter": "ztfr", "mag": null, "limiting_mag": 20.5}
            ]),
        ));
        let curves = store.slice::<PhotometryState>(SLICE).unwrap();
        assert_eq!(curves["ZTF20abc"].len(), 2);
        assert_eq!(curves["ZTF20abc"][1].limiting_mag, Some(20.5));

        store.dispatch(Action::with_data(
            source::FETCH_SOURCE_OK,
            json!({"id": "ZTF20abc", "internal_key": "k-123"}),
        ));
        let by_key = ServerMessage::new(REFRESH_SOURCE, json!({"obj_key": "k-123"}));
        assert_eq!(
            on_message(&by_key, &store.state()).unwrap(),
            vec![Effect::FetchSourcePhotometry("ZTF20abc".into())]
        );
        let not_loaded = ServerMessage::new(REFRESH_SOURCE, json!({"source_id": "ZTF9"}));
        assert!(on_message(&not_loaded, &store.state()).unwrap().is_empty());
    }

    #[test]
    fn ok_without_an_endpoint_is_ignored() {
        let state = Arc::new(PhotometryState::new());
        let next = PhotometryReducer.reduce(
            &state,
            &Action::with_data(FETCH_SOURCE_PHOTOMETRY_OK, json!([])),
        );
        assert!(Arc::ptr_eq(&state, &next));
    }
}
