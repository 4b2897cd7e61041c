//! Spectra, keyed by the source they belong to.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use skyportal_shared::{NewSpectrum, ServerMessage, Spectrum};

use crate::api::{self, ApiResponse};
use crate::context::ActionContext;
use crate::resources::source::refreshed_source_id;
use crate::store::{Action, Reducer, RootState};
use crate::ws::Effect;

pub const SLICE: &str = "spectra";

pub const FETCH_SOURCE_SPECTRA: &str = "skyportal/FETCH_SOURCE_SPECTRA";
pub const FETCH_SOURCE_SPECTRA_OK: &str = "skyportal/FETCH_SOURCE_SPECTRA_OK";
pub const ADD_SPECTRUM: &str = "skyportal/ADD_SPECTRUM";

pub type SpectraState = HashMap<String, Vec<Spectrum>>;

#[derive(Deserialize)]
struct SourceSpectra {
    obj_id: String,
    #[serde(default)]
    spectra: Vec<Spectrum>,
}

pub struct SpectraReducer;

impl Reducer for SpectraReducer {
    type State = SpectraState;

    fn initial_state(&self) -> SpectraState {
        HashMap::new()
    }

    fn reduce(&self, state: &Arc<SpectraState>, action: &Action) -> Arc<SpectraState> {
        if !action.is(FETCH_SOURCE_SPECTRA_OK) {
            return Arc::clone(state);
        }
        let Some(payload) = action.payload::<SourceSpectra>() else {
            return Arc::clone(state);
        };
        let mut next = (**state).clone();
        next.insert(payload.obj_id, payload.spectra);
        Arc::new(next)
    }
}

pub async fn fetch_source_spectra(ctx: &ActionContext, source_id: &str) -> ApiResponse {
    let path = format!("/api/sources/{}/spectra", urlencoding::encode(source_id));
    api::get(ctx, &path, FETCH_SOURCE_SPECTRA).await
}

/// Upload a spectrum, then reload that source's spectra on success.
pub async fn add_spectrum(ctx: &ActionContext, spectrum: &NewSpectrum) -> ApiResponse {
    let body = match api::encode_body(spectrum) {
        Ok(body) => body,
        Err(err) => return err,
    };
    let response = api::post(ctx, "/api/spectrum", ADD_SPECTRUM, body).await;
    if response.is_success() {
        fetch_source_spectra(ctx, &spectrum.obj_id).await;
    }
    response
}

/// A source refresh also refreshes its spectra, but only if they were loaded.
pub fn on_message(msg: &ServerMessage, state: &RootState) -> anyhow::Result<Vec<Effect>> {
    let (Some(spectra), Some(source_id)) = (
        state.get::<SpectraState>(SLICE),
        refreshed_source_id(msg, state),
    ) else {
        return Ok(Vec::new());
    };
    if spectra.contains_key(&source_id) {
        Ok(vec![Effect::FetchSourceSpectra(source_id)])
    } else {
        Ok(Vec::new())
    }
}
