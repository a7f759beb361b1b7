//! Position-history overlay for the selected node
//!
//! Fetched asynchronously on selection; a generation counter discards
//! responses that arrive after the selection has already changed.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::core::FeatureCollection;

pub(super) struct HistoryOverlay {
    positions: Rc<RefCell<Option<FeatureCollection>>>,
    generation: Rc<RefCell<u64>>,
}

impl HistoryOverlay {
    pub fn new() -> Self {
        Self {
            positions: Rc::new(RefCell::new(None)),
            generation: Rc::new(RefCell::new(0)),
        }
    }

    pub fn clear(&self) {
        *self.positions.borrow_mut() = None;
        *self.generation.borrow_mut() += 1;
    }

    pub fn positions(&self) -> Option<FeatureCollection> {
        self.positions.borrow().clone()
    }

    pub fn fetch(&self, url: &str) {
        *self.generation.borrow_mut() += 1;
        let generation = *self.generation.borrow();
        let url = url.to_string();
        let positions = self.positions.clone();
        let gen_cell = self.generation.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let Some(window) = web_sys::window() else {
                return;
            };
            let response = match JsFuture::from(window.fetch_with_str(&url)).await {
                Ok(value) => value,
                Err(e) => {
                    warn!(?e, url = %url, "History fetch failed");
                    return;
                }
            };
            let Ok(response) = response.dyn_into::<web_sys::Response>() else {
                return;
            };
            let Ok(text_promise) = response.text() else {
                return;
            };
            let Ok(text) = JsFuture::from(text_promise).await else {
                warn!(url = %url, "History body read failed");
                return;
            };
            let Some(text) = text.as_string() else {
                return;
            };
            match serde_json::from_str::<FeatureCollection>(&text) {
                Ok(collection) => {
                    // A newer selection may have superseded this request
                    if *gen_cell.borrow() == generation {
                        debug!(points = collection.len(), "History overlay loaded");
                        *positions.borrow_mut() = Some(collection);
                    }
                }
                Err(e) => warn!(error = %e, url = %url, "Malformed history payload"),
            }
        });
    }
}
