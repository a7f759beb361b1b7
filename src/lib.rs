//! meshmap-vis — live mesh-network map dashboard
//!
//! Keeps an interactive map canvas and a sidebar node list synchronized with
//! a stream of update events: node updates drive the node/neighbor geometry
//! projection, mesh packets drive online-state classification, and a
//! per-frame recency highlight marks nodes that transmitted very recently.

pub mod core;
pub mod time;
pub mod ws_state;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod theme;
#[cfg(target_arch = "wasm32")]
mod websocket_wasm;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    // Initialize tracing for the browser console
    tracing_wasm::set_as_global_default();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let canvas = web_sys::window()
            .expect("no window")
            .document()
            .expect("no document")
            .get_element_by_id("map")
            .expect("no map canvas element")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("not a canvas element");

        eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(app::MeshApp::new(cc)))),
            )
            .await
            .expect("Failed to start eframe");
    });
}
