//! Mesh map dashboard app (egui, browser)
//!
//! The app owns the node store and derives everything the panels render
//! from it: online statuses, the sidebar summary, the node/neighbor
//! projection, and the per-frame recency highlight.

mod filter;
mod header;
mod history;
mod map;
mod sidebar;

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use eframe::egui;

use crate::core::{
    classify, parse_event, project, summarize, EventKind, HighlightChange, MaxAge, NodeStatus,
    NodeStore, OnlineSummary, Projection, RecencyTracker, RefreshScheduler, SelectionController,
};
use crate::theme::{colors, map_visuals};
use crate::time::now_seconds;
use crate::websocket_wasm::{MessageBuffer, WsClient};
use crate::ws_state::WsState;

/// Default WebSocket URL for the map server's event stream
pub const DEFAULT_WS_URL: &str = "ws://127.0.0.1:8080/api/events";

/// Frame-time budget for draining buffered socket messages.
const MESSAGE_BUDGET_MS: f64 = 12.0;

pub struct MeshApp {
    store: NodeStore,
    recency: RecencyTracker,
    selection: SelectionController,
    scheduler: RefreshScheduler,

    /// Classification output, rebuilt on every classify refresh.
    statuses: HashMap<String, NodeStatus>,
    summary: OnlineSummary,
    /// Projection output, rebuilt on every project refresh.
    projection: Projection,

    max_age: MaxAge,
    /// Node id -> seconds since its last receipt, for nodes inside the
    /// activity window.
    highlight_ages: HashMap<String, f64>,

    camera: map::Camera,
    history: history::HistoryOverlay,

    /// Incoming messages; the socket callback pushes, update() drains.
    msg_buffer: MessageBuffer,
    ws_state: Rc<RefCell<WsState>>,
    /// WebSocket client (kept alive)
    #[allow(dead_code)]
    ws_client: Option<WsClient>,

    fps_counter: header::FpsCounter,
}

impl MeshApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(map_visuals());

        let msg_buffer: MessageBuffer = Rc::new(RefCell::new(VecDeque::new()));
        let ws_state = Rc::new(RefCell::new(WsState::Connecting));

        // The hosting page may override the stream URL.
        let ws_url = js_sys::eval("window.__meshmap_ws_url")
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_else(|| DEFAULT_WS_URL.to_string());

        let ws_client = WsClient::connect(&ws_url, msg_buffer.clone(), ws_state.clone()).ok();

        Self {
            store: NodeStore::new(),
            recency: RecencyTracker::new(),
            selection: SelectionController::new(),
            scheduler: RefreshScheduler::new(now_seconds()),
            statuses: HashMap::new(),
            summary: OnlineSummary::default(),
            projection: Projection::default(),
            max_age: filter::load_max_age(),
            highlight_ages: HashMap::new(),
            camera: map::Camera::new(),
            history: history::HistoryOverlay::new(),
            msg_buffer,
            ws_state,
            ws_client,
            fps_counter: header::FpsCounter::new(),
        }
    }

    /// Drain buffered socket messages under a time budget so a burst of
    /// updates cannot stall the frame. Leftovers wait for the next frame.
    fn process_messages(&mut self) {
        let deadline = js_sys::Date::now() + MESSAGE_BUDGET_MS;
        loop {
            let msg = self.msg_buffer.borrow_mut().pop_front();
            let Some(msg) = msg else {
                break;
            };
            let now = now_seconds();
            match parse_event(&msg, &mut self.store, now) {
                Some(EventKind::NodeUpdate) => self.scheduler.on_node_update(now),
                Some(EventKind::MeshPacket) => self.scheduler.on_mesh_packet(now),
                None => {}
            }
            if js_sys::Date::now() >= deadline {
                break;
            }
        }
    }

    /// Reclassify every node and refresh the sidebar summary. Also feeds
    /// last-heard timestamps into the recency tracker.
    fn refresh_online_state(&mut self, now: f64) {
        self.statuses = self
            .store
            .iter()
            .map(|r| (r.id.clone(), classify(now, r.last_heard, self.max_age)))
            .collect();
        self.summary = summarize(self.statuses.values());
        for record in self.store.iter() {
            if let Some(rx_time) = record.last_heard {
                self.recency.record(&record.id, rx_time);
            }
        }
    }

    fn rebuild_projection(&mut self) {
        let views = self.store.views(&self.statuses, self.selection.selected());
        self.projection = project(&views);
    }

    /// Toggle selection of a node and apply the transition effects: clear
    /// the history overlay, fly the camera, and fetch the new history.
    fn select_node(&mut self, id: &str) {
        let feature = self.store.get(id).and_then(|r| r.feature.clone());
        let effects = self.selection.toggle(id, feature.as_ref(), self.max_age);

        self.history.clear();
        if let Some(coords) = effects.fly_to {
            self.camera.fly_to(&coords, map::SELECT_ZOOM);
        }
        if let Some(url) = effects.history_query {
            self.history.fetch(&url);
        }

        // Selection changes edge visibility immediately, no debounce.
        let now = now_seconds();
        self.refresh_online_state(now);
        self.rebuild_projection();
    }

    /// Apply a new staleness threshold: persist it and refresh immediately.
    fn apply_max_age(&mut self, value: MaxAge) {
        if self.max_age == value {
            return;
        }
        self.max_age = value;
        filter::store_max_age(value);
        let now = now_seconds();
        self.refresh_online_state(now);
        self.rebuild_projection();
    }

    fn status_of(&self, id: &str) -> NodeStatus {
        self.statuses.get(id).copied().unwrap_or_default()
    }

    fn get_ws_state(&self) -> WsState {
        self.ws_state.borrow().clone()
    }
}

impl eframe::App for MeshApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Request continuous repaint for real-time updates
        ctx.request_repaint();

        self.process_messages();

        let now = now_seconds();
        let actions = self.scheduler.poll(now);
        if actions.classify {
            self.refresh_online_state(now);
        }
        if actions.project {
            self.rebuild_projection();
        }

        for change in self.recency.tick(now) {
            match change {
                HighlightChange::Refresh { id, age } => {
                    self.highlight_ages.insert(id, age);
                }
                HighlightChange::Clear { id } => {
                    self.highlight_ages.remove(&id);
                }
            }
        }

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY).inner_margin(6.0))
            .show(ctx, |ui| {
                self.render_header(ui);
            });

        self.render_sidebar(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY))
            .show(ctx, |ui| {
                self.render_map(ui);
            });
    }
}
