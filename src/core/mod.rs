//! Platform-agnostic map state: node repository, classification,
//! projection, selection, and refresh scheduling. Shared between the
//! dashboard and the CLI.

pub mod classify;
pub mod dispatch;
pub mod geo;
pub mod parser;
pub mod project;
pub mod selection;
pub mod store;
pub mod timefmt;

pub use classify::{classify, summarize, MaxAge, NodeStatus, OnlineSummary};
pub use dispatch::{Debouncer, RefreshActions, RefreshScheduler};
pub use geo::{Feature, FeatureCollection, Geometry};
pub use parser::{parse_event, EventKind};
pub use project::{project, NeighborEdge, Projection};
pub use selection::{position_history_url, SelectionController, SelectionEffects};
pub use store::{
    HighlightChange, NeighborReport, NodeRecord, NodeStore, NodeView, RecencyTracker,
    ACTIVITY_WINDOW_SECS,
};
pub use timefmt::relative_time_string;
