//! Headless CLI for exercising the map data pipeline
//!
//! Run with: cargo run --features cli --bin meshmap-cli

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::collections::HashMap;
    use std::time::Duration;

    use futures_util::StreamExt;
    use meshmap_vis::core::{
        classify, parse_event, project, summarize, EventKind, MaxAge, NodeStatus, NodeStore,
        Projection, RefreshScheduler,
    };
    use meshmap_vis::time::now_seconds;
    use tokio_tungstenite::{connect_async, tungstenite::Message};
    use tracing::{error, info, warn};
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,meshmap_vis=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let url = std::env::var("MESHMAP_WS")
        .unwrap_or_else(|_| "ws://127.0.0.1:8080/api/events".to_string());

    info!(url = %url, "Connecting to map server");
    let (ws_stream, _) = connect_async(&url).await?;
    let (_write, mut read) = ws_stream.split();

    let mut store = NodeStore::new();
    let mut scheduler = RefreshScheduler::new(now_seconds());
    let max_age = MaxAge::default();
    let mut statuses: HashMap<String, NodeStatus> = HashMap::new();
    let mut projection = Projection::default();
    let mut event_count = 0u64;
    let mut poll_interval = tokio::time::interval(Duration::from_millis(250));

    info!("Connected, waiting for events...");

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let now = now_seconds();
                        match parse_event(&text, &mut store, now) {
                            Some(EventKind::NodeUpdate) => {
                                event_count += 1;
                                scheduler.on_node_update(now);
                            }
                            Some(EventKind::MeshPacket) => {
                                event_count += 1;
                                scheduler.on_mesh_packet(now);
                            }
                            None => {}
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        warn!("Update stream closed");
                        break;
                    }
                    Some(Err(e)) => error!(error = %e, "Update stream error"),
                    _ => {}
                }
            }
            _ = poll_interval.tick() => {
                let now = now_seconds();
                let actions = scheduler.poll(now);
                if actions.classify {
                    statuses = store
                        .iter()
                        .map(|r| (r.id.clone(), classify(now, r.last_heard, max_age)))
                        .collect();
                }
                if actions.project {
                    let views = store.views(&statuses, None);
                    projection = project(&views);
                    let summary = summarize(statuses.values());
                    info!(
                        events = event_count,
                        nodes = projection.nodes.len(),
                        links = projection.neighbors.len(),
                        online = format!("{}/{}", summary.online_nodes, summary.num_nodes),
                        "stats"
                    );
                }
            }
        }
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
