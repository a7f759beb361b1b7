//! Debounced refresh scheduling
//!
//! Events arrive in bursts; recomputation happens at most once per debounce
//! window, on the trailing edge, always against the latest store state. A
//! periodic timer forces a full recompute as a liveness fallback against
//! missed events. All timers are plain deadlines polled from the frame loop,
//! which substitutes for cancellation: superseded schedules are simply
//! overwritten before they fire.

use tracing::trace;

/// Coalescing window for node-update driven projection rebuilds.
pub const NODE_UPDATE_DEBOUNCE_SECS: f64 = 0.5;
/// Coalescing window for mesh-packet driven classification refreshes.
pub const MESH_PACKET_DEBOUNCE_SECS: f64 = 0.25;
/// Liveness fallback interval.
pub const PERIODIC_REFRESH_SECS: f64 = 30.0;

/// Schedule-or-reset deadline timer. Scheduling while pending pushes the
/// deadline out; polling past the deadline fires exactly once.
#[derive(Debug)]
pub struct Debouncer {
    delay: f64,
    deadline: Option<f64>,
}

impl Debouncer {
    pub fn new(delay: f64) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: f64) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once when `now` has reached the scheduled deadline.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// What a poll of the scheduler asks the app to recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshActions {
    pub project: bool,
    pub classify: bool,
}

/// Fans incoming events out to the projector and classifier, debounced.
#[derive(Debug)]
pub struct RefreshScheduler {
    node_update: Debouncer,
    mesh_packet: Debouncer,
    next_periodic: f64,
}

impl RefreshScheduler {
    pub fn new(now: f64) -> Self {
        Self {
            node_update: Debouncer::new(NODE_UPDATE_DEBOUNCE_SECS),
            mesh_packet: Debouncer::new(MESH_PACKET_DEBOUNCE_SECS),
            next_periodic: now + PERIODIC_REFRESH_SECS,
        }
    }

    pub fn on_node_update(&mut self, now: f64) {
        self.node_update.schedule(now);
    }

    pub fn on_mesh_packet(&mut self, now: f64) {
        self.mesh_packet.schedule(now);
    }

    /// Poll all timers. A projection rebuild always includes a
    /// classification refresh, since filtering depends on staleness.
    pub fn poll(&mut self, now: f64) -> RefreshActions {
        if now >= self.next_periodic {
            trace!("Periodic refresh");
            self.node_update.schedule(now - NODE_UPDATE_DEBOUNCE_SECS);
            self.next_periodic = now + PERIODIC_REFRESH_SECS;
        }
        let project = self.node_update.poll(now);
        let classify = self.mesh_packet.poll(now) || project;
        RefreshActions { project, classify }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debouncer_fires_once_after_delay() {
        let mut debouncer = Debouncer::new(0.5);
        debouncer.schedule(10.0);
        assert!(!debouncer.poll(10.4));
        assert!(debouncer.poll(10.5));
        assert!(!debouncer.poll(10.6));
    }

    #[test]
    fn burst_coalesces_to_single_fire() {
        let mut debouncer = Debouncer::new(0.5);
        debouncer.schedule(10.0);
        debouncer.schedule(10.2);
        debouncer.schedule(10.4);
        // The first deadline has passed but was superseded
        assert!(!debouncer.poll(10.6));
        assert!(debouncer.poll(10.9));
        assert!(!debouncer.poll(11.5));
    }

    #[test]
    fn idle_debouncer_never_fires() {
        let mut debouncer = Debouncer::new(0.25);
        assert!(!debouncer.poll(100.0));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn node_update_triggers_project_and_classify() {
        let mut scheduler = RefreshScheduler::new(0.0);
        scheduler.on_node_update(1.0);
        assert_eq!(scheduler.poll(1.2), RefreshActions::default());
        let actions = scheduler.poll(1.5);
        assert!(actions.project && actions.classify);
    }

    #[test]
    fn mesh_packet_triggers_classify_only() {
        let mut scheduler = RefreshScheduler::new(0.0);
        scheduler.on_mesh_packet(1.0);
        let actions = scheduler.poll(1.25);
        assert!(!actions.project);
        assert!(actions.classify);
    }

    #[test]
    fn periodic_fallback_forces_projection() {
        let mut scheduler = RefreshScheduler::new(0.0);
        assert_eq!(scheduler.poll(29.0), RefreshActions::default());
        let actions = scheduler.poll(30.0);
        assert!(actions.project && actions.classify);
        // And again one interval later, without any events
        assert_eq!(scheduler.poll(45.0), RefreshActions::default());
        assert!(scheduler.poll(60.0).project);
    }
}
