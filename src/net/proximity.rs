//! Proximity alert rate limiting
//!
//! The service wants to know when the player rides close to a rival, but at
//! most once per interval per rider, however long the player camps there.

use std::time::{Duration, Instant};

use hashbrown::HashMap;

use crate::game::constants::proximity;
use crate::game::state::SimState;

/// Tracks when each rival was last reported close
pub struct ProximityTracker {
    last_alert: HashMap<String, Instant>,
    interval: Duration,
}

impl ProximityTracker {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs_f32(proximity::ALERT_INTERVAL_SECS))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            last_alert: HashMap::new(),
            interval,
        }
    }

    /// Rider ids that are close to the player and due for an alert as of
    /// `now`. Riders returned here are marked as alerted.
    pub fn due_alerts(&mut self, state: &SimState, now: Instant) -> Vec<String> {
        let mut due = Vec::new();
        for rider in &state.opponents {
            let close = (rider.lane - state.player.lane).abs() < proximity::LATERAL_WINDOW
                && rider.relative_depth.abs() < proximity::DEPTH_WINDOW;
            if !close {
                continue;
            }
            let ready = self
                .last_alert
                .get(&rider.identity.id)
                .map_or(true, |last| now.saturating_duration_since(*last) >= self.interval);
            if ready {
                self.last_alert.insert(rider.identity.id.clone(), now);
                due.push(rider.identity.id.clone());
            }
        }
        due
    }
}

impl Default for ProximityTracker {
    fn default() -> Self {
        Self::new()
    }
}
