//! Rival rider maneuvering
//!
//! Per tick, per rival: converge toward the target lane, layer a class-tuned
//! weave on top, then re-evaluate the dodge decision against the player's
//! position. Lane work happens before distance integration within the tick.

use tracing::debug;

use crate::game::constants::{clamp_lane, rival};
use crate::game::state::SimState;
use crate::game::systems::away_from;

/// Tuning knobs that are not per-aggression-class
#[derive(Debug, Clone, Copy)]
pub struct RivalTuning {
    /// Seconds between dodge retargets for one rival. The source behavior
    /// re-fires every tick while the trigger holds; 0 preserves that.
    pub overtake_cooldown: f32,
}

impl Default for RivalTuning {
    fn default() -> Self {
        Self {
            overtake_cooldown: 0.0,
        }
    }
}

/// Advance every rival's lateral state for one tick
pub fn update(state: &mut SimState, tuning: &RivalTuning, dt: f32) {
    let player_lane = state.player.lane;
    let elapsed = state.race.elapsed;

    for rider in &mut state.opponents {
        if rider.overtake_cooldown > 0.0 {
            rider.overtake_cooldown = (rider.overtake_cooldown - dt).max(0.0);
        }
        if rider.hit_timer > 0.0 {
            rider.hit_timer = (rider.hit_timer - dt).max(0.0);
        }

        // Exponential approach: never overshoots, converges within epsilon.
        let converge = (rival::LANE_CONVERGE_RATE * dt).min(1.0);
        rider.lane += (rider.target_lane - rider.lane) * converge;

        // Weave is a lateral velocity term so a zero-length tick moves nothing.
        let weave = rider.aggression.weave_amplitude()
            * (rider.aggression.weave_rate() * elapsed + rider.weave_phase).sin();
        rider.lane = clamp_lane(rider.lane + weave * dt);

        // Dodge trigger: player close along-track and nearly in the same lane.
        let depth_window = rival::OVERTAKE_DEPTH * rider.aggression.trigger_depth_scale();
        let armed = rider.overtake_cooldown <= 0.0
            && rider.relative_depth.abs() < depth_window
            && (rider.lane - player_lane).abs() < rival::OVERTAKE_LATERAL;
        if armed {
            let side = away_from(rider.lane, player_lane);
            let new_target = clamp_lane(rider.lane + rival::OVERTAKE_STEP * side);
            if (new_target - rider.target_lane).abs() > f32::EPSILON {
                debug!(
                    rider = %rider.identity.id,
                    target = new_target,
                    "dodge retarget"
                );
            }
            rider.target_lane = new_target;
            rider.overtake_cooldown = tuning.overtake_cooldown;
        }
    }
}
