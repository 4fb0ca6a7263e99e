//! Vehicle kinematics
//!
//! Integrates forward speed from held pedal intents and distance from speed.
//! Steering is event-driven: each discrete press moves the lane by a fixed
//! step, there is no continuous lateral integration for the player.

use crate::game::constants::{clamp_lane, clamp_speed, kinematics, track};
use crate::game::state::{Player, SimState};

/// Discrete steering direction from a single key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteerDirection {
    Left,
    Right,
}

/// Advance the player's forward speed for one tick.
///
/// Braking dominates when both pedals are held; with neither held the bike
/// coasts against drag.
pub fn advance_player(player: &mut Player, dt: f32) {
    let accel = if player.braking {
        -kinematics::BRAKE_DECEL
    } else if player.accelerating {
        kinematics::THROTTLE_ACCEL
    } else {
        -kinematics::DRAG_DECEL
    };
    player.speed = clamp_speed(player.speed + accel * dt);
}

/// Apply one discrete steer press to the player
pub fn steer(player: &mut Player, direction: SteerDirection) {
    let step = match direction {
        SteerDirection::Left => -kinematics::STEER_STEP,
        SteerDirection::Right => kinematics::STEER_STEP,
    };
    player.lane = clamp_lane(player.lane + step);
}

/// Integrate distance for every racer with the shared scale so standings
/// compare like for like.
pub fn integrate_distances(state: &mut SimState, dt: f32) {
    state.player.distance += state.player.speed * track::DISTANCE_SCALE * dt;
    for rider in &mut state.opponents {
        rider.distance += rider.speed * track::DISTANCE_SCALE * dt;
    }
}
