//! Collision detection and response
//!
//! Runs after the motion update. Each touching rival is resolved
//! independently in the same tick; simultaneous contacts compound with no
//! combined-impulse pass.

use crate::game::constants::{clamp_lane, clamp_speed, collision, reputation};
use crate::game::feedback::TransientEffects;
use crate::game::state::{AggressionClass, SimState};
use crate::game::systems::away_from;
use crate::util::vec2::Vec2;

/// A contact between the player and one rival this tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Impact {
    pub rider_id: String,
}

/// Result of a strike input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrikeOutcome {
    pub rider_id: String,
    pub success: bool,
}

/// Planar separation between the player and a rival: lateral lane delta on
/// one axis, along-track relative depth on the other.
fn separation(player_lane: f32, rival_lane: f32, relative_depth: f32) -> f32 {
    Vec2::new(player_lane - rival_lane, relative_depth).length()
}

/// Detect and resolve all player/rival contacts for this tick
pub fn resolve(state: &mut SimState, effects: &mut TransientEffects, dt: f32) -> Vec<Impact> {
    let mut impacts = Vec::new();
    let player_lane = state.player.lane;

    for rider in &mut state.opponents {
        let dist = separation(player_lane, rider.lane, rider.relative_depth);
        if dist >= collision::CONTACT_RADIUS {
            continue;
        }

        effects.trigger_shake(collision::BUMP_SHAKE);

        // Scrape penalty: bleed speed and shove the player off the rival.
        state.player.speed = clamp_speed(state.player.speed - collision::SPEED_PENALTY * dt);
        let side = away_from(state.player.lane, rider.lane);
        state.player.lane = clamp_lane(state.player.lane + collision::LANE_PUSH * side);

        // The rival guns it to get clear.
        rider.speed = clamp_speed(rider.speed + collision::RIVAL_BOOST);
        rider.hit_timer = collision::HIT_FLASH_SECS;

        impacts.push(Impact {
            rider_id: rider.identity.id.clone(),
        });
    }

    impacts
}

/// Resolve a strike input against the nearest rival.
///
/// The swing always shakes the camera; a landed hit additionally freezes the
/// simulation briefly, boosts the struck rival, and moves the reputation
/// meters. Returns `None` when there is nobody to swing at.
pub fn strike(state: &mut SimState, effects: &mut TransientEffects) -> Option<StrikeOutcome> {
    let player_lane = state.player.lane;
    let target_idx = state
        .opponents
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            let da = separation(player_lane, a.lane, a.relative_depth);
            let db = separation(player_lane, b.lane, b.relative_depth);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)?;

    effects.trigger_shake(collision::STRIKE_SHAKE);

    let rider = &mut state.opponents[target_idx];
    let dist = separation(player_lane, rider.lane, rider.relative_depth);
    let success = dist < collision::STRIKE_RANGE;
    if success {
        effects.start_hit_stop(collision::HIT_STOP_SECS);
        rider.speed = clamp_speed(rider.speed + collision::RIVAL_BOOST);
        rider.hit_timer = collision::HIT_FLASH_SECS;

        let struck_police = rider.aggression == AggressionClass::Police;
        state.reputation.add_brutality(reputation::STRIKE_BRUTALITY);
        if struck_police {
            state.reputation.add_heat(reputation::POLICE_HEAT);
        }
    }

    Some(StrikeOutcome {
        rider_id: state.opponents[target_idx].identity.id.clone(),
        success,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::track::DISTANCE_LIMIT;
    use crate::game::state::{Opponent, RiderIdentity};

    const DT: f32 = 1.0 / 60.0;

    fn rider(id: &str, lane: f32, depth: f32, aggression: AggressionClass) -> Opponent {
        Opponent::new(RiderIdentity::new(id, id, "gray"), aggression, lane, depth)
    }

    fn state_with(riders: Vec<Opponent>) -> SimState {
        let mut state = SimState::new(DISTANCE_LIMIT);
        state.opponents = riders;
        state
    }

    #[test]
    fn test_contact_response() {
        // Player at lane 0, rival at 0.5 dead alongside: separation 0.5 is a
        // contact. Shake fires, the player slows and is pushed negative, and
        // the rival speeds up.
        let mut r = rider("rider_1", 0.5, 0.0, AggressionClass::Neutral);
        r.speed = 100.0;
        let mut state = state_with(vec![r]);
        state.player.lane = 0.0;
        state.player.speed = 150.0;
        let mut effects = TransientEffects::default();

        let impacts = resolve(&mut state, &mut effects, DT);

        assert_eq!(impacts.len(), 1);
        assert_eq!(impacts[0].rider_id, "rider_1");
        assert!(effects.shake_intensity() > 0.0);
        assert!(state.player.speed < 150.0);
        assert!(state.player.lane < 0.0, "pushed away from lane 0.5");
        assert!(state.opponents[0].speed > 100.0);
        assert!(state.opponents[0].is_hit());
    }

    #[test]
    fn test_no_contact_outside_radius() {
        let r = rider("rider_1", 0.5, 30.0, AggressionClass::Neutral);
        let mut state = state_with(vec![r]);
        state.player.speed = 150.0;
        let mut effects = TransientEffects::default();

        let impacts = resolve(&mut state, &mut effects, DT);

        assert!(impacts.is_empty());
        assert_eq!(effects.shake_intensity(), 0.0);
        assert_eq!(state.player.speed, 150.0);
    }

    #[test]
    fn test_simultaneous_contacts_compound() {
        let a = rider("rider_1", 0.5, 0.0, AggressionClass::Neutral);
        let b = rider("rider_2", -0.5, 0.5, AggressionClass::Neutral);
        let mut state = state_with(vec![a, b]);
        state.player.speed = 150.0;
        let mut effects = TransientEffects::default();

        let impacts = resolve(&mut state, &mut effects, DT);

        assert_eq!(impacts.len(), 2);
        // Both penalties applied independently.
        let expected = 150.0 - 2.0 * collision::SPEED_PENALTY * DT;
        assert!((state.player.speed - expected).abs() < 0.001);
    }

    #[test]
    fn test_speed_penalty_floors_at_zero() {
        let r = rider("rider_1", 0.2, 0.0, AggressionClass::Neutral);
        let mut state = state_with(vec![r]);
        state.player.speed = 0.5;
        let mut effects = TransientEffects::default();

        resolve(&mut state, &mut effects, 1.0);

        assert_eq!(state.player.speed, 0.0);
    }

    #[test]
    fn test_strike_hits_nearest() {
        let near = rider("rider_1", 1.0, 1.0, AggressionClass::Neutral);
        let far = rider("rider_2", -2.0, -50.0, AggressionClass::Neutral);
        let mut state = state_with(vec![far, near]);
        state.player.lane = 0.5;
        let mut effects = TransientEffects::default();

        let outcome = strike(&mut state, &mut effects).unwrap();

        assert_eq!(outcome.rider_id, "rider_1");
        assert!(outcome.success);
        assert!(effects.hit_stop_active());
        assert!((effects.shake_intensity() - collision::STRIKE_SHAKE).abs() < 0.001);
        assert!(state.opponent("rider_1").unwrap().is_hit());
        assert!(state.reputation.brutality > 0.0);
    }

    #[test]
    fn test_strike_misses_out_of_range() {
        let r = rider("rider_1", 2.0, -40.0, AggressionClass::Neutral);
        let mut state = state_with(vec![r]);
        let mut effects = TransientEffects::default();

        let outcome = strike(&mut state, &mut effects).unwrap();

        assert!(!outcome.success);
        // The swing still shakes but never freezes time.
        assert!(effects.shake_intensity() > 0.0);
        assert!(!effects.hit_stop_active());
        assert_eq!(state.reputation.brutality, 0.0);
    }

    #[test]
    fn test_strike_on_police_raises_heat() {
        let cop = rider("rider_3", 0.5, 0.0, AggressionClass::Police);
        let mut state = state_with(vec![cop]);
        let mut effects = TransientEffects::default();

        let outcome = strike(&mut state, &mut effects).unwrap();

        assert!(outcome.success);
        assert!(state.reputation.heat > 0.0);
    }

    #[test]
    fn test_strike_with_empty_grid() {
        let mut state = state_with(Vec::new());
        let mut effects = TransientEffects::default();
        assert!(strike(&mut state, &mut effects).is_none());
    }
}
