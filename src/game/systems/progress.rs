//! Race progress tracking and standings
//!
//! Distances are integrated by the kinematics system; this module derives
//! relative depths, the live standings, and the player-authoritative finish.

use tracing::info;

use crate::game::state::{RacePhase, SimState};

/// One row of the live standings
#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    pub name: String,
    pub distance: f32,
    pub is_player: bool,
}

/// Recompute every rival's along-track offset from the player.
///
/// The spawn stagger is a constant fold so each racer's own distance can
/// start at zero and stay monotone.
pub fn sync_depths(state: &mut SimState) {
    let player_distance = state.player.distance;
    for rider in &mut state.opponents {
        rider.relative_depth = rider.spawn_depth + (rider.distance - player_distance);
    }
}

/// Live standings: all racers by distance descending. The sort is stable, so
/// equal distances keep roster order (player first).
pub fn live_ranking(state: &SimState) -> Vec<RankEntry> {
    let mut entries = Vec::with_capacity(1 + state.opponents.len());
    entries.push(RankEntry {
        name: "YOU".to_string(),
        distance: state.player.distance,
        is_player: true,
    });
    for rider in &state.opponents {
        entries.push(RankEntry {
            name: rider.identity.name.clone(),
            distance: rider.distance,
            is_player: false,
        });
    }
    entries.sort_by(|a, b| {
        b.distance
            .partial_cmp(&a.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries
}

/// The player's 1-based position in the live standings
pub fn player_rank(state: &SimState) -> usize {
    live_ranking(state)
        .iter()
        .position(|entry| entry.is_player)
        .map(|idx| idx + 1)
        .unwrap_or(1)
}

/// Ordinal label for a rank: 1st, 2nd, 3rd, 4th, ... 11th/12th/13th included
pub fn ordinal(rank: usize) -> String {
    let suffix = match (rank % 10, rank % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{rank}{suffix}")
}

/// Latch the finish once the player has covered the full distance.
///
/// Rival completion never ends the race. Returns true on the tick the latch
/// flips.
pub fn update(state: &mut SimState) -> bool {
    if state.race.phase != RacePhase::Racing || state.race.finished {
        return false;
    }
    if state.player.distance < state.race.distance_limit {
        return false;
    }

    let rank = player_rank(state);
    state.race.finished = true;
    state.race.phase = RacePhase::Finished;
    state.race.final_rank = Some(rank);
    state.player.speed = 0.0;
    info!(rank = %ordinal(rank), "race finished");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::track::DISTANCE_LIMIT;
    use crate::game::state::{AggressionClass, Opponent, RiderIdentity};

    fn rider(id: &str, name: &str, distance: f32) -> Opponent {
        let mut r = Opponent::new(
            RiderIdentity::new(id, name, "gray"),
            AggressionClass::Neutral,
            0.0,
            -20.0,
        );
        r.distance = distance;
        r
    }

    fn state_with(riders: Vec<Opponent>) -> SimState {
        let mut state = SimState::new(DISTANCE_LIMIT);
        state.opponents = riders;
        state.race.phase = RacePhase::Racing;
        state
    }

    #[test]
    fn test_ranking_order() {
        let mut state = state_with(vec![
            rider("rider_1", "AXEL-7", 3000.0),
            rider("rider_2", "TASHA-V", 2800.0),
        ]);
        state.player.distance = 2950.0;

        let ranking = live_ranking(&state);
        let names: Vec<&str> = ranking.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["AXEL-7", "YOU", "TASHA-V"]);
        assert_eq!(player_rank(&state), 2);
    }

    #[test]
    fn test_ranking_ties_keep_roster_order() {
        let mut state = state_with(vec![
            rider("rider_1", "AXEL-7", 1000.0),
            rider("rider_2", "TASHA-V", 1000.0),
        ]);
        state.player.distance = 1000.0;

        let ranking = live_ranking(&state);
        let names: Vec<&str> = ranking.iter().map(|e| e.name.as_str()).collect();
        // Stable sort: input order player, AXEL-7, TASHA-V survives the tie.
        assert_eq!(names, vec!["YOU", "AXEL-7", "TASHA-V"]);
    }

    #[test]
    fn test_finish_latch() {
        let mut state = state_with(vec![rider("rider_1", "AXEL-7", 100.0)]);
        state.player.distance = DISTANCE_LIMIT;
        state.player.speed = 180.0;

        assert!(update(&mut state));
        assert!(state.race.finished);
        assert_eq!(state.race.phase, RacePhase::Finished);
        assert_eq!(state.player.speed, 0.0);
        assert_eq!(state.race.final_rank, Some(1));

        // Latched: further updates change nothing and report no new finish.
        state.player.speed = 50.0;
        assert!(!update(&mut state));
        assert!(state.race.finished);
    }

    #[test]
    fn test_rival_finish_does_not_end_race() {
        let mut state = state_with(vec![rider("rider_1", "AXEL-7", DISTANCE_LIMIT + 50.0)]);
        state.player.distance = 500.0;

        assert!(!update(&mut state));
        assert!(!state.race.finished);
        assert_eq!(state.race.phase, RacePhase::Racing);
    }

    #[test]
    fn test_finish_rank_includes_rivals() {
        let mut state = state_with(vec![
            rider("rider_1", "AXEL-7", DISTANCE_LIMIT + 100.0),
            rider("rider_2", "TASHA-V", 200.0),
        ]);
        state.player.distance = DISTANCE_LIMIT;

        update(&mut state);
        assert_eq!(state.race.final_rank, Some(2));
    }

    #[test]
    fn test_sync_depths() {
        let mut state = state_with(vec![rider("rider_1", "AXEL-7", 30.0)]);
        state.player.distance = 50.0;

        sync_depths(&mut state);

        // spawn -20 plus (30 - 50) = -40: the rival has fallen further back.
        assert!((state.opponents[0].relative_depth + 40.0).abs() < 0.001);
    }

    #[test]
    fn test_ordinal_labels() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
    }
}
