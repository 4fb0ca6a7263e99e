//! Simulation state definitions
//!
//! One player, a fixed rival roster, race bookkeeping, and the HUD-facing
//! reputation meters. All mutation goes through the tick loop; inbound
//! network mutations are whole-value overwrites (see `race_loop`).

use std::hash::{Hash, Hasher};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::game::constants::{clamp_lane, clamp_speed, rival, track};

/// Behavioral archetype of a rival rider.
///
/// Governs weave amplitude and how eagerly the rider dodges the player. New
/// archetypes are additive: give the variant its own tuning values below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggressionClass {
    Neutral,
    Aggressive,
    Police,
}

impl AggressionClass {
    /// Lateral weave amplitude (lane units per second)
    pub fn weave_amplitude(self) -> f32 {
        match self {
            AggressionClass::Neutral => 0.6,
            AggressionClass::Aggressive => 1.2,
            AggressionClass::Police => 0.4,
        }
    }

    /// Weave oscillation rate (radians per second)
    pub fn weave_rate(self) -> f32 {
        match self {
            AggressionClass::Neutral => 1.2,
            AggressionClass::Aggressive => 2.4,
            AggressionClass::Police => 1.0,
        }
    }

    /// Scale factor on the along-track window that arms the dodge trigger
    pub fn trigger_depth_scale(self) -> f32 {
        match self {
            AggressionClass::Neutral => 1.0,
            AggressionClass::Aggressive => 1.4,
            AggressionClass::Police => 0.8,
        }
    }
}

/// Immutable identity of a rival rider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiderIdentity {
    /// Stable id used on the wire (`npc_id`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Color token consumed by the renderer
    pub color: String,
}

impl RiderIdentity {
    pub fn new(id: &str, name: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

/// A rival rider
#[derive(Debug, Clone)]
pub struct Opponent {
    /// Current lateral position, always within the track
    pub lane: f32,
    /// Desired lane the rider converges toward
    pub target_lane: f32,
    /// Forward speed
    pub speed: f32,
    /// Total distance covered since race start (never decreases)
    pub distance: f32,
    /// Signed along-track offset relative to the player (derived each tick)
    pub relative_depth: f32,
    /// Starting along-track stagger folded into `relative_depth`
    pub spawn_depth: f32,
    /// Stable weave phase so riders oscillate out of sync
    pub weave_phase: f32,
    /// Seconds until the dodge decision may re-fire (0 = armed)
    pub overtake_cooldown: f32,
    /// Render flash countdown after being struck or scraped
    pub hit_timer: f32,
    pub aggression: AggressionClass,
    pub identity: RiderIdentity,
}

impl Opponent {
    pub fn new(
        identity: RiderIdentity,
        aggression: AggressionClass,
        lane: f32,
        spawn_depth: f32,
    ) -> Self {
        let weave_phase = stable_phase(&identity.id);
        Self {
            lane: clamp_lane(lane),
            target_lane: clamp_lane(lane),
            speed: rival::BASE_SPEED,
            distance: 0.0,
            relative_depth: spawn_depth,
            spawn_depth,
            weave_phase,
            overtake_cooldown: 0.0,
            hit_timer: 0.0,
            aggression,
            identity,
        }
    }

    /// Whether the rider should currently render with the hit flash
    pub fn is_hit(&self) -> bool {
        self.hit_timer > 0.0
    }
}

/// Derive a stable oscillation phase in [0, TAU) from a rider id
fn stable_phase(id: &str) -> f32 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    id.hash(&mut hasher);
    let raw = hasher.finish();
    (raw % 10_000) as f32 / 10_000.0 * std::f32::consts::TAU
}

/// The player's bike
#[derive(Debug, Clone, Default)]
pub struct Player {
    /// Lateral position, mutated directly by discrete steer presses
    pub lane: f32,
    /// Forward speed
    pub speed: f32,
    /// Total distance covered since race start (never decreases)
    pub distance: f32,
    /// Throttle held
    pub accelerating: bool,
    /// Brake held (dominates throttle)
    pub braking: bool,
}

/// HUD reputation meters, each clamped to [0, 1]
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Reputation {
    pub brutality: f32,
    pub heat: f32,
}

impl Reputation {
    pub fn add_brutality(&mut self, amount: f32) {
        self.brutality = (self.brutality + amount).clamp(0.0, 1.0);
    }

    pub fn add_heat(&mut self, amount: f32) {
        self.heat = (self.heat + amount).clamp(0.0, 1.0);
    }
}

/// Race lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RacePhase {
    /// No race running (menu)
    Idle,
    /// Race in progress
    Racing,
    /// Player crossed the line; latched until an explicit new race
    Finished,
}

/// Race bookkeeping owned by the progress tracker
#[derive(Debug, Clone)]
pub struct RaceState {
    /// Distance a racer must cover to finish (fixed per race)
    pub distance_limit: f32,
    /// One-way false -> true latch, set when the player crosses the line
    pub finished: bool,
    pub phase: RacePhase,
    /// Wall-clock start of the current race
    pub started_at: Option<Instant>,
    /// Simulation seconds since race start (frozen during hit-stop)
    pub elapsed: f32,
    /// Player's position in the standings at finish time (1-based)
    pub final_rank: Option<usize>,
}

impl RaceState {
    pub fn new(distance_limit: f32) -> Self {
        Self {
            distance_limit,
            finished: false,
            phase: RacePhase::Idle,
            started_at: None,
            elapsed: 0.0,
            final_rank: None,
        }
    }
}

impl Default for RaceState {
    fn default() -> Self {
        Self::new(track::DISTANCE_LIMIT)
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    pub tick: u64,
    pub player: Player,
    /// Fixed for the session; roster order is the ranking tie-break order
    pub opponents: Vec<Opponent>,
    pub race: RaceState,
    pub reputation: Reputation,
}

impl SimState {
    pub fn new(distance_limit: f32) -> Self {
        Self {
            tick: 0,
            player: Player::default(),
            opponents: Vec::new(),
            race: RaceState::new(distance_limit),
            reputation: Reputation::default(),
        }
    }

    /// The stock three-rider grid from the shipped campaign
    pub fn with_default_roster(distance_limit: f32) -> Self {
        use rand::Rng;
        let mut state = Self::new(distance_limit);
        let mut rng = rand::thread_rng();

        let grid = [
            ("rider_1", "AXEL-7", "orange", AggressionClass::Aggressive, -2.0, -20.0),
            ("rider_2", "TASHA-V", "purple", AggressionClass::Neutral, 2.0, -40.0),
            ("rider_3", "MILLER-COP", "blue", AggressionClass::Police, 0.0, -60.0),
        ];
        for (id, name, color, aggression, lane, depth) in grid {
            let mut rider =
                Opponent::new(RiderIdentity::new(id, name, color), aggression, lane, depth);
            rider.speed = clamp_speed(
                rival::BASE_SPEED + rng.gen_range(-rival::SPEED_JITTER..rival::SPEED_JITTER),
            );
            state.opponents.push(rider);
        }
        state
    }

    pub fn opponent(&self, id: &str) -> Option<&Opponent> {
        self.opponents.iter().find(|o| o.identity.id == id)
    }

    pub fn opponent_mut(&mut self, id: &str) -> Option<&mut Opponent> {
        self.opponents.iter_mut().find(|o| o.identity.id == id)
    }

    /// Reset progress and enter the Racing phase. Roster identities and
    /// reputation survive; distances and the finish latch do not.
    pub fn start_race(&mut self, now: Instant) {
        self.player.distance = 0.0;
        self.player.speed = 0.0;
        self.player.lane = clamp_lane(self.player.lane);
        self.player.accelerating = false;
        self.player.braking = false;
        for rider in &mut self.opponents {
            rider.distance = 0.0;
            rider.relative_depth = rider.spawn_depth;
            rider.target_lane = rider.lane;
            rider.overtake_cooldown = 0.0;
            rider.hit_timer = 0.0;
        }
        self.race = RaceState::new(self.race.distance_limit);
        self.race.phase = RacePhase::Racing;
        self.race.started_at = Some(now);
    }
}
