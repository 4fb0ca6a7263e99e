//! Wire protocol for the narrative service, plus the render snapshot
//!
//! Messages are JSON objects with a `type` discriminator in snake_case.
//! Unknown inbound kinds deserialize into [`InboundMessage::Unknown`] and are
//! dropped by the loop; extra fields on known kinds are ignored, so the
//! service can enrich messages without breaking older clients.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::feedback::{FeedbackBus, TransientEffects};
use crate::game::state::{AggressionClass, RacePhase, Reputation, SimState};
use crate::game::systems::progress;

/// Combat actions reported to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatAction {
    Hit,
}

/// Messages from client to service
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// A strike was swung at a rival
    CombatEvent {
        npc_id: String,
        action: CombatAction,
        success: bool,
    },
    /// The player is riding close to a rival
    ProximityAlert { npc_id: String },
    /// A speech transcript addressed to the riders
    VoiceInput { text: String },
}

/// Body of a `world_event` message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEventBody {
    pub title: String,
}

/// Messages from service to client
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// A rider says something; replaces the active dialogue line
    NpcDialogue {
        #[serde(default)]
        npc_name: Option<String>,
        text: String,
    },
    /// Directive overwriting a rider's desired lane
    NpcMove { npc_id: String, target_lane: f32 },
    /// A world event for the banner feed
    WorldEvent { event: WorldEventBody },
    /// Any message kind this client does not understand
    #[serde(other)]
    Unknown,
}

/// Session bootstrap response from `GET /session/new`
#[derive(Debug, Clone, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
}

/// Per-rival snapshot row
#[derive(Debug, Clone, Serialize)]
pub struct RivalSnapshot {
    pub id: String,
    pub name: String,
    pub color: String,
    pub aggression: AggressionClass,
    pub lane: f32,
    pub relative_depth: f32,
    pub speed: f32,
    pub hit: bool,
}

/// Banner row for the HUD feed
#[derive(Debug, Clone, Serialize)]
pub struct BannerSnapshot {
    pub id: Uuid,
    pub title: String,
}

/// Active dialogue line
#[derive(Debug, Clone, Serialize)]
pub struct DialogueSnapshot {
    pub speaker: String,
    pub text: String,
}

/// Per-frame state handed to the renderer and HUD.
///
/// This is the stable consumption contract: the renderer reads it, never the
/// simulation internals.
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub phase: RacePhase,
    pub player_lane: f32,
    pub player_speed: f32,
    pub player_distance: f32,
    pub rank_label: String,
    pub hit_stop_active: bool,
    pub shake_intensity: f32,
    pub reputation: Reputation,
    pub rivals: Vec<RivalSnapshot>,
    pub banners: Vec<BannerSnapshot>,
    pub dialogue: Option<DialogueSnapshot>,
}

impl RenderSnapshot {
    pub fn capture(state: &SimState, effects: &TransientEffects, feedback: &FeedbackBus) -> Self {
        let rank = state
            .race
            .final_rank
            .unwrap_or_else(|| progress::player_rank(state));
        Self {
            tick: state.tick,
            phase: state.race.phase,
            player_lane: state.player.lane,
            player_speed: state.player.speed,
            player_distance: state.player.distance,
            rank_label: progress::ordinal(rank),
            hit_stop_active: effects.hit_stop_active(),
            shake_intensity: effects.shake_intensity(),
            reputation: state.reputation,
            rivals: state
                .opponents
                .iter()
                .map(|rider| RivalSnapshot {
                    id: rider.identity.id.clone(),
                    name: rider.identity.name.clone(),
                    color: rider.identity.color.clone(),
                    aggression: rider.aggression,
                    lane: rider.lane,
                    relative_depth: rider.relative_depth,
                    speed: rider.speed,
                    hit: rider.is_hit(),
                })
                .collect(),
            banners: feedback
                .banners()
                .iter()
                .map(|b| BannerSnapshot {
                    id: b.id,
                    title: b.title.clone(),
                })
                .collect(),
            dialogue: feedback.dialogue().map(|d| DialogueSnapshot {
                speaker: d.speaker.clone(),
                text: d.text.clone(),
            }),
        }
    }

    /// Empty snapshot for the pre-race state
    pub fn empty() -> Self {
        Self {
            tick: 0,
            phase: RacePhase::Idle,
            player_lane: 0.0,
            player_speed: 0.0,
            player_distance: 0.0,
            rank_label: progress::ordinal(1),
            hit_stop_active: false,
            shake_intensity: 0.0,
            reputation: Reputation::default(),
            rivals: Vec::new(),
            banners: Vec::new(),
            dialogue: None,
        }
    }
}
