//! Short-lived feedback state
//!
//! Banners and dialogue auto-expire against an explicit clock; hit-stop and
//! camera shake decay against wall-clock dt. Neither is gated by the physics
//! freeze: hit-stop pauses motion, not feedback.

use std::time::{Duration, Instant};

use smallvec::SmallVec;
use uuid::Uuid;

use crate::game::constants::feedback;

/// A transient HUD banner (world events)
#[derive(Debug, Clone)]
pub struct BannerEvent {
    /// Stable key for the HUD's enter/exit animations
    pub id: Uuid,
    pub title: String,
    created_at: Instant,
    ttl: Duration,
}

/// The single active dialogue line
#[derive(Debug, Clone)]
pub struct DialogueEvent {
    pub speaker: String,
    pub text: String,
    created_at: Instant,
    ttl: Duration,
}

/// TTL-expiring feedback events consumed by the HUD.
///
/// Banners keep only the most recent few: older ones are evicted immediately
/// on insert past the cap, independent of their TTL. Dialogue is singular; a
/// new line replaces the old one and restarts its expiry.
#[derive(Debug, Default)]
pub struct FeedbackBus {
    banners: SmallVec<[BannerEvent; feedback::BANNER_CAP]>,
    dialogue: Option<DialogueEvent>,
}

impl FeedbackBus {
    pub fn push_banner(&mut self, title: impl Into<String>, now: Instant) {
        self.banners.insert(
            0,
            BannerEvent {
                id: Uuid::new_v4(),
                title: title.into(),
                created_at: now,
                ttl: Duration::from_secs_f32(feedback::BANNER_TTL_SECS),
            },
        );
        self.banners.truncate(feedback::BANNER_CAP);
    }

    pub fn set_dialogue(
        &mut self,
        speaker: Option<String>,
        text: impl Into<String>,
        now: Instant,
    ) {
        self.dialogue = Some(DialogueEvent {
            speaker: speaker.unwrap_or_else(|| "Rider".to_string()),
            text: text.into(),
            created_at: now,
            ttl: Duration::from_secs_f32(feedback::DIALOGUE_TTL_SECS),
        });
    }

    /// Drop everything whose TTL has elapsed as of `now`
    pub fn prune(&mut self, now: Instant) {
        self.banners
            .retain(|b| now.saturating_duration_since(b.created_at) < b.ttl);
        if let Some(d) = &self.dialogue {
            if now.saturating_duration_since(d.created_at) >= d.ttl {
                self.dialogue = None;
            }
        }
    }

    /// Visible banners, newest first
    pub fn banners(&self) -> &[BannerEvent] {
        &self.banners
    }

    pub fn dialogue(&self) -> Option<&DialogueEvent> {
        self.dialogue.as_ref()
    }
}

/// Process-wide impact-feel state: hit-stop and camera shake.
///
/// Hit-stop freezes physics advancement while it runs; shake is read by the
/// camera and decays linearly to zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransientEffects {
    hit_stop_remaining: f32,
    shake: f32,
}

impl TransientEffects {
    pub fn trigger_shake(&mut self, magnitude: f32) {
        self.shake = self.shake.max(magnitude);
    }

    pub fn start_hit_stop(&mut self, secs: f32) {
        self.hit_stop_remaining = self.hit_stop_remaining.max(secs);
    }

    pub fn hit_stop_active(&self) -> bool {
        self.hit_stop_remaining > 0.0
    }

    pub fn shake_intensity(&self) -> f32 {
        self.shake
    }

    /// Advance decay by wall-clock dt. Runs every tick, frozen or not.
    pub fn decay(&mut self, dt: f32) {
        self.hit_stop_remaining = (self.hit_stop_remaining - dt).max(0.0);
        self.shake = (self.shake - feedback::SHAKE_DECAY * dt).max(0.0);
    }
}
