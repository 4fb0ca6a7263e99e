//! Race session glue
//!
//! Owns the simulation loop, the narrative channel, and the published render
//! snapshot. Each tick: drain inbound service messages into the loop, run
//! the tick, translate tick events into outbound messages, send any due
//! proximity alerts, and publish a fresh snapshot for the renderer.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use crate::game::input_buffer::IntentSender;
use crate::game::race_loop::{RaceLoop, RaceLoopConfig, TickEvent};
use crate::game::state::RacePhase;
use crate::net::protocol::{CombatAction, OutboundMessage, RenderSnapshot};
use crate::net::proximity::ProximityTracker;
use crate::net::session::{ChannelState, SessionChannel};

pub struct RaceSession {
    race: RaceLoop,
    channel: SessionChannel,
    proximity: ProximityTracker,
    snapshot: Arc<RwLock<RenderSnapshot>>,
}

impl RaceSession {
    pub fn new(config: RaceLoopConfig, channel: SessionChannel) -> Self {
        Self {
            race: RaceLoop::new(config),
            channel,
            proximity: ProximityTracker::new(),
            snapshot: Arc::new(RwLock::new(RenderSnapshot::empty())),
        }
    }

    /// Submit handle for key/voice input sources
    pub fn intent_sender(&self) -> IntentSender {
        self.race.intent_sender()
    }

    /// Shared handle the renderer reads each frame
    pub fn snapshot_handle(&self) -> Arc<RwLock<RenderSnapshot>> {
        self.snapshot.clone()
    }

    pub fn channel_state(&self) -> ChannelState {
        self.channel.state()
    }

    pub fn race(&self) -> &RaceLoop {
        &self.race
    }

    pub fn race_mut(&mut self) -> &mut RaceLoop {
        &mut self.race
    }

    pub fn start_race(&mut self, now: Instant) {
        self.race.start_race(now);
    }

    /// Run one tick and fan results out to the service and the snapshot
    pub fn tick(&mut self, now: Instant) -> Vec<TickEvent> {
        // Defined drain point: service mutations land before the tick runs.
        for message in self.channel.drain_inbound() {
            self.race.apply_inbound(message, now);
        }

        let events = self.race.tick(now);

        for event in &events {
            match event {
                TickEvent::Strike { rider_id, success } => {
                    self.channel.send(OutboundMessage::CombatEvent {
                        npc_id: rider_id.clone(),
                        action: CombatAction::Hit,
                        success: *success,
                    });
                }
                TickEvent::Voice { text } => {
                    self.channel.send(OutboundMessage::VoiceInput { text: text.clone() });
                }
                // Scrapes and the finish are local affairs.
                TickEvent::Impact { .. } | TickEvent::RaceFinished { .. } => {}
            }
        }

        if self.race.state().race.phase == RacePhase::Racing {
            for npc_id in self.proximity.due_alerts(self.race.state(), now) {
                self.channel
                    .send(OutboundMessage::ProximityAlert { npc_id });
            }
        }

        *self.snapshot.write() =
            RenderSnapshot::capture(self.race.state(), self.race.effects(), self.race.feedback());

        events
    }
}
