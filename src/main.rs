//! Headless race runner
//!
//! Drives the full simulation stack against the narrative service (or
//! offline when unreachable): one flat-out race with the stock grid, tick
//! loop at the fixed cadence, final standings on the finish line. The real
//! game embeds [`net::race_session::RaceSession`] behind a renderer; this
//! binary exercises the same path end to end.

mod config;
mod game;
mod net;
mod util;

use std::time::{Duration, Instant};

use tracing::{info, Level};

use crate::config::ClientConfig;
use crate::game::constants::kinematics::TICK_DURATION_MS;
use crate::game::input_buffer::InputIntent;
use crate::game::race_loop::{RaceLoopConfig, TickEvent};
use crate::game::systems::behavior::RivalTuning;
use crate::game::systems::progress::{self, ordinal};
use crate::net::race_session::RaceSession;
use crate::net::session::SessionChannel;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("Road Rash: Sentience simulation v{}", env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::load_or_default();
    config.validate().map_err(anyhow::Error::msg)?;
    info!(
        "Configuration loaded: service={}, distance_limit={}",
        config.service_url, config.distance_limit
    );

    let channel = if config.service_enabled {
        SessionChannel::connect(&config.service_url).await
    } else {
        SessionChannel::offline()
    };
    info!("Narrative channel state: {:?}", channel.state());

    let loop_config = RaceLoopConfig {
        distance_limit: config.distance_limit,
        rival_tuning: RivalTuning {
            overtake_cooldown: config.overtake_cooldown,
        },
    };
    let mut session = RaceSession::new(loop_config, channel);
    let intents = session.intent_sender();

    session.start_race(Instant::now());
    info!("Race started");

    // Headless run: hold the throttle flat out until the flag drops.
    intents.send(InputIntent::Throttle(true));

    let mut ticker = tokio::time::interval(Duration::from_millis(TICK_DURATION_MS));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for event in session.tick(Instant::now()) {
                    match event {
                        TickEvent::Impact { rider_id } => {
                            info!("Scraped {}", rider_id);
                        }
                        TickEvent::RaceFinished { rank } => {
                            info!("Checkered flag: {}", ordinal(rank));
                            for (position, entry) in
                                progress::live_ranking(session.race().state()).iter().enumerate()
                            {
                                info!(
                                    "{:>4}  {:<10} {:>6.0}m",
                                    ordinal(position + 1),
                                    entry.name,
                                    entry.distance
                                );
                            }
                            return Ok(());
                        }
                        _ => {}
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                return Ok(());
            }
        }
    }
}
