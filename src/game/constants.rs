/// Kinematics constants - accelerations are per second, applied scaled by dt.
pub mod kinematics {
    /// Throttle acceleration (speed units per second)
    pub const THROTTLE_ACCEL: f32 = 45.0;
    /// Brake deceleration (dominates throttle when both are held)
    pub const BRAKE_DECEL: f32 = 120.0;
    /// Coasting drag deceleration when neither pedal is held
    pub const DRAG_DECEL: f32 = 20.0;
    /// Maximum forward speed
    pub const MAX_SPEED: f32 = 240.0;
    /// Lateral step applied per discrete steer press
    pub const STEER_STEP: f32 = 0.5;
    /// Maximum dt fed into integration; larger wall-clock gaps (tab stall,
    /// debugger pause) are clamped instead of producing a teleport.
    pub const MAX_DT: f32 = 0.25;
    /// Simulation tick rate in Hz
    pub const TICK_RATE: u32 = 60;
    /// Tick duration in milliseconds
    pub const TICK_DURATION_MS: u64 = 1000 / TICK_RATE as u64;
}

/// Track geometry and race length
pub mod track {
    /// Leftmost lane coordinate
    pub const LANE_MIN: f32 = -4.0;
    /// Rightmost lane coordinate
    pub const LANE_MAX: f32 = 4.0;
    /// Distance a racer must cover to finish
    pub const DISTANCE_LIMIT: f32 = 3000.0;
    /// Reference cruising speed used to calibrate the distance scale
    pub const CRUISE_SPEED: f32 = 150.0;
    /// Target duration of a race ridden flat at cruise speed (seconds)
    pub const TARGET_RACE_SECS: f32 = 60.0;
    /// Distance integration scale: at CRUISE_SPEED the full DISTANCE_LIMIT
    /// takes TARGET_RACE_SECS. Identical for player and rivals so ranking
    /// stays speed-comparable.
    pub const DISTANCE_SCALE: f32 = DISTANCE_LIMIT / (CRUISE_SPEED * TARGET_RACE_SECS);
}

/// Rival rider maneuvering constants
pub mod rival {
    /// Exponential lane convergence rate (per second)
    pub const LANE_CONVERGE_RATE: f32 = 2.0;
    /// Along-track window (|relative depth|) inside which a rival considers
    /// the player close enough to dodge
    pub const OVERTAKE_DEPTH: f32 = 10.0;
    /// Lateral window to the player's lane that arms the dodge
    pub const OVERTAKE_LATERAL: f32 = 1.0;
    /// Lanes stepped sideways when retargeting
    pub const OVERTAKE_STEP: f32 = 2.0;
    /// Base rival cruising speed
    pub const BASE_SPEED: f32 = 140.0;
    /// Random spread applied to each rival's starting speed
    pub const SPEED_JITTER: f32 = 8.0;
}

/// Collision and strike resolution constants
pub mod collision {
    /// Planar (lane delta, relative depth) distance below which two bikes touch
    pub const CONTACT_RADIUS: f32 = 1.5;
    /// Camera shake magnitude for a passive scrape
    pub const BUMP_SHAKE: f32 = 1.5;
    /// Camera shake magnitude for a landed strike
    pub const STRIKE_SHAKE: f32 = 3.0;
    /// Hit-stop freeze length after a landed strike (seconds)
    pub const HIT_STOP_SECS: f32 = 0.12;
    /// Player speed penalty while scraping (per second, scaled by dt)
    pub const SPEED_PENALTY: f32 = 120.0;
    /// Fixed lateral shove applied to the player, away from the other bike
    pub const LANE_PUSH: f32 = 0.35;
    /// Flat speed boost given to a struck/scraped rival (it accelerates away)
    pub const RIVAL_BOOST: f32 = 12.0;
    /// Maximum planar reach of a strike
    pub const STRIKE_RANGE: f32 = 2.5;
    /// How long a rival renders as "hit" after contact (seconds)
    pub const HIT_FLASH_SECS: f32 = 0.3;
}

/// Feedback bus timings
pub mod feedback {
    /// Banner lifetime (seconds)
    pub const BANNER_TTL_SECS: f32 = 4.0;
    /// Dialogue lifetime (seconds)
    pub const DIALOGUE_TTL_SECS: f32 = 5.0;
    /// Most recent banners kept visible at once
    pub const BANNER_CAP: usize = 3;
    /// Camera shake decay rate (intensity units per second)
    pub const SHAKE_DECAY: f32 = 7.5;
}

/// Outbound notification thresholds
pub mod proximity {
    /// Minimum interval between proximity alerts per rival (seconds)
    pub const ALERT_INTERVAL_SECS: f32 = 3.0;
    /// Lateral window that counts as riding close
    pub const LATERAL_WINDOW: f32 = 1.0;
    /// Along-track window that counts as riding close
    pub const DEPTH_WINDOW: f32 = 15.0;
}

/// Reputation adjustments (display state forwarded to the HUD)
pub mod reputation {
    /// Brutality gained per landed strike
    pub const STRIKE_BRUTALITY: f32 = 0.05;
    /// Heat gained for striking the police rider
    pub const POLICE_HEAT: f32 = 0.2;
}

/// Clamp a lateral coordinate to the track width
#[inline]
pub fn clamp_lane(lane: f32) -> f32 {
    lane.clamp(track::LANE_MIN, track::LANE_MAX)
}

/// Clamp a forward speed to the legal range
#[inline]
pub fn clamp_speed(speed: f32) -> f32 {
    speed.clamp(0.0, kinematics::MAX_SPEED)
}

/// Clamp an elapsed wall-clock delta to the integration maximum
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    dt.clamp(0.0, kinematics::MAX_DT)
}
