use crate::game::constants::track;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// HTTP base url of the narrative service
    pub service_url: String,
    /// Whether to attempt the service connection at all
    pub service_enabled: bool,
    /// Distance a racer must cover to finish
    pub distance_limit: f32,
    /// Debounce for the rival dodge decision (0 = re-fire every tick, the
    /// shipped behavior)
    pub overtake_cooldown: f32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:8000".to_string(),
            service_enabled: true,
            distance_limit: track::DISTANCE_LIMIT,
            overtake_cooldown: 0.0,
        }
    }
}

impl ClientConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("NARRATIVE_URL") {
            if url.starts_with("http://") || url.starts_with("https://") {
                config.service_url = url;
            } else {
                tracing::warn!("Invalid NARRATIVE_URL '{}', using default", url);
            }
        }

        if let Ok(enabled) = std::env::var("NARRATIVE_ENABLED") {
            match enabled.parse::<bool>() {
                Ok(parsed) => config.service_enabled = parsed,
                Err(_) => tracing::warn!(
                    "Invalid NARRATIVE_ENABLED '{}', using default",
                    enabled
                ),
            }
        }

        if let Ok(limit) = std::env::var("DISTANCE_LIMIT") {
            match limit.parse::<f32>() {
                Ok(parsed) if parsed > 0.0 => config.distance_limit = parsed,
                _ => tracing::warn!("DISTANCE_LIMIT must be > 0, using default"),
            }
        }

        if let Ok(cooldown) = std::env::var("OVERTAKE_COOLDOWN") {
            match cooldown.parse::<f32>() {
                Ok(parsed) if parsed >= 0.0 => config.overtake_cooldown = parsed,
                _ => tracing::warn!("OVERTAKE_COOLDOWN must be >= 0, using default"),
            }
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), String> {
        if !self.service_url.starts_with("http://") && !self.service_url.starts_with("https://") {
            return Err(format!("unsupported service url: {}", self.service_url));
        }
        if self.distance_limit <= 0.0 {
            return Err("distance_limit must be > 0".to_string());
        }
        if self.overtake_cooldown < 0.0 {
            return Err("overtake_cooldown cannot be negative".to_string());
        }
        Ok(())
    }
}
