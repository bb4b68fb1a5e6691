//! Game balance configuration
//!
//! Persisted separately from scores (LocalStorage on web, JSON file natively).

use serde::{Deserialize, Serialize};

/// How chasers report their heading to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ChaserHeading {
    /// Always face up
    #[default]
    FixedUp,
    /// Face the direction of travel toward the player
    TrackMovement,
}

/// Spawn intervals in frames, one per spawnable category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnRates {
    pub island: u64,
    pub turret_island: u64,
    pub chaser: u64,
    pub bomber: u64,
    pub power_up: u64,
}

impl Default for SpawnRates {
    fn default() -> Self {
        Self {
            island: 80,
            turret_island: 120,
            chaser: 160,
            bomber: 200,
            power_up: 600,
        }
    }
}

/// Numeric configuration bundle consumed by the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Turret bullet speed (units/tick)
    pub bullet_speed: f32,
    /// Bomber bomb fall speed (units/tick)
    pub bomb_speed: f32,
    /// Base chaser speed (units/tick), each chaser adds up to +0.3
    pub enemy_speed: f32,
    /// Score at which turret islands start spawning
    pub turret_unlock_score: u64,
    /// Score at which chasers start spawning
    pub chaser_unlock_score: u64,
    /// Score at which bombers start spawning
    pub bomber_unlock_score: u64,
    /// Maximum concurrently active chasers
    pub max_chasers: usize,
    /// Invulnerability window after the shield is consumed (ticks)
    pub invulnerability_duration: u32,
    /// How long a disable-enemies pickup freezes chasers (ticks)
    pub enemy_disable_duration: u32,
    /// Base spawn intervals before difficulty scaling
    pub base_spawn_rates: SpawnRates,
    /// Chaser heading presentation
    pub chaser_heading: ChaserHeading,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bullet_speed: 4.0,
            bomb_speed: 4.0,
            enemy_speed: 1.8,
            turret_unlock_score: 100,
            chaser_unlock_score: 200,
            bomber_unlock_score: 300,
            max_chasers: 3,
            invulnerability_duration: 180,
            enemy_disable_duration: 450,
            base_spawn_rates: SpawnRates::default(),
            chaser_heading: ChaserHeading::FixedUp,
        }
    }
}

impl GameConfig {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "island_dodge_config";

    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring malformed stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }

    /// Load config from `ISLAND_DODGE_CONFIG` or `config/island_dodge.json`,
    /// falling back to defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let candidates = std::env::var("ISLAND_DODGE_CONFIG")
            .ok()
            .into_iter()
            .chain(std::iter::once("config/island_dodge.json".to_string()));

        for path in candidates {
            let Ok(contents) = std::fs::read_to_string(&path) else {
                continue;
            };
            match Self::from_json(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path);
                    return config;
                }
                Err(e) => log::warn!("Ignoring malformed config {}: {}", path, e),
            }
        }

        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_balance_sheet() {
        let config = GameConfig::default();
        assert_eq!(config.max_chasers, 3);
        assert_eq!(config.invulnerability_duration, 180);
        assert_eq!(config.enemy_disable_duration, 450);
        assert_eq!(config.base_spawn_rates.power_up, 600);
        assert_eq!(config.chaser_heading, ChaserHeading::FixedUp);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            GameConfig::from_json(r#"{ "max_chasers": 5, "base_spawn_rates": { "island": 40 } }"#)
                .unwrap();
        assert_eq!(config.max_chasers, 5);
        assert_eq!(config.base_spawn_rates.island, 40);
        assert_eq!(config.base_spawn_rates.chaser, 160);
        assert!((config.bullet_speed - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(GameConfig::from_json("{ not json").is_err());
    }
}
