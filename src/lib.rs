//! Island Dodge - steer a boat through drifting islands, turrets and bombers
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, AI, collisions, status effects)
//! - `session`: Run lifecycle (start/over/restart) and the final score save
//! - `config`: Data-driven game balance
//! - `notify`: Player-facing notification channel
//! - `persistence`: Score storage contract and local store

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod config;
pub mod notify;
pub mod persistence;
pub mod session;
pub mod sim;

pub use config::{ChaserHeading, GameConfig, SpawnRates};
pub use notify::{Notification, NotificationLog, NotificationSink, Severity};
pub use persistence::{LocalScoreStore, PersistError, ScoreRecord, ScoreStore, UserStats};
pub use session::{Session, SessionError, SessionPhase};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second (one tick per display frame)
    pub const TICKS_PER_SECOND: u64 = 60;
    /// Score goes up by one every this many ticks
    pub const SCORE_CADENCE_TICKS: u64 = 10;

    /// Logical world size, independent of display scale
    pub const WORLD_WIDTH: f32 = 1000.0;
    pub const WORLD_HEIGHT: f32 = 750.0;

    /// Player boat defaults
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 75.0;
    pub const PLAYER_SPEED: f32 = 4.0;
    /// Degrees per tick while a turn key is held
    pub const PLAYER_TURN_RATE: f32 = 4.0;
    /// Distance the player spawns above the bottom edge
    pub const PLAYER_START_OFFSET_Y: f32 = 100.0;
    /// Player is kept this far inside the world edges
    pub const PLAYER_EDGE_MARGIN: f32 = 20.0;
}

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// Normalize a heading to [0, 360)
#[inline]
pub fn normalize_heading(degrees: f32) -> f32 {
    degrees.rem_euclid(360.0)
}

/// Unit vector for a heading in degrees (0 = up, clockwise positive, screen y down)
#[inline]
pub fn heading_to_vector(degrees: f32) -> Vec2 {
    let rad = deg_to_rad(degrees);
    Vec2::new(rad.sin(), -rad.cos())
}

/// Heading in degrees pointing along `dir` (inverse of `heading_to_vector`)
#[inline]
pub fn vector_to_heading(dir: Vec2) -> f32 {
    normalize_heading(dir.x.atan2(-dir.y).to_degrees())
}
