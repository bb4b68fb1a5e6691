//! Game state and core simulation types
//!
//! All entities are flat records tagged with a kind. The whole world is one
//! `GameState` owned by the session and passed to every step function.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::hitbox::{Collider, EntityKind};
use super::rect::{Rect, WorldBounds};
use crate::config::{GameConfig, SpawnRates};
use crate::consts::*;

/// Visual box size per entity kind
pub fn visual_size(kind: EntityKind) -> Vec2 {
    match kind {
        EntityKind::Player => Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        EntityKind::DriftingIsland => Vec2::new(80.0, 80.0),
        EntityKind::TurretIsland => Vec2::new(90.0, 90.0),
        EntityKind::Chaser => Vec2::new(40.0, 60.0),
        EntityKind::Bomber => Vec2::new(60.0, 40.0),
        EntityKind::Bullet => Vec2::new(8.0, 8.0),
        EntityKind::Bomb => Vec2::new(12.0, 12.0),
        EntityKind::PowerUp => Vec2::new(30.0, 30.0),
    }
}

/// Turn keys currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    pub turn_left: bool,
    pub turn_right: bool,
}

/// The player's boat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Degrees, 0 = up, clockwise positive
    pub heading: f32,
    pub speed: f32,
    /// Degrees per tick while turning
    pub turn_rate: f32,
    pub has_shield: bool,
    pub invulnerable: bool,
    pub invulnerability_frames: u32,
}

impl Player {
    /// New player centered horizontally near the bottom edge
    pub fn new(bounds: WorldBounds) -> Self {
        Self {
            pos: Vec2::new(bounds.width / 2.0, bounds.height - PLAYER_START_OFFSET_Y),
            size: visual_size(EntityKind::Player),
            heading: 0.0,
            speed: PLAYER_SPEED,
            turn_rate: PLAYER_TURN_RATE,
            has_shield: false,
            invulnerable: false,
            invulnerability_frames: 0,
        }
    }
}

impl Collider for Player {
    fn kind(&self) -> EntityKind {
        EntityKind::Player
    }
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Island variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IslandKind {
    /// Plain obstacle drifting down
    Drifting,
    /// Drifts down and fires aimed bullets
    Turret {
        fire_cooldown: i32,
        fire_cooldown_max: i32,
    },
}

/// An island (drifting or turret)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Island {
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward speed (units/tick)
    pub speed: f32,
    pub kind: IslandKind,
}

impl Island {
    pub fn is_turret(&self) -> bool {
        matches!(self.kind, IslandKind::Turret { .. })
    }
}

impl Collider for Island {
    fn kind(&self) -> EntityKind {
        match self.kind {
            IslandKind::Drifting => EntityKind::DriftingIsland,
            IslandKind::Turret { .. } => EntityKind::TurretIsland,
        }
    }
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Enemy boat that seeks the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chaser {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    /// Degrees, presentation only
    pub heading: f32,
}

impl Collider for Chaser {
    fn kind(&self) -> EntityKind {
        EntityKind::Chaser
    }
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Plane flying up the screen, dropping bombs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomber {
    pub pos: Vec2,
    pub size: Vec2,
    /// Upward speed (units/tick)
    pub speed: f32,
    pub drop_cooldown: i32,
    pub drop_cooldown_max: i32,
}

impl Collider for Bomber {
    fn kind(&self) -> EntityKind {
        EntityKind::Bomber
    }
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Projectile variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Aimed shot from a turret island
    Bullet,
    /// Straight drop from a bomber
    Bomb,
}

/// A bullet or bomb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub size: Vec2,
    /// Units per tick
    pub vel: Vec2,
    pub kind: ProjectileKind,
}

impl Collider for Projectile {
    fn kind(&self) -> EntityKind {
        match self.kind {
            ProjectileKind::Bullet => EntityKind::Bullet,
            ProjectileKind::Bomb => EntityKind::Bomb,
        }
    }
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// One-use emergency shield
    Shield,
    /// Freezes every active chaser for a while
    DisableEnemies,
}

/// A power-up drifting down
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub kind: PowerUpKind,
}

impl Collider for PowerUp {
    fn kind(&self) -> EntityKind {
        EntityKind::PowerUp
    }
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A chaser pulled out of play by a disable-enemies pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisabledChaser {
    pub chaser: Chaser,
    pub frames_remaining: u32,
}

/// Frame at which each category last spawned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnTimers {
    pub island: u64,
    pub turret_island: u64,
    pub chaser: u64,
    pub bomber: u64,
    pub power_up: u64,
}

/// Spawn timing state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnSchedule {
    pub last_spawn: SpawnTimers,
    pub base_rates: SpawnRates,
    /// Recomputed every tick from `base_rates` and the unlocks
    pub current_rates: SpawnRates,
}

impl SpawnSchedule {
    pub fn new(base_rates: SpawnRates) -> Self {
        Self {
            last_spawn: SpawnTimers::default(),
            base_rates,
            current_rates: base_rates,
        }
    }
}

/// Hazard categories enabled by score milestones. Never relocked within a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unlocks {
    pub turrets: bool,
    pub chasers: bool,
    pub bombers: bool,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Logical playfield size, fixed for the run
    pub bounds: WorldBounds,
    /// Simulation tick counter
    pub frame: u64,
    pub score: u64,
    pub game_over: bool,
    pub keys: HeldKeys,
    pub player: Player,
    /// Drifting and turret islands
    #[serde(default)]
    pub islands: Vec<Island>,
    #[serde(default)]
    pub chasers: Vec<Chaser>,
    /// Frozen chasers, disjoint from `chasers`
    #[serde(default)]
    pub disabled_chasers: Vec<DisabledChaser>,
    #[serde(default)]
    pub bombers: Vec<Bomber>,
    #[serde(default)]
    pub bullets: Vec<Projectile>,
    #[serde(default)]
    pub bombs: Vec<Projectile>,
    #[serde(default)]
    pub power_ups: Vec<PowerUp>,
    pub spawn: SpawnSchedule,
    pub unlocks: Unlocks,
    /// Simulation RNG (seeded, the only randomness source)
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a fresh world with the given seed
    pub fn new(seed: u64, bounds: WorldBounds, config: &GameConfig) -> Self {
        Self {
            seed,
            bounds,
            frame: 0,
            score: 0,
            game_over: false,
            keys: HeldKeys::default(),
            player: Player::new(bounds),
            islands: Vec::new(),
            chasers: Vec::new(),
            disabled_chasers: Vec::new(),
            bombers: Vec::new(),
            bullets: Vec::new(),
            bombs: Vec::new(),
            power_ups: Vec::new(),
            spawn: SpawnSchedule::new(config.base_spawn_rates),
            unlocks: Unlocks::default(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Iterator over drifting islands only
    pub fn drifting_islands(&self) -> impl Iterator<Item = &Island> {
        self.islands.iter().filter(|i| !i.is_turret())
    }

    /// Iterator over turret islands only
    pub fn turret_islands(&self) -> impl Iterator<Item = &Island> {
        self.islands.iter().filter(|i| i.is_turret())
    }

    /// Run length in whole seconds
    pub fn duration_seconds(&self) -> u64 {
        self.frame / TICKS_PER_SECOND
    }
}
