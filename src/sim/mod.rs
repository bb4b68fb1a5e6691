//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (insertion order per collection)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod damage;
pub mod effects;
pub mod hitbox;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{ellipse_vs_rect, entities_collide, inflated_rect_overlap, rect_overlap};
pub use damage::Hazard;
pub use hitbox::{Collider, EntityKind, Hitbox, resolve_hitbox};
pub use rect::{Rect, WorldBounds};
pub use state::{
    Bomber, Chaser, DisabledChaser, GameState, HeldKeys, Island, IslandKind, Player, PowerUp,
    PowerUpKind, Projectile, ProjectileKind, Unlocks, visual_size,
};
pub use tick::{TickInput, TickOutcome, tick};
