//! Player collision resolution
//!
//! At most one hit is processed per tick. Hazards are scanned in a fixed
//! order and the first contact decides the outcome: the shield absorbs it
//! if available, otherwise the run ends. The hazard itself is left in place.

use super::collision::entities_collide;
use super::effects::try_consume_shield;
use super::state::GameState;
use crate::config::GameConfig;
use crate::notify::{NotificationSink, Severity};

/// What the player ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hazard {
    DriftingIsland,
    TurretIsland,
    Chaser,
    Bullet,
    Bomb,
}

/// First hazard touching the player, in resolution order
pub fn first_hazard(state: &GameState) -> Option<Hazard> {
    let player = &state.player;

    if state.drifting_islands().any(|i| entities_collide(player, i)) {
        return Some(Hazard::DriftingIsland);
    }
    if state.turret_islands().any(|i| entities_collide(player, i)) {
        return Some(Hazard::TurretIsland);
    }
    if state.chasers.iter().any(|c| entities_collide(player, c)) {
        return Some(Hazard::Chaser);
    }
    if state.bullets.iter().any(|b| entities_collide(player, b)) {
        return Some(Hazard::Bullet);
    }
    if state.bombs.iter().any(|b| entities_collide(player, b)) {
        return Some(Hazard::Bomb);
    }
    None
}

/// Check the player against every hazard. Returns true if the run is over.
///
/// Does nothing while the player is invulnerable.
pub fn resolve_collisions(
    state: &mut GameState,
    config: &GameConfig,
    sink: &mut dyn NotificationSink,
) -> bool {
    if state.player.invulnerable {
        return false;
    }

    let Some(hazard) = first_hazard(state) else {
        return false;
    };

    if try_consume_shield(&mut state.player, config) {
        log::info!("frame {}: shield absorbed {:?} hit", state.frame, hazard);
        sink.notify(
            "Emergency shield activated! You are invulnerable for a few seconds",
            Severity::Info,
        );
        false
    } else {
        log::info!(
            "frame {}: hit {:?}, game over at score {}",
            state.frame,
            hazard,
            state.score
        );
        true
    }
}
