//! Status-effect timers and power-up activation

use super::collision::entities_collide;
use super::state::{DisabledChaser, GameState, Player, PowerUpKind};
use crate::config::GameConfig;
use crate::notify::{NotificationSink, Severity};

/// Count down invulnerability, announcing when it ends
pub fn update_invulnerability(player: &mut Player, sink: &mut dyn NotificationSink) {
    if !player.invulnerable {
        return;
    }

    player.invulnerability_frames = player.invulnerability_frames.saturating_sub(1);
    if player.invulnerability_frames == 0 {
        player.invulnerable = false;
        log::info!("invulnerability ended");
        sink.notify("Invulnerability ended", Severity::Warning);
    }
}

/// Count down frozen chasers and return expired ones to play at their
/// frozen position
pub fn update_disabled_chasers(state: &mut GameState, sink: &mut dyn NotificationSink) {
    if state.disabled_chasers.is_empty() {
        return;
    }

    for disabled in &mut state.disabled_chasers {
        disabled.frames_remaining = disabled.frames_remaining.saturating_sub(1);
    }

    let (expired, frozen): (Vec<_>, Vec<_>) = std::mem::take(&mut state.disabled_chasers)
        .into_iter()
        .partition(|d| d.frames_remaining == 0);
    state.disabled_chasers = frozen;

    for disabled in expired {
        log::info!("chaser reactivated at {:?}", disabled.chaser.pos);
        sink.notify("Enemy boat is back in action!", Severity::Danger);
        state.chasers.push(disabled.chaser);
    }
}

/// Remove every power-up touching the player, returning their kinds in
/// pickup order
pub fn collect_power_ups(state: &mut GameState) -> Vec<PowerUpKind> {
    let player = &state.player;
    let mut picked = Vec::new();
    state.power_ups.retain(|p| {
        if entities_collide(player, p) {
            picked.push(p.kind);
            false
        } else {
            true
        }
    });
    picked
}

/// Apply a collected power-up
pub fn activate_power_up(
    kind: PowerUpKind,
    state: &mut GameState,
    config: &GameConfig,
    sink: &mut dyn NotificationSink,
) {
    match kind {
        PowerUpKind::Shield => {
            state.player.has_shield = true;
            log::info!("frame {}: emergency shield collected", state.frame);
            sink.notify("Emergency shield ready!", Severity::Info);
        }
        PowerUpKind::DisableEnemies => {
            let count = state.chasers.len();
            let duration = config.enemy_disable_duration;
            state
                .disabled_chasers
                .extend(state.chasers.drain(..).map(|chaser| DisabledChaser {
                    chaser,
                    frames_remaining: duration,
                }));
            log::info!("frame {}: {} chaser(s) disabled", state.frame, count);
            if count > 0 {
                sink.notify(&format!("{count} enemies disabled!"), Severity::Info);
            }
        }
    }
}

/// Spend the shield to survive a hit.
///
/// Only works when a shield is held and the player is not already
/// invulnerable. Returns true if the hit was absorbed.
pub fn try_consume_shield(player: &mut Player, config: &GameConfig) -> bool {
    if !player.has_shield || player.invulnerable {
        return false;
    }

    player.has_shield = false;
    player.invulnerable = true;
    player.invulnerability_frames = config.invulnerability_duration;
    true
}
