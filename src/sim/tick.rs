//! Fixed timestep simulation tick
//!
//! One call advances the world by exactly one frame. Steps run in a fixed
//! order; later steps observe the effects of earlier ones in the same tick.

use super::ai::{
    advance_bombs, advance_bullets, update_bombers, update_chasers, update_player, update_turrets,
};
use super::damage::resolve_collisions;
use super::effects::{
    activate_power_up, collect_power_ups, update_disabled_chasers, update_invulnerability,
};
use super::spawn::{
    adjust_spawn_rates, advance_bombers, advance_islands, advance_power_ups, check_unlocks,
    spawn_bomber, spawn_chaser, spawn_drifting_island, spawn_power_up, spawn_turret_island,
};
use super::state::GameState;
use crate::config::GameConfig;
use crate::consts::SCORE_CADENCE_TICKS;
use crate::notify::NotificationSink;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Turn counter-clockwise while held
    pub turn_left: bool,
    /// Turn clockwise while held
    pub turn_right: bool,
}

/// What happened during a tick, for the host's audio and HUD
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Run ended this tick (or had already ended)
    pub game_over: bool,
    pub score: u64,
    /// At least one turret fired
    pub cannon_fired: bool,
    /// At least one power-up was picked up
    pub power_up_collected: bool,
    /// The shield absorbed a hit
    pub shield_used: bool,
}

/// Advance the game state by one frame.
///
/// A finished run is left untouched.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    config: &GameConfig,
    sink: &mut dyn NotificationSink,
) -> TickOutcome {
    let mut outcome = TickOutcome {
        game_over: state.game_over,
        score: state.score,
        ..Default::default()
    };
    if state.game_over {
        return outcome;
    }

    state.frame += 1;
    state.keys.turn_left = input.turn_left;
    state.keys.turn_right = input.turn_right;

    update_player(state);
    update_invulnerability(&mut state.player, sink);
    update_disabled_chasers(state, sink);

    adjust_spawn_rates(&mut state.spawn, &state.unlocks);

    spawn_drifting_island(state);
    advance_islands(state, false);
    spawn_power_up(state);
    advance_power_ups(state);

    check_unlocks(state, config, sink);

    if state.unlocks.turrets {
        spawn_turret_island(state);
        advance_islands(state, true);
        outcome.cannon_fired = update_turrets(state, config);
    }

    if state.unlocks.chasers {
        spawn_chaser(state, config);
        update_chasers(state, config);
    }

    if state.unlocks.bombers {
        spawn_bomber(state);
        advance_bombers(state);
        update_bombers(state, config);
    }

    advance_bullets(state);
    advance_bombs(state);

    let picked = collect_power_ups(state);
    outcome.power_up_collected = !picked.is_empty();
    for kind in picked {
        activate_power_up(kind, state, config, sink);
    }

    let had_shield = state.player.has_shield;
    if resolve_collisions(state, config, sink) {
        state.game_over = true;
        log::info!(
            "game over: score {} after {} frames",
            state.score,
            state.frame
        );
    } else if state.frame % SCORE_CADENCE_TICKS == 0 {
        state.score += 1;
    }
    outcome.shield_used = had_shield && !state.player.has_shield;

    outcome.game_over = state.game_over;
    outcome.score = state.score;
    outcome
}
