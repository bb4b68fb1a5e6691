//! Spawn scheduling and entity advance
//!
//! Each category has its own timer. Once the interval for the category has
//! elapsed a single candidate is rolled; it is dropped (and the timer left
//! alone) if it would crowd an existing entity of the same layer, so the
//! next tick simply tries again.

use glam::Vec2;
use rand::Rng;

use super::collision::spawn_area_clear;
use super::hitbox::{Collider, EntityKind};
use super::state::{
    Bomber, Chaser, GameState, Island, IslandKind, PowerUp, PowerUpKind, SpawnSchedule, Unlocks,
    visual_size,
};
use crate::config::GameConfig;
use crate::notify::{NotificationSink, Severity};

/// Clearance between islands at birth
pub const ISLAND_SPAWN_MARGIN: f32 = 30.0;
/// Clearance between a new chaser and other boats/planes
pub const CHASER_SPAWN_MARGIN: f32 = 60.0;
/// Clearance between a new bomber and other boats/planes
pub const BOMBER_SPAWN_MARGIN: f32 = 50.0;
/// How far past an edge an entity travels before it is dropped
pub const EXIT_MARGIN: f32 = 50.0;
/// Chasers spawn in the band that leaves this much room top and bottom
pub const CHASER_SPAWN_BAND_INSET: f32 = 100.0;
/// At most this many power-ups on screen
pub const MAX_ACTIVE_POWER_UPS: usize = 2;
pub const POWER_UP_SPEED: f32 = 2.0;
pub const TURRET_FIRE_COOLDOWN: i32 = 100;
pub const BOMBER_DROP_COOLDOWN: i32 = 120;

#[inline]
fn interval_elapsed(frame: u64, last: u64, rate: u64) -> bool {
    frame.saturating_sub(last) > rate
}

/// Recompute current spawn intervals from the base table and unlocks.
///
/// Each unlock only ever raises the multipliers, so intervals never shrink
/// during a run.
pub fn adjust_spawn_rates(spawn: &mut SpawnSchedule, unlocks: &Unlocks) {
    let base = spawn.base_rates;
    let mut rates = base;

    if unlocks.turrets {
        rates.island = base.island.saturating_mul(2);
    }
    if unlocks.chasers {
        rates.island = base.island.saturating_mul(3);
        rates.turret_island = base.turret_island.saturating_mul(2);
    }
    if unlocks.bombers {
        rates.island = base.island.saturating_mul(4);
        rates.turret_island = base.turret_island.saturating_mul(3);
        rates.chaser = base.chaser.saturating_mul(2);
    }

    spawn.current_rates = rates;
}

/// Flip unlock flags for every milestone the score has reached.
///
/// Each flag is set at most once per run and announced when it flips.
pub fn check_unlocks(state: &mut GameState, config: &GameConfig, sink: &mut dyn NotificationSink) {
    let score = state.score;
    let unlocks = &mut state.unlocks;

    if !unlocks.turrets && score >= config.turret_unlock_score {
        unlocks.turrets = true;
        log::info!("score {}: turret islands unlocked", score);
        sink.notify("Cannon islands incoming!", Severity::Warning);
    }
    if !unlocks.chasers && score >= config.chaser_unlock_score {
        unlocks.chasers = true;
        log::info!("score {}: chasers unlocked", score);
        sink.notify("Enemy boats on your tail!", Severity::Danger);
    }
    if !unlocks.bombers && score >= config.bomber_unlock_score {
        unlocks.bombers = true;
        log::info!("score {}: bombers unlocked", score);
        sink.notify("Bombers overhead!", Severity::Danger);
    }
}

/// Random x so that a box of `width` fits inside the world
fn random_x(state: &mut GameState, width: f32) -> f32 {
    let span = (state.bounds.width - width).max(0.0);
    state.rng.random::<f32>() * span
}

fn island_clear(state: &GameState, candidate: &Island) -> bool {
    spawn_area_clear(
        &candidate.bounds(),
        state.islands.iter().map(|i| i.bounds()),
        ISLAND_SPAWN_MARGIN,
    )
}

fn air_and_boats_clear(state: &GameState, candidate: &impl Collider, margin: f32) -> bool {
    let others = state
        .chasers
        .iter()
        .map(|c| c.bounds())
        .chain(state.bombers.iter().map(|b| b.bounds()));
    spawn_area_clear(&candidate.bounds(), others, margin)
}

/// Try to spawn a drifting island above the top edge. Returns true if spawned.
pub fn spawn_drifting_island(state: &mut GameState) -> bool {
    let rate = state.spawn.current_rates.island;
    if !interval_elapsed(state.frame, state.spawn.last_spawn.island, rate) {
        return false;
    }

    let size = visual_size(EntityKind::DriftingIsland);
    let x = random_x(state, size.x);
    let speed = 2.0 + state.rng.random::<f32>();
    let island = Island {
        pos: Vec2::new(x, -size.y),
        size,
        speed,
        kind: IslandKind::Drifting,
    };

    if !island_clear(state, &island) {
        return false;
    }

    log::debug!("frame {}: drifting island at x={:.0}", state.frame, x);
    state.islands.push(island);
    state.spawn.last_spawn.island = state.frame;
    true
}

/// Try to spawn a turret island above the top edge. Returns true if spawned.
pub fn spawn_turret_island(state: &mut GameState) -> bool {
    let rate = state.spawn.current_rates.turret_island;
    if !interval_elapsed(state.frame, state.spawn.last_spawn.turret_island, rate) {
        return false;
    }

    let size = visual_size(EntityKind::TurretIsland);
    let x = random_x(state, size.x);
    let speed = 1.5 + state.rng.random::<f32>() * 0.5;
    let island = Island {
        pos: Vec2::new(x, -size.y),
        size,
        speed,
        kind: IslandKind::Turret {
            fire_cooldown: 0,
            fire_cooldown_max: TURRET_FIRE_COOLDOWN,
        },
    };

    if !island_clear(state, &island) {
        return false;
    }

    log::debug!("frame {}: turret island at x={:.0}", state.frame, x);
    state.islands.push(island);
    state.spawn.last_spawn.turret_island = state.frame;
    true
}

/// Try to spawn a chaser just outside the left or right edge.
pub fn spawn_chaser(state: &mut GameState, config: &GameConfig) -> bool {
    let rate = state.spawn.current_rates.chaser;
    if !interval_elapsed(state.frame, state.spawn.last_spawn.chaser, rate)
        || state.chasers.len() >= config.max_chasers
    {
        return false;
    }

    let size = visual_size(EntityKind::Chaser);
    let from_left = state.rng.random_bool(0.5);
    let x = if from_left {
        -size.x
    } else {
        state.bounds.width + size.x
    };
    let band = (state.bounds.height - CHASER_SPAWN_BAND_INSET * 2.0).max(0.0);
    let y = state.rng.random::<f32>() * band + CHASER_SPAWN_BAND_INSET;
    let speed = config.enemy_speed + state.rng.random::<f32>() * 0.3;
    let chaser = Chaser {
        pos: Vec2::new(x, y),
        size,
        speed,
        heading: 0.0,
    };

    if !air_and_boats_clear(state, &chaser, CHASER_SPAWN_MARGIN) {
        return false;
    }

    log::debug!("frame {}: chaser at ({:.0}, {:.0})", state.frame, x, y);
    state.chasers.push(chaser);
    state.spawn.last_spawn.chaser = state.frame;
    true
}

/// Try to spawn a bomber just below the bottom edge.
pub fn spawn_bomber(state: &mut GameState) -> bool {
    let rate = state.spawn.current_rates.bomber;
    if !interval_elapsed(state.frame, state.spawn.last_spawn.bomber, rate) {
        return false;
    }

    let size = visual_size(EntityKind::Bomber);
    let x = random_x(state, size.x) + size.x / 2.0;
    let speed = 2.5 + state.rng.random::<f32>() * 0.5;
    let bomber = Bomber {
        pos: Vec2::new(x, state.bounds.height + size.y),
        size,
        speed,
        drop_cooldown: 0,
        drop_cooldown_max: BOMBER_DROP_COOLDOWN,
    };

    if !air_and_boats_clear(state, &bomber, BOMBER_SPAWN_MARGIN) {
        return false;
    }

    log::debug!("frame {}: bomber at x={:.0}", state.frame, x);
    state.bombers.push(bomber);
    state.spawn.last_spawn.bomber = state.frame;
    true
}

/// Try to spawn a random power-up above the top edge.
pub fn spawn_power_up(state: &mut GameState) -> bool {
    let rate = state.spawn.current_rates.power_up;
    if !interval_elapsed(state.frame, state.spawn.last_spawn.power_up, rate)
        || state.power_ups.len() >= MAX_ACTIVE_POWER_UPS
    {
        return false;
    }

    let kind = if state.rng.random_bool(0.5) {
        PowerUpKind::Shield
    } else {
        PowerUpKind::DisableEnemies
    };
    let size = visual_size(EntityKind::PowerUp);
    let x = random_x(state, size.x);

    log::debug!("frame {}: {:?} power-up at x={:.0}", state.frame, kind, x);
    state.power_ups.push(PowerUp {
        pos: Vec2::new(x, -size.y),
        size,
        speed: POWER_UP_SPEED,
        kind,
    });
    state.spawn.last_spawn.power_up = state.frame;
    true
}

/// Move islands of one variant down, dropping those past the bottom edge
pub fn advance_islands(state: &mut GameState, turrets: bool) {
    let limit = state.bounds.height + EXIT_MARGIN;
    state.islands.retain_mut(|island| {
        if island.is_turret() != turrets {
            return true;
        }
        island.pos.y += island.speed;
        island.pos.y < limit
    });
}

/// Move power-ups down, dropping those past the bottom edge
pub fn advance_power_ups(state: &mut GameState) {
    let limit = state.bounds.height + EXIT_MARGIN;
    state.power_ups.retain_mut(|p| {
        p.pos.y += p.speed;
        p.pos.y < limit
    });
}

/// Move bombers up, dropping those past the top edge
pub fn advance_bombers(state: &mut GameState) {
    state.bombers.retain_mut(|b| {
        b.pos.y -= b.speed;
        b.pos.y > -b.size.y - EXIT_MARGIN
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::inflated_rect_overlap;
    use crate::sim::rect::WorldBounds;
    use proptest::prelude::*;

    fn new_state(seed: u64) -> GameState {
        GameState::new(seed, WorldBounds::default(), &GameConfig::default())
    }

    #[test]
    fn test_rates_scale_with_unlocks() {
        let mut state = new_state(1);
        let base = state.spawn.base_rates;

        adjust_spawn_rates(&mut state.spawn, &Unlocks::default());
        assert_eq!(state.spawn.current_rates, base);

        let all = Unlocks {
            turrets: true,
            chasers: true,
            bombers: true,
        };
        adjust_spawn_rates(&mut state.spawn, &all);
        assert_eq!(state.spawn.current_rates.island, base.island * 4);
        assert_eq!(state.spawn.current_rates.turret_island, base.turret_island * 3);
        assert_eq!(state.spawn.current_rates.chaser, base.chaser * 2);
        assert_eq!(state.spawn.current_rates.bomber, base.bomber);
    }

    #[test]
    fn test_rates_never_decrease_as_unlocks_accumulate() {
        let mut state = new_state(1);
        let steps = [
            Unlocks::default(),
            Unlocks {
                turrets: true,
                ..Default::default()
            },
            Unlocks {
                turrets: true,
                chasers: true,
                ..Default::default()
            },
            Unlocks {
                turrets: true,
                chasers: true,
                bombers: true,
            },
        ];
        let mut prev = state.spawn.base_rates;
        for unlocks in steps {
            adjust_spawn_rates(&mut state.spawn, &unlocks);
            let cur = state.spawn.current_rates;
            assert!(cur.island >= prev.island);
            assert!(cur.turret_island >= prev.turret_island);
            assert!(cur.chaser >= prev.chaser);
            prev = cur;
        }
    }

    #[test]
    fn test_unlocks_flip_once_with_notifications() {
        use crate::notify::NotificationLog;

        let config = GameConfig::default();
        let mut state = new_state(1);
        let mut log = NotificationLog::new();

        state.score = config.turret_unlock_score - 1;
        check_unlocks(&mut state, &config, &mut log);
        assert_eq!(state.unlocks, Unlocks::default());

        state.score = config.turret_unlock_score;
        check_unlocks(&mut state, &config, &mut log);
        check_unlocks(&mut state, &config, &mut log);
        assert!(state.unlocks.turrets && !state.unlocks.chasers);
        assert_eq!(log.len(), 1);
        assert_eq!(log.latest().unwrap().severity, Severity::Warning);

        // Jumping past both remaining thresholds unlocks both in one call
        state.score = config.bomber_unlock_score;
        check_unlocks(&mut state, &config, &mut log);
        assert!(state.unlocks.chasers && state.unlocks.bombers);
        assert_eq!(log.len(), 3);
        assert_eq!(log.latest().unwrap().severity, Severity::Danger);
    }

    #[test]
    fn test_no_spawn_before_interval() {
        let mut state = new_state(2);
        state.frame = state.spawn.current_rates.island;
        assert!(!spawn_drifting_island(&mut state));
        state.frame += 1;
        assert!(spawn_drifting_island(&mut state));
        assert_eq!(state.spawn.last_spawn.island, state.frame);
        assert_eq!(state.islands.len(), 1);
        assert!(state.islands[0].pos.y < 0.0);
    }

    #[test]
    fn test_blocked_spawn_keeps_timer() {
        let mut state = new_state(3);
        // Wall of islands across the top edge
        let size = visual_size(EntityKind::DriftingIsland);
        let mut x = 0.0;
        while x < state.bounds.width {
            state.islands.push(Island {
                pos: Vec2::new(x, -size.y),
                size,
                speed: 2.0,
                kind: IslandKind::Drifting,
            });
            x += size.x;
        }
        let before = state.islands.len();
        state.frame = 1000;
        assert!(!spawn_drifting_island(&mut state));
        assert_eq!(state.islands.len(), before);
        assert_eq!(state.spawn.last_spawn.island, 0);
    }

    #[test]
    fn test_chaser_cap() {
        let config = GameConfig::default();
        let mut state = new_state(4);
        for i in 0..config.max_chasers {
            state.chasers.push(Chaser {
                pos: Vec2::new(100.0 + i as f32 * 200.0, 300.0),
                size: visual_size(EntityKind::Chaser),
                speed: 1.8,
                heading: 0.0,
            });
        }
        state.frame = 10_000;
        assert!(!spawn_chaser(&mut state, &config));
    }

    #[test]
    fn test_chaser_spawns_outside_side_edges() {
        let config = GameConfig::default();
        let mut state = new_state(5);
        state.frame = 10_000;
        assert!(spawn_chaser(&mut state, &config));
        let c = &state.chasers[0];
        assert!(c.pos.x < 0.0 || c.pos.x > state.bounds.width);
        assert!(c.pos.y >= CHASER_SPAWN_BAND_INSET);
        assert!(c.pos.y <= state.bounds.height - CHASER_SPAWN_BAND_INSET);
        assert!(c.speed >= config.enemy_speed && c.speed <= config.enemy_speed + 0.3);
    }

    #[test]
    fn test_bomber_spawns_below_and_leaves_above() {
        let mut state = new_state(6);
        state.frame = 10_000;
        assert!(spawn_bomber(&mut state));
        assert!(state.bombers[0].pos.y > state.bounds.height);
        for _ in 0..2000 {
            advance_bombers(&mut state);
        }
        assert!(state.bombers.is_empty());
    }

    #[test]
    fn test_power_up_cap() {
        let mut state = new_state(7);
        state.frame = 10_000;
        assert!(spawn_power_up(&mut state));
        state.frame += 10_000;
        assert!(spawn_power_up(&mut state));
        state.frame += 10_000;
        assert!(!spawn_power_up(&mut state));
        assert_eq!(state.power_ups.len(), MAX_ACTIVE_POWER_UPS);
    }

    #[test]
    fn test_advance_islands_only_moves_requested_variant() {
        let mut state = new_state(8);
        state.islands.push(Island {
            pos: Vec2::new(0.0, 0.0),
            size: visual_size(EntityKind::DriftingIsland),
            speed: 2.0,
            kind: IslandKind::Drifting,
        });
        state.islands.push(Island {
            pos: Vec2::new(500.0, 0.0),
            size: visual_size(EntityKind::TurretIsland),
            speed: 1.5,
            kind: IslandKind::Turret {
                fire_cooldown: 0,
                fire_cooldown_max: TURRET_FIRE_COOLDOWN,
            },
        });
        advance_islands(&mut state, false);
        assert_eq!(state.islands[0].pos.y, 2.0);
        assert_eq!(state.islands[1].pos.y, 0.0);
    }

    #[test]
    fn test_islands_dropped_past_bottom() {
        let mut state = new_state(9);
        state.islands.push(Island {
            pos: Vec2::new(0.0, state.bounds.height + EXIT_MARGIN - 1.0),
            size: visual_size(EntityKind::DriftingIsland),
            speed: 2.0,
            kind: IslandKind::Drifting,
        });
        advance_islands(&mut state, false);
        assert!(state.islands.is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_island_spawns_keep_clearance(seed in any::<u64>()) {
            let mut state = new_state(seed);
            for frame in 1..3000u64 {
                state.frame = frame;
                let existing: Vec<_> = state.islands.iter().map(|i| i.bounds()).collect();
                let spawned = spawn_drifting_island(&mut state) | spawn_turret_island(&mut state);
                if spawned {
                    let new_ones = &state.islands[existing.len()..];
                    for (k, island) in new_ones.iter().enumerate() {
                        let fresh = island.bounds();
                        let older = existing
                            .iter()
                            .copied()
                            .chain(new_ones[..k].iter().map(|i| i.bounds()));
                        for other in older {
                            prop_assert!(!inflated_rect_overlap(&fresh, &other, ISLAND_SPAWN_MARGIN));
                        }
                    }
                }
                advance_islands(&mut state, false);
                advance_islands(&mut state, true);
            }
        }

        #[test]
        fn prop_boat_and_plane_spawns_keep_clearance(seed in any::<u64>()) {
            let config = GameConfig::default();
            let mut state = new_state(seed);
            for frame in 1..3000u64 {
                state.frame = frame;
                let before: Vec<_> = state
                    .chasers
                    .iter()
                    .map(|c| c.bounds())
                    .chain(state.bombers.iter().map(|b| b.bounds()))
                    .collect();
                if spawn_chaser(&mut state, &config) {
                    let fresh = state.chasers.last().unwrap().bounds();
                    for other in &before {
                        prop_assert!(!inflated_rect_overlap(&fresh, other, CHASER_SPAWN_MARGIN));
                    }
                }
                let before: Vec<_> = state
                    .chasers
                    .iter()
                    .map(|c| c.bounds())
                    .chain(state.bombers.iter().map(|b| b.bounds()))
                    .collect();
                if spawn_bomber(&mut state) {
                    let fresh = state.bombers.last().unwrap().bounds();
                    for other in &before {
                        prop_assert!(!inflated_rect_overlap(&fresh, other, BOMBER_SPAWN_MARGIN));
                    }
                }
                advance_bombers(&mut state);
                // Clear chasers now and then so the cap does not stall spawning
                if frame % 500 == 0 {
                    state.chasers.clear();
                }
            }
        }
    }
}
