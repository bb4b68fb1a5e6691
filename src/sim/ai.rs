//! Per-tick kinematics and enemy behaviour
//!
//! Player steering, chaser pursuit with separation, turret fire and bomber
//! drops. Every function takes the world explicitly and mutates it in place.

use glam::Vec2;

use super::collision::inflated_rect_overlap;
use super::hitbox::EntityKind;
use super::rect::Rect;
use super::state::{Chaser, GameState, IslandKind, Projectile, ProjectileKind, visual_size};
use crate::config::{ChaserHeading, GameConfig};
use crate::consts::PLAYER_EDGE_MARGIN;
use crate::{heading_to_vector, normalize_heading, vector_to_heading};

/// Chasers stop closing in once this near the player
pub const CHASER_STANDOFF_DISTANCE: f32 = 100.0;
/// Chasers closer than this (box inflation) push each other apart
pub const CHASER_SEPARATION_MARGIN: f32 = 10.0;
/// Length of each neighbour's push vector
pub const CHASER_PUSH_STRENGTH: f32 = 2.0;
/// Chasers may roam this far outside the world
pub const CHASER_CLAMP_MARGIN: f32 = 60.0;
/// Turret fires only at players within this distance
pub const TURRET_RANGE: f32 = 300.0;
/// Bomber drops only when the player is within this horizontal distance
pub const BOMBER_DROP_RANGE: f32 = 150.0;

/// Turn, advance along the heading and keep the boat inside the world
pub fn update_player(state: &mut GameState) {
    let keys = state.keys;
    let bounds = state.bounds;
    let player = &mut state.player;

    if keys.turn_left {
        player.heading -= player.turn_rate;
    }
    if keys.turn_right {
        player.heading += player.turn_rate;
    }
    player.heading = normalize_heading(player.heading);

    player.pos += heading_to_vector(player.heading) * player.speed;

    let max_x = (bounds.width - PLAYER_EDGE_MARGIN - player.size.x).max(PLAYER_EDGE_MARGIN);
    let max_y = (bounds.height - PLAYER_EDGE_MARGIN - player.size.y).max(PLAYER_EDGE_MARGIN);
    player.pos.x = player.pos.x.clamp(PLAYER_EDGE_MARGIN, max_x);
    player.pos.y = player.pos.y.clamp(PLAYER_EDGE_MARGIN, max_y);
}

/// Seek the player, separate from neighbours, clamp to the loose bounds.
///
/// Chasers are updated in order, so later ones see earlier ones' new
/// positions. If pushing away from neighbours still leaves a chaser
/// overlapping one, its whole move for this tick is undone.
pub fn update_chasers(state: &mut GameState, config: &GameConfig) {
    let target = state.player.pos;
    let bounds = state.bounds;

    for i in 0..state.chasers.len() {
        let prev = state.chasers[i].pos;
        let size = state.chasers[i].size;
        let speed = state.chasers[i].speed;
        let mut pos = prev;

        let to_player = target - pos;
        let distance = to_player.length();
        if distance > CHASER_STANDOFF_DISTANCE {
            pos += to_player / distance * speed;
        }

        let overlapping = |pos: Vec2, chasers: &[Chaser]| {
            let me = Rect::from_pos_size(pos, size);
            chasers
                .iter()
                .enumerate()
                .filter(move |&(j, _)| j != i)
                .filter(move |(_, other)| {
                    inflated_rect_overlap(
                        &me,
                        &Rect::from_pos_size(other.pos, other.size),
                        CHASER_SEPARATION_MARGIN,
                    )
                })
                .map(|(_, other)| other.pos)
                .collect::<Vec<_>>()
        };

        let neighbours = overlapping(pos, state.chasers.as_slice());
        if !neighbours.is_empty() {
            let push: Vec2 = neighbours
                .iter()
                .map(|&other| (pos - other).normalize_or_zero() * CHASER_PUSH_STRENGTH)
                .sum();
            pos += push;

            if !overlapping(pos, state.chasers.as_slice()).is_empty() {
                pos = prev;
            }
        }

        pos.x = pos.x.clamp(-CHASER_CLAMP_MARGIN, bounds.width + CHASER_CLAMP_MARGIN);
        pos.y = pos.y.clamp(-CHASER_CLAMP_MARGIN, bounds.height + CHASER_CLAMP_MARGIN);

        let chaser = &mut state.chasers[i];
        chaser.pos = pos;
        chaser.heading = match config.chaser_heading {
            ChaserHeading::FixedUp => 0.0,
            ChaserHeading::TrackMovement if pos != prev => vector_to_heading(pos - prev),
            ChaserHeading::TrackMovement => chaser.heading,
        };
    }
}

/// Tick turret cooldowns and fire at the player when in range.
///
/// Returns true if any turret fired this tick.
pub fn update_turrets(state: &mut GameState, config: &GameConfig) -> bool {
    let target = state.player.pos;
    let bullet_size = visual_size(EntityKind::Bullet);
    let mut fired = false;

    for island in &mut state.islands {
        let IslandKind::Turret {
            fire_cooldown,
            fire_cooldown_max,
        } = &mut island.kind
        else {
            continue;
        };

        *fire_cooldown -= 1;

        let to_player = target - island.pos;
        if *fire_cooldown <= 0 && to_player.length() < TURRET_RANGE {
            let dir = to_player.try_normalize().unwrap_or(Vec2::X);
            let muzzle = island.pos + island.size / 2.0 - bullet_size / 2.0;
            state.bullets.push(Projectile {
                pos: muzzle,
                size: bullet_size,
                vel: dir * config.bullet_speed,
                kind: ProjectileKind::Bullet,
            });
            *fire_cooldown = *fire_cooldown_max;
            fired = true;
        }
    }

    fired
}

/// Tick bomber cooldowns and drop bombs when the player is below.
pub fn update_bombers(state: &mut GameState, config: &GameConfig) {
    let target_x = state.player.pos.x;
    let bomb_size = visual_size(EntityKind::Bomb);

    for bomber in &mut state.bombers {
        bomber.drop_cooldown -= 1;
        if bomber.drop_cooldown <= 0 && (bomber.pos.x - target_x).abs() < BOMBER_DROP_RANGE {
            state.bombs.push(Projectile {
                pos: Vec2::new(
                    bomber.pos.x + bomber.size.x / 2.0 - bomb_size.x / 2.0,
                    bomber.pos.y + bomber.size.y,
                ),
                size: bomb_size,
                vel: Vec2::new(0.0, config.bomb_speed),
                kind: ProjectileKind::Bomb,
            });
            bomber.drop_cooldown = bomber.drop_cooldown_max;
        }
    }
}

/// Move bullets, dropping those that left the world on any side
pub fn advance_bullets(state: &mut GameState) {
    let margin = super::spawn::EXIT_MARGIN;
    let bounds = state.bounds;
    state.bullets.retain_mut(|b| {
        b.pos += b.vel;
        b.pos.x > -margin
            && b.pos.x < bounds.width + margin
            && b.pos.y > -margin
            && b.pos.y < bounds.height + margin
    });
}

/// Move bombs, dropping those past the bottom edge
pub fn advance_bombs(state: &mut GameState) {
    let limit = state.bounds.height + super::spawn::EXIT_MARGIN;
    state.bombs.retain_mut(|b| {
        b.pos += b.vel;
        b.pos.y < limit
    });
}
