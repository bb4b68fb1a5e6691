//! Visual box to collision box mapping
//!
//! Sprites carry transparent padding, so most kinds collide with a smaller
//! box placed inside their visual box. Kinds without an entry collide with
//! the full visual box.

use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Entity kind tag used for hitbox lookup and rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    DriftingIsland,
    TurretIsland,
    Chaser,
    Bomber,
    Bullet,
    Bomb,
    PowerUp,
}

/// Collision box layered inside an entity's visual box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Hitbox {
    pub const fn new(width: f32, height: f32, offset_x: f32, offset_y: f32) -> Self {
        Self {
            width,
            height,
            offset_x,
            offset_y,
        }
    }
}

impl EntityKind {
    /// Static hitbox table. `None` means the full visual box is used.
    pub const fn hitbox(self) -> Option<Hitbox> {
        match self {
            EntityKind::Player => Some(Hitbox::new(30.0, 55.0, 10.0, 10.0)),
            EntityKind::DriftingIsland => Some(Hitbox::new(60.0, 60.0, 10.0, 10.0)),
            EntityKind::TurretIsland => Some(Hitbox::new(70.0, 70.0, 10.0, 10.0)),
            EntityKind::Chaser => Some(Hitbox::new(30.0, 50.0, 5.0, 5.0)),
            EntityKind::Bomber => Some(Hitbox::new(50.0, 24.0, 5.0, 8.0)),
            EntityKind::Bullet | EntityKind::Bomb | EntityKind::PowerUp => None,
        }
    }
}

/// Anything that occupies a box in the world
pub trait Collider {
    fn kind(&self) -> EntityKind;
    fn bounds(&self) -> Rect;
}

/// Collision box of an entity: the mapped sub-box, or its full visual box
pub fn resolve_hitbox<C: Collider + ?Sized>(entity: &C) -> Rect {
    let visual = entity.bounds();
    match entity.kind().hitbox() {
        Some(hb) => Rect::new(
            visual.x + hb.offset_x,
            visual.y + hb.offset_y,
            hb.width,
            hb.height,
        ),
        None => visual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe(EntityKind, Rect);

    impl Collider for Probe {
        fn kind(&self) -> EntityKind {
            self.0
        }
        fn bounds(&self) -> Rect {
            self.1
        }
    }

    #[test]
    fn test_mapped_kind_uses_offset_box() {
        let probe = Probe(EntityKind::Chaser, Rect::new(100.0, 200.0, 40.0, 60.0));
        assert_eq!(resolve_hitbox(&probe), Rect::new(105.0, 205.0, 30.0, 50.0));
    }

    #[test]
    fn test_unmapped_kind_falls_back_to_visual_box() {
        let visual = Rect::new(1.0, 2.0, 8.0, 8.0);
        let probe = Probe(EntityKind::Bullet, visual);
        assert_eq!(resolve_hitbox(&probe), visual);
    }

    #[test]
    fn test_hitboxes_fit_inside_default_visual_sizes() {
        use crate::sim::state::visual_size;
        for kind in [
            EntityKind::Player,
            EntityKind::DriftingIsland,
            EntityKind::TurretIsland,
            EntityKind::Chaser,
            EntityKind::Bomber,
        ] {
            let hb = kind.hitbox().unwrap();
            let size = visual_size(kind);
            assert!(hb.offset_x + hb.width <= size.x, "{kind:?}");
            assert!(hb.offset_y + hb.height <= size.y, "{kind:?}");
        }
    }
}
