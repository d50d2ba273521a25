//! Axis-separated collision resolution against the tile grid
//!
//! Movement is applied one axis at a time, X first. After each axis step the
//! entity's rect is tested against the solid tiles around its new position and
//! snapped flush against every tile it overlaps. Later overlaps re-snap, so the
//! final position comes from the last overlapping tile in probe order.

use glam::Vec2;

use super::rect::Rect;
use super::tilemap::TileMap;

/// Which sides touched a solid tile during the last move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Collisions {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Collisions {
    /// Touching a wall on either side
    #[inline]
    pub fn side(&self) -> bool {
        self.left || self.right
    }

    /// Touching a floor or ceiling
    #[inline]
    pub fn vertical(&self) -> bool {
        self.top || self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Apply one axis of movement to `pos` and push the box out of solid tiles
pub fn resolve_axis(
    pos: &mut Vec2,
    size: Vec2,
    delta: f32,
    axis: Axis,
    map: &TileMap,
    collisions: &mut Collisions,
) {
    match axis {
        Axis::X => pos.x += delta,
        Axis::Y => pos.y += delta,
    }

    let mut rect = Rect::from_pos_size(*pos, size);
    for tile in map.physics_rects_around(*pos) {
        if !rect.intersects(&tile) {
            continue;
        }
        match axis {
            Axis::X => {
                if delta > 0.0 {
                    rect.set_right(tile.left());
                    collisions.right = true;
                }
                if delta < 0.0 {
                    rect.set_left(tile.right());
                    collisions.left = true;
                }
                pos.x = rect.x;
            }
            Axis::Y => {
                if delta > 0.0 {
                    rect.set_bottom(tile.top());
                    collisions.bottom = true;
                }
                if delta < 0.0 {
                    rect.set_top(tile.bottom());
                    collisions.top = true;
                }
                pos.y = rect.y;
            }
        }
    }
}

/// Move a box by `movement`, resolving X then Y.
///
/// Returns the sides that hit something. Y resolution sees the already
/// resolved X position.
pub fn move_and_collide(pos: &mut Vec2, size: Vec2, movement: Vec2, map: &TileMap) -> Collisions {
    let mut collisions = Collisions::default();
    resolve_axis(pos, size, movement.x, Axis::X, map, &mut collisions);
    resolve_axis(pos, size, movement.y, Axis::Y, map, &mut collisions);
    collisions
}
