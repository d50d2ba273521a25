//! Tile Platformer - simulation core for a tile-based 2D platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile index, collisions, entities, particles)
//! - `persistence`: Map and asset-catalog documents on disk
//! - `tuning`: Data-driven physics and AI balance

pub mod persistence;
pub mod sim;
pub mod tuning;

pub use persistence::{MapError, load_map, save_map};
pub use tuning::Tuning;

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Simulation steps per second (one step per rendered frame)
    pub const FRAME_RATE: u32 = 60;

    /// Default pixels per grid cell
    pub const TILE_SIZE: i32 = 16;

    /// Tile types that block movement
    pub const PHYSICS_TILES: [&str; 2] = ["grass", "stone"];
    /// Tile types that take part in auto-tiling
    pub const AUTOTILE_TYPES: [&str; 2] = ["grass", "stone"];

    /// Cells probed around a position for collision candidates.
    ///
    /// (-1,-1) is absent and a few cells are visited twice. At non-negative
    /// coordinates a rect anchored at its top-left corner never overlaps the
    /// missing cell.
    pub const NEIGHBOR_OFFSETS: [(i32, i32); 12] = [
        (-1, 0),
        (-1, 1),
        (0, -1),
        (1, -1),
        (1, 0),
        (1, 1),
        (0, 0),
        (-1, 1),
        (0, 1),
        (1, 0),
        (1, 1),
        (0, 1),
    ];

    /// Default viewport (640x480 window at render scale 2)
    pub const VIEWPORT_WIDTH: i32 = 320;
    pub const VIEWPORT_HEIGHT: i32 = 240;

    /// Number of parallax clouds
    pub const CLOUD_COUNT: usize = 16;
}

/// Whether a tile type blocks movement
#[inline]
pub fn is_physics_tile(kind: &str) -> bool {
    consts::PHYSICS_TILES.contains(&kind)
}

/// Convert a position to grid cell coordinates (truncating toward zero)
#[inline]
pub fn to_grid(pos: Vec2, tile_size: i32) -> IVec2 {
    let ts = tile_size as f32;
    IVec2::new((pos.x / ts) as i32, (pos.y / ts) as i32)
}

/// Move `value` toward zero by `step` without crossing it
#[inline]
pub fn approach_zero(value: f32, step: f32) -> f32 {
    if value > 0.0 {
        (value - step).max(0.0)
    } else if value < 0.0 {
        (value + step).min(0.0)
    } else {
        0.0
    }
}
