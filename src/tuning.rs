//! Data-driven game balance
//!
//! Every physics and AI constant lives here so a level designer can tweak
//! feel without recompiling. Missing fields in a tuning file fall back to the
//! defaults below.

use std::ops::RangeInclusive;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::persistence::{self, MapError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Shared physics ===
    /// Downward acceleration per frame
    pub gravity: f32,
    /// Terminal fall speed
    pub max_fall_speed: f32,
    /// Horizontal impulse decay per frame (player)
    pub air_friction: f32,

    // === Player ===
    /// Upward speed of a normal jump
    pub jump_speed: f32,
    /// Air-time (frames) after which the player counts as airborne
    pub airborne_frames: u32,
    /// Fall speed cap while clinging to a wall
    pub wall_slide_speed: f32,
    /// Impulse of a jump off a wall (x away from the wall, y upward)
    pub wall_jump: Vec2,
    /// Dash counter start value
    pub dash_frames: i32,
    /// Counter magnitude above which the dash overrides movement
    pub dash_active_above: i32,
    /// Horizontal speed while dashing
    pub dash_speed: f32,
    /// Speed factor on the last active dash frame
    pub dash_taper: f32,
    /// Particles in each dash burst
    pub dash_burst: usize,

    // === Enemy ===
    pub enemy_walk_speed: f32,
    /// One in `enemy_walk_chance` frames starts a walk
    pub enemy_walk_chance: u32,
    /// Walk length range in frames
    pub enemy_walk_frames: (u32, u32),
    /// Ledge probe offset from the enemy (x from centre, y from top)
    pub enemy_ledge_probe: Vec2,
    /// Vertical distance within which the enemy shoots at the player
    pub enemy_shot_band: f32,
    pub enemy_sparks_per_shot: usize,

    // === Particles ===
    pub projectile_speed: f32,
    /// Frames a projectile survives
    pub projectile_lifetime: u32,
    /// A leaf spawner fires when `random * leaf_spawn_divisor < area`
    pub leaf_spawn_divisor: f32,
    pub leaf_velocity: Vec2,
    /// Per-frame speed loss of a spark
    pub spark_decay: f32,

    // === Camera ===
    /// Camera closes 1/n of the distance to its target per frame
    pub camera_smoothing: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.1,
            max_fall_speed: 3.0,
            air_friction: 0.1,

            jump_speed: 3.0,
            airborne_frames: 4,
            wall_slide_speed: 0.5,
            wall_jump: Vec2::new(3.5, 2.5),
            dash_frames: 60,
            dash_active_above: 50,
            dash_speed: 8.0,
            dash_taper: 0.1,
            dash_burst: 20,

            enemy_walk_speed: 0.5,
            enemy_walk_chance: 100,
            enemy_walk_frames: (30, 120),
            enemy_ledge_probe: Vec2::new(7.0, 20.0),
            enemy_shot_band: 16.0,
            enemy_sparks_per_shot: 4,

            projectile_speed: 1.5,
            projectile_lifetime: 360,
            leaf_spawn_divisor: 40000.0,
            leaf_velocity: Vec2::new(-0.1, 0.3),
            spark_decay: 0.1,

            camera_smoothing: 15,
        }
    }
}

impl Tuning {
    /// Load tuning overrides from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let tuning: Tuning = persistence::read_json(path.as_ref())?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn enemy_walk_range(&self) -> RangeInclusive<u32> {
        let (lo, hi) = self.enemy_walk_frames;
        lo.min(hi)..=hi.max(lo)
    }
}
