//! Short-lived effects: dash trail, leaves, projectiles and sparks
//!
//! Each effect kind lives in its own ordered collection. Removal is
//! predicate-based, so every particle is updated exactly once per frame no
//! matter how many others die in the same pass.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::animation::Animation;
use super::assets::AssetCatalog;
use super::rect::Rect;
use super::tilemap::TileMap;
use crate::approach_zero;
use crate::tuning::Tuning;

/// Leaf spawners are this variant of `large_decor` (trees)
pub const TREE_VARIANT: usize = 2;
/// Leaf spawn area relative to a tree's position
pub const TREE_CANOPY_OFFSET: Vec2 = Vec2::new(4.0, 4.0);
pub const TREE_CANOPY_SIZE: Vec2 = Vec2::new(24.0, 12.0);

/// Highest random start tick of a dash particle
const DASH_START_FRAME_MAX: usize = 7;
/// Highest random start tick of a leaf
const LEAF_START_FRAME_MAX: usize = 20;
/// Leaf sway: `x += sin(frame * LEAF_SWAY_RATE) * LEAF_SWAY_AMPLITUDE`
const LEAF_SWAY_RATE: f32 = 0.035;
const LEAF_SWAY_AMPLITUDE: f32 = 0.3;

/// An animated particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub animation: Animation,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, animation: Animation) -> Self {
        Self { pos, vel, animation }
    }

    /// Move and animate. Returns true when the particle should be removed,
    /// which happens the frame after its animation finishes.
    pub fn update(&mut self) -> bool {
        let kill = self.animation.done;
        self.pos += self.vel;
        self.animation.update();
        kill
    }
}

/// Particles thrown off by the player's dash
#[derive(Debug, Clone)]
pub struct DashTrail {
    pub particles: Vec<Particle>,
    template: Animation,
}

impl DashTrail {
    pub fn new(catalog: &AssetCatalog) -> Self {
        Self {
            particles: Vec::new(),
            template: Animation::new("particle", catalog.frames("particle"), 6, false),
        }
    }

    pub fn spawn(&mut self, pos: Vec2, vel: Vec2, rng: &mut impl Rng) {
        let start = rng.random_range(0..=DASH_START_FRAME_MAX);
        let animation = self.template.clone().with_start_frame(start);
        self.particles.push(Particle::new(pos, vel, animation));
    }

    pub fn update(&mut self) {
        self.particles.retain_mut(|p| !p.update());
    }
}

/// Falling leaves emitted from tree canopies
#[derive(Debug, Clone)]
pub struct Leaves {
    pub particles: Vec<Particle>,
    /// Canopy rects leaves spawn inside
    pub spawners: Vec<Rect>,
    template: Animation,
}

impl Leaves {
    pub fn new(catalog: &AssetCatalog, spawners: Vec<Rect>) -> Self {
        Self {
            particles: Vec::new(),
            spawners,
            template: Animation::new("particle_leaf", catalog.frames("particle_leaf"), 20, false),
        }
    }

    /// Canopy rects for every tree on the map, off-grid trees first.
    /// Both populations store grid units, so each tree is scaled to pixels.
    pub fn spawners_from_map(map: &TileMap) -> Vec<Rect> {
        let ts = map.tile_size as f32;
        map.offgrid_tiles()
            .iter()
            .chain(map.grid_tiles())
            .filter(|tile| tile.matches("large_decor", TREE_VARIANT))
            .map(|tree| Rect::from_pos_size(tree.pos * ts + TREE_CANOPY_OFFSET, TREE_CANOPY_SIZE))
            .collect()
    }

    /// Roll each spawner, then move, animate and sway every leaf
    pub fn update(&mut self, tuning: &Tuning, rng: &mut impl Rng) {
        for spawner in &self.spawners {
            if rng.random::<f32>() * tuning.leaf_spawn_divisor < spawner.area() {
                let pos = Vec2::new(
                    spawner.x + rng.random::<f32>() * spawner.width,
                    spawner.y + rng.random::<f32>() * spawner.height,
                );
                let start = rng.random_range(0..=LEAF_START_FRAME_MAX);
                let animation = self.template.clone().with_start_frame(start);
                self.particles
                    .push(Particle::new(pos, tuning.leaf_velocity, animation));
            }
        }

        self.particles.retain_mut(|leaf| {
            let kill = leaf.update();
            leaf.pos.x += (leaf.animation.frame as f32 * LEAF_SWAY_RATE).sin() * LEAF_SWAY_AMPLITUDE;
            !kill
        });
    }
}

/// Enemy bullets
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames alive
    pub age: u32,
}

#[derive(Debug, Clone)]
pub struct Projectiles {
    pub projectiles: Vec<Projectile>,
    /// Collision size (the projectile image)
    pub size: Vec2,
}

impl Projectiles {
    pub fn new(catalog: &AssetCatalog) -> Self {
        Self {
            projectiles: Vec::new(),
            size: catalog.size("projectile"),
        }
    }

    pub fn spawn(&mut self, pos: Vec2, vel: Vec2) {
        self.projectiles.push(Projectile { pos, vel, age: 0 });
    }

    pub fn rect(&self, projectile: &Projectile) -> Rect {
        Rect::from_pos_size(projectile.pos, self.size)
    }

    /// Age and move every projectile, dropping those that expired, entered a
    /// solid tile or struck the player. `player_dash` is the player's dash
    /// counter; an active dash makes the player immune.
    ///
    /// Returns the number of projectiles that struck the player.
    pub fn update(
        &mut self,
        map: &TileMap,
        player_rect: Rect,
        player_dash: i32,
        tuning: &Tuning,
    ) -> usize {
        let size = self.size;
        let vulnerable = player_dash.abs() < tuning.dash_active_above;
        let mut hits = 0;

        self.projectiles.retain_mut(|p| {
            p.age += 1;
            p.pos += p.vel;

            if p.age > tuning.projectile_lifetime || map.check_for_solid(p.pos) {
                return false;
            }
            if vulnerable && Rect::from_pos_size(p.pos, size).intersects(&player_rect) {
                hits += 1;
                return false;
            }
            true
        });

        if hits > 0 {
            log::debug!("{hits} projectile(s) hit the player");
        }
        hits
    }
}

/// A streak flying at `angle`, slowing until it stops
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    pub pos: Vec2,
    pub angle: f32,
    /// Per-axis speed, decays toward zero
    pub vel: Vec2,
}

impl Spark {
    pub fn new(pos: Vec2, angle: f32, vel: Vec2) -> Self {
        Self { pos, angle, vel }
    }

    /// Returns true once both speed components reached zero
    pub fn update(&mut self, decay: f32) -> bool {
        self.pos.x += self.angle.cos() * self.vel.x;
        self.pos.y += self.angle.sin() * self.vel.y;
        self.vel.x = approach_zero(self.vel.x, decay);
        self.vel.y = approach_zero(self.vel.y, decay);
        self.vel == Vec2::ZERO
    }

    /// Kite outline: tip, side, tail, side. Scaled per axis by the current
    /// speed.
    pub fn polygon(&self) -> [Vec2; 4] {
        let point = |angle: f32, len: f32| {
            self.pos + Vec2::new(angle.cos() * self.vel.x, angle.sin() * self.vel.y) * len
        };
        [
            point(self.angle, 3.0),
            point(self.angle + FRAC_PI_2, 0.5),
            point(self.angle + PI, 3.0),
            point(self.angle - FRAC_PI_2, 0.5),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sparks {
    pub sparks: Vec<Spark>,
}

impl Sparks {
    pub fn spawn(&mut self, spark: Spark) {
        self.sparks.push(spark);
    }

    /// Emit `count` sparks at `pos`, angles uniform over the full circle
    pub fn burst(&mut self, pos: Vec2, count: usize, rng: &mut impl Rng) {
        for _ in 0..count {
            let angle = rng.random::<f32>() * TAU;
            self.spawn(Spark::new(pos, angle, Vec2::ONE));
        }
    }

    pub fn update(&mut self, tuning: &Tuning) {
        self.sparks.retain_mut(|s| !s.update(tuning.spark_decay));
    }
}
