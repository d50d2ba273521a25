//! Level state and bootstrap
//!
//! Everything one running level owns. Given the same map, catalog, tuning
//! and seed, two states advance identically.

use std::path::Path;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::assets::AssetCatalog;
use super::camera::Camera;
use super::clouds::Clouds;
use super::enemy::Enemy;
use super::particles::{DashTrail, Leaves, Projectiles, Sparks};
use super::player::Player;
use super::tilemap::TileMap;
use crate::consts::CLOUD_COUNT;
use crate::persistence::{self, MapError};
use crate::tuning::Tuning;

/// Spawner tile variants
pub const PLAYER_SPAWNER: usize = 0;
pub const ENEMY_SPAWNER: usize = 1;

#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub map: TileMap,
    pub catalog: AssetCatalog,
    pub tuning: Tuning,
    pub player: Player,
    /// Enemies in spawner order
    pub enemies: Vec<Enemy>,
    pub dash_trail: DashTrail,
    pub projectiles: Projectiles,
    pub sparks: Sparks,
    pub leaves: Leaves,
    pub clouds: Clouds,
    pub camera: Camera,
}

impl GameState {
    /// Build a level from a loaded map.
    ///
    /// Trees become leaf spawners, the first player spawner places the player
    /// and every enemy spawner places an enemy. Spawner tiles stay on the map.
    pub fn new(mut map: TileMap, catalog: AssetCatalog, tuning: Tuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let leaf_spawners = Leaves::spawners_from_map(&map);

        let mut player_pos = None;
        let mut enemies = Vec::new();
        for spawner in map.extract(&[("spawners", PLAYER_SPAWNER), ("spawners", ENEMY_SPAWNER)], true) {
            if spawner.variant == PLAYER_SPAWNER {
                if player_pos.is_some() {
                    log::warn!("Extra player spawner at {:?} ignored", spawner.pos);
                    continue;
                }
                player_pos = Some(spawner.pos);
            } else {
                enemies.push(Enemy::new(spawner.pos, &catalog));
            }
        }
        let player_pos = player_pos.unwrap_or_else(|| {
            log::warn!("Map has no player spawner; placing the player at the origin");
            Vec2::ZERO
        });
        let player = Player::new(player_pos, &catalog);

        let clouds = Clouds::new(CLOUD_COUNT, catalog.frames("clouds"), &mut rng);

        let mut camera = Camera::default();
        camera.center_on(player.body.rect().center());

        log::info!(
            "Level ready: player at {:?}, {} enemies, {} leaf spawners, seed {}",
            player_pos,
            enemies.len(),
            leaf_spawners.len(),
            seed
        );

        Self {
            seed,
            rng,
            time_ticks: 0,
            dash_trail: DashTrail::new(&catalog),
            projectiles: Projectiles::new(&catalog),
            sparks: Sparks::default(),
            leaves: Leaves::new(&catalog, leaf_spawners),
            clouds,
            camera,
            player,
            enemies,
            map,
            catalog,
            tuning,
        }
    }

    /// Load a map file and build a level from it
    pub fn load(
        path: impl AsRef<Path>,
        catalog: AssetCatalog,
        tuning: Tuning,
        seed: u64,
    ) -> Result<Self, MapError> {
        let map = persistence::load_map(path)?;
        Ok(Self::new(map, catalog, tuning, seed))
    }

    /// Count of live particles of every kind
    pub fn particle_count(&self) -> usize {
        self.dash_trail.particles.len()
            + self.leaves.particles.len()
            + self.projectiles.projectiles.len()
            + self.sparks.sparks.len()
    }
}
