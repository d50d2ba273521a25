//! Patrolling, ledge-aware enemies that shoot along the ground

use glam::Vec2;
use rand::Rng;

use super::assets::AssetCatalog;
use super::entity::{Action, AnimationDef, Body, PhysicsEntity, animation_set};
use super::particles::{Projectiles, Sparks};
use super::tilemap::TileMap;
use crate::tuning::Tuning;

const ENEMY_ANIMATIONS: [AnimationDef; 2] = [
    AnimationDef {
        action: Action::Idle,
        image_duration: 8,
        looping: true,
        offset: Vec2::new(-3.0, -3.0),
    },
    AnimationDef {
        action: Action::Run,
        image_duration: 4,
        looping: true,
        offset: Vec2::new(-3.0, -3.0),
    },
];

/// Vertical offset of the muzzle from the enemy's top edge
const MUZZLE_HEIGHT: f32 = 8.0;

#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: Body,
    /// Frames left in the current walk; zero when standing
    pub walking: u32,
}

impl PhysicsEntity for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Enemy {
    pub fn new(pos: Vec2, catalog: &AssetCatalog) -> Self {
        Self {
            body: Body::new(
                "enemy",
                pos,
                catalog.size("enemy"),
                animation_set(catalog, "enemy", &ENEMY_ANIMATIONS),
            ),
            walking: 0,
        }
    }

    /// Point checked for ground ahead of the enemy
    pub fn ledge_probe(&self, tuning: &Tuning) -> Vec2 {
        let ahead = if self.body.flipped {
            -tuning.enemy_ledge_probe.x
        } else {
            tuning.enemy_ledge_probe.x
        };
        Vec2::new(
            self.body.rect().center().x + ahead,
            self.body.pos.y + tuning.enemy_ledge_probe.y,
        )
    }

    /// Advance one frame. Returns whether the enemy fired.
    pub fn update(
        &mut self,
        player_pos: Vec2,
        map: &TileMap,
        tuning: &Tuning,
        projectiles: &mut Projectiles,
        sparks: &mut Sparks,
        rng: &mut impl Rng,
    ) -> bool {
        self.body.advance_animation();

        let mut movement = 0.0;
        let mut fired = false;
        if self.walking > 0 {
            let blocked = if self.body.flipped {
                self.body.collisions.left
            } else {
                self.body.collisions.right
            };
            if map.check_for_solid(self.ledge_probe(tuning)) && !blocked {
                movement = if self.body.flipped {
                    -tuning.enemy_walk_speed
                } else {
                    tuning.enemy_walk_speed
                };
            } else {
                self.body.flipped = !self.body.flipped;
            }

            self.walking -= 1;
            if self.walking == 0 {
                fired = self.try_shoot(player_pos, tuning, projectiles, sparks, rng);
            }
        } else if rng.random_range(0..tuning.enemy_walk_chance.max(1)) == 0 {
            self.walking = rng.random_range(tuning.enemy_walk_range());
        }

        self.body.move_and_collide(Vec2::new(movement, 0.0), map);
        self.body.face(movement);
        self.body.apply_gravity(tuning);

        let action = if movement != 0.0 { Action::Run } else { Action::Idle };
        self.body.set_action(action);

        fired
    }

    /// Fire along the facing direction if the player is level with us and on
    /// that side
    fn try_shoot(
        &self,
        player_pos: Vec2,
        tuning: &Tuning,
        projectiles: &mut Projectiles,
        sparks: &mut Sparks,
        rng: &mut impl Rng,
    ) -> bool {
        let dist = player_pos - self.body.pos;
        if dist.y.abs() >= tuning.enemy_shot_band {
            return false;
        }

        let dir = match (self.body.flipped, dist.x) {
            (true, dx) if dx < 0.0 => -1.0,
            (false, dx) if dx > 0.0 => 1.0,
            _ => return false,
        };

        let muzzle = Vec2::new(self.body.pos.x, self.body.pos.y + MUZZLE_HEIGHT);
        projectiles.spawn(muzzle, Vec2::new(dir * tuning.projectile_speed, 0.0));
        sparks.burst(muzzle, tuning.enemy_sparks_per_shot, rng);
        log::debug!("Enemy at {:?} fired {}", self.body.pos, if dir < 0.0 { "left" } else { "right" });
        true
    }
}
