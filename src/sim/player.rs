//! The player: running, jumping, wall sliding and dashing

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::assets::AssetCatalog;
use super::entity::{Action, AnimationDef, Body, PhysicsEntity, animation_set};
use super::particles::DashTrail;
use super::tick::TickInput;
use super::tilemap::TileMap;
use crate::approach_zero;
use crate::tuning::Tuning;

const PLAYER_ANIMATIONS: [AnimationDef; 5] = [
    AnimationDef {
        action: Action::Idle,
        image_duration: 6,
        looping: true,
        offset: Vec2::new(-3.0, -3.0),
    },
    AnimationDef {
        action: Action::Run,
        image_duration: 4,
        looping: true,
        offset: Vec2::new(-3.0, -3.0),
    },
    AnimationDef {
        action: Action::Jump,
        image_duration: 5,
        looping: false,
        offset: Vec2::new(-3.0, -2.5),
    },
    AnimationDef {
        action: Action::Slide,
        image_duration: 5,
        looping: false,
        offset: Vec2::new(-3.0, -3.0),
    },
    AnimationDef {
        action: Action::WallSlide,
        image_duration: 5,
        looping: false,
        offset: Vec2::new(-3.0, -3.0),
    },
];

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    /// Frames since last standing on a floor
    pub air_time: u32,
    /// Jumps left before landing again
    pub jumps: u32,
    pub wall_slide: bool,
    /// Signed dash counter: magnitude counts down, sign is the direction
    pub dashing: i32,
}

impl PhysicsEntity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Player {
    pub fn new(pos: Vec2, catalog: &AssetCatalog) -> Self {
        Self {
            body: Body::new(
                "player",
                pos,
                catalog.size("player"),
                animation_set(catalog, "player", &PLAYER_ANIMATIONS),
            ),
            air_time: 0,
            jumps: 1,
            wall_slide: false,
            dashing: 0,
        }
    }

    /// Jump off the ground, or off a wall while sliding.
    ///
    /// A wall jump needs the player to push toward the wall they cling to.
    /// Returns whether a jump happened.
    pub fn jump(&mut self, input: &TickInput, tuning: &Tuning) -> bool {
        if self.wall_slide {
            let away = if self.body.flipped && input.left {
                1.0
            } else if !self.body.flipped && input.right {
                -1.0
            } else {
                return false;
            };
            self.body.vel = Vec2::new(away * tuning.wall_jump.x, -tuning.wall_jump.y);
            self.air_time = tuning.airborne_frames + 1;
            self.jumps = self.jumps.saturating_sub(1);
            return true;
        }

        if self.jumps > 0 {
            self.body.vel.y = -tuning.jump_speed;
            self.jumps -= 1;
            self.air_time = tuning.airborne_frames + 1;
            return true;
        }
        false
    }

    /// Start a dash in the facing direction. Ignored while one is running.
    pub fn dash(&mut self, tuning: &Tuning) -> bool {
        if self.dashing != 0 {
            return false;
        }
        self.dashing = if self.body.flipped {
            -tuning.dash_frames
        } else {
            tuning.dash_frames
        };
        true
    }

    /// The dash is overriding horizontal movement
    pub fn is_dashing(&self, tuning: &Tuning) -> bool {
        self.dashing.abs() > tuning.dash_active_above
    }

    /// Hidden during the active part of a dash
    pub fn is_visible(&self, tuning: &Tuning) -> bool {
        !self.is_dashing(tuning)
    }

    pub fn is_airborne(&self, tuning: &Tuning) -> bool {
        self.air_time > tuning.airborne_frames
    }

    /// Advance one frame. Returns whether the player jumped.
    pub fn update(
        &mut self,
        input: &TickInput,
        map: &TileMap,
        tuning: &Tuning,
        trail: &mut DashTrail,
        rng: &mut impl Rng,
    ) -> bool {
        self.body.advance_animation();

        let intent_x = input.intent_x();
        let movement = Vec2::new(intent_x, 0.0);
        let jumped = input.jump && self.jump(input, tuning);
        if input.dash {
            self.dash(tuning);
        }

        self.body.move_and_collide(movement, map);

        if self.body.collisions.bottom {
            self.air_time = 0;
            self.jumps = 1;
        } else {
            self.air_time += 1;
        }

        self.wall_slide = false;
        if self.body.collisions.side() && self.is_airborne(tuning) {
            self.wall_slide = true;
            self.body.vel.y = self.body.vel.y.min(tuning.wall_slide_speed);
            self.body.flipped = self.body.collisions.left;
        }

        let action = if self.wall_slide {
            Action::WallSlide
        } else if self.is_airborne(tuning) {
            Action::Jump
        } else if intent_x != 0.0 {
            Action::Run
        } else {
            Action::Idle
        };
        self.body.set_action(action);

        self.update_dash(tuning, trail, rng);

        self.body.face(intent_x);
        self.body.vel.x = approach_zero(self.body.vel.x, tuning.air_friction);
        self.body.apply_gravity(tuning);

        jumped
    }

    /// Dash bursts, speed override and countdown
    fn update_dash(&mut self, tuning: &Tuning, trail: &mut DashTrail, rng: &mut impl Rng) {
        let magnitude = self.dashing.abs();
        let sign = self.dashing.signum() as f32;
        let center = self.body.rect().center();

        if magnitude == tuning.dash_frames || magnitude == tuning.dash_active_above {
            for _ in 0..tuning.dash_burst {
                let angle = rng.random::<f32>() * TAU;
                let speed = rng.random::<f32>() * 0.5 + 0.5;
                let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
                trail.spawn(center, vel, rng);
            }
        }

        if magnitude > tuning.dash_active_above {
            self.body.vel.x = sign * tuning.dash_speed;
            if magnitude == tuning.dash_active_above + 1 {
                self.body.vel.x *= tuning.dash_taper;
            }
            let vel = Vec2::new(sign * rng.random::<f32>() * 3.0, 0.0);
            trail.spawn(center, vel, rng);
        }

        self.dashing -= self.dashing.signum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tilemap::Tile;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Rig {
        player: Player,
        map: TileMap,
        tuning: Tuning,
        trail: DashTrail,
        rng: Pcg32,
    }

    impl Rig {
        /// Player standing on a stone floor at row 5
        fn on_floor() -> Self {
            let catalog = AssetCatalog::default();
            let mut map = TileMap::new(16);
            for x in 0..20 {
                map.set_tile(Tile::new("stone", 0, Vec2::new(x as f32, 5.0)));
            }
            let mut rig = Self {
                player: Player::new(Vec2::new(100.0, 60.0), &catalog),
                map,
                tuning: Tuning::default(),
                trail: DashTrail::new(&catalog),
                rng: Pcg32::seed_from_u64(1),
            };
            for _ in 0..30 {
                rig.step(TickInput::default());
            }
            // resting contact alternates with a zero-movement frame
            if !rig.player.body.collisions.bottom {
                rig.step(TickInput::default());
            }
            rig
        }

        fn step(&mut self, input: TickInput) -> bool {
            self.player
                .update(&input, &self.map, &self.tuning, &mut self.trail, &mut self.rng)
        }
    }

    #[test]
    fn test_settles_on_floor() {
        let rig = Rig::on_floor();
        assert_eq!(rig.player.body.rect().bottom(), 80.0);
        assert_eq!(rig.player.jumps, 1);
        assert_eq!(rig.player.air_time, 0);
        assert_eq!(rig.player.body.action, Action::Idle);
    }

    #[test]
    fn test_single_jump_then_denied() {
        let mut rig = Rig::on_floor();
        let input = TickInput::default();

        assert!(rig.player.jump(&input, &rig.tuning));
        assert_eq!(rig.player.jumps, 0);
        assert_eq!(rig.player.body.vel.y, -3.0);
        assert_eq!(rig.player.air_time, 5);

        let vel = rig.player.body.vel;
        assert!(!rig.player.jump(&input, &rig.tuning));
        assert_eq!(rig.player.jumps, 0);
        assert_eq!(rig.player.body.vel, vel);
    }

    #[test]
    fn test_jump_through_update_goes_airborne() {
        let mut rig = Rig::on_floor();
        let jumped = rig.step(TickInput {
            jump: true,
            ..Default::default()
        });
        assert!(jumped);
        assert!(rig.player.body.pos.y < 65.0);
        assert_eq!(rig.player.body.action, Action::Jump);

        // lands again eventually
        for _ in 0..120 {
            rig.step(TickInput::default());
        }
        assert_eq!(rig.player.jumps, 1);
        assert_eq!(rig.player.body.action, Action::Idle);
    }

    #[test]
    fn test_run_sets_action_and_facing() {
        let mut rig = Rig::on_floor();
        let start_x = rig.player.body.pos.x;
        for _ in 0..3 {
            rig.step(TickInput {
                left: true,
                ..Default::default()
            });
        }
        assert_eq!(rig.player.body.pos.x, start_x - 3.0);
        assert_eq!(rig.player.body.action, Action::Run);
        assert!(rig.player.body.flipped);
    }

    #[test]
    fn test_dash_counter_and_override() {
        let mut rig = Rig::on_floor();
        assert!(rig.player.dash(&rig.tuning));
        assert_eq!(rig.player.dashing, 60);
        assert!(!rig.player.dash(&rig.tuning));

        rig.step(TickInput::default());
        assert_eq!(rig.player.body.vel.x, 8.0 - 0.1);
        // first frame: burst of 20 plus one trail particle
        assert_eq!(rig.trail.particles.len(), 21);
        assert!(!rig.player.is_visible(&rig.tuning));

        for _ in 0..8 {
            rig.step(TickInput::default());
        }
        assert_eq!(rig.player.dashing, 51);
        rig.step(TickInput::default());
        // last active frame tapers the speed
        assert!((rig.player.body.vel.x - (0.8 - 0.1)).abs() < 1e-5);
        assert_eq!(rig.player.dashing, 50);
        assert!(!rig.player.is_dashing(&rig.tuning));
        assert!(rig.player.is_visible(&rig.tuning));
    }

    #[test]
    fn test_dash_left_when_flipped() {
        let mut rig = Rig::on_floor();
        rig.player.body.flipped = true;
        rig.player.dash(&rig.tuning);
        assert_eq!(rig.player.dashing, -60);
        rig.step(TickInput::default());
        assert!(rig.player.body.vel.x < 0.0);
    }

    #[test]
    fn test_dash_counter_returns_to_zero() {
        let mut rig = Rig::on_floor();
        rig.player.dash(&rig.tuning);
        for _ in 0..60 {
            rig.step(TickInput::default());
        }
        assert_eq!(rig.player.dashing, 0);
        assert!(rig.player.dash(&rig.tuning));
    }

    #[test]
    fn test_wall_slide_and_wall_jump() {
        let catalog = AssetCatalog::default();
        let mut map = TileMap::new(16);
        for y in 0..20 {
            map.set_tile(Tile::new("stone", 0, Vec2::new(10.0, y as f32)));
        }
        let mut rig = Rig {
            player: Player::new(Vec2::new(150.0, 40.0), &catalog),
            map,
            tuning: Tuning::default(),
            trail: DashTrail::new(&catalog),
            rng: Pcg32::seed_from_u64(2),
        };

        let push_right = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..10 {
            rig.step(push_right);
        }
        assert!(rig.player.wall_slide);
        assert_eq!(rig.player.body.action, Action::WallSlide);
        assert!(!rig.player.body.flipped);
        assert!(rig.player.body.vel.y <= 0.5 + rig.tuning.gravity);

        assert!(rig.player.jump(&push_right, &rig.tuning));
        assert_eq!(rig.player.body.vel, Vec2::new(-3.5, -2.5));
        assert_eq!(rig.player.air_time, 5);
    }

    #[test]
    fn test_wall_jump_needs_push_toward_wall() {
        let mut rig = Rig::on_floor();
        rig.player.wall_slide = true;
        rig.player.body.flipped = true;
        assert!(!rig.player.jump(&TickInput::default(), &rig.tuning));

        let push_left = TickInput {
            left: true,
            ..Default::default()
        };
        assert!(rig.player.jump(&push_left, &rig.tuning));
        assert_eq!(rig.player.body.vel, Vec2::new(3.5, -2.5));
    }
}
