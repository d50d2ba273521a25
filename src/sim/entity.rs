//! Shared physics body for player and enemies

use std::collections::HashMap;

use glam::Vec2;

use super::animation::Animation;
use super::assets::AssetCatalog;
use super::collision::{self, Collisions};
use super::rect::Rect;
use super::tilemap::TileMap;
use crate::tuning::Tuning;

/// Animation state of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Idle,
    Run,
    Jump,
    Slide,
    WallSlide,
}

impl Action {
    /// Suffix of the asset key, e.g. `player_wall_slide`
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Idle => "idle",
            Action::Run => "run",
            Action::Jump => "jump",
            Action::Slide => "slide",
            Action::WallSlide => "wall_slide",
        }
    }
}

/// How one action animates
#[derive(Debug, Clone, Copy)]
pub struct AnimationDef {
    pub action: Action,
    pub image_duration: usize,
    pub looping: bool,
    pub offset: Vec2,
}

/// Build an entity's animation set from `{kind}_{action}` catalog keys
pub fn animation_set(
    catalog: &AssetCatalog,
    kind: &str,
    defs: &[AnimationDef],
) -> HashMap<Action, Animation> {
    defs.iter()
        .map(|def| {
            let key = format!("{kind}_{}", def.action.as_str());
            let frames = catalog.frames(&key);
            let anim = Animation::new(key, frames, def.image_duration, def.looping)
                .with_offset(def.offset);
            (def.action, anim)
        })
        .collect()
}

/// Position, velocity and collision state shared by every moving entity
#[derive(Debug, Clone)]
pub struct Body {
    /// Entity type ("player", "enemy")
    pub kind: String,
    /// Top-left corner of the collision box
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Sides touched during the last move
    pub collisions: Collisions,
    pub action: Action,
    pub animations: HashMap<Action, Animation>,
    /// Facing left
    pub flipped: bool,
}

impl Body {
    /// Panics if the animation set has no idle animation.
    pub fn new(
        kind: impl Into<String>,
        pos: Vec2,
        size: Vec2,
        animations: HashMap<Action, Animation>,
    ) -> Self {
        let kind = kind.into();
        assert!(
            animations.contains_key(&Action::Idle),
            "entity '{kind}' has no idle animation"
        );
        Self {
            kind,
            pos,
            vel: Vec2::ZERO,
            size,
            collisions: Collisions::default(),
            action: Action::Idle,
            animations,
            flipped: false,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Current animation
    pub fn animation(&self) -> &Animation {
        match self.animations.get(&self.action) {
            Some(anim) => anim,
            None => panic!("entity '{}' has no '{}' animation", self.kind, self.action.as_str()),
        }
    }

    fn animation_mut(&mut self) -> &mut Animation {
        match self.animations.get_mut(&self.action) {
            Some(anim) => anim,
            None => panic!("entity '{}' has no '{}' animation", self.kind, self.action.as_str()),
        }
    }

    /// Switch action, rewinding the new animation. No-op if unchanged.
    pub fn set_action(&mut self, action: Action) {
        if self.action != action {
            self.action = action;
            self.animation_mut().reset();
        }
    }

    pub fn advance_animation(&mut self) {
        self.animation_mut().update();
    }

    /// Move by `movement` plus the current velocity and record collisions
    pub fn move_and_collide(&mut self, movement: Vec2, map: &TileMap) {
        let frame_movement = movement + self.vel;
        self.collisions = collision::move_and_collide(&mut self.pos, self.size, frame_movement, map);
    }

    /// Face the direction of horizontal intent; zero keeps the facing
    pub fn face(&mut self, intent_x: f32) {
        if intent_x > 0.0 {
            self.flipped = false;
        }
        if intent_x < 0.0 {
            self.flipped = true;
        }
    }

    /// Accelerate downward up to terminal speed; floors and ceilings stop it
    pub fn apply_gravity(&mut self, tuning: &Tuning) {
        self.vel.y = (self.vel.y + tuning.gravity).min(tuning.max_fall_speed);
        if self.collisions.vertical() {
            self.vel.y = 0.0;
        }
    }
}

/// Anything driven by a `Body`
pub trait PhysicsEntity {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn rect(&self) -> Rect {
        self.body().rect()
    }

    /// Image index of the current animation
    fn image_index(&self) -> usize {
        self.body().animation().image_index()
    }

    /// Asset key of the image to draw
    fn image_asset(&self) -> &str {
        &self.body().animation().asset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tilemap::Tile;

    fn body() -> Body {
        let catalog = AssetCatalog::default();
        let defs = [
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
        Body::new(
            "enemy",
            Vec2::new(20.0, 20.0),
            Vec2::new(8.0, 15.0),
            animation_set(&catalog, "enemy", &defs),
        )
    }

    #[test]
    fn test_animation_set_uses_catalog_frames() {
        let body = body();
        let run = &body.animations[&Action::Run];
        assert_eq!(run.asset, "enemy_run");
        assert_eq!(run.frames, 8);
        assert_eq!(run.offset, Vec2::new(-3.0, -3.0));
    }

    #[test]
    fn test_set_action_resets_only_on_change() {
        let mut body = body();
        body.set_action(Action::Run);
        body.advance_animation();
        body.advance_animation();
        body.set_action(Action::Run);
        assert_eq!(body.animation().frame, 2);

        body.set_action(Action::Idle);
        body.set_action(Action::Run);
        assert_eq!(body.animation().frame, 0);
    }

    #[test]
    fn test_gravity_caps_and_floor_stops() {
        let tuning = Tuning::default();
        let mut body = body();
        for _ in 0..100 {
            body.apply_gravity(&tuning);
        }
        assert_eq!(body.vel.y, tuning.max_fall_speed);

        let mut map = TileMap::new(16);
        map.set_tile(Tile::new("stone", 0, Vec2::new(1.0, 3.0)));
        body.pos = Vec2::new(20.0, 31.0);
        body.move_and_collide(Vec2::ZERO, &map);
        assert!(body.collisions.bottom);
        assert_eq!(body.pos.y + body.size.y, 48.0);
        body.apply_gravity(&tuning);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_face_keeps_direction_on_zero() {
        let mut body = body();
        body.face(-1.0);
        assert!(body.flipped);
        body.face(0.0);
        assert!(body.flipped);
        body.face(0.5);
        assert!(!body.flipped);
    }
}
