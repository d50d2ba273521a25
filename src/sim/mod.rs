//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per frame)
//! - Seeded RNG only
//! - Stable iteration order (grid cells sorted, entities in spawner order)
//! - No rendering or platform dependencies

pub mod animation;
pub mod assets;
pub mod camera;
pub mod clouds;
pub mod collision;
pub mod enemy;
pub mod entity;
pub mod particles;
pub mod player;
pub mod rect;
pub mod state;
pub mod tick;
pub mod tilemap;

pub use animation::Animation;
pub use assets::{AssetCatalog, AssetInfo, RenderContext};
pub use camera::Camera;
pub use clouds::{Cloud, Clouds};
pub use collision::{Collisions, move_and_collide};
pub use enemy::Enemy;
pub use entity::{Action, Body, PhysicsEntity};
pub use particles::{DashTrail, Leaves, Particle, Projectile, Projectiles, Spark, Sparks};
pub use player::Player;
pub use rect::Rect;
pub use state::GameState;
pub use tick::{TickInput, TickReport, tick};
pub use tilemap::{Tile, TileMap};
