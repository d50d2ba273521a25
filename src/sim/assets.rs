//! Asset catalog
//!
//! The simulation never touches image data. It only needs to know, per asset
//! key, how many frames an animation has, how large a sprite is (entity and
//! projectile hitboxes come from sprite size) and in which render contexts a
//! tile type is drawn. Decoding the images themselves belongs to the host.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Where a tile is being drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderContext {
    Game,
    Editor,
}

/// Metadata for one asset key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInfo {
    /// Number of images in the asset's frame list
    pub frames: usize,
    /// Pixel size of the first frame
    pub size: [u32; 2],
    #[serde(default = "default_true")]
    pub render_in_game: bool,
    #[serde(default = "default_true")]
    pub render_in_editor: bool,
}

fn default_true() -> bool {
    true
}

impl AssetInfo {
    pub fn new(frames: usize, width: u32, height: u32) -> Self {
        Self {
            frames,
            size: [width, height],
            render_in_game: true,
            render_in_editor: true,
        }
    }

    fn game_only(mut self) -> Self {
        self.render_in_editor = false;
        self
    }

    fn editor_only(mut self) -> Self {
        self.render_in_game = false;
        self
    }

    pub fn size_vec(&self) -> Vec2 {
        Vec2::new(self.size[0] as f32, self.size[1] as f32)
    }

    pub fn renders_in(&self, context: RenderContext) -> bool {
        match context {
            RenderContext::Game => self.render_in_game,
            RenderContext::Editor => self.render_in_editor,
        }
    }
}

/// Asset key -> metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetCatalog {
    pub assets: BTreeMap<String, AssetInfo>,
}

impl Default for AssetCatalog {
    /// Metadata for the bundled art set
    fn default() -> Self {
        let entries = [
            ("player", AssetInfo::new(1, 8, 15)),
            ("player_idle", AssetInfo::new(22, 14, 18)),
            ("player_run", AssetInfo::new(8, 14, 18)),
            ("player_jump", AssetInfo::new(1, 14, 18)),
            ("player_slide", AssetInfo::new(1, 14, 18)),
            ("player_wall_slide", AssetInfo::new(1, 14, 18)),
            ("enemy", AssetInfo::new(1, 8, 15)),
            ("enemy_idle", AssetInfo::new(16, 14, 18)),
            ("enemy_run", AssetInfo::new(8, 14, 18)),
            ("gun", AssetInfo::new(1, 7, 4)),
            ("projectile", AssetInfo::new(1, 5, 2)),
            ("decor", AssetInfo::new(4, 16, 16)),
            ("grass", AssetInfo::new(9, 16, 16)),
            ("large_decor", AssetInfo::new(3, 32, 32)),
            ("spawners", AssetInfo::new(2, 16, 16).editor_only()),
            ("stone", AssetInfo::new(9, 16, 16)),
            ("background", AssetInfo::new(1, 320, 240)),
            ("clouds", AssetInfo::new(2, 48, 24).game_only()),
            ("particle_leaf", AssetInfo::new(18, 4, 4).game_only()),
            ("particle", AssetInfo::new(4, 5, 5).game_only()),
        ];
        Self {
            assets: entries
                .into_iter()
                .map(|(key, info)| (key.to_string(), info))
                .collect(),
        }
    }
}

impl AssetCatalog {
    pub fn empty() -> Self {
        Self {
            assets: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, info: AssetInfo) {
        self.assets.insert(key.into(), info);
    }

    /// Look up an asset that must exist.
    ///
    /// Panics on an unknown key: every entity and tile type is expected to be
    /// backed by an asset, and there is no sensible frame to fall back to.
    pub fn get(&self, key: &str) -> &AssetInfo {
        self.assets
            .get(key)
            .unwrap_or_else(|| panic!("unknown asset key '{key}'"))
    }

    pub fn frames(&self, key: &str) -> usize {
        self.get(key).frames
    }

    pub fn size(&self, key: &str) -> Vec2 {
        self.get(key).size_vec()
    }

    pub fn should_render(&self, key: &str, context: RenderContext) -> bool {
        self.get(key).renders_in(context)
    }
}
