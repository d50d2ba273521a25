//! Sparse tile index
//!
//! Two tile populations share one map:
//! - grid tiles, one per cell, keyed by truncated grid coordinates
//! - off-grid tiles, a plain list of freely positioned decor and markers
//!
//! Grid tiles live in a `BTreeMap` so every scan over them (extraction,
//! auto-tiling, saving) runs in the same order on every run.

use std::collections::BTreeMap;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::assets::{AssetCatalog, RenderContext};
use super::rect::Rect;
use crate::consts::{AUTOTILE_TYPES, NEIGHBOR_OFFSETS, TILE_SIZE};
use crate::{is_physics_tile, to_grid};

/// A placed tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Position in grid units (fractional for off-grid tiles)
    pub pos: Vec2,
    /// Index into the asset's image list
    pub variant: usize,
    /// Asset group tag ("grass", "stone", "spawners", ...)
    #[serde(rename = "type")]
    pub kind: String,
}

impl Tile {
    pub fn new(kind: impl Into<String>, variant: usize, pos: Vec2) -> Self {
        Self {
            pos,
            variant,
            kind: kind.into(),
        }
    }

    /// Grid cell this tile occupies
    #[inline]
    pub fn cell(&self) -> (i32, i32) {
        grid_key(self.pos)
    }

    pub fn matches(&self, kind: &str, variant: usize) -> bool {
        self.kind == kind && self.variant == variant
    }
}

/// Map key for a grid position (components truncated toward zero)
#[inline]
pub fn grid_key(grid_pos: Vec2) -> (i32, i32) {
    (grid_pos.x as i32, grid_pos.y as i32)
}

const RIGHT: u8 = 1;
const LEFT: u8 = 2;
const UP: u8 = 4;
const DOWN: u8 = 8;

/// 4-neighbour shifts and their bit in a neighbour mask
const AUTOTILE_SHIFTS: [((i32, i32), u8); 4] =
    [((1, 0), RIGHT), ((-1, 0), LEFT), ((0, -1), UP), ((0, 1), DOWN)];

/// Auto-tile variant for a mask of same-type neighbours
fn autotile_variant(mask: u8) -> Option<usize> {
    match mask {
        m if m == RIGHT | DOWN => Some(0),
        m if m == RIGHT | DOWN | LEFT => Some(1),
        m if m == LEFT | DOWN => Some(2),
        m if m == LEFT | UP | DOWN => Some(3),
        m if m == LEFT | UP => Some(4),
        m if m == LEFT | UP | RIGHT => Some(5),
        m if m == RIGHT | UP => Some(6),
        m if m == RIGHT | UP | DOWN => Some(7),
        m if m == RIGHT | LEFT | UP | DOWN => Some(8),
        _ => None,
    }
}

/// The tile index shared by every entity and spawner
#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    pub tile_size: i32,
    tiles: BTreeMap<(i32, i32), Tile>,
    offgrid: Vec<Tile>,
}

impl Default for TileMap {
    fn default() -> Self {
        Self::new(TILE_SIZE)
    }
}

impl TileMap {
    pub fn new(tile_size: i32) -> Self {
        assert!(tile_size > 0, "tile size must be positive");
        Self {
            tile_size,
            tiles: BTreeMap::new(),
            offgrid: Vec::new(),
        }
    }

    /// Insert a grid tile, replacing whatever occupied its cell
    pub fn set_tile(&mut self, tile: Tile) {
        self.tiles.insert(tile.cell(), tile);
    }

    /// Remove the grid tile at a grid position (no-op if empty)
    pub fn remove_tile(&mut self, grid_pos: Vec2) -> Option<Tile> {
        self.tiles.remove(&grid_key(grid_pos))
    }

    pub fn tile_at(&self, cell: IVec2) -> Option<&Tile> {
        self.tiles.get(&(cell.x, cell.y))
    }

    pub fn grid_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn offgrid_tiles(&self) -> &[Tile] {
        &self.offgrid
    }

    pub fn grid_len(&self) -> usize {
        self.tiles.len()
    }

    pub fn set_offgrid_tile(&mut self, tile: Tile) {
        self.offgrid.push(tile);
    }

    /// Remove the first off-grid tile at the same position as `tile`
    pub fn remove_offgrid_tile(&mut self, tile: &Tile) -> Option<Tile> {
        let idx = self.offgrid.iter().position(|t| t.pos == tile.pos)?;
        Some(self.offgrid.remove(idx))
    }

    /// Grid tiles in the fixed neighbourhood of a pixel position.
    ///
    /// Cells are probed in `NEIGHBOR_OFFSETS` order; a cell listed twice
    /// yields its tile twice.
    pub fn tiles_around(&self, pixel_pos: Vec2) -> Vec<&Tile> {
        let origin = to_grid(pixel_pos, self.tile_size);
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| self.tiles.get(&(origin.x + dx, origin.y + dy)))
            .collect()
    }

    /// Pixel-space rect covering one grid cell
    pub fn cell_rect(&self, grid_pos: Vec2) -> Rect {
        let ts = self.tile_size as f32;
        Rect::new(grid_pos.x * ts, grid_pos.y * ts, ts, ts)
    }

    /// Solid tile rects near a pixel position
    pub fn physics_rects_around(&self, pixel_pos: Vec2) -> Vec<Rect> {
        self.tiles_around(pixel_pos)
            .into_iter()
            .filter(|tile| is_physics_tile(&tile.kind))
            .map(|tile| self.cell_rect(tile.pos))
            .collect()
    }

    /// Whether the single cell containing `pixel_pos` holds a solid tile
    pub fn check_for_solid(&self, pixel_pos: Vec2) -> bool {
        self.tile_at(to_grid(pixel_pos, self.tile_size))
            .is_some_and(|tile| is_physics_tile(&tile.kind))
    }

    /// Collect tiles matching any `(type, variant)` pair.
    ///
    /// For each pair, off-grid matches come first (positions untouched), then
    /// grid matches in cell order with positions converted to pixels. With
    /// `keep == false` every match is removed from the map.
    pub fn extract(&mut self, pairs: &[(&str, usize)], keep: bool) -> Vec<Tile> {
        let ts = self.tile_size as f32;
        let mut matches = Vec::new();

        for &(kind, variant) in pairs {
            matches.extend(
                self.offgrid
                    .iter()
                    .filter(|t| t.matches(kind, variant))
                    .cloned(),
            );
            if !keep {
                self.offgrid.retain(|t| !t.matches(kind, variant));
            }

            let grid_hits: Vec<(i32, i32)> = self
                .tiles
                .iter()
                .filter(|(_, t)| t.matches(kind, variant))
                .map(|(key, _)| *key)
                .collect();
            for key in grid_hits {
                let tile = if keep {
                    self.tiles.get(&key).cloned()
                } else {
                    self.tiles.remove(&key)
                };
                if let Some(mut tile) = tile {
                    tile.pos *= ts;
                    matches.push(tile);
                }
            }
        }

        matches
    }

    /// Pick variants for auto-tiled types from their same-type neighbours
    pub fn auto_tile(&mut self) {
        let updates: Vec<((i32, i32), usize)> = self
            .tiles
            .iter()
            .filter(|(_, tile)| AUTOTILE_TYPES.contains(&tile.kind.as_str()))
            .filter_map(|(&(x, y), tile)| {
                let mask = AUTOTILE_SHIFTS
                    .iter()
                    .filter(|((dx, dy), _)| {
                        self.tiles
                            .get(&(x + dx, y + dy))
                            .is_some_and(|other| other.kind == tile.kind)
                    })
                    .fold(0u8, |mask, (_, bit)| mask | *bit);
                autotile_variant(mask).map(|variant| ((x, y), variant))
            })
            .collect();

        for (key, variant) in updates {
            if let Some(tile) = self.tiles.get_mut(&key) {
                tile.variant = variant;
            }
        }
    }

    /// Tiles the host should draw in a given context (off-grid first)
    pub fn visible_tiles<'a>(
        &'a self,
        context: RenderContext,
        catalog: &'a AssetCatalog,
    ) -> impl Iterator<Item = &'a Tile> + 'a {
        self.offgrid
            .iter()
            .chain(self.tiles.values())
            .filter(move |tile| catalog.should_render(&tile.kind, context))
    }
}
