//! Save/load of level data
//!
//! Features:
//! - JSON map document (`tile_size`, `tilemap` keyed by "x;y", `offgrid_tiles`)
//! - Accepts the capitalised field spelling written by older editors
//! - Asset catalog documents
//!
//! A failed load never yields a partial map.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::sim::assets::AssetCatalog;
use crate::sim::tilemap::{Tile, TileMap};

/// Persistence errors
#[derive(Debug, Error)]
pub enum MapError {
    /// File could not be read or written
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// File contents are not a valid document
    #[error("failed to parse {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Document could not be encoded
    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
    /// Grid key is not of the form "x;y"
    #[error("invalid tile key '{0}' (expected \"x;y\")")]
    InvalidKey(String),
    /// Tile size is zero, negative or too large
    #[error("invalid tile size {0}")]
    InvalidTileSize(i64),
}

/// Read and decode a JSON document
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, MapError> {
    let text = fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| MapError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode and write a JSON document, creating the file if needed
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), MapError> {
    let text = serde_json::to_string_pretty(value).map_err(MapError::Encode)?;
    fs::write(path, text).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Positions appear either as `[x, y]` or as `{"X": x, "Y": y}`
#[derive(Deserialize)]
#[serde(untagged)]
enum PosRepr {
    Pair([f32; 2]),
    Named {
        #[serde(alias = "X")]
        x: f32,
        #[serde(alias = "Y")]
        y: f32,
    },
}

fn deserialize_pos<'de, D>(deserializer: D) -> Result<[f32; 2], D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match PosRepr::deserialize(deserializer)? {
        PosRepr::Pair(pair) => pair,
        PosRepr::Named { x, y } => [x, y],
    })
}

#[derive(Debug, Serialize, Deserialize)]
struct TileRecord {
    #[serde(rename = "type", alias = "Type")]
    kind: String,
    #[serde(alias = "Variant")]
    variant: usize,
    #[serde(alias = "Position", deserialize_with = "deserialize_pos")]
    pos: [f32; 2],
}

impl From<&Tile> for TileRecord {
    fn from(tile: &Tile) -> Self {
        Self {
            kind: tile.kind.clone(),
            variant: tile.variant,
            pos: [tile.pos.x, tile.pos.y],
        }
    }
}

impl From<TileRecord> for Tile {
    fn from(record: TileRecord) -> Self {
        Tile::new(record.kind, record.variant, Vec2::from(record.pos))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct MapDocument {
    #[serde(alias = "TileSize")]
    tile_size: i64,
    #[serde(rename = "tilemap", alias = "Tiles", default, deserialize_with = "null_as_default")]
    tiles: BTreeMap<String, TileRecord>,
    #[serde(
        rename = "offgrid_tiles",
        alias = "OffGridTiles",
        default,
        deserialize_with = "null_as_default"
    )]
    offgrid: Vec<TileRecord>,
}

/// Parse a "x;y" grid key
pub fn parse_key(key: &str) -> Result<(i32, i32), MapError> {
    let invalid = || MapError::InvalidKey(key.to_string());
    let (x, y) = key.split_once(';').ok_or_else(invalid)?;
    let x = x.trim().parse().map_err(|_| invalid())?;
    let y = y.trim().parse().map_err(|_| invalid())?;
    Ok((x, y))
}

/// Format a grid cell as a "x;y" key
pub fn format_key((x, y): (i32, i32)) -> String {
    format!("{x};{y}")
}

impl MapDocument {
    fn into_tilemap(self) -> Result<TileMap, MapError> {
        let tile_size = i32::try_from(self.tile_size)
            .ok()
            .filter(|ts| *ts > 0)
            .ok_or(MapError::InvalidTileSize(self.tile_size))?;

        let mut map = TileMap::new(tile_size);
        for (key, record) in self.tiles {
            let cell = parse_key(&key)?;
            let tile = Tile::from(record);
            if tile.cell() != cell {
                log::warn!(
                    "Tile key '{}' disagrees with its position {:?}; using the position",
                    key,
                    tile.pos
                );
            }
            map.set_tile(tile);
        }
        for record in self.offgrid {
            map.set_offgrid_tile(record.into());
        }
        Ok(map)
    }

    fn from_tilemap(map: &TileMap) -> Self {
        Self {
            tile_size: map.tile_size as i64,
            tiles: map
                .grid_tiles()
                .map(|tile| (format_key(tile.cell()), TileRecord::from(tile)))
                .collect(),
            offgrid: map.offgrid_tiles().iter().map(TileRecord::from).collect(),
        }
    }
}

/// Load a tile map document
pub fn load_map(path: impl AsRef<Path>) -> Result<TileMap, MapError> {
    let path = path.as_ref();
    let doc: MapDocument = read_json(path)?;
    let map = doc.into_tilemap()?;
    log::info!(
        "Loaded map {} ({} grid tiles, {} off-grid tiles, tile size {})",
        path.display(),
        map.grid_len(),
        map.offgrid_tiles().len(),
        map.tile_size
    );
    Ok(map)
}

/// Save a tile map document, creating the file if absent
pub fn save_map(map: &TileMap, path: impl AsRef<Path>) -> Result<(), MapError> {
    let path = path.as_ref();
    write_json(path, &MapDocument::from_tilemap(map))?;
    log::info!("Saved map {} ({} grid tiles)", path.display(), map.grid_len());
    Ok(())
}

/// Load an asset catalog document
pub fn load_catalog(path: impl AsRef<Path>) -> Result<AssetCatalog, MapError> {
    let catalog: AssetCatalog = read_json(path.as_ref())?;
    log::info!(
        "Loaded asset catalog {} ({} keys)",
        path.as_ref().display(),
        catalog.assets.len()
    );
    Ok(catalog)
}

pub fn save_catalog(catalog: &AssetCatalog, path: impl AsRef<Path>) -> Result<(), MapError> {
    write_json(path.as_ref(), catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn sample_map() -> TileMap {
        let mut map = TileMap::new(16);
        map.set_tile(Tile::new("grass", 1, Vec2::new(3.0, 4.0)));
        map.set_tile(Tile::new("stone", 0, Vec2::new(-2.0, 9.0)));
        map.set_offgrid_tile(Tile::new("large_decor", 2, Vec2::new(4.5, 1.25)));
        map
    }

    #[test]
    fn test_save_and_load_map() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("0.json");
        let map = sample_map();

        save_map(&map, &path).unwrap();
        let loaded = load_map(&path).unwrap();

        assert_eq!(loaded, map);
    }

    #[test]
    fn test_saved_document_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("map.json");
        save_map(&sample_map(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["tile_size"], 16);
        assert_eq!(value["tilemap"]["3;4"]["type"], "grass");
        assert_eq!(value["tilemap"]["-2;9"]["pos"][0], -2.0);
        assert_eq!(value["offgrid_tiles"][0]["variant"], 2);
    }

    #[test]
    fn test_load_capitalised_document() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "TileSize": 16,
                "Tiles": {{"10;5": {{"Position": {{"X": 10, "Y": 5}}, "Variant": 0, "Type": "stone"}}}},
                "OffGridTiles": null
            }}"#
        )
        .unwrap();

        let map = load_map(file.path()).unwrap();
        assert_eq!(map.tile_at(IVec2::new(10, 5)).unwrap().kind, "stone");
        assert!(map.offgrid_tiles().is_empty());
    }

    #[test]
    fn test_mismatched_key_uses_tile_position() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"tile_size": 16, "tilemap": {{"0;0": {{"type": "grass", "variant": 0, "pos": [7, 8]}}}}, "offgrid_tiles": []}}"#
        )
        .unwrap();

        let map = load_map(file.path()).unwrap();
        assert!(map.tile_at(IVec2::new(0, 0)).is_none());
        assert!(map.tile_at(IVec2::new(7, 8)).is_some());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_map("/no/such/dir/map.json").unwrap_err();
        assert!(matches!(err, MapError::Io { .. }));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not a map").unwrap();
        let err = load_map(file.path()).unwrap_err();
        assert!(matches!(err, MapError::Parse { .. }));
    }

    #[test]
    fn test_bad_key_and_tile_size_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"tile_size": 16, "tilemap": {{"abc": {{"type": "grass", "variant": 0, "pos": [1, 1]}}}}}}"#
        )
        .unwrap();
        assert!(matches!(load_map(file.path()), Err(MapError::InvalidKey(_))));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"tile_size": 0, "tilemap": {{}}, "offgrid_tiles": []}}"#).unwrap();
        assert!(matches!(load_map(file.path()), Err(MapError::InvalidTileSize(0))));
    }

    #[test]
    fn test_save_to_unwritable_path_fails() {
        let err = save_map(&sample_map(), "/no/such/dir/map.json").unwrap_err();
        assert!(matches!(err, MapError::Io { .. }));
    }

    #[test]
    fn test_catalog_round_trips_render_flags() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assets.json");
        let catalog = AssetCatalog::default();
        save_catalog(&catalog, &path).unwrap();
        let loaded = load_catalog(&path).unwrap();
        assert_eq!(loaded, catalog);
        assert!(!loaded.get("spawners").render_in_game);
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("3;-4").unwrap(), (3, -4));
        assert!(parse_key("3,4").is_err());
        assert!(parse_key("3;x").is_err());
        assert_eq!(format_key((-1, 2)), "-1;2");
    }
}
