//! Plain data model of a parsed Tiled map.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// RGBA colour, 0-255 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

/// A parsed tile map.
#[derive(Debug, Clone, Default)]
pub struct TileMap {
    pub background_color: Option<Color>,
    /// Width and height in tiles.
    pub map_size: (u32, u32),
    /// Width and height of one cell in pixels.
    pub tile_size: (u32, u32),
    pub layers: Vec<Layer>,
    pub tilesets: Vec<Tileset>,
    /// File the map was read from.
    pub source: Option<PathBuf>,
}

impl TileMap {
    pub fn width(&self) -> u32 {
        self.map_size.0
    }

    pub fn height(&self) -> u32 {
        self.map_size.1
    }

    /// Names of the tile layers, in file order.
    pub fn tile_layer_names(&self) -> Vec<&str> {
        self.layers
            .iter()
            .filter(|layer| layer.kind == LayerKind::Tiles)
            .map(|layer| layer.name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Tiles,
    Objects,
    Image,
    Group,
}

/// A named layer. Only tile layers carry grid data.
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub kind: LayerKind,
    /// Row-major grid of global tile ids; 0 marks an empty cell.
    pub data: Vec<Vec<u32>>,
}

impl Layer {
    pub fn tiles(name: impl Into<String>, data: Vec<Vec<u32>>) -> Self {
        Self {
            name: name.into(),
            kind: LayerKind::Tiles,
            data,
        }
    }

    pub fn without_tiles(name: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            name: name.into(),
            kind,
            data: Vec::new(),
        }
    }
}

/// A tileset and the offset its local tile ids are shifted by in the map.
#[derive(Debug, Clone)]
pub struct Tileset {
    pub name: String,
    /// Assigned by the loader in tileset order, starting at 1, each tileset
    /// taking `max(tilecount, highest id + 1)` gids. The `firstgid` written in
    /// the file is not kept, so maps with gaps between tilesets get different
    /// numbers than the Tiled editor shows. Layer data uses the same numbering.
    pub first_gid: u32,
    pub tile_size: (u32, u32),
    pub tiles: BTreeMap<u32, TileInfo>,
}

/// Metadata of one tile in a tileset.
#[derive(Debug, Clone)]
pub struct TileInfo {
    /// Local id within the tileset.
    pub id: u32,
    pub image: Option<TileImage>,
    /// Collision polygon in tile pixel coordinates.
    pub hit_box: Option<Vec<(f32, f32)>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileImage {
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
}
