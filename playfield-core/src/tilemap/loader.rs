//! Reads `.tmx` files through the `tiled` crate into the plain [`TileMap`] model.

use std::collections::BTreeMap;
use std::path::Path;

use tiled::{LayerType, ObjectShape, TileLayer};

use crate::error::{Error, Result};
use crate::tilemap::types::{Color, Layer, LayerKind, TileImage, TileInfo, TileMap, Tileset};

/// Reads a Tiled map file.
///
/// External tilesets (`.tsx`) referenced by the map are loaded too. Tiles are
/// expected to be a collection of images; image sources are kept as `tiled`
/// resolved them relative to the map or tileset file.
pub fn read_tiled_map(path: impl AsRef<Path>) -> Result<TileMap> {
    let path = path.as_ref();
    let mut loader = tiled::Loader::new();
    let map = loader
        .load_tmx_map(path)
        .map_err(|e| Error::TileMapLoad(path.display().to_string(), e.to_string()))?;

    let tile_map = convert_map(&map, path);
    tracing::info!(
        "Loaded tile map {} ({}x{} tiles, {} layers, {} tilesets)",
        path.display(),
        tile_map.width(),
        tile_map.height(),
        tile_map.layers.len(),
        tile_map.tilesets.len()
    );
    Ok(tile_map)
}

fn convert_map(map: &tiled::Map, path: &Path) -> TileMap {
    let tilesets = convert_tilesets(map.tilesets());
    let first_gids: Vec<u32> = tilesets.iter().map(|ts| ts.first_gid).collect();

    let mut layers = Vec::new();
    collect_layers(map.layers(), &first_gids, &mut layers);

    TileMap {
        background_color: map.background_color.as_ref().map(|c| Color {
            red: c.red,
            green: c.green,
            blue: c.blue,
            alpha: c.alpha,
        }),
        map_size: (map.width, map.height),
        tile_size: (map.tile_width, map.tile_height),
        layers,
        tilesets,
        source: Some(path.to_path_buf()),
    }
}

/// Assigns first gids in tileset order, starting at 1. Each tileset reserves
/// room for its tile count or its highest tile id, whichever is larger, since
/// image-collection tilesets can have gaps in their ids.
fn convert_tilesets(tilesets: &[std::sync::Arc<tiled::Tileset>]) -> Vec<Tileset> {
    let mut next_gid = 1;
    let mut converted = Vec::with_capacity(tilesets.len());

    for tileset in tilesets {
        let mut tiles = BTreeMap::new();
        for (id, tile) in tileset.tiles() {
            let image = tile.image.as_ref().map(|image| TileImage {
                source: image.source.clone(),
                width: image.width.max(0) as u32,
                height: image.height.max(0) as u32,
            });
            let hit_box = tile
                .collision
                .as_ref()
                .and_then(|collision| hit_box(collision.object_data()));
            tiles.insert(id, TileInfo { id, image, hit_box });
        }

        let span = tiles
            .keys()
            .next_back()
            .map_or(0, |max_id| max_id + 1)
            .max(tileset.tilecount);

        converted.push(Tileset {
            name: tileset.name.clone(),
            first_gid: next_gid,
            tile_size: (tileset.tile_width, tileset.tile_height),
            tiles,
        });
        next_gid += span;
    }

    converted
}

/// First polygon (or rectangle) among a tile's collision objects, in tile pixels.
fn hit_box(objects: &[tiled::ObjectData]) -> Option<Vec<(f32, f32)>> {
    objects.iter().find_map(|object| {
        let (x, y) = (object.x, object.y);
        match &object.shape {
            ObjectShape::Polygon { points } => {
                Some(points.iter().map(|(px, py)| (x + px, y + py)).collect())
            }
            ObjectShape::Rect { width, height } => Some(vec![
                (x, y),
                (x + width, y),
                (x + width, y + height),
                (x, y + height),
            ]),
            _ => None,
        }
    })
}

fn collect_layers<'map>(
    layers: impl Iterator<Item = tiled::Layer<'map>>,
    first_gids: &[u32],
    out: &mut Vec<Layer>,
) {
    for layer in layers {
        let name = layer.name.clone();
        match layer.layer_type() {
            LayerType::Tiles(TileLayer::Finite(tiles)) => {
                let data = (0..tiles.height() as i32)
                    .map(|y| {
                        (0..tiles.width() as i32)
                            .map(|x| {
                                tiles.get_tile(x, y).map_or(0, |tile| {
                                    first_gids
                                        .get(tile.tileset_index())
                                        .map_or(0, |first_gid| first_gid + tile.id())
                                })
                            })
                            .collect()
                    })
                    .collect();
                out.push(Layer::tiles(name, data));
            }
            LayerType::Tiles(TileLayer::Infinite(_)) => {
                tracing::warn!("Infinite tile layer '{}' is not supported, leaving it empty", name);
                out.push(Layer::tiles(name, Vec::new()));
            }
            LayerType::Objects(_) => out.push(Layer::without_tiles(name, LayerKind::Objects)),
            LayerType::Image(_) => out.push(Layer::without_tiles(name, LayerKind::Image)),
            LayerType::Group(group) => {
                out.push(Layer::without_tiles(name, LayerKind::Group));
                collect_layers(group.layers(), first_gids, out);
            }
        }
    }
}
