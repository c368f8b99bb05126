//! Converts a tile layer into positioned sprite descriptions.

use std::path::{Path, PathBuf};

use crate::config::TileResolution;
use crate::error::{Error, Result};
use crate::tilemap::types::{Layer, TileInfo, TileMap};

/// A positioned, scaled image ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub texture: PathBuf,
    pub scale: f32,
    /// Scaled width and height in pixels.
    pub width: f32,
    pub height: f32,
    pub right: f32,
    pub top: f32,
    /// Collision polygon relative to the sprite's top-left corner, scaled.
    pub hit_box: Option<Vec<(f32, f32)>>,
}

impl Sprite {
    pub fn left(&self) -> f32 {
        self.right - self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top - self.height
    }

    pub fn center_x(&self) -> f32 {
        self.right - self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.top - self.height / 2.0
    }
}

/// Sprites generated from one layer, in row-major order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpriteList {
    sprites: Vec<Sprite>,
}

impl SpriteList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sprite> {
        self.sprites.iter()
    }

    pub fn as_slice(&self) -> &[Sprite] {
        &self.sprites
    }
}

impl IntoIterator for SpriteList {
    type Item = Sprite;
    type IntoIter = std::vec::IntoIter<Sprite>;

    fn into_iter(self) -> Self::IntoIter {
        self.sprites.into_iter()
    }
}

impl<'a> IntoIterator for &'a SpriteList {
    type Item = &'a Sprite;
    type IntoIter = std::slice::Iter<'a, Sprite>;

    fn into_iter(self) -> Self::IntoIter {
        self.sprites.iter()
    }
}

/// Finds a layer by name.
pub fn get_layer<'m>(map: &'m TileMap, layer_name: &str) -> Option<&'m Layer> {
    map.layers.iter().find(|layer| layer.name == layer_name)
}

/// Finds the tile whose global id is `gid`, searching every tileset.
pub fn get_tile(map: &TileMap, gid: u32) -> Option<&TileInfo> {
    map.tilesets.iter().find_map(|tileset| {
        tileset
            .tiles
            .values()
            .find(|tile| tileset.first_gid + tile.id == gid)
    })
}

/// Generates one sprite per non-empty cell of `layer_name`.
///
/// Problems with the map data never fail: a missing layer yields an empty
/// list and unresolvable cells are skipped, each with a warning.
pub fn generate_sprites(
    map: &TileMap,
    layer_name: &str,
    scale: f32,
    base_directory: impl AsRef<Path>,
) -> SpriteList {
    let mut sprites = SpriteList::new();
    if let Err(e) = build_sprites(
        map,
        layer_name,
        scale,
        base_directory.as_ref(),
        TileResolution::Lenient,
        &mut sprites,
    ) {
        tracing::warn!("Stopped generating sprites from layer '{}': {}", layer_name, e);
    }
    sprites
}

/// Like [`generate_sprites`], but with [`TileResolution::Strict`] a missing
/// layer, unknown gid or imageless tile is returned as an error.
pub fn try_generate_sprites(
    map: &TileMap,
    layer_name: &str,
    scale: f32,
    base_directory: impl AsRef<Path>,
    resolution: TileResolution,
) -> Result<SpriteList> {
    let mut sprites = SpriteList::new();
    build_sprites(
        map,
        layer_name,
        scale,
        base_directory.as_ref(),
        resolution,
        &mut sprites,
    )?;
    Ok(sprites)
}

fn build_sprites(
    map: &TileMap,
    layer_name: &str,
    scale: f32,
    base_directory: &Path,
    resolution: TileResolution,
    sprites: &mut SpriteList,
) -> Result<()> {
    let strict = resolution == TileResolution::Strict;

    let Some(layer) = get_layer(map, layer_name) else {
        if strict {
            return Err(Error::LayerNotFound(layer_name.to_string()));
        }
        tracing::warn!("No layer named '{}'", layer_name);
        return Ok(());
    };

    let cell_width = map.tile_size.0 as f32 * scale;
    let cell_height = map.tile_size.1 as f32 * scale;

    for (row_index, row) in layer.data.iter().enumerate() {
        for (column_index, &gid) in row.iter().enumerate() {
            if gid == 0 {
                continue;
            }

            let Some(tile) = get_tile(map, gid) else {
                if strict {
                    return Err(Error::TileNotFound(gid));
                }
                tracing::warn!("Couldn't find tile for gid {} in layer '{}'", gid, layer_name);
                continue;
            };

            let Some(image) = tile.image.as_ref() else {
                if strict {
                    return Err(Error::TileImageMissing(gid));
                }
                tracing::warn!("Tile for gid {} has no image, skipping", gid);
                continue;
            };

            sprites.push(Sprite {
                texture: base_directory.join(&image.source),
                scale,
                width: image.width as f32 * scale,
                height: image.height as f32 * scale,
                right: column_index as f32 * cell_width,
                top: (map.height() as f32 - row_index as f32) * cell_height,
                hit_box: tile.hit_box.as_ref().map(|points| {
                    points
                        .iter()
                        .map(|(x, y)| (x * scale, y * scale))
                        .collect()
                }),
            });
        }
    }

    tracing::debug!(
        "Generated {} sprites from layer '{}'",
        sprites.len(),
        layer_name
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::types::{LayerKind, TileImage, Tileset};
    use std::collections::BTreeMap;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn tile(id: u32, source: &str) -> TileInfo {
        TileInfo {
            id,
            image: Some(TileImage {
                source: PathBuf::from(source),
                width: 128,
                height: 128,
            }),
            hit_box: None,
        }
    }

    fn test_map() -> TileMap {
        let mut terrain = BTreeMap::new();
        terrain.insert(0, tile(0, "grass.png"));
        let mut box_tile = tile(1, "box.png");
        box_tile.hit_box = Some(vec![(0.0, 64.0), (128.0, 64.0), (128.0, 128.0)]);
        terrain.insert(1, box_tile);

        let mut items = BTreeMap::new();
        items.insert(0, tile(0, "coin.png"));
        items.insert(
            1,
            TileInfo {
                id: 1,
                image: None,
                hit_box: None,
            },
        );

        TileMap {
            background_color: None,
            map_size: (3, 2),
            tile_size: (128, 128),
            layers: vec![
                Layer::tiles("Platforms", vec![vec![0, 3, 0], vec![1, 2, 1]]),
                Layer::tiles("Broken", vec![vec![99, 1, 0], vec![0, 0, 0]]),
                Layer::tiles("Imageless", vec![vec![4, 0, 0], vec![0, 0, 0]]),
                Layer::without_tiles("Spawns", LayerKind::Objects),
            ],
            tilesets: vec![
                Tileset {
                    name: "terrain".to_string(),
                    first_gid: 1,
                    tile_size: (128, 128),
                    tiles: terrain,
                },
                Tileset {
                    name: "items".to_string(),
                    first_gid: 3,
                    tile_size: (128, 128),
                    tiles: items,
                },
            ],
            source: None,
        }
    }

    #[test]
    fn test_get_tile_across_tilesets() {
        let map = test_map();

        assert_eq!(get_tile(&map, 1).unwrap().image.as_ref().unwrap().source, PathBuf::from("grass.png"));
        assert_eq!(get_tile(&map, 3).unwrap().image.as_ref().unwrap().source, PathBuf::from("coin.png"));
        assert!(get_tile(&map, 0).is_none());
        assert!(get_tile(&map, 99).is_none());
    }

    #[test]
    fn test_empty_cells_produce_no_sprites() {
        let map = test_map();
        let sprites = generate_sprites(&map, "Platforms", 1.0, "");

        // Row 0 has one tile, row 1 has three.
        assert_eq!(sprites.len(), 4);
        assert!(sprites.iter().all(|s| s.right != 0.0 || s.top != 256.0));
    }

    #[test]
    fn test_sprite_positions_flip_rows() {
        let map = test_map();
        let sprites = generate_sprites(&map, "Platforms", 0.5, "assets/");
        let sprites = sprites.as_slice();

        // Row 0, column 1 -> coin at the top row.
        assert_eq!(sprites[0].texture, PathBuf::from("assets/coin.png"));
        assert_eq!(sprites[0].right, 64.0);
        assert_eq!(sprites[0].top, 128.0);
        assert_eq!(sprites[0].width, 64.0);

        // Row 1, column 0.
        assert_eq!(sprites[1].texture, PathBuf::from("assets/grass.png"));
        assert_eq!(sprites[1].right, 0.0);
        assert_eq!(sprites[1].top, 64.0);
        assert_eq!(sprites[1].center_x(), -32.0);
        assert_eq!(sprites[1].center_y(), 32.0);
        assert_eq!(sprites[1].left(), -64.0);
        assert_eq!(sprites[1].bottom(), 0.0);
    }

    #[test]
    fn test_hit_box_attached_and_scaled() {
        let map = test_map();
        let sprites = generate_sprites(&map, "Platforms", 0.5, "");

        let boxed = &sprites.as_slice()[2];
        assert_eq!(boxed.texture, PathBuf::from("box.png"));
        assert_eq!(
            boxed.hit_box.as_deref(),
            Some(&[(0.0, 32.0), (64.0, 32.0), (64.0, 64.0)][..])
        );
        assert!(sprites.as_slice()[1].hit_box.is_none());
    }

    #[test]
    fn test_unknown_gid_is_skipped() {
        init_tracing();
        let map = test_map();

        let sprites = generate_sprites(&map, "Broken", 1.0, "");

        assert_eq!(sprites.len(), 1);
        assert_eq!(sprites.as_slice()[0].texture, PathBuf::from("grass.png"));
    }

    #[test]
    fn test_missing_layer_returns_empty() {
        init_tracing();
        let map = test_map();

        let sprites = generate_sprites(&map, "Nope", 1.0, "");
        assert!(sprites.is_empty());
    }

    #[test]
    fn test_every_layer_generates_without_failing() {
        let map = test_map();

        for layer in &map.layers {
            let result = try_generate_sprites(&map, &layer.name, 1.0, "", TileResolution::Lenient);
            assert!(result.is_ok(), "layer {} failed", layer.name);
        }
        assert!(generate_sprites(&map, "Spawns", 1.0, "").is_empty());
    }

    #[test]
    fn test_strict_resolution_errors() {
        let map = test_map();

        assert!(matches!(
            try_generate_sprites(&map, "Nope", 1.0, "", TileResolution::Strict),
            Err(Error::LayerNotFound(name)) if name == "Nope"
        ));
        assert!(matches!(
            try_generate_sprites(&map, "Broken", 1.0, "", TileResolution::Strict),
            Err(Error::TileNotFound(99))
        ));
        assert!(matches!(
            try_generate_sprites(&map, "Imageless", 1.0, "", TileResolution::Strict),
            Err(Error::TileImageMissing(4))
        ));
        assert_eq!(
            try_generate_sprites(&map, "Platforms", 1.0, "", TileResolution::Strict)
                .unwrap()
                .len(),
            4
        );
    }

    #[test]
    fn test_imageless_tile_skipped_when_lenient() {
        let map = test_map();
        assert!(generate_sprites(&map, "Imageless", 1.0, "").is_empty());
    }
}
