//! Tiled Map Editor support: reading `.tmx` files and turning tile layers into sprites.

mod loader;
mod sprites;
mod types;

pub use loader::read_tiled_map;
pub use sprites::{generate_sprites, get_layer, get_tile, try_generate_sprites, Sprite, SpriteList};
pub use types::*;
