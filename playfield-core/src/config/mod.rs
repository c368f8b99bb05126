//! Configuration loading and validation for the player, sound engine and tile maps.

mod loader;
mod types;
mod validator;

pub use loader::ConfigLoader;
pub use types::*;
pub use validator::ConfigValidator;
