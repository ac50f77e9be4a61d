//! Disk → world conversion: level rasters / ASCII maps and sprite images.
//!
//! Everything here runs once at startup; nothing in the simulation or the
//! renderer touches the filesystem.

mod level;
mod sprites;

pub use level::{level_from_image, load_level, tile_for_rgb};
pub use sprites::{load_enemy_sprite, load_sheet_sprite, load_texture, texture_from_image};

use std::path::PathBuf;

use thiserror::Error;

use crate::{
    sim::SpriteError,
    world::{LevelError, TextureError},
};

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("cannot read `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode image `{path}`")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Level pixel whose colour encodes no tile kind.
    #[error("unknown level colour #{rgb:06X} at ({x}, {y})")]
    UnknownColor { x: u32, y: u32, rgb: u32 },

    #[error("sprite `{name}` is {got:?}, expected {expected:?}")]
    SpriteSize {
        name: String,
        got: (u32, u32),
        expected: (u32, u32),
    },

    /// Sheet image that cannot be cut into the requested grid.
    #[error("sheet `{name}` of {size:?} px does not split into {columns}×{rows} cells")]
    SheetGrid {
        name: String,
        size: (u32, u32),
        columns: usize,
        rows: usize,
    },

    #[error(transparent)]
    Level(#[from] LevelError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Sprite(#[from] SpriteError),
}
