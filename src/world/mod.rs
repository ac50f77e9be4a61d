mod camera;
mod caster;
mod grid;
mod sight;
pub mod texture;

pub use camera::{Camera, PLANE_LEN};
pub use caster::{RayHit, RayHits, Side, cast, cast_and_fill_depth};
pub use grid::{Grid, Level, LevelError, Tile, TileFlags};
pub use texture::{NO_TEXTURE, Texture, TextureBank, TextureError, TextureId};
