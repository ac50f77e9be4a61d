use std::{collections::HashMap, path::Path};

use image::RgbaImage;
use once_cell::sync::Lazy;

use super::AssetError;
use crate::world::{Grid, Level, Tile};

/// Flat level colours (0xRRGGBB) → tile kind.
static TILE_COLORS: Lazy<HashMap<u32, Tile>> = Lazy::new(|| {
    HashMap::from([
        (0xFFFFFF, Tile::Empty),
        (0x000000, Tile::Wall),
        (0xFF0000, Tile::Enemy),
        (0x00FF00, Tile::Exit),
        (0x0000FF, Tile::Player),
        (0xFFFF00, Tile::Construct),
    ])
});

#[inline]
pub fn tile_for_rgb(rgb: u32) -> Option<Tile> {
    TILE_COLORS.get(&rgb).copied()
}

/// Pixel `(x, y)` becomes cell `(x, y)`; alpha is ignored.
pub fn level_from_image(img: &RgbaImage) -> Result<Level, AssetError> {
    let mut rows = Vec::with_capacity(img.height() as usize);
    for y in 0..img.height() {
        let mut row = Vec::with_capacity(img.width() as usize);
        for x in 0..img.width() {
            let [r, g, b, _] = img.get_pixel(x, y).0;
            let rgb = u32::from_be_bytes([0, r, g, b]);
            row.push(tile_for_rgb(rgb).ok_or(AssetError::UnknownColor { x, y, rgb })?);
        }
        rows.push(row);
    }
    Ok(Level::new(Grid::from_rows(rows)?)?)
}

/// Load a `.png` raster level, or an ASCII level for any other extension.
pub fn load_level(path: impl AsRef<Path>) -> Result<Level, AssetError> {
    let path = path.as_ref();
    let is_png = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));

    let level = if is_png {
        let img = image::open(path)
            .map_err(|source| AssetError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        level_from_image(&img)?
    } else {
        let src = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Level::from_ascii(&src)?
    };

    log::info!(
        "level {} loaded: {}×{}, {} enemies",
        path.display(),
        level.grid.width(),
        level.grid.height(),
        level.enemy_spawns.len()
    );
    Ok(level)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::LevelError;
    use image::Rgba;

    const W: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const O: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const P: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const E: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const C: Rgba<u8> = Rgba([255, 255, 0, 255]);

    fn image_of(rows: &[&[Rgba<u8>]]) -> RgbaImage {
        let mut img = RgbaImage::new(rows[0].len() as u32, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, &px) in row.iter().enumerate() {
                img.put_pixel(x as u32, y as u32, px);
            }
        }
        img
    }

    #[test]
    fn colours_decode_to_tiles() {
        let img = image_of(&[
            &[W, W, W, W, W],
            &[W, P, O, E, W],
            &[W, O, C, O, W],
            &[W, W, W, W, W],
        ]);
        let lvl = level_from_image(&img).unwrap();
        assert_eq!(lvl.player_spawn, (1, 1));
        assert_eq!(lvl.enemy_spawns, vec![(3, 1)]);
        assert_eq!(lvl.grid.entity_at(2, 2), Tile::Construct);
        assert_eq!(lvl.grid.entity_at(3, 1), Tile::Empty);
        assert_eq!(lvl.grid.width(), 5);
        assert_eq!(lvl.grid.height(), 4);
    }

    #[test]
    fn unknown_colour_is_reported_with_position() {
        let odd = Rgba([12, 34, 56, 255]);
        let img = image_of(&[&[W, W, W], &[W, odd, W], &[W, W, W]]);
        match level_from_image(&img) {
            Err(AssetError::UnknownColor { x, y, rgb }) => {
                assert_eq!((x, y, rgb), (1, 1, 0x0C2238));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn level_errors_pass_through() {
        let img = image_of(&[&[W, W, W], &[W, O, W], &[W, W, W]]);
        assert!(matches!(
            level_from_image(&img),
            Err(AssetError::Level(LevelError::NoPlayerSpawn))
        ));
    }

    #[test]
    fn all_six_colours_are_known() {
        for rgb in [0xFFFFFF, 0x000000, 0xFF0000, 0x00FF00, 0x0000FF, 0xFFFF00] {
            assert!(tile_for_rgb(rgb).is_some(), "{rgb:06X}");
        }
        assert_eq!(tile_for_rgb(0x123456), None);
    }

    #[test]
    fn bundled_levels_agree() {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");
        let png = load_level(format!("{dir}/level-1.png")).unwrap();
        let txt = load_level(format!("{dir}/level-1.txt")).unwrap();
        assert_eq!(png, txt);
        assert_eq!(png.player_spawn, (1, 1));
        assert_eq!(png.enemy_spawns.len(), 5);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_level("does/not/exist.txt").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
