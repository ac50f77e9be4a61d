use std::path::Path;

use image::RgbaImage;

use super::AssetError;
use crate::{
    sim::{Facing, Sprite},
    world::{Texture, TextureBank, TextureId},
};

/// RGBA8 image → ARGB texture (alpha kept for sprite transparency).
pub fn texture_from_image(name: impl Into<String>, img: &RgbaImage) -> Texture {
    let pixels = img
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            u32::from_be_bytes([a, r, g, b])
        })
        .collect();
    Texture {
        name: name.into(),
        w: img.width() as usize,
        h: img.height() as usize,
        pixels,
    }
}

fn open_rgba(path: &Path) -> Result<RgbaImage, AssetError> {
    Ok(image::open(path)
        .map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8())
}

/// Decode an image file into the bank under `name`.
pub fn load_texture(
    bank: &mut TextureBank,
    name: &str,
    path: impl AsRef<Path>,
) -> Result<TextureId, AssetError> {
    let img = open_rgba(path.as_ref())?;
    Ok(bank.insert(name, texture_from_image(name, &img))?)
}

/// Load `enemy-<facing>.png` for all six facings from `dir` and build the
/// directional sentry sprite (one sheet row per facing).
pub fn load_enemy_sprite(
    dir: impl AsRef<Path>,
    bank: &mut TextureBank,
) -> Result<Sprite, AssetError> {
    let dir = dir.as_ref();
    let mut images = Vec::with_capacity(Facing::ALL.len());
    for facing in Facing::ALL {
        let name = format!("enemy-{}", facing.asset_name());
        let img = open_rgba(&dir.join(format!("{name}.png")))?;
        images.push((name, img));
    }
    enemy_sprite_from_images(images, bank)
}

/// Images in [`Facing::ALL`] order; all must share the first one's size.
fn enemy_sprite_from_images(
    images: Vec<(String, RgbaImage)>,
    bank: &mut TextureBank,
) -> Result<Sprite, AssetError> {
    let expected = images
        .first()
        .map(|(_, img)| img.dimensions())
        .unwrap_or_default();

    let mut frames = Vec::with_capacity(images.len());
    for (name, img) in images {
        if img.dimensions() != expected {
            return Err(AssetError::SpriteSize {
                name,
                got: img.dimensions(),
                expected,
            });
        }
        frames.push(bank.insert(name.as_str(), texture_from_image(name.as_str(), &img))?);
    }

    log::info!(
        "enemy sprite loaded: {} facings of {}×{}",
        frames.len(),
        expected.0,
        expected.1
    );
    let rows = frames.len();
    Ok(Sprite::sheet(frames, 1, rows, 0)?.with_facing(Facing::facing_map()))
}

/// Load a `columns × rows` animation sheet; cells enter the bank as
/// `<name>#<index>` and play row-major at one frame per `rate` tics.
pub fn load_sheet_sprite(
    bank: &mut TextureBank,
    name: &str,
    path: impl AsRef<Path>,
    columns: usize,
    rows: usize,
    rate: i32,
) -> Result<Sprite, AssetError> {
    let img = open_rgba(path.as_ref())?;
    sheet_sprite_from_image(bank, name, &img, columns, rows, rate)
}

fn sheet_sprite_from_image(
    bank: &mut TextureBank,
    name: &str,
    img: &RgbaImage,
    columns: usize,
    rows: usize,
    rate: i32,
) -> Result<Sprite, AssetError> {
    let (w, h) = img.dimensions();
    let splits = |px: u32, n: usize| n > 0 && px as usize % n == 0 && px as usize >= n;
    if !splits(w, columns) || !splits(h, rows) {
        return Err(AssetError::SheetGrid {
            name: name.to_string(),
            size: (w, h),
            columns,
            rows,
        });
    }

    let sheet = texture_from_image(name, img);
    let mut frames = Vec::with_capacity(columns * rows);
    for cell in sheet.split_sheet(columns, rows) {
        let cell_name = cell.name.clone();
        frames.push(bank.insert(cell_name, cell)?);
    }
    log::debug!("sheet {name} split into {columns}×{rows} frames");
    Ok(Sprite::animated(frames, columns, rows, rate)?)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
