// Format-agnostic repository of images decoded by the asset loader.
// The renderer and the sprites interact through `TextureId` only.

use std::collections::HashMap;

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because `TextureBank::new()` inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// CPU-side storage: 32-bit **ARGB** (0xAARRGGBB) in row-major order.
/// Pixels with alpha 0 are transparent when drawn as sprites.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<u32>,
}

/// Convenience checkerboard 8×8 (magenta/black), opaque.
impl Default for Texture {
    fn default() -> Self {
        const LIGHT: u32 = 0xFF_FF00FF;
        const DARK: u32 = 0xFF_000000;
        let mut pix = vec![0u32; 8 * 8];
        for y in 0..8 {
            for x in 0..8 {
                pix[y * 8 + x] = if (x ^ y) & 1 == 0 { LIGHT } else { DARK };
            }
        }
        Texture {
            name: "CHECKER".to_string(),
            w: 8,
            h: 8,
            pixels: pix,
        }
    }
}

impl Texture {
    #[inline]
    pub fn texel(&self, u: usize, v: usize) -> u32 {
        self.pixels[v * self.w + u]
    }

    /// Copy the `w × h` block whose top-left corner is `(x, y)`; the block
    /// must lie inside the texture.
    fn crop(&self, name: String, x: usize, y: usize, w: usize, h: usize) -> Texture {
        debug_assert!(x + w <= self.w && y + h <= self.h, "crop outside texture");
        let mut pixels = Vec::with_capacity(w * h);
        for row in y..y + h {
            let start = row * self.w + x;
            pixels.extend_from_slice(&self.pixels[start..start + w]);
        }
        Texture {
            name,
            w,
            h,
            pixels,
        }
    }

    /// Split a sheet of `columns × rows` equal cells, row-major.  Cells are
    /// named `<sheet>#<index>`; leftover pixels on the right and bottom edges
    /// are dropped.
    pub fn split_sheet(&self, columns: usize, rows: usize) -> Vec<Texture> {
        let cw = self.w / columns.max(1);
        let ch = self.h / rows.max(1);
        let mut out = Vec::with_capacity(columns * rows);
        for r in 0..rows {
            for c in 0..columns {
                let name = format!("{}#{}", self.name, c + r * columns);
                out.push(self.crop(name, c * cw, r * ch, cw, ch));
            }
        }
        out
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),
}

/// A format-agnostic cache of textures.
///
/// * Does **not** know about PNG files; decoding lives in `assets`.
/// * Stores exactly one copy of every name.
/// * ID **0** is always the “missing” checkerboard.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl Default for TextureBank {
    fn default() -> Self {
        Self::default_with_checker()
    }
}

impl TextureBank {
    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback.  The texture is inserted under the fixed name `"MISSING"`
    /// and obtains the handle **0**.
    pub fn new(missing_tex: Texture) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![missing_tex],
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    /// Number of textures stored (including the “missing” one).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    } // only checker

    /// Obtain the id for a *loaded* texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Borrow a texture, falling back to the checkerboard on a bad id.
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        self.data.get(id as usize).unwrap_or(&self.data[NO_TEXTURE as usize])
    }

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_tex(color: u32) -> Texture {
        Texture {
            name: "Dummy".to_string(),
            w: 2,
            h: 2,
            pixels: vec![color; 4],
        }
    }

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::default_with_checker();
        let red = bank.insert("RED", dummy_tex(0xFF_FF0000)).unwrap();
        let blue = bank.insert("BLUE", dummy_tex(0xFF_0000FF)).unwrap();

        assert_ne!(red, NO_TEXTURE);
        assert_ne!(blue, red);
        assert_eq!(bank.id("RED"), Some(red));
        assert_eq!(bank.id("NOPE"), None);
        assert_eq!(bank.texture(blue).unwrap().pixels[0], 0xFF_0000FF);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut bank = TextureBank::default_with_checker();
        bank.insert("WOOD", dummy_tex(1)).unwrap();
        let err = bank.insert("WOOD", dummy_tex(2)).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        // texture count still 2 (checker + first WOOD)
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn bad_id_guard() {
        let bank = TextureBank::default_with_checker();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
        assert_eq!(bank.texture_or_missing(bad).name, "CHECKER");
    }

    #[test]
    fn sheet_split_is_row_major() {
        let sheet = Texture {
            name: "SHEET".into(),
            w: 4,
            h: 2,
            // 2 × 2 cells of 2 × 1 pixels, each cell a distinct colour
            pixels: vec![1, 1, 2, 2, 3, 3, 4, 4],
        };
        let cells = sheet.split_sheet(2, 2);
        assert_eq!(cells.len(), 4);
        for (i, c) in cells.iter().enumerate() {
            assert_eq!((c.w, c.h), (2, 1));
            assert_eq!(c.pixels, vec![i as u32 + 1; 2]);
        }
    }
}
