/// Nearest wall distance per screen column.
///
/// Reset to `+∞` at the start of every frame; the wall pass may only lower
/// a slot, the sprite pass only reads.
#[derive(Clone, Debug, Default)]
pub struct DepthBuffer {
    cols: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(width: usize) -> Self {
        Self {
            cols: vec![f32::INFINITY; width],
        }
    }

    /// Resize to `width` columns and clear every slot.
    pub fn reset(&mut self, width: usize) {
        self.cols.clear();
        self.cols.resize(width, f32::INFINITY);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    /// Stored distance; columns outside the buffer read as `+∞`.
    #[inline]
    pub fn get(&self, x: usize) -> f32 {
        self.cols.get(x).copied().unwrap_or(f32::INFINITY)
    }

    #[inline]
    pub(super) fn slot(&mut self, x: usize) -> &mut f32 {
        &mut self.cols[x]
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
