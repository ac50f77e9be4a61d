//! Wall pass: one ray per column, slabs painted far → near.

use crate::{
    renderer::{Rgba, software::Software},
    world::{Camera, Grid, Side, Tile, cast_and_fill_depth},
};

/// Walls are drawn twice as tall as the base slab, bottom edge fixed.
pub const WALL_SCALE: f32 = 2.0;
/// Constructs are drawn shorter than the base slab, bottom edge fixed.
pub const CONSTRUCT_SCALE: f32 = 0.8;

/// Distances below this are drawn as if the slab sat this close.
pub const MIN_SLAB_DIST: f32 = 1e-3;

pub const SKY: Rgba = 0xA0E3FE;
pub const FLOOR: Rgba = 0x1E1E1E;

/// Screen rows `start..end` covered by a slab `dist` away, or `None` if the
/// slab is empty after clamping.
///
/// Zero, negative and NaN distances are treated as [`MIN_SLAB_DIST`].
pub fn slab_extent(
    dist: f32,
    tile: Tile,
    eye_offset: f32,
    height: usize,
) -> Option<(usize, usize)> {
    let dist = dist.max(MIN_SLAB_DIST);
    let h = height as i32;
    let mut line_h = (height as f32 / dist) as i32;
    let shift = ((0.5 - eye_offset) * height as f32 / dist) as i32;

    let mut start = (-line_h / 2).saturating_add(h / 2).saturating_add(shift);
    let end = (line_h / 2).saturating_add(h / 2).saturating_add(shift);

    let scale = match tile {
        Tile::Wall => Some(WALL_SCALE),
        Tile::Construct => Some(CONSTRUCT_SCALE),
        _ => None,
    };
    if let Some(f) = scale {
        line_h = (line_h as f32 * f) as i32;
        start = end.saturating_sub(line_h);
    }

    let start = start.max(0);
    let end = end.min(h - 1);
    (start < end).then_some((start as usize, end as usize))
}

/// Flat colour of a tile; slabs entered through a horizontal grid line
/// are drawn at half brightness.
pub fn tile_color(tile: Tile, side: Side) -> Rgba {
    let c: Rgba = match tile {
        Tile::Wall => 0x646464,
        Tile::Enemy => 0xC63636,
        Tile::Exit => 0xFFFF00,
        Tile::Player => 0x00FF00,
        Tile::Construct => 0x9632C8,
        Tile::Empty => 0xC8C8C8,
    };
    match side {
        Side::X => c,
        Side::Y => (c >> 1) & 0x7F7F7F,
    }
}

impl Software {
    /// Cast every column, record wall depth and paint the hit slabs.
    pub(super) fn draw_walls(&mut self, grid: &Grid, cam: &Camera) {
        for x in 0..self.width {
            let dir = cam.ray_dir(x, self.width);
            let hits = cast_and_fill_depth(grid, cam.pos, dir, self.depth.slot(x));

            // farthest first so nearer slabs overdraw
            for hit in hits.iter().rev() {
                let Some((y0, y1)) = slab_extent(hit.dist, hit.tile, cam.eye_offset, self.height)
                else {
                    continue;
                };
                let color = tile_color(hit.tile, hit.side);
                for y in y0..y1 {
                    self.scratch[y * self.width + x] = color;
                }
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct_is_shorter_with_fixed_bottom() {
        // base slab fills the screen at dist 1 with a centred eye
        assert_eq!(slab_extent(1.0, Tile::Exit, 0.5, 100), Some((0, 99)));
        assert_eq!(slab_extent(1.0, Tile::Construct, 0.5, 100), Some((20, 99)));
    }

    #[test]
    fn wall_grows_upward() {
        assert_eq!(slab_extent(2.0, Tile::Exit, 0.5, 100), Some((25, 75)));
        assert_eq!(slab_extent(2.0, Tile::Wall, 0.5, 100), Some((0, 75)));
        // a lower eye offset pushes the horizon down
        assert_eq!(slab_extent(2.0, Tile::Exit, 0.25, 100), Some((37, 87)));
    }

    #[test]
    fn distant_slabs_shrink() {
        let (a0, a1) = slab_extent(2.0, Tile::Wall, 0.2, 768).unwrap();
        let (b0, b1) = slab_extent(8.0, Tile::Wall, 0.2, 768).unwrap();
        assert!(b1 - b0 < a1 - a0);
    }

    #[test]
    fn degenerate_distances_fill_the_column() {
        for dist in [0.0, -0.0, 1e-8, -3.0, f32::NAN] {
            assert_eq!(slab_extent(dist, Tile::Wall, 0.2, 768), Some((0, 767)), "{dist}");
            assert_eq!(slab_extent(dist, Tile::Exit, 0.6, 768), Some((0, 767)), "{dist}");
        }
        // past the clamp the slab still shrinks with distance
        let (s0, s1) = slab_extent(200.0, Tile::Exit, 0.5, 768).unwrap();
        assert!(s1 - s0 < 4);
    }

    #[test]
    fn y_side_is_half_bright() {
        assert_eq!(tile_color(Tile::Wall, Side::X), 0x646464);
        assert_eq!(tile_color(Tile::Wall, Side::Y), 0x323232);
        assert_eq!(tile_color(Tile::Exit, Side::Y), 0x7F7F00);
    }
}
