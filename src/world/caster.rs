//! Grid ray caster (DDA).
//!
//! Walks the cells pierced by a ray one grid-line crossing at a time and
//! reports every non-empty cell, nearest first, up to and including the
//! first ray-stopping tile.  Distances are measured perpendicular to the
//! camera plane so they can be turned into column heights directly.

use glam::{IVec2, Vec2};
use smallvec::SmallVec;

use super::grid::{Grid, Tile, TileFlags};

/// Which family of grid lines the ray crossed to enter the cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// A vertical line (constant x).
    X,
    /// A horizontal line (constant y).
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub tile: Tile,
    pub cell: IVec2,
    /// Perpendicular distance from the viewer plane.
    pub dist: f32,
    pub side: Side,
}

/// Hits of one cast, ordered near → far.  Rarely more than a handful.
pub type RayHits = SmallVec<[RayHit; 8]>;

/// Cast a ray from `origin` along `dir`.
///
/// The last element is always the terminating wall; a zero direction
/// yields no hits at all.
pub fn cast(grid: &Grid, origin: Vec2, dir: Vec2) -> RayHits {
    let mut hits = RayHits::new();
    if dir == Vec2::ZERO {
        return hits;
    }

    let mut map = origin.floor().as_ivec2();

    // distance along the ray between two crossings of the same axis
    let delta = Vec2::new(axis_delta(dir.x), axis_delta(dir.y));

    let (step_x, mut side_x) = axis_start(origin.x, map.x, dir.x, delta.x);
    let (step_y, mut side_y) = axis_start(origin.y, map.y, dir.y, delta.y);

    loop {
        let side = if side_x < side_y {
            side_x += delta.x;
            map.x += step_x;
            Side::X
        } else {
            side_y += delta.y;
            map.y += step_y;
            Side::Y
        };

        let tile = grid.tile(map);
        if tile == Tile::Empty {
            continue;
        }

        let dist = match side {
            Side::X => (map.x as f32 - origin.x + (1 - step_x) as f32 / 2.0) / dir.x,
            Side::Y => (map.y as f32 - origin.y + (1 - step_y) as f32 / 2.0) / dir.y,
        };
        hits.push(RayHit {
            tile,
            cell: map,
            dist,
            side,
        });

        if tile.flags().contains(TileFlags::STOPS_RAY) {
            return hits;
        }
    }
}

/// Cast and record the distance of the terminating wall in `depth`.
///
/// `depth` only ever shrinks; the caller resets it once per frame.
pub fn cast_and_fill_depth(grid: &Grid, origin: Vec2, dir: Vec2, depth: &mut f32) -> RayHits {
    let hits = cast(grid, origin, dir);
    if let Some(wall) = hits.iter().find(|h| h.tile.is_wall()) {
        *depth = depth.min(wall.dist);
    }
    hits
}

#[inline]
fn axis_delta(d: f32) -> f32 {
    if d == 0.0 {
        f32::INFINITY
    } else {
        (1.0 / d).abs()
    }
}

/// Step direction and ray length to the first crossing on one axis.
#[inline]
fn axis_start(o: f32, cell: i32, d: f32, delta: f32) -> (i32, f32) {
    if d == 0.0 {
        // never advances along this axis
        (1, f32::INFINITY)
    } else if d < 0.0 {
        (-1, (o - cell as f32) * delta)
    } else {
        (1, (cell as f32 + 1.0 - o) * delta)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
