//! Discrete visibility between two points on the grid.
//!
//! The walk visits every cell the segment passes through, in order, with an
//! error term seeded from the fractional offsets of the start point (the
//! integer form of Amanatides–Woo).  When the segment passes exactly through
//! a grid vertex both cells sharing that corner are tested, so the answer
//! does not depend on the direction of the query.

use glam::Vec2;

use super::grid::{Grid, TileFlags};

impl Grid {
    /// `true` iff no sight-blocking tile lies on the path `from → to`.
    pub fn is_visible(&self, from: Vec2, to: Vec2) -> bool {
        let mut x = from.x.floor() as i32;
        let mut y = from.y.floor() as i32;
        let end_x = to.x.floor() as i32;
        let end_y = to.y.floor() as i32;

        if (x, y) == (end_x, end_y) {
            return true;
        }

        let dx = (to.x - from.x).abs();
        let dy = (to.y - from.y).abs();

        // cells still to visit, start cell included
        let mut n = 1 + (end_x - x).abs() + (end_y - y).abs();

        // > 0 → next crossing is a horizontal grid line (step y)
        // < 0 → next crossing is a vertical grid line (step x)
        // = 0 → both at once (corner)
        let (step_x, err_x) = if dx == 0.0 {
            (0, f32::INFINITY)
        } else if to.x > from.x {
            (1, (from.x.floor() + 1.0 - from.x) * dy)
        } else {
            (-1, (from.x - from.x.floor()) * dy)
        };
        let (step_y, err_y) = if dy == 0.0 {
            (0, f32::INFINITY)
        } else if to.y > from.y {
            (1, (from.y.floor() + 1.0 - from.y) * dx)
        } else {
            (-1, (from.y - from.y.floor()) * dx)
        };
        let mut error = err_x - err_y;
        if dx == 0.0 {
            error = f32::INFINITY;
        } else if dy == 0.0 {
            error = f32::NEG_INFINITY;
        }

        let blocks = |x: i32, y: i32| {
            self.entity_at(x, y)
                .flags()
                .contains(TileFlags::BLOCKS_SIGHT)
        };

        loop {
            if blocks(x, y) {
                return false;
            }
            n -= 1;
            if n <= 0 {
                return true;
            }

            if error > 0.0 {
                y += step_y;
                error -= dx;
            } else if error < 0.0 {
                x += step_x;
                error += dy;
            } else {
                if blocks(x + step_x, y) || blocks(x, y + step_y) {
                    return false;
                }
                x += step_x;
                y += step_y;
                error += dy - dx;
                n -= 1;
                if n <= 0 {
                    return true;
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
    use crate::world::grid::Level;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    const ROOMS: &str = "\
##########
#P.......#
#..#.....#
#..#..#..#
#.....#..#
#.C##....#
#........#
##########";

    #[test]
    fn same_cell_is_visible() {
        let lvl = Level::from_ascii(ROOMS).unwrap();
        assert!(lvl.grid.is_visible(v(1.1, 1.2), v(1.9, 1.8)));
        assert!(lvl.grid.is_visible(v(4.5, 4.5), v(4.5, 4.5)));
    }

    #[test]
    fn single_wall_blocks_then_clears() {
        let src = "\
#######
#P....#
#######";
        let open = Level::from_ascii(src).unwrap();
        let a = v(1.5, 1.5);
        let b = v(5.5, 1.5);
        assert!(open.grid.is_visible(a, b));

        let closed = Level::from_ascii(&src.replacen("#P....#", "#P.#..#", 1)).unwrap();
        assert!(!closed.grid.is_visible(a, b));
        assert!(!closed.grid.is_visible(b, a));
    }

    #[test]
    fn vertical_and_horizontal_paths() {
        let lvl = Level::from_ascii(ROOMS).unwrap();
        // column 3 has walls on rows 2-3
        assert!(!lvl.grid.is_visible(v(3.5, 1.5), v(3.5, 4.5)));
        assert!(lvl.grid.is_visible(v(5.5, 1.5), v(5.5, 6.5)));
        // row 5 has walls at x=3,4; constructs never block
        assert!(!lvl.grid.is_visible(v(1.5, 5.5), v(6.5, 5.5)));
        assert!(lvl.grid.is_visible(v(1.5, 5.5), v(2.5, 5.5)));
    }

    #[test]
    fn corner_touching_a_wall_is_blocked() {
        let src = "\
#####
#P..#
#.#.#
#...#
#####";
        let lvl = Level::from_ascii(src).unwrap();
        // the diagonal (1.5,1.5)→(3.5,3.5) passes through the wall cell (2,2)
        assert!(!lvl.grid.is_visible(v(1.5, 1.5), v(3.5, 3.5)));
        // (1.5,2.5)→(2.5,3.5) only grazes the vertex (2,3) next to the wall
        assert!(!lvl.grid.is_visible(v(1.5, 2.5), v(2.5, 3.5)));
        assert!(!lvl.grid.is_visible(v(2.5, 3.5), v(1.5, 2.5)));
    }

    #[test]
    fn visibility_is_symmetric() {
        let lvl = Level::from_ascii(ROOMS).unwrap();
        let mut points = Vec::new();
        for y in 1..7 {
            for x in 1..9 {
                for (ox, oy) in [(0.5, 0.5), (0.25, 0.75), (0.75, 0.125)] {
                    points.push(v(x as f32 + ox, y as f32 + oy));
                }
            }
        }
        for &a in &points {
            for &b in &points {
                assert_eq!(
                    lvl.grid.is_visible(a, b),
                    lvl.grid.is_visible(b, a),
                    "asymmetric between {a} and {b}"
                );
            }
        }
    }
}
