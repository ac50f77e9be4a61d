//! Top-down overlay: a baked image of the grid plus live markers.

use glam::Vec2;

use crate::{
    renderer::{Rgba, software::Software},
    sim::{Pose, Simulation, Vision},
    world::Grid,
};

/// Pixels per grid cell.
pub const CELL_PX: usize = 4;
/// Gap between the overlay and the top/right screen edges.
pub const MARGIN: usize = 10;

const WALL: Rgba = 0x323232;
const OPEN: Rgba = 0x8C8C8C;
const PLAYER_DOT: Rgba = 0xFF0000;
const ENEMY_DOT: Rgba = 0x00FF00;
const FOV_LINE: Rgba = 0xFFFF00;

/// Grid rendered once at [`CELL_PX`] pixels per cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Minimap {
    pub w: usize,
    pub h: usize,
    pixels: Vec<Rgba>,
    source: Grid,
}

impl Minimap {
    pub fn bake(grid: &Grid) -> Self {
        let w = grid.width() * CELL_PX;
        let h = grid.height() * CELL_PX;
        let mut pixels = vec![OPEN; w * h];
        for (cx, cy, tile) in grid.cells() {
            if !tile.is_wall() {
                continue;
            }
            for y in cy * CELL_PX..(cy + 1) * CELL_PX {
                pixels[y * w + cx * CELL_PX..y * w + (cx + 1) * CELL_PX].fill(WALL);
            }
        }
        Self {
            w,
            h,
            pixels,
            source: grid.clone(),
        }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.w + x]
    }

    /// Was this bake made from exactly `grid`?
    pub fn fits(&self, grid: &Grid) -> bool {
        self.source == *grid
    }
}

/// 50 % mix of two colours.
#[inline]
fn blend(dst: Rgba, src: Rgba) -> Rgba {
    ((dst >> 1) & 0x7F7F7F) + ((src >> 1) & 0x7F7F7F)
}

/// Bresenham line, clipped to the buffer, blended over the frame.
#[allow(clippy::too_many_arguments)]
fn draw_line(
    buf: &mut [Rgba],
    w: usize,
    h: usize,
    mut x0: i32,
    mut y0: i32,
    x1: i32,
    y1: i32,
    colour: Rgba,
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if (0..w as i32).contains(&x0) && (0..h as i32).contains(&y0) {
            let px = &mut buf[y0 as usize * w + x0 as usize];
            *px = blend(*px, colour);
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Filled disc of radius 2.
fn draw_dot(buf: &mut [Rgba], w: usize, h: usize, cx: i32, cy: i32, colour: Rgba) {
    for dy in -2i32..=2 {
        for dx in -2i32..=2 {
            if dx * dx + dy * dy > 4 {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if (0..w as i32).contains(&x) && (0..h as i32).contains(&y) {
                buf[y as usize * w + x as usize] = colour;
            }
        }
    }
}

impl Software {
    /// Screen position of the overlay's top-left corner.
    fn minimap_origin(&self, map: &Minimap) -> (i32, i32) {
        (self.width as i32 - map.w as i32 - MARGIN as i32, MARGIN as i32)
    }

    pub(super) fn draw_minimap(&mut self, sim: &Simulation) {
        let grid = sim.grid();
        if !self.minimap.as_ref().is_some_and(|m| m.fits(grid)) {
            self.minimap = Some(Minimap::bake(grid));
        }
        let Some(map) = self.minimap.take() else {
            return;
        };
        let (ox, oy) = self.minimap_origin(&map);
        let (w, h) = (self.width, self.height);

        for my in 0..map.h {
            let sy = oy + my as i32;
            if !(0..h as i32).contains(&sy) {
                continue;
            }
            for mx in 0..map.w {
                let sx = ox + mx as i32;
                if (0..w as i32).contains(&sx) {
                    self.scratch[sy as usize * w + sx as usize] = map.pixel(mx, my);
                }
            }
        }

        let to_screen = |p: Vec2| {
            (
                ox + (p.x * CELL_PX as f32) as i32,
                oy + (p.y * CELL_PX as f32) as i32,
            )
        };

        let (px, py) = to_screen(sim.player().pos());
        draw_dot(&mut self.scratch, w, h, px, py, PLAYER_DOT);

        let mut query = sim.world().query::<(&Pose, &Vision)>();
        for (_, (pose, vision)) in query.iter() {
            let (ex, ey) = to_screen(pose.pos);
            draw_dot(&mut self.scratch, w, h, ex, ey, ENEMY_DOT);

            let reach = vision.distance * CELL_PX as f32;
            for edge in [-vision.angle / 2.0, vision.angle / 2.0] {
                let tip = Vec2::from_angle(pose.angle() + edge) * reach;
                draw_line(
                    &mut self.scratch,
                    w,
                    h,
                    ex,
                    ey,
                    ex + tip.x as i32,
                    ey + tip.y as i32,
                    FOV_LINE,
                );
            }
        }

        self.minimap = Some(map);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
