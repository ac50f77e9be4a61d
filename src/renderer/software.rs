//! ---------------------------------------------------------------------------
//! Software (CPU) column renderer
//!
//! * Fills a `Vec<u32>` frame-buffer in **0x00RRGGBB** format.
//! * Wall pass first: one DDA cast per column writes the depth buffer and
//!   paints slabs far → near.
//! * Sprite pass second: billboards are clipped per column against the
//!   depth buffer, which is read-only from here on.
//! ---------------------------------------------------------------------------

mod depth;
mod minimap;
mod sprites;
mod walls;

pub use depth::DepthBuffer;
pub use minimap::Minimap;
pub use sprites::{NEAR_PLANE, VisSprite, project, visible_columns};
pub use walls::{
    CONSTRUCT_SCALE, FLOOR, MIN_SLAB_DIST, SKY, WALL_SCALE, slab_extent, tile_color,
};

use crate::{
    renderer::{Renderer, Rgba},
    sim::Simulation,
    world::TextureBank,
};

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

pub struct Software {
    scratch: Vec<Rgba>,
    depth: DepthBuffer,
    width: usize,
    height: usize,
    show_minimap: bool,
    minimap: Option<Minimap>,
}

impl Default for Software {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Software {
    pub fn new(show_minimap: bool) -> Self {
        Self {
            scratch: Vec::new(),
            depth: DepthBuffer::default(),
            width: 0,
            height: 0,
            show_minimap,
            minimap: None,
        }
    }

    /// Depth buffer of the last frame.
    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Darken the frame and push it toward red.
    fn tint_game_over(&mut self) {
        for px in &mut self.scratch {
            let r = ((*px >> 16) & 0xFF) / 3 + 0x60;
            let g = ((*px >> 8) & 0xFF) / 3;
            let b = (*px & 0xFF) / 3;
            *px = (r << 16) | (g << 8) | b;
        }
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }

        /* sky above the horizon, floor below */
        let half = (h / 2) * w;
        self.scratch[..half].fill(SKY);
        self.scratch[half..].fill(FLOOR);

        self.depth.reset(w);
    }

    fn draw_scene(&mut self, sim: &Simulation, bank: &TextureBank) {
        // order matters: sprites read the depth the walls wrote
        self.draw_walls(sim.grid(), &sim.player().camera);
        self.draw_sprites(sim, bank);

        if self.show_minimap {
            self.draw_minimap(sim);
        }
        if sim.is_over() {
            self.tint_game_over();
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        renderer::RendererExt,
        sim::{InputCmd, Sprite},
        world::{Level, Side, Tile},
    };

    fn corridor() -> Level {
        Level::from_ascii(
            "########\n\
             #......#\n\
             #....P.#\n\
             #......#\n\
             ########",
        )
        .unwrap()
    }

    fn frame(sw: &mut Software, sim: &Simulation, w: usize, h: usize) -> Vec<Rgba> {
        let bank = TextureBank::default_with_checker();
        let mut out = Vec::new();
        sw.draw_frame(w, h, sim, &bank, |fb, _, _| out = fb.to_vec());
        out
    }

    #[test]
    fn walls_fill_depth_and_centre_column() {
        let sim = Simulation::new(&corridor(), &Sprite::default());
        let mut sw = Software::new(false);
        let fb = frame(&mut sw, &sim, 32, 40);

        // facing west from x = 5.5 → wall face at x = 1, 4.5 away
        assert!((sw.depth().get(16) - 4.5).abs() < 1e-4);
        assert!((0..32).all(|x| sw.depth().get(x).is_finite()));

        // the middle column shows the x-side wall between sky and floor
        let wall = tile_color(Tile::Wall, Side::X);
        assert!((0..40).any(|y| fb[y * 32 + 16] == wall));
        assert_eq!(fb[16], SKY);
        assert_eq!(fb[39 * 32 + 16], FLOOR);
    }

    #[test]
    fn minimap_is_drawn_top_right() {
        let sim = Simulation::new(&corridor(), &Sprite::default());
        let mut sw = Software::new(true);
        let (w, h) = (200, 100);
        let fb = frame(&mut sw, &sim, w, h);
        // 8×5 cells → 32×20 px at (w - 32 - 10, 10)
        let ox = w - 32 - minimap::MARGIN;
        assert_eq!(fb[10 * w + ox], 0x323232);
        // player dot at cell (5, 2) centre
        let (px, py) = (ox + 22, 10 + 10);
        assert_eq!(fb[py * w + px], 0xFF0000);
    }

    #[test]
    fn minimap_follows_a_new_level_of_the_same_size() {
        let mut sw = Software::new(true);
        let (w, h) = (200, 100);
        let ox = w - 32 - minimap::MARGIN;
        // cell (3, 1) top-left pixel
        let cell_px = (10 + 4) * w + ox + 12;

        let first = Simulation::new(&corridor(), &Sprite::default());
        assert_eq!(frame(&mut sw, &first, w, h)[cell_px], 0x8C8C8C);

        let walled = Level::from_ascii(
            "########\n\
             #..#...#\n\
             #....P.#\n\
             #......#\n\
             ########",
        )
        .unwrap();
        let second = Simulation::new(&walled, &Sprite::default());
        assert_eq!(frame(&mut sw, &second, w, h)[cell_px], 0x323232);
    }

    #[test]
    fn game_over_tints_the_frame() {
        let lvl = Level::from_ascii(
            "#######\n\
             #.....#\n\
             #E.P..#\n\
             #.....#\n\
             #######",
        )
        .unwrap();
        let mut sim = Simulation::new(&lvl, &Sprite::default());
        let mut tics = 0;
        while !sim.is_over() && tics < 1000 {
            sim.tick(&InputCmd::default());
            tics += 1;
        }
        assert!(sim.is_over());

        let mut sw = Software::new(false);
        let fb = frame(&mut sw, &sim, 16, 16);
        assert!(!fb.contains(&SKY));
        assert!(fb.iter().all(|&px| (px >> 16) & 0xFF >= 0x60));
    }
}
