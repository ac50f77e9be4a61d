//! Rendering abstraction layer.
//!
//! *The simulation never touches a pixel buffer directly.*  A type that
//! implements [`Renderer`] turns a [`Simulation`] snapshot into pixels and
//! loans the finished frame to a caller-supplied closure.
//!
//! * Frames are built in two strict phases: the wall pass casts one ray per
//!   column and fills the depth buffer, then the sprite pass reads that
//!   buffer (never writes it) to clip billboards.
//! * A helper blanket-impl [`RendererExt`] adds `draw_frame` so call-sites
//!   stay short.

use crate::{sim::Simulation, world::TextureBank};

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

pub const SCREEN_W: usize = 1024;
pub const SCREEN_H: usize = 768;

/// A renderer that owns an internal scratch buffer for the whole frame.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Rasterise the whole view of `sim` into the internal buffer.
    fn draw_scene(&mut self, sim: &Simulation, bank: &TextureBank);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(
        &mut self,
        width: usize,
        height: usize,
        sim: &Simulation,
        bank: &TextureBank,
        submit: F,
    ) where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        self.draw_scene(sim, bank);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod software;
pub use software::Software;
