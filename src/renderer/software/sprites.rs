//! Billboard pass.  Runs after the wall pass and only *reads* the depth
//! buffer it produced.

use glam::Vec2;

use crate::{
    renderer::software::{DepthBuffer, Software},
    sim::{Pose, Simulation, Sprite},
    world::{Camera, Texture, TextureBank},
};

/// Billboards nearer than this along the view direction are not drawn.
pub const NEAR_PLANE: f32 = 0.05;

/// Screen footprint of one billboard.  Bounds are unclamped so texture
/// coordinates stay proportional when the sprite is partly off-screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisSprite {
    pub x0: i32, // inclusive
    pub x1: i32, // exclusive
    pub y0: i32, // inclusive
    pub y1: i32, // exclusive
    /// Camera-space depth (distance along the view direction).
    pub depth: f32,
    pub size: i32,
}

/// Project a world point into a square billboard footprint.
///
/// `None` behind the viewer, inside the [`NEAR_PLANE`] or with a degenerate
/// camera.
pub fn project(cam: &Camera, pos: Vec2, width: usize, height: usize) -> Option<VisSprite> {
    let t = cam.to_cam(pos)?;
    if t.y.is_nan() || t.y < NEAR_PLANE {
        return None;
    }
    let screen_x = (width as f32 / 2.0 * (1.0 + t.x / t.y)) as i32;
    let size = (height as f32 / t.y) as i32;
    if size == 0 {
        return None;
    }
    let shift = (size as f32 * (0.5 - cam.eye_offset)) as i32;
    let half_h = height as i32 / 2;
    let half = size / 2;
    Some(VisSprite {
        x0: screen_x.saturating_sub(half),
        x1: screen_x.saturating_add(half),
        y0: (half_h - half).saturating_add(shift),
        y1: (half_h + half).saturating_add(shift),
        depth: t.y,
        size,
    })
}

/// Columns of `vs` that survive the occlusion test against `depth`.
pub fn visible_columns<'a>(
    vs: &'a VisSprite,
    depth: &'a DepthBuffer,
    width: usize,
) -> impl Iterator<Item = usize> + 'a {
    let lo = vs.x0.max(0);
    let hi = vs.x1.min(width as i32);
    (lo..hi)
        .map(|x| x as usize)
        .filter(move |&x| vs.depth < depth.get(x))
}

impl Software {
    /// Draw every sentry, farthest first.
    pub(super) fn draw_sprites(&mut self, sim: &Simulation, bank: &TextureBank) {
        let cam = &sim.player().camera;

        let mut query = sim.world().query::<(&Pose, &Sprite)>();
        let mut visible: Vec<(f32, Vec2, &Sprite)> = query
            .iter()
            .map(|(_, (pose, sprite))| (pose.pos.distance_squared(cam.pos), pose.pos, sprite))
            .collect();
        // stable: equal distances keep ECS order
        visible.sort_by(|a, b| b.0.total_cmp(&a.0));

        for (_, pos, sprite) in visible {
            let Some(vs) = project(cam, pos, self.width, self.height) else {
                continue;
            };
            let tex = bank.texture_or_missing(sprite.texture());
            self.blit_sprite(&vs, tex);
        }
    }

    fn blit_sprite(&mut self, vs: &VisSprite, tex: &Texture) {
        let (w, h) = (self.width, self.height);
        let y_lo = vs.y0.max(0);
        let y_hi = vs.y1.min(h as i32);

        for x in visible_columns(vs, &self.depth, w) {
            let u = ((x as i32 - vs.x0) as usize * tex.w / vs.size as usize).min(tex.w - 1);
            for y in y_lo..y_hi {
                let v = ((y - vs.y0) as usize * tex.h / vs.size as usize).min(tex.h - 1);
                let texel = tex.texel(u, v);
                if texel >> 24 == 0 {
                    continue; // transparent
                }
                self.scratch[y as usize * w + x] = texel & 0x00FF_FFFF;
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
