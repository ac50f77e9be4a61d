use glam::Vec2;

/// Half-width of the camera plane relative to a unit direction (≈ 66° FoV).
pub const PLANE_LEN: f32 = 0.66;

/// Viewer in grid space.
///
/// * `dir` is unit length; `plane` is perpendicular to it and scaled by
///   [`PLANE_LEN`].  Both are rotated together so they stay consistent.
/// * `eye_offset` shifts the horizon: 0.5 is eye level with the middle of a
///   base slab, larger values look from lower down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pos: Vec2,
    pub dir: Vec2,
    pub plane: Vec2,
    pub eye_offset: f32,
}

impl Camera {
    /// Camera at `pos` looking along `dir`; the plane points to the
    /// camera's right on screen.
    pub fn new(pos: Vec2, dir: Vec2, eye_offset: f32) -> Self {
        let dir = dir.normalize_or_zero();
        Self {
            pos,
            dir,
            plane: -dir.perp() * PLANE_LEN,
            eye_offset,
        }
    }

    /// Rotate direction and plane by `angle` radians.
    pub fn rotate(&mut self, angle: f32) {
        let rot = Vec2::from_angle(angle);
        self.dir = rot.rotate(self.dir);
        self.plane = rot.rotate(self.plane);
    }

    /// Heading in radians (`atan2` of the direction).
    #[inline]
    pub fn yaw(&self) -> f32 {
        self.dir.y.atan2(self.dir.x)
    }

    /// Ray direction through screen column `x` of a `width`-wide view.
    #[inline]
    pub fn ray_dir(&self, x: usize, width: usize) -> Vec2 {
        let camera_x = 2.0 * x as f32 / width as f32 - 1.0;
        self.dir + self.plane * camera_x
    }

    /// Transform a world point into camera space:
    ///  .x = lateral offset along the plane
    ///  .y = depth along `dir`
    ///
    /// `None` if direction and plane are degenerate.
    pub fn to_cam(&self, p: Vec2) -> Option<Vec2> {
        let rel = p - self.pos;
        let det = self.plane.x * self.dir.y - self.dir.x * self.plane.y;
        if det == 0.0 {
            return None;
        }
        let inv_det = 1.0 / det;
        Some(Vec2::new(
            inv_det * (self.dir.y * rel.x - self.dir.x * rel.y),
            inv_det * (-self.plane.y * rel.x + self.plane.x * rel.y),
        ))
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
