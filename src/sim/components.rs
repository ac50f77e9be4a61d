use glam::Vec2;

/// Position and unit facing shared by every movable entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub pos: Vec2,
    pub dir: Vec2,
}

impl Pose {
    /// Facing as an angle in radians.
    #[inline]
    pub fn angle(&self) -> f32 {
        self.dir.y.atan2(self.dir.x)
    }
}

/// Cyclic waypoint loop and the index of the waypoint being approached.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Patrol {
    pub points: Vec<Vec2>,
    pub current: usize,
    /// Grid units per tic.
    pub speed: f32,
}

/// Detection cone: full opening `angle` (radians) and reach `distance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vision {
    pub angle: f32,
    pub distance: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCmd {
    pub forward: f32, // –1 … +1
    pub turn: f32,    // –1 … +1  (right / left)
    pub crouch: bool, // C held
    pub restart: bool, // Space
}
