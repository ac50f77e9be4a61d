use glam::Vec2;

use super::InputCmd;
use crate::world::{Camera, Grid, TileFlags};

pub const SPEED_STANDING: f32 = 0.08; // grid units / tic
pub const SPEED_CROUCHING: f32 = 0.01;
pub const ROTATE_SPEED: f32 = 0.07; // rad / tic
pub const HEIGHT_STANDING: f32 = 0.2;
pub const HEIGHT_CROUCHING: f32 = 0.6;
pub const CROUCH_TRANSITION: f32 = 0.03; // offset change / tic

/// Initial heading of a freshly spawned player.
pub const SPAWN_DIR: Vec2 = Vec2::NEG_X;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pub camera: Camera,
    pub crouching: bool,
    pub speed: f32,
}

impl Player {
    /// Standing player centred in spawn cell `(x, y)`.
    pub fn spawn(x: usize, y: usize) -> Self {
        Self {
            camera: Camera::new(
                Vec2::new(x as f32 + 0.5, y as f32 + 0.5),
                SPAWN_DIR,
                HEIGHT_STANDING,
            ),
            crouching: false,
            speed: SPEED_STANDING,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.camera.pos
    }

    /// Apply one tic of input.
    pub fn apply(&mut self, grid: &Grid, cmd: &InputCmd) {
        if cmd.crouch {
            self.speed = SPEED_CROUCHING;
            self.adjust_height(CROUCH_TRANSITION);
        } else {
            self.speed = SPEED_STANDING;
            self.adjust_height(-CROUCH_TRANSITION);
        }

        if cmd.forward != 0.0 {
            self.step(grid, self.speed * cmd.forward.signum());
        }
        if cmd.turn != 0.0 {
            self.camera.rotate(ROTATE_SPEED * cmd.turn.signum());
        }
    }

    /// Move `dist` along the heading, sliding along blocked axes.
    pub fn step(&mut self, grid: &Grid, dist: f32) {
        let next = self.camera.pos + self.camera.dir * dist;
        if !blocked(grid, Vec2::new(next.x, self.camera.pos.y)) {
            self.camera.pos.x = next.x;
        }
        if !blocked(grid, Vec2::new(self.camera.pos.x, next.y)) {
            self.camera.pos.y = next.y;
        }
    }

    fn adjust_height(&mut self, delta: f32) {
        let off = (self.camera.eye_offset + delta).clamp(HEIGHT_STANDING, HEIGHT_CROUCHING);
        self.camera.eye_offset = off;
        self.crouching = off == HEIGHT_CROUCHING;
    }
}

/// Outside the map or on a movement-blocking tile.
fn blocked(grid: &Grid, p: Vec2) -> bool {
    p.x < 0.0
        || p.y < 0.0
        || grid
            .tile_at_point(p)
            .flags()
            .contains(TileFlags::BLOCKS_MOVE)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
