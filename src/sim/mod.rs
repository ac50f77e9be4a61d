mod components;
pub mod enemy;
mod player;
mod sprite;
mod tic;

pub use components::{InputCmd, Patrol, Pose, Vision};
pub use player::{
    CROUCH_TRANSITION, HEIGHT_CROUCHING, HEIGHT_STANDING, Player, ROTATE_SPEED, SPEED_CROUCHING,
    SPEED_STANDING,
};
pub use sprite::{Facing, FacingMap, Sprite, SpriteError, relative_angle};
pub use tic::{GameState, SIM_FPS, Simulation, Ticker};
