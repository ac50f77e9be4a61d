//! Yet Another Maze: a grid raycaster with patrolling sentries.
//!
//! * [`world`]: the static level grid, ray casting, line of sight, camera.
//! * [`sim`]: the fixed-rate simulation (player, sentries, sprites).
//! * [`renderer`]: turns a simulation snapshot into pixels.
//! * [`assets`]: decodes levels and sprite images from disk.

pub mod assets;
pub mod renderer;
pub mod sim;
pub mod world;
