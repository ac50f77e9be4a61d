use std::f32::consts::{PI, TAU};

use glam::Vec2;
use hecs::{Entity, World};

use super::{Patrol, Pose, Sprite, Vision};
use crate::world::Grid;

pub const ENEMY_SPEED: f32 = 0.03; // grid units / tic
pub const ENEMY_FOV: f32 = PI / 3.0; // full cone opening
pub const ENEMY_FOV_DISTANCE: f32 = 5.0;

/// Corner offsets of the generated patrol square, relative to the spawn
/// cell centre.
const PATROL_CORNERS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(2.0, 0.0),
    Vec2::new(2.0, 2.0),
    Vec2::new(0.0, 2.0),
];

/// Four-corner loop starting at `centre`, minus corners inside walls.
pub fn patrol_points(grid: &Grid, centre: Vec2) -> Vec<Vec2> {
    PATROL_CORNERS
        .iter()
        .map(|&off| centre + off)
        .filter(|&p| !grid.tile_at_point(p).is_wall())
        .collect()
}

/// Spawn a sentry in cell `(x, y)` facing +x.
pub fn spawn_enemy(
    world: &mut World,
    grid: &Grid,
    (x, y): (usize, usize),
    sprite: Sprite,
) -> Entity {
    let centre = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
    let points = patrol_points(grid, centre);
    if points.is_empty() {
        log::warn!("enemy at ({x}, {y}) has no reachable patrol corner; it will stand still");
    }
    world.spawn((
        Pose {
            pos: centre,
            dir: Vec2::X,
        },
        Patrol {
            points,
            current: 0,
            speed: ENEMY_SPEED,
        },
        Vision {
            angle: ENEMY_FOV,
            distance: ENEMY_FOV_DISTANCE,
        },
        sprite,
    ))
}

/* ── Patrol system ────────────────────────────────────────────────── */

/// Walk every enemy one tic toward its current waypoint.
pub fn patrol_system(world: &mut World) {
    for (_, (pose, patrol)) in world.query_mut::<(&mut Pose, &mut Patrol)>() {
        patrol_step(pose, patrol);
    }
}

pub fn patrol_step(pose: &mut Pose, patrol: &mut Patrol) {
    let Some(&target) = patrol.points.get(patrol.current) else {
        return;
    };
    let delta = target - pose.pos;
    if delta.length() < patrol.speed {
        patrol.current = (patrol.current + 1) % patrol.points.len();
        return;
    }
    // standing on the waypoint with a non-positive speed
    let dir = delta.normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    pose.pos += dir * patrol.speed;
    pose.dir = dir;
}

/* ── Appearance ───────────────────────────────────────────────────── */

/// Re-face and animate every sprite toward `viewer`.
pub fn sprite_system(world: &mut World, viewer: Vec2) {
    for (_, (pose, sprite)) in world.query_mut::<(&Pose, &mut Sprite)>() {
        sprite.update(pose.pos, pose.angle(), Some(viewer));
    }
}

/* ── Detection ────────────────────────────────────────────────────── */

/// Distance, cone and line-of-sight test, cheapest first.
pub fn sees(grid: &Grid, pose: &Pose, vision: &Vision, target: Vec2) -> bool {
    let to_target = target - pose.pos;
    if to_target.length() > vision.distance {
        return false;
    }
    let diff = (to_target.y.atan2(to_target.x) - pose.angle()).rem_euclid(TAU);
    let diff = diff.min(TAU - diff);
    if diff > vision.angle / 2.0 {
        return false;
    }
    grid.is_visible(pose.pos, target)
}

/// First enemy that can see `player`, if any.
pub fn player_detected(world: &World, grid: &Grid, player: Vec2) -> Option<Entity> {
    let mut query = world.query::<(&Pose, &Vision)>();
    query
        .iter()
        .find(|(_, (pose, vision))| sees(grid, pose, vision, player))
        .map(|(e, _)| e)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
