use std::time::{Duration, Instant};

use hecs::World;

use super::{InputCmd, Player, Sprite, enemy};
use crate::world::{Grid, Level};

pub const SIM_FPS: u32 = 60;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);

/// Upper bound of tics replayed after a stall (window drag, debugger, …).
const MAX_CATCH_UP: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Playing,
    /// Sticky until a new [`Simulation`] replaces this one.
    Over,
}

/// One round: the level grid, the player and the ECS world of sentries.
///
/// Restarting a round means building a fresh `Simulation` from the same
/// [`Level`]; nothing is reset in place.
pub struct Simulation {
    grid: Grid,
    world: World,
    player: Player,
    state: GameState,
}

impl Simulation {
    /// Spawn the player and one sentry per enemy marker; every sentry gets
    /// its own copy of `enemy_sprite`.
    pub fn new(level: &Level, enemy_sprite: &Sprite) -> Self {
        let grid = level.grid.clone();
        let mut world = World::new();
        for &cell in &level.enemy_spawns {
            enemy::spawn_enemy(&mut world, &grid, cell, enemy_sprite.clone());
        }
        let (px, py) = level.player_spawn;
        log::debug!(
            "round started: player at ({px}, {py}), {} enemies",
            level.enemy_spawns.len()
        );
        Self {
            grid,
            world,
            player: Player::spawn(px, py),
            state: GameState::Playing,
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.state == GameState::Over
    }

    /// Advance one fixed tic: player input, patrols, sprite facing, then
    /// the detection check.  A finished round ignores input entirely.
    pub fn tick(&mut self, cmd: &InputCmd) {
        if self.is_over() {
            return;
        }
        self.player.apply(&self.grid, cmd);
        enemy::patrol_system(&mut self.world);
        enemy::sprite_system(&mut self.world, self.player.pos());

        if let Some(e) = enemy::player_detected(&self.world, &self.grid, self.player.pos()) {
            log::debug!("player spotted by {e:?} at {}", self.player.pos());
            self.state = GameState::Over;
        }
    }
}

/// Converts wall-clock time into a number of fixed-rate tics.
pub struct Ticker {
    last: Instant,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}

impl Ticker {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Tics owed since the previous call (capped after long stalls).
    pub fn due(&mut self) -> u32 {
        let mut n = 0;
        while self.last.elapsed() >= TIC {
            self.last += TIC;
            n += 1;
            if n == MAX_CATCH_UP {
                self.last = Instant::now();
                break;
            }
        }
        n
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
