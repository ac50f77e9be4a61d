use bitflags::bitflags;
use glam::{IVec2, Vec2};
use thiserror::Error;

/// Classification of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    Enemy,
    Exit,
    Player,
    Construct,
}

bitflags! {
    /// Static behaviour of a tile kind.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TileFlags: u8 {
        /// The player cannot enter the cell.
        const BLOCKS_MOVE  = 0x01;
        /// Line-of-sight queries fail through the cell.
        const BLOCKS_SIGHT = 0x02;
        /// A ray entering the cell terminates after recording it.
        const STOPS_RAY    = 0x04;
    }
}

impl Tile {
    pub fn flags(self) -> TileFlags {
        match self {
            Tile::Wall => TileFlags::all(),
            // spawn marker that survived extraction (never after `Level::new`)
            Tile::Enemy => TileFlags::BLOCKS_MOVE,
            Tile::Empty | Tile::Exit | Tile::Player | Tile::Construct => TileFlags::empty(),
        }
    }

    #[inline]
    pub fn is_wall(self) -> bool {
        self == Tile::Wall
    }
}

/// Things that make a level unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level has no cells")]
    Empty,

    /// Row `row` is `len` cells long while row 0 is `expected`.
    #[error("row {row} has {len} cells, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("level has no player spawn")]
    NoPlayerSpawn,

    /// Rays could leave the map through this border cell.
    #[error("outer boundary is open at cell ({x}, {y})")]
    Unsealed { x: usize, y: usize },

    #[error("unknown tile character `{ch}` at ({x}, {y})")]
    BadChar { ch: char, x: usize, y: usize },
}

/// Rectangular tile map, row-major, `(0, 0)` top-left.
///
/// Reads outside the map classify as [`Tile::Wall`] so every walk over the
/// grid terminates even on bad input.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Build from rows; every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, LevelError> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(LevelError::Empty);
        }
        let height = rows.len();
        let mut tiles = Vec::with_capacity(width * height);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != width {
                return Err(LevelError::Ragged {
                    row,
                    len: cells.len(),
                    expected: width,
                });
            }
            tiles.extend(cells);
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Tile at integer cell `(x, y)`; out-of-range cells are walls.
    #[inline]
    pub fn entity_at(&self, x: i32, y: i32) -> Tile {
        if self.in_bounds(x, y) {
            self.tiles[y as usize * self.width + x as usize]
        } else {
            Tile::Wall
        }
    }

    #[inline]
    pub fn tile(&self, cell: IVec2) -> Tile {
        self.entity_at(cell.x, cell.y)
    }

    /// Tile containing the continuous point `p`.
    #[inline]
    pub fn tile_at_point(&self, p: Vec2) -> Tile {
        self.entity_at(p.x.floor() as i32, p.y.floor() as i32)
    }

    /// Iterate `(x, y, tile)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, &t)| (i % self.width, i / self.width, t))
    }

    fn set(&mut self, x: usize, y: usize, tile: Tile) {
        self.tiles[y * self.width + x] = tile;
    }

    /// First border cell that is not a wall, if any.
    fn first_open_border(&self) -> Option<(usize, usize)> {
        self.cells()
            .filter(|&(x, y, _)| {
                x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
            })
            .find(|&(_, _, t)| !t.is_wall())
            .map(|(x, y, _)| (x, y))
    }
}

/// A decoded level: the static grid plus the spawn cells pulled out of it.
///
/// Immutable once built; every round starts from a clone of it.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub grid: Grid,
    pub player_spawn: (usize, usize),
    pub enemy_spawns: Vec<(usize, usize)>,
}

impl Level {
    /// Consume the spawn markers of `grid` and validate the boundary.
    pub fn new(mut grid: Grid) -> Result<Self, LevelError> {
        if let Some((x, y)) = grid.first_open_border() {
            return Err(LevelError::Unsealed { x, y });
        }

        let mut player_spawn = None;
        let mut enemy_spawns = Vec::new();
        let markers: Vec<_> = grid
            .cells()
            .filter(|&(_, _, t)| matches!(t, Tile::Player | Tile::Enemy))
            .collect();

        for (x, y, tile) in markers {
            if tile == Tile::Player {
                if player_spawn.is_some() {
                    log::warn!("extra player spawn at ({x}, {y}) ignored");
                } else {
                    player_spawn = Some((x, y));
                }
            } else {
                enemy_spawns.push((x, y));
            }
            grid.set(x, y, Tile::Empty);
        }

        Ok(Self {
            grid,
            player_spawn: player_spawn.ok_or(LevelError::NoPlayerSpawn)?,
            enemy_spawns,
        })
    }

    /// Parse ASCII art: `#` wall, ` `/`.` empty, `E` enemy, `X` exit,
    /// `P` player, `C` construct.  Blank lines are skipped.
    pub fn from_ascii(src: &str) -> Result<Self, LevelError> {
        let mut rows = Vec::new();
        for (y, line) in src.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            let row = line
                .chars()
                .enumerate()
                .map(|(x, ch)| tile_for_char(ch).ok_or(LevelError::BadChar { ch, x, y }))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Self::new(Grid::from_rows(rows)?)
    }
}

fn tile_for_char(ch: char) -> Option<Tile> {
    Some(match ch {
        ' ' | '.' => Tile::Empty,
        '#' => Tile::Wall,
        'E' => Tile::Enemy,
        'X' => Tile::Exit,
        'P' => Tile::Player,
        'C' => Tile::Construct,
        _ => return None,
    })
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
