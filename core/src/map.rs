//! Static tile grid the arena is played on.

use std::{error::Error, fmt};

use crate::{CellCoord, WorldPoint};

/// Built-in sixteen by sixteen arena.
pub const DEFAULT_ARENA: &str = "\
################
#....H.........#
#..............#
#.......#......#
#.......#......#
#.......#......#
#..............#
#....H.........#
#.......#......#
#.......#......#
#.......#......#
#........H.....#
#..............#
#..............#
#..............#
################";

/// Kind of a single map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Solid cell that blocks movement, rays and sight.
    Wall,
    /// Empty floor.
    Open,
    /// Empty floor that seeds a health pickup when the arena loads.
    HealthMarker,
}

impl Tile {
    /// Parses a single-character cell code.
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            '#' => Some(Self::Wall),
            '.' => Some(Self::Open),
            'H' => Some(Self::HealthMarker),
            _ => None,
        }
    }

    /// Reports whether entities may stand on the tile.
    #[must_use]
    pub const fn is_walkable(&self) -> bool {
        !matches!(self, Self::Wall)
    }
}

/// Immutable rectangular grid of tiles.
///
/// Coordinates outside the grid always resolve to [`Tile::Wall`], so rays
/// and movement never need separate bounds checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl GridMap {
    /// Map without any cells; every lookup resolves to a wall.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            columns: 0,
            rows: 0,
            tiles: Vec::new(),
        }
    }

    /// Parses a map from newline separated rows of cell codes.
    ///
    /// Blank lines and trailing whitespace are ignored.
    pub fn parse(source: &str) -> Result<Self, MapError> {
        let lines: Vec<&str> = source
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();

        let Some(first) = lines.first() else {
            return Err(MapError::Empty);
        };
        let columns = first.chars().count();

        let mut tiles = Vec::with_capacity(columns * lines.len());
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != columns {
                return Err(MapError::RaggedRow {
                    row,
                    expected: columns,
                    found,
                });
            }

            for (column, code) in line.chars().enumerate() {
                let tile = Tile::from_code(code).ok_or(MapError::UnknownCell { code, row, column })?;
                tiles.push(tile);
            }
        }

        let columns = u32::try_from(columns).map_err(|_| MapError::TooLarge)?;
        let rows = u32::try_from(lines.len()).map_err(|_| MapError::TooLarge)?;

        Ok(Self {
            columns,
            rows,
            tiles,
        })
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Tile at the provided indices, treating anything out of bounds as a wall.
    #[must_use]
    pub fn tile(&self, column: i64, row: i64) -> Tile {
        if column < 0 || row < 0 || column >= i64::from(self.columns) || row >= i64::from(self.rows)
        {
            return Tile::Wall;
        }

        let index = row as usize * self.columns as usize + column as usize;
        self.tiles.get(index).copied().unwrap_or(Tile::Wall)
    }

    /// Tile containing the provided cell.
    #[must_use]
    pub fn tile_at_cell(&self, cell: CellCoord) -> Tile {
        self.tile(i64::from(cell.column()), i64::from(cell.row()))
    }

    /// Tile containing the provided point.
    #[must_use]
    pub fn tile_at(&self, point: WorldPoint) -> Tile {
        let (column, row) = point.tile_indices();
        self.tile(column, row)
    }

    /// Reports whether an entity centred on `point` would stand on floor.
    #[must_use]
    pub fn is_walkable_at(&self, point: WorldPoint) -> bool {
        self.tile_at(point).is_walkable()
    }

    /// Cells that seed a health pickup when the arena loads.
    pub fn health_markers(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells()
            .filter(move |cell| self.tile_at_cell(*cell) == Tile::HealthMarker)
    }

    fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }
}

/// Errors that can occur while parsing a map.
#[derive(Debug, PartialEq, Eq)]
pub enum MapError {
    /// The source contained no rows.
    Empty,
    /// A row's width differs from the first row.
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A cell used a code other than `#`, `.` or `H`.
    UnknownCell {
        /// Offending character.
        code: char,
        /// Zero-based row of the cell.
        row: usize,
        /// Zero-based column of the cell.
        column: usize,
    },
    /// The map dimensions do not fit the coordinate space.
    TooLarge,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "map contains no rows"),
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {row} has {found} cells but the map is {expected} cells wide"
            ),
            Self::UnknownCell { code, row, column } => {
                write!(f, "unknown cell code {code:?} at row {row}, column {column}")
            }
            Self::TooLarge => write!(f, "map dimensions exceed the supported range"),
        }
    }
}

impl Error for MapError {}
