//! Static tile layout of the house and its occupancy queries.

use snow_day_core::{CellCoord, Tile};
use thiserror::Error;

/// House floor plan used by the game, 30 columns by 20 rows.
///
/// `#` wall, `.` floor, `D` door, `W` window, `F` furniture.
pub const HOUSE_LAYOUT: [&str; 20] = [
    "##############################",
    "#......#......#..............#",
    "#......#......#..............#",
    "#..F...#..F...#.....F........#",
    "#......#......#..............#",
    "#......D......D..............#",
    "####D########D####..........##",
    "#..............#.............#",
    "#..............#.............#",
    "#.....F........#.....F.......#",
    "#..............#.............#",
    "#..............#.............#",
    "#..............D.............#",
    "####D#########D###############",
    "#..............#.............#",
    "#..............#.............#",
    "#.....F........#......F......#",
    "#..............#.............#",
    "#..............#.............#",
    "##############################",
];

/// Immutable rectangular tile grid.
///
/// Every query is total: coordinates outside `[0, columns) × [0, rows)` are
/// reported as walls and therefore as blocked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridWorld {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl GridWorld {
    /// Builds the grid from row-major layout strings.
    ///
    /// The layout must be non-empty, rectangular, use only known glyphs, and
    /// be enclosed by walls on every border.
    pub fn parse<S>(layout: &[S]) -> Result<Self, LayoutError>
    where
        S: AsRef<str>,
    {
        let first = layout.first().ok_or(LayoutError::Empty)?;
        let expected = first.as_ref().chars().count();
        if expected == 0 {
            return Err(LayoutError::Empty);
        }

        let mut tiles = Vec::with_capacity(expected * layout.len());
        for (row, line) in layout.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != expected {
                return Err(LayoutError::Ragged {
                    row,
                    expected,
                    found,
                });
            }
            for (column, glyph) in line.chars().enumerate() {
                let tile = Tile::from_glyph(glyph).ok_or(LayoutError::UnknownGlyph {
                    column,
                    row,
                    glyph,
                })?;
                tiles.push(tile);
            }
        }

        let columns = u32::try_from(expected).map_err(|_| LayoutError::TooLarge)?;
        let rows = u32::try_from(layout.len()).map_err(|_| LayoutError::TooLarge)?;
        let grid = Self {
            columns,
            rows,
            tiles,
        };
        grid.check_border()?;
        Ok(grid)
    }

    /// The built-in house layout.
    #[must_use]
    pub fn house() -> Self {
        Self::parse(&HOUSE_LAYOUT).expect("built-in house layout is valid")
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

    /// Tile stored at the cell, or `None` outside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Reports whether the cell is a wall. Out-of-bounds cells are walls.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.tile(cell).map_or(true, Tile::is_wall)
    }

    /// Reports whether entities may not enter the cell.
    #[must_use]
    pub fn is_blocked(&self, cell: CellCoord) -> bool {
        self.tile(cell).map_or(true, Tile::blocks_movement)
    }

    /// Iterates over the rows of the grid as tile slices.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Tile]> {
        let width = usize::try_from(self.columns).unwrap_or(usize::MAX).max(1);
        self.tiles.chunks(width)
    }

    fn check_border(&self) -> Result<(), LayoutError> {
        let last_column = self.columns as i32 - 1;
        let last_row = self.rows as i32 - 1;
        for row in 0..self.rows as i32 {
            for column in 0..self.columns as i32 {
                let on_border =
                    row == 0 || column == 0 || row == last_row || column == last_column;
                if on_border && !self.is_wall(CellCoord::new(column, row)) {
                    return Err(LayoutError::OpenBorder {
                        column: column as usize,
                        row: row as usize,
                    });
                }
            }
        }
        Ok(())
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?;
        let row = u32::try_from(cell.row()).ok()?;
        if column < self.columns && row < self.rows {
            let width = usize::try_from(self.columns).ok()?;
            Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
        } else {
            None
        }
    }
}

/// Reasons a layout table may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout has no rows or no columns.
    #[error("layout is empty")]
    Empty,
    /// A row differs in length from the first row.
    #[error("row {row} has {found} tiles, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A glyph does not name any tile.
    #[error("unknown glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// Column of the glyph.
        column: usize,
        /// Row of the glyph.
        row: usize,
        /// Offending glyph.
        glyph: char,
    },
    /// A border tile is not a wall.
    #[error("border tile at column {column}, row {row} is not a wall")]
    OpenBorder {
        /// Column of the tile.
        column: usize,
        /// Row of the tile.
        row: usize,
    },
    /// The layout exceeds the addressable grid size.
    #[error("layout dimensions exceed the supported grid size")]
    TooLarge,
    /// A spawn point lies outside the grid or on a blocking tile.
    #[error("spawn for {name} at ({column}, {row}) is blocked")]
    BlockedSpawn {
        /// Name of the entity that cannot spawn.
        name: &'static str,
        /// Column of the spawn.
        column: i32,
        /// Row of the spawn.
        row: i32,
    },
}
