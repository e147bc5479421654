use thiserror::Error;

/// Side length of one tile in canvas pixels.
pub(crate) const TILE_SIZE: i32 = 8;

const REFERENCE_LAYOUT: &str = "\
####################\n\
#..................#\n\
#..................#\n\
#..................#\n\
#..................#\n\
#..................#\n\
#..................#\n\
#..................#\n\
#..................#\n\
#..................#\n\
#..................#\n\
#..................#\n\
#..................#\n\
#..................#\n\
#..................#\n\
#..................#\n\
#..................#\n\
#..................#\n\
#..................#\n\
####################\n\
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tile {
    Floor,
    Wall,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum MapError {
    #[error("map has no tiles")]
    Empty,
    #[error("row {row} has {actual} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unknown tile character {ch:?} at row {row}, column {col}")]
    UnknownTile { ch: char, row: usize, col: usize },
}

/// Static grid of tiles, indexed `[row][col]`. Every row has the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TileMap {
    columns: usize,
    rows: Vec<Vec<Tile>>,
}

impl TileMap {
    pub(crate) fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, MapError> {
        let columns = rows.first().map(Vec::len).unwrap_or(0);
        if columns == 0 {
            return Err(MapError::Empty);
        }
        if let Some((row, tiles)) = rows
            .iter()
            .enumerate()
            .find(|(_, tiles)| tiles.len() != columns)
        {
            return Err(MapError::RaggedRow {
                row,
                expected: columns,
                actual: tiles.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    /// Parses a layout where `#` is a wall and `.` is floor, one line per row.
    /// Blank lines and surrounding whitespace are ignored.
    pub(crate) fn from_ascii(layout: &str) -> Result<Self, MapError> {
        let rows = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(row, line)| {
                line.chars()
                    .enumerate()
                    .map(|(col, ch)| match ch {
                        '#' => Ok(Tile::Wall),
                        '.' => Ok(Tile::Floor),
                        _ => Err(MapError::UnknownTile { ch, row, col }),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }

    /// The 20x20 demo room: floor ringed by a one-tile wall.
    pub(crate) fn reference() -> Result<Self, MapError> {
        Self::from_ascii(REFERENCE_LAYOUT)
    }

    pub(crate) fn columns(&self) -> usize {
        self.columns
    }

    pub(crate) fn rows(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn cell(&self, col: usize, row: usize) -> Option<Tile> {
        self.rows.get(row)?.get(col).copied()
    }

    /// Tile under the pixel (`pixel_x`, `pixel_y`).
    ///
    /// Anything outside the grid, negative coordinates included, reads as
    /// [`Tile::Wall`]: the map behaves as if ringed by an implicit wall.
    pub(crate) fn tile_at(&self, pixel_x: i32, pixel_y: i32) -> Tile {
        let col = pixel_x.div_euclid(TILE_SIZE);
        let row = pixel_y.div_euclid(TILE_SIZE);
        let (Ok(col), Ok(row)) = (usize::try_from(col), usize::try_from(row)) else {
            return Tile::Wall;
        };
        self.cell(col, row).unwrap_or(Tile::Wall)
    }
}
