use super::map::{Tile, TileMap, TILE_SIZE};

/// Grid cell address, `col` across and `row` down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TileCoord {
    pub(crate) col: i32,
    pub(crate) row: i32,
}

/// Axis-aligned box in canvas pixels, half-open on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Aabb {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) w: i32,
    pub(crate) h: i32,
}

impl Aabb {
    pub(crate) const fn tile_sized_at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            w: TILE_SIZE,
            h: TILE_SIZE,
        }
    }

    pub(crate) const fn of_tile(coord: TileCoord) -> Self {
        Self::tile_sized_at(coord.col * TILE_SIZE, coord.row * TILE_SIZE)
    }

    /// Strict overlap: boxes that only share an edge do not overlap.
    pub(crate) fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Whether a tile-sized body with its top-left corner at (`x`, `y`) may stand
/// there.
///
/// Terrain is checked first against the tile under the top-left pixel; a wall
/// or an out-of-bounds position blocks without looking at `occupied`. Otherwise
/// the body is blocked if its box overlaps any occupied tile.
pub(crate) fn is_blocked(map: &TileMap, x: i32, y: i32, occupied: &[TileCoord]) -> bool {
    if map.tile_at(x, y) == Tile::Wall {
        return true;
    }

    let body = Aabb::tile_sized_at(x, y);
    occupied
        .iter()
        .any(|coord| body.overlaps(&Aabb::of_tile(*coord)))
}
