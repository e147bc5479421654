use engine::Color;

use super::collision::{is_blocked, TileCoord};
use super::map::{TileMap, TILE_SIZE};

pub(crate) const PLAYER_SPAWN: Position = Position { x: 40, y: 40 };
const PLAYER_COLOR: Color = Color(12);
const PLAYER_GLYPH: &str = "P";

/// Top-left corner of an entity in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Position {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Position {
    pub(crate) const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub(crate) fn tile_coord(self) -> TileCoord {
        TileCoord {
            col: self.x.div_euclid(TILE_SIZE),
            row: self.y.div_euclid(TILE_SIZE),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct StepOutcome {
    pub(crate) moved_x: bool,
    pub(crate) moved_y: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Player {
    pub(crate) position: Position,
    pub(crate) color: Color,
    pub(crate) glyph: &'static str,
}

impl Player {
    pub(crate) fn spawn_at(position: Position) -> Self {
        Self {
            position,
            color: PLAYER_COLOR,
            glyph: PLAYER_GLYPH,
        }
    }

    /// Moves by (`dx`, `dy`), resolving each axis on its own.
    ///
    /// The horizontal move is tested against the current y and applied first;
    /// the vertical move is then tested against the already-updated x. A
    /// blocked axis leaves that coordinate unchanged, which lets the player
    /// slide along walls.
    pub(crate) fn step(
        &mut self,
        dx: i32,
        dy: i32,
        map: &TileMap,
        occupied: &[TileCoord],
    ) -> StepOutcome {
        let mut outcome = StepOutcome::default();

        if dx != 0 {
            let new_x = self.position.x + dx;
            if !is_blocked(map, new_x, self.position.y, occupied) {
                self.position.x = new_x;
                outcome.moved_x = true;
            }
        }

        if dy != 0 {
            let new_y = self.position.y + dy;
            if !is_blocked(map, self.position.x, new_y, occupied) {
                self.position.y = new_y;
                outcome.moved_y = true;
            }
        }

        outcome
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::spawn_at(PLAYER_SPAWN)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum NpcKind {
    Shop,
    Forge,
    Info,
}

impl NpcKind {
    pub(crate) const fn color(self) -> Color {
        match self {
            NpcKind::Shop => Color(8),
            NpcKind::Forge => Color(10),
            NpcKind::Info => Color(7),
        }
    }

    /// Name shown to the player in prompts and dialogue.
    pub(crate) const fn role_name(self) -> &'static str {
        match self {
            NpcKind::Shop => "vendedor",
            NpcKind::Forge => "ferreiro",
            NpcKind::Info => "informante",
        }
    }
}

/// A stationary character. Its tile blocks movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Npc {
    pub(crate) position: Position,
    pub(crate) kind: NpcKind,
    pub(crate) label: &'static str,
}

impl Npc {
    pub(crate) const fn new(x: i32, y: i32, kind: NpcKind, label: &'static str) -> Self {
        Self {
            position: Position::new(x, y),
            kind,
            label,
        }
    }

    pub(crate) fn color(&self) -> Color {
        self.kind.color()
    }

    pub(crate) fn tile_coord(&self) -> TileCoord {
        self.position.tile_coord()
    }
}

/// The three townsfolk, in the order proximity checks visit them.
pub(crate) fn reference_roster() -> Vec<Npc> {
    vec![
        Npc::new(16, 16, NpcKind::Shop, "L"),
        Npc::new(136, 16, NpcKind::Info, "I"),
        Npc::new(16, 136, NpcKind::Forge, "F"),
    ]
}
