use engine::{Canvas, Color, InputAction, InputSnapshot, Scene};
use tracing::{debug, info};

use super::collision::TileCoord;
use super::entity::{reference_roster, Npc, Player};
use super::interaction::{role_name_at, Interaction, InteractionEvent, InteractionPhase};
use super::map::{MapError, Tile, TileMap, TILE_SIZE};
use super::proximity::find_active_npc;

const FLOOR_COLOR: Color = Color(3);
const WALL_COLOR: Color = Color(6);
const LABEL_COLOR: Color = Color(0);
const PROMPT_COLOR: Color = Color(7);
const MESSAGE_COLOR: Color = Color(10);
const LABEL_INSET: i32 = 2;
const UI_TEXT_LEFT: i32 = 5;
const PROMPT_OFFSET_FROM_BOTTOM: i32 = 15;
const MESSAGE_OFFSET_FROM_BOTTOM: i32 = 8;

/// One play session: the room, the player, the NPCs and the dialogue state.
pub(crate) struct GameSession {
    map: TileMap,
    player: Player,
    npcs: Vec<Npc>,
    occupied: Vec<TileCoord>,
    interaction: Interaction,
    tick: u64,
}

impl GameSession {
    pub(crate) fn new() -> Result<Self, MapError> {
        Ok(Self::with_world(
            TileMap::reference()?,
            Player::default(),
            reference_roster(),
        ))
    }

    pub(crate) fn with_world(map: TileMap, player: Player, npcs: Vec<Npc>) -> Self {
        // NPCs never move, so their blocking tiles are fixed for the session.
        let occupied = npcs.iter().map(Npc::tile_coord).collect();
        Self {
            map,
            player,
            npcs,
            occupied,
            interaction: Interaction::default(),
            tick: 0,
        }
    }

    pub(crate) fn player(&self) -> &Player {
        &self.player
    }

    pub(crate) fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    #[cfg(test)]
    pub(crate) fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    #[cfg(test)]
    pub(crate) fn tick(&self) -> u64 {
        self.tick
    }

    fn draw_map(&self, canvas: &mut Canvas<'_>) {
        for row in 0..self.map.rows() {
            for col in 0..self.map.columns() {
                let color = match self.map.cell(col, row) {
                    Some(Tile::Wall) => WALL_COLOR,
                    Some(Tile::Floor) | None => FLOOR_COLOR,
                };
                canvas.rect(
                    col as i32 * TILE_SIZE,
                    row as i32 * TILE_SIZE,
                    TILE_SIZE,
                    TILE_SIZE,
                    color,
                );
            }
        }
    }

    fn draw_ui(&self, canvas: &mut Canvas<'_>) {
        let bottom = canvas.height() as i32;
        if let Some(prompt) = self.interaction.prompt(&self.npcs) {
            canvas.text(
                UI_TEXT_LEFT,
                bottom - PROMPT_OFFSET_FROM_BOTTOM,
                &prompt,
                PROMPT_COLOR,
            );
        }
        if let Some(message) = self.interaction.message() {
            canvas.text(
                UI_TEXT_LEFT,
                bottom - MESSAGE_OFFSET_FROM_BOTTOM,
                message,
                MESSAGE_COLOR,
            );
        }
    }
}

/// Axis deltas for this tick. Right wins over left and down wins over up
/// when both keys of a pair are held.
fn movement_delta(input: &InputSnapshot) -> (i32, i32) {
    let mut dx = 0;
    let mut dy = 0;
    if input.is_down(InputAction::MoveLeft) {
        dx = -1;
    }
    if input.is_down(InputAction::MoveRight) {
        dx = 1;
    }
    if input.is_down(InputAction::MoveUp) {
        dy = -1;
    }
    if input.is_down(InputAction::MoveDown) {
        dy = 1;
    }
    (dx, dy)
}

fn draw_box(canvas: &mut Canvas<'_>, x: i32, y: i32, color: Color, label: &str) {
    canvas.rect(x, y, TILE_SIZE, TILE_SIZE, color);
    canvas.text(x + LABEL_INSET, y + LABEL_INSET, label, LABEL_COLOR);
}

impl Scene for GameSession {
    fn update(&mut self, input: &InputSnapshot) {
        self.tick = self.tick.wrapping_add(1);

        let (dx, dy) = movement_delta(input);
        let outcome = self.player.step(dx, dy, &self.map, &self.occupied);
        if (dx != 0 && !outcome.moved_x) || (dy != 0 && !outcome.moved_y) {
            debug!(
                tick = self.tick,
                x = self.player.position.x,
                y = self.player.position.y,
                dx,
                dy,
                "player_blocked"
            );
        }

        let previous_phase = self.interaction.phase();
        let previous_active = self.interaction.active_npc();
        let active_npc = find_active_npc(self.player.position, &self.npcs);
        let event = self.interaction.step(active_npc, &self.npcs, input);

        if active_npc != previous_active {
            debug!(
                tick = self.tick,
                npc = ?active_npc.map(|index| role_name_at(&self.npcs, index)),
                "active_npc_changed"
            );
        }
        match event {
            InteractionEvent::Talked { npc_index } => {
                info!(
                    tick = self.tick,
                    npc_index,
                    role = role_name_at(&self.npcs, npc_index),
                    "npc_interaction"
                );
            }
            InteractionEvent::Cleared => debug!(tick = self.tick, "message_cleared"),
            InteractionEvent::None => {}
        }

        let phase = self.interaction.phase();
        if phase != previous_phase {
            debug!(from = ?previous_phase, to = ?phase, "interaction_phase_changed");
        }
    }

    fn draw(&self, canvas: &mut Canvas<'_>) {
        self.draw_map(canvas);

        for npc in &self.npcs {
            draw_box(
                canvas,
                npc.position.x,
                npc.position.y,
                npc.color(),
                npc.label,
            );
        }

        draw_box(
            canvas,
            self.player.position.x,
            self.player.position.y,
            self.player.color,
            self.player.glyph,
        );

        self.draw_ui(canvas);
    }

    fn unload(&mut self) {
        info!(
            ticks = self.tick,
            phase = ?self.interaction.phase(),
            "session_ended"
        );
    }
}
