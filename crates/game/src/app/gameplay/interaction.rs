use engine::{InputAction, InputSnapshot};

use super::entity::Npc;

/// Role name used when the active NPC cannot be resolved from the roster.
const FALLBACK_ROLE_NAME: &str = "NPC";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InteractionPhase {
    Idle,
    InRange,
    Conversing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InteractionEvent {
    None,
    Talked { npc_index: usize },
    Cleared,
}

/// Per-session dialogue state: which NPC is in reach this tick and the line
/// currently on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Interaction {
    active_npc: Option<usize>,
    message: Option<String>,
}

impl Interaction {
    pub(crate) fn active_npc(&self) -> Option<usize> {
        self.active_npc
    }

    pub(crate) fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub(crate) fn phase(&self) -> InteractionPhase {
        match (self.active_npc, &self.message) {
            (_, Some(_)) => InteractionPhase::Conversing,
            (Some(_), None) => InteractionPhase::InRange,
            (None, None) => InteractionPhase::Idle,
        }
    }

    /// Advances one tick.
    ///
    /// The active NPC is replaced unconditionally. Interact with an NPC in
    /// reach sets the message; otherwise Cancel clears it, whether or not an
    /// NPC is in reach. The message is never cleared just by walking away.
    pub(crate) fn step(
        &mut self,
        active_npc: Option<usize>,
        npcs: &[Npc],
        input: &InputSnapshot,
    ) -> InteractionEvent {
        self.active_npc = active_npc;

        if let Some(npc_index) = self.active_npc {
            if input.was_pressed(InputAction::Interact) {
                let role = role_name_at(npcs, npc_index);
                self.message = Some(talk_message(role));
                return InteractionEvent::Talked { npc_index };
            }
        }

        if input.was_pressed(InputAction::Cancel) {
            self.message = None;
            return InteractionEvent::Cleared;
        }

        InteractionEvent::None
    }

    /// Prompt shown while an NPC is in reach.
    pub(crate) fn prompt(&self, npcs: &[Npc]) -> Option<String> {
        self.active_npc
            .map(|index| prompt_text(role_name_at(npcs, index)))
    }
}

pub(crate) fn role_name_at(npcs: &[Npc], index: usize) -> &'static str {
    npcs.get(index)
        .map(|npc| npc.kind.role_name())
        .unwrap_or(FALLBACK_ROLE_NAME)
}

pub(crate) fn talk_message(role: &str) -> String {
    format!("Você falou com o {role}!")
}

pub(crate) fn prompt_text(role: &str) -> String {
    format!("[E] Interagir com {role}")
}
