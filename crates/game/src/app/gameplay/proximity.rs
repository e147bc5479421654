use super::entity::{Npc, Position};

/// Largest per-axis pixel gap at which the player can talk to an NPC.
pub(crate) const INTERACTION_DISTANCE: u32 = 8;

/// True when both the x gap and the y gap are at most `threshold`.
/// The reachable region is a square, not a circle.
pub(crate) fn is_near(a: Position, b: Position, threshold: u32) -> bool {
    a.x.abs_diff(b.x) <= threshold && a.y.abs_diff(b.y) <= threshold
}

/// Index of the first NPC, in list order, within interaction distance of
/// `player`. Ties go to list order, not to the closest NPC.
pub(crate) fn find_active_npc(player: Position, npcs: &[Npc]) -> Option<usize> {
    npcs.iter()
        .position(|npc| is_near(player, npc.position, INTERACTION_DISTANCE))
}

#[cfg(test)]
mod tests {
    use super::super::entity::NpcKind;
    use super::*;

    #[test]
    fn near_uses_inclusive_per_axis_threshold() {
        let origin = Position::new(40, 40);
        assert!(is_near(origin, Position::new(44, 44), 8));
        assert!(is_near(origin, Position::new(48, 48), 8));
        assert!(is_near(origin, Position::new(32, 48), 8));
        assert!(!is_near(origin, Position::new(49, 40), 8));
        assert!(!is_near(origin, Position::new(40, 31), 8));
    }

    #[test]
    fn near_is_square_not_circular() {
        // Euclidean distance is ~11.3 here, still near.
        assert!(is_near(Position::new(0, 0), Position::new(8, 8), 8));
    }

    #[test]
    fn near_is_symmetric() {
        let points = [
            Position::new(40, 40),
            Position::new(44, 44),
            Position::new(49, 40),
            Position::new(16, 16),
            Position::new(24, 8),
        ];
        for a in points {
            for b in points {
                assert_eq!(is_near(a, b, 8), is_near(b, a, 8));
            }
        }
    }

    #[test]
    fn near_handles_extreme_coordinates() {
        assert!(!is_near(
            Position::new(i32::MIN, 0),
            Position::new(i32::MAX, 0),
            8
        ));
    }

    #[test]
    fn no_active_npc_when_everyone_is_far() {
        let npcs = [Npc::new(16, 16, NpcKind::Shop, "L")];
        assert_eq!(find_active_npc(Position::new(40, 40), &npcs), None);
        assert_eq!(find_active_npc(Position::new(40, 40), &[]), None);
    }

    #[test]
    fn first_npc_in_list_order_wins_ties() {
        let npcs = [
            Npc::new(16, 16, NpcKind::Forge, "F"),
            Npc::new(24, 16, NpcKind::Shop, "L"),
        ];
        // Closer to the second NPC, but both are in range.
        assert_eq!(find_active_npc(Position::new(23, 20), &npcs), Some(0));

        let reversed = [npcs[1].clone(), npcs[0].clone()];
        assert_eq!(find_active_npc(Position::new(23, 20), &reversed), Some(0));
        assert_eq!(reversed[0].kind, NpcKind::Shop);
    }

    #[test]
    fn later_npc_found_when_earlier_ones_are_far() {
        let npcs = [
            Npc::new(16, 16, NpcKind::Shop, "L"),
            Npc::new(136, 16, NpcKind::Info, "I"),
        ];
        assert_eq!(find_active_npc(Position::new(128, 20), &npcs), Some(1));
    }
}
