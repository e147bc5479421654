use engine::{Canvas, Color, InputAction, InputSnapshot, Scene};

use super::entity::{reference_roster, Npc, NpcKind, Player, Position};
use super::interaction::InteractionPhase;
use super::map::TileMap;
use super::GameSession;

const CANVAS_SIZE: u32 = 160;

fn snapshot_from_actions(actions: &[InputAction]) -> InputSnapshot {
    let mut snapshot = InputSnapshot::empty();
    for action in actions {
        snapshot = snapshot.with_action_down(*action, true);
    }
    snapshot
}

fn pressed(action: InputAction) -> InputSnapshot {
    InputSnapshot::empty().with_action_pressed(action, true)
}

fn session_with_player_at(x: i32, y: i32) -> GameSession {
    GameSession::with_world(
        TileMap::reference().expect("reference map"),
        Player::spawn_at(Position::new(x, y)),
        reference_roster(),
    )
}

fn run_ticks(session: &mut GameSession, input: &InputSnapshot, ticks: usize) {
    for _ in 0..ticks {
        session.update(input);
    }
}

fn render(session: &GameSession) -> Vec<u8> {
    let mut frame = vec![0u8; (CANVAS_SIZE * CANVAS_SIZE * 4) as usize];
    let mut canvas = Canvas::new(&mut frame, CANVAS_SIZE, CANVAS_SIZE);
    canvas.cls(Color(0));
    session.draw(&mut canvas);
    frame
}

fn pixel(frame: &[u8], x: u32, y: u32) -> [u8; 4] {
    let offset = ((y * CANVAS_SIZE + x) * 4) as usize;
    let mut rgba = [0u8; 4];
    rgba.copy_from_slice(&frame[offset..offset + 4]);
    rgba
}

fn row_has_color(frame: &[u8], y: u32, mut x_range: std::ops::Range<u32>, color: Color) -> bool {
    x_range.any(|x| pixel(frame, x, y) == color.rgba())
}

#[test]
fn new_session_starts_idle_at_spawn() {
    let session = GameSession::new().expect("session");

    assert_eq!(session.player().position, Position::new(40, 40));
    assert_eq!(session.npcs().len(), 3);
    assert_eq!(session.interaction().phase(), InteractionPhase::Idle);
    assert_eq!(session.tick(), 0);
}

#[test]
fn held_direction_moves_one_pixel_per_tick() {
    let mut session = GameSession::new().expect("session");
    let input = snapshot_from_actions(&[InputAction::MoveRight, InputAction::MoveDown]);

    run_ticks(&mut session, &input, 5);

    assert_eq!(session.player().position, Position::new(45, 45));
    assert_eq!(session.tick(), 5);
}

#[test]
fn walls_stop_the_player_at_the_border() {
    let mut session = GameSession::new().expect("session");

    run_ticks(&mut session, &snapshot_from_actions(&[InputAction::MoveLeft]), 100);
    assert_eq!(session.player().position.x, 8);

    run_ticks(&mut session, &snapshot_from_actions(&[InputAction::MoveUp]), 100);
    assert_eq!(session.player().position, Position::new(8, 8));
}

#[test]
fn player_slides_along_wall_when_moving_diagonally() {
    let mut session = session_with_player_at(8, 80);
    let input = snapshot_from_actions(&[InputAction::MoveLeft, InputAction::MoveDown]);

    run_ticks(&mut session, &input, 3);

    assert_eq!(session.player().position, Position::new(8, 83));
}

#[test]
fn npc_blocks_player_and_becomes_active() {
    let mut session = session_with_player_at(40, 16);

    run_ticks(&mut session, &snapshot_from_actions(&[InputAction::MoveLeft]), 30);

    // The shop NPC stands on x 16..24; the player stops edge to edge with it.
    assert_eq!(session.player().position, Position::new(24, 16));
    assert_eq!(session.interaction().active_npc(), Some(0));
    assert_eq!(session.interaction().phase(), InteractionPhase::InRange);
}

#[test]
fn interact_then_cancel_round_trip() {
    let mut session = session_with_player_at(24, 16);

    session.update(&pressed(InputAction::Interact));
    assert_eq!(
        session.interaction().message(),
        Some("Você falou com o vendedor!")
    );
    assert_eq!(session.interaction().phase(), InteractionPhase::Conversing);

    session.update(&pressed(InputAction::Cancel));
    assert_eq!(session.interaction().message(), None);
    assert_eq!(session.interaction().phase(), InteractionPhase::InRange);
}

#[test]
fn interact_out_of_range_is_ignored() {
    let mut session = GameSession::new().expect("session");

    session.update(&pressed(InputAction::Interact));

    assert_eq!(session.interaction().active_npc(), None);
    assert_eq!(session.interaction().message(), None);
}

#[test]
fn message_persists_after_walking_away_until_cancelled() {
    let mut session = session_with_player_at(24, 16);
    session.update(&pressed(InputAction::Interact));

    run_ticks(&mut session, &snapshot_from_actions(&[InputAction::MoveRight]), 40);
    assert_eq!(session.interaction().active_npc(), None);
    assert_eq!(
        session.interaction().message(),
        Some("Você falou com o vendedor!")
    );

    session.update(&pressed(InputAction::Cancel));
    assert_eq!(session.interaction().message(), None);
    assert_eq!(session.interaction().phase(), InteractionPhase::Idle);
}

#[test]
fn each_npc_answers_with_its_role() {
    let cases = [
        ((24, 16), "Você falou com o vendedor!"),
        ((128, 16), "Você falou com o informante!"),
        ((24, 136), "Você falou com o ferreiro!"),
    ];
    for ((x, y), expected) in cases {
        let mut session = session_with_player_at(x, y);
        session.update(&pressed(InputAction::Interact));
        assert_eq!(session.interaction().message(), Some(expected), "at ({x}, {y})");
    }
}

#[test]
fn first_npc_in_roster_wins_when_two_are_in_range() {
    let npcs = vec![
        Npc::new(40, 16, NpcKind::Forge, "F"),
        Npc::new(56, 16, NpcKind::Shop, "L"),
    ];
    let mut session = GameSession::with_world(
        TileMap::reference().expect("reference map"),
        Player::spawn_at(Position::new(48, 24)),
        npcs,
    );

    session.update(&pressed(InputAction::Interact));

    assert_eq!(session.interaction().active_npc(), Some(0));
    assert_eq!(
        session.interaction().message(),
        Some("Você falou com o ferreiro!")
    );
}

#[test]
fn draw_paints_map_entities_and_labels() {
    let session = GameSession::new().expect("session");
    let frame = render(&session);

    assert_eq!(pixel(&frame, 0, 0), Color(6).rgba());
    assert_eq!(pixel(&frame, 80, 80), Color(3).rgba());
    // Shop box, with the top-left pixel of its "L" label inset by two.
    assert_eq!(pixel(&frame, 16, 16), Color(8).rgba());
    assert_eq!(pixel(&frame, 18, 18), Color(0).rgba());
    assert_eq!(pixel(&frame, 136, 16), Color(7).rgba());
    assert_eq!(pixel(&frame, 16, 136), Color(10).rgba());
    // Player box and its "P" glyph.
    assert_eq!(pixel(&frame, 40, 40), Color(12).rgba());
    assert_eq!(pixel(&frame, 42, 42), Color(0).rgba());
}

#[test]
fn draw_shows_prompt_only_in_range() {
    let mut session = GameSession::new().expect("session");
    session.update(&InputSnapshot::empty());
    let idle_frame = render(&session);
    let prompt_rows = 145..150;
    assert!(!prompt_rows
        .clone()
        .any(|y| row_has_color(&idle_frame, y, 5..120, Color(7))));

    let mut session = session_with_player_at(24, 16);
    session.update(&InputSnapshot::empty());
    let prompt_frame = render(&session);
    assert!(prompt_rows
        .clone()
        .any(|y| row_has_color(&prompt_frame, y, 5..120, Color(7))));
}

#[test]
fn draw_shows_message_line_while_conversing() {
    let mut session = session_with_player_at(24, 16);
    session.update(&pressed(InputAction::Interact));
    let frame = render(&session);
    assert!((152..157).any(|y| row_has_color(&frame, y, 5..120, Color(10))));

    session.update(&pressed(InputAction::Cancel));
    let frame = render(&session);
    assert!(!(152..157).any(|y| row_has_color(&frame, y, 5..120, Color(10))));
}
