use super::input::InputSnapshot;
use super::rendering::Canvas;

/// Game-side half of the frame loop.
///
/// `update` runs once per fixed simulation tick with that tick's input
/// snapshot. `draw` runs once per presented frame on a freshly cleared
/// canvas and must not mutate game state.
pub trait Scene {
    fn update(&mut self, input: &InputSnapshot);
    fn draw(&self, canvas: &mut Canvas<'_>);
    fn unload(&mut self) {}
}
