#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Interact,
    Cancel,
    Quit,
}

const ACTION_COUNT: usize = 7;

/// Held state plus "pressed since the last tick" edges, one slot per action.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
    pressed: [bool; ACTION_COUNT],
}

impl ActionStates {
    /// Records a key transition. A press only raises the edge when the action
    /// was previously released, so OS key repeat never re-fires it.
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        let index = action.index();
        if is_down && !self.down[index] {
            self.pressed[index] = true;
        }
        self.down[index] = is_down;
    }

    pub(crate) fn set_pressed(&mut self, action: InputAction, pressed: bool) {
        self.pressed[action.index()] = pressed;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    pub(crate) fn was_pressed(&self, action: InputAction) -> bool {
        self.pressed[action.index()]
    }

    pub(crate) fn clear_pressed(&mut self) {
        self.pressed = [false; ACTION_COUNT];
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Interact => 4,
            InputAction::Cancel => 5,
            InputAction::Quit => 6,
        }
    }
}

/// Immutable view of the keyboard for a single simulation tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(actions: ActionStates) -> Self {
        Self { actions }
    }

    /// True while the key bound to `action` is held.
    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    /// True only on the tick the key bound to `action` went from released to held.
    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.actions.was_pressed(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self.actions.set_pressed(action, false);
        self
    }

    pub fn with_action_pressed(mut self, action: InputAction, pressed: bool) -> Self {
        self.actions.set_pressed(action, pressed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_raises_edge_only_from_released() {
        let mut states = ActionStates::default();
        states.set(InputAction::Interact, true);
        assert!(states.was_pressed(InputAction::Interact));

        states.clear_pressed();
        states.set(InputAction::Interact, true);
        assert!(!states.was_pressed(InputAction::Interact));
        assert!(states.is_down(InputAction::Interact));
    }

    #[test]
    fn release_keeps_pending_edge_until_cleared() {
        let mut states = ActionStates::default();
        states.set(InputAction::Cancel, true);
        states.set(InputAction::Cancel, false);

        assert!(!states.is_down(InputAction::Cancel));
        assert!(states.was_pressed(InputAction::Cancel));
    }

    #[test]
    fn snapshot_builders_separate_held_from_pressed() {
        let held = InputSnapshot::empty().with_action_down(InputAction::MoveLeft, true);
        assert!(held.is_down(InputAction::MoveLeft));
        assert!(!held.was_pressed(InputAction::MoveLeft));

        let tapped = InputSnapshot::empty().with_action_pressed(InputAction::Interact, true);
        assert!(tapped.was_pressed(InputAction::Interact));
        assert!(!tapped.is_down(InputAction::Interact));
    }
}
