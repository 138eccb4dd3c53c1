use crate::{
    engine::PlayerId,
    stage::{Stage, StageError},
};

/// Per-episode turn bookkeeping owned by the bridge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnState {
    pub active: PlayerId,
    pub stage: Stage,
    pub rolled: bool,
    pub bought_dev_card: bool,
    pub played_dev_card: bool,
    /// Full rounds completed, incremented when play returns to seat 0
    pub turns: u32,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to `next` within the current turn
    pub fn advance(&mut self, next: Stage) -> Result<(), StageError> {
        self.stage = self.stage.transition(next)?;
        Ok(())
    }

    /// End the active player's turn
    ///
    /// Clears the one-shot flags, hands control to the next seat and forces
    /// [`Stage::NotRolled`]. This is the only way the active player changes.
    ///
    /// **Returns** `true` if play wrapped around to seat 0
    pub fn pass(&mut self) -> bool {
        self.rolled = false;
        self.bought_dev_card = false;
        self.played_dev_card = false;
        self.stage = Stage::NotRolled;
        self.active = self.active.offset(1);
        let wrapped = self.active == PlayerId(0);
        if wrapped {
            self.turns += 1;
        }
        wrapped
    }
}
