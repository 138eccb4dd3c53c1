use strum::{Display, EnumCount, EnumIter, FromRepr, VariantArray};
use thiserror::Error;

/// The sub-phase of the active player's turn
///
/// The placing stages are reserved: the bridge never enters them, but they keep their
/// slot in the encoded stage index so observations stay compatible with other encoders.
#[derive(
    EnumIter,
    EnumCount,
    FromRepr,
    VariantArray,
    Display,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
)]
pub enum Stage {
    #[default]
    NotRolled = 0,
    Rolled = 1,
    PlacingRoad = 2,
    PlacingSettlement = 3,
    PlacingCity = 4,
    MovingRobber = 5,
    Stealing = 6,
    Trading = 7,
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum StageError {
    #[error("Illegal stage transition from {from} to {to}")]
    IllegalTransition { from: Stage, to: Stage },
}

impl Stage {
    /// Position of this stage in the encoded stage index
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stages reachable from this one without passing the turn
    ///
    /// `Rolled` may stay in `Rolled` after a build or card play. Returning to
    /// `NotRolled` is only possible from `Stealing` (robber played before rolling)
    /// or through a pass-turn, which the turn scheduler applies directly.
    pub fn successors(self) -> &'static [Stage] {
        match self {
            Stage::NotRolled => &[Stage::Rolled, Stage::MovingRobber],
            Stage::Rolled => &[Stage::Rolled, Stage::MovingRobber, Stage::Trading],
            Stage::MovingRobber => &[Stage::Stealing],
            Stage::Stealing => &[Stage::Rolled, Stage::NotRolled],
            Stage::Trading => &[Stage::Rolled],
            Stage::PlacingRoad | Stage::PlacingSettlement | Stage::PlacingCity => &[],
        }
    }

    pub fn can_transition(self, to: Stage) -> bool {
        self.successors().contains(&to)
    }

    /// Validate a non-pass transition out of this stage
    pub fn transition(self, to: Stage) -> Result<Stage, StageError> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(StageError::IllegalTransition { from: self, to })
        }
    }

    /// The stage to resume after a robber interrupt
    pub fn after_robbery(rolled: bool) -> Stage {
        if rolled {
            Stage::Rolled
        } else {
            Stage::NotRolled
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn stage_indices_are_stable() {
        assert_eq!(Stage::NotRolled.index(), 0);
        assert_eq!(Stage::MovingRobber.index(), 5);
        assert_eq!(Stage::Trading.index(), 7);
        assert_eq!(Stage::COUNT, 8, "eight stages are encoded");
        for stage in Stage::iter() {
            assert_eq!(Stage::from_repr(stage.index()), Some(stage), "index round trips");
        }
    }

    #[test]
    fn legal_transitions() {
        assert!(Stage::NotRolled.can_transition(Stage::Rolled));
        assert!(Stage::NotRolled.can_transition(Stage::MovingRobber));
        assert!(Stage::Rolled.can_transition(Stage::Trading));
        assert!(Stage::MovingRobber.can_transition(Stage::Stealing));
        assert!(Stage::Stealing.can_transition(Stage::NotRolled));
        assert!(Stage::Trading.can_transition(Stage::Rolled));
    }

    #[test]
    fn illegal_transitions() {
        assert_eq!(
            Stage::MovingRobber.transition(Stage::Rolled),
            Err(StageError::IllegalTransition {
                from: Stage::MovingRobber,
                to: Stage::Rolled
            }),
            "robber must be followed by a steal"
        );
        assert!(!Stage::NotRolled.can_transition(Stage::Trading));
        assert!(!Stage::Trading.can_transition(Stage::MovingRobber));
        for stage in Stage::iter() {
            assert!(
                !stage.can_transition(Stage::PlacingSettlement),
                "placing stages are never entered"
            );
        }
    }

    #[test]
    fn robbery_resumes_by_roll_flag() {
        assert_eq!(Stage::after_robbery(true), Stage::Rolled);
        assert_eq!(Stage::after_robbery(false), Stage::NotRolled);
    }
}
