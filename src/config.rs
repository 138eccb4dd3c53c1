use crate::{
    action::ActionSpace,
    observation::ObservationKind,
    reward::{RewardTable, TerminalBonus},
};

/// Who acts for seats 1 to 3
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OpponentMode {
    /// The caller acts for every seat in turn
    #[default]
    SelfPlay,
    /// Seats 1 to 3 are played by fixed [`Policy`](crate::policy::Policy) collaborators
    Policies,
}

/// What happens after an invalid action
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InvalidActionPolicy {
    /// The same player acts again from the same stage
    #[default]
    Retry,
    /// The acting player's turn is passed
    ForcePass,
}

/// Configuration for a [`CatanEnv`](crate::catan::CatanEnv)
#[derive(Clone, Debug, PartialEq)]
pub struct EnvConfig {
    /// Shape of the actions accepted by `step`
    pub action_space: ActionSpace,
    /// Layout of the observations returned to the caller
    pub observation: ObservationKind,
    /// Layout of the observations given to opponent and driver policies
    pub opponent_observation: ObservationKind,
    pub opponents: OpponentMode,
    pub invalid_action: InvalidActionPolicy,
    pub terminal_bonus: TerminalBonus,
    pub rewards: RewardTable,
    /// Victory points that end the episode
    pub victory_points: u32,
    /// Truncate the episode after this many full rounds
    pub max_turns: Option<u32>,
    /// Seed for dice, steals and built-in random policies; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::cooperative()
    }
}

impl EnvConfig {
    /// The caller plays every seat and may retry after an invalid action
    pub fn cooperative() -> Self {
        Self {
            action_space: ActionSpace::MultiDiscrete,
            observation: ObservationKind::Structured,
            opponent_observation: ObservationKind::Structured,
            opponents: OpponentMode::SelfPlay,
            invalid_action: InvalidActionPolicy::Retry,
            terminal_bonus: TerminalBonus::InverseTurns { numerator: 10_000.0 },
            rewards: RewardTable::default(),
            victory_points: 10,
            max_turns: None,
            seed: None,
        }
    }

    /// The caller plays seat 0 against three opponent policies
    pub fn competitive() -> Self {
        Self {
            opponents: OpponentMode::Policies,
            invalid_action: InvalidActionPolicy::ForcePass,
            terminal_bonus: TerminalBonus::Placement {
                per_place: 1000.0,
                winner_numerator: 100_000.0,
            },
            ..Self::cooperative()
        }
    }

    /// [`competitive`](Self::competitive) with a flat scalar action and flat observations
    pub fn discrete() -> Self {
        Self {
            action_space: ActionSpace::Discrete,
            observation: ObservationKind::Flat,
            ..Self::competitive()
        }
    }

    /// [`discrete`](Self::discrete) where the caller only picks settlement locations
    pub fn settlements() -> Self {
        Self {
            action_space: ActionSpace::SettlementOnly,
            ..Self::discrete()
        }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    pub fn with_max_turns(self, max_turns: u32) -> Self {
        Self {
            max_turns: Some(max_turns),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        let coop = EnvConfig::cooperative();
        assert_eq!(coop, EnvConfig::default());
        assert_eq!(coop.opponents, OpponentMode::SelfPlay);
        assert_eq!(coop.invalid_action, InvalidActionPolicy::Retry);
        assert_eq!(coop.victory_points, 10);

        let comp = EnvConfig::competitive();
        assert_eq!(comp.opponents, OpponentMode::Policies);
        assert_eq!(comp.invalid_action, InvalidActionPolicy::ForcePass);
        assert!(matches!(comp.terminal_bonus, TerminalBonus::Placement { .. }));

        let discrete = EnvConfig::discrete();
        assert_eq!(discrete.action_space, ActionSpace::Discrete);
        assert_eq!(discrete.observation, ObservationKind::Flat);
        assert_eq!(
            discrete.opponent_observation,
            ObservationKind::Structured,
            "opponents keep the structured layout"
        );

        let settlements = EnvConfig::settlements();
        assert_eq!(settlements.action_space, ActionSpace::SettlementOnly);
        assert_eq!(settlements.observation, ObservationKind::Flat);
    }

    #[test]
    fn builders() {
        let config = EnvConfig::competitive().with_seed(4).with_max_turns(200);
        assert_eq!(config.seed, Some(4));
        assert_eq!(config.max_turns, Some(200));
    }
}
