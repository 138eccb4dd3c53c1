//! Policy collaborators that choose actions for seats the caller does not control.

mod exploration;
mod network;

pub use exploration::{Choice, Constant, Decay, DecayError, EpsilonGreedy, Exponential};
pub use network::{ActionLogits, NetworkPolicy, PolicyModel};

use rand::{rngs::StdRng, SeedableRng};

use crate::{action::ActionVector, observation::Observation};

/// Chooses an action from an observation rotated to the acting seat
///
/// Policies are queried synchronously and are expected to answer promptly. Flat-index
/// policies can convert with [`ActionVector::from_flat`].
pub trait Policy {
    fn act(&mut self, observation: &Observation) -> ActionVector;
}

impl<F: FnMut(&Observation) -> ActionVector> Policy for F {
    fn act(&mut self, observation: &Observation) -> ActionVector {
        self(observation)
    }
}

/// Uniformly random actions over the full vector space
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: &Observation) -> ActionVector {
        ActionVector::sample(&mut self.rng)
    }
}

/// Replays a fixed sequence of actions, starting over when it runs out
///
/// An empty script always passes.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPolicy {
    script: Vec<ActionVector>,
    cursor: usize,
}

impl ScriptedPolicy {
    pub fn new(script: impl IntoIterator<Item = ActionVector>) -> Self {
        Self {
            script: script.into_iter().collect(),
            cursor: 0,
        }
    }
}

impl Policy for ScriptedPolicy {
    fn act(&mut self, _observation: &Observation) -> ActionVector {
        let Some(action) = self.script.get(self.cursor).copied() else {
            return ActionVector::PASS;
        };
        self.cursor = (self.cursor + 1) % self.script.len();
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{mock::MockEngine, GameEngine, PlayerId},
        observation::{ObservationEncoder, ObservationKind},
        stage::Stage,
    };

    fn observation() -> Observation {
        let engine = MockEngine::standard();
        ObservationEncoder::new(&engine, PlayerId(1), Stage::NotRolled)
            .encode(ObservationKind::Structured)
    }

    #[test]
    fn scripted_policy_cycles() {
        let obs = observation();
        let mut policy = ScriptedPolicy::new([ActionVector::new(0, 0, 0), ActionVector::new(6, 2, 0)]);
        let actions = (0..5).map(|_| policy.act(&obs)).collect::<Vec<_>>();
        assert_eq!(
            actions.iter().map(|a| a.primary).collect::<Vec<_>>(),
            [0, 6, 0, 6, 0],
            "script repeats from the start"
        );
        assert_eq!(ScriptedPolicy::default().act(&obs), ActionVector::PASS);
    }

    #[test]
    fn seeded_random_policy_repeats() {
        let obs = observation();
        let mut a = RandomPolicy::seeded(11);
        let mut b = RandomPolicy::seeded(11);
        for _ in 0..10 {
            let action = a.act(&obs);
            assert!(action.in_range());
            assert_eq!(action, b.act(&obs), "same seed, same actions");
        }
    }

    #[test]
    fn closures_are_policies() {
        let obs = observation();
        let mut policy = |_: &Observation| ActionVector::new(9, 0, 0);
        assert_eq!(policy.act(&obs).primary, 9);
    }
}
