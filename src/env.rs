use std::collections::BTreeMap;

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// Unlike a single-agent MDP, one call to [`Environment::step`] may resolve the turns
/// of several players before control returns to the agent.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Failure to set up a new episode
    type Error;

    /// Determine if the state is active or terminal
    fn is_active(&self) -> bool;

    /// Sample an action uniformly from the action space
    fn random_action(&mut self) -> Self::Action;

    /// Update the environment in response to an action taken by an agent
    ///
    /// **Returns** the next state, the reward and whether the episode ended
    fn step(&mut self, action: Self::Action) -> Transition<Self::State>;

    /// Reset the environment to an initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Result<Self::State, Self::Error>;
}

/// Extra information about a transition
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Info {
    /// The episode was cut off by a turn limit rather than finished
    pub truncated: bool,
}

/// Result of one [`Environment::step`]
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<S> {
    pub state: S,
    pub reward: f32,
    pub done: bool,
    pub info: Info,
}

/// Running metrics of an environment, keyed by name
///
/// Keys are fixed at construction; values accumulate until [`Report::take`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    values: BTreeMap<&'static str, f64>,
}

impl Report {
    pub fn new(keys: Vec<&'static str>) -> Self {
        Self {
            values: keys.into_iter().map(|k| (k, 0.0)).collect(),
        }
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.values.keys().copied().collect()
    }

    pub fn get(&self, key: &str) -> Option<&f64> {
        self.values.get(key)
    }

    pub fn entry(
        &mut self,
        key: &'static str,
    ) -> std::collections::btree_map::Entry<'_, &'static str, f64> {
        self.values.entry(key)
    }

    /// Add `value` to `key` if the report tracks it
    pub fn add(&mut self, key: &'static str, value: f64) {
        self.entry(key).and_modify(|x| *x += value);
    }

    /// Return the current values and zero every key
    pub fn take(&mut self) -> BTreeMap<&'static str, f64> {
        let snapshot = self.values.clone();
        self.values.values_mut().for_each(|x| *x = 0.0);
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_accumulates_and_resets() {
        let mut report = Report::new(vec!["reward", "steps"]);
        report.add("reward", 1.5);
        report.add("reward", -0.5);
        report.entry("steps").and_modify(|x| *x += 1.0);
        report.add("unknown", 3.0);

        assert_eq!(report.keys(), ["reward", "steps"]);
        let values = report.take();
        assert_eq!(values.get("reward"), Some(&1.0), "Report reward correct");
        assert_eq!(values.get("steps"), Some(&1.0), "Report steps correct");
        assert!(!values.contains_key("unknown"), "untracked keys are ignored");
        assert_eq!(report.get("reward"), Some(&0.0), "take zeroes values");
    }
}
