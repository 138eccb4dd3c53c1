use rand::Rng;
use thiserror::Error;

/// An exploration probability that changes with the number of actions taken
pub trait Decay {
    /// Probability of exploring on action number `step`
    fn epsilon(&self, step: u32) -> f32;
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DecayError {
    #[error("epsilon {0} is not a probability")]
    NotAProbability(f32),
    #[error("epsilon must decay towards its floor (start {start}, floor {floor})")]
    RisingEpsilon { start: f32, floor: f32 },
    #[error("decay rate {0} must be positive")]
    Rate(f32),
}

fn probability(value: f32) -> Result<f32, DecayError> {
    (0.0..=1.0)
        .contains(&value)
        .then_some(value)
        .ok_or(DecayError::NotAProbability(value))
}

/// The same epsilon forever
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(f32);

impl Constant {
    pub fn new(epsilon: f32) -> Result<Self, DecayError> {
        probability(epsilon).map(Self)
    }
}

impl Decay for Constant {
    fn epsilon(&self, _step: u32) -> f32 {
        self.0
    }
}

/// ε(t) = floor + (start - floor) * e<sup>-rate * t</sup>
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    rate: f32,
    start: f32,
    floor: f32,
}

impl Exponential {
    pub fn new(rate: f32, start: f32, floor: f32) -> Result<Self, DecayError> {
        if rate <= 0.0 {
            return Err(DecayError::Rate(rate));
        }
        let (start, floor) = (probability(start)?, probability(floor)?);
        if start < floor {
            return Err(DecayError::RisingEpsilon { start, floor });
        }
        Ok(Self { rate, start, floor })
    }
}

impl Decay for Exponential {
    fn epsilon(&self, step: u32) -> f32 {
        let &Self { rate, start, floor } = self;
        floor + (start - floor) * (-rate * step as f32).exp()
    }
}

/// Exploration policy result
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    Explore,
    Exploit,
}

/// Explore with probability ε, exploit otherwise
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    decay: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    pub fn new(decay: D) -> Self {
        Self { decay }
    }

    /// Decide how to act on action number `step`
    pub fn choose<R: Rng + ?Sized>(&self, step: u32, rng: &mut R) -> Choice {
        if rng.gen::<f32>() < self.decay.epsilon(step) {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

/// Starts fully exploratory and settles at 5% over a few thousand actions
impl Default for EpsilonGreedy<Exponential> {
    fn default() -> Self {
        Self::new(Exponential {
            rate: 1e-3,
            start: 1.0,
            floor: 0.05,
        })
    }
}
