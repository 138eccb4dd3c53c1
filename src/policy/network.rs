use burn::{prelude::*, tensor::ElementConversion};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    action::ActionVector,
    observation::{Observation, ToTensor},
};

use super::{
    exploration::{Choice, Decay, EpsilonGreedy, Exponential},
    Policy,
};

/// Output of a [`PolicyModel`]: one row of logits per batch item for each action field
#[derive(Debug, Clone)]
pub struct ActionLogits<B: Backend> {
    /// `[batch, 10]`
    pub primary: Tensor<B, 2>,
    /// `[batch, 25]`
    pub secondary: Tensor<B, 2>,
    /// `[batch, 54]`
    pub tertiary: Tensor<B, 2>,
}

/// A burn model mapping observations to action logits
///
/// ### Generics
/// - `B`: A burn backend
pub trait PolicyModel<B: Backend> {
    /// Forward pass over a `[batch, 4, width]` observation tensor
    fn forward(&self, input: Tensor<B, 3>) -> ActionLogits<B>;
}

/// Adapts a [`PolicyModel`] into a [`Policy`] with epsilon-greedy exploration
///
/// Exploitation takes the argmax of each head independently.
pub struct NetworkPolicy<B: Backend, M: PolicyModel<B>, D: Decay = Exponential> {
    model: M,
    device: B::Device,
    exploration: EpsilonGreedy<D>,
    rng: StdRng,
    total_steps: u32,
}

impl<B, M> NetworkPolicy<B, M>
where
    B: Backend,
    M: PolicyModel<B>,
{
    /// Initialize with the default exponentially decaying exploration
    pub fn new(model: M, device: B::Device) -> Self {
        Self::with_exploration(model, device, EpsilonGreedy::default(), StdRng::from_entropy())
    }
}

impl<B, M, D> NetworkPolicy<B, M, D>
where
    B: Backend,
    M: PolicyModel<B>,
    D: Decay,
{
    /// ### Arguments
    /// - `model` The network producing action logits
    /// - `device` The device the model lives on
    /// - `exploration` The exploration policy
    /// - `rng` Source of exploration randomness
    pub fn with_exploration(
        model: M,
        device: B::Device,
        exploration: EpsilonGreedy<D>,
        rng: StdRng,
    ) -> Self {
        Self {
            model,
            device,
            exploration,
            rng,
            total_steps: 0,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Greedy action for `observation`
    pub fn exploit(&self, observation: &Observation) -> ActionVector {
        let input: Tensor<B, 3> = vec![observation].to_tensor(&self.device);
        let logits = self.model.forward(input);
        ActionVector::new(
            argmax(logits.primary),
            argmax(logits.secondary),
            argmax(logits.tertiary),
        )
    }
}

fn argmax<B: Backend>(logits: Tensor<B, 2>) -> u32 {
    logits.argmax(1).into_scalar().elem::<i64>() as u32
}

impl<B, M, D> Policy for NetworkPolicy<B, M, D>
where
    B: Backend,
    M: PolicyModel<B>,
    D: Decay,
{
    fn act(&mut self, observation: &Observation) -> ActionVector {
        let choice = self.exploration.choose(self.total_steps, &mut self.rng);
        self.total_steps += 1;
        match choice {
            Choice::Explore => ActionVector::sample(&mut self.rng),
            Choice::Exploit => self.exploit(observation),
        }
    }
}
