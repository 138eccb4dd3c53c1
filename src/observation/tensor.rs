use burn::{prelude::*, tensor::BasicOps};

use crate::engine::PLAYERS;

use super::Observation;

/// A trait for converting items to tensors
///
/// Implemented for single observations (`[4, width]`) and batches of observations
/// (`[batch, 4, width]`) so any policy network can consume either layout.
pub trait ToTensor<B: Backend, const D: usize, K: BasicOps<B>> {
    fn to_tensor(self, device: &B::Device) -> Tensor<B, D, K>;
}

impl<B: Backend> ToTensor<B, 2, Float> for &Observation {
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 2, Float> {
        let width = self.width();
        Tensor::<B, 1>::from_floats(self.features().as_slice(), device)
            .reshape([PLAYERS, width])
    }
}

impl<B: Backend> ToTensor<B, 3, Float> for Vec<&Observation> {
    /// ### Panics
    ///
    /// If the batch mixes observation layouts
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 3, Float> {
        let len = self.len();
        let width = self.first().map_or(0, |obs| obs.width());
        assert!(
            self.iter().all(|obs| obs.width() == width),
            "a batch must use a single observation layout"
        );
        let features = self
            .into_iter()
            .flat_map(Observation::features)
            .collect::<Vec<_>>();
        Tensor::<B, 1>::from_floats(features.as_slice(), device).reshape([len, PLAYERS, width])
    }
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;

    use super::*;
    use crate::{
        engine::{mock::MockEngine, GameEngine, PlayerId},
        observation::{ObservationEncoder, ObservationKind, FLAT_WIDTH, STRUCTURED_WIDTH},
        stage::Stage,
    };

    #[test]
    fn single_observation_shape() {
        let engine = MockEngine::standard();
        let encoder = ObservationEncoder::new(&engine, PlayerId(0), Stage::Rolled);
        let device = Default::default();

        let flat: Tensor<NdArray, 2> = (&encoder.encode(ObservationKind::Flat)).to_tensor(&device);
        assert_eq!(flat.dims(), [PLAYERS, FLAT_WIDTH]);

        let structured: Tensor<NdArray, 2> =
            (&encoder.encode(ObservationKind::Structured)).to_tensor(&device);
        assert_eq!(structured.dims(), [PLAYERS, STRUCTURED_WIDTH]);
    }

    #[test]
    fn batch_shape() {
        let engine = MockEngine::standard();
        let a = ObservationEncoder::new(&engine, PlayerId(0), Stage::Rolled).encode(ObservationKind::Flat);
        let b = ObservationEncoder::new(&engine, PlayerId(2), Stage::Trading).encode(ObservationKind::Flat);

        let batch: Tensor<NdArray, 3> = vec![&a, &b].to_tensor(&Default::default());
        assert_eq!(batch.dims(), [2, PLAYERS, FLAT_WIDTH]);
    }

    #[test]
    #[should_panic(expected = "single observation layout")]
    fn mixed_batch_panics() {
        let engine = MockEngine::standard();
        let encoder = ObservationEncoder::new(&engine, PlayerId(0), Stage::Rolled);
        let a = encoder.encode(ObservationKind::Flat);
        let b = encoder.encode(ObservationKind::Structured);
        let _: Tensor<NdArray, 3> = vec![&a, &b].to_tensor(&Default::default());
    }
}
