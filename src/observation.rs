//! Fixed-shape encodings of the game state, rotated so row 0 is the observing player.
//!
//! Two interchangeable layouts are supported: a [structured](StructuredObservation)
//! multi-field layout and a [flat](FlatObservation) `4 x 253` matrix.

mod flat;
mod structured;
mod tensor;

pub use flat::*;
pub use structured::*;
pub use tensor::ToTensor;

use crate::{
    engine::{BuildingKind, GameEngine, IntersectionId, PathId, PlayerId, PLAYERS},
    stage::Stage,
};

/// Which layout an observation uses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ObservationKind {
    #[default]
    Structured,
    Flat,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Observation {
    Structured(StructuredObservation),
    Flat(FlatObservation),
}

impl Observation {
    pub fn kind(&self) -> ObservationKind {
        match self {
            Observation::Structured(_) => ObservationKind::Structured,
            Observation::Flat(_) => ObservationKind::Flat,
        }
    }

    /// Width of one player row in [`Observation::features`]
    pub fn width(&self) -> usize {
        match self {
            Observation::Structured(_) => STRUCTURED_WIDTH,
            Observation::Flat(_) => FLAT_WIDTH,
        }
    }

    /// Row-major `4 x width` numeric features
    pub fn features(&self) -> Vec<f32> {
        match self {
            Observation::Structured(obs) => obs.features(),
            Observation::Flat(obs) => obs.rows.iter().flatten().copied().collect(),
        }
    }

    pub fn as_structured(&self) -> Option<&StructuredObservation> {
        match self {
            Observation::Structured(obs) => Some(obs),
            Observation::Flat(_) => None,
        }
    }

    pub fn as_flat(&self) -> Option<&FlatObservation> {
        match self {
            Observation::Flat(obs) => Some(obs),
            Observation::Structured(_) => None,
        }
    }
}

/// What one rotated row of an observation says about one player
pub(crate) struct PlayerView {
    /// Intersections holding this player's settlements
    pub settlements: Vec<usize>,
    /// Intersections holding this player's cities
    pub cities: Vec<usize>,
    /// Paths holding this player's roads
    pub roads: Vec<usize>,
    pub resources: [u32; 5],
    pub development: [u32; 5],
    pub knights: u32,
}

/// Reads engine state from the point of view of one player
pub struct ObservationEncoder<'a, G: GameEngine> {
    engine: &'a G,
    observer: PlayerId,
    stage: Stage,
}

impl<'a, G: GameEngine> ObservationEncoder<'a, G> {
    pub fn new(engine: &'a G, observer: PlayerId, stage: Stage) -> Self {
        Self {
            engine,
            observer,
            stage,
        }
    }

    pub fn encode(&self, kind: ObservationKind) -> Observation {
        match kind {
            ObservationKind::Structured => Observation::Structured(self.structured()),
            ObservationKind::Flat => Observation::Flat(self.flat()),
        }
    }

    /// The player described by row `row`
    pub fn player_at(&self, row: usize) -> PlayerId {
        self.observer.offset(row)
    }

    /// Position of the robber in the engine's hex order
    pub(crate) fn robber_index(&self) -> usize {
        let robber = self.engine.robber();
        self.engine
            .hexes()
            .iter()
            .position(|hex| *hex == robber)
            .unwrap_or(0)
    }

    pub(crate) fn stage(&self) -> Stage {
        self.stage
    }

    /// Views for every row in rotation order
    pub(crate) fn views(&self) -> [PlayerView; PLAYERS] {
        let mut views = std::array::from_fn(|row| {
            let player = self.player_at(row);
            PlayerView {
                settlements: Vec::new(),
                cities: Vec::new(),
                roads: Vec::new(),
                resources: self.engine.resources(player).counts(),
                development: self.engine.development_cards(player).counts(),
                knights: self.engine.knights_played(player),
            }
        });
        let row_of = |owner: PlayerId| (owner.index() + PLAYERS - self.observer.index()) % PLAYERS;

        for j in 0..crate::engine::INTERSECTIONS {
            if let Some((owner, kind)) = self.engine.building(IntersectionId(j as u8)) {
                let view: &mut PlayerView = &mut views[row_of(owner)];
                match kind {
                    BuildingKind::Settlement => view.settlements.push(j),
                    BuildingKind::City => view.cities.push(j),
                }
            }
        }
        for j in 0..crate::engine::PATHS {
            if let Some(owner) = self.engine.road(PathId(j as u8)) {
                views[row_of(owner)].roads.push(j);
            }
        }
        views
    }
}
