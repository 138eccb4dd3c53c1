use crate::{
    engine::{GameEngine, INTERSECTIONS, PATHS, PLAYERS},
    stage::Stage,
};

use super::ObservationEncoder;

/// Columns of the building matrix: settlements, then cities, then roads
pub const BUILDING_WIDTH: usize = 2 * INTERSECTIONS + PATHS;
/// Columns of the hand matrix: 5 resources, 5 development cards, knights played
pub const HAND_WIDTH: usize = 11;
/// Width of one row of [`StructuredObservation::features`]
pub const STRUCTURED_WIDTH: usize = 2 + BUILDING_WIDTH + HAND_WIDTH;

const CITY_COLUMN: usize = INTERSECTIONS;
const ROAD_COLUMN: usize = 2 * INTERSECTIONS;

/// The multi-field observation layout
///
/// - `stage`: [`Stage`] index in `[0, 13)`
/// - `robber`: robber hex index
/// - `buildings`: `4 x 180` ownership bits (0-53 settlements, 54-107 cities, 108-179 roads)
/// - `hands`: `4 x 11` counts (5 resources, 5 development cards, knights played)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuredObservation {
    pub stage: u8,
    pub robber: u8,
    pub buildings: [[u8; BUILDING_WIDTH]; PLAYERS],
    pub hands: [[u32; HAND_WIDTH]; PLAYERS],
}

impl StructuredObservation {
    pub fn stage(&self) -> Option<Stage> {
        Stage::from_repr(self.stage as usize)
    }

    /// One row per player: stage, robber, building bits, hand counts
    pub fn features(&self) -> Vec<f32> {
        let mut features = Vec::with_capacity(PLAYERS * STRUCTURED_WIDTH);
        for (buildings, hand) in self.buildings.iter().zip(&self.hands) {
            features.push(self.stage as f32);
            features.push(self.robber as f32);
            features.extend(buildings.iter().map(|b| *b as f32));
            features.extend(hand.iter().map(|c| *c as f32));
        }
        features
    }
}

impl<G: GameEngine> ObservationEncoder<'_, G> {
    pub fn structured(&self) -> StructuredObservation {
        let mut buildings = [[0; BUILDING_WIDTH]; PLAYERS];
        let mut hands = [[0; HAND_WIDTH]; PLAYERS];

        for (row, view) in self.views().into_iter().enumerate() {
            for j in view.settlements {
                buildings[row][j] = 1;
            }
            for j in view.cities {
                buildings[row][CITY_COLUMN + j] = 1;
            }
            for j in view.roads {
                buildings[row][ROAD_COLUMN + j] = 1;
            }
            hands[row][..5].copy_from_slice(&view.resources);
            hands[row][5..10].copy_from_slice(&view.development);
            hands[row][10] = view.knights;
        }

        StructuredObservation {
            stage: self.stage().index() as u8,
            robber: self.robber_index() as u8,
            buildings,
            hands,
        }
    }
}
