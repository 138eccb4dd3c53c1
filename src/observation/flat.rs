use crate::engine::{GameEngine, HEXES, INTERSECTIONS, PATHS, PLAYERS};

use super::ObservationEncoder;

/// Width of one player row
pub const FLAT_WIDTH: usize = 253;
/// Value written into marker cells
pub const MARK: f32 = 255.0;

/// Column offsets of the flat layout
///
/// The robber block reserves room for one slot per intersection even though only
/// [`HEXES`] slots are ever marked, so the building blocks start at 62.
pub mod offset {
    pub const STAGE: usize = 0;
    pub const ROBBER: usize = 8;
    pub const SETTLEMENTS: usize = 62;
    pub const CITIES: usize = 116;
    pub const ROADS: usize = 170;
    pub const RESOURCES: usize = 242;
    pub const DEVELOPMENT: usize = 247;
    pub const KNIGHTS: usize = 252;
}

const _: () = assert!(offset::ROBBER + HEXES <= offset::SETTLEMENTS);
const _: () = assert!(offset::SETTLEMENTS + INTERSECTIONS == offset::CITIES);
const _: () = assert!(offset::CITIES + INTERSECTIONS == offset::ROADS);
const _: () = assert!(offset::ROADS + PATHS == offset::RESOURCES);
const _: () = assert!(offset::KNIGHTS + 1 == FLAT_WIDTH);

/// The fixed-width `4 x 253` observation layout
///
/// Stage and robber markers are repeated in every row; everything else describes the
/// row's player.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatObservation {
    pub rows: [[f32; FLAT_WIDTH]; PLAYERS],
}

impl FlatObservation {
    pub fn row(&self, row: usize) -> &[f32; FLAT_WIDTH] {
        &self.rows[row]
    }
}

impl<G: GameEngine> ObservationEncoder<'_, G> {
    pub fn flat(&self) -> FlatObservation {
        let mut rows = [[0.0; FLAT_WIDTH]; PLAYERS];
        let stage = offset::STAGE + self.stage().index();
        let robber = offset::ROBBER + self.robber_index();

        for (row, view) in rows.iter_mut().zip(self.views()) {
            row[stage] = MARK;
            row[robber] = MARK;
            for j in view.settlements {
                row[offset::SETTLEMENTS + j] = MARK;
            }
            for j in view.cities {
                row[offset::CITIES + j] = MARK;
            }
            for j in view.roads {
                row[offset::ROADS + j] = MARK;
            }
            for (k, count) in view.resources.iter().enumerate() {
                row[offset::RESOURCES + k] = *count as f32;
            }
            for (k, count) in view.development.iter().enumerate() {
                row[offset::DEVELOPMENT + k] = *count as f32;
            }
            row[offset::KNIGHTS] = view.knights as f32;
        }

        FlatObservation { rows }
    }
}
