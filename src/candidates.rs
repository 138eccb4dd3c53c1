use strum::Display;

use crate::{
    decoder::InvalidAction,
    engine::{GameEngine, HexId, IntersectionId, PathId, PlayerId, Trade},
};

/// What a candidate set holds
#[derive(Display, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    Settlement,
    City,
    Road,
    Hex,
    Victim,
    Trade,
}

/// An ordered snapshot of the legal targets for one decision
///
/// Legality changes after every mutation, so a set must be resolved again after
/// each engine command instead of being reused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateSet<T> {
    kind: CandidateKind,
    items: Vec<T>,
}

impl<T: Copy> CandidateSet<T> {
    pub fn new(kind: CandidateKind, items: Vec<T>) -> Self {
        Self { kind, items }
    }

    pub fn kind(&self) -> CandidateKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Pick the candidate at `index` modulo the set size
    ///
    /// **Returns** [`InvalidAction::NoCandidates`] if the set is empty
    pub fn select(&self, index: u32) -> Result<T, InvalidAction> {
        if self.items.is_empty() {
            return Err(InvalidAction::NoCandidates(self.kind));
        }
        Ok(self.items[index as usize % self.items.len()])
    }
}

/// Fresh candidate queries against the engine for the active player
pub struct CandidateResolver<'a, G: GameEngine> {
    engine: &'a G,
    player: PlayerId,
}

impl<'a, G: GameEngine> CandidateResolver<'a, G> {
    pub fn new(engine: &'a G, player: PlayerId) -> Self {
        Self { engine, player }
    }

    pub fn settlements(&self) -> CandidateSet<IntersectionId> {
        CandidateSet::new(
            CandidateKind::Settlement,
            self.engine.valid_settlement_coords(self.player),
        )
    }

    pub fn cities(&self) -> CandidateSet<IntersectionId> {
        CandidateSet::new(
            CandidateKind::City,
            self.engine.valid_city_coords(self.player),
        )
    }

    pub fn roads(&self) -> CandidateSet<PathId> {
        CandidateSet::new(
            CandidateKind::Road,
            self.engine.valid_road_coords(self.player),
        )
    }

    /// Every hex except the one the robber currently occupies
    pub fn robber_hexes(&self) -> CandidateSet<HexId> {
        let robber = self.engine.robber();
        CandidateSet::new(
            CandidateKind::Hex,
            self.engine
                .hexes()
                .into_iter()
                .filter(|hex| *hex != robber)
                .collect(),
        )
    }

    /// Opposing players with a building on the robber's hex
    pub fn victims(&self) -> CandidateSet<PlayerId> {
        let mut victims = self.engine.players_on_hex(self.engine.robber());
        victims.retain(|p| *p != self.player);
        victims.dedup();
        CandidateSet::new(CandidateKind::Victim, victims)
    }

    pub fn trades(&self) -> CandidateSet<Trade> {
        CandidateSet::new(
            CandidateKind::Trade,
            self.engine.possible_trades(self.player),
        )
    }
}
