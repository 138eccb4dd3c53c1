//! A scripted stand-in for a real rules engine, used by unit tests across the crate.
//!
//! Legal targets are whatever the test scripts into the engine; building on a target
//! removes it from the script. Resource costs follow the standard rules.
//!
//! The board is a ring: path `k < 54` joins intersections `k` and `k + 1`, and each
//! of the remaining 18 paths is a spoke from `3k` to `3k + 25` (mod 54).

use std::collections::HashMap;

use super::*;

/// Distance-rule-respecting opening on the ring; each road leaves its settlement clockwise
pub(crate) const OPENING: [u8; SETUP_PLACEMENTS] = [2, 13, 24, 35, 46, 7, 18, 51];

pub(crate) fn cost(purchase: Purchase) -> ResourceHand {
    let hand = ResourceHand::new();
    match purchase {
        Purchase::Road => hand.with(Resource::Lumber, 1).with(Resource::Brick, 1),
        Purchase::Settlement => hand
            .with(Resource::Lumber, 1)
            .with(Resource::Brick, 1)
            .with(Resource::Wool, 1)
            .with(Resource::Grain, 1),
        Purchase::City => hand.with(Resource::Grain, 2).with(Resource::Ore, 3),
        Purchase::DevelopmentCard => hand
            .with(Resource::Wool, 1)
            .with(Resource::Grain, 1)
            .with(Resource::Ore, 1),
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MockEngine {
    pub robber: HexId,
    pub buildings: Vec<Option<(PlayerId, BuildingKind)>>,
    pub roads: Vec<Option<PlayerId>>,
    pub settlement_targets: [Vec<IntersectionId>; PLAYERS],
    pub road_targets: [Vec<PathId>; PLAYERS],
    pub trades: [Vec<Trade>; PLAYERS],
    pub occupants: HashMap<HexId, Vec<PlayerId>>,
    pub resources: [ResourceHand; PLAYERS],
    pub development: [DevelopmentHand; PLAYERS],
    pub knights: [u32; PLAYERS],
    pub bonus_points: [u32; PLAYERS],
    pub deck: Vec<DevelopmentCard>,
    pub rolls: Vec<u8>,
    pub opening: [(IntersectionId, PathId); SETUP_PLACEMENTS],
    /// When set, every build command is rejected with this error
    pub reject_builds: Option<EngineError>,
}

impl MockEngine {
    pub fn give(&mut self, player: PlayerId, hand: ResourceHand) {
        self.add_resources(player, &hand);
    }

    pub fn give_card(&mut self, player: PlayerId, card: DevelopmentCard) {
        self.development[player.index()][card] += 1;
    }

    pub fn afford(&mut self, player: PlayerId, purchase: Purchase) {
        self.give(player, cost(purchase));
    }

    fn pay(&mut self, player: PlayerId, purchase: Purchase) -> Result<(), EngineError> {
        if !self.can_afford(player, purchase) {
            return Err(EngineError::CannotAfford(purchase));
        }
        self.remove_resources(player, &cost(purchase))
    }
}

impl GameEngine for MockEngine {
    fn standard() -> Self {
        Self {
            robber: HexId(0),
            buildings: vec![None; INTERSECTIONS],
            roads: vec![None; PATHS],
            settlement_targets: Default::default(),
            road_targets: Default::default(),
            trades: Default::default(),
            occupants: HashMap::new(),
            resources: [ResourceHand::new(); PLAYERS],
            development: [DevelopmentHand::new(); PLAYERS],
            knights: [0; PLAYERS],
            bonus_points: [0; PLAYERS],
            deck: Vec::new(),
            rolls: Vec::new(),
            opening: OPENING.map(|at| (IntersectionId(at), PathId(at))),
            reject_builds: None,
        }
    }

    fn hexes(&self) -> Vec<HexId> {
        (0..HEXES as u8).map(HexId).collect()
    }

    fn robber(&self) -> HexId {
        self.robber
    }

    fn set_robber(&mut self, hex: HexId) {
        self.robber = hex;
    }

    fn building(&self, at: IntersectionId) -> Option<(PlayerId, BuildingKind)> {
        self.buildings.get(at.0 as usize).copied().flatten()
    }

    fn road(&self, at: PathId) -> Option<PlayerId> {
        self.roads.get(at.0 as usize).copied().flatten()
    }

    fn players_on_hex(&self, hex: HexId) -> Vec<PlayerId> {
        self.occupants.get(&hex).cloned().unwrap_or_default()
    }

    fn path_ends(&self, at: PathId) -> [IntersectionId; 2] {
        let ring = INTERSECTIONS as u8;
        let (a, b) = match at.0.checked_sub(ring) {
            None => (at.0, (at.0 + 1) % ring),
            Some(spoke) => (3 * spoke, (3 * spoke + 25) % ring),
        };
        [IntersectionId(a), IntersectionId(b)]
    }

    fn starting_placements(&self) -> [(IntersectionId, PathId); SETUP_PLACEMENTS] {
        self.opening
    }

    fn intersection_yield(&self, at: IntersectionId) -> ResourceHand {
        let resource = Resource::from_repr(at.0 as usize % 5).unwrap_or(Resource::Lumber);
        ResourceHand::new().with(resource, 1).with(Resource::Grain, 1)
    }

    fn valid_settlement_coords(&self, player: PlayerId) -> Vec<IntersectionId> {
        self.settlement_targets[player.index()].clone()
    }

    fn valid_city_coords(&self, player: PlayerId) -> Vec<IntersectionId> {
        (0..INTERSECTIONS as u8)
            .map(IntersectionId)
            .filter(|at| self.building(*at) == Some((player, BuildingKind::Settlement)))
            .collect()
    }

    fn valid_road_coords(&self, player: PlayerId) -> Vec<PathId> {
        self.road_targets[player.index()].clone()
    }

    fn possible_trades(&self, player: PlayerId) -> Vec<Trade> {
        self.trades[player.index()].clone()
    }

    fn resources(&self, player: PlayerId) -> ResourceHand {
        self.resources[player.index()]
    }

    fn development_cards(&self, player: PlayerId) -> DevelopmentHand {
        self.development[player.index()]
    }

    fn knights_played(&self, player: PlayerId) -> u32 {
        self.knights[player.index()]
    }

    fn victory_points(&self, player: PlayerId) -> u32 {
        let buildings: u32 = self
            .buildings
            .iter()
            .flatten()
            .filter(|(owner, _)| *owner == player)
            .map(|(_, kind)| match kind {
                BuildingKind::Settlement => 1,
                BuildingKind::City => 2,
            })
            .sum();
        buildings
            + self.development[player.index()][DevelopmentCard::VictoryPoint]
            + self.bonus_points[player.index()]
    }

    fn can_afford(&self, player: PlayerId, purchase: Purchase) -> bool {
        self.resources(player).covers(&cost(purchase))
    }

    fn build_settlement(
        &mut self,
        player: PlayerId,
        at: IntersectionId,
        options: BuildOptions,
    ) -> Result<(), EngineError> {
        if let Some(err) = self.reject_builds {
            return Err(err);
        }
        let scripted = self.settlement_targets[player.index()]
            .iter()
            .position(|t| *t == at);
        if options.ensure_connected && scripted.is_none() {
            return Err(EngineError::InvalidLocation);
        }
        if self.building(at).is_some() {
            return Err(EngineError::InvalidLocation);
        }
        if !options.free {
            self.pay(player, Purchase::Settlement)?;
        }
        if let Some(ix) = scripted {
            self.settlement_targets[player.index()].remove(ix);
        }
        self.buildings[at.0 as usize] = Some((player, BuildingKind::Settlement));
        Ok(())
    }

    fn upgrade_to_city(&mut self, player: PlayerId, at: IntersectionId) -> Result<(), EngineError> {
        if let Some(err) = self.reject_builds {
            return Err(err);
        }
        if self.building(at) != Some((player, BuildingKind::Settlement)) {
            return Err(EngineError::InvalidLocation);
        }
        self.pay(player, Purchase::City)?;
        self.buildings[at.0 as usize] = Some((player, BuildingKind::City));
        Ok(())
    }

    fn build_road(
        &mut self,
        player: PlayerId,
        at: PathId,
        options: BuildOptions,
    ) -> Result<(), EngineError> {
        if let Some(err) = self.reject_builds {
            return Err(err);
        }
        let scripted = self.road_targets[player.index()]
            .iter()
            .position(|t| *t == at);
        if options.ensure_connected && scripted.is_none() {
            return Err(EngineError::InvalidLocation);
        }
        if self.road(at).is_some() {
            return Err(EngineError::InvalidLocation);
        }
        if !options.free {
            self.pay(player, Purchase::Road)?;
        }
        if let Some(ix) = scripted {
            self.road_targets[player.index()].remove(ix);
        }
        self.roads[at.0 as usize] = Some(player);
        Ok(())
    }

    fn play_development_card(
        &mut self,
        player: PlayerId,
        card: DevelopmentCard,
    ) -> Result<(), EngineError> {
        let held = &mut self.development[player.index()][card];
        if *held == 0 {
            return Err(EngineError::NoSuchCard(card));
        }
        *held -= 1;
        if card == DevelopmentCard::Knight {
            self.knights[player.index()] += 1;
        }
        Ok(())
    }

    fn buy_development_card(&mut self, player: PlayerId) -> Result<DevelopmentCard, EngineError> {
        if self.deck.is_empty() {
            return Err(EngineError::EmptyDeck);
        }
        self.pay(player, Purchase::DevelopmentCard)?;
        let card = self.deck.pop().ok_or(EngineError::EmptyDeck)?;
        self.give_card(player, card);
        Ok(card)
    }

    fn add_yield_for_roll(&mut self, roll: u8) {
        self.rolls.push(roll);
    }

    fn add_resources(&mut self, player: PlayerId, resources: &ResourceHand) {
        let hand = &mut self.resources[player.index()];
        for resource in Resource::iter() {
            hand[resource] += resources[resource];
        }
    }

    fn remove_resources(
        &mut self,
        player: PlayerId,
        resources: &ResourceHand,
    ) -> Result<(), EngineError> {
        let hand = &mut self.resources[player.index()];
        if let Some(short) = Resource::iter().find(|r| hand[*r] < resources[*r]) {
            return Err(EngineError::InsufficientResources(short));
        }
        for resource in Resource::iter() {
            hand[resource] -= resources[resource];
        }
        Ok(())
    }

    fn apply_trade(&mut self, player: PlayerId, trade: &Trade) -> Result<(), EngineError> {
        if !self.trades[player.index()].contains(trade) {
            return Err(EngineError::InvalidTrade);
        }
        let hand = &mut self.resources[player.index()];
        for resource in Resource::iter() {
            let updated = hand[resource] as i64 + trade.delta(resource) as i64;
            if updated < 0 {
                return Err(EngineError::InsufficientResources(resource));
            }
        }
        for resource in Resource::iter() {
            hand[resource] = (hand[resource] as i64 + trade.delta(resource) as i64) as u32;
        }
        Ok(())
    }
}
