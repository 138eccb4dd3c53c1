use log::debug;
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Uniform};
use thiserror::Error;

use crate::{
    action::ActionVector,
    candidates::{CandidateKind, CandidateResolver},
    engine::{
        BuildOptions, DevelopmentCard, EngineError, GameEngine, HexId, IntersectionId, PathId,
        PlayerId, Purchase, Resource, ResourceHand, Trade,
    },
    stage::{Stage, StageError},
    turn::TurnState,
};

/// Why an action could not be resolved
///
/// Invalid actions are an expected outcome of an untrained policy, never a fault.
/// Effects the engine committed before the failure are kept.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum InvalidAction {
    #[error("No legal {0} target")]
    NoCandidates(CandidateKind),
    #[error("Cannot afford a {0}")]
    CannotAfford(Purchase),
    #[error("No {0} card in hand")]
    CardUnavailable(DevelopmentCard),
    #[error("A development card was already played this turn")]
    CardAlreadyPlayed,
    #[error("A development card was already bought this turn")]
    CardAlreadyBought,
    #[error("No trade is possible")]
    NoTrades,
    #[error("Primary action {0} is out of range")]
    PrimaryOutOfRange(u32),
    #[error("Stage {0} is reserved and cannot be acted in")]
    ReservedStage(Stage),
    #[error("Settlement actions need a settlement driver policy")]
    NoSettlementDriver,
    #[error("Engine rejected the command: {0}")]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Stage(#[from] StageError),
}

/// Something that happened while resolving an action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Rolled(u8),
    PlayedCard(DevelopmentCard),
    TookResource(Resource),
    Monopolized { resource: Resource, amount: u32 },
    BuiltSettlement(IntersectionId),
    BuiltCity(IntersectionId),
    BuiltRoad(PathId),
    /// A road granted by the road building card
    PlacedFreeRoad(PathId),
    BoughtCard(DevelopmentCard),
    MovedRobber(HexId),
    Stole {
        victim: PlayerId,
        resource: Option<Resource>,
    },
    OpenedTrade,
    Traded(Trade),
    Passed,
}

/// A successfully resolved action
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub events: Vec<Event>,
    /// Stage to move to within the turn, if it changes
    pub next: Option<Stage>,
    /// The action ends the active player's turn
    pub pass: bool,
}

impl Resolution {
    fn to(next: Stage, events: Vec<Event>) -> Self {
        Self {
            events,
            next: Some(next),
            pass: false,
        }
    }

    fn stay(events: Vec<Event>) -> Self {
        Self {
            events,
            next: None,
            pass: false,
        }
    }

    pub fn pass() -> Self {
        Self {
            events: Vec::new(),
            next: None,
            pass: true,
        }
    }
}

/// Two six-sided dice
#[derive(Clone, Copy, Debug)]
pub struct Dice {
    die: Uniform<u8>,
}

impl Dice {
    pub fn new() -> Self {
        Self {
            die: Uniform::new_inclusive(1, 6),
        }
    }

    /// Roll both dice and sum them
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        self.die.sample(rng) + self.die.sample(rng)
    }
}

impl Default for Dice {
    fn default() -> Self {
        Self::new()
    }
}

/// Primary categories in the `Rolled` stage
mod rolled {
    pub const PASS: u32 = 0;
    pub const KNIGHT: u32 = 1;
    pub const YEAR_OF_PLENTY: u32 = 2;
    pub const MONOPOLY: u32 = 3;
    pub const ROAD_BUILDING: u32 = 4;
    pub const TRADE: u32 = 5;
    pub const SETTLEMENT: u32 = 6;
    pub const CITY: u32 = 7;
    pub const ROAD: u32 = 8;
    pub const DEVELOPMENT_CARD: u32 = 9;
}

pub use rolled::SETTLEMENT as BUILD_SETTLEMENT;

fn resource_pick(index: u32) -> Resource {
    Resource::from_repr(index as usize % 5).unwrap_or(Resource::Lumber)
}

/// Maps an [`ActionVector`] onto engine commands for the active player's stage
///
/// The decoder commits engine effects and the one-shot turn flags, but leaves
/// stage transitions and turn passing to the caller via the returned [`Resolution`].
pub struct ActionDecoder<'a, G: GameEngine, R: RngCore> {
    engine: &'a mut G,
    turn: &'a mut TurnState,
    rng: &'a mut R,
    dice: Dice,
}

impl<'a, G: GameEngine, R: RngCore> ActionDecoder<'a, G, R> {
    pub fn new(engine: &'a mut G, turn: &'a mut TurnState, rng: &'a mut R) -> Self {
        Self {
            engine,
            turn,
            rng,
            dice: Dice::new(),
        }
    }

    pub fn decode(&mut self, action: ActionVector) -> Result<Resolution, InvalidAction> {
        match self.turn.stage {
            Stage::NotRolled => self.not_rolled(action),
            Stage::Rolled => self.rolled(action),
            Stage::MovingRobber => self.moving_robber(action),
            Stage::Stealing => self.stealing(action),
            Stage::Trading => self.trading(action),
            stage @ (Stage::PlacingRoad | Stage::PlacingSettlement | Stage::PlacingCity) => {
                Err(InvalidAction::ReservedStage(stage))
            }
        }
    }

    fn player(&self) -> PlayerId {
        self.turn.active
    }

    fn candidates(&self) -> CandidateResolver<'_, G> {
        CandidateResolver::new(&*self.engine, self.turn.active)
    }

    fn holds(&self, card: DevelopmentCard) -> bool {
        self.engine.development_cards(self.player())[card] > 0
    }

    /// Check the one-card-per-turn rule and that the card is in hand, then play it
    fn play_card(&mut self, card: DevelopmentCard) -> Result<Event, InvalidAction> {
        if self.turn.played_dev_card {
            return Err(InvalidAction::CardAlreadyPlayed);
        }
        if !self.holds(card) {
            return Err(InvalidAction::CardUnavailable(card));
        }
        let player = self.player();
        self.engine.play_development_card(player, card)?;
        self.turn.played_dev_card = true;
        Ok(Event::PlayedCard(card))
    }

    fn ensure_affordable(&self, purchase: Purchase) -> Result<(), InvalidAction> {
        if self.engine.can_afford(self.player(), purchase) {
            Ok(())
        } else {
            Err(InvalidAction::CannotAfford(purchase))
        }
    }

    fn not_rolled(&mut self, action: ActionVector) -> Result<Resolution, InvalidAction> {
        let wants_knight = action.primary % 2 == 1;
        if wants_knight && self.holds(DevelopmentCard::Knight) && !self.turn.played_dev_card {
            let played = self.play_card(DevelopmentCard::Knight)?;
            return Ok(Resolution::to(Stage::MovingRobber, vec![played]));
        }

        let roll = self.dice.roll(&mut *self.rng);
        self.turn.rolled = true;
        debug!("{} rolled {roll}", self.player());
        if roll == 7 {
            Ok(Resolution::to(Stage::MovingRobber, vec![Event::Rolled(roll)]))
        } else {
            self.engine.add_yield_for_roll(roll);
            Ok(Resolution::to(Stage::Rolled, vec![Event::Rolled(roll)]))
        }
    }

    fn rolled(&mut self, action: ActionVector) -> Result<Resolution, InvalidAction> {
        let player = self.player();
        match action.primary {
            rolled::PASS => Ok(Resolution::pass()),
            rolled::KNIGHT => {
                let played = self.play_card(DevelopmentCard::Knight)?;
                Ok(Resolution::to(Stage::MovingRobber, vec![played]))
            }
            rolled::YEAR_OF_PLENTY => {
                let played = self.play_card(DevelopmentCard::YearOfPlenty)?;
                let mut events = vec![played];
                for pick in [action.secondary, action.tertiary] {
                    let resource = resource_pick(pick);
                    self.engine
                        .add_resources(player, &ResourceHand::new().with(resource, 1));
                    events.push(Event::TookResource(resource));
                }
                Ok(Resolution::stay(events))
            }
            rolled::MONOPOLY => {
                let played = self.play_card(DevelopmentCard::Monopoly)?;
                let resource = resource_pick(action.secondary);
                let mut taken = 0;
                for victim in PlayerId::ALL.into_iter().filter(|p| *p != player) {
                    let amount = self.engine.resources(victim)[resource];
                    if amount == 0 {
                        continue;
                    }
                    let hand = ResourceHand::new().with(resource, amount);
                    self.engine.remove_resources(victim, &hand)?;
                    self.engine.add_resources(player, &hand);
                    taken += amount;
                }
                Ok(Resolution::stay(vec![
                    played,
                    Event::Monopolized {
                        resource,
                        amount: taken,
                    },
                ]))
            }
            rolled::ROAD_BUILDING => {
                // The first road must exist before the card is spent
                let first = self.candidates().roads().select(action.secondary)?;
                let played = self.play_card(DevelopmentCard::RoadBuilding)?;
                self.engine.build_road(player, first, BuildOptions::FREE)?;
                let mut events = vec![played, Event::PlacedFreeRoad(first)];

                let roads = self.candidates().roads();
                if !roads.is_empty() {
                    let second = roads.select(action.tertiary)?;
                    self.engine.build_road(player, second, BuildOptions::FREE)?;
                    events.push(Event::PlacedFreeRoad(second));
                }
                Ok(Resolution::stay(events))
            }
            rolled::TRADE => {
                if self.candidates().trades().is_empty() {
                    return Err(InvalidAction::NoTrades);
                }
                Ok(Resolution::to(Stage::Trading, vec![Event::OpenedTrade]))
            }
            rolled::SETTLEMENT => {
                self.ensure_affordable(Purchase::Settlement)?;
                let at = self.candidates().settlements().select(action.secondary)?;
                self.engine.build_settlement(player, at, BuildOptions::PAID)?;
                Ok(Resolution::stay(vec![Event::BuiltSettlement(at)]))
            }
            rolled::CITY => {
                self.ensure_affordable(Purchase::City)?;
                let at = self.candidates().cities().select(action.secondary)?;
                self.engine.upgrade_to_city(player, at)?;
                Ok(Resolution::stay(vec![Event::BuiltCity(at)]))
            }
            rolled::ROAD => {
                self.ensure_affordable(Purchase::Road)?;
                let at = self.candidates().roads().select(action.secondary)?;
                self.engine.build_road(player, at, BuildOptions::PAID)?;
                Ok(Resolution::stay(vec![Event::BuiltRoad(at)]))
            }
            rolled::DEVELOPMENT_CARD => {
                if self.turn.bought_dev_card {
                    return Err(InvalidAction::CardAlreadyBought);
                }
                self.ensure_affordable(Purchase::DevelopmentCard)?;
                let card = self.engine.buy_development_card(player)?;
                self.turn.bought_dev_card = true;
                Ok(Resolution::stay(vec![Event::BoughtCard(card)]))
            }
            other => Err(InvalidAction::PrimaryOutOfRange(other)),
        }
    }

    fn moving_robber(&mut self, action: ActionVector) -> Result<Resolution, InvalidAction> {
        let hex = self.candidates().robber_hexes().select(action.tertiary)?;
        self.engine.set_robber(hex);
        Ok(Resolution::to(Stage::Stealing, vec![Event::MovedRobber(hex)]))
    }

    fn stealing(&mut self, action: ActionVector) -> Result<Resolution, InvalidAction> {
        let next = Stage::after_robbery(self.turn.rolled);
        let victims = self.candidates().victims();
        if victims.is_empty() {
            return Ok(Resolution::to(next, Vec::new()));
        }

        let victim = victims.select(action.primary)?;
        let player = self.player();
        let resource = self.engine.random_resource(victim, &mut *self.rng);
        if let Some(resource) = resource {
            let hand = ResourceHand::new().with(resource, 1);
            self.engine.remove_resources(victim, &hand)?;
            self.engine.add_resources(player, &hand);
        }
        Ok(Resolution::to(next, vec![Event::Stole { victim, resource }]))
    }

    fn trading(&mut self, action: ActionVector) -> Result<Resolution, InvalidAction> {
        let trade = self.candidates().trades().select(action.secondary)?;
        let player = self.player();
        self.engine.apply_trade(player, &trade)?;
        Ok(Resolution::to(Stage::Rolled, vec![Event::Traded(trade)]))
    }
}
