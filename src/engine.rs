use std::{fmt, marker::PhantomData, ops::Index, ops::IndexMut};

use rand::{seq::SliceRandom, RngCore};
use strum::{Display, EnumCount, EnumIter, FromRepr, IntoEnumIterator, VariantArray};
use thiserror::Error;

#[cfg(test)]
pub(crate) mod mock;

/// Number of seats at the table
pub const PLAYERS: usize = 4;
/// Intersections on the standard board
pub const INTERSECTIONS: usize = 54;
/// Paths (edges) on the standard board
pub const PATHS: usize = 72;
/// Land hexes on the standard board
pub const HEXES: usize = 19;
/// Settlement and road pairs placed before the first turn, two per seat
pub const SETUP_PLACEMENTS: usize = 2 * PLAYERS;

/// A seat at the table, in `[0, 4)`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub const ALL: [PlayerId; PLAYERS] = [PlayerId(0), PlayerId(1), PlayerId(2), PlayerId(3)];

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat `offset` places clockwise from this one
    pub fn offset(self, offset: usize) -> Self {
        Self(((self.index() + offset) % PLAYERS) as u8)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// Index into the engine's canonical intersection enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntersectionId(pub u8);

/// Index into the engine's canonical path enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathId(pub u8);

/// Index into the engine's canonical hex enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HexId(pub u8);

#[derive(
    EnumIter, EnumCount, FromRepr, VariantArray, Display, Clone, Copy, Debug, PartialEq, Eq, Hash,
)]
pub enum Resource {
    Lumber = 0,
    Brick = 1,
    Wool = 2,
    Grain = 3,
    Ore = 4,
}

#[derive(
    EnumIter, EnumCount, FromRepr, VariantArray, Display, Clone, Copy, Debug, PartialEq, Eq, Hash,
)]
pub enum DevelopmentCard {
    Knight = 0,
    YearOfPlenty = 1,
    RoadBuilding = 2,
    Monopoly = 3,
    VictoryPoint = 4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuildingKind {
    Settlement,
    City,
}

/// Anything a player can spend resources on
#[derive(Display, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Purchase {
    Road,
    Settlement,
    City,
    DevelopmentCard,
}

/// A card type that can be counted in a [`Hand`]
pub trait CardKind: Copy + IntoEnumIterator {
    fn index(self) -> usize;
}

impl CardKind for Resource {
    fn index(self) -> usize {
        self as usize
    }
}

impl CardKind for DevelopmentCard {
    fn index(self) -> usize {
        self as usize
    }
}

/// Per-type card counts held by one player
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hand<K> {
    counts: [u32; 5],
    kind: PhantomData<K>,
}

pub type ResourceHand = Hand<Resource>;
pub type DevelopmentHand = Hand<DevelopmentCard>;

impl<K: CardKind> Hand<K> {
    pub fn new() -> Self {
        Self {
            counts: [0; 5],
            kind: PhantomData,
        }
    }

    /// Builder-style single card type addition
    pub fn with(mut self, kind: K, amount: u32) -> Self {
        self[kind] += amount;
        self
    }

    pub fn counts(&self) -> [u32; 5] {
        self.counts
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Whether every count in `other` is covered by this hand
    pub fn covers(&self, other: &Self) -> bool {
        self.counts.iter().zip(other.counts).all(|(a, b)| *a >= b)
    }

    /// Card types with a non-zero count, in enumeration order
    pub fn held(&self) -> Vec<K> {
        K::iter().filter(|k| self[*k] > 0).collect()
    }
}

impl<K: CardKind> Default for Hand<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: CardKind> Index<K> for Hand<K> {
    type Output = u32;

    fn index(&self, index: K) -> &Self::Output {
        &self.counts[index.index()]
    }
}

impl<K: CardKind> IndexMut<K> for Hand<K> {
    fn index_mut(&mut self, index: K) -> &mut Self::Output {
        &mut self.counts[index.index()]
    }
}

impl<K> fmt::Debug for Hand<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Hand").field(&self.counts).finish()
    }
}

/// A resource exchange as signed per-resource deltas applied to the trading player
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Trade(pub [i32; 5]);

impl Trade {
    pub fn delta(&self, resource: Resource) -> i32 {
        self.0[resource as usize]
    }
}

/// Flags relaxing the engine's normal build rules
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    /// Skip paying the build cost
    pub free: bool,
    /// Require the build to connect to the player's road network
    pub ensure_connected: bool,
}

impl BuildOptions {
    /// A normal paid, connected build
    pub const PAID: Self = Self {
        free: false,
        ensure_connected: true,
    };

    /// A road granted by a development card
    pub const FREE: Self = Self {
        free: true,
        ensure_connected: true,
    };

    /// Starting placements, which are free and need not connect
    pub const SETUP: Self = Self {
        free: true,
        ensure_connected: false,
    };
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::PAID
    }
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum EngineError {
    #[error("Invalid placement location")]
    InvalidLocation,
    #[error("Player cannot afford a {0}")]
    CannotAfford(Purchase),
    #[error("Player does not hold a {0} card")]
    NoSuchCard(DevelopmentCard),
    #[error("No development cards left in the deck")]
    EmptyDeck,
    #[error("Player does not hold enough {0}")]
    InsufficientResources(Resource),
    #[error("Trade is not available to the player")]
    InvalidTrade,
    #[error("Road {road:?} does not touch intersection {settlement:?}")]
    DetachedRoad {
        settlement: IntersectionId,
        road: PathId,
    },
}

/// The capabilities the bridge needs from a Catan rules engine
///
/// Board positions are indices into the engine's canonical enumeration of the
/// standard board ([`INTERSECTIONS`] intersections, [`PATHS`] paths, [`HEXES`] hexes).
/// Every query that returns a candidate list must reflect the state after the most
/// recent mutation, and must return it in a stable order.
pub trait GameEngine {
    /// Create a new game on the standard board with no pieces placed
    fn standard() -> Self
    where
        Self: Sized;

    /// All hexes in canonical order
    fn hexes(&self) -> Vec<HexId>;

    fn robber(&self) -> HexId;

    fn set_robber(&mut self, hex: HexId);

    /// The owner and kind of the building on an intersection, if any
    fn building(&self, at: IntersectionId) -> Option<(PlayerId, BuildingKind)>;

    /// The owner of the road on a path, if any
    fn road(&self, at: PathId) -> Option<PlayerId>;

    /// Players with a building on a corner of `hex`
    fn players_on_hex(&self, hex: HexId) -> Vec<PlayerId>;

    /// The two intersections joined by a path
    fn path_ends(&self, at: PathId) -> [IntersectionId; 2];

    /// The fixed beginner-board opening in this engine's enumeration
    ///
    /// Placement `i` is one settlement and a road touching it. Settlements obey the
    /// distance rule among themselves.
    fn starting_placements(&self) -> [(IntersectionId, PathId); SETUP_PLACEMENTS];

    /// The resources produced by the hexes touching an intersection
    fn intersection_yield(&self, at: IntersectionId) -> ResourceHand;

    fn valid_settlement_coords(&self, player: PlayerId) -> Vec<IntersectionId>;

    fn valid_city_coords(&self, player: PlayerId) -> Vec<IntersectionId>;

    fn valid_road_coords(&self, player: PlayerId) -> Vec<PathId>;

    /// Trades (bank, harbor) the player could make right now
    fn possible_trades(&self, player: PlayerId) -> Vec<Trade>;

    fn resources(&self, player: PlayerId) -> ResourceHand;

    fn development_cards(&self, player: PlayerId) -> DevelopmentHand;

    fn knights_played(&self, player: PlayerId) -> u32;

    fn victory_points(&self, player: PlayerId) -> u32;

    fn can_afford(&self, player: PlayerId, purchase: Purchase) -> bool;

    fn build_settlement(
        &mut self,
        player: PlayerId,
        at: IntersectionId,
        options: BuildOptions,
    ) -> Result<(), EngineError>;

    fn upgrade_to_city(&mut self, player: PlayerId, at: IntersectionId) -> Result<(), EngineError>;

    fn build_road(
        &mut self,
        player: PlayerId,
        at: PathId,
        options: BuildOptions,
    ) -> Result<(), EngineError>;

    /// Consume a development card from the player's hand
    ///
    /// The card's effect beyond bookkeeping (knight count) is applied by the caller.
    fn play_development_card(
        &mut self,
        player: PlayerId,
        card: DevelopmentCard,
    ) -> Result<(), EngineError>;

    /// Pay for and draw a development card, returning the card drawn
    fn buy_development_card(&mut self, player: PlayerId) -> Result<DevelopmentCard, EngineError>;

    /// Distribute resources for a dice roll to every player
    fn add_yield_for_roll(&mut self, roll: u8);

    fn add_resources(&mut self, player: PlayerId, resources: &ResourceHand);

    fn remove_resources(
        &mut self,
        player: PlayerId,
        resources: &ResourceHand,
    ) -> Result<(), EngineError>;

    fn apply_trade(&mut self, player: PlayerId, trade: &Trade) -> Result<(), EngineError>;

    /// Draw one resource type uniformly among the types the player holds
    ///
    /// **Returns** `None` if the player holds no resources
    fn random_resource(&self, player: PlayerId, rng: &mut dyn RngCore) -> Option<Resource> {
        self.resources(player).held().choose(rng).copied()
    }
}
