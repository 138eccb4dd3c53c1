use crate::{
    decoder::Event,
    engine::{DevelopmentCard, GameEngine, PlayerId, PLAYERS},
};

/// Base rewards for each kind of outcome
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RewardTable {
    pub settlement: f32,
    pub city: f32,
    pub road: f32,
    /// A purchased development card that turns out to be a victory point
    pub victory_point_card: f32,
    pub invalid: f32,
    pub pass: f32,
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            settlement: 100.0,
            city: 100.0,
            road: 10.0,
            victory_point_card: 10.0,
            invalid: -3.0,
            pass: -30.0,
        }
    }
}

/// How the end of an episode is rewarded
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TerminalBonus {
    /// `floor(numerator / turns)`, paid whenever the episode ends with a winner
    InverseTurns { numerator: f32 },
    /// `per_place * place`, plus `winner_numerator / turns` if seat 0 placed first
    Placement {
        per_place: f32,
        winner_numerator: f32,
    },
}

impl Default for TerminalBonus {
    fn default() -> Self {
        Self::InverseTurns { numerator: 10_000.0 }
    }
}

/// Victory points of every seat at one instant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Standings {
    points: [u32; PLAYERS],
}

impl Standings {
    pub fn new(points: [u32; PLAYERS]) -> Self {
        Self { points }
    }

    pub fn of<G: GameEngine>(engine: &G) -> Self {
        Self::new(PlayerId::ALL.map(|p| engine.victory_points(p)))
    }

    pub fn points(&self, player: PlayerId) -> u32 {
        self.points[player.index()]
    }

    pub fn max(&self) -> u32 {
        self.points.iter().copied().max().unwrap_or(0)
    }

    /// The lowest seat holding the most points
    pub fn leader(&self) -> PlayerId {
        let max = self.max();
        PlayerId::ALL
            .into_iter()
            .find(|p| self.points(*p) == max)
            .unwrap_or_default()
    }

    /// Number of seats with strictly fewer points than `player` (3 = sole leader)
    pub fn place(&self, player: PlayerId) -> u32 {
        let own = self.points(player);
        self.points.iter().filter(|p| **p < own).count() as u32
    }

    /// Finishing position counting from 1 for the leader
    pub fn rank(&self, player: PlayerId) -> u32 {
        PLAYERS as u32 - self.place(player)
    }
}

/// Turns resolved outcomes into scalar rewards
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RewardShaper {
    table: RewardTable,
    bonus: TerminalBonus,
}

impl RewardShaper {
    pub fn new(table: RewardTable, bonus: TerminalBonus) -> Self {
        Self { table, bonus }
    }

    pub fn event(&self, event: &Event) -> f32 {
        match event {
            Event::BuiltSettlement(_) => self.table.settlement,
            Event::BuiltCity(_) => self.table.city,
            Event::BuiltRoad(_) => self.table.road,
            Event::BoughtCard(DevelopmentCard::VictoryPoint) => self.table.victory_point_card,
            Event::Passed => self.table.pass,
            _ => 0.0,
        }
    }

    /// Sum of the rewards for every event of one resolution
    pub fn events<'e>(&self, events: impl IntoIterator<Item = &'e Event>) -> f32 {
        events.into_iter().map(|e| self.event(e)).sum()
    }

    pub fn invalid(&self) -> f32 {
        self.table.invalid
    }

    /// Bonus for the episode ending after `turns` rounds, seen from seat 0
    pub fn terminal(&self, standings: &Standings, turns: u32) -> f32 {
        let turns = turns.max(1) as f32;
        match self.bonus {
            TerminalBonus::InverseTurns { numerator } => (numerator / turns).floor(),
            TerminalBonus::Placement {
                per_place,
                winner_numerator,
            } => {
                let place = standings.place(PlayerId(0));
                let mut bonus = per_place * place as f32;
                if place == PLAYERS as u32 - 1 {
                    bonus += winner_numerator / turns;
                }
                bonus
            }
        }
    }
}
