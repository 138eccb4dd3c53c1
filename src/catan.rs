use log::{debug, error, info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    action::{Action, ActionVector},
    config::{EnvConfig, InvalidActionPolicy, OpponentMode},
    decoder::{ActionDecoder, Event, InvalidAction, Resolution, BUILD_SETTLEMENT},
    engine::{BuildOptions, EngineError, GameEngine, PlayerId, Purchase, PLAYERS},
    env::{Environment, Info, Report, Transition},
    observation::{Observation, ObservationEncoder, ObservationKind},
    policy::{Policy, RandomPolicy},
    reward::{RewardShaper, Standings},
    stage::Stage,
    turn::TurnState,
};

const REPORT_KEYS: [&str; 8] = [
    "reward", "steps", "invalid", "turns", "first", "second", "third", "fourth",
];

/// Policies for seats 1, 2 and 3
pub type Opponents = [Box<dyn Policy>; 3];

/// A four-player Catan episode exposed as a single-agent [`Environment`]
///
/// The caller always acts for the active seat. With [`OpponentMode::Policies`] that is
/// only ever seat 0, and every other seat is played out by its opponent policy inside
/// the same `step`.
///
/// ### Generics
/// - `G`: The [`GameEngine`] enforcing the rules
pub struct CatanEnv<G: GameEngine> {
    config: EnvConfig,
    engine: G,
    turn: TurnState,
    shaper: RewardShaper,
    rng: StdRng,
    opponents: Opponents,
    settlement_driver: Option<Box<dyn Policy>>,
    done: bool,
    truncated: bool,
    resets: u32,
    placements: [u32; 4],
    pub report: Report,
}

impl<G: GameEngine> CatanEnv<G> {
    /// Create an environment on an empty standard board; call [`Environment::reset`]
    /// before stepping
    ///
    /// Opponent seats default to seeded [`RandomPolicy`]s.
    pub fn new(config: EnvConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let opponents: Opponents = [(); 3].map(|_| {
            Box::new(RandomPolicy::seeded(rng.gen())) as Box<dyn Policy>
        });
        Self {
            shaper: RewardShaper::new(config.rewards, config.terminal_bonus),
            engine: G::standard(),
            turn: TurnState::new(),
            rng,
            opponents,
            settlement_driver: None,
            done: false,
            truncated: false,
            resets: 0,
            placements: [0; 4],
            report: Report::new(REPORT_KEYS.to_vec()),
            config,
        }
    }

    /// Replace the policies playing seats 1 to 3
    pub fn with_opponents(mut self, opponents: Opponents) -> Self {
        self.opponents = opponents;
        self
    }

    /// Set the policy that completes settlement-location actions
    pub fn with_settlement_driver(mut self, driver: impl Policy + 'static) -> Self {
        self.settlement_driver = Some(Box::new(driver));
        self
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn engine(&self) -> &G {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut G {
        &mut self.engine
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    /// Episodes that ended in first, second, third and fourth place for seat 0
    pub fn placements(&self) -> [u32; 4] {
        self.placements
    }

    /// The current observation for the caller
    pub fn observation(&self) -> Observation {
        self.observe(self.turn.active, self.config.observation)
    }

    fn observe(&self, observer: PlayerId, kind: ObservationKind) -> Observation {
        ObservationEncoder::new(&self.engine, observer, self.turn.stage).encode(kind)
    }

    /// Place the engine's fixed opening in snake order `0 1 2 3 3 2 1 0`
    ///
    /// The second placement of each seat yields its starting resources.
    fn place_starting_pieces(&mut self) -> Result<(), EngineError> {
        let placements = self.engine.starting_placements();
        let last = placements.len() - 1;
        for (i, (settlement, road)) in placements.into_iter().enumerate() {
            if !self.engine.path_ends(road).contains(&settlement) {
                return Err(EngineError::DetachedRoad { settlement, road });
            }
            let player = PlayerId(i.min(last - i) as u8);
            self.engine
                .build_settlement(player, settlement, BuildOptions::SETUP)?;
            self.engine.build_road(player, road, BuildOptions::SETUP)?;
            if i >= PLAYERS {
                let resources = self.engine.intersection_yield(settlement);
                self.engine.add_resources(player, &resources);
            }
        }
        Ok(())
    }

    /// Turn the caller's action into a vector, consulting the settlement driver if needed
    fn resolve_action(&mut self, action: Action) -> Result<ActionVector, InvalidAction> {
        match action {
            Action::Vector(vector) => Ok(vector),
            Action::Flat(index) => Ok(ActionVector::from_flat(index)),
            Action::Settlement(location) => self.drive_settlement(location),
        }
    }

    /// Ask the settlement driver for a full action and substitute the caller's location
    /// when the driver builds a settlement that is both legal and affordable
    fn drive_settlement(&mut self, location: u32) -> Result<ActionVector, InvalidAction> {
        let player = self.turn.active;
        let observation = self.observe(player, self.config.opponent_observation);
        let driver = self
            .settlement_driver
            .as_mut()
            .ok_or(InvalidAction::NoSettlementDriver)?;
        let mut action = driver.act(&observation);
        if action.primary == BUILD_SETTLEMENT
            && !self.engine.valid_settlement_coords(player).is_empty()
            && self.engine.can_afford(player, Purchase::Settlement)
        {
            action.secondary = location;
        }
        Ok(action)
    }

    /// Resolve one action for the active seat
    ///
    /// **Returns** `(reward, valid)`
    fn play(&mut self, action: ActionVector, on_invalid: InvalidActionPolicy) -> (f32, bool) {
        let stage = self.turn.stage;
        let decoded = ActionDecoder::new(&mut self.engine, &mut self.turn, &mut self.rng)
            .decode(action);
        let outcome = decoded.and_then(|resolution| {
            if let Some(next) = resolution.next {
                self.turn.advance(next)?;
            }
            Ok(resolution)
        });
        match outcome {
            Ok(resolution) => (self.apply(resolution), true),
            Err(reason) => (self.reject(stage, action, reason, on_invalid), false),
        }
    }

    fn apply(&mut self, resolution: Resolution) -> f32 {
        for event in &resolution.events {
            debug!("{}: {event:?}", self.turn.active);
        }
        let mut reward = self.shaper.events(&resolution.events);
        if resolution.pass {
            reward += self.pass_turn();
        }
        reward
    }

    fn reject(
        &mut self,
        stage: Stage,
        action: ActionVector,
        reason: InvalidAction,
        on_invalid: InvalidActionPolicy,
    ) -> f32 {
        warn!(
            "{} made an invalid action {action:?} in stage {stage}: {reason}",
            self.turn.active
        );
        let mut reward = self.shaper.invalid();
        if on_invalid == InvalidActionPolicy::ForcePass {
            reward += self.pass_turn();
        }
        reward
    }

    fn pass_turn(&mut self) -> f32 {
        debug!("{}: {:?}", self.turn.active, Event::Passed);
        if self.turn.pass() {
            debug!("Turn {} begins", self.turn.turns);
        }
        self.shaper.event(&Event::Passed)
    }

    /// Mark the episode done if someone won or the turn limit was hit
    fn check_end(&mut self) {
        if Standings::of(&self.engine).max() >= self.config.victory_points {
            self.done = true;
        } else if self
            .config
            .max_turns
            .is_some_and(|limit| self.turn.turns >= limit)
        {
            self.done = true;
            self.truncated = true;
        }
    }

    /// Let the opponent policies act until seat 0 is active again or the episode ends
    fn drive_opponents(&mut self) {
        while self.turn.active != PlayerId(0) && !self.done {
            let seat = self.turn.active;
            let observation = self.observe(seat, self.config.opponent_observation);
            let action = self.opponents[seat.index() - 1].act(&observation);
            self.play(action, InvalidActionPolicy::ForcePass);
            self.check_end();
        }
    }

    /// The seat whose result sums up an episode: seat 0 against opponent policies,
    /// the leader in self-play
    fn reported_seat(&self, standings: &Standings) -> PlayerId {
        match self.config.opponents {
            OpponentMode::Policies => PlayerId(0),
            OpponentMode::SelfPlay => standings.leader(),
        }
    }

    /// Terminal bonus for seat 0, plus bookkeeping of how the episode ended
    fn finish(&mut self) -> f32 {
        self.report
            .entry("turns")
            .and_modify(|x| *x = self.turn.turns as f64);
        if self.truncated {
            info!("Truncated after {} turns", self.turn.turns);
            return 0.0;
        }

        let standings = Standings::of(&self.engine);
        let seat = self.reported_seat(&standings);
        info!(
            "Done in {} turns, {seat} earned {} points, in place {}!",
            self.turn.turns,
            standings.points(seat),
            standings.rank(seat),
        );
        let rank = standings.rank(PlayerId(0));
        if self.config.opponents == OpponentMode::Policies {
            let key = REPORT_KEYS[4 + rank as usize - 1];
            self.report.add(key, 1.0);
            self.placements[rank as usize - 1] += 1;
        }
        self.shaper.terminal(&standings, self.turn.turns)
    }
}

impl<G: GameEngine> Environment for CatanEnv<G> {
    type State = Observation;
    type Action = Action;
    type Error = EngineError;

    fn is_active(&self) -> bool {
        !self.done
    }

    fn random_action(&mut self) -> Self::Action {
        self.config.action_space.sample(&mut self.rng)
    }

    fn step(&mut self, action: Self::Action) -> Transition<Self::State> {
        if self.done {
            return Transition {
                state: self.observation(),
                reward: 0.0,
                done: true,
                info: Info {
                    truncated: self.truncated,
                },
            };
        }

        let stage = self.turn.stage;
        let on_invalid = self.config.invalid_action;
        let (mut reward, valid) = match self.resolve_action(action) {
            Ok(vector) => self.play(vector, on_invalid),
            Err(reason) => {
                let vector = ActionVector::PASS;
                (self.reject(stage, vector, reason, on_invalid), false)
            }
        };
        self.check_end();

        if self.config.opponents == OpponentMode::Policies {
            self.drive_opponents();
        }
        if self.done {
            reward += self.finish();
        }

        self.report.add("steps", 1.0);
        self.report.add("reward", reward as f64);
        if !valid {
            self.report.add("invalid", 1.0);
        }

        Transition {
            state: self.observation(),
            reward,
            done: self.done,
            info: Info {
                truncated: self.truncated,
            },
        }
    }

    fn reset(&mut self) -> Result<Self::State, Self::Error> {
        self.engine = G::standard();
        self.turn = TurnState::new();
        self.done = false;
        self.truncated = false;

        self.resets += 1;
        info!("Reset {} times", self.resets);
        if self.config.opponents == OpponentMode::Policies && self.resets % 10 == 0 {
            let [first, second, third, fourth] = self.placements;
            info!(
                "{first} first place, {second} second place, {third} third place, {fourth} fourth place"
            );
        }

        if let Err(err) = self.place_starting_pieces() {
            error!("Starting placement failed: {err}");
            return Err(err);
        }
        Ok(self.observation())
    }
}
