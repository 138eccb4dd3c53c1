use rand::Rng;

/// Size of the `primary` field
pub const PRIMARY: u32 = 10;
/// Size of the `secondary` field
pub const SECONDARY: u32 = 25;
/// Size of the `tertiary` field
pub const TERTIARY: u32 = 54;
/// Size of the flattened action space
pub const FLAT: u32 = PRIMARY * SECONDARY * TERTIARY;
/// Size of the settlement-location action space
pub const SETTLEMENT_LOCATIONS: u32 = 54;

/// The fixed-width action submitted by an agent
///
/// `primary` picks an action category for the current stage. `secondary` and
/// `tertiary` are raw indices taken modulo whatever candidate set the category needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ActionVector {
    pub primary: u32,
    pub secondary: u32,
    pub tertiary: u32,
}

impl ActionVector {
    pub const PASS: Self = Self::new(0, 0, 0);

    pub const fn new(primary: u32, secondary: u32, tertiary: u32) -> Self {
        Self {
            primary,
            secondary,
            tertiary,
        }
    }

    /// Decode a flat index in `[0, FLAT)`
    pub const fn from_flat(index: u32) -> Self {
        Self {
            primary: index / (TERTIARY * SECONDARY),
            secondary: (index / TERTIARY) % SECONDARY,
            tertiary: index % TERTIARY,
        }
    }

    /// Inverse of [`ActionVector::from_flat`] for vectors inside the declared ranges
    pub const fn to_flat(self) -> u32 {
        (self.primary * SECONDARY + self.secondary) * TERTIARY + self.tertiary
    }

    /// Sample every field uniformly from its declared range
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(
            rng.gen_range(0..PRIMARY),
            rng.gen_range(0..SECONDARY),
            rng.gen_range(0..TERTIARY),
        )
    }

    /// Whether every field lies in its declared range
    pub const fn in_range(&self) -> bool {
        self.primary < PRIMARY && self.secondary < SECONDARY && self.tertiary < TERTIARY
    }
}

impl From<[u32; 3]> for ActionVector {
    fn from([primary, secondary, tertiary]: [u32; 3]) -> Self {
        Self::new(primary, secondary, tertiary)
    }
}

/// An action in any of the supported action-space shapes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Vector(ActionVector),
    /// Flat index decoded with [`ActionVector::from_flat`]
    Flat(u32),
    /// A settlement location; the rest of the vector is chosen by a fixed policy
    Settlement(u32),
}

impl From<ActionVector> for Action {
    fn from(value: ActionVector) -> Self {
        Self::Vector(value)
    }
}

/// The shape of the action surface exposed to the learning agent
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ActionSpace {
    /// Three independent discrete fields `[10, 25, 54]`
    #[default]
    MultiDiscrete,
    /// One discrete field of size `10 * 25 * 54`
    Discrete,
    /// One discrete field of size 54 selecting a settlement location
    SettlementOnly,
}

impl ActionSpace {
    /// Number of distinct actions
    pub const fn size(self) -> u32 {
        match self {
            ActionSpace::MultiDiscrete | ActionSpace::Discrete => FLAT,
            ActionSpace::SettlementOnly => SETTLEMENT_LOCATIONS,
        }
    }

    /// Per-field sizes
    pub fn nvec(self) -> Vec<u32> {
        match self {
            ActionSpace::MultiDiscrete => vec![PRIMARY, SECONDARY, TERTIARY],
            ActionSpace::Discrete => vec![FLAT],
            ActionSpace::SettlementOnly => vec![SETTLEMENT_LOCATIONS],
        }
    }

    /// Sample an action uniformly
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> Action {
        match self {
            ActionSpace::MultiDiscrete => Action::Vector(ActionVector::sample(rng)),
            ActionSpace::Discrete => Action::Flat(rng.gen_range(0..FLAT)),
            ActionSpace::SettlementOnly => {
                Action::Settlement(rng.gen_range(0..SETTLEMENT_LOCATIONS))
            }
        }
    }

    /// Whether `action` has this space's shape and lies inside it
    pub fn contains(self, action: &Action) -> bool {
        match (self, action) {
            (ActionSpace::MultiDiscrete, Action::Vector(v)) => v.in_range(),
            (ActionSpace::Discrete, Action::Flat(i)) => *i < FLAT,
            (ActionSpace::SettlementOnly, Action::Settlement(loc)) => *loc < SETTLEMENT_LOCATIONS,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn flat_decoding() {
        assert_eq!(ActionVector::from_flat(0), ActionVector::PASS);
        assert_eq!(ActionVector::from_flat(53), ActionVector::new(0, 0, 53));
        assert_eq!(ActionVector::from_flat(54), ActionVector::new(0, 1, 0));
        assert_eq!(ActionVector::from_flat(54 * 25), ActionVector::new(1, 0, 0));
        assert_eq!(
            ActionVector::from_flat(FLAT - 1),
            ActionVector::new(9, 24, 53),
            "last index decodes to the maximal vector"
        );
        assert_eq!(ActionVector::new(6, 13, 40).to_flat(), 6 * 1350 + 13 * 54 + 40);
    }

    #[test]
    fn vector_ranges() {
        assert!(ActionVector::new(9, 24, 53).in_range());
        assert!(!ActionVector::new(10, 0, 0).in_range());
        assert!(!ActionVector::new(0, 0, 54).in_range());
    }

    #[test]
    fn sampled_actions_are_contained() {
        let mut rng = StdRng::seed_from_u64(3);
        for space in [
            ActionSpace::MultiDiscrete,
            ActionSpace::Discrete,
            ActionSpace::SettlementOnly,
        ] {
            for _ in 0..100 {
                let action = space.sample(&mut rng);
                assert!(space.contains(&action), "{space:?} sampled {action:?}");
            }
        }
        assert!(!ActionSpace::Discrete.contains(&Action::Vector(ActionVector::PASS)));
        assert_eq!(ActionSpace::MultiDiscrete.nvec(), [10, 25, 54]);
        assert_eq!(ActionSpace::Discrete.size(), 13_500);
    }
}
