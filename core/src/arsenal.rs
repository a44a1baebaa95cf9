//! Static weapon descriptors and the streak multiplier.

use std::{f32::consts::PI, time::Duration};

use serde::{Deserialize, Serialize};

const SHOTGUN_HALF_SPREAD: f32 = PI / 24.0;

const LONG_RAY: RayProfile = RayProfile::new(16.0, 0.05);
const SHORT_RAY: RayProfile = RayProfile::new(8.0, 0.1);

/// Weapons available to the player, ordered by slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Unlimited sidearm whose fire rate accelerates while it keeps hitting.
    Pistol,
    /// Short-range spread weapon firing several pellets per shot.
    Shotgun,
    /// Long-range weapon whose rounds pass through hostiles.
    Rifle,
}

impl WeaponKind {
    /// Every weapon in slot order.
    pub const ALL: [WeaponKind; 3] = [Self::Pistol, Self::Shotgun, Self::Rifle];

    /// Resolves a one-based slot number into a weapon.
    #[must_use]
    pub const fn from_slot(slot: u8) -> Option<Self> {
        match slot {
            1 => Some(Self::Pistol),
            2 => Some(Self::Shotgun),
            3 => Some(Self::Rifle),
            _ => None,
        }
    }

    /// Static descriptor of the weapon.
    #[must_use]
    pub const fn spec(self) -> WeaponSpec {
        match self {
            Self::Pistol => WeaponSpec {
                name: "Pistol",
                damage: 25.0,
                fire_interval: Duration::from_millis(500),
                capacity: None,
                pattern: FirePattern::Single,
                ray: LONG_RAY,
                acceleration: Some(FireAcceleration {
                    decrement: Duration::from_millis(50),
                    floor: Duration::from_millis(100),
                }),
            },
            Self::Shotgun => WeaponSpec {
                name: "Shotgun",
                damage: 10.0,
                fire_interval: Duration::from_millis(1000),
                capacity: Some(20),
                pattern: FirePattern::Spread {
                    pellets: 7,
                    half_spread: SHOTGUN_HALF_SPREAD,
                },
                ray: SHORT_RAY,
                acceleration: None,
            },
            Self::Rifle => WeaponSpec {
                name: "Rifle",
                damage: 35.0,
                fire_interval: Duration::from_millis(300),
                capacity: Some(30),
                pattern: FirePattern::Penetrating,
                ray: LONG_RAY,
                acceleration: None,
            },
        }
    }
}

/// Immutable description of a weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponSpec {
    /// Display name.
    pub name: &'static str,
    /// Damage dealt by each ray before the streak multiplier.
    pub damage: f32,
    /// Interval between automatic shots while the trigger is held.
    pub fire_interval: Duration,
    /// Maximum rounds, or `None` for unlimited ammunition.
    pub capacity: Option<u32>,
    /// How the weapon spreads its rays.
    pub pattern: FirePattern,
    /// Range and sampling resolution of each ray.
    pub ray: RayProfile,
    /// Fire interval adaptation applied on hits, if any.
    pub acceleration: Option<FireAcceleration>,
}

impl WeaponSpec {
    /// Ammunition carried by a freshly issued weapon.
    #[must_use]
    pub const fn full_ammo(&self) -> AmmoCount {
        match self.capacity {
            Some(rounds) => AmmoCount::Rounds(rounds),
            None => AmmoCount::Unlimited,
        }
    }
}

/// Ray layout produced by a single discharge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FirePattern {
    /// One ray along the exact facing that stops at the first hostile.
    Single,
    /// Several rays perturbed within a cone, each stopping at its first hostile.
    Spread {
        /// Number of rays per discharge.
        pellets: u32,
        /// Maximum deviation from the facing, in radians.
        half_spread: f32,
    },
    /// One ray along the exact facing that continues through hostiles.
    Penetrating,
}

/// Range and sampling step of a hit-scan ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayProfile {
    /// Maximum distance travelled, in tiles.
    pub range: f32,
    /// Distance between successive samples, in tiles.
    pub step: f32,
}

impl RayProfile {
    /// Creates a new ray profile.
    #[must_use]
    pub const fn new(range: f32, step: f32) -> Self {
        Self { range, step }
    }
}

/// Fire interval reduction applied after every hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FireAcceleration {
    /// Amount removed from the interval per hit.
    pub decrement: Duration,
    /// Shortest interval the weapon can reach.
    pub floor: Duration,
}

impl FireAcceleration {
    /// Interval that follows a hit fired at `current`.
    #[must_use]
    pub fn accelerate(&self, current: Duration) -> Duration {
        current.saturating_sub(self.decrement).max(self.floor)
    }
}

/// Ammunition loaded in a weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmmoCount {
    /// The weapon never runs dry.
    Unlimited,
    /// Rounds left in the weapon.
    Rounds(u32),
}

impl AmmoCount {
    /// Reports whether a shot can be fired.
    #[must_use]
    pub const fn can_fire(&self) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Rounds(rounds) => *rounds > 0,
        }
    }

    /// Ammunition left after firing one shot.
    #[must_use]
    pub const fn spent(self) -> Self {
        match self {
            Self::Unlimited => Self::Unlimited,
            Self::Rounds(rounds) => Self::Rounds(rounds.saturating_sub(1)),
        }
    }
}

/// Damage and score multiplier built up by consecutive kills.
///
/// The value is tracked in exact tenths so that resets always land on 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StreakMultiplier {
    tenths: u32,
}

impl StreakMultiplier {
    /// Multiplier of exactly 1.0.
    pub const BASE: Self = Self { tenths: 10 };

    /// Creates a multiplier from a number of tenths, never below 1.0.
    #[must_use]
    pub const fn from_tenths(tenths: u32) -> Self {
        if tenths < Self::BASE.tenths {
            Self::BASE
        } else {
            Self { tenths }
        }
    }

    /// Number of tenths represented by the multiplier.
    #[must_use]
    pub const fn tenths(&self) -> u32 {
        self.tenths
    }

    /// Multiplier as a floating point factor.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.tenths as f32 / 10.0
    }

    /// Multiplier after one more kill.
    #[must_use]
    pub const fn bumped(self) -> Self {
        Self {
            tenths: self.tenths.saturating_add(1),
        }
    }

    /// Score awarded for a kill at this multiplier, `floor(100 × multiplier)`.
    #[must_use]
    pub const fn kill_score(&self) -> u64 {
        self.tenths as u64 * 10
    }
}

impl Default for StreakMultiplier {
    fn default() -> Self {
        Self::BASE
    }
}
