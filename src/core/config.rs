use crate::core::body::Body;
use crate::core::rational::{from_int, DEFAULT_MAX_DENOMINATOR};
use crate::error::Result;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Signed;

/// Initial conditions and numeric policy for one simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Mass of the block nearer the wall.
    pub mass_small: BigRational,
    /// Mass of the outer block.
    pub mass_large: BigRational,
    pub velocity_small: BigRational,
    pub velocity_large: BigRational,
    /// Distance of the small block from the wall.
    pub position_small: BigRational,
    pub position_large: BigRational,
    /// Bound applied to denominators after every step; `None` keeps every
    /// value exact for the whole run.
    pub max_denominator: Option<BigInt>,
    /// Record a `CollisionEvent` for every realized collision.
    pub record_trace: bool,
}

impl SimConfig {
    /// Unit mass at rest at x = 1, mass 10000 at x = 2 moving left at 1, bound 2^32.
    pub fn new() -> Self {
        Self {
            mass_small: from_int(1),
            mass_large: from_int(10_000),
            velocity_small: from_int(0),
            velocity_large: from_int(-1),
            position_small: from_int(1),
            position_large: from_int(2),
            max_denominator: Some(BigInt::from(DEFAULT_MAX_DENOMINATOR)),
            record_trace: false,
        }
    }

    /// Build from the integer input contract: masses, velocities, positions of
    /// the small and large blocks. Masses are forced positive.
    pub fn from_integers(
        mass_small: i64,
        mass_large: i64,
        velocity_small: i64,
        velocity_large: i64,
        position_small: i64,
        position_large: i64,
    ) -> Self {
        Self {
            mass_small: from_int(mass_small).abs(),
            mass_large: from_int(mass_large).abs(),
            velocity_small: from_int(velocity_small),
            velocity_large: from_int(velocity_large),
            position_small: from_int(position_small),
            position_large: from_int(position_large),
            ..Self::new()
        }
    }

    /// Unit small mass against a large mass of `100^digits`; the resulting
    /// collision count is the first `digits + 1` digits of pi.
    pub fn for_digits(digits: u32) -> Self {
        Self {
            mass_large: BigRational::from_integer(BigInt::from(100).pow(digits)),
            ..Self::new()
        }
    }

    /// Replace the denominator bound (`None` = fully exact arithmetic).
    pub fn with_max_denominator(mut self, bound: Option<u64>) -> Self {
        self.max_denominator = bound.map(BigInt::from);
        self
    }

    /// Enable or disable the per-collision trace.
    pub fn with_trace(mut self, record: bool) -> Self {
        self.record_trace = record;
        self
    }

    /// Validated `(small, large)` bodies for this configuration.
    pub fn bodies(&self) -> Result<(Body, Body)> {
        let small = Body::new(
            self.mass_small.clone(),
            self.velocity_small.clone(),
            self.position_small.clone(),
        )?;
        let large = Body::new(
            self.mass_large.clone(),
            self.velocity_large.clone(),
            self.position_large.clone(),
        )?;
        Ok((small, large))
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}
