use crate::error::{Error, Result};
use num_rational::BigRational;
use num_traits::Signed;

/// A rigid block sliding on the frictionless half-line `x >= 0`.
///
/// Fields:
/// - `mass`: block mass (> 0), fixed for the lifetime of a run
/// - `velocity`: signed velocity, negative means moving toward the wall
/// - `position`: distance from the wall
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    mass: BigRational,
    /// Signed velocity.
    pub velocity: BigRational,
    /// Position on the half-line.
    pub position: BigRational,
}

impl Body {
    /// Create a new body after validating its mass.
    ///
    /// Errors:
    /// - `Error::Degenerate` if `mass` is zero or negative.
    pub fn new(mass: BigRational, velocity: BigRational, position: BigRational) -> Result<Self> {
        if !mass.is_positive() {
            return Err(Error::Degenerate(format!("mass must be > 0, got {mass}")));
        }
        Ok(Self {
            mass,
            velocity,
            position,
        })
    }

    /// Block mass.
    #[inline]
    pub fn mass(&self) -> &BigRational {
        &self.mass
    }

    /// Linear momentum `m v`.
    #[inline]
    pub fn momentum(&self) -> BigRational {
        &self.mass * &self.velocity
    }

    /// Kinetic energy `1/2 m v^2`, exact.
    #[inline]
    pub fn kinetic_energy(&self) -> BigRational {
        &self.mass * &self.velocity * &self.velocity / BigRational::from_integer(2.into())
    }

    /// Drift the body for `dt` at constant velocity.
    #[inline]
    pub fn advance(&mut self, dt: &BigRational) {
        self.position += &self.velocity * dt;
    }
}
