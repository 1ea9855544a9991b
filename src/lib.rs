//! Event-driven simulation of two elastic blocks and a wall.
//!
//! A small block sits between a wall at `x = 0` and a large block. Counting
//! every block-block and block-wall collision with a unit small mass and a
//! large mass of `100^n` yields the first `n + 1` digits of pi. All state is
//! kept as exact rationals; long runs bound denominators after every step.
//!
//! ```no_run
//! use blockpi::core::{Simulation, SimConfig};
//!
//! let mut sim = Simulation::from_config(&SimConfig::for_digits(2))?;
//! assert_eq!(sim.run()?, 314);
//! # Ok::<(), blockpi::error::Error>(())
//! ```

pub mod core;
pub mod error;

#[cfg(feature = "python")]
mod python;

pub use crate::core::{simulate, Body, CollisionEvent, CollisionKind, SimConfig, Simulation};
pub use crate::error::{Error, Result};

/// Collision count for a unit small mass against a large mass of `100^digits`,
/// i.e. `floor(pi * 10^digits)`.
pub fn count_for_digits(digits: u32) -> Result<u64> {
    Simulation::from_config(&SimConfig::for_digits(digits))?.run()
}
