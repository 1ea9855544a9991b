//! Exact rational helpers used by the collision engine.
//!
//! All physical quantities are `BigRational`s. Long runs rebound the
//! denominators of positions and velocities with [`limit_denominator`] so that
//! the cost of each step stays bounded.

use crate::error::{Error, Result};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Default bound applied to denominators after every step (2^32).
pub const DEFAULT_MAX_DENOMINATOR: u64 = 1 << 32;

/// Build an exact rational from an integer.
#[inline]
pub fn from_int(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

/// Closest rational to `x` whose denominator does not exceed `max_den`.
///
/// Walks the continued-fraction convergents of `x` until the next one would
/// exceed the bound, then picks whichever of the last convergent and the best
/// semiconvergent lies closer to `x` (the convergent wins ties).
///
/// Errors: `Error::InvalidParam` if `max_den < 1`.
pub fn limit_denominator(x: &BigRational, max_den: &BigInt) -> Result<BigRational> {
    if *max_den < BigInt::one() {
        return Err(Error::InvalidParam("max_denominator must be >= 1".into()));
    }
    if x.denom() <= max_den {
        return Ok(x.clone());
    }

    let (mut p0, mut q0) = (BigInt::zero(), BigInt::one());
    let (mut p1, mut q1) = (BigInt::one(), BigInt::zero());
    let mut n = x.numer().clone();
    let mut d = x.denom().clone();
    loop {
        let a = n.div_floor(&d);
        let q2 = &q0 + &a * &q1;
        if q2 > *max_den {
            break;
        }
        let p2 = &p0 + &a * &p1;
        p0 = std::mem::replace(&mut p1, p2);
        q0 = std::mem::replace(&mut q1, q2);
        let r = &n - &a * &d;
        n = std::mem::replace(&mut d, r);
    }

    // q1 >= 1 here: the first convergent always has denominator 1.
    let k = (max_den - &q0).div_floor(&q1);
    let semi = BigRational::new(&p0 + &k * &p1, &q0 + &k * &q1);
    let conv = BigRational::new(p1, q1);
    if (&conv - x).abs() <= (&semi - x).abs() {
        Ok(conv)
    } else {
        Ok(semi)
    }
}

/// Exact division that reports a zero divisor as a degenerate configuration.
#[inline]
pub fn checked_div(num: BigRational, den: &BigRational, what: &str) -> Result<BigRational> {
    if den.is_zero() {
        return Err(Error::Degenerate(format!("zero divisor in {what}")));
    }
    Ok(num / den)
}

/// Lossy conversion for diagnostics and exports; never fed back into the physics.
#[inline]
pub fn to_f64(x: &BigRational) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}
