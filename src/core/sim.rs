use crate::core::rational::{checked_div, limit_denominator, DEFAULT_MAX_DENOMINATOR};
use crate::core::{Body, CollisionEvent, CollisionKind, SimConfig};
use crate::error::{Error, Result};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use tracing::{debug, trace};

/// Time until the next collision of the two-block system, or `None` when no
/// further collision is reachable.
///
/// `small` is the block nearer the wall (`0 <= small.position <= large.position`).
/// Equal candidate times for the wall and the other block resolve to the same
/// instant, which `update_velocities` then treats as a simultaneous collision.
///
/// Errors: `Error::Degenerate` on a zero divisor (unreachable for canonical states).
pub fn time_to_next_collision(small: &Body, large: &Body) -> Result<Option<BigRational>> {
    let zero = BigRational::zero();
    let (vs, vl) = (&small.velocity, &large.velocity);
    let (xs, xl) = (&small.position, &large.position);

    // Separating, and the small block is not heading back to the wall.
    if vl >= vs && *vs >= zero {
        return Ok(None);
    }

    // Closing in on each other (one of them possibly at rest).
    if *vs >= zero && zero >= *vl {
        return checked_div(xl - xs, &(vs - vl), "block-block collision time").map(Some);
    }

    // Small block reaches the wall before the large one can catch it.
    if (*vl >= zero && zero > *vs) || (vs <= vl && *vl < zero) {
        return checked_div(-xs, vs, "wall collision time").map(Some);
    }

    // Both moving right with the small block faster: only the chase remains.
    if vs.is_positive() {
        return checked_div(xl - xs, &(vs - vl), "block-block collision time").map(Some);
    }

    // Small block sits at the wall.
    if xs.is_zero() {
        // Pressed into the wall: it bounces right now.
        if vs.is_negative() {
            return Ok(Some(zero));
        }
        let speed = vs.abs();
        if *vl >= speed {
            return Ok(None);
        }
        let closing = speed - vl;
        return checked_div(xl.clone(), &closing, "block-block collision time").map(Some);
    }

    // Both moving left, large block faster: whichever comes first.
    let to_wall = checked_div(-xs, vs, "wall collision time")?;
    let to_catch = checked_div(xl - xs, &(vs - vl), "block-block collision time")?;
    Ok(Some(to_wall.min(to_catch)))
}

/// Apply the velocity update for the contact the blocks are currently in.
///
/// Returns the kind of collision resolved, or `None` (and leaves the velocities
/// untouched) if the blocks are neither touching each other nor the wall.
///
/// Errors: `Error::Degenerate` if the total mass is zero.
pub fn update_velocities(small: &mut Body, large: &mut Body) -> Result<Option<CollisionKind>> {
    let at_wall = small.position.is_zero();
    let touching = small.position == large.position;

    let kind = match (touching, at_wall) {
        (true, false) => {
            let (ms, ml) = (small.mass().clone(), large.mass().clone());
            let total = &ms + &ml;
            let two = BigRational::from_integer(BigInt::from(2));
            let vs = small.velocity.clone();
            let vl = large.velocity.clone();

            let vs_new = checked_div(
                &two * &ml * &vl + (&ms - &ml) * &vs,
                &total,
                "elastic velocity update",
            )?;
            let vl_new = checked_div(
                &two * &ms * &vs + (&ml - &ms) * &vl,
                &total,
                "elastic velocity update",
            )?;
            small.velocity = vs_new;
            large.velocity = vl_new;
            CollisionKind::Bodies
        }
        (false, true) => {
            small.velocity = -&small.velocity;
            CollisionKind::Wall
        }
        (true, true) => {
            small.velocity = -&small.velocity;
            large.velocity = -&large.velocity;
            CollisionKind::WallAndBodies
        }
        (false, false) => return Ok(None),
    };
    Ok(Some(kind))
}

/// Event-driven simulation of two blocks and a wall at x = 0.
///
/// Each step jumps straight to the next collision, resolves it exactly and,
/// when a denominator bound is configured, rebounds positions, velocities and
/// the clock so the cost per step stays bounded.
#[derive(Debug)]
pub struct Simulation {
    time_now: BigRational,
    small: Body,
    large: Body,
    collision_count: u64,
    steps: u64,
    max_denominator: Option<BigInt>,
    trace: Option<Vec<CollisionEvent>>,
    finished: bool,
}

impl Simulation {
    /// Create a simulation from two validated bodies.
    ///
    /// - `max_denominator`: bound applied after every step, `None` for fully exact runs
    /// - `record_trace`: keep a `CollisionEvent` for every collision
    ///
    /// Errors: `Error::InvalidParam` if `max_denominator < 1`.
    pub fn new(
        small: Body,
        large: Body,
        max_denominator: Option<BigInt>,
        record_trace: bool,
    ) -> Result<Self> {
        if let Some(bound) = &max_denominator {
            if *bound < BigInt::one() {
                return Err(Error::InvalidParam(format!(
                    "max_denominator must be >= 1, got {bound}"
                )));
            }
        }
        Ok(Self {
            time_now: BigRational::zero(),
            small,
            large,
            collision_count: 0,
            steps: 0,
            max_denominator,
            trace: record_trace.then(Vec::new),
            finished: false,
        })
    }

    /// Create a simulation from a configuration's bodies and numeric policy.
    pub fn from_config(config: &SimConfig) -> Result<Self> {
        let (small, large) = config.bodies()?;
        Self::new(
            small,
            large,
            config.max_denominator.clone(),
            config.record_trace,
        )
    }

    /// Total collisions realized so far.
    pub fn collision_count(&self) -> u64 {
        self.collision_count
    }

    /// Number of processed events (a simultaneous collision is one event).
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Current simulation time.
    pub fn time(&self) -> &BigRational {
        &self.time_now
    }

    /// Block nearer the wall.
    pub fn small(&self) -> &Body {
        &self.small
    }

    /// Outer block.
    pub fn large(&self) -> &Body {
        &self.large
    }

    /// True once no further collision is reachable.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Recorded events, empty unless tracing was enabled.
    pub fn trace(&self) -> &[CollisionEvent] {
        self.trace.as_deref().unwrap_or(&[])
    }

    /// Total momentum `m_s v_s + m_l v_l`.
    pub fn total_momentum(&self) -> BigRational {
        self.small.momentum() + self.large.momentum()
    }

    /// Total kinetic energy of both blocks.
    pub fn total_kinetic_energy(&self) -> BigRational {
        self.small.kinetic_energy() + self.large.kinetic_energy()
    }

    /// Advance to the next collision and resolve it.
    ///
    /// Returns `Ok(None)` once no collision is reachable; further calls keep
    /// returning `Ok(None)`.
    pub fn step(&mut self) -> Result<Option<CollisionEvent>> {
        if self.finished {
            return Ok(None);
        }
        let Some(dt) = time_to_next_collision(&self.small, &self.large)? else {
            self.finished = true;
            debug!(
                collisions = self.collision_count,
                steps = self.steps,
                time = %self.time_now,
                "no further collision reachable"
            );
            return Ok(None);
        };

        let (small, large, kind) = self.resolve_after(&dt)?;
        self.small = small;
        self.large = large;
        self.time_now += &dt;
        self.collision_count += kind.count();
        self.steps += 1;
        self.rebound()?;

        let event = CollisionEvent {
            kind,
            time: self.time_now.clone(),
            count: self.collision_count,
            small_position: self.small.position.clone(),
            large_position: self.large.position.clone(),
            small_velocity: self.small.velocity.clone(),
            large_velocity: self.large.velocity.clone(),
        };
        trace!(?kind, count = self.collision_count, time = %event.time, "collision");
        if let Some(log) = &mut self.trace {
            log.push(event.clone());
        }
        Ok(Some(event))
    }

    /// Run until no further collision is reachable and return the total count.
    pub fn run(&mut self) -> Result<u64> {
        debug!(
            mass_small = %self.small.mass(),
            mass_large = %self.large.mass(),
            max_denominator = ?self.max_denominator,
            "starting collision run"
        );
        while self.step()?.is_some() {}
        Ok(self.collision_count)
    }

    // ============ Internal helpers ============

    /// Post-collision bodies after drifting both by `dt`; leaves `self` untouched.
    fn resolve_after(&self, dt: &BigRational) -> Result<(Body, Body, CollisionKind)> {
        let mut small = self.small.clone();
        let mut large = self.large.clone();
        small.advance(dt);
        large.advance(dt);
        let Some(kind) = update_velocities(&mut small, &mut large)? else {
            return Err(Error::Degenerate(format!(
                "no contact after advancing by {dt} (small at {}, large at {})",
                small.position, large.position
            )));
        };
        Ok((small, large, kind))
    }

    fn rebound(&mut self) -> Result<()> {
        let Some(bound) = &self.max_denominator else {
            return Ok(());
        };
        for body in [&mut self.small, &mut self.large] {
            body.position = limit_denominator(&body.position, bound)?;
            body.velocity = limit_denominator(&body.velocity, bound)?;
        }
        self.time_now = limit_denominator(&self.time_now, bound)?;
        Ok(())
    }
}

/// Count every collision of `small` and `large` with the default denominator bound.
pub fn simulate(small: Body, large: Body) -> Result<u64> {
    let bound = BigInt::from(DEFAULT_MAX_DENOMINATOR);
    Simulation::new(small, large, Some(bound), false)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rational::from_int;

    fn body(mass: i64, velocity: i64, position: i64) -> Body {
        Body::new(from_int(mass), from_int(velocity), from_int(position))
            .expect("valid test body")
    }

    fn ratio(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn separating_blocks_never_collide() -> Result<()> {
        assert_eq!(time_to_next_collision(&body(1, 1, 1), &body(1, 2, 2))?, None);
        assert_eq!(time_to_next_collision(&body(1, 0, 0), &body(1, 0, 2))?, None);
        Ok(())
    }

    #[test]
    fn closing_blocks_meet() -> Result<()> {
        // gap 3, closing speed 2 + 1
        let t = time_to_next_collision(&body(1, 2, 1), &body(1, -1, 4))?;
        assert_eq!(t, Some(from_int(1)));
        Ok(())
    }

    #[test]
    fn small_block_reaches_wall_first() -> Result<()> {
        let t = time_to_next_collision(&body(1, -2, 3), &body(1, 5, 4))?;
        assert_eq!(t, Some(ratio(3, 2)));
        let t = time_to_next_collision(&body(1, -3, 3), &body(1, -1, 4))?;
        assert_eq!(t, Some(from_int(1)));
        Ok(())
    }

    #[test]
    fn small_block_at_wall() -> Result<()> {
        // Already touching the wall while the large block moves away: zero time
        let t = time_to_next_collision(&body(1, -2, 0), &body(1, 2, 5))?;
        assert_eq!(t, Some(BigRational::zero()));
        // Rebound speed 2 against large block moving left at 3: 5 / 5
        let t = time_to_next_collision(&body(1, -2, 0), &body(1, -3, 5))?;
        assert_eq!(t, Some(from_int(1)));
        Ok(())
    }

    #[test]
    fn small_block_pressed_into_wall_bounces_immediately() -> Result<()> {
        let t = time_to_next_collision(&body(1, -1, 0), &body(1, -2, 5))?;
        assert_eq!(t, Some(BigRational::zero()));
        Ok(())
    }

    #[test]
    fn run_from_wall_with_faster_large_block() -> Result<()> {
        // wall bounce at t = 0, then block, wall, block
        let mut sim = Simulation::new(body(1, -1, 0), body(1, -2, 5), None, true)?;
        assert_eq!(sim.run()?, 4);
        assert_eq!(sim.trace()[0].kind, CollisionKind::Wall);
        assert!(sim.trace().iter().all(|ev| !ev.small_position.is_negative()));
        Ok(())
    }

    #[test]
    fn missed_contact_leaves_state_unchanged() -> Result<()> {
        // Blocks meet at t = 1; drifting only half way touches nothing.
        let sim = Simulation::new(body(1, 1, 1), body(1, -1, 3), None, false)?;
        let before = (sim.small().clone(), sim.large().clone());
        let err = sim.resolve_after(&ratio(1, 2)).unwrap_err();
        assert!(matches!(err, Error::Degenerate(_)));
        assert_eq!((sim.small().clone(), sim.large().clone()), before);
        assert!(sim.time().is_zero());
        assert_eq!(sim.collision_count(), 0);
        Ok(())
    }

    #[test]
    fn both_left_takes_earliest_event() -> Result<()> {
        // wall in 4/1 = 4, catch in 1/(−1 + 3) = 1/2
        let t = time_to_next_collision(&body(1, -1, 4), &body(1, -3, 5))?;
        assert_eq!(t, Some(ratio(1, 2)));
        // wall in 1/2, catch in 3/1
        let t = time_to_next_collision(&body(1, -2, 1), &body(1, -3, 4))?;
        assert_eq!(t, Some(ratio(1, 2)));
        Ok(())
    }

    #[test]
    fn small_block_chasing_large_block() -> Result<()> {
        let t = time_to_next_collision(&body(1, 3, 1), &body(1, 1, 2))?;
        assert_eq!(t, Some(ratio(1, 2)));
        Ok(())
    }

    #[test]
    fn equal_masses_exchange_velocities() -> Result<()> {
        let mut s = body(1, 2, 3);
        let mut l = body(1, -1, 3);
        assert_eq!(update_velocities(&mut s, &mut l)?, Some(CollisionKind::Bodies));
        assert_eq!(s.velocity, from_int(-1));
        assert_eq!(l.velocity, from_int(2));
        Ok(())
    }

    #[test]
    fn elastic_update_conserves_momentum_and_energy() -> Result<()> {
        let mut s = body(1, 0, 1);
        let mut l = body(100, -1, 1);
        let p0 = s.momentum() + l.momentum();
        let e0 = s.kinetic_energy() + l.kinetic_energy();
        update_velocities(&mut s, &mut l)?;
        assert_eq!(s.momentum() + l.momentum(), p0);
        assert_eq!(s.kinetic_energy() + l.kinetic_energy(), e0);
        assert_eq!(s.velocity, ratio(-200, 101));
        assert_eq!(l.velocity, ratio(-99, 101));
        Ok(())
    }

    #[test]
    fn wall_bounce_reverses_small_block() -> Result<()> {
        let mut s = body(1, -4, 0);
        let mut l = body(5, -1, 2);
        assert_eq!(update_velocities(&mut s, &mut l)?, Some(CollisionKind::Wall));
        assert_eq!(s.velocity, from_int(4));
        assert_eq!(l.velocity, from_int(-1));
        Ok(())
    }

    #[test]
    fn simultaneous_collision_reverses_both() -> Result<()> {
        let mut s = body(1, -2, 0);
        let mut l = body(100, -3, 0);
        let kind = update_velocities(&mut s, &mut l)?;
        assert_eq!(kind, Some(CollisionKind::WallAndBodies));
        assert_eq!(s.velocity, from_int(2));
        assert_eq!(l.velocity, from_int(3));
        Ok(())
    }

    #[test]
    fn no_contact_leaves_state_untouched() -> Result<()> {
        let mut s = body(1, -2, 1);
        let mut l = body(1, -3, 2);
        assert_eq!(update_velocities(&mut s, &mut l)?, None);
        assert_eq!(s.velocity, from_int(-2));
        assert_eq!(l.velocity, from_int(-3));
        Ok(())
    }

    #[test]
    fn step_is_idempotent_after_termination() -> Result<()> {
        let mut sim = Simulation::new(body(1, 0, 1), body(1, -1, 2), None, false)?;
        assert_eq!(sim.run()?, 3);
        assert!(sim.is_finished());
        assert!(sim.step()?.is_none());
        assert_eq!(sim.collision_count(), 3);
        assert_eq!(sim.steps(), 3);
        Ok(())
    }

    #[test]
    fn tie_counts_as_simultaneous_collision() -> Result<()> {
        // wall and catch both at t = 1
        let mut sim = Simulation::new(body(1, -2, 2), body(100, -3, 3), None, true)?;
        let ev = sim.step()?.expect("collision expected");
        assert_eq!(ev.kind, CollisionKind::WallAndBodies);
        assert_eq!(ev.count, 2);
        assert_eq!(ev.time, from_int(1));
        assert_eq!(sim.run()?, 2);
        assert_eq!(sim.trace().len(), 1);
        Ok(())
    }

    #[test]
    fn zero_bound_rejected() {
        let err = Simulation::new(body(1, 0, 1), body(1, -1, 2), Some(BigInt::zero()), false)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParam(_)));
    }

    #[test]
    fn bounded_run_keeps_small_denominators() -> Result<()> {
        let bound = BigInt::from(1000);
        let mut sim = Simulation::new(body(1, 0, 1), body(100, -1, 2), Some(bound.clone()), false)?;
        while sim.step()?.is_some() {
            for b in [sim.small(), sim.large()] {
                assert!(b.position.denom() <= &bound);
                assert!(b.velocity.denom() <= &bound);
            }
        }
        Ok(())
    }

    #[test]
    fn simulate_default_configuration() -> Result<()> {
        let (small, large) = SimConfig::new().bodies()?;
        assert_eq!(simulate(small, large)?, 314);
        Ok(())
    }
}
