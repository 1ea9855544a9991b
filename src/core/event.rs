use num_rational::BigRational;

/// Kinds of collision the two-block system can realize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionKind {
    /// Small block bounces off the wall at x = 0.
    Wall,
    /// The two blocks hit each other away from the wall.
    Bodies,
    /// Both blocks meet at the wall in the same instant: a wall bounce and a
    /// block-block bounce happen together.
    WallAndBodies,
}

impl CollisionKind {
    /// Number of physical collisions this event contributes to the total.
    #[inline]
    pub fn count(self) -> u64 {
        match self {
            CollisionKind::Wall | CollisionKind::Bodies => 1,
            CollisionKind::WallAndBodies => 2,
        }
    }
}

/// A realized collision event with the post-collision state of both blocks.
///
/// - `time`: absolute simulation time of the event
/// - `count`: cumulative collision count including this event
/// - `small_*`, `large_*`: state right after the velocity update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionEvent {
    pub kind: CollisionKind,
    pub time: BigRational,
    pub count: u64,
    pub small_position: BigRational,
    pub large_position: BigRational,
    pub small_velocity: BigRational,
    pub large_velocity: BigRational,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simultaneous_event_counts_twice() {
        assert_eq!(CollisionKind::Wall.count(), 1);
        assert_eq!(CollisionKind::Bodies.count(), 1);
        assert_eq!(CollisionKind::WallAndBodies.count(), 2);
    }
}
