//! Core data structures and the event-driven collision engine.
//!
//! Two blocks slide on the half-line `x >= 0` with a wall at the origin. The
//! engine jumps from one collision to the next using exact rational
//! arithmetic and stops once no further collision is reachable.

pub mod body;
pub mod config;
pub mod event;
pub mod rational;
pub mod sim;

pub use body::Body;
pub use config::SimConfig;
pub use event::{CollisionEvent, CollisionKind};
pub use sim::{simulate, time_to_next_collision, update_velocities, Simulation};
