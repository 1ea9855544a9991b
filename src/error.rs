use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the collision simulator.
///
/// Malformed initial orderings (e.g. the small block to the right of the large
/// one) are a caller precondition and are not reported here.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected numeric policy, e.g. a denominator bound below 1.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Configuration for which the collision formulas are undefined
    /// (non-positive mass, zero divisor in a collision-time or velocity update).
    #[error("degenerate configuration: {0}")]
    Degenerate(String),
}
