use miette::Diagnostic;
use thiserror::Error;

/// Errors raised by [`SeededRandom`](super::SeededRandom) operations.
///
/// Every failure is synchronous and local: the offending call consumes no
/// draws and mutates no state, so recovering callers replay the same
/// downstream sequence a non-failing run would have seen.
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum RandomError {
    /// A bounded draw was requested with a non-positive bound.
    #[error("bound must be positive, got {bound}")]
    #[diagnostic(
        code(seedweave::random::invalid_bound),
        help("Pass a bound of at least 1 to next_int_bounded.")
    )]
    InvalidBound { bound: i32 },

    /// `pick` was called with no candidates.
    #[error("cannot pick from an empty candidate collection")]
    #[diagnostic(
        code(seedweave::random::empty_candidates),
        help("Provide at least one candidate to pick from.")
    )]
    EmptyCandidates,
}
