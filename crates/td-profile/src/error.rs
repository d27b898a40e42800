use thiserror::Error;

/// Departure sampling could not produce the requested count.
///
/// Recoverable at run level: the stream builder records it against the
/// bucket and carries on with the remaining buckets.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("accepted {accepted} of {requested} departures after {attempts} draws (budget exhausted)")]
    BudgetExhausted {
        requested: usize,
        accepted:  usize,
        attempts:  u64,
    },
}

pub type GenerationResult<T> = Result<T, GenerationError>;
