use thiserror::Error;

/// Errors returned by [`MultiSet`](crate::MultiSet) operations.
///
/// A failing operation leaves the multiset unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An argument violates the operation's precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The item is not a member of the multiset.
    #[error("item not found in multiset")]
    KeyNotFound,

    /// The multiset is read-only.
    #[error("multiset is read-only")]
    Unsupported,

    /// The total number of occurrences would exceed `usize::MAX`.
    #[error("multiset would hold more than usize::MAX items")]
    Overflow,

    /// The destination buffer cannot hold every occurrence.
    #[error("destination has room for {available} items, {needed} required")]
    OutOfRange { needed: usize, available: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
