use core::fmt;

/// Result alias for `depot`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by clustering and selection.
///
/// Degenerate-but-valid inputs (empty clusters, unscorable partitions) are not
/// errors; they resolve to fallback values instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Invalid number of clusters requested.
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of items.
        n_items: usize,
    },

    /// Candidate range for k is empty or starts at zero.
    InvalidRange {
        /// Lower bound (inclusive).
        min_k: usize,
        /// Upper bound (inclusive).
        max_k: usize,
    },

    /// A coordinate was NaN or infinite.
    NonFiniteCoordinate {
        /// Position of the offending point in its input slice.
        index: usize,
        /// Latitude as given.
        latitude: f64,
        /// Longitude as given.
        longitude: f64,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Generic error with message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::InvalidClusterCount { requested, n_items } => {
                write!(f, "cannot create {requested} clusters from {n_items} items")
            }
            Error::InvalidRange { min_k, max_k } => {
                write!(f, "invalid k range [{min_k}, {max_k}]")
            }
            Error::NonFiniteCoordinate {
                index,
                latitude,
                longitude,
            } => write!(
                f,
                "non-finite coordinate at index {index}: ({latitude}, {longitude})"
            ),
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::Other(msg) => write!(f, "{msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
