//! Error type for filter operations.
//!
//! Classification misses, empty lists, out-of-domain filter values and idle
//! scale frames are normal outcomes and never show up here.

use crate::filter::ListShape;

/// Result type alias using [`SiftError`]
pub type Result<T> = std::result::Result<T, SiftError>;

#[derive(thiserror::Error, Debug)]
pub enum SiftError {
    /// The first record of a list carries none of `driver`, `vendor` or `mac`.
    #[error("Cannot determine list's element type")]
    UnclassifiableList,

    /// A `name` filter value is not a valid regular expression.
    #[error("Invalid name pattern {pattern:?}: {source}")]
    PatternCompilation {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A filter key exists, but not for this kind of list.
    #[error("Filter key `{key}` is not supported on {shape} lists")]
    UnsupportedFeature { key: String, shape: ListShape },
}
