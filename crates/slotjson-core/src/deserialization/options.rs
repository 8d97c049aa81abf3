//! Per-call parser options

use crate::config::limits::{DEFAULT_NESTING_LIMIT, MAX_NESTING_LIMIT};

/// Options for one deserialization call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeserializationOptions {
    /// Containers the parser enters before failing with
    /// [`Error::TooDeep`](crate::Error::TooDeep); zero accepts only scalars.
    /// Values above [`MAX_NESTING_LIMIT`] act as that ceiling.
    pub nesting_limit: usize,
}

impl DeserializationOptions {
    /// Default options
    pub fn new() -> Self {
        Self {
            nesting_limit: DEFAULT_NESTING_LIMIT,
        }
    }

    /// Set the nesting limit, capped at [`MAX_NESTING_LIMIT`]
    pub fn with_nesting_limit(mut self, limit: usize) -> Self {
        self.nesting_limit = limit.min(MAX_NESTING_LIMIT);
        self
    }

    /// Limit a parse actually enforces
    pub fn effective_nesting_limit(&self) -> usize {
        self.nesting_limit.min(MAX_NESTING_LIMIT)
    }
}

impl Default for DeserializationOptions {
    fn default() -> Self {
        Self::new()
    }
}
