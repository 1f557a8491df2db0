//! Offset pagination for list endpoints (`?skip=0&limit=100`).

use serde::Deserialize;

pub const DEFAULT_LIMIT: u32 = 100;
pub const MAX_LIMIT: u32 = 1000;

/// Query arguments for offset pagination.
///
/// Negative or non-numeric values are rejected by the query extractor;
/// `limit` above [`MAX_LIMIT`] is clamped.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }

    /// OFFSET value for SQL.
    pub fn offset(&self) -> i64 {
        i64::from(self.skip)
    }

    /// LIMIT value for SQL, clamped to [`MAX_LIMIT`].
    pub fn effective_limit(&self) -> i64 {
        i64::from(self.limit.min(MAX_LIMIT))
    }
}
