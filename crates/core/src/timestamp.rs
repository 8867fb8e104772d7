//! Creation / modification bookkeeping shared by stored records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `created_at` / `updated_at` pair carried by users and profiles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Timestamps {
    /// Both timestamps set to the same instant (a freshly inserted row).
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            created_at: instant,
            updated_at: instant,
        }
    }

    pub fn now() -> Self {
        Self::at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rows_start_with_equal_timestamps() {
        let ts = Timestamps::now();
        assert_eq!(ts.created_at, ts.updated_at);
    }
}
