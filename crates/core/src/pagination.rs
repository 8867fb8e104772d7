//! Offset-based result windowing (`skip` / `limit`).

use serde::Serialize;

use crate::error::{DomainError, DomainResult};

/// A validated window into an ordered result set.
///
/// `skip` is never negative and `limit` is within `0..=MAX_LIMIT`, so both
/// can be handed to a query without further checks. `skip` has no upper bound.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    skip: i64,
    limit: i64,
}

impl Pagination {
    pub const DEFAULT_SKIP: i64 = 0;
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 1000;

    /// Validate raw `skip` / `limit` values (as received from a query string).
    pub fn new(skip: i64, limit: i64) -> DomainResult<Self> {
        if skip < 0 {
            return Err(DomainError::validation("skip must be greater than or equal to 0"));
        }
        if !(0..=Self::MAX_LIMIT).contains(&limit) {
            return Err(DomainError::validation(format!(
                "limit must be between 0 and {}",
                Self::MAX_LIMIT
            )));
        }

        Ok(Self { skip, limit })
    }

    pub fn skip(&self) -> i64 {
        self.skip
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Apply the window to an in-memory sequence.
    pub fn window<I: IntoIterator>(&self, items: I) -> impl Iterator<Item = I::Item> {
        items
            .into_iter()
            .skip(usize::try_from(self.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit).unwrap_or(usize::MAX))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: Self::DEFAULT_SKIP,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_match_query_defaults() {
        let p = Pagination::default();
        assert_eq!(p.skip(), 0);
        assert_eq!(p.limit(), 100);
    }

    #[test]
    fn negative_skip_is_rejected() {
        assert!(matches!(Pagination::new(-1, 10), Err(DomainError::Validation(_))));
    }

    #[test]
    fn limit_bounds_are_inclusive() {
        assert!(Pagination::new(0, 0).is_ok());
        assert!(Pagination::new(0, 1000).is_ok());
        assert!(Pagination::new(0, 1001).is_err());
        assert!(Pagination::new(0, -1).is_err());
    }

    #[test]
    fn skip_beyond_u32_is_accepted() {
        let p = Pagination::new(5_000_000_000, 10).unwrap();
        assert_eq!(p.skip(), 5_000_000_000);

        let got: Vec<_> = p.window(vec![1, 2, 3]).collect();
        assert!(got.is_empty());

        let p = Pagination::new(i64::MAX, 10).unwrap();
        assert_eq!(p.window(0..5).count(), 0);
    }

    #[test]
    fn window_skips_then_takes() {
        let p = Pagination::new(1, 2).unwrap();
        let got: Vec<_> = p.window(vec![10, 20, 30, 40]).collect();
        assert_eq!(got, vec![20, 30]);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a window never yields more than `limit` items and always
        /// starts at offset `skip`.
        #[test]
        fn window_respects_skip_and_limit(
            len in 0usize..200,
            skip in 0i64..250,
            limit in 0i64..=1000
        ) {
            let p = Pagination::new(skip, limit).unwrap();
            let items: Vec<usize> = (0..len).collect();
            let got: Vec<usize> = p.window(items).collect();

            prop_assert!(got.len() <= limit as usize);
            let expected_len = len.saturating_sub(skip as usize).min(limit as usize);
            prop_assert_eq!(got.len(), expected_len);
            if let Some(first) = got.first() {
                prop_assert_eq!(*first, skip as usize);
            }
        }

        /// Property: every limit outside `0..=1000` is rejected.
        #[test]
        fn out_of_range_limits_are_rejected(limit in prop_oneof![i64::MIN..0i64, 1001i64..i64::MAX]) {
            prop_assert!(Pagination::new(0, limit).is_err());
        }
    }
}
