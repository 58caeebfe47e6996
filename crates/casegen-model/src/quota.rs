//! Quota, progress, and shortfall accounting for one orchestration run

use crate::record::Category;

/// Requested record counts per category.
///
/// Immutable for the duration of one orchestration run. Non-negativity is
/// guaranteed by the unsigned counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quota {
    pub positive: u32,
    pub negative: u32,
    pub edge: u32,
}

impl Quota {
    #[must_use]
    pub const fn new(positive: u32, negative: u32, edge: u32) -> Self {
        Self {
            positive,
            negative,
            edge,
        }
    }

    #[must_use]
    pub const fn get(&self, category: Category) -> u32 {
        match category {
            Category::Positive => self.positive,
            Category::Negative => self.negative,
            Category::Edge => self.edge,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.positive + self.negative + self.edge
    }
}

/// Accepted record counts per category.
///
/// Owned exclusively by one `generate` call and discarded when it returns.
/// Counts only ever increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    positive: u32,
    negative: u32,
    edge: u32,
}

impl Progress {
    /// Record `count` newly accepted records for `category`.
    pub fn record(&mut self, category: Category, count: u32) {
        match category {
            Category::Positive => self.positive += count,
            Category::Negative => self.negative += count,
            Category::Edge => self.edge += count,
        }
    }

    #[must_use]
    pub const fn accepted(&self, category: Category) -> u32 {
        match category {
            Category::Positive => self.positive,
            Category::Negative => self.negative,
            Category::Edge => self.edge,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.positive + self.negative + self.edge
    }

    /// Per-category deficit against `quota`.
    ///
    /// Over-delivery in one category never offsets another: each deficit is
    /// a saturating subtraction.
    #[must_use]
    pub fn shortfall(&self, quota: &Quota) -> Shortfall {
        Shortfall {
            positive: quota.positive.saturating_sub(self.positive),
            negative: quota.negative.saturating_sub(self.negative),
            edge: quota.edge.saturating_sub(self.edge),
        }
    }
}

/// Per-category deficit between requested and accepted counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Shortfall {
    pub positive: u32,
    pub negative: u32,
    pub edge: u32,
}

impl Shortfall {
    #[must_use]
    pub const fn get(&self, category: Category) -> u32 {
        match category {
            Category::Positive => self.positive,
            Category::Negative => self.negative,
            Category::Edge => self.edge,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.positive + self.negative + self.edge
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.total() == 0
    }

    /// The category with the largest outstanding deficit, if any remains.
    /// Ties resolve in planning order (Positive, Negative, Edge).
    #[must_use]
    pub fn largest(&self) -> Option<Category> {
        Category::ALL
            .into_iter()
            .rev()
            .filter(|c| self.get(*c) > 0)
            .max_by_key(|c| self.get(*c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortfall_saturates_on_over_delivery() {
        let quota = Quota::new(2, 1, 0);
        let mut progress = Progress::default();
        progress.record(Category::Positive, 5);
        let shortfall = progress.shortfall(&quota);
        assert_eq!(shortfall.positive, 0);
        assert_eq!(shortfall.negative, 1);
        assert_eq!(shortfall.total(), 1);
    }

    #[test]
    fn shortfall_zero_when_quota_met() {
        let quota = Quota::new(1, 1, 1);
        let mut progress = Progress::default();
        for category in Category::ALL {
            progress.record(category, 1);
        }
        assert!(progress.shortfall(&quota).is_zero());
    }

    #[test]
    fn largest_prefers_biggest_deficit() {
        let shortfall = Shortfall {
            positive: 1,
            negative: 3,
            edge: 2,
        };
        assert_eq!(shortfall.largest(), Some(Category::Negative));
    }

    #[test]
    fn largest_ties_resolve_in_planning_order() {
        let shortfall = Shortfall {
            positive: 2,
            negative: 2,
            edge: 0,
        };
        assert_eq!(shortfall.largest(), Some(Category::Positive));
        assert_eq!(Shortfall::default().largest(), None);
    }

    #[test]
    fn progress_is_monotonic() {
        let mut progress = Progress::default();
        progress.record(Category::Edge, 2);
        let before = progress.accepted(Category::Edge);
        progress.record(Category::Edge, 1);
        assert!(progress.accepted(Category::Edge) > before);
        assert_eq!(progress.total(), 3);
    }
}
