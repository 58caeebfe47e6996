//! Batch planning and the per-batch retry state machine

use casegen_model::{Category, Quota};

/// One homogeneous-category request/response cycle for a bounded number of
/// records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BatchPlan {
    pub category: Category,
    pub count: u32,
}

/// Split the quota into bounded homogeneous-category batches.
///
/// Edge batches are smaller than Positive/Negative ones: edge-case prompts
/// are harder for the backend to diversify reliably in one shot.
pub(crate) fn plan_batches(quota: &Quota, batch_size: u32, edge_batch_size: u32) -> Vec<BatchPlan> {
    let mut plans = Vec::new();
    for category in Category::ALL {
        let requested = quota.get(category);
        if requested == 0 {
            continue;
        }
        let size = match category {
            Category::Edge => edge_batch_size,
            _ => batch_size,
        }
        .max(1);

        let mut remaining = requested;
        while remaining > 0 {
            let count = remaining.min(size);
            plans.push(BatchPlan { category, count });
            remaining -= count;
        }
    }
    plans
}

/// Per-batch retry state.
///
/// The bounded transition `Attempting(n) → Succeeded | ExhaustedRetries`
/// makes the termination guarantee a checkable property rather than an
/// implementation detail of a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BatchState {
    /// Attempt `n` of the retry budget is in flight
    Attempting(u32),
    Succeeded,
    ExhaustedRetries,
}

impl BatchState {
    /// Advance after a failed attempt.
    pub fn failed(self, max_attempts: u32) -> Self {
        match self {
            BatchState::Attempting(n) if n >= max_attempts => BatchState::ExhaustedRetries,
            BatchState::Attempting(n) => BatchState::Attempting(n + 1),
            terminal => terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_splits_counts_into_batches() {
        let quota = Quota::new(12, 5, 0);
        let plans = plan_batches(&quota, 5, 3);
        assert_eq!(
            plans,
            vec![
                BatchPlan { category: Category::Positive, count: 5 },
                BatchPlan { category: Category::Positive, count: 5 },
                BatchPlan { category: Category::Positive, count: 2 },
                BatchPlan { category: Category::Negative, count: 5 },
            ]
        );
    }

    #[test]
    fn plan_uses_smaller_edge_batches() {
        let quota = Quota::new(0, 0, 7);
        let plans = plan_batches(&quota, 5, 3);
        assert_eq!(
            plans,
            vec![
                BatchPlan { category: Category::Edge, count: 3 },
                BatchPlan { category: Category::Edge, count: 3 },
                BatchPlan { category: Category::Edge, count: 1 },
            ]
        );
    }

    #[test]
    fn plan_skips_zero_categories() {
        let quota = Quota::new(1, 0, 0);
        let plans = plan_batches(&quota, 5, 3);
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].category, Category::Positive);
    }

    #[test]
    fn empty_quota_plans_nothing() {
        assert!(plan_batches(&Quota::default(), 5, 3).is_empty());
    }

    #[test]
    fn batch_state_exhausts_after_budget() {
        let max = 3;
        let mut state = BatchState::Attempting(1);
        state = state.failed(max);
        assert_eq!(state, BatchState::Attempting(2));
        state = state.failed(max);
        assert_eq!(state, BatchState::Attempting(3));
        state = state.failed(max);
        assert_eq!(state, BatchState::ExhaustedRetries);
        // Terminal states do not regress
        assert_eq!(state.failed(max), BatchState::ExhaustedRetries);
    }
}
