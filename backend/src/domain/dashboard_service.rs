//! Dashboard assembly.
//!
//! Combines the aggregation functions into the single payload the
//! presentation layer renders. Callers get owned results and never write
//! back into them.

use chrono::NaiveDate;
use log::debug;
use shared::{Budget, BudgetOverview, DashboardSummary, TimeFilter, Transaction};

use super::aggregation;

/// How many filtered transactions the dashboard shows as "recent"
pub const DEFAULT_RECENT_LIMIT: usize = 3;

#[derive(Debug, Clone)]
pub struct DashboardService {
    recent_limit: usize,
}

impl DashboardService {
    pub fn new() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    pub fn with_recent_limit(recent_limit: usize) -> Self {
        Self { recent_limit }
    }

    /// Derive every dashboard figure from one snapshot
    pub fn summarize(
        &self,
        transactions: &[Transaction],
        budget: &Budget,
        time_filter: TimeFilter,
        today: NaiveDate,
    ) -> DashboardSummary {
        let totals = aggregation::totals(transactions);
        let filtered_transactions = aggregation::filter_by_time(transactions, time_filter, today);
        let recent_transactions = filtered_transactions
            .iter()
            .take(self.recent_limit)
            .cloned()
            .collect();

        debug!(
            "Dashboard for {} ({}): {} of {} transactions",
            today,
            time_filter,
            filtered_transactions.len(),
            transactions.len()
        );

        DashboardSummary {
            totals,
            balance: totals.balance(),
            time_filter,
            filtered_transactions,
            recent_transactions,
            trend_series: aggregation::trend_series(transactions, today),
            category_distribution: aggregation::category_distribution(transactions),
            budget_consumed_percent: aggregation::budget_consumed_percent(
                totals.expense,
                budget.limit,
            ),
        }
    }

    pub fn budget_overview(&self, transactions: &[Transaction], budget: &Budget) -> BudgetOverview {
        aggregation::budget_overview(transactions, budget)
    }
}

impl Default for DashboardService {
    fn default() -> Self {
        Self::new()
    }
}
