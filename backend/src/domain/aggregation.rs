//! Aggregation engine for the dashboard.
//!
//! Every function here is a pure recomputation over a snapshot of the
//! transaction log. Nothing is cached and nothing mutates the input; callers
//! rerun the functions after each store mutation.
//!
//! Dates are day-granular. "Today" is always passed in so results do not
//! depend on the wall clock.

use chrono::{Datelike, Duration, NaiveDate};
use shared::{
    Budget, BudgetOverview, Category, CategoryInsight, CategoryShare, TimeFilter, Totals,
    Transaction, TransactionType, TrendPoint, UNKNOWN_CATEGORY_COLOR, UNKNOWN_CATEGORY_ICON,
};
use std::cmp::Ordering;

/// Number of points in the expense trend series
pub const TREND_DAYS: usize = 7;

/// Day label format of the trend series ("Jan 05")
pub const TREND_LABEL_FORMAT: &str = "%b %d";

/// Sum income and expense over the whole history, ignoring any time filter
pub fn totals(transactions: &[Transaction]) -> Totals {
    transactions.iter().fold(Totals::default(), |mut acc, tx| {
        match tx.transaction_type {
            TransactionType::Income => acc.income += tx.amount,
            TransactionType::Expense => acc.expense += tx.amount,
        }
        acc
    })
}

/// Income minus expense over the whole history
pub fn balance(transactions: &[Transaction]) -> f64 {
    totals(transactions).balance()
}

/// The most recent Sunday on or before `today`
pub fn week_start(today: NaiveDate) -> NaiveDate {
    let days_since_sunday = today.weekday().num_days_from_sunday();
    today - Duration::days(i64::from(days_since_sunday))
}

/// The first day of `today`'s month
pub fn month_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(today.day0()))
}

/// Whether a transaction dated `date` belongs to `filter`'s window.
///
/// Week and month windows start strictly after their boundary day, so a
/// transaction dated on the Sunday (or on the 1st) is not part of the
/// current week (or month).
pub fn matches_time_filter(date: NaiveDate, filter: TimeFilter, today: NaiveDate) -> bool {
    match filter {
        TimeFilter::All => true,
        TimeFilter::Today => date == today,
        TimeFilter::Week => date > week_start(today),
        TimeFilter::Month => date > month_start(today),
    }
}

/// Transactions inside `filter`'s window, newest date first.
///
/// Records sharing a date keep their relative store order.
pub fn filter_by_time(
    transactions: &[Transaction],
    filter: TimeFilter,
    today: NaiveDate,
) -> Vec<Transaction> {
    let mut filtered: Vec<Transaction> = transactions
        .iter()
        .filter(|tx| matches_time_filter(tx.date, filter, today))
        .cloned()
        .collect();

    // sort_by is stable
    filtered.sort_by(|a, b| b.date.cmp(&a.date));
    filtered
}

/// Daily expense totals for the seven days ending `today`, oldest first
pub fn trend_series(transactions: &[Transaction], today: NaiveDate) -> Vec<TrendPoint> {
    (0..TREND_DAYS)
        .rev()
        .map(|days_back| {
            let day = today - Duration::days(days_back as i64);
            let amount = transactions
                .iter()
                .filter(|tx| tx.is_expense() && tx.date == day)
                .map(|tx| tx.amount)
                .sum::<f64>();

            TrendPoint {
                label: day.format(TREND_LABEL_FORMAT).to_string(),
                date: day,
                amount,
            }
        })
        .collect()
}

/// Expense totals per category over the whole history, in the order each
/// category is first encountered in `transactions`
pub fn category_distribution(transactions: &[Transaction]) -> Vec<CategoryShare> {
    let mut shares: Vec<CategoryShare> = Vec::new();

    for tx in transactions.iter().filter(|tx| tx.is_expense()) {
        match shares.iter_mut().find(|share| share.category_id == tx.category) {
            Some(share) => share.value += tx.amount,
            None => shares.push(CategoryShare {
                category_id: tx.category.clone(),
                name: Category::display_name(&tx.category),
                value: tx.amount,
            }),
        }
    }

    shares
}

/// Sort shares by value, largest first. Equal values keep their order.
pub fn sort_by_value_desc(shares: &mut [CategoryShare]) {
    shares.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
}

/// Percentage of the budget consumed, clamped to `[0, 100]`.
///
/// A limit of zero (or below) counts as fully consumed.
pub fn budget_consumed_percent(expense_total: f64, budget_limit: f64) -> f64 {
    if !(budget_limit > 0.0) {
        return 100.0;
    }

    let percent = (expense_total / budget_limit).min(1.0) * 100.0;
    if percent.is_finite() {
        percent.max(0.0)
    } else {
        100.0
    }
}

/// Budget gauge figures plus the per-category insight rows
pub fn budget_overview(transactions: &[Transaction], budget: &Budget) -> BudgetOverview {
    let totals = totals(transactions);
    let mut shares = category_distribution(transactions);
    sort_by_value_desc(&mut shares);

    let share_base = totals.expense.max(1.0);
    let insights = shares
        .into_iter()
        .map(|share| {
            let category = Category::find(&share.category_id);
            CategoryInsight {
                icon: category
                    .map(|c| c.icon)
                    .unwrap_or(UNKNOWN_CATEGORY_ICON)
                    .to_string(),
                color: category
                    .map(|c| c.color)
                    .unwrap_or(UNKNOWN_CATEGORY_COLOR)
                    .to_string(),
                share_percent: share.value / share_base * 100.0,
                category_id: share.category_id,
                name: share.name,
                value: share.value,
            }
        })
        .collect();

    BudgetOverview {
        limit: budget.limit,
        period: budget.period,
        consumed: totals.expense,
        available: (budget.limit - totals.expense).max(0.0),
        consumed_percent: budget_consumed_percent(totals.expense, budget.limit),
        insights,
    }
}
