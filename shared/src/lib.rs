use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single dated money movement.
///
/// The JSON shape of this struct is the persisted layout: `id, title, amount,
/// type, category, date (yyyy-MM-dd), note`. Any new field must be optional
/// with a default so previously stored data keeps loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque unique identifier (UUID v4 for records created by this crate)
    pub id: String,
    pub title: String,
    /// Always non-negative; the direction comes from `transaction_type`
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Category id, expected to match an entry of [`CATEGORIES`]
    pub category: String,
    #[serde(with = "day_date")]
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

/// A transaction as submitted by a caller, before the store assigns an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub title: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    #[serde(with = "day_date")]
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl NewTransaction {
    /// Attach an id, producing the stored record
    pub fn into_transaction(self, id: String) -> Transaction {
        Transaction {
            id,
            title: self.title,
            amount: self.amount,
            transaction_type: self.transaction_type,
            category: self.category,
            date: self.date,
            note: self.note,
        }
    }
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Category used when rendering this transaction as a list row
    pub fn display_category(&self) -> &'static Category {
        Category::for_display(&self.category)
    }
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(ParseEnumError::new("transaction type", other)),
        }
    }
}

/// Static category reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

/// The fixed category table. The first entry is the form default, the last
/// entry is what unknown ids display as.
pub const CATEGORIES: &[Category] = &[
    Category { id: "food", name: "Food", icon: "🍔", color: "#f87171" },
    Category { id: "shopping", name: "Shopping", icon: "🛍️", color: "#fb923c" },
    Category { id: "transport", name: "Transport", icon: "🚗", color: "#fbbf24" },
    Category { id: "entertainment", name: "Leisure", icon: "🎮", color: "#4ade80" },
    Category { id: "health", name: "Health", icon: "🏥", color: "#2dd4bf" },
    Category { id: "salary", name: "Salary", icon: "💰", color: "#60a5fa" },
    Category { id: "others", name: "Others", icon: "✨", color: "#c084fc" },
];

/// Icon shown for insight rows whose category id is not in the table
pub const UNKNOWN_CATEGORY_ICON: &str = "💸";
/// Color shown for insight rows whose category id is not in the table
pub const UNKNOWN_CATEGORY_COLOR: &str = "#94a3b8";

impl Category {
    /// Look up a category by id
    pub fn find(id: &str) -> Option<&'static Category> {
        CATEGORIES.iter().find(|c| c.id == id)
    }

    /// Look up a category by id, falling back to the last ("Others") entry
    pub fn for_display(id: &str) -> &'static Category {
        Self::find(id).unwrap_or(&CATEGORIES[CATEGORIES.len() - 1])
    }

    /// Display name for a category id, or the raw id when it is unknown
    pub fn display_name(id: &str) -> String {
        Self::find(id)
            .map(|c| c.name.to_string())
            .unwrap_or_else(|| id.to_string())
    }

    /// Category preselected in a fresh transaction form
    pub fn default_id() -> &'static str {
        CATEGORIES[0].id
    }
}

/// Budget period. Only monthly budgets exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
}

pub const DEFAULT_BUDGET_LIMIT: f64 = 2000.0;

fn default_budget_limit() -> f64 {
    DEFAULT_BUDGET_LIMIT
}

/// The single spending ceiling compared against cumulative expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    #[serde(default = "default_budget_limit")]
    pub limit: f64,
    #[serde(default)]
    pub period: BudgetPeriod,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            limit: DEFAULT_BUDGET_LIMIT,
            period: BudgetPeriod::Monthly,
        }
    }
}

/// Window used to narrow the displayed transaction list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl TimeFilter {
    /// Filters in the order the history view offers them
    pub const ALL: [TimeFilter; 4] = [
        TimeFilter::All,
        TimeFilter::Today,
        TimeFilter::Week,
        TimeFilter::Month,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::All => "all",
            TimeFilter::Today => "today",
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(TimeFilter::All),
            "today" => Ok(TimeFilter::Today),
            "week" => Ok(TimeFilter::Week),
            "month" => Ok(TimeFilter::Month),
            other => Err(ParseEnumError::new("time filter", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {}: '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

/// Whole-history income and expense sums
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
}

impl Totals {
    /// Income minus expense; may be negative
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

/// One day of the expense trend chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Short day label, e.g. "Jan 05"
    pub label: String,
    pub date: NaiveDate,
    pub amount: f64,
}

/// Total expense for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category_id: String,
    /// Category display name, or the raw id when unknown
    pub name: String,
    pub value: f64,
}

/// Category row of the budget insights view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInsight {
    pub category_id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub value: f64,
    /// Share of total expense, in percent
    pub share_percent: f64,
}

/// Budget gauge plus per-category insights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetOverview {
    pub limit: f64,
    pub period: BudgetPeriod,
    pub consumed: f64,
    /// Remaining budget, never below zero
    pub available: f64,
    pub consumed_percent: f64,
    /// Sorted by value, largest first
    pub insights: Vec<CategoryInsight>,
}

/// Everything the dashboard renders, derived from one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub totals: Totals,
    pub balance: f64,
    pub time_filter: TimeFilter,
    pub filtered_transactions: Vec<Transaction>,
    /// First few entries of `filtered_transactions`
    pub recent_transactions: Vec<Transaction>,
    pub trend_series: Vec<TrendPoint>,
    /// Encounter order, not sorted
    pub category_distribution: Vec<CategoryShare>,
    pub budget_consumed_percent: f64,
}

/// Raw input of the add-transaction form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    pub title: String,
    pub amount_input: String,
    pub transaction_type: TransactionType,
    pub category: String,
    /// yyyy-MM-dd
    pub date_input: String,
    pub note: String,
}

impl TransactionForm {
    /// A blank expense form dated `today` with the default category selected
    pub fn new(today: NaiveDate) -> Self {
        Self {
            title: String::new(),
            amount_input: String::new(),
            transaction_type: TransactionType::Expense,
            category: Category::default_id().to_string(),
            date_input: today.format(day_date::FORMAT).to_string(),
            note: String::new(),
        }
    }
}

/// Reasons a submitted form is rejected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransactionValidationError {
    EmptyTitle,
    EmptyAmount,
    InvalidAmountFormat(String),
    NegativeAmount,
    InvalidDate(String),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionValidationError::EmptyTitle => write!(f, "Please enter a title"),
            TransactionValidationError::EmptyAmount => write!(f, "Please enter an amount"),
            TransactionValidationError::InvalidAmountFormat(input) => {
                write!(f, "'{}' is not a valid amount", input)
            }
            TransactionValidationError::NegativeAmount => write!(f, "Amount cannot be negative"),
            TransactionValidationError::InvalidDate(input) => {
                write!(f, "'{}' is not a valid date (expected yyyy-MM-dd)", input)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

/// Export of all transactions as an in-memory CSV document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDataResponse {
    pub csv_content: String,
    pub filename: String,
    pub transaction_count: usize,
}

/// Request to write the export file to disk
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExportToPathRequest {
    /// Target directory; the configured or platform default is used when absent
    pub custom_path: Option<String>,
}

/// Outcome of writing the export file. Failures are reported here rather
/// than as errors so the caller can show a dismissable notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportToPathResponse {
    pub success: bool,
    pub message: String,
    pub file_path: String,
    pub transaction_count: usize,
}

/// Serde adapter for day-granularity dates stored as `yyyy-MM-dd`.
///
/// Deserialization also accepts a full timestamp and keeps its date part.
pub mod day_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    /// Parse `yyyy-MM-dd`, ignoring any time-of-day suffix
    pub fn parse(s: &str) -> Result<NaiveDate, chrono::ParseError> {
        let trimmed = s.trim();
        let day_part = trimmed.get(..10).unwrap_or(trimmed);
        NaiveDate::parse_from_str(day_part, FORMAT)
    }
}
