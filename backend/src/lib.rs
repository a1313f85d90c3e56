//! # LuxeSpend Backend
//!
//! Storage, aggregation and export for the personal finance tracker. Front
//! ends create one [`Backend`], change data and view state through its
//! methods and render the derived [`DashboardSummary`] and
//! [`BudgetOverview`]. Anything the user should be told about (a failed
//! save, unreadable stored data, an export result) ends up as the pending
//! notification of [`Backend::app_state`].
//!
//! Everything runs synchronously on the caller's thread: a mutation finishes
//! (including its write to disk) before the next summary is computed.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::sync::Arc;

pub mod config;
pub mod domain;
pub mod storage;

pub use config::AppConfig;
pub use storage::JsonConnection;

use domain::{AppState, NotificationLevel, Tab};
use shared::{
    Budget, BudgetOverview, DashboardSummary, ExportToPathRequest, ExportToPathResponse,
    TimeFilter, Transaction, TransactionForm, TransactionValidationError,
};

/// Main backend struct that wires configuration, storage, services and the
/// presentation state
pub struct Backend {
    pub config: AppConfig,
    pub store: domain::TransactionStore<JsonConnection>,
    pub form_service: domain::TransactionFormService,
    pub dashboard_service: domain::DashboardService,
    pub export_service: domain::ExportService,
    pub app_state: AppState,
}

impl Backend {
    /// Open the data directory named by `config` and load the stored state
    pub fn new(config: AppConfig) -> Result<Self> {
        let connection = Arc::new(JsonConnection::with_storage_key(
            &config.data_directory,
            &config.storage_key,
        )?);

        let default_budget = Budget {
            limit: config.default_budget_limit,
            ..Budget::default()
        };
        let store = domain::TransactionStore::load(connection, default_budget);

        let form_service = domain::TransactionFormService::with_currency_symbol(&config.currency_symbol);
        let dashboard_service = domain::DashboardService::new();
        let export_service = match &config.export_directory {
            Some(dir) => domain::ExportService::with_default_directory(dir.clone()),
            None => domain::ExportService::new(),
        };

        let mut backend = Backend {
            config,
            store,
            form_service,
            dashboard_service,
            export_service,
            app_state: AppState::new(),
        };
        backend.surface_persistence_warning();
        Ok(backend)
    }

    /// Today's date in local time
    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Dashboard payload for `time_filter`, as of today
    pub fn dashboard(&self, time_filter: TimeFilter) -> DashboardSummary {
        self.dashboard_at(time_filter, Self::today())
    }

    /// Dashboard payload for `time_filter`, as of `today`
    pub fn dashboard_at(&self, time_filter: TimeFilter, today: NaiveDate) -> DashboardSummary {
        self.dashboard_service.summarize(
            self.store.transactions(),
            self.store.budget(),
            time_filter,
            today,
        )
    }

    /// Switch to `tab` with `time_filter` selected and summarize as of `today`
    pub fn open_view(&mut self, tab: Tab, time_filter: TimeFilter, today: NaiveDate) -> DashboardSummary {
        self.app_state.select_tab(tab);
        self.app_state.select_time_filter(time_filter);
        self.dashboard_at(self.app_state.time_filter(), today)
    }

    pub fn budget_overview(&self) -> BudgetOverview {
        self.dashboard_service
            .budget_overview(self.store.transactions(), self.store.budget())
    }

    /// Validate a submitted form and store it. A stored transaction closes
    /// the add modal; a rejected one leaves it open.
    pub fn submit_form(
        &mut self,
        form: &TransactionForm,
    ) -> Result<Transaction, Vec<TransactionValidationError>> {
        let transaction = self.store.add_from_form(&self.form_service, form)?;
        self.app_state.transaction_added();
        self.surface_persistence_warning();
        Ok(transaction)
    }

    /// Remove a transaction by id; returns whether it existed
    pub fn remove(&mut self, id: &str) -> bool {
        let removed = self.store.remove(id);
        self.surface_persistence_warning();
        removed
    }

    pub fn set_budget_limit(&mut self, limit: f64) {
        self.store.set_budget_limit(limit);
        self.surface_persistence_warning();
    }

    /// Export the whole history. The outcome is also left as a notification.
    pub fn export(&mut self, request: ExportToPathRequest) -> ExportToPathResponse {
        let response = self
            .export_service
            .export_to_path(self.store.transactions(), request);

        let level = if response.success {
            NotificationLevel::Info
        } else {
            NotificationLevel::Error
        };
        self.app_state.notify(level, response.message.clone());
        response
    }

    /// Human-readable totals and budget lines for `summary`
    pub fn render_summary(&self, summary: &DashboardSummary) -> Vec<String> {
        let money = |amount| self.form_service.format_amount(amount);
        vec![
            format!("Income   {}", money(summary.totals.income)),
            format!("Expense  {}", money(summary.totals.expense)),
            format!("Balance  {}", money(summary.balance)),
            format!(
                "Budget   {:.1}% of {} used",
                summary.budget_consumed_percent,
                money(self.store.budget().limit)
            ),
        ]
    }

    /// One list row: date, category, title and signed amount
    pub fn render_transaction(&self, transaction: &Transaction) -> String {
        let category = transaction.display_category();
        let amount = if transaction.is_income() {
            format!("+{}", self.form_service.format_amount(transaction.amount))
        } else {
            self.form_service.format_amount(-transaction.amount)
        };

        format!(
            "{}  {} {:<13} {:<24} {:>12}  {}",
            transaction.date.format(shared::day_date::FORMAT),
            category.icon,
            category.name,
            transaction.title,
            amount,
            transaction.id
        )
    }

    fn surface_persistence_warning(&mut self) {
        if let Some(warning) = self.store.take_warning() {
            self.app_state
                .notify(NotificationLevel::Warning, warning.to_string());
        }
    }
}
