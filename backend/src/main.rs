use clap::{Parser, Subcommand};
use log::{error, info};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use luxe_spend_backend::domain::{NotificationLevel, Tab};
use luxe_spend_backend::{AppConfig, Backend};
use shared::{ExportToPathRequest, TimeFilter, TransactionForm, TransactionType};

#[derive(Parser)]
#[command(name = "luxe-spend")]
#[command(about = "Personal finance tracker: log transactions, view totals, trends and budget")]
struct Args {
    /// Data directory (defaults to $LUXE_SPEND_DATA_DIR or the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Totals, balance, trend, category distribution and budget consumption
    Summary {
        #[arg(long, default_value = "all")]
        filter: TimeFilter,
        /// Print readable lines instead of JSON
        #[arg(long)]
        plain: bool,
    },
    /// Transactions in the time window, newest first
    List {
        #[arg(long, default_value = "all")]
        filter: TimeFilter,
        /// Print one readable line per transaction instead of JSON
        #[arg(long)]
        plain: bool,
    },
    /// Record a new transaction
    Add {
        #[arg(long = "type", default_value = "expense")]
        transaction_type: TransactionType,
        #[arg(long)]
        title: String,
        #[arg(long)]
        amount: String,
        /// Category id (food, shopping, transport, entertainment, health, salary, others)
        #[arg(long)]
        category: Option<String>,
        /// yyyy-MM-dd, defaults to today
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Delete a transaction by id
    Remove { id: String },
    /// Set the monthly budget limit
    Budget { limit: f64 },
    /// Budget gauge and per-category spending, largest first
    Insights,
    /// Write the full history as CSV
    Export {
        /// Target directory
        #[arg(long)]
        dir: Option<String>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = AppConfig::load(args.data_dir);

    let mut backend = match Backend::new(config) {
        Ok(backend) => backend,
        Err(e) => {
            error!("Failed to open data directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    report_notification(&mut backend);
    let code = run(&mut backend, args.command);
    report_notification(&mut backend);
    code
}

fn run(backend: &mut Backend, command: Command) -> ExitCode {
    let today = Backend::today();

    match command {
        Command::Summary { filter, plain } => {
            let summary = backend.open_view(Tab::Dashboard, filter, today);
            if plain {
                for line in backend.render_summary(&summary) {
                    println!("{}", line);
                }
                ExitCode::SUCCESS
            } else {
                print_json(&summary)
            }
        }
        Command::List { filter, plain } => {
            let summary = backend.open_view(Tab::History, filter, today);
            if plain {
                for transaction in &summary.filtered_transactions {
                    println!("{}", backend.render_transaction(transaction));
                }
                ExitCode::SUCCESS
            } else {
                print_json(&summary.filtered_transactions)
            }
        }
        Command::Insights => {
            backend.app_state.select_tab(Tab::Budget);
            print_json(&backend.budget_overview())
        }
        Command::Add {
            transaction_type,
            title,
            amount,
            category,
            date,
            note,
        } => {
            backend.app_state.open_add_modal();

            let mut form = TransactionForm::new(today);
            form.transaction_type = transaction_type;
            form.title = title;
            form.amount_input = amount;
            form.note = note;
            if let Some(category) = category {
                form.category = category;
            }
            if let Some(date) = date {
                form.date_input = date;
            }

            match backend.submit_form(&form) {
                Ok(transaction) => print_json(&transaction),
                Err(errors) => {
                    for message in backend.form_service.error_messages(&errors) {
                        eprintln!("{}", message);
                    }
                    ExitCode::FAILURE
                }
            }
        }
        Command::Remove { id } => {
            if !backend.remove(&id) {
                info!("No transaction with id {}", id);
            }
            ExitCode::SUCCESS
        }
        Command::Budget { limit } => {
            backend.set_budget_limit(limit);
            print_json(backend.store.budget())
        }
        Command::Export { dir } => {
            let response = backend.export(ExportToPathRequest { custom_path: dir });
            if response.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

/// Print and dismiss whatever the backend left for the user
fn report_notification(backend: &mut Backend) {
    if let Some(notification) = backend.app_state.notification() {
        let prefix = match notification.level {
            NotificationLevel::Info => "info",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        };
        eprintln!("{}: {}", prefix, notification.message);
    }
    backend.app_state.dismiss_notification();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}
