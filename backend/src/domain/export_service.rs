//! Export service domain logic for the finance tracker.
//!
//! Exports the full transaction history (the time filter never applies) as a
//! CSV table with the columns `Date, Title, Type, Category, Amount, Note`,
//! one row per transaction in store order. Writing the file is best effort:
//! failures are returned as an unsuccessful response so the UI can show a
//! dismissable message.

use anyhow::{anyhow, Result};
use log::{error, info};
use std::fs;
use std::path::PathBuf;

use shared::{day_date, ExportDataResponse, ExportToPathRequest, ExportToPathResponse, Transaction};

pub const EXPORT_FILENAME: &str = "LuxeSpend_History.csv";
pub const EXPORT_HEADER: [&str; 6] = ["Date", "Title", "Type", "Category", "Amount", "Note"];

/// Export service that handles all export-related business logic
#[derive(Debug, Clone)]
pub struct ExportService {
    default_directory: Option<PathBuf>,
}

impl ExportService {
    pub fn new() -> Self {
        Self {
            default_directory: None,
        }
    }

    /// Export service that writes to `directory` when a request names no path
    pub fn with_default_directory(directory: PathBuf) -> Self {
        Self {
            default_directory: Some(directory),
        }
    }

    /// Render all transactions as CSV content
    pub fn export_transactions_csv(&self, transactions: &[Transaction]) -> Result<ExportDataResponse> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(EXPORT_HEADER)?;

        for transaction in transactions {
            writer.write_record([
                transaction.date.format(day_date::FORMAT).to_string(),
                transaction.title.clone(),
                transaction.transaction_type.to_string(),
                transaction.category.clone(),
                transaction.amount.to_string(),
                transaction.note.clone().unwrap_or_default(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow!("Failed to finish CSV export: {}", e))?;
        let csv_content = String::from_utf8(bytes)?;

        info!("Rendered {} transactions for export", transactions.len());

        Ok(ExportDataResponse {
            csv_content,
            filename: EXPORT_FILENAME.to_string(),
            transaction_count: transactions.len(),
        })
    }

    /// Write the export file to the requested directory, the configured
    /// default, or the user's documents directory
    pub fn export_to_path(
        &self,
        transactions: &[Transaction],
        request: ExportToPathRequest,
    ) -> ExportToPathResponse {
        info!("Exporting to path - custom_path: {:?}", request.custom_path);

        let export = match self.export_transactions_csv(transactions) {
            Ok(export) => export,
            Err(e) => {
                error!("Failed to render export: {}", e);
                return Self::failure(format!("Failed to prepare export: {}", e), String::new());
            }
        };

        let export_dir = match self.resolve_directory(request.custom_path.as_deref()) {
            Some(dir) => dir,
            None => {
                error!("Could not determine export directory");
                return Self::failure("Failed to determine export directory".to_string(), String::new());
            }
        };

        let file_path = export_dir.join(&export.filename);

        if let Err(e) = fs::create_dir_all(&export_dir) {
            error!("Failed to create export directory {:?}: {}", export_dir, e);
            return Self::failure(
                format!("Failed to create export directory: {}", e),
                export_dir.to_string_lossy().to_string(),
            );
        }

        match fs::write(&file_path, &export.csv_content) {
            Ok(()) => {
                let file_path_str = file_path.to_string_lossy().to_string();
                info!(
                    "Exported {} transactions to {}",
                    export.transaction_count, file_path_str
                );
                ExportToPathResponse {
                    success: true,
                    message: format!("File exported successfully to: {}", file_path_str),
                    file_path: file_path_str,
                    transaction_count: export.transaction_count,
                }
            }
            Err(e) => {
                error!("Failed to write export file to {:?}: {}", file_path, e);
                Self::failure(
                    format!("Failed to write export file: {}", e),
                    file_path.to_string_lossy().to_string(),
                )
            }
        }
    }

    fn resolve_directory(&self, custom_path: Option<&str>) -> Option<PathBuf> {
        match custom_path {
            Some(path) if !path.trim().is_empty() => Some(PathBuf::from(self.sanitize_path(path))),
            _ => self
                .default_directory
                .clone()
                .or_else(dirs::document_dir)
                .or_else(dirs::home_dir),
        }
    }

    fn failure(message: String, file_path: String) -> ExportToPathResponse {
        ExportToPathResponse {
            success: false,
            message,
            file_path,
            transaction_count: 0,
        }
    }

    /// Basic path sanitization to handle common user input issues
    fn sanitize_path(&self, path: &str) -> String {
        let mut cleaned = path.trim().to_string();

        if cleaned.len() >= 2
            && ((cleaned.starts_with('"') && cleaned.ends_with('"'))
                || (cleaned.starts_with('\'') && cleaned.ends_with('\'')))
        {
            cleaned = cleaned[1..cleaned.len() - 1].trim().to_string();
        }

        cleaned = cleaned.replace("\\ ", " ");

        while cleaned.len() > 1 && (cleaned.ends_with('/') || cleaned.ends_with('\\')) {
            cleaned.pop();
        }

        if let Some(rest) = cleaned.strip_prefix('~') {
            if let Some(home) = dirs::home_dir() {
                if rest.is_empty() {
                    cleaned = home.to_string_lossy().to_string();
                } else if let Some(relative) = rest.strip_prefix('/').or_else(|| rest.strip_prefix('\\')) {
                    cleaned = home.join(relative).to_string_lossy().to_string();
                }
            }
        }

        cleaned
    }
}

impl Default for ExportService {
    fn default() -> Self {
        Self::new()
    }
}
