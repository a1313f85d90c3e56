//! Add-transaction form handling.
//!
//! Turns raw form input into a [`NewTransaction`] or a list of validation
//! errors. Invalid input is reported back to the caller instead of being
//! dropped silently; the store never sees a transaction that failed here.

use log::debug;
use shared::{day_date, NewTransaction, TransactionForm, TransactionValidationError};

/// Validation and formatting rules for the add-transaction form
#[derive(Debug, Clone)]
pub struct TransactionFormService {
    currency_symbol: String,
}

impl TransactionFormService {
    pub fn new() -> Self {
        Self::with_currency_symbol("$")
    }

    pub fn with_currency_symbol(currency_symbol: &str) -> Self {
        Self {
            currency_symbol: currency_symbol.to_string(),
        }
    }

    /// Validate the form, returning every problem found
    pub fn validate(
        &self,
        form: &TransactionForm,
    ) -> Result<NewTransaction, Vec<TransactionValidationError>> {
        let mut errors = Vec::new();

        let title = form.title.trim();
        if title.is_empty() {
            errors.push(TransactionValidationError::EmptyTitle);
        }

        let amount = if form.amount_input.trim().is_empty() {
            errors.push(TransactionValidationError::EmptyAmount);
            None
        } else {
            match self.clean_and_parse_amount(&form.amount_input) {
                Ok(amount) if amount < 0.0 => {
                    errors.push(TransactionValidationError::NegativeAmount);
                    None
                }
                Ok(amount) => Some(amount),
                Err(_) => {
                    errors.push(TransactionValidationError::InvalidAmountFormat(
                        form.amount_input.trim().to_string(),
                    ));
                    None
                }
            }
        };

        let date = match day_date::parse(&form.date_input) {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push(TransactionValidationError::InvalidDate(
                    form.date_input.trim().to_string(),
                ));
                None
            }
        };

        match (amount, date) {
            (Some(amount), Some(date)) if errors.is_empty() => {
                let note = form.note.trim();
                Ok(NewTransaction {
                    title: title.to_string(),
                    amount,
                    transaction_type: form.transaction_type,
                    category: form.category.clone(),
                    date,
                    note: (!note.is_empty()).then(|| note.to_string()),
                })
            }
            _ => {
                debug!("Rejected transaction form: {:?}", errors);
                Err(errors)
            }
        }
    }

    /// Parse an amount after removing the currency symbol, commas and spaces
    pub fn clean_and_parse_amount(&self, amount_input: &str) -> Result<f64, String> {
        let cleaned = amount_input
            .trim()
            .replace(&self.currency_symbol, "")
            .replace(',', "")
            .replace(' ', "");

        if cleaned.is_empty() {
            return Err("Empty amount after cleaning".to_string());
        }

        let amount = cleaned
            .parse::<f64>()
            .map_err(|e| format!("Invalid number format: {}", e))?;

        if amount.is_finite() {
            Ok(amount)
        } else {
            Err(format!("Amount is not a finite number: {}", cleaned))
        }
    }

    /// Format an amount for display, e.g. `$1234.50` or `-$20.00`
    pub fn format_amount(&self, amount: f64) -> String {
        if amount < 0.0 {
            format!("-{}{:.2}", self.currency_symbol, amount.abs())
        } else {
            format!("{}{:.2}", self.currency_symbol, amount)
        }
    }

    /// User-facing messages for a list of validation errors
    pub fn error_messages(&self, errors: &[TransactionValidationError]) -> Vec<String> {
        errors.iter().map(|e| e.to_string()).collect()
    }
}

impl Default for TransactionFormService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::TransactionType;

    fn filled_form() -> TransactionForm {
        TransactionForm {
            title: "  Groceries ".to_string(),
            amount_input: "42.10".to_string(),
            transaction_type: TransactionType::Expense,
            category: "food".to_string(),
            date_input: "2025-01-15".to_string(),
            note: "weekly shop".to_string(),
        }
    }

    #[test]
    fn test_validate_success() {
        let service = TransactionFormService::new();

        let tx = service.validate(&filled_form()).unwrap();

        assert_eq!(tx.title, "Groceries");
        assert_eq!(tx.amount, 42.10);
        assert_eq!(tx.transaction_type, TransactionType::Expense);
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(tx.note.as_deref(), Some("weekly shop"));
    }

    #[test]
    fn test_blank_note_becomes_none() {
        let service = TransactionFormService::new();
        let mut form = filled_form();
        form.note = "   ".to_string();

        assert_eq!(service.validate(&form).unwrap().note, None);
    }

    #[test]
    fn test_empty_title_and_amount_are_reported_together() {
        let service = TransactionFormService::new();
        let mut form = filled_form();
        form.title = " ".to_string();
        form.amount_input = String::new();

        let errors = service.validate(&form).unwrap_err();

        assert_eq!(
            errors,
            vec![
                TransactionValidationError::EmptyTitle,
                TransactionValidationError::EmptyAmount
            ]
        );
    }

    #[test]
    fn test_invalid_amount_and_date() {
        let service = TransactionFormService::new();
        let mut form = filled_form();
        form.amount_input = "twelve".to_string();
        form.date_input = "15/01/2025".to_string();

        let errors = service.validate(&form).unwrap_err();

        assert!(matches!(errors[0], TransactionValidationError::InvalidAmountFormat(ref s) if s == "twelve"));
        assert!(matches!(errors[1], TransactionValidationError::InvalidDate(_)));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let service = TransactionFormService::new();
        let mut form = filled_form();
        form.amount_input = "-5".to_string();

        let errors = service.validate(&form).unwrap_err();
        assert_eq!(errors, vec![TransactionValidationError::NegativeAmount]);
    }

    #[test]
    fn test_zero_amount_accepted() {
        let service = TransactionFormService::new();
        let mut form = filled_form();
        form.amount_input = "0".to_string();

        assert_eq!(service.validate(&form).unwrap().amount, 0.0);
    }

    #[test]
    fn test_clean_and_parse_amount() {
        let service = TransactionFormService::new();

        assert_eq!(service.clean_and_parse_amount("10.50").unwrap(), 10.50);
        assert_eq!(service.clean_and_parse_amount("$10.50").unwrap(), 10.50);
        assert_eq!(service.clean_and_parse_amount(" $1,234.56 ").unwrap(), 1234.56);

        assert!(service.clean_and_parse_amount("abc").is_err());
        assert!(service.clean_and_parse_amount("$").is_err());
        assert!(service.clean_and_parse_amount("inf").is_err());
        assert!(service.clean_and_parse_amount("NaN").is_err());
    }

    #[test]
    fn test_custom_currency_symbol() {
        let service = TransactionFormService::with_currency_symbol("€");

        assert_eq!(service.clean_and_parse_amount("€7").unwrap(), 7.0);
        assert_eq!(service.format_amount(7.0), "€7.00");
    }

    #[test]
    fn test_format_amount() {
        let service = TransactionFormService::new();

        assert_eq!(service.format_amount(1234.5), "$1234.50");
        assert_eq!(service.format_amount(-20.0), "-$20.00");
        assert_eq!(service.format_amount(0.0), "$0.00");
    }

    #[test]
    fn test_error_messages() {
        let service = TransactionFormService::new();
        let messages = service.error_messages(&[
            TransactionValidationError::EmptyTitle,
            TransactionValidationError::EmptyAmount,
        ]);

        assert_eq!(messages, vec!["Please enter a title", "Please enter an amount"]);
    }
}
