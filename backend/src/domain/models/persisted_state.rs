//! The complete persisted application state.
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use shared::{Budget, Transaction};

/// Everything written under the storage key: the transaction log (newest
/// insertion first) and the budget singleton.
///
/// Missing or `null` fields load as their defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default, deserialize_with = "null_as_default")]
    pub transactions: Vec<Transaction>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget: Budget,
}

/// A stored document decoded record by record
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedState {
    pub state: PersistedState,
    /// Transactions (and a budget) that could not be read and were left out
    pub skipped_records: usize,
}

/// The document's outer shape, with records left undecoded
#[derive(Deserialize)]
struct RawDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    transactions: Vec<Value>,
    #[serde(default)]
    budget: Option<Value>,
}

impl PersistedState {
    /// Empty log with the given budget
    pub fn with_budget(budget: Budget) -> Self {
        Self {
            transactions: Vec::new(),
            budget,
        }
    }

    /// Decode a stored document one record at a time.
    ///
    /// A transaction or budget that does not decode is skipped and counted;
    /// the rest of the document still loads. Only a document that is not a
    /// JSON object with a `transactions` array is an error.
    pub fn decode_lenient(content: &str) -> serde_json::Result<DecodedState> {
        let raw: RawDocument = serde_json::from_str(content)?;
        let mut skipped_records = 0;

        let transactions = raw
            .transactions
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value::<Transaction>(value) {
                Ok(transaction) => Some(transaction),
                Err(e) => {
                    warn!("Skipping unreadable transaction at index {}: {}", index, e);
                    skipped_records += 1;
                    None
                }
            })
            .collect();

        let budget = match raw.budget {
            None | Some(Value::Null) => Budget::default(),
            Some(value) => serde_json::from_value::<Budget>(value).unwrap_or_else(|e| {
                warn!("Unreadable budget, using the default: {}", e);
                skipped_records += 1;
                Budget::default()
            }),
        };

        Ok(DecodedState {
            state: PersistedState {
                transactions,
                budget,
            },
            skipped_records,
        })
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let state: PersistedState = serde_json::from_str("{}").unwrap();
        assert!(state.transactions.is_empty());
        assert_eq!(state.budget, Budget::default());
    }

    #[test]
    fn test_null_fields_use_defaults() {
        let state: PersistedState =
            serde_json::from_str(r#"{"transactions":null,"budget":null}"#).unwrap();
        assert!(state.transactions.is_empty());
        assert_eq!(state.budget.limit, 2000.0);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let state: PersistedState =
            serde_json::from_str(r#"{"transactions":[],"theme":"dark"}"#).unwrap();
        assert!(state.transactions.is_empty());
    }

    #[test]
    fn test_decode_lenient_skips_only_bad_records() {
        let content = r#"{
            "transactions": [
                {"id":"a","title":"Coffee","amount":4.5,"type":"expense","category":"food","date":"2025-02-03"},
                {"id":"b","title":"Broken date","amount":9,"type":"expense","category":"food","date":""},
                {"id":"c","title":"No amount","type":"income","category":"salary","date":"2025-02-01"},
                {"id":"d","title":"Paycheck","amount":2500,"type":"income","category":"salary","date":"2025-02-01"}
            ],
            "budget": {"limit": 900, "period": "monthly"}
        }"#;

        let decoded = PersistedState::decode_lenient(content).unwrap();

        let ids: Vec<&str> = decoded.state.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
        assert_eq!(decoded.skipped_records, 2);
        assert_eq!(decoded.state.budget.limit, 900.0);
    }

    #[test]
    fn test_decode_lenient_defaults_unreadable_budget() {
        let decoded =
            PersistedState::decode_lenient(r#"{"transactions":[],"budget":{"limit":"lots"}}"#)
                .unwrap();

        assert_eq!(decoded.state.budget, Budget::default());
        assert_eq!(decoded.skipped_records, 1);
    }

    #[test]
    fn test_decode_lenient_clean_document() {
        let decoded = PersistedState::decode_lenient(r#"{"budget":null}"#).unwrap();

        assert_eq!(decoded.state, PersistedState::default());
        assert_eq!(decoded.skipped_records, 0);
    }

    #[test]
    fn test_decode_lenient_rejects_non_documents() {
        assert!(PersistedState::decode_lenient("{not json").is_err());
        assert!(PersistedState::decode_lenient("[1, 2]").is_err());
        assert!(PersistedState::decode_lenient(r#"{"transactions":"none"}"#).is_err());
    }
}
