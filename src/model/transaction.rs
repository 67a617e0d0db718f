use crate::model::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a transaction adds to or subtracts from the balance.
///
/// The backend calls this field `type`; values are lowercase on the wire.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    #[default]
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionKind);
serde_plain::derive_fromstr_from_deserialize!(TransactionKind);

/// A transaction as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub amount: Amount,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Calendar date in ISO-8601 form.
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    pub user_id: Uuid,
    /// Weak reference to the owning category; not validated client-side.
    pub category_id: Uuid,
}

/// The request body for creating or updating a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub amount: Amount,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_transaction_wire_format() {
        let json = r#"{
            "id": "0b1d9e6f-4c2a-48e3-b7d5-9a3f1c8e2d74",
            "amount": 87.43,
            "type": "expense",
            "date": "2025-10-20",
            "description": "Whole Foods Market",
            "user_id": "2a9e8d4c-6b1f-4e3a-8c5d-0f7a2b9e4c61",
            "category_id": "7f2c1b7e-0f3a-4a6e-9d2b-1c9f6a3e5d40"
        }"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.kind, TransactionKind::Expense);
        assert_eq!(t.date, NaiveDate::from_ymd_opt(2025, 10, 20).unwrap());
        assert_eq!(t.amount, Amount::from_str("87.43").unwrap());
    }

    #[test]
    fn test_transaction_description_optional() {
        let json = r#"{
            "id": "0b1d9e6f-4c2a-48e3-b7d5-9a3f1c8e2d74",
            "amount": 1200,
            "type": "income",
            "date": "2025-10-01",
            "user_id": "2a9e8d4c-6b1f-4e3a-8c5d-0f7a2b9e4c61",
            "category_id": "7f2c1b7e-0f3a-4a6e-9d2b-1c9f6a3e5d40"
        }"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert!(t.description.is_none());
        assert_eq!(t.kind, TransactionKind::Income);
    }

    #[test]
    fn test_kind_round_trip_strings() {
        assert_eq!(TransactionKind::from_str("income").unwrap(), TransactionKind::Income);
        assert_eq!(TransactionKind::Expense.to_string(), "expense");
    }

    #[test]
    fn test_input_serializes_type_field() {
        let input = TransactionInput {
            amount: Amount::from_str("4.50").unwrap(),
            kind: TransactionKind::Expense,
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            description: None,
            category_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["type"], "expense");
        assert!(json.get("description").is_none());
    }
}
