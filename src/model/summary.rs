use crate::model::Amount;
use serde::{Deserialize, Serialize};

/// Aggregate totals over the full transaction set.
///
/// Always a pure function of the transactions held by the backend; never edited directly.
/// The client refetches it whenever the transaction collection changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total_income: Amount,
    pub total_expenses: Amount,
    pub net_balance: Amount,
}

/// Per-category expense total, one slice of the dashboard chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub category_name: String,
    pub total_amount: Amount,
}

/// The chart endpoint wraps its points in a status envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDataResponse {
    pub status: String,
    pub data: Vec<ChartPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_summary_wire_format() {
        let json = r#"{"total_income": 3000.0, "total_expenses": 1250.5, "net_balance": 1749.5}"#;
        let summary: Summary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.net_balance, Amount::from_str("1749.5").unwrap());
    }

    #[test]
    fn test_summary_default_is_zeroed() {
        let summary = Summary::default();
        assert!(summary.total_income.is_zero());
        assert!(summary.total_expenses.is_zero());
        assert!(summary.net_balance.is_zero());
    }

    #[test]
    fn test_chart_envelope() {
        let json = r#"{
            "status": "success",
            "data": [
                {"category_name": "Food", "total_amount": 100.0},
                {"category_name": "Transport", "total_amount": 50.0}
            ]
        }"#;
        let response: ChartDataResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].category_name, "Food");
    }
}
