//! Implements the `Backend` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run
//! the whole app, top-to-bottom, without a server (see [`crate::api::Mode`]). It behaves
//! like the real backend in the ways the synchronization layer cares about: aggregates are
//! computed from the current transaction set, and errors carry a `detail` message.

use crate::api::Backend;
use crate::error::ApiError;
use crate::model::{
    Category, CategoryInput, ChartPoint, Summary, TokenResponse, Transaction, TransactionInput,
    TransactionKind,
};
use chrono::NaiveDate;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Mutex;
use uuid::{uuid, Uuid};

const DEMO_USER: Uuid = uuid!("2a9e8d4c-6b1f-4e3a-8c5d-0f7a2b9e4c61");
const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "password";

/// An implementation of the `Backend` trait that keeps its data in memory. By default it is
/// seeded with a demo user and some existing data.
pub struct TestBackend {
    state: Mutex<State>,
    /// Ordered record of operations, for assertions about call sequencing.
    calls: Mutex<Vec<&'static str>>,
    /// Operations armed to fail once with an injected error.
    failures: Mutex<Vec<&'static str>>,
}

#[derive(Debug, Clone, Default)]
struct State {
    users: BTreeMap<String, String>,
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    /// When set, `login` issues exactly this token instead of minting one.
    issue_token: Option<String>,
}

impl TestBackend {
    /// Creates an empty backend with a single known user and no data.
    pub fn new() -> Self {
        let mut users = BTreeMap::new();
        users.insert(DEMO_EMAIL.to_string(), DEMO_PASSWORD.to_string());
        Self {
            state: Mutex::new(State {
                users,
                ..State::default()
            }),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Creates a backend seeded with demo categories and transactions.
    pub fn seeded() -> Self {
        let backend = Self::new();
        {
            let mut state = backend.state.lock().expect("test backend lock");
            let groceries = uuid!("7f2c1b7e-0f3a-4a6e-9d2b-1c9f6a3e5d40");
            let utilities = uuid!("93d5a8e1-2c7b-4f19-b6a4-5e8d0c3f7a12");
            let salary = uuid!("c4b8f2d6-9a1e-4735-8d0b-6f2e9c5a1b83");
            state.categories = vec![
                Category {
                    id: groceries,
                    name: "Groceries".to_string(),
                    emoji: Some("🛒".to_string()),
                    user_id: DEMO_USER,
                },
                Category {
                    id: utilities,
                    name: "Utilities".to_string(),
                    emoji: Some("💡".to_string()),
                    user_id: DEMO_USER,
                },
                Category {
                    id: salary,
                    name: "Salary".to_string(),
                    emoji: Some("💰".to_string()),
                    user_id: DEMO_USER,
                },
            ];
            state.transactions = vec![
                seed_transaction(salary, TransactionKind::Income, "3000", 2025, 10, 1, "Paycheck"),
                seed_transaction(
                    groceries,
                    TransactionKind::Expense,
                    "87.43",
                    2025,
                    10,
                    20,
                    "Whole Foods Market",
                ),
                seed_transaction(
                    groceries,
                    TransactionKind::Expense,
                    "63.21",
                    2025,
                    10,
                    15,
                    "Trader Joe's",
                ),
                seed_transaction(
                    utilities,
                    TransactionKind::Expense,
                    "142.67",
                    2025,
                    10,
                    16,
                    "Electric bill",
                ),
            ];
        }
        backend
    }

    /// Arms `op` to fail once with an injected HTTP 500.
    pub(crate) fn fail_once(&self, op: &'static str) {
        self.failures.lock().expect("test backend lock").push(op);
    }

    /// Overrides the token issued by successful logins. An empty string simulates a 2xx
    /// login response with no usable token.
    pub(crate) fn issue_token(&self, token: impl Into<String>) {
        self.state.lock().expect("test backend lock").issue_token = Some(token.into());
    }

    /// The ordered operation log.
    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("test backend lock").clone()
    }

    fn record(&self, op: &'static str) -> Result<(), ApiError> {
        self.calls.lock().expect("test backend lock").push(op);
        let mut failures = self.failures.lock().expect("test backend lock");
        if let Some(position) = failures.iter().position(|armed| *armed == op) {
            failures.remove(position);
            return Err(ApiError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: Some(format!("injected failure in {op}")),
            });
        }
        Ok(())
    }

    fn compute_summary(state: &State) -> Summary {
        let mut income = Decimal::ZERO;
        let mut expenses = Decimal::ZERO;
        for transaction in &state.transactions {
            match transaction.kind {
                TransactionKind::Income => income += transaction.amount.value(),
                TransactionKind::Expense => expenses += transaction.amount.value(),
            }
        }
        Summary {
            total_income: income.into(),
            total_expenses: expenses.into(),
            net_balance: (income - expenses).into(),
        }
    }

    fn compute_chart(state: &State) -> Vec<ChartPoint> {
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for transaction in &state.transactions {
            if transaction.kind != TransactionKind::Expense {
                continue;
            }
            let name = state
                .categories
                .iter()
                .find(|c| c.id == transaction.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "Uncategorized".to_string());
            *totals.entry(name).or_default() += transaction.amount.value();
        }
        let mut points: Vec<ChartPoint> = totals
            .into_iter()
            .map(|(category_name, total)| ChartPoint {
                category_name,
                total_amount: total.into(),
            })
            .collect();
        points.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
        points
    }

    fn not_found(what: &str) -> ApiError {
        ApiError::Http {
            status: StatusCode::NOT_FOUND,
            detail: Some(format!("{what} not found")),
        }
    }
}

impl Default for TestBackend {
    fn default() -> Self {
        Self::seeded()
    }
}

fn seed_transaction(
    category_id: Uuid,
    kind: TransactionKind,
    amount: &str,
    year: i32,
    month: u32,
    day: u32,
    description: &str,
) -> Transaction {
    Transaction {
        id: Uuid::new_v4(),
        amount: Decimal::from_str(amount).unwrap_or_default().into(),
        kind,
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        description: Some(description.to_string()),
        user_id: DEMO_USER,
        category_id,
    }
}

#[async_trait::async_trait]
impl Backend for TestBackend {
    async fn signup(&self, email: &str, password: &str) -> Result<(), ApiError> {
        self.record("signup")?;
        let mut state = self.state.lock().expect("test backend lock");
        if state.users.contains_key(email) {
            return Err(ApiError::Http {
                status: StatusCode::BAD_REQUEST,
                detail: Some(
                    "A user with this email already exists. Please log in or use a different \
                     email."
                        .to_string(),
                ),
            });
        }
        state.users.insert(email.to_string(), password.to_string());
        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        self.record("login")?;
        let state = self.state.lock().expect("test backend lock");
        match state.users.get(username) {
            Some(stored) if stored == password => {}
            _ => {
                return Err(ApiError::Http {
                    status: StatusCode::UNAUTHORIZED,
                    detail: Some("Invalid credentials".to_string()),
                })
            }
        }
        let access_token = state
            .issue_token
            .clone()
            .unwrap_or_else(|| format!("test-token-{}", Uuid::new_v4()));
        Ok(TokenResponse {
            access_token,
            token_type: Some("bearer".to_string()),
        })
    }

    async fn resend_verification(&self, email: &str) -> Result<(), ApiError> {
        self.record("resend_verification")?;
        let state = self.state.lock().expect("test backend lock");
        if !state.users.contains_key(email) {
            return Err(Self::not_found("User"));
        }
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.record("list_categories")?;
        let state = self.state.lock().expect("test backend lock");
        let mut categories = state.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn create_category(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        self.record("create_category")?;
        let mut state = self.state.lock().expect("test backend lock");
        let category = Category {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            emoji: input.emoji.clone(),
            user_id: DEMO_USER,
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: Uuid,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        self.record("update_category")?;
        let mut state = self.state.lock().expect("test backend lock");
        let category = state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Self::not_found("Category"))?;
        category.name = input.name.clone();
        category.emoji = input.emoji.clone();
        Ok(category.clone())
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), ApiError> {
        self.record("delete_category")?;
        let mut state = self.state.lock().expect("test backend lock");
        let in_use = state
            .transactions
            .iter()
            .filter(|t| t.category_id == id)
            .count();
        if in_use > 0 {
            return Err(ApiError::Http {
                status: StatusCode::BAD_REQUEST,
                detail: Some(format!(
                    "Cannot delete category: It is currently in use by {in_use} transaction(s)."
                )),
            });
        }
        let before = state.categories.len();
        state.categories.retain(|c| c.id != id);
        if state.categories.len() == before {
            return Err(Self::not_found("Category"));
        }
        Ok(())
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        self.record("list_transactions")?;
        let state = self.state.lock().expect("test backend lock");
        let mut transactions = state.transactions.clone();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    async fn create_transaction(&self, input: &TransactionInput) -> Result<Transaction, ApiError> {
        self.record("create_transaction")?;
        let mut state = self.state.lock().expect("test backend lock");
        let transaction = Transaction {
            id: Uuid::new_v4(),
            amount: input.amount,
            kind: input.kind,
            date: input.date,
            description: input.description.clone(),
            user_id: DEMO_USER,
            category_id: input.category_id,
        };
        state.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn update_transaction(
        &self,
        id: Uuid,
        input: &TransactionInput,
    ) -> Result<Transaction, ApiError> {
        self.record("update_transaction")?;
        let mut state = self.state.lock().expect("test backend lock");
        let transaction = state
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Self::not_found("Transaction"))?;
        transaction.amount = input.amount;
        transaction.kind = input.kind;
        transaction.date = input.date;
        transaction.description = input.description.clone();
        transaction.category_id = input.category_id;
        Ok(transaction.clone())
    }

    async fn delete_transaction(&self, id: Uuid) -> Result<(), ApiError> {
        self.record("delete_transaction")?;
        let mut state = self.state.lock().expect("test backend lock");
        let before = state.transactions.len();
        state.transactions.retain(|t| t.id != id);
        if state.transactions.len() == before {
            return Err(Self::not_found("Transaction"));
        }
        Ok(())
    }

    async fn summary(&self) -> Result<Summary, ApiError> {
        self.record("summary")?;
        let state = self.state.lock().expect("test backend lock");
        Ok(Self::compute_summary(&state))
    }

    async fn chart_data(&self) -> Result<Vec<ChartPoint>, ApiError> {
        self.record("chart_data")?;
        let state = self.state.lock().expect("test backend lock");
        Ok(Self::compute_chart(&state))
    }

    async fn export_csv(&self) -> Result<Vec<u8>, ApiError> {
        self.record("export_csv")?;
        let state = self.state.lock().expect("test backend lock");
        let mut transactions = state.transactions.clone();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["Date", "Description", "Category", "Amount", "Type"])
            .map_err(|e| ApiError::decode(e.to_string()))?;
        for transaction in &transactions {
            let category_name = state
                .categories
                .iter()
                .find(|c| c.id == transaction.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "Uncategorized".to_string());
            writer
                .write_record([
                    transaction.date.to_string(),
                    transaction.description.clone().unwrap_or_default(),
                    category_name,
                    transaction.amount.value().to_string(),
                    transaction.kind.to_string(),
                ])
                .map_err(|e| ApiError::decode(e.to_string()))?;
        }
        writer
            .into_inner()
            .map_err(|e| ApiError::decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_login_good_credentials() {
        let backend = TestBackend::new();
        let response = backend.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
        assert!(!response.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_login_bad_credentials() {
        let backend = TestBackend::new();
        let err = backend.login(DEMO_EMAIL, "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_signup_duplicate_email() {
        let backend = TestBackend::new();
        let err = backend.signup(DEMO_EMAIL, "pw").await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_summary_reflects_transactions() {
        let backend = TestBackend::seeded();
        let summary = backend.summary().await.unwrap();
        assert_eq!(summary.total_income, Amount::from_str("3000").unwrap());
        assert_eq!(summary.total_expenses, Amount::from_str("293.31").unwrap());
        assert_eq!(summary.net_balance, Amount::from_str("2706.69").unwrap());
    }

    #[tokio::test]
    async fn test_chart_data_groups_expenses_by_category() {
        let backend = TestBackend::seeded();
        let points = backend.chart_data().await.unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].category_name, "Groceries");
        assert_eq!(points[0].total_amount, Amount::from_str("150.64").unwrap());
        assert_eq!(points[1].category_name, "Utilities");
    }

    #[tokio::test]
    async fn test_delete_category_in_use_is_refused() {
        let backend = TestBackend::seeded();
        let categories = backend.list_categories().await.unwrap();
        let groceries = categories.iter().find(|c| c.name == "Groceries").unwrap();
        let err = backend.delete_category(groceries.id).await.unwrap_err();
        assert!(err.to_string().contains("currently in use"));
    }

    #[tokio::test]
    async fn test_injected_failure_fires_once() {
        let backend = TestBackend::seeded();
        backend.fail_once("list_transactions");
        assert!(backend.list_transactions().await.is_err());
        assert!(backend.list_transactions().await.is_ok());
    }

    #[tokio::test]
    async fn test_export_csv_shape() {
        let backend = TestBackend::seeded();
        let bytes = backend.export_csv().await.unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "Date");
        assert_eq!(&headers[4], "Type");
        assert_eq!(reader.records().count(), 4);
    }
}
