//! Types that represent the core data model, such as `Transaction` and `Category`.
mod amount;
mod category;
mod summary;
mod transaction;

pub use amount::{Amount, AmountError};
pub use category::{Category, CategoryInput};
pub use summary::{ChartDataResponse, ChartPoint, Summary};
pub use transaction::{Transaction, TransactionInput, TransactionKind};

use serde::{Deserialize, Serialize};

/// The body of a successful login response.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}
