//! The backend API seam.
//!
//! Everything the REST backend can do is expressed by the [`Backend`] trait. The real
//! implementation ([`http::HttpBackend`]) talks to the server with reqwest; an in-memory
//! implementation ([`test_backend::TestBackend`]) holds data in a map so the whole app can
//! run, top-to-bottom, without a server.

mod http;
mod test_backend;

pub use http::HttpBackend;
pub use test_backend::TestBackend;

use crate::error::ApiError;
use crate::model::{
    Category, CategoryInput, ChartPoint, Summary, TokenResponse, Transaction, TransactionInput,
};
use crate::{Config, Storage};
use std::sync::Arc;
use uuid::Uuid;

/// Set this environment variable to a non-empty value to run against the in-memory backend.
pub const TEST_MODE_VAR: &str = "POCKETBOOK_IN_TEST_MODE";

/// Every operation the REST backend exposes.
///
/// Mutations live here, not on the data store; after mutating, callers reload the affected
/// store container to re-synchronize.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn signup(&self, email: &str, password: &str) -> Result<(), ApiError>;
    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError>;
    async fn resend_verification(&self, email: &str) -> Result<(), ApiError>;

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;
    async fn create_category(&self, input: &CategoryInput) -> Result<Category, ApiError>;
    async fn update_category(&self, id: Uuid, input: &CategoryInput)
        -> Result<Category, ApiError>;
    async fn delete_category(&self, id: Uuid) -> Result<(), ApiError>;

    async fn list_transactions(&self) -> Result<Vec<Transaction>, ApiError>;
    async fn create_transaction(&self, input: &TransactionInput)
        -> Result<Transaction, ApiError>;
    async fn update_transaction(
        &self,
        id: Uuid,
        input: &TransactionInput,
    ) -> Result<Transaction, ApiError>;
    async fn delete_transaction(&self, id: Uuid) -> Result<(), ApiError>;

    async fn summary(&self) -> Result<Summary, ApiError>;
    async fn chart_data(&self) -> Result<Vec<ChartPoint>, ApiError>;

    async fn export_csv(&self) -> Result<Vec<u8>, ApiError>;
}

/// Selects which [`Backend`] implementation to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Talk to the real REST backend.
    Http,
    /// Use the in-memory test backend.
    Test,
}

impl Mode {
    /// This allows for exercising the program without a running server. When
    /// [`TEST_MODE_VAR`] is set and non-zero in length, the mode will be `Mode::Test`,
    /// otherwise it will be `Mode::Http`.
    pub fn from_env() -> Mode {
        match std::env::var(TEST_MODE_VAR) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Http,
        }
    }
}

/// Constructs the backend for `mode`.
pub fn backend(config: &Config, storage: Storage, mode: Mode) -> Arc<dyn Backend> {
    match mode {
        Mode::Http => Arc::new(HttpBackend::new(config.api_base_url().clone(), storage)),
        Mode::Test => Arc::new(TestBackend::seeded()),
    }
}
