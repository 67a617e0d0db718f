//! Implements the `Backend` trait against the REST API using reqwest.

use crate::api::Backend;
use crate::error::ApiError;
use crate::model::{
    Category, CategoryInput, ChartDataResponse, ChartPoint, Summary, TokenResponse, Transaction,
    TransactionInput,
};
use crate::storage::{Storage, JWT_TOKEN};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::trace;
use url::Url;
use uuid::Uuid;

const CATEGORIES: &str = "/api/v1/categories/";
const TRANSACTIONS: &str = "/api/v1/transactions/";
const SUMMARY: &str = "/api/v1/dashboard/summary";
const CHART_DATA: &str = "/api/v1/dashboard/chart-data";
const SIGNUP: &str = "/api/v1/auth/signup";
const LOGIN: &str = "/api/v1/auth/login";
const RESEND_VERIFICATION: &str = "/api/v1/auth/resend-verification";
const EXPORT_CSV: &str = "/api/v1/export/csv";

/// The reqwest-backed API client.
///
/// The bearer token is read from durable storage at request time, so a login or logout in
/// the same process is picked up by the next request without reconstructing the client.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: Url,
    storage: Storage,
}

impl HttpBackend {
    pub fn new(base_url: Url, storage: Storage) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            storage,
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Attaches `Authorization: Bearer <token>` when a token is present in durable storage.
    /// With no token the header is omitted entirely, not sent empty.
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.storage.get(JWT_TOKEN) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends a request and applies the shared response policy. `Ok(None)` means 204.
    async fn send(&self, builder: RequestBuilder) -> Result<Option<Vec<u8>>, ApiError> {
        let response = self.authorize(builder).send().await?;
        let status = response.status();
        trace!("{status} from {}", response.url());
        let body = response.bytes().await?;
        evaluate(status, body.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.send(self.http.get(self.url(path))).await?;
        decode(body)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.send(self.http.post(self.url(path)).json(body)).await?;
        decode(body)
    }

    async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.send(self.http.put(self.url(path)).json(body)).await?;
        decode(body)
    }

    /// Deletes ignore any response body: some endpoints answer 204, others a JSON receipt.
    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let _ = self.send(self.http.delete(self.url(path))).await?;
        Ok(())
    }

    /// Fetches raw bytes, bypassing JSON handling on success. Non-2xx detection is the
    /// same as for JSON requests.
    async fn get_blob(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let body = self.send(self.http.get(self.url(path))).await?;
        Ok(body.unwrap_or_default())
    }
}

/// Decides what a response means from its status and raw body alone.
///
/// - 204 resolves empty; the body (there should be none) is never parsed.
/// - Any other non-2xx becomes an [`ApiError::Http`] carrying the body's `detail` if one
///   can be extracted.
/// - 2xx passes the body through for the caller to decode.
fn evaluate(status: StatusCode, body: Vec<u8>) -> Result<Option<Vec<u8>>, ApiError> {
    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(ApiError::from_response(status, &body));
    }
    Ok(Some(body))
}

/// Decodes a JSON payload, treating an empty (204) result as JSON `null`.
fn decode<T: DeserializeOwned>(body: Option<Vec<u8>>) -> Result<T, ApiError> {
    let result = match body {
        Some(bytes) => serde_json::from_slice(&bytes),
        None => serde_json::from_value(serde_json::Value::Null),
    };
    result.map_err(|e| ApiError::decode(e.to_string()))
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn signup(&self, email: &str, password: &str) -> Result<(), ApiError> {
        // The response body (a provider user record) carries nothing we keep.
        let _: serde_json::Value = self
            .post_json(SIGNUP, &serde_json::json!({ "email": email, "password": password }))
            .await?;
        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        // The login endpoint takes form-encoded credentials, not JSON.
        let builder = self
            .http
            .post(self.url(LOGIN))
            .form(&[("username", username), ("password", password)]);
        let body = self.send(builder).await?;
        decode(body)
    }

    async fn resend_verification(&self, email: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .post_json(RESEND_VERIFICATION, &serde_json::json!({ "email": email }))
            .await?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get_json(CATEGORIES).await
    }

    async fn create_category(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        self.post_json(CATEGORIES, input).await
    }

    async fn update_category(
        &self,
        id: Uuid,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        self.put_json(&format!("{CATEGORIES}{id}"), input).await
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("{CATEGORIES}{id}")).await
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        self.get_json(TRANSACTIONS).await
    }

    async fn create_transaction(&self, input: &TransactionInput) -> Result<Transaction, ApiError> {
        self.post_json(TRANSACTIONS, input).await
    }

    async fn update_transaction(
        &self,
        id: Uuid,
        input: &TransactionInput,
    ) -> Result<Transaction, ApiError> {
        self.put_json(&format!("{TRANSACTIONS}{id}"), input).await
    }

    async fn delete_transaction(&self, id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("{TRANSACTIONS}{id}")).await
    }

    async fn summary(&self) -> Result<Summary, ApiError> {
        self.get_json(SUMMARY).await
    }

    async fn chart_data(&self) -> Result<Vec<ChartPoint>, ApiError> {
        let response: ChartDataResponse = self.get_json(CHART_DATA).await?;
        Ok(response.data)
    }

    async fn export_csv(&self) -> Result<Vec<u8>, ApiError> {
        self.get_blob(EXPORT_CSV).await
    }
}
