use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A spending category as returned by the backend.
///
/// Identifier uniqueness is enforced server-side. Transactions reference categories by id;
/// the reference is weak and a deleted category's id may linger on old transactions.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    pub user_id: Uuid,
}

/// The request body for creating or updating a category.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>, emoji: Option<String>) -> Self {
        Self {
            name: name.into(),
            emoji,
        }
    }
}
