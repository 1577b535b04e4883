use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category assigned to documents stored without one.
pub const UNCATEGORIZED: &str = "Uncategorized";

fn uncategorized() -> String {
    UNCATEGORIZED.to_owned()
}

/// A titled, categorized unit of Markdown content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "uncategorized")]
    pub category: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document {
    /// List projection; the content stays behind.
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id,
            title: self.title.clone(),
            category: self.category.clone(),
            created_at: self.created_at,
        }
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Orders summaries newest first; ids break ties so the order is total.
pub fn sort_newest_first<T: std::borrow::Borrow<DocumentSummary>>(summaries: &mut [T]) {
    summaries.sort_by_key(|summary| {
        let summary = summary.borrow();
        (Reverse(summary.created_at), Reverse(summary.id))
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
}

/// Stored account record. The hash is serialized under `password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub role: Role,
}

impl User {
    pub fn session(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// What a session remembers about the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: u64,
    pub username: String,
    pub role: Role,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub logged_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

impl AuthStatus {
    pub fn from_session(user: Option<&SessionUser>) -> Self {
        AuthStatus {
            logged_in: user.is_some(),
            user: user.cloned(),
        }
    }
}
