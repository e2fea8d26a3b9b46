//! Store user (identity) row type.
//!
//! Authentication happens outside this system; users arrive here as rows
//! kept in sync by the identity provider, plus profile fields (address,
//! phone) that checkout updates as a side effect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Role of a store user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    #[default]
    Customer,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreUser {
    pub id: UserId,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
    /// Deactivated users keep their rows but are blocked by the identity
    /// provider; the admin panel toggles this flag.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
