use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A wallet that has signed in at least once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: String,
    /// Lowercased `0x` address.
    pub wallet: String,
    pub created_at: DateTime<Utc>,
}

/// Response of `POST /auth/siwe`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionToken {
    pub token: String,
    pub user: User,
}
