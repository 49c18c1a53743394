use chrono::{SubsecRound, Utc};
use tracing::info;
use uuid::Uuid;

use crate::{db::DbPool, error::AppError, models::user::User};

#[derive(Clone)]
pub struct UserStore {
    db: DbPool,
}

impl UserStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Returns the user for `wallet`, creating it on first sign-in.
    pub async fn upsert_wallet(&self, wallet: &str) -> Result<User, AppError> {
        let wallet = wallet.trim().to_lowercase();
        if wallet.is_empty() {
            return Err(AppError::validation("wallet is required"));
        }

        let inserted = sqlx::query(
            r#"INSERT INTO users (id, wallet, created_at) VALUES (?1, ?2, ?3)
               ON CONFLICT (wallet) DO NOTHING"#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&wallet)
        .bind(Utc::now().trunc_subsecs(6))
        .execute(&self.db)
        .await?;

        let user = sqlx::query_as::<_, User>(
            "SELECT id, wallet, created_at FROM users WHERE wallet = ?1",
        )
        .bind(&wallet)
        .fetch_one(&self.db)
        .await?;

        if inserted.rows_affected() > 0 {
            info!(user_id = %user.id, wallet = %user.wallet, "user registered");
        }
        Ok(user)
    }
}
