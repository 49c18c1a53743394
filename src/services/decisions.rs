use std::collections::HashSet;

use chrono::{DateTime, SubsecRound, Utc};
use sqlx::FromRow;
use tracing::info;

use crate::{
    db::DbPool,
    error::AppError,
    models::decision::{Decision, DecisionOutcome, MutualMatch, TripDecision},
    services::trips::TripStore,
};

#[derive(Debug, FromRow)]
struct MutualRow {
    my_trip_id: String,
    their_trip_id: String,
    other_user_id: String,
    my_like_at: DateTime<Utc>,
    their_like_at: DateTime<Utc>,
}

/// Like/pass records per (user, trip). A mutual match is a join over them,
/// never a guess.
#[derive(Clone)]
pub struct DecisionLedger {
    db: DbPool,
    trips: TripStore,
}

impl DecisionLedger {
    pub fn new(db: DbPool, trips: TripStore) -> Self {
        Self { db, trips }
    }

    pub async fn record(
        &self,
        user_id: &str,
        trip_id: &str,
        decision: Decision,
    ) -> Result<DecisionOutcome, AppError> {
        let trip = self.trips.find_trip_by_id(trip_id).await?;
        if trip.owner_id == user_id {
            return Err(AppError::validation("cannot like or pass on your own trip"));
        }

        let record = TripDecision {
            user_id: user_id.to_string(),
            trip_id: trip.id.clone(),
            decision,
            decided_at: Utc::now().trunc_subsecs(6),
        };

        // The primary key makes the first write win; a repeat is reported, not
        // silently overwritten.
        let result = sqlx::query(
            r#"INSERT INTO trip_decisions (user_id, trip_id, decision, decided_at)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT (user_id, trip_id) DO NOTHING"#,
        )
        .bind(&record.user_id)
        .bind(&record.trip_id)
        .bind(decision.as_str())
        .bind(record.decided_at)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::AlreadyDecided {
                trip_id: record.trip_id,
            });
        }

        let mutual = match decision {
            Decision::Like => self.has_liked_trip_of(&trip.owner_id, user_id).await?,
            Decision::Pass => false,
        };

        info!(
            user_id = %record.user_id,
            trip_id = %record.trip_id,
            decision = %decision,
            mutual,
            "decision recorded"
        );
        Ok(DecisionOutcome {
            decision: record,
            mutual,
        })
    }

    /// Whether `user_id` has liked any trip owned by `owner_id`.
    pub async fn has_liked_trip_of(&self, user_id: &str, owner_id: &str) -> Result<bool, AppError> {
        let found: i64 = sqlx::query_scalar(
            r#"SELECT EXISTS (
                SELECT 1 FROM trip_decisions d
                JOIN trips t ON t.id = d.trip_id
                WHERE d.user_id = ?1 AND t.owner_id = ?2 AND d.decision = 'like'
            )"#,
        )
        .bind(user_id)
        .bind(owner_id)
        .fetch_one(&self.db)
        .await?;
        Ok(found != 0)
    }

    pub async fn decided_trip_ids(&self, user_id: &str) -> Result<HashSet<String>, AppError> {
        let ids: Vec<String> =
            sqlx::query_scalar("SELECT trip_id FROM trip_decisions WHERE user_id = ?1")
                .bind(user_id)
                .fetch_all(&self.db)
                .await?;
        Ok(ids.into_iter().collect())
    }

    pub async fn mutual_matches(&self, user_id: &str) -> Result<Vec<MutualMatch>, AppError> {
        let rows = sqlx::query_as::<_, MutualRow>(
            r#"SELECT
                   mine.id AS my_trip_id,
                   theirs.id AS their_trip_id,
                   theirs.owner_id AS other_user_id,
                   mine_like.decided_at AS my_like_at,
                   their_like.decided_at AS their_like_at
               FROM trip_decisions mine_like
               JOIN trips theirs ON theirs.id = mine_like.trip_id
               JOIN trip_decisions their_like
                   ON their_like.user_id = theirs.owner_id AND their_like.decision = 'like'
               JOIN trips mine
                   ON mine.id = their_like.trip_id AND mine.owner_id = mine_like.user_id
               WHERE mine_like.user_id = ?1 AND mine_like.decision = 'like'"#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        let mut matches: Vec<MutualMatch> = rows
            .into_iter()
            .map(|row| MutualMatch {
                matched_at: row.my_like_at.max(row.their_like_at),
                my_trip_id: row.my_trip_id,
                their_trip_id: row.their_trip_id,
                other_user_id: row.other_user_id,
            })
            .collect();
        matches.sort_by(|a, b| {
            a.matched_at
                .cmp(&b.matched_at)
                .then_with(|| a.their_trip_id.cmp(&b.their_trip_id))
                .then_with(|| a.my_trip_id.cmp(&b.my_trip_id))
        });
        Ok(matches)
    }
}
