use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde_json::{Map, Value};
use sqlx::FromRow;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::trip::{normalize_optional, DateRange, NewTrip, Trip, TripCriteria},
};

const TRIP_COLUMNS: &str = "id, owner_id, location, purpose, start_date, end_date, \
     budget, seats, description, preferences, created_at";

#[derive(Debug, FromRow)]
struct TripRow {
    id: String,
    owner_id: String,
    location: String,
    purpose: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    budget: Option<f64>,
    seats: Option<i64>,
    description: Option<String>,
    preferences: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<TripRow> for Trip {
    type Error = AppError;

    fn try_from(row: TripRow) -> Result<Self, Self::Error> {
        let preferences: Map<String, Value> =
            serde_json::from_str(&row.preferences).map_err(|err| AppError::Other(err.into()))?;
        Ok(Trip {
            id: row.id,
            owner_id: row.owner_id,
            location: row.location,
            purpose: row.purpose,
            date_range: DateRange::new(row.start_date, row.end_date)?,
            budget: row.budget,
            seats: row.seats,
            description: row.description,
            preferences,
            created_at: row.created_at,
        })
    }
}

/// SQLite-backed trip collection.
#[derive(Clone)]
pub struct TripStore {
    db: DbPool,
}

impl TripStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub async fn create_trip(&self, owner_id: &str, new_trip: NewTrip) -> Result<Trip, AppError> {
        let owner_id = owner_id.trim();
        if owner_id.is_empty() {
            return Err(AppError::validation("owner_id is required"));
        }
        let preferences = new_trip.validate()?;

        let trip = Trip {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            location: new_trip.location.trim().to_string(),
            purpose: new_trip.purpose.trim().to_string(),
            date_range: new_trip.date_range,
            budget: new_trip.budget,
            seats: new_trip.seats,
            description: normalize_optional(new_trip.description),
            preferences,
            // Cursors carry microseconds, so nothing finer is stored.
            created_at: Utc::now().trunc_subsecs(6),
        };
        let preferences_json = serde_json::to_string(&trip.preferences)
            .map_err(|err| AppError::Other(err.into()))?;

        sqlx::query(
            r#"INSERT INTO trips (
                id, owner_id, location, location_key, purpose, purpose_key,
                start_date, end_date, budget, seats, description, preferences, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"#,
        )
        .bind(&trip.id)
        .bind(&trip.owner_id)
        .bind(&trip.location)
        .bind(trip.location_key())
        .bind(&trip.purpose)
        .bind(trip.purpose_key())
        .bind(trip.date_range.start)
        .bind(trip.date_range.end)
        .bind(trip.budget)
        .bind(trip.seats)
        .bind(&trip.description)
        .bind(preferences_json)
        .bind(trip.created_at)
        .execute(&self.db)
        .await?;

        info!(trip_id = %trip.id, owner_id = %trip.owner_id, location = %trip.location, "trip created");
        Ok(trip)
    }

    pub async fn find_trip_by_id(&self, id: &str) -> Result<Trip, AppError> {
        let query = format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?1");
        let row = sqlx::query_as::<_, TripRow>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        let Some(row) = row else {
            return Err(AppError::TripNotFound(id.to_string()));
        };
        Trip::try_from(row)
    }

    pub async fn list_owner_trips(&self, owner_id: &str) -> Result<Vec<Trip>, AppError> {
        let query = format!(
            "SELECT {TRIP_COLUMNS} FROM trips WHERE owner_id = ?1 ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, TripRow>(&query)
            .bind(owner_id)
            .fetch_all(&self.db)
            .await?;
        rows.into_iter().map(Trip::try_from).collect()
    }

    /// One statement, so the result is a consistent snapshot even while
    /// other requests insert trips.
    pub async fn find_trips_matching(&self, criteria: &TripCriteria) -> Result<Vec<Trip>, AppError> {
        let query = format!(
            "SELECT {TRIP_COLUMNS} FROM trips \
             WHERE location_key = ?1 AND purpose_key = ?2 AND owner_id <> ?3 \
             AND start_date <= ?4 AND end_date >= ?5"
        );
        let rows = sqlx::query_as::<_, TripRow>(&query)
            .bind(&criteria.location_key)
            .bind(&criteria.purpose_key)
            .bind(&criteria.exclude_owner_id)
            .bind(criteria.date_range.end)
            .bind(criteria.date_range.start)
            .fetch_all(&self.db)
            .await?;
        debug!(
            location = %criteria.location_key,
            purpose = %criteria.purpose_key,
            rows = rows.len(),
            "loaded match snapshot"
        );
        rows.into_iter().map(Trip::try_from).collect()
    }
}
