use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

/// Closed interval of calendar days; both endpoints are part of the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.is_well_formed() {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "date range starts on {} after it ends on {}",
                self.start, self.end
            )))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trip {
    pub id: String,
    pub owner_id: String,
    pub location: String,
    pub purpose: String,
    pub date_range: DateRange,
    pub budget: Option<f64>,
    pub seats: Option<i64>,
    pub description: Option<String>,
    pub preferences: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    pub fn location_key(&self) -> String {
        normalize_key(&self.location)
    }

    pub fn purpose_key(&self) -> String {
        normalize_key(&self.purpose)
    }
}

/// Body of `POST /trips`. The owner comes from the caller, never the body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTrip {
    pub location: String,
    pub purpose: String,
    pub date_range: DateRange,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub seats: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub preferences: Option<Value>,
}

impl NewTrip {
    pub fn new(
        location: impl Into<String>,
        purpose: impl Into<String>,
        date_range: DateRange,
    ) -> Self {
        Self {
            location: location.into(),
            purpose: purpose.into(),
            date_range,
            budget: None,
            seats: None,
            description: None,
            preferences: None,
        }
    }

    /// Checks the request and returns the preferences bag it carries.
    pub fn validate(&self) -> Result<Map<String, Value>, AppError> {
        require_text("location", &self.location)?;
        require_text("purpose", &self.purpose)?;
        self.date_range.validate()?;

        if let Some(budget) = self.budget {
            if !budget.is_finite() || budget < 0.0 {
                return Err(AppError::validation("budget must be a non-negative number"));
            }
        }
        if let Some(seats) = self.seats {
            if seats < 1 {
                return Err(AppError::validation("seats must be at least 1"));
            }
        }

        match &self.preferences {
            None | Some(Value::Null) => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(_) => Err(AppError::validation("preferences must be a JSON object")),
        }
    }
}

/// Ad-hoc trip used as the reference of a suggestion query.
#[derive(Debug, Clone, Deserialize)]
pub struct TripDescriptor {
    #[serde(default)]
    pub owner_id: Option<String>,
    pub location: String,
    pub purpose: String,
    pub date_range: DateRange,
}

/// What the candidate filter compares other trips against.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchReference {
    pub owner_id: String,
    pub location: String,
    pub purpose: String,
    pub date_range: DateRange,
}

impl MatchReference {
    /// Builds a reference from a descriptor, excluding `fallback_owner` when
    /// the descriptor does not name an owner itself.
    pub fn from_descriptor(
        descriptor: TripDescriptor,
        fallback_owner: Option<&str>,
    ) -> Result<Self, AppError> {
        require_text("location", &descriptor.location)?;
        require_text("purpose", &descriptor.purpose)?;
        descriptor.date_range.validate()?;

        let owner_id = normalize_optional(descriptor.owner_id)
            .or_else(|| fallback_owner.map(str::to_string))
            .ok_or_else(|| AppError::validation("owner_id is required"))?;

        Ok(Self {
            owner_id,
            location: descriptor.location,
            purpose: descriptor.purpose,
            date_range: descriptor.date_range,
        })
    }

    pub fn criteria(&self) -> TripCriteria {
        TripCriteria {
            location_key: normalize_key(&self.location),
            purpose_key: normalize_key(&self.purpose),
            date_range: self.date_range,
            exclude_owner_id: self.owner_id.clone(),
        }
    }
}

impl From<&Trip> for MatchReference {
    fn from(trip: &Trip) -> Self {
        Self {
            owner_id: trip.owner_id.clone(),
            location: trip.location.clone(),
            purpose: trip.purpose.clone(),
            date_range: trip.date_range,
        }
    }
}

/// Pre-filter the store may push down to SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct TripCriteria {
    pub location_key: String,
    pub purpose_key: String,
    pub date_range: DateRange,
    pub exclude_owner_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchCandidate {
    pub trip: Trip,
    pub overlap_days: i64,
}

/// Match key for free-text fields: trimmed and lowercased.
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

pub fn normalize_optional(input: Option<String>) -> Option<String> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        Err(AppError::validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}
