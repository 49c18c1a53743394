use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Like,
    Pass,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Like => "like",
            Decision::Pass => "pass",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One swipe: `user_id` liked or passed on `trip_id`. Unique per pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripDecision {
    pub user_id: String,
    pub trip_id: String,
    pub decision: Decision,
    pub decided_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DecisionOutcome {
    #[serde(flatten)]
    pub decision: TripDecision,
    /// The trip owner has already liked one of the caller's trips.
    pub mutual: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MutualMatch {
    pub my_trip_id: String,
    pub their_trip_id: String,
    pub other_user_id: String,
    pub matched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionRequest {
    pub decision: Decision,
}
