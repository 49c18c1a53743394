use std::{cmp::Reverse, fmt, str::FromStr};

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::{error::AppError, models::trip::MatchCandidate};

use super::filter::sort_key;

/// Sort key of the last candidate a client has seen.
///
/// Encoded as `<overlap_days>.<created_at micros>.<trip id>`. Keying on the
/// sort position rather than an offset keeps pages stable while new trips
/// are posted between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateCursor {
    pub overlap_days: i64,
    pub created_at: DateTime<Utc>,
    pub trip_id: String,
}

impl CandidateCursor {
    pub fn after(candidate: &MatchCandidate) -> Self {
        Self {
            overlap_days: candidate.overlap_days,
            created_at: candidate.trip.created_at,
            trip_id: candidate.trip.id.clone(),
        }
    }

    fn key(&self) -> (Reverse<i64>, DateTime<Utc>, &str) {
        (Reverse(self.overlap_days), self.created_at, self.trip_id.as_str())
    }

    fn is_before(&self, candidate: &MatchCandidate) -> bool {
        self.key() < sort_key(candidate)
    }
}

impl fmt::Display for CandidateCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.overlap_days,
            self.created_at.timestamp_micros(),
            self.trip_id
        )
    }
}

impl FromStr for CandidateCursor {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::validation(format!("invalid cursor {raw:?}"));

        let mut parts = raw.splitn(3, '.');
        let overlap_days = parts
            .next()
            .and_then(|part| part.parse::<i64>().ok())
            .filter(|days| *days > 0)
            .ok_or_else(invalid)?;
        let created_at = parts
            .next()
            .and_then(|part| part.parse::<i64>().ok())
            .and_then(|micros| Utc.timestamp_micros(micros).single())
            .ok_or_else(invalid)?;
        let trip_id = parts
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(invalid)?
            .to_string();

        Ok(Self {
            overlap_days,
            created_at,
            trip_id,
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CandidatePage {
    pub items: Vec<MatchCandidate>,
    pub next_cursor: Option<String>,
}

/// Slice the next `limit` candidates after `cursor` out of an ordered deck.
pub fn paginate(
    candidates: Vec<MatchCandidate>,
    cursor: Option<&CandidateCursor>,
    limit: usize,
) -> CandidatePage {
    let limit = limit.max(1);
    let mut remaining = candidates
        .into_iter()
        .filter(|candidate| cursor.map_or(true, |cursor| cursor.is_before(candidate)));

    let items: Vec<MatchCandidate> = remaining.by_ref().take(limit).collect();
    let has_more = remaining.next().is_some();
    let next_cursor = if has_more {
        items
            .last()
            .map(|last| CandidateCursor::after(last).to_string())
    } else {
        None
    };

    CandidatePage { items, next_cursor }
}
