use tracing::debug;

use crate::{
    error::AppError,
    matching,
    models::trip::{MatchCandidate, MatchReference},
    services::trips::TripStore,
};

/// Loads a snapshot from the trip store and runs the candidate filter on it.
#[derive(Clone)]
pub struct MatchService {
    trips: TripStore,
}

impl MatchService {
    pub fn new(trips: TripStore) -> Self {
        Self { trips }
    }

    pub async fn candidates_for(
        &self,
        reference: &MatchReference,
    ) -> Result<Vec<MatchCandidate>, AppError> {
        let snapshot = self.trips.find_trips_matching(&reference.criteria()).await?;
        let found = matching::candidates(reference, &snapshot);
        debug!(
            owner_id = %reference.owner_id,
            snapshot = snapshot.len(),
            candidates = found.len(),
            "candidate filter ran"
        );
        Ok(found)
    }

    /// Candidates for a stored trip. An unknown id fails before any filtering.
    pub async fn candidates_for_trip(&self, trip_id: &str) -> Result<Vec<MatchCandidate>, AppError> {
        let trip = self.trips.find_trip_by_id(trip_id).await?;
        self.candidates_for(&MatchReference::from(&trip)).await
    }
}
