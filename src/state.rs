use crate::{
    config::AppConfig,
    db::DbPool,
    services::{
        decisions::DecisionLedger, matches::MatchService, trips::TripStore, users::UserStore,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub trips: TripStore,
    pub decisions: DecisionLedger,
    pub matches: MatchService,
    pub users: UserStore,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool) -> Self {
        let trips = TripStore::new(db.clone());
        let decisions = DecisionLedger::new(db.clone(), trips.clone());
        let matches = MatchService::new(trips.clone());
        let users = UserStore::new(db);
        Self {
            config,
            trips,
            decisions,
            matches,
            users,
        }
    }
}
