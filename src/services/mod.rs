pub mod decisions;
pub mod matches;
pub mod trips;
pub mod users;
