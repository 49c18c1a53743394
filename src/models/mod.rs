pub mod decision;
pub mod trip;
pub mod user;
