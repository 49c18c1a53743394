//! Trip compatibility matching.
//!
//! Everything here is pure: callers load a snapshot from the trip store and
//! hand it in, so two runs over the same snapshot always agree.

pub mod filter;
pub mod overlap;
pub mod presenter;

pub use filter::candidates;
pub use overlap::{overlap_days, overlaps};
pub use presenter::{paginate, CandidateCursor, CandidatePage};
