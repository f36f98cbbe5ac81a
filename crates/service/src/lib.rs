//! Service layer for the ranking service.
//! - `ranking` holds the score entry types and the leaderboard rules.
//! - `storage` persists a whole list as one JSON document.
//! - `errors` is the error type shared by both.

pub mod errors;
pub mod ranking;
pub mod storage;
