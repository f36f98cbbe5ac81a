//! Leaderboard of submitted scores.
//!
//! Scores are kept as one list, highest first, capped at a fixed number of
//! entries. Every submission re-reads the list, inserts the new entry, re-sorts
//! and writes the result back.

pub mod domain;
pub mod service;

pub use domain::{rank_entries, truncate_score, ScoreEntry, ScoreSubmission, MAX_RANKING_ENTRIES};
pub use service::RankingService;
