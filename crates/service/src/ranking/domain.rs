use serde::{de, Deserialize, Deserializer, Serialize};

/// Number of entries kept after each submission.
pub const MAX_RANKING_ENTRIES: usize = 100;

/// One stored leaderboard row. Names are not unique.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    #[serde(deserialize_with = "stored_score")]
    pub score: i64,
}

/// Incoming score submission. `score` may carry a fractional part; it is
/// dropped when the entry is stored.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ScoreSubmission {
    pub name: String,
    #[serde(deserialize_with = "submitted_score")]
    pub score: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredScore {
    Int(i64),
    Float(f64),
}

/// Stored scores are normally integers; a float written by hand is truncated.
fn stored_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(match StoredScore::deserialize(deserializer)? {
        StoredScore::Int(n) => n,
        StoredScore::Float(f) => truncate_score(f),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SubmittedScore {
    Number(f64),
    Text(String),
}

/// A JSON number, or a string holding one (`"87.9"`). Must be finite.
fn submitted_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let score = match SubmittedScore::deserialize(deserializer)
        .map_err(|_| de::Error::custom("score must be a number"))?
    {
        SubmittedScore::Number(f) => f,
        SubmittedScore::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("score {text:?} is not a number")))?,
    };
    if !score.is_finite() {
        return Err(de::Error::custom("score must be finite"));
    }
    Ok(score)
}

impl ScoreSubmission {
    pub fn into_entry(self) -> ScoreEntry {
        ScoreEntry { name: self.name, score: truncate_score(self.score) }
    }
}

/// Drop the fractional part, rounding toward zero (`87.9 -> 87`, `-3.7 -> -3`).
/// Out-of-range values saturate at the `i64` bounds.
pub fn truncate_score(score: f64) -> i64 {
    score.trunc() as i64
}

/// Append `entry`, sort highest score first and keep the first `limit` rows.
///
/// The sort is stable, so among equal scores earlier rows stay ahead and a new
/// entry lands after every existing entry with the same score.
pub fn rank_entries(mut list: Vec<ScoreEntry>, entry: ScoreEntry, limit: usize) -> Vec<ScoreEntry> {
    list.push(entry);
    list.sort_by(|a, b| b.score.cmp(&a.score));
    list.truncate(limit);
    list
}
