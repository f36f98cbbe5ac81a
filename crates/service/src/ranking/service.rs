use std::{path::PathBuf, sync::Arc};

use tracing::{debug, info};

use crate::errors::ServiceError;
use crate::storage::json_list_store::JsonListStore;

use super::domain::{rank_entries, ScoreEntry, ScoreSubmission, MAX_RANKING_ENTRIES};

/// Leaderboard backed by a single JSON file.
pub struct RankingService {
    store: Arc<JsonListStore<ScoreEntry>>,
    max_entries: usize,
}

impl RankingService {
    pub fn new<P: Into<PathBuf>>(path: P, max_entries: usize) -> Arc<Self> {
        Arc::new(Self { store: JsonListStore::new(path), max_entries })
    }

    /// Service keeping the default top 100.
    pub fn with_default_limit<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        Self::new(path, MAX_RANKING_ENTRIES)
    }

    /// Record a score and rewrite the stored ranking. Returns the entry as
    /// submitted after truncation; it may already have fallen off the capped list.
    pub async fn submit(&self, submission: ScoreSubmission) -> Result<ScoreEntry, ServiceError> {
        let entry = submission.into_entry();
        let limit = self.max_entries;
        let stored = self
            .store
            .update(|list| rank_entries(list, entry.clone(), limit))
            .await?;
        info!(name = %entry.name, score = entry.score, entries = stored.len(), "score added");
        Ok(entry)
    }

    /// Current ranking, highest first. Empty when nothing readable is stored.
    pub async fn ranking(&self) -> Vec<ScoreEntry> {
        let list = self.store.load().await;
        debug!(entries = list.len(), path = %self.store.path().display(), "ranking loaded");
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::fs;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("ranking_{}.json", uuid::Uuid::new_v4()))
    }

    fn submission(name: &str, score: f64) -> ScoreSubmission {
        ScoreSubmission { name: name.into(), score }
    }

    fn entry(name: &str, score: i64) -> ScoreEntry {
        ScoreEntry { name: name.into(), score }
    }

    fn assert_descending(list: &[ScoreEntry]) {
        for pair in list.windows(2) {
            assert!(pair[0].score >= pair[1].score, "{:?} before {:?}", pair[0], pair[1]);
        }
    }

    #[tokio::test]
    async fn missing_file_bootstrap() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let svc = RankingService::with_default_limit(&tmp);

        assert!(svc.ranking().await.is_empty());
        svc.submit(submission("solo", 10.0)).await?;
        assert!(fs::metadata(&tmp).await.is_ok());
        assert_eq!(svc.ranking().await, vec![entry("solo", 10)]);

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn three_submissions_come_back_sorted() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let svc = RankingService::with_default_limit(&tmp);

        svc.submit(submission("A", 50.0)).await?;
        svc.submit(submission("B", 90.0)).await?;
        svc.submit(submission("C", 70.0)).await?;

        assert_eq!(svc.ranking().await, vec![entry("B", 90), entry("C", 70), entry("A", 50)]);

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn overflow_keeps_top_hundred() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let svc = RankingService::with_default_limit(&tmp);

        for i in 0..105 {
            svc.submit(submission(&format!("p{i}"), (1000 - i) as f64)).await?;
        }

        let list = svc.ranking().await;
        assert_eq!(list.len(), 100);
        assert_eq!(list.first(), Some(&entry("p0", 1000)));
        assert_eq!(list.last(), Some(&entry("p99", 901)));
        assert_descending(&list);

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn invariants_hold_after_every_submission() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let svc = RankingService::new(&tmp, 25);

        for i in 0..60i64 {
            let score = ((i * 37) % 101 - 50) as f64 + 0.25;
            svc.submit(submission("p", score)).await?;
            let list = svc.ranking().await;
            assert!(list.len() <= 25);
            assert_descending(&list);
        }

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn fractional_scores_truncate_toward_zero() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let svc = RankingService::with_default_limit(&tmp);

        assert_eq!(svc.submit(submission("pos", 87.9)).await?, entry("pos", 87));
        assert_eq!(svc.submit(submission("neg", -87.9)).await?, entry("neg", -87));
        assert_eq!(svc.submit(submission("half", 0.5)).await?, entry("half", 0));

        assert_eq!(
            svc.ranking().await,
            vec![entry("pos", 87), entry("half", 0), entry("neg", -87)]
        );

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_recovers_to_single_entry() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        fs::write(&tmp, "not json").await?;
        let svc = RankingService::with_default_limit(&tmp);

        assert!(svc.ranking().await.is_empty());
        svc.submit(submission("fresh", 1.0)).await?;
        assert_eq!(svc.ranking().await, vec![entry("fresh", 1)]);

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn hand_written_float_scores_survive_a_submit() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        fs::write(&tmp, r#"[{"name":"old","score":500.0},{"name":"o2","score":400}]"#).await?;
        let svc = RankingService::with_default_limit(&tmp);

        assert_eq!(svc.ranking().await, vec![entry("old", 500), entry("o2", 400)]);
        svc.submit(submission("new", 1.0)).await?;
        assert_eq!(
            svc.ranking().await,
            vec![entry("old", 500), entry("o2", 400), entry("new", 1)]
        );

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn numeric_string_submission_is_stored_truncated() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let svc = RankingService::with_default_limit(&tmp);

        let parsed: ScoreSubmission = serde_json::from_str(r#"{"name":"a","score":"87.9"}"#)?;
        svc.submit(parsed).await?;
        assert_eq!(svc.ranking().await, vec![entry("a", 87)]);

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn repeated_reads_are_identical() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let svc = RankingService::with_default_limit(&tmp);
        svc.submit(submission("a", 3.0)).await?;
        svc.submit(submission("b", 3.0)).await?;

        let first = svc.ranking().await;
        let second = svc.ranking().await;
        assert_eq!(first, second);
        assert_eq!(first, vec![entry("a", 3), entry("b", 3)]);

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_names_are_kept() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let svc = RankingService::with_default_limit(&tmp);
        svc.submit(submission("same", 1.0)).await?;
        svc.submit(submission("same", 2.0)).await?;

        assert_eq!(svc.ranking().await, vec![entry("same", 2), entry("same", 1)]);

        let _ = fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn write_failure_surfaces_storage_error() {
        let dir = std::env::temp_dir().join(format!("ranking_missing_{}", uuid::Uuid::new_v4()));
        let svc = RankingService::with_default_limit(dir.join("ranking.json"));

        let err = svc.submit(submission("x", 1.0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
        assert!(svc.ranking().await.is_empty());
    }
}
