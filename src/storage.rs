//! Chart persistence collaborators.
//!
//! The engine only authors charts; saving and loading go through [`ChartStore`].

use crate::config::Config;
use crate::error::{CreativeOrientationError, Result};
use crate::orientation::types::TensionChart;
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

#[async_trait]
pub trait ChartStore: Send + Sync {
    async fn save(&self, chart: &TensionChart) -> Result<()>;
    async fn load(&self, id: &str) -> Result<Option<TensionChart>>;
}

/// Bounded in-memory store; the least recently saved chart is evicted first.
pub struct MemoryChartStore {
    charts: RwLock<LruCache<String, TensionChart>>,
}

impl MemoryChartStore {
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            charts: RwLock::new(LruCache::new(cap)),
        }
    }
}

#[async_trait]
impl ChartStore for MemoryChartStore {
    async fn save(&self, chart: &TensionChart) -> Result<()> {
        self.charts
            .write()
            .await
            .put(chart.id.clone(), chart.clone());
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<TensionChart>> {
        Ok(self.charts.read().await.peek(id).cloned())
    }
}

/// One pretty-printed JSON file per chart.
pub struct FileChartStore {
    dir: PathBuf,
}

impl FileChartStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CreativeOrientationError::InvalidParams {
                message: format!("invalid chart id '{id}'"),
            });
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

#[async_trait]
impl ChartStore for FileChartStore {
    async fn save(&self, chart: &TensionChart) -> Result<()> {
        let path = self.path_for(&chart.id)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let body = serde_json::to_vec_pretty(chart)?;
        tokio::fs::write(&path, body).await?;
        tracing::debug!("Saved chart {} to {}", chart.id, path.display());
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<TensionChart>> {
        let path = self.path_for(id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Build the store selected in config.
pub fn create_chart_store(config: &Config) -> Arc<dyn ChartStore> {
    match config.charts.store.as_str() {
        "file" => {
            let dir = config.chart_dir();
            tracing::info!("Using file chart store at {}", dir.display());
            Arc::new(FileChartStore::new(dir))
        }
        _ => {
            tracing::info!(
                "Using in-memory chart store (capacity {})",
                config.charts.capacity
            );
            Arc::new(MemoryChartStore::new(config.charts.capacity))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn chart(id: &str) -> TensionChart {
        TensionChart {
            id: id.to_string(),
            desired_outcome: "A finished album".into(),
            current_reality: "Four songs are demoed".into(),
            due_date: Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap(),
            action_steps: vec!["Demo song five".into()],
            created_at: Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn memory_store_evicts_oldest() {
        let store = MemoryChartStore::new(2);
        for id in ["chart_a", "chart_b", "chart_c"] {
            store.save(&chart(id)).await.unwrap();
        }
        assert!(store.load("chart_a").await.unwrap().is_none());
        assert_eq!(store.load("chart_c").await.unwrap(), Some(chart("chart_c")));
    }

    #[tokio::test]
    async fn file_store_round_trips_and_misses_cleanly() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileChartStore::new(tmp.path().join("charts"));
        store.save(&chart("chart_x")).await.unwrap();
        assert_eq!(store.load("chart_x").await.unwrap(), Some(chart("chart_x")));
        assert!(store.load("chart_missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_store_rejects_path_like_ids() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileChartStore::new(tmp.path());
        assert!(matches!(
            store.load("../etc/passwd").await,
            Err(CreativeOrientationError::InvalidParams { .. })
        ));
    }
}
