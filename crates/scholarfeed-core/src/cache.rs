use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FeedError, Result};
use crate::types::Publication;

pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Serialize, Deserialize)]
struct CacheEntry {
    /// Epoch milliseconds at write time.
    timestamp: u64,
    publications: Vec<Publication>,
}

/// Single-slot persistent cache for the publications list.
///
/// The slot is one JSON file; a missing, undecodable, or expired slot reads
/// as absent, and stale slots are purged as a side effect of reading them.
pub struct SlotCache {
    path: PathBuf,
    ttl: Duration,
}

impl SlotCache {
    pub fn new() -> Self {
        let path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("scholarfeed")
            .join("cache")
            .join("publications.json");
        Self::at(path)
    }

    pub fn at(path: PathBuf) -> Self {
        Self {
            path,
            ttl: CACHE_TTL,
        }
    }

    /// The cached list, if the slot exists, decodes, and is younger than the
    /// TTL. Expired and undecodable slots are deleted before returning.
    pub async fn read(&self) -> Option<Vec<Publication>> {
        let data = tokio::fs::read(&self.path).await.ok()?;
        let entry = match decode_entry(&data) {
            Ok(entry) => entry,
            Err(err) => {
                warn!("cache: discarding slot: {err}");
                let _ = tokio::fs::remove_file(&self.path).await;
                return None;
            }
        };

        let age = now_millis().saturating_sub(entry.timestamp);
        if age >= self.ttl.as_millis() as u64 {
            debug!("cache: slot expired ({age} ms old)");
            let _ = tokio::fs::remove_file(&self.path).await;
            return None;
        }

        Some(entry.publications)
    }

    /// Persist the list with the current timestamp. Storage failures are
    /// logged, never surfaced.
    pub async fn write(&self, publications: &[Publication]) {
        if let Err(err) = self.try_write(publications).await {
            warn!("cache: {err}");
        }
    }

    pub async fn invalidate(&self) {
        let _ = tokio::fs::remove_file(&self.path).await;
    }

    async fn try_write(&self, publications: &[Publication]) -> Result<()> {
        let entry = CacheEntry {
            timestamp: now_millis(),
            publications: publications.to_vec(),
        };
        let data = serde_json::to_vec(&entry).map_err(|e| FeedError::CacheWrite(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FeedError::CacheWrite(e.to_string()))?;
        }
        tokio::fs::write(&self.path, data)
            .await
            .map_err(|e| FeedError::CacheWrite(e.to_string()))
    }
}

impl Default for SlotCache {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_entry(data: &[u8]) -> Result<CacheEntry> {
    serde_json::from_slice(data).map_err(|e| FeedError::CacheDecode(e.to_string()))
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
