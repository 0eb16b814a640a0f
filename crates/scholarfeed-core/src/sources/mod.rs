use async_trait::async_trait;

use crate::error::Result;
use crate::types::Publication;

/// A remote provider of publication records.
#[async_trait]
pub trait PublicationSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> Result<Vec<Publication>>;
}

/// Reachability of one relay endpoint, as seen from a probe request.
#[derive(Debug, Clone)]
pub struct RelayStatus {
    pub relay: String,
    pub reachable: bool,
    pub latency_ms: u64,
}

pub mod scholar;
pub mod serp;
