// 🗃️ Metrics Cache - Skip recomputation when nothing changed
//
// Keyed by SHA-256 over the serialized snapshot and config. Any change to
// any record changes the key, so a hit always equals a fresh computation.

use crate::config::EngineConfig;
use crate::dashboard::DashboardMetrics;
use crate::snapshot::Snapshot;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Content hash of a snapshot evaluated under a config
pub fn snapshot_fingerprint(snapshot: &Snapshot, config: &EngineConfig) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(snapshot).context("Failed to serialize snapshot")?);
    hasher.update(serde_json::to_vec(config).context("Failed to serialize config")?);
    Ok(format!("{:x}", hasher.finalize()))
}

#[derive(Debug, Default)]
pub struct MetricsCache {
    entry: Option<(String, DashboardMetrics)>,
    hits: u64,
    misses: u64,
}

impl MetricsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached dashboard for this snapshot, computing it on a miss
    pub fn get_or_compute(
        &mut self,
        snapshot: &Snapshot,
        config: &EngineConfig,
    ) -> Result<&DashboardMetrics> {
        let key = snapshot_fingerprint(snapshot, config)?;

        let fresh = match &self.entry {
            Some((cached_key, _)) => *cached_key != key,
            None => true,
        };

        if fresh {
            self.misses += 1;
            debug!(key = %key, "metrics cache miss");
            self.entry = Some((key, DashboardMetrics::compute(snapshot, config)));
        } else {
            self.hits += 1;
        }

        let (_, metrics) = self
            .entry
            .as_ref()
            .context("metrics cache entry missing after insert")?;
        Ok(metrics)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
