//! Source Adapters — the uniform search contract, one implementation per
//! external platform.
//!
//! Each adapter is registered in the `SourceRegistry` lookup table at
//! startup; discovery resolves platforms against the registry instead of
//! branching on a source enum. Adapters fail independently: a
//! `SourceError` is confined to its own search-source run and never
//! aborts sibling adapters.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::job::JobSource;

pub mod remote_co;
pub mod remotive;
pub mod weworkremotely;

/// The query every adapter receives. `max_results` caps the postings an
/// adapter may return.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub keywords: Vec<String>,
    // Part of the adapter contract; the shipped boards are remote-only and
    // search globally, so no current adapter consumes these filters.
    #[allow(dead_code)]
    pub location: Option<String>,
    #[allow(dead_code)]
    pub job_type: Option<String>,
    pub max_results: usize,
}

impl SearchQuery {
    /// The keyword list joined for platforms that take a single search term.
    pub fn term(&self) -> String {
        self.keywords.join(" ")
    }
}

/// A posting as returned by a platform, before dedup and scoring.
#[derive(Debug, Clone)]
pub struct RawPosting {
    /// Platform-native id, when the source provides one. Drives the dedup key.
    pub external_id: Option<String>,
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub job_type: String,
    pub url: String,
    pub salary: Option<String>,
}

/// Per-source discovery failure. Non-fatal: logged and recorded on the
/// search-source run, never escalated.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("timed out after {0}s")]
    Timeout(u64),
}

/// Capability interface implemented once per external platform.
#[async_trait]
pub trait SearchSource: Send + Sync {
    fn source(&self) -> JobSource;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawPosting>, SourceError>;
}

/// Lookup table of registered adapters. Built once at startup; its size
/// bounds the discovery fan-out.
pub struct SourceRegistry {
    sources: Vec<Arc<dyn SearchSource>>,
}

impl SourceRegistry {
    /// Registers the shipped adapters against a shared HTTP client.
    pub fn with_defaults(http: reqwest::Client) -> Self {
        Self {
            sources: vec![
                Arc::new(remotive::RemotiveSource::new(http.clone())),
                Arc::new(weworkremotely::WeWorkRemotelySource::new(http.clone())),
                Arc::new(remote_co::RemoteCoSource::new(http)),
            ],
        }
    }

    pub fn get(&self, source: JobSource) -> Option<Arc<dyn SearchSource>> {
        self.sources.iter().find(|s| s.source() == source).cloned()
    }

    pub fn all(&self) -> Vec<Arc<dyn SearchSource>> {
        self.sources.clone()
    }

    pub fn known_sources(&self) -> Vec<JobSource> {
        self.sources.iter().map(|s| s.source()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SourceRegistry {
        SourceRegistry::with_defaults(reqwest::Client::new())
    }

    #[test]
    fn test_registry_knows_all_shipped_platforms() {
        assert_eq!(
            registry().known_sources(),
            vec![
                JobSource::Remotive,
                JobSource::Weworkremotely,
                JobSource::RemoteCo
            ]
        );
    }

    #[test]
    fn test_manual_is_not_a_searchable_source() {
        assert!(registry().get(JobSource::Manual).is_none());
    }

    #[test]
    fn test_lookup_by_source() {
        let adapter = registry().get(JobSource::Remotive).unwrap();
        assert_eq!(adapter.source(), JobSource::Remotive);
    }
}
