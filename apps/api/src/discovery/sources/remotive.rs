//! Remotive adapter — the one platform with a public JSON API, so it is
//! the only source that hands back native external ids.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::discovery::sources::{RawPosting, SearchQuery, SearchSource, SourceError};
use crate::models::job::JobSource;

const SEARCH_URL: &str = "https://remotive.com/api/remote-jobs";

pub struct RemotiveSource {
    http: reqwest::Client,
}

impl RemotiveSource {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl SearchSource for RemotiveSource {
    fn source(&self) -> JobSource {
        JobSource::Remotive
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawPosting>, SourceError> {
        let term = query.term();
        let limit = query.max_results.to_string();

        let response = self
            .http
            .get(SEARCH_URL)
            .query(&[("search", term.as_str()), ("limit", limit.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let postings = parse_listing(&body, query.max_results)?;
        debug!("Remotive returned {} postings for '{}'", postings.len(), term);
        Ok(postings)
    }
}

#[derive(Debug, Deserialize)]
struct RemotiveListing {
    jobs: Vec<RemotiveJob>,
}

#[derive(Debug, Deserialize)]
struct RemotiveJob {
    id: u64,
    title: String,
    company_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    candidate_required_location: String,
    #[serde(default)]
    job_type: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    salary: String,
}

fn parse_listing(body: &str, cap: usize) -> Result<Vec<RawPosting>, SourceError> {
    let listing: RemotiveListing =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;

    Ok(listing
        .jobs
        .into_iter()
        .take(cap)
        .map(|job| RawPosting {
            external_id: Some(job.id.to_string()),
            title: job.title,
            company: job.company_name,
            description: job.description,
            location: if job.candidate_required_location.is_empty() {
                "Remote".to_string()
            } else {
                job.candidate_required_location
            },
            job_type: job.job_type,
            url: job.url,
            salary: if job.salary.is_empty() {
                None
            } else {
                Some(job.salary)
            },
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "job-count": 2,
        "jobs": [
            {
                "id": 1910000,
                "url": "https://remotive.com/remote-jobs/software-dev/rust-engineer-1910000",
                "title": "Rust Engineer",
                "company_name": "Acme",
                "category": "Software Development",
                "job_type": "full_time",
                "candidate_required_location": "Worldwide",
                "salary": "$120k - $160k",
                "description": "<p>Build distributed systems in Rust.</p>"
            },
            {
                "id": 1910001,
                "url": "https://remotive.com/remote-jobs/data/ml-annotator-1910001",
                "title": "ML Data Annotator",
                "company_name": "Labelista",
                "job_type": "contract",
                "candidate_required_location": "",
                "salary": "",
                "description": ""
            }
        ]
    }"#;

    #[test]
    fn test_parse_listing() {
        let postings = parse_listing(FIXTURE, 50).unwrap();
        assert_eq!(postings.len(), 2);

        let first = &postings[0];
        assert_eq!(first.external_id.as_deref(), Some("1910000"));
        assert_eq!(first.title, "Rust Engineer");
        assert_eq!(first.company, "Acme");
        assert_eq!(first.location, "Worldwide");
        assert_eq!(first.salary.as_deref(), Some("$120k - $160k"));
    }

    #[test]
    fn test_parse_fills_defaults() {
        let postings = parse_listing(FIXTURE, 50).unwrap();
        let second = &postings[1];
        assert_eq!(second.location, "Remote");
        assert!(second.salary.is_none());
    }

    #[test]
    fn test_cap_applies() {
        let postings = parse_listing(FIXTURE, 1).unwrap();
        assert_eq!(postings.len(), 1);
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        let err = parse_listing("<html>rate limited</html>", 10).unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
