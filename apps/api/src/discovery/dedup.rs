//! Posting identity — the dedup key a job keeps across repeated searches.
//!
//! Platforms that hand out a native external id (Remotive) use
//! `source:external_id`. For the rest, identity is derived from the
//! normalized title, company, and location, so whitespace and casing
//! differences between scrapes collapse to one key.

use crate::models::job::JobSource;

/// Computes the stable identity for a raw posting.
pub fn dedup_key(
    source: JobSource,
    external_id: Option<&str>,
    title: &str,
    company: &str,
    location: &str,
) -> String {
    match external_id {
        Some(id) if !id.is_empty() => format!("{source}:{id}"),
        _ => format!(
            "{source}:{}|{}|{}",
            normalize(title),
            normalize(company),
            normalize(location)
        ),
    }
}

/// Lowercases and collapses all whitespace runs to single spaces.
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_id_wins() {
        let key = dedup_key(
            JobSource::Remotive,
            Some("12345"),
            "Rust Engineer",
            "Acme",
            "Remote",
        );
        assert_eq!(key, "remotive:12345");
    }

    #[test]
    fn test_empty_native_id_falls_back() {
        let key = dedup_key(JobSource::Remotive, Some(""), "Rust Engineer", "Acme", "Remote");
        assert_eq!(key, "remotive:rust engineer|acme|remote");
    }

    #[test]
    fn test_normalization_collapses_case_and_whitespace() {
        let a = dedup_key(
            JobSource::RemoteCo,
            None,
            "Senior   Rust\tEngineer",
            "ACME Corp",
            " Remote ",
        );
        let b = dedup_key(
            JobSource::RemoteCo,
            None,
            "senior rust engineer",
            "acme corp",
            "remote",
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_same_posting_different_sources_are_distinct() {
        let a = dedup_key(JobSource::RemoteCo, None, "Rust Engineer", "Acme", "Remote");
        let b = dedup_key(JobSource::Weworkremotely, None, "Rust Engineer", "Acme", "Remote");
        assert_ne!(a, b);
    }
}
