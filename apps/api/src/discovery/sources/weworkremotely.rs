//! We Work Remotely adapter. No public API — postings are extracted from
//! the search listing page with CSS selectors. Listing rows carry no
//! description or native id; identity falls back to the normalized
//! title/company/region triple.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;

use crate::discovery::sources::{RawPosting, SearchQuery, SearchSource, SourceError};
use crate::models::job::JobSource;

const BASE_URL: &str = "https://weworkremotely.com";
const SEARCH_URL: &str = "https://weworkremotely.com/remote-jobs/search";

pub struct WeWorkRemotelySource {
    http: reqwest::Client,
}

impl WeWorkRemotelySource {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl SearchSource for WeWorkRemotelySource {
    fn source(&self) -> JobSource {
        JobSource::Weworkremotely
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawPosting>, SourceError> {
        let term = query.term();

        let response = self
            .http
            .get(SEARCH_URL)
            .query(&[("term", term.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        let postings = parse_listing(&html, query.max_results)?;
        debug!("WWR returned {} postings for '{}'", postings.len(), term);
        Ok(postings)
    }
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Parse(e.to_string()))
}

fn parse_listing(html: &str, cap: usize) -> Result<Vec<RawPosting>, SourceError> {
    let document = Html::parse_document(html);
    let row_selector = selector("section.jobs li > a")?;
    let title_selector = selector("span.title")?;
    let company_selector = selector("span.company")?;
    let region_selector = selector("span.region")?;

    let mut postings = Vec::new();

    for row in document.select(&row_selector) {
        if postings.len() >= cap {
            break;
        }

        let title = match row.select(&title_selector).next() {
            Some(el) => el.text().collect::<String>().trim().to_string(),
            None => continue,
        };
        let company = match row.select(&company_selector).next() {
            Some(el) => el.text().collect::<String>().trim().to_string(),
            None => continue,
        };
        if title.is_empty() || company.is_empty() {
            continue;
        }

        let region = row
            .select(&region_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Remote".to_string());

        let url = row
            .value()
            .attr("href")
            .map(|href| format!("{BASE_URL}{href}"))
            .unwrap_or_default();

        postings.push(RawPosting {
            external_id: None,
            title,
            company,
            description: String::new(),
            location: region,
            job_type: "remote".to_string(),
            url,
            salary: None,
        });
    }

    Ok(postings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <section class="jobs">
          <ul>
            <li>
              <a href="/remote-jobs/acme-rust-engineer">
                <span class="company">Acme</span>
                <span class="title">Rust Engineer</span>
                <span class="region">Anywhere in the World</span>
              </a>
            </li>
            <li>
              <a href="/remote-jobs/labelista-annotator">
                <span class="company">Labelista</span>
                <span class="title">Content Annotator</span>
              </a>
            </li>
            <li>
              <a href="/remote-jobs/broken-row">
                <span class="company">Nameless</span>
              </a>
            </li>
          </ul>
        </section>
    "#;

    #[test]
    fn test_parse_listing() {
        let postings = parse_listing(FIXTURE, 50).unwrap();
        assert_eq!(postings.len(), 2);

        let first = &postings[0];
        assert_eq!(first.title, "Rust Engineer");
        assert_eq!(first.company, "Acme");
        assert_eq!(first.location, "Anywhere in the World");
        assert_eq!(
            first.url,
            "https://weworkremotely.com/remote-jobs/acme-rust-engineer"
        );
        assert!(first.external_id.is_none());
    }

    #[test]
    fn test_missing_region_defaults_to_remote() {
        let postings = parse_listing(FIXTURE, 50).unwrap();
        assert_eq!(postings[1].location, "Remote");
    }

    #[test]
    fn test_rows_without_title_are_skipped() {
        let postings = parse_listing(FIXTURE, 50).unwrap();
        assert!(postings.iter().all(|p| !p.title.is_empty()));
    }

    #[test]
    fn test_cap_applies() {
        let postings = parse_listing(FIXTURE, 1).unwrap();
        assert_eq!(postings.len(), 1);
    }

    #[test]
    fn test_empty_page_yields_nothing() {
        let postings = parse_listing("<html><body></body></html>", 50).unwrap();
        assert!(postings.is_empty());
    }
}
