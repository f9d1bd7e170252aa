//! Remote.co adapter. Selector-based extraction of the job board listing;
//! rows carry no native id or description.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;

use crate::discovery::sources::{RawPosting, SearchQuery, SearchSource, SourceError};
use crate::models::job::JobSource;

const SEARCH_URL: &str = "https://remote.co/remote-jobs/search/";

pub struct RemoteCoSource {
    http: reqwest::Client,
}

impl RemoteCoSource {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl SearchSource for RemoteCoSource {
    fn source(&self) -> JobSource {
        JobSource::RemoteCo
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawPosting>, SourceError> {
        let term = query.term();

        let response = self
            .http
            .get(SEARCH_URL)
            .query(&[("search_keywords", term.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        let postings = parse_listing(&html, query.max_results)?;
        debug!("Remote.co returned {} postings for '{}'", postings.len(), term);
        Ok(postings)
    }
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Parse(e.to_string()))
}

fn parse_listing(html: &str, cap: usize) -> Result<Vec<RawPosting>, SourceError> {
    let document = Html::parse_document(html);
    let card_selector = selector("div.job_board_item")?;
    let link_selector = selector("a.job_board_link")?;
    let company_selector = selector("p.job_board_company")?;
    let location_selector = selector("p.job_board_location")?;

    let mut postings = Vec::new();

    for card in document.select(&card_selector) {
        if postings.len() >= cap {
            break;
        }

        let link = match card.select(&link_selector).next() {
            Some(el) => el,
            None => continue,
        };
        let title = link.text().collect::<String>().trim().to_string();
        let company = match card.select(&company_selector).next() {
            Some(el) => el.text().collect::<String>().trim().to_string(),
            None => continue,
        };
        if title.is_empty() || company.is_empty() {
            continue;
        }

        let location = card
            .select(&location_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Remote".to_string());

        postings.push(RawPosting {
            external_id: None,
            title,
            company,
            description: String::new(),
            location,
            job_type: "remote".to_string(),
            url: link.value().attr("href").unwrap_or_default().to_string(),
            salary: None,
        });
    }

    Ok(postings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <div class="job_board_listing">
          <div class="job_board_item">
            <a class="job_board_link" href="https://remote.co/job/rust-engineer">Rust Engineer</a>
            <p class="job_board_company">Acme</p>
            <p class="job_board_location">US Only</p>
          </div>
          <div class="job_board_item">
            <a class="job_board_link" href="https://remote.co/job/translator">Translator</a>
            <p class="job_board_company">Linguata</p>
          </div>
          <div class="job_board_item">
            <p class="job_board_company">Orphan Co</p>
          </div>
        </div>
    "#;

    #[test]
    fn test_parse_listing() {
        let postings = parse_listing(FIXTURE, 50).unwrap();
        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].title, "Rust Engineer");
        assert_eq!(postings[0].company, "Acme");
        assert_eq!(postings[0].location, "US Only");
        assert_eq!(postings[0].url, "https://remote.co/job/rust-engineer");
    }

    #[test]
    fn test_missing_location_defaults_to_remote() {
        let postings = parse_listing(FIXTURE, 50).unwrap();
        assert_eq!(postings[1].location, "Remote");
    }

    #[test]
    fn test_cards_without_link_are_skipped() {
        let postings = parse_listing(FIXTURE, 50).unwrap();
        assert!(postings.iter().all(|p| !p.url.is_empty()));
    }

    #[test]
    fn test_cap_applies() {
        let postings = parse_listing(FIXTURE, 1).unwrap();
        assert_eq!(postings.len(), 1);
    }
}
