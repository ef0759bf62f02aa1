use crate::core::normalize::{edition_from_response, subjects_from_response};
use crate::domain::model::{EditionData, Record, SubjectData};
use crate::utils::error::{EtlError, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::form_urlencoded;

pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

/// Thin client for the three Open Library endpoints the pipeline reads.
///
/// Every call is a single GET; nothing is cached or retried.
pub struct OpenLibraryClient {
    client: Client,
    base_url: String,
    requests: AtomicUsize,
}

impl OpenLibraryClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests_sent(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn search_url(&self, author: &str) -> String {
        let author: String = form_urlencoded::byte_serialize(author.as_bytes()).collect();
        format!("{}/search.json?author={}", self.base_url, author)
    }

    /// `work_key` already carries its leading `/works/` segment.
    pub fn work_url(&self, work_key: &str) -> String {
        format!("{}{}.json", self.base_url, work_key)
    }

    pub fn edition_url(&self, edition_key: &str) -> String {
        format!("{}/books/{}.json", self.base_url, edition_key)
    }

    /// Returns the `docs` array of an author search.
    pub async fn search_by_author(&self, author: &str) -> Result<Vec<Record>> {
        let url = self.search_url(author);
        let mut body = self.get_json(&url).await?;

        let docs = body.remove("docs").ok_or_else(|| EtlError::MissingField {
            field: "docs".to_string(),
            context: format!("search response {}", url),
        })?;

        let Value::Array(docs) = docs else {
            return Err(EtlError::MalformedResponse {
                url,
                message: "'docs' is not an array".to_string(),
            });
        };

        docs.into_iter()
            .map(|doc| match doc {
                Value::Object(record) => Ok(record),
                other => Err(EtlError::MalformedResponse {
                    url: url.clone(),
                    message: format!("search result is not an object: {}", other),
                }),
            })
            .collect()
    }

    pub async fn fetch_subjects(&self, work_key: &str) -> Result<SubjectData> {
        let body = self.get_json(&self.work_url(work_key)).await?;
        subjects_from_response(&body, work_key)
    }

    pub async fn fetch_edition(&self, edition_key: &str) -> Result<EditionData> {
        let body = self.get_json(&self.edition_url(edition_key)).await?;
        edition_from_response(&body, edition_key)
    }

    async fn get_json(&self, url: &str) -> Result<Record> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Err(EtlError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(EtlError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(record)) => Ok(record),
            Ok(other) => Err(EtlError::MalformedResponse {
                url: url.to_string(),
                message: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
            Err(e) => Err(EtlError::MalformedResponse {
                url: url.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_construction() {
        let client = OpenLibraryClient::new("https://openlibrary.org/");

        assert_eq!(
            client.search_url("atwood"),
            "https://openlibrary.org/search.json?author=atwood"
        );
        assert_eq!(
            client.work_url("/works/OL675783W"),
            "https://openlibrary.org/works/OL675783W.json"
        );
        assert_eq!(
            client.edition_url("OL2769393M"),
            "https://openlibrary.org/books/OL2769393M.json"
        );
    }

    #[test]
    fn test_search_url_encodes_author() {
        let client = OpenLibraryClient::new(DEFAULT_BASE_URL);
        assert_eq!(
            client.search_url("Gabriel García Márquez"),
            "https://openlibrary.org/search.json?author=Gabriel+Garc%C3%ADa+M%C3%A1rquez"
        );
        assert_eq!(
            client.search_url("a&b=c"),
            "https://openlibrary.org/search.json?author=a%26b%3Dc"
        );
    }

    #[test]
    fn test_counter_starts_at_zero() {
        let client = OpenLibraryClient::new(DEFAULT_BASE_URL);
        assert_eq!(client.requests_sent(), 0);
        assert_eq!(client.base_url(), "https://openlibrary.org");
    }
}
