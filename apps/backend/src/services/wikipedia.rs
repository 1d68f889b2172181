//! Document fetcher backed by the MediaWiki action API.

use async_trait::async_trait;
use ingest_core::source::article_title;
use ingest_core::{CollaboratorError, DocumentFetcher, RawExternalContent};
use reqwest::{Client, Url};
use serde::Deserialize;

/// Fetches plain-text article extracts from Wikipedia.
pub struct WikipediaFetcher {
    client: Client,
    api_base: Option<String>,
}

impl WikipediaFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            api_base: None,
        }
    }

    /// Send every request to `api_base` instead of the article's own host.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    fn api_url(&self, reference: &str) -> Result<String, CollaboratorError> {
        if let Some(base) = &self.api_base {
            return Ok(base.clone());
        }
        api_url_for(reference)
    }
}

/// `https://<host>/w/api.php` for the host the reference points at.
pub fn api_url_for(reference: &str) -> Result<String, CollaboratorError> {
    let url = Url::parse(reference.trim())
        .map_err(|e| CollaboratorError::new(format!("invalid article URL: {}", e)))?;
    let host = url
        .host_str()
        .ok_or_else(|| CollaboratorError::new("article URL has no host"))?;
    Ok(format!("{}://{}/w/api.php", url.scheme(), host))
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryPages>,
}

#[derive(Debug, Deserialize)]
struct QueryPages {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    extract: Option<String>,
}

/// Pull the first page's title and extract out of an API response body.
pub fn parse_extract(body: &str, requested: &str) -> Result<RawExternalContent, CollaboratorError> {
    let response: QueryResponse = serde_json::from_str(body)
        .map_err(|e| CollaboratorError::new(format!("invalid response from Wikipedia: {}", e)))?;

    let page = response
        .query
        .and_then(|q| q.pages.into_iter().next())
        .ok_or_else(|| CollaboratorError::new(format!("article not found: {}", requested)))?;

    if page.missing {
        return Err(CollaboratorError::new(format!("article not found: {}", page.title)));
    }

    let content = page.extract.unwrap_or_default();
    if content.trim().is_empty() {
        return Err(CollaboratorError::new(format!(
            "article has no text content: {}",
            page.title
        )));
    }

    Ok(RawExternalContent {
        title: page.title,
        content,
    })
}

#[async_trait]
impl DocumentFetcher for WikipediaFetcher {
    async fn fetch(&self, reference: &str) -> Result<RawExternalContent, CollaboratorError> {
        let title = article_title(reference)
            .ok_or_else(|| CollaboratorError::new("URL does not name a Wikipedia article"))?;
        let url = self.api_url(reference)?;

        tracing::debug!(%url, %title, "requesting article extract");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("format", "json"),
                ("formatversion", "2"),
                ("titles", title.as_str()),
            ])
            .send()
            .await
            .map_err(|e| CollaboratorError::new(format!("network error: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(CollaboratorError::new(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| CollaboratorError::new(format!("network error: {}", e)))?;

        parse_extract(&body, &title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_follows_article_host() {
        assert_eq!(
            api_url_for("https://en.wikipedia.org/wiki/Rust").unwrap(),
            "https://en.wikipedia.org/w/api.php"
        );
        assert_eq!(
            api_url_for("http://en.m.wikipedia.org/wiki/Rust").unwrap(),
            "http://en.m.wikipedia.org/w/api.php"
        );
        assert!(api_url_for("not a url").is_err());
    }

    #[test]
    fn test_api_base_override() {
        let fetcher = WikipediaFetcher::new(Client::new()).with_api_base("http://localhost:9999/api");
        assert_eq!(
            fetcher.api_url("https://en.wikipedia.org/wiki/Rust").unwrap(),
            "http://localhost:9999/api"
        );
    }

    #[test]
    fn test_parse_extract() {
        let body = r#"{"batchcomplete":true,"query":{"pages":[
            {"pageid":1,"ns":0,"title":"Rust (programming language)","extract":"Rust is a language."}
        ]}}"#;
        let content = parse_extract(body, "Rust_(programming_language)").unwrap();
        assert_eq!(content.title, "Rust (programming language)");
        assert_eq!(content.content, "Rust is a language.");
    }

    #[test]
    fn test_parse_missing_page() {
        let body = r#"{"query":{"pages":[{"ns":0,"title":"Nope","missing":true}]}}"#;
        let err = parse_extract(body, "Nope").unwrap_err();
        assert_eq!(err.to_string(), "article not found: Nope");
    }

    #[test]
    fn test_parse_empty_extract() {
        let body = r#"{"query":{"pages":[{"pageid":2,"title":"Stub","extract":""}]}}"#;
        assert!(parse_extract(body, "Stub").is_err());
    }

    #[test]
    fn test_parse_garbage() {
        let err = parse_extract("<html>", "Rust").unwrap_err();
        assert!(err.to_string().starts_with("invalid response from Wikipedia"));
    }
}
