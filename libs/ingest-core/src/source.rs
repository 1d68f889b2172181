//! Wikipedia reference validation and title derivation.
//!
//! A reference is accepted only when its host is an exact member of the
//! allow-list and its path names an article (`/wiki/<title>`).

use percent_encoding::percent_decode_str;
use url::Url;

/// Title used when a reference cannot be turned into a label.
pub const FALLBACK_TITLE: &str = "Wikipedia Article";

const DEFAULT_HOSTS: &[&str] = &[
    "wikipedia.org",
    "www.wikipedia.org",
    "en.wikipedia.org",
    "en.m.wikipedia.org",
];

/// Hosts accepted as the external document source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePolicy {
    hosts: Vec<String>,
}

impl Default for SourcePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_HOSTS.iter().copied())
    }
}

impl SourcePolicy {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut policy = Self { hosts: Vec::new() };
        policy.extend(hosts);
        policy
    }

    /// Add hosts to the allow-list, skipping blanks and duplicates.
    pub fn extend<I, S>(&mut self, hosts: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for host in hosts {
            let host = host.as_ref().trim().to_ascii_lowercase();
            if !host.is_empty() && !self.hosts.contains(&host) {
                self.hosts.push(host);
            }
        }
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Check whether `reference` points at an article on an allowed host.
    pub fn is_valid(&self, reference: &str) -> bool {
        let reference = reference.trim();
        if reference.is_empty() {
            return false;
        }

        let Ok(url) = Url::parse(reference) else {
            return false;
        };

        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }

        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        if !self.hosts.iter().any(|allowed| *allowed == host) {
            return false;
        }

        article_path(&url).is_some()
    }
}

/// Validate against the default allow-list.
pub fn is_valid_source(reference: &str) -> bool {
    SourcePolicy::default().is_valid(reference)
}

/// Human-readable label from the trailing path segment.
pub fn derive_title(reference: &str) -> String {
    let Ok(url) = Url::parse(reference.trim()) else {
        return FALLBACK_TITLE.to_string();
    };

    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last());

    match segment {
        Some(segment) => {
            let title = percent_decode(segment).replace('_', " ");
            let title = title.trim();
            if title.is_empty() {
                FALLBACK_TITLE.to_string()
            } else {
                title.to_string()
            }
        }
        None => FALLBACK_TITLE.to_string(),
    }
}

/// Decoded article name as the wiki API expects it (underscores kept).
pub fn article_title(reference: &str) -> Option<String> {
    let url = Url::parse(reference.trim()).ok()?;
    article_path(&url).map(percent_decode)
}

fn article_path(url: &Url) -> Option<&str> {
    let title = url.path().strip_prefix("/wiki/")?.trim_matches('/');
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn percent_decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}
