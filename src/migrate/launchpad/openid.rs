//! OpenID identity discovery for Launchpad profile pages.
//!
//! A profile page advertises its OpenID identity through `<link>` tags in
//! the HTML head. Discovery fetches the page and extracts the identity URL;
//! the caller decides what a failure means (the import falls back to a
//! deterministic placeholder identity).

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

/// Link relations that carry the OpenID identity, in precedence order.
const IDENTITY_RELS: [&str; 2] = ["openid2.local_id", "openid.delegate"];

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("discovery request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no OpenID endpoint advertised at {0}")]
    EndpointNotFound(String),
}

/// Resolves a profile page URL to an OpenID identity string.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn discover(&self, profile_url: &str) -> Result<String, DiscoveryError>;
}

/// HTML-based discovery against live profile pages.
#[derive(Debug, Clone)]
pub struct OpenIdResolver {
    client: reqwest::Client,
}

impl OpenIdResolver {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for OpenIdResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityResolver for OpenIdResolver {
    async fn discover(&self, profile_url: &str) -> Result<String, DiscoveryError> {
        let body = self
            .client
            .get(profile_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        for rel in IDENTITY_RELS {
            if let Some(href) = extract_link_href(&body, rel) {
                return Ok(href);
            }
        }

        Err(DiscoveryError::EndpointNotFound(profile_url.to_string()))
    }
}

fn link_tag_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<link\s+[^>]*>").unwrap())
}

fn attr_pattern(name: &str) -> Regex {
    // Attribute values in these pages are always double-quoted.
    Regex::new(&format!(r#"(?i){name}\s*=\s*"([^"]*)""#)).unwrap()
}

/// The href of the first `<link>` tag with the given rel, if any.
fn extract_link_href(html: &str, rel: &str) -> Option<String> {
    let rel_re = attr_pattern("rel");
    let href_re = attr_pattern("href");

    for tag in link_tag_pattern().find_iter(html) {
        let tag = tag.as_str();
        let tag_rel = rel_re.captures(tag).map(|c| c[1].to_string());
        if tag_rel.as_deref() == Some(rel) {
            return href_re.captures(tag).map(|c| c[1].to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PROFILE_HTML: &str = r#"<html><head>
        <link rel="openid.server" href="https://login.launchpad.net/">
        <link rel="openid2.local_id" href="https://login.launchpad.net/+id/abc123">
        <link rel="openid.delegate" href="https://login.launchpad.net/+id/abc123">
    </head><body></body></html>"#;

    #[test]
    fn extracts_href_by_rel() {
        assert_eq!(
            extract_link_href(PROFILE_HTML, "openid2.local_id").as_deref(),
            Some("https://login.launchpad.net/+id/abc123")
        );
        assert_eq!(extract_link_href(PROFILE_HTML, "stylesheet"), None);
        assert_eq!(extract_link_href("<p>no links here</p>", "openid.delegate"), None);
    }

    #[tokio::test]
    async fn discovers_identity_from_profile_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/~elbarto"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PROFILE_HTML))
            .mount(&server)
            .await;

        let resolver = OpenIdResolver::new();
        let identity = resolver
            .discover(&format!("{}/~elbarto", server.uri()))
            .await
            .unwrap();
        assert_eq!(identity, "https://login.launchpad.net/+id/abc123");
    }

    #[tokio::test]
    async fn missing_endpoint_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/~nobody"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let resolver = OpenIdResolver::new();
        let err = resolver
            .discover(&format!("{}/~nobody", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::EndpointNotFound(_)));
    }

    #[tokio::test]
    async fn http_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/~gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let resolver = OpenIdResolver::new();
        let err = resolver
            .discover(&format!("{}/~gone", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::Http(_)));
    }
}
