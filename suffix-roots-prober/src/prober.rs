use crate::config::ProbeConfig;
use crate::error::Result;
use crate::result::ProbeResult;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

/// Number of body bytes inspected when the content type is inconclusive.
pub const SNIFF_LEN: usize = 2048;

const DEFAULT_SCHEMES: [&str; 2] = ["https", "http"];
const MAX_REDIRECTS: usize = 10;

/// Outcome of a single URL attempt.
enum Attempt {
    /// 2xx and the payload looks like HTML.
    Html(String),
    /// 2xx but not HTML. Final for the domain.
    NotHtml(String),
    /// Request error or non-2xx status. The next scheme is tried.
    Failed(String),
}

/// Decides whether a domain serves an HTML page.
///
/// Schemes are tried in order (HTTPS, then HTTP). The first 2xx response
/// settles the domain either way; errors and other statuses fall through to
/// the next scheme.
#[derive(Clone)]
pub struct Prober {
    client: Client,
    schemes: Vec<String>,
}

impl Prober {
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self {
            client,
            schemes: DEFAULT_SCHEMES.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn with_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    pub fn candidate_urls(&self, domain: &str) -> Vec<String> {
        self.schemes
            .iter()
            .map(|scheme| format!("{}://{}", scheme, domain))
            .collect()
    }

    /// Probe `domain`. Never fails: network problems become a negative
    /// result carrying the error text.
    pub async fn probe_domain(&self, domain: &str) -> ProbeResult {
        let mut failures = Vec::new();

        for url in self.candidate_urls(domain) {
            match self.probe_url(&url).await {
                Attempt::Html(message) => {
                    debug!("{}", message);
                    return ProbeResult::html(domain.to_string(), message);
                }
                Attempt::NotHtml(message) => {
                    debug!("{}", message);
                    return ProbeResult::not_html(domain.to_string(), message);
                }
                Attempt::Failed(message) => {
                    debug!("{}", message);
                    failures.push(message);
                }
            }
        }

        ProbeResult::not_html(domain.to_string(), unreachable_message(&failures))
    }

    async fn probe_url(&self, url: &str) -> Attempt {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => return Attempt::Failed(format!("{}: error {}", url, e)),
        };

        let response = match self.client.get(parsed).send().await {
            Ok(response) => response,
            Err(e) => return Attempt::Failed(format!("{}: error {}", url, e)),
        };

        let status = response.status();
        if !status.is_success() {
            return Attempt::Failed(format!("{}: status {}", url, status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        // A matching header settles it without touching the body.
        let (head, body_error) = if content_type.as_deref().is_some_and(is_html_content_type) {
            (Vec::new(), None)
        } else {
            read_head(response, SNIFF_LEN).await
        };

        // The 2xx is final even when the body breaks off; classify what arrived.
        let verdict = match body_error {
            Some(e) => format!("error {}", e),
            None if looks_like_html(content_type.as_deref(), &head) => "HTML".to_string(),
            None => "non-HTML".to_string(),
        };
        let message = format!("{}: {} {}", url, status.as_u16(), verdict);

        if looks_like_html(content_type.as_deref(), &head) {
            Attempt::Html(message)
        } else {
            Attempt::NotHtml(message)
        }
    }
}

/// Classify a 2xx payload from its `Content-Type` and the start of its body.
pub fn looks_like_html(content_type: Option<&str>, body_head: &[u8]) -> bool {
    if content_type.is_some_and(is_html_content_type) {
        return true;
    }

    let snippet = &body_head[..body_head.len().min(SNIFF_LEN)];
    let snippet = snippet.trim_ascii_start().to_ascii_lowercase();
    snippet.starts_with(b"<!doctype html") || snippet.starts_with(b"<html")
}

fn is_html_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}

/// Read at most `limit` bytes of the body, chunk by chunk.
///
/// A read error stops the loop but keeps the bytes received so far.
async fn read_head(mut response: Response, limit: usize) -> (Vec<u8>, Option<reqwest::Error>) {
    let mut head = Vec::with_capacity(limit);
    while head.len() < limit {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let take = (limit - head.len()).min(chunk.len());
                head.extend_from_slice(&chunk[..take]);
            }
            Ok(None) => break,
            Err(e) => return (head, Some(e)),
        }
    }
    (head, None)
}

fn unreachable_message(failures: &[String]) -> String {
    if failures.is_empty() {
        "unreachable".to_string()
    } else {
        format!("unreachable ({})", failures.join("; "))
    }
}
