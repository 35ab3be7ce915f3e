use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::Schema;

/// Decides whether a string field is promoted to `URL`.
///
/// Called once per string-valued field (for arrays, on the first element).
pub trait UrlClassifier: Send + Sync {
    fn is_url(&self, candidate: &str) -> bool;

    fn schema_for(&self, candidate: &str) -> Schema {
        if self.is_url(candidate) { Schema::Url } else { Schema::String }
    }
}

/// `scheme://authority[/path][?query][#fragment]` for network schemes, or any
/// `file://` URL. No whitespace anywhere.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?i:(?:https?|ftps?|wss?)://(?:[^\s/?#@]+@)?[A-Za-z0-9\-._~%!$&'()*+,;=:\[\]]+|file://)(?:[/?#]\S*)?$",
    )
    .expect("URL pattern is a valid regex")
});

/// Pure, offline check. The default.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntacticUrlClassifier;

impl UrlClassifier for SyntacticUrlClassifier {
    fn is_url(&self, candidate: &str) -> bool {
        URL_PATTERN.is_match(candidate)
    }
}

/// Keeps every string a `String`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverUrl;

impl UrlClassifier for NeverUrl {
    fn is_url(&self, _candidate: &str) -> bool {
        false
    }
}

/// Syntactic check, then a reachability probe: `file://` paths must exist and
/// network URLs must answer a `HEAD` with a non-error status within `timeout`.
#[cfg(feature = "probe")]
pub struct ProbingUrlClassifier {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "probe")]
impl ProbingUrlClassifier {
    pub fn new(timeout: std::time::Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[cfg(feature = "probe")]
impl UrlClassifier for ProbingUrlClassifier {
    fn is_url(&self, candidate: &str) -> bool {
        if !SyntacticUrlClassifier.is_url(candidate) {
            return false;
        }
        if let Some(path) = file_url_path(candidate) {
            return std::path::Path::new(path).exists();
        }
        match self.client.head(candidate).send() {
            Ok(response) => {
                let status = response.status();
                status.is_success() || status.is_redirection()
            }
            Err(error) => {
                tracing::debug!(url = candidate, %error, "URL probe failed");
                false
            }
        }
    }
}

/// The path part of a `file://` URL, scheme matched case-insensitively.
#[cfg(feature = "probe")]
fn file_url_path(candidate: &str) -> Option<&str> {
    const SCHEME: &str = "file://";
    candidate
        .get(..SCHEME.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(SCHEME))
        .and_then(|_| candidate.get(SCHEME.len()..))
}
