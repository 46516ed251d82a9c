use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Client for the repository-metrics service that issues maintainability badges.
pub struct MetricsClient {
    client: Client,
    api: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReposResponse {
    List(Vec<RepoEntry>),
    Envelope { data: Vec<RepoEntry> },
}

#[derive(Debug, Deserialize)]
struct RepoEntry {
    #[serde(default)]
    attributes: Option<RepoAttributes>,
}

#[derive(Debug, Deserialize)]
struct RepoAttributes {
    #[serde(default)]
    badge_token: Option<String>,
}

impl ReposResponse {
    fn into_badge_token(self) -> Option<String> {
        let entries = match self {
            ReposResponse::List(entries) => entries,
            ReposResponse::Envelope { data } => data,
        };
        entries
            .into_iter()
            .next()?
            .attributes?
            .badge_token
            .filter(|token| !token.trim().is_empty())
    }
}

impl MetricsClient {
    /// `None` if no HTTP client can be built; the badge is then simply unavailable.
    pub fn new(api: &str, timeout: Duration) -> Option<Self> {
        match Client::builder().timeout(timeout).build() {
            Ok(client) => Some(Self::with_client(client, api)),
            Err(err) => {
                warn!(error = %err, "cannot build http client, skipping metrics lookups");
                None
            }
        }
    }

    pub fn with_client(client: Client, api: &str) -> Self {
        MetricsClient {
            client,
            api: api.trim_end_matches('/').to_string(),
        }
    }

    pub fn api(&self) -> &str {
        &self.api
    }

    /// Badge token for an `owner/repo` slug. Any failure is reported and yields `None`.
    pub async fn badge_token(&self, slug: &str) -> Option<String> {
        match self.lookup(slug).await {
            Ok(Some(token)) => {
                debug!(slug, token = %token, "metrics badge token found");
                Some(token)
            }
            Ok(None) => {
                debug!(slug, "repository not registered with metrics service");
                None
            }
            Err(err) => {
                warn!(slug, error = %err, "metrics lookup failed");
                None
            }
        }
    }

    async fn lookup(&self, slug: &str) -> reqwest::Result<Option<String>> {
        let response: ReposResponse = self
            .client
            .get(format!("{}/repos", self.api))
            .query(&[("github_slug", slug)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.into_badge_token())
    }
}
