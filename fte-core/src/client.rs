//! Issue tracker access
//!
//! `IssueTracker` is the narrow interface the estimate pipeline needs;
//! `JiraClient` implements it over the Jira REST API v2.

use async_trait::async_trait;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::constants;
use crate::jira::{Issue, IssueLink, JiraUser, SearchResults};
use crate::{Context, FteError, Result};

#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Run a JQL query and return every matching issue
    async fn search_issues(&self, jql: &str) -> Result<Vec<Issue>>;

    /// Fetch a full issue by key
    async fn issue(&self, key: &str) -> Result<Issue>;

    /// Dereference a link embedded in an issue to the full link object
    async fn issue_link(&self, link: &IssueLink) -> Result<IssueLink>;

    /// Terminate the session
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Fields requested in search results; the estimate pass re-fetches full issues
const SEARCH_FIELDS: &str = "summary,description,issuetype,status,issuelinks,labels";

pub struct JiraClient {
    http: reqwest::Client,
    base: Url,
    page_size: u32,
}

impl JiraClient {
    /// Build an authenticated client for the production or test server and
    /// return it with the acting username
    pub async fn login(ctx: &Context, use_test_server: bool) -> Result<(Self, String)> {
        let server = ctx.server_url(use_test_server)?;

        if ctx.username.is_empty() || ctx.token.is_empty() {
            return Err(FteError::Config(
                "username and token are required, set them in the config file or via FTE_USERNAME/FTE_TOKEN"
                    .to_string(),
            ));
        }

        let client = Self::new(server, &ctx.username, &ctx.token, ctx.timeout_secs, ctx.page_size)?;
        let user: JiraUser = client.get_json(constants::API_MYSELF, &[]).await?;
        let username = user.username().unwrap_or(&ctx.username).to_string();
        debug!("Logged in to {} as {}", client.base, username);

        Ok((client, username))
    }

    pub fn new(server: &str, username: &str, token: &str, timeout_secs: u64, page_size: u32) -> Result<Self> {
        let base = base_url(server)?;

        let credentials = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", username, token));
        let mut auth = HeaderValue::from_str(&format!("Basic {}", credentials))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(constants::USER_AGENT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base,
            page_size: page_size.max(1),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.base.join(path)?;
        debug!("GET {}", url);

        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FteError::Tracker(format!("GET {} returned {}: {}", path, status, body.trim())));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn search_issues(&self, jql: &str) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();

        loop {
            let query = [
                ("jql", jql.to_string()),
                ("startAt", issues.len().to_string()),
                ("maxResults", self.page_size.to_string()),
                ("fields", SEARCH_FIELDS.to_string()),
            ];
            let page: SearchResults = self.get_json(constants::API_SEARCH, &query).await?;
            debug!(
                "Search page at {}: {} of {} issue(s)",
                page.start_at,
                page.issues.len(),
                page.total
            );

            let fetched = page.issues.len();
            issues.extend(page.issues);
            if fetched == 0 || issues.len() >= page.total as usize {
                break;
            }
        }

        Ok(issues)
    }

    async fn issue(&self, key: &str) -> Result<Issue> {
        self.get_json(&format!("{}/{}", constants::API_ISSUE, key), &[]).await
    }

    async fn issue_link(&self, link: &IssueLink) -> Result<IssueLink> {
        self.get_json(&format!("{}/{}", constants::API_ISSUE_LINK, link.id), &[])
            .await
    }

    async fn close(&self) -> Result<()> {
        debug!("Closing session to {}", self.base);
        Ok(())
    }
}

/// Normalize the server URL so relative endpoint paths join under it
fn base_url(server: &str) -> Result<Url> {
    let url = Url::parse(&format!("{}/", server.trim_end_matches('/')))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FteError::Config(format!("unsupported server scheme: {}", url.scheme())));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_context_path() {
        let base = base_url("https://jira.example.com/jira").unwrap();
        let search = base.join(constants::API_SEARCH).unwrap();
        assert_eq!(search.as_str(), "https://jira.example.com/jira/rest/api/2/search");
    }

    #[test]
    fn base_url_tolerates_trailing_slash() {
        let base = base_url("https://jira.example.com/").unwrap();
        let issue = base.join(&format!("{}/SWG-1", constants::API_ISSUE)).unwrap();
        assert_eq!(issue.as_str(), "https://jira.example.com/rest/api/2/issue/SWG-1");
    }

    #[test]
    fn base_url_rejects_other_schemes() {
        assert!(matches!(base_url("ftp://jira.example.com"), Err(FteError::Config(_))));
    }

    #[test]
    fn new_client_clamps_page_size() {
        let client = JiraClient::new("https://jira.example.com", "alice", "token", 30, 0).unwrap();
        assert_eq!(client.page_size, 1);
    }
}
