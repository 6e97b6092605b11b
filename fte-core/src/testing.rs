//! In-memory tracker used by the unit tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

use crate::client::IssueTracker;
use crate::jira::{Issue, IssueFields, IssueLink, IssueLinkType, IssueType, TimeTracking};
use crate::{FteError, Result};

#[derive(Default)]
pub struct MockTracker {
    search_results: Vec<Issue>,
    issues: HashMap<String, Issue>,
    links: HashMap<String, IssueLink>,
    pub queries: Mutex<Vec<String>>,
    pub fetched: Mutex<Vec<String>>,
}

impl MockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue returned by `search_issues`
    pub fn with_search_result(mut self, issue: Issue) -> Self {
        self.search_results.push(issue);
        self
    }

    /// Issue returned by `issue(key)`
    pub fn with_issue(mut self, issue: Issue) -> Self {
        self.issues.insert(issue.key.clone(), issue);
        self
    }

    /// Full link returned by `issue_link`
    pub fn with_link(mut self, link: IssueLink) -> Self {
        self.links.insert(link.id.clone(), link);
        self
    }
}

#[async_trait]
impl IssueTracker for MockTracker {
    async fn search_issues(&self, jql: &str) -> Result<Vec<Issue>> {
        self.queries.lock().unwrap().push(jql.to_string());
        Ok(self.search_results.clone())
    }

    async fn issue(&self, key: &str) -> Result<Issue> {
        self.fetched.lock().unwrap().push(key.to_string());
        self.issues
            .get(key)
            .cloned()
            .ok_or_else(|| FteError::Tracker(format!("GET issue/{} returned 404 Not Found", key)))
    }

    async fn issue_link(&self, link: &IssueLink) -> Result<IssueLink> {
        self.links
            .get(&link.id)
            .cloned()
            .ok_or_else(|| FteError::Tracker(format!("GET issueLink/{} returned 404 Not Found", link.id)))
    }
}

pub fn issue(key: &str, issue_type: &str) -> Issue {
    Issue {
        id: None,
        key: key.to_string(),
        fields: IssueFields {
            issuetype: Some(IssueType {
                name: issue_type.to_string(),
            }),
            ..IssueFields::default()
        },
    }
}

/// Epic with embedded link references (by id only) and an optional estimate
pub fn epic(key: &str, link_ids: &[&str], remaining: Option<u64>, labels: &[&str]) -> Issue {
    let mut epic = issue(key, "Epic");
    epic.fields.issuelinks = Some(
        link_ids
            .iter()
            .map(|id| IssueLink {
                id: id.to_string(),
                link_type: IssueLinkType {
                    name: String::new(),
                    inward: None,
                    outward: None,
                },
                inward_issue: None,
                outward_issue: None,
            })
            .collect(),
    );
    epic.fields.timetracking = remaining.map(|secs| TimeTracking {
        remaining_estimate_seconds: Some(secs),
        ..TimeTracking::default()
    });
    if !labels.is_empty() {
        epic.fields.labels = Some(labels.iter().map(|l| l.to_string()).collect());
    }
    epic
}

/// Full link object pointing outward at `target`
pub fn link(id: &str, link_type: &str, target_key: &str, target_type: &str) -> IssueLink {
    IssueLink {
        id: id.to_string(),
        link_type: IssueLinkType {
            name: link_type.to_string(),
            inward: None,
            outward: None,
        },
        inward_issue: None,
        outward_issue: Some(issue(target_key, target_type)),
    }
}

/// Formatted log output of the current thread, captured while the guard lives
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    /// Log lines containing every one of `needles`
    pub fn lines_with(&self, needles: &[&str]) -> Vec<String> {
        let text = String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned();
        text.lines()
            .filter(|line| needles.iter().all(|n| line.contains(n)))
            .map(str::to_string)
            .collect()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
