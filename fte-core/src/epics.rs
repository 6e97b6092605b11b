//! Epic gathering and Initiative parent resolution

use std::collections::HashMap;
use tracing::{debug, error};

use crate::client::IssueTracker;
use crate::constants::{DONE_STATUSES, EPIC, IMPLEMENTS, INITIATIVE, STORY};
use crate::jira::{Issue, IssueLink};
use crate::{FteError, Result};

/// JQL used to find the Epics of a project
#[derive(Debug, Clone)]
pub struct EpicQuery {
    pub project: String,
    /// Also match Stories
    pub include_stories: bool,
    /// Do not filter out Resolved and Closed issues
    pub all_statuses: bool,
}

impl EpicQuery {
    pub fn new(project: &str) -> Self {
        Self {
            project: project.to_string(),
            include_stories: false,
            all_statuses: false,
        }
    }

    pub fn jql(&self) -> String {
        let mut types = vec![EPIC];
        if self.include_stories {
            types.push(STORY);
        }

        let mut jql = format!("project={} AND issuetype in ({})", self.project, types.join(", "));
        if !self.all_statuses {
            jql.push_str(&format!(" AND status not in ({})", DONE_STATUSES.join(", ")));
        }
        jql
    }
}

/// Ordered mapping from Initiative key to the Epics implementing it
///
/// Initiatives iterate in first-discovery order, Epics in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Initiatives {
    entries: Vec<(String, Vec<Issue>)>,
    index: HashMap<String, usize>,
}

impl Initiatives {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an Epic under an Initiative, creating the entry on first sight
    pub fn push(&mut self, initiative: String, epic: Issue) {
        match self.index.get(&initiative) {
            Some(&pos) => self.entries[pos].1.push(epic),
            None => {
                self.index.insert(initiative.clone(), self.entries.len());
                self.entries.push((initiative, vec![epic]));
            }
        }
    }

    pub fn get(&self, initiative: &str) -> Option<&[Issue]> {
        self.index
            .get(initiative)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Issue])> {
        self.entries
            .iter()
            .map(|(key, epics)| (key.as_str(), epics.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Search the open Epics of a project
pub async fn gather_epics(client: &dyn IssueTracker, project_key: &str) -> Result<Vec<Issue>> {
    gather_epics_with(client, &EpicQuery::new(project_key)).await
}

pub async fn gather_epics_with(client: &dyn IssueTracker, query: &EpicQuery) -> Result<Vec<Issue>> {
    if query.project.trim().is_empty() {
        return Err(FteError::Config("project key must not be empty".to_string()));
    }

    let jql = query.jql();
    debug!("Searching Epics: {}", jql);
    let epics = client.search_issues(&jql).await?;
    debug!("Found {} Epic(s) in {}", epics.len(), query.project);
    Ok(epics)
}

fn implements_initiative(link: &IssueLink) -> bool {
    link.outward_type() == Some(INITIATIVE) && link.link_type_name() == IMPLEMENTS
}

/// Find the Initiative an Epic implements
///
/// Every link reference is dereferenced to see the type of the issue it points
/// at. The first "Implements" link to an Initiative wins; further matches are
/// reported once as an error and ignored.
pub async fn find_epic_parent(client: &dyn IssueTracker, epic: &Issue) -> Result<Option<(String, Issue)>> {
    let mut parent: Option<String> = None;
    let mut ignored: Vec<String> = Vec::new();

    for link_ref in epic.links() {
        let link = client.issue_link(link_ref).await?;
        if !implements_initiative(&link) {
            continue;
        }
        let Some(initiative) = link.outward_key() else {
            continue;
        };

        println!("E/{} ... found parent I/{}", epic, initiative);
        if parent.is_none() {
            parent = Some(initiative.to_string());
        } else {
            ignored.push(initiative.to_string());
        }
    }

    if !ignored.is_empty() {
        error!(
            kept = parent.as_deref().unwrap_or_default(),
            ignored = ?ignored,
            "Error: Epic {} has more than one parent!",
            epic.key
        );
    }

    debug!("Initiative/Epic: {:?}/{}", parent, epic.key);
    Ok(parent.map(|initiative| (initiative, epic.clone())))
}

/// Group Epics under the Initiatives they implement, dropping unparented Epics
pub async fn find_epics_parents(client: &dyn IssueTracker, epics: &[Issue]) -> Result<Initiatives> {
    let mut initiatives = Initiatives::new();

    for epic in epics {
        if let Some((initiative, epic)) = find_epic_parent(client, epic).await? {
            initiatives.push(initiative, epic);
        }
    }

    debug!("Resolved {} Initiative(s) from {} Epic(s)", initiatives.len(), epics.len());
    Ok(initiatives)
}
