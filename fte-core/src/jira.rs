//! Jira REST data structures
//!
//! Only the parts of the issue payload the estimate tools read are modelled;
//! any other field (custom fields included) lands in `IssueFields::custom`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Issue as returned by `issue/{key}` and inside search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub id: Option<String>,
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub issuetype: Option<IssueType>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub issuelinks: Option<Vec<IssueLink>>,
    #[serde(default)]
    pub timetracking: Option<TimeTracking>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(flatten)]
    pub custom: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueType {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeTracking {
    #[serde(default)]
    pub original_estimate_seconds: Option<u64>,
    #[serde(default)]
    pub remaining_estimate_seconds: Option<u64>,
    #[serde(default)]
    pub time_spent_seconds: Option<u64>,
}

/// Issue link, both as embedded in `fields.issuelinks` and as returned by
/// `issueLink/{id}`. The embedded form only carries the far side of the link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueLink {
    pub id: String,
    #[serde(rename = "type")]
    pub link_type: IssueLinkType,
    #[serde(default)]
    pub inward_issue: Option<Issue>,
    #[serde(default)]
    pub outward_issue: Option<Issue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueLinkType {
    pub name: String,
    #[serde(default)]
    pub inward: Option<String>,
    #[serde(default)]
    pub outward: Option<String>,
}

/// One page of `search` results
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default)]
    pub start_at: u32,
    #[serde(default)]
    pub max_results: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// Response of `myself`; Server installs send `name`, Cloud sends `accountId`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
}

impl JiraUser {
    pub fn username(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.email_address.as_deref())
            .or(self.account_id.as_deref())
    }
}

impl Issue {
    pub fn issue_type(&self) -> Option<&str> {
        self.fields.issuetype.as_ref().map(|t| t.name.as_str())
    }

    pub fn links(&self) -> &[IssueLink] {
        self.fields.issuelinks.as_deref().unwrap_or(&[])
    }

    pub fn labels(&self) -> &[String] {
        self.fields.labels.as_deref().unwrap_or(&[])
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels().iter().any(|l| l == label)
    }

    /// Remaining estimate from the time tracking block, `None` when the block
    /// or the value is missing
    pub fn remaining_estimate_seconds(&self) -> Option<u64> {
        self.fields
            .timetracking
            .as_ref()
            .and_then(|tt| tt.remaining_estimate_seconds)
    }

    /// Custom field value, `None` when absent or null
    pub fn custom_field(&self, field: &str) -> Option<&serde_json::Value> {
        self.fields.custom.get(field).filter(|v| !v.is_null())
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

impl IssueLink {
    pub fn link_type_name(&self) -> &str {
        &self.link_type.name
    }

    pub fn outward_key(&self) -> Option<&str> {
        self.outward_issue.as_ref().map(|i| i.key.as_str())
    }

    pub fn outward_type(&self) -> Option<&str> {
        self.outward_issue.as_ref().and_then(|i| i.issue_type())
    }
}
