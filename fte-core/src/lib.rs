//! FTE Estimates Core Library
//!
//! Collects the Epics of a project from a Jira issue tracker, groups them
//! under the Initiatives they implement and compares the summed remaining
//! estimates with the FTE values cached on each Initiative.

pub mod client;
pub mod constants;
pub mod context;
pub mod epics;
pub mod error;
pub mod estimates;
pub mod jira;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use client::{IssueTracker, JiraClient};
pub use context::Context;
pub use epics::{find_epic_parent, find_epics_parents, gather_epics, gather_epics_with, EpicQuery, Initiatives};
pub use error::{FteError, Result};
pub use estimates::{update_initiative_estimates, FteFields, InitiativeEstimate};
pub use jira::{Issue, IssueLink};
