//! Remaining-estimate aggregation per Initiative
//!
//! Estimates are summed in seconds and reported in months of a fixed
//! reporting calendar (8 hour days, 5 day weeks, 4 week months), next to the
//! FTE values cached in the Initiative's custom fields.

use std::fmt;
use std::io::Write;
use tracing::{debug, warn};

use crate::client::IssueTracker;
use crate::constants::{self, NEXT_CYCLE_LABEL, SECONDS_PER_MONTH};
use crate::epics::Initiatives;
use crate::jira::Issue;
use crate::{Context, FteError, Result};

/// Custom field ids holding the cached FTE values on an Initiative
#[derive(Debug, Clone)]
pub struct FteFields {
    pub next_cycle: String,
    pub remaining: String,
}

impl Default for FteFields {
    fn default() -> Self {
        Self {
            next_cycle: constants::FTE_NEXT_CYCLE_FIELD.to_string(),
            remaining: constants::FTE_REMAINING_FIELD.to_string(),
        }
    }
}

impl From<&Context> for FteFields {
    fn from(ctx: &Context) -> Self {
        Self {
            next_cycle: ctx.next_cycle_field.clone(),
            remaining: ctx.remaining_field.clone(),
        }
    }
}

/// Computed and cached estimates of one Initiative
#[derive(Debug, Clone, PartialEq)]
pub struct InitiativeEstimate {
    pub key: String,
    pub cached_next_cycle: Option<serde_json::Number>,
    pub cached_remaining: Option<serde_json::Number>,
    pub next_cycle_seconds: u64,
    pub remaining_seconds: u64,
}

impl InitiativeEstimate {
    pub fn next_cycle_months(&self) -> f64 {
        seconds_to_months(self.next_cycle_seconds)
    }

    pub fn remaining_months(&self) -> f64 {
        seconds_to_months(self.remaining_seconds)
    }
}

impl fmt::Display for InitiativeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Initiative {} Current(N/R): {}/{}: True(N/R): {}/{}",
            self.key,
            format_cached(self.cached_next_cycle.as_ref()),
            format_cached(self.cached_remaining.as_ref()),
            format_months(self.next_cycle_months()),
            format_months(self.remaining_months()),
        )
    }
}

pub fn seconds_to_months(seconds: u64) -> f64 {
    seconds as f64 / SECONDS_PER_MONTH as f64
}

// Always keep a fractional part: 1.0, 1.5, 0.0
fn format_months(months: f64) -> String {
    format!("{:?}", months)
}

// Cached values print as the tracker sent them: 2, 2.0, 2.5
fn format_cached(value: Option<&serde_json::Number>) -> String {
    match value {
        Some(n) => n.to_string(),
        None => "0".to_string(),
    }
}

/// Cached FTE value of an Initiative, `None` when absent, null or not a number
pub fn cached_fte(initiative: &Issue, field: &str) -> Option<serde_json::Number> {
    match initiative.custom_field(field)? {
        serde_json::Value::Number(n) => Some(n.clone()),
        other => {
            debug!("Initiative {} field {} is not numeric: {}", initiative.key, field, other);
            None
        }
    }
}

/// Remaining estimate of an Epic, 0 with a warning when it has none
pub fn remaining_estimate(epic: &Issue) -> u64 {
    match epic.remaining_estimate_seconds() {
        Some(seconds) => seconds,
        None => {
            warn!("Warning: Found no estimate in Epic {}, returning '0'!", epic.key);
            0
        }
    }
}

/// Sum the Epics of every Initiative and write one report line per Initiative
///
/// Each Epic is re-fetched since search results do not carry time tracking.
pub async fn update_initiative_estimates(
    client: &dyn IssueTracker,
    initiatives: &Initiatives,
    fields: &FteFields,
    out: &mut dyn Write,
) -> Result<Vec<InitiativeEstimate>> {
    let mut report = Vec::with_capacity(initiatives.len());

    for (key, epics) in initiatives.iter() {
        let mut next_cycle_seconds = 0u64;
        let mut remaining_seconds = 0u64;

        for epic_ref in epics {
            let epic = client.issue(&epic_ref.key).await?;
            let estimate = remaining_estimate(&epic);
            debug!("Epic: {}, remainingEstimate: {}", epic, estimate);

            remaining_seconds = remaining_seconds.saturating_add(estimate);
            if epic.has_label(NEXT_CYCLE_LABEL) {
                next_cycle_seconds = next_cycle_seconds.saturating_add(estimate);
            }
        }

        let initiative = client.issue(key).await?;
        let estimate = InitiativeEstimate {
            key: key.to_string(),
            cached_next_cycle: cached_fte(&initiative, &fields.next_cycle),
            cached_remaining: cached_fte(&initiative, &fields.remaining),
            next_cycle_seconds,
            remaining_seconds,
        };

        writeln!(out, "{}", estimate)?;
        report.push(estimate);
    }

    out.flush()?;
    Ok(report)
}

/// Check the reporting calendar against known values
pub fn calendar_self_check() -> Result<()> {
    let checks = [
        (constants::SECONDS_PER_DAY, 28_800u64, "seconds per day"),
        (constants::SECONDS_PER_WEEK, 144_000, "seconds per week"),
        (SECONDS_PER_MONTH, 576_000, "seconds per month"),
    ];
    for (actual, expected, what) in checks {
        if actual != expected {
            return Err(FteError::Generic(format!("{}: expected {}, got {}", what, expected, actual)));
        }
    }

    let sample = InitiativeEstimate {
        key: "SELF-1".to_string(),
        cached_next_cycle: None,
        cached_remaining: serde_json::Number::from_f64(2.5),
        next_cycle_seconds: 576_000,
        remaining_seconds: 864_000,
    };
    let line = sample.to_string();
    if line != "Initiative SELF-1 Current(N/R): 0/2.5: True(N/R): 1.0/1.5" {
        return Err(FteError::Generic(format!("unexpected report line: {}", line)));
    }

    Ok(())
}
