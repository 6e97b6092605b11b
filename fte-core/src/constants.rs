// Constants used throughout the FTE estimate tools

// Issue types and link types matched in the tracker
pub const EPIC: &str = "Epic";
pub const STORY: &str = "Story";
pub const INITIATIVE: &str = "Initiative";
pub const IMPLEMENTS: &str = "Implements";

// Label marking an Epic as part of the upcoming planning cycle
pub const NEXT_CYCLE_LABEL: &str = "NEXT-CYCLE";

// Cached FTE custom fields on Initiatives
pub const FTE_NEXT_CYCLE_FIELD: &str = "customfield_11801";
pub const FTE_REMAINING_FIELD: &str = "customfield_12000";

pub const DEFAULT_PROJECT: &str = "SWG";

// Statuses excluded from the Epic search unless --all is given
pub const DONE_STATUSES: &[&str] = &["Resolved", "Closed"];

// Reporting calendar: 8 hour days, 5 day weeks, 4 week months
pub const SECONDS_PER_DAY: u64 = 60 * 60 * 8;
pub const SECONDS_PER_WEEK: u64 = SECONDS_PER_DAY * 5;
pub const SECONDS_PER_MONTH: u64 = SECONDS_PER_WEEK * 4;

// REST API v2 endpoints
pub const API_SEARCH: &str = "rest/api/2/search";
pub const API_ISSUE: &str = "rest/api/2/issue";
pub const API_ISSUE_LINK: &str = "rest/api/2/issueLink";
pub const API_MYSELF: &str = "rest/api/2/myself";

// Configuration files
pub const CONFIG_FILENAME: &str = "config.yml";
pub const CONFIG_DIR: &str = ".config/fte";
pub const LOCAL_CONFIG_FILENAME: &str = "fte.yml";

pub const USER_AGENT: &str = "fte-estimates/0.1";
