use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants;

/// Environment context packed in structure
///
/// Values are layered: built-in defaults, then the YAML config file (if one is
/// found), then environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    // From FTE_SERVER, base URL of the production tracker
    pub server: String,

    // From FTE_TEST_SERVER, base URL used when the test server is selected
    pub test_server: String,

    // From FTE_USERNAME
    pub username: String,

    // From FTE_TOKEN, API token or password for basic auth
    #[serde(skip_serializing)]
    pub token: String,

    // From FTE_TIMEOUT, HTTP timeout in seconds, default 30
    pub timeout_secs: u64,

    // From FTE_PAGE_SIZE, search page size, default 50
    pub page_size: u32,

    // From FTE_NEXT_CYCLE_FIELD, default customfield_11801
    pub next_cycle_field: String,

    // From FTE_REMAINING_FIELD, default customfield_12000
    pub remaining_field: String,

    // Project key to search Epics in, default SWG
    pub project: String,

    // From FTE_CTXOUT, output all context data (this struct), default false
    pub ctx_out: bool,

    // Config file the values were read from, if any
    pub config_file: Option<PathBuf>,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            server: String::new(),
            test_server: String::new(),
            username: String::new(),
            token: String::new(),
            timeout_secs: 30,
            page_size: 50,
            next_cycle_field: constants::FTE_NEXT_CYCLE_FIELD.to_string(),
            remaining_field: constants::FTE_REMAINING_FIELD.to_string(),
            project: constants::DEFAULT_PROJECT.to_string(),
            ctx_out: false,
            config_file: None,
        }
    }
}

/// On-disk YAML configuration, every key optional
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub server: Option<String>,
    pub test_server: Option<String>,
    pub username: Option<String>,
    #[serde(alias = "password")]
    pub token: Option<String>,
    pub timeout: Option<u64>,
    pub page_size: Option<u32>,
    pub next_cycle_field: Option<String>,
    pub remaining_field: Option<String>,
    pub project: Option<String>,
}

impl ConfigFile {
    pub fn from_yaml(content: &str) -> crate::Result<Self> {
        // An empty file parses as YAML null
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

impl Context {
    /// Load defaults, then the config file, then the environment
    pub fn load() -> anyhow::Result<Self> {
        let mut ctx = Self::default();

        if let Some(path) = find_config_file() {
            let content = std::fs::read_to_string(&path)?;
            let file = ConfigFile::from_yaml(&content)
                .map_err(|err| anyhow::anyhow!("{}: {}", path.display(), err))?;
            ctx.apply_file(file);
            ctx.config_file = Some(path);
        }

        ctx.apply_env();
        Ok(ctx)
    }

    pub fn apply_file(&mut self, file: ConfigFile) {
        if let Some(server) = file.server {
            self.server = server;
        }
        if let Some(test_server) = file.test_server {
            self.test_server = test_server;
        }
        if let Some(username) = file.username {
            self.username = username;
        }
        if let Some(token) = file.token {
            self.token = token;
        }
        if let Some(timeout) = file.timeout {
            self.timeout_secs = timeout;
        }
        if let Some(page_size) = file.page_size {
            self.page_size = page_size;
        }
        if let Some(field) = file.next_cycle_field {
            self.next_cycle_field = field;
        }
        if let Some(field) = file.remaining_field {
            self.remaining_field = field;
        }
        if let Some(project) = file.project {
            self.project = project;
        }
    }

    fn apply_env(&mut self) {
        if let Ok(server) = std::env::var("FTE_SERVER") {
            self.server = server;
        }

        if let Ok(test_server) = std::env::var("FTE_TEST_SERVER") {
            self.test_server = test_server;
        }

        if let Ok(username) = std::env::var("FTE_USERNAME") {
            self.username = username;
        }

        if let Ok(token) = std::env::var("FTE_TOKEN") {
            self.token = token;
        }

        if let Ok(timeout) = std::env::var("FTE_TIMEOUT") {
            self.timeout_secs = timeout.parse().unwrap_or(self.timeout_secs);
        }

        if let Ok(page_size) = std::env::var("FTE_PAGE_SIZE") {
            self.page_size = page_size.parse().unwrap_or(self.page_size);
        }

        if let Ok(field) = std::env::var("FTE_NEXT_CYCLE_FIELD") {
            self.next_cycle_field = field;
        }

        if let Ok(field) = std::env::var("FTE_REMAINING_FIELD") {
            self.remaining_field = field;
        }

        self.ctx_out = std::env::var("FTE_CTXOUT").is_ok();
    }

    /// Base URL of the selected server
    pub fn server_url(&self, use_test_server: bool) -> crate::Result<&str> {
        let (url, var) = if use_test_server {
            (&self.test_server, "test_server")
        } else {
            (&self.server, "server")
        };
        if url.is_empty() {
            return Err(crate::FteError::Config(format!(
                "no {} configured, set it in the config file or via FTE_{}",
                var,
                var.to_uppercase()
            )));
        }
        Ok(url)
    }
}

/// Returns the location of the config file, checking FTE_CONFIG, then
/// ~/.config/fte/config.yml, then ./fte.yml
pub fn find_config_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("FTE_CONFIG") {
        return Some(PathBuf::from(path));
    }

    let home = std::env::var("HOME").ok().map(PathBuf::from);
    config_candidates(home.as_deref())
        .into_iter()
        .find(|path| path.is_file())
}

fn config_candidates(home: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(home) = home {
        candidates.push(home.join(constants::CONFIG_DIR).join(constants::CONFIG_FILENAME));
    }
    candidates.push(PathBuf::from(constants::LOCAL_CONFIG_FILENAME));
    candidates
}
