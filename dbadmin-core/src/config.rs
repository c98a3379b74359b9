use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::report::Report;

/// Default rows shown when browsing a table
pub const DEFAULT_BROWSE_LIMIT: u32 = 100;
/// Upper bound for a browse limit
pub const MAX_BROWSE_LIMIT: u32 = 1000;
/// Rows offered for selection when editing
pub const DEFAULT_EDIT_LIMIT: u32 = 200;

/// Configuration loaded from ~/.dbadmin/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DbAdminConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub browse: BrowseConfig,
    /// Extra or overriding report definitions
    #[serde(default)]
    pub reports: Vec<Report>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub cors_permissive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseConfig {
    #[serde(default = "default_browse_limit")]
    pub default_limit: u32,
    #[serde(default = "default_edit_limit")]
    pub edit_limit: u32,
}

fn default_schema() -> String {
    "public".to_owned()
}

fn default_max_connections() -> u32 {
    5
}

fn default_bind() -> String {
    "127.0.0.1:3030".to_owned()
}

fn default_browse_limit() -> u32 {
    DEFAULT_BROWSE_LIMIT
}

fn default_edit_limit() -> u32 {
    DEFAULT_EDIT_LIMIT
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            schema: default_schema(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_permissive: false,
        }
    }
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_BROWSE_LIMIT,
            edit_limit: DEFAULT_EDIT_LIMIT,
        }
    }
}

/// Clamp a requested browse limit to 1..=1000.
pub fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_BROWSE_LIMIT)
}

/// Starter config written by `dbadmin config init`
pub const CONFIG_TEMPLATE: &str = r#"# dbadmin configuration
#
# Values may reference environment variables as ${VAR}.

[database]
url = "${DATABASE_URL}"
schema = "public"
max_connections = 5

[server]
bind = "127.0.0.1:3030"
cors_permissive = false

[browse]
default_limit = 100
edit_limit = 200

# Extra reports take one search term bound as $1:
#
# [[reports]]
# id = "orders-by-customer"
# title = "Orders by customer"
# prompt = "Part of the customer name"
# sql = "SELECT o.id, c.name FROM orders o JOIN customers c ON c.id = o.customer_id WHERE c.name ILIKE $1"
"#;

impl DbAdminConfig {
    /// Load from the default path; a missing file yields defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load and expand a specific config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;

        let mut config: Self =
            toml::from_str(&content).context("Failed to parse config file (invalid TOML)")?;

        config.expand_variables();
        Ok(config)
    }

    /// Get config file path: ~/.dbadmin/config.toml
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// ~/.dbadmin
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".dbadmin")
    }

    /// Expand ${VAR} references in string values
    fn expand_variables(&mut self) {
        if let Some(url) = &self.database.url {
            let expanded = expand_string(url);
            // An unset variable leaves nothing usable behind
            self.database.url = if expanded.trim().is_empty() {
                None
            } else {
                Some(expanded)
            };
        }
        self.database.schema = expand_string(&self.database.schema);
        self.server.bind = expand_string(&self.server.bind);
    }
}

/// Replace `${VAR}` with the environment value (empty when unset).
pub fn expand_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find('}') {
            Some(end) => {
                let name = &rest[start + 2..start + 2 + end];
                out.push_str(&env::var(name).unwrap_or_default());
                rest = &rest[start + 2 + end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn template_parses_to_defaults() {
        let config: DbAdminConfig = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.database.schema, "public");
        assert_eq!(config.browse.default_limit, 100);
        assert_eq!(config.browse.edit_limit, 200);
        assert!(config.reports.is_empty());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config: DbAdminConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:3030");
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn expands_env_vars() {
        env::set_var("DBADMIN_TEST_HOST", "db.internal");
        assert_eq!(
            expand_string("postgres://${DBADMIN_TEST_HOST}/ufop"),
            "postgres://db.internal/ufop"
        );
        assert_eq!(expand_string("${DBADMIN_TEST_UNSET_VAR}x"), "x");
        assert_eq!(expand_string("no vars"), "no vars");
        assert_eq!(expand_string("broken ${open"), "broken ${open");
    }

    #[test]
    fn load_from_file_with_reports() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[database]
url = "postgres://localhost/ufop"
schema = "lab"

[[reports]]
id = "orders"
title = "Orders"
sql = "SELECT * FROM orders WHERE ref ILIKE $1"
"#
        )
        .unwrap();

        let config = DbAdminConfig::load_from(file.path()).unwrap();
        assert_eq!(config.database.url.as_deref(), Some("postgres://localhost/ufop"));
        assert_eq!(config.database.schema, "lab");
        assert_eq!(config.reports.len(), 1);
        assert_eq!(config.reports[0].prompt, "Search term");
    }

    #[test]
    fn unset_url_variable_becomes_none() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database]\nurl = \"${{DBADMIN_TEST_NEVER_SET}}\"").unwrap();
        let config = DbAdminConfig::load_from(file.path()).unwrap();
        assert!(config.database.url.is_none());
    }

    #[test]
    fn limits_are_clamped() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(50), 50);
        assert_eq!(clamp_limit(5000), 1000);
    }
}
