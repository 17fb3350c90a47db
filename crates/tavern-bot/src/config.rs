//! Bot configuration: a YAML file with serde defaults, plus env-var
//! overrides for the settings operators change most.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tavern_core::types::UserId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Prefix for command invocations, e.g. `!create-group`.
    #[serde(default = "default_prefix")]
    pub command_prefix: String,

    /// Users treated as platform administrators by the sandbox. The real
    /// transport resolves admin status from platform permissions instead.
    #[serde(default)]
    pub admin_users: Vec<UserId>,
}

fn default_prefix() -> String {
    "!".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command_prefix: default_prefix(),
            admin_users: Vec::new(),
        }
    }
}

impl BotConfig {
    /// Load from `path` if given (missing file is an error), otherwise
    /// start from defaults. `TAVERN_PREFIX` and `TAVERN_ADMINS`
    /// (comma-separated user ids) override either source.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let data = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_yaml::from_str(&data)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Ok(prefix) = std::env::var("TAVERN_PREFIX") {
            if !prefix.is_empty() {
                config.command_prefix = prefix;
            }
        }
        if let Ok(admins) = std::env::var("TAVERN_ADMINS") {
            for id in admins.split(',').filter(|s| !s.trim().is_empty()) {
                let id: u64 = id
                    .trim()
                    .parse()
                    .with_context(|| format!("TAVERN_ADMINS entry '{id}' is not a user id"))?;
                config.admin_users.push(UserId(id));
            }
        }
        Ok(config)
    }

    pub fn is_admin(&self, user: UserId) -> bool {
        self.admin_users.contains(&user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_when_fields_missing() {
        let config: BotConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.command_prefix, "!");
        assert!(config.admin_users.is_empty());
    }

    #[test]
    fn load_reads_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "command_prefix: '?'").unwrap();
        writeln!(file, "admin_users: [900]").unwrap();
        let config = BotConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.command_prefix, "?");
        assert!(config.is_admin(UserId(900)));
        assert!(!config.is_admin(UserId(1)));
    }

    #[test]
    fn load_missing_file_fails() {
        assert!(BotConfig::load(Some(Path::new("/nonexistent/tavern.yaml"))).is_err());
    }
}
