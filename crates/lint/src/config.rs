//! Lint configuration.
//!
//! A configuration is a JSON document whose `rules` object maps rule ids to
//! `"enable"`, `"disable"` or an object of options. An options object may
//! carry a `level` (`"error"` or `"warning"`); everything else is handed to
//! the rule:
//!
//! ```json
//! {
//!   "rules": {
//!     "indentation": { "spaces": 2, "indent-sequences": "consistent" },
//!     "key-duplicates": "disable",
//!     "anchors": { "level": "warning", "forbid-unused-anchors": true }
//!   }
//! }
//! ```
//!
//! Entries override the defaults rule by rule: `indentation`,
//! `key-duplicates` and `anchors` are enabled with their default options.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::problem::Level;
use crate::rules::{self, RuleEntry, RuleOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    Enable,
    Disable,
}

/// Configuration of one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleConfig {
    Toggle(Toggle),
    Options(RuleOptions),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    #[serde(default)]
    pub rules: IndexMap<String, RuleConfig>,
}

impl Default for LintConfig {
    fn default() -> Self {
        let rules = ["indentation", "key-duplicates", "anchors"]
            .into_iter()
            .map(|id| (id.to_string(), RuleConfig::Toggle(Toggle::Enable)))
            .collect();
        Self { rules }
    }
}

/// A rule resolved from the configuration, ready to be built.
#[derive(Debug, Clone)]
pub struct EnabledRule {
    pub entry: &'static RuleEntry,
    pub level: Level,
    pub options: RuleOptions,
}

impl LintConfig {
    /// Parses a configuration, layering its entries over the defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let user: LintConfig = serde_json::from_str(text)?;
        let mut config = LintConfig::default();
        config.rules.extend(user.rules);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&text)
    }

    /// Checks rule ids and options without keeping the built rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for rule in self.enabled_rules()? {
            (rule.entry.build)(&rule.options)?;
        }
        Ok(())
    }

    /// The enabled rules, in configuration order.
    pub fn enabled_rules(&self) -> Result<Vec<EnabledRule>, ConfigError> {
        let mut enabled = Vec::new();
        for (id, config) in &self.rules {
            let entry = rules::get(id).ok_or_else(|| ConfigError::UnknownRule(id.clone()))?;
            match config {
                RuleConfig::Toggle(Toggle::Disable) => {}
                RuleConfig::Toggle(Toggle::Enable) => enabled.push(EnabledRule {
                    entry,
                    level: Level::Error,
                    options: RuleOptions::new(),
                }),
                RuleConfig::Options(options) => {
                    let mut options = options.clone();
                    let level = match options.remove("level") {
                        Some(value) => parse_level(id, value)?,
                        None => Level::Error,
                    };
                    enabled.push(EnabledRule { entry, level, options });
                }
            }
        }
        Ok(enabled)
    }
}

fn parse_level(rule: &str, value: Value) -> Result<Level, ConfigError> {
    serde_json::from_value(value).map_err(|_| ConfigError::InvalidOption {
        rule: rule.to_string(),
        message: "level must be \"error\" or \"warning\"".to_string(),
    })
}
