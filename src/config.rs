//! Linter configuration.
//!
//! Loaded from a JSON file; every key is optional.
//!
//! ```json
//! {
//!   "rules": { "try-catch-tail": false },
//!   "max-fix-passes": 5
//! }
//! ```

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lint::RuleId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-rule switches, all on by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct RuleToggles {
    pub de_morgan: bool,
    pub simplify_logic: bool,
    pub no_else_return: bool,
    pub no_duplicate_return: bool,
    pub try_catch_tail: bool,
}

impl Default for RuleToggles {
    fn default() -> Self {
        RuleToggles {
            de_morgan: true,
            simplify_logic: true,
            no_else_return: true,
            no_duplicate_return: true,
            try_catch_tail: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct LintConfig {
    pub rules: RuleToggles,
    /// Upper bound on lint-and-fix rounds in `fix_source`
    pub max_fix_passes: usize,
}

impl Default for LintConfig {
    fn default() -> Self {
        LintConfig {
            rules: RuleToggles::default(),
            max_fix_passes: 10,
        }
    }
}

impl LintConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn is_enabled(&self, rule: RuleId) -> bool {
        match rule {
            RuleId::DeMorgan => self.rules.de_morgan,
            RuleId::SimplifyLogic => self.rules.simplify_logic,
            RuleId::NoElseReturn => self.rules.no_else_return,
            RuleId::NoDuplicateReturn => self.rules.no_duplicate_return,
            RuleId::TryCatchTail => self.rules.try_catch_tail,
        }
    }
}
