use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Optional per-root settings read from `plansync.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Swarm id for migrated plans whose legacy text has no `Swarm:` line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_swarm: Option<String>,
    /// When false, loads never write: no regeneration, no migration.
    #[serde(default = "default_true")]
    pub auto_heal: bool,
    /// Copy an unreadable `plan.json` to `plan.json.invalid` before
    /// migration replaces it.
    #[serde(default = "default_true")]
    pub preserve_invalid: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_swarm: None,
            auto_heal: true,
            preserve_invalid: true,
        }
    }
}

impl Config {
    /// Load `plansync.yaml`; a missing file yields the defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Config::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Config::default());
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Like [`Config::load`], but a malformed file logs a warning and falls
    /// back to the defaults.
    pub fn load_or_default(root: &Path) -> Self {
        Self::load(root).unwrap_or_else(|e| {
            tracing::warn!(root = %root.display(), error = %e, "ignoring unreadable plansync.yaml");
            Config::default()
        })
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if let Some(swarm) = &self.default_swarm {
            if swarm.contains('\n') {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: "default_swarm must be a single line".to_string(),
                });
            } else if swarm.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: "default_swarm is blank; migrated plans will have an empty swarm"
                        .to_string(),
                });
            }
        }

        if !self.auto_heal && self.preserve_invalid {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "preserve_invalid has no effect while auto_heal is false".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
