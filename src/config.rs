//! Configuration handling

use crate::derive::{DerivationEngine, EvaluationOrder};
use crate::validation::{Validator, DEFAULT_PATTERN_SIZE_LIMIT};
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User configuration, read from `config.json` in the platform config dir
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Path of the JSON file holding saved forms
    pub store_path: Option<PathBuf>,
    /// Order of derived-field evaluation: "schema" or "topological"
    pub derivation_order: Option<EvaluationOrder>,
    /// Compiled-size limit for validation patterns, in bytes
    pub pattern_size_limit: Option<usize>,
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("dev", "formsmith", "formsmith")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: AppConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Where saved forms live: the configured path, else `forms.json` in the
    /// platform data dir, else the working directory
    pub fn store_path(&self) -> PathBuf {
        self.store_path.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|dirs| dirs.data_dir().join("forms.json"))
                .unwrap_or_else(|| PathBuf::from("forms.json"))
        })
    }

    pub fn derivation_order(&self) -> EvaluationOrder {
        self.derivation_order.unwrap_or_default()
    }

    pub fn pattern_size_limit(&self) -> usize {
        self.pattern_size_limit.unwrap_or(DEFAULT_PATTERN_SIZE_LIMIT)
    }

    pub fn derivation_engine(&self) -> DerivationEngine {
        DerivationEngine::new(self.derivation_order())
    }

    pub fn validator(&self) -> Validator {
        Validator::new(self.pattern_size_limit())
    }
}
