//! Settings resolution: CLI flags over `WAYFIND_SOURCE` over `wayfind.toml`
//! over built-in defaults.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::catalog::{Category, UnknownCategory};
use crate::dataset::DEFAULT_LOCATION;
use crate::query::{AliasTable, EmptyQueryPolicy, QueryEngine};

pub const CONFIG_FILE_NAME: &str = "wayfind.toml";
pub const SOURCE_ENV: &str = "WAYFIND_SOURCE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read current directory: {0}")]
    CurrentDir(std::io::Error),

    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("alias '{keyword}': {source}")]
    Alias {
        keyword: String,
        source: UnknownCategory,
    },
}

/// Contents of `wayfind.toml`.
///
/// ```toml
/// source = "https://example.com/travel_recommendation_api.json"
/// empty_query = "show-none"
///
/// [aliases]
/// beach = "Beach"
/// shrine = "Temple"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub empty_query: Option<EmptyQueryPolicy>,
    #[serde(default)]
    pub aliases_enabled: Option<bool>,
    /// Replaces the standard alias table when present.
    #[serde(default)]
    pub aliases: Option<BTreeMap<String, String>>,
}

/// Values given on the command line.
#[derive(Debug, Default)]
pub struct Overrides {
    pub source: Option<String>,
    pub empty_query: Option<EmptyQueryPolicy>,
    pub no_aliases: bool,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub source: String,
    pub engine: QueryEngine,
}

impl Settings {
    pub fn resolve(
        file: Option<&FileConfig>,
        env_source: Option<String>,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let source = overrides
            .source
            .clone()
            .or(env_source)
            .or_else(|| file.and_then(|f| f.source.clone()))
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        let empty_query = overrides
            .empty_query
            .or_else(|| file.and_then(|f| f.empty_query))
            .unwrap_or_default();

        let enabled = !overrides.no_aliases && file.and_then(|f| f.aliases_enabled).unwrap_or(true);
        let aliases = match file.and_then(|f| f.aliases.as_ref()) {
            _ if !enabled => AliasTable::empty(),
            Some(entries) => parse_aliases(entries)?,
            None => AliasTable::standard(),
        };

        Ok(Self {
            source,
            engine: QueryEngine::new(empty_query, aliases),
        })
    }
}

fn parse_aliases(entries: &BTreeMap<String, String>) -> Result<AliasTable, ConfigError> {
    let parsed = entries
        .iter()
        .map(|(keyword, category)| {
            category
                .parse::<Category>()
                .map(|c| (keyword.as_str(), c))
                .map_err(|source| ConfigError::Alias {
                    keyword: keyword.clone(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AliasTable::from_entries(parsed))
}

/// `WAYFIND_SOURCE`, ignoring blank values.
pub fn env_source() -> Option<String> {
    env::var(SOURCE_ENV)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Load the config file named on the command line, or discover `wayfind.toml`
/// from the current directory upward. An explicit path must exist.
pub fn load_file_config(explicit: Option<&Path>) -> Result<Option<FileConfig>, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let cwd = env::current_dir().map_err(ConfigError::CurrentDir)?;
            match find_project_config(&cwd) {
                Some(path) => path,
                None => return Ok(None),
            }
        }
    };
    read_file_config(&path).map(Some)
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "config file loaded");
    Ok(config)
}

fn find_project_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}
