//! TOML configuration for the resolver: which type solvers to chain, how
//! large their caches may grow, and how to log.

#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Once;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Toml(err.message().to_owned())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    pub solver: SolverConfig,
    pub logging: LoggingConfig,
}

impl ResolverConfig {
    /// Load a config file. Relative entry paths are resolved against the
    /// directory containing the file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        if let Some(dir) = path.parent() {
            config.solver.resolve_paths(dir);
        }
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Capacity of each solver cache; `0` disables the bound.
    pub cache_size_limit: usize,
    pub error_policy: ErrorPolicy,
    /// Solvers in lookup order.
    pub entries: Vec<SolverEntry>,
}

impl SolverConfig {
    fn default_cache_size_limit() -> usize {
        1024
    }

    fn resolve_paths(&mut self, base: &Path) {
        for entry in &mut self.entries {
            if let Some(path) = entry.path_mut() {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            cache_size_limit: Self::default_cache_size_limit(),
            error_policy: ErrorPolicy::default(),
            entries: Vec::new(),
        }
    }
}

/// What a combined solver does when one of its children fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// The failure aborts the lookup.
    #[default]
    Propagate,
    /// The failing child is logged and skipped.
    SkipFailing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SolverEntry {
    Reflection {
        #[serde(default)]
        jre_only: bool,
    },
    /// A zip or jar of `.java` files.
    SourceArchive { path: PathBuf },
    /// A source root directory.
    SourceDir { path: PathBuf },
    /// A jar or directory of `.class` files.
    ClassArchive { path: PathBuf },
    Memory,
}

impl SolverEntry {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            SolverEntry::SourceArchive { path }
            | SolverEntry::SourceDir { path }
            | SolverEntry::ClassArchive { path } => Some(path),
            SolverEntry::Reflection { .. } | SolverEntry::Memory => None,
        }
    }

    fn path_mut(&mut self) -> Option<&mut PathBuf> {
        match self {
            SolverEntry::SourceArchive { path }
            | SolverEntry::SourceDir { path }
            | SolverEntry::ClassArchive { path } => Some(path),
            SolverEntry::Reflection { .. } | SolverEntry::Memory => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// A level name or a full `EnvFilter` directive string.
    pub level: String,
    /// Emit logs as JSON lines.
    pub json: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// The effective filter: the configured level with `RUST_LOG` merged in.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        let config_directives = Self::normalize_level_directives(&self.level);
        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

static TRACING_INIT: Once = Once::new();

/// Install a global fmt subscriber for `config`.
///
/// Only the first call has an effect; a subscriber installed by someone else
/// is left in place.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();
        let result = if config.json {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::io::stderr)
                .try_init()
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
        };
        if let Err(err) = result {
            tracing::debug!(target = "jsym.config", error = %err, "tracing already initialized");
        }
    });
}
