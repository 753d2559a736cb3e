//! Configuration management for Maktaba Server

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub library: LibraryConfig,
    pub cache: CacheConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    /// JSON file listing the book records
    pub catalog: PathBuf,
    /// Base directory for relative EPUB paths
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Maximum number of extracted books kept in memory
    pub capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub default_limit: usize,
    /// Upper bound applied to client-supplied limits
    pub max_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            library: LibraryConfig {
                catalog: PathBuf::from("./library/catalog.json"),
                root: PathBuf::from("./library"),
            },
            cache: CacheConfig {
                enabled: true,
                capacity: 32,
            },
            search: SearchConfig {
                default_limit: 20,
                max_limit: 100,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port)?,
            },
            library: LibraryConfig {
                catalog: env::var("LIBRARY_CATALOG")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.library.catalog),
                root: env::var("LIBRARY_ROOT")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.library.root),
            },
            cache: CacheConfig {
                enabled: parse_var("EPUB_CACHE_ENABLED", defaults.cache.enabled)?,
                capacity: parse_var("EPUB_CACHE_CAPACITY", defaults.cache.capacity)?,
            },
            search: SearchConfig {
                default_limit: parse_var("SEARCH_DEFAULT_LIMIT", defaults.search.default_limit)?,
                max_limit: parse_var("SEARCH_MAX_LIMIT", defaults.search.max_limit)?,
            },
        })
    }
}

/// Read and parse a variable, falling back to `default` when it is unset or
/// unparseable
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, env::VarError> {
    match env::var(name) {
        Ok(value) => Ok(value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid value for {}: {:?}", name, value);
            default
        })),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(e),
    }
}
