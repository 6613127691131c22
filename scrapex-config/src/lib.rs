//! Loader for Scrapex configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are added, then `SCRAPEX_`-prefixed
//! environment variables are applied on top (`__` separates nested keys, so
//! `SCRAPEX_OPTIONS__MAX_ITEMS=5` sets `options.max_items`). String values may
//! reference other variables as `${VAR}`. Anything left unset keeps its
//! default, including the built-in relay list.
//!
//! ```yaml
//! version: "1"
//! fetch:
//!   timeout_ms: 15000
//!   user_agent: "Mozilla/5.0 ..."
//! relays:
//!   - name: allOrigins
//!     base_url: "https://api.allorigins.win/raw?url="
//!     style: append
//! options:
//!   include_metadata: true
//!   extract_tables: true
//!   max_items: 20
//! ```
use config::{Config, ConfigError, Environment, File, FileFormat};
use scrapex_web::{ExtractionOptions, FetchSettings, RelayEndpoint, default_relays};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "SCRAPEX";
const CONFIG_FILE_NAME: &str = "scrapex.yaml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrapexConfig {
    pub version: Option<String>,
    pub fetch: FetchSettings,
    /// Relays in fallback order.
    pub relays: Vec<RelayEndpoint>,
    pub options: ExtractionOptions,
}

impl Default for ScrapexConfig {
    fn default() -> Self {
        Self {
            version: None,
            fetch: FetchSettings::default(),
            relays: default_relays(),
            options: ExtractionOptions::default(),
        }
    }
}

impl ScrapexConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_ms == 0 {
            return Err(ConfigError::Message(
                "fetch.timeout_ms must be greater than zero".into(),
            ));
        }
        if let Some(relay) = self
            .relays
            .iter()
            .find(|r| r.name.trim().is_empty() || r.base_url.trim().is_empty())
        {
            return Err(ConfigError::Message(format!(
                "relay entries need a name and a base_url (got name={:?}, base_url={:?})",
                relay.name, relay.base_url
            )));
        }
        Ok(())
    }
}

/// `~/.config/scrapex/scrapex.yaml` (or the platform equivalent).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("scrapex").join(CONFIG_FILE_NAME))
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring.
pub struct ScrapexConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ScrapexConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrapexConfigLoader {
    /// Start with no file sources; environment overrides are always applied.
    ///
    /// ```
    /// use scrapex_config::ScrapexConfigLoader;
    ///
    /// let config = ScrapexConfigLoader::new()
    ///     .with_yaml_str("version: '1'\noptions:\n  max_items: 5")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.options.max_items.get(), 5);
    /// assert_eq!(config.relays.len(), 3);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; the format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge every source, apply `SCRAPEX_` overrides, expand `${VAR}`, and
    /// deserialize.
    ///
    /// ```
    /// use scrapex_config::ScrapexConfigLoader;
    /// use scrapex_web::InsertionStyle;
    ///
    /// unsafe { std::env::set_var("RELAY_HOST", "relay.internal"); }
    ///
    /// let config = ScrapexConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// relays:
    ///   - name: "internal"
    ///     base_url: "https://${RELAY_HOST}/fetch?u="
    ///     style: "append"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.relays.len(), 1);
    /// assert_eq!(config.relays[0].base_url, "https://relay.internal/fetch?u=");
    /// assert_eq!(config.relays[0].style, InsertionStyle::Append);
    ///
    /// unsafe { std::env::remove_var("RELAY_HOST"); }
    /// ```
    pub fn load(self) -> Result<ScrapexConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: ScrapexConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate()?;
        Ok(typed)
    }
}
