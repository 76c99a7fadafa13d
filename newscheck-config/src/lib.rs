//! Loader for NewsCheck configuration with YAML and environment overlays.
//!
//! Sources are merged in the order they are added, with `NEWSCHECK_`-prefixed
//! environment variables applied last (`__` separates nested keys, so
//! `NEWSCHECK_REMOTE__TIMEOUT_SECS=3` sets `remote.timeout_secs`). After the
//! merge every string is run through `${VAR}` expansion. Every field has a
//! default, so loading with no sources at all yields a working configuration.
//!
//! ```yaml
//! api_key: "${GEMINI_API_KEY}"
//! remote:
//!   timeout_secs: 8
//!   primary:   { base_url: "https://generativelanguage.googleapis.com/v1beta", model: "gemini-1.5-flash" }
//!   alternate: { enabled: true, url: "https://ai.google.dev/api/generate", model: "gemini-1.5-flash" }
//!   generation: { temperature: 0.1, top_k: 1, top_p: 1.0, max_output_tokens: 2048 }
//! heuristics:
//!   trigger_weight: 25
//!   thresholds: { false_above: 60, mixed_above: 40, unverified_above: 20 }
//! domains: { trusted: ["apnews.com"], questionable: [] }
//! logging: { format: text, emit_stderr: false, filter: info }
//! ```
use config::{Config, ConfigError, Environment, File, FileFormat};
use newscheck_common::observability::LogFormat;
use newscheck_common::{GenerationParams, HeuristicConfig};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "NEWSCHECK";
const REDACTED: &str = "<redacted>";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] ConfigError),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewscheckConfig {
    /// Shared by both endpoints. Unresolved `${VAR}` placeholders count as unset.
    #[serde(deserialize_with = "scalar_as_string")]
    pub api_key: Option<String>,
    pub remote: RemoteConfig,
    pub heuristics: HeuristicConfig,
    pub domains: DomainLists,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Per-attempt budget, applied to each endpoint separately.
    pub timeout_secs: u64,
    pub primary: PrimaryEndpoint,
    pub alternate: AlternateEndpoint,
    pub generation: GenerationParams,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 8,
            primary: PrimaryEndpoint::default(),
            alternate: AlternateEndpoint::default(),
            generation: GenerationParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryEndpoint {
    pub base_url: String,
    pub model: String,
}

impl Default for PrimaryEndpoint {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            model: "gemini-1.5-flash".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlternateEndpoint {
    pub enabled: bool,
    pub url: String,
    pub model: String,
}

impl Default for AlternateEndpoint {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "https://ai.google.dev/api/generate".into(),
            model: "gemini-1.5-flash".into(),
        }
    }
}

/// Domains appended to the built-in credibility lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainLists {
    pub trusted: Vec<String>,
    pub questionable: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub emit_stderr: bool,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            emit_stderr: false,
            filter: "info".into(),
            dir: None,
        }
    }
}

impl NewscheckConfig {
    /// The configured API key, if it is non-empty and fully expanded.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !k.contains("${"))
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        if self.remote.timeout_secs == 0 {
            return Err(LoadError::Invalid {
                field: "remote.timeout_secs",
                reason: "must be at least 1".into(),
            });
        }
        if !self.heuristics.thresholds.is_strictly_ordered() {
            let t = self.heuristics.thresholds;
            return Err(LoadError::Invalid {
                field: "heuristics.thresholds",
                reason: format!(
                    "expected false_above > mixed_above > unverified_above, got {} / {} / {}",
                    t.false_above, t.mixed_above, t.unverified_above
                ),
            });
        }
        if self.heuristics.caps_run_min == 0 {
            return Err(LoadError::Invalid {
                field: "heuristics.caps_run_min",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// YAML rendering of the effective configuration with the API key masked.
    pub fn to_redacted_yaml(&self) -> Result<String, serde_yaml::Error> {
        let mut shown = self.clone();
        if shown.api_key().is_some() {
            shown.api_key = Some(REDACTED.into());
        }
        serde_yaml::to_string(&shown)
    }
}

/// `$XDG_CONFIG_HOME/newscheck/config.yaml` or the platform equivalent.
/// Keys are opaque text even when a source hands them over as a number or bool.
fn scalar_as_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(de)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string, found {other}"
        ))),
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("newscheck").join("config.yaml"))
}

/// Expand `$VAR` / `${VAR}` in every string, re-expanding values that
/// themselves contain placeholders. Unknown variables are left untouched and
/// reference cycles stop after a fixed number of passes.
fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) if s.contains('$') => *s = expand_str(s),
        Value::Array(items) => items.iter_mut().for_each(expand_env_in_value),
        Value::Object(map) => map.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

fn expand_str(input: &str) -> String {
    let mut current = input.to_string();
    for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
        let Ok(next) = shellexpand::env(&current) else {
            break;
        };
        if next == current {
            break;
        }
        current = next.into_owned();
    }
    current
}

/// Builder hiding the `config` crate wiring.
pub struct NewscheckConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<&'static str>,
}

impl Default for NewscheckConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl NewscheckConfigLoader {
    /// Defaults plus `NEWSCHECK_` environment overrides.
    ///
    /// ```
    /// use newscheck_config::NewscheckConfigLoader;
    ///
    /// let cfg = NewscheckConfigLoader::new()
    ///     .with_yaml_str("remote:\n  timeout_secs: 5")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(cfg.remote.timeout_secs, 5);
    /// assert_eq!(cfg.remote.primary.model, "gemini-1.5-flash");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: Some(ENV_PREFIX),
        }
    }

    /// Only the explicitly added sources; environment overrides are skipped.
    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    /// Attach a YAML/TOML/JSON file that must exist; the format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is merged only when present.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use newscheck_config::NewscheckConfigLoader;
    ///
    /// let cfg = NewscheckConfigLoader::new()
    ///     .without_env()
    ///     .with_yaml_str(
    ///         r#"
    /// heuristics:
    ///   trigger_weight: 30
    /// domains:
    ///   questionable: ["example-rumors.net"]
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.heuristics.trigger_weight, 30);
    /// assert_eq!(cfg.heuristics.caps_run_weight, 20);
    /// assert_eq!(cfg.domains.questionable, vec!["example-rumors.net"]);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders and check the result.
    pub fn load(self) -> Result<NewscheckConfig, LoadError> {
        let Self {
            mut builder,
            env_prefix,
        } = self;
        if let Some(prefix) = env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("domains.trusted")
                    .with_list_parse_key("domains.questionable"),
            );
        }
        let mut merged: Value = builder.build()?.try_deserialize()?;
        // `try_parsing` reads "00123" as the integer 123, so the key is taken verbatim.
        let raw_key = env_prefix.and_then(|p| std::env::var(format!("{p}_API_KEY")).ok());
        if let (Some(raw), Value::Object(map)) = (raw_key, &mut merged) {
            map.insert("api_key".into(), Value::String(raw));
        }
        expand_env_in_value(&mut merged);

        let cfg: NewscheckConfig = serde_json::from_value(merged)
            .map_err(|e| ConfigError::Message(format!("configuration shape: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
