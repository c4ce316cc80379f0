//! Configuration loading and validation for the command-line tools.
//!
//! Values come from environment variables. [`ConfigBinder`] maps each
//! configuration key to one variable; [`Settings`] is the validated result.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Binds configuration keys to environment variables.
///
/// Every bound key starts out unset; [`ConfigBinder::build`] fills in the keys
/// whose variables are present and non-empty.
#[derive(Debug, Default)]
pub struct ConfigBinder {
    bindings: Vec<EnvBinding>,
    env: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone)]
struct EnvBinding {
    key: String,
    env_var: String,
    name_override: String,
}

impl ConfigBinder {
    /// Create a binder with no bindings that reads the process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to the environment variable named `key`, uppercased.
    pub fn bind(self, key: &str) -> Self {
        self.bind_with_env_override(key, "")
    }

    /// Bind `key` to `env_var`, or to the uppercased key if `env_var` is empty.
    pub fn bind_with_env_override(mut self, key: &str, env_var: &str) -> Self {
        let resolved = if env_var.is_empty() {
            key.to_uppercase()
        } else {
            env_var.to_owned()
        };
        self.bindings.push(EnvBinding {
            key: key.to_owned(),
            env_var: resolved,
            name_override: env_var.to_owned(),
        });
        self
    }

    /// Read variables from `env` instead of the process environment.
    pub fn with_env_source(mut self, env: HashMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    /// Name of the environment variable bound to `key`, if any.
    pub fn env_var_for(&self, key: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.key == key)
            .map(|b| b.env_var.as_str())
    }

    /// Resolve every binding into a [`config::Config`].
    ///
    /// # Errors
    ///
    /// Returns an error if a key is empty or contains whitespace, or if the
    /// `config` crate rejects a key.
    pub fn build(self) -> Result<config::Config> {
        let mut builder = config::Config::builder();
        for binding in &self.bindings {
            if !is_valid_name(&binding.key) || !is_valid_name(&binding.env_var) {
                anyhow::bail!(
                    "failed to bind environment variable for key '{}' (name override: '{}')",
                    binding.key,
                    binding.name_override
                );
            }
            let value = self.lookup(&binding.env_var);
            builder = builder
                .set_override_option(&binding.key, value)
                .with_context(|| {
                    format!(
                        "failed to bind environment variable for key '{}' (name override: '{}')",
                        binding.key, binding.name_override
                    )
                })?;
        }
        builder
            .build()
            .context("failed to build configuration from environment")
    }

    fn lookup(&self, name: &str) -> Option<String> {
        let value = match &self.env {
            Some(env) => env.get(name).cloned(),
            None => std::env::var(name).ok(),
        };
        value.filter(|v| !v.is_empty())
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(char::is_whitespace)
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per record (production).
    Json,
    /// Human-readable records (development).
    Pretty,
}

/// Validated settings shared by all command-line tools.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Tracing log level (e.g. `"info"`, `"debug"`). `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `"json"` or `"pretty"`.
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Base64-encoded AES-256 key used when no `-k` flag is given.
    #[serde(default)]
    pub key: Option<String>,
}

fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "pretty".into()
}

impl Settings {
    /// Load and validate settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        Self::load(Self::binder())
    }

    /// The bindings read by [`Settings::from_env`].
    pub fn binder() -> ConfigBinder {
        ConfigBinder::new()
            .bind_with_env_override("log_level", "SEAL_LOG_LEVEL")
            .bind_with_env_override("log_format", "SEAL_LOG_FORMAT")
            .bind_with_env_override("key", "SEAL_KEY")
    }

    /// Load and validate settings through `binder`.
    pub fn load(binder: ConfigBinder) -> Result<Self> {
        let cfg = binder.build()?;
        let settings: Settings = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parsed [`LogFormat`]; assumes [`Settings::validate`] has passed.
    pub fn format(&self) -> LogFormat {
        if self.log_format.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }

    fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            anyhow::bail!("SEAL_LOG_LEVEL must not be empty");
        }
        let format = self.log_format.to_ascii_lowercase();
        if format != "json" && format != "pretty" {
            anyhow::bail!(
                "SEAL_LOG_FORMAT must be \"json\" or \"pretty\", got {:?}",
                self.log_format
            );
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            key: None,
        }
    }
}
