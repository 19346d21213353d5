//! Configuration system (layered: defaults > TOML file > environment).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{LogiqError, Result};
use crate::models::LanguageModel;
use crate::types::GenerationSettings;

pub const DEFAULT_APP_NAME: &str = "LogIQ Customer App";
pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

/// Runtime configuration for the customer agent.
#[derive(Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub model: LanguageModel,
    pub temperature: f64,
    pub max_output_tokens: u32,
    pub catalog_path: Option<PathBuf>,
    google_api_key: Option<String>,
    google_base_url: Option<String>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("app_name", &self.app_name)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("catalog_path", &self.catalog_path)
            .field("google_api_key", &self.google_api_key.as_ref().map(|_| ".."))
            .field("google_base_url", &self.google_base_url)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            model: LanguageModel::default(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            catalog_path: None,
            google_api_key: None,
            google_base_url: None,
        }
    }
}

/// On-disk overlay. Every field is optional; absent fields keep the lower layer.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    app_name: Option<String>,
    model: Option<LanguageModel>,
    temperature: Option<f64>,
    max_output_tokens: Option<u32>,
    catalog_path: Option<PathBuf>,
}

/// Load `<dir>/.env` into the process environment.
///
/// A missing file is not an error; variables already set are not overridden.
pub fn load_dotenv(dir: &Path) -> Result<()> {
    let path = dir.join(".env");
    match dotenvy::from_path(&path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "loaded .env");
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(LogiqError::Configuration(format!(
            "failed to load {}: {e}",
            path.display()
        ))),
    }
}

impl AppConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Defaults, then the TOML file at `path`, then the environment.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&raw)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Defaults overlaid with a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(raw)
            .map_err(|e| LogiqError::Configuration(format!("invalid config file: {e}")))?;
        let mut config = Self::default();
        if let Some(app_name) = file.app_name {
            config.app_name = app_name;
        }
        if let Some(model) = file.model {
            config.model = model;
        }
        if let Some(temperature) = file.temperature {
            config.temperature = temperature;
        }
        if let Some(max) = file.max_output_tokens {
            config.max_output_tokens = max;
        }
        if file.catalog_path.is_some() {
            config.catalog_path = file.catalog_path;
        }
        config.validate()?;
        Ok(config)
    }

    /// Overlay variables read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(app_name) = lookup("LOGIQ_APP_NAME") {
            self.app_name = app_name;
        }
        if let Some(model) = lookup("LOGIQ_MODEL") {
            self.model = model.parse().map_err(|e| {
                LogiqError::Configuration(format!("LOGIQ_MODEL is not a model selector: {e}"))
            })?;
        }
        if let Some(temperature) = lookup("LOGIQ_TEMPERATURE") {
            self.temperature = temperature.trim().parse().map_err(|_| {
                LogiqError::Configuration(format!(
                    "LOGIQ_TEMPERATURE is not a number: {temperature}"
                ))
            })?;
        }
        if let Some(max) = lookup("LOGIQ_MAX_TOKENS") {
            self.max_output_tokens = max.trim().parse().map_err(|_| {
                LogiqError::Configuration(format!("LOGIQ_MAX_TOKENS is not an integer: {max}"))
            })?;
        }
        if let Some(path) = lookup("LOGIQ_CATALOG") {
            self.catalog_path = Some(PathBuf::from(path));
        }
        if let Some(key) = lookup("GOOGLE_API_KEY").or_else(|| lookup("GEMINI_API_KEY")) {
            self.google_api_key = Some(key);
        }
        if let Some(url) = lookup("GOOGLE_BASE_URL") {
            self.google_base_url = Some(url);
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(LogiqError::Configuration(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if self.max_output_tokens == 0 {
            return Err(LogiqError::Configuration(
                "max_output_tokens must be positive".into(),
            ));
        }
        if let Some(limit) = self.model.max_output_tokens() {
            if self.max_output_tokens > limit {
                return Err(LogiqError::Configuration(format!(
                    "max_output_tokens {} exceeds the {} limit of {limit}",
                    self.max_output_tokens, self.model
                )));
            }
        }
        Ok(())
    }

    /// Switch models, keeping the previous one if the current token limit
    /// does not fit the new model.
    pub fn set_model(&mut self, model: LanguageModel) -> Result<()> {
        let previous = std::mem::replace(&mut self.model, model);
        if let Err(e) = self.validate() {
            self.model = previous;
            return Err(e);
        }
        Ok(())
    }

    pub fn set_api_key(&mut self, provider: &str, key: String) {
        if provider == "google" {
            self.google_api_key = Some(key);
        }
    }

    pub fn get_api_key(&self, provider: &str) -> Option<String> {
        match provider {
            "google" => self.google_api_key.clone(),
            _ => None,
        }
    }

    pub fn set_base_url(&mut self, provider: &str, url: String) {
        if provider == "google" {
            self.google_base_url = Some(url);
        }
    }

    pub fn get_base_url(&self, provider: &str) -> Option<String> {
        match provider {
            "google" => self.google_base_url.clone(),
            _ => None,
        }
    }

    /// Generation settings the agent sends with every request.
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings::builder()
            .temperature(self.temperature)
            .max_output_tokens(self.max_output_tokens)
            .build()
    }
}
