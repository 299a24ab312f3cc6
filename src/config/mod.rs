#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::adapters::DEFAULT_BASE_URL;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{validate_path, validate_positive_number, validate_url, Validate};

/// Fully resolved run settings: TOML values, overridden by command-line flags,
/// falling back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub fixtures: Option<String>,
    pub user: Option<String>,
    pub expand: Vec<u64>,
    pub output_path: Option<String>,
    pub log_format: LogFormat,
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fixtures: None,
            user: None,
            expand: Vec::new(),
            output_path: None,
            log_format: LogFormat::default(),
            verbose: false,
        }
    }
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            base_url: config.api.base_url.clone().unwrap_or(defaults.base_url),
            fixtures: config.api.fixtures.clone(),
            user: config.page.user.as_ref().map(|u| u.as_option_value()),
            expand: config.page.expand.clone(),
            output_path: config.output.path.clone(),
            log_format: config.logging.format.unwrap_or(defaults.log_format),
            verbose: config.logging.verbose.unwrap_or(defaults.verbose),
        }
    }
}

impl ConfigProvider for Settings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn fixtures_path(&self) -> Option<&str> {
        self.fixtures.as_deref()
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    fn initial_user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    fn expanded_posts(&self) -> &[u64] {
        &self.expand
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.base_url)?;

        if let Some(fixtures) = &self.fixtures {
            validate_path("api.fixtures", fixtures)?;
        }
        if let Some(output_path) = &self.output_path {
            validate_path("output.path", output_path)?;
        }
        for post_id in &self.expand {
            validate_positive_number("page.expand", *post_id, 1)?;
        }

        if !self.expand.is_empty() && self.user.is_none() {
            tracing::warn!("page.expand has no effect until a user is selected");
        }
        Ok(())
    }
}
