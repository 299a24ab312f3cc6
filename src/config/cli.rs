use crate::config::{Settings, TomlConfig};
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "post-viewer")]
#[command(about = "Render employee posts and comments from a JSONPlaceholder-style API")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// API base URL (default: https://jsonplaceholder.typicode.com)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Read users, posts and comments from a JSON file instead of the API
    #[arg(long)]
    pub fixtures: Option<String>,

    /// Selector value to choose after loading: a user id or "Employees"
    #[arg(short, long)]
    pub user: Option<String>,

    /// Post ids whose comments should be shown
    #[arg(long, value_delimiter = ',')]
    pub expand: Vec<u64>,

    /// Write the rendered page here instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliConfig {
    pub fn load_toml(&self) -> Result<Option<TomlConfig>> {
        self.config
            .as_ref()
            .map(TomlConfig::from_file)
            .transpose()
    }

    /// Layers these flags over `toml` (if any).
    pub fn into_settings(self, toml: Option<&TomlConfig>) -> Settings {
        let mut settings = toml.map(Settings::from_toml).unwrap_or_default();

        if let Some(base_url) = self.base_url {
            settings.base_url = base_url;
        }
        if self.fixtures.is_some() {
            settings.fixtures = self.fixtures;
        }
        if self.user.is_some() {
            settings.user = self.user;
        }
        if !self.expand.is_empty() {
            settings.expand = self.expand;
        }
        if self.output.is_some() {
            settings.output_path = self.output;
        }
        if let Some(format) = self.log_format {
            settings.log_format = format;
        }
        settings.verbose |= self.verbose;
        settings
    }

    pub fn resolve(self) -> Result<Settings> {
        let toml = self.load_toml()?;
        Ok(self.into_settings(toml.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::SelectValue;

    #[test]
    fn test_parse_flags() {
        let cli = CliConfig::parse_from([
            "post-viewer",
            "--user",
            "Employees",
            "--expand",
            "1,2,3",
            "--log-format",
            "json",
            "-v",
        ]);

        assert_eq!(cli.user.as_deref(), Some("Employees"));
        assert_eq!(cli.expand, vec![1, 2, 3]);
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        assert!(cli.verbose);
    }

    #[test]
    fn test_flags_override_toml() {
        let mut toml = TomlConfig::default();
        toml.api.base_url = Some("https://from-file.example".to_string());
        toml.page.user = Some(SelectValue::Id(2));
        toml.page.expand = vec![5];
        toml.output.path = Some("file.html".to_string());

        let cli = CliConfig {
            user: Some("3".to_string()),
            output: Some("cli.html".to_string()),
            ..CliConfig::default()
        };
        let settings = cli.into_settings(Some(&toml));

        assert_eq!(settings.base_url, "https://from-file.example");
        assert_eq!(settings.user.as_deref(), Some("3"));
        assert_eq!(settings.expand, vec![5]);
        assert_eq!(settings.output_path.as_deref(), Some("cli.html"));
    }

    #[test]
    fn test_resolve_without_config_file_uses_defaults() {
        let settings = CliConfig::default().resolve().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_resolve_missing_config_file_fails() {
        let cli = CliConfig {
            config: Some("/definitely/not/here.toml".to_string()),
            ..CliConfig::default()
        };
        assert!(cli.resolve().is_err());
    }
}
