use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Status code {status} not in 200-299 range for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required identifier: {name}")]
    MissingIdentifier { name: &'static str },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Document error: {message}")]
    Dom { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Document,
    Configuration,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ViewerError {
    pub fn dom(message: impl Into<String>) -> Self {
        Self::Dom {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http(_) | Self::Status { .. } => ErrorCategory::Network,
            Self::Decode(_) | Self::MissingIdentifier { .. } | Self::NotFound { .. } => {
                ErrorCategory::Data
            }
            Self::Dom { .. } => ErrorCategory::Document,
            Self::Url(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::Io(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Document | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// True for failures that happened while talking to a post source, as
    /// opposed to a request that was never issued.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status { .. } | Self::Decode(_) | Self::NotFound { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Http(_) => "Check network connectivity and that the API base URL is reachable",
            Self::Status { .. } => "The API rejected the request; verify the base URL and identifiers",
            Self::Decode(_) => "The API returned an unexpected payload; check the base URL points at a compatible API",
            Self::Url(_) => "Use an absolute http:// or https:// base URL",
            Self::Io(_) => "Check that the file exists and that the output directory is writable",
            Self::MissingIdentifier { .. } => "Pass a positive identifier",
            Self::NotFound { .. } => "Check the identifier exists in the data source",
            Self::Dom { .. } => "The page structure is missing an expected element",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file or command-line flags",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Http(_) | Self::Status { .. } => format!("Could not load data: {}", self),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            Self::MissingConfigError { field } => format!("Missing setting '{}'", field),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
