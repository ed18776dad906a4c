use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Validation error on '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Email already subscribed: {email}")]
    Duplicate { email: String },

    #[error("Response decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl From<reqwest::Error> for SiteError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => SiteError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None if err.is_decode() => SiteError::Network {
                message: format!("body could not be read: {}", err),
            },
            None => SiteError::Network {
                message: err.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Http,
    Validation,
    Conflict,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SiteError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        SiteError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            SiteError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(s) if (500..600).contains(&s))
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SiteError::Network { .. } => ErrorCategory::Network,
            SiteError::Http { .. } => ErrorCategory::Http,
            SiteError::Validation { .. } => ErrorCategory::Validation,
            SiteError::Duplicate { .. } => ErrorCategory::Conflict,
            SiteError::Decode(_) => ErrorCategory::Data,
            SiteError::Config { .. }
            | SiteError::InvalidConfigValue { .. }
            | SiteError::MissingConfig { .. }
            | SiteError::Toml(_) => ErrorCategory::Configuration,
            SiteError::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Conflict => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Http => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SiteError::Network { .. } => {
                "The content backend could not be reached.".to_string()
            }
            SiteError::Http { status, .. } if *status >= 500 => {
                format!("The content backend failed with status {}.", status)
            }
            SiteError::Http { status, .. } => {
                format!("The content backend rejected the request ({}).", status)
            }
            SiteError::Validation { message, .. } => message.clone(),
            SiteError::Duplicate { .. } => "Email already subscribed".to_string(),
            SiteError::Decode(_) => "The content backend returned unexpected data.".to_string(),
            SiteError::Config { message } => format!("Invalid configuration: {}", message),
            SiteError::InvalidConfigValue { field, reason, .. } => {
                format!("Invalid configuration for {}: {}", field, reason)
            }
            SiteError::MissingConfig { field } => format!("Missing configuration: {}", field),
            SiteError::Io(e) => format!("File system error: {}", e),
            SiteError::Toml(e) => format!("Config file could not be parsed: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that CONTENT_BASE_URL points at a running backend",
            ErrorCategory::Http => "Retry later or inspect the backend logs",
            ErrorCategory::Validation => "Correct the input and try again",
            ErrorCategory::Conflict => "No action needed, the record already exists",
            ErrorCategory::Data => "Check that the backend content types match the expected schema",
            ErrorCategory::Configuration => "Fix the configuration value and restart",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
