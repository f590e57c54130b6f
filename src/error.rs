//! Error types for tldw.

use thiserror::Error;

/// Library-level error type for tldw operations.
#[derive(Error, Debug)]
pub enum TldwError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("A summary is already being generated. Please wait for it to finish.")]
    AlreadyProcessing,

    #[error("Not a YouTube video URL: {0}")]
    NotAReference(String),

    #[error("Video not found or unavailable: {0}")]
    InvalidReference(String),

    #[error("No transcript available for video {0}")]
    TranscriptUnavailable(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{vendor} API error: {message}")]
    Provider { vendor: String, message: String },

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Settings error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Front-matter error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TldwError {
    /// Build a provider error for the given vendor.
    pub fn provider(vendor: &str, message: impl Into<String>) -> Self {
        TldwError::Provider {
            vendor: vendor.to_string(),
            message: message.into(),
        }
    }

    /// Classify this error for pipeline failure reporting.
    pub fn kind(&self) -> FailureKind {
        match self {
            TldwError::Configuration(_) => FailureKind::Configuration,
            TldwError::AlreadyProcessing => FailureKind::AlreadyProcessing,
            TldwError::NotAReference(_) => FailureKind::NotAReference,
            TldwError::InvalidReference(_) => FailureKind::InvalidReference,
            TldwError::TranscriptUnavailable(_) => FailureKind::TranscriptUnavailable,
            TldwError::Network(_) => FailureKind::Network,
            TldwError::Provider { .. } => FailureKind::Provider,
            TldwError::UnsupportedProvider(_) => FailureKind::UnsupportedProvider,
            TldwError::Document(_) | TldwError::Io(_) | TldwError::Yaml(_) => FailureKind::Document,
            TldwError::Config(_) | TldwError::Json(_) | TldwError::TomlParse(_) => {
                FailureKind::Internal
            }
        }
    }
}

/// A precondition that must hold before a pipeline run may start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("No model selected. Choose one with `tldw config select <name>`.")]
    NoModelSelected,

    #[error("API key for model '{0}' is missing.")]
    MissingCredential(String),

    #[error("Summarization provider is not initialized.")]
    ProviderUninitialized,
}

/// Failure classification carried by a failed pipeline result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Configuration,
    AlreadyProcessing,
    NotAReference,
    InvalidReference,
    TranscriptUnavailable,
    Network,
    Provider,
    UnsupportedProvider,
    Document,
    Internal,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureKind::Configuration => "configuration",
            FailureKind::AlreadyProcessing => "already-processing",
            FailureKind::NotAReference => "not-a-reference",
            FailureKind::InvalidReference => "invalid-reference",
            FailureKind::TranscriptUnavailable => "transcript-unavailable",
            FailureKind::Network => "network",
            FailureKind::Provider => "provider",
            FailureKind::UnsupportedProvider => "unsupported-provider",
            FailureKind::Document => "document",
            FailureKind::Internal => "internal",
        };
        write!(f, "{}", name)
    }
}

/// Result type alias for tldw operations.
pub type Result<T> = std::result::Result<T, TldwError>;
