use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{entity} requires a non-empty {field}")]
    MissingField { entity: String, field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    #[error("TOML parsing error: {message}")]
    TomlError { message: String },

    #[error("Adaptor {adaptor} failed: {message}")]
    AdaptorError { adaptor: String, message: String },

    #[error("No {kind} named '{name}'")]
    NotFound { kind: String, name: String },
}

impl ConfigError {
    pub fn missing(entity: &str, field: &str) -> Self {
        ConfigError::MissingField {
            entity: entity.to_string(),
            field: field.to_string(),
        }
    }

    pub fn adaptor(adaptor: &str, message: impl Into<String>) -> Self {
        ConfigError::AdaptorError {
            adaptor: adaptor.to_string(),
            message: message.into(),
        }
    }

    /// Short hint printed by the command line tool next to the error.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ConfigError::MissingField { .. } | ConfigError::InvalidValue { .. } => {
                "Check the configuration document for missing or malformed attributes"
            }
            ConfigError::IoError(_) => "Check that the file exists and is readable",
            ConfigError::HttpError(_) => "Check the URL and network connectivity, then retry",
            ConfigError::XmlError(_) | ConfigError::XmlAttributeError(_) => {
                "The document is not well-formed XML"
            }
            ConfigError::TomlError { .. } => "Fix the syntax of the sources file",
            ConfigError::AdaptorError { .. } => "Run with --verbose for adaptor details",
            ConfigError::NotFound { .. } => "Use the `datasets` command to list what is available",
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
