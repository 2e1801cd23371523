use crate::adapters::{CompositeConfigAdaptor, FileConfigAdaptor, UrlConfigAdaptor};
use crate::utils::error::{ConfigError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// The sources file: which configuration documents to serve, in lookup order.
///
/// ```toml
/// [registry]
/// name = "ensembl"
///
/// [[sources]]
/// name = "local"
/// type = "file"
/// location = "./configs/hsapiens_gene.xml"
///
/// [[sources]]
/// name = "remote"
/// type = "url"
/// location = "${MART_HOST}/configs/mmusculus_gene.xml"
/// timeout_seconds = 30
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub registry: RegistryConfig,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Url,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub r#type: SourceKind,
    pub location: String,
    pub timeout_seconds: Option<u64>,
}

impl SourcesConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        toml::from_str(&processed).map_err(|e| ConfigError::TomlError {
            message: e.to_string(),
        })
    }

    /// Replace `${VAR}` with the environment value; unknown variables are left
    /// as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::TomlError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });
        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("registry.name", &self.registry.name)?;

        let mut seen: Vec<&str> = Vec::new();
        for (index, source) in self.sources.iter().enumerate() {
            let field = format!("sources[{}]", index);
            validate_non_empty_string(&format!("{}.name", field), &source.name)?;
            if seen.contains(&source.name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: format!("{}.name", field),
                    value: source.name.clone(),
                    reason: "source names must be unique".to_string(),
                });
            }
            seen.push(&source.name);

            match source.r#type {
                SourceKind::File => {
                    validate_path(&format!("{}.location", field), &source.location)?;
                }
                SourceKind::Url => {
                    validate_url(&format!("{}.location", field), &source.location)?;
                }
            }
            if let Some(timeout) = source.timeout_seconds {
                validate_positive_number(&format!("{}.timeout_seconds", field), timeout, 1)?;
            }
        }
        Ok(())
    }

    /// One adaptor per source, combined in file order.
    pub fn build_adaptor(&self) -> Result<CompositeConfigAdaptor> {
        self.validate_config()?;

        let mut composite = CompositeConfigAdaptor::new(&self.registry.name);
        for source in &self.sources {
            match source.r#type {
                SourceKind::File => {
                    composite.add(Box::new(FileConfigAdaptor::from_path(
                        &source.name,
                        &source.location,
                    )));
                }
                SourceKind::Url => {
                    let url = validate_url("location", &source.location)?;
                    let timeout = source.timeout_seconds.map(Duration::from_secs);
                    composite.add(Box::new(UrlConfigAdaptor::from_url(&source.name, url, timeout)));
                }
            }
        }
        tracing::debug!(
            "registry '{}' built with {} sources",
            self.registry.name,
            composite.len()
        );
        Ok(composite)
    }
}

impl Validate for SourcesConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
