pub mod toml_config;

pub use toml_config::{RegistryConfig, SourceConfig, SourceKind, SourcesConfig};

#[cfg(feature = "cli")]
use crate::adapters::{CompositeConfigAdaptor, FileConfigAdaptor, UrlConfigAdaptor};
#[cfg(feature = "cli")]
use crate::utils::error::{ConfigError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, validate_url, Validate};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "mart-config")]
#[command(about = "Inspect and resolve Mart dataset configurations")]
pub struct CliConfig {
    /// Sources file listing the configuration documents to serve
    #[arg(short, long)]
    pub config: Option<String>,

    /// Configuration document on disk (repeatable)
    #[arg(long)]
    pub file: Vec<String>,

    /// Configuration document over HTTP (repeatable)
    #[arg(long)]
    pub url: Vec<String>,

    /// Timeout for URL sources, in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Print listings as JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the dataset configurations of every source, or of one adaptor
    Datasets {
        #[arg(long)]
        adaptor: Option<String>,
    },

    /// Completer names of a configuration's filters or attributes
    Names {
        dataset: String,
        #[arg(long, default_value = "default")]
        internal_name: String,
        #[arg(long)]
        attributes: bool,
    },

    /// Resolve a filter name, compound names included
    Resolve {
        dataset: String,
        name: String,
        #[arg(long, default_value = "default")]
        internal_name: String,
    },

    /// Find the filter or attribute serving a field and table constraint
    Support {
        dataset: String,
        field: String,
        table_constraint: String,
        #[arg(long, default_value = "default")]
        internal_name: String,
        #[arg(long)]
        attributes: bool,
    },

    /// Completer values and legal qualifiers of a filter
    Values {
        dataset: String,
        name: String,
        #[arg(long, default_value = "default")]
        internal_name: String,
    },

    /// Write a loaded configuration back out as XML
    Dump {
        dataset: String,
        #[arg(long, default_value = "default")]
        internal_name: String,
    },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// The sources file when one is given, otherwise one adaptor per
    /// `--file` and `--url`.
    pub fn build_adaptor(&self) -> Result<CompositeConfigAdaptor> {
        if let Some(path) = &self.config {
            let sources = SourcesConfig::from_file(path)?;
            return sources.build_adaptor();
        }

        let mut composite = CompositeConfigAdaptor::new("mart-config");
        for (index, path) in self.file.iter().enumerate() {
            composite.add(Box::new(FileConfigAdaptor::from_path(
                format!("file{}", index + 1),
                path,
            )));
        }
        for (index, location) in self.url.iter().enumerate() {
            let url = validate_url("url", location)?;
            let timeout = self.timeout.map(std::time::Duration::from_secs);
            composite.add(Box::new(UrlConfigAdaptor::from_url(
                format!("url{}", index + 1),
                url,
                timeout,
            )));
        }
        Ok(composite)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.config.is_none() && self.file.is_empty() && self.url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sources".to_string(),
                value: String::new(),
                reason: "give --config, --file or --url".to_string(),
            });
        }
        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }
        for path in &self.file {
            validate_path("file", path)?;
        }
        for location in &self.url {
            validate_url("url", location)?;
        }
        if let Some(timeout) = self.timeout {
            crate::utils::validation::validate_positive_number("timeout", timeout, 1)?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_resolve() {
        let config = CliConfig::parse_from([
            "mart-config",
            "--file",
            "gene.xml",
            "resolve",
            "hsapiens_gene",
            "opt1.D2",
        ]);
        assert_eq!(config.file, vec!["gene.xml".to_string()]);
        assert!(config.validate().is_ok());
        match config.command {
            Command::Resolve {
                dataset,
                name,
                internal_name,
            } => {
                assert_eq!(dataset, "hsapiens_gene");
                assert_eq!(name, "opt1.D2");
                assert_eq!(internal_name, "default");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_datasets_of_one_adaptor() {
        let config = CliConfig::parse_from([
            "mart-config",
            "--file",
            "gene.xml",
            "datasets",
            "--adaptor",
            "file1",
        ]);
        match config.command {
            Command::Datasets { adaptor } => assert_eq!(adaptor.as_deref(), Some("file1")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_requires_a_source() {
        let config = CliConfig::parse_from(["mart-config", "datasets"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_rejects_bad_url() {
        let config = CliConfig::parse_from(["mart-config", "--url", "not a url", "datasets"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_build_adaptor_from_flags() {
        let config = CliConfig::parse_from([
            "mart-config",
            "--file",
            "a.xml",
            "--file",
            "b.xml",
            "--url",
            "https://mart.example.org/c.xml",
            "datasets",
        ]);
        let adaptor = config.build_adaptor().unwrap();
        assert_eq!(adaptor.len(), 3);
    }
}
