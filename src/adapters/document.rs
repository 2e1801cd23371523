use crate::adapters::xml;
use crate::domain::dataset::{DatasetConfig, DatasetHeader};
use crate::domain::ports::{ConfigAdaptor, DocumentSource};
use crate::utils::error::{ConfigError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A fetched configuration document: its root header and the raw text the
/// pages are built from on demand.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    header: DatasetHeader,
    xml: Arc<str>,
}

impl ConfigDocument {
    pub fn parse(text: impl Into<Arc<str>>) -> Result<Self> {
        let text = text.into();
        let header = xml::parse_header(&text)?;
        Ok(Self { header, xml: text })
    }

    pub fn header(&self) -> &DatasetHeader {
        &self.header
    }

    pub fn digest(&self) -> &str {
        &self.header.digest
    }

    pub fn text(&self) -> &str {
        &self.xml
    }

    pub fn describes(&self, config: &DatasetConfig) -> bool {
        self.header.internal_name() == config.named().internal_name()
            && self.header.dataset() == config.dataset()
    }

    /// Parse the full document into `config`, checking push action targets.
    pub fn load_into(&self, config: &mut DatasetConfig) -> Result<()> {
        let full = xml::parse_dataset_config(&self.xml)?;
        full.validate_push_actions()?;
        config.absorb(full)
    }
}

/// Adaptor serving the single document found at a source.
///
/// The document is fetched on first use and kept until `update` fetches it
/// again.
pub struct DocumentAdaptor<S: DocumentSource> {
    name: String,
    source: S,
    current: RwLock<Option<ConfigDocument>>,
}

impl<S: DocumentSource> DocumentAdaptor<S> {
    pub fn new(name: impl Into<String>, source: S) -> Self {
        Self {
            name: name.into(),
            source,
            current: RwLock::new(None),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    async fn document(&self) -> Result<ConfigDocument> {
        let cached = self.current.read().await.clone();
        match cached {
            Some(document) => Ok(document),
            None => self.refresh().await,
        }
    }

    async fn refresh(&self) -> Result<ConfigDocument> {
        tracing::debug!("{}: fetching {}", self.name, self.source.location());
        let text = self.source.fetch().await?;
        let document = ConfigDocument::parse(text)?;

        let mut current = self.current.write().await;
        match current.as_ref() {
            Some(previous) if previous.digest() != document.digest() => {
                tracing::info!(
                    "{}: {} changed ({} -> {})",
                    self.name,
                    self.source.location(),
                    previous.digest(),
                    document.digest()
                );
            }
            Some(_) => tracing::debug!("{}: {} unchanged", self.name, self.source.location()),
            None => tracing::info!(
                "{}: loaded '{}' from {}",
                self.name,
                document.header().internal_name(),
                self.source.location()
            ),
        }
        *current = Some(document.clone());
        Ok(document)
    }
}

#[async_trait]
impl<S: DocumentSource> ConfigAdaptor for DocumentAdaptor<S> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn dataset_configs(&self) -> Result<Vec<DatasetConfig>> {
        let document = self.document().await?;
        Ok(vec![DatasetConfig::from_header(document.header(), &self.name)])
    }

    async fn update(&self) -> Result<()> {
        self.refresh().await.map(|_| ())
    }

    async fn lazy_load(&self, config: &mut DatasetConfig) -> Result<()> {
        if config.is_loaded() {
            return Ok(());
        }

        let document = self.document().await?;
        if !document.describes(config) {
            return Err(ConfigError::NotFound {
                kind: "dataset configuration".to_string(),
                name: format!(
                    "{}/{} in {}",
                    config.dataset(),
                    config.named().internal_name(),
                    self.source.location()
                ),
            });
        }
        document.load_into(config)
    }
}
