use crate::domain::dataset::DatasetConfig;
use crate::domain::ports::ConfigAdaptor;
use crate::utils::error::{ConfigError, Result};
use async_trait::async_trait;

/// Ordered set of adaptors presented as one.
///
/// Listings concatenate the children in order. A stub is loaded by the child
/// that produced it or holds the adaptor that did, or else by the first child
/// supporting its dataset.
pub struct CompositeConfigAdaptor {
    name: String,
    adaptors: Vec<Box<dyn ConfigAdaptor>>,
}

impl CompositeConfigAdaptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            adaptors: Vec::new(),
        }
    }

    pub fn add(&mut self, adaptor: Box<dyn ConfigAdaptor>) {
        self.adaptors.push(adaptor);
    }

    pub fn with_adaptor(mut self, adaptor: impl ConfigAdaptor + 'static) -> Self {
        self.add(Box::new(adaptor));
        self
    }

    pub fn len(&self) -> usize {
        self.adaptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adaptors.is_empty()
    }

    async fn adaptor_for(&self, owner: Option<&str>, dataset: &str) -> Result<&dyn ConfigAdaptor> {
        if let Some(owner) = owner {
            if let Some(adaptor) = self
                .adaptors
                .iter()
                .find(|a| a.name() == owner || a.supports_adaptor(owner))
            {
                return Ok(adaptor.as_ref());
            }
        }

        for adaptor in &self.adaptors {
            if adaptor.supports_dataset(dataset).await? {
                return Ok(adaptor.as_ref());
            }
        }
        Err(ConfigError::adaptor(
            &self.name,
            format!("no adaptor supports dataset '{}'", dataset),
        ))
    }
}

#[async_trait]
impl ConfigAdaptor for CompositeConfigAdaptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn adaptors(&self) -> Vec<&dyn ConfigAdaptor> {
        self.adaptors.iter().map(|a| a.as_ref()).collect()
    }

    async fn dataset_configs(&self) -> Result<Vec<DatasetConfig>> {
        let mut configs = Vec::new();
        for adaptor in &self.adaptors {
            configs.extend(adaptor.dataset_configs().await?);
        }
        Ok(configs)
    }

    async fn update(&self) -> Result<()> {
        for adaptor in &self.adaptors {
            adaptor.update().await?;
        }
        Ok(())
    }

    async fn lazy_load(&self, config: &mut DatasetConfig) -> Result<()> {
        if config.is_loaded() {
            return Ok(());
        }
        // DatasetConfig is not Sync, so no borrow of it may live across an await
        let owner = config.adaptor_name().map(str::to_string);
        let dataset = config.dataset().to_string();
        let adaptor = self.adaptor_for(owner.as_deref(), &dataset).await?;
        tracing::debug!(
            "{}: loading '{}' through {}",
            self.name,
            config.named().internal_name(),
            adaptor.name()
        );
        adaptor.lazy_load(config).await
    }
}
