use crate::domain::dataset::DatasetConfig;
use crate::utils::error::{ConfigError, Result};
use async_trait::async_trait;

/// A source of dataset configurations.
///
/// Listings hand out unloaded stubs; `lazy_load` fills one in from the
/// adaptor's document on demand.
#[async_trait]
pub trait ConfigAdaptor: Send + Sync {
    fn name(&self) -> &str;

    fn display_name(&self) -> &str {
        self.name()
    }

    async fn dataset_configs(&self) -> Result<Vec<DatasetConfig>>;

    async fn dataset_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();
        for config in self.dataset_configs().await? {
            let dataset = config.dataset().to_string();
            if !names.contains(&dataset) {
                names.push(dataset);
            }
        }
        Ok(names)
    }

    async fn supports_dataset(&self, dataset: &str) -> Result<bool> {
        Ok(self.dataset_names().await?.iter().any(|d| d == dataset))
    }

    /// Unloaded configuration `internal_name` of `dataset`, if this adaptor
    /// has one.
    async fn dataset_config(
        &self,
        dataset: &str,
        internal_name: &str,
    ) -> Result<Option<DatasetConfig>> {
        Ok(self
            .dataset_configs()
            .await?
            .into_iter()
            .find(|c| c.dataset() == dataset && c.named().internal_name() == internal_name))
    }

    async fn dataset_configs_by_dataset(&self, dataset: &str) -> Result<Vec<DatasetConfig>> {
        Ok(self
            .dataset_configs()
            .await?
            .into_iter()
            .filter(|c| c.dataset() == dataset)
            .collect())
    }

    async fn internal_names_by_dataset(&self, dataset: &str) -> Result<Vec<String>> {
        Ok(self
            .dataset_configs_by_dataset(dataset)
            .await?
            .iter()
            .map(|c| c.named().internal_name().to_string())
            .collect())
    }

    async fn display_names_by_dataset(&self, dataset: &str) -> Result<Vec<String>> {
        Ok(self
            .dataset_configs_by_dataset(dataset)
            .await?
            .iter()
            .map(|c| c.display_name().to_string())
            .collect())
    }

    async fn dataset_config_by_display_name(
        &self,
        dataset: &str,
        display_name: &str,
    ) -> Result<Option<DatasetConfig>> {
        Ok(self
            .dataset_configs_by_dataset(dataset)
            .await?
            .into_iter()
            .find(|c| c.display_name() == display_name))
    }

    /// Datasets served by the adaptor called `adaptor_name`, this one or any
    /// nested below it; empty when there is no such adaptor.
    async fn dataset_names_by_adaptor(&self, adaptor_name: &str) -> Result<Vec<String>> {
        if adaptor_name == self.name() {
            return self.dataset_names().await;
        }
        match self.adaptor_by_name(adaptor_name) {
            Some(adaptor) => adaptor.dataset_names().await,
            None => Ok(Vec::new()),
        }
    }

    /// Direct children. Only composites have any.
    fn adaptors(&self) -> Vec<&dyn ConfigAdaptor> {
        Vec::new()
    }

    fn adaptor_names(&self) -> Vec<String> {
        self.adaptors().iter().map(|a| a.name().to_string()).collect()
    }

    /// Whether an adaptor called `name` sits anywhere below this one.
    fn supports_adaptor(&self, name: &str) -> bool {
        self.adaptors()
            .iter()
            .any(|a| a.name() == name || a.supports_adaptor(name))
    }

    fn adaptor_by_name(&self, name: &str) -> Option<&dyn ConfigAdaptor> {
        self.adaptors().into_iter().find_map(|a| {
            if a.name() == name {
                Some(a)
            } else {
                a.adaptor_by_name(name)
            }
        })
    }

    /// Re-read the underlying documents.
    async fn update(&self) -> Result<()>;

    /// Fill in the pages of a stub produced by this adaptor.
    async fn lazy_load(&self, config: &mut DatasetConfig) -> Result<()>;

    async fn load_dataset_config(&self, dataset: &str, internal_name: &str) -> Result<DatasetConfig> {
        let mut config = self
            .dataset_config(dataset, internal_name)
            .await?
            .ok_or_else(|| ConfigError::NotFound {
                kind: "dataset configuration".to_string(),
                name: format!("{}/{}", dataset, internal_name),
            })?;
        if !config.is_loaded() {
            self.lazy_load(&mut config).await?;
        }
        Ok(config)
    }
}

/// Where a single configuration document comes from.
pub trait DocumentSource: Send + Sync {
    /// Human-readable location, for logs and errors.
    fn location(&self) -> String;

    fn fetch(&self) -> impl std::future::Future<Output = Result<String>> + Send;
}
