use crate::adapters::document::DocumentAdaptor;
use crate::domain::ports::DocumentSource;
use crate::utils::error::{ConfigError, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// A configuration document served over HTTP(S).
#[derive(Debug, Clone)]
pub struct UrlSource {
    url: Url,
    client: Client,
    timeout: Option<Duration>,
}

impl UrlSource {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            client: Client::new(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl DocumentSource for UrlSource {
    fn location(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<String> {
        let mut request = self.client.get(self.url.clone());
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        tracing::debug!("GET {} -> {}", self.url, response.status());
        if !response.status().is_success() {
            return Err(ConfigError::adaptor(
                self.url.as_str(),
                format!("request failed with status: {}", response.status()),
            ));
        }
        Ok(response.text().await?)
    }
}

pub type UrlConfigAdaptor = DocumentAdaptor<UrlSource>;

impl UrlConfigAdaptor {
    pub fn from_url(name: impl Into<String>, url: Url, timeout: Option<Duration>) -> Self {
        let source = match timeout {
            Some(timeout) => UrlSource::new(url).with_timeout(timeout),
            None => UrlSource::new(url),
        };
        DocumentAdaptor::new(name, source)
    }
}
