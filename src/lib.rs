pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{CompositeConfigAdaptor, FileConfigAdaptor, UrlConfigAdaptor};
pub use config::SourcesConfig;
pub use domain::{ConfigAdaptor, DatasetConfig};
pub use utils::error::{ConfigError, Result};
