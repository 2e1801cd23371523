// Adapters layer: concrete configuration sources and the XML codec they share.

pub mod composite;
pub mod document;
pub mod file;
pub mod url;
pub mod xml;

pub use composite::CompositeConfigAdaptor;
pub use document::{ConfigDocument, DocumentAdaptor};
pub use file::{FileConfigAdaptor, FileSource};
pub use url::{UrlConfigAdaptor, UrlSource};
pub use xml::{parse_dataset_config, parse_header, write_dataset_config};
