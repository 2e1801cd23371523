// Domain layer: the configuration object model and the adaptor port.

pub mod attribute;
pub mod dataset;
pub mod dynamic;
pub mod filter;
pub mod filter_page;
pub mod named;
pub mod ports;
pub mod store;

pub use attribute::{
    AttributeCollection, AttributeDescription, AttributeGroup, AttributeGroupKind, AttributePage,
    DsAttributeGroup,
};
pub use dataset::{message_digest, DatasetConfig, DatasetHeader};
pub use dynamic::{DynamicAttributeContent, DynamicFilterContent};
pub use filter::{
    DefaultFilter, Disable, Enable, FilterDescription, FilterOption, FilterTarget, FilterToggle,
    PushAction,
};
pub use filter_page::{DsFilterGroup, FilterCollection, FilterGroup, FilterGroupKind, FilterPage};
pub use named::{InternalName, NamedEntity};
pub use ports::{ConfigAdaptor, DocumentSource};
pub use store::{keys, AttributeValueStore};
