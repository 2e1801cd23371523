//! Per-dataset overrides attached to descriptions that are shared between
//! several datasets. Each content object is named after the dataset it applies
//! to.

use crate::core::Named;
use crate::domain::named::NamedEntity;
use crate::domain::store::{keys, store_accessors, AttributeValueStore};
use crate::utils::error::Result;

const DYNAMIC_ATTRIBUTE_SCHEMA: &[&str] = &[
    keys::LINKOUT_URL,
    keys::POINTER_DATASET,
    keys::POINTER_INTERFACE,
    keys::POINTER_ATTRIBUTE,
    keys::POINTER_FILTER,
];

const DYNAMIC_FILTER_SCHEMA: &[&str] = &[
    keys::OTHER_FILTERS,
    keys::POINTER_DATASET,
    keys::POINTER_INTERFACE,
    keys::POINTER_FILTER,
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynamicAttributeContent {
    named: NamedEntity,
    attributes: AttributeValueStore,
}

impl DynamicAttributeContent {
    pub fn new(internal_name: impl Into<String>) -> Result<Self> {
        Ok(Self::from_entity(NamedEntity::new(internal_name)?))
    }

    pub fn from_entity(named: NamedEntity) -> Self {
        Self {
            named,
            attributes: AttributeValueStore::new(DYNAMIC_ATTRIBUTE_SCHEMA),
        }
    }

    pub fn named(&self) -> &NamedEntity {
        &self.named
    }

    pub fn attributes(&self) -> &AttributeValueStore {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeValueStore {
        &mut self.attributes
    }

    store_accessors! {
        linkout_url, set_linkout_url => keys::LINKOUT_URL;
        pointer_dataset, set_pointer_dataset => keys::POINTER_DATASET;
        pointer_interface, set_pointer_interface => keys::POINTER_INTERFACE;
        pointer_attribute, set_pointer_attribute => keys::POINTER_ATTRIBUTE;
        pointer_filter, set_pointer_filter => keys::POINTER_FILTER;
    }

    /// Whether this content points at an attribute of another dataset.
    pub fn is_pointer(&self) -> bool {
        self.attributes.get_non_empty(keys::POINTER_DATASET).is_some()
    }
}

impl Named for DynamicAttributeContent {
    fn internal_name(&self) -> &str {
        self.named.internal_name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynamicFilterContent {
    named: NamedEntity,
    attributes: AttributeValueStore,
}

impl DynamicFilterContent {
    pub fn new(internal_name: impl Into<String>) -> Result<Self> {
        Ok(Self::from_entity(NamedEntity::new(internal_name)?))
    }

    pub fn from_entity(named: NamedEntity) -> Self {
        Self {
            named,
            attributes: AttributeValueStore::new(DYNAMIC_FILTER_SCHEMA),
        }
    }

    pub fn named(&self) -> &NamedEntity {
        &self.named
    }

    pub fn attributes(&self) -> &AttributeValueStore {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeValueStore {
        &mut self.attributes
    }

    store_accessors! {
        other_filters, set_other_filters => keys::OTHER_FILTERS;
        pointer_dataset, set_pointer_dataset => keys::POINTER_DATASET;
        pointer_interface, set_pointer_interface => keys::POINTER_INTERFACE;
        pointer_filter, set_pointer_filter => keys::POINTER_FILTER;
    }

    /// `otherFilters` is a comma separated list of `dataset.filter` references.
    pub fn other_filter_list(&self) -> Vec<&str> {
        self.attributes
            .get_non_empty(keys::OTHER_FILTERS)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Named for DynamicFilterContent {
    fn internal_name(&self) -> &str {
        self.named.internal_name()
    }
}
