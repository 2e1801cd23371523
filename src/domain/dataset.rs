use crate::core::{CachedLookup, CompoundName, Named, OrderedNamedContainer};
use crate::domain::attribute::{AttributeCollection, AttributeDescription, AttributeGroup, AttributePage};
use crate::domain::filter::{DefaultFilter, FilterDescription, FilterOption};
use crate::domain::filter_page::{locate_filter, FilterCollection, FilterGroup, FilterPage};
use crate::domain::named::NamedEntity;
use crate::domain::store::{keys, store_accessors, AttributeValueStore};
use crate::utils::error::{ConfigError, Result};
use sha2::{Digest, Sha256};
use std::hash::{Hash, Hasher};

const DATASET_CONFIG_REQUIRED: &[&str] = &[keys::DATASET];

const DATASET_CONFIG_SCHEMA: &[&str] = &[
    keys::DATASET,
    keys::TYPE,
    keys::VISIBLE,
    keys::VERSION,
    keys::MODIFIED,
];

/// Empty root attribute store of a dataset configuration.
pub(crate) fn dataset_attributes() -> AttributeValueStore {
    AttributeValueStore::new(DATASET_CONFIG_SCHEMA).with_required(DATASET_CONFIG_REQUIRED)
}

/// Lowercase hex SHA-256 of a configuration document.
pub fn message_digest(document: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document);
    format!("{:x}", hasher.finalize())
}

/// Root attributes of a configuration document, enough to list and route a
/// dataset configuration without building its pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetHeader {
    pub named: NamedEntity,
    pub attributes: AttributeValueStore,
    pub digest: String,
}

impl DatasetHeader {
    pub fn internal_name(&self) -> &str {
        self.named.internal_name()
    }

    pub fn dataset(&self) -> &str {
        self.attributes.get(keys::DATASET).unwrap_or_default()
    }
}

/// Everything known about one dataset: its attribute pages, filter pages and
/// the tables behind them.
///
/// Configurations handed out by an adaptor listing start as stubs carrying
/// only the root attributes; `ConfigAdaptor::lazy_load` fills the pages in.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    named: NamedEntity,
    attributes: AttributeValueStore,
    options: OrderedNamedContainer<FilterOption>,
    default_filters: Vec<DefaultFilter>,
    main_tables: Vec<String>,
    primary_keys: Vec<String>,
    attribute_pages: OrderedNamedContainer<AttributePage>,
    filter_pages: OrderedNamedContainer<FilterPage>,
    filter_cache: CachedLookup<String>,
    attribute_cache: CachedLookup<String>,
    adaptor_name: Option<String>,
    message_digest: Option<String>,
    loaded: bool,
}

impl DatasetConfig {
    pub fn new(internal_name: impl Into<String>, dataset: impl Into<String>) -> Result<Self> {
        Self::from_entity(NamedEntity::new(internal_name)?, dataset)
    }

    pub fn from_entity(named: NamedEntity, dataset: impl Into<String>) -> Result<Self> {
        let dataset = dataset.into();
        if dataset.trim().is_empty() {
            return Err(ConfigError::missing("DatasetConfig", keys::DATASET));
        }
        let mut attributes = dataset_attributes();
        attributes.set(keys::DATASET, dataset)?;
        Ok(Self::with_store(named, attributes, true))
    }

    /// Unloaded configuration carrying only the header's root attributes.
    pub fn from_header(header: &DatasetHeader, adaptor_name: &str) -> Self {
        let mut config = Self::with_store(header.named.clone(), header.attributes.clone(), false);
        config.adaptor_name = Some(adaptor_name.to_string());
        config.message_digest = Some(header.digest.clone());
        config
    }

    fn with_store(named: NamedEntity, attributes: AttributeValueStore, loaded: bool) -> Self {
        Self {
            named,
            attributes,
            options: OrderedNamedContainer::new(),
            default_filters: Vec::new(),
            main_tables: Vec::new(),
            primary_keys: Vec::new(),
            attribute_pages: OrderedNamedContainer::new(),
            filter_pages: OrderedNamedContainer::new(),
            filter_cache: CachedLookup::new(),
            attribute_cache: CachedLookup::new(),
            adaptor_name: None,
            message_digest: None,
            loaded,
        }
    }

    pub fn named(&self) -> &NamedEntity {
        &self.named
    }

    pub fn display_name(&self) -> &str {
        self.named.display_name()
    }

    pub fn description(&self) -> &str {
        self.named.description()
    }

    pub fn attributes(&self) -> &AttributeValueStore {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeValueStore {
        &mut self.attributes
    }

    /// Always set; construction rejects a missing dataset.
    pub fn dataset(&self) -> &str {
        self.attributes.get(keys::DATASET).unwrap_or_default()
    }

    store_accessors! {
        dataset_type, set_dataset_type => keys::TYPE;
        version, set_version => keys::VERSION;
        modified, set_modified => keys::MODIFIED;
    }

    /// Visible unless explicitly marked otherwise.
    pub fn is_visible(&self) -> bool {
        self.attributes
            .get_non_empty(keys::VISIBLE)
            .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn adaptor_name(&self) -> Option<&str> {
        self.adaptor_name.as_deref()
    }

    pub fn set_adaptor_name(&mut self, adaptor_name: impl Into<String>) {
        self.adaptor_name = Some(adaptor_name.into());
    }

    pub fn message_digest(&self) -> Option<&str> {
        self.message_digest.as_deref()
    }

    pub fn set_message_digest(&mut self, digest: impl Into<String>) {
        self.message_digest = Some(digest.into());
    }

    /// Take over the content of a fully parsed copy of this configuration.
    /// The adaptor back-reference is kept.
    pub fn absorb(&mut self, full: DatasetConfig) -> Result<()> {
        if full.internal_name() != self.internal_name() {
            return Err(ConfigError::InvalidValue {
                field: keys::INTERNAL_NAME.to_string(),
                value: full.internal_name().to_string(),
                reason: format!("expected configuration '{}'", self.internal_name()),
            });
        }

        let adaptor_name = self.adaptor_name.take().or(full.adaptor_name.clone());
        let digest = full.message_digest.clone().or(self.message_digest.take());
        *self = full;
        self.adaptor_name = adaptor_name;
        self.message_digest = digest;
        self.loaded = true;
        tracing::debug!(
            "loaded '{}' ({} attribute pages, {} filter pages)",
            self.internal_name(),
            self.attribute_pages.len(),
            self.filter_pages.len()
        );
        Ok(())
    }

    pub fn add_option(&mut self, option: FilterOption) {
        self.options.add(option);
    }

    pub fn options(&self) -> impl Iterator<Item = &FilterOption> + '_ {
        self.options.iter()
    }

    pub fn add_default_filter(&mut self, default_filter: DefaultFilter) {
        self.default_filters.push(default_filter);
    }

    pub fn default_filters(&self) -> &[DefaultFilter] {
        &self.default_filters
    }

    pub fn add_main_table(&mut self, table: impl Into<String>) {
        self.main_tables.push(table.into());
    }

    pub fn main_tables(&self) -> &[String] {
        &self.main_tables
    }

    pub fn contains_main_table(&self, table: &str) -> bool {
        self.main_tables.iter().any(|t| t == table)
    }

    pub fn add_primary_key(&mut self, key: impl Into<String>) {
        self.primary_keys.push(key.into());
    }

    pub fn primary_keys(&self) -> &[String] {
        &self.primary_keys
    }

    pub fn add_attribute_page(&mut self, page: AttributePage) {
        self.attribute_pages.add(page);
    }

    pub fn remove_attribute_page(&mut self, name: &str) -> Option<AttributePage> {
        self.attribute_pages.remove(name)
    }

    pub fn attribute_pages(&self) -> impl Iterator<Item = &AttributePage> + '_ {
        self.attribute_pages.iter()
    }

    pub fn attribute_page(&self, name: &str) -> Option<&AttributePage> {
        self.attribute_pages.get(name)
    }

    pub fn add_filter_page(&mut self, page: FilterPage) {
        self.filter_pages.add(page);
    }

    pub fn remove_filter_page(&mut self, name: &str) -> Option<FilterPage> {
        self.filter_pages.remove(name)
    }

    pub fn filter_pages(&self) -> impl Iterator<Item = &FilterPage> + '_ {
        self.filter_pages.iter()
    }

    pub fn filter_page(&self, name: &str) -> Option<&FilterPage> {
        self.filter_pages.get(name)
    }

    /// First filter page, in insertion order, answering `name`. For `x.y`, a
    /// filter named `y` anywhere in the dataset beats options pushing `y`.
    pub fn page_for_filter(&self, name: &str) -> Option<&FilterPage> {
        if !self.loaded {
            tracing::debug!("'{}' is not loaded yet", self.internal_name());
        }
        self.filter_cache.lookup(
            name,
            &self.filter_pages,
            |p| p.contains_filter(name),
            |ps| locate_filter(ps, name),
        )
    }

    pub fn pages_for_filter(&self, name: &str) -> Vec<&FilterPage> {
        self.filter_pages
            .iter()
            .filter(|p| p.contains_filter(name))
            .collect()
    }

    pub fn group_for_filter(&self, name: &str) -> Option<&FilterGroup> {
        self.page_for_filter(name).and_then(|p| p.group_for(name))
    }

    pub fn collection_for_filter(&self, name: &str) -> Option<&FilterCollection> {
        self.page_for_filter(name)
            .and_then(|p| p.collection_for(name))
    }

    /// The filter description answering `name` anywhere in the dataset.
    pub fn resolve_filter(&self, name: &str) -> Option<&FilterDescription> {
        self.page_for_filter(name).and_then(|p| p.resolve(name))
    }

    pub fn contains_filter(&self, name: &str) -> bool {
        self.page_for_filter(name).is_some()
    }

    pub fn page_for_attribute(&self, name: &str) -> Option<&AttributePage> {
        if !self.loaded {
            tracing::debug!("'{}' is not loaded yet", self.internal_name());
        }
        self.attribute_cache.lookup(
            name,
            &self.attribute_pages,
            |p| p.contains_attribute(name),
            |ps| ps.find_rank(|p| p.contains_attribute(name)),
        )
    }

    pub fn pages_for_attribute(&self, name: &str) -> Vec<&AttributePage> {
        self.attribute_pages
            .iter()
            .filter(|p| p.contains_attribute(name))
            .collect()
    }

    pub fn group_for_attribute(&self, name: &str) -> Option<&AttributeGroup> {
        self.page_for_attribute(name)
            .and_then(|p| p.group_for(name))
    }

    pub fn collection_for_attribute(&self, name: &str) -> Option<&AttributeCollection> {
        self.page_for_attribute(name)
            .and_then(|p| p.collection_for(name))
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDescription> {
        self.page_for_attribute(name).and_then(|p| p.attribute(name))
    }

    pub fn contains_attribute(&self, name: &str) -> bool {
        self.page_for_attribute(name).is_some()
    }

    /// First filter, in page order, declaring the column.
    pub fn find_filter_support(&self, field: &str, table_constraint: &str) -> Option<&FilterDescription> {
        self.filter_pages
            .iter()
            .find_map(|p| p.find_support(field, table_constraint))
    }

    pub fn find_attribute_support(
        &self,
        field: &str,
        table_constraint: &str,
    ) -> Option<&AttributeDescription> {
        self.attribute_pages
            .iter()
            .find_map(|p| p.find_support(field, table_constraint))
    }

    pub fn all_filter_descriptions(&self) -> Vec<&FilterDescription> {
        self.filter_pages
            .iter()
            .flat_map(|p| p.all_filter_descriptions())
            .collect()
    }

    pub fn all_attribute_descriptions(&self) -> Vec<&AttributeDescription> {
        self.attribute_pages
            .iter()
            .flat_map(|p| p.all_attribute_descriptions())
            .collect()
    }

    pub fn filter_completer_names(&self) -> Vec<String> {
        dedup(self.filter_pages.iter().flat_map(|p| p.completer_names()))
    }

    pub fn attribute_completer_names(&self) -> Vec<String> {
        dedup(self.attribute_pages.iter().flat_map(|p| p.completer_names()))
    }

    /// Values for a filter or `option.pushed` name; empty when unknown.
    pub fn filter_completer_values(&self, name: &str) -> Vec<String> {
        let owner = match CompoundName::parse(name) {
            CompoundName::Qualified { outer, .. } => outer,
            _ => name,
        };
        self.resolve_filter(owner)
            .map(|f| f.completer_values(name))
            .unwrap_or_default()
    }

    /// Qualifiers for a filter or `option.pushed` name. When the pushed part
    /// names a filter of its own, that filter's qualifiers win.
    pub fn filter_completer_qualifiers(&self, name: &str) -> Vec<String> {
        match CompoundName::parse(name) {
            CompoundName::Qualified { outer, inner } => {
                if let Some(target) = self
                    .resolve_filter(inner)
                    .filter(|f| f.internal_name() == inner)
                {
                    return target.completer_qualifiers(inner);
                }
                self.resolve_filter(outer)
                    .map(|f| f.completer_qualifiers(name))
                    .unwrap_or_default()
            }
            _ => self
                .resolve_filter(name)
                .map(|f| f.completer_qualifiers(name))
                .unwrap_or_default(),
        }
    }

    /// Every push action must point at a filter of this dataset.
    pub fn validate_push_actions(&self) -> Result<()> {
        for filter in self.all_filter_descriptions() {
            for reference in filter.push_action_references() {
                if !self.contains_filter(reference) {
                    return Err(ConfigError::InvalidValue {
                        field: keys::REF.to_string(),
                        value: reference.to_string(),
                        reason: format!(
                            "push action in '{}' refers to a filter missing from dataset '{}'",
                            filter.internal_name(),
                            self.internal_name()
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

fn dedup<I: IntoIterator<Item = String>>(names: I) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for name in names {
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}

impl Named for DatasetConfig {
    fn internal_name(&self) -> &str {
        self.named.internal_name()
    }
}

// Equality covers content only: load state, adaptor and digest are
// provenance.
impl PartialEq for DatasetConfig {
    fn eq(&self, other: &Self) -> bool {
        self.named == other.named
            && self.attributes == other.attributes
            && self.options == other.options
            && self.default_filters == other.default_filters
            && self.main_tables == other.main_tables
            && self.primary_keys == other.primary_keys
            && self.attribute_pages == other.attribute_pages
            && self.filter_pages == other.filter_pages
    }
}

impl Eq for DatasetConfig {}

impl Hash for DatasetConfig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.named.hash(state);
        self.attributes.hash(state);
        self.options.hash(state);
        self.default_filters.hash(state);
        self.main_tables.hash(state);
        self.primary_keys.hash(state);
        self.attribute_pages.hash(state);
        self.filter_pages.hash(state);
    }
}
