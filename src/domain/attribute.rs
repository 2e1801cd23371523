use crate::core::{
    field_matches, find_support, CachedLookup, FieldRef, Named, OrderedNamedContainer, Supports,
};
use crate::domain::dynamic::DynamicAttributeContent;
use crate::domain::named::NamedEntity;
use crate::domain::store::{keys, store_accessors, AttributeValueStore};
use crate::utils::error::{ConfigError, Result};

/// Used when `maxLength` is unset or not a number.
pub const DEFAULT_MAX_LENGTH: u32 = 10;
/// Used when `maxSelect` is unset or not a number; zero means unbounded.
pub const DEFAULT_MAX_SELECT: u32 = 0;

const ATTRIBUTE_DESCRIPTION_SCHEMA: &[&str] = &[
    keys::FIELD,
    keys::TABLE_CONSTRAINT,
    keys::KEY,
    keys::MAX_LENGTH,
    keys::SOURCE,
    keys::HOMEPAGE_URL,
    keys::LINKOUT_URL,
    keys::HIDDEN,
];

const ATTRIBUTE_DESCRIPTION_REQUIRED: &[&str] = &[keys::FIELD];

const ATTRIBUTE_COLLECTION_SCHEMA: &[&str] = &[keys::MAX_SELECT, keys::HIDDEN];

const ATTRIBUTE_GROUP_SCHEMA: &[&str] = &[keys::HIDDEN];

const DS_ATTRIBUTE_GROUP_SCHEMA: &[&str] = &[keys::HANDLER, keys::HIDDEN];

const ATTRIBUTE_PAGE_SCHEMA: &[&str] = &[keys::OUT_FORMATS, keys::HIDDEN];

/// One selectable output column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeDescription {
    named: NamedEntity,
    attributes: AttributeValueStore,
    dynamic_contents: Vec<DynamicAttributeContent>,
}

impl AttributeDescription {
    pub fn new(internal_name: impl Into<String>, field: impl Into<String>) -> Result<Self> {
        Self::from_entity(NamedEntity::new(internal_name)?, field)
    }

    pub fn from_entity(named: NamedEntity, field: impl Into<String>) -> Result<Self> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(ConfigError::missing("AttributeDescription", keys::FIELD));
        }
        let mut attributes = AttributeValueStore::new(ATTRIBUTE_DESCRIPTION_SCHEMA)
            .with_required(ATTRIBUTE_DESCRIPTION_REQUIRED);
        attributes.set(keys::FIELD, field)?;
        Ok(Self {
            named,
            attributes,
            dynamic_contents: Vec::new(),
        })
    }

    pub fn with_table_constraint(mut self, table_constraint: impl Into<String>) -> Self {
        self.set_table_constraint(table_constraint);
        self
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

    /// Always set; construction rejects a missing field.
    pub fn field(&self) -> &str {
        self.attributes.get(keys::FIELD).unwrap_or_default()
    }

    store_accessors! {
        table_constraint, set_table_constraint => keys::TABLE_CONSTRAINT;
        key, set_key => keys::KEY;
        source, set_source => keys::SOURCE;
        homepage_url, set_homepage_url => keys::HOMEPAGE_URL;
        linkout_url, set_linkout_url => keys::LINKOUT_URL;
    }

    pub fn max_length(&self) -> u32 {
        self.attributes.parse_or(keys::MAX_LENGTH, DEFAULT_MAX_LENGTH)
    }

    pub fn set_max_length(&mut self, max_length: u32) {
        self.attributes.set_optional(keys::MAX_LENGTH, max_length.to_string());
    }

    pub fn is_hidden(&self) -> bool {
        self.attributes.flag(keys::HIDDEN)
    }

    pub fn add_dynamic_content(&mut self, content: DynamicAttributeContent) {
        self.dynamic_contents.push(content);
    }

    pub fn dynamic_contents(&self) -> &[DynamicAttributeContent] {
        &self.dynamic_contents
    }

    pub fn dynamic_content_for(&self, dataset: &str) -> Option<&DynamicAttributeContent> {
        self.dynamic_contents
            .iter()
            .find(|c| c.internal_name() == dataset)
    }
}

impl Named for AttributeDescription {
    fn internal_name(&self) -> &str {
        self.named.internal_name()
    }
}

impl Supports for AttributeDescription {
    fn supports(&self, field: &str, table_constraint: &str) -> bool {
        field_matches(
            Some(self.field()),
            self.table_constraint(),
            field,
            table_constraint,
        )
    }
}

/// Attributes that are selected together, bounded by `maxSelect`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeCollection {
    named: NamedEntity,
    attributes: AttributeValueStore,
    descriptions: OrderedNamedContainer<AttributeDescription>,
    support_cache: CachedLookup<FieldRef>,
}

impl AttributeCollection {
    pub fn new(internal_name: impl Into<String>) -> Result<Self> {
        Ok(Self::from_entity(NamedEntity::new(internal_name)?))
    }

    pub fn from_entity(named: NamedEntity) -> Self {
        Self {
            named,
            attributes: AttributeValueStore::new(ATTRIBUTE_COLLECTION_SCHEMA),
            descriptions: OrderedNamedContainer::new(),
            support_cache: CachedLookup::new(),
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

    pub fn max_select(&self) -> u32 {
        self.attributes.parse_or(keys::MAX_SELECT, DEFAULT_MAX_SELECT)
    }

    pub fn set_max_select(&mut self, max_select: u32) {
        self.attributes.set_optional(keys::MAX_SELECT, max_select.to_string());
    }

    pub fn add_description(&mut self, description: AttributeDescription) {
        self.descriptions.add(description);
    }

    pub fn add_descriptions<I: IntoIterator<Item = AttributeDescription>>(&mut self, descriptions: I) {
        self.descriptions.add_all(descriptions);
    }

    pub fn remove_description(&mut self, name: &str) -> Option<AttributeDescription> {
        self.descriptions.remove(name)
    }

    pub fn descriptions(&self) -> impl Iterator<Item = &AttributeDescription> + '_ {
        self.descriptions.iter()
    }

    /// Detached copies, in insertion order.
    pub fn description_list(&self) -> Vec<AttributeDescription> {
        self.descriptions.to_vec()
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDescription> {
        self.descriptions.get(name)
    }

    pub fn contains_attribute(&self, name: &str) -> bool {
        self.descriptions.contains(name)
    }

    pub fn find_support(&self, field: &str, table_constraint: &str) -> Option<&AttributeDescription> {
        find_support(&self.descriptions, &self.support_cache, field, table_constraint)
    }

    pub fn completer_names(&self) -> Vec<String> {
        self.descriptions
            .iter()
            .map(|d| d.internal_name().to_string())
            .collect()
    }
}

impl Named for AttributeCollection {
    fn internal_name(&self) -> &str {
        self.named.internal_name()
    }
}

impl Supports for AttributeCollection {
    fn supports(&self, field: &str, table_constraint: &str) -> bool {
        self.descriptions
            .iter()
            .any(|d| d.supports(field, table_constraint))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeGroup {
    named: NamedEntity,
    attributes: AttributeValueStore,
    collections: OrderedNamedContainer<AttributeCollection>,
    attribute_cache: CachedLookup<String>,
    support_cache: CachedLookup<FieldRef>,
}

impl AttributeGroup {
    pub fn new(internal_name: impl Into<String>) -> Result<Self> {
        Ok(Self::from_entity(NamedEntity::new(internal_name)?))
    }

    pub fn from_entity(named: NamedEntity) -> Self {
        Self {
            named,
            attributes: AttributeValueStore::new(ATTRIBUTE_GROUP_SCHEMA),
            collections: OrderedNamedContainer::new(),
            attribute_cache: CachedLookup::new(),
            support_cache: CachedLookup::new(),
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

    pub fn add_collection(&mut self, collection: AttributeCollection) {
        self.collections.add(collection);
    }

    pub fn remove_collection(&mut self, name: &str) -> Option<AttributeCollection> {
        self.collections.remove(name)
    }

    pub fn collections(&self) -> impl Iterator<Item = &AttributeCollection> + '_ {
        self.collections.iter()
    }

    pub fn collection(&self, name: &str) -> Option<&AttributeCollection> {
        self.collections.get(name)
    }

    /// Collection holding the attribute named `name`.
    pub fn collection_for(&self, name: &str) -> Option<&AttributeCollection> {
        self.attribute_cache.lookup(
            name,
            &self.collections,
            |c| c.contains_attribute(name),
            |cs| cs.find_rank(|c| c.contains_attribute(name)),
        )
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDescription> {
        self.collection_for(name).and_then(|c| c.attribute(name))
    }

    pub fn contains_attribute(&self, name: &str) -> bool {
        self.collection_for(name).is_some()
    }

    pub fn find_support(&self, field: &str, table_constraint: &str) -> Option<&AttributeDescription> {
        find_support(&self.collections, &self.support_cache, field, table_constraint)
            .and_then(|c| c.find_support(field, table_constraint))
    }

    pub fn all_attribute_descriptions(&self) -> Vec<&AttributeDescription> {
        self.collections
            .iter()
            .flat_map(|c| c.descriptions())
            .collect()
    }

    pub fn completer_names(&self) -> Vec<String> {
        self.collections
            .iter()
            .flat_map(|c| c.completer_names())
            .collect()
    }
}

impl Named for AttributeGroup {
    fn internal_name(&self) -> &str {
        self.named.internal_name()
    }
}

/// Placeholder group whose content is produced by a data-source specific
/// handler (sequence export, for one).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DsAttributeGroup {
    named: NamedEntity,
    attributes: AttributeValueStore,
}

impl DsAttributeGroup {
    pub fn new(internal_name: impl Into<String>) -> Result<Self> {
        Ok(Self::from_entity(NamedEntity::new(internal_name)?))
    }

    pub fn from_entity(named: NamedEntity) -> Self {
        Self {
            named,
            attributes: AttributeValueStore::new(DS_ATTRIBUTE_GROUP_SCHEMA),
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
        handler, set_handler => keys::HANDLER;
    }
}

impl Named for DsAttributeGroup {
    fn internal_name(&self) -> &str {
        self.named.internal_name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeGroupKind {
    Standard(AttributeGroup),
    DataSource(DsAttributeGroup),
}

impl AttributeGroupKind {
    pub fn as_standard(&self) -> Option<&AttributeGroup> {
        match self {
            AttributeGroupKind::Standard(group) => Some(group),
            AttributeGroupKind::DataSource(_) => None,
        }
    }

    pub fn named(&self) -> &NamedEntity {
        match self {
            AttributeGroupKind::Standard(group) => group.named(),
            AttributeGroupKind::DataSource(group) => group.named(),
        }
    }

    fn contains_attribute(&self, name: &str) -> bool {
        self.as_standard()
            .is_some_and(|g| g.contains_attribute(name))
    }
}

impl Named for AttributeGroupKind {
    fn internal_name(&self) -> &str {
        self.named().internal_name()
    }
}

impl Supports for AttributeGroupKind {
    fn supports(&self, field: &str, table_constraint: &str) -> bool {
        self.as_standard()
            .is_some_and(|g| g.find_support(field, table_constraint).is_some())
    }
}

impl From<AttributeGroup> for AttributeGroupKind {
    fn from(group: AttributeGroup) -> Self {
        AttributeGroupKind::Standard(group)
    }
}

impl From<DsAttributeGroup> for AttributeGroupKind {
    fn from(group: DsAttributeGroup) -> Self {
        AttributeGroupKind::DataSource(group)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributePage {
    named: NamedEntity,
    attributes: AttributeValueStore,
    groups: OrderedNamedContainer<AttributeGroupKind>,
    attribute_cache: CachedLookup<String>,
    support_cache: CachedLookup<FieldRef>,
}

impl AttributePage {
    pub fn new(internal_name: impl Into<String>) -> Result<Self> {
        Ok(Self::from_entity(NamedEntity::new(internal_name)?))
    }

    pub fn from_entity(named: NamedEntity) -> Self {
        Self {
            named,
            attributes: AttributeValueStore::new(ATTRIBUTE_PAGE_SCHEMA),
            groups: OrderedNamedContainer::new(),
            attribute_cache: CachedLookup::new(),
            support_cache: CachedLookup::new(),
        }
    }

    pub fn named(&self) -> &NamedEntity {
        &self.named
    }

    pub fn display_name(&self) -> &str {
        self.named.display_name()
    }

    pub fn attributes(&self) -> &AttributeValueStore {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeValueStore {
        &mut self.attributes
    }

    store_accessors! {
        out_formats, set_out_formats => keys::OUT_FORMATS;
    }

    pub fn add_group(&mut self, group: impl Into<AttributeGroupKind>) {
        self.groups.add(group.into());
    }

    pub fn remove_group(&mut self, name: &str) -> Option<AttributeGroupKind> {
        self.groups.remove(name)
    }

    pub fn groups(&self) -> impl Iterator<Item = &AttributeGroupKind> + '_ {
        self.groups.iter()
    }

    pub fn group(&self, name: &str) -> Option<&AttributeGroupKind> {
        self.groups.get(name)
    }

    /// Group holding the attribute named `name`.
    pub fn group_for(&self, name: &str) -> Option<&AttributeGroup> {
        self.attribute_cache
            .lookup(
                name,
                &self.groups,
                |g| g.contains_attribute(name),
                |gs| gs.find_rank(|g| g.contains_attribute(name)),
            )
            .and_then(AttributeGroupKind::as_standard)
    }

    pub fn collection_for(&self, name: &str) -> Option<&AttributeCollection> {
        self.group_for(name).and_then(|g| g.collection_for(name))
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDescription> {
        self.group_for(name).and_then(|g| g.attribute(name))
    }

    pub fn contains_attribute(&self, name: &str) -> bool {
        self.group_for(name).is_some()
    }

    pub fn find_support(&self, field: &str, table_constraint: &str) -> Option<&AttributeDescription> {
        find_support(&self.groups, &self.support_cache, field, table_constraint)
            .and_then(AttributeGroupKind::as_standard)
            .and_then(|g| g.find_support(field, table_constraint))
    }

    pub fn all_attribute_descriptions(&self) -> Vec<&AttributeDescription> {
        self.groups
            .iter()
            .filter_map(AttributeGroupKind::as_standard)
            .flat_map(|g| g.all_attribute_descriptions())
            .collect()
    }

    pub fn completer_names(&self) -> Vec<String> {
        self.groups
            .iter()
            .filter_map(AttributeGroupKind::as_standard)
            .flat_map(|g| g.completer_names())
            .collect()
    }
}

impl Named for AttributePage {
    fn internal_name(&self) -> &str {
        self.named.internal_name()
    }
}

impl Supports for AttributePage {
    fn supports(&self, field: &str, table_constraint: &str) -> bool {
        self.find_support(field, table_constraint).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gene_collection() -> AttributeCollection {
        let mut collection = AttributeCollection::new("gene_ids").unwrap();
        collection.add_description(
            AttributeDescription::new("ensembl_gene_id", "gene_stable_id")
                .unwrap()
                .with_table_constraint("gene"),
        );
        collection.add_description(
            AttributeDescription::new("gene_name", "display_label")
                .unwrap()
                .with_table_constraint("xref"),
        );
        collection
    }

    fn features_page() -> AttributePage {
        let mut group = AttributeGroup::new("ids").unwrap();
        group.add_collection(gene_collection());

        let mut page = AttributePage::new("features").unwrap();
        page.add_group(DsAttributeGroup::new("sequences").unwrap());
        page.add_group(group);
        page
    }

    #[test]
    fn test_field_is_required() {
        assert!(matches!(
            AttributeDescription::new("name", ""),
            Err(ConfigError::MissingField { .. })
        ));
        assert!(AttributeDescription::new("", "f").is_err());

        let mut description = AttributeDescription::new("name", "gene_id").unwrap();
        assert!(description.attributes_mut().remove(keys::FIELD).is_err());
        assert!(description.attributes_mut().set(keys::FIELD, " ").is_err());
        assert_eq!(description.field(), "gene_id");
        description
            .attributes_mut()
            .set(keys::FIELD, "transcript_id")
            .unwrap();
        assert_eq!(description.field(), "transcript_id");
    }

    #[test]
    fn test_numeric_defaults() {
        let mut description = AttributeDescription::new("name", "f").unwrap();
        assert_eq!(description.max_length(), DEFAULT_MAX_LENGTH);
        description
            .attributes_mut()
            .set(keys::MAX_LENGTH, "notanumber")
            .unwrap();
        assert_eq!(description.max_length(), 10);
        description.set_max_length(64);
        assert_eq!(description.max_length(), 64);

        let mut collection = AttributeCollection::new("c").unwrap();
        assert_eq!(collection.max_select(), 0);
        collection.set_max_select(3);
        assert_eq!(collection.max_select(), 3);
        collection
            .attributes_mut()
            .set(keys::MAX_SELECT, "notanumber")
            .unwrap();
        assert_eq!(collection.max_select(), 0);
    }

    #[test]
    fn test_dynamic_content_by_dataset() {
        let mut description = AttributeDescription::new("gene_name", "display_label").unwrap();
        assert!(description.dynamic_content_for("mmusculus_gene").is_none());

        let mut mouse = DynamicAttributeContent::new("mmusculus_gene").unwrap();
        mouse.set_pointer_dataset("mmusculus_gene");
        mouse.set_pointer_attribute("external_gene_name");
        description.add_dynamic_content(mouse);
        description.add_dynamic_content(DynamicAttributeContent::new("rnorvegicus_gene").unwrap());

        let content = description.dynamic_content_for("mmusculus_gene").unwrap();
        assert!(content.is_pointer());
        assert_eq!(content.pointer_attribute(), Some("external_gene_name"));
        assert!(!description
            .dynamic_content_for("rnorvegicus_gene")
            .unwrap()
            .is_pointer());
        assert!(description.dynamic_content_for("hsapiens_gene").is_none());
    }

    #[test]
    fn test_collection_support_requires_both_values() {
        let collection = gene_collection();
        let found = collection.find_support("gene_stable_id", "gene").unwrap();
        assert_eq!(found.internal_name(), "ensembl_gene_id");
        assert!(collection.find_support("gene_stable_id", "xref").is_none());

        let no_table = AttributeDescription::new("loose", "gene_stable_id").unwrap();
        assert!(!no_table.supports("gene_stable_id", "gene"));
    }

    #[test]
    fn test_page_lookups_skip_data_source_groups() {
        let page = features_page();
        assert_eq!(page.group_for("gene_name").unwrap().internal_name(), "ids");
        assert_eq!(
            page.collection_for("gene_name").unwrap().internal_name(),
            "gene_ids"
        );
        assert_eq!(
            page.attribute("ensembl_gene_id").unwrap().field(),
            "gene_stable_id"
        );
        assert!(page.attribute("sequences").is_none());
        assert_eq!(
            page.find_support("display_label", "xref")
                .unwrap()
                .internal_name(),
            "gene_name"
        );
        assert_eq!(
            page.completer_names(),
            vec!["ensembl_gene_id", "gene_name"]
        );
        assert_eq!(page.all_attribute_descriptions().len(), 2);
    }

    #[test]
    fn test_collection_equality_follows_content() {
        let a = gene_collection();
        let b = gene_collection();
        assert_eq!(a, b);

        // a warm cache does not affect equality
        assert!(a.find_support("gene_stable_id", "gene").is_some());
        assert_eq!(a, b);

        let mut c = gene_collection();
        c.remove_description("gene_name");
        assert_ne!(a, c);

        let detached = a.description_list();
        assert_eq!(detached.len(), 2);
        assert_eq!(detached[1].internal_name(), "gene_name");
    }
}
