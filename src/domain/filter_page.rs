use crate::core::{
    find_support, resolve, CachedLookup, CompoundName, FieldRef, Named, OrderedNamedContainer,
    Rank, Supports,
};
use crate::domain::filter::FilterDescription;
use crate::domain::named::NamedEntity;
use crate::domain::store::{keys, store_accessors, AttributeValueStore};
use crate::utils::error::Result;

const FILTER_COLLECTION_SCHEMA: &[&str] = &[keys::TYPE, keys::FILTER_SET_NAME, keys::HIDDEN];

const FILTER_GROUP_SCHEMA: &[&str] = &[keys::HIDDEN];

const DS_FILTER_GROUP_SCHEMA: &[&str] = &[keys::HANDLER, keys::HIDDEN];

const FILTER_PAGE_SCHEMA: &[&str] = &[keys::HIDDEN];

/// Levels of the filter hierarchy that hold filter descriptions.
pub(crate) trait FilterHolder {
    /// A filter with exactly this internal name sits somewhere below.
    fn holds_filter(&self, name: &str) -> bool;

    /// Some filter below answers `name` in any of its name forms.
    fn answers_filter(&self, name: &str) -> bool;
}

/// First child answering `name`. For `x.y`, a child holding a filter named
/// `y` comes before any child whose options push `y`.
pub(crate) fn locate_filter<T: Named + FilterHolder>(
    children: &OrderedNamedContainer<T>,
    name: &str,
) -> Option<Rank> {
    if let CompoundName::Qualified { inner, .. } = CompoundName::parse(name) {
        if let Some(rank) = children.find_rank(|c| c.holds_filter(inner)) {
            return Some(rank);
        }
    }
    children.find_rank(|c| c.answers_filter(name))
}

/// Filters presented together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterCollection {
    named: NamedEntity,
    attributes: AttributeValueStore,
    filters: OrderedNamedContainer<FilterDescription>,
    resolve_cache: CachedLookup<String>,
    support_cache: CachedLookup<FieldRef>,
}

impl FilterCollection {
    pub fn new(internal_name: impl Into<String>) -> Result<Self> {
        Ok(Self::from_entity(NamedEntity::new(internal_name)?))
    }

    pub fn from_entity(named: NamedEntity) -> Self {
        Self {
            named,
            attributes: AttributeValueStore::new(FILTER_COLLECTION_SCHEMA),
            filters: OrderedNamedContainer::new(),
            resolve_cache: CachedLookup::new(),
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

    store_accessors! {
        collection_type, set_collection_type => keys::TYPE;
        filter_set_name, set_filter_set_name => keys::FILTER_SET_NAME;
    }

    pub fn in_filter_set(&self) -> bool {
        self.attributes.get_non_empty(keys::FILTER_SET_NAME).is_some()
    }

    pub fn add_filter(&mut self, filter: FilterDescription) {
        self.filters.add(filter);
    }

    pub fn add_filters<I: IntoIterator<Item = FilterDescription>>(&mut self, filters: I) {
        self.filters.add_all(filters);
    }

    pub fn remove_filter(&mut self, name: &str) -> Option<FilterDescription> {
        self.filters.remove(name)
    }

    pub fn filters(&self) -> impl Iterator<Item = &FilterDescription> + '_ {
        self.filters.iter()
    }

    /// Detached copies, in insertion order.
    pub fn filter_list(&self) -> Vec<FilterDescription> {
        self.filters.to_vec()
    }

    /// Exact lookup by the filter's own internal name.
    pub fn filter(&self, name: &str) -> Option<&FilterDescription> {
        self.filters.get(name)
    }

    /// The filter answering `name`, which may be an option name or a
    /// compound `option.pushed` name.
    pub fn resolve(&self, name: &str) -> Option<&FilterDescription> {
        resolve(&self.filters, &self.resolve_cache, name)
    }

    pub fn contains_filter(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    pub fn find_support(&self, field: &str, table_constraint: &str) -> Option<&FilterDescription> {
        find_support(&self.filters, &self.support_cache, field, table_constraint)
    }

    pub fn completer_names(&self) -> Vec<String> {
        self.filters
            .iter()
            .flat_map(FilterDescription::completer_names)
            .collect()
    }
}

impl Named for FilterCollection {
    fn internal_name(&self) -> &str {
        self.named.internal_name()
    }
}

impl FilterHolder for FilterCollection {
    fn holds_filter(&self, name: &str) -> bool {
        self.filters.contains(name)
    }

    fn answers_filter(&self, name: &str) -> bool {
        self.contains_filter(name)
    }
}

impl Supports for FilterCollection {
    fn supports(&self, field: &str, table_constraint: &str) -> bool {
        self.filters.iter().any(|f| f.supports(field, table_constraint))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterGroup {
    named: NamedEntity,
    attributes: AttributeValueStore,
    collections: OrderedNamedContainer<FilterCollection>,
    resolve_cache: CachedLookup<String>,
    support_cache: CachedLookup<FieldRef>,
}

impl FilterGroup {
    pub fn new(internal_name: impl Into<String>) -> Result<Self> {
        Ok(Self::from_entity(NamedEntity::new(internal_name)?))
    }

    pub fn from_entity(named: NamedEntity) -> Self {
        Self {
            named,
            attributes: AttributeValueStore::new(FILTER_GROUP_SCHEMA),
            collections: OrderedNamedContainer::new(),
            resolve_cache: CachedLookup::new(),
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

    pub fn add_collection(&mut self, collection: FilterCollection) {
        self.collections.add(collection);
    }

    pub fn remove_collection(&mut self, name: &str) -> Option<FilterCollection> {
        self.collections.remove(name)
    }

    pub fn collections(&self) -> impl Iterator<Item = &FilterCollection> + '_ {
        self.collections.iter()
    }

    pub fn collection(&self, name: &str) -> Option<&FilterCollection> {
        self.collections.get(name)
    }

    /// First collection, in insertion order, holding a filter that answers
    /// `name`. A collection holding the filter an `x.y` name ends in comes
    /// first.
    pub fn collection_for(&self, name: &str) -> Option<&FilterCollection> {
        self.resolve_cache.lookup(
            name,
            &self.collections,
            |c| c.contains_filter(name),
            |cs| locate_filter(cs, name),
        )
    }

    pub fn resolve(&self, name: &str) -> Option<&FilterDescription> {
        self.collection_for(name).and_then(|c| c.resolve(name))
    }

    pub fn contains_filter(&self, name: &str) -> bool {
        self.collection_for(name).is_some()
    }

    pub fn find_support(&self, field: &str, table_constraint: &str) -> Option<&FilterDescription> {
        find_support(&self.collections, &self.support_cache, field, table_constraint)
            .and_then(|c| c.find_support(field, table_constraint))
    }

    pub fn all_filter_descriptions(&self) -> Vec<&FilterDescription> {
        self.collections.iter().flat_map(|c| c.filters()).collect()
    }

    pub fn completer_names(&self) -> Vec<String> {
        self.collections
            .iter()
            .flat_map(FilterCollection::completer_names)
            .collect()
    }
}

impl Named for FilterGroup {
    fn internal_name(&self) -> &str {
        self.named.internal_name()
    }
}

impl FilterHolder for FilterGroup {
    fn holds_filter(&self, name: &str) -> bool {
        self.collections.iter().any(|c| c.holds_filter(name))
    }

    fn answers_filter(&self, name: &str) -> bool {
        self.contains_filter(name)
    }
}

/// Placeholder group whose filters come from a data-source specific handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DsFilterGroup {
    named: NamedEntity,
    attributes: AttributeValueStore,
}

impl DsFilterGroup {
    pub fn new(internal_name: impl Into<String>) -> Result<Self> {
        Ok(Self::from_entity(NamedEntity::new(internal_name)?))
    }

    pub fn from_entity(named: NamedEntity) -> Self {
        Self {
            named,
            attributes: AttributeValueStore::new(DS_FILTER_GROUP_SCHEMA),
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

impl Named for DsFilterGroup {
    fn internal_name(&self) -> &str {
        self.named.internal_name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterGroupKind {
    Standard(FilterGroup),
    DataSource(DsFilterGroup),
}

impl FilterGroupKind {
    pub fn as_standard(&self) -> Option<&FilterGroup> {
        match self {
            FilterGroupKind::Standard(group) => Some(group),
            FilterGroupKind::DataSource(_) => None,
        }
    }

    pub fn named(&self) -> &NamedEntity {
        match self {
            FilterGroupKind::Standard(group) => group.named(),
            FilterGroupKind::DataSource(group) => group.named(),
        }
    }

}

impl FilterHolder for FilterGroupKind {
    fn holds_filter(&self, name: &str) -> bool {
        self.as_standard().is_some_and(|g| g.holds_filter(name))
    }

    fn answers_filter(&self, name: &str) -> bool {
        self.as_standard().is_some_and(|g| g.contains_filter(name))
    }
}

impl Named for FilterGroupKind {
    fn internal_name(&self) -> &str {
        self.named().internal_name()
    }
}

impl Supports for FilterGroupKind {
    fn supports(&self, field: &str, table_constraint: &str) -> bool {
        self.as_standard()
            .is_some_and(|g| g.find_support(field, table_constraint).is_some())
    }
}

impl From<FilterGroup> for FilterGroupKind {
    fn from(group: FilterGroup) -> Self {
        FilterGroupKind::Standard(group)
    }
}

impl From<DsFilterGroup> for FilterGroupKind {
    fn from(group: DsFilterGroup) -> Self {
        FilterGroupKind::DataSource(group)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterPage {
    named: NamedEntity,
    attributes: AttributeValueStore,
    groups: OrderedNamedContainer<FilterGroupKind>,
    resolve_cache: CachedLookup<String>,
    support_cache: CachedLookup<FieldRef>,
}

impl FilterPage {
    pub fn new(internal_name: impl Into<String>) -> Result<Self> {
        Ok(Self::from_entity(NamedEntity::new(internal_name)?))
    }

    pub fn from_entity(named: NamedEntity) -> Self {
        Self {
            named,
            attributes: AttributeValueStore::new(FILTER_PAGE_SCHEMA),
            groups: OrderedNamedContainer::new(),
            resolve_cache: CachedLookup::new(),
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

    pub fn add_group(&mut self, group: impl Into<FilterGroupKind>) {
        self.groups.add(group.into());
    }

    pub fn remove_group(&mut self, name: &str) -> Option<FilterGroupKind> {
        self.groups.remove(name)
    }

    pub fn groups(&self) -> impl Iterator<Item = &FilterGroupKind> + '_ {
        self.groups.iter()
    }

    pub fn group(&self, name: &str) -> Option<&FilterGroupKind> {
        self.groups.get(name)
    }

    pub fn group_for(&self, name: &str) -> Option<&FilterGroup> {
        self.resolve_cache
            .lookup(
                name,
                &self.groups,
                |g| g.answers_filter(name),
                |gs| locate_filter(gs, name),
            )
            .and_then(FilterGroupKind::as_standard)
    }

    pub fn collection_for(&self, name: &str) -> Option<&FilterCollection> {
        self.group_for(name).and_then(|g| g.collection_for(name))
    }

    pub fn resolve(&self, name: &str) -> Option<&FilterDescription> {
        self.group_for(name).and_then(|g| g.resolve(name))
    }

    pub fn contains_filter(&self, name: &str) -> bool {
        self.group_for(name).is_some()
    }

    pub fn find_support(&self, field: &str, table_constraint: &str) -> Option<&FilterDescription> {
        find_support(&self.groups, &self.support_cache, field, table_constraint)
            .and_then(FilterGroupKind::as_standard)
            .and_then(|g| g.find_support(field, table_constraint))
    }

    pub fn all_filter_descriptions(&self) -> Vec<&FilterDescription> {
        self.groups
            .iter()
            .filter_map(FilterGroupKind::as_standard)
            .flat_map(|g| g.all_filter_descriptions())
            .collect()
    }

    pub fn completer_names(&self) -> Vec<String> {
        self.groups
            .iter()
            .filter_map(FilterGroupKind::as_standard)
            .flat_map(|g| g.completer_names())
            .collect()
    }
}

impl Named for FilterPage {
    fn internal_name(&self) -> &str {
        self.named.internal_name()
    }
}

impl FilterHolder for FilterPage {
    fn holds_filter(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g.holds_filter(name))
    }

    fn answers_filter(&self, name: &str) -> bool {
        self.contains_filter(name)
    }
}

impl Supports for FilterPage {
    fn supports(&self, field: &str, table_constraint: &str) -> bool {
        self.find_support(field, table_constraint).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::{FilterOption, PushAction};

    fn d1() -> FilterDescription {
        let mut pushed = PushAction::new("push1", "D2").unwrap();
        pushed.add_option(FilterOption::new("pushed1").unwrap().with_value("p"));
        let mut opt1 = FilterOption::new("opt1").unwrap().with_value("1");
        opt1.add_push_action(pushed);

        let mut d1 = FilterDescription::new("D1")
            .unwrap()
            .with_field("chr_name", "gene");
        d1.add_option(opt1);
        d1
    }

    fn collection() -> FilterCollection {
        let mut collection = FilterCollection::new("region").unwrap();
        collection.add_filter(d1());
        collection.add_filter(
            FilterDescription::new("D2")
                .unwrap()
                .with_field("band", "gene"),
        );
        collection
    }

    #[test]
    fn test_collection_resolves_all_name_forms() {
        let collection = collection();
        assert_eq!(collection.resolve("D1").unwrap().internal_name(), "D1");
        assert_eq!(collection.resolve("opt1").unwrap().internal_name(), "D1");
        assert_eq!(
            collection.resolve("opt1.pushed1").unwrap().internal_name(),
            "D1"
        );
        assert_eq!(collection.resolve("opt1.D2").unwrap().internal_name(), "D2");
        assert!(collection.resolve("unknown").is_none());
        assert!(collection.resolve("a.b.c").is_none());
        assert_eq!(collection.filter("D2").unwrap().internal_name(), "D2");
        assert!(collection.filter("opt1").is_none());
    }

    #[test]
    fn test_repeated_queries_are_stable() {
        let collection = collection();
        for _ in 0..3 {
            assert_eq!(collection.resolve("opt1").unwrap().internal_name(), "D1");
            assert_eq!(collection.resolve("D2").unwrap().internal_name(), "D2");
        }
        assert_eq!(collection.resolve("opt1").unwrap().internal_name(), "D1");
    }

    #[test]
    fn test_page_lookups_descend_through_groups() {
        let mut group = FilterGroup::new("main").unwrap();
        group.add_collection(collection());

        let mut page = FilterPage::new("filters").unwrap();
        page.add_group(DsFilterGroup::new("expression").unwrap());
        page.add_group(group);

        assert_eq!(page.group_for("opt1.pushed1").unwrap().internal_name(), "main");
        assert_eq!(
            page.collection_for("D2").unwrap().internal_name(),
            "region"
        );
        assert_eq!(page.resolve("opt1").unwrap().internal_name(), "D1");
        assert!(page.resolve("expression").is_none());
        assert_eq!(
            page.find_support("band", "gene").unwrap().internal_name(),
            "D2"
        );
        assert!(page.find_support("band", "transcript").is_none());
        assert_eq!(page.all_filter_descriptions().len(), 2);
    }

    #[test]
    fn test_filter_set_membership() {
        let mut collection = collection();
        assert!(!collection.in_filter_set());
        collection.set_filter_set_name("region_set");
        assert!(collection.in_filter_set());
    }
}
