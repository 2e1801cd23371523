use crate::core::{
    field_matches, find_support, CachedLookup, CompoundName, FieldRef, Named,
    OrderedNamedContainer, Resolvable, Supports,
};
use crate::domain::dynamic::DynamicFilterContent;
use crate::domain::named::NamedEntity;
use crate::domain::store::{keys, store_accessors, AttributeValueStore};
use crate::utils::error::{ConfigError, Result};

const FILTER_DESCRIPTION_SCHEMA: &[&str] = &[
    keys::FIELD,
    keys::VALUE,
    keys::HANDLER,
    keys::TABLE_CONSTRAINT,
    keys::KEY,
    keys::TYPE,
    keys::QUALIFIER,
    keys::LEGAL_QUALIFIERS,
    keys::HIDDEN,
];

const FILTER_OPTION_SCHEMA: &[&str] = &[
    keys::FIELD,
    keys::VALUE,
    keys::HANDLER,
    keys::TABLE_CONSTRAINT,
    keys::KEY,
    keys::TYPE,
    keys::QUALIFIER,
    keys::LEGAL_QUALIFIERS,
    keys::REF,
    keys::IS_SELECTABLE,
    keys::HIDDEN,
];

const PUSH_ACTION_SCHEMA: &[&str] = &[keys::REF];

const TOGGLE_SCHEMA: &[&str] = &[keys::REF, keys::VALUE_CONDITION];

const REF_REQUIRED: &[&str] = &[keys::REF];

fn push_unique(into: &mut Vec<String>, value: String) {
    if !into.contains(&value) {
        into.push(value);
    }
}

/// Splits a comma separated `legal_qualifiers` value.
fn split_qualifiers(raw: Option<&str>) -> Vec<String> {
    raw.filter(|q| !q.is_empty())
        .map(|q| q.split(',').map(|s| s.trim().to_string()).collect())
        .unwrap_or_default()
}

/// A selectable value or sub-filter of a filter description.
///
/// Options nest: a "filter option" carries its own field and type and may hold
/// value options beneath it. Push actions attached to an option offer options
/// to another filter once this one is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterOption {
    named: NamedEntity,
    attributes: AttributeValueStore,
    options: OrderedNamedContainer<FilterOption>,
    push_actions: Vec<PushAction>,
    support_cache: CachedLookup<FieldRef>,
}

impl FilterOption {
    pub fn new(internal_name: impl Into<String>) -> Result<Self> {
        Ok(Self::from_entity(NamedEntity::new(internal_name)?))
    }

    pub fn from_entity(named: NamedEntity) -> Self {
        Self {
            named,
            attributes: AttributeValueStore::new(FILTER_OPTION_SCHEMA),
            options: OrderedNamedContainer::new(),
            push_actions: Vec::new(),
            support_cache: CachedLookup::new(),
        }
    }

    /// Value option shorthand.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    pub fn with_field(
        mut self,
        field: impl Into<String>,
        table_constraint: impl Into<String>,
    ) -> Self {
        self.set_field(field);
        self.set_table_constraint(table_constraint);
        self
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
        field, set_field => keys::FIELD;
        value, set_value => keys::VALUE;
        handler, set_handler => keys::HANDLER;
        table_constraint, set_table_constraint => keys::TABLE_CONSTRAINT;
        key, set_key => keys::KEY;
        filter_type, set_filter_type => keys::TYPE;
        qualifier, set_qualifier => keys::QUALIFIER;
        legal_qualifiers, set_legal_qualifiers => keys::LEGAL_QUALIFIERS;
        reference, set_reference => keys::REF;
    }

    pub fn is_selectable(&self) -> bool {
        self.attributes.flag(keys::IS_SELECTABLE)
    }

    pub fn set_selectable(&mut self, selectable: bool) {
        self.attributes.set_optional(keys::IS_SELECTABLE, selectable.to_string());
    }

    pub fn is_hidden(&self) -> bool {
        self.attributes.flag(keys::HIDDEN)
    }

    /// A filter option names its own column and type.
    pub fn is_filter_option(&self) -> bool {
        self.attributes.get_non_empty(keys::FIELD).is_some()
            && self.attributes.get_non_empty(keys::TYPE).is_some()
    }

    pub fn add_option(&mut self, option: FilterOption) {
        self.options.add(option);
    }

    pub fn remove_option(&mut self, name: &str) -> Option<FilterOption> {
        self.options.remove(name)
    }

    pub fn options(&self) -> impl Iterator<Item = &FilterOption> + '_ {
        self.options.iter()
    }

    pub fn option(&self, name: &str) -> Option<&FilterOption> {
        self.options.get(name)
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn add_push_action(&mut self, push_action: PushAction) {
        self.push_actions.push(push_action);
    }

    pub fn push_actions(&self) -> &[PushAction] {
        &self.push_actions
    }

    /// First option named `name` offered by one of this option's push actions.
    pub fn pushed_option(&self, name: &str) -> Option<&FilterOption> {
        self.push_actions.iter().find_map(|pa| pa.option(name))
    }

    fn declares(&self, field: &str, table_constraint: &str) -> bool {
        field_matches(
            self.field(),
            self.table_constraint(),
            field,
            table_constraint,
        )
    }

    /// The option in this subtree, itself included, that declares the column.
    pub fn option_by_field_table(&self, field: &str, table_constraint: &str) -> Option<&FilterOption> {
        if self.declares(field, table_constraint) {
            return Some(self);
        }
        if let Some(child) = find_support(&self.options, &self.support_cache, field, table_constraint)
        {
            return child.option_by_field_table(field, table_constraint);
        }
        self.push_actions
            .iter()
            .find_map(|pa| pa.option_by_field_table(field, table_constraint))
    }

    /// Name the column answers to from this option; pushed options come back
    /// qualified as `option.pushed`.
    pub fn internal_name_by_field_table(&self, field: &str, table_constraint: &str) -> Option<String> {
        if self.declares(field, table_constraint) {
            return Some(self.internal_name().to_string());
        }
        if let Some(child) = find_support(&self.options, &self.support_cache, field, table_constraint)
        {
            return child.internal_name_by_field_table(field, table_constraint);
        }
        self.push_actions
            .iter()
            .find_map(|pa| pa.option_by_field_table(field, table_constraint))
            .map(|pushed| format!("{}.{}", self.internal_name(), pushed.internal_name()))
    }

    /// `option.pushed` names for pushed filter options, `option.ref` for
    /// pushed value lists.
    pub fn completer_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for push_action in &self.push_actions {
            for pushed in push_action.options() {
                let completer = if pushed.is_filter_option() {
                    format!("{}.{}", self.internal_name(), pushed.internal_name())
                } else if pushed.attributes.get_non_empty(keys::VALUE).is_some() {
                    format!("{}.{}", self.internal_name(), push_action.reference())
                } else {
                    continue;
                };
                push_unique(&mut names, completer);
            }
        }
        names
    }

    fn option_values(&self) -> Vec<String> {
        let mut values = Vec::new();
        for option in self.options.iter() {
            if let Some(value) = option.attributes.get_non_empty(keys::VALUE) {
                push_unique(&mut values, value.to_string());
            }
        }
        values
    }
}

impl Named for FilterOption {
    fn internal_name(&self) -> &str {
        self.named.internal_name()
    }
}

impl Supports for FilterOption {
    fn supports(&self, field: &str, table_constraint: &str) -> bool {
        self.declares(field, table_constraint)
            || self.options.iter().any(|o| o.supports(field, table_constraint))
            || self
                .push_actions
                .iter()
                .any(|pa| pa.supports(field, table_constraint))
    }
}

/// Options pushed to the filter named by `ref` when the owning option is
/// selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PushAction {
    named: NamedEntity,
    attributes: AttributeValueStore,
    options: OrderedNamedContainer<FilterOption>,
    support_cache: CachedLookup<FieldRef>,
}

impl PushAction {
    pub fn new(internal_name: impl Into<String>, reference: impl Into<String>) -> Result<Self> {
        Self::from_entity(NamedEntity::new(internal_name)?, reference)
    }

    pub fn from_entity(named: NamedEntity, reference: impl Into<String>) -> Result<Self> {
        let reference = reference.into();
        if reference.trim().is_empty() {
            return Err(ConfigError::missing("PushAction", keys::REF));
        }
        let mut attributes = AttributeValueStore::new(PUSH_ACTION_SCHEMA).with_required(REF_REQUIRED);
        attributes.set(keys::REF, reference)?;
        Ok(Self {
            named,
            attributes,
            options: OrderedNamedContainer::new(),
            support_cache: CachedLookup::new(),
        })
    }

    pub fn named(&self) -> &NamedEntity {
        &self.named
    }

    pub fn attributes(&self) -> &AttributeValueStore {
        &self.attributes
    }

    /// Internal name of the filter receiving the pushed options.
    pub fn reference(&self) -> &str {
        self.attributes.get(keys::REF).unwrap_or_default()
    }

    pub fn add_option(&mut self, option: FilterOption) {
        self.options.add(option);
    }

    pub fn options(&self) -> impl Iterator<Item = &FilterOption> + '_ {
        self.options.iter()
    }

    pub fn option(&self, name: &str) -> Option<&FilterOption> {
        self.options.get(name)
    }

    /// Shallow: only the options this action offers directly.
    pub fn contains_option(&self, name: &str) -> bool {
        self.options.contains(name)
    }

    pub fn option_by_field_table(&self, field: &str, table_constraint: &str) -> Option<&FilterOption> {
        find_support(&self.options, &self.support_cache, field, table_constraint)
            .and_then(|option| option.option_by_field_table(field, table_constraint))
    }

    fn all_references(&self) -> Vec<&str> {
        let mut refs = vec![self.reference()];
        for option in self.options.iter() {
            for nested in &option.push_actions {
                refs.extend(nested.all_references());
            }
        }
        refs
    }
}

impl Named for PushAction {
    fn internal_name(&self) -> &str {
        self.named.internal_name()
    }
}

impl Supports for PushAction {
    fn supports(&self, field: &str, table_constraint: &str) -> bool {
        self.options.iter().any(|o| o.supports(field, table_constraint))
    }
}

/// Enables or disables the filter named by `ref`, optionally only when the
/// owning filter's value satisfies `valueCondition`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterToggle {
    attributes: AttributeValueStore,
}

pub type Enable = FilterToggle;
pub type Disable = FilterToggle;

impl FilterToggle {
    pub fn new(reference: impl Into<String>) -> Result<Self> {
        let reference = reference.into();
        if reference.trim().is_empty() {
            return Err(ConfigError::missing("Enable/Disable", keys::REF));
        }
        let mut attributes = AttributeValueStore::new(TOGGLE_SCHEMA).with_required(REF_REQUIRED);
        attributes.set(keys::REF, reference)?;
        Ok(Self { attributes })
    }

    pub fn with_value_condition(mut self, condition: impl Into<String>) -> Self {
        self.attributes.set_optional(keys::VALUE_CONDITION, condition);
        self
    }

    pub fn attributes(&self) -> &AttributeValueStore {
        &self.attributes
    }

    pub fn reference(&self) -> &str {
        self.attributes.get(keys::REF).unwrap_or_default()
    }

    pub fn value_condition(&self) -> Option<&str> {
        self.attributes.get_non_empty(keys::VALUE_CONDITION)
    }
}

/// Either the description itself or one of its options, as addressed by name.
#[derive(Debug, Clone, Copy)]
pub enum FilterTarget<'a> {
    Description(&'a FilterDescription),
    Option(&'a FilterOption),
}

impl<'a> FilterTarget<'a> {
    pub fn internal_name(&self) -> &'a str {
        match *self {
            FilterTarget::Description(d) => d.internal_name(),
            FilterTarget::Option(o) => o.internal_name(),
        }
    }

    pub fn named(&self) -> &'a NamedEntity {
        match *self {
            FilterTarget::Description(d) => &d.named,
            FilterTarget::Option(o) => &o.named,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&'a str> {
        match *self {
            FilterTarget::Description(d) => d.attributes.get_non_empty(key),
            FilterTarget::Option(o) => o.attributes.get_non_empty(key),
        }
    }
}

/// A user-facing filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterDescription {
    named: NamedEntity,
    attributes: AttributeValueStore,
    options: OrderedNamedContainer<FilterOption>,
    enables: Vec<Enable>,
    disables: Vec<Disable>,
    dynamic_contents: Vec<DynamicFilterContent>,
    support_cache: CachedLookup<FieldRef>,
}

impl FilterDescription {
    pub fn new(internal_name: impl Into<String>) -> Result<Self> {
        Ok(Self::from_entity(NamedEntity::new(internal_name)?))
    }

    pub fn from_entity(named: NamedEntity) -> Self {
        Self {
            named,
            attributes: AttributeValueStore::new(FILTER_DESCRIPTION_SCHEMA),
            options: OrderedNamedContainer::new(),
            enables: Vec::new(),
            disables: Vec::new(),
            dynamic_contents: Vec::new(),
            support_cache: CachedLookup::new(),
        }
    }

    pub fn with_field(
        mut self,
        field: impl Into<String>,
        table_constraint: impl Into<String>,
    ) -> Self {
        self.set_field(field);
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

    store_accessors! {
        field, set_field => keys::FIELD;
        value, set_value => keys::VALUE;
        handler, set_handler => keys::HANDLER;
        table_constraint, set_table_constraint => keys::TABLE_CONSTRAINT;
        key, set_key => keys::KEY;
        filter_type, set_filter_type => keys::TYPE;
        qualifier, set_qualifier => keys::QUALIFIER;
        legal_qualifiers, set_legal_qualifiers => keys::LEGAL_QUALIFIERS;
    }

    pub fn is_hidden(&self) -> bool {
        self.attributes.flag(keys::HIDDEN)
    }

    pub fn add_option(&mut self, option: FilterOption) {
        self.options.add(option);
    }

    pub fn add_options<I: IntoIterator<Item = FilterOption>>(&mut self, options: I) {
        self.options.add_all(options);
    }

    pub fn remove_option(&mut self, name: &str) -> Option<FilterOption> {
        self.options.remove(name)
    }

    pub fn options(&self) -> impl Iterator<Item = &FilterOption> + '_ {
        self.options.iter()
    }

    pub fn option(&self, name: &str) -> Option<&FilterOption> {
        self.options.get(name)
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn add_enable(&mut self, enable: Enable) {
        self.enables.push(enable);
    }

    pub fn enables(&self) -> &[Enable] {
        &self.enables
    }

    pub fn add_disable(&mut self, disable: Disable) {
        self.disables.push(disable);
    }

    pub fn disables(&self) -> &[Disable] {
        &self.disables
    }

    pub fn add_dynamic_content(&mut self, content: DynamicFilterContent) {
        self.dynamic_contents.push(content);
    }

    pub fn dynamic_contents(&self) -> &[DynamicFilterContent] {
        &self.dynamic_contents
    }

    pub fn dynamic_content_for(&self, dataset: &str) -> Option<&DynamicFilterContent> {
        self.dynamic_contents
            .iter()
            .find(|c| c.internal_name() == dataset)
    }

    fn declares(&self, field: &str, table_constraint: &str) -> bool {
        field_matches(
            self.field(),
            self.table_constraint(),
            field,
            table_constraint,
        )
    }

    /// The option, at any depth, that declares the column.
    pub fn option_by_field_table(&self, field: &str, table_constraint: &str) -> Option<&FilterOption> {
        find_support(&self.options, &self.support_cache, field, table_constraint)
            .and_then(|option| option.option_by_field_table(field, table_constraint))
    }

    /// Name under which this filter answers for the column: its own name when
    /// it declares the column itself, otherwise the declaring option's name,
    /// `option.pushed` for pushed options.
    pub fn internal_name_by_field_table(&self, field: &str, table_constraint: &str) -> Option<String> {
        if self.declares(field, table_constraint) {
            return Some(self.internal_name().to_string());
        }
        find_support(&self.options, &self.support_cache, field, table_constraint)
            .and_then(|option| option.internal_name_by_field_table(field, table_constraint))
    }

    /// Resolve a name this filter answers to: itself, a direct option, or
    /// `option.pushed`. A qualified name whose inner part is this filter's own
    /// name addresses the filter.
    pub fn target(&self, name: &str) -> Option<FilterTarget<'_>> {
        if self.internal_name() == name {
            return Some(FilterTarget::Description(self));
        }
        if let Some(option) = self.options.get(name) {
            return Some(FilterTarget::Option(option));
        }
        match CompoundName::parse(name) {
            CompoundName::Qualified { inner, .. } if inner == self.internal_name() => {
                Some(FilterTarget::Description(self))
            }
            CompoundName::Qualified { outer, inner } => self
                .options
                .get(outer)
                .and_then(|option| option.pushed_option(inner))
                .map(FilterTarget::Option),
            _ => None,
        }
    }

    /// Attribute of the named target, falling back to this filter's own value
    /// when the target leaves it unset.
    pub fn attribute_for(&self, name: &str, key: &str) -> Option<&str> {
        let target = self.target(name)?;
        target
            .attribute(key)
            .or_else(|| self.attributes.get_non_empty(key))
    }

    pub fn field_for(&self, name: &str) -> Option<&str> {
        self.attribute_for(name, keys::FIELD)
    }

    pub fn table_constraint_for(&self, name: &str) -> Option<&str> {
        self.attribute_for(name, keys::TABLE_CONSTRAINT)
    }

    pub fn type_for(&self, name: &str) -> Option<&str> {
        self.attribute_for(name, keys::TYPE)
    }

    pub fn key_for(&self, name: &str) -> Option<&str> {
        self.attribute_for(name, keys::KEY)
    }

    pub fn handler_for(&self, name: &str) -> Option<&str> {
        self.attribute_for(name, keys::HANDLER)
    }

    pub fn display_name_for(&self, name: &str) -> Option<&str> {
        self.target(name).map(|t| t.named().display_name())
    }

    pub fn completer_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        let own_filter = self.attributes.get_non_empty(keys::FIELD).is_some()
            && self.attributes.get_non_empty(keys::TYPE).is_some();

        if own_filter {
            push_unique(&mut names, self.internal_name().to_string());
            for option in self.options.iter() {
                names.extend(option.completer_names());
            }
        } else {
            for option in self.options.iter() {
                if option.is_filter_option() {
                    push_unique(&mut names, option.internal_name().to_string());
                } else {
                    names.extend(option.completer_names());
                }
            }
        }
        names
    }

    /// Values a shell can offer for `name`, which is this filter, one of its
    /// options, or `option.pushed`.
    pub fn completer_values(&self, name: &str) -> Vec<String> {
        if self.internal_name() == name {
            return self.value_list();
        }
        match CompoundName::parse(name) {
            CompoundName::Qualified { outer, inner } => {
                let Some(outer_option) = self.options.get(outer) else {
                    return Vec::new();
                };
                let mut values = Vec::new();
                for push_action in outer_option.push_actions() {
                    if push_action.reference() == inner {
                        for option in push_action.options() {
                            if let Some(value) = option.attributes.get_non_empty(keys::VALUE) {
                                push_unique(&mut values, value.to_string());
                            }
                        }
                    } else if let Some(pushed) = push_action.option(inner) {
                        for value in pushed.option_values() {
                            push_unique(&mut values, value);
                        }
                    }
                }
                values
            }
            _ => self
                .options
                .get(name)
                .map(FilterOption::option_values)
                .unwrap_or_default(),
        }
    }

    /// Legal qualifiers a shell can offer for `name`.
    pub fn completer_qualifiers(&self, name: &str) -> Vec<String> {
        if self.internal_name() == name {
            return split_qualifiers(self.legal_qualifiers());
        }
        match CompoundName::parse(name) {
            CompoundName::Qualified { outer, inner } => {
                let Some(outer_option) = self.options.get(outer) else {
                    return Vec::new();
                };
                let mut qualifiers = Vec::new();
                for push_action in outer_option.push_actions() {
                    let Some(pushed) = push_action.option(inner) else {
                        continue;
                    };
                    for option in pushed.options() {
                        for qualifier in split_qualifiers(option.legal_qualifiers()) {
                            push_unique(&mut qualifiers, qualifier);
                        }
                    }
                }
                qualifiers
            }
            _ => self
                .options
                .get(name)
                .map(|option| split_qualifiers(option.legal_qualifiers()))
                .unwrap_or_default(),
        }
    }

    fn value_list(&self) -> Vec<String> {
        let mut values = Vec::new();
        for option in self.options.iter() {
            if let Some(value) = option.attributes.get_non_empty(keys::VALUE) {
                push_unique(&mut values, value.to_string());
            }
        }
        values
    }

    /// Every push action `ref` in this filter's option tree.
    pub fn push_action_references(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        for option in self.options.iter() {
            for push_action in option.push_actions() {
                refs.extend(push_action.all_references());
            }
        }
        refs
    }
}

impl Named for FilterDescription {
    fn internal_name(&self) -> &str {
        self.named.internal_name()
    }
}

impl Resolvable for FilterDescription {
    fn contains_option(&self, name: &str) -> bool {
        self.options.contains(name)
    }

    fn pushes_option(&self, option: &str, pushed: &str) -> bool {
        self.options.get(option).is_some_and(|o| {
            o.push_actions()
                .iter()
                .any(|pa| pa.contains_option(pushed))
        })
    }
}

impl Supports for FilterDescription {
    fn supports(&self, field: &str, table_constraint: &str) -> bool {
        self.declares(field, table_constraint)
            || self.options.iter().any(|o| o.supports(field, table_constraint))
    }
}

/// A filter applied to every query of a dataset unless overridden.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DefaultFilter {
    filter: FilterDescription,
    value: String,
}

impl DefaultFilter {
    pub fn new(filter: FilterDescription, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(ConfigError::missing("DefaultFilter", keys::VALUE));
        }
        Ok(Self { filter, value })
    }

    pub fn filter(&self) -> &FilterDescription {
        &self.filter
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chromosome_filter() -> FilterDescription {
        let mut chromosome = FilterDescription::new("chromosome_name").unwrap();
        chromosome.set_field("chr_name");
        chromosome.set_table_constraint("gene");
        chromosome.set_filter_type("list");
        chromosome.set_legal_qualifiers("=,in");
        chromosome.add_option(FilterOption::new("chr1").unwrap().with_value("1"));
        chromosome.add_option(FilterOption::new("chr2").unwrap().with_value("2"));
        chromosome.add_option(FilterOption::new("chr1_dup").unwrap().with_value("1"));
        chromosome
    }

    /// A filter whose `marker` option pushes a band list and a marker filter
    /// option to other filters.
    fn marker_filter() -> FilterDescription {
        let mut band_push = PushAction::new("band_push", "band").unwrap();
        band_push.add_option(FilterOption::new("p11").unwrap().with_value("p11"));
        band_push.add_option(FilterOption::new("q21").unwrap().with_value("q21"));

        let mut marker_start = FilterOption::new("marker_start")
            .unwrap()
            .with_field("marker_id", "marker");
        marker_start.set_filter_type("list");
        marker_start.add_option(FilterOption::new("m1").unwrap().with_value("D1S243"));
        let mut m2 = FilterOption::new("m2").unwrap().with_value("D1S468");
        m2.set_legal_qualifiers("=");
        marker_start.add_option(m2);

        let mut marker_push = PushAction::new("marker_push", "marker_filter").unwrap();
        marker_push.add_option(marker_start);

        let mut chr1 = FilterOption::new("chr1").unwrap().with_value("1");
        chr1.add_push_action(band_push);
        chr1.add_push_action(marker_push);

        let mut description = FilterDescription::new("chr_with_markers").unwrap();
        description.add_option(chr1);
        description
    }

    #[test]
    fn test_own_field_and_type_make_a_completer_name() {
        let chromosome = chromosome_filter();
        assert_eq!(chromosome.completer_names(), vec!["chromosome_name"]);
        assert_eq!(chromosome.completer_values("chromosome_name"), vec!["1", "2"]);
        assert_eq!(
            chromosome.completer_qualifiers("chromosome_name"),
            vec!["=", "in"]
        );
    }

    #[test]
    fn test_pushed_completer_names() {
        let description = marker_filter();
        assert_eq!(
            description.completer_names(),
            vec!["chr1.band", "chr1.marker_start"]
        );
    }

    #[test]
    fn test_pushed_completer_values_and_qualifiers() {
        let description = marker_filter();
        assert_eq!(description.completer_values("chr1.band"), vec!["p11", "q21"]);
        assert_eq!(
            description.completer_values("chr1.marker_start"),
            vec!["D1S243", "D1S468"]
        );
        assert_eq!(description.completer_qualifiers("chr1.marker_start"), vec!["="]);
        assert!(description.completer_values("nochr.band").is_empty());
    }

    #[test]
    fn test_pushed_option_answers_with_qualified_name() {
        let description = marker_filter();
        assert!(description.supports("marker_id", "marker"));
        assert_eq!(
            description.internal_name_by_field_table("marker_id", "marker"),
            Some("chr1.marker_start".to_string())
        );
        let option = description
            .option_by_field_table("marker_id", "marker")
            .unwrap();
        assert_eq!(option.internal_name(), "marker_start");
        assert!(description.option_by_field_table("marker_id", "gene").is_none());
    }

    #[test]
    fn test_own_declaration_answers_with_own_name() {
        let chromosome = chromosome_filter();
        assert!(chromosome.supports("chr_name", "gene"));
        assert_eq!(
            chromosome.internal_name_by_field_table("chr_name", "gene"),
            Some("chromosome_name".to_string())
        );
        assert!(chromosome.option_by_field_table("chr_name", "gene").is_none());
    }

    #[test]
    fn test_target_lookup_falls_back_to_description_values() {
        let description = marker_filter();
        assert_eq!(
            description.field_for("chr1.marker_start"),
            Some("marker_id")
        );
        assert_eq!(description.type_for("chr1.marker_start"), Some("list"));
        assert_eq!(description.field_for("chr1"), None);
        assert!(description.target("chr1.unknown").is_none());

        let mut chromosome = chromosome_filter();
        chromosome.add_option(FilterOption::new("chrX").unwrap().with_value("X"));
        assert_eq!(chromosome.field_for("chrX"), Some("chr_name"));
        assert_eq!(chromosome.table_constraint_for("chrX"), Some("gene"));
    }

    #[test]
    fn test_key_and_handler_fall_back_to_description() {
        let mut description = marker_filter();
        description.set_key("gene_id_key");
        description.set_handler("MarkerHandler");
        assert_eq!(description.key_for("chr1"), Some("gene_id_key"));
        assert_eq!(description.handler_for("chr1.marker_start"), Some("MarkerHandler"));

        let mut chromosome = chromosome_filter();
        chromosome.add_option({
            let mut chr_x = FilterOption::new("chrX").unwrap().with_value("X");
            chr_x.set_key("seq_region_key");
            chr_x
        });
        assert_eq!(chromosome.key_for("chrX"), Some("seq_region_key"));
        assert_eq!(chromosome.key_for("chr1"), None);
        assert_eq!(chromosome.handler_for("chrX"), None);
        assert_eq!(chromosome.key_for("missing"), None);
    }

    #[test]
    fn test_dynamic_content_by_dataset() {
        let mut chromosome = chromosome_filter();
        assert!(chromosome.dynamic_content_for("mmusculus_gene").is_none());

        let mut mouse = DynamicFilterContent::new("mmusculus_gene").unwrap();
        mouse.set_other_filters("rnorvegicus_gene.chromosome_name");
        chromosome.add_dynamic_content(mouse);
        chromosome.add_dynamic_content(DynamicFilterContent::new("rnorvegicus_gene").unwrap());

        let content = chromosome.dynamic_content_for("mmusculus_gene").unwrap();
        assert_eq!(content.other_filter_list(), vec!["rnorvegicus_gene.chromosome_name"]);
        assert!(chromosome
            .dynamic_content_for("rnorvegicus_gene")
            .unwrap()
            .other_filter_list()
            .is_empty());
        assert!(chromosome.dynamic_content_for("hsapiens_gene").is_none());
    }

    #[test]
    fn test_resolvable_hooks_are_shallow() {
        let description = marker_filter();
        assert!(description.contains_option("chr1"));
        assert!(!description.contains_option("m1"));
        assert!(description.pushes_option("chr1", "marker_start"));
        assert!(description.pushes_option("chr1", "p11"));
        assert!(!description.pushes_option("chr1", "m1"));
        assert!(!description.pushes_option("chr2", "marker_start"));
    }

    #[test]
    fn test_push_action_requires_ref() {
        assert!(matches!(
            PushAction::new("p", ""),
            Err(ConfigError::MissingField { .. })
        ));
        assert!(FilterToggle::new(" ").is_err());
        let enable = FilterToggle::new("band")
            .unwrap()
            .with_value_condition("1");
        assert_eq!(enable.reference(), "band");
        assert_eq!(enable.value_condition(), Some("1"));
    }

    #[test]
    fn test_push_references_are_collected() {
        let description = marker_filter();
        assert_eq!(
            description.push_action_references(),
            vec!["band", "marker_filter"]
        );
    }

    #[test]
    fn test_default_filter_requires_value() {
        let filter = chromosome_filter();
        assert!(DefaultFilter::new(filter.clone(), "").is_err());
        let default = DefaultFilter::new(filter, "1").unwrap();
        assert_eq!(default.value(), "1");
        assert_eq!(default.filter().internal_name(), "chromosome_name");
    }
}
