//! XML codec for dataset configuration documents.
//!
//! Documents are read into a small element tree first and then mapped onto
//! the object model; writing goes the other way. Attributes are written in
//! each object's title order, so a parsed document written back keeps a
//! stable layout.

use crate::domain::attribute::{
    AttributeCollection, AttributeDescription, AttributeGroup, AttributeGroupKind, AttributePage,
    DsAttributeGroup,
};
use crate::domain::dataset::{dataset_attributes, message_digest, DatasetConfig, DatasetHeader};
use crate::domain::dynamic::{DynamicAttributeContent, DynamicFilterContent};
use crate::domain::filter::{DefaultFilter, FilterDescription, FilterOption, FilterToggle, PushAction};
use crate::domain::filter_page::{
    DsFilterGroup, FilterCollection, FilterGroup, FilterGroupKind, FilterPage,
};
use crate::domain::named::NamedEntity;
use crate::domain::store::{keys, AttributeValueStore};
use crate::utils::error::{ConfigError, Result};
use crate::utils::validation::validate_required;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

mod tag {
    pub const DATASET_CONFIG: &str = "DatasetConfig";
    pub const MAIN_TABLE: &str = "MainTable";
    pub const KEY: &str = "Key";
    pub const OPTION: &str = "Option";
    pub const DEFAULT_FILTER: &str = "DefaultFilter";
    pub const FILTER_PAGE: &str = "FilterPage";
    pub const FILTER_GROUP: &str = "FilterGroup";
    pub const DS_FILTER_GROUP: &str = "DSFilterGroup";
    pub const FILTER_COLLECTION: &str = "FilterCollection";
    pub const FILTER_DESCRIPTION: &str = "FilterDescription";
    pub const PUSH_ACTION: &str = "PushAction";
    pub const ENABLE: &str = "Enable";
    pub const DISABLE: &str = "Disable";
    pub const DYNAMIC_FILTER_CONTENT: &str = "DynamicFilterContent";
    pub const ATTRIBUTE_PAGE: &str = "AttributePage";
    pub const ATTRIBUTE_GROUP: &str = "AttributeGroup";
    pub const DS_ATTRIBUTE_GROUP: &str = "DSAttributeGroup";
    pub const ATTRIBUTE_COLLECTION: &str = "AttributeCollection";
    pub const ATTRIBUTE_DESCRIPTION: &str = "AttributeDescription";
    pub const DYNAMIC_ATTRIBUTE_CONTENT: &str = "DynamicAttributeContent";
}

#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let mut element = Element::new(&String::from_utf8_lossy(start.name().as_ref()));
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn set(&mut self, key: &str, value: &str) {
        self.attributes.push((key.to_string(), value.to_string()));
    }

    fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    fn named(&self) -> Result<NamedEntity> {
        let internal_name = validate_required(&self.name, keys::INTERNAL_NAME, self.attr(keys::INTERNAL_NAME))?;
        Ok(NamedEntity::new(internal_name)?
            .with_display_name(self.attr(keys::DISPLAY_NAME).unwrap_or_default())
            .with_description(self.attr(keys::DESCRIPTION).unwrap_or_default()))
    }

    /// Copy every attribute outside the name triple into `store`.
    fn copy_into(&self, store: &mut AttributeValueStore) -> Result<()> {
        for (key, value) in &self.attributes {
            if !matches!(
                key.as_str(),
                keys::INTERNAL_NAME | keys::DISPLAY_NAME | keys::DESCRIPTION
            ) {
                store.set(key, value.as_str())?;
            }
        }
        Ok(())
    }

    fn unexpected(&self, child: &Element) {
        tracing::warn!("ignoring <{}> inside <{}>", child.name, self.name);
    }
}

fn read_tree(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Element::from_start(&start)?),
            Event::Empty(start) => {
                let element = Element::from_start(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.push(element),
                    None => return Ok(element),
                }
            }
            Event::End(_) => {
                let Some(element) = stack.pop() else {
                    break;
                };
                match stack.last_mut() {
                    Some(parent) => parent.push(element),
                    None => return Ok(element),
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Err(ConfigError::InvalidValue {
        field: "document".to_string(),
        value: String::new(),
        reason: "no complete root element".to_string(),
    })
}

fn expect_root(root: &Element) -> Result<()> {
    if root.name != tag::DATASET_CONFIG {
        return Err(ConfigError::InvalidValue {
            field: "root element".to_string(),
            value: root.name.clone(),
            reason: format!("expected <{}>", tag::DATASET_CONFIG),
        });
    }
    Ok(())
}

/// Root attributes and digest only; pages are not built.
pub fn parse_header(xml: &str) -> Result<DatasetHeader> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(start) | Event::Empty(start) => {
                let root = Element::from_start(&start)?;
                expect_root(&root)?;
                let named = root.named()?;
                validate_required(&root.name, keys::DATASET, root.attr(keys::DATASET))?;
                let mut attributes = dataset_attributes();
                root.copy_into(&mut attributes)?;
                return Ok(DatasetHeader {
                    named,
                    attributes,
                    digest: message_digest(xml.as_bytes()),
                });
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Err(ConfigError::InvalidValue {
        field: "document".to_string(),
        value: String::new(),
        reason: "no root element".to_string(),
    })
}

/// Build a complete, loaded configuration from a document.
pub fn parse_dataset_config(xml: &str) -> Result<DatasetConfig> {
    let root = read_tree(xml)?;
    expect_root(&root)?;

    let dataset = validate_required(&root.name, keys::DATASET, root.attr(keys::DATASET))?;
    let mut config = DatasetConfig::from_entity(root.named()?, dataset)?;
    root.copy_into(config.attributes_mut())?;
    config.set_message_digest(message_digest(xml.as_bytes()));

    for child in &root.children {
        match child.name.as_str() {
            tag::MAIN_TABLE => config.add_main_table(child.text.trim()),
            tag::KEY => config.add_primary_key(child.text.trim()),
            tag::OPTION => config.add_option(parse_option(child)?),
            tag::DEFAULT_FILTER => config.add_default_filter(parse_default_filter(child)?),
            tag::FILTER_PAGE => config.add_filter_page(parse_filter_page(child)?),
            tag::ATTRIBUTE_PAGE => config.add_attribute_page(parse_attribute_page(child)?),
            _ => root.unexpected(child),
        }
    }
    Ok(config)
}

fn parse_default_filter(element: &Element) -> Result<DefaultFilter> {
    let value = validate_required(&element.name, keys::VALUE, element.attr(keys::VALUE))?;
    let filter = element
        .children
        .iter()
        .find(|c| c.name == tag::FILTER_DESCRIPTION)
        .ok_or_else(|| ConfigError::missing(tag::DEFAULT_FILTER, tag::FILTER_DESCRIPTION))?;
    DefaultFilter::new(parse_filter_description(filter)?, value)
}

fn parse_filter_page(element: &Element) -> Result<FilterPage> {
    let mut page = FilterPage::from_entity(element.named()?);
    element.copy_into(page.attributes_mut())?;
    for child in &element.children {
        match child.name.as_str() {
            tag::FILTER_GROUP => page.add_group(parse_filter_group(child)?),
            tag::DS_FILTER_GROUP => {
                let mut group = DsFilterGroup::from_entity(child.named()?);
                child.copy_into(group.attributes_mut())?;
                page.add_group(group);
            }
            _ => element.unexpected(child),
        }
    }
    Ok(page)
}

fn parse_filter_group(element: &Element) -> Result<FilterGroup> {
    let mut group = FilterGroup::from_entity(element.named()?);
    element.copy_into(group.attributes_mut())?;
    for child in &element.children {
        match child.name.as_str() {
            tag::FILTER_COLLECTION => group.add_collection(parse_filter_collection(child)?),
            _ => element.unexpected(child),
        }
    }
    Ok(group)
}

fn parse_filter_collection(element: &Element) -> Result<FilterCollection> {
    let mut collection = FilterCollection::from_entity(element.named()?);
    element.copy_into(collection.attributes_mut())?;
    for child in &element.children {
        match child.name.as_str() {
            tag::FILTER_DESCRIPTION => collection.add_filter(parse_filter_description(child)?),
            _ => element.unexpected(child),
        }
    }
    Ok(collection)
}

fn parse_filter_description(element: &Element) -> Result<FilterDescription> {
    let mut filter = FilterDescription::from_entity(element.named()?);
    element.copy_into(filter.attributes_mut())?;
    for child in &element.children {
        match child.name.as_str() {
            tag::OPTION => filter.add_option(parse_option(child)?),
            tag::ENABLE => filter.add_enable(parse_toggle(child)?),
            tag::DISABLE => filter.add_disable(parse_toggle(child)?),
            tag::DYNAMIC_FILTER_CONTENT => {
                let mut content = DynamicFilterContent::from_entity(child.named()?);
                child.copy_into(content.attributes_mut())?;
                filter.add_dynamic_content(content);
            }
            _ => element.unexpected(child),
        }
    }
    Ok(filter)
}

fn parse_option(element: &Element) -> Result<FilterOption> {
    let mut option = FilterOption::from_entity(element.named()?);
    element.copy_into(option.attributes_mut())?;
    for child in &element.children {
        match child.name.as_str() {
            tag::OPTION => option.add_option(parse_option(child)?),
            tag::PUSH_ACTION => option.add_push_action(parse_push_action(child)?),
            _ => element.unexpected(child),
        }
    }
    Ok(option)
}

fn parse_push_action(element: &Element) -> Result<PushAction> {
    let reference = validate_required(&element.name, keys::REF, element.attr(keys::REF))?;
    let mut push_action = PushAction::from_entity(element.named()?, reference)?;
    for child in &element.children {
        match child.name.as_str() {
            tag::OPTION => push_action.add_option(parse_option(child)?),
            _ => element.unexpected(child),
        }
    }
    Ok(push_action)
}

fn parse_toggle(element: &Element) -> Result<FilterToggle> {
    let reference = validate_required(&element.name, keys::REF, element.attr(keys::REF))?;
    let toggle = FilterToggle::new(reference)?;
    Ok(match element.attr(keys::VALUE_CONDITION) {
        Some(condition) => toggle.with_value_condition(condition),
        None => toggle,
    })
}

fn parse_attribute_page(element: &Element) -> Result<AttributePage> {
    let mut page = AttributePage::from_entity(element.named()?);
    element.copy_into(page.attributes_mut())?;
    for child in &element.children {
        match child.name.as_str() {
            tag::ATTRIBUTE_GROUP => page.add_group(parse_attribute_group(child)?),
            tag::DS_ATTRIBUTE_GROUP => {
                let mut group = DsAttributeGroup::from_entity(child.named()?);
                child.copy_into(group.attributes_mut())?;
                page.add_group(group);
            }
            _ => element.unexpected(child),
        }
    }
    Ok(page)
}

fn parse_attribute_group(element: &Element) -> Result<AttributeGroup> {
    let mut group = AttributeGroup::from_entity(element.named()?);
    element.copy_into(group.attributes_mut())?;
    for child in &element.children {
        match child.name.as_str() {
            tag::ATTRIBUTE_COLLECTION => group.add_collection(parse_attribute_collection(child)?),
            _ => element.unexpected(child),
        }
    }
    Ok(group)
}

fn parse_attribute_collection(element: &Element) -> Result<AttributeCollection> {
    let mut collection = AttributeCollection::from_entity(element.named()?);
    element.copy_into(collection.attributes_mut())?;
    for child in &element.children {
        match child.name.as_str() {
            tag::ATTRIBUTE_DESCRIPTION => {
                collection.add_description(parse_attribute_description(child)?)
            }
            _ => element.unexpected(child),
        }
    }
    Ok(collection)
}

fn parse_attribute_description(element: &Element) -> Result<AttributeDescription> {
    let field = validate_required(&element.name, keys::FIELD, element.attr(keys::FIELD))?;
    let mut description = AttributeDescription::from_entity(element.named()?, field)?;
    element.copy_into(description.attributes_mut())?;
    for child in &element.children {
        match child.name.as_str() {
            tag::DYNAMIC_ATTRIBUTE_CONTENT => {
                let mut content = DynamicAttributeContent::from_entity(child.named()?);
                child.copy_into(content.attributes_mut())?;
                description.add_dynamic_content(content);
            }
            _ => element.unexpected(child),
        }
    }
    Ok(description)
}

fn element_for(name: &str, named: &NamedEntity, attributes: &AttributeValueStore) -> Element {
    let mut element = Element::new(name);
    element.set(keys::INTERNAL_NAME, named.internal_name());
    if !named.display_name().is_empty() {
        element.set(keys::DISPLAY_NAME, named.display_name());
    }
    if !named.description().is_empty() {
        element.set(keys::DESCRIPTION, named.description());
    }
    for (key, value) in attributes.iter() {
        element.set(key, value);
    }
    element
}

fn text_element(name: &str, text: &str) -> Element {
    let mut element = Element::new(name);
    element.text = text.to_string();
    element
}

fn option_element(option: &FilterOption) -> Element {
    let mut element = element_for(tag::OPTION, option.named(), option.attributes());
    for nested in option.options() {
        element.push(option_element(nested));
    }
    for push_action in option.push_actions() {
        let mut push = element_for(tag::PUSH_ACTION, push_action.named(), push_action.attributes());
        for pushed in push_action.options() {
            push.push(option_element(pushed));
        }
        element.push(push);
    }
    element
}

fn toggle_element(name: &str, toggle: &FilterToggle) -> Element {
    let mut element = Element::new(name);
    for (key, value) in toggle.attributes().iter() {
        element.set(key, value);
    }
    element
}

fn filter_description_element(filter: &FilterDescription) -> Element {
    let mut element = element_for(tag::FILTER_DESCRIPTION, filter.named(), filter.attributes());
    for option in filter.options() {
        element.push(option_element(option));
    }
    for enable in filter.enables() {
        element.push(toggle_element(tag::ENABLE, enable));
    }
    for disable in filter.disables() {
        element.push(toggle_element(tag::DISABLE, disable));
    }
    for content in filter.dynamic_contents() {
        element.push(element_for(
            tag::DYNAMIC_FILTER_CONTENT,
            content.named(),
            content.attributes(),
        ));
    }
    element
}

fn filter_page_element(page: &FilterPage) -> Element {
    let mut element = element_for(tag::FILTER_PAGE, page.named(), page.attributes());
    for group in page.groups() {
        match group {
            FilterGroupKind::Standard(group) => {
                let mut group_element = element_for(tag::FILTER_GROUP, group.named(), group.attributes());
                for collection in group.collections() {
                    let mut collection_element = element_for(
                        tag::FILTER_COLLECTION,
                        collection.named(),
                        collection.attributes(),
                    );
                    for filter in collection.filters() {
                        collection_element.push(filter_description_element(filter));
                    }
                    group_element.push(collection_element);
                }
                element.push(group_element);
            }
            FilterGroupKind::DataSource(group) => {
                element.push(element_for(tag::DS_FILTER_GROUP, group.named(), group.attributes()));
            }
        }
    }
    element
}

fn attribute_page_element(page: &AttributePage) -> Element {
    let mut element = element_for(tag::ATTRIBUTE_PAGE, page.named(), page.attributes());
    for group in page.groups() {
        match group {
            AttributeGroupKind::Standard(group) => {
                let mut group_element =
                    element_for(tag::ATTRIBUTE_GROUP, group.named(), group.attributes());
                for collection in group.collections() {
                    let mut collection_element = element_for(
                        tag::ATTRIBUTE_COLLECTION,
                        collection.named(),
                        collection.attributes(),
                    );
                    for description in collection.descriptions() {
                        let mut description_element = element_for(
                            tag::ATTRIBUTE_DESCRIPTION,
                            description.named(),
                            description.attributes(),
                        );
                        for content in description.dynamic_contents() {
                            description_element.push(element_for(
                                tag::DYNAMIC_ATTRIBUTE_CONTENT,
                                content.named(),
                                content.attributes(),
                            ));
                        }
                        collection_element.push(description_element);
                    }
                    group_element.push(collection_element);
                }
                element.push(group_element);
            }
            AttributeGroupKind::DataSource(group) => {
                element.push(element_for(
                    tag::DS_ATTRIBUTE_GROUP,
                    group.named(),
                    group.attributes(),
                ));
            }
        }
    }
    element
}

fn dataset_config_element(config: &DatasetConfig) -> Element {
    let mut root = element_for(tag::DATASET_CONFIG, config.named(), config.attributes());
    for table in config.main_tables() {
        root.push(text_element(tag::MAIN_TABLE, table));
    }
    for key in config.primary_keys() {
        root.push(text_element(tag::KEY, key));
    }
    for option in config.options() {
        root.push(option_element(option));
    }
    for default_filter in config.default_filters() {
        let mut element = Element::new(tag::DEFAULT_FILTER);
        element.set(keys::VALUE, default_filter.value());
        element.push(filter_description_element(default_filter.filter()));
        root.push(element);
    }
    for page in config.filter_pages() {
        root.push(filter_page_element(page));
    }
    for page in config.attribute_pages() {
        root.push(attribute_page_element(page));
    }
    root
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if !element.text.is_empty() {
        writer.write_event(Event::Text(BytesText::new(&element.text)))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

/// Serialize a loaded configuration as an indented document.
pub fn write_dataset_config(config: &DatasetConfig) -> Result<String> {
    if !config.is_loaded() {
        tracing::warn!(
            "writing '{}' before it was loaded; pages will be missing",
            config.named().internal_name()
        );
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, &dataset_config_element(config))?;

    String::from_utf8(writer.into_inner()).map_err(|e| ConfigError::InvalidValue {
        field: "document".to_string(),
        value: String::new(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Named;

    const MINIMAL: &str = r#"<?xml version="1.0"?>
<DatasetConfig internalName="default" displayName="Genes" dataset="hsapiens_gene" type="TableSet">
  <MainTable>hsapiens_gene__gene__main</MainTable>
  <Key>gene_id_key</Key>
  <FilterPage internalName="filters">
    <FilterGroup internalName="main">
      <FilterCollection internalName="region">
        <FilterDescription internalName="chromosome_name" field="chr_name" tableConstraint="gene" type="list" legal_qualifiers="=">
          <Option internalName="chr1" value="1" isSelectable="true"/>
          <Enable ref="band" valueCondition="1"/>
        </FilterDescription>
        <FilterDescription internalName="band" field="band" tableConstraint="gene" type="list"/>
      </FilterCollection>
    </FilterGroup>
  </FilterPage>
  <AttributePage internalName="features" outFormats="tsv,csv">
    <AttributeGroup internalName="ids">
      <AttributeCollection internalName="gene_ids" maxSelect="2">
        <AttributeDescription internalName="ensembl_gene_id" field="gene_stable_id" tableConstraint="gene" maxLength="15"/>
      </AttributeCollection>
    </AttributeGroup>
    <DSAttributeGroup internalName="sequences" handler="sequence"/>
  </AttributePage>
</DatasetConfig>
"#;

    #[test]
    fn test_parse_minimal_document() {
        let config = parse_dataset_config(MINIMAL).unwrap();
        assert!(config.is_loaded());
        assert_eq!(config.internal_name(), "default");
        assert_eq!(config.display_name(), "Genes");
        assert_eq!(config.dataset(), "hsapiens_gene");
        assert_eq!(config.dataset_type(), Some("TableSet"));
        assert_eq!(config.main_tables(), ["hsapiens_gene__gene__main"]);
        assert_eq!(config.primary_keys(), ["gene_id_key"]);

        let chromosome = config.resolve_filter("chr1").unwrap();
        assert_eq!(chromosome.internal_name(), "chromosome_name");
        assert!(chromosome.option("chr1").unwrap().is_selectable());
        assert_eq!(chromosome.enables()[0].reference(), "band");

        let attribute = config.attribute("ensembl_gene_id").unwrap();
        assert_eq!(attribute.max_length(), 15);
        assert_eq!(
            config.collection_for_attribute("ensembl_gene_id").unwrap().max_select(),
            2
        );
        assert_eq!(
            config.attribute_page("features").unwrap().out_formats(),
            Some("tsv,csv")
        );
        assert_eq!(config.message_digest(), Some(message_digest(MINIMAL.as_bytes()).as_str()));
    }

    #[test]
    fn test_header_reads_root_only() {
        let header = parse_header(MINIMAL).unwrap();
        assert_eq!(header.internal_name(), "default");
        assert_eq!(header.dataset(), "hsapiens_gene");
        assert_eq!(header.named.display_name(), "Genes");
        assert_eq!(header.digest, message_digest(MINIMAL.as_bytes()));
    }

    #[test]
    fn test_written_document_parses_to_equal_config() {
        let config = parse_dataset_config(MINIMAL).unwrap();
        let written = write_dataset_config(&config).unwrap();
        assert!(written.starts_with("<?xml"));
        let reparsed = parse_dataset_config(&written).unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn test_attributes_are_written_in_title_order() {
        let mut config = DatasetConfig::new("default", "hsapiens_gene").unwrap();
        config.set_version("3");
        config.set_dataset_type("TableSet");
        let written = write_dataset_config(&config).unwrap();
        assert!(written.contains(
            r#"<DatasetConfig internalName="default" dataset="hsapiens_gene" type="TableSet" version="3"/>"#
        ));
    }

    #[test]
    fn test_missing_required_values_are_reported() {
        let no_field = r#"<DatasetConfig internalName="d" dataset="x"><AttributePage internalName="p"><AttributeGroup internalName="g"><AttributeCollection internalName="c"><AttributeDescription internalName="a"/></AttributeCollection></AttributeGroup></AttributePage></DatasetConfig>"#;
        assert!(matches!(
            parse_dataset_config(no_field),
            Err(ConfigError::MissingField { field, .. }) if field == "field"
        ));

        let no_name = r#"<DatasetConfig dataset="x"/>"#;
        assert!(matches!(
            parse_header(no_name),
            Err(ConfigError::MissingField { field, .. }) if field == "internalName"
        ));

        let wrong_root = r#"<Registry internalName="r"/>"#;
        assert!(matches!(
            parse_dataset_config(wrong_root),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let broken = r#"<DatasetConfig internalName="d" dataset="x"><FilterPage></DatasetConfig>"#;
        assert!(parse_dataset_config(broken).is_err());
    }
}
