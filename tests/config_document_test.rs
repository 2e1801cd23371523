use mart_config::adapters::{parse_dataset_config, parse_header, write_dataset_config};
use mart_config::core::Named;
use mart_config::domain::message_digest;
use mart_config::ConfigError;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const HUMAN_GENES: &str = include_str!("fixtures/hsapiens_gene.xml");

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn test_fixture_parses_completely() {
    let config = parse_dataset_config(HUMAN_GENES).unwrap();

    assert!(config.is_loaded());
    assert!(config.is_visible());
    assert_eq!(config.internal_name(), "default");
    assert_eq!(config.dataset(), "hsapiens_gene");
    assert_eq!(config.main_tables().len(), 2);
    assert_eq!(config.primary_keys(), ["gene_id_key", "transcript_id_key"]);
    assert_eq!(config.filter_pages().count(), 1);
    assert_eq!(config.attribute_pages().count(), 1);
    assert_eq!(config.all_filter_descriptions().len(), 3);
    assert_eq!(config.all_attribute_descriptions().len(), 2);
    assert!(config.validate_push_actions().is_ok());
    assert_eq!(
        config.message_digest(),
        Some(message_digest(HUMAN_GENES.as_bytes()).as_str())
    );
}

#[test]
fn test_filter_names_resolve_through_options_and_push_actions() {
    let config = parse_dataset_config(HUMAN_GENES).unwrap();

    assert_eq!(config.resolve_filter("D1").unwrap().internal_name(), "D1");
    assert_eq!(config.resolve_filter("opt1").unwrap().internal_name(), "D1");
    assert_eq!(config.resolve_filter("opt1.pushed1").unwrap().internal_name(), "D1");
    assert_eq!(config.resolve_filter("opt1.D2").unwrap().internal_name(), "D2");
    assert!(config.resolve_filter("opt1.pushed1.extra").is_none());
    assert!(config.resolve_filter("nothing").is_none());

    assert!(config.contains_filter("opt2"));
    assert_eq!(config.page_for_filter("gene_id_filter").unwrap().internal_name(), "filters");
    assert_eq!(config.group_for_filter("D2").unwrap().internal_name(), "region");
    assert_eq!(config.collection_for_filter("gene_id_filter").unwrap().internal_name(), "ids");

    let d1 = config.resolve_filter("opt1").unwrap();
    assert_eq!(d1.field_for("D1"), Some("chr_name"));
    assert_eq!(d1.table_constraint_for("D1"), Some("gene"));
}

#[test]
fn test_repeated_lookups_return_the_same_answer() {
    let config = parse_dataset_config(HUMAN_GENES).unwrap();
    for _ in 0..3 {
        assert_eq!(config.page_for_filter("opt1").unwrap().internal_name(), "filters");
        assert_eq!(
            config.page_for_attribute("gene_name").unwrap().internal_name(),
            "features"
        );
    }
    assert!(config.page_for_filter("gene_name").is_none());
    assert!(config.page_for_attribute("D1").is_none());
}

#[test]
fn test_find_support_matches_field_and_table() {
    let config = parse_dataset_config(HUMAN_GENES).unwrap();

    let filter = config.find_filter_support("gene_id", "gene").unwrap();
    assert_eq!(filter.internal_name(), "gene_id_filter");
    let attribute = config.find_attribute_support("gene_id", "gene").unwrap();
    assert_eq!(attribute.internal_name(), "gene_stable_id");

    assert!(config.find_filter_support("gene_id", "transcript").is_none());
    assert!(config.find_attribute_support("unknown", "gene").is_none());
}

#[test]
fn test_attribute_limits_fall_back_on_bad_values() {
    let config = parse_dataset_config(HUMAN_GENES).unwrap();

    assert_eq!(config.attribute("gene_stable_id").unwrap().max_length(), 15);
    assert_eq!(config.attribute("gene_name").unwrap().max_length(), 10);
    assert_eq!(
        config.collection_for_attribute("gene_name").unwrap().max_select(),
        2
    );
    assert!(config.contains_attribute("gene_name"));
    assert!(!config.contains_attribute("sequences"));
}

#[test]
fn test_completer_names_values_and_qualifiers() {
    let config = parse_dataset_config(HUMAN_GENES).unwrap();

    assert_eq!(
        config.filter_completer_names(),
        vec!["D1", "opt1.D2", "D2", "gene_id_filter"]
    );
    assert_eq!(
        config.attribute_completer_names(),
        vec!["gene_stable_id", "gene_name"]
    );
    assert_eq!(config.filter_completer_values("D1"), vec!["1", "2"]);
    assert_eq!(config.filter_completer_values("opt1.D2"), vec!["p36.33", "p36.32"]);
    assert!(config.filter_completer_values("nothing").is_empty());
    assert_eq!(config.filter_completer_qualifiers("D1"), vec!["=", "in"]);
    assert_eq!(config.filter_completer_qualifiers("opt1.D2"), vec!["="]);
}

#[test]
fn test_written_document_parses_back_equal() {
    let config = parse_dataset_config(HUMAN_GENES).unwrap();
    let written = write_dataset_config(&config).unwrap();
    assert!(written.starts_with("<?xml"));

    let reparsed = parse_dataset_config(&written).unwrap();
    assert_eq!(config, reparsed);
    assert_eq!(hash_of(&config), hash_of(&reparsed));
    assert_eq!(write_dataset_config(&reparsed).unwrap(), written);
}

#[test]
fn test_equality_ignores_lookup_history() {
    let warmed = parse_dataset_config(HUMAN_GENES).unwrap();
    assert!(warmed.resolve_filter("opt1").is_some());
    assert!(warmed.attribute("gene_name").is_some());

    let cold = parse_dataset_config(HUMAN_GENES).unwrap();
    assert_eq!(warmed, cold);
    assert_eq!(hash_of(&warmed), hash_of(&cold));

    let mut changed = cold.clone();
    changed.add_main_table("hsapiens_gene__xref__dm");
    assert_ne!(warmed, changed);
}

#[test]
fn test_header_does_not_need_the_pages() {
    let header = parse_header(HUMAN_GENES).unwrap();
    assert_eq!(header.internal_name(), "default");
    assert_eq!(header.dataset(), "hsapiens_gene");
    assert_eq!(header.named.display_name(), "Human genes");
    assert_eq!(header.digest, message_digest(HUMAN_GENES.as_bytes()));
}

#[test]
fn test_dangling_push_action_is_reported() {
    let broken = HUMAN_GENES.replace(r#"ref="D2""#, r#"ref="missing_filter""#);
    let config = parse_dataset_config(&broken).unwrap();
    assert!(matches!(
        config.validate_push_actions(),
        Err(ConfigError::InvalidValue { value, .. }) if value == "missing_filter"
    ));
}

#[test]
fn test_missing_dataset_is_rejected() {
    let broken = HUMAN_GENES.replace(r#" dataset="hsapiens_gene""#, "");
    assert!(matches!(
        parse_dataset_config(&broken),
        Err(ConfigError::MissingField { .. })
    ));
}
