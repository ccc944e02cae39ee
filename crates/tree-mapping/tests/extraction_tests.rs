use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tree_mapping::{
    extract_roles, validate_completeness, FieldRoleConfig, MappingClassMetadata,
    MappingDescription, MappingDocument, MappingError, RoleTag, ScalarKind, TreeRole,
};
use tree_mapping_test_utils::{
    init_tracing, metadata_for, nested_set_mapping, parent_relation, tagged_field, ARTICLE_YAML,
    CATEGORY_YAML,
};

fn integer_kind() -> impl Strategy<Value = ScalarKind> {
    prop_oneof![
        Just(ScalarKind::Integer),
        Just(ScalarKind::SmallInt),
        Just(ScalarKind::BigInt),
    ]
}

fn non_integer_kind() -> impl Strategy<Value = ScalarKind> {
    prop_oneof![
        Just(ScalarKind::String),
        Just(ScalarKind::Text),
        Just(ScalarKind::Boolean),
        Just(ScalarKind::Decimal),
        Just(ScalarKind::Float),
        Just(ScalarKind::DateTime),
        "[a-z]{3,8}".prop_map(|name| name.parse::<ScalarKind>().unwrap()),
    ]
    .prop_filter("integer kinds", |kind| !kind.is_integer())
}

fn class_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,8}(\\\\[A-Z][a-z]{2,8}){0,2}"
}

#[test]
fn category_end_to_end() {
    init_tracing();
    let mapping = MappingDocument::parse(CATEGORY_YAML, "Entity.Category.dcm.yml")
        .unwrap()
        .into_description("Entity\\Category", "Entity.Category.dcm.yml")
        .unwrap();
    let meta = metadata_for("Entity\\Category", &mapping);

    let config = extract_roles("Entity\\Category", &mapping, &meta).unwrap();
    let config = validate_completeness("Entity\\Category", config).unwrap();

    assert_eq!(
        config,
        FieldRoleConfig {
            parent: Some("parent".to_string()),
            left: Some("lft".to_string()),
            right: Some("rgt".to_string()),
            level: Some("lvl".to_string()),
        }
    );
}

#[test]
fn mapping_without_tree_tags_is_not_a_tree() {
    let mapping = MappingDocument::parse(ARTICLE_YAML, "Entity.Article.dcm.yml")
        .unwrap()
        .into_description("Entity\\Article", "Entity.Article.dcm.yml")
        .unwrap();
    let meta = metadata_for("Entity\\Article", &mapping);

    let config = extract_roles("Entity\\Article", &mapping, &meta).unwrap();
    assert!(config.is_empty());
    assert!(validate_completeness("Entity\\Article", config).unwrap().is_empty());
}

#[test]
fn empty_mapping_passes_both_steps() {
    let meta = MappingClassMetadata::new("Empty");
    let config = extract_roles("Empty", &MappingDescription::new(), &meta).unwrap();
    assert!(validate_completeness("Empty", config).is_ok());
}

#[test]
fn missing_parent_reported_as_ancestor_only() {
    let mapping = MappingDescription::new()
        .with_field("lft", tagged_field(ScalarKind::Integer, &[RoleTag::TreeLeft]))
        .with_field("rgt", tagged_field(ScalarKind::Integer, &[RoleTag::TreeRight]));
    let meta = metadata_for("Category", &mapping);

    let config = extract_roles("Category", &mapping, &meta).unwrap();
    let err = validate_completeness("Category", config).unwrap_err();

    assert_eq!(
        err,
        MappingError::MissingRoleFields {
            class: "Category".to_string(),
            missing: vec!["ancestor"],
        }
    );
    assert_eq!(
        err.to_string(),
        "Missing properties: ancestor in class - Category"
    );
}

#[test]
fn invalid_level_type_names_field_and_class() {
    let mapping = MappingDescription::new()
        .with_field("depth", tagged_field(ScalarKind::String, &[RoleTag::TreeLevel]))
        .with_many_to_one("parent", parent_relation("Category"));
    let meta = metadata_for("Category", &mapping);

    let err = extract_roles("Category", &mapping, &meta).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Tree level field - [depth] type is not valid and must be 'integer' in class - Category"
    );
}

proptest! {
    #[test]
    fn prop_integer_bounds_are_recorded(class in class_name(), kind in integer_kind()) {
        let mapping = nested_set_mapping(&class, kind);
        let meta = metadata_for(&class, &mapping);

        let config = extract_roles(&class, &mapping, &meta).unwrap();
        prop_assert_eq!(config.get(TreeRole::Left), Some("lft"));
        prop_assert_eq!(config.get(TreeRole::Right), Some("rgt"));
        prop_assert_eq!(config.get(TreeRole::Level), Some("lvl"));
        prop_assert_eq!(config.get(TreeRole::Parent), Some("parent"));
        prop_assert!(validate_completeness(&class, config).is_ok());
    }

    #[test]
    fn prop_non_integer_bound_rejected(
        class in class_name(),
        kind in non_integer_kind(),
        tag in prop_oneof![
            Just(RoleTag::TreeLeft),
            Just(RoleTag::TreeRight),
            Just(RoleTag::TreeLevel),
        ],
    ) {
        let mapping = MappingDescription::new()
            .with_field("pos", tagged_field(kind, &[tag]));
        let meta = metadata_for(&class, &mapping);

        let err = extract_roles(&class, &mapping, &meta).unwrap_err();
        prop_assert_eq!(err, MappingError::invalid_field_type(tag.role(), "pos", class.as_str()));
    }

    #[test]
    fn prop_parent_must_reference_own_class(class in class_name(), target in class_name()) {
        prop_assume!(class != target);
        let mapping = MappingDescription::new().with_many_to_one("parent", parent_relation(&target));
        let meta = MappingClassMetadata::new(class.as_str());

        let err = extract_roles(&class, &mapping, &meta).unwrap_err();
        prop_assert_eq!(err, MappingError::invalid_parent_relation("parent", class.as_str()));
    }

    #[test]
    fn prop_completeness_lists_exactly_missing_roles(
        parent in any::<bool>(),
        left in any::<bool>(),
        right in any::<bool>(),
        level in any::<bool>(),
    ) {
        let mut config = FieldRoleConfig::new();
        if parent { config.set(TreeRole::Parent, "parent"); }
        if left { config.set(TreeRole::Left, "lft"); }
        if right { config.set(TreeRole::Right, "rgt"); }
        if level { config.set(TreeRole::Level, "lvl"); }

        let mut expected = Vec::new();
        if !parent { expected.push("ancestor"); }
        if !left { expected.push("left"); }
        if !right { expected.push("right"); }

        let empty = config.is_empty();
        match validate_completeness("Node", config) {
            Ok(_) => prop_assert!(empty || expected.is_empty()),
            Err(MappingError::MissingRoleFields { missing, .. }) => {
                prop_assert!(!empty);
                prop_assert_eq!(missing, expected);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}
