//! Testing utilities for the tree mapping workspace
//!
//! Shared fixtures, metadata helpers, and tracing setup.

#![allow(missing_docs)]

use std::path::Path;
use std::sync::Once;
use tree_mapping::{
    FieldDeclaration, MappingClassMetadata, MappingDescription, RelationDeclaration, RoleTag,
    RoleTags, ScalarKind,
};

/// Complete tree mapping for `Entity\Category`
pub const CATEGORY_YAML: &str = r"
Entity\Category:
  type: entity
  table: categories
  id:
    id:
      type: integer
      generator:
        strategy: AUTO
  fields:
    title:
      type: string
      length: 64
    lft:
      type: integer
      gedmo:
        - treeLeft
    rgt:
      type: integer
      gedmo:
        - treeRight
    lvl:
      type: integer
      gedmo:
        - treeLevel
  manyToOne:
    parent:
      targetEntity: Entity\Category
      inversedBy: children
      gedmo:
        - treeParent
  oneToMany:
    children:
      targetEntity: Entity\Category
      mappedBy: parent
";

/// Mapping without any tree tags
pub const ARTICLE_YAML: &str = r"
Entity\Article:
  type: entity
  fields:
    title:
      type: string
      gedmo:
        - sluggable
    views:
      type: integer
  manyToOne:
    category:
      targetEntity: Entity\Category
";

static TRACING: Once = Once::new();

/// Install a test subscriber honouring `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn tagged_field(kind: ScalarKind, tags: &[RoleTag]) -> FieldDeclaration {
    FieldDeclaration {
        declared_type: Some(kind),
        tags: tags.iter().copied().collect::<RoleTags>(),
    }
}

pub fn parent_relation(target: &str) -> RelationDeclaration {
    RelationDeclaration {
        target_entity: Some(target.to_string()),
        tags: [RoleTag::TreeParent].into_iter().collect(),
    }
}

/// Mapping with left/right/level fields of the given kinds and a parent relation
pub fn nested_set_mapping(class_name: &str, bound_kind: ScalarKind) -> MappingDescription {
    MappingDescription::new()
        .with_field("lft", tagged_field(bound_kind.clone(), &[RoleTag::TreeLeft]))
        .with_field("rgt", tagged_field(bound_kind.clone(), &[RoleTag::TreeRight]))
        .with_field("lvl", tagged_field(bound_kind, &[RoleTag::TreeLevel]))
        .with_many_to_one("parent", parent_relation(class_name))
}

pub fn metadata_for(class_name: &str, mapping: &MappingDescription) -> MappingClassMetadata {
    MappingClassMetadata::from_description(class_name, mapping)
}

/// Write a mapping file named after the class into `dir`
pub fn write_mapping_file(dir: &Path, class_name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(tree_mapping::loader::mapping_file_name(
        class_name,
        tree_mapping::config::DEFAULT_FILE_EXTENSION,
    ));
    std::fs::write(&path, content).unwrap();
    path
}
