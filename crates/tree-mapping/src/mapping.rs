//! Parsed mapping descriptions
//!
//! A mapping document is a YAML table keyed by class name:
//!
//! ```yaml
//! Entity\Category:
//!   type: entity
//!   fields:
//!     lft:
//!       type: integer
//!       gedmo:
//!         - treeLeft
//!   manyToOne:
//!     parent:
//!       targetEntity: Entity\Category
//!       gedmo:
//!         - treeParent
//! ```
//!
//! Keys the tree driver does not read (`table`, `id`, `oneToMany`, ...) are
//! accepted and ignored. Declaration order is preserved.

use crate::error::LoadError;
use crate::metadata::ScalarKind;
use crate::role::RoleTags;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// Plain field declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldDeclaration {
    /// Declared column type
    #[serde(rename = "type")]
    pub declared_type: Option<ScalarKind>,
    /// Tree tags under `gedmo`
    #[serde(rename = "gedmo")]
    pub tags: RoleTags,
}

/// To-one relation declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RelationDeclaration {
    /// Class the relation points to
    #[serde(rename = "targetEntity")]
    pub target_entity: Option<String>,
    /// Tree tags under `gedmo`
    #[serde(rename = "gedmo")]
    pub tags: RoleTags,
}

/// Mapping of one class
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MappingDescription {
    /// Plain fields by name
    #[serde(deserialize_with = "entries_or_default")]
    pub fields: IndexMap<String, FieldDeclaration>,
    /// To-one relations by field name
    #[serde(rename = "manyToOne", deserialize_with = "entries_or_default")]
    pub many_to_one: IndexMap<String, RelationDeclaration>,
}

impl MappingDescription {
    /// Create empty description
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add field declaration
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, field: FieldDeclaration) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Add to-one relation declaration
    #[must_use]
    pub fn with_many_to_one(
        mut self,
        name: impl Into<String>,
        relation: RelationDeclaration,
    ) -> Self {
        self.many_to_one.insert(name.into(), relation);
        self
    }

    /// Neither fields nor relations declared
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.many_to_one.is_empty()
    }
}

/// Treats `~` entries and a `~` table as empty declarations
fn entries_or_default<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let raw = Option::<IndexMap<String, Option<T>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(name, decl)| (name, decl.unwrap_or_default()))
        .collect())
}

/// Parsed mapping file: descriptions keyed by class name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingDocument {
    classes: IndexMap<String, MappingDescription>,
}

impl MappingDocument {
    /// Parse YAML mapping content
    ///
    /// `source` names the file in error messages.
    ///
    /// # Errors
    /// - `LoadError::Syntax` if the content is not YAML, is empty, or is not
    ///   a table of class mappings
    pub fn parse(content: &str, source: impl AsRef<Path>) -> Result<Self, LoadError> {
        let source = source.as_ref();
        let raw: Option<IndexMap<String, Option<MappingDescription>>> =
            serde_yaml::from_str(content).map_err(|e| {
                LoadError::syntax_error(source, format!("YAML parse error: {e}"))
            })?;

        let raw = raw.ok_or_else(|| LoadError::syntax_error(source, "empty mapping document"))?;

        Ok(Self {
            classes: raw
                .into_iter()
                .map(|(class, mapping)| (class, mapping.unwrap_or_default()))
                .collect(),
        })
    }

    /// Mapping for class
    #[inline]
    #[must_use]
    pub fn get(&self, class_name: &str) -> Option<&MappingDescription> {
        self.classes.get(class_name)
    }

    /// Take mapping for class
    ///
    /// # Errors
    /// - `LoadError::ClassNotMapped` if the document has no entry for the class
    pub fn into_description(
        mut self,
        class_name: &str,
        source_name: impl Into<String>,
    ) -> Result<MappingDescription, LoadError> {
        self.classes
            .swap_remove(class_name)
            .ok_or_else(|| LoadError::ClassNotMapped {
                class: class_name.to_string(),
                source_name: source_name.into(),
            })
    }

    /// Consume into (class name, mapping) pairs in file order
    pub fn into_entries(self) -> impl Iterator<Item = (String, MappingDescription)> {
        self.classes.into_iter()
    }

    /// Number of mapped classes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// No classes mapped
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
