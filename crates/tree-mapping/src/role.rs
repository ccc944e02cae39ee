//! Tree roles and the role tags that declare them
//!
//! A mapping file marks fields with tags such as `treeLeft`; extraction turns
//! those tags into a [`FieldRoleConfig`] naming which field plays which role.

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Structural responsibility a field plays in a nested-set tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeRole {
    /// Self-referencing relation to the parent node
    Parent,
    /// Left nested-set bound
    Left,
    /// Right nested-set bound
    Right,
    /// Depth of the node
    Level,
}

impl TreeRole {
    /// Roles that must all be present once any role is declared
    pub const MANDATORY: [Self; 3] = [Self::Parent, Self::Left, Self::Right];

    /// Role name as used in configuration keys
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Left => "left",
            Self::Right => "right",
            Self::Level => "level",
        }
    }

    /// Label used when reporting the role as missing
    #[inline]
    #[must_use]
    pub const fn missing_label(self) -> &'static str {
        match self {
            Self::Parent => "ancestor",
            other => other.as_str(),
        }
    }

    /// Whether the role must be backed by an integer column
    #[inline]
    #[must_use]
    pub const fn requires_integer(self) -> bool {
        !matches!(self, Self::Parent)
    }
}

impl fmt::Display for TreeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag attached to a declaration in a mapping file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoleTag {
    /// `treeLeft`
    TreeLeft,
    /// `treeRight`
    TreeRight,
    /// `treeLevel`
    TreeLevel,
    /// `treeParent`
    TreeParent,
}

impl RoleTag {
    /// All known tags
    pub const ALL: [Self; 4] = [
        Self::TreeLeft,
        Self::TreeRight,
        Self::TreeLevel,
        Self::TreeParent,
    ];

    /// Spelling in mapping files
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TreeLeft => "treeLeft",
            Self::TreeRight => "treeRight",
            Self::TreeLevel => "treeLevel",
            Self::TreeParent => "treeParent",
        }
    }

    /// Role this tag assigns
    #[inline]
    #[must_use]
    pub const fn role(self) -> TreeRole {
        match self {
            Self::TreeLeft => TreeRole::Left,
            Self::TreeRight => TreeRole::Right,
            Self::TreeLevel => TreeRole::Level,
            Self::TreeParent => TreeRole::Parent,
        }
    }
}

impl fmt::Display for RoleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for tag names this driver does not own
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

impl FromStr for RoleTag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

/// Set of tree tags carried by one declaration
///
/// Deserializes from the `gedmo` entry of a mapping declaration, in list or
/// map form. Tags owned by other extensions (`sluggable`, `timestampable`)
/// share that entry and are dropped here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleTags(BTreeSet<RoleTag>);

impl RoleTags {
    /// Create empty tag set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check membership
    #[inline]
    #[must_use]
    pub fn contains(&self, tag: RoleTag) -> bool {
        self.0.contains(&tag)
    }

    /// Number of tree tags
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// No tree tags
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate tags in declaration-independent order
    pub fn iter(&self) -> impl Iterator<Item = RoleTag> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<RoleTag> for RoleTags {
    fn from_iter<I: IntoIterator<Item = RoleTag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for RoleTags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(tag_names(&raw)
            .filter_map(|name| name.parse::<RoleTag>().ok())
            .collect())
    }
}

/// Tag names in a `gedmo` value
///
/// Extensions use both the list form (`[treeLeft, sluggable]`) and the map
/// form (`{timestampable: {on: create}}`), and lists may mix bare names with
/// single-key maps. Other shapes carry no tag names.
fn tag_names(value: &Value) -> Box<dyn Iterator<Item = &str> + '_> {
    match value {
        Value::String(name) => Box::new(std::iter::once(name.as_str())),
        Value::Sequence(entries) => Box::new(entries.iter().flat_map(tag_names)),
        Value::Mapping(entries) => Box::new(entries.keys().filter_map(Value::as_str)),
        Value::Tagged(tagged) => tag_names(&tagged.value),
        _ => Box::new(std::iter::empty()),
    }
}

/// Role → field name assignment for one class
///
/// Empty means the class is not a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRoleConfig {
    /// Parent relation field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Left bound field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    /// Right bound field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    /// Depth field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl FieldRoleConfig {
    /// Create empty configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Field assigned to role
    #[inline]
    #[must_use]
    pub fn get(&self, role: TreeRole) -> Option<&str> {
        self.slot(role).as_deref()
    }

    /// Assign role, returning the previously assigned field
    pub fn set(&mut self, role: TreeRole, field: impl Into<String>) -> Option<String> {
        self.slot_mut(role).replace(field.into())
    }

    /// Builder-style assignment
    #[inline]
    #[must_use]
    pub fn with(mut self, role: TreeRole, field: impl Into<String>) -> Self {
        self.set(role, field);
        self
    }

    /// Whether role has a field
    #[inline]
    #[must_use]
    pub fn contains(&self, role: TreeRole) -> bool {
        self.slot(role).is_some()
    }

    /// No role assigned
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_none() && self.left.is_none() && self.right.is_none() && self.level.is_none()
    }

    /// Mandatory roles without a field, in check order
    #[must_use]
    pub fn missing_mandatory(&self) -> Vec<TreeRole> {
        TreeRole::MANDATORY
            .into_iter()
            .filter(|role| !self.contains(*role))
            .collect()
    }

    /// Assigned (role, field) pairs
    pub fn iter(&self) -> impl Iterator<Item = (TreeRole, &str)> + '_ {
        [TreeRole::Parent, TreeRole::Left, TreeRole::Right, TreeRole::Level]
            .into_iter()
            .filter_map(|role| self.get(role).map(|field| (role, field)))
    }

    fn slot(&self, role: TreeRole) -> &Option<String> {
        match role {
            TreeRole::Parent => &self.parent,
            TreeRole::Left => &self.left,
            TreeRole::Right => &self.right,
            TreeRole::Level => &self.level,
        }
    }

    fn slot_mut(&mut self, role: TreeRole) -> &mut Option<String> {
        match role {
            TreeRole::Parent => &mut self.parent,
            TreeRole::Left => &mut self.left,
            TreeRole::Right => &mut self.right,
            TreeRole::Level => &mut self.level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_parsing() {
        assert_eq!("treeLeft".parse::<RoleTag>(), Ok(RoleTag::TreeLeft));
        assert_eq!("treeParent".parse::<RoleTag>(), Ok(RoleTag::TreeParent));
        assert!("sluggable".parse::<RoleTag>().is_err());
        assert!("treeleft".parse::<RoleTag>().is_err());
    }

    #[test]
    fn tags_deserialize_skips_foreign_tags() {
        let tags: RoleTags = serde_yaml::from_str("[sluggable, treeRight]").unwrap();
        assert_eq!(tags.len(), 1);
        assert!(tags.contains(RoleTag::TreeRight));

        let none: RoleTags = serde_yaml::from_str("~").unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn tags_deserialize_map_form() {
        let foreign: RoleTags =
            serde_yaml::from_str("timestampable: { on: create }").unwrap();
        assert!(foreign.is_empty());

        let tags: RoleTags =
            serde_yaml::from_str("treeLeft: ~\nblameable: { on: update }").unwrap();
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec![RoleTag::TreeLeft]);
    }

    #[test]
    fn tags_deserialize_list_with_map_entries() {
        let tags: RoleTags =
            serde_yaml::from_str("[{ sluggable: { position: 0 } }, treeLeft, 3]").unwrap();
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec![RoleTag::TreeLeft]);

        let scalar: RoleTags = serde_yaml::from_str("42").unwrap();
        assert!(scalar.is_empty());
    }

    #[test]
    fn missing_labels() {
        assert_eq!(TreeRole::Parent.missing_label(), "ancestor");
        assert_eq!(TreeRole::Left.missing_label(), "left");
        assert!(!TreeRole::Parent.requires_integer());
        assert!(TreeRole::Level.requires_integer());
    }

    #[test]
    fn config_set_returns_previous() {
        let mut config = FieldRoleConfig::new();
        assert!(config.is_empty());
        assert_eq!(config.set(TreeRole::Left, "lft"), None);
        assert_eq!(config.set(TreeRole::Left, "l"), Some("lft".to_string()));
        assert_eq!(config.get(TreeRole::Left), Some("l"));
        assert!(!config.is_empty());
    }

    #[test]
    fn config_missing_mandatory_order() {
        let config = FieldRoleConfig::new().with(TreeRole::Level, "lvl");
        assert_eq!(
            config.missing_mandatory(),
            vec![TreeRole::Parent, TreeRole::Left, TreeRole::Right]
        );
    }

    #[test]
    fn config_iter_skips_unset() {
        let config = FieldRoleConfig::new()
            .with(TreeRole::Right, "rgt")
            .with(TreeRole::Parent, "parent");
        let pairs: Vec<_> = config.iter().collect();
        assert_eq!(pairs, vec![(TreeRole::Parent, "parent"), (TreeRole::Right, "rgt")]);
    }
}
