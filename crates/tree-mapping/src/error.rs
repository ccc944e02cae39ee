//! Error types for tree mapping extraction
//!
//! Provides error handling for:
//! - Role validation (field types, parent relation, completeness)
//! - Mapping loading (file lookup, YAML syntax, missing classes)

use crate::role::{RoleTag, TreeRole};
use std::path::PathBuf;
use std::sync::Arc;

/// Errors raised while extracting or validating tree roles
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// A non-empty configuration lacks mandatory roles
    #[error("Missing properties: {} in class - {class}", .missing.join(", "))]
    MissingRoleFields {
        /// Class under inspection
        class: String,
        /// Labels of the missing roles, in check order
        missing: Vec<&'static str>,
    },

    /// A bound or level field is not declared with an integer type
    #[error("Tree {role} field - [{field}] type is not valid and must be 'integer' in class - {class}")]
    InvalidFieldType {
        /// Role the field was tagged with
        role: TreeRole,
        /// Offending field
        field: String,
        /// Class under inspection
        class: String,
    },

    /// The parent relation does not point back to the declaring class
    #[error("Unable to find ancestor/parent child relation through ancestor field - [{field}] in class - {class}")]
    InvalidParentRelation {
        /// Offending relation field
        field: String,
        /// Class under inspection
        class: String,
    },

    /// One field carries more than one tree tag
    #[error("Field - [{field}] carries conflicting tree tags {tags:?} in class - {class}")]
    ConflictingRoleTags {
        /// Offending field
        field: String,
        /// Class under inspection
        class: String,
        /// Every tree tag found on the field
        tags: Vec<RoleTag>,
    },

    /// Two fields claim the same role
    #[error("Tree {role} role is declared by both [{first}] and [{second}] in class - {class}")]
    DuplicateRole {
        /// Role claimed twice
        role: TreeRole,
        /// Field recorded first
        first: String,
        /// Field that tried to claim the role again
        second: String,
        /// Class under inspection
        class: String,
    },
}

impl MappingError {
    /// Create invalid field type error
    pub fn invalid_field_type(
        role: TreeRole,
        field: impl Into<String>,
        class: impl Into<String>,
    ) -> Self {
        Self::InvalidFieldType {
            role,
            field: field.into(),
            class: class.into(),
        }
    }

    /// Create invalid parent relation error
    pub fn invalid_parent_relation(field: impl Into<String>, class: impl Into<String>) -> Self {
        Self::InvalidParentRelation {
            field: field.into(),
            class: class.into(),
        }
    }

    /// Class the error refers to
    #[must_use]
    pub fn class(&self) -> &str {
        match self {
            Self::MissingRoleFields { class, .. }
            | Self::InvalidFieldType { class, .. }
            | Self::InvalidParentRelation { class, .. }
            | Self::ConflictingRoleTags { class, .. }
            | Self::DuplicateRole { class, .. } => class,
        }
    }
}

/// Errors while locating or parsing mapping files
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// No mapping file for class in any configured path
    #[error("no mapping file found for class '{class}' (looked for '{file_name}' in {searched:?})")]
    MappingFileNotFound {
        /// Requested class
        class: String,
        /// File name derived from the class name
        file_name: String,
        /// Directories searched, in order
        searched: Vec<PathBuf>,
    },

    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Mapping file is not valid YAML or has an unexpected shape
    #[error("syntax error in {path}: {message}")]
    Syntax {
        /// File being parsed
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Mapping document does not contain the class
    #[error("class '{class}' is not mapped in {source_name}")]
    ClassNotMapped {
        /// Requested class
        class: String,
        /// File path or document label
        source_name: String,
    },

    /// Mapping file exceeds configured size limit
    #[error("mapping file {path} too large: {size} bytes (max: {max})")]
    FileTooLarge {
        /// File being read
        path: PathBuf,
        /// Actual size
        size: u64,
        /// Configured maximum
        max: u64,
    },

    /// Driver configuration could not be read
    #[error("invalid driver configuration: {0}")]
    Config(String),
}

impl LoadError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create syntax error for path
    pub fn syntax_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Syntax {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Combined tree mapping error
#[derive(Debug, thiserror::Error)]
pub enum TreeMappingError {
    /// Loading the mapping failed
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// The mapping was loaded but is not a valid tree
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Failure of a lookup another caller was running for the same class
    #[error(transparent)]
    Shared(Arc<TreeMappingError>),
}

impl TreeMappingError {
    /// Take ownership of an error handed out by the cache
    ///
    /// Falls back to [`TreeMappingError::Shared`] while other callers still
    /// hold the same failure.
    #[must_use]
    pub fn from_shared(err: Arc<Self>) -> Self {
        Arc::try_unwrap(err).unwrap_or_else(Self::Shared)
    }

    /// Underlying error, looking through [`TreeMappingError::Shared`]
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Shared(inner) => inner.root(),
            other => other,
        }
    }
}

/// Result type alias for driver operations
pub type TreeMappingResult<T> = Result<T, TreeMappingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_role_fields_display() {
        let err = MappingError::MissingRoleFields {
            class: "Entity\\Category".to_string(),
            missing: vec!["ancestor", "right"],
        };
        assert_eq!(
            err.to_string(),
            "Missing properties: ancestor, right in class - Entity\\Category"
        );
    }

    #[test]
    fn invalid_field_type_display() {
        let err = MappingError::invalid_field_type(TreeRole::Left, "lft", "Category");
        assert_eq!(
            err.to_string(),
            "Tree left field - [lft] type is not valid and must be 'integer' in class - Category"
        );
    }

    #[test]
    fn invalid_parent_relation_display() {
        let err = MappingError::invalid_parent_relation("owner", "Category");
        assert!(err.to_string().contains("ancestor field - [owner]"));
        assert_eq!(err.class(), "Category");
    }

    #[test]
    fn error_conversions() {
        let err: TreeMappingError = MappingError::invalid_parent_relation("p", "C").into();
        assert!(matches!(err, TreeMappingError::Mapping(_)));

        let err: TreeMappingError = LoadError::Config("bad".to_string()).into();
        assert!(matches!(err, TreeMappingError::Load(_)));
    }

    #[test]
    fn shared_errors() {
        let only: Arc<TreeMappingError> = Arc::new(LoadError::Config("bad".to_string()).into());
        assert!(matches!(TreeMappingError::from_shared(only), TreeMappingError::Load(_)));

        let held: Arc<TreeMappingError> =
            Arc::new(MappingError::invalid_parent_relation("owner", "Category").into());
        let err = TreeMappingError::from_shared(Arc::clone(&held));
        assert!(matches!(err, TreeMappingError::Shared(_)));
        assert!(matches!(err.root(), TreeMappingError::Mapping(_)));
        assert_eq!(err.to_string(), held.to_string());
    }
}
