//! Nested-set tree mapping driver
//!
//! Extracts and validates the fields that implement a nested-set tree
//! (parent relation, left and right bounds, optional level) from declarative
//! YAML mapping files, for use by a persistence framework while it loads
//! class metadata.
//!
//! # Core Operations
//!
//! - **Extract**: read tagged fields and relations of one class into a
//!   [`FieldRoleConfig`], checking column types and the parent target
//! - **Validate**: reject a configuration that declares some tree roles but
//!   not all mandatory ones
//!
//! # Architecture
//!
//! ```text
//! mapping file → MappingLoader → MappingDescription ─┐
//!                                                    ├→ extract_roles → validate_completeness → FieldRoleConfig
//!                               ClassMetadata ───────┘                                            ↓
//!                                                                                          TreeConfigCache
//! ```
//!
//! # Example
//!
//! ```rust
//! use tree_mapping::{extract_roles, validate_completeness, MappingClassMetadata, MappingDocument};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let yaml = r"
//! Category:
//!   fields:
//!     lft: { type: integer, gedmo: [treeLeft] }
//!     rgt: { type: integer, gedmo: [treeRight] }
//!   manyToOne:
//!     parent: { targetEntity: Category, gedmo: [treeParent] }
//! ";
//! let mapping = MappingDocument::parse(yaml, "Category.dcm.yml")?
//!     .into_description("Category", "Category.dcm.yml")?;
//! let metadata = MappingClassMetadata::from_description("Category", &mapping);
//!
//! let config = extract_roles("Category", &mapping, &metadata)?;
//! let config = validate_completeness("Category", config)?;
//! assert_eq!(config.left.as_deref(), Some("lft"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod cache;
pub mod config;
pub mod driver;
pub mod error;
pub mod extract;
pub mod loader;
pub mod mapping;
pub mod metadata;
pub mod role;

// Re-exports for convenience
pub use cache::{CacheStats, TreeConfigCache};
pub use config::{DriverConfig, TagPolicy};
pub use driver::TreeMappingDriver;
pub use error::{LoadError, MappingError, TreeMappingError, TreeMappingResult};
pub use extract::{extract_roles, validate_completeness, RoleExtractor};
pub use loader::{InMemoryLoader, MappingLoader, YamlFileLoader};
pub use mapping::{FieldDeclaration, MappingDescription, MappingDocument, RelationDeclaration};
pub use metadata::{ClassMetadata, MappingClassMetadata, ScalarKind};
pub use role::{FieldRoleConfig, RoleTag, RoleTags, TreeRole};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the tree mapping driver
    pub use crate::config::{DriverConfig, TagPolicy};
    pub use crate::driver::TreeMappingDriver;
    pub use crate::error::{LoadError, MappingError, TreeMappingError};
    pub use crate::extract::{extract_roles, validate_completeness};
    pub use crate::loader::{InMemoryLoader, MappingLoader, YamlFileLoader};
    pub use crate::metadata::{ClassMetadata, ScalarKind};
    pub use crate::role::{FieldRoleConfig, TreeRole};
}
