//! Tree role extraction and completeness validation
//!
//! Extraction reads one class's mapping and returns the roles it declares.
//! Validation takes that result and checks the mandatory roles are present.
//!
//! ```text
//! MappingDescription + ClassMetadata → extract_roles → FieldRoleConfig → validate_completeness
//! ```

use crate::config::TagPolicy;
use crate::error::MappingError;
use crate::mapping::MappingDescription;
use crate::metadata::ClassMetadata;
use crate::role::{FieldRoleConfig, RoleTag, TreeRole};

/// Tags valid on plain fields
const FIELD_TAGS: [RoleTag; 3] = [RoleTag::TreeLeft, RoleTag::TreeRight, RoleTag::TreeLevel];

/// Role extractor with a fixed tag policy
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleExtractor {
    policy: TagPolicy,
}

impl RoleExtractor {
    /// Create extractor with policy
    #[inline]
    #[must_use]
    pub const fn new(policy: TagPolicy) -> Self {
        Self { policy }
    }

    /// Collect tree roles declared by a class mapping
    ///
    /// # Arguments
    /// * `class_name` - Class under inspection, also the required parent target
    /// * `mapping` - The class's mapping description
    /// * `metadata` - Declared field types
    ///
    /// # Returns
    /// Roles found; empty if the class declares none
    ///
    /// # Errors
    /// - `MappingError::InvalidFieldType` if a bound or level field is not an integer column
    /// - `MappingError::InvalidParentRelation` if the parent relation targets another class
    /// - `MappingError::ConflictingRoleTags` / `DuplicateRole` under `TagPolicy::Strict`
    ///
    /// Under `TagPolicy::LastWins` a field with several tree tags takes the
    /// first of left, right, level, and a role declared twice goes to the
    /// later declaration.
    pub fn extract_roles<M>(
        &self,
        class_name: &str,
        mapping: &MappingDescription,
        metadata: &M,
    ) -> Result<FieldRoleConfig, MappingError>
    where
        M: ClassMetadata + ?Sized,
    {
        let mut config = FieldRoleConfig::new();

        for (field, declaration) in &mapping.fields {
            let tags: Vec<RoleTag> = FIELD_TAGS
                .into_iter()
                .filter(|tag| declaration.tags.contains(*tag))
                .collect();

            if declaration.tags.contains(RoleTag::TreeParent) {
                tracing::debug!(
                    "Ignoring treeParent on plain field {} of {}; parent must be a relation",
                    field,
                    class_name
                );
            }

            if tags.len() > 1 && self.policy == TagPolicy::Strict {
                return Err(MappingError::ConflictingRoleTags {
                    field: field.clone(),
                    class: class_name.to_string(),
                    tags,
                });
            }

            // first tag in left, right, level order
            let Some(role) = tags.first().map(|tag| tag.role()) else {
                continue;
            };
            if tags.len() > 1 {
                tracing::warn!(
                    "Field {} of {} carries {:?}; using {} only",
                    field,
                    class_name,
                    tags,
                    role
                );
            }

            let valid = metadata
                .declared_type(field)
                .is_some_and(|kind| kind.is_integer());
            if !valid {
                return Err(MappingError::invalid_field_type(role, field, class_name));
            }
            self.assign(&mut config, role, field, class_name)?;
        }

        for (field, relation) in &mapping.many_to_one {
            if !relation.tags.contains(RoleTag::TreeParent) {
                continue;
            }
            if relation.target_entity.as_deref() != Some(class_name) {
                return Err(MappingError::invalid_parent_relation(field, class_name));
            }
            self.assign(&mut config, TreeRole::Parent, field, class_name)?;
        }

        tracing::debug!("Extracted tree roles for {}: {:?}", class_name, config);
        Ok(config)
    }

    fn assign(
        &self,
        config: &mut FieldRoleConfig,
        role: TreeRole,
        field: &str,
        class_name: &str,
    ) -> Result<(), MappingError> {
        let previous = config.get(role).filter(|first| *first != field).map(str::to_owned);

        match previous {
            Some(first) if self.policy == TagPolicy::Strict => Err(MappingError::DuplicateRole {
                role,
                first,
                second: field.to_string(),
                class: class_name.to_string(),
            }),
            previous => {
                if let Some(first) = previous {
                    tracing::warn!(
                        "Tree {} role of {} moved from {} to {}",
                        role,
                        class_name,
                        first,
                        field
                    );
                }
                config.set(role, field);
                Ok(())
            }
        }
    }
}

/// Collect tree roles with the strict tag policy
///
/// See [`RoleExtractor::extract_roles`].
pub fn extract_roles<M>(
    class_name: &str,
    mapping: &MappingDescription,
    metadata: &M,
) -> Result<FieldRoleConfig, MappingError>
where
    M: ClassMetadata + ?Sized,
{
    RoleExtractor::default().extract_roles(class_name, mapping, metadata)
}

/// Check a non-empty configuration declares every mandatory role
///
/// An empty configuration means the class is not a tree and passes untouched.
///
/// # Errors
/// - `MappingError::MissingRoleFields` listing every missing role
pub fn validate_completeness(
    class_name: &str,
    config: FieldRoleConfig,
) -> Result<FieldRoleConfig, MappingError> {
    if config.is_empty() {
        return Ok(config);
    }

    let missing: Vec<&'static str> = config
        .missing_mandatory()
        .into_iter()
        .map(TreeRole::missing_label)
        .collect();

    if missing.is_empty() {
        Ok(config)
    } else {
        Err(MappingError::MissingRoleFields {
            class: class_name.to_string(),
            missing,
        })
    }
}
