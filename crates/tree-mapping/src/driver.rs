//! Tree mapping driver - main entry point
//!
//! Runs the per-class pipeline the persistence framework invokes while it
//! loads class metadata:
//! - Load the class mapping through a [`MappingLoader`]
//! - Extract tree roles against the class metadata
//! - Validate completeness
//! - Cache the result by class name

use crate::cache::{CacheStats, TreeConfigCache};
use crate::config::DriverConfig;
use crate::error::{TreeMappingError, TreeMappingResult};
use crate::extract::{validate_completeness, RoleExtractor};
use crate::loader::{MappingLoader, YamlFileLoader};
use crate::mapping::MappingDescription;
use crate::metadata::{ClassMetadata, MappingClassMetadata};
use crate::role::FieldRoleConfig;
use std::sync::Arc;

/// Tree mapping driver
///
/// Reads nested-set role configuration for classes from mapping files.
/// Failed lookups are never cached; a fixed mapping is picked up on the next
/// call.
#[derive(Debug, Clone)]
pub struct TreeMappingDriver<L> {
    /// Mapping source
    loader: L,
    /// Role extraction with configured tag policy
    extractor: RoleExtractor,
    /// Validated configurations by class
    cache: TreeConfigCache,
}

impl TreeMappingDriver<YamlFileLoader> {
    /// Create driver reading YAML files described by configuration
    #[must_use]
    pub fn from_config(config: &DriverConfig) -> Self {
        Self::with_config(YamlFileLoader::from_config(config), config)
    }
}

impl<L: MappingLoader> TreeMappingDriver<L> {
    /// Create driver with default configuration
    #[inline]
    #[must_use]
    pub fn new(loader: L) -> Self {
        Self::with_config(loader, &DriverConfig::default())
    }

    /// Create driver with configuration
    #[must_use]
    pub fn with_config(loader: L, config: &DriverConfig) -> Self {
        Self {
            loader,
            extractor: RoleExtractor::new(config.tag_policy),
            cache: match config.cache_ttl() {
                Some(ttl) => TreeConfigCache::with_ttl(config.cache_capacity, ttl),
                None => TreeConfigCache::new(config.cache_capacity),
            },
        }
    }

    /// Read the validated tree configuration of a class
    ///
    /// Concurrent first lookups of one class load its mapping once.
    ///
    /// # Arguments
    /// * `metadata` - Framework metadata of the class, queried for field types
    ///
    /// # Returns
    /// Validated configuration; empty if the class is not a tree
    ///
    /// # Errors
    /// - `TreeMappingError::Load` if the mapping cannot be loaded
    /// - `TreeMappingError::Mapping` if the mapping declares an invalid tree
    /// - `TreeMappingError::Shared` wrapping either of the above when a
    ///   concurrent lookup of the same class failed
    pub fn read_tree_config<M>(&self, metadata: &M) -> TreeMappingResult<Arc<FieldRoleConfig>>
    where
        M: ClassMetadata + ?Sized,
    {
        let class_name = metadata.class_name();
        self.cache
            .try_get_or_insert_with(class_name, || self.build(class_name, metadata))
            .map_err(TreeMappingError::from_shared)
    }

    /// Read the tree configuration using metadata derived from the mapping itself
    ///
    /// # Errors
    /// Same as [`Self::read_tree_config`]
    pub fn read_tree_config_for(&self, class_name: &str) -> TreeMappingResult<Arc<FieldRoleConfig>> {
        self.cache
            .try_get_or_insert_with(class_name, || {
                let mapping = self.loader.load(class_name)?;
                let metadata = MappingClassMetadata::from_description(class_name, &mapping);
                self.extract_and_validate(class_name, &mapping, &metadata)
            })
            .map_err(TreeMappingError::from_shared)
    }

    /// Whether the class is configured as a tree
    ///
    /// # Errors
    /// Same as [`Self::read_tree_config`]
    pub fn is_tree<M>(&self, metadata: &M) -> TreeMappingResult<bool>
    where
        M: ClassMetadata + ?Sized,
    {
        Ok(!self.read_tree_config(metadata)?.is_empty())
    }

    /// Whether a configuration for class is cached
    #[inline]
    #[must_use]
    pub fn is_cached(&self, class_name: &str) -> bool {
        self.cache.contains(class_name)
    }

    /// Drop cached configuration of class
    #[inline]
    pub fn invalidate(&self, class_name: &str) {
        self.cache.invalidate(class_name);
    }

    /// Drop every cached configuration
    #[inline]
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Cache statistics
    #[inline]
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn build<M>(&self, class_name: &str, metadata: &M) -> TreeMappingResult<FieldRoleConfig>
    where
        M: ClassMetadata + ?Sized,
    {
        let mapping = self.loader.load(class_name)?;
        self.extract_and_validate(class_name, &mapping, metadata)
    }

    fn extract_and_validate<M>(
        &self,
        class_name: &str,
        mapping: &MappingDescription,
        metadata: &M,
    ) -> TreeMappingResult<FieldRoleConfig>
    where
        M: ClassMetadata + ?Sized,
    {
        let result = self
            .extractor
            .extract_roles(class_name, mapping, metadata)
            .and_then(|config| validate_completeness(class_name, config));

        match result {
            Ok(config) if config.is_empty() => {
                tracing::debug!("{} declares no tree roles", class_name);
                Ok(config)
            }
            Ok(config) => {
                tracing::info!("Tree configuration for {}: {:?}", class_name, config);
                Ok(config)
            }
            Err(e) => {
                tracing::warn!("Rejected tree mapping of {}: {}", class_name, e);
                Err(e.into())
            }
        }
    }
}
