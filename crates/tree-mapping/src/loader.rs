//! Mapping loaders
//!
//! Provides the [`MappingLoader`] capability and two implementations:
//! - [`YamlFileLoader`] reads `<Namespace.Class>.dcm.yml` files from disk
//! - [`InMemoryLoader`] serves already-parsed documents

use crate::config::{DriverConfig, DEFAULT_FILE_EXTENSION};
use crate::error::LoadError;
use crate::mapping::{MappingDescription, MappingDocument};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Source of per-class mapping descriptions
///
/// Implement this trait to feed mappings from another location or format.
pub trait MappingLoader: Send + Sync {
    /// Load the mapping of class
    ///
    /// # Errors
    /// Any [`LoadError`] the source produces
    fn load(&self, class_name: &str) -> Result<MappingDescription, LoadError>;
}

impl<L: MappingLoader + ?Sized> MappingLoader for Box<L> {
    fn load(&self, class_name: &str) -> Result<MappingDescription, LoadError> {
        (**self).load(class_name)
    }
}

/// File name holding the mapping of class
///
/// Namespace separators become dots: `Entity\Category` → `Entity.Category.dcm.yml`.
#[must_use]
pub fn mapping_file_name(class_name: &str, extension: &str) -> String {
    format!("{}{}", class_name.replace('\\', "."), extension)
}

/// Loader reading one YAML mapping file per class
#[derive(Debug, Clone)]
pub struct YamlFileLoader {
    paths: Vec<PathBuf>,
    extension: String,
    max_file_size: u64,
}

impl YamlFileLoader {
    /// Create loader over directories
    #[must_use]
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let defaults = DriverConfig::default();
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            extension: DEFAULT_FILE_EXTENSION.to_string(),
            max_file_size: defaults.max_file_size,
        }
    }

    /// Create loader from driver configuration
    #[must_use]
    pub fn from_config(config: &DriverConfig) -> Self {
        Self {
            paths: config.mapping_paths.clone(),
            extension: config.file_extension.clone(),
            max_file_size: config.max_file_size,
        }
    }

    /// With file extension
    #[inline]
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Searched directories
    #[inline]
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Locate mapping file for class
    ///
    /// # Errors
    /// - `LoadError::MappingFileNotFound` if no directory contains the file
    pub fn find_mapping_file(&self, class_name: &str) -> Result<PathBuf, LoadError> {
        let file_name = mapping_file_name(class_name, &self.extension);
        self.paths
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| LoadError::MappingFileNotFound {
                class: class_name.to_string(),
                file_name,
                searched: self.paths.clone(),
            })
    }

    /// Read and parse a mapping file
    ///
    /// # Errors
    /// - `LoadError::Io` if the file cannot be read
    /// - `LoadError::FileTooLarge` if it exceeds the size limit
    /// - `LoadError::Syntax` if it is not a mapping document
    pub fn load_document(&self, path: &Path) -> Result<MappingDocument, LoadError> {
        let size = std::fs::metadata(path)
            .map_err(|e| LoadError::io_error(path, e))?
            .len();
        if size > self.max_file_size {
            return Err(LoadError::FileTooLarge {
                path: path.to_path_buf(),
                size,
                max: self.max_file_size,
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| LoadError::io_error(path, e))?;
        MappingDocument::parse(&content, path)
    }
}

impl MappingLoader for YamlFileLoader {
    fn load(&self, class_name: &str) -> Result<MappingDescription, LoadError> {
        let path = self.find_mapping_file(class_name)?;
        tracing::debug!("Loading mapping of {} from {}", class_name, path.display());

        let document = self.load_document(&path)?;
        document.into_description(class_name, path.display().to_string())
    }
}

/// Loader over documents held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoader {
    classes: HashMap<String, MappingDescription>,
}

impl InMemoryLoader {
    /// Create empty loader
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create loader from YAML content
    ///
    /// # Errors
    /// - `LoadError::Syntax` if the content is not a mapping document
    pub fn from_yaml_str(content: &str) -> Result<Self, LoadError> {
        let mut loader = Self::new();
        loader.add_yaml_str(content, "<memory>")?;
        Ok(loader)
    }

    /// Add every class of a YAML document
    ///
    /// # Errors
    /// - `LoadError::Syntax` if the content is not a mapping document
    pub fn add_yaml_str(&mut self, content: &str, source: &str) -> Result<(), LoadError> {
        let document = MappingDocument::parse(content, source)?;
        self.add_document(document);
        Ok(())
    }

    /// Add every class of a parsed document
    pub fn add_document(&mut self, document: MappingDocument) {
        self.classes.extend(document.into_entries());
    }

    /// Add single class mapping
    pub fn insert(&mut self, class_name: impl Into<String>, mapping: MappingDescription) {
        self.classes.insert(class_name.into(), mapping);
    }

    /// Number of classes held
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// No classes held
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl MappingLoader for InMemoryLoader {
    fn load(&self, class_name: &str) -> Result<MappingDescription, LoadError> {
        self.classes
            .get(class_name)
            .cloned()
            .ok_or_else(|| LoadError::ClassNotMapped {
                class: class_name.to_string(),
                source_name: "<memory>".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_replaces_namespace_separators() {
        assert_eq!(
            mapping_file_name("App\\Entity\\Category", ".dcm.yml"),
            "App.Entity.Category.dcm.yml"
        );
        assert_eq!(mapping_file_name("Category", ".orm.yml"), "Category.orm.yml");
    }

    #[test]
    fn in_memory_loader() {
        let loader = InMemoryLoader::from_yaml_str(
            "A:\n  fields:\n    x:\n      type: integer\nB: ~\n",
        )
        .unwrap();
        assert_eq!(loader.len(), 2);
        assert!(loader.load("A").unwrap().fields.contains_key("x"));
        assert!(loader.load("B").unwrap().is_empty());
        assert!(matches!(
            loader.load("C"),
            Err(LoadError::ClassNotMapped { .. })
        ));
    }

    #[test]
    fn file_loader_missing_file() {
        let loader = YamlFileLoader::new(["/nonexistent/mappings"]);
        let err = loader.load("Entity\\Category").unwrap_err();
        match err {
            LoadError::MappingFileNotFound { file_name, searched, .. } => {
                assert_eq!(file_name, "Entity.Category.dcm.yml");
                assert_eq!(searched, vec![PathBuf::from("/nonexistent/mappings")]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn file_loader_from_config() {
        let config = DriverConfig::new()
            .with_mapping_path("mappings")
            .with_file_extension(".orm.yml");
        let loader = YamlFileLoader::from_config(&config);
        assert_eq!(loader.paths(), &[PathBuf::from("mappings")]);
        assert_eq!(loader.extension, ".orm.yml");
    }

    #[test]
    fn file_loader_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("Entity.Node.orm.yml"),
            "Entity\\Node:\n  fields:\n    lft: { type: integer, gedmo: [treeLeft] }\n",
        )
        .unwrap();

        let default_ext = YamlFileLoader::new([dir.path()]);
        assert!(matches!(
            default_ext.load("Entity\\Node"),
            Err(LoadError::MappingFileNotFound { .. })
        ));

        let loader = YamlFileLoader::new([dir.path()]).with_extension(".orm.yml");
        let mapping = loader.load("Entity\\Node").unwrap();
        assert!(mapping.fields["lft"].tags.contains(crate::role::RoleTag::TreeLeft));
    }

    #[test]
    fn in_memory_insert_replaces() {
        let mut loader = InMemoryLoader::new();
        assert!(loader.is_empty());

        loader.insert("Node", MappingDescription::new());
        loader.add_yaml_str("Node:\n  fields:\n    x: ~\n", "node.yml").unwrap();
        assert_eq!(loader.len(), 1);
        assert!(loader.load("Node").unwrap().fields.contains_key("x"));
    }
}
