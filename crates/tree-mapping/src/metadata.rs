//! Class metadata as seen by the tree driver
//!
//! The persistence framework owns the real class metadata. The driver only
//! needs a class name and the declared column type of a field, so that is all
//! [`ClassMetadata`] exposes.

use crate::mapping::MappingDescription;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Declared storage type of a mapped field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `integer`
    Integer,
    /// `smallint`
    SmallInt,
    /// `bigint`
    BigInt,
    /// `string`
    String,
    /// `text`
    Text,
    /// `boolean`
    Boolean,
    /// `decimal`
    Decimal,
    /// `float`
    Float,
    /// `date`
    Date,
    /// `time`
    Time,
    /// `datetime`
    DateTime,
    /// `array`
    Array,
    /// `object`
    Object,
    /// Any type name the driver does not know
    Other(String),
}

impl ScalarKind {
    /// Kinds accepted for nested-set bounds and level
    pub const INTEGER_KINDS: [Self; 3] = [Self::Integer, Self::SmallInt, Self::BigInt];

    /// Type name as written in mapping files
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Integer => "integer",
            Self::SmallInt => "smallint",
            Self::BigInt => "bigint",
            Self::String => "string",
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::Array => "array",
            Self::Object => "object",
            Self::Other(name) => name,
        }
    }

    /// Integer-like column
    #[inline]
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer | Self::SmallInt | Self::BigInt)
    }
}

impl FromStr for ScalarKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "integer" => Self::Integer,
            "smallint" => Self::SmallInt,
            "bigint" => Self::BigInt,
            "string" => Self::String,
            "text" => Self::Text,
            "boolean" => Self::Boolean,
            "decimal" => Self::Decimal,
            "float" => Self::Float,
            "date" => Self::Date,
            "time" => Self::Time,
            "datetime" => Self::DateTime,
            "array" => Self::Array,
            "object" => Self::Object,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ScalarKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ScalarKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(match name.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        })
    }
}

/// Class metadata capability consumed by the driver
pub trait ClassMetadata {
    /// Fully-qualified class name
    fn class_name(&self) -> &str;

    /// Declared storage type of field, `None` if the field is not mapped
    fn declared_type(&self, field: &str) -> Option<ScalarKind>;
}

impl<M: ClassMetadata + ?Sized> ClassMetadata for &M {
    fn class_name(&self) -> &str {
        (**self).class_name()
    }

    fn declared_type(&self, field: &str) -> Option<ScalarKind> {
        (**self).declared_type(field)
    }
}

/// Metadata derived from a class's own mapping description
///
/// Mirrors what the framework builds from the same file: every entry under
/// `fields` with its `type`, defaulting to `string` when omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingClassMetadata {
    class_name: String,
    field_types: HashMap<String, ScalarKind>,
}

impl MappingClassMetadata {
    /// Create metadata with no fields
    #[inline]
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            field_types: HashMap::new(),
        }
    }

    /// Build metadata from a loaded mapping
    #[must_use]
    pub fn from_description(class_name: impl Into<String>, mapping: &MappingDescription) -> Self {
        let field_types = mapping
            .fields
            .iter()
            .map(|(name, field)| {
                let kind = field.declared_type.clone().unwrap_or(ScalarKind::String);
                (name.clone(), kind)
            })
            .collect();
        Self {
            class_name: class_name.into(),
            field_types,
        }
    }

    /// Add or replace a field type
    #[inline]
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, kind: ScalarKind) -> Self {
        self.field_types.insert(field.into(), kind);
        self
    }
}

impl ClassMetadata for MappingClassMetadata {
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn declared_type(&self, field: &str) -> Option<ScalarKind> {
        self.field_types.get(field).cloned()
    }
}
