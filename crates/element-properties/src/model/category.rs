//! Primitive type categories.
//!
//! Each category names a scalar kind and declares the native representation
//! a [`PrimitiveValue`](crate::model::PrimitiveValue) must have to be stored
//! under it.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PropertyError;
use crate::model::native::PrimitiveKind;

/// Scalar kinds supported by a primitive property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PrimitiveTypeCategory {
    Unknown = 0,
    Boolean = 1,
    Byte = 2,
    Char = 3,
    Short = 4,
    Int = 5,
    Long = 6,
    Float = 7,
    Double = 8,
    BigInteger = 9,
    BigDecimal = 10,
    String = 11,
    Date = 12,
}

/// Every category, in ordinal order.
pub const ALL_CATEGORIES: [PrimitiveTypeCategory; 13] = [
    PrimitiveTypeCategory::Unknown,
    PrimitiveTypeCategory::Boolean,
    PrimitiveTypeCategory::Byte,
    PrimitiveTypeCategory::Char,
    PrimitiveTypeCategory::Short,
    PrimitiveTypeCategory::Int,
    PrimitiveTypeCategory::Long,
    PrimitiveTypeCategory::Float,
    PrimitiveTypeCategory::Double,
    PrimitiveTypeCategory::BigInteger,
    PrimitiveTypeCategory::BigDecimal,
    PrimitiveTypeCategory::String,
    PrimitiveTypeCategory::Date,
];

lazy_static! {
    static ref CATEGORY_BY_WIRE_NAME: FxHashMap<&'static str, PrimitiveTypeCategory> =
        ALL_CATEGORIES
            .iter()
            .map(|category| (category.wire_name(), *category))
            .collect();
}

impl PrimitiveTypeCategory {
    /// Creates a category from its ordinal.
    pub fn from_ordinal(v: u8) -> Option<PrimitiveTypeCategory> {
        ALL_CATEGORIES.get(v as usize).copied()
    }

    /// Returns the ordinal of this category.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Returns the display name, also used as the type name of values
    /// built by the property helper.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveTypeCategory::Unknown => "object",
            PrimitiveTypeCategory::Boolean => "boolean",
            PrimitiveTypeCategory::Byte => "byte",
            PrimitiveTypeCategory::Char => "char",
            PrimitiveTypeCategory::Short => "short",
            PrimitiveTypeCategory::Int => "int",
            PrimitiveTypeCategory::Long => "long",
            PrimitiveTypeCategory::Float => "float",
            PrimitiveTypeCategory::Double => "double",
            PrimitiveTypeCategory::BigInteger => "biginteger",
            PrimitiveTypeCategory::BigDecimal => "bigdecimal",
            PrimitiveTypeCategory::String => "string",
            PrimitiveTypeCategory::Date => "date",
        }
    }

    /// Returns the wire name (e.g., `OM_PRIMITIVE_TYPE_STRING`).
    pub fn wire_name(self) -> &'static str {
        match self {
            PrimitiveTypeCategory::Unknown => "OM_PRIMITIVE_TYPE_UNKNOWN",
            PrimitiveTypeCategory::Boolean => "OM_PRIMITIVE_TYPE_BOOLEAN",
            PrimitiveTypeCategory::Byte => "OM_PRIMITIVE_TYPE_BYTE",
            PrimitiveTypeCategory::Char => "OM_PRIMITIVE_TYPE_CHAR",
            PrimitiveTypeCategory::Short => "OM_PRIMITIVE_TYPE_SHORT",
            PrimitiveTypeCategory::Int => "OM_PRIMITIVE_TYPE_INT",
            PrimitiveTypeCategory::Long => "OM_PRIMITIVE_TYPE_LONG",
            PrimitiveTypeCategory::Float => "OM_PRIMITIVE_TYPE_FLOAT",
            PrimitiveTypeCategory::Double => "OM_PRIMITIVE_TYPE_DOUBLE",
            PrimitiveTypeCategory::BigInteger => "OM_PRIMITIVE_TYPE_BIGINTEGER",
            PrimitiveTypeCategory::BigDecimal => "OM_PRIMITIVE_TYPE_BIGDECIMAL",
            PrimitiveTypeCategory::String => "OM_PRIMITIVE_TYPE_STRING",
            PrimitiveTypeCategory::Date => "OM_PRIMITIVE_TYPE_DATE",
        }
    }

    /// Resolves a wire name, failing with an invalid-primitive-class error
    /// when the name is not a known category.
    pub fn from_wire_name(name: &str) -> Result<PrimitiveTypeCategory, PropertyError> {
        CATEGORY_BY_WIRE_NAME
            .get(name)
            .copied()
            .ok_or_else(|| PropertyError::InvalidPrimitiveClass {
                name: name.to_string(),
            })
    }

    /// Returns the native kind a value must have to be stored under this
    /// category, or `None` for [`Unknown`](Self::Unknown), which accepts any kind.
    ///
    /// Dates are stored as epoch milliseconds, so `Date` declares `Long`.
    pub fn representation(self) -> Option<PrimitiveKind> {
        match self {
            PrimitiveTypeCategory::Unknown => None,
            PrimitiveTypeCategory::Boolean => Some(PrimitiveKind::Boolean),
            PrimitiveTypeCategory::Byte => Some(PrimitiveKind::Byte),
            PrimitiveTypeCategory::Char => Some(PrimitiveKind::Char),
            PrimitiveTypeCategory::Short => Some(PrimitiveKind::Short),
            PrimitiveTypeCategory::Int => Some(PrimitiveKind::Int),
            PrimitiveTypeCategory::Long => Some(PrimitiveKind::Long),
            PrimitiveTypeCategory::Float => Some(PrimitiveKind::Float),
            PrimitiveTypeCategory::Double => Some(PrimitiveKind::Double),
            PrimitiveTypeCategory::BigInteger => Some(PrimitiveKind::BigInteger),
            PrimitiveTypeCategory::BigDecimal => Some(PrimitiveKind::BigDecimal),
            PrimitiveTypeCategory::String => Some(PrimitiveKind::String),
            PrimitiveTypeCategory::Date => Some(PrimitiveKind::Long),
        }
    }

    /// Name of the declared representation, for diagnostics.
    pub fn representation_name(self) -> &'static str {
        self.representation().map_or("object", PrimitiveKind::name)
    }
}

impl fmt::Display for PrimitiveTypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrimitiveTypeCategory {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrimitiveTypeCategory::from_wire_name(s)
    }
}

impl Serialize for PrimitiveTypeCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_name())
    }
}

impl<'de> Deserialize<'de> for PrimitiveTypeCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        PrimitiveTypeCategory::from_wire_name(&name).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_roundtrip() {
        for category in ALL_CATEGORIES {
            assert_eq!(PrimitiveTypeCategory::from_ordinal(category.ordinal()), Some(category));
        }
        assert_eq!(PrimitiveTypeCategory::from_ordinal(13), None);
    }

    #[test]
    fn test_wire_name_lookup() {
        assert_eq!(
            PrimitiveTypeCategory::from_wire_name("OM_PRIMITIVE_TYPE_DATE"),
            Ok(PrimitiveTypeCategory::Date)
        );
        assert_eq!(
            "OM_PRIMITIVE_TYPE_BIGDECIMAL".parse::<PrimitiveTypeCategory>(),
            Ok(PrimitiveTypeCategory::BigDecimal)
        );
        assert!(matches!(
            PrimitiveTypeCategory::from_wire_name("OM_PRIMITIVE_TYPE_UUID"),
            Err(PropertyError::InvalidPrimitiveClass { .. })
        ));
    }

    #[test]
    fn test_date_is_stored_as_long() {
        assert_eq!(PrimitiveTypeCategory::Date.representation(), Some(PrimitiveKind::Long));
        assert_eq!(PrimitiveTypeCategory::Unknown.representation(), None);
        assert_eq!(PrimitiveTypeCategory::Unknown.representation_name(), "object");
    }
}
