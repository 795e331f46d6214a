//! Data model for element properties.
//!
//! This module contains the core types:
//! - Primitive type categories and native scalars
//! - Property values (primitive, enum, array, map, struct)
//! - The element property container
//! - Search conditions built over property values

pub mod category;
pub mod native;
pub mod properties;
pub mod search;
pub mod value;

pub use category::{PrimitiveTypeCategory, ALL_CATEGORIES};
pub use native::{NativeValue, PrimitiveKind, PrimitiveValue};
pub use properties::{shared, ElementProperties, SharedProperties};
pub use search::{
    ClassificationCondition, MatchCriteria, PropertyComparisonOperator, PropertyCondition,
    SearchClassifications, SearchProperties, SequencingOrder,
};
pub use value::{
    map_values_as_object, map_values_as_string, reconcile, ArrayTypePropertyValue,
    EnumTypePropertyValue, MapTypePropertyValue, PrimitiveTypePropertyValue,
    PropertyValue, StructTypePropertyValue, NULL_SENTINEL,
};
