//! Typed, self-describing property values for open metadata elements.
//!
//! This crate provides the property-value model attached to metadata
//! elements, helpers converting between native values and that model, search
//! conditions built over it, and its JSON wire format.
//!
//! # Overview
//!
//! A [`PropertyValue`] is one of five variants:
//! - **Primitive**: a scalar with a declared [`PrimitiveTypeCategory`]
//! - **Enum**: the symbolic name of an enumeration member
//! - **Array**, **Map**, **Struct**: nested [`ElementProperties`] containers
//!
//! Primitive values keep their category and payload consistent: setting
//! either revalidates the pair and applies a fixed set of coercions.
//!
//! # Quick Start
//!
//! ```rust
//! use element_properties::helper::{add_string_property, get_string_property};
//! use element_properties::codec::{decode_properties, encode_properties};
//!
//! let properties = add_string_property(None, "qualifiedName", "sales.orders");
//!
//! // Encode to JSON
//! let json = encode_properties(properties.as_ref().unwrap()).unwrap();
//!
//! // Decode back
//! let decoded = decode_properties(&json).unwrap();
//! let name = get_string_property("example", "qualifiedName", Some(&decoded), "main").unwrap();
//! assert_eq!(name.as_deref(), Some("sales.orders"));
//! ```
//!
//! # Modules
//!
//! - [`model`]: Property values, the property container, search conditions
//! - [`helper`]: Typed builders, extractors and search builders
//! - [`codec`]: JSON encoding/decoding
//! - [`validate`]: Caller-input validation
//! - [`well_known`]: Property names with a fixed meaning
//! - [`error`]: Error types
//! - [`limits`]: Decoding and substitution limits
//!
//! # Sharing
//!
//! Array, map and struct values hold their nested container behind a
//! reference-counted handle. Cloning a value shares the nested container;
//! [`PropertyValue::deep_copy`] does not. The model is single-threaded; move
//! properties between threads through the wire format.

pub mod codec;
pub mod error;
pub mod helper;
pub mod limits;
pub mod model;
pub mod validate;
pub mod well_known;

// Re-export commonly used types at crate root
pub use codec::{
    decode_properties, decode_property_value, decode_search_properties, encode_properties,
    encode_property_value, encode_search_properties, DecodeOptions, EncodeOptions,
};
pub use error::{DecodeError, EncodeError, ErrorCode, InvalidParameterError, ParameterProblem, PropertyError};
pub use model::{
    ArrayTypePropertyValue, ClassificationCondition, ElementProperties, EnumTypePropertyValue,
    MapTypePropertyValue, MatchCriteria, NativeValue, PrimitiveTypeCategory,
    PrimitiveTypePropertyValue, PrimitiveValue, PropertyComparisonOperator, PropertyCondition,
    PropertyValue, SearchClassifications, SearchProperties, SequencingOrder, SharedProperties,
    StructTypePropertyValue,
};
pub use validate::{
    validate_classification_condition, validate_guid, validate_name, validate_properties,
    validate_search_properties, validate_search_string, SchemaContext,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
