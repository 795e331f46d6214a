//! JSON codec entry points and options.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DecodeError, EncodeError};
use crate::limits::{MAX_NESTING_DEPTH, MAX_PROPERTIES};
use crate::model::{ElementProperties, PropertyValue, SearchProperties};

/// Options for encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeOptions {
    /// Indent the output for people to read.
    pub pretty: bool,
}

impl EncodeOptions {
    /// Creates default (compact) encoding options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates pretty-printing encoding options.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

/// Options for decoding.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Maximum nesting depth of array, map and struct values, and of nested
    /// search conditions.
    pub max_depth: usize,
    /// Maximum number of properties (or conditions) in one container.
    pub max_properties: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_NESTING_DEPTH,
            max_properties: MAX_PROPERTIES,
        }
    }
}

impl DecodeOptions {
    /// Creates decoding options with the crate limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum container nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the maximum number of entries in one container.
    pub fn with_max_properties(mut self, max_properties: usize) -> Self {
        self.max_properties = max_properties;
        self
    }
}

// =============================================================================
// ENCODING
// =============================================================================

fn encode<T: Serialize>(value: &T, options: EncodeOptions) -> Result<String, EncodeError> {
    let encoded = if options.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(encoded)
}

/// Encodes a property container. Property names are written in sorted order.
pub fn encode_properties(properties: &ElementProperties) -> Result<String, EncodeError> {
    encode_properties_with_options(properties, EncodeOptions::default())
}

/// Encodes with explicit options.
pub fn encode_properties_with_options(
    properties: &ElementProperties,
    options: EncodeOptions,
) -> Result<String, EncodeError> {
    let encoded = encode(properties, options)?;
    tracing::debug!(
        properties = properties.property_count(),
        bytes = encoded.len(),
        "encoded element properties"
    );
    Ok(encoded)
}

/// Encodes a single property value.
pub fn encode_property_value(value: &PropertyValue) -> Result<String, EncodeError> {
    encode_property_value_with_options(value, EncodeOptions::default())
}

/// Encodes with explicit options.
pub fn encode_property_value_with_options(
    value: &PropertyValue,
    options: EncodeOptions,
) -> Result<String, EncodeError> {
    let encoded = encode(value, options)?;
    tracing::debug!(class = value.class_name(), bytes = encoded.len(), "encoded property value");
    Ok(encoded)
}

/// Encodes search conditions.
pub fn encode_search_properties(search: &SearchProperties) -> Result<String, EncodeError> {
    encode_search_properties_with_options(search, EncodeOptions::default())
}

/// Encodes with explicit options.
pub fn encode_search_properties_with_options(
    search: &SearchProperties,
    options: EncodeOptions,
) -> Result<String, EncodeError> {
    let encoded = encode(search, options)?;
    tracing::debug!(
        conditions = search.conditions.len(),
        bytes = encoded.len(),
        "encoded search properties"
    );
    Ok(encoded)
}

// =============================================================================
// DECODING
// =============================================================================

fn decode<T: DeserializeOwned>(input: &str) -> Result<T, DecodeError> {
    serde_json::from_str(input).map_err(|err| {
        tracing::debug!(error = %err, bytes = input.len(), "rejected malformed JSON");
        DecodeError::from(err)
    })
}

/// Decodes a property container.
pub fn decode_properties(input: &str) -> Result<ElementProperties, DecodeError> {
    decode_properties_with_options(input, DecodeOptions::default())
}

/// Decodes with explicit limits.
pub fn decode_properties_with_options(
    input: &str,
    options: DecodeOptions,
) -> Result<ElementProperties, DecodeError> {
    let properties: ElementProperties = decode(input)?;
    check_properties(&properties, 0, &options)?;
    tracing::debug!(
        properties = properties.property_count(),
        bytes = input.len(),
        "decoded element properties"
    );
    Ok(properties)
}

/// Decodes a single property value.
pub fn decode_property_value(input: &str) -> Result<PropertyValue, DecodeError> {
    decode_property_value_with_options(input, DecodeOptions::default())
}

/// Decodes with explicit limits.
pub fn decode_property_value_with_options(
    input: &str,
    options: DecodeOptions,
) -> Result<PropertyValue, DecodeError> {
    let value: PropertyValue = decode(input)?;
    check_value(&value, 0, &options)?;
    tracing::debug!(class = value.class_name(), bytes = input.len(), "decoded property value");
    Ok(value)
}

/// Decodes search conditions.
pub fn decode_search_properties(input: &str) -> Result<SearchProperties, DecodeError> {
    decode_search_properties_with_options(input, DecodeOptions::default())
}

/// Decodes with explicit limits.
pub fn decode_search_properties_with_options(
    input: &str,
    options: DecodeOptions,
) -> Result<SearchProperties, DecodeError> {
    let search: SearchProperties = decode(input)?;
    check_search(&search, 0, &options)?;
    tracing::debug!(
        conditions = search.conditions.len(),
        bytes = input.len(),
        "decoded search properties"
    );
    Ok(search)
}

// =============================================================================
// LIMIT CHECKS
// =============================================================================

fn check_width(count: usize, options: &DecodeOptions) -> Result<(), DecodeError> {
    if count > options.max_properties {
        return Err(DecodeError::TooManyProperties {
            count,
            max: options.max_properties,
        });
    }
    Ok(())
}

fn check_depth(depth: usize, options: &DecodeOptions) -> Result<(), DecodeError> {
    if depth > options.max_depth {
        return Err(DecodeError::DepthExceeded {
            depth,
            max: options.max_depth,
        });
    }
    Ok(())
}

fn check_properties(
    properties: &ElementProperties,
    depth: usize,
    options: &DecodeOptions,
) -> Result<(), DecodeError> {
    check_width(properties.property_count(), options)?;
    for (_, value) in properties.iter() {
        check_value(value, depth, options)?;
    }
    Ok(())
}

fn check_value(value: &PropertyValue, depth: usize, options: &DecodeOptions) -> Result<(), DecodeError> {
    if let Some(nested) = value.nested() {
        let depth = depth + 1;
        check_depth(depth, options)?;
        check_properties(&nested.borrow(), depth, options)?;
    }
    Ok(())
}

fn check_search(search: &SearchProperties, depth: usize, options: &DecodeOptions) -> Result<(), DecodeError> {
    check_width(search.conditions.len(), options)?;
    for condition in &search.conditions {
        if let Some(value) = &condition.value {
            check_value(value, depth, options)?;
        }
        if let Some(nested) = &condition.nested_conditions {
            let depth = depth + 1;
            check_depth(depth, options)?;
            check_search(nested, depth, options)?;
        }
    }
    Ok(())
}
