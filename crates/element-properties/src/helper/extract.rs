//! Typed extraction and removal of properties.
//!
//! Every extractor takes the name of the calling component (`source_name`)
//! and of the calling method (`method_name`) so that a helper logic error can
//! say who asked for what. A missing container or property is not an error.
//! A stored value of the wrong kind is.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::error::PropertyError;
use crate::model::{
    ElementProperties, NativeValue, PrimitiveKind, PrimitiveTypeCategory, PrimitiveValue,
    PropertyValue,
};

struct Lookup<'a> {
    source_name: &'a str,
    property_name: &'a str,
    method_name: &'a str,
    helper_method: &'static str,
}

impl<'a> Lookup<'a> {
    fn find<'p>(&self, properties: Option<&'p ElementProperties>) -> Option<&'p PropertyValue> {
        properties?.property_value(self.property_name)
    }

    fn logic_error(&self, found: &PropertyValue) -> PropertyError {
        let found = found.describe();
        tracing::warn!(
            source = self.source_name,
            method = self.method_name,
            helper = self.helper_method,
            property = self.property_name,
            found = %found,
            "property has an unexpected kind"
        );
        PropertyError::HelperLogic {
            source_name: self.source_name.to_string(),
            method_name: self.method_name.to_string(),
            helper_method: self.helper_method,
            property_name: self.property_name.to_string(),
            found,
        }
    }

    /// Reads a primitive stored under `category` and converts its payload.
    ///
    /// Any other variant or category is a helper logic error, as is a payload
    /// `convert` rejects. A missing property or payload reads as `None`.
    fn scalar<T>(
        &self,
        properties: Option<&ElementProperties>,
        category: PrimitiveTypeCategory,
        convert: impl Fn(&PrimitiveValue) -> Option<T>,
    ) -> Result<Option<T>, PropertyError> {
        let Some(value) = self.find(properties) else {
            return Ok(None);
        };
        match primitive_of(value, category) {
            Checked::Value(primitive) => convert(primitive)
                .map(Some)
                .ok_or_else(|| self.logic_error(value)),
            Checked::Empty => Ok(None),
            Checked::Mismatch => Err(self.logic_error(value)),
        }
    }

    /// Reads the entries of a map value, converting each one.
    fn map<T>(
        &self,
        properties: Option<&ElementProperties>,
        convert: impl Fn(&PropertyValue) -> Option<T>,
    ) -> Result<Option<BTreeMap<String, T>>, PropertyError> {
        let Some(value) = self.find(properties) else {
            return Ok(None);
        };
        let Some(map) = value.as_map() else {
            return Err(self.logic_error(value));
        };
        let Some(entries) = map.map_values() else {
            return Ok(None);
        };
        let entries = entries.borrow();
        let mut result = BTreeMap::new();
        for (key, entry) in entries.sorted_iter() {
            let converted = convert(entry).ok_or_else(|| self.logic_error(entry))?;
            result.insert(key.to_string(), converted);
        }
        Ok(Some(result))
    }

    /// Reads the entries of a map whose values are all primitives of
    /// `category`.
    fn primitive_map<T>(
        &self,
        properties: Option<&ElementProperties>,
        category: PrimitiveTypeCategory,
        convert: impl Fn(&PrimitiveValue) -> Option<T>,
    ) -> Result<Option<BTreeMap<String, T>>, PropertyError> {
        self.map(properties, |entry| match primitive_of(entry, category) {
            Checked::Value(primitive) => convert(primitive),
            Checked::Empty | Checked::Mismatch => None,
        })
    }
}

fn lookup<'a>(
    source_name: &'a str,
    property_name: &'a str,
    method_name: &'a str,
    helper_method: &'static str,
) -> Lookup<'a> {
    Lookup {
        source_name,
        property_name,
        method_name,
        helper_method,
    }
}

enum Checked<'p> {
    Value(&'p PrimitiveValue),
    Empty,
    Mismatch,
}

fn primitive_of(value: &PropertyValue, category: PrimitiveTypeCategory) -> Checked<'_> {
    match value.as_primitive() {
        Some(primitive) if primitive.primitive_type_category() == Some(category) => {
            match primitive.primitive_value() {
                Some(payload) => Checked::Value(payload),
                None => Checked::Empty,
            }
        }
        _ => Checked::Mismatch,
    }
}

fn as_string(value: &PrimitiveValue) -> Option<String> {
    match value {
        PrimitiveValue::String(v) => Some(v.clone()),
        _ => None,
    }
}

fn as_int(value: &PrimitiveValue) -> Option<i32> {
    match value {
        PrimitiveValue::Int(v) => Some(*v),
        _ => None,
    }
}

fn as_long(value: &PrimitiveValue) -> Option<i64> {
    match value {
        PrimitiveValue::Long(v) => Some(*v),
        _ => None,
    }
}

fn as_boolean(value: &PrimitiveValue) -> Option<bool> {
    match value {
        PrimitiveValue::Boolean(v) => Some(*v),
        _ => None,
    }
}

fn as_double(value: &PrimitiveValue) -> Option<f64> {
    match value {
        PrimitiveValue::Double(v) => Some(*v),
        _ => None,
    }
}

fn to_date(millis: i64) -> Result<DateTime<Utc>, PropertyError> {
    DateTime::<Utc>::from_timestamp_millis(millis).ok_or(PropertyError::InvalidPrimitiveValue {
        category: PrimitiveTypeCategory::Date,
        expected: "epoch milliseconds within the supported date range",
        value_kind: PrimitiveKind::Long.name(),
    })
}

// =============================================================================
// SCALARS
// =============================================================================

/// Returns a string property.
pub fn get_string_property(
    source_name: &str,
    property_name: &str,
    properties: Option<&ElementProperties>,
    method_name: &str,
) -> Result<Option<String>, PropertyError> {
    lookup(source_name, property_name, method_name, "get_string_property").scalar(
        properties,
        PrimitiveTypeCategory::String,
        as_string,
    )
}

/// Returns an int property, or 0 when it is missing.
pub fn get_int_property(
    source_name: &str,
    property_name: &str,
    properties: Option<&ElementProperties>,
    method_name: &str,
) -> Result<i32, PropertyError> {
    lookup(source_name, property_name, method_name, "get_int_property")
        .scalar(properties, PrimitiveTypeCategory::Int, as_int)
        .map(Option::unwrap_or_default)
}

/// Returns a long property, or 0 when it is missing.
pub fn get_long_property(
    source_name: &str,
    property_name: &str,
    properties: Option<&ElementProperties>,
    method_name: &str,
) -> Result<i64, PropertyError> {
    lookup(source_name, property_name, method_name, "get_long_property")
        .scalar(properties, PrimitiveTypeCategory::Long, as_long)
        .map(Option::unwrap_or_default)
}

/// Returns a float property, or 0.0 when it is missing.
///
/// Floats read back from the wire are stored as doubles and are narrowed.
pub fn get_float_property(
    source_name: &str,
    property_name: &str,
    properties: Option<&ElementProperties>,
    method_name: &str,
) -> Result<f32, PropertyError> {
    lookup(source_name, property_name, method_name, "get_float_property")
        .scalar(properties, PrimitiveTypeCategory::Float, |v| match v {
            PrimitiveValue::Float(f) => Some(*f),
            PrimitiveValue::Double(d) => Some(*d as f32),
            _ => None,
        })
        .map(Option::unwrap_or_default)
}

/// Returns a double property, or 0.0 when it is missing.
pub fn get_double_property(
    source_name: &str,
    property_name: &str,
    properties: Option<&ElementProperties>,
    method_name: &str,
) -> Result<f64, PropertyError> {
    lookup(source_name, property_name, method_name, "get_double_property")
        .scalar(properties, PrimitiveTypeCategory::Double, as_double)
        .map(Option::unwrap_or_default)
}

/// Returns a boolean property, or false when it is missing.
pub fn get_boolean_property(
    source_name: &str,
    property_name: &str,
    properties: Option<&ElementProperties>,
    method_name: &str,
) -> Result<bool, PropertyError> {
    lookup(source_name, property_name, method_name, "get_boolean_property")
        .scalar(properties, PrimitiveTypeCategory::Boolean, as_boolean)
        .map(Option::unwrap_or_default)
}

/// Returns a date property stored as epoch milliseconds.
///
/// Milliseconds outside the range chrono can represent are reported as an
/// invalid primitive value.
pub fn get_date_property(
    source_name: &str,
    property_name: &str,
    properties: Option<&ElementProperties>,
    method_name: &str,
) -> Result<Option<DateTime<Utc>>, PropertyError> {
    lookup(source_name, property_name, method_name, "get_date_property")
        .scalar(properties, PrimitiveTypeCategory::Date, as_long)?
        .map(to_date)
        .transpose()
}

/// Returns the symbolic name of an enum property.
pub fn get_enum_symbolic_name(
    source_name: &str,
    property_name: &str,
    properties: Option<&ElementProperties>,
    method_name: &str,
) -> Result<Option<String>, PropertyError> {
    let lookup = lookup(source_name, property_name, method_name, "get_enum_symbolic_name");
    match lookup.find(properties) {
        None => Ok(None),
        Some(PropertyValue::Enum(value)) => Ok(value.symbolic_name.clone()),
        Some(other) => Err(lookup.logic_error(other)),
    }
}

// =============================================================================
// COLLECTIONS
// =============================================================================

/// Returns the elements of an array property in index order, rendered as
/// strings. Unset elements are skipped.
pub fn get_string_array_property(
    source_name: &str,
    property_name: &str,
    properties: Option<&ElementProperties>,
    method_name: &str,
) -> Result<Option<Vec<String>>, PropertyError> {
    let lookup = lookup(source_name, property_name, method_name, "get_string_array_property");
    match lookup.find(properties) {
        None => Ok(None),
        Some(PropertyValue::Array(array)) => {
            if array.array_values().is_none() {
                return Ok(None);
            }
            Ok(Some(
                array
                    .values()
                    .into_iter()
                    .flatten()
                    .map(|v| v.value_as_string())
                    .collect(),
            ))
        }
        Some(other) => Err(lookup.logic_error(other)),
    }
}

/// Returns a map property with every entry rendered as a string.
pub fn get_string_map_property(
    source_name: &str,
    property_name: &str,
    properties: Option<&ElementProperties>,
    method_name: &str,
) -> Result<Option<BTreeMap<String, String>>, PropertyError> {
    lookup(source_name, property_name, method_name, "get_string_map_property")
        .map(properties, |v| Some(v.value_as_string()))
}

/// Returns a map property whose entries are all booleans.
pub fn get_boolean_map_property(
    source_name: &str,
    property_name: &str,
    properties: Option<&ElementProperties>,
    method_name: &str,
) -> Result<Option<BTreeMap<String, bool>>, PropertyError> {
    lookup(source_name, property_name, method_name, "get_boolean_map_property")
        .primitive_map(properties, PrimitiveTypeCategory::Boolean, as_boolean)
}

/// Returns a map property whose entries are all ints.
pub fn get_int_map_property(
    source_name: &str,
    property_name: &str,
    properties: Option<&ElementProperties>,
    method_name: &str,
) -> Result<Option<BTreeMap<String, i32>>, PropertyError> {
    lookup(source_name, property_name, method_name, "get_int_map_property")
        .primitive_map(properties, PrimitiveTypeCategory::Int, as_int)
}

/// Returns a map property whose entries are all longs.
pub fn get_long_map_property(
    source_name: &str,
    property_name: &str,
    properties: Option<&ElementProperties>,
    method_name: &str,
) -> Result<Option<BTreeMap<String, i64>>, PropertyError> {
    lookup(source_name, property_name, method_name, "get_long_map_property")
        .primitive_map(properties, PrimitiveTypeCategory::Long, as_long)
}

/// Returns a map property with every entry rendered as a native value.
pub fn get_map_property(
    source_name: &str,
    property_name: &str,
    properties: Option<&ElementProperties>,
    method_name: &str,
) -> Result<Option<BTreeMap<String, NativeValue>>, PropertyError> {
    lookup(source_name, property_name, method_name, "get_map_property")
        .map(properties, |v| Some(v.value_as_object()))
}

/// Returns a copy of the attributes of a struct property.
///
/// The copy shares any containers nested inside the attributes.
pub fn get_struct_attributes(
    source_name: &str,
    property_name: &str,
    properties: Option<&ElementProperties>,
    method_name: &str,
) -> Result<Option<ElementProperties>, PropertyError> {
    let lookup = lookup(source_name, property_name, method_name, "get_struct_attributes");
    match lookup.find(properties) {
        None => Ok(None),
        Some(PropertyValue::Struct(value)) => {
            Ok(value.attributes().map(|attributes| attributes.borrow().clone()))
        }
        Some(other) => Err(lookup.logic_error(other)),
    }
}

// =============================================================================
// REMOVERS
// =============================================================================

macro_rules! remover {
    ($($(#[$doc:meta])* $remove:ident => $get:ident -> $ty:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $remove(
                source_name: &str,
                property_name: &str,
                properties: Option<&mut ElementProperties>,
                method_name: &str,
            ) -> Result<$ty, PropertyError> {
                let Some(properties) = properties else {
                    return $get(source_name, property_name, None, method_name);
                };
                let value = $get(source_name, property_name, Some(&*properties), method_name)?;
                properties.remove_property(property_name);
                Ok(value)
            }
        )*
    };
}

remover! {
    /// Returns and removes a string property.
    remove_string_property => get_string_property -> Option<String>;
    /// Returns and removes an int property (0 when missing).
    remove_int_property => get_int_property -> i32;
    remove_long_property => get_long_property -> i64;
    remove_float_property => get_float_property -> f32;
    remove_double_property => get_double_property -> f64;
    remove_boolean_property => get_boolean_property -> bool;
    remove_date_property => get_date_property -> Option<DateTime<Utc>>;
    /// Returns and removes the symbolic name of an enum property.
    remove_enum_property => get_enum_symbolic_name -> Option<String>;
    remove_string_array_property => get_string_array_property -> Option<Vec<String>>;
    remove_string_map_property => get_string_map_property -> Option<BTreeMap<String, String>>;
    remove_boolean_map_property => get_boolean_map_property -> Option<BTreeMap<String, bool>>;
    remove_int_map_property => get_int_map_property -> Option<BTreeMap<String, i32>>;
    remove_long_map_property => get_long_map_property -> Option<BTreeMap<String, i64>>;
    remove_map_property => get_map_property -> Option<BTreeMap<String, NativeValue>>;
    remove_struct_attributes => get_struct_attributes -> Option<ElementProperties>;
}
