//! Builders that add typed properties to an element property container.
//!
//! Every builder takes the container to extend (absent means "start a new
//! one") and returns the extended container. Builders for optional inputs
//! (strings, enums, dates, collections) return the input unchanged, possibly
//! still absent, when there is nothing to add. Scalar builders always create.
//!
//! A fluent [`PropertiesBuilder`] wraps the same functions:
//!
//! ```rust
//! use element_properties::helper::PropertiesBuilder;
//!
//! let properties = PropertiesBuilder::new()
//!     .string("qualifiedName", "sales.orders")
//!     .int("retentionDays", 30)
//!     .boolean("isPublic", true)
//!     .build();
//!
//! assert_eq!(properties.map(|p| p.property_count()), Some(3));
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::model::{
    ArrayTypePropertyValue, ElementProperties, EnumTypePropertyValue, MapTypePropertyValue,
    NativeValue, PrimitiveTypeCategory, PrimitiveTypePropertyValue, PrimitiveValue, PropertyValue,
};

/// Type name of arrays of strings.
pub const STRING_ARRAY_TYPE: &str = "array<string>";
/// Type name of arrays built from arbitrary native lists.
pub const OBJECT_ARRAY_TYPE: &str = "array<object>";
/// Type name of maps of strings.
pub const STRING_MAP_TYPE: &str = "map<string,string>";
/// Type name of maps of booleans.
pub const BOOLEAN_MAP_TYPE: &str = "map<string,boolean>";
/// Type name of maps of ints.
pub const INT_MAP_TYPE: &str = "map<string,int>";
/// Type name of maps of longs.
pub const LONG_MAP_TYPE: &str = "map<string,long>";
/// Type name of maps of dates.
pub const DATE_MAP_TYPE: &str = "map<string,date>";
/// Type name of maps of doubles.
pub const DOUBLE_MAP_TYPE: &str = "map<string,double>";
/// Type name of maps built from arbitrary native maps.
pub const OBJECT_MAP_TYPE: &str = "map<string,object>";

fn primitive(category: PrimitiveTypeCategory, value: impl Into<PrimitiveValue>) -> PropertyValue {
    PropertyValue::Primitive(PrimitiveTypePropertyValue::from_parts(
        category,
        Some(value.into()),
    ))
}

fn date_value(value: &DateTime<Utc>) -> PropertyValue {
    primitive(PrimitiveTypeCategory::Date, value.timestamp_millis())
}

fn put(properties: Option<ElementProperties>, name: &str, value: PropertyValue) -> ElementProperties {
    let mut properties = properties.unwrap_or_default();
    tracing::trace!(property = name, class = value.class_name(), "adding property");
    properties.set_property(name, Some(value));
    properties
}

fn map_value<T>(
    type_name: &str,
    map: &BTreeMap<String, T>,
    convert: impl Fn(&T) -> PropertyValue,
) -> PropertyValue {
    let mut value = MapTypePropertyValue::with_type_name(type_name);
    for (key, entry) in map {
        value.set_map_value(key.as_str(), Some(convert(entry)));
    }
    PropertyValue::Map(value)
}

fn put_map<T>(
    properties: Option<ElementProperties>,
    name: &str,
    type_name: &str,
    map: &BTreeMap<String, T>,
    convert: impl Fn(&T) -> PropertyValue,
) -> Option<ElementProperties> {
    if map.is_empty() {
        return properties;
    }
    Some(put(properties, name, map_value(type_name, map, convert)))
}

/// Converts a native value into a property value.
///
/// Nulls become an unset primitive of the unknown category. Lists become
/// `array<object>` values and maps `map<string,object>` values, converted
/// recursively.
pub fn native_to_property_value(value: &NativeValue) -> PropertyValue {
    match value {
        NativeValue::Null => PropertyValue::Primitive(PrimitiveTypePropertyValue::from_parts(
            PrimitiveTypeCategory::Unknown,
            None,
        )),
        NativeValue::String(v) => primitive(PrimitiveTypeCategory::String, v.as_str()),
        NativeValue::Int(v) => primitive(PrimitiveTypeCategory::Int, *v),
        NativeValue::Long(v) => primitive(PrimitiveTypeCategory::Long, *v),
        NativeValue::Short(v) => primitive(PrimitiveTypeCategory::Short, *v),
        NativeValue::Date(v) => date_value(v),
        NativeValue::Char(v) => primitive(PrimitiveTypeCategory::Char, *v),
        NativeValue::Byte(v) => primitive(PrimitiveTypeCategory::Byte, *v),
        NativeValue::Boolean(v) => primitive(PrimitiveTypeCategory::Boolean, *v),
        NativeValue::Float(v) => primitive(PrimitiveTypeCategory::Float, *v),
        NativeValue::BigDecimal(v) => primitive(PrimitiveTypeCategory::BigDecimal, v.clone()),
        NativeValue::BigInteger(v) => primitive(PrimitiveTypeCategory::BigInteger, v.clone()),
        NativeValue::Double(v) => primitive(PrimitiveTypeCategory::Double, *v),
        NativeValue::List(items) => PropertyValue::Array(ArrayTypePropertyValue::from_values(
            OBJECT_ARRAY_TYPE,
            items.iter().map(native_to_property_value),
        )),
        NativeValue::Map(map) => map_value(OBJECT_MAP_TYPE, map, native_to_property_value),
    }
}

// =============================================================================
// SCALARS
// =============================================================================

/// Adds a string property. An absent value leaves `properties` unchanged.
pub fn add_string_property<'a>(
    properties: Option<ElementProperties>,
    name: &str,
    value: impl Into<Option<&'a str>>,
) -> Option<ElementProperties> {
    match value.into() {
        Some(value) => Some(put(properties, name, primitive(PrimitiveTypeCategory::String, value))),
        None => properties,
    }
}

/// Adds an int property.
pub fn add_int_property(properties: Option<ElementProperties>, name: &str, value: i32) -> ElementProperties {
    put(properties, name, primitive(PrimitiveTypeCategory::Int, value))
}

/// Adds a long property.
pub fn add_long_property(properties: Option<ElementProperties>, name: &str, value: i64) -> ElementProperties {
    put(properties, name, primitive(PrimitiveTypeCategory::Long, value))
}

/// Adds a float property.
pub fn add_float_property(properties: Option<ElementProperties>, name: &str, value: f32) -> ElementProperties {
    put(properties, name, primitive(PrimitiveTypeCategory::Float, value))
}

/// Adds a double property.
pub fn add_double_property(properties: Option<ElementProperties>, name: &str, value: f64) -> ElementProperties {
    put(properties, name, primitive(PrimitiveTypeCategory::Double, value))
}

/// Adds a boolean property.
pub fn add_boolean_property(
    properties: Option<ElementProperties>,
    name: &str,
    value: bool,
) -> ElementProperties {
    put(properties, name, primitive(PrimitiveTypeCategory::Boolean, value))
}

/// Adds a date property, stored as epoch milliseconds. An absent value
/// leaves `properties` unchanged.
pub fn add_date_property(
    properties: Option<ElementProperties>,
    name: &str,
    value: Option<DateTime<Utc>>,
) -> Option<ElementProperties> {
    match value {
        Some(value) => Some(put(properties, name, date_value(&value))),
        None => properties,
    }
}

/// Adds an enum property selecting `symbolic_name` of `enum_type_name`.
/// An absent symbolic name leaves `properties` unchanged.
pub fn add_enum_property<'a>(
    properties: Option<ElementProperties>,
    name: &str,
    enum_type_name: &str,
    symbolic_name: impl Into<Option<&'a str>>,
) -> Option<ElementProperties> {
    match symbolic_name.into() {
        Some(symbolic_name) => Some(put(
            properties,
            name,
            PropertyValue::Enum(EnumTypePropertyValue::new(enum_type_name, symbolic_name)),
        )),
        None => properties,
    }
}

// =============================================================================
// COLLECTIONS
// =============================================================================

/// Adds an `array<string>` property. An empty slice leaves `properties`
/// unchanged.
pub fn add_string_array_property(
    properties: Option<ElementProperties>,
    name: &str,
    values: &[impl AsRef<str>],
) -> Option<ElementProperties> {
    if values.is_empty() {
        return properties;
    }
    let array = ArrayTypePropertyValue::from_values(
        STRING_ARRAY_TYPE,
        values
            .iter()
            .map(|v| primitive(PrimitiveTypeCategory::String, v.as_ref())),
    );
    Some(put(properties, name, PropertyValue::Array(array)))
}

/// Adds a `map<string,object>` property converted entry by entry with
/// [`native_to_property_value`].
pub fn add_map_property(
    properties: Option<ElementProperties>,
    name: &str,
    map: &BTreeMap<String, NativeValue>,
) -> Option<ElementProperties> {
    put_map(properties, name, OBJECT_MAP_TYPE, map, native_to_property_value)
}

/// Adds every entry of a native map as a top-level property.
pub fn add_property_map(
    properties: Option<ElementProperties>,
    map: &BTreeMap<String, NativeValue>,
) -> Option<ElementProperties> {
    if map.is_empty() {
        return properties;
    }
    let mut properties = properties.unwrap_or_default();
    for (name, value) in map {
        properties = put(Some(properties), name, native_to_property_value(value));
    }
    Some(properties)
}

/// Adds a `map<string,string>` property. An empty map leaves `properties` unchanged.
pub fn add_string_map_property(
    properties: Option<ElementProperties>,
    name: &str,
    map: &BTreeMap<String, String>,
) -> Option<ElementProperties> {
    put_map(properties, name, STRING_MAP_TYPE, map, |v| {
        primitive(PrimitiveTypeCategory::String, v.as_str())
    })
}

/// Adds a `map<string,boolean>` property.
pub fn add_boolean_map_property(
    properties: Option<ElementProperties>,
    name: &str,
    map: &BTreeMap<String, bool>,
) -> Option<ElementProperties> {
    put_map(properties, name, BOOLEAN_MAP_TYPE, map, |v| {
        primitive(PrimitiveTypeCategory::Boolean, *v)
    })
}

/// Adds a `map<string,int>` property.
pub fn add_int_map_property(
    properties: Option<ElementProperties>,
    name: &str,
    map: &BTreeMap<String, i32>,
) -> Option<ElementProperties> {
    put_map(properties, name, INT_MAP_TYPE, map, |v| primitive(PrimitiveTypeCategory::Int, *v))
}

/// Adds a `map<string,long>` property.
pub fn add_long_map_property(
    properties: Option<ElementProperties>,
    name: &str,
    map: &BTreeMap<String, i64>,
) -> Option<ElementProperties> {
    put_map(properties, name, LONG_MAP_TYPE, map, |v| primitive(PrimitiveTypeCategory::Long, *v))
}

/// Adds a `map<string,date>` property with entries stored as epoch milliseconds.
pub fn add_date_map_property(
    properties: Option<ElementProperties>,
    name: &str,
    map: &BTreeMap<String, DateTime<Utc>>,
) -> Option<ElementProperties> {
    put_map(properties, name, DATE_MAP_TYPE, map, date_value)
}

/// Adds a `map<string,double>` property.
pub fn add_double_map_property(
    properties: Option<ElementProperties>,
    name: &str,
    map: &BTreeMap<String, f64>,
) -> Option<ElementProperties> {
    put_map(properties, name, DOUBLE_MAP_TYPE, map, |v| {
        primitive(PrimitiveTypeCategory::Double, *v)
    })
}

// =============================================================================
// FLUENT BUILDER
// =============================================================================

/// Fluent construction of element properties.
#[derive(Debug, Clone, Default)]
pub struct PropertiesBuilder {
    properties: Option<ElementProperties>,
}

impl PropertiesBuilder {
    /// Creates a builder with no properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder that extends existing properties.
    pub fn extend(properties: ElementProperties) -> Self {
        Self {
            properties: Some(properties),
        }
    }

    pub fn string<'a>(mut self, name: &str, value: impl Into<Option<&'a str>>) -> Self {
        self.properties = add_string_property(self.properties, name, value);
        self
    }

    pub fn int(mut self, name: &str, value: i32) -> Self {
        self.properties = Some(add_int_property(self.properties, name, value));
        self
    }

    pub fn long(mut self, name: &str, value: i64) -> Self {
        self.properties = Some(add_long_property(self.properties, name, value));
        self
    }

    pub fn float(mut self, name: &str, value: f32) -> Self {
        self.properties = Some(add_float_property(self.properties, name, value));
        self
    }

    pub fn double(mut self, name: &str, value: f64) -> Self {
        self.properties = Some(add_double_property(self.properties, name, value));
        self
    }

    pub fn boolean(mut self, name: &str, value: bool) -> Self {
        self.properties = Some(add_boolean_property(self.properties, name, value));
        self
    }

    pub fn date(mut self, name: &str, value: Option<DateTime<Utc>>) -> Self {
        self.properties = add_date_property(self.properties, name, value);
        self
    }

    pub fn enumeration<'a>(
        mut self,
        name: &str,
        enum_type_name: &str,
        symbolic_name: impl Into<Option<&'a str>>,
    ) -> Self {
        self.properties = add_enum_property(self.properties, name, enum_type_name, symbolic_name);
        self
    }

    pub fn string_array(mut self, name: &str, values: &[impl AsRef<str>]) -> Self {
        self.properties = add_string_array_property(self.properties, name, values);
        self
    }

    pub fn string_map(mut self, name: &str, map: &BTreeMap<String, String>) -> Self {
        self.properties = add_string_map_property(self.properties, name, map);
        self
    }

    /// Adds a property converted from any native value.
    pub fn native(mut self, name: &str, value: &NativeValue) -> Self {
        self.properties = Some(put(self.properties, name, native_to_property_value(value)));
        self
    }

    /// Returns the built properties, or `None` if nothing was added.
    pub fn build(self) -> Option<ElementProperties> {
        self.properties
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use chrono::TimeZone;
    use num_bigint::BigInt;

    use super::*;

    fn category_of(properties: &ElementProperties, name: &str) -> Option<PrimitiveTypeCategory> {
        properties
            .property_value(name)
            .and_then(PropertyValue::as_primitive)
            .and_then(PrimitiveTypePropertyValue::primitive_type_category)
    }

    #[test]
    fn test_string_builder_creates_container() {
        let properties = add_string_property(None, "qualifiedName", "foo").unwrap();
        let value = properties.property_value("qualifiedName").unwrap();
        assert_eq!(value.type_name(), Some("string"));
        assert_eq!(value.value_as_string(), "foo");
    }

    #[test]
    fn test_absent_inputs_leave_properties_unchanged() {
        assert_eq!(add_string_property(None, "name", None), None);
        assert_eq!(add_enum_property(None, "status", "Status", None), None);
        assert_eq!(add_date_property(None, "created", None), None);
        assert_eq!(add_string_array_property(None, "tags", &[] as &[&str]), None);
        assert_eq!(add_string_map_property(None, "labels", &BTreeMap::new()), None);
        assert_eq!(add_property_map(None, &BTreeMap::new()), None);

        let existing = add_int_property(None, "count", 1);
        let unchanged = add_string_property(Some(existing.clone()), "name", None);
        assert_eq!(unchanged, Some(existing));
    }

    #[test]
    fn test_scalar_builders_always_create() {
        let properties = add_boolean_property(None, "isPublic", false);
        assert_eq!(properties.property_count(), 1);
        assert_eq!(category_of(&properties, "isPublic"), Some(PrimitiveTypeCategory::Boolean));

        let properties = add_double_property(Some(properties), "score", 0.5);
        assert_eq!(properties.property_count(), 2);
        assert_eq!(properties.property_value("score").unwrap().type_name(), Some("double"));
    }

    #[test]
    fn test_date_stored_as_millis() {
        let when = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let properties = add_date_property(None, "created", Some(when)).unwrap();
        let primitive = properties.property_value("created").unwrap().as_primitive().unwrap();
        assert_eq!(primitive.primitive_type_category(), Some(PrimitiveTypeCategory::Date));
        assert_eq!(
            primitive.primitive_value(),
            Some(&PrimitiveValue::Long(when.timestamp_millis()))
        );
    }

    #[test]
    fn test_string_array_property() {
        let properties = add_string_array_property(None, "tags", &["a", "b", "c"]).unwrap();
        let array = properties.property_value("tags").unwrap().as_array().unwrap();
        assert_eq!(array.type_name(), Some(STRING_ARRAY_TYPE));
        assert_eq!(array.array_count(), 3);
        assert_eq!(array.value_as_string(), "{0=a, 1=b, 2=c}");
    }

    #[test]
    fn test_typed_map_properties() {
        let mut flags = BTreeMap::new();
        flags.insert("a".to_string(), true);
        flags.insert("b".to_string(), false);
        let properties = add_boolean_map_property(None, "flags", &flags).unwrap();
        let map = properties.property_value("flags").unwrap().as_map().unwrap();
        assert_eq!(map.type_name(), Some(BOOLEAN_MAP_TYPE));
        assert_eq!(map.map_element_count(), 2);
        assert_eq!(map.value_as_string(), "{a=true, b=false}");
    }

    #[test]
    fn test_long_and_double_map_properties() {
        let mut sizes = BTreeMap::new();
        sizes.insert("rows".to_string(), 5_000_000_000i64);
        let properties = add_long_map_property(None, "sizes", &sizes).unwrap();
        let map = properties.property_value("sizes").unwrap().as_map().unwrap();
        assert_eq!(map.type_name(), Some(LONG_MAP_TYPE));
        assert_eq!(map.map_element_count(), 1);
        let entries = map.map_values().unwrap();
        assert_eq!(category_of(&entries.borrow(), "rows"), Some(PrimitiveTypeCategory::Long));

        let mut scores = BTreeMap::new();
        scores.insert("a".to_string(), 0.5);
        scores.insert("b".to_string(), 1.25);
        let properties = add_double_map_property(Some(properties), "scores", &scores).unwrap();
        let map = properties.property_value("scores").unwrap().as_map().unwrap();
        assert_eq!(map.type_name(), Some(DOUBLE_MAP_TYPE));
        assert_eq!(map.value_as_string(), "{a=0.5, b=1.25}");
        let entries = map.map_values().unwrap();
        assert_eq!(category_of(&entries.borrow(), "b"), Some(PrimitiveTypeCategory::Double));
        assert_eq!(properties.property_count(), 2);
    }

    #[test]
    fn test_date_map_entries_stored_as_millis() {
        let when = Utc.with_ymd_and_hms(2022, 3, 4, 5, 6, 7).unwrap();
        let mut dates = BTreeMap::new();
        dates.insert("created".to_string(), when);
        let properties = add_date_map_property(None, "dates", &dates).unwrap();

        let map = properties.property_value("dates").unwrap().as_map().unwrap();
        assert_eq!(map.type_name(), Some(DATE_MAP_TYPE));
        let entries = map.map_values().unwrap();
        let entries = entries.borrow();
        let entry = entries.property_value("created").unwrap().as_primitive().unwrap();
        assert_eq!(entry.primitive_type_category(), Some(PrimitiveTypeCategory::Date));
        assert_eq!(
            entry.primitive_value(),
            Some(&PrimitiveValue::Long(when.timestamp_millis()))
        );
        assert_eq!(add_date_map_property(None, "dates", &BTreeMap::new()), None);
    }

    #[test]
    fn test_property_map_dispatch() {
        let mut nested = BTreeMap::new();
        nested.insert("inner".to_string(), NativeValue::Int(1));

        let mut map = BTreeMap::new();
        map.insert("s".to_string(), NativeValue::from("text"));
        map.insert("i".to_string(), NativeValue::Int(1));
        map.insert("l".to_string(), NativeValue::Long(2));
        map.insert("sh".to_string(), NativeValue::Short(3));
        map.insert("c".to_string(), NativeValue::Char('c'));
        map.insert("by".to_string(), NativeValue::Byte(4));
        map.insert("b".to_string(), NativeValue::Boolean(true));
        map.insert("f".to_string(), NativeValue::Float(1.5));
        map.insert("d".to_string(), NativeValue::Double(2.5));
        map.insert("bd".to_string(), NativeValue::BigDecimal(BigDecimal::from(5)));
        map.insert("bi".to_string(), NativeValue::BigInteger(BigInt::from(6)));
        map.insert("dt".to_string(), NativeValue::Date(Utc.timestamp_millis_opt(7).unwrap()));
        map.insert("n".to_string(), NativeValue::Null);
        map.insert("list".to_string(), NativeValue::List(vec![NativeValue::Int(1), NativeValue::Null]));
        map.insert("map".to_string(), NativeValue::Map(nested));

        let properties = add_property_map(None, &map).unwrap();
        assert_eq!(properties.property_count(), map.len());

        let expected = [
            ("s", PrimitiveTypeCategory::String),
            ("i", PrimitiveTypeCategory::Int),
            ("l", PrimitiveTypeCategory::Long),
            ("sh", PrimitiveTypeCategory::Short),
            ("c", PrimitiveTypeCategory::Char),
            ("by", PrimitiveTypeCategory::Byte),
            ("b", PrimitiveTypeCategory::Boolean),
            ("f", PrimitiveTypeCategory::Float),
            ("d", PrimitiveTypeCategory::Double),
            ("bd", PrimitiveTypeCategory::BigDecimal),
            ("bi", PrimitiveTypeCategory::BigInteger),
            ("dt", PrimitiveTypeCategory::Date),
            ("n", PrimitiveTypeCategory::Unknown),
        ];
        for (name, category) in expected {
            assert_eq!(category_of(&properties, name), Some(category), "property {}", name);
        }

        let list = properties.property_value("list").unwrap().as_array().unwrap();
        assert_eq!(list.type_name(), Some(OBJECT_ARRAY_TYPE));
        assert_eq!(list.array_count(), 2);
        assert_eq!(list.value_as_string(), "{0=1, 1=<null>}");

        let nested = properties.property_value("map").unwrap().as_map().unwrap();
        assert_eq!(nested.type_name(), Some(OBJECT_MAP_TYPE));
        assert_eq!(nested.value_as_string(), "{inner=1}");
    }

    #[test]
    fn test_fluent_builder() {
        let properties = PropertiesBuilder::new()
            .string("qualifiedName", "sales.orders")
            .string("description", None)
            .long("rowCount", 10)
            .enumeration("status", "Status", "ACTIVE")
            .string_array("tags", &["x"])
            .native("extra", &NativeValue::Float(0.25))
            .build()
            .unwrap();

        assert_eq!(properties.property_count(), 5);
        assert!(!properties.contains_property("description"));
        assert_eq!(properties.property_value("status").unwrap().value_as_string(), "ACTIVE");
        assert_eq!(PropertiesBuilder::new().string("a", None).build(), None);
    }
}
