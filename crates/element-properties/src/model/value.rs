//! Property values: a closed sum over primitive, enum, array, map and struct.
//!
//! Array, map and struct values nest an [`ElementProperties`] container. The
//! nested container is held through a [`SharedProperties`] handle, so cloning
//! a value (or the container holding it) shares the nested container with the
//! original. [`PropertyValue::deep_copy`] produces a fully independent copy.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::PropertyError;
use crate::model::native::{NativeValue, PrimitiveValue};
use crate::model::properties::{shared, ElementProperties, SharedProperties};
use crate::model::PrimitiveTypeCategory;

/// Rendering used for unset values.
pub const NULL_SENTINEL: &str = "<null>";

/// The value of a single property.
///
/// On the wire each variant is an object tagged with a `class` field naming
/// the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum PropertyValue {
    #[serde(rename = "PrimitiveTypePropertyValue")]
    Primitive(PrimitiveTypePropertyValue),
    #[serde(rename = "EnumTypePropertyValue")]
    Enum(EnumTypePropertyValue),
    #[serde(rename = "ArrayTypePropertyValue")]
    Array(ArrayTypePropertyValue),
    #[serde(rename = "MapTypePropertyValue")]
    Map(MapTypePropertyValue),
    #[serde(rename = "StructTypePropertyValue")]
    Struct(StructTypePropertyValue),
}

impl PropertyValue {
    /// Builds a primitive value whose type name is the category name.
    pub fn primitive(
        category: PrimitiveTypeCategory,
        value: impl Into<PrimitiveValue>,
    ) -> Result<PropertyValue, PropertyError> {
        PrimitiveTypePropertyValue::of(category, value.into()).map(PropertyValue::Primitive)
    }

    /// Builds a string primitive value.
    pub fn string(value: impl Into<String>) -> PropertyValue {
        PropertyValue::Primitive(PrimitiveTypePropertyValue::string(value))
    }

    /// Returns the discriminator naming this variant on the wire.
    pub fn class_name(&self) -> &'static str {
        match self {
            PropertyValue::Primitive(_) => "PrimitiveTypePropertyValue",
            PropertyValue::Enum(_) => "EnumTypePropertyValue",
            PropertyValue::Array(_) => "ArrayTypePropertyValue",
            PropertyValue::Map(_) => "MapTypePropertyValue",
            PropertyValue::Struct(_) => "StructTypePropertyValue",
        }
    }

    /// Returns the declared type name.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            PropertyValue::Primitive(v) => v.type_name(),
            PropertyValue::Enum(v) => v.type_name.as_deref(),
            PropertyValue::Array(v) => v.type_name(),
            PropertyValue::Map(v) => v.type_name(),
            PropertyValue::Struct(v) => v.type_name(),
        }
    }

    /// Human-readable rendering. Never fails; unset values render as `<null>`.
    ///
    /// Nested containers are rendered recursively. A container reachable from
    /// itself through a [`SharedProperties`] handle recurses until the stack
    /// overflows, as do [`value_as_object`](Self::value_as_object),
    /// [`deep_copy`](Self::deep_copy) and `Hash`.
    pub fn value_as_string(&self) -> String {
        match self {
            PropertyValue::Primitive(v) => v.value_as_string(),
            PropertyValue::Enum(v) => v.value_as_string(),
            PropertyValue::Array(v) => v.value_as_string(),
            PropertyValue::Map(v) => v.value_as_string(),
            PropertyValue::Struct(v) => v.value_as_string(),
        }
    }

    /// Canonical native rendering.
    pub fn value_as_object(&self) -> NativeValue {
        match self {
            PropertyValue::Primitive(v) => v.value_as_object(),
            PropertyValue::Enum(v) => v.value_as_object(),
            PropertyValue::Array(v) => v.value_as_object(),
            PropertyValue::Map(v) => v.value_as_object(),
            PropertyValue::Struct(v) => v.value_as_object(),
        }
    }

    /// Copies this value and every nested container it reaches.
    ///
    /// A container shared along two paths is copied once per path.
    pub fn deep_copy(&self) -> PropertyValue {
        match self {
            PropertyValue::Primitive(v) => PropertyValue::Primitive(v.clone()),
            PropertyValue::Enum(v) => PropertyValue::Enum(v.clone()),
            PropertyValue::Array(v) => PropertyValue::Array(ArrayTypePropertyValue {
                type_name: v.type_name.clone(),
                array_count: v.array_count,
                array_values: deep_copy_nested(&v.array_values),
            }),
            PropertyValue::Map(v) => PropertyValue::Map(MapTypePropertyValue {
                type_name: v.type_name.clone(),
                map_values: deep_copy_nested(&v.map_values),
            }),
            PropertyValue::Struct(v) => PropertyValue::Struct(StructTypePropertyValue {
                type_name: v.type_name.clone(),
                attributes: deep_copy_nested(&v.attributes),
            }),
        }
    }

    /// Returns the primitive payload, if this is a primitive value.
    pub fn as_primitive(&self) -> Option<&PrimitiveTypePropertyValue> {
        match self {
            PropertyValue::Primitive(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the enum payload, if this is an enum value.
    pub fn as_enum(&self) -> Option<&EnumTypePropertyValue> {
        match self {
            PropertyValue::Enum(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the array payload, if this is an array value.
    pub fn as_array(&self) -> Option<&ArrayTypePropertyValue> {
        match self {
            PropertyValue::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the map payload, if this is a map value.
    pub fn as_map(&self) -> Option<&MapTypePropertyValue> {
        match self {
            PropertyValue::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the struct payload, if this is a struct value.
    pub fn as_struct(&self) -> Option<&StructTypePropertyValue> {
        match self {
            PropertyValue::Struct(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the nested container of an array, map or struct value.
    pub(crate) fn nested(&self) -> Option<&SharedProperties> {
        match self {
            PropertyValue::Array(v) => v.array_values.as_ref(),
            PropertyValue::Map(v) => v.map_values.as_ref(),
            PropertyValue::Struct(v) => v.attributes.as_ref(),
            PropertyValue::Primitive(_) | PropertyValue::Enum(_) => None,
        }
    }

    /// Short description of the stored kind, used in diagnostics.
    pub(crate) fn describe(&self) -> String {
        match self {
            PropertyValue::Primitive(v) => match v.primitive_type_category() {
                Some(category) => format!("{}<{}>", self.class_name(), category.name()),
                None => self.class_name().to_string(),
            },
            _ => self.class_name().to_string(),
        }
    }
}

impl Hash for PropertyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        self.type_name().hash(state);
        match self {
            PropertyValue::Primitive(v) => {
                v.primitive_type_category.hash(state);
                v.primitive_value.hash(state);
            }
            PropertyValue::Enum(v) => v.symbolic_name.hash(state),
            PropertyValue::Array(v) => {
                v.array_count.hash(state);
                hash_nested(&v.array_values, state);
            }
            PropertyValue::Map(v) => hash_nested(&v.map_values, state),
            PropertyValue::Struct(v) => hash_nested(&v.attributes, state),
        }
    }
}

fn hash_nested<H: Hasher>(nested: &Option<SharedProperties>, state: &mut H) {
    match nested {
        Some(props) => props.borrow().hash(state),
        None => 0u8.hash(state),
    }
}

fn deep_copy_nested(nested: &Option<SharedProperties>) -> Option<SharedProperties> {
    nested.as_ref().map(|props| shared(props.borrow().deep_copy()))
}

impl From<PrimitiveTypePropertyValue> for PropertyValue {
    fn from(v: PrimitiveTypePropertyValue) -> Self {
        PropertyValue::Primitive(v)
    }
}

impl From<EnumTypePropertyValue> for PropertyValue {
    fn from(v: EnumTypePropertyValue) -> Self {
        PropertyValue::Enum(v)
    }
}

impl From<ArrayTypePropertyValue> for PropertyValue {
    fn from(v: ArrayTypePropertyValue) -> Self {
        PropertyValue::Array(v)
    }
}

impl From<MapTypePropertyValue> for PropertyValue {
    fn from(v: MapTypePropertyValue) -> Self {
        PropertyValue::Map(v)
    }
}

impl From<StructTypePropertyValue> for PropertyValue {
    fn from(v: StructTypePropertyValue) -> Self {
        PropertyValue::Struct(v)
    }
}

// =============================================================================
// RENDERING HELPERS
// =============================================================================

/// Folds a container into name → `value_as_string`.
pub fn map_values_as_string(properties: &ElementProperties) -> BTreeMap<String, String> {
    entries_as_string(properties.entries())
}

/// Folds a container into name → `value_as_object`.
pub fn map_values_as_object(properties: &ElementProperties) -> BTreeMap<String, NativeValue> {
    entries_as_object(properties.entries())
}

/// Renders entries as strings; absent values become `<null>`.
fn entries_as_string<'a, I>(entries: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (&'a str, Option<&'a PropertyValue>)>,
{
    entries
        .into_iter()
        .map(|(name, value)| {
            let rendered = value.map_or_else(|| NULL_SENTINEL.to_string(), PropertyValue::value_as_string);
            (name.to_string(), rendered)
        })
        .collect()
}

/// Renders entries as native values; absent values become [`NativeValue::Null`].
fn entries_as_object<'a, I>(entries: I) -> BTreeMap<String, NativeValue>
where
    I: IntoIterator<Item = (&'a str, Option<&'a PropertyValue>)>,
{
    entries
        .into_iter()
        .map(|(name, value)| {
            let object = value.map_or(NativeValue::Null, PropertyValue::value_as_object);
            (name.to_string(), object)
        })
        .collect()
}

/// Formats rendered entries as `{k=v, k=v}`.
fn format_entries<'a>(entries: impl IntoIterator<Item = (&'a String, &'a String)>) -> String {
    let body: Vec<String> = entries
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    format!("{{{}}}", body.join(", "))
}

fn nested_as_string(nested: &Option<SharedProperties>) -> String {
    match nested {
        Some(props) => {
            let props = props.borrow();
            format_entries(&map_values_as_string(&props))
        }
        None => NULL_SENTINEL.to_string(),
    }
}

fn nested_as_object(nested: &Option<SharedProperties>) -> NativeValue {
    match nested {
        Some(props) => {
            let props = props.borrow();
            NativeValue::Map(map_values_as_object(&props))
        }
        None => NativeValue::Null,
    }
}

// =============================================================================
// PRIMITIVE
// =============================================================================

/// A scalar value together with its declared category.
///
/// Category and value are kept consistent: every set revalidates the pair
/// and applies the coercions listed on [`reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PrimitiveWire", into = "PrimitiveWire")]
pub struct PrimitiveTypePropertyValue {
    type_name: Option<String>,
    primitive_type_category: Option<PrimitiveTypeCategory>,
    primitive_value: Option<PrimitiveValue>,
}

impl PrimitiveTypePropertyValue {
    /// Creates an empty primitive value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a primitive value of the given category, named after it.
    pub fn of(
        category: PrimitiveTypeCategory,
        value: PrimitiveValue,
    ) -> Result<Self, PropertyError> {
        let mut primitive = Self {
            type_name: Some(category.name().to_string()),
            primitive_type_category: Some(category),
            primitive_value: None,
        };
        primitive.set_primitive_value(Some(value))?;
        Ok(primitive)
    }

    /// Creates a string primitive; cannot fail.
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            type_name: Some(PrimitiveTypeCategory::String.name().to_string()),
            primitive_type_category: Some(PrimitiveTypeCategory::String),
            primitive_value: Some(PrimitiveValue::String(value.into())),
        }
    }

    /// Creates a primitive value whose payload is already of the category's
    /// representation.
    pub(crate) fn from_parts(category: PrimitiveTypeCategory, value: Option<PrimitiveValue>) -> Self {
        Self {
            type_name: Some(category.name().to_string()),
            primitive_type_category: Some(category),
            primitive_value: value,
        }
    }

    /// Rewrites a string payload in place. The stored kind does not change.
    pub(crate) fn map_string_value(&mut self, f: impl FnOnce(&str) -> String) {
        if let Some(PrimitiveValue::String(s)) = &mut self.primitive_value {
            *s = f(s);
        }
    }

    /// Returns the type name, if set.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Sets or clears the type name.
    pub fn set_type_name(&mut self, type_name: Option<String>) {
        self.type_name = type_name;
    }

    /// Returns the declared category.
    pub fn primitive_type_category(&self) -> Option<PrimitiveTypeCategory> {
        self.primitive_type_category
    }

    /// Returns the stored payload.
    pub fn primitive_value(&self) -> Option<&PrimitiveValue> {
        self.primitive_value.as_ref()
    }

    /// Sets the category and revalidates the stored value against it.
    ///
    /// On failure neither field changes.
    pub fn set_primitive_type_category(
        &mut self,
        category: Option<PrimitiveTypeCategory>,
    ) -> Result<(), PropertyError> {
        let value = match (category, self.primitive_value.take()) {
            (Some(category), Some(value)) => match reconcile(category, value.clone()) {
                Ok(coerced) => Some(coerced),
                Err(err) => {
                    self.primitive_value = Some(value);
                    return Err(err);
                }
            },
            (_, value) => value,
        };
        self.primitive_type_category = category;
        self.primitive_value = value;
        Ok(())
    }

    /// Sets the value, coercing it to the declared category where the
    /// coercion table allows.
    ///
    /// On failure the previous value is kept.
    pub fn set_primitive_value(&mut self, value: Option<PrimitiveValue>) -> Result<(), PropertyError> {
        self.primitive_value = match (self.primitive_type_category, value) {
            (Some(category), Some(value)) => Some(reconcile(category, value)?),
            (_, value) => value,
        };
        Ok(())
    }

    pub fn value_as_string(&self) -> String {
        self.primitive_value
            .as_ref()
            .map_or_else(|| NULL_SENTINEL.to_string(), ToString::to_string)
    }

    pub fn value_as_object(&self) -> NativeValue {
        self.primitive_value
            .clone()
            .map_or(NativeValue::Null, NativeValue::from)
    }
}

/// Checks a value against a category, applying the fixed coercion table
/// when the value is not already of the declared representation.
///
/// | category   | accepted input | stored as                        |
/// |------------|----------------|----------------------------------|
/// | Date       | Int            | Long                             |
/// | BigDecimal | Int            | BigDecimal                       |
/// | BigInteger | Long           | BigInteger parsed from its text  |
/// | Byte       | Int            | String                           |
/// | Char       | String         | its first character              |
/// | Float      | Double         | Double, unchanged                |
/// | Long       | Int            | Long                             |
/// | Short      | Int            | String                           |
pub fn reconcile(
    category: PrimitiveTypeCategory,
    value: PrimitiveValue,
) -> Result<PrimitiveValue, PropertyError> {
    let expected = match category.representation() {
        None => return Ok(value),
        Some(kind) if kind == value.kind() => return Ok(value),
        Some(kind) => kind.name(),
    };

    let mismatch = |value: &PrimitiveValue| PropertyError::InvalidPrimitiveValue {
        category,
        expected,
        value_kind: value.kind().name(),
    };

    match (category, value) {
        (PrimitiveTypeCategory::Date, PrimitiveValue::Int(v))
        | (PrimitiveTypeCategory::Long, PrimitiveValue::Int(v)) => Ok(PrimitiveValue::Long(i64::from(v))),
        (PrimitiveTypeCategory::BigDecimal, PrimitiveValue::Int(v)) => {
            Ok(PrimitiveValue::BigDecimal(bigdecimal::BigDecimal::from(v)))
        }
        (PrimitiveTypeCategory::BigInteger, PrimitiveValue::Long(v)) => v
            .to_string()
            .parse::<num_bigint::BigInt>()
            .map(PrimitiveValue::BigInteger)
            .map_err(|_| mismatch(&PrimitiveValue::Long(v))),
        (PrimitiveTypeCategory::Byte, PrimitiveValue::Int(v))
        | (PrimitiveTypeCategory::Short, PrimitiveValue::Int(v)) => Ok(PrimitiveValue::String(v.to_string())),
        (PrimitiveTypeCategory::Char, PrimitiveValue::String(s)) => match s.chars().next() {
            Some(c) => Ok(PrimitiveValue::Char(c)),
            None => Err(mismatch(&PrimitiveValue::String(s))),
        },
        (PrimitiveTypeCategory::Float, PrimitiveValue::Double(v)) => Ok(PrimitiveValue::Double(v)),
        (_, other) => Err(mismatch(&other)),
    }
}

/// Wire shape of a primitive value.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrimitiveWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primitive_type_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primitive_value: Option<serde_json::Value>,
}

impl From<PrimitiveTypePropertyValue> for PrimitiveWire {
    fn from(v: PrimitiveTypePropertyValue) -> Self {
        Self {
            type_name: v.type_name,
            primitive_type_category: v.primitive_type_category.map(|c| c.wire_name().to_string()),
            primitive_value: v.primitive_value.as_ref().map(PrimitiveValue::to_json),
        }
    }
}

impl TryFrom<PrimitiveWire> for PrimitiveTypePropertyValue {
    type Error = PropertyError;

    fn try_from(wire: PrimitiveWire) -> Result<Self, Self::Error> {
        let category = wire
            .primitive_type_category
            .as_deref()
            .map(PrimitiveTypeCategory::from_wire_name)
            .transpose()?;

        let value = match &wire.primitive_value {
            Some(json) => PrimitiveValue::from_json(json, category).map_err(|found| {
                PropertyError::InvalidPrimitiveValue {
                    category: category.unwrap_or(PrimitiveTypeCategory::Unknown),
                    expected: category.map_or("object", PrimitiveTypeCategory::representation_name),
                    value_kind: found,
                }
            })?,
            None => None,
        };

        let mut primitive = PrimitiveTypePropertyValue {
            type_name: wire.type_name,
            primitive_type_category: category,
            primitive_value: None,
        };
        primitive.set_primitive_value(value)?;
        Ok(primitive)
    }
}

// =============================================================================
// ENUM
// =============================================================================

/// The selected member of an enumeration, by symbolic name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumTypePropertyValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbolic_name: Option<String>,
}

impl EnumTypePropertyValue {
    /// Creates an enum value for the named enum type.
    pub fn new(type_name: impl Into<String>, symbolic_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            symbolic_name: Some(symbolic_name.into()),
        }
    }

    pub fn value_as_string(&self) -> String {
        self.symbolic_name
            .clone()
            .unwrap_or_else(|| NULL_SENTINEL.to_string())
    }

    pub fn value_as_object(&self) -> NativeValue {
        self.symbolic_name
            .clone()
            .map_or(NativeValue::Null, NativeValue::String)
    }
}

// =============================================================================
// ARRAY
// =============================================================================

/// An ordered collection of values stored under the keys `"0"`, `"1"`, ….
///
/// The count is declared independently of the stored elements and bounds
/// every write: set the count before writing elements, or use
/// [`push_array_value`](Self::push_array_value) which grows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayTypePropertyValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    type_name: Option<String>,
    #[serde(default)]
    array_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    array_values: Option<SharedProperties>,
}

impl ArrayTypePropertyValue {
    /// Creates an empty array with a zero count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty array of the named type.
    pub fn with_type_name(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Self::default()
        }
    }

    /// Creates an array whose count matches the supplied values.
    pub fn from_values(
        type_name: impl Into<String>,
        values: impl IntoIterator<Item = PropertyValue>,
    ) -> Self {
        let mut array = Self::with_type_name(type_name);
        for value in values {
            array.push_array_value(value);
        }
        array
    }

    /// Returns the type name, if set.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Sets or clears the type name.
    pub fn set_type_name(&mut self, type_name: Option<String>) {
        self.type_name = type_name;
    }

    /// Returns the declared element count.
    pub fn array_count(&self) -> usize {
        self.array_count
    }

    /// Declares the element count. Existing elements are left in place.
    pub fn set_array_count(&mut self, array_count: usize) {
        self.array_count = array_count;
    }

    /// Returns a handle to the element container.
    pub fn array_values(&self) -> Option<SharedProperties> {
        self.array_values.clone()
    }

    /// Replaces the element container.
    pub fn set_array_values(&mut self, array_values: Option<ElementProperties>) {
        self.array_values = array_values.map(shared);
    }

    /// Writes the element at `index`, or removes it when `value` is `None`.
    ///
    /// Fails when `index` is not below the declared count.
    pub fn set_array_value(
        &mut self,
        index: usize,
        value: Option<PropertyValue>,
    ) -> Result<(), PropertyError> {
        if index >= self.array_count {
            return Err(PropertyError::ArrayIndexOutOfBounds {
                index,
                count: self.array_count,
            });
        }
        self.array_values
            .get_or_insert_with(|| shared(ElementProperties::new()))
            .borrow_mut()
            .set_property(index.to_string(), value);
        Ok(())
    }

    /// Appends an element at the current count and grows the count.
    pub fn push_array_value(&mut self, value: PropertyValue) {
        let index = self.array_count;
        self.array_count += 1;
        self.array_values
            .get_or_insert_with(|| shared(ElementProperties::new()))
            .borrow_mut()
            .set_property(index.to_string(), Some(value));
    }

    /// Returns the element at `index`, if one is stored.
    pub fn array_value(&self, index: usize) -> Option<PropertyValue> {
        let values = self.array_values.as_ref()?;
        let values = values.borrow();
        values.property_value(&index.to_string()).cloned()
    }

    /// Returns elements `0..array_count` in order, `None` where unset.
    pub fn values(&self) -> Vec<Option<PropertyValue>> {
        (0..self.array_count).map(|i| self.array_value(i)).collect()
    }

    pub fn value_as_string(&self) -> String {
        match &self.array_values {
            Some(props) => {
                let props = props.borrow();
                let keys: Vec<String> = (0..self.array_count).map(|i| i.to_string()).collect();
                let rendered = entries_as_string(
                    keys.iter().map(|k| (k.as_str(), props.property_value(k))),
                );
                let mut ordered: Vec<(&String, &String)> = rendered.iter().collect();
                ordered.sort_by_key(|(k, _)| k.parse::<usize>().unwrap_or(usize::MAX));
                format_entries(ordered)
            }
            None => NULL_SENTINEL.to_string(),
        }
    }

    pub fn value_as_object(&self) -> NativeValue {
        match &self.array_values {
            Some(props) => {
                let props = props.borrow();
                let keys: Vec<String> = (0..self.array_count).map(|i| i.to_string()).collect();
                NativeValue::Map(entries_as_object(
                    keys.iter().map(|k| (k.as_str(), props.property_value(k))),
                ))
            }
            None => NativeValue::Null,
        }
    }
}

// =============================================================================
// MAP
// =============================================================================

/// A map from arbitrary keys to values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapTypePropertyValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    map_values: Option<SharedProperties>,
}

impl MapTypePropertyValue {
    /// Creates an empty value with no type name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty value with the given type name.
    pub fn with_type_name(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            map_values: None,
        }
    }

    /// Returns the type name, if set.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Sets or clears the type name.
    pub fn set_type_name(&mut self, type_name: Option<String>) {
        self.type_name = type_name;
    }

    /// Returns a handle to the entry container.
    pub fn map_values(&self) -> Option<SharedProperties> {
        self.map_values.clone()
    }

    /// Replaces the entry container.
    pub fn set_map_values(&mut self, map_values: Option<ElementProperties>) {
        self.map_values = map_values.map(shared);
    }

    /// Number of entries, read from the nested container.
    pub fn map_element_count(&self) -> usize {
        self.map_values
            .as_ref()
            .map_or(0, |props| props.borrow().property_count())
    }

    /// Upserts an entry, or removes it when `value` is `None`.
    pub fn set_map_value(&mut self, key: impl Into<String>, value: Option<PropertyValue>) {
        self.map_values
            .get_or_insert_with(|| shared(ElementProperties::new()))
            .borrow_mut()
            .set_property(key, value);
    }

    /// Returns a shallow copy of one entry.
    pub fn map_value(&self, key: &str) -> Option<PropertyValue> {
        let values = self.map_values.as_ref()?;
        let values = values.borrow();
        values.property_value(key).cloned()
    }

    pub fn value_as_string(&self) -> String {
        nested_as_string(&self.map_values)
    }

    pub fn value_as_object(&self) -> NativeValue {
        nested_as_object(&self.map_values)
    }
}

// =============================================================================
// STRUCT
// =============================================================================

/// A record of named attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructTypePropertyValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attributes: Option<SharedProperties>,
}

impl StructTypePropertyValue {
    /// Creates an empty value with no type name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty value with the given type name.
    pub fn with_type_name(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            attributes: None,
        }
    }

    /// Returns the type name, if set.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Sets or clears the type name.
    pub fn set_type_name(&mut self, type_name: Option<String>) {
        self.type_name = type_name;
    }

    /// Returns a handle to the attribute container.
    pub fn attributes(&self) -> Option<SharedProperties> {
        self.attributes.clone()
    }

    /// Replaces the attribute container.
    pub fn set_attributes(&mut self, attributes: Option<ElementProperties>) {
        self.attributes = attributes.map(shared);
    }

    /// Number of attributes, read from the nested container.
    pub fn attribute_count(&self) -> usize {
        self.attributes
            .as_ref()
            .map_or(0, |props| props.borrow().property_count())
    }

    /// Upserts an attribute, or removes it when `value` is `None`.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: Option<PropertyValue>) {
        self.attributes
            .get_or_insert_with(|| shared(ElementProperties::new()))
            .borrow_mut()
            .set_property(name, value);
    }

    /// Returns a shallow copy of one attribute.
    pub fn attribute(&self, name: &str) -> Option<PropertyValue> {
        let attributes = self.attributes.as_ref()?;
        let attributes = attributes.borrow();
        attributes.property_value(name).cloned()
    }

    pub fn value_as_string(&self) -> String {
        nested_as_string(&self.attributes)
    }

    pub fn value_as_object(&self) -> NativeValue {
        nested_as_object(&self.attributes)
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use num_bigint::BigInt;
    use proptest::prelude::*;

    use super::*;
    use crate::model::native::PrimitiveKind;
    use crate::model::category::ALL_CATEGORIES;

    fn sample_for(kind: PrimitiveKind) -> PrimitiveValue {
        match kind {
            PrimitiveKind::Boolean => PrimitiveValue::Boolean(true),
            PrimitiveKind::Byte => PrimitiveValue::Byte(7),
            PrimitiveKind::Char => PrimitiveValue::Char('z'),
            PrimitiveKind::Short => PrimitiveValue::Short(300),
            PrimitiveKind::Int => PrimitiveValue::Int(42),
            PrimitiveKind::Long => PrimitiveValue::Long(1_700_000_000_000),
            PrimitiveKind::Float => PrimitiveValue::Float(1.5),
            PrimitiveKind::Double => PrimitiveValue::Double(2.25),
            PrimitiveKind::BigInteger => PrimitiveValue::BigInteger(BigInt::from(99)),
            PrimitiveKind::BigDecimal => PrimitiveValue::BigDecimal(BigDecimal::from(3)),
            PrimitiveKind::String => PrimitiveValue::from("text"),
        }
    }

    #[test]
    fn test_every_category_keeps_declared_representation() {
        for category in ALL_CATEGORIES {
            let Some(kind) = category.representation() else {
                continue;
            };
            let mut primitive = PrimitiveTypePropertyValue::new();
            primitive.set_primitive_type_category(Some(category)).unwrap();
            primitive.set_primitive_value(Some(sample_for(kind))).unwrap();
            assert_eq!(primitive.primitive_value().map(PrimitiveValue::kind), Some(kind));
        }
    }

    #[test]
    fn test_coercion_table() {
        let cases = [
            (PrimitiveTypeCategory::Date, PrimitiveValue::Int(5), PrimitiveValue::Long(5)),
            (PrimitiveTypeCategory::Long, PrimitiveValue::Int(-3), PrimitiveValue::Long(-3)),
            (
                PrimitiveTypeCategory::BigDecimal,
                PrimitiveValue::Int(12),
                PrimitiveValue::BigDecimal(BigDecimal::from(12)),
            ),
            (
                PrimitiveTypeCategory::BigInteger,
                PrimitiveValue::Long(8_000_000_000),
                PrimitiveValue::BigInteger(BigInt::from(8_000_000_000i64)),
            ),
            (PrimitiveTypeCategory::Byte, PrimitiveValue::Int(9), PrimitiveValue::from("9")),
            (PrimitiveTypeCategory::Short, PrimitiveValue::Int(300), PrimitiveValue::from("300")),
            (PrimitiveTypeCategory::Char, PrimitiveValue::from("xyz"), PrimitiveValue::Char('x')),
            (PrimitiveTypeCategory::Float, PrimitiveValue::Double(0.5), PrimitiveValue::Double(0.5)),
        ];

        for (category, input, expected) in cases {
            assert_eq!(reconcile(category, input), Ok(expected), "category {:?}", category);
        }
    }

    #[test]
    fn test_mismatch_without_coercion_fails() {
        let result = reconcile(PrimitiveTypeCategory::Int, PrimitiveValue::Long(1));
        assert!(matches!(
            result,
            Err(PropertyError::InvalidPrimitiveValue { expected: "int", value_kind: "long", .. })
        ));
        // BigInteger only accepts a 64-bit input.
        assert!(reconcile(PrimitiveTypeCategory::BigInteger, PrimitiveValue::Int(1)).is_err());
        assert!(reconcile(PrimitiveTypeCategory::Char, PrimitiveValue::from("")).is_err());
        assert!(reconcile(PrimitiveTypeCategory::Boolean, PrimitiveValue::from("true")).is_err());
    }

    #[test]
    fn test_unknown_accepts_anything() {
        assert_eq!(
            reconcile(PrimitiveTypeCategory::Unknown, PrimitiveValue::Float(1.0)),
            Ok(PrimitiveValue::Float(1.0))
        );
    }

    #[test]
    fn test_category_change_revalidates() {
        let mut primitive = PrimitiveTypePropertyValue::new();
        primitive.set_primitive_value(Some(PrimitiveValue::Int(10))).unwrap();
        primitive
            .set_primitive_type_category(Some(PrimitiveTypeCategory::Date))
            .unwrap();
        assert_eq!(primitive.primitive_value(), Some(&PrimitiveValue::Long(10)));

        let err = primitive.set_primitive_type_category(Some(PrimitiveTypeCategory::Boolean));
        assert!(err.is_err());
        assert_eq!(primitive.primitive_type_category(), Some(PrimitiveTypeCategory::Date));
        assert_eq!(primitive.primitive_value(), Some(&PrimitiveValue::Long(10)));
    }

    #[test]
    fn test_failed_value_set_keeps_previous() {
        let mut primitive =
            PrimitiveTypePropertyValue::of(PrimitiveTypeCategory::Int, PrimitiveValue::Int(1)).unwrap();
        assert!(primitive.set_primitive_value(Some(PrimitiveValue::from("x"))).is_err());
        assert_eq!(primitive.primitive_value(), Some(&PrimitiveValue::Int(1)));
    }

    #[test]
    fn test_array_bounds() {
        let mut array = ArrayTypePropertyValue::with_type_name("array<string>");
        array.set_array_count(3);
        for i in 0..3 {
            array
                .set_array_value(i, Some(PropertyValue::string(format!("v{}", i))))
                .unwrap();
        }
        assert_eq!(
            array.set_array_value(3, Some(PropertyValue::string("v3"))),
            Err(PropertyError::ArrayIndexOutOfBounds { index: 3, count: 3 })
        );
        assert_eq!(array.value_as_string(), "{0=v0, 1=v1, 2=v2}");
    }

    #[test]
    fn test_array_write_before_count_fails() {
        let mut array = ArrayTypePropertyValue::new();
        assert!(array.set_array_value(0, Some(PropertyValue::string("a"))).is_err());
        array.push_array_value(PropertyValue::string("a"));
        assert_eq!(array.array_count(), 1);
        assert_eq!(array.array_value(0), Some(PropertyValue::string("a")));
    }

    #[test]
    fn test_array_renders_numeric_order_and_gaps() {
        let mut array = ArrayTypePropertyValue::new();
        array.set_array_count(12);
        array.set_array_value(10, Some(PropertyValue::string("ten"))).unwrap();
        array.set_array_value(2, Some(PropertyValue::string("two"))).unwrap();
        let rendered = array.value_as_string();
        assert!(rendered.starts_with("{0=<null>, 1=<null>, 2=two, 3=<null>"));
        assert!(rendered.ends_with("10=ten, 11=<null>}"));

        let object = array.value_as_object();
        let map = object.as_map().unwrap();
        assert_eq!(map.len(), 12);
        assert_eq!(map["2"], NativeValue::String("two".to_string()));
        assert_eq!(map["0"], NativeValue::Null);
    }

    #[test]
    fn test_map_count_follows_container() {
        let mut map = MapTypePropertyValue::with_type_name("map<string,string>");
        assert_eq!(map.map_element_count(), 0);
        map.set_map_value("a", Some(PropertyValue::string("1")));
        map.set_map_value("b", Some(PropertyValue::string("2")));
        assert_eq!(map.map_element_count(), 2);
        map.set_map_value("a", None);
        assert_eq!(map.map_element_count(), 1);
        assert_eq!(map.value_as_string(), "{b=2}");
    }

    #[test]
    fn test_unset_values_render_null() {
        assert_eq!(PrimitiveTypePropertyValue::new().value_as_string(), NULL_SENTINEL);
        assert_eq!(EnumTypePropertyValue::default().value_as_string(), NULL_SENTINEL);
        assert_eq!(StructTypePropertyValue::new().value_as_string(), NULL_SENTINEL);
        assert_eq!(MapTypePropertyValue::new().value_as_object(), NativeValue::Null);
    }

    #[test]
    fn test_clone_shares_nested_but_deep_copy_does_not() {
        let mut original = StructTypePropertyValue::with_type_name("Location");
        original.set_attribute("city", Some(PropertyValue::string("Oslo")));
        let original = PropertyValue::Struct(original);

        let alias = original.clone();
        let copy = original.deep_copy();

        if let Some(attrs) = alias.nested() {
            attrs
                .borrow_mut()
                .set_property("country", Some(PropertyValue::string("Norway")));
        }

        assert_eq!(original.as_struct().unwrap().attribute_count(), 2);
        assert_eq!(copy.as_struct().unwrap().attribute_count(), 1);
        assert_ne!(original, copy);
    }

    #[test]
    fn test_equality_includes_type_name() {
        let mut a = PrimitiveTypePropertyValue::string("x");
        let b = PrimitiveTypePropertyValue::string("x");
        assert_eq!(a, b);
        a.set_type_name(Some("text".to_string()));
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn prop_array_accepts_only_declared_indices(count in 0usize..32, index in 0usize..64) {
            let mut array = ArrayTypePropertyValue::new();
            array.set_array_count(count);
            let result = array.set_array_value(index, Some(PropertyValue::string("x")));
            prop_assert_eq!(result.is_ok(), index < count);
        }

        #[test]
        fn prop_int_into_long_categories_widens(v in any::<i32>()) {
            for category in [PrimitiveTypeCategory::Date, PrimitiveTypeCategory::Long] {
                let stored = reconcile(category, PrimitiveValue::Int(v)).unwrap();
                prop_assert_eq!(stored, PrimitiveValue::Long(i64::from(v)));
            }
        }
    }
}
