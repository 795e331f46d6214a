//! The name → value container attached to metadata elements.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHasher};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::value::PropertyValue;

/// Handle to a nested container held by an array, map or struct value.
///
/// Clones of the handle alias the same container. A container may be
/// reachable along several paths but never from itself: rendering, hashing and
/// deep copies walk nested containers without a cycle check.
pub type SharedProperties = Rc<RefCell<ElementProperties>>;

/// Wraps a container in a fresh [`SharedProperties`] handle.
pub fn shared(properties: ElementProperties) -> SharedProperties {
    Rc::new(RefCell::new(properties))
}

/// A mapping from property name to [`PropertyValue`].
///
/// Cloning copies the name → value associations into an independent map.
/// Nested array, map and struct containers are shared with the source; use
/// [`deep_copy`](Self::deep_copy) for a fully independent copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementProperties {
    property_values: FxHashMap<String, PropertyValue>,
}

impl ElementProperties {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies a template, or creates an empty container when there is none.
    pub fn from_template(template: Option<&ElementProperties>) -> Self {
        template.cloned().unwrap_or_default()
    }

    /// Upserts a property, or removes it when `value` is `None`.
    pub fn set_property(&mut self, name: impl Into<String>, value: Option<PropertyValue>) {
        let name = name.into();
        match value {
            Some(value) => {
                self.property_values.insert(name, value);
            }
            None => {
                self.property_values.remove(&name);
            }
        }
    }

    /// Returns the value stored under `name`.
    pub fn property_value(&self, name: &str) -> Option<&PropertyValue> {
        self.property_values.get(name)
    }

    /// Returns a mutable reference to the value stored under `name`.
    pub fn property_value_mut(&mut self, name: &str) -> Option<&mut PropertyValue> {
        self.property_values.get_mut(name)
    }

    /// Removes and returns the value stored under `name`.
    pub fn remove_property(&mut self, name: &str) -> Option<PropertyValue> {
        self.property_values.remove(name)
    }

    pub fn contains_property(&self, name: &str) -> bool {
        self.property_values.contains_key(name)
    }

    /// Iterates over the property names present at call time.
    pub fn property_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.property_values.keys().map(String::as_str)
    }

    pub fn property_count(&self) -> usize {
        self.property_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.property_values.is_empty()
    }

    /// Iterates over name/value pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> + '_ {
        self.property_values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates mutably over the stored values.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut PropertyValue> + '_ {
        self.property_values.values_mut()
    }

    /// Iterates over name/value pairs sorted by name.
    pub fn sorted_iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> + '_ {
        let sorted: BTreeMap<&str, &PropertyValue> = self.iter().collect();
        sorted.into_iter()
    }

    /// Renders every property with [`PropertyValue::value_as_string`].
    pub fn properties_as_strings(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(name, value)| (name.to_string(), value.value_as_string()))
            .collect()
    }

    /// Copies this container and every nested container it reaches.
    pub fn deep_copy(&self) -> ElementProperties {
        self.property_values
            .iter()
            .map(|(name, value)| (name.clone(), value.deep_copy()))
            .collect()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, Option<&PropertyValue>)> + '_ {
        self.iter().map(|(name, value)| (name, Some(value)))
    }
}

impl FromIterator<(String, PropertyValue)> for ElementProperties {
    fn from_iter<I: IntoIterator<Item = (String, PropertyValue)>>(iter: I) -> Self {
        Self {
            property_values: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ElementProperties {
    type Item = (&'a String, &'a PropertyValue);
    type IntoIter = std::collections::hash_map::Iter<'a, String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.property_values.iter()
    }
}

// Entry hashes are combined with a commutative sum so the result does not
// depend on map iteration order.
impl Hash for ElementProperties {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut combined: u64 = 0;
        for (name, value) in &self.property_values {
            let mut hasher = FxHasher::default();
            name.hash(&mut hasher);
            value.hash(&mut hasher);
            combined = combined.wrapping_add(hasher.finish());
        }
        self.property_values.len().hash(state);
        combined.hash(state);
    }
}

impl Serialize for ElementProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.sorted_iter())
    }
}

impl<'de> Deserialize<'de> for ElementProperties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let property_values = FxHashMap::<String, PropertyValue>::deserialize(deserializer)?;
        Ok(Self { property_values })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;
    use crate::model::value::{MapTypePropertyValue, StructTypePropertyValue};

    fn hash_of(props: &ElementProperties) -> u64 {
        let mut hasher = DefaultHasher::new();
        props.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_set_none_removes() {
        let mut props = ElementProperties::new();
        props.set_property("name", Some(PropertyValue::string("a")));
        props.set_property("name", Some(PropertyValue::string("b")));
        assert_eq!(props.property_count(), 1);
        assert_eq!(props.property_value("name"), Some(&PropertyValue::string("b")));

        props.set_property("name", None);
        assert!(props.is_empty());
        assert!(!props.contains_property("name"));
    }

    #[test]
    fn test_from_absent_template_is_empty() {
        assert!(ElementProperties::from_template(None).is_empty());
    }

    #[test]
    fn test_copy_independent_outer_map() {
        let mut original = ElementProperties::new();
        original.set_property("a", Some(PropertyValue::string("1")));

        let mut copy = ElementProperties::from_template(Some(&original));
        copy.set_property("b", Some(PropertyValue::string("2")));
        copy.set_property("a", None);

        assert_eq!(original.property_count(), 1);
        assert!(original.contains_property("a"));
        assert_eq!(copy.property_names().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_copy_shares_nested_map() {
        let mut map = MapTypePropertyValue::with_type_name("map<string,string>");
        map.set_map_value("k", Some(PropertyValue::string("v")));
        let mut original = ElementProperties::new();
        original.set_property("options", Some(PropertyValue::Map(map)));

        let copy = original.clone();
        let deep = original.deep_copy();

        if let Some(PropertyValue::Map(m)) = copy.property_value("options") {
            if let Some(values) = m.map_values() {
                values
                    .borrow_mut()
                    .set_property("k2", Some(PropertyValue::string("v2")));
            }
        }

        let count = |props: &ElementProperties| match props.property_value("options") {
            Some(PropertyValue::Map(m)) => m.map_element_count(),
            _ => 0,
        };
        assert_eq!(count(&original), 2);
        assert_eq!(count(&deep), 1);
    }

    #[test]
    fn test_container_shared_along_two_paths() {
        let mut map = MapTypePropertyValue::with_type_name("map<string,string>");
        map.set_map_value("k", Some(PropertyValue::string("v")));
        let mut props = ElementProperties::new();
        props.set_property("left", Some(PropertyValue::Map(map.clone())));
        props.set_property("right", Some(PropertyValue::Map(map)));

        assert_eq!(
            props.properties_as_strings(),
            BTreeMap::from([
                ("left".to_string(), "{k=v}".to_string()),
                ("right".to_string(), "{k=v}".to_string()),
            ])
        );
        assert_eq!(hash_of(&props), hash_of(&props.clone()));

        // The deep copy no longer shares one container between the paths.
        let deep = props.deep_copy();
        let left = deep
            .property_value("left")
            .and_then(PropertyValue::as_map)
            .and_then(MapTypePropertyValue::map_values);
        if let Some(values) = left {
            values
                .borrow_mut()
                .set_property("k2", Some(PropertyValue::string("v2")));
        }
        let count = |props: &ElementProperties, name: &str| match props.property_value(name) {
            Some(PropertyValue::Map(m)) => m.map_element_count(),
            _ => 0,
        };
        assert_eq!(count(&deep, "left"), 2);
        assert_eq!(count(&deep, "right"), 1);
        assert_eq!(count(&props, "left"), 1);
    }

    #[test]
    fn test_hash_ignores_insertion_order() {
        let mut a = ElementProperties::new();
        a.set_property("x", Some(PropertyValue::string("1")));
        a.set_property("y", Some(PropertyValue::string("2")));

        let mut b = ElementProperties::new();
        b.set_property("y", Some(PropertyValue::string("2")));
        b.set_property("x", Some(PropertyValue::string("1")));

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_properties_as_strings() {
        let mut location = StructTypePropertyValue::with_type_name("Location");
        location.set_attribute("city", Some(PropertyValue::string("Oslo")));

        let mut props = ElementProperties::new();
        props.set_property("name", Some(PropertyValue::string("asset")));
        props.set_property("location", Some(PropertyValue::Struct(location)));

        let strings = props.properties_as_strings();
        assert_eq!(strings["name"], "asset");
        assert_eq!(strings["location"], "{city=Oslo}");
    }

    #[test]
    fn test_serialized_keys_are_sorted() {
        let mut props = ElementProperties::new();
        props.set_property("zeta", Some(PropertyValue::string("z")));
        props.set_property("alpha", Some(PropertyValue::string("a")));
        let json = serde_json::to_string(&props).unwrap();
        let alpha = json.find("\"alpha\"").unwrap();
        let zeta = json.find("\"zeta\"").unwrap();
        assert!(alpha < zeta);
    }
}
