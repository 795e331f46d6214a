//! Builders for search conditions.

use std::collections::BTreeMap;

use crate::model::{
    ClassificationCondition, ElementProperties, MatchCriteria, PrimitiveTypeCategory,
    PropertyComparisonOperator, PropertyCondition, PropertyValue, SearchClassifications,
    SearchProperties,
};
use crate::well_known::METADATA_COLLECTION_NAME;

/// Wraps a value so that a LIKE comparison matches it anywhere in a string.
pub fn contains_regex(value: &str) -> String {
    format!(".*{}.*", value)
}

/// Builds a search that matches `value` against any of the named properties.
///
/// The operator defaults to [`PropertyComparisonOperator::Eq`]. With
/// [`PropertyComparisonOperator::Like`] the value is wrapped as `.*value.*`.
/// Returns `None` when no property names are given.
pub fn get_search_properties_by_name(
    property_names: &[impl AsRef<str>],
    value: &str,
    operator: Option<PropertyComparisonOperator>,
) -> Option<SearchProperties> {
    if property_names.is_empty() {
        return None;
    }
    let operator = operator.unwrap_or_default();
    let operand = if operator == PropertyComparisonOperator::Like {
        PropertyValue::string(contains_regex(value))
    } else {
        PropertyValue::string(value)
    };

    let conditions = property_names
        .iter()
        .map(|name| PropertyCondition::new(name.as_ref(), operator, Some(operand.clone())))
        .collect();
    tracing::trace!(names = property_names.len(), operator = %operator, "built search by name");
    Some(SearchProperties::new(MatchCriteria::Any, conditions))
}

/// Builds one condition per property, combined with `match_criteria`
/// (default [`MatchCriteria::All`]).
///
/// String primitives are compared with LIKE, using the stored value as the
/// pattern unchanged; every other value with EQ. Conditions are ordered by
/// property name. Returns `None` for absent or empty properties.
pub fn get_search_properties(
    properties: Option<&ElementProperties>,
    match_criteria: Option<MatchCriteria>,
) -> Option<SearchProperties> {
    let properties = properties.filter(|p| !p.is_empty())?;
    let conditions = properties
        .sorted_iter()
        .map(|(name, value)| PropertyCondition::new(name, operator_for(value), Some(value.clone())))
        .collect();
    Some(SearchProperties::new(match_criteria.unwrap_or_default(), conditions))
}

fn operator_for(value: &PropertyValue) -> PropertyComparisonOperator {
    let is_string = value
        .as_primitive()
        .is_some_and(|p| p.primitive_type_category() == Some(PrimitiveTypeCategory::String));
    if is_string {
        PropertyComparisonOperator::Like
    } else {
        PropertyComparisonOperator::Eq
    }
}

/// Builds a search for elements owned by the named metadata collection.
pub fn get_search_properties_for_metadata_collection_name(
    metadata_collection_name: &str,
) -> SearchProperties {
    SearchProperties::new(
        MatchCriteria::All,
        vec![PropertyCondition::new(
            METADATA_COLLECTION_NAME,
            PropertyComparisonOperator::Eq,
            Some(PropertyValue::string(metadata_collection_name)),
        )],
    )
}

/// Builds one classification condition per named classification, each
/// restricted by conditions derived from its properties with
/// [`get_search_properties`]. Returns `None` when no classifications are given.
pub fn get_search_classifications(
    classifications: &BTreeMap<String, Option<ElementProperties>>,
    match_criteria: Option<MatchCriteria>,
) -> Option<SearchClassifications> {
    if classifications.is_empty() {
        return None;
    }
    let conditions = classifications
        .iter()
        .map(|(name, properties)| {
            ClassificationCondition::new(name.as_str(), get_search_properties(properties.as_ref(), None))
        })
        .collect();
    Some(SearchClassifications {
        match_criteria: match_criteria.unwrap_or_default(),
        conditions,
    })
}
