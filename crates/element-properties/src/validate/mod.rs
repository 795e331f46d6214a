//! Validation of caller-supplied parameters.
//!
//! These checks reject unusable input before it reaches the property model:
//! missing or blank identifiers and names, and search conditions whose shape
//! does not fit their operator. Type checks against a [`SchemaContext`] are
//! advisory: properties the schema does not mention are allowed.

use rustc_hash::FxHashMap;

use crate::error::{InvalidParameterError, ParameterProblem};
use crate::model::{
    ClassificationCondition, ElementProperties, PrimitiveTypeCategory, PropertyValue,
    SearchProperties,
};

/// Expected primitive categories for named properties.
#[derive(Debug, Clone, Default)]
pub struct SchemaContext {
    properties: FxHashMap<String, PrimitiveTypeCategory>,
}

impl SchemaContext {
    /// Creates a new empty schema context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a property with its expected category.
    pub fn add_property(&mut self, name: impl Into<String>, category: PrimitiveTypeCategory) {
        self.properties.insert(name.into(), category);
    }

    /// Gets the expected category for a property, if registered.
    pub fn get_property_category(&self, name: &str) -> Option<PrimitiveTypeCategory> {
        self.properties.get(name).copied()
    }
}

fn require_text(
    value: Option<&str>,
    parameter_name: &str,
    method_name: &str,
) -> Result<(), InvalidParameterError> {
    match value {
        None => Err(InvalidParameterError::new(parameter_name, method_name, ParameterProblem::Missing)),
        Some(v) if v.trim().is_empty() => {
            Err(InvalidParameterError::new(parameter_name, method_name, ParameterProblem::Blank))
        }
        Some(_) => Ok(()),
    }
}

/// Validates that a unique identifier was supplied.
pub fn validate_guid(
    guid: Option<&str>,
    parameter_name: &str,
    method_name: &str,
) -> Result<(), InvalidParameterError> {
    require_text(guid, parameter_name, method_name)
}

/// Validates that a name was supplied.
pub fn validate_name(
    name: Option<&str>,
    parameter_name: &str,
    method_name: &str,
) -> Result<(), InvalidParameterError> {
    require_text(name, parameter_name, method_name)
}

/// Validates that a search string was supplied.
pub fn validate_search_string(
    search_string: Option<&str>,
    parameter_name: &str,
    method_name: &str,
) -> Result<(), InvalidParameterError> {
    require_text(search_string, parameter_name, method_name)
}

/// Validates the shape of every condition, recursing into nested groups.
///
/// - a condition must name a property unless it groups nested conditions
/// - IS_NULL and NOT_NULL take no value
/// - every other operator needs a value unless the condition is a group
pub fn validate_search_properties(
    search: Option<&SearchProperties>,
    parameter_name: &str,
    method_name: &str,
) -> Result<(), InvalidParameterError> {
    let Some(search) = search else {
        return Err(InvalidParameterError::new(parameter_name, method_name, ParameterProblem::Missing));
    };
    let malformed = |detail: String| {
        InvalidParameterError::new(parameter_name, method_name, ParameterProblem::Malformed)
            .with_detail(detail)
    };

    for (index, condition) in search.conditions.iter().enumerate() {
        if let Some(nested) = &condition.nested_conditions {
            validate_search_properties(Some(nested), parameter_name, method_name)?;
            continue;
        }
        let property = condition.property.as_deref().unwrap_or("");
        if property.trim().is_empty() {
            return Err(malformed(format!("condition {} names no property", index)));
        }
        match (condition.operator.is_unary(), condition.value.is_some()) {
            (true, true) => {
                return Err(malformed(format!(
                    "condition on {} uses {} but supplies a value",
                    property, condition.operator
                )));
            }
            (false, false) => {
                return Err(malformed(format!(
                    "condition on {} uses {} but supplies no value",
                    property, condition.operator
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Validates a classification condition and any property conditions it
/// carries.
pub fn validate_classification_condition(
    condition: Option<&ClassificationCondition>,
    parameter_name: &str,
    method_name: &str,
) -> Result<(), InvalidParameterError> {
    let Some(condition) = condition else {
        return Err(InvalidParameterError::new(parameter_name, method_name, ParameterProblem::Missing));
    };
    require_text(condition.name.as_deref(), parameter_name, method_name)
        .map_err(|err| err.with_detail("classification name"))?;
    if let Some(search) = &condition.search_properties {
        validate_search_properties(Some(search), parameter_name, method_name)?;
    }
    Ok(())
}

/// Validates that primitive properties match the categories registered in
/// `schema`.
pub fn validate_properties(
    properties: &ElementProperties,
    schema: &SchemaContext,
    parameter_name: &str,
    method_name: &str,
) -> Result<(), InvalidParameterError> {
    for (name, value) in properties.sorted_iter() {
        let Some(expected) = schema.get_property_category(name) else {
            continue;
        };
        let actual = match value {
            PropertyValue::Primitive(p) => p.primitive_type_category(),
            _ => None,
        };
        if actual != Some(expected) {
            return Err(
                InvalidParameterError::new(parameter_name, method_name, ParameterProblem::Malformed)
                    .with_detail(format!(
                        "property {} should be {} but holds {}",
                        name,
                        expected,
                        value.describe()
                    )),
            );
        }
    }
    Ok(())
}
