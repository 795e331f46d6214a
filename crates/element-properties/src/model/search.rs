//! Search conditions over element properties and classifications.
//!
//! These are request values: built per query, serialized to the wire and
//! evaluated by the metadata repository.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::value::PropertyValue;

/// Boolean combinator applied across a list of conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchCriteria {
    #[default]
    All,
    Any,
    None,
}

impl MatchCriteria {
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            MatchCriteria::All => "All",
            MatchCriteria::Any => "Any",
            MatchCriteria::None => "None",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MatchCriteria::All => "All properties must match.",
            MatchCriteria::Any => "Any property can match.",
            MatchCriteria::None => "No properties can match.",
        }
    }
}

impl fmt::Display for MatchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comparison applied between a property and a condition's operand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyComparisonOperator {
    #[default]
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    IsNull,
    NotNull,
    Like,
}

impl PropertyComparisonOperator {
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Returns the symbolic form of the operator.
    pub fn name(self) -> &'static str {
        match self {
            PropertyComparisonOperator::Eq => "=",
            PropertyComparisonOperator::Neq => "<>",
            PropertyComparisonOperator::Lt => "<",
            PropertyComparisonOperator::Lte => "<=",
            PropertyComparisonOperator::Gt => ">",
            PropertyComparisonOperator::Gte => ">=",
            PropertyComparisonOperator::In => "in",
            PropertyComparisonOperator::IsNull => "is null",
            PropertyComparisonOperator::NotNull => "not null",
            PropertyComparisonOperator::Like => "like",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PropertyComparisonOperator::Eq => "Equal to",
            PropertyComparisonOperator::Neq => "Not equal to",
            PropertyComparisonOperator::Lt => "Less than",
            PropertyComparisonOperator::Lte => "Less than or equal to",
            PropertyComparisonOperator::Gt => "Greater than",
            PropertyComparisonOperator::Gte => "Greater than or equal to",
            PropertyComparisonOperator::In => "In the supplied list",
            PropertyComparisonOperator::IsNull => "Has no value",
            PropertyComparisonOperator::NotNull => "Has a value",
            PropertyComparisonOperator::Like => "Matches the regular expression",
        }
    }

    /// Returns true if conditions using this operator carry no operand.
    pub fn is_unary(self) -> bool {
        matches!(
            self,
            PropertyComparisonOperator::IsNull | PropertyComparisonOperator::NotNull
        )
    }
}

impl fmt::Display for PropertyComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Order in which matching elements are returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SequencingOrder {
    #[default]
    Any,
    Guid,
    CreationDateRecent,
    CreationDateOldest,
    LastUpdateRecent,
    LastUpdateOldest,
    PropertyAscending,
    PropertyDescending,
}

impl SequencingOrder {
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            SequencingOrder::Any => "Any",
            SequencingOrder::Guid => "GUID",
            SequencingOrder::CreationDateRecent => "Creation Date (Recent)",
            SequencingOrder::CreationDateOldest => "Creation Date (Oldest)",
            SequencingOrder::LastUpdateRecent => "Last Update Date (Recent)",
            SequencingOrder::LastUpdateOldest => "Last Update Date (Oldest)",
            SequencingOrder::PropertyAscending => "Property (Ascending)",
            SequencingOrder::PropertyDescending => "Property (Descending)",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SequencingOrder::Any => "Any order.",
            SequencingOrder::Guid => "Order by GUID.",
            SequencingOrder::CreationDateRecent => {
                "Order by creation date, most recently created first."
            }
            SequencingOrder::CreationDateOldest => "Order by creation date, oldest first.",
            SequencingOrder::LastUpdateRecent => "Order by last update date, most recent first.",
            SequencingOrder::LastUpdateOldest => "Order by last update date, oldest first.",
            SequencingOrder::PropertyAscending => "Order by the named property, lowest value first.",
            SequencingOrder::PropertyDescending => {
                "Order by the named property, highest value first."
            }
        }
    }

    /// Returns true if this order needs a sequencing property name.
    pub fn needs_property(self) -> bool {
        matches!(
            self,
            SequencingOrder::PropertyAscending | SequencingOrder::PropertyDescending
        )
    }
}

impl fmt::Display for SequencingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single test against one property.
///
/// A condition either compares `property` with `value` using `operator`, or
/// groups `nested_conditions` as a sub-expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default)]
    pub operator: PropertyComparisonOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<PropertyValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested_conditions: Option<SearchProperties>,
}

impl PropertyCondition {
    /// Creates a comparison condition.
    pub fn new(
        property: impl Into<String>,
        operator: PropertyComparisonOperator,
        value: Option<PropertyValue>,
    ) -> Self {
        Self {
            property: Some(property.into()),
            operator,
            value,
            nested_conditions: None,
        }
    }

    /// Creates a condition that groups a nested expression.
    pub fn nested(conditions: SearchProperties) -> Self {
        Self {
            nested_conditions: Some(conditions),
            ..Self::default()
        }
    }
}

/// A boolean combination of property conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProperties {
    #[serde(default)]
    pub match_criteria: MatchCriteria,
    #[serde(default)]
    pub conditions: Vec<PropertyCondition>,
}

impl SearchProperties {
    pub fn new(match_criteria: MatchCriteria, conditions: Vec<PropertyCondition>) -> Self {
        Self {
            match_criteria,
            conditions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Restricts a search to elements carrying a named classification, with
/// optional conditions on the classification's properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_properties: Option<SearchProperties>,
}

impl ClassificationCondition {
    pub fn new(name: impl Into<String>, search_properties: Option<SearchProperties>) -> Self {
        Self {
            name: Some(name.into()),
            search_properties,
        }
    }
}

/// A boolean combination of classification conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchClassifications {
    #[serde(default)]
    pub match_criteria: MatchCriteria,
    #[serde(default)]
    pub conditions: Vec<ClassificationCondition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_metadata() {
        assert_eq!(PropertyComparisonOperator::Eq.ordinal(), 0);
        assert_eq!(PropertyComparisonOperator::Like.ordinal(), 9);
        assert_eq!(PropertyComparisonOperator::Lte.to_string(), "<=");
        assert!(PropertyComparisonOperator::IsNull.is_unary());
        assert!(!PropertyComparisonOperator::In.is_unary());
        assert_eq!(SequencingOrder::PropertyDescending.ordinal(), 7);
        assert!(SequencingOrder::PropertyAscending.needs_property());
        assert_eq!(MatchCriteria::None.description(), "No properties can match.");
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&PropertyComparisonOperator::NotNull).unwrap(),
            "\"NOT_NULL\""
        );
        assert_eq!(
            serde_json::to_string(&SequencingOrder::CreationDateRecent).unwrap(),
            "\"CREATION_DATE_RECENT\""
        );
        let criteria: MatchCriteria = serde_json::from_str("\"ANY\"").unwrap();
        assert_eq!(criteria, MatchCriteria::Any);
    }

    #[test]
    fn test_condition_serialization_omits_absent_fields() {
        let search = SearchProperties::new(
            MatchCriteria::All,
            vec![PropertyCondition::new(
                "owner",
                PropertyComparisonOperator::IsNull,
                None,
            )],
        );
        let json = serde_json::to_value(&search).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "matchCriteria": "ALL",
                "conditions": [{ "property": "owner", "operator": "IS_NULL" }]
            })
        );
    }

    #[test]
    fn test_nested_condition_roundtrip() {
        let inner = SearchProperties::new(
            MatchCriteria::Any,
            vec![
                PropertyCondition::new("a", PropertyComparisonOperator::Eq, Some(PropertyValue::string("1"))),
                PropertyCondition::new("b", PropertyComparisonOperator::NotNull, None),
            ],
        );
        let outer = SearchProperties::new(MatchCriteria::None, vec![PropertyCondition::nested(inner)]);

        let json = serde_json::to_string(&outer).unwrap();
        let back: SearchProperties = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outer);
    }
}
